//! Outcome of testing a value against a type

use std::fmt;

/// Whether a value was accepted, and why not when rejected.
///
/// Rejection is a normal outcome, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    /// Rejected, with a reason when the failing check produced one
    Rejected(Option<String>),
}

impl Verdict {
    /// Rejection with a descriptive reason
    pub fn rejected(reason: impl Into<String>) -> Self {
        Verdict::Rejected(Some(reason.into()))
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }

    /// The rejection reason, if any
    pub fn reason(&self) -> Option<&str> {
        match self {
            Verdict::Accepted => None,
            Verdict::Rejected(reason) => reason.as_deref(),
        }
    }
}

impl From<bool> for Verdict {
    fn from(accepted: bool) -> Self {
        if accepted {
            Verdict::Accepted
        } else {
            Verdict::Rejected(None)
        }
    }
}

impl From<Option<String>> for Verdict {
    /// An issue, if present, rejects
    fn from(issue: Option<String>) -> Self {
        match issue {
            Some(reason) => Verdict::Rejected(Some(reason)),
            None => Verdict::Accepted,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Accepted => write!(f, "accepted"),
            Verdict::Rejected(None) => write!(f, "rejected"),
            Verdict::Rejected(Some(reason)) => write!(f, "rejected: {}", reason),
        }
    }
}
