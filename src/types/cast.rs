//! Store expressions produced by casting a raw value
//!
//! The registry does not execute expressions; it only guarantees their
//! shape. Downstream store code dispatches on the variant and on the
//! cast target. [`fmt::Display`] renders SQL text for diagnostics.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Target of a typed cast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CastTarget {
    Text,
    Numeric,
    Boolean,
    Jsonb,
}

impl CastTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            CastTarget::Text => "text",
            CastTarget::Numeric => "numeric",
            CastTarget::Boolean => "boolean",
            CastTarget::Jsonb => "jsonb",
        }
    }
}

/// An opaque expression handed to the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreExpr {
    /// The raw value, unchanged
    Value { value: Value },
    /// `CAST(expr AS target)`
    Cast {
        expr: Box<StoreExpr>,
        target: CastTarget,
    },
    /// `name(args...)`
    Function { name: String, args: Vec<StoreExpr> },
    /// `expr AT TIME ZONE 'zone'`
    AtTimeZone { expr: Box<StoreExpr>, zone: String },
}

impl StoreExpr {
    pub fn value(value: Value) -> Self {
        StoreExpr::Value { value }
    }

    pub fn cast(expr: StoreExpr, target: CastTarget) -> Self {
        StoreExpr::Cast {
            expr: Box::new(expr),
            target,
        }
    }

    pub fn function(name: impl Into<String>, args: Vec<StoreExpr>) -> Self {
        StoreExpr::Function {
            name: name.into(),
            args,
        }
    }

    pub fn at_time_zone(expr: StoreExpr, zone: impl Into<String>) -> Self {
        StoreExpr::AtTimeZone {
            expr: Box::new(expr),
            zone: zone.into(),
        }
    }

    /// Cast target, when this is a typed cast
    pub fn cast_target(&self) -> Option<CastTarget> {
        match self {
            StoreExpr::Cast { target, .. } => Some(*target),
            _ => None,
        }
    }

    /// Function name, when this is a function call
    pub fn function_name(&self) -> Option<&str> {
        match self {
            StoreExpr::Function { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Options for casting a value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastOptions {
    /// IANA zone to convert timestamps into
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl CastOptions {
    pub fn with_timezone(zone: impl Into<String>) -> Self {
        Self {
            timezone: Some(zone.into()),
        }
    }
}

impl fmt::Display for StoreExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreExpr::Value { value } => write_literal(f, value),
            StoreExpr::Cast { expr, target } => write!(f, "CAST({} AS {})", expr, target.as_str()),
            StoreExpr::Function { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            StoreExpr::AtTimeZone { expr, zone } => {
                write!(f, "{} AT TIME ZONE ", expr)?;
                write_quoted(f, zone)
            }
        }
    }
}

fn write_literal(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Null => write!(f, "NULL"),
        Value::Bool(true) => write!(f, "true"),
        Value::Bool(false) => write!(f, "false"),
        Value::Number(n) => write!(f, "{}", n),
        Value::String(s) => write_quoted(f, s),
        other => write_quoted(f, &other.to_string()),
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    write!(f, "'{}'", s.replace('\'', "''"))
}
