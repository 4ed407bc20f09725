//! IANA time zone names accepted by date casts

use std::collections::HashSet;

use chrono_tz::TZ_VARIANTS;

/// Immutable set of recognized zone names.
///
/// Built once and injected into the registry.
#[derive(Debug, Clone)]
pub struct ZoneSet {
    names: HashSet<&'static str>,
}

impl ZoneSet {
    /// Every zone in the bundled IANA database, links included
    pub fn iana() -> Self {
        Self {
            names: TZ_VARIANTS.iter().map(|tz| tz.name()).collect(),
        }
    }

    /// A restricted set, for deployments that only allow some zones
    pub fn from_names(names: impl IntoIterator<Item = &'static str>) -> Self {
        Self {
            names: names.into_iter().collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for ZoneSet {
    fn default() -> Self {
        Self::iana()
    }
}
