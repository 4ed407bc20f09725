//! Registry configuration
//!
//! Names the store-side functions casts are built from. Loaded from a JSON
//! file; every field is optional.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::observability::{log_event_with_fields, Event};
use crate::types::{TypeError, TypeResult};

/// Type registry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Store function normalizing JSON input into a native array (default: "fix_jsonb_array")
    #[serde(default = "default_array_cast_function")]
    pub array_cast_function: String,

    /// Store function building geometry from GeoJSON (default: "ST_GeomFromGeoJSON")
    #[serde(default = "default_geometry_function")]
    pub geometry_function: String,

    /// Spatial reference id tagged onto geometry casts (default: 4979, WGS84 3D)
    #[serde(default = "default_srid")]
    pub srid: u32,

    /// Store function parsing timestamps from text (default: "to_timestamp")
    #[serde(default = "default_timestamp_function")]
    pub timestamp_function: String,

    /// Format passed to the timestamp function
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,

    /// Log every rejected value at TRACE level (default: false)
    #[serde(default)]
    pub log_rejections: bool,
}

fn default_array_cast_function() -> String {
    "fix_jsonb_array".to_string()
}
fn default_geometry_function() -> String {
    "ST_GeomFromGeoJSON".to_string()
}
fn default_srid() -> u32 {
    4979
}
fn default_timestamp_function() -> String {
    "to_timestamp".to_string()
}
fn default_timestamp_format() -> String {
    r#"YYYY-MM-DD"T"HH24:MI:SS"Z""#.to_string()
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            array_cast_function: default_array_cast_function(),
            geometry_function: default_geometry_function(),
            srid: default_srid(),
            timestamp_function: default_timestamp_function(),
            timestamp_format: default_timestamp_format(),
            log_rejections: false,
        }
    }
}

impl RegistryConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> TypeResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| TypeError::Config(format!("Failed to read config: {}", e)))?;

        let config: RegistryConfig = serde_json::from_str(&content)
            .map_err(|e| TypeError::Config(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        log_event_with_fields(Event::ConfigLoaded, &[("path", &path.display().to_string())]);
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> TypeResult<()> {
        let functions = [
            ("array_cast_function", &self.array_cast_function),
            ("geometry_function", &self.geometry_function),
            ("timestamp_function", &self.timestamp_function),
        ];
        for (field, name) in functions {
            if !is_identifier(name) {
                return Err(TypeError::Config(format!(
                    "{} must be a function name, got '{}'",
                    field, name
                )));
            }
        }

        if self.srid == 0 {
            return Err(TypeError::Config("srid must be > 0".into()));
        }

        if self.timestamp_format.is_empty() {
            return Err(TypeError::Config("timestamp_format must not be empty".into()));
        }

        Ok(())
    }

    /// Enable rejection logging
    pub fn with_rejection_logging(mut self) -> Self {
        self.log_rejections = true;
        self
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        }
        _ => false,
    }
}
