//! Named validators and their parameter checks
//!
//! The validator set is closed. A validator is applied in two steps:
//! its parameter is checked once at configuration time, producing a
//! [`ConfiguredValidator`], which then tests candidate values. A test can
//! never run against a parameter that failed the check.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde_json::Value;

use super::errors::{TypeError, TypeResult};
use super::predicates::{
    as_number, compare, is_email, is_number, is_unique, is_url, length_of, values_equal,
    STREAM_PROTOCOLS, WEB_PROTOCOLS,
};

/// Semantic type of a validator parameter, for configuration forms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Number,
    Text,
}

impl ParamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamKind::Number => "number",
            ParamKind::Text => "text",
        }
    }
}

/// Every validator any field type can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidatorKind {
    Required,
    NotEmpty,
    Enum,
    Min,
    Max,
    MinLength,
    MaxLength,
    Url,
    Image,
    Video,
    Audio,
    Stream,
    Email,
    /// Accepts any string; no phone number parsing yet
    Phone,
    /// Accepts any string; no address parsing yet
    Address,
    /// Accepts any string; no code syntax check yet
    Code,
    Regex,
    Unique,
    MinItems,
    MaxItems,
    MinKeys,
    MaxKeys,
    MinLongitude,
    MaxLongitude,
    MinLatitude,
    MaxLatitude,
}

impl ValidatorKind {
    /// Every validator, in a stable order
    pub const ALL: [ValidatorKind; 26] = [
        ValidatorKind::Required,
        ValidatorKind::NotEmpty,
        ValidatorKind::Enum,
        ValidatorKind::Min,
        ValidatorKind::Max,
        ValidatorKind::MinLength,
        ValidatorKind::MaxLength,
        ValidatorKind::Url,
        ValidatorKind::Image,
        ValidatorKind::Video,
        ValidatorKind::Audio,
        ValidatorKind::Stream,
        ValidatorKind::Email,
        ValidatorKind::Phone,
        ValidatorKind::Address,
        ValidatorKind::Code,
        ValidatorKind::Regex,
        ValidatorKind::Unique,
        ValidatorKind::MinItems,
        ValidatorKind::MaxItems,
        ValidatorKind::MinKeys,
        ValidatorKind::MaxKeys,
        ValidatorKind::MinLongitude,
        ValidatorKind::MaxLongitude,
        ValidatorKind::MinLatitude,
        ValidatorKind::MaxLatitude,
    ];

    /// Name used in configuration
    pub fn key(&self) -> &'static str {
        match self {
            ValidatorKind::Required => "required",
            ValidatorKind::NotEmpty => "notEmpty",
            ValidatorKind::Enum => "enum",
            ValidatorKind::Min => "min",
            ValidatorKind::Max => "max",
            ValidatorKind::MinLength => "minLength",
            ValidatorKind::MaxLength => "maxLength",
            ValidatorKind::Url => "url",
            ValidatorKind::Image => "image",
            ValidatorKind::Video => "video",
            ValidatorKind::Audio => "audio",
            ValidatorKind::Stream => "stream",
            ValidatorKind::Email => "email",
            ValidatorKind::Phone => "phone",
            ValidatorKind::Address => "address",
            ValidatorKind::Code => "code",
            ValidatorKind::Regex => "regex",
            ValidatorKind::Unique => "unique",
            ValidatorKind::MinItems => "minItems",
            ValidatorKind::MaxItems => "maxItems",
            ValidatorKind::MinKeys => "minKeys",
            ValidatorKind::MaxKeys => "maxKeys",
            ValidatorKind::MinLongitude => "minLongitude",
            ValidatorKind::MaxLongitude => "maxLongitude",
            ValidatorKind::MinLatitude => "minLatitude",
            ValidatorKind::MaxLatitude => "maxLatitude",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            ValidatorKind::Required => "Required",
            ValidatorKind::NotEmpty => "Not Empty",
            ValidatorKind::Enum => "In List",
            ValidatorKind::Min => "Minimum",
            ValidatorKind::Max => "Maximum",
            ValidatorKind::MinLength => "Minimum Length",
            ValidatorKind::MaxLength => "Maximum Length",
            ValidatorKind::Url => "URL",
            ValidatorKind::Image => "Image URL",
            ValidatorKind::Video => "Video URL",
            ValidatorKind::Audio => "Audio URL",
            ValidatorKind::Stream => "Stream URL",
            ValidatorKind::Email => "Email",
            ValidatorKind::Phone => "Phone Number",
            ValidatorKind::Address => "Address",
            ValidatorKind::Code => "Code",
            ValidatorKind::Regex => "Regular Expression",
            ValidatorKind::Unique => "Unique",
            ValidatorKind::MinItems => "Minimum Items",
            ValidatorKind::MaxItems => "Maximum Items",
            ValidatorKind::MinKeys => "Minimum Keys",
            ValidatorKind::MaxKeys => "Maximum Keys",
            ValidatorKind::MinLongitude => "Minimum Longitude",
            ValidatorKind::MaxLongitude => "Maximum Longitude",
            ValidatorKind::MinLatitude => "Minimum Latitude",
            ValidatorKind::MaxLatitude => "Maximum Latitude",
        }
    }

    /// Whether the validator takes a user-supplied parameter.
    ///
    /// Validators without input are switched on with the parameter `true`.
    pub fn input(&self) -> bool {
        self.param_kind().is_some() || matches!(self, ValidatorKind::Enum)
    }

    /// Semantic type of the parameter, if the validator takes one
    pub fn param_kind(&self) -> Option<ParamKind> {
        match self {
            ValidatorKind::Min
            | ValidatorKind::Max
            | ValidatorKind::MinLength
            | ValidatorKind::MaxLength
            | ValidatorKind::MinItems
            | ValidatorKind::MaxItems
            | ValidatorKind::MinKeys
            | ValidatorKind::MaxKeys
            | ValidatorKind::MinLongitude
            | ValidatorKind::MaxLongitude
            | ValidatorKind::MinLatitude
            | ValidatorKind::MaxLatitude => Some(ParamKind::Number),
            ValidatorKind::Regex => Some(ParamKind::Text),
            _ => None,
        }
    }

    /// Checks that `param` is well-formed for this validator
    pub fn validate_param(&self, param: &Value) -> bool {
        self.parse_param(param).is_ok()
    }

    /// Checks `param` and binds it, ready to test values
    pub fn configure(self, param: &Value) -> TypeResult<ConfiguredValidator> {
        let param = self
            .parse_param(param)
            .map_err(|reason| TypeError::invalid_param(self.key(), reason))?;
        Ok(ConfiguredValidator { kind: self, param })
    }

    fn parse_param(&self, param: &Value) -> Result<Param, &'static str> {
        match self {
            ValidatorKind::Enum => match param {
                Value::Array(items) if !items.is_empty() => Ok(Param::List(items.clone())),
                _ => Err("expected a non-empty list"),
            },
            ValidatorKind::Regex => {
                let pattern = param.as_str().ok_or("expected a pattern string")?;
                Regex::new(pattern)
                    .map(Param::Pattern)
                    .map_err(|_| "pattern does not compile")
            }
            ValidatorKind::Min
            | ValidatorKind::Max
            | ValidatorKind::MinLongitude
            | ValidatorKind::MaxLongitude
            | ValidatorKind::MinLatitude
            | ValidatorKind::MaxLatitude => {
                if is_number(param) {
                    Ok(Param::Bound(param.clone()))
                } else {
                    Err("expected a number")
                }
            }
            ValidatorKind::MinLength
            | ValidatorKind::MaxLength
            | ValidatorKind::MinItems
            | ValidatorKind::MaxItems
            | ValidatorKind::MinKeys
            | ValidatorKind::MaxKeys => match as_number(param) {
                Some(n) if n > 0.0 => Ok(Param::Limit(n)),
                _ => Err("expected a positive number"),
            },
            _ => match param {
                Value::Bool(true) => Ok(Param::Flag),
                _ => Err("expected true"),
            },
        }
    }
}

impl fmt::Display for ValidatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for ValidatorKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValidatorKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.key() == s)
            .ok_or_else(|| TypeError::UnknownValidatorName(s.to_string()))
    }
}

/// A checked validator parameter
#[derive(Debug, Clone)]
enum Param {
    Flag,
    List(Vec<Value>),
    Pattern(Regex),
    Bound(Value),
    Limit(f64),
}

/// A validator bound to a parameter that passed its check
#[derive(Debug, Clone)]
pub struct ConfiguredValidator {
    kind: ValidatorKind,
    param: Param,
}

impl ConfiguredValidator {
    pub fn kind(&self) -> ValidatorKind {
        self.kind
    }

    /// Tests a candidate value against the bound parameter.
    ///
    /// Values of the wrong shape for the validator are rejected.
    pub fn test(&self, value: &Value) -> bool {
        let text = value.as_str();
        match (&self.kind, &self.param) {
            (ValidatorKind::Required, _) => !value.is_null(),
            (ValidatorKind::NotEmpty, _) => matches!(length_of(value), Some(n) if n != 0),
            (ValidatorKind::Enum, Param::List(items)) => {
                items.iter().any(|item| values_equal(item, value))
            }
            (ValidatorKind::Min, Param::Bound(bound)) => at_least(compare(value, bound)),
            (ValidatorKind::Max, Param::Bound(bound)) => at_most(compare(value, bound)),
            (ValidatorKind::MinLength | ValidatorKind::MinItems | ValidatorKind::MinKeys, Param::Limit(n)) => {
                length_of(value).map_or(false, |len| len as f64 >= *n)
            }
            (ValidatorKind::MaxLength | ValidatorKind::MaxItems | ValidatorKind::MaxKeys, Param::Limit(n)) => {
                length_of(value).map_or(false, |len| len as f64 <= *n)
            }
            (
                ValidatorKind::Url | ValidatorKind::Image | ValidatorKind::Video | ValidatorKind::Audio,
                _,
            ) => text.map_or(false, |s| is_url(s, WEB_PROTOCOLS)),
            (ValidatorKind::Stream, _) => text.map_or(false, |s| is_url(s, STREAM_PROTOCOLS)),
            (ValidatorKind::Email, _) => text.map_or(false, is_email),
            (ValidatorKind::Phone | ValidatorKind::Address | ValidatorKind::Code, _) => text.is_some(),
            (ValidatorKind::Regex, Param::Pattern(re)) => text.map_or(false, |s| re.is_match(s)),
            (ValidatorKind::Unique, _) => value.as_array().map_or(false, |items| is_unique(items)),
            (ValidatorKind::MinLongitude, Param::Bound(bound)) => {
                at_least(coordinate(value, 0).and_then(|c| compare(&c, bound)))
            }
            (ValidatorKind::MaxLongitude, Param::Bound(bound)) => {
                at_most(coordinate(value, 0).and_then(|c| compare(&c, bound)))
            }
            (ValidatorKind::MinLatitude, Param::Bound(bound)) => {
                at_least(coordinate(value, 1).and_then(|c| compare(&c, bound)))
            }
            (ValidatorKind::MaxLatitude, Param::Bound(bound)) => {
                at_most(coordinate(value, 1).and_then(|c| compare(&c, bound)))
            }
            _ => false,
        }
    }
}

fn at_least(ordering: Option<Ordering>) -> bool {
    matches!(ordering, Some(Ordering::Greater | Ordering::Equal))
}

fn at_most(ordering: Option<Ordering>) -> bool {
    matches!(ordering, Some(Ordering::Less | Ordering::Equal))
}

/// Reads `coordinates[index]` of a GeoJSON point
fn coordinate(value: &Value, index: usize) -> Option<Value> {
    value.get("coordinates")?.get(index).cloned()
}
