//! Field type definitions
//!
//! Supported types:
//! - text: UTF-8 string
//! - number: native number or numeric string
//! - boolean: native boolean
//! - date: ISO-8601 date or date-time string
//! - array: ordered sequence, possibly heterogeneous
//! - object: plain key/value mapping
//! - point, line, multiline, polygon, multipolygon: GeoJSON geometries
//! - any: anything

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::TypeError;
use super::geo::{basic_issues, GeometryKind};
use super::measurement::{Measurement, MEASUREMENTS};
use super::predicates::{is_iso8601, is_number, is_plain_object};
use super::validator::ValidatorKind;
use super::validator::ValidatorKind as V;
use super::verdict::Verdict;

/// Supported field types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Boolean,
    Date,
    Array,
    Object,
    Point,
    Line,
    MultiLine,
    Polygon,
    MultiPolygon,
    Any,
}

const TEXT_VALIDATORS: &[ValidatorKind] = &[
    V::Required,
    V::NotEmpty,
    V::MinLength,
    V::MaxLength,
    V::Enum,
    V::Url,
    V::Image,
    V::Video,
    V::Audio,
    V::Stream,
    V::Email,
    V::Phone,
    V::Address,
    V::Code,
    V::Regex,
];
const NUMBER_VALIDATORS: &[ValidatorKind] = &[V::Required, V::Enum, V::Min, V::Max];
const DATE_VALIDATORS: &[ValidatorKind] = &[V::Required, V::Min, V::Max];
const ARRAY_VALIDATORS: &[ValidatorKind] =
    &[V::Required, V::Unique, V::NotEmpty, V::MinItems, V::MaxItems];
const OBJECT_VALIDATORS: &[ValidatorKind] = &[V::Required, V::NotEmpty, V::MinKeys, V::MaxKeys];
const POINT_VALIDATORS: &[ValidatorKind] = &[
    V::Required,
    V::MinLongitude,
    V::MaxLongitude,
    V::MinLatitude,
    V::MaxLatitude,
];
const REQUIRED_ONLY: &[ValidatorKind] = &[V::Required];

impl FieldType {
    /// Every type, in registry order
    pub const ALL: [FieldType; 12] = [
        FieldType::Text,
        FieldType::Number,
        FieldType::Boolean,
        FieldType::Date,
        FieldType::Array,
        FieldType::Object,
        FieldType::Point,
        FieldType::Line,
        FieldType::MultiLine,
        FieldType::Polygon,
        FieldType::MultiPolygon,
        FieldType::Any,
    ];

    /// Returns the type name used for lookup
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Array => "array",
            FieldType::Object => "object",
            FieldType::Point => "point",
            FieldType::Line => "line",
            FieldType::MultiLine => "multiline",
            FieldType::Polygon => "polygon",
            FieldType::MultiPolygon => "multipolygon",
            FieldType::Any => "any",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            FieldType::Text => "Text",
            FieldType::Number => "Number",
            FieldType::Boolean => "True/False",
            FieldType::Date => "Date/Time",
            FieldType::Array => "List",
            FieldType::Object => "Map",
            FieldType::Point => "GeoJSON Point",
            FieldType::Line => "GeoJSON LineString",
            FieldType::MultiLine => "GeoJSON MultiLineString",
            FieldType::Polygon => "GeoJSON Polygon",
            FieldType::MultiPolygon => "GeoJSON MultiPolygon",
            FieldType::Any => "Any",
        }
    }

    /// GeoJSON geometry backing this type, if it is geospatial
    pub fn geometry(&self) -> Option<GeometryKind> {
        match self {
            FieldType::Point => Some(GeometryKind::Point),
            FieldType::Line => Some(GeometryKind::LineString),
            FieldType::MultiLine => Some(GeometryKind::MultiLineString),
            FieldType::Polygon => Some(GeometryKind::Polygon),
            FieldType::MultiPolygon => Some(GeometryKind::MultiPolygon),
            _ => None,
        }
    }

    pub fn is_geospatial(&self) -> bool {
        self.geometry().is_some()
    }

    /// Whether the type wraps a sequence of items
    pub fn has_items(&self) -> bool {
        matches!(self, FieldType::Array)
    }

    /// Validators declared for this type, in declaration order.
    ///
    /// Always starts with `required`.
    pub fn validators(&self) -> &'static [ValidatorKind] {
        match self {
            FieldType::Text => TEXT_VALIDATORS,
            FieldType::Number => NUMBER_VALIDATORS,
            FieldType::Date => DATE_VALIDATORS,
            FieldType::Array => ARRAY_VALIDATORS,
            FieldType::Object => OBJECT_VALIDATORS,
            FieldType::Point => POINT_VALIDATORS,
            FieldType::Boolean
            | FieldType::Line
            | FieldType::MultiLine
            | FieldType::Polygon
            | FieldType::MultiPolygon
            | FieldType::Any => REQUIRED_ONLY,
        }
    }

    pub fn declares(&self, validator: ValidatorKind) -> bool {
        self.validators().contains(&validator)
    }

    /// Units of measurement, for numeric types only
    pub fn measurements(&self) -> Option<&'static [Measurement]> {
        match self {
            FieldType::Number => Some(MEASUREMENTS),
            _ => None,
        }
    }

    /// Synchronous acceptance test.
    ///
    /// For geospatial types this is only the structural pre-check; the full
    /// pipeline runs through the registry.
    pub fn sync_test(&self, value: &Value) -> Verdict {
        match self {
            FieldType::Text => value.is_string().into(),
            FieldType::Number => is_number(value).into(),
            FieldType::Boolean => value.is_boolean().into(),
            FieldType::Date => value.as_str().map_or(false, is_iso8601).into(),
            FieldType::Array => value.is_array().into(),
            FieldType::Object => is_plain_object(value).into(),
            FieldType::Any => Verdict::Accepted,
            FieldType::Point
            | FieldType::Line
            | FieldType::MultiLine
            | FieldType::Polygon
            | FieldType::MultiPolygon => match self.geometry() {
                Some(kind) => basic_issues(value, kind).into(),
                None => Verdict::Rejected(None),
            },
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

impl FromStr for FieldType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .iter()
            .copied()
            .find(|ty| ty.type_name() == s)
            .ok_or_else(|| TypeError::UnknownType(s.to_string()))
    }
}
