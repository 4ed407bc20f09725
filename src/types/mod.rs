//! # Field Types
//!
//! The closed set of field types a collection can declare, with their
//! validators, store casts, and measurement tables.
//!
//! # Invariants
//!
//! - Every type has a unique lowercase name
//! - A validator can only run after its parameter passed its check
//! - Type tests never raise: a failing value yields a rejected [`Verdict`]
//! - Geospatial tests short-circuit on the first failing layer

mod cast;
mod errors;
mod field_type;
pub mod geo;
mod measurement;
pub mod predicates;
mod registry;
mod validator;
mod verdict;
mod zones;

pub use cast::{CastOptions, CastTarget, StoreExpr};
pub use errors::{TypeError, TypeResult};
pub use field_type::FieldType;
pub use geo::{CheckFuture, GeoJsonCheck, GeometryCheck, GeometryKind, SimpleGeometry, StructuralGeoJson};
pub use measurement::{measurement, Measurement, Unit, MEASUREMENTS};
pub use registry::{TypeDescriptor, TypeRegistry};
pub use validator::{ConfiguredValidator, ParamKind, ValidatorKind};
pub use verdict::Verdict;
pub use zones::ZoneSet;
