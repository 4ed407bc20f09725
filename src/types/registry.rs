//! Type registry: lookup of field types by name
//!
//! The registry is immutable once built. It owns the collaborators that
//! some types need: the IANA zone set for date casts, and the GeoJSON and
//! geometry checks for geospatial tests.

use std::sync::Arc;

use serde_json::Value;

use crate::config::RegistryConfig;
use crate::observability::{log_event_with_fields, Event};

use super::cast::{CastOptions, CastTarget, StoreExpr};
use super::errors::{TypeError, TypeResult};
use super::field_type::FieldType;
use super::geo::{basic_issues, GeoJsonCheck, GeometryCheck, GeometryKind, SimpleGeometry, StructuralGeoJson};
use super::measurement::Measurement;
use super::validator::{ConfiguredValidator, ValidatorKind};
use super::verdict::Verdict;
use super::zones::ZoneSet;

/// Registry of every supported field type
pub struct TypeRegistry {
    config: RegistryConfig,
    zones: ZoneSet,
    geojson: Arc<dyn GeoJsonCheck>,
    geometry: Arc<dyn GeometryCheck>,
}

impl TypeRegistry {
    /// Registry with default configuration and built-in geometry checks
    pub fn new() -> Self {
        Self::build(RegistryConfig::default())
    }

    /// Registry with a caller-supplied configuration.
    ///
    /// # Errors
    ///
    /// `Config` if the configuration fails [`RegistryConfig::validate`].
    pub fn with_config(config: RegistryConfig) -> TypeResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: RegistryConfig) -> Self {
        let registry = Self {
            config,
            zones: ZoneSet::iana(),
            geojson: Arc::new(StructuralGeoJson),
            geometry: Arc::new(SimpleGeometry),
        };
        log_event_with_fields(
            Event::RegistryReady,
            &[
                ("types", &FieldType::ALL.len().to_string()),
                ("zones", &registry.zones.len().to_string()),
            ],
        );
        registry
    }

    /// Replace the zone set accepted by date casts
    pub fn with_zones(mut self, zones: ZoneSet) -> Self {
        self.zones = zones;
        self
    }

    /// Replace the GeoJSON syntax check
    pub fn with_geojson_check(mut self, check: Arc<dyn GeoJsonCheck>) -> Self {
        self.geojson = check;
        self
    }

    /// Replace the geometry semantic check
    pub fn with_geometry_check(mut self, check: Arc<dyn GeometryCheck>) -> Self {
        self.geometry = check;
        self
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn zones(&self) -> &ZoneSet {
        &self.zones
    }

    /// Looks up a type by name.
    ///
    /// # Errors
    ///
    /// `UnknownType` if no type has this name.
    pub fn lookup(&self, name: &str) -> TypeResult<TypeDescriptor<'_>> {
        let field_type = name.parse::<FieldType>()?;
        Ok(self.descriptor(field_type))
    }

    /// Descriptor for a known type
    pub fn descriptor(&self, field_type: FieldType) -> TypeDescriptor<'_> {
        TypeDescriptor {
            field_type,
            registry: self,
        }
    }

    /// Every registered type, in registry order
    pub fn types(&self) -> impl Iterator<Item = TypeDescriptor<'_>> + '_ {
        FieldType::ALL.into_iter().map(move |ty| self.descriptor(ty))
    }

    /// Full geospatial pipeline: structure, then syntax, then semantics
    async fn test_geometry(&self, kind: GeometryKind, value: &Value) -> Verdict {
        if let Some(issue) = basic_issues(value, kind) {
            return Verdict::rejected(issue);
        }
        let syntax = self.geojson.check(value).await;
        if !syntax.is_accepted() {
            return syntax;
        }
        self.geometry.check(value).await
    }

    fn cast_date(&self, value: &Value, options: &CastOptions) -> TypeResult<StoreExpr> {
        let base = StoreExpr::function(
            self.config.timestamp_function.as_str(),
            vec![
                StoreExpr::value(value.clone()),
                StoreExpr::value(Value::from(self.config.timestamp_format.as_str())),
            ],
        );
        let zone = match options.timezone.as_deref() {
            None | Some("") => return Ok(base),
            Some(zone) => zone,
        };
        if !self.zones.contains(zone) {
            log_event_with_fields(Event::TimezoneRejected, &[("timezone", zone)]);
            return Err(TypeError::InvalidTimezone(zone.to_string()));
        }
        Ok(StoreExpr::at_time_zone(base, zone))
    }

    fn cast_geometry(&self, value: &Value) -> StoreExpr {
        let geometry = StoreExpr::function(
            self.config.geometry_function.as_str(),
            vec![StoreExpr::value(value.clone())],
        );
        StoreExpr::function(
            "ST_SetSRID",
            vec![geometry, StoreExpr::value(Value::from(self.config.srid))],
        )
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// View of one registered type
#[derive(Clone, Copy)]
pub struct TypeDescriptor<'a> {
    field_type: FieldType,
    registry: &'a TypeRegistry,
}

impl<'a> TypeDescriptor<'a> {
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Type name used for lookup
    pub fn name(&self) -> &'static str {
        self.field_type.type_name()
    }

    pub fn label(&self) -> &'static str {
        self.field_type.label()
    }

    pub fn is_geospatial(&self) -> bool {
        self.field_type.is_geospatial()
    }

    pub fn has_items(&self) -> bool {
        self.field_type.has_items()
    }

    pub fn validators(&self) -> &'static [ValidatorKind] {
        self.field_type.validators()
    }

    pub fn measurements(&self) -> Option<&'static [Measurement]> {
        self.field_type.measurements()
    }

    /// Resolves a validator declared by this type
    pub fn validator(&self, name: &str) -> TypeResult<ValidatorKind> {
        name.parse::<ValidatorKind>()
            .ok()
            .filter(|kind| self.field_type.declares(*kind))
            .ok_or_else(|| TypeError::UnknownValidator {
                type_name: self.name().to_string(),
                validator: name.to_string(),
            })
    }

    /// Resolves a validator and binds its parameter.
    ///
    /// # Errors
    ///
    /// - `UnknownValidator` if the type does not declare `name`
    /// - `InvalidParam` if `param` fails the validator's parameter check
    pub fn configure(&self, name: &str, param: &Value) -> TypeResult<ConfiguredValidator> {
        let kind = self.validator(name)?;
        kind.configure(param).map_err(|err| {
            log_event_with_fields(
                Event::ParamRejected,
                &[("type", self.name()), ("validator", name), ("param", &param.to_string())],
            );
            err
        })
    }

    /// Configures a validator and tests one value with it
    pub fn check(&self, name: &str, param: &Value, value: &Value) -> TypeResult<bool> {
        let validator = self.configure(name, param)?;
        let passed = validator.test(value);
        if !passed {
            self.log_rejection(name);
        }
        Ok(passed)
    }

    /// Fast synchronous test.
    ///
    /// Geospatial types only run the structural pre-check here.
    pub fn sync_test(&self, value: &Value) -> Verdict {
        self.field_type.sync_test(value)
    }

    /// Full acceptance test.
    ///
    /// Only geospatial types suspend, while the injected checks run.
    pub async fn test(&self, value: &Value) -> Verdict {
        let verdict = match self.field_type.geometry() {
            Some(kind) => self.registry.test_geometry(kind, value).await,
            None => self.field_type.sync_test(value),
        };
        if !verdict.is_accepted() {
            self.log_rejection(verdict.reason().unwrap_or("type test"));
        }
        verdict
    }

    /// Casts a raw value into a store expression.
    ///
    /// # Errors
    ///
    /// `InvalidTimezone` when a date cast names a zone outside the zone set.
    pub fn cast(&self, value: &Value, options: &CastOptions) -> TypeResult<StoreExpr> {
        let raw = || StoreExpr::value(value.clone());
        let expr = match self.field_type {
            FieldType::Any => raw(),
            FieldType::Text => StoreExpr::cast(raw(), CastTarget::Text),
            FieldType::Number => StoreExpr::cast(raw(), CastTarget::Numeric),
            FieldType::Boolean => StoreExpr::cast(raw(), CastTarget::Boolean),
            FieldType::Object => StoreExpr::cast(raw(), CastTarget::Jsonb),
            // every element is treated alike; no per-item casting
            FieldType::Array => StoreExpr::function(
                self.registry.config.array_cast_function.as_str(),
                vec![raw()],
            ),
            FieldType::Date => self.registry.cast_date(value, options)?,
            FieldType::Point
            | FieldType::Line
            | FieldType::MultiLine
            | FieldType::Polygon
            | FieldType::MultiPolygon => self.registry.cast_geometry(value),
        };
        Ok(expr)
    }

    fn log_rejection(&self, reason: &str) {
        if self.registry.config.log_rejections {
            log_event_with_fields(Event::ValueRejected, &[("type", self.name()), ("reason", reason)]);
        }
    }
}

impl std::fmt::Debug for TypeDescriptor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name())
            .field("label", &self.label())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_every_type() {
        let registry = TypeRegistry::new();
        for name in [
            "text", "number", "boolean", "date", "array", "object", "point", "line", "multiline",
            "polygon", "multipolygon", "any",
        ] {
            let descriptor = registry.lookup(name).unwrap();
            assert_eq!(descriptor.name(), name);
        }
        assert_eq!(registry.types().count(), 12);
    }

    #[test]
    fn test_lookup_unknown_type() {
        let registry = TypeRegistry::new();
        let err = registry.lookup("varchar").unwrap_err();
        assert_eq!(err, TypeError::UnknownType("varchar".into()));
    }

    #[test]
    fn test_with_config_validates() {
        let config = RegistryConfig {
            geometry_function: "drop table; --".into(),
            ..Default::default()
        };
        let err = TypeRegistry::with_config(config).err().unwrap();
        assert_eq!(err.code(), "INVALID_CONFIG");

        let config = RegistryConfig {
            srid: 4326,
            ..Default::default()
        };
        assert_eq!(TypeRegistry::with_config(config).unwrap().config().srid, 4326);
    }

    #[test]
    fn test_validator_must_be_declared() {
        let registry = TypeRegistry::new();
        let boolean = registry.lookup("boolean").unwrap();
        assert!(boolean.validator("required").is_ok());
        let err = boolean.validator("minLength").unwrap_err();
        assert_eq!(err.code(), "UNKNOWN_VALIDATOR");
        assert!(registry.lookup("text").unwrap().validator("bogus").is_err());
    }

    #[test]
    fn test_configure_rejects_bad_param() {
        let registry = TypeRegistry::new();
        let array = registry.lookup("array").unwrap();
        assert!(matches!(
            array.configure("minItems", &json!(-1)),
            Err(TypeError::InvalidParam { .. })
        ));
        assert!(array.configure("minItems", &json!(2)).is_ok());
    }

    #[test]
    fn test_check() {
        let registry = TypeRegistry::new();
        let number = registry.lookup("number").unwrap();
        assert_eq!(number.check("min", &json!(10), &json!(5)), Ok(false));
        assert_eq!(number.check("min", &json!(10), &json!(10)), Ok(true));
        assert!(number.check("min", &json!("ten"), &json!(10)).is_err());
    }

    #[test]
    fn test_scalar_casts() {
        let registry = TypeRegistry::new();
        let opts = CastOptions::default();
        let cases = [
            ("text", CastTarget::Text),
            ("number", CastTarget::Numeric),
            ("boolean", CastTarget::Boolean),
            ("object", CastTarget::Jsonb),
        ];
        for (name, target) in cases {
            let expr = registry.lookup(name).unwrap().cast(&json!("x"), &opts).unwrap();
            assert_eq!(expr.cast_target(), Some(target));
        }
        let any = registry.lookup("any").unwrap().cast(&json!([1]), &opts).unwrap();
        assert_eq!(any, StoreExpr::value(json!([1])));
    }

    #[test]
    fn test_array_cast() {
        let registry = TypeRegistry::new();
        let expr = registry
            .lookup("array")
            .unwrap()
            .cast(&json!(["a", 1]), &CastOptions::default())
            .unwrap();
        assert_eq!(expr.function_name(), Some("fix_jsonb_array"));
    }

    #[test]
    fn test_geometry_cast_tags_srid() {
        let registry = TypeRegistry::new();
        let point = json!({"type": "Point", "coordinates": [1, 2]});
        let expr = registry
            .lookup("point")
            .unwrap()
            .cast(&point, &CastOptions::default())
            .unwrap();
        assert_eq!(
            expr.to_string(),
            r#"ST_SetSRID(ST_GeomFromGeoJSON('{"coordinates":[1,2],"type":"Point"}'), 4979)"#
        );
    }

    #[test]
    fn test_date_cast_with_and_without_zone() {
        let registry = TypeRegistry::new();
        let date = registry.lookup("date").unwrap();
        let value = json!("2024-01-01T00:00:00Z");

        let base = date.cast(&value, &CastOptions::default()).unwrap();
        assert_eq!(base.function_name(), Some("to_timestamp"));

        let zoned = date.cast(&value, &CastOptions::with_timezone("UTC")).unwrap();
        assert_ne!(zoned, base);
        assert!(zoned.to_string().ends_with("AT TIME ZONE 'UTC'"));

        let empty = date.cast(&value, &CastOptions::with_timezone("")).unwrap();
        assert_eq!(empty, base);
    }

    #[test]
    fn test_date_cast_unknown_zone() {
        let registry = TypeRegistry::new();
        let err = registry
            .lookup("date")
            .unwrap()
            .cast(&json!("2024-01-01T00:00:00Z"), &CastOptions::with_timezone("Not/AZone"))
            .unwrap_err();
        assert_eq!(err, TypeError::InvalidTimezone("Not/AZone".into()));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_restricted_zones() {
        let registry = TypeRegistry::new().with_zones(ZoneSet::from_names(["UTC"]));
        let date = registry.lookup("date").unwrap();
        let value = json!("2024-01-01T00:00:00Z");
        assert!(date.cast(&value, &CastOptions::with_timezone("UTC")).is_ok());
        assert!(date
            .cast(&value, &CastOptions::with_timezone("Europe/Berlin"))
            .is_err());
    }

    #[tokio::test]
    async fn test_scalar_test_is_sync_test() {
        let registry = TypeRegistry::new();
        let text = registry.lookup("text").unwrap();
        assert!(text.test(&json!("")).await.is_accepted());
        assert_eq!(text.test(&json!(1)).await, Verdict::Rejected(None));
    }

    #[tokio::test]
    async fn test_geometry_pipeline_short_circuits() {
        let registry = TypeRegistry::new();
        let polygon = registry.lookup("polygon").unwrap();

        let wrong_type = polygon.test(&json!({"type": "Point", "coordinates": [0, 0]})).await;
        assert!(wrong_type.reason().unwrap().contains("Expected Polygon not Point"));

        let bad_syntax = polygon
            .test(&json!({"type": "Polygon", "coordinates": [[[0, 0], [1, 1]]]}))
            .await;
        assert!(bad_syntax.reason().unwrap().contains("four positions"));

        let open_ring = polygon
            .test(&json!({"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 1]]]}))
            .await;
        assert!(open_ring.reason().unwrap().contains("closed"));
    }
}
