//! GeoJSON geometry validation
//!
//! Three layers, each short-circuiting with its reason:
//! 1. structural pre-check (synchronous): plain object with the right `type`
//! 2. GeoJSON syntax ([`GeoJsonCheck`])
//! 3. geometry semantics ([`GeometryCheck`])
//!
//! Layers 2 and 3 are injected collaborators. [`StructuralGeoJson`] and
//! [`SimpleGeometry`] are the built-in implementations.
//!
//! Coordinates are WGS84 (EPSG:4979): longitude, latitude, optional elevation.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use serde_json::Value;

use super::verdict::Verdict;

/// Future returned by the asynchronous geometry checks
pub type CheckFuture<'a> = Pin<Box<dyn Future<Output = Verdict> + Send + 'a>>;

/// GeoJSON geometry type names backed by a field type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    Point,
    LineString,
    MultiLineString,
    Polygon,
    MultiPolygon,
}

impl GeometryKind {
    pub const ALL: [GeometryKind; 5] = [
        GeometryKind::Point,
        GeometryKind::LineString,
        GeometryKind::MultiLineString,
        GeometryKind::Polygon,
        GeometryKind::MultiPolygon,
    ];

    /// The GeoJSON `type` member value
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::LineString => "LineString",
            GeometryKind::MultiLineString => "MultiLineString",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPolygon => "MultiPolygon",
        }
    }

    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structural pre-check: returns the issue, or `None` when the value is a
/// plain object whose `type` is `kind`.
pub fn basic_issues(value: &Value, kind: GeometryKind) -> Option<String> {
    let obj = match value.as_object() {
        Some(obj) => obj,
        None => return Some("Not a valid object".to_string()),
    };
    match obj.get("type") {
        Some(Value::String(name)) if name == kind.as_str() => None,
        Some(Value::String(name)) => Some(type_issue(kind, name)),
        Some(other) => Some(type_issue(kind, &other.to_string())),
        None => Some(type_issue(kind, "undefined")),
    }
}

fn type_issue(expected: GeometryKind, actual: &str) -> String {
    format!("Not a valid type value (Expected {} not {})", expected, actual)
}

/// Deep GeoJSON syntax check
pub trait GeoJsonCheck: Send + Sync {
    /// Resolves to `Accepted`, or `Rejected` with the reason
    fn check<'a>(&'a self, value: &'a Value) -> CheckFuture<'a>;
}

/// Geometry semantic check (ring closure, self-intersection, ranges)
pub trait GeometryCheck: Send + Sync {
    /// Resolves to `Accepted`, or `Rejected` with or without a reason
    fn check<'a>(&'a self, value: &'a Value) -> CheckFuture<'a>;
}

/// RFC 7946 geometry syntax: coordinate nesting, position arity,
/// minimum position counts, and `bbox` shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralGeoJson;

impl StructuralGeoJson {
    /// Synchronous body of the check
    pub fn issues(&self, value: &Value) -> Option<String> {
        let obj = match value.as_object() {
            Some(obj) => obj,
            None => return Some("Not a valid object".to_string()),
        };
        let kind = match obj.get("type").and_then(Value::as_str) {
            Some(name) => match GeometryKind::from_type_name(name) {
                Some(kind) => kind,
                None => return Some(format!("\"{}\" is not a supported geometry type", name)),
            },
            None => return Some("\"type\" member must be a string".to_string()),
        };
        if let Some(bbox) = obj.get("bbox") {
            if let Some(issue) = bbox_issues(bbox) {
                return Some(issue);
            }
        }
        let coordinates = match obj.get("coordinates") {
            Some(coordinates) => coordinates,
            None => return Some("\"coordinates\" member required".to_string()),
        };
        match kind {
            GeometryKind::Point => position_issues(coordinates),
            GeometryKind::LineString => line_issues(coordinates),
            GeometryKind::MultiLineString => each(coordinates, line_issues),
            GeometryKind::Polygon => each(coordinates, ring_issues),
            GeometryKind::MultiPolygon => each(coordinates, |p| each(p, ring_issues)),
        }
    }
}

impl GeoJsonCheck for StructuralGeoJson {
    fn check<'a>(&'a self, value: &'a Value) -> CheckFuture<'a> {
        Box::pin(async move { Verdict::from(self.issues(value)) })
    }
}

fn bbox_issues(bbox: &Value) -> Option<String> {
    match bbox.as_array() {
        Some(items) if items.len() >= 4 && items.len() % 2 == 0 && items.iter().all(Value::is_number) => None,
        _ => Some("\"bbox\" must be an array of 2*n numbers".to_string()),
    }
}

fn position_issues(value: &Value) -> Option<String> {
    match value.as_array() {
        Some(items) if (2..=3).contains(&items.len()) && items.iter().all(Value::is_number) => None,
        _ => Some("Position must be an array of two or three numbers".to_string()),
    }
}

fn line_issues(value: &Value) -> Option<String> {
    match value.as_array() {
        Some(items) if items.len() >= 2 => items.iter().find_map(position_issues),
        _ => Some("LineString must contain at least two positions".to_string()),
    }
}

fn ring_issues(value: &Value) -> Option<String> {
    match value.as_array() {
        Some(items) if items.len() >= 4 => items.iter().find_map(position_issues),
        _ => Some("Linear ring must contain at least four positions".to_string()),
    }
}

fn each(value: &Value, check: impl Fn(&Value) -> Option<String>) -> Option<String> {
    match value.as_array() {
        Some(items) => items.iter().find_map(check),
        None => Some("Coordinates must be an array".to_string()),
    }
}

/// Semantic checks on syntactically valid geometry: coordinate ranges,
/// distinct line positions, closed and non-self-intersecting rings.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleGeometry;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pt {
    x: f64,
    y: f64,
}

impl SimpleGeometry {
    /// Synchronous body of the check
    pub fn issues(&self, value: &Value) -> Option<String> {
        let kind = match value
            .get("type")
            .and_then(Value::as_str)
            .and_then(GeometryKind::from_type_name)
        {
            Some(kind) => kind,
            None => return Some("Unsupported geometry".to_string()),
        };
        let coordinates = value.get("coordinates").unwrap_or(&Value::Null);
        let result = match kind {
            GeometryKind::Point => position(coordinates).map(|p| range_issue(&[p])),
            GeometryKind::LineString => positions(coordinates).map(|line| line_semantics(&line)),
            GeometryKind::MultiLineString => lines(coordinates)
                .map(|lines| lines.iter().find_map(|line| line_semantics(line))),
            GeometryKind::Polygon => lines(coordinates).map(|rings| polygon_semantics(&rings)),
            GeometryKind::MultiPolygon => coordinates.as_array().and_then(|polygons| {
                polygons
                    .iter()
                    .map(lines)
                    .collect::<Option<Vec<_>>>()
                    .map(|polygons| polygons.iter().find_map(|rings| polygon_semantics(rings)))
            }),
        };
        result.unwrap_or_else(|| Some("Invalid coordinates".to_string()))
    }
}

impl GeometryCheck for SimpleGeometry {
    fn check<'a>(&'a self, value: &'a Value) -> CheckFuture<'a> {
        Box::pin(async move { Verdict::from(self.issues(value)) })
    }
}

fn position(value: &Value) -> Option<Pt> {
    let items = value.as_array()?;
    Some(Pt {
        x: items.first()?.as_f64()?,
        y: items.get(1)?.as_f64()?,
    })
}

fn positions(value: &Value) -> Option<Vec<Pt>> {
    value.as_array()?.iter().map(position).collect()
}

fn lines(value: &Value) -> Option<Vec<Vec<Pt>>> {
    value.as_array()?.iter().map(positions).collect()
}

fn range_issue(points: &[Pt]) -> Option<String> {
    points.iter().find_map(|p| {
        if !(-180.0..=180.0).contains(&p.x) {
            Some(format!("Longitude {} out of range [-180, 180]", p.x))
        } else if !(-90.0..=90.0).contains(&p.y) {
            Some(format!("Latitude {} out of range [-90, 90]", p.y))
        } else {
            None
        }
    })
}

fn line_semantics(line: &[Pt]) -> Option<String> {
    if let Some(issue) = range_issue(line) {
        return Some(issue);
    }
    match line.first() {
        Some(first) if line.iter().any(|p| p != first) => None,
        _ => Some("LineString must contain at least two distinct positions".to_string()),
    }
}

fn polygon_semantics(rings: &[Vec<Pt>]) -> Option<String> {
    rings.iter().find_map(|ring| {
        if let Some(issue) = range_issue(ring) {
            return Some(issue);
        }
        if ring.first() != ring.last() {
            return Some("Polygon rings must be closed".to_string());
        }
        if self_intersects(ring) {
            return Some("Polygon rings must not self-intersect".to_string());
        }
        None
    })
}

/// Checks a closed ring for crossings between non-adjacent edges.
///
/// Repeated consecutive positions are valid and are collapsed first.
fn self_intersects(ring: &[Pt]) -> bool {
    let mut ring = ring.to_vec();
    ring.dedup();
    let edges = ring.len().saturating_sub(1);
    for i in 0..edges {
        for j in (i + 2)..edges {
            // first and last edges share the closing vertex
            if i == 0 && j == edges - 1 {
                continue;
            }
            if segments_intersect(ring[i], ring[i + 1], ring[j], ring[j + 1]) {
                return true;
            }
        }
    }
    false
}

fn orient(a: Pt, b: Pt, c: Pt) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn within(a: Pt, b: Pt, c: Pt) -> bool {
    c.x >= a.x.min(b.x) && c.x <= a.x.max(b.x) && c.y >= a.y.min(b.y) && c.y <= a.y.max(b.y)
}

fn segments_intersect(p1: Pt, p2: Pt, p3: Pt, p4: Pt) -> bool {
    let d1 = orient(p3, p4, p1);
    let d2 = orient(p3, p4, p2);
    let d3 = orient(p1, p2, p3);
    let d4 = orient(p1, p2, p4);
    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }
    (d1 == 0.0 && within(p3, p4, p1))
        || (d2 == 0.0 && within(p3, p4, p2))
        || (d3 == 0.0 && within(p1, p2, p3))
        || (d4 == 0.0 && within(p1, p2, p4))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_basic_issues() {
        let point = json!({"type": "Point", "coordinates": [1, 2]});
        assert_eq!(basic_issues(&point, GeometryKind::Point), None);

        let issue = basic_issues(&json!({"type": "Polygon"}), GeometryKind::Point).unwrap();
        assert!(issue.contains("Point"));
        assert!(issue.contains("Polygon"));

        assert_eq!(
            basic_issues(&json!([1, 2]), GeometryKind::Point).as_deref(),
            Some("Not a valid object")
        );
        assert_eq!(
            basic_issues(&json!({}), GeometryKind::LineString).as_deref(),
            Some("Not a valid type value (Expected LineString not undefined)")
        );
    }

    #[test]
    fn test_structural_positions() {
        let check = StructuralGeoJson;
        assert_eq!(check.issues(&json!({"type": "Point", "coordinates": [1, 2, 3]})), None);
        assert!(check.issues(&json!({"type": "Point", "coordinates": [1]})).is_some());
        assert!(check.issues(&json!({"type": "Point", "coordinates": [1, "2"]})).is_some());
        assert!(check.issues(&json!({"type": "Point"})).is_some());
    }

    #[test]
    fn test_structural_lines_and_rings() {
        let check = StructuralGeoJson;
        assert!(check
            .issues(&json!({"type": "LineString", "coordinates": [[0, 0]]}))
            .is_some());
        assert_eq!(
            check.issues(&json!({"type": "LineString", "coordinates": [[0, 0], [1, 1]]})),
            None
        );
        let short_ring = json!({"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [0, 0]]]});
        assert!(check.issues(&short_ring).unwrap().contains("four positions"));
        let multi = json!({
            "type": "MultiPolygon",
            "coordinates": [[[[0, 0], [1, 0], [1, 1], [0, 0]]]]
        });
        assert_eq!(check.issues(&multi), None);
    }

    #[test]
    fn test_structural_bbox() {
        let check = StructuralGeoJson;
        let ok = json!({"type": "Point", "coordinates": [1, 2], "bbox": [1, 2, 1, 2]});
        assert_eq!(check.issues(&ok), None);
        let bad = json!({"type": "Point", "coordinates": [1, 2], "bbox": [1, 2, 3]});
        assert!(check.issues(&bad).unwrap().contains("bbox"));
    }

    #[test]
    fn test_semantic_ranges() {
        let check = SimpleGeometry;
        assert_eq!(check.issues(&json!({"type": "Point", "coordinates": [180, -90]})), None);
        let issue = check
            .issues(&json!({"type": "Point", "coordinates": [181, 0]}))
            .unwrap();
        assert!(issue.contains("Longitude"));
        let issue = check
            .issues(&json!({"type": "Point", "coordinates": [0, 91]}))
            .unwrap();
        assert!(issue.contains("Latitude"));
    }

    #[test]
    fn test_semantic_rings() {
        let check = SimpleGeometry;
        let square = json!({
            "type": "Polygon",
            "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 1], [0, 0]]]
        });
        assert_eq!(check.issues(&square), None);

        let open = json!({
            "type": "Polygon",
            "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 1]]]
        });
        assert!(check.issues(&open).unwrap().contains("closed"));

        let bowtie = json!({
            "type": "Polygon",
            "coordinates": [[[0, 0], [1, 1], [1, 0], [0, 1], [0, 0]]]
        });
        assert!(check.issues(&bowtie).unwrap().contains("self-intersect"));
    }

    #[test]
    fn test_semantic_ring_with_repeated_position() {
        let check = SimpleGeometry;
        let square = json!({
            "type": "Polygon",
            "coordinates": [[[0, 0], [1, 0], [1, 0], [1, 1], [0, 1], [0, 0]]]
        });
        assert_eq!(check.issues(&square), None);

        let closing_repeat = json!({
            "type": "Polygon",
            "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 1], [0, 0], [0, 0]]]
        });
        assert_eq!(check.issues(&closing_repeat), None);
    }

    #[test]
    fn test_semantic_degenerate_line() {
        let check = SimpleGeometry;
        let line = json!({"type": "LineString", "coordinates": [[1, 1], [1, 1]]});
        assert!(check.issues(&line).unwrap().contains("distinct"));
        let multi = json!({"type": "MultiLineString", "coordinates": [[[0, 0], [1, 1]]]});
        assert_eq!(check.issues(&multi), None);
    }

    #[tokio::test]
    async fn test_checks_resolve_to_verdicts() {
        let value = json!({"type": "Point", "coordinates": [1, 2]});
        assert!(StructuralGeoJson.check(&value).await.is_accepted());
        assert!(SimpleGeometry.check(&value).await.is_accepted());

        let bad = json!({"type": "Point", "coordinates": [500, 2]});
        let verdict = SimpleGeometry.check(&bad).await;
        assert!(verdict.reason().unwrap().contains("Longitude"));
    }
}
