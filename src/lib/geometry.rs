use super::geo::{circle_bounds, points_bounds, Bounds, LatLng};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Geometry {
    Polygon { points: Vec<LatLng> },
    Circle { center: LatLng, radius: f64 },
}

impl Geometry {
    /// Builds a polygon from a raw vertex list, closing the ring if needed.
    pub fn polygon(points: Vec<LatLng>) -> Self {
        let mut points = points;
        close_ring(&mut points);
        debug_assert!(is_ring_closed(&points));
        Geometry::Polygon { points }
    }

    pub fn circle(center: LatLng, radius: f64) -> Self {
        Geometry::Circle {
            center,
            radius: radius.max(0.),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Polygon { .. } => "polygon",
            Geometry::Circle { .. } => "circle",
        }
    }

    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            Geometry::Polygon { points } => points_bounds(points),
            Geometry::Circle { center, radius } => Some(circle_bounds(center, *radius)),
        }
    }

    /// Returns the same shape with its ring closed, circles are left as they are.
    pub fn normalized(self) -> Self {
        match self {
            Geometry::Polygon { points } => Geometry::polygon(points),
            circle => circle,
        }
    }
}

/// Appends the first point if the ring is open.
///
/// # Example
///
/// ```
/// use map_annotate::geo::LatLng;
/// use map_annotate::geometry::close_ring;
///
/// let mut points = vec![LatLng::new(1., 1.), LatLng::new(1., 2.), LatLng::new(2., 2.)];
/// close_ring(&mut points);
/// assert_eq!(points.len(), 4);
/// assert_eq!(points[0], points[3]);
/// ```
pub fn close_ring(points: &mut Vec<LatLng>) {
    let first = match points.first() {
        Some(first) => *first,
        None => return,
    };
    if points.last() != Some(&first) {
        points.push(first);
    }
}

pub fn is_ring_closed(points: &[LatLng]) -> bool {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) => first == last,
        _ => true,
    }
}

/// The record sent to the backend.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Submission {
    pub name: String,
    pub coordinates: Vec<Geometry>,
}

/// A shape as reported by the drawing widget once a draw gesture completes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "layerType", rename_all = "lowercase")]
pub enum RawShape {
    Polygon {
        latlngs: Vec<Vec<LatLng>>,
    },
    Circle {
        latlng: LatLng,
        radius: f64,
    },
    Polyline {
        #[serde(default)]
        latlngs: Vec<LatLng>,
    },
    Rectangle {
        #[serde(default)]
        latlngs: Vec<Vec<LatLng>>,
    },
    Marker {
        latlng: LatLng,
    },
    Circlemarker {
        latlng: LatLng,
    },
}

impl RawShape {
    pub fn layer_type(&self) -> &'static str {
        match self {
            RawShape::Polygon { .. } => "polygon",
            RawShape::Circle { .. } => "circle",
            RawShape::Polyline { .. } => "polyline",
            RawShape::Rectangle { .. } => "rectangle",
            RawShape::Marker { .. } => "marker",
            RawShape::Circlemarker { .. } => "circlemarker",
        }
    }

    /// Converts the widget shape into its canonical form, `None` for layer
    /// types that are not captured.
    pub fn to_geometry(&self) -> Option<Geometry> {
        match self {
            RawShape::Polygon { latlngs } => {
                let outline = latlngs.first().cloned().unwrap_or_default();
                Some(Geometry::polygon(outline))
            }
            RawShape::Circle { latlng, radius } => Some(Geometry::circle(*latlng, *radius)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    fn square() -> Vec<LatLng> {
        vec![
            LatLng::new(0., 0.),
            LatLng::new(0., 1.),
            LatLng::new(1., 1.),
            LatLng::new(1., 0.),
        ]
    }

    #[test]
    fn close_open_ring() {
        let mut points = square();
        close_ring(&mut points);
        assert_eq!(points.len(), 5);
        assert_eq!(points[0], points[4]);
        assert!(is_ring_closed(&points));
    }

    #[test]
    fn closing_is_idempotent() {
        let mut points = square();
        close_ring(&mut points);
        let closed = points.clone();
        close_ring(&mut points);
        assert_eq!(points, closed);
    }

    #[test]
    fn close_empty_ring() {
        let mut points = vec![];
        close_ring(&mut points);
        assert!(points.is_empty());
    }

    #[test]
    fn close_single_point() {
        let mut points = vec![LatLng::new(3., 4.)];
        close_ring(&mut points);
        assert_eq!(points.len(), 1);
    }

    #[test]
    fn negative_radius_is_clamped() {
        let circle = Geometry::circle(LatLng::new(1., 1.), -5.);
        assert_eq!(circle, Geometry::circle(LatLng::new(1., 1.), 0.));
    }

    #[test]
    fn serialize_circle_submission() {
        let submission = Submission {
            name: "Zone A".into(),
            coordinates: vec![Geometry::circle(LatLng::new(17.4, 78.45), 500.)],
        };
        let expected = json!({
            "name": "Zone A",
            "coordinates": [{
                "type": "circle",
                "center": { "lat": 17.4, "lng": 78.45 },
                "radius": 500.0
            }]
        });
        assert_eq!(to_value(&submission).unwrap(), expected);
    }

    #[test]
    fn serialize_polygon() {
        let polygon = Geometry::polygon(vec![
            LatLng::new(1., 2.),
            LatLng::new(3., 4.),
            LatLng::new(5., 2.),
        ]);
        let expected = json!({
            "type": "polygon",
            "points": [
                { "lat": 1.0, "lng": 2.0 },
                { "lat": 3.0, "lng": 4.0 },
                { "lat": 5.0, "lng": 2.0 },
                { "lat": 1.0, "lng": 2.0 }
            ]
        });
        assert_eq!(to_value(&polygon).unwrap(), expected);
    }

    #[test]
    fn raw_polygon_uses_outer_ring() {
        let raw: RawShape = serde_json::from_value(json!({
            "layerType": "polygon",
            "latlngs": [
                [{ "lat": 0.0, "lng": 0.0 }, { "lat": 0.0, "lng": 1.0 }, { "lat": 1.0, "lng": 1.0 }],
                [{ "lat": 0.2, "lng": 0.2 }, { "lat": 0.2, "lng": 0.4 }, { "lat": 0.4, "lng": 0.4 }]
            ]
        }))
        .unwrap();
        let geometry = raw.to_geometry().unwrap();
        match geometry {
            Geometry::Polygon { points } => {
                assert_eq!(points.len(), 4);
                assert_eq!(points[3], LatLng::new(0., 0.));
            }
            _ => panic!("expected a polygon"),
        }
    }

    #[test]
    fn raw_polyline_is_not_captured() {
        let raw: RawShape = serde_json::from_value(json!({
            "layerType": "polyline",
            "latlngs": [{ "lat": 0.0, "lng": 0.0 }, { "lat": 1.0, "lng": 1.0 }]
        }))
        .unwrap();
        assert_eq!(raw.layer_type(), "polyline");
        assert!(raw.to_geometry().is_none());
    }

    #[test]
    fn polygon_bounds() {
        let geometry = Geometry::polygon(square());
        let bounds = geometry.bounds().unwrap();
        assert_eq!(bounds, Bounds::new(LatLng::new(0., 0.), LatLng::new(1., 1.)));
    }

    #[test]
    fn normalize_deserialized_polygon() {
        let geometry: Geometry = serde_json::from_value(json!({
            "type": "polygon",
            "points": [{ "lat": 0.0, "lng": 0.0 }, { "lat": 0.0, "lng": 1.0 }, { "lat": 1.0, "lng": 1.0 }]
        }))
        .unwrap();
        match geometry.normalized() {
            Geometry::Polygon { points } => assert!(is_ring_closed(&points)),
            _ => panic!("expected a polygon"),
        }
    }
}
