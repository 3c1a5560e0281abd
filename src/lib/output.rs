use super::geojson::{self, Entity};
use super::geometry::Geometry;
use super::widget::{HeadlessMap, Viewport};
use serde::Serialize;
use serde_json::{to_string, Map, Value};
use std::error::Error;
use std::io::Write;

pub trait Output {
    fn write_geojson(&self, writer: &mut dyn Write) -> Result<(), Box<dyn Error>>;
    fn write_json_lines(&self, writer: &mut dyn Write) -> Result<(), Box<dyn Error>>;
}

fn to_feature(geometry: &Geometry) -> Entity {
    let mut properties = Map::new();
    properties.insert("shape".into(), geometry.kind().into());
    let geometry = match geometry {
        Geometry::Polygon { points } => {
            let ring = points.iter().map(|p| (p.lng, p.lat)).collect();
            geojson::Geometry::Polygon {
                coordinates: vec![ring],
            }
        }
        Geometry::Circle { center, radius } => {
            properties.insert("radius".into(), Value::from(*radius));
            geojson::Geometry::Point {
                coordinates: (center.lng, center.lat),
            }
        }
    };
    Entity::Feature {
        properties,
        geometry,
    }
}

impl Output for Vec<Geometry> {
    fn write_json_lines(&self, writer: &mut dyn Write) -> Result<(), Box<dyn Error>> {
        for geometry in self.iter() {
            let json = to_string(geometry)?;
            writeln!(writer, "{}", json)?;
        }
        Ok(())
    }

    fn write_geojson(&self, writer: &mut dyn Write) -> Result<(), Box<dyn Error>> {
        let features = self.iter().map(to_feature).collect();
        let feature_collection = Entity::FeatureCollection { features };
        let string = to_string(&feature_collection)?;
        writeln!(writer, "{}", string)?;
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum JSONView {
    Fitted {
        layers: usize,
        sw: [f64; 2],
        ne: [f64; 2],
        tile: String,
    },
    Initial {
        layers: usize,
        center: [f64; 2],
        zoom: u8,
        tile: String,
    },
}

/// Writes the viewport a map ends up with after loading shapes, with the
/// base map tile under its center.
pub fn write_view(writer: &mut dyn Write, map: &HeadlessMap) -> Result<(), Box<dyn Error>> {
    let layers = map.layers().len();
    let tile = map.center_tile();
    let view = match map.viewport() {
        Viewport::Fitted(bounds) => JSONView::Fitted {
            layers,
            sw: bounds.sw.into(),
            ne: bounds.ne.into(),
            tile,
        },
        Viewport::Initial(view) => JSONView::Initial {
            layers,
            center: view.center.into(),
            zoom: view.zoom,
            tile,
        },
    };
    writeln!(writer, "{}", to_string(&view)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{Bounds, LatLng};
    use crate::widget::{MapWidget, ShapeStyle};
    use serde_json::{from_str, json};

    fn shapes() -> Vec<Geometry> {
        vec![
            Geometry::polygon(vec![
                LatLng::new(0., 0.),
                LatLng::new(0., 1.),
                LatLng::new(1., 1.),
            ]),
            Geometry::circle(LatLng::new(17.4, 78.45), 500.),
        ]
    }

    #[test]
    fn json_lines() {
        let mut out = vec![];
        shapes().write_json_lines(&mut out).unwrap();
        let string = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = string.trim().split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(r#"{"type":"polygon""#));
        assert!(lines[1].starts_with(r#"{"type":"circle""#));
    }

    #[test]
    fn circle_becomes_point_with_radius() {
        let mut out = vec![];
        shapes().write_geojson(&mut out).unwrap();
        let value: Value = from_str(&String::from_utf8(out).unwrap()).unwrap();
        let circle = &value["features"][1];
        assert_eq!(circle["geometry"]["type"], "Point");
        assert_eq!(circle["geometry"]["coordinates"], json!([78.45, 17.4]));
        assert_eq!(circle["properties"]["radius"], json!(500.0));
        let polygon = &value["features"][0];
        assert_eq!(polygon["geometry"]["coordinates"][0][3], json!([0.0, 0.0]));
    }

    #[test]
    fn fitted_view() {
        let mut map = HeadlessMap::default();
        map.render_shape(&shapes()[0], ShapeStyle::Red);
        map.fit_view_to(Bounds::new(LatLng::new(1., 2.), LatLng::new(3., 4.)));
        let mut out = vec![];
        write_view(&mut out, &map).unwrap();
        let value: Value = from_str(&String::from_utf8(out).unwrap()).unwrap();
        assert_eq!(value["layers"], json!(1));
        assert_eq!(value["sw"], json!([1.0, 2.0]));
        assert_eq!(value["ne"], json!([3.0, 4.0]));
        assert_eq!(value["tile"], json!(map.center_tile()));
    }

    #[test]
    fn initial_view() {
        let map = HeadlessMap::default();
        let mut out = vec![];
        write_view(&mut out, &map).unwrap();
        let value: Value = from_str(&String::from_utf8(out).unwrap()).unwrap();
        assert_eq!(value["layers"], json!(0));
        assert_eq!(value["center"], json!([17.4266, 78.452]));
        assert_eq!(value["zoom"], json!(18));
        assert!(value["tile"]
            .as_str()
            .unwrap()
            .starts_with("https://"));
    }
}
