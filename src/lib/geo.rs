use geo::prelude::*;
use geo_types::{Coordinate, LineString, Rect};
use serde::{Deserialize, Serialize};

/// Largest per-axis difference in degrees at which two coordinates are
/// still considered the same point.
pub const COORD_MARGIN: f64 = 1.0e-9;

/// Equatorial circumference used by the map widget to size circles.
const EARTH_CIRCUMFERENCE: f64 = 40_075_017.;

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }
}

impl PartialEq<LatLng> for LatLng {
    fn eq(&self, other: &Self) -> bool {
        let margin = (self.lat - other.lat)
            .abs()
            .max((self.lng - other.lng).abs());
        margin <= COORD_MARGIN
    }
}

impl From<LatLng> for [f64; 2] {
    fn from(loc: LatLng) -> Self {
        [loc.lat, loc.lng]
    }
}

impl From<LatLng> for Coordinate<f64> {
    fn from(loc: LatLng) -> Self {
        Coordinate {
            x: loc.lng,
            y: loc.lat,
        }
    }
}

impl From<Coordinate<f64>> for LatLng {
    fn from(coordinate: Coordinate<f64>) -> Self {
        LatLng {
            lat: coordinate.y,
            lng: coordinate.x,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub sw: LatLng,
    pub ne: LatLng,
}

impl Bounds {
    pub fn new(sw: LatLng, ne: LatLng) -> Self {
        Bounds { sw, ne }
    }

    pub fn center(&self) -> LatLng {
        LatLng {
            lat: (self.sw.lat + self.ne.lat) / 2.,
            lng: (self.sw.lng + self.ne.lng) / 2.,
        }
    }
}

impl From<Rect<f64>> for Bounds {
    fn from(rect: Rect<f64>) -> Self {
        Bounds {
            sw: rect.min().into(),
            ne: rect.max().into(),
        }
    }
}

/// Bounding box of a point sequence, `None` when there are no points.
pub fn points_bounds(points: &[LatLng]) -> Option<Bounds> {
    let coordinates: Vec<Coordinate<f64>> = points.iter().map(|&p| p.into()).collect();
    let line_string: LineString<f64> = coordinates.into();
    let rect = line_string.bounding_rect()?;
    Some(rect.into())
}

/// Geographic box around a circle, sized the way the drawing widget does it.
pub fn circle_bounds(center: &LatLng, radius: f64) -> Bounds {
    let lat_radius = radius / EARTH_CIRCUMFERENCE * 360.;
    let lng_radius = lat_radius / center.lat.to_radians().cos();
    Bounds {
        sw: LatLng::new(center.lat - lat_radius, center.lng - lng_radius),
        ne: LatLng::new(center.lat + lat_radius, center.lng + lng_radius),
    }
}
