use super::geo::{Bounds, LatLng};
use super::geometry::Geometry;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ShapeStyle {
    Blue,
    Red,
}

/// What the shape capture needs from an interactive drawing map.
pub trait MapWidget {
    fn add_feature_layer(&mut self);
    fn remove_feature_layer(&mut self);
    fn render_shape(&mut self, geometry: &Geometry, style: ShapeStyle);
    fn clear_shapes(&mut self);
    fn fit_view_to(&mut self, bounds: Bounds);
}

/// Tile source of the base map.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TileLayer {
    pub url: String,
    pub attribution: String,
    pub access_token: Option<String>,
}

impl Default for TileLayer {
    fn default() -> Self {
        TileLayer {
            url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".into(),
            attribution: "&copy; OpenStreetMap contributors".into(),
            access_token: None,
        }
    }
}

const SUBDOMAINS: [&str; 3] = ["a", "b", "c"];

/// Deepest zoom level tile servers are asked for.
pub const MAX_ZOOM: u8 = 19;

/// Web mercator cuts off at this latitude.
const MAX_LATITUDE: f64 = 85.051_128_779_806_6;

impl TileLayer {
    /// Url of tile `x`/`y` at zoom `z`, zoom is capped at `MAX_ZOOM`.
    pub fn tile_url(&self, z: u8, x: u32, y: u32) -> String {
        let z = z.min(MAX_ZOOM);
        let n = SUBDOMAINS.len();
        let subdomain = SUBDOMAINS[(x as usize % n + y as usize % n) % n];
        let url = self
            .url
            .replace("{s}", subdomain)
            .replace("{z}", &z.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string());
        match &self.access_token {
            Some(token) if !url.contains("access_token=") => {
                let separator = if url.contains('?') { '&' } else { '?' };
                format!("{}{}access_token={}", url, separator, token)
            }
            _ => url,
        }
    }

    /// Url of the tile covering `loc` at zoom `z`.
    pub fn tile_at(&self, loc: &LatLng, z: u8) -> String {
        let z = z.min(MAX_ZOOM);
        let n = f64::from(1u32 << z);
        let lat = loc.lat.max(-MAX_LATITUDE).min(MAX_LATITUDE).to_radians();
        let x = (loc.lng + 180.) / 360. * n;
        let y = (1. - (lat.tan() + 1. / lat.cos()).ln() / std::f64::consts::PI) / 2. * n;
        let clamp = |v: f64| v.floor().max(0.).min(n - 1.) as u32;
        self.tile_url(z, clamp(x), clamp(y))
    }
}

/// Deepest zoom at which `bounds` still fits into a single tile.
pub fn fit_zoom(bounds: &Bounds) -> u8 {
    let span = (bounds.ne.lng - bounds.sw.lng).max(bounds.ne.lat - bounds.sw.lat);
    if span.is_nan() || span <= 0. {
        return MAX_ZOOM;
    }
    (360. / span).log2().floor().max(0.).min(f64::from(MAX_ZOOM)) as u8
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct View {
    pub center: LatLng,
    pub zoom: u8,
}

impl Default for View {
    fn default() -> Self {
        View {
            center: LatLng::new(17.4266, 78.452),
            zoom: 18,
        }
    }
}

/// Viewport of a `HeadlessMap`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Viewport {
    Initial(View),
    Fitted(Bounds),
}

/// A map widget without a screen, keeping track of what would be drawn.
#[derive(Debug)]
pub struct HeadlessMap {
    pub tiles: TileLayer,
    layers: Vec<(Geometry, ShapeStyle)>,
    viewport: Viewport,
    mounted: bool,
}

impl HeadlessMap {
    pub fn new(view: View, tiles: TileLayer) -> Self {
        HeadlessMap {
            tiles,
            layers: vec![],
            viewport: Viewport::Initial(view),
            mounted: false,
        }
    }

    pub fn layers(&self) -> &[(Geometry, ShapeStyle)] {
        &self.layers
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Url of the base map tile under the center of the viewport.
    pub fn center_tile(&self) -> String {
        match self.viewport {
            Viewport::Initial(view) => self.tiles.tile_at(&view.center, view.zoom),
            Viewport::Fitted(bounds) => self.tiles.tile_at(&bounds.center(), fit_zoom(&bounds)),
        }
    }
}

impl Default for HeadlessMap {
    fn default() -> Self {
        HeadlessMap::new(View::default(), TileLayer::default())
    }
}

impl MapWidget for HeadlessMap {
    fn add_feature_layer(&mut self) {
        self.mounted = true;
    }

    fn remove_feature_layer(&mut self) {
        self.mounted = false;
        self.layers.clear();
    }

    fn render_shape(&mut self, geometry: &Geometry, style: ShapeStyle) {
        self.layers.push((geometry.clone(), style));
    }

    fn clear_shapes(&mut self) {
        self.layers.clear();
    }

    fn fit_view_to(&mut self, bounds: Bounds) {
        self.viewport = Viewport::Fitted(bounds);
    }
}
