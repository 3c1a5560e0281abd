use super::geometry::{Geometry, RawShape};
use super::widget::{MapWidget, ShapeStyle};
use log::debug;
use std::time::{Duration, Instant};

/// Clear request towards the map that lapses on its own after a delay.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClearSignal {
    until: Option<Instant>,
}

impl ClearSignal {
    pub fn raise(&mut self, delay: Duration) {
        self.until = Some(Instant::now() + delay);
    }

    pub fn is_active(&self) -> bool {
        self.is_active_at(Instant::now())
    }

    pub fn is_active_at(&self, now: Instant) -> bool {
        match self.until {
            Some(until) => now < until,
            None => false,
        }
    }
}

/// Turns shapes reported by a drawing widget into canonical geometries.
///
/// The feature layer is mounted on creation and removed again on drop.
pub struct ShapeCapture<W: MapWidget> {
    widget: W,
    clear: ClearSignal,
}

impl<W: MapWidget> ShapeCapture<W> {
    pub fn new(mut widget: W) -> Self {
        widget.add_feature_layer();
        ShapeCapture {
            widget,
            clear: ClearSignal::default(),
        }
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn is_clearing(&self) -> bool {
        self.clear.is_active()
    }

    /// Handles one completed draw gesture. The normalized shape is passed to
    /// `handle_set_cord` and returned.
    pub fn on_shape_created<F>(&mut self, raw: &RawShape, handle_set_cord: F) -> Option<Geometry>
    where
        F: FnOnce(Vec<Geometry>),
    {
        let geometry = match raw.to_geometry() {
            Some(geometry) => geometry,
            None => {
                debug!("ignoring {} layer", raw.layer_type());
                return None;
            }
        };
        self.widget.render_shape(&geometry, ShapeStyle::Blue);
        if let Geometry::Polygon { .. } = geometry {
            if let Some(bounds) = geometry.bounds() {
                self.widget.fit_view_to(bounds);
            }
        }
        debug!("captured {}", geometry.kind());
        handle_set_cord(vec![geometry.clone()]);
        Some(geometry)
    }

    /// Removes every drawn shape. Loading stays suppressed until `delay` has
    /// passed.
    pub fn signal_clear(&mut self, delay: Duration) {
        self.widget.clear_shapes();
        self.clear.raise(delay);
    }

    /// Renders existing shapes, fitting the view to each one in turn.
    pub fn load(&mut self, geometries: &[Geometry]) -> usize {
        if self.clear.is_active() {
            debug!("clear pending, not loading {} shapes", geometries.len());
            return 0;
        }
        for geometry in geometries {
            let style = match geometry {
                Geometry::Circle { .. } => ShapeStyle::Blue,
                Geometry::Polygon { .. } => ShapeStyle::Red,
            };
            self.widget.render_shape(geometry, style);
            if let Some(bounds) = geometry.bounds() {
                self.widget.fit_view_to(bounds);
            }
        }
        geometries.len()
    }
}

impl<W: MapWidget> Drop for ShapeCapture<W> {
    fn drop(&mut self) {
        self.widget.remove_feature_layer();
    }
}
