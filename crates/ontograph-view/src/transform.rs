//! Pan and zoom.
//!
//! The transform maps graph (world) coordinates to screen coordinates:
//! `screen = graph * k + (x, y)`. It is applied at render time only and
//! never written into node positions.

use ontograph_core::Position;
use ontograph_graph::OntologyGraph;
use ontograph_layout::Viewport;
use serde::{Deserialize, Serialize};

/// Percentage points added or removed by one zoom button press.
pub const ZOOM_STEP_PERCENT: f64 = 10.0;

/// Wheel delta to zoom exponent, as d3-zoom does for pixel deltas.
const WHEEL_FACTOR: f64 = 0.002;

/// Allowed scale factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomRange {
    pub min: f64,
    pub max: f64,
}

impl ZoomRange {
    /// Range of the zoom buttons (50% to 200%).
    pub const CONTROLLER: ZoomRange = ZoomRange { min: 0.5, max: 2.0 };

    /// Range of free canvas zoom (wheel, fit-to-screen).
    pub const CANVAS: ZoomRange = ZoomRange { min: 0.1, max: 4.0 };

    pub fn clamp(self, k: f64) -> f64 {
        k.clamp(self.min, self.max)
    }
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub x: f64,
    pub y: f64,
    /// Zoom factor (1.0 = 100%).
    pub k: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewTransform {
    pub const IDENTITY: ViewTransform = ViewTransform {
        x: 0.0,
        y: 0.0,
        k: 1.0,
    };

    pub fn screen_to_graph(&self, screen: Position) -> Position {
        Position::new((screen.x - self.x) / self.k, (screen.y - self.y) / self.k)
    }

    pub fn graph_to_screen(&self, graph: Position) -> Position {
        Position::new(graph.x * self.k + self.x, graph.y * self.k + self.y)
    }

    /// Zoom level as a whole percentage, as the zoom buttons display it.
    pub fn percent(&self) -> u32 {
        (self.k * 100.0).round().max(0.0) as u32
    }

    /// Rescales to `k` (clamped to `range`) keeping the graph point under
    /// the screen point `anchor` in place.
    pub fn zoom_about(&mut self, k: f64, anchor: Position, range: ZoomRange) {
        let k = range.clamp(k);
        let fixed = self.screen_to_graph(anchor);
        self.k = k;
        self.x = anchor.x - fixed.x * k;
        self.y = anchor.y - fixed.y * k;
    }

    /// One zoom button step in.
    pub fn zoom_in(&mut self, anchor: Position) {
        self.step_zoom(ZOOM_STEP_PERCENT, anchor);
    }

    /// One zoom button step out.
    pub fn zoom_out(&mut self, anchor: Position) {
        self.step_zoom(-ZOOM_STEP_PERCENT, anchor);
    }

    /// Moves the zoom by `percent` points. A scale left outside the button
    /// range by wheel zoom steps back toward it instead of snapping, and a
    /// press never moves it further out.
    fn step_zoom(&mut self, percent: f64, anchor: Position) {
        let range = ZoomRange {
            min: ZoomRange::CONTROLLER.min.min(self.k),
            max: ZoomRange::CONTROLLER.max.max(self.k),
        };
        let target = (self.k * 100.0 + percent).round() / 100.0;
        self.zoom_about(target, anchor, range);
    }

    /// Wheel zoom; negative `delta_y` (scrolling up) zooms in.
    pub fn wheel(&mut self, delta_y: f64, anchor: Position) {
        let k = self.k * 2f64.powf(-delta_y * WHEEL_FACTOR);
        self.zoom_about(k, anchor, ZoomRange::CANVAS);
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    pub fn reset(&mut self) {
        *self = Self::IDENTITY;
    }

    /// Transform that centers `bounds` in `viewport` with `padding` screen
    /// units to spare on every side.
    pub fn fit(bounds: (Position, Position), viewport: Viewport, padding: f64) -> ViewTransform {
        let (min, max) = bounds;
        let width = max.x - min.x;
        let height = max.y - min.y;

        let room_x = (viewport.width - 2.0 * padding).max(1.0);
        let room_y = (viewport.height - 2.0 * padding).max(1.0);
        let k = if width > 0.0 && height > 0.0 {
            (room_x / width).min(room_y / height)
        } else if width > 0.0 {
            room_x / width
        } else if height > 0.0 {
            room_y / height
        } else {
            1.0
        };
        let k = ZoomRange::CANVAS.clamp(k);

        let center = Position::new((min.x + max.x) / 2.0, (min.y + max.y) / 2.0);
        let screen_center = viewport.center();
        ViewTransform {
            x: screen_center.x - center.x * k,
            y: screen_center.y - center.y * k,
            k,
        }
    }
}

/// Bounding box `(min, max)` of every node in `view`, radii included.
pub fn view_bounds(view: &OntologyGraph, node_scale: f64) -> Option<(Position, Position)> {
    let mut nodes = view.nodes();
    let first = nodes.next()?;

    let r = first.radius(node_scale);
    let mut min = first.position - Position::new(r, r);
    let mut max = first.position + Position::new(r, r);
    for node in nodes {
        let r = node.radius(node_scale);
        min.x = min.x.min(node.position.x - r);
        min.y = min.y.min(node.position.y - r);
        max.x = max.x.max(node.position.x + r);
        max.y = max.y.max(node.position.y + r);
    }
    Some((min, max))
}
