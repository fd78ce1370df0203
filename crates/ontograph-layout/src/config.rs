//! Layout tunables.
//!
//! Every field has a serde default so a partial `layout` section in the
//! config file is valid.

use ontograph_core::Position;
use serde::{Deserialize, Serialize};

/// Canvas size in world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Position {
        Position::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(960.0, 640.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub viewport: Viewport,

    /// Many-body strength; negative repels.
    pub charge: f64,
    pub link_distance: f64,
    /// Minimum collision radius; larger nodes use their own radius.
    pub collide_radius: f64,

    pub alpha: f64,
    pub alpha_min: f64,
    pub alpha_decay: f64,
    pub alpha_target: f64,
    pub velocity_decay: f64,
    pub max_iterations: usize,
    /// Alpha target while a node is dragged.
    pub reheat_alpha: f64,

    /// Radial ring radius; `min(width, height) / 3` when unset.
    pub radial_radius: Option<f64>,
    pub band_height: f64,
    pub band_strength: f64,
    pub grid_spacing: f64,
    pub grid_strength: f64,
    pub grid_charge: f64,

    /// Node radius multiplier (the node size option).
    pub node_scale: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let alpha_min: f64 = 0.001;
        Self {
            viewport: Viewport::default(),
            charge: -300.0,
            link_distance: 120.0,
            collide_radius: 40.0,
            alpha: 1.0,
            alpha_min,
            // reaches alpha_min after 300 ticks
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
            alpha_target: 0.0,
            velocity_decay: 0.4,
            max_iterations: 300,
            reheat_alpha: 0.3,
            radial_radius: None,
            band_height: 100.0,
            band_strength: 0.5,
            grid_spacing: 120.0,
            grid_strength: 0.3,
            grid_charge: -30.0,
            node_scale: 1.0,
        }
    }
}

impl LayoutConfig {
    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.viewport = Viewport::new(width, height);
        self
    }

    pub fn radial_radius(&self) -> f64 {
        self.radial_radius
            .unwrap_or_else(|| self.viewport.min_side() / 3.0)
    }
}
