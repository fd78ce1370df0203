//! Exporting a view as PNG, SVG or JSON.

mod document;
mod raster;
mod svg;

pub use document::{export_json, import_json, DocumentNode, GraphDocument, DOCUMENT_VERSION};
pub use raster::{rasterize, render_png};
pub use svg::render_svg;

use crate::transform::{view_bounds, ViewTransform};
use ontograph_core::ConstructionError;
use ontograph_graph::{FilterOptions, OntologyGraph};
use ontograph_layout::Viewport;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("PNG encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid document: {0}")]
    InvalidDocument(#[from] ConstructionError),

    #[error("unsupported document version: {0}")]
    UnsupportedVersion(String),

    #[error("unknown export format: {0} (expected png, svg or json)")]
    UnknownFormat(String),

    #[error("canvas must be at least 1x1, got {width}x{height}")]
    EmptyCanvas { width: u32, height: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Png,
    Svg,
    Json,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Svg => "svg",
            ExportFormat::Json => "json",
        }
    }

    /// File extension, which is also the format name.
    pub fn extension(self) -> &'static str {
        self.as_str()
    }

    /// Guesses the format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()?.to_str()?.parse().ok()
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(ExportFormat::Png),
            "svg" => Ok(ExportFormat::Svg),
            "json" => Ok(ExportFormat::Json),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

/// How SVG and PNG renderings look.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    /// Screen-space margin around the drawing.
    pub padding: f64,
    pub show_labels: bool,
    /// Node radius multiplier.
    pub node_scale: f64,
    pub background: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            padding: 40.0,
            show_labels: true,
            node_scale: 1.0,
            background: "#ffffff".to_string(),
        }
    }
}

impl RenderOptions {
    /// Takes label visibility and node size from the display options.
    pub fn from_filter(options: &FilterOptions) -> Self {
        Self {
            show_labels: options.show_labels,
            node_scale: options.node_size.scale(),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    fn check_canvas(&self) -> Result<(), ExportError> {
        if self.width == 0 || self.height == 0 {
            return Err(ExportError::EmptyCanvas {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Transform that fits the whole view onto the canvas.
    fn frame(&self, view: &OntologyGraph) -> ViewTransform {
        let canvas = Viewport::new(f64::from(self.width), f64::from(self.height));
        match view_bounds(view, self.node_scale) {
            Some(bounds) => ViewTransform::fit(bounds, canvas, self.padding),
            None => ViewTransform::IDENTITY,
        }
    }
}

/// Renders `view` in `format`.
pub fn export(
    view: &OntologyGraph,
    format: ExportFormat,
    options: &RenderOptions,
) -> Result<Vec<u8>, ExportError> {
    match format {
        ExportFormat::Json => export_json(view).map(String::into_bytes),
        ExportFormat::Svg => render_svg(view, options).map(String::into_bytes),
        ExportFormat::Png => render_png(view, options),
    }
}

/// Renders `view` and writes it to `path`.
pub fn write_export(
    path: &Path,
    view: &OntologyGraph,
    format: ExportFormat,
    options: &RenderOptions,
) -> Result<(), ExportError> {
    let bytes = export(view, format, options)?;
    std::fs::write(path, bytes)?;
    info!("Exported {} to {}", format, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ontograph_graph::NodeSize;

    #[test]
    fn test_format_parsing() {
        assert_eq!("PNG".parse::<ExportFormat>().unwrap(), ExportFormat::Png);
        assert_eq!(
            ExportFormat::from_path(Path::new("out/graph.svg")),
            Some(ExportFormat::Svg)
        );
        assert_eq!(ExportFormat::from_path(Path::new("graph")), None);
        assert!(matches!(
            "pdf".parse::<ExportFormat>(),
            Err(ExportError::UnknownFormat(f)) if f == "pdf"
        ));
    }

    #[test]
    fn test_render_options_follow_display_filter() {
        let filter = FilterOptions {
            show_labels: false,
            node_size: NodeSize::Large,
            ..FilterOptions::default()
        };
        let options = RenderOptions::from_filter(&filter);
        assert!(!options.show_labels);
        assert_eq!(options.node_scale, 1.5);
    }

    #[test]
    fn test_zero_canvas_is_an_error() {
        let view = OntologyGraph::new();
        let options = RenderOptions::default().with_size(0, 10);
        assert!(matches!(
            export(&view, ExportFormat::Png, &options),
            Err(ExportError::EmptyCanvas { width: 0, height: 10 })
        ));
        assert!(export(&view, ExportFormat::Svg, &options).is_err());
        // JSON has no canvas
        assert!(export(&view, ExportFormat::Json, &options).is_ok());
    }
}
