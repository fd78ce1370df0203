//! Ontograph View - interaction, export and the session surface
//!
//! Everything between a laid-out view and the outside world:
//!
//! - `InteractionController`: pan/zoom transform, hit testing, hover
//!   highlighting, drag and pins
//! - `export`: PNG, SVG and JSON renderings, plus JSON import
//! - `GraphSession`: one object owning store, view, layout run and
//!   interaction state, emitting `SessionEvent`s
//!
//! # Example
//!
//! ```
//! use ontograph_graph::GraphStore;
//! use ontograph_view::{ExportFormat, GraphSession, SessionEvent};
//!
//! let mut session = GraphSession::new(GraphStore::synthetic().unwrap());
//! session.settle();
//!
//! session.select("SHP-001").unwrap();
//! assert!(matches!(
//!     session.drain_events().as_slice(),
//!     [SessionEvent::NodeSelected { .. }]
//! ));
//!
//! let json = session.export(ExportFormat::Json).unwrap();
//! assert!(!json.is_empty());
//! ```

pub mod export;
mod interaction;
mod session;
mod transform;

pub use export::{
    export_json, import_json, render_png, render_svg, ExportError, ExportFormat, GraphDocument,
    RenderOptions,
};
pub use interaction::{DragState, InteractionController, PanState, FIT_PADDING};
pub use session::{GraphSession, SessionConfig, SessionEvent};
pub use transform::{view_bounds, ViewTransform, ZoomRange, ZOOM_STEP_PERCENT};
