//! Pointer interaction: selection, hover highlighting, drag and pan.
//!
//! The controller owns the view transform and converts every screen
//! coordinate through its inverse before touching the graph. Node
//! positions are only ever written through the layout handle (drag) or
//! the pin toggle; the transform itself stays a render-time concern.

use crate::transform::{view_bounds, ViewTransform};
use ontograph_core::{GraphError, Position};
use ontograph_graph::OntologyGraph;
use ontograph_layout::{TickHandle, Viewport};
use std::collections::HashSet;
use tracing::debug;

/// Screen-space padding used by fit-to-screen.
pub const FIT_PADDING: f64 = 40.0;

/// Tracks an in-progress node drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    pub node: String,
    /// Node position minus pointer position, in graph units.
    pub grab_offset: Position,
}

/// Tracks an in-progress canvas pan.
#[derive(Debug, Clone, PartialEq)]
pub struct PanState {
    pub start: Position,
    pub transform_start: Position,
}

#[derive(Debug, Clone)]
pub struct InteractionController {
    transform: ViewTransform,
    viewport: Viewport,
    node_scale: f64,
    selection: Option<String>,
    hovered: Option<String>,
    /// Hovered node plus its neighbours.
    highlighted: HashSet<String>,
    drag: Option<DragState>,
    pan: Option<PanState>,
}

impl InteractionController {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            transform: ViewTransform::IDENTITY,
            viewport,
            node_scale: 1.0,
            selection: None,
            hovered: None,
            highlighted: HashSet::new(),
            drag: None,
            pan: None,
        }
    }

    pub fn with_node_scale(mut self, node_scale: f64) -> Self {
        self.node_scale = node_scale;
        self
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn set_transform(&mut self, transform: ViewTransform) {
        self.transform = transform;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn node_scale(&self) -> f64 {
        self.node_scale
    }

    pub fn set_node_scale(&mut self, node_scale: f64) {
        self.node_scale = node_scale;
    }

    pub fn screen_to_graph(&self, screen: Position) -> Position {
        self.transform.screen_to_graph(screen)
    }

    // ---- zoom and pan ----

    pub fn zoom_in(&mut self) {
        self.transform.zoom_in(self.viewport.center());
    }

    pub fn zoom_out(&mut self) {
        self.transform.zoom_out(self.viewport.center());
    }

    pub fn zoom_percent(&self) -> u32 {
        self.transform.percent()
    }

    pub fn wheel(&mut self, delta_y: f64, anchor: Position) {
        self.transform.wheel(delta_y, anchor);
    }

    pub fn reset_zoom(&mut self) {
        self.transform.reset();
    }

    /// Fits every node of `view` (with its radius) into the viewport.
    /// Returns false for an empty view.
    pub fn fit_to_screen(&mut self, view: &OntologyGraph) -> bool {
        match view_bounds(view, self.node_scale) {
            Some(bounds) => {
                self.transform = ViewTransform::fit(bounds, self.viewport, FIT_PADDING);
                true
            }
            None => false,
        }
    }

    pub fn begin_pan(&mut self, screen: Position) {
        self.pan = Some(PanState {
            start: screen,
            transform_start: Position::new(self.transform.x, self.transform.y),
        });
    }

    pub fn pan_to(&mut self, screen: Position) -> bool {
        match &self.pan {
            Some(pan) => {
                let delta = screen - pan.start;
                self.transform.x = pan.transform_start.x + delta.x;
                self.transform.y = pan.transform_start.y + delta.y;
                true
            }
            None => false,
        }
    }

    pub fn end_pan(&mut self) -> bool {
        self.pan.take().is_some()
    }

    pub fn is_panning(&self) -> bool {
        self.pan.is_some()
    }

    // ---- hit testing, selection, hover ----

    /// The topmost node under a screen point. Nodes drawn later win.
    pub fn node_at(&self, view: &OntologyGraph, screen: Position) -> Option<String> {
        let point = self.screen_to_graph(screen);
        let mut found = None;
        for node in view.nodes() {
            if node.position.distance(point) <= node.radius(self.node_scale) {
                found = Some(&node.id);
            }
        }
        found.cloned()
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    /// Replaces the selection. Returns true when it changed.
    pub fn select(&mut self, id: Option<String>) -> bool {
        if self.selection == id {
            return false;
        }
        self.selection = id;
        true
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn is_highlighted(&self, id: &str) -> bool {
        self.highlighted.contains(id)
    }

    /// Sets the hovered node and highlights it with its neighbours.
    pub fn set_hover(&mut self, view: &OntologyGraph, id: Option<String>) {
        self.highlighted.clear();
        if let Some(center) = id.as_deref().and_then(|id| view.get_index(id)) {
            for (source, target, _) in view.edges() {
                let other = if source == center {
                    target
                } else if target == center {
                    source
                } else {
                    continue;
                };
                if let Some(node) = view.get(other) {
                    self.highlighted.insert(node.id.clone());
                }
            }
        }
        if let Some(id) = &id {
            self.highlighted.insert(id.clone());
        }
        self.hovered = id;
    }

    /// Hover at a screen point.
    pub fn hover_at(&mut self, view: &OntologyGraph, screen: Position) -> Option<&str> {
        let hit = self.node_at(view, screen);
        if hit != self.hovered {
            self.set_hover(view, hit);
        }
        self.hovered()
    }

    /// Drops selection, hover and gestures that refer to nodes missing
    /// from `view`.
    pub fn retain_known(&mut self, view: &OntologyGraph) {
        if let Some(id) = &self.selection {
            if view.get_index(id).is_none() {
                self.selection = None;
            }
        }
        if let Some(drag) = &self.drag {
            if view.get_index(&drag.node).is_none() {
                self.drag = None;
            }
        }
        let hovered = self.hovered.take().filter(|id| view.get_index(id).is_some());
        self.set_hover(view, hovered);
    }

    // ---- drag ----

    /// Starts dragging the node under `screen`, holding it in place.
    pub fn begin_drag(
        &mut self,
        view: &OntologyGraph,
        handle: &mut TickHandle,
        screen: Position,
    ) -> Option<String> {
        let id = self.node_at(view, screen)?;
        let node_position = view.get_by_id(&id)?.position;
        let pointer = self.screen_to_graph(screen);

        if !handle.fix(&id, node_position) {
            return None;
        }
        debug!("Drag started on {}", id);
        self.drag = Some(DragState {
            node: id.clone(),
            grab_offset: node_position - pointer,
        });
        Some(id)
    }

    /// Moves the dragged node to follow the pointer.
    pub fn drag_to(&mut self, handle: &mut TickHandle, screen: Position) -> bool {
        let Some(drag) = &self.drag else {
            return false;
        };
        let target = self.screen_to_graph(screen) + drag.grab_offset;
        handle.fix(&drag.node, target)
    }

    /// Ends the drag. The node stays put only if pinned.
    pub fn end_drag(&mut self, handle: &mut TickHandle) -> Option<String> {
        let drag = self.drag.take()?;
        handle.release(&drag.node);
        debug!("Drag ended on {}", drag.node);
        Some(drag.node)
    }

    pub fn dragging(&self) -> Option<&str> {
        self.drag.as_ref().map(|d| d.node.as_str())
    }

    // ---- pins ----

    /// Pins or unpins a node at its current layout position.
    pub fn set_pinned(
        &mut self,
        view: &mut OntologyGraph,
        handle: &mut TickHandle,
        id: &str,
        pinned: bool,
    ) -> Result<(), GraphError> {
        let idx = view.require_index(id)?;
        if let Some(position) = handle.index().position(id) {
            view.set_position(idx, position);
        }
        view.set_pinned(idx, pinned);
        handle.set_pinned(id, pinned);
        Ok(())
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}
