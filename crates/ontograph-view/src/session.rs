//! A running exploration session.
//!
//! `GraphSession` wires the pieces together: the immutable store, the
//! filtered view derived from it, the current layout run and the
//! interaction state. Collaborators (panels, a renderer, the CLI) drive
//! it through plain method calls and drain the queued `SessionEvent`s
//! once per frame.
//!
//! Filtering throws the view away and starts over. Switching layout
//! modes keeps the view, seeds the new run with the current positions,
//! and carries pins across. Radial mode lays out the ego network of its
//! center instead of the whole view.

use crate::export::{self, import_json, ExportError, ExportFormat, RenderOptions};
use crate::interaction::InteractionController;
use ontograph_core::{EntityType, GraphError, Node, NodeSummary, Position, Properties};
use ontograph_graph::{
    FilterOptions, GraphMetrics, GraphStore, ImpactConfig, OntologyGraph, PathOutcome, PathQuery,
    RemovalImpact, TypeCluster, DEFAULT_SEARCH_LIMIT,
};
use ontograph_layout::{LayoutConfig, LayoutEngine, LayoutType, PreviousPositions, TickHandle};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// Everything a session can be configured with. Mirrors the sections of
/// the config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub filter: FilterOptions,
    pub layout: LayoutConfig,
    pub impact: ImpactConfig,
}

/// Notifications for collaborators, in the order they happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SessionEvent {
    NodeSelected {
        id: String,
        entity_type: EntityType,
        label: String,
        properties: Properties,
        degree: usize,
    },
    SelectionCleared,
    PathFound {
        nodes: Vec<NodeSummary>,
    },
    LayoutChanged {
        mode: LayoutType,
    },
    FilterChanged {
        node_count: usize,
        edge_count: usize,
    },
}

#[derive(Debug)]
pub struct GraphSession {
    store: GraphStore,
    config: SessionConfig,
    /// The filtered view.
    view: OntologyGraph,
    /// Ego network shown instead of `view` in radial mode.
    ego: Option<OntologyGraph>,
    engine: LayoutEngine,
    handle: TickHandle,
    mode: LayoutType,
    radial_center: Option<String>,
    controller: InteractionController,
    events: Vec<SessionEvent>,
}

impl GraphSession {
    pub fn new(store: GraphStore) -> Self {
        Self::with_config(store, SessionConfig::default())
    }

    /// Filters the store and starts a force layout.
    pub fn with_config(store: GraphStore, config: SessionConfig) -> Self {
        Self::start(store, config, false)
    }

    /// Starts a session from a JSON export, keeping its positions and
    /// pins as the starting layout.
    pub fn from_document(json: &str, config: SessionConfig) -> Result<Self, ExportError> {
        let graph = import_json(json)?;
        Ok(Self::start(GraphStore::from_graph(graph), config, true))
    }

    fn start(store: GraphStore, config: SessionConfig, keep_positions: bool) -> Self {
        let node_scale = config.filter.node_size.scale();
        let layout = LayoutConfig {
            node_scale,
            ..config.layout.clone()
        };
        let engine = LayoutEngine::new(layout);
        let controller =
            InteractionController::new(engine.config().viewport).with_node_scale(node_scale);

        let view = store.filtered(&config.filter);
        let mode = LayoutType::default();
        let seed = keep_positions.then(|| positions_of(&view));
        let handle = engine.layout(&view, mode, seed.as_ref());

        info!(
            "Session started: {} of {} nodes in view",
            view.node_count(),
            store.graph().node_count()
        );

        Self {
            store,
            config,
            view,
            ego: None,
            engine,
            handle,
            mode,
            radial_center: None,
            controller,
            events: Vec::new(),
        }
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn options(&self) -> &FilterOptions {
        &self.config.filter
    }

    /// The graph currently on screen: the ego network in radial mode,
    /// otherwise the filtered view.
    pub fn view(&self) -> &OntologyGraph {
        self.ego.as_ref().unwrap_or(&self.view)
    }

    /// The filtered view analytics run against.
    pub fn filtered_view(&self) -> &OntologyGraph {
        &self.view
    }

    pub fn mode(&self) -> LayoutType {
        self.mode
    }

    pub fn radial_center(&self) -> Option<&str> {
        self.radial_center.as_deref()
    }

    pub fn handle(&self) -> &TickHandle {
        &self.handle
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut InteractionController {
        &mut self.controller
    }

    /// Takes every event queued since the last call.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    // ---- frames ----

    /// Advances the layout by one frame. Returns whether it is still
    /// converging.
    pub fn tick(&mut self) -> bool {
        let view = match &mut self.ego {
            Some(ego) => ego,
            None => &mut self.view,
        };
        self.handle.step(view)
    }

    /// Ticks until the layout settles. Returns the number of frames.
    pub fn settle(&mut self) -> usize {
        let view = match &mut self.ego {
            Some(ego) => ego,
            None => &mut self.view,
        };
        self.handle.run_to_end(view)
    }

    // ---- filter and layout ----

    /// Rebuilds the view from the store. Positions, pins and the
    /// running layout are discarded.
    pub fn set_filter(&mut self, options: FilterOptions) {
        self.engine.invalidate();

        let node_scale = options.node_size.scale();
        let mut layout = self.engine.config().clone();
        layout.node_scale = node_scale;
        self.engine.set_config(layout);
        self.controller.set_node_scale(node_scale);

        self.view = self.store.filtered(&options);
        self.ego = None;
        self.config.filter = options;

        if let Some(center) = &self.radial_center {
            if self.view.get_index(center).is_none() {
                debug!("Radial center {} filtered out", center);
                self.radial_center = None;
            }
        }

        self.restart(None);

        let had_selection = self.controller.selection().is_some();
        self.controller.retain_known(&self.view);
        if had_selection && self.controller.selection().is_none() {
            self.events.push(SessionEvent::SelectionCleared);
        }

        self.events.push(SessionEvent::FilterChanged {
            node_count: self.view.node_count(),
            edge_count: self.view.edge_count(),
        });
    }

    /// Switches layout mode, seeding the new run with current positions.
    pub fn set_layout(&mut self, mode: LayoutType) {
        let previous = self.current_positions();
        self.leave_ego();
        self.mode = mode;
        self.restart(Some(&previous));

        self.controller.retain_known(&self.view);
        self.events.push(SessionEvent::LayoutChanged { mode });
    }

    /// Centers the radial layout on `id` and switches to it.
    pub fn set_radial_center(&mut self, id: &str) -> Result<(), GraphError> {
        self.view.require_index(id)?;
        self.radial_center = Some(id.to_string());
        self.set_layout(LayoutType::Radial);
        Ok(())
    }

    /// Positions of every view node, overridden by the live layout.
    fn current_positions(&self) -> PreviousPositions {
        let mut positions = positions_of(&self.view);
        if let Some(ego) = &self.ego {
            positions.extend(positions_of(ego));
        }
        positions.extend(self.handle.positions());
        positions
    }

    /// Copies ego-network layout state back into the view.
    fn leave_ego(&mut self) {
        let Some(ego) = self.ego.take() else {
            return;
        };
        for node in ego.nodes() {
            if let Some(idx) = self.view.get_index(&node.id) {
                self.view.set_position(idx, node.position);
                self.view.set_pinned(idx, node.pinned);
            }
        }
    }

    fn restart(&mut self, previous: Option<&PreviousPositions>) {
        if self.mode != LayoutType::Radial {
            self.handle = self.engine.layout(&self.view, self.mode, previous);
            return;
        }

        let center = self
            .radial_center
            .clone()
            .or_else(|| self.view.max_degree_node().map(|d| d.node.id));
        let Some(center) = center else {
            self.handle = self.engine.layout(&self.view, self.mode, previous);
            return;
        };

        match self.view.ego_network(&center) {
            Ok(ego) => {
                self.handle = match self.engine.layout_radial(&ego, &center, previous) {
                    Ok(handle) => handle,
                    Err(e) => {
                        warn!("Radial layout failed: {}", e);
                        self.engine.layout(&ego, self.mode, previous)
                    }
                };
                self.ego = Some(ego);
            }
            Err(e) => {
                warn!("Ego network unavailable: {}", e);
                self.handle = self.engine.layout(&self.view, self.mode, previous);
            }
        }
    }

    // ---- pointer ----

    /// Starts a drag on the node under the pointer, or a pan otherwise.
    pub fn pointer_down(&mut self, screen: Position) -> Option<String> {
        let view = self.ego.as_ref().unwrap_or(&self.view);
        let dragged = self.controller.begin_drag(view, &mut self.handle, screen);
        if dragged.is_none() {
            self.controller.begin_pan(screen);
        }
        dragged
    }

    /// Continues a drag or pan; otherwise updates the hover highlight.
    pub fn pointer_move(&mut self, screen: Position) {
        if self.controller.dragging().is_some() {
            self.controller.drag_to(&mut self.handle, screen);
        } else if self.controller.is_panning() {
            self.controller.pan_to(screen);
        } else {
            let view = self.ego.as_ref().unwrap_or(&self.view);
            self.controller.hover_at(view, screen);
        }
    }

    pub fn pointer_up(&mut self) {
        if self.controller.end_drag(&mut self.handle).is_none() {
            self.controller.end_pan();
        }
    }

    /// Selects the node under the pointer, or clears the selection when
    /// the click lands on empty canvas.
    pub fn click(&mut self, screen: Position) -> Option<String> {
        match self.controller.node_at(self.view(), screen) {
            Some(id) => {
                // hits come from the view, so the lookup cannot fail
                self.select(&id).ok()?;
                Some(id)
            }
            None => {
                self.clear_selection();
                None
            }
        }
    }

    /// Selects a node of the filtered view.
    pub fn select(&mut self, id: &str) -> Result<(), GraphError> {
        let idx = self.view.require_index(id)?;
        let node = self.view.node_by_id(id)?;
        let event = SessionEvent::NodeSelected {
            id: node.id.clone(),
            entity_type: node.entity_type,
            label: node.label.clone(),
            properties: node.properties.clone(),
            degree: self.view.degree(idx),
        };
        if self.controller.select(Some(id.to_string())) {
            self.events.push(event);
        }
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        if self.controller.select(None) {
            self.events.push(SessionEvent::SelectionCleared);
        }
    }

    pub fn set_pinned(&mut self, id: &str, pinned: bool) -> Result<(), GraphError> {
        let view = match &mut self.ego {
            Some(ego) => ego,
            None => &mut self.view,
        };
        self.controller.set_pinned(view, &mut self.handle, id, pinned)
    }

    /// Flips the pin on a node. Returns the new state.
    pub fn toggle_pin(&mut self, id: &str) -> Result<bool, GraphError> {
        let pinned = !self.view().node_by_id(id)?.pinned;
        self.set_pinned(id, pinned)?;
        Ok(pinned)
    }

    pub fn fit_to_screen(&mut self) -> bool {
        let view = self.ego.as_ref().unwrap_or(&self.view);
        self.controller.fit_to_screen(view)
    }

    // ---- queries ----

    /// Substring search over the whole store.
    pub fn search(&self, query: &str) -> Vec<&Node> {
        self.store.search(query, DEFAULT_SEARCH_LIMIT)
    }

    /// Enumerates paths in the filtered view and reports the shortest.
    pub fn find_paths(&mut self, start: &str, end: &str) -> Result<PathOutcome, GraphError> {
        let query = PathQuery::new(start, end)
            .with_max_hops(self.config.impact.max_hops)
            .with_max_results(self.config.impact.max_results);
        let outcome = self.view.find_paths(&query)?;
        self.report_path(&outcome);
        Ok(outcome)
    }

    pub fn shortest_path(&mut self, start: &str, end: &str) -> Result<PathOutcome, GraphError> {
        let outcome = self.view.shortest_path(start, end)?;
        self.report_path(&outcome);
        Ok(outcome)
    }

    fn report_path(&mut self, outcome: &PathOutcome) {
        if let Some(path) = outcome.paths().first() {
            self.events.push(SessionEvent::PathFound {
                nodes: path.nodes.clone(),
            });
        }
    }

    pub fn analyze_removal(&self, id: &str) -> Result<RemovalImpact, GraphError> {
        self.view.analyze_removal(id, &self.config.impact)
    }

    pub fn rank_by_importance(&self) -> Vec<RemovalImpact> {
        self.view.rank_by_importance(&self.config.impact)
    }

    pub fn metrics(&self) -> GraphMetrics {
        self.view.metrics()
    }

    pub fn type_clusters(&self) -> Vec<TypeCluster> {
        self.view.type_clusters()
    }

    // ---- export ----

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::from_filter(&self.config.filter)
    }

    /// Renders what is on screen.
    pub fn export(&self, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
        export::export(self.view(), format, &self.render_options())
    }

    pub fn export_to(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        export::write_export(path, self.view(), format, &self.render_options())
    }
}

/// Current node positions of `view`, by id.
fn positions_of(view: &OntologyGraph) -> PreviousPositions {
    view.nodes()
        .map(|node| (node.id.clone(), node.position))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ontograph_graph::GraphBuilder;

    fn chain() -> GraphStore {
        let mut builder = GraphBuilder::new();
        for (id, entity_type) in [
            ("A", EntityType::Shipper),
            ("B", EntityType::Route),
            ("C", EntityType::Port),
            ("D", EntityType::Vessel),
        ] {
            builder.add_node(Node::new(id, entity_type, id));
        }
        builder
            .add_relation_pair("A", "B", "USES", "USED_BY")
            .add_relation_pair("B", "C", "CALLS_AT", "CALLED_BY")
            .add_relation_pair("D", "C", "CALLS_AT", "CALLED_BY");
        GraphStore::build(builder).unwrap()
    }

    #[test]
    fn test_select_emits_degree() {
        let mut session = GraphSession::new(chain());
        session.select("B").unwrap();
        session.select("B").unwrap();

        let events = session.drain_events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            SessionEvent::NodeSelected { id, degree, .. } => {
                assert_eq!(id, "B");
                assert_eq!(*degree, 2);
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert!(session.drain_events().is_empty());
        assert!(matches!(session.select("Z"), Err(GraphError::NotFound(_))));
    }

    #[test]
    fn test_path_found_event() {
        let mut session = GraphSession::new(chain());
        let outcome = session.find_paths("A", "D").unwrap();
        assert_eq!(outcome.paths()[0].ids(), vec!["A", "B", "C", "D"]);

        let events = session.drain_events();
        match &events[..] {
            [SessionEvent::PathFound { nodes }] => assert_eq!(nodes.len(), 4),
            other => panic!("unexpected events {:?}", other),
        }
    }

    #[test]
    fn test_filter_change_discards_layout() {
        let mut session = GraphSession::new(chain());
        session.settle();
        session.select("D").unwrap();
        let old_generation = session.handle().generation();

        let options = FilterOptions {
            node_types: vec!["SHIPPER".into(), "ROUTE".into(), "PORT".into()],
            ..FilterOptions::default()
        };
        session.set_filter(options);

        assert!(session.handle().generation() > old_generation);
        assert_eq!(session.view().node_count(), 3);
        assert!(session.controller().selection().is_none());

        let events = session.drain_events();
        assert!(events.contains(&SessionEvent::SelectionCleared));
        assert!(events.contains(&SessionEvent::FilterChanged {
            node_count: 3,
            edge_count: 4
        }));
    }

    #[test]
    fn test_radial_mode_shows_ego_network() {
        let mut session = GraphSession::new(chain());
        session.set_radial_center("C").unwrap();
        assert_eq!(session.mode(), LayoutType::Radial);
        assert_eq!(session.view().node_count(), 3);
        session.settle();

        session.set_layout(LayoutType::Grid);
        assert_eq!(session.view().node_count(), 4);
        assert!(matches!(
            session.set_radial_center("nope"),
            Err(GraphError::NotFound(_))
        ));
    }

    #[test]
    fn test_pins_survive_mode_switch() {
        let mut session = GraphSession::new(chain());
        session.settle();
        session.set_pinned("B", true).unwrap();
        let pinned_at = session.view().get_by_id("B").unwrap().position;

        for mode in [LayoutType::Circular, LayoutType::Radial, LayoutType::Hierarchical] {
            session.set_layout(mode);
            session.settle();
            let node = session.view().get_by_id("B").unwrap();
            assert!(node.pinned, "{} dropped the pin", mode);
            assert_eq!(node.position, pinned_at, "{} moved the pin", mode);
        }
        assert!(!session.toggle_pin("B").unwrap());
    }
}
