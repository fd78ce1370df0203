//! The slot table every layout strategy works on.
//!
//! A `PositionIndex` maps node ids to dense slots holding position,
//! velocity and constraints. Strategies only ever touch slots; the
//! result reaches the view through `write_back`.

use ontograph_core::Position;
use ontograph_graph::{NodeId, OntologyGraph};
use std::collections::HashMap;
use std::f64::consts::PI;

/// Positions carried over from an earlier run, by node id.
pub type PreviousPositions = HashMap<String, Position>;

/// Layout state of one node.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub id: String,
    pub position: Position,
    pub velocity: Position,
    /// Set while dragged or pinned; the simulation holds the node here.
    pub fixed: Option<Position>,
    pub pinned: bool,
    /// Visual radius in world units.
    pub radius: f64,
    /// Hierarchical rank of the node's entity type.
    pub rank: usize,
}

#[derive(Debug, Clone, Default)]
pub struct PositionIndex {
    slots: Vec<Slot>,
    by_id: HashMap<String, usize>,
}

impl PositionIndex {
    /// One slot per view node, in store order.
    pub fn from_view(
        view: &OntologyGraph,
        previous: Option<&PreviousPositions>,
        center: Position,
        node_scale: f64,
    ) -> Self {
        let members: Vec<NodeId> = view.node_indexes().collect();
        Self::from_members(view, &members, previous, center, node_scale)
    }

    /// One slot per listed node, in the given order.
    ///
    /// Pinned nodes keep their view position. Other nodes are seeded from
    /// `previous`, or start on a phyllotaxis spiral around `center`.
    pub fn from_members(
        view: &OntologyGraph,
        members: &[NodeId],
        previous: Option<&PreviousPositions>,
        center: Position,
        node_scale: f64,
    ) -> Self {
        let mut index = PositionIndex::default();

        for &member in members {
            let Some(node) = view.get(member) else {
                continue;
            };
            if index.by_id.contains_key(&node.id) {
                continue;
            }

            let seeded = if node.pinned {
                Some(node.position)
            } else {
                previous
                    .and_then(|p| p.get(&node.id))
                    .copied()
                    .filter(|p| p.is_finite())
            };

            let slot_number = index.slots.len();
            let position = seeded.unwrap_or_else(|| phyllotaxis(center, slot_number));

            index.by_id.insert(node.id.clone(), slot_number);
            index.slots.push(Slot {
                id: node.id.clone(),
                position,
                velocity: Position::ORIGIN,
                fixed: node.pinned.then_some(position),
                pinned: node.pinned,
                radius: node.radius(node_scale),
                rank: node.entity_type.rank(),
            });
        }

        index
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut [Slot] {
        &mut self.slots
    }

    pub fn slot_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<&Slot> {
        self.slot_of(id).map(|i| &self.slots[i])
    }

    pub fn position(&self, id: &str) -> Option<Position> {
        self.get(id).map(|slot| slot.position)
    }

    /// Holds a node at `position` until released.
    pub fn fix(&mut self, id: &str, position: Position) -> bool {
        match self.slot_of(id) {
            Some(i) => {
                let slot = &mut self.slots[i];
                slot.fixed = Some(position);
                slot.position = position;
                slot.velocity = Position::ORIGIN;
                true
            }
            None => false,
        }
    }

    /// Clears a drag constraint. Pinned nodes stay where they are.
    pub fn release(&mut self, id: &str) -> bool {
        match self.slot_of(id) {
            Some(i) => {
                let slot = &mut self.slots[i];
                if !slot.pinned {
                    slot.fixed = None;
                }
                true
            }
            None => false,
        }
    }

    /// Pins or unpins a node at its current position.
    pub fn set_pinned(&mut self, id: &str, pinned: bool) -> bool {
        match self.slot_of(id) {
            Some(i) => {
                let slot = &mut self.slots[i];
                slot.pinned = pinned;
                slot.fixed = pinned.then_some(slot.position);
                true
            }
            None => false,
        }
    }

    /// Copies slot positions onto the matching view nodes.
    pub fn write_back(&self, view: &mut OntologyGraph) {
        for slot in &self.slots {
            if let Some(idx) = view.get_index(&slot.id) {
                view.set_position(idx, slot.position);
            }
        }
    }

    /// Positions by id, for seeding the next run.
    pub fn positions(&self) -> PreviousPositions {
        self.slots
            .iter()
            .map(|slot| (slot.id.clone(), slot.position))
            .collect()
    }

    /// Bounding box `(min, max)` including node radii.
    pub fn bounds(&self) -> Option<(Position, Position)> {
        let first = self.slots.first()?;
        let mut min = first.position - Position::new(first.radius, first.radius);
        let mut max = first.position + Position::new(first.radius, first.radius);

        for slot in &self.slots[1..] {
            min.x = min.x.min(slot.position.x - slot.radius);
            min.y = min.y.min(slot.position.y - slot.radius);
            max.x = max.x.max(slot.position.x + slot.radius);
            max.y = max.y.max(slot.position.y + slot.radius);
        }

        Some((min, max))
    }
}

/// Deterministic spiral placement for unseeded nodes.
pub(crate) fn phyllotaxis(center: Position, i: usize) -> Position {
    let radius = 10.0 * (0.5 + i as f64).sqrt();
    let angle = i as f64 * PI * (3.0 - 5.0f64.sqrt());
    center.on_circle(radius, angle)
}
