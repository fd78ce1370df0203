//! Velocity-Verlet force simulation.
//!
//! Each tick cools `alpha` toward `alpha_target`, lets every force add to
//! node velocities (scaled by alpha), then damps velocities and moves the
//! nodes. Fixed nodes are snapped back to their constraint. The run is
//! over once alpha falls below `alpha_min` or the iteration cap is hit.

use crate::config::LayoutConfig;
use crate::position_index::PositionIndex;
use ontograph_core::Position;

/// An undirected spring between two slots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub source: usize,
    pub target: usize,
}

/// One force acting on the slots.
#[derive(Debug, Clone, PartialEq)]
pub enum Force {
    /// Pairwise repulsion (negative strength) or attraction.
    ManyBody { strength: f64 },
    /// Springs pulling linked nodes toward `distance` apart.
    Links { links: Vec<Link>, distance: f64 },
    /// Translates the whole layout so its mean sits on `center`.
    Center { center: Position },
    /// Pushes overlapping nodes apart; radius is `max(min_radius, slot radius)`.
    Collide { min_radius: f64, strength: f64 },
    /// Per-slot spring toward a target x.
    TargetX { targets: Vec<f64>, strength: f64 },
    /// Per-slot spring toward a target y.
    TargetY { targets: Vec<f64>, strength: f64 },
}

#[derive(Debug, Clone)]
pub struct Simulation {
    alpha: f64,
    alpha_min: f64,
    alpha_decay: f64,
    alpha_target: f64,
    velocity_decay: f64,
    max_iterations: usize,
    iterations: usize,
    forces: Vec<Force>,
}

impl Simulation {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            alpha: config.alpha,
            alpha_min: config.alpha_min,
            alpha_decay: config.alpha_decay,
            alpha_target: config.alpha_target,
            velocity_decay: config.velocity_decay,
            max_iterations: config.max_iterations,
            iterations: 0,
            forces: Vec::new(),
        }
    }

    pub fn with_force(mut self, force: Force) -> Self {
        self.forces.push(force);
        self
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// True while another tick would still move things.
    pub fn is_active(&self) -> bool {
        let hot = self.alpha >= self.alpha_min || self.alpha_target >= self.alpha_min;
        hot && self.iterations < self.max_iterations
    }

    /// Keeps the run warm at `target` (drag start).
    pub fn reheat(&mut self, target: f64) {
        self.alpha_target = target;
        self.iterations = 0;
    }

    /// Lets the run cool down again (drag end).
    pub fn cool(&mut self) {
        self.alpha_target = 0.0;
    }

    /// Advances one tick. Returns whether the run is still converging.
    pub fn tick(&mut self, index: &mut PositionIndex) -> bool {
        if !self.is_active() {
            return false;
        }

        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
        self.iterations += 1;

        for force in &self.forces {
            apply(force, index, self.alpha);
        }

        let keep = 1.0 - self.velocity_decay;
        for slot in index.slots_mut() {
            match slot.fixed {
                Some(fixed) => {
                    slot.position = fixed;
                    slot.velocity = Position::ORIGIN;
                }
                None => {
                    slot.velocity = slot.velocity * keep;
                    slot.position = slot.position + slot.velocity;
                }
            }
        }

        self.is_active()
    }
}

/// Tiny deterministic offset for coincident nodes.
fn jiggle(i: usize, j: usize) -> f64 {
    (i as f64 - j as f64) * 1e-6
}

fn apply(force: &Force, index: &mut PositionIndex, alpha: f64) {
    let slots = index.slots_mut();
    let n = slots.len();

    match force {
        Force::ManyBody { strength } => {
            for i in 0..n {
                for j in 0..n {
                    if i == j {
                        continue;
                    }
                    let mut dx = slots[j].position.x - slots[i].position.x;
                    let mut dy = slots[j].position.y - slots[i].position.y;
                    if dx == 0.0 && dy == 0.0 {
                        dx = jiggle(i, j);
                        dy = jiggle(j, i);
                    }
                    // clamp tiny distances so close pairs do not explode
                    let l = (dx * dx + dy * dy).max(1.0);
                    let w = strength * alpha / l;
                    slots[i].velocity.x += dx * w;
                    slots[i].velocity.y += dy * w;
                }
            }
        }

        Force::Links { links, distance } => {
            let mut count = vec![0usize; n];
            for link in links {
                count[link.source] += 1;
                count[link.target] += 1;
            }

            for link in links {
                let (s, t) = (link.source, link.target);
                let mut dx = slots[t].position.x + slots[t].velocity.x
                    - slots[s].position.x
                    - slots[s].velocity.x;
                let mut dy = slots[t].position.y + slots[t].velocity.y
                    - slots[s].position.y
                    - slots[s].velocity.y;
                if dx == 0.0 && dy == 0.0 {
                    dx = jiggle(t, s);
                    dy = jiggle(s, t);
                }
                let l = (dx * dx + dy * dy).sqrt();
                let strength = 1.0 / count[s].min(count[t]) as f64;
                let k = (l - distance) / l * alpha * strength;
                dx *= k;
                dy *= k;

                let bias = count[s] as f64 / (count[s] + count[t]) as f64;
                slots[t].velocity.x -= dx * bias;
                slots[t].velocity.y -= dy * bias;
                slots[s].velocity.x += dx * (1.0 - bias);
                slots[s].velocity.y += dy * (1.0 - bias);
            }
        }

        Force::Center { center } => {
            if n == 0 {
                return;
            }
            let sum = slots
                .iter()
                .fold(Position::ORIGIN, |acc, slot| acc + slot.position);
            let shift = *center - sum * (1.0 / n as f64);
            for slot in slots.iter_mut() {
                slot.position = slot.position + shift;
            }
        }

        Force::Collide {
            min_radius,
            strength,
        } => {
            for i in 0..n {
                for j in (i + 1)..n {
                    let ri = slots[i].radius.max(*min_radius);
                    let rj = slots[j].radius.max(*min_radius);
                    let r = ri + rj;

                    let mut dx = slots[i].position.x + slots[i].velocity.x
                        - slots[j].position.x
                        - slots[j].velocity.x;
                    let mut dy = slots[i].position.y + slots[i].velocity.y
                        - slots[j].position.y
                        - slots[j].velocity.y;
                    if dx == 0.0 && dy == 0.0 {
                        dx = jiggle(i, j);
                        dy = jiggle(j, i);
                    }
                    let l2 = dx * dx + dy * dy;
                    if l2 >= r * r {
                        continue;
                    }

                    let l = l2.sqrt();
                    let k = (r - l) / l * strength;
                    let share = (rj * rj) / (ri * ri + rj * rj);
                    slots[i].velocity.x += dx * k * share;
                    slots[i].velocity.y += dy * k * share;
                    slots[j].velocity.x -= dx * k * (1.0 - share);
                    slots[j].velocity.y -= dy * k * (1.0 - share);
                }
            }
        }

        Force::TargetX { targets, strength } => {
            for (slot, target) in slots.iter_mut().zip(targets) {
                slot.velocity.x += (target - slot.position.x) * strength * alpha;
            }
        }

        Force::TargetY { targets, strength } => {
            for (slot, target) in slots.iter_mut().zip(targets) {
                slot.velocity.y += (target - slot.position.y) * strength * alpha;
            }
        }
    }
}
