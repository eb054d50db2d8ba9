//! One lane segment: a curve plus the enemies traversing it
//!
//! Enemy instances live in a dense slot array with a free-list of reclaimed
//! indices, so removal never shifts and spawning is O(1) amortized. A slot in
//! the free-list always holds a dead instance; everything else is live.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bounds::BoundingBox;
use super::curve::Curve;
use super::enemies::{EnemyId, EnemyRegistry};

/// A single enemy on the lane
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyInstance {
    pub kind: EnemyId,
    pub health_left: f32,
    /// Progress through this segment's curve, 0 at the head, 1 at the tail
    pub percent_along_path: f32,
    pub is_alive: bool,
}

/// One curve of the lane chain and its traversing enemies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSegment {
    curve: Curve,
    bounds: BoundingBox,
    arc_length: f32,
    enemies: Vec<EnemyInstance>,
    free_slots: Vec<usize>,
}

impl PathSegment {
    /// Build a segment, deriving the bounding box and arc length from the
    /// coarse tessellation once up front.
    pub fn new(curve: Curve, update_segments: u32) -> Self {
        let samples = curve.samples(update_segments);
        let bounds = BoundingBox::from_points(samples.iter().copied())
            .expect("tessellation always yields samples");
        let arc_length = curve.arc_length(update_segments);
        debug_assert!(arc_length > 0.0, "degenerate path segment");
        Self {
            curve,
            bounds,
            arc_length,
            enemies: Vec::new(),
            free_slots: Vec::new(),
        }
    }

    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    pub fn arc_length(&self) -> f32 {
        self.arc_length
    }

    /// Insert an enemy, reusing a reclaimed slot when one is free
    pub fn add_enemy(&mut self, kind: EnemyId, health_left: f32, percent: f32) -> usize {
        let instance = EnemyInstance {
            kind,
            health_left,
            percent_along_path: percent,
            is_alive: true,
        };
        match self.free_slots.pop() {
            Some(slot) => {
                debug_assert!(!self.enemies[slot].is_alive, "free slot held a live enemy");
                self.enemies[slot] = instance;
                slot
            }
            None => {
                self.enemies.push(instance);
                self.enemies.len() - 1
            }
        }
    }

    /// Mark a slot dead and hand its index back for reuse
    pub(crate) fn release_slot(&mut self, slot: usize) {
        debug_assert!(self.enemies[slot].is_alive, "slot released twice");
        self.enemies[slot].is_alive = false;
        self.free_slots.push(slot);
    }

    /// Advance every live enemy by `(speed / arc_length) * multiplier * dt`.
    ///
    /// Enemies crossing `percent == 1` are removed from their slot and
    /// returned with their remaining health, ready for hand-off or for
    /// damaging the base. Their progress resets to 0 for the next segment.
    pub(crate) fn advance(
        &mut self,
        registry: &EnemyRegistry,
        speed_multiplier: f32,
        dt: f32,
    ) -> Vec<EnemyInstance> {
        let mut completed = Vec::new();
        for slot in 0..self.enemies.len() {
            if !self.enemies[slot].is_alive {
                continue;
            }
            let stats = registry.stats(self.enemies[slot].kind);
            let movement = (stats.speed / self.arc_length) * speed_multiplier * dt;
            self.enemies[slot].percent_along_path += movement;

            if self.enemies[slot].percent_along_path >= 1.0 {
                let mut moved = self.enemies[slot].clone();
                moved.percent_along_path = 0.0;
                completed.push(moved);
                self.release_slot(slot);
            }
        }
        completed
    }

    pub fn enemy(&self, slot: usize) -> Option<&EnemyInstance> {
        self.enemies.get(slot)
    }

    pub(crate) fn enemy_mut(&mut self, slot: usize) -> Option<&mut EnemyInstance> {
        self.enemies.get_mut(slot)
    }

    /// Live enemies with their slot indices, in slot order
    pub fn live_enemies(&self) -> impl Iterator<Item = (usize, &EnemyInstance)> {
        self.enemies
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_alive)
    }

    /// World position of each live enemy
    pub fn positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.live_enemies()
            .map(|(_, e)| self.curve.point_at(e.percent_along_path.clamp(0.0, 1.0)))
    }

    /// Total slots allocated, live or reclaimable
    pub fn slot_count(&self) -> usize {
        self.enemies.len()
    }

    pub fn live_count(&self) -> usize {
        self.live_enemies().count()
    }
}
