//! Simulation context
//!
//! One `SimState` owns everything a run needs: the map, the registry, the
//! config, the tick counter and the spawn queue. No process-wide state, so
//! independent simulations can run side by side and tests stay deterministic.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;

use super::enemies::{EnemyId, EnemyRegistry};
use super::map::Map;

/// Where the run currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimPhase {
    /// Base still standing
    Running,
    /// Base destroyed; ticks become no-ops
    Defeated,
}

/// Everything one simulation run owns.
///
/// The registry is populated before the first tick and read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimState {
    pub registry: EnemyRegistry,
    pub map: Map,
    pub config: SimConfig,
    /// Run seed; wave RNG streams derive from it
    pub seed: u64,
    /// Ticks advanced so far
    pub time_ticks: u64,
    pub base_health: f32,
    pub phase: SimPhase,
    /// Scheduled spawns as (due tick, kind), kept sorted by due tick
    pub pending_spawns: Vec<(u64, EnemyId)>,
    /// Waves queued so far, used to derive each wave's RNG stream
    pub waves_queued: u32,
}

impl SimState {
    pub fn new(registry: EnemyRegistry, map: Map, config: SimConfig, seed: u64) -> Self {
        let base_health = config.base_health;
        Self {
            registry,
            map,
            config,
            seed,
            time_ticks: 0,
            base_health,
            phase: SimPhase::Running,
            pending_spawns: Vec::new(),
            waves_queued: 0,
        }
    }

    /// Per-wave RNG, derived from the run seed so replays match
    pub fn wave_rng(&self, wave_index: u32) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed.wrapping_add(wave_index as u64))
    }

    pub fn is_defeated(&self) -> bool {
        self.phase == SimPhase::Defeated
    }
}
