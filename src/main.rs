//! Headless demo driver
//!
//! Builds a small two-curve lane, registers a handful of enemy kinds, queues
//! waves and runs the fixed-timestep loop until the base falls or the waves
//! run dry. Useful for eyeballing balance and for profiling; a real game
//! shell would swap the logging renderer for a GPU one.

use glam::Vec2;

use lane_td::config::SimConfig;
use lane_td::consts::SIM_DT;
use lane_td::render::{Color, MeshData, ShapeRenderer};
use lane_td::sim::{
    queue_wave, tick, Curve, DamageMask, DamageType, EnemyId, EnemyKind, EnemyRegistry, Map,
    SimState,
};

const RUNNER: EnemyId = EnemyId(0);
const BRUTE: EnemyId = EnemyId(1);
const CARRIER: EnemyId = EnemyId(2);
const MITE: EnemyId = EnemyId(3);

fn build_registry() -> EnemyRegistry {
    let mut registry = EnemyRegistry::new();
    registry.register(
        RUNNER,
        EnemyKind::new("runner")
            .with_health(10.0)
            .with_damage(1.0)
            .with_speed(60.0),
    );
    registry.register(
        BRUTE,
        EnemyKind::new("brute")
            .with_health(50.0)
            .with_damage(5.0)
            .with_speed(25.0)
            .with_resistance(DamageMask::NONE.with(DamageType::Frost)),
    );
    registry.register(
        MITE,
        EnemyKind::new("mite")
            .with_health(4.0)
            .with_damage(1.0)
            .with_speed(80.0),
    );
    registry.register(
        CARRIER,
        EnemyKind::new("carrier")
            .with_health(30.0)
            .with_damage(3.0)
            .with_speed(35.0)
            .with_children(vec![MITE, MITE]),
    );
    registry
}

fn build_lane(config: &SimConfig) -> Map {
    let curves = vec![
        Curve::cubic(
            Vec2::new(-400.0, 0.0),
            Vec2::new(-300.0, 250.0),
            Vec2::new(-100.0, -250.0),
            Vec2::new(0.0, 0.0),
        ),
        Curve::quadratic(
            Vec2::new(0.0, 0.0),
            Vec2::new(200.0, 300.0),
            Vec2::new(400.0, 0.0),
        ),
    ];
    Map::new(curves, config)
}

/// Renderer that just counts what it is asked to draw
#[derive(Default)]
struct LogRenderer {
    meshes: usize,
    markers: usize,
}

impl ShapeRenderer for LogRenderer {
    fn draw_mesh(&mut self, mesh: &MeshData, _color: Color) {
        self.meshes += 1;
        log::trace!("draw_mesh: {} triangles", mesh.triangle_count());
    }

    fn draw_marker(&mut self, _pos: Vec2, _size: f32, _color: Color) {
        self.markers += 1;
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => SimConfig::from_json(&json),
            Err(err) => {
                log::warn!("Could not read config {path}: {err}");
                SimConfig::default()
            }
        },
        None => SimConfig::default(),
    };

    let registry = build_registry();
    let map = build_lane(&config);
    let mut state = SimState::new(registry, map, config, 0xC0FFEE);

    let roster = [RUNNER, BRUTE, CARRIER];
    for _ in 0..3 {
        queue_wave(&mut state, &roster);
    }

    let mut total_damage = 0.0;
    loop {
        let out = tick(&mut state, SIM_DT);
        total_damage += out.damage_to_base;
        if out.base_destroyed {
            log::info!("Base destroyed at tick {}", state.time_ticks);
            break;
        }
        if state.pending_spawns.is_empty() && state.map.live_count() == 0 {
            log::info!("All waves cleared at tick {}", state.time_ticks);
            break;
        }
    }

    let mut renderer = LogRenderer::default();
    state.map.draw(&mut renderer, &state.config);
    log::info!(
        "Run over: {} damage leaked, {:.0} base health left, drew {} meshes / {} markers",
        total_damage,
        state.base_health,
        renderer.meshes,
        renderer.markers
    );
}
