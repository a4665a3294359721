//! Deterministic test-chamber generation.
//!
//! Builds a walled chamber on the implied floor plane: perimeter
//! walls, a scatter of crate obstacles (some with repairable
//! integrity), and one interactable of each kind plus loose pickups.
//! Everything is drawn from a seeded RNG so the harness and tests get
//! the same layout for the same seed.

use hecs::Entity;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::components::{Integrity, InteractableKind, InteractableSpec, Vec3};
use crate::scene::Scene;

const WALL_HEIGHT: f32 = 3.0;
const WALL_THICKNESS: f32 = 0.5;

const DATA_PAYLOADS: [&str; 4] = [
    "phase-survey-01",
    "containment-log",
    "lab-notes-03",
    "anomaly-readout",
];
const CONTAINER_PAYLOADS: [&str; 3] = ["medkit", "power-cell", "calibration-kit"];

/// Chamber layout parameters.
#[derive(Debug, Clone)]
pub struct ChamberConfig {
    pub seed: u64,
    /// Half-extent of the square floor area.
    pub half_extent: f32,
    pub crate_count: usize,
    pub pickup_count: usize,
}

impl Default for ChamberConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            half_extent: 20.0,
            crate_count: 8,
            pickup_count: 3,
        }
    }
}

/// Entities spawned by one generation pass.
#[derive(Debug, Default)]
pub struct Chamber {
    pub walls: Vec<Entity>,
    pub crates: Vec<Entity>,
    pub interactables: Vec<Entity>,
}

/// Populate `scene` with a chamber. The area around the origin is kept
/// clear so the character always spawns unobstructed.
pub fn generate_chamber(scene: &mut Scene, config: &ChamberConfig) -> Chamber {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut chamber = Chamber::default();
    let extent = config.half_extent;

    for (x, z, half_x, half_z) in [
        (0.0, -extent, extent, WALL_THICKNESS),
        (0.0, extent, extent, WALL_THICKNESS),
        (-extent, 0.0, WALL_THICKNESS, extent),
        (extent, 0.0, WALL_THICKNESS, extent),
    ] {
        let wall = scene.spawn_obstacle(
            Vec3::new(x, WALL_HEIGHT * 0.5, z),
            Vec3::new(half_x, WALL_HEIGHT * 0.5, half_z),
        );
        chamber.walls.push(wall);
    }

    for _ in 0..config.crate_count {
        let half = Vec3::new(
            rng.gen_range(0.4..1.2),
            rng.gen_range(0.4..1.2),
            rng.gen_range(0.4..1.2),
        );
        let position = Vec3::new(
            clear_of_origin(&mut rng, extent),
            half.y,
            clear_of_origin(&mut rng, extent),
        );
        let entity = scene.spawn_obstacle(position, half);
        // Half the crates carry a damaged integrity pool so molecular
        // reconstruction has repair targets.
        if rng.gen_bool(0.5) {
            let max = 100.0;
            let value = rng.gen_range(20.0..80.0);
            let _ = scene.world.insert_one(entity, Integrity::damaged(max, value));
        }
        chamber.crates.push(entity);
    }

    for _ in 0..config.pickup_count {
        let position = Vec3::new(
            clear_of_origin(&mut rng, extent),
            0.25,
            clear_of_origin(&mut rng, extent),
        );
        let entity = scene.spawn_interactable(InteractableSpec::new(
            InteractableKind::Pickup,
            position,
        ));
        chamber.interactables.push(entity);
    }

    let data_payload = DATA_PAYLOADS[rng.gen_range(0..DATA_PAYLOADS.len())];
    let container_payload = CONTAINER_PAYLOADS[rng.gen_range(0..CONTAINER_PAYLOADS.len())];
    for spec in [
        InteractableSpec::new(InteractableKind::Use, fixture_position(&mut rng, extent))
            .sized(Vec3::new(0.3, 0.6, 0.2)),
        InteractableSpec::new(InteractableKind::Data, fixture_position(&mut rng, extent))
            .sized(Vec3::new(0.4, 0.7, 0.3))
            .payload(data_payload),
        InteractableSpec::new(InteractableKind::Container, fixture_position(&mut rng, extent))
            .sized(Vec3::new(0.6, 0.5, 0.5))
            .payload(container_payload)
            .cooldown(2.0),
        InteractableSpec::new(InteractableKind::Generic, fixture_position(&mut rng, extent)),
    ] {
        chamber.interactables.push(scene.spawn_interactable(spec));
    }

    chamber
}

/// Random coordinate inside the walls, pushed out of the 3-unit spawn
/// clearing around the origin.
fn clear_of_origin(rng: &mut StdRng, extent: f32) -> f32 {
    let margin = extent - 2.0;
    let value: f32 = rng.gen_range(-margin..margin);
    if value.abs() < 3.0 {
        value.signum() * (value.abs() + 3.0)
    } else {
        value
    }
}

fn fixture_position(rng: &mut StdRng, extent: f32) -> Vec3 {
    Vec3::new(
        clear_of_origin(rng, extent),
        0.6,
        clear_of_origin(rng, extent),
    )
}
