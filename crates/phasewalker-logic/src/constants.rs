//! Tuning constants — movement, abilities, progression, interaction.
//!
//! Plain constants with no engine dependency. Both the simulation core
//! and the native simtest harness use these; the JSON ability manifest
//! under `data/` must agree with the ability table here.

pub mod movement {
    /// Base walk speed in units per second.
    pub const BASE_SPEED: f32 = 5.0;
    /// Sprint speed multiplier (composes with crouch).
    pub const SPRINT_MULTIPLIER: f32 = 1.8;
    /// Crouch speed multiplier (composes with sprint).
    pub const CROUCH_MULTIPLIER: f32 = 0.5;
    /// Downward acceleration in units per second squared.
    pub const GRAVITY: f32 = 20.0;
    /// Upward velocity applied on jump.
    pub const JUMP_FORCE: f32 = 8.0;
    /// Minimum time between jump requests, independent of grounded state.
    pub const JUMP_DEBOUNCE_SECS: f32 = 0.3;
    /// Downward probe hit distance below which the character is grounded.
    pub const GROUND_PROBE_DISTANCE: f32 = 0.3;
    /// Probe origin lift above the character position.
    pub const PROBE_ORIGIN_EPSILON: f32 = 0.1;
    /// Character capsule radius for lateral collision.
    pub const CHARACTER_RADIUS: f32 = 0.5;
    /// Character height; overhead probe origin sits at this offset.
    pub const CHARACTER_HEIGHT: f32 = 1.8;
    /// Extra clearance kept between the character and lateral geometry.
    pub const COLLISION_MARGIN: f32 = 0.2;
}

pub mod resources {
    pub const STARTING_HEALTH: f32 = 100.0;
    pub const STARTING_QUANTUM_ENERGY: f32 = 100.0;
    pub const STARTING_QUANTUM_STABILITY: f32 = 100.0;
    pub const STARTING_SCIENTIFIC_KNOWLEDGE: f32 = 10.0;
    pub const MAX_SCIENTIFIC_KNOWLEDGE: f32 = 100.0;

    /// Quantum energy regenerated per second.
    pub const ENERGY_REGEN_PER_SEC: f32 = 2.0;
    /// Quantum stability regenerated per second.
    pub const STABILITY_REGEN_PER_SEC: f32 = 1.0;
}

pub mod abilities {
    /// Maximum level any ability can be upgraded to.
    pub const MAX_ABILITY_LEVEL: u8 = 5;

    // Phase shift — duration ability.
    pub const PHASE_SHIFT_COST: f32 = 25.0;
    pub const PHASE_SHIFT_COOLDOWN: f32 = 10.0;
    pub const PHASE_SHIFT_DURATION: f32 = 5.0;
    pub const PHASE_SHIFT_STABILITY_COST: f32 = 10.0;

    // Time dilation — duration ability with an area of effect.
    pub const TIME_DILATION_COST: f32 = 40.0;
    pub const TIME_DILATION_COOLDOWN: f32 = 15.0;
    pub const TIME_DILATION_DURATION: f32 = 8.0;
    pub const TIME_DILATION_RADIUS: f32 = 5.0;
    pub const TIME_DILATION_STABILITY_COST: f32 = 15.0;

    // Molecular reconstruction — instant targeted ability.
    pub const RECONSTRUCTION_COST: f32 = 30.0;
    pub const RECONSTRUCTION_COOLDOWN: f32 = 5.0;
    pub const RECONSTRUCTION_RANGE: f32 = 10.0;
    pub const RECONSTRUCTION_HEAL: f32 = 25.0;
    pub const RECONSTRUCTION_STABILITY_COST: f32 = 8.0;
    /// Lifetime of a construct spawned at an empty reconstruction target.
    pub const RECONSTRUCTION_CONSTRUCT_LIFETIME: f32 = 30.0;

    // Quantum teleportation — instant targeted ability.
    pub const TELEPORT_COST: f32 = 35.0;
    pub const TELEPORT_COOLDOWN: f32 = 8.0;
    pub const TELEPORT_RANGE: f32 = 20.0;
    pub const TELEPORT_STABILITY_COST: f32 = 12.0;

    // Per-level upgrade deltas, applied cumulatively on each upgrade.
    pub const UPGRADE_COST_DELTA: f32 = -2.0;
    pub const UPGRADE_COOLDOWN_DELTA: f32 = -0.5;
    pub const UPGRADE_DURATION_DELTA: f32 = 1.0;
    pub const UPGRADE_RANGE_DELTA: f32 = 2.0;
    pub const UPGRADE_RADIUS_DELTA: f32 = 0.5;
}

pub mod progression {
    /// Skill points granted per level-up.
    pub const SKILL_POINTS_PER_LEVEL: u32 = 3;
    /// Max health gained per level-up (pool refilled).
    pub const MAX_HEALTH_PER_LEVEL: f32 = 10.0;
    /// Max quantum energy gained per level-up (pool refilled).
    pub const MAX_ENERGY_PER_LEVEL: f32 = 15.0;
    /// Max quantum stability gained per level-up (pool refilled).
    pub const MAX_STABILITY_PER_LEVEL: f32 = 5.0;

    // Increments applied by spending one skill point on a stat.
    pub const SKILL_INCREMENT_MAX_HEALTH: f32 = 10.0;
    pub const SKILL_INCREMENT_MAX_ENERGY: f32 = 15.0;
    pub const SKILL_INCREMENT_MAX_STABILITY: f32 = 5.0;
    pub const SKILL_INCREMENT_QUANTUM_CONTROL: f32 = 2.0;
    pub const SKILL_INCREMENT_TEMPORAL_CONTROL: f32 = 2.0;
    pub const SKILL_INCREMENT_KNOWLEDGE: f32 = 2.0;
}

pub mod interaction {
    /// Maximum distance at which objects are considered nearby/interactable.
    pub const INTERACTION_DISTANCE: f32 = 3.0;
    /// Highlight ray length.
    pub const HIGHLIGHT_RAY_LENGTH: f32 = 50.0;
    /// Forward offset where dropped objects are placed.
    pub const DROP_FORWARD_OFFSET: f32 = 1.5;
    /// Height above the character base where dropped objects are released.
    pub const DROP_HEIGHT_OFFSET: f32 = 1.0;
    /// Impulse imparted to dropped physics objects.
    pub const DROP_IMPULSE: f32 = 1.0;
}
