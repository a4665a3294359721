//! Simulation events, drained once per tick by the embedder.
//!
//! Subsystems push into a shared `Vec<SimEvent>` instead of subscribing
//! to each other; the fixed tick order keeps the sequence deterministic.
//! Rendering, audio, and UI consume the drained queue.

use hecs::Entity;

use crate::abilities::AbilityKind;
use crate::components::Vec3;
use crate::ledger::StatId;
use phasewalker_logic::collision::ProbeDirection;
use phasewalker_logic::formulas::{DamageKind, HealKind};

/// Everything the simulation reports outward.
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    // Resource ledger
    StatChanged {
        stat: StatId,
        old: f32,
        new: f32,
    },
    DamageTaken {
        amount: f32,
        kind: DamageKind,
    },
    Healed {
        amount: f32,
        kind: HealKind,
    },
    Died,
    LevelUp {
        level: u32,
    },
    SkillPointSpent {
        stat: StatId,
        points: u32,
    },
    EnergySpent {
        amount: f32,
        ability: Option<AbilityKind>,
    },
    InsufficientEnergy {
        required: f32,
        available: f32,
    },
    InsufficientSkillPoints {
        required: u32,
        available: u32,
    },

    // Abilities
    AbilityUsed {
        ability: AbilityKind,
    },
    AbilityActivated {
        ability: AbilityKind,
    },
    AbilityDeactivated {
        ability: AbilityKind,
        expired: bool,
    },
    AbilityOnCooldown {
        ability: AbilityKind,
        remaining: f32,
    },
    AbilityCooldownComplete {
        ability: AbilityKind,
    },
    AbilityOutOfRange {
        ability: AbilityKind,
        distance: f32,
    },
    AbilityAlreadyMaxLevel {
        ability: AbilityKind,
    },
    AbilityUpgraded {
        ability: AbilityKind,
        level: u8,
    },

    // Locomotion
    Landed,
    Collision {
        object: Entity,
        direction: ProbeDirection,
    },

    // Interaction & possession
    ObjectPickedUp {
        object: Entity,
    },
    ObjectDropped {
        object: Entity,
        at: Vec3,
    },
    ObjectThrown {
        object: Entity,
        force: f32,
    },
    HighlightStart {
        object: Entity,
    },
    HighlightEnd {
        object: Entity,
    },
    ObjectInteraction {
        object: Entity,
    },
    ObjectUsed {
        object: Entity,
        active: bool,
    },
    DataAccessed {
        object: Entity,
        payload: String,
    },
    ContainerOpened {
        object: Entity,
        payload: String,
    },
    InteractionOutOfRange {
        object: Entity,
        distance: f32,
    },
}
