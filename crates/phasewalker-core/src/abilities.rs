//! Quantum ability orchestrator.
//!
//! Four abilities exist from load and are never destroyed. Phase shift
//! and time dilation are duration abilities with an INACTIVE → ACTIVE
//! state machine; molecular reconstruction and quantum teleportation
//! apply once on invocation. Every use is gated and paid for through
//! the resource ledger: cooldown, then target validation, then the
//! energy spend, then the stability cost discounted by the ability's
//! governing attribute.
//!
//! The ability owns the one cooldown the engine enforces, so cooldown
//! upgrades shorten the real gate, not just a displayed number.

use hecs::Entity;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::components::{Construct, Integrity, Transform, Vec3};
use crate::events::SimEvent;
use crate::ledger::{ResourceLedger, StatId};
use crate::locomotion::CharacterKinematics;
use phasewalker_logic::collision::{self, Aabb};
use phasewalker_logic::constants::{abilities as tuning, movement};
use phasewalker_logic::formulas::HealKind;

/// The four character abilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityKind {
    PhaseShift,
    TimeDilation,
    MolecularReconstruction,
    QuantumTeleport,
}

impl AbilityKind {
    pub const ALL: [AbilityKind; 4] = [
        AbilityKind::PhaseShift,
        AbilityKind::TimeDilation,
        AbilityKind::MolecularReconstruction,
        AbilityKind::QuantumTeleport,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AbilityKind::PhaseShift => "phaseShift",
            AbilityKind::TimeDilation => "timeDilation",
            AbilityKind::MolecularReconstruction => "molecularReconstruction",
            AbilityKind::QuantumTeleport => "quantumTeleport",
        }
    }

    pub fn from_name(name: &str) -> Option<AbilityKind> {
        AbilityKind::ALL.iter().copied().find(|k| k.name() == name)
    }

    /// Attribute that discounts this ability's stability cost.
    pub fn governing_attribute(self) -> StatId {
        match self {
            AbilityKind::PhaseShift | AbilityKind::QuantumTeleport => StatId::QuantumControl,
            AbilityKind::TimeDilation => StatId::TemporalControl,
            AbilityKind::MolecularReconstruction => StatId::ScientificKnowledge,
        }
    }

    pub fn has_duration(self) -> bool {
        matches!(self, AbilityKind::PhaseShift | AbilityKind::TimeDilation)
    }
}

/// Effective tuning for one ability at one level. Fields that do not
/// apply to a given ability stay `None` and never receive deltas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AbilityStats {
    pub energy_cost: f32,
    pub cooldown: f32,
    pub stability_cost: f32,
    pub duration: Option<f32>,
    pub range: Option<f32>,
    pub radius: Option<f32>,
}

impl AbilityStats {
    /// Level-1 tuning straight from the constant table.
    pub fn base(kind: AbilityKind) -> Self {
        match kind {
            AbilityKind::PhaseShift => Self {
                energy_cost: tuning::PHASE_SHIFT_COST,
                cooldown: tuning::PHASE_SHIFT_COOLDOWN,
                stability_cost: tuning::PHASE_SHIFT_STABILITY_COST,
                duration: Some(tuning::PHASE_SHIFT_DURATION),
                range: None,
                radius: None,
            },
            AbilityKind::TimeDilation => Self {
                energy_cost: tuning::TIME_DILATION_COST,
                cooldown: tuning::TIME_DILATION_COOLDOWN,
                stability_cost: tuning::TIME_DILATION_STABILITY_COST,
                duration: Some(tuning::TIME_DILATION_DURATION),
                range: None,
                radius: Some(tuning::TIME_DILATION_RADIUS),
            },
            AbilityKind::MolecularReconstruction => Self {
                energy_cost: tuning::RECONSTRUCTION_COST,
                cooldown: tuning::RECONSTRUCTION_COOLDOWN,
                stability_cost: tuning::RECONSTRUCTION_STABILITY_COST,
                duration: None,
                range: Some(tuning::RECONSTRUCTION_RANGE),
                radius: None,
            },
            AbilityKind::QuantumTeleport => Self {
                energy_cost: tuning::TELEPORT_COST,
                cooldown: tuning::TELEPORT_COOLDOWN,
                stability_cost: tuning::TELEPORT_STABILITY_COST,
                duration: None,
                range: Some(tuning::TELEPORT_RANGE),
                radius: None,
            },
        }
    }

    /// Tuning with `level - 1` cumulative upgrade deltas applied.
    pub fn at_level(kind: AbilityKind, level: u8) -> Self {
        let steps = level.saturating_sub(1) as f32;
        let mut stats = Self::base(kind);
        stats.energy_cost = (stats.energy_cost + steps * tuning::UPGRADE_COST_DELTA).max(0.0);
        stats.cooldown = (stats.cooldown + steps * tuning::UPGRADE_COOLDOWN_DELTA).max(0.0);
        stats.duration = stats
            .duration
            .map(|d| d + steps * tuning::UPGRADE_DURATION_DELTA);
        stats.range = stats.range.map(|r| r + steps * tuning::UPGRADE_RANGE_DELTA);
        stats.radius = stats
            .radius
            .map(|r| r + steps * tuning::UPGRADE_RADIUS_DELTA);
        stats
    }
}

/// One ability's level and runtime state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ability {
    pub kind: AbilityKind,
    pub level: u8,
    pub cooldown_remaining: f32,
    pub active: bool,
    pub remaining_duration: f32,
}

impl Ability {
    fn new(kind: AbilityKind) -> Self {
        Self {
            kind,
            level: 1,
            cooldown_remaining: 0.0,
            active: false,
            remaining_duration: 0.0,
        }
    }

    pub fn stats(&self) -> AbilityStats {
        AbilityStats::at_level(self.kind, self.level)
    }

    pub fn ready(&self) -> bool {
        self.cooldown_remaining <= 0.0
    }
}

/// Explicit target for an instant ability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AbilityTarget {
    Point(Vec3),
    Object(Entity),
}

/// All four abilities plus their shared tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityBook {
    abilities: [Ability; 4],
}

impl AbilityBook {
    pub fn new() -> Self {
        Self {
            abilities: [
                Ability::new(AbilityKind::PhaseShift),
                Ability::new(AbilityKind::TimeDilation),
                Ability::new(AbilityKind::MolecularReconstruction),
                Ability::new(AbilityKind::QuantumTeleport),
            ],
        }
    }

    pub fn get(&self, kind: AbilityKind) -> &Ability {
        &self.abilities[kind as usize]
    }

    pub fn get_mut(&mut self, kind: AbilityKind) -> &mut Ability {
        &mut self.abilities[kind as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ability> {
        self.abilities.iter()
    }

    /// Per-tick decay: cooldowns count down (completion fires exactly
    /// once per cycle); active durations count down and auto-deactivate
    /// at zero.
    pub fn tick(&mut self, delta_time: f32, events: &mut Vec<SimEvent>) {
        for ability in &mut self.abilities {
            if ability.cooldown_remaining > 0.0 {
                ability.cooldown_remaining -= delta_time;
                if ability.cooldown_remaining <= 0.0 {
                    ability.cooldown_remaining = 0.0;
                    events.push(SimEvent::AbilityCooldownComplete {
                        ability: ability.kind,
                    });
                }
            }
            if ability.active {
                ability.remaining_duration -= delta_time;
                if ability.remaining_duration <= 0.0 {
                    ability.active = false;
                    ability.remaining_duration = 0.0;
                    events.push(SimEvent::AbilityDeactivated {
                        ability: ability.kind,
                        expired: true,
                    });
                }
            }
        }
    }

    /// End a duration ability before expiry. No-op when inactive.
    pub fn deactivate(&mut self, kind: AbilityKind, events: &mut Vec<SimEvent>) -> bool {
        let ability = self.get_mut(kind);
        if !ability.active {
            return false;
        }
        ability.active = false;
        ability.remaining_duration = 0.0;
        events.push(SimEvent::AbilityDeactivated {
            ability: kind,
            expired: false,
        });
        true
    }

    /// Spend one skill point to apply the next level's deltas.
    pub fn upgrade(
        &mut self,
        kind: AbilityKind,
        ledger: &mut ResourceLedger,
        events: &mut Vec<SimEvent>,
    ) -> bool {
        if self.get(kind).level >= tuning::MAX_ABILITY_LEVEL {
            events.push(SimEvent::AbilityAlreadyMaxLevel { ability: kind });
            return false;
        }
        if !ledger.try_spend_skill_points(1, events) {
            return false;
        }
        let ability = self.get_mut(kind);
        ability.level += 1;
        events.push(SimEvent::AbilityUpgraded {
            ability: kind,
            level: ability.level,
        });
        true
    }

    pub fn upgrade_named(
        &mut self,
        name: &str,
        ledger: &mut ResourceLedger,
        events: &mut Vec<SimEvent>,
    ) -> bool {
        match AbilityKind::from_name(name) {
            Some(kind) => self.upgrade(kind, ledger, events),
            None => {
                warn!("upgrade_ability: unknown ability name '{name}', ignoring");
                false
            }
        }
    }
}

impl Default for AbilityBook {
    fn default() -> Self {
        Self::new()
    }
}

fn eye_origin(kin: &CharacterKinematics) -> [f32; 3] {
    [
        kin.position.x,
        kin.position.y + movement::CHARACTER_HEIGHT * 0.5,
        kin.position.z,
    ]
}

/// Teleport destination along the view direction, pulled back to the
/// first obstruction.
fn teleport_destination(
    kin: &CharacterKinematics,
    range: f32,
    obstacles: &[(Entity, Aabb)],
) -> Vec3 {
    let forward = kin.forward();
    let boxes: Vec<Aabb> = obstacles.iter().map(|(_, aabb)| *aabb).collect();
    let hit = collision::ray_closest(eye_origin(kin), forward.to_array(), &boxes);
    let clearance = movement::CHARACTER_RADIUS + movement::COLLISION_MARGIN;
    let distance = match hit {
        Some((_, t)) if t < range => (t - clearance).max(0.0),
        _ => range,
    };
    kin.position + forward * distance
}

/// Default reconstruction target: first obstruction along the view
/// direction, if it is in range.
fn forward_target(
    kin: &CharacterKinematics,
    range: f32,
    obstacles: &[(Entity, Aabb)],
) -> Option<Entity> {
    let boxes: Vec<Aabb> = obstacles.iter().map(|(_, aabb)| *aabb).collect();
    let (index, t) = collision::ray_closest(eye_origin(kin), kin.forward().to_array(), &boxes)?;
    (t <= range).then(|| obstacles[index].0)
}

/// Use an ability by name; unknown names warn and no-op.
#[allow(clippy::too_many_arguments)]
pub fn use_ability_named(
    name: &str,
    book: &mut AbilityBook,
    ledger: &mut ResourceLedger,
    kin: &mut CharacterKinematics,
    world: &mut hecs::World,
    obstacles: &[(Entity, Aabb)],
    target: Option<AbilityTarget>,
    events: &mut Vec<SimEvent>,
) -> bool {
    match AbilityKind::from_name(name) {
        Some(kind) => use_ability(kind, book, ledger, kin, world, obstacles, target, events),
        None => {
            warn!("use_ability: unknown ability name '{name}', ignoring");
            false
        }
    }
}

/// Full activation pipeline: cooldown gate, target validation, energy
/// spend, stability cost, effect, cooldown start.
#[allow(clippy::too_many_arguments)]
pub fn use_ability(
    kind: AbilityKind,
    book: &mut AbilityBook,
    ledger: &mut ResourceLedger,
    kin: &mut CharacterKinematics,
    world: &mut hecs::World,
    obstacles: &[(Entity, Aabb)],
    target: Option<AbilityTarget>,
    events: &mut Vec<SimEvent>,
) -> bool {
    let ability = book.get(kind);
    if !ability.ready() {
        events.push(SimEvent::AbilityOnCooldown {
            ability: kind,
            remaining: ability.cooldown_remaining,
        });
        return false;
    }
    let stats = ability.stats();

    // Resolve and validate targeting before any resource is spent.
    let effect = match kind {
        AbilityKind::PhaseShift | AbilityKind::TimeDilation => PendingEffect::Activate,
        AbilityKind::QuantumTeleport => {
            let range = stats.range.unwrap_or(0.0);
            let destination = match target {
                Some(AbilityTarget::Point(point)) => {
                    let distance = kin.position.distance(&point);
                    if distance > range {
                        events.push(SimEvent::AbilityOutOfRange {
                            ability: kind,
                            distance,
                        });
                        return false;
                    }
                    point
                }
                Some(AbilityTarget::Object(_)) | None => {
                    teleport_destination(kin, range, obstacles)
                }
            };
            PendingEffect::Teleport(destination)
        }
        AbilityKind::MolecularReconstruction => {
            let range = stats.range.unwrap_or(0.0);
            match target {
                Some(AbilityTarget::Object(entity)) => {
                    let Ok(transform) = world.get::<&Transform>(entity).map(|t| *t) else {
                        warn!("reconstruction target {entity:?} has no transform, ignoring");
                        return false;
                    };
                    let distance = kin.position.distance(&transform.position);
                    if distance > range {
                        events.push(SimEvent::AbilityOutOfRange {
                            ability: kind,
                            distance,
                        });
                        return false;
                    }
                    PendingEffect::Repair(entity)
                }
                Some(AbilityTarget::Point(point)) => {
                    let distance = kin.position.distance(&point);
                    if distance > range {
                        events.push(SimEvent::AbilityOutOfRange {
                            ability: kind,
                            distance,
                        });
                        return false;
                    }
                    PendingEffect::SpawnConstruct(point)
                }
                None => match forward_target(kin, range, obstacles) {
                    Some(entity) if world.satisfies::<&Integrity>(entity).unwrap_or(false) => {
                        PendingEffect::Repair(entity)
                    }
                    _ => PendingEffect::SelfHeal,
                },
            }
        }
    };

    if !ledger.spend_quantum_energy(stats.energy_cost, Some(kind), events) {
        return false;
    }
    ledger.spend_stability(stats.stability_cost, kind.governing_attribute(), events);

    match effect {
        PendingEffect::Activate => {
            let ability = book.get_mut(kind);
            ability.active = true;
            ability.remaining_duration = stats.duration.unwrap_or(0.0);
            events.push(SimEvent::AbilityActivated { ability: kind });
        }
        PendingEffect::Teleport(destination) => {
            kin.position = destination;
            kin.velocity = Vec3::ZERO;
        }
        PendingEffect::Repair(entity) => {
            if let Ok(mut integrity) = world.get::<&mut Integrity>(entity) {
                integrity.value = (integrity.value + tuning::RECONSTRUCTION_HEAL).min(integrity.max);
            } else {
                warn!("reconstruction target {entity:?} has no integrity, nothing repaired");
            }
        }
        PendingEffect::SpawnConstruct(point) => {
            world.spawn((
                Transform::at(point),
                Construct::new(tuning::RECONSTRUCTION_CONSTRUCT_LIFETIME),
            ));
        }
        PendingEffect::SelfHeal => {
            ledger.heal(tuning::RECONSTRUCTION_HEAL, HealKind::Quantum, events);
        }
    }

    book.get_mut(kind).cooldown_remaining = stats.cooldown;
    events.push(SimEvent::AbilityUsed { ability: kind });
    true
}

enum PendingEffect {
    Activate,
    Teleport(Vec3),
    Repair(Entity),
    SpawnConstruct(Vec3),
    SelfHeal,
}

// --- JSON tuning manifest -------------------------------------------------

/// External tuning manifest (`data/ability_manifest.json`). Parsed with
/// serde_json so tools and the simtest harness share one source of
/// tuning truth with the engine defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AbilityManifest {
    pub version: u32,
    pub max_level: u8,
    pub abilities: Vec<ManifestAbility>,
    pub upgrade: ManifestDeltas,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ManifestAbility {
    pub name: String,
    pub energy_cost: f32,
    pub cooldown: f32,
    pub stability_cost: f32,
    #[serde(default)]
    pub duration: Option<f32>,
    #[serde(default)]
    pub range: Option<f32>,
    #[serde(default)]
    pub radius: Option<f32>,
    #[serde(default)]
    pub heal: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ManifestDeltas {
    pub energy_cost: f32,
    pub cooldown: f32,
    pub duration: f32,
    pub range: f32,
    pub radius: f32,
}

impl AbilityManifest {
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn stats_for(&self, kind: AbilityKind) -> Option<AbilityStats> {
        let entry = self.abilities.iter().find(|a| a.name == kind.name())?;
        Some(AbilityStats {
            energy_cost: entry.energy_cost,
            cooldown: entry.cooldown,
            stability_cost: entry.stability_cost,
            duration: entry.duration,
            range: entry.range,
            radius: entry.radius,
        })
    }

    /// Whether the manifest agrees with the built-in constant table.
    pub fn matches_defaults(&self) -> bool {
        if self.max_level != tuning::MAX_ABILITY_LEVEL || self.abilities.len() != 4 {
            return false;
        }
        if self.upgrade.energy_cost != tuning::UPGRADE_COST_DELTA
            || self.upgrade.cooldown != tuning::UPGRADE_COOLDOWN_DELTA
            || self.upgrade.duration != tuning::UPGRADE_DURATION_DELTA
            || self.upgrade.range != tuning::UPGRADE_RANGE_DELTA
            || self.upgrade.radius != tuning::UPGRADE_RADIUS_DELTA
        {
            return false;
        }
        AbilityKind::ALL
            .iter()
            .all(|&kind| self.stats_for(kind) == Some(AbilityStats::base(kind)))
    }
}
