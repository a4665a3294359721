//! The per-tick simulation driver.
//!
//! `CharacterSimulation` owns the four subsystems and invokes them in
//! the fixed order ledger → locomotion → abilities → interaction, then
//! runs scene-object upkeep. The order matters: regeneration and
//! cooldown decay settle before ability gating, and movement settles
//! before interaction-distance and targeting computations.

use std::io::{Read, Write};

use hecs::Entity;

use crate::abilities::{self, AbilityBook, AbilityKind, AbilityTarget};
use crate::events::SimEvent;
use crate::generation::{generate_chamber, Chamber, ChamberConfig};
use crate::interaction::{InteractionManager, Ray};
use crate::ledger::{ModifierHandle, ResourceLedger, StatId, StatusEffect};
use crate::locomotion::{self, CharacterKinematics};
use crate::persistence::{self, SaveError};
use crate::scene::Scene;
use phasewalker_logic::formulas::{DamageKind, HealKind};
use phasewalker_logic::kinematics::InputIntent;

/// Everything the embedder feeds the simulation each tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub intent: InputIntent,
    pub view_yaw: f32,
    pub third_person: bool,
    /// Screen-ray override for highlight picking, honored in third
    /// person only.
    pub pick_ray: Option<Ray>,
}

pub struct CharacterSimulation {
    pub scene: Scene,
    ledger: ResourceLedger,
    abilities: AbilityBook,
    kinematics: CharacterKinematics,
    interaction: InteractionManager,
    events: Vec<SimEvent>,
}

impl CharacterSimulation {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            ledger: ResourceLedger::new(),
            abilities: AbilityBook::new(),
            kinematics: CharacterKinematics::at(crate::components::Vec3::ZERO),
            interaction: InteractionManager::new(),
            events: Vec::new(),
        }
    }

    /// Populate the scene with a generated chamber.
    pub fn generate(&mut self, config: ChamberConfig) -> Chamber {
        generate_chamber(&mut self.scene, &config)
    }

    /// Advance the simulation by `delta_time` seconds.
    pub fn tick(&mut self, delta_time: f32, input: &TickInput) {
        self.ledger.tick(delta_time, &mut self.events);

        let obstacles = self.scene.obstacles();
        locomotion::step(
            &mut self.kinematics,
            delta_time,
            &input.intent,
            input.view_yaw,
            &obstacles,
            &mut self.events,
        );

        self.abilities.tick(delta_time, &mut self.events);

        let pick_ray = if input.third_person { input.pick_ray } else { None };
        self.interaction.tick(
            &mut self.scene,
            &self.kinematics,
            delta_time,
            pick_ray,
            &mut self.events,
        );

        self.scene.tick(delta_time);
    }

    /// Take all events queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    // --- read access -----------------------------------------------------

    pub fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }

    pub fn abilities(&self) -> &AbilityBook {
        &self.abilities
    }

    pub fn kinematics(&self) -> &CharacterKinematics {
        &self.kinematics
    }

    pub fn held_object(&self) -> Option<Entity> {
        self.interaction.held()
    }

    pub fn highlighted_object(&self) -> Option<Entity> {
        self.interaction.highlighted()
    }

    pub fn nearby_objects(&self) -> &[(Entity, f32)] {
        self.interaction.nearby()
    }

    // --- ledger operations -----------------------------------------------

    pub fn modify_stat(&mut self, stat: StatId, delta: f32) -> bool {
        self.ledger.modify_stat(stat, delta, &mut self.events)
    }

    pub fn modify_stat_named(&mut self, name: &str, delta: f32) -> bool {
        self.ledger.modify_stat_named(name, delta, &mut self.events)
    }

    pub fn add_modifier(&mut self, stat: StatId, amount: f32, source: &str) -> ModifierHandle {
        self.ledger.add_modifier(stat, amount, source, &mut self.events)
    }

    pub fn remove_modifier(&mut self, handle: ModifierHandle) -> bool {
        self.ledger.remove_modifier(handle, &mut self.events)
    }

    pub fn take_damage(&mut self, amount: f32, kind: DamageKind) {
        self.ledger.take_damage(amount, kind, &mut self.events);
    }

    pub fn heal(&mut self, amount: f32, kind: HealKind) {
        self.ledger.heal(amount, kind, &mut self.events);
    }

    pub fn add_experience(&mut self, amount: f32) {
        self.ledger.add_experience(amount, &mut self.events);
    }

    pub fn spend_skill_point(&mut self, stat: StatId, points: u32) -> bool {
        self.ledger.spend_skill_point(stat, points, &mut self.events)
    }

    pub fn add_status_effect(&mut self, effect: StatusEffect) {
        self.ledger.add_status_effect(effect);
    }

    pub fn remove_status_effect(&mut self, name: &str) -> bool {
        self.ledger.remove_status_effect(name, &mut self.events)
    }

    // --- abilities -------------------------------------------------------

    pub fn use_ability(&mut self, kind: AbilityKind, target: Option<AbilityTarget>) -> bool {
        let obstacles = self.scene.obstacles();
        abilities::use_ability(
            kind,
            &mut self.abilities,
            &mut self.ledger,
            &mut self.kinematics,
            &mut self.scene.world,
            &obstacles,
            target,
            &mut self.events,
        )
    }

    pub fn use_ability_named(&mut self, name: &str, target: Option<AbilityTarget>) -> bool {
        let obstacles = self.scene.obstacles();
        abilities::use_ability_named(
            name,
            &mut self.abilities,
            &mut self.ledger,
            &mut self.kinematics,
            &mut self.scene.world,
            &obstacles,
            target,
            &mut self.events,
        )
    }

    pub fn deactivate_ability(&mut self, kind: AbilityKind) -> bool {
        self.abilities.deactivate(kind, &mut self.events)
    }

    pub fn upgrade_ability(&mut self, kind: AbilityKind) -> bool {
        self.abilities.upgrade(kind, &mut self.ledger, &mut self.events)
    }

    pub fn upgrade_ability_named(&mut self, name: &str) -> bool {
        self.abilities
            .upgrade_named(name, &mut self.ledger, &mut self.events)
    }

    // --- interaction -----------------------------------------------------

    pub fn interact_with(&mut self, entity: Entity) -> bool {
        self.interaction
            .interact_with(entity, &mut self.scene, &self.kinematics, &mut self.events)
    }

    /// Interact with the highlighted object, falling back to the
    /// nearest object in reach.
    pub fn interact(&mut self) -> bool {
        let target = self
            .interaction
            .highlighted()
            .or_else(|| self.interaction.nearby().first().map(|(e, _)| *e));
        match target {
            Some(entity) => self.interact_with(entity),
            None => false,
        }
    }

    pub fn pickup_object(&mut self, entity: Entity) -> bool {
        self.interaction
            .pickup_object(entity, &mut self.scene, &self.kinematics, &mut self.events)
    }

    pub fn drop_object(&mut self) -> bool {
        self.interaction
            .drop_object(&mut self.scene, &self.kinematics, &mut self.events)
    }

    pub fn throw_object(&mut self, force: f32) -> bool {
        self.interaction
            .throw_object(force, &mut self.scene, &self.kinematics, &mut self.events)
    }

    // --- persistence -----------------------------------------------------

    pub fn save<W: Write>(&self, writer: W) -> Result<(), SaveError> {
        persistence::save(writer, &self.ledger, &self.abilities)
    }

    /// Restore a snapshot, resetting tick-local state (queued events
    /// are dropped).
    pub fn load<R: Read>(&mut self, reader: R) -> Result<(), SaveError> {
        let data = persistence::load(reader)?;
        data.restore(&mut self.ledger, &mut self.abilities);
        self.events.clear();
        Ok(())
    }
}

impl Default for CharacterSimulation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{InteractableKind, InteractableSpec, Vec3};

    const DT: f32 = 1.0 / 60.0;

    fn idle() -> TickInput {
        TickInput::default()
    }

    #[test]
    fn tick_regenerates_spent_pools() {
        let mut sim = CharacterSimulation::new();
        assert!(sim.use_ability(AbilityKind::PhaseShift, None));
        let before = sim.ledger().stat_value(StatId::QuantumEnergy);
        for _ in 0..60 {
            sim.tick(DT, &idle());
        }
        let after = sim.ledger().stat_value(StatId::QuantumEnergy);
        // 2.0/s energy regen over one second.
        assert!((after - before - 2.0).abs() < 0.05, "regen {}", after - before);
    }

    #[test]
    fn ability_cooldown_ticks_through_engine() {
        let mut sim = CharacterSimulation::new();
        assert!(sim.use_ability(AbilityKind::QuantumTeleport, None));
        assert!(!sim.use_ability(AbilityKind::QuantumTeleport, None));
        for _ in 0..500 {
            sim.tick(DT, &idle());
        }
        assert!(sim.abilities().get(AbilityKind::QuantumTeleport).ready());
        assert!(sim
            .drain_events()
            .iter()
            .any(|e| matches!(e, SimEvent::AbilityCooldownComplete { .. })));
    }

    #[test]
    fn drain_events_empties_the_queue() {
        let mut sim = CharacterSimulation::new();
        sim.take_damage(10.0, DamageKind::Physical);
        assert!(!sim.drain_events().is_empty());
        assert!(sim.drain_events().is_empty());
    }

    #[test]
    fn walk_through_generated_chamber() {
        let mut sim = CharacterSimulation::new();
        sim.generate(ChamberConfig { seed: 7, ..ChamberConfig::default() });
        let input = TickInput {
            intent: InputIntent {
                forward: true,
                sprint: true,
                ..InputIntent::idle()
            },
            ..TickInput::default()
        };
        // Sprint at a wall for five seconds; the perimeter holds.
        for _ in 0..300 {
            sim.tick(DT, &input);
        }
        let position = sim.kinematics().position;
        assert!(position.z.abs() < 20.0, "escaped the chamber: {position:?}");
        assert!(sim
            .drain_events()
            .iter()
            .any(|e| matches!(e, SimEvent::Collision { .. })));
    }

    #[test]
    fn highlight_then_interact_via_engine() {
        let mut sim = CharacterSimulation::new();
        let lever = sim.scene.spawn_interactable(
            InteractableSpec::new(InteractableKind::Use, Vec3::new(0.0, 0.9, -2.0))
                .sized(Vec3::new(0.3, 0.3, 0.3)),
        );
        sim.tick(DT, &idle());
        assert_eq!(sim.highlighted_object(), Some(lever));
        assert!(sim.interact());
        assert!(sim
            .drain_events()
            .iter()
            .any(|e| matches!(e, SimEvent::ObjectUsed { active: true, .. })));
    }

    #[test]
    fn pickup_ride_and_throw_via_engine() {
        let mut sim = CharacterSimulation::new();
        let item = sim.scene.spawn_interactable(InteractableSpec::new(
            InteractableKind::Pickup,
            Vec3::new(0.0, 0.25, -1.0),
        ));
        assert!(sim.pickup_object(item));
        assert_eq!(sim.held_object(), Some(item));
        // Carried object tracks the character while walking.
        let input = TickInput {
            intent: InputIntent {
                forward: true,
                ..InputIntent::idle()
            },
            ..TickInput::default()
        };
        for _ in 0..30 {
            sim.tick(DT, &input);
        }
        let carried = sim.scene.world_position(item).unwrap();
        let character = sim.kinematics().position;
        assert!(carried.distance(&character) < 2.0);

        assert!(sim.throw_object(10.0));
        assert_eq!(sim.held_object(), None);
        // The thrown object flies ahead and falls to rest.
        for _ in 0..180 {
            sim.tick(DT, &idle());
        }
        let rest = sim.scene.world_position(item).unwrap();
        assert!(rest.z < character.z, "thrown object did not travel forward");
        assert!((rest.y - 0.25).abs() < 0.01);
    }

    #[test]
    fn dead_character_still_ticks() {
        let mut sim = CharacterSimulation::new();
        sim.take_damage(500.0, DamageKind::Physical);
        assert!(!sim.ledger().is_alive());
        for _ in 0..10 {
            sim.tick(DT, &idle());
        }
        let deaths = sim
            .drain_events()
            .iter()
            .filter(|e| matches!(e, SimEvent::Died))
            .count();
        assert_eq!(deaths, 1);
    }

    #[test]
    fn save_load_round_trip_through_engine() {
        let mut sim = CharacterSimulation::new();
        sim.add_experience(300.0);
        sim.upgrade_ability(AbilityKind::TimeDilation);
        assert!(sim.use_ability(AbilityKind::PhaseShift, None));

        let mut buffer = Vec::new();
        sim.save(&mut buffer).unwrap();

        let mut restored = CharacterSimulation::new();
        restored.load(buffer.as_slice()).unwrap();
        for stat in StatId::ALL {
            assert_eq!(
                restored.ledger().stat_value(stat),
                sim.ledger().stat_value(stat),
                "{}",
                stat.name()
            );
        }
        assert_eq!(
            restored.abilities().get(AbilityKind::TimeDilation).level,
            2
        );
        assert!(restored.abilities().get(AbilityKind::PhaseShift).active);
        assert!(restored.drain_events().is_empty());
    }

    #[test]
    fn named_operations_reach_the_subsystems() {
        let mut sim = CharacterSimulation::new();
        assert!(sim.modify_stat_named("quantumControl", 10.0));
        assert_eq!(sim.ledger().stat_value(StatId::QuantumControl), 10.0);
        assert!(sim.use_ability_named("quantumTeleport", None));
        assert!(!sim.use_ability_named("notAnAbility", None));
    }
}
