//! Resource ledger — stats, modifiers, damage, healing, progression,
//! and timed status effects.
//!
//! The ledger is the only writer of character resource state. Every
//! mutation goes through [`ResourceLedger`] methods so the clamp
//! invariant (each stat stays within its declared `[min_allowed, cap]`
//! range) holds after any call. Expected refusals return `false` and
//! push a descriptive event; unknown stat names log a warning and
//! no-op so a bad call never halts the tick.

use std::collections::HashMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::events::SimEvent;
use phasewalker_logic::constants::{progression, resources};
use phasewalker_logic::formulas::{
    self, round_to_tenth, DamageKind, HealKind,
};
use phasewalker_logic::leveling;

/// Every stat the ledger tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatId {
    Health,
    MaxHealth,
    QuantumEnergy,
    MaxQuantumEnergy,
    QuantumStability,
    MaxQuantumStability,
    ScientificKnowledge,
    MaxScientificKnowledge,
    QuantumControl,
    TemporalControl,
    RadiationResistance,
    TemporalResistance,
    QuantumResistance,
    TemporalCoherence,
    DimensionalSynchronicity,
    Experience,
}

impl StatId {
    pub const ALL: [StatId; 16] = [
        StatId::Health,
        StatId::MaxHealth,
        StatId::QuantumEnergy,
        StatId::MaxQuantumEnergy,
        StatId::QuantumStability,
        StatId::MaxQuantumStability,
        StatId::ScientificKnowledge,
        StatId::MaxScientificKnowledge,
        StatId::QuantumControl,
        StatId::TemporalControl,
        StatId::RadiationResistance,
        StatId::TemporalResistance,
        StatId::QuantumResistance,
        StatId::TemporalCoherence,
        StatId::DimensionalSynchronicity,
        StatId::Experience,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StatId::Health => "health",
            StatId::MaxHealth => "maxHealth",
            StatId::QuantumEnergy => "quantumEnergy",
            StatId::MaxQuantumEnergy => "maxQuantumEnergy",
            StatId::QuantumStability => "quantumStability",
            StatId::MaxQuantumStability => "maxQuantumStability",
            StatId::ScientificKnowledge => "scientificKnowledge",
            StatId::MaxScientificKnowledge => "maxScientificKnowledge",
            StatId::QuantumControl => "quantumControl",
            StatId::TemporalControl => "temporalControl",
            StatId::RadiationResistance => "radiationResistance",
            StatId::TemporalResistance => "temporalResistance",
            StatId::QuantumResistance => "quantumResistance",
            StatId::TemporalCoherence => "temporalCoherence",
            StatId::DimensionalSynchronicity => "dimensionalSynchronicity",
            StatId::Experience => "experience",
        }
    }

    pub fn from_name(name: &str) -> Option<StatId> {
        StatId::ALL.iter().copied().find(|s| s.name() == name)
    }

    /// Declared bounds for this stat. Temporal coherence and
    /// dimensional synchronicity are the only stats allowed below zero.
    pub fn def(self) -> StatDef {
        match self {
            StatId::Health => StatDef::pool(StatId::MaxHealth),
            StatId::QuantumEnergy => StatDef::pool(StatId::MaxQuantumEnergy),
            StatId::QuantumStability => StatDef::pool(StatId::MaxQuantumStability),
            StatId::ScientificKnowledge => StatDef::pool(StatId::MaxScientificKnowledge),
            StatId::MaxHealth
            | StatId::MaxQuantumEnergy
            | StatId::MaxQuantumStability
            | StatId::MaxScientificKnowledge
            | StatId::QuantumControl
            | StatId::TemporalControl
            | StatId::Experience => StatDef::unbounded_above(),
            StatId::RadiationResistance
            | StatId::TemporalResistance
            | StatId::QuantumResistance => StatDef::percentage(),
            StatId::TemporalCoherence | StatId::DimensionalSynchronicity => {
                StatDef::negative_capable()
            }
        }
    }
}

/// Upper bound rule for a stat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CapRule {
    None,
    /// Capped by the current value of another stat.
    Stat(StatId),
    Fixed(f32),
}

/// Declared bounds for one stat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatDef {
    pub min_allowed: f32,
    pub cap: CapRule,
}

impl StatDef {
    fn pool(max_stat: StatId) -> Self {
        Self {
            min_allowed: 0.0,
            cap: CapRule::Stat(max_stat),
        }
    }

    fn unbounded_above() -> Self {
        Self {
            min_allowed: 0.0,
            cap: CapRule::None,
        }
    }

    fn percentage() -> Self {
        Self {
            min_allowed: 0.0,
            cap: CapRule::Fixed(100.0),
        }
    }

    fn negative_capable() -> Self {
        Self {
            min_allowed: f32::NEG_INFINITY,
            cap: CapRule::Fixed(100.0),
        }
    }
}

/// Opaque receipt for an applied modifier. Removing a modifier
/// consumes its handle, so mismatched add/remove pairs cannot
/// double-apply or orphan deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModifierHandle(u64);

/// One additive stat modifier with its source tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Modifier {
    pub handle: ModifierHandle,
    pub stat: StatId,
    pub amount: f32,
    pub source: String,
}

/// Data-driven effect applied by status-effect timers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EffectAction {
    ModifyStat { stat: StatId, delta: f32 },
    Damage { amount: f32, kind: DamageKind },
    Heal { amount: f32, kind: HealKind },
}

/// A named timed effect with optional periodic and on-remove actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEffect {
    pub name: String,
    pub remaining: f32,
    /// Interval between periodic action applications, if any.
    pub period: Option<f32>,
    pub period_timer: f32,
    pub on_tick: Option<EffectAction>,
    pub on_remove: Option<EffectAction>,
}

impl StatusEffect {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            remaining: duration,
            period: None,
            period_timer: 0.0,
            on_tick: None,
            on_remove: None,
        }
    }

    pub fn periodic(mut self, period: f32, action: EffectAction) -> Self {
        self.period = Some(period);
        self.period_timer = period;
        self.on_tick = Some(action);
        self
    }

    pub fn on_remove(mut self, action: EffectAction) -> Self {
        self.on_remove = Some(action);
        self
    }
}

/// The character's resource pool and progression state.
#[derive(Debug, Clone)]
pub struct ResourceLedger {
    pub(crate) base: HashMap<StatId, f32>,
    pub(crate) level: u32,
    pub(crate) skill_points: u32,
    pub(crate) modifiers: Vec<Modifier>,
    pub(crate) next_handle: u64,
    pub(crate) status_effects: Vec<StatusEffect>,
    pub(crate) alive: bool,
}

impl ResourceLedger {
    pub fn new() -> Self {
        let mut base = HashMap::new();
        base.insert(StatId::Health, resources::STARTING_HEALTH);
        base.insert(StatId::MaxHealth, resources::STARTING_HEALTH);
        base.insert(StatId::QuantumEnergy, resources::STARTING_QUANTUM_ENERGY);
        base.insert(StatId::MaxQuantumEnergy, resources::STARTING_QUANTUM_ENERGY);
        base.insert(
            StatId::QuantumStability,
            resources::STARTING_QUANTUM_STABILITY,
        );
        base.insert(
            StatId::MaxQuantumStability,
            resources::STARTING_QUANTUM_STABILITY,
        );
        base.insert(
            StatId::ScientificKnowledge,
            resources::STARTING_SCIENTIFIC_KNOWLEDGE,
        );
        base.insert(
            StatId::MaxScientificKnowledge,
            resources::MAX_SCIENTIFIC_KNOWLEDGE,
        );
        base.insert(StatId::QuantumControl, 0.0);
        base.insert(StatId::TemporalControl, 0.0);
        base.insert(StatId::RadiationResistance, 0.0);
        base.insert(StatId::TemporalResistance, 0.0);
        base.insert(StatId::QuantumResistance, 0.0);
        base.insert(StatId::TemporalCoherence, 100.0);
        base.insert(StatId::DimensionalSynchronicity, 100.0);
        base.insert(StatId::Experience, 0.0);

        Self {
            base,
            level: 1,
            skill_points: 0,
            modifiers: Vec::new(),
            next_handle: 1,
            status_effects: Vec::new(),
            alive: true,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn skill_points(&self) -> u32 {
        self.skill_points
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn status_effects(&self) -> &[StatusEffect] {
        &self.status_effects
    }

    fn modifier_sum(&self, stat: StatId) -> f32 {
        self.modifiers
            .iter()
            .filter(|m| m.stat == stat)
            .map(|m| m.amount)
            .sum()
    }

    fn clamp_for(&self, stat: StatId, raw: f32) -> f32 {
        let def = stat.def();
        let upper = match def.cap {
            CapRule::None => f32::INFINITY,
            CapRule::Fixed(max) => max,
            CapRule::Stat(max_stat) => self.stat_value(max_stat),
        };
        raw.clamp(def.min_allowed, upper)
    }

    /// Current value: base plus modifiers, clamped per the stat's
    /// declared bounds.
    pub fn stat_value(&self, stat: StatId) -> f32 {
        let raw = self.base.get(&stat).copied().unwrap_or(0.0) + self.modifier_sum(stat);
        self.clamp_for(stat, raw)
    }

    /// Apply a delta to a stat's base value, clamped so the visible
    /// value stays in range. Emits `StatChanged` when the visible value
    /// moved. Positive experience mutations run the level-up check.
    pub fn modify_stat(&mut self, stat: StatId, delta: f32, events: &mut Vec<SimEvent>) -> bool {
        let old = self.stat_value(stat);
        let mods = self.modifier_sum(stat);
        let base = self.base.get(&stat).copied().unwrap_or(0.0);
        let clamped = self.clamp_for(stat, base + delta + mods);
        self.base.insert(stat, clamped - mods);
        let new = self.stat_value(stat);
        if (new - old).abs() > f32::EPSILON {
            events.push(SimEvent::StatChanged { stat, old, new });
        }
        if stat == StatId::Experience && delta > 0.0 {
            self.check_level_ups(events);
        }
        true
    }

    /// Name-based variant for callers outside the typed API. Unknown
    /// names warn and no-op.
    pub fn modify_stat_named(
        &mut self,
        name: &str,
        delta: f32,
        events: &mut Vec<SimEvent>,
    ) -> bool {
        match StatId::from_name(name) {
            Some(stat) => self.modify_stat(stat, delta, events),
            None => {
                warn!("modify_stat: unknown stat name '{name}', ignoring");
                false
            }
        }
    }

    /// Add an additive modifier; returns the handle that removes it.
    pub fn add_modifier(
        &mut self,
        stat: StatId,
        amount: f32,
        source: impl Into<String>,
        events: &mut Vec<SimEvent>,
    ) -> ModifierHandle {
        let old = self.stat_value(stat);
        let handle = ModifierHandle(self.next_handle);
        self.next_handle += 1;
        self.modifiers.push(Modifier {
            handle,
            stat,
            amount,
            source: source.into(),
        });
        let new = self.stat_value(stat);
        if (new - old).abs() > f32::EPSILON {
            events.push(SimEvent::StatChanged { stat, old, new });
        }
        handle
    }

    /// Remove a modifier by handle. A stale or duplicate handle returns
    /// false and changes nothing.
    pub fn remove_modifier(&mut self, handle: ModifierHandle, events: &mut Vec<SimEvent>) -> bool {
        let Some(index) = self.modifiers.iter().position(|m| m.handle == handle) else {
            return false;
        };
        let stat = self.modifiers[index].stat;
        let old = self.stat_value(stat);
        self.modifiers.remove(index);
        let new = self.stat_value(stat);
        if (new - old).abs() > f32::EPSILON {
            events.push(SimEvent::StatChanged { stat, old, new });
        }
        true
    }

    /// Apply incoming damage scaled by the matching resistance,
    /// rounded to 0.1. Emits `Died` exactly once at zero health.
    pub fn take_damage(&mut self, amount: f32, kind: DamageKind, events: &mut Vec<SimEvent>) {
        let resistance = match kind {
            DamageKind::Physical => 0.0,
            DamageKind::Radiation => self.stat_value(StatId::RadiationResistance),
            DamageKind::Temporal => self.stat_value(StatId::TemporalResistance),
            DamageKind::Quantum => self.stat_value(StatId::QuantumResistance),
        };
        let actual = formulas::damage_after_resistance(amount, resistance);
        self.modify_stat(StatId::Health, -actual, events);
        events.push(SimEvent::DamageTaken {
            amount: actual,
            kind,
        });
        if self.alive && self.stat_value(StatId::Health) <= 0.0 {
            self.alive = false;
            events.push(SimEvent::Died);
        }
    }

    /// Heal the character. Quantum healing scales with current
    /// stability before applying.
    pub fn heal(&mut self, amount: f32, kind: HealKind, events: &mut Vec<SimEvent>) {
        let effective = match kind {
            HealKind::Standard => round_to_tenth(amount),
            HealKind::Quantum => formulas::quantum_heal_amount(
                amount,
                self.stat_value(StatId::QuantumStability),
            ),
        };
        self.modify_stat(StatId::Health, effective, events);
        events.push(SimEvent::Healed {
            amount: effective,
            kind,
        });
    }

    /// Spend quantum energy, refusing when the pool is short.
    pub fn spend_quantum_energy(
        &mut self,
        amount: f32,
        for_ability: Option<crate::abilities::AbilityKind>,
        events: &mut Vec<SimEvent>,
    ) -> bool {
        let available = self.stat_value(StatId::QuantumEnergy);
        if available < amount {
            events.push(SimEvent::InsufficientEnergy {
                required: amount,
                available,
            });
            return false;
        }
        self.modify_stat(StatId::QuantumEnergy, -amount, events);
        events.push(SimEvent::EnergySpent {
            amount,
            ability: for_ability,
        });
        true
    }

    /// Drain stability for an ability use, discounted by the governing
    /// attribute. Returns the actual cost paid.
    pub fn spend_stability(
        &mut self,
        base_cost: f32,
        governing_attribute: StatId,
        events: &mut Vec<SimEvent>,
    ) -> f32 {
        let attribute = self.stat_value(governing_attribute);
        let cost = formulas::stability_cost(base_cost, attribute);
        self.modify_stat(StatId::QuantumStability, -cost, events);
        cost
    }

    /// Award experience; may chain several level-ups in one call.
    pub fn add_experience(&mut self, amount: f32, events: &mut Vec<SimEvent>) {
        self.modify_stat(StatId::Experience, amount, events);
    }

    fn check_level_ups(&mut self, events: &mut Vec<SimEvent>) {
        let experience = self.stat_value(StatId::Experience);
        let gained = leveling::levels_gained(self.level, experience);
        for _ in 0..gained {
            self.level += 1;
            let grants = leveling::LevelUpGrants::per_level();
            self.skill_points += grants.skill_points;
            self.modify_stat(StatId::MaxHealth, grants.max_health, events);
            self.modify_stat(StatId::MaxQuantumEnergy, grants.max_energy, events);
            self.modify_stat(StatId::MaxQuantumStability, grants.max_stability, events);
            self.refill(StatId::Health, StatId::MaxHealth, events);
            self.refill(StatId::QuantumEnergy, StatId::MaxQuantumEnergy, events);
            self.refill(StatId::QuantumStability, StatId::MaxQuantumStability, events);
            events.push(SimEvent::LevelUp { level: self.level });
        }
    }

    fn refill(&mut self, pool: StatId, max_stat: StatId, events: &mut Vec<SimEvent>) {
        let deficit = self.stat_value(max_stat) - self.stat_value(pool);
        if deficit > 0.0 {
            self.modify_stat(pool, deficit, events);
        }
    }

    /// Consume raw skill points (ability upgrades). Refusal emits
    /// `InsufficientSkillPoints`.
    pub fn try_spend_skill_points(&mut self, points: u32, events: &mut Vec<SimEvent>) -> bool {
        if self.skill_points < points {
            events.push(SimEvent::InsufficientSkillPoints {
                required: points,
                available: self.skill_points,
            });
            return false;
        }
        self.skill_points -= points;
        true
    }

    /// Spend skill points on an improvable stat. Max-capacity stats
    /// also restore their pool by the same increment.
    pub fn spend_skill_point(
        &mut self,
        stat: StatId,
        points: u32,
        events: &mut Vec<SimEvent>,
    ) -> bool {
        let (increment, pool) = match stat {
            StatId::MaxHealth => (
                progression::SKILL_INCREMENT_MAX_HEALTH,
                Some(StatId::Health),
            ),
            StatId::MaxQuantumEnergy => (
                progression::SKILL_INCREMENT_MAX_ENERGY,
                Some(StatId::QuantumEnergy),
            ),
            StatId::MaxQuantumStability => (
                progression::SKILL_INCREMENT_MAX_STABILITY,
                Some(StatId::QuantumStability),
            ),
            StatId::QuantumControl => (progression::SKILL_INCREMENT_QUANTUM_CONTROL, None),
            StatId::TemporalControl => (progression::SKILL_INCREMENT_TEMPORAL_CONTROL, None),
            StatId::ScientificKnowledge => (progression::SKILL_INCREMENT_KNOWLEDGE, None),
            _ => return false,
        };
        if !self.try_spend_skill_points(points, events) {
            return false;
        }
        let total = increment * points as f32;
        self.modify_stat(stat, total, events);
        if let Some(pool) = pool {
            self.modify_stat(pool, total, events);
        }
        events.push(SimEvent::SkillPointSpent { stat, points });
        true
    }

    /// Add (or refresh) a named status effect.
    pub fn add_status_effect(&mut self, effect: StatusEffect) {
        self.status_effects.retain(|e| e.name != effect.name);
        self.status_effects.push(effect);
    }

    /// Remove a status effect by name, applying its on-remove action
    /// exactly once. Unknown names return false.
    pub fn remove_status_effect(&mut self, name: &str, events: &mut Vec<SimEvent>) -> bool {
        let Some(index) = self.status_effects.iter().position(|e| e.name == name) else {
            return false;
        };
        let effect = self.status_effects.remove(index);
        if let Some(action) = effect.on_remove {
            self.apply_action(&action, events);
        }
        true
    }

    fn apply_action(&mut self, action: &EffectAction, events: &mut Vec<SimEvent>) {
        match action {
            EffectAction::ModifyStat { stat, delta } => {
                self.modify_stat(*stat, *delta, events);
            }
            EffectAction::Damage { amount, kind } => self.take_damage(*amount, *kind, events),
            EffectAction::Heal { amount, kind } => self.heal(*amount, *kind, events),
        }
    }

    /// Per-tick upkeep: regeneration and status-effect timers.
    pub fn tick(&mut self, delta_time: f32, events: &mut Vec<SimEvent>) {
        self.modify_stat(
            StatId::QuantumEnergy,
            resources::ENERGY_REGEN_PER_SEC * delta_time,
            events,
        );
        self.modify_stat(
            StatId::QuantumStability,
            resources::STABILITY_REGEN_PER_SEC * delta_time,
            events,
        );

        // Take the list out so actions can re-borrow the ledger.
        let mut effects = std::mem::take(&mut self.status_effects);
        let mut kept = Vec::with_capacity(effects.len());
        for mut effect in effects.drain(..) {
            effect.remaining -= delta_time;
            if let Some(period) = effect.period {
                effect.period_timer -= delta_time;
                while effect.period_timer <= 0.0 {
                    if let Some(action) = &effect.on_tick {
                        self.apply_action(action, events);
                    }
                    effect.period_timer += period;
                }
            }
            if effect.remaining <= 0.0 {
                if let Some(action) = effect.on_remove.take() {
                    self.apply_action(&action, events);
                }
            } else {
                kept.push(effect);
            }
        }
        // Effects added by actions during the tick land after the kept set.
        kept.append(&mut self.status_effects);
        self.status_effects = kept;
    }
}

impl Default for ResourceLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> (ResourceLedger, Vec<SimEvent>) {
        (ResourceLedger::new(), Vec::new())
    }

    #[test]
    fn starting_pools_full() {
        let (l, _) = ledger();
        assert_eq!(l.stat_value(StatId::Health), 100.0);
        assert_eq!(l.stat_value(StatId::QuantumEnergy), 100.0);
        assert_eq!(l.stat_value(StatId::QuantumStability), 100.0);
        assert_eq!(l.level(), 1);
        assert!(l.is_alive());
    }

    #[test]
    fn stat_names_round_trip() {
        for stat in StatId::ALL {
            assert_eq!(StatId::from_name(stat.name()), Some(stat));
        }
        assert_eq!(StatId::from_name("notAStat"), None);
    }

    #[test]
    fn modify_clamps_to_max() {
        let (mut l, mut ev) = ledger();
        l.modify_stat(StatId::Health, 500.0, &mut ev);
        assert_eq!(l.stat_value(StatId::Health), 100.0);
    }

    #[test]
    fn modify_clamps_to_zero() {
        let (mut l, mut ev) = ledger();
        l.modify_stat(StatId::Health, -500.0, &mut ev);
        assert_eq!(l.stat_value(StatId::Health), 0.0);
    }

    #[test]
    fn negative_capable_stats_go_below_zero() {
        let (mut l, mut ev) = ledger();
        l.modify_stat(StatId::TemporalCoherence, -150.0, &mut ev);
        assert_eq!(l.stat_value(StatId::TemporalCoherence), -50.0);
        l.modify_stat(StatId::DimensionalSynchronicity, -250.0, &mut ev);
        assert_eq!(l.stat_value(StatId::DimensionalSynchronicity), -150.0);
        // But they still cap at 100 above.
        l.modify_stat(StatId::TemporalCoherence, 10_000.0, &mut ev);
        assert_eq!(l.stat_value(StatId::TemporalCoherence), 100.0);
    }

    #[test]
    fn unknown_stat_name_is_noop() {
        let (mut l, mut ev) = ledger();
        assert!(!l.modify_stat_named("flibbertigibbet", 10.0, &mut ev));
        assert!(ev.is_empty());
    }

    #[test]
    fn stat_changed_event_carries_old_and_new() {
        let (mut l, mut ev) = ledger();
        l.modify_stat(StatId::Health, -30.0, &mut ev);
        assert!(matches!(
            ev[0],
            SimEvent::StatChanged {
                stat: StatId::Health,
                old,
                new
            } if old == 100.0 && new == 70.0
        ));
    }

    #[test]
    fn modifier_handle_symmetry() {
        let (mut l, mut ev) = ledger();
        let handle = l.add_modifier(StatId::MaxHealth, 20.0, "relic", &mut ev);
        assert_eq!(l.stat_value(StatId::MaxHealth), 120.0);
        assert!(l.remove_modifier(handle, &mut ev));
        assert_eq!(l.stat_value(StatId::MaxHealth), 100.0);
        // Stale handle: refused, nothing changes.
        assert!(!l.remove_modifier(handle, &mut ev));
        assert_eq!(l.stat_value(StatId::MaxHealth), 100.0);
    }

    #[test]
    fn modifiers_stack_without_dedup() {
        let (mut l, mut ev) = ledger();
        let a = l.add_modifier(StatId::QuantumControl, 5.0, "suit", &mut ev);
        let b = l.add_modifier(StatId::QuantumControl, 5.0, "suit", &mut ev);
        assert_eq!(l.stat_value(StatId::QuantumControl), 10.0);
        assert_ne!(a, b);
    }

    #[test]
    fn radiation_damage_scenario() {
        // Acceptance: health 100, radiation resistance 50,
        // takeDamage(50, radiation) → actual 25.0, health 75.0.
        let (mut l, mut ev) = ledger();
        l.modify_stat(StatId::RadiationResistance, 50.0, &mut ev);
        l.take_damage(50.0, DamageKind::Radiation, &mut ev);
        assert_eq!(l.stat_value(StatId::Health), 75.0);
        assert!(ev.iter().any(|e| matches!(
            e,
            SimEvent::DamageTaken { amount, kind: DamageKind::Radiation } if *amount == 25.0
        )));
    }

    #[test]
    fn physical_damage_unresisted() {
        let (mut l, mut ev) = ledger();
        l.modify_stat(StatId::RadiationResistance, 90.0, &mut ev);
        l.take_damage(40.0, DamageKind::Physical, &mut ev);
        assert_eq!(l.stat_value(StatId::Health), 60.0);
    }

    #[test]
    fn died_emitted_exactly_once() {
        let (mut l, mut ev) = ledger();
        l.take_damage(150.0, DamageKind::Physical, &mut ev);
        l.take_damage(10.0, DamageKind::Physical, &mut ev);
        let deaths = ev.iter().filter(|e| matches!(e, SimEvent::Died)).count();
        assert_eq!(deaths, 1);
        assert!(!l.is_alive());
        assert_eq!(l.stat_value(StatId::Health), 0.0);
    }

    #[test]
    fn quantum_heal_scales_with_stability() {
        let (mut l, mut ev) = ledger();
        l.take_damage(60.0, DamageKind::Physical, &mut ev);
        l.modify_stat(StatId::QuantumStability, -50.0, &mut ev);
        ev.clear();
        l.heal(40.0, HealKind::Quantum, &mut ev);
        // 40 × (50/100) = 20
        assert_eq!(l.stat_value(StatId::Health), 60.0);
        assert!(ev.iter().any(|e| matches!(
            e,
            SimEvent::Healed { amount, kind: HealKind::Quantum } if *amount == 20.0
        )));
    }

    #[test]
    fn energy_spend_refusal() {
        let (mut l, mut ev) = ledger();
        l.modify_stat(StatId::QuantumEnergy, -90.0, &mut ev);
        ev.clear();
        assert!(!l.spend_quantum_energy(25.0, None, &mut ev));
        assert_eq!(l.stat_value(StatId::QuantumEnergy), 10.0);
        assert!(matches!(
            ev[0],
            SimEvent::InsufficientEnergy { required, available }
                if required == 25.0 && available == 10.0
        ));
    }

    #[test]
    fn stability_cost_uses_attribute() {
        let (mut l, mut ev) = ledger();
        l.modify_stat(StatId::QuantumControl, 100.0, &mut ev);
        let cost = l.spend_stability(10.0, StatId::QuantumControl, &mut ev);
        assert_eq!(cost, 5.0);
        assert_eq!(l.stat_value(StatId::QuantumStability), 95.0);
    }

    #[test]
    fn level_up_scenario() {
        // Acceptance: level 1, 90 XP, +20 → level 2, +3 SP, maxHealth
        // +10 and refilled.
        let (mut l, mut ev) = ledger();
        l.take_damage(30.0, DamageKind::Physical, &mut ev);
        l.add_experience(90.0, &mut ev);
        assert_eq!(l.level(), 1);
        ev.clear();
        l.add_experience(20.0, &mut ev);
        assert_eq!(l.level(), 2);
        assert_eq!(l.skill_points(), 3);
        assert_eq!(l.stat_value(StatId::MaxHealth), 110.0);
        assert_eq!(l.stat_value(StatId::Health), 110.0);
        assert_eq!(l.stat_value(StatId::MaxQuantumEnergy), 115.0);
        assert_eq!(l.stat_value(StatId::QuantumEnergy), 115.0);
        assert!(ev
            .iter()
            .any(|e| matches!(e, SimEvent::LevelUp { level: 2 })));
    }

    #[test]
    fn chained_level_ups_in_one_award() {
        let (mut l, mut ev) = ledger();
        l.add_experience(500.0, &mut ev);
        // Crosses 100, 250, 450.
        assert_eq!(l.level(), 4);
        assert_eq!(l.skill_points(), 9);
        let level_ups = ev
            .iter()
            .filter(|e| matches!(e, SimEvent::LevelUp { .. }))
            .count();
        assert_eq!(level_ups, 3);
    }

    #[test]
    fn skill_point_spend_on_max_stat_restores_pool() {
        let (mut l, mut ev) = ledger();
        l.add_experience(100.0, &mut ev);
        l.take_damage(50.0, DamageKind::Physical, &mut ev);
        let before = l.stat_value(StatId::Health);
        assert!(l.spend_skill_point(StatId::MaxHealth, 1, &mut ev));
        assert_eq!(l.stat_value(StatId::MaxHealth), 120.0);
        assert_eq!(l.stat_value(StatId::Health), before + 10.0);
        assert_eq!(l.skill_points(), 2);
    }

    #[test]
    fn skill_point_spend_refusals() {
        let (mut l, mut ev) = ledger();
        // No points yet.
        assert!(!l.spend_skill_point(StatId::MaxHealth, 1, &mut ev));
        assert!(ev
            .iter()
            .any(|e| matches!(e, SimEvent::InsufficientSkillPoints { .. })));
        // Not improvable.
        l.add_experience(100.0, &mut ev);
        assert!(!l.spend_skill_point(StatId::Health, 1, &mut ev));
        assert_eq!(l.skill_points(), 3);
    }

    #[test]
    fn regeneration_respects_caps() {
        let (mut l, mut ev) = ledger();
        l.modify_stat(StatId::QuantumEnergy, -10.0, &mut ev);
        l.tick(2.0, &mut ev);
        // 2.0/s × 2 s = 4 regenerated.
        assert_eq!(l.stat_value(StatId::QuantumEnergy), 94.0);
        l.tick(100.0, &mut ev);
        assert_eq!(l.stat_value(StatId::QuantumEnergy), 100.0);
    }

    #[test]
    fn periodic_status_effect_fires_on_rollover() {
        let (mut l, mut ev) = ledger();
        l.add_status_effect(
            StatusEffect::new("radiation burn", 3.0).periodic(
                1.0,
                EffectAction::Damage {
                    amount: 5.0,
                    kind: DamageKind::Physical,
                },
            ),
        );
        l.tick(1.0, &mut ev);
        assert_eq!(l.stat_value(StatId::Health), 95.0);
        l.tick(1.0, &mut ev);
        assert_eq!(l.stat_value(StatId::Health), 90.0);
    }

    #[test]
    fn status_effect_expiry_applies_on_remove_once() {
        let (mut l, mut ev) = ledger();
        l.add_status_effect(
            StatusEffect::new("temporal shield", 1.0).on_remove(EffectAction::ModifyStat {
                stat: StatId::TemporalCoherence,
                delta: -10.0,
            }),
        );
        l.tick(0.6, &mut ev);
        assert_eq!(l.stat_value(StatId::TemporalCoherence), 100.0);
        l.tick(0.6, &mut ev);
        assert_eq!(l.stat_value(StatId::TemporalCoherence), 90.0);
        assert!(l.status_effects().is_empty());
        // Further ticks apply nothing more.
        l.tick(1.0, &mut ev);
        assert_eq!(l.stat_value(StatId::TemporalCoherence), 90.0);
    }

    #[test]
    fn explicit_remove_applies_on_remove() {
        let (mut l, mut ev) = ledger();
        l.add_status_effect(
            StatusEffect::new("phase echo", 60.0).on_remove(EffectAction::Heal {
                amount: 10.0,
                kind: HealKind::Standard,
            }),
        );
        l.take_damage(20.0, DamageKind::Physical, &mut ev);
        assert!(l.remove_status_effect("phase echo", &mut ev));
        assert_eq!(l.stat_value(StatId::Health), 90.0);
        assert!(!l.remove_status_effect("phase echo", &mut ev));
    }

    #[test]
    fn pool_invariant_across_random_mutations() {
        // Property: health and energy stay within [0, max] after any
        // mutation sequence.
        let (mut l, mut ev) = ledger();
        let deltas = [-37.5, 12.0, -88.8, 240.0, -3.3, 71.0, -150.0, 9.9];
        for (i, delta) in deltas.iter().cycle().take(64).enumerate() {
            if i % 3 == 0 {
                l.modify_stat(StatId::Health, *delta, &mut ev);
            } else {
                l.modify_stat(StatId::QuantumEnergy, *delta, &mut ev);
            }
            let h = l.stat_value(StatId::Health);
            let e = l.stat_value(StatId::QuantumEnergy);
            assert!(h >= 0.0 && h <= l.stat_value(StatId::MaxHealth));
            assert!(e >= 0.0 && e <= l.stat_value(StatId::MaxQuantumEnergy));
        }
    }
}
