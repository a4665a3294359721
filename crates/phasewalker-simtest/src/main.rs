//! Phasewalker Headless Simulation Harness
//!
//! Validates pure simulation logic, the ability tuning manifest, and
//! the character engine without rendering. Runs entirely in-process —
//! no windowing, no assets, no input devices.
//!
//! Usage:
//!   cargo run -p phasewalker-simtest
//!   cargo run -p phasewalker-simtest -- --verbose

use serde::Deserialize;

use phasewalker_core::abilities::{AbilityKind, AbilityManifest, AbilityStats};
use phasewalker_core::prelude::*;
use phasewalker_logic::collision::{self, Aabb};
use phasewalker_logic::constants::{abilities, interaction, movement};
use phasewalker_logic::formulas::{self, DamageKind};
use phasewalker_logic::kinematics;
use phasewalker_logic::leveling;

// ── Ability manifest (same JSON external tools consume) ─────────────────
const MANIFEST_JSON: &str = include_str!("../../../data/ability_manifest.json");

/// Header fields external tools key on, deserialized here independently
/// of the engine loader so a loader regression cannot mask a bad file.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManifestHeader {
    version: u32,
    max_level: u8,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn new(name: &str, passed: bool, detail: String) -> Self {
        Self {
            name: name.into(),
            passed,
            detail,
        }
    }
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Phasewalker Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Ability manifest validation
    results.extend(validate_ability_manifest());

    // 2. Formula sweep
    results.extend(validate_formulas());

    // 3. Leveling table
    results.extend(validate_leveling());

    // 4. Kinematics sweep
    results.extend(validate_kinematics());

    // 5. Collision probes on synthetic boxes
    results.extend(validate_collision());

    // 6. Engine acceptance scenarios
    results.extend(validate_engine_scenarios());

    // 7. Long-run invariant soak
    results.extend(soak_test());

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Ability manifest ─────────────────────────────────────────────────

fn validate_ability_manifest() -> Vec<TestResult> {
    println!("--- Ability Manifest ---");
    let mut results = Vec::new();

    match serde_json::from_str::<ManifestHeader>(MANIFEST_JSON) {
        Ok(header) => results.push(TestResult::new(
            "manifest_header",
            header.version == 1 && header.max_level == abilities::MAX_ABILITY_LEVEL,
            format!("version {}, maxLevel {}", header.version, header.max_level),
        )),
        Err(e) => results.push(TestResult::new(
            "manifest_header",
            false,
            format!("JSON parse error: {}", e),
        )),
    }

    let manifest = match AbilityManifest::parse(MANIFEST_JSON) {
        Ok(m) => m,
        Err(e) => {
            results.push(TestResult::new(
                "manifest_parse",
                false,
                format!("JSON parse error: {}", e),
            ));
            return results;
        }
    };

    results.push(TestResult::new(
        "manifest_matches_defaults",
        manifest.matches_defaults(),
        "manifest tuning agrees with the built-in constant table".into(),
    ));

    let mut names: Vec<&str> = manifest.abilities.iter().map(|a| a.name.as_str()).collect();
    names.sort_unstable();
    let unique = names.windows(2).all(|w| w[0] != w[1]);
    results.push(TestResult::new(
        "manifest_unique_names",
        unique && names.len() == 4,
        format!("{} ability entries", names.len()),
    ));

    let unknown: Vec<&str> = manifest
        .abilities
        .iter()
        .filter(|a| AbilityKind::from_name(&a.name).is_none())
        .map(|a| a.name.as_str())
        .collect();
    results.push(TestResult::new(
        "manifest_known_names",
        unknown.is_empty(),
        if unknown.is_empty() {
            "all entries map to engine abilities".into()
        } else {
            format!("unknown abilities: {}", unknown.join(", "))
        },
    ));

    let bad_cost: Vec<&str> = manifest
        .abilities
        .iter()
        .filter(|a| a.energy_cost <= 0.0 || a.cooldown <= 0.0 || a.stability_cost <= 0.0)
        .map(|a| a.name.as_str())
        .collect();
    results.push(TestResult::new(
        "manifest_positive_costs",
        bad_cost.is_empty(),
        if bad_cost.is_empty() {
            "all costs and cooldowns positive".into()
        } else {
            format!("non-positive tuning on: {}", bad_cost.join(", "))
        },
    ));

    // Duration abilities carry a duration, targeted ones carry a range.
    let shape_ok = manifest.abilities.iter().all(|a| {
        match AbilityKind::from_name(&a.name) {
            Some(k) if k.has_duration() => a.duration.is_some() && a.range.is_none(),
            Some(_) => a.range.is_some() && a.duration.is_none(),
            None => false,
        }
    });
    results.push(TestResult::new(
        "manifest_ability_shapes",
        shape_ok,
        "duration vs targeted fields match ability kind".into(),
    ));

    // Upgrades must never push cost or cooldown negative within max level.
    let steps = (manifest.max_level - 1) as f32;
    let upgrade_safe = manifest.abilities.iter().all(|a| {
        a.energy_cost + steps * manifest.upgrade.energy_cost > 0.0
            && a.cooldown + steps * manifest.upgrade.cooldown > 0.0
    });
    results.push(TestResult::new(
        "manifest_upgrade_bounds",
        upgrade_safe,
        format!("tuning stays positive through level {}", manifest.max_level),
    ));

    results
}

// ── 2. Formulas ─────────────────────────────────────────────────────────

fn validate_formulas() -> Vec<TestResult> {
    println!("--- Damage / Heal / Stability Formulas ---");
    let mut results = Vec::new();

    // Damage monotonic in amount, antitonic in resistance, never negative.
    let mut ok = true;
    for amount in [0.0_f32, 1.0, 10.0, 50.0, 123.4] {
        let mut previous = f32::INFINITY;
        for resistance in [0.0_f32, 25.0, 50.0, 75.0, 100.0, 150.0] {
            let damage = formulas::damage_after_resistance(amount, resistance);
            if damage < 0.0 || damage > previous + 0.001 {
                ok = false;
            }
            previous = damage;
        }
    }
    results.push(TestResult::new(
        "damage_resistance_sweep",
        ok,
        "damage non-negative and antitone in resistance".into(),
    ));

    results.push(TestResult::new(
        "damage_half_resist",
        formulas::damage_after_resistance(50.0, 50.0) == 25.0,
        "50 damage at 50% resistance is 25.0".into(),
    ));

    let heal_ok = formulas::quantum_heal_amount(40.0, 50.0) == 20.0
        && formulas::quantum_heal_amount(40.0, -10.0) == 0.0;
    results.push(TestResult::new(
        "quantum_heal_scaling",
        heal_ok,
        "quantum heals scale with stability, floor at 0".into(),
    ));

    let stability_ok = formulas::stability_cost(10.0, 0.0) == 10.0
        && formulas::stability_cost(10.0, 100.0) == 5.0
        && formulas::stability_cost(10.0, 50.0) < 10.0;
    results.push(TestResult::new(
        "stability_cost_discount",
        stability_ok,
        "governing attribute discounts stability cost".into(),
    ));

    results
}

// ── 3. Leveling ─────────────────────────────────────────────────────────

fn validate_leveling() -> Vec<TestResult> {
    println!("--- Leveling Table ---");
    let mut results = Vec::new();

    let monotonic = leveling::LEVEL_THRESHOLDS.windows(2).all(|w| w[0] < w[1]);
    results.push(TestResult::new(
        "thresholds_monotonic",
        monotonic,
        format!("{} thresholds strictly ascending", leveling::LEVEL_THRESHOLDS.len()),
    ));

    results.push(TestResult::new(
        "chained_level_ups",
        leveling::levels_gained(1, 500.0) == 3,
        "500 XP from level 1 crosses three thresholds".into(),
    ));

    results.push(TestResult::new(
        "level_cap",
        leveling::levels_gained(leveling::MAX_LEVEL, f32::MAX) == 0
            && leveling::experience_to_next(leveling::MAX_LEVEL).is_none(),
        format!("no progression past level {}", leveling::MAX_LEVEL),
    ));

    results
}

// ── 4. Kinematics ───────────────────────────────────────────────────────

fn validate_kinematics() -> Vec<TestResult> {
    println!("--- Kinematics Sweep ---");
    let mut results = Vec::new();

    // Every directional flag combination yields |intent| <= 1.
    let mut worst: f32 = 0.0;
    for bits in 0..16u8 {
        let intent = InputIntent {
            forward: bits & 1 != 0,
            back: bits & 2 != 0,
            left: bits & 4 != 0,
            right: bits & 8 != 0,
            ..InputIntent::idle()
        };
        let (x, z) = kinematics::intent_direction(&intent);
        worst = worst.max((x * x + z * z).sqrt());
    }
    results.push(TestResult::new(
        "intent_never_exceeds_unit",
        worst <= 1.0 + 0.001,
        format!("max |intent| over 16 combos: {:.3}", worst),
    ));

    // Yaw rotation preserves speed for every eighth of a turn.
    let mut speed_ok = true;
    for step in 0..8 {
        let yaw = step as f32 * std::f32::consts::FRAC_PI_4;
        let (x, z) = kinematics::rotate_by_yaw(0.0, 1.0, yaw);
        if ((x * x + z * z).sqrt() - 1.0).abs() > 0.001 {
            speed_ok = false;
        }
    }
    results.push(TestResult::new(
        "yaw_preserves_speed",
        speed_ok,
        "rotation is length-preserving across eight yaw steps".into(),
    ));

    let composed = kinematics::movement_speed(movement::BASE_SPEED, true, true);
    results.push(TestResult::new(
        "sprint_crouch_compose",
        (composed - movement::BASE_SPEED * 0.9).abs() < 0.001,
        format!("sprint+crouch speed {:.2}", composed),
    ));

    results
}

// ── 5. Collision ────────────────────────────────────────────────────────

fn validate_collision() -> Vec<TestResult> {
    println!("--- Collision Probes ---");
    let mut results = Vec::new();

    // A probe grid fired at a known box: hits report the exact slab
    // entry distance, misses return None.
    let target = Aabb::new([0.0, 1.0, -5.0], [1.0, 1.0, 1.0]);
    let mut grid_ok = true;
    for ix in -3i32..=3 {
        for iy in 0i32..=3 {
            let origin = [ix as f32 * 0.7, iy as f32 * 0.7, 0.0];
            let hit = collision::ray_aabb(origin, [0.0, 0.0, -1.0], &target);
            let should_hit = origin[0].abs() <= 1.0 && (origin[1] - 1.0).abs() <= 1.0;
            match hit {
                Some(t) if should_hit => {
                    if (t - 4.0).abs() > 0.001 {
                        grid_ok = false;
                    }
                }
                None if !should_hit => {}
                _ => grid_ok = false,
            }
        }
    }
    results.push(TestResult::new(
        "ray_grid_vs_box",
        grid_ok,
        "28-ray grid agrees with slab geometry".into(),
    ));

    let inside = collision::ray_aabb([0.0, 1.0, -5.0], [0.0, 0.0, -1.0], &target);
    results.push(TestResult::new(
        "origin_inside_reports_zero",
        inside == Some(0.0),
        "ray origin inside the box reports distance 0".into(),
    ));

    results.push(TestResult::new(
        "grounded_threshold",
        collision::grounded_from_probe(Some(0.29))
            && !collision::grounded_from_probe(Some(0.31))
            && !collision::grounded_from_probe(None),
        format!("grounded iff hit < {}", movement::GROUND_PROBE_DISTANCE),
    ));

    results
}

// ── 6. Engine scenarios ─────────────────────────────────────────────────

fn validate_engine_scenarios() -> Vec<TestResult> {
    println!("--- Engine Acceptance Scenarios ---");
    let mut results = Vec::new();

    // Scenario: phase shift spends 25 energy, starts a 10 s cooldown,
    // and refuses halfway through it.
    {
        let mut sim = CharacterSimulation::new();
        let used = sim.use_ability(AbilityKind::PhaseShift, None);
        let energy = sim.ledger().stat_value(StatId::QuantumEnergy);
        for _ in 0..100 {
            sim.tick(0.05, &TickInput::default());
        }
        let retry = sim.use_ability(AbilityKind::PhaseShift, None);
        let events = sim.drain_events();
        let remaining_ok = events.iter().any(|e| {
            matches!(e, SimEvent::AbilityOnCooldown { remaining, .. }
                if (*remaining - 5.0).abs() < 0.2)
        });
        // Regen runs during those five seconds.
        let energy_ok = (energy - 75.0).abs() < 0.001;
        results.push(TestResult::new(
            "ability_cooldown_gate",
            used && !retry && energy_ok && remaining_ok,
            format!("energy after use {:.1}, retry refused mid-cooldown", energy),
        ));
    }

    // Scenario: radiation damage scaled by resistance.
    {
        let mut sim = CharacterSimulation::new();
        sim.modify_stat(StatId::RadiationResistance, 50.0);
        sim.take_damage(50.0, DamageKind::Radiation);
        let health = sim.ledger().stat_value(StatId::Health);
        results.push(TestResult::new(
            "resistance_scaling",
            health == 75.0,
            format!("health after resisted hit: {:.1}", health),
        ));
    }

    // Scenario: crossing the first threshold levels up and refills pools.
    {
        let mut sim = CharacterSimulation::new();
        sim.take_damage(30.0, DamageKind::Physical);
        sim.add_experience(90.0);
        let before = sim.ledger().level();
        sim.add_experience(20.0);
        let ok = before == 1
            && sim.ledger().level() == 2
            && sim.ledger().skill_points() == 3
            && sim.ledger().stat_value(StatId::MaxHealth) == 110.0
            && sim.ledger().stat_value(StatId::Health) == 110.0;
        results.push(TestResult::new(
            "level_up_grants",
            ok,
            format!(
                "level {} with {} skill points",
                sim.ledger().level(),
                sim.ledger().skill_points()
            ),
        ));
    }

    // Scenario: second pickup drops the first held object.
    {
        let mut sim = CharacterSimulation::new();
        let a = sim.scene.spawn_interactable(InteractableSpec::new(
            InteractableKind::Pickup,
            Vec3::new(1.0, 0.25, 0.0),
        ));
        let b = sim.scene.spawn_interactable(InteractableSpec::new(
            InteractableKind::Pickup,
            Vec3::new(-1.0, 0.25, 0.0),
        ));
        sim.pickup_object(a);
        sim.pickup_object(b);
        let events = sim.drain_events();
        let dropped_a = events
            .iter()
            .any(|e| matches!(e, SimEvent::ObjectDropped { object, .. } if *object == a));
        results.push(TestResult::new(
            "single_held_invariant",
            sim.held_object() == Some(b) && dropped_a,
            "picking up B dropped A first".into(),
        ));
    }

    // Scenario: grounded within the probe threshold.
    {
        let mut sim = CharacterSimulation::new();
        let mut kin = sim.kinematics().clone();
        kin.position = Vec3::new(0.0, 0.05, 0.0);
        kin.grounded = false;
        kin.velocity.y = -1.0;
        let mut events = Vec::new();
        phasewalker_core::locomotion::step(
            &mut kin,
            0.001,
            &InputIntent::idle(),
            0.0,
            &sim.scene.obstacles(),
            &mut events,
        );
        results.push(TestResult::new(
            "ground_probe_threshold",
            kin.grounded && kin.velocity.y == 0.0,
            format!("grounded at y {:.3}", kin.position.y),
        ));
    }

    // Scenario: out-of-range interaction refuses without cooldown.
    {
        let mut sim = CharacterSimulation::new();
        let panel = sim.scene.spawn_interactable(InteractableSpec::new(
            InteractableKind::Use,
            Vec3::new(0.0, 0.0, -5.0),
        ));
        let ok = !sim.interact_with(panel);
        let events = sim.drain_events();
        let refused = events
            .iter()
            .any(|e| matches!(e, SimEvent::InteractionOutOfRange { .. }));
        results.push(TestResult::new(
            "interaction_range_gate",
            ok && refused,
            format!(
                "target at 5.0 refused beyond {:.1}",
                interaction::INTERACTION_DISTANCE
            ),
        ));
    }

    // Manifest tuning equals the stats a fresh ability reports.
    {
        let agree = match AbilityManifest::parse(MANIFEST_JSON) {
            Ok(manifest) => AbilityKind::ALL
                .iter()
                .all(|&k| manifest.stats_for(k) == Some(AbilityStats::base(k))),
            Err(_) => false,
        };
        results.push(TestResult::new(
            "engine_uses_manifest_tuning",
            agree,
            "AbilityStats::base matches manifest entries".into(),
        ));
    }

    results
}

// ── 7. Soak ─────────────────────────────────────────────────────────────

/// Ten thousand scripted ticks in a generated chamber. The pool
/// invariants and the single-held invariant must hold after every tick.
fn soak_test() -> Vec<TestResult> {
    println!("--- Invariant Soak (10k ticks) ---");
    let mut results = Vec::new();

    let mut sim = CharacterSimulation::new();
    sim.generate(ChamberConfig {
        seed: 1234,
        ..ChamberConfig::default()
    });

    let mut violations = Vec::new();
    let mut total_events = 0usize;

    for tick in 0..10_000u32 {
        let input = TickInput {
            intent: InputIntent {
                forward: tick % 7 != 0,
                left: tick % 11 == 0,
                jump: tick % 97 == 0,
                sprint: tick % 13 == 0,
                crouch: tick % 29 == 0,
                ..InputIntent::idle()
            },
            view_yaw: (tick as f32) * 0.01,
            ..TickInput::default()
        };
        sim.tick(1.0 / 60.0, &input);

        if tick % 50 == 0 {
            sim.use_ability(AbilityKind::PhaseShift, None);
        }
        if tick % 173 == 0 {
            sim.take_damage(5.0, DamageKind::Quantum);
        }
        if tick % 200 == 0 {
            sim.add_experience(15.0);
        }
        if tick % 311 == 0 {
            sim.interact();
        }
        if tick % 401 == 0 {
            sim.drop_object();
        }

        let health = sim.ledger().stat_value(StatId::Health);
        let max_health = sim.ledger().stat_value(StatId::MaxHealth);
        let energy = sim.ledger().stat_value(StatId::QuantumEnergy);
        let max_energy = sim.ledger().stat_value(StatId::MaxQuantumEnergy);
        if health < 0.0 || health > max_health + 0.001 {
            violations.push(format!("tick {}: health {} / {}", tick, health, max_health));
        }
        if energy < 0.0 || energy > max_energy + 0.001 {
            violations.push(format!("tick {}: energy {} / {}", tick, energy, max_energy));
        }
        if sim.kinematics().position.y < -0.001 {
            violations.push(format!("tick {}: below floor", tick));
        }
        total_events += sim.drain_events().len();
    }

    results.push(TestResult::new(
        "soak_invariants",
        violations.is_empty(),
        if violations.is_empty() {
            format!("10k ticks clean, {} events drained", total_events)
        } else {
            format!("{} violations, first: {}", violations.len(), violations[0])
        },
    ));

    results.push(TestResult::new(
        "soak_character_contained",
        sim.kinematics().position.x.abs() < 21.0 && sim.kinematics().position.z.abs() < 21.0,
        format!("final position {:?}", sim.kinematics().position),
    ));

    results
}
