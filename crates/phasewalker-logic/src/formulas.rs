//! Damage, healing, and stability-cost formulas.
//!
//! All combat-facing amounts round to the nearest 0.1 so displayed
//! values and simulation values never drift apart.

use serde::{Deserialize, Serialize};

/// Damage classification. Physical damage has no resistance stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageKind {
    Physical,
    Radiation,
    Temporal,
    Quantum,
}

/// Healing classification. Quantum healing scales with stability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HealKind {
    Standard,
    Quantum,
}

/// Round to the nearest 0.1.
pub fn round_to_tenth(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

/// Actual damage after resistance: `amount × (1 − resistance/100)`,
/// rounded to the nearest 0.1. Resistance is a percentage; values over
/// 100 would invert the damage, so it is clamped there.
pub fn damage_after_resistance(amount: f32, resistance: f32) -> f32 {
    let resist = resistance.clamp(0.0, 100.0);
    round_to_tenth(amount * (1.0 - resist / 100.0))
}

/// Effective quantum heal: scaled by `stability / 100`, rounded to 0.1.
pub fn quantum_heal_amount(amount: f32, stability: f32) -> f32 {
    round_to_tenth(amount * (stability.max(0.0) / 100.0))
}

/// Stability drained by an ability use:
/// `base_cost / (1 + attribute/100)`, rounded to 0.1. Higher governing
/// attributes make abilities cheaper to channel.
pub fn stability_cost(base_cost: f32, attribute: f32) -> f32 {
    round_to_tenth(base_cost / (1.0 + attribute.max(0.0) / 100.0))
}
