//! Experience thresholds and level-up grants.
//!
//! Experience accumulates as a running total; the threshold table is
//! monotonic and indexed by current level. One experience award can
//! cross several thresholds, producing several sequential level-ups.

use serde::{Deserialize, Serialize};

use crate::constants::progression;

/// Cumulative experience required to leave each level.
/// `LEVEL_THRESHOLDS[n - 1]` is the total experience needed to advance
/// from level `n` to `n + 1`.
pub const LEVEL_THRESHOLDS: [f32; 9] = [
    100.0, 250.0, 450.0, 700.0, 1000.0, 1350.0, 1750.0, 2200.0, 2700.0,
];

/// Highest attainable level.
pub const MAX_LEVEL: u32 = LEVEL_THRESHOLDS.len() as u32 + 1;

/// Total experience needed to advance out of `level`, or `None` at cap.
pub fn experience_to_next(level: u32) -> Option<f32> {
    if level == 0 || level >= MAX_LEVEL {
        None
    } else {
        Some(LEVEL_THRESHOLDS[(level - 1) as usize])
    }
}

/// Number of level-ups earned by holding `experience` total XP at
/// `level`. Walks the table so one award can chain multiple levels.
pub fn levels_gained(level: u32, experience: f32) -> u32 {
    let mut gained = 0;
    let mut current = level;
    while let Some(threshold) = experience_to_next(current) {
        if experience < threshold {
            break;
        }
        current += 1;
        gained += 1;
    }
    gained
}

/// What a single level-up grants. Max pools are refilled by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelUpGrants {
    pub skill_points: u32,
    pub max_health: f32,
    pub max_energy: f32,
    pub max_stability: f32,
}

impl LevelUpGrants {
    pub fn per_level() -> Self {
        Self {
            skill_points: progression::SKILL_POINTS_PER_LEVEL,
            max_health: progression::MAX_HEALTH_PER_LEVEL,
            max_energy: progression::MAX_ENERGY_PER_LEVEL,
            max_stability: progression::MAX_STABILITY_PER_LEVEL,
        }
    }
}
