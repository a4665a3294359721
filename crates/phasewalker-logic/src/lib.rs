//! Phasewalker Logic — pure simulation math.
//!
//! Everything in this crate is a plain function or a small data struct:
//! no ECS, no rendering, no clocks. Time always arrives as an explicit
//! delta so every formula is deterministic and unit-testable.
//!
//! - [`constants`] — tuning tables shared by the engine and the harness
//! - [`kinematics`] — input intent, speed multipliers, vertical dynamics
//! - [`collision`] — AABB colliders and ray probes
//! - [`formulas`] — damage, healing, and stability-cost math
//! - [`leveling`] — experience thresholds and level-up grants

pub mod collision;
pub mod constants;
pub mod formulas;
pub mod kinematics;
pub mod leveling;
