//! Pure locomotion math — input intent, speed, vertical dynamics.
//!
//! Algorithm per step:
//! 1. Build a horizontal intent vector from the directional flags
//! 2. Normalize it when its magnitude exceeds 1 (diagonal correction)
//! 3. Rotate by the view yaw; the vertical component stays zero
//! 4. Scale by base speed × sprint/crouch multipliers (both compose)
//! 5. Vertical: gravity while airborne, jump impulse when grounded and
//!    the jump debounce timer has elapsed

use serde::{Deserialize, Serialize};

use crate::constants::movement;

/// Player input for one simulation tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputIntent {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub sprint: bool,
    pub crouch: bool,
}

impl InputIntent {
    /// Intent with no flags set — the character stands still.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Whether any directional flag is set.
    pub fn has_direction(&self) -> bool {
        self.forward || self.back || self.left || self.right
    }
}

/// Raw horizontal intent in view-local space: +x right, +z forward.
/// Normalized only when the magnitude exceeds 1, so analog-style
/// partial intents (none today, but the contract allows them) pass
/// through unscaled.
pub fn intent_direction(intent: &InputIntent) -> (f32, f32) {
    let x = (intent.right as i8 - intent.left as i8) as f32;
    let z = (intent.forward as i8 - intent.back as i8) as f32;
    let mag = (x * x + z * z).sqrt();
    if mag > 1.0 {
        (x / mag, z / mag)
    } else {
        (x, z)
    }
}

/// Rotate a view-local horizontal vector into world space by `yaw`
/// (radians, counter-clockwise about +y, yaw 0 looks down −z).
pub fn rotate_by_yaw(x: f32, z: f32, yaw: f32) -> (f32, f32) {
    let (sin, cos) = yaw.sin_cos();
    (x * cos - z * sin, -x * sin - z * cos)
}

/// Effective movement speed. Sprint and crouch multipliers compose when
/// both flags are set.
pub fn movement_speed(base_speed: f32, sprinting: bool, crouching: bool) -> f32 {
    let mut speed = base_speed;
    if sprinting {
        speed *= movement::SPRINT_MULTIPLIER;
    }
    if crouching {
        speed *= movement::CROUCH_MULTIPLIER;
    }
    speed
}

/// World-space horizontal velocity for this tick's intent.
pub fn horizontal_velocity(intent: &InputIntent, view_yaw: f32, speed: f32) -> (f32, f32) {
    let (lx, lz) = intent_direction(intent);
    let (wx, wz) = rotate_by_yaw(lx, lz, view_yaw);
    (wx * speed, wz * speed)
}

/// Vertical velocity after applying gravity for `dt` seconds.
pub fn fall_velocity(velocity_y: f32, dt: f32) -> f32 {
    velocity_y - movement::GRAVITY * dt
}

/// Whether a jump request may fire. The debounce timer runs regardless
/// of grounded state; both conditions must hold.
pub fn can_jump(grounded: bool, debounce_remaining: f32) -> bool {
    grounded && debounce_remaining <= 0.0
}
