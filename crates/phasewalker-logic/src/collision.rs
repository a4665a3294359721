//! AABB colliders and ray probes.
//!
//! Obstacles are axis-aligned boxes (center + half-extents). The
//! character probes them with rays: one downward for the grounded
//! check, five more (up, ±x, ±z) for lateral and overhead resolution.
//! The slab method handles all of them.

use serde::{Deserialize, Serialize};

use crate::constants::movement;

/// Axis-aligned bounding box: center plus half-extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: [f32; 3],
    pub half: [f32; 3],
}

impl Aabb {
    pub fn new(center: [f32; 3], half: [f32; 3]) -> Self {
        Self { center, half }
    }

    pub fn min(&self) -> [f32; 3] {
        [
            self.center[0] - self.half[0],
            self.center[1] - self.half[1],
            self.center[2] - self.half[2],
        ]
    }

    pub fn max(&self) -> [f32; 3] {
        [
            self.center[0] + self.half[0],
            self.center[1] + self.half[1],
            self.center[2] + self.half[2],
        ]
    }

    pub fn contains(&self, p: [f32; 3]) -> bool {
        let min = self.min();
        let max = self.max();
        (0..3).all(|i| p[i] >= min[i] && p[i] <= max[i])
    }
}

/// The five non-down probe directions, paired with the velocity axis
/// they oppose (axis index, sign of the outward normal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeDirection {
    Up,
    PosX,
    NegX,
    PosZ,
    NegZ,
}

impl ProbeDirection {
    pub const ALL: [ProbeDirection; 5] = [
        ProbeDirection::Up,
        ProbeDirection::PosX,
        ProbeDirection::NegX,
        ProbeDirection::PosZ,
        ProbeDirection::NegZ,
    ];

    /// Unit ray direction.
    pub fn dir(self) -> [f32; 3] {
        match self {
            ProbeDirection::Up => [0.0, 1.0, 0.0],
            ProbeDirection::PosX => [1.0, 0.0, 0.0],
            ProbeDirection::NegX => [-1.0, 0.0, 0.0],
            ProbeDirection::PosZ => [0.0, 0.0, 1.0],
            ProbeDirection::NegZ => [0.0, 0.0, -1.0],
        }
    }

    /// Component index of the axis this probe runs along.
    pub fn axis(self) -> usize {
        match self {
            ProbeDirection::Up => 1,
            ProbeDirection::PosX | ProbeDirection::NegX => 0,
            ProbeDirection::PosZ | ProbeDirection::NegZ => 2,
        }
    }

    /// Sign of the probe along its axis.
    pub fn sign(self) -> f32 {
        match self {
            ProbeDirection::Up | ProbeDirection::PosX | ProbeDirection::PosZ => 1.0,
            ProbeDirection::NegX | ProbeDirection::NegZ => -1.0,
        }
    }
}

/// Cast a ray against an AABB (slab method).
///
/// `dir` must be unit length. Returns the entry distance along the ray,
/// or `None` when the ray misses or the box lies behind the origin.
/// An origin inside the box reports distance 0.
pub fn ray_aabb(origin: [f32; 3], dir: [f32; 3], aabb: &Aabb) -> Option<f32> {
    let min = aabb.min();
    let max = aabb.max();
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;

    for i in 0..3 {
        if dir[i].abs() < 1e-8 {
            if origin[i] < min[i] || origin[i] > max[i] {
                return None;
            }
        } else {
            let inv = 1.0 / dir[i];
            let mut t0 = (min[i] - origin[i]) * inv;
            let mut t1 = (max[i] - origin[i]) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_near = t_near.max(t0);
            t_far = t_far.min(t1);
            if t_near > t_far {
                return None;
            }
        }
    }

    if t_far < 0.0 {
        return None;
    }
    Some(t_near.max(0.0))
}

/// Cast against a set of boxes, returning the closest hit and its index.
pub fn ray_closest(origin: [f32; 3], dir: [f32; 3], boxes: &[Aabb]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (i, b) in boxes.iter().enumerate() {
        if let Some(t) = ray_aabb(origin, dir, b) {
            if best.map_or(true, |(_, bt)| t < bt) {
                best = Some((i, t));
            }
        }
    }
    best
}

/// Grounded check from a downward probe hit distance.
pub fn grounded_from_probe(hit_distance: Option<f32>) -> bool {
    matches!(hit_distance, Some(d) if d < movement::GROUND_PROBE_DISTANCE)
}

/// Lateral/overhead penetration depth for a probe hit, or `None` when
/// the hit is outside the character radius plus clearance margin.
pub fn probe_penetration(hit_distance: f32) -> Option<f32> {
    let limit = movement::CHARACTER_RADIUS + movement::COLLISION_MARGIN;
    if hit_distance < limit {
        Some(limit - hit_distance)
    } else {
        None
    }
}
