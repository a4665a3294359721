//! Common components shared by every scene entity type.

use hecs::Entity;
use serde::{Deserialize, Serialize};

/// 3D position vector
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn from_array(a: [f32; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    pub fn distance_squared(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    pub fn distance(&self, other: &Self) -> f32 {
        self.distance_squared(other).sqrt()
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                x: self.x / len,
                y: self.y / len,
                z: self.z / len,
            }
        } else {
            Self::ZERO
        }
    }

    /// Horizontal forward direction for a yaw angle (yaw 0 looks down −z).
    pub fn forward_from_yaw(yaw: f32) -> Self {
        Self::new(-yaw.sin(), 0.0, -yaw.cos())
    }

    /// Component accessor by axis index (0 = x, 1 = y, 2 = z).
    pub fn axis(&self, index: usize) -> f32 {
        match index {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Mutable component accessor by axis index.
    pub fn axis_mut(&mut self, index: usize) -> &mut f32 {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            _ => &mut self.z,
        }
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

/// World placement of a scene entity.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub yaw: f32,
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            yaw: 0.0,
        }
    }
}

/// Link to a parent scene entity. Absent means the entity sits at scene
/// root. The interaction manager walks these links when resolving the
/// interactable ancestor of a ray hit.
#[derive(Debug, Clone, Copy)]
pub struct Parent(pub Entity);
