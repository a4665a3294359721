//! Scene-object components: colliders, interactables, physics bodies.

use serde::{Deserialize, Serialize};

use super::common::Vec3;

/// Box collider half-extents. With the entity's [`super::Transform`]
/// this yields the AABB locomotion and highlight rays probe against.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Collider {
    pub half: Vec3,
}

impl Collider {
    pub fn new(half: Vec3) -> Self {
        Self { half }
    }
}

/// Declared interaction behavior of a world object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractableKind {
    /// Callback-style interaction with a generic event.
    Generic,
    /// Can be carried by the character (single-held invariant).
    Pickup,
    /// Toggles an active flag on each use.
    Use,
    /// Emits its payload as a data-access event.
    Data,
    /// Emits its payload as a container-opened event.
    Container,
}

/// Interaction state for a registered world object. Only the
/// interaction manager writes these fields; the renderer reads them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interactable {
    pub kind: InteractableKind,
    /// Per-object cooldown between interactions, seconds.
    pub cooldown: f32,
    pub cooldown_remaining: f32,
    pub held: bool,
    pub highlighted: bool,
    /// Toggled by Use-kind interactions.
    pub active: bool,
    /// Payload carried by Data/Container interactions.
    pub payload: Option<String>,
    /// Offset from the character frame while held.
    pub hold_offset: Vec3,
    /// Whether drop/throw imparts velocity to this object.
    pub affected_by_forces: bool,
}

impl Interactable {
    pub fn new(kind: InteractableKind) -> Self {
        Self {
            kind,
            cooldown: 0.5,
            cooldown_remaining: 0.0,
            held: false,
            highlighted: false,
            active: false,
            payload: None,
            hold_offset: Vec3::new(0.0, 1.2, -0.8),
            affected_by_forces: false,
        }
    }

    pub fn with_cooldown(mut self, cooldown: f32) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    pub fn with_forces(mut self) -> Self {
        self.affected_by_forces = true;
        self
    }

    pub fn ready(&self) -> bool {
        self.cooldown_remaining <= 0.0
    }
}

/// Placement recorded at pickup so a drop can restore it. Present only
/// while the object is held.
#[derive(Debug, Clone, Copy)]
pub struct SavedPlacement {
    pub parent: Option<hecs::Entity>,
    pub position: Vec3,
    pub yaw: f32,
}

/// Marker component on the single currently held object.
#[derive(Debug, Clone, Copy, Default)]
pub struct Held;

/// Velocity state for objects that participate in forces.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PhysicsBody {
    pub velocity: Vec3,
}

/// Repairable integrity pool, targeted by molecular reconstruction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Integrity {
    pub value: f32,
    pub max: f32,
}

impl Integrity {
    pub fn new(max: f32) -> Self {
        Self { value: max, max }
    }

    pub fn damaged(max: f32, value: f32) -> Self {
        Self {
            value: value.clamp(0.0, max),
            max,
        }
    }
}

/// Temporary construct left behind by molecular reconstruction.
/// Despawned when the remaining lifetime reaches zero.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Construct {
    pub remaining: f32,
}

impl Construct {
    pub fn new(lifetime: f32) -> Self {
        Self {
            remaining: lifetime,
        }
    }
}

/// Builder-style spec for spawning an interactable into the scene.
#[derive(Debug, Clone)]
pub struct InteractableSpec {
    pub kind: InteractableKind,
    pub position: Vec3,
    pub half: Vec3,
    pub cooldown: f32,
    pub payload: Option<String>,
    pub affected_by_forces: bool,
    pub integrity: Option<Integrity>,
}

impl InteractableSpec {
    pub fn new(kind: InteractableKind, position: Vec3) -> Self {
        Self {
            kind,
            position,
            half: Vec3::new(0.25, 0.25, 0.25),
            cooldown: 0.5,
            payload: None,
            affected_by_forces: matches!(kind, InteractableKind::Pickup),
            integrity: None,
        }
    }

    pub fn sized(mut self, half: Vec3) -> Self {
        self.half = half;
        self
    }

    pub fn cooldown(mut self, cooldown: f32) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    pub fn integrity(mut self, integrity: Integrity) -> Self {
        self.integrity = Some(integrity);
        self
    }
}
