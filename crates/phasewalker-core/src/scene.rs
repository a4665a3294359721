//! Scene-object registry built on a `hecs::World`.
//!
//! Obstacles and interactables are plain entities; the scene owns
//! spawn/despawn, `Parent` links, and the obstacle snapshot the
//! locomotion step consumes. `Transform::position` is the collider
//! center. Only lightweight object physics runs here (construct decay,
//! gravity on loose physics bodies); character dynamics live in
//! `locomotion`.

use hecs::Entity;

use crate::components::{
    Collider, Construct, Held, Integrity, Interactable, InteractableSpec, Parent, PhysicsBody,
    Transform, Vec3,
};
use phasewalker_logic::collision::Aabb;
use phasewalker_logic::constants::movement;

/// Maximum `Parent` chain depth walked before giving up. Guards
/// against accidental cycles.
const MAX_PARENT_DEPTH: usize = 32;

pub struct Scene {
    pub world: hecs::World,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            world: hecs::World::new(),
        }
    }

    /// Static collision box (wall, crate, floor slab).
    pub fn spawn_obstacle(&mut self, position: Vec3, half: Vec3) -> Entity {
        self.world
            .spawn((Transform::at(position), Collider::new(half)))
    }

    /// Interactable object with a collider sized from the spec.
    pub fn spawn_interactable(&mut self, spec: InteractableSpec) -> Entity {
        let mut interactable = Interactable::new(spec.kind).with_cooldown(spec.cooldown);
        interactable.affected_by_forces = spec.affected_by_forces;
        interactable.payload = spec.payload.clone();

        let entity = self.world.spawn((
            Transform::at(spec.position),
            Collider::new(spec.half),
            interactable,
        ));
        if spec.affected_by_forces {
            let _ = self.world.insert_one(entity, PhysicsBody::default());
        }
        if let Some(integrity) = spec.integrity {
            let _ = self.world.insert_one(entity, integrity);
        }
        entity
    }

    pub fn despawn(&mut self, entity: Entity) -> bool {
        self.world.despawn(entity).is_ok()
    }

    pub fn set_parent(&mut self, child: Entity, parent: Entity) {
        let _ = self.world.insert_one(child, Parent(parent));
    }

    /// Detach from any parent, returning to scene root.
    pub fn clear_parent(&mut self, child: Entity) {
        let _ = self.world.remove_one::<Parent>(child);
    }

    pub fn parent_of(&self, entity: Entity) -> Option<Entity> {
        self.world.get::<&Parent>(entity).map(|p| p.0).ok()
    }

    /// World-space position: local positions summed up the parent
    /// chain.
    pub fn world_position(&self, entity: Entity) -> Option<Vec3> {
        let mut position = self.world.get::<&Transform>(entity).ok()?.position;
        let mut current = entity;
        for _ in 0..MAX_PARENT_DEPTH {
            let Some(parent) = self.parent_of(current) else {
                break;
            };
            if let Ok(transform) = self.world.get::<&Transform>(parent) {
                position = position + transform.position;
            }
            current = parent;
        }
        Some(position)
    }

    /// Collision snapshot for the locomotion probes, in world space.
    /// Held objects are excluded so the carried item never blocks its
    /// carrier.
    pub fn obstacles(&self) -> Vec<(Entity, Aabb)> {
        self.world
            .query::<(&Transform, &Collider)>()
            .without::<&Held>()
            .iter()
            .map(|(entity, (transform, collider))| {
                let center = self
                    .world_position(entity)
                    .unwrap_or(transform.position);
                (entity, Aabb::new(center.to_array(), collider.half.to_array()))
            })
            .collect()
    }

    /// Per-tick object upkeep: construct lifetimes and loose-body
    /// gravity. Held objects are carried, not simulated.
    pub fn tick(&mut self, delta_time: f32) {
        let mut expired = Vec::new();
        for (entity, construct) in self.world.query_mut::<&mut Construct>() {
            construct.remaining -= delta_time;
            if construct.remaining <= 0.0 {
                expired.push(entity);
            }
        }
        for entity in expired {
            let _ = self.world.despawn(entity);
        }

        for (_, (transform, body, collider)) in self
            .world
            .query::<(&mut Transform, &mut PhysicsBody, Option<&Collider>)>()
            .without::<&Held>()
            .iter()
        {
            if body.velocity == Vec3::ZERO && transform.position.y <= rest_height(collider) {
                continue;
            }
            body.velocity.y -= movement::GRAVITY * delta_time;
            transform.position = transform.position + body.velocity * delta_time;
            let rest = rest_height(collider);
            if transform.position.y <= rest {
                transform.position.y = rest;
                body.velocity = Vec3::ZERO;
            }
        }
    }

    /// Repair hook shared by abilities and tests.
    pub fn integrity_of(&self, entity: Entity) -> Option<Integrity> {
        self.world.get::<&Integrity>(entity).map(|i| *i).ok()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

fn rest_height(collider: Option<&Collider>) -> f32 {
    collider.map_or(0.0, |c| c.half.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::InteractableKind;

    #[test]
    fn obstacle_snapshot_centers_on_transform() {
        let mut scene = Scene::new();
        let wall = scene.spawn_obstacle(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.5, 1.0, 0.5));
        let obstacles = scene.obstacles();
        assert_eq!(obstacles.len(), 1);
        assert_eq!(obstacles[0].0, wall);
        assert_eq!(obstacles[0].1.center, [1.0, 2.0, 3.0]);
        assert_eq!(obstacles[0].1.half, [0.5, 1.0, 0.5]);
    }

    #[test]
    fn held_objects_leave_the_snapshot() {
        let mut scene = Scene::new();
        let item = scene.spawn_interactable(InteractableSpec::new(
            InteractableKind::Pickup,
            Vec3::ZERO,
        ));
        assert_eq!(scene.obstacles().len(), 1);
        let _ = scene.world.insert_one(item, Held);
        assert!(scene.obstacles().is_empty());
    }

    #[test]
    fn world_position_sums_parent_chain() {
        let mut scene = Scene::new();
        let root = scene.spawn_obstacle(Vec3::new(10.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
        let child = scene.spawn_obstacle(Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.5, 0.5, 0.5));
        scene.set_parent(child, root);
        assert_eq!(
            scene.world_position(child),
            Some(Vec3::new(10.0, 2.0, 0.0))
        );
        scene.clear_parent(child);
        assert_eq!(scene.world_position(child), Some(Vec3::new(0.0, 2.0, 0.0)));
    }

    #[test]
    fn construct_expires_and_despawns() {
        let mut scene = Scene::new();
        let construct = scene
            .world
            .spawn((Transform::at(Vec3::ZERO), Construct::new(1.0)));
        scene.tick(0.5);
        assert!(scene.world.contains(construct));
        scene.tick(0.6);
        assert!(!scene.world.contains(construct));
    }

    #[test]
    fn loose_body_falls_to_rest() {
        let mut scene = Scene::new();
        let item = scene.spawn_interactable(
            InteractableSpec::new(InteractableKind::Pickup, Vec3::new(0.0, 3.0, 0.0))
                .sized(Vec3::new(0.25, 0.25, 0.25)),
        );
        for _ in 0..60 {
            scene.tick(0.05);
        }
        let transform = *scene.world.get::<&Transform>(item).unwrap();
        assert!((transform.position.y - 0.25).abs() < 0.001);
        let body = *scene.world.get::<&PhysicsBody>(item).unwrap();
        assert_eq!(body.velocity, Vec3::ZERO);
    }

    #[test]
    fn spawn_spec_carries_payload_and_integrity() {
        let mut scene = Scene::new();
        let terminal = scene.spawn_interactable(
            InteractableSpec::new(InteractableKind::Data, Vec3::ZERO)
                .payload("lab-notes-03")
                .integrity(Integrity::new(80.0)),
        );
        let interactable = scene.world.get::<&Interactable>(terminal).unwrap();
        assert_eq!(interactable.payload.as_deref(), Some("lab-notes-03"));
        drop(interactable);
        assert_eq!(scene.integrity_of(terminal).map(|i| i.max), Some(80.0));
    }
}
