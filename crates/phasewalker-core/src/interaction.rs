//! Interaction and possession manager.
//!
//! Per tick: object cooldowns decay, the nearby set is rebuilt sorted
//! by distance, and the single highlight candidate is recomputed from a
//! ray (forward ray in first person, screen ray in third person),
//! walking `Parent` links up to the nearest interactable ancestor.
//! Highlight transitions are edge-triggered and never repeat while the
//! candidate is unchanged.
//!
//! Possession holds at most one object. Pickup records the prior
//! parent/position/yaw so drop can restore them; the held object rides
//! the character frame at its declared hold offset. All possession
//! failures are silent no-ops.

use hecs::Entity;

use crate::components::{Held, Interactable, InteractableKind, PhysicsBody, SavedPlacement, Transform, Vec3};
use crate::events::SimEvent;
use crate::locomotion::CharacterKinematics;
use crate::scene::Scene;
use phasewalker_logic::collision;
use phasewalker_logic::constants::{interaction as tuning, movement};

/// A world ray used for highlight picking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

#[derive(Debug, Default)]
pub struct InteractionManager {
    held: Option<Entity>,
    highlighted: Option<Entity>,
    /// Interactables within reach, ascending by distance.
    nearby: Vec<(Entity, f32)>,
}

impl InteractionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn held(&self) -> Option<Entity> {
        self.held
    }

    pub fn highlighted(&self) -> Option<Entity> {
        self.highlighted
    }

    pub fn nearby(&self) -> &[(Entity, f32)] {
        &self.nearby
    }

    /// Per-tick upkeep. `pick_ray` overrides the forward ray in third
    /// person; first person always uses the facing direction from eye
    /// height.
    pub fn tick(
        &mut self,
        scene: &mut Scene,
        kin: &CharacterKinematics,
        delta_time: f32,
        pick_ray: Option<Ray>,
        events: &mut Vec<SimEvent>,
    ) {
        for (_, interactable) in scene.world.query_mut::<&mut Interactable>() {
            interactable.cooldown_remaining = (interactable.cooldown_remaining - delta_time).max(0.0);
        }

        self.rebuild_nearby(scene, kin);
        self.sync_held_transform(scene, kin);

        let ray = pick_ray.unwrap_or_else(|| Ray {
            origin: kin.position + Vec3::new(0.0, movement::CHARACTER_HEIGHT * 0.5, 0.0),
            direction: kin.forward(),
        });
        let candidate = self.highlight_candidate(scene, ray);
        self.apply_highlight(scene, candidate, events);
    }

    fn rebuild_nearby(&mut self, scene: &Scene, kin: &CharacterKinematics) {
        self.nearby.clear();
        for (entity, _) in scene.world.query::<&Interactable>().without::<&Held>().iter() {
            if let Some(position) = scene.world_position(entity) {
                let distance = kin.position.distance(&position);
                if distance <= tuning::INTERACTION_DISTANCE {
                    self.nearby.push((entity, distance));
                }
            }
        }
        self.nearby
            .sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    }

    /// Keep the held object riding the character frame.
    fn sync_held_transform(&self, scene: &mut Scene, kin: &CharacterKinematics) {
        let Some(held) = self.held else {
            return;
        };
        let Ok(offset) = scene.world.get::<&Interactable>(held).map(|i| i.hold_offset) else {
            return;
        };
        let forward = kin.forward();
        let right = Vec3::new(-forward.z, 0.0, forward.x);
        let world = kin.position
            + right * offset.x
            + Vec3::new(0.0, offset.y, 0.0)
            + forward * -offset.z;
        if let Ok(mut transform) = scene.world.get::<&mut Transform>(held) {
            transform.position = world;
            transform.yaw = kin.yaw;
        }
    }

    fn highlight_candidate(&self, scene: &Scene, ray: Ray) -> Option<Entity> {
        let obstacles = scene.obstacles();
        let boxes: Vec<_> = obstacles.iter().map(|(_, aabb)| *aabb).collect();
        let (index, distance) =
            collision::ray_closest(ray.origin.to_array(), ray.direction.to_array(), &boxes)?;
        if distance > tuning::HIGHLIGHT_RAY_LENGTH {
            return None;
        }
        self.interactable_ancestor(scene, obstacles[index].0)
    }

    /// Walk up the parent chain to the nearest entity carrying an
    /// `Interactable`.
    fn interactable_ancestor(&self, scene: &Scene, hit: Entity) -> Option<Entity> {
        let mut current = hit;
        for _ in 0..32 {
            if scene.world.satisfies::<&Interactable>(current).unwrap_or(false) {
                return Some(current);
            }
            current = scene.parent_of(current)?;
        }
        None
    }

    fn apply_highlight(
        &mut self,
        scene: &mut Scene,
        candidate: Option<Entity>,
        events: &mut Vec<SimEvent>,
    ) {
        if candidate == self.highlighted {
            return;
        }
        if let Some(old) = self.highlighted.take() {
            if let Ok(mut interactable) = scene.world.get::<&mut Interactable>(old) {
                interactable.highlighted = false;
            }
            events.push(SimEvent::HighlightEnd { object: old });
        }
        if let Some(new) = candidate {
            if let Ok(mut interactable) = scene.world.get::<&mut Interactable>(new) {
                interactable.highlighted = true;
            }
            self.highlighted = Some(new);
            events.push(SimEvent::HighlightStart { object: new });
        }
    }

    /// Dispatch an interaction by the object's declared kind. Gated by
    /// the object's own cooldown and the interaction distance; a
    /// refused interaction starts no cooldown.
    pub fn interact_with(
        &mut self,
        entity: Entity,
        scene: &mut Scene,
        kin: &CharacterKinematics,
        events: &mut Vec<SimEvent>,
    ) -> bool {
        let Ok((kind, ready, payload)) = scene
            .world
            .get::<&Interactable>(entity)
            .map(|i| (i.kind, i.ready(), i.payload.clone()))
        else {
            return false;
        };
        if !ready {
            return false;
        }
        let Some(position) = scene.world_position(entity) else {
            return false;
        };
        let distance = kin.position.distance(&position);
        if distance > tuning::INTERACTION_DISTANCE {
            events.push(SimEvent::InteractionOutOfRange {
                object: entity,
                distance,
            });
            return false;
        }

        let succeeded = match kind {
            InteractableKind::Pickup => self.pickup_object(entity, scene, kin, events),
            InteractableKind::Use => {
                let mut active = false;
                if let Ok(mut interactable) = scene.world.get::<&mut Interactable>(entity) {
                    interactable.active = !interactable.active;
                    active = interactable.active;
                }
                events.push(SimEvent::ObjectUsed {
                    object: entity,
                    active,
                });
                true
            }
            InteractableKind::Data => {
                events.push(SimEvent::DataAccessed {
                    object: entity,
                    payload: payload.unwrap_or_default(),
                });
                true
            }
            InteractableKind::Container => {
                events.push(SimEvent::ContainerOpened {
                    object: entity,
                    payload: payload.unwrap_or_default(),
                });
                true
            }
            InteractableKind::Generic => {
                events.push(SimEvent::ObjectInteraction { object: entity });
                true
            }
        };
        // Cooldown belongs to the interaction that actually happened.
        if succeeded {
            if let Ok(mut interactable) = scene.world.get::<&mut Interactable>(entity) {
                interactable.cooldown_remaining = interactable.cooldown;
            }
        }
        succeeded
    }

    /// Take possession, dropping any current held object first.
    pub fn pickup_object(
        &mut self,
        entity: Entity,
        scene: &mut Scene,
        kin: &CharacterKinematics,
        events: &mut Vec<SimEvent>,
    ) -> bool {
        let is_pickup = scene
            .world
            .get::<&Interactable>(entity)
            .map(|i| i.kind == InteractableKind::Pickup)
            .unwrap_or(false);
        if !is_pickup || self.held == Some(entity) {
            return false;
        }
        if self.held.is_some() {
            self.drop_object(scene, kin, events);
        }

        let placement = SavedPlacement {
            parent: scene.parent_of(entity),
            position: scene
                .world
                .get::<&Transform>(entity)
                .map(|t| t.position)
                .unwrap_or(Vec3::ZERO),
            yaw: scene.world.get::<&Transform>(entity).map(|t| t.yaw).unwrap_or(0.0),
        };
        scene.clear_parent(entity);
        let _ = scene.world.insert(entity, (placement, Held));
        if let Ok(mut interactable) = scene.world.get::<&mut Interactable>(entity) {
            interactable.held = true;
            interactable.highlighted = false;
        }
        if let Ok(mut body) = scene.world.get::<&mut PhysicsBody>(entity) {
            body.velocity = Vec3::ZERO;
        }
        if self.highlighted == Some(entity) {
            self.highlighted = None;
            events.push(SimEvent::HighlightEnd { object: entity });
        }

        self.held = Some(entity);
        self.sync_held_transform(scene, kin);
        events.push(SimEvent::ObjectPickedUp { object: entity });
        true
    }

    /// Release the held object back into the scene in front of the
    /// character, restoring its recorded parent.
    pub fn drop_object(
        &mut self,
        scene: &mut Scene,
        kin: &CharacterKinematics,
        events: &mut Vec<SimEvent>,
    ) -> bool {
        let Some(entity) = self.held.take() else {
            return false;
        };
        let placement = scene.world.remove_one::<SavedPlacement>(entity).ok();
        let _ = scene.world.remove_one::<Held>(entity);

        let drop_world = kin.position
            + kin.forward() * tuning::DROP_FORWARD_OFFSET
            + Vec3::new(0.0, tuning::DROP_HEIGHT_OFFSET, 0.0);

        let mut local = drop_world;
        if let Some(parent) = placement.and_then(|p| p.parent) {
            if scene.world.contains(parent) {
                scene.set_parent(entity, parent);
                if let Some(parent_world) = scene.world_position(parent) {
                    local = drop_world - parent_world;
                }
            }
        }
        if let Ok(mut transform) = scene.world.get::<&mut Transform>(entity) {
            transform.position = local;
        }

        let mut affected = false;
        if let Ok(mut interactable) = scene.world.get::<&mut Interactable>(entity) {
            interactable.held = false;
            affected = interactable.affected_by_forces;
        }
        if affected {
            if let Ok(mut body) = scene.world.get::<&mut PhysicsBody>(entity) {
                body.velocity = kin.forward() * tuning::DROP_IMPULSE;
            }
        }

        events.push(SimEvent::ObjectDropped {
            object: entity,
            at: drop_world,
        });
        true
    }

    /// Drop variant that always returns to scene root and flings the
    /// object along the view direction.
    pub fn throw_object(
        &mut self,
        force: f32,
        scene: &mut Scene,
        kin: &CharacterKinematics,
        events: &mut Vec<SimEvent>,
    ) -> bool {
        let Some(entity) = self.held.take() else {
            return false;
        };
        let _ = scene.world.remove_one::<SavedPlacement>(entity);
        let _ = scene.world.remove_one::<Held>(entity);
        scene.clear_parent(entity);

        let release = kin.position
            + kin.forward() * tuning::DROP_FORWARD_OFFSET
            + Vec3::new(0.0, tuning::DROP_HEIGHT_OFFSET, 0.0);
        if let Ok(mut transform) = scene.world.get::<&mut Transform>(entity) {
            transform.position = release;
        }
        if let Ok(mut interactable) = scene.world.get::<&mut Interactable>(entity) {
            interactable.held = false;
        }
        if scene.world.satisfies::<&PhysicsBody>(entity).unwrap_or(false) {
            if let Ok(mut body) = scene.world.get::<&mut PhysicsBody>(entity) {
                body.velocity = kin.forward() * force;
            }
        } else {
            let _ = scene.world.insert_one(
                entity,
                PhysicsBody {
                    velocity: kin.forward() * force,
                },
            );
        }

        events.push(SimEvent::ObjectThrown {
            object: entity,
            force,
        });
        true
    }
}
