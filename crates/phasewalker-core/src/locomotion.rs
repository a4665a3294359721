//! Locomotion and collision resolution for the character.
//!
//! One `step` per tick: horizontal velocity from input intent, vertical
//! dynamics (gravity, debounced jump), position integration, then probe
//! resolution against the obstacle snapshot. A floor plane at y = 0 is
//! implied, so an empty obstacle list still grounds the character.

use hecs::Entity;
use serde::{Deserialize, Serialize};

use crate::components::Vec3;
use crate::events::SimEvent;
use phasewalker_logic::collision::{self, Aabb, ProbeDirection};
use phasewalker_logic::constants::movement;
use phasewalker_logic::kinematics::{self, InputIntent};

/// Character movement state. Exclusively owned and mutated here; the
/// rest of the simulation reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterKinematics {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Facing yaw in radians, taken from the view each tick.
    pub yaw: f32,
    pub grounded: bool,
    pub sprinting: bool,
    pub crouching: bool,
    /// Seconds until another jump request may fire.
    pub jump_debounce: f32,
}

impl CharacterKinematics {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            yaw: 0.0,
            grounded: true,
            sprinting: false,
            crouching: false,
            jump_debounce: 0.0,
        }
    }

    /// Horizontal forward direction from the current yaw.
    pub fn forward(&self) -> Vec3 {
        Vec3::forward_from_yaw(self.yaw)
    }
}

fn probe_origin(position: Vec3, direction: ProbeDirection) -> [f32; 3] {
    let lift = match direction {
        ProbeDirection::Up => movement::CHARACTER_HEIGHT,
        _ => movement::CHARACTER_HEIGHT * 0.5,
    };
    [position.x, position.y + lift, position.z]
}

/// Advance the character by one tick against the obstacle snapshot.
pub fn step(
    kin: &mut CharacterKinematics,
    delta_time: f32,
    intent: &InputIntent,
    view_yaw: f32,
    obstacles: &[(Entity, Aabb)],
    events: &mut Vec<SimEvent>,
) {
    kin.jump_debounce = (kin.jump_debounce - delta_time).max(0.0);
    kin.yaw = view_yaw;
    kin.sprinting = intent.sprint;
    kin.crouching = intent.crouch;

    let speed = kinematics::movement_speed(movement::BASE_SPEED, intent.sprint, intent.crouch);
    let (vx, vz) = kinematics::horizontal_velocity(intent, view_yaw, speed);
    kin.velocity.x = vx;
    kin.velocity.z = vz;

    if intent.jump && kinematics::can_jump(kin.grounded, kin.jump_debounce) {
        kin.velocity.y = movement::JUMP_FORCE;
        kin.grounded = false;
        kin.jump_debounce = movement::JUMP_DEBOUNCE_SECS;
    } else if !kin.grounded {
        kin.velocity.y = kinematics::fall_velocity(kin.velocity.y, delta_time);
    }

    kin.position = kin.position + kin.velocity * delta_time;

    let boxes: Vec<Aabb> = obstacles.iter().map(|(_, aabb)| *aabb).collect();

    // Grounded probe, skipped while moving upward so a fresh jump is
    // not swallowed by the surface it left.
    if kin.velocity.y <= 0.0 {
        let origin = [
            kin.position.x,
            kin.position.y + movement::PROBE_ORIGIN_EPSILON,
            kin.position.z,
        ];
        let box_hit = collision::ray_closest(origin, [0.0, -1.0, 0.0], &boxes).map(|(_, t)| t);
        // Implied floor plane at y = 0.
        let floor_hit = if origin[1] >= 0.0 {
            Some(origin[1])
        } else {
            None
        };
        let hit = match (box_hit, floor_hit) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        let was_grounded = kin.grounded;
        kin.grounded = collision::grounded_from_probe(hit);
        if kin.grounded {
            kin.velocity.y = 0.0;
            if !was_grounded {
                if let Some(distance) = hit {
                    // Snap onto the surface the probe found.
                    kin.position.y += movement::PROBE_ORIGIN_EPSILON - distance;
                }
                events.push(SimEvent::Landed);
            }
        }
    }

    // Safety clamp below the world floor.
    if kin.position.y < 0.0 {
        kin.position.y = 0.0;
        kin.velocity.y = 0.0;
        if !kin.grounded {
            kin.grounded = true;
            events.push(SimEvent::Landed);
        }
    }

    // Lateral and overhead resolution.
    for direction in ProbeDirection::ALL {
        let origin = probe_origin(kin.position, direction);
        if let Some((index, distance)) = collision::ray_closest(origin, direction.dir(), &boxes) {
            if let Some(penetration) = collision::probe_penetration(distance) {
                let axis = direction.axis();
                *kin.position.axis_mut(axis) -= direction.sign() * penetration;
                if kin.velocity.axis(axis) * direction.sign() > 0.0 {
                    *kin.velocity.axis_mut(axis) = 0.0;
                }
                events.push(SimEvent::Collision {
                    object: obstacles[index].0,
                    direction,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn_entity() -> Entity {
        let mut world = hecs::World::new();
        world.spawn(())
    }

    fn run_ticks(
        kin: &mut CharacterKinematics,
        intent: &InputIntent,
        obstacles: &[(Entity, Aabb)],
        ticks: usize,
        dt: f32,
    ) -> Vec<SimEvent> {
        let mut events = Vec::new();
        for _ in 0..ticks {
            step(kin, dt, intent, kin.yaw, obstacles, &mut events);
        }
        events
    }

    #[test]
    fn idle_character_stays_put() {
        let mut kin = CharacterKinematics::at(Vec3::ZERO);
        run_ticks(&mut kin, &InputIntent::idle(), &[], 10, 0.05);
        assert_eq!(kin.position, Vec3::ZERO);
        assert!(kin.grounded);
    }

    #[test]
    fn forward_walk_moves_negative_z() {
        let mut kin = CharacterKinematics::at(Vec3::ZERO);
        let intent = InputIntent {
            forward: true,
            ..InputIntent::idle()
        };
        run_ticks(&mut kin, &intent, &[], 20, 0.05);
        // 5 u/s for 1 s, yaw 0 looks down −z.
        assert!((kin.position.z + 5.0).abs() < 0.01, "z {}", kin.position.z);
        assert!(kin.position.x.abs() < 0.01);
    }

    #[test]
    fn sprint_covers_more_ground() {
        let walk_intent = InputIntent {
            forward: true,
            ..InputIntent::idle()
        };
        let sprint_intent = InputIntent {
            sprint: true,
            ..walk_intent
        };
        let mut walker = CharacterKinematics::at(Vec3::ZERO);
        let mut sprinter = CharacterKinematics::at(Vec3::ZERO);
        run_ticks(&mut walker, &walk_intent, &[], 20, 0.05);
        run_ticks(&mut sprinter, &sprint_intent, &[], 20, 0.05);
        let ratio = sprinter.position.z / walker.position.z;
        assert!((ratio - 1.8).abs() < 0.01, "ratio {ratio}");
    }

    #[test]
    fn diagonal_no_faster_than_cardinal() {
        let cardinal = InputIntent {
            forward: true,
            ..InputIntent::idle()
        };
        let diagonal = InputIntent {
            forward: true,
            right: true,
            ..InputIntent::idle()
        };
        let mut a = CharacterKinematics::at(Vec3::ZERO);
        let mut b = CharacterKinematics::at(Vec3::ZERO);
        run_ticks(&mut a, &cardinal, &[], 20, 0.05);
        run_ticks(&mut b, &diagonal, &[], 20, 0.05);
        let da = a.position.distance(&Vec3::ZERO);
        let db = b.position.distance(&Vec3::ZERO);
        assert!((da - db).abs() < 0.01, "cardinal {da} diagonal {db}");
    }

    #[test]
    fn jump_rises_then_lands_once() {
        let mut kin = CharacterKinematics::at(Vec3::ZERO);
        let mut events = Vec::new();
        let jump = InputIntent {
            jump: true,
            ..InputIntent::idle()
        };
        step(&mut kin, 0.05, &jump, 0.0, &[], &mut events);
        assert!(!kin.grounded);
        assert!(kin.velocity.y > 0.0);
        assert!(kin.position.y > 0.0);

        let mut peak = kin.position.y;
        for _ in 0..60 {
            step(&mut kin, 0.05, &InputIntent::idle(), 0.0, &[], &mut events);
            peak = peak.max(kin.position.y);
        }
        assert!(peak > 1.0, "apex {peak}");
        assert!(kin.grounded);
        assert!(kin.position.y.abs() < 0.001);
        let landings = events
            .iter()
            .filter(|e| matches!(e, SimEvent::Landed))
            .count();
        assert_eq!(landings, 1);
    }

    #[test]
    fn jump_debounce_blocks_rapid_rejump() {
        let mut kin = CharacterKinematics::at(Vec3::ZERO);
        let mut events = Vec::new();
        let jump = InputIntent {
            jump: true,
            ..InputIntent::idle()
        };
        step(&mut kin, 0.05, &jump, 0.0, &[], &mut events);
        let v_after_first = kin.velocity.y;
        // Force back onto the ground inside the debounce window.
        kin.position.y = 0.0;
        kin.velocity.y = 0.0;
        kin.grounded = true;
        step(&mut kin, 0.05, &jump, 0.0, &[], &mut events);
        assert!(kin.velocity.y < v_after_first);
        assert!(kin.grounded);
    }

    #[test]
    fn wall_blocks_forward_movement() {
        let wall_entity = spawn_entity();
        // Wall across the path at z = −2.
        let wall = Aabb::new([0.0, 1.0, -2.0], [3.0, 1.0, 0.25]);
        let obstacles = vec![(wall_entity, wall)];
        let mut kin = CharacterKinematics::at(Vec3::ZERO);
        let intent = InputIntent {
            forward: true,
            ..InputIntent::idle()
        };
        let events = run_ticks(&mut kin, &intent, &obstacles, 40, 0.05);
        // Held off the wall face (z = −1.75) by radius + margin.
        assert!(kin.position.z > -1.75, "z {}", kin.position.z);
        assert!(kin.position.z < -0.9, "z {}", kin.position.z);
        assert!(events.iter().any(|e| matches!(
            e,
            SimEvent::Collision {
                object,
                direction: ProbeDirection::NegZ
            } if *object == wall_entity
        )));
    }

    #[test]
    fn ceiling_stops_upward_velocity() {
        let ceiling_entity = spawn_entity();
        // Bottom face at y = 2.8: clear while standing, hit mid-jump.
        let ceiling = Aabb::new([0.0, 3.05, 0.0], [3.0, 0.25, 3.0]);
        let obstacles = vec![(ceiling_entity, ceiling)];
        let mut kin = CharacterKinematics::at(Vec3::ZERO);
        let mut events = Vec::new();
        let jump = InputIntent {
            jump: true,
            ..InputIntent::idle()
        };
        step(&mut kin, 0.05, &jump, 0.0, &obstacles, &mut events);
        let mut peak: f32 = 0.0;
        for _ in 0..40 {
            step(&mut kin, 0.05, &InputIntent::idle(), 0.0, &obstacles, &mut events);
            peak = peak.max(kin.position.y);
        }
        assert!(events.iter().any(|e| matches!(
            e,
            SimEvent::Collision {
                direction: ProbeDirection::Up,
                ..
            }
        )));
        // Apex cut short of the 1.6 u free-jump height, back on the floor.
        assert!(peak < 1.0, "apex {peak}");
        assert!(kin.grounded);
    }

    #[test]
    fn lands_on_obstacle_top() {
        let crate_entity = spawn_entity();
        let crate_box = Aabb::new([0.0, 0.5, 0.0], [1.0, 0.5, 1.0]);
        let obstacles = vec![(crate_entity, crate_box)];
        let mut kin = CharacterKinematics::at(Vec3::new(0.0, 3.0, 0.0));
        kin.grounded = false;
        let events = run_ticks(&mut kin, &InputIntent::idle(), &obstacles, 40, 0.05);
        assert!(kin.grounded);
        assert!((kin.position.y - 1.0).abs() < 0.05, "y {}", kin.position.y);
        assert!(events.iter().any(|e| matches!(e, SimEvent::Landed)));
    }

    #[test]
    fn safety_clamp_catches_tunnelling() {
        let mut kin = CharacterKinematics::at(Vec3::new(0.0, 0.1, 0.0));
        kin.grounded = false;
        kin.velocity.y = -100.0;
        let mut events = Vec::new();
        step(&mut kin, 0.1, &InputIntent::idle(), 0.0, &[], &mut events);
        assert_eq!(kin.position.y, 0.0);
        assert_eq!(kin.velocity.y, 0.0);
        assert!(kin.grounded);
    }

    #[test]
    fn empty_obstacle_list_is_fine() {
        let mut kin = CharacterKinematics::at(Vec3::ZERO);
        let events = run_ticks(&mut kin, &InputIntent::idle(), &[], 5, 0.05);
        assert!(events.is_empty());
    }
}
