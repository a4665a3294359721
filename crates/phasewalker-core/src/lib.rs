//! Phasewalker Core - Character Simulation Engine
//!
//! The simulation truth for a single playable character: locomotion and
//! collision resolution, the resource/progression ledger, the ability
//! state machine, and world-object interaction/possession. Rendering,
//! cameras, particles, and UI are external consumers that read state
//! and drain the per-tick event queue.
//!
//! # Architecture
//!
//! Scene objects (obstacles, interactables, constructs) live in a
//! `hecs` world; character-owned state lives in plain structs mutated
//! only through their own APIs. Every tick takes an explicit
//! `delta_time` and runs the four subsystems in a fixed order:
//! ledger → locomotion → abilities → interaction.
//!
//! # Example
//!
//! ```rust,no_run
//! use phasewalker_core::prelude::*;
//!
//! let mut sim = CharacterSimulation::new();
//! sim.generate(ChamberConfig::default());
//!
//! loop {
//!     sim.tick(1.0 / 60.0, &TickInput::default());
//!     for event in sim.drain_events() {
//!         // hand to rendering/audio/UI
//!         let _ = event;
//!     }
//! }
//! ```

pub mod abilities;
pub mod components;
pub mod engine;
pub mod events;
pub mod generation;
pub mod interaction;
pub mod ledger;
pub mod locomotion;
pub mod persistence;
pub mod scene;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::abilities::{AbilityBook, AbilityKind, AbilityTarget};
    pub use crate::components::*;
    pub use crate::engine::{CharacterSimulation, TickInput};
    pub use crate::events::SimEvent;
    pub use crate::generation::ChamberConfig;
    pub use crate::interaction::Ray;
    pub use crate::ledger::{ResourceLedger, StatId};
    pub use crate::locomotion::CharacterKinematics;
    pub use phasewalker_logic::kinematics::InputIntent;
}
