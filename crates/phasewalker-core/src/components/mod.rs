//! Components - pure data attached to scene entities

mod common;
mod objects;

pub use common::*;
pub use objects::*;
