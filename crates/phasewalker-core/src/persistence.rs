//! Save/load for the character snapshot.
//!
//! Bincode over `Write`/`Read` with a format-version gate. The
//! snapshot covers durable character state: stat bases, the modifier
//! layer, progression, and ability levels/cooldowns/active flags.
//! Tick-local state (status-effect timers, queued events, highlight)
//! is reset on load rather than persisted.

use std::collections::HashMap;
use std::fmt;
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::abilities::AbilityBook;
use crate::ledger::{Modifier, ResourceLedger, StatId};

/// Bumped whenever the snapshot layout changes.
pub const SAVE_VERSION: u32 = 1;

#[derive(Debug)]
pub enum SaveError {
    Io(std::io::Error),
    Bincode(Box<bincode::ErrorKind>),
    VersionMismatch { expected: u32, found: u32 },
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "save i/o error: {e}"),
            SaveError::Bincode(e) => write!(f, "save encoding error: {e}"),
            SaveError::VersionMismatch { expected, found } => {
                write!(f, "save version mismatch: expected {expected}, found {found}")
            }
        }
    }
}

impl std::error::Error for SaveError {}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<Box<bincode::ErrorKind>> for SaveError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        SaveError::Bincode(e)
    }
}

/// Durable character snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    pub stat_bases: HashMap<StatId, f32>,
    pub modifiers: Vec<Modifier>,
    pub next_modifier_handle: u64,
    pub level: u32,
    pub skill_points: u32,
    pub abilities: AbilityBook,
}

impl SaveData {
    pub fn capture(ledger: &ResourceLedger, abilities: &AbilityBook) -> Self {
        Self {
            version: SAVE_VERSION,
            stat_bases: ledger.base.clone(),
            modifiers: ledger.modifiers.clone(),
            next_modifier_handle: ledger.next_handle,
            level: ledger.level,
            skill_points: ledger.skill_points,
            abilities: abilities.clone(),
        }
    }

    /// Restore into live state, resetting tick-local timing.
    pub fn restore(&self, ledger: &mut ResourceLedger, abilities: &mut AbilityBook) {
        ledger.base = self.stat_bases.clone();
        ledger.modifiers = self.modifiers.clone();
        ledger.next_handle = self.next_modifier_handle;
        ledger.level = self.level;
        ledger.skill_points = self.skill_points;
        ledger.status_effects.clear();
        ledger.alive = ledger.stat_value(StatId::Health) > 0.0;
        *abilities = self.abilities.clone();
    }
}

pub fn save<W: Write>(
    writer: W,
    ledger: &ResourceLedger,
    abilities: &AbilityBook,
) -> Result<(), SaveError> {
    let data = SaveData::capture(ledger, abilities);
    bincode::serialize_into(writer, &data)?;
    Ok(())
}

pub fn load<R: Read>(reader: R) -> Result<SaveData, SaveError> {
    let data: SaveData = bincode::deserialize_from(reader)?;
    if data.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: data.version,
        });
    }
    Ok(data)
}
