//! Error taxonomy shared by all crates.
//!
//! Nothing here ever escapes a simulation tick: systems log and skip,
//! commands are rejected with a `CommandRejected` event.

use thiserror::Error;

use crate::enums::{GameMode, Kingdom};

/// Runtime failures of a simulation feature.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// A required collaborator (hub, camp, base) cannot be located.
    #[error("missing reference: {0}")]
    MissingReference(&'static str),
    /// A data template is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    /// A dependency is not ready yet; the caller may retry.
    #[error("{what} not available after {waited_secs:.1}s")]
    TransientUnavailable { what: &'static str, waited_secs: f64 },
}

/// Load-time template problems. An offending entry is kept out of the roster.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unit template has an empty name")]
    EmptyName,
    #[error("unit `{unit}`: field `{field}` is not a finite number")]
    NonFinite { unit: String, field: &'static str },
    #[error("unit `{unit}` is ranged but has no projectile speed")]
    MissingProjectileSpeed { unit: String },
    #[error("unknown unit `{0}`")]
    UnknownUnit(String),
    #[error("unit `{unit}` belongs to {unit_kingdom:?}, not {expected:?}")]
    KingdomMismatch {
        unit: String,
        unit_kingdom: Kingdom,
        expected: Kingdom,
    },
    #[error("duplicate unit `{0}`")]
    DuplicateUnit(String),
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

/// Reasons a player command is refused.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("not enough mana: need {required}, have {available:.1}")]
    NotEnoughMana { required: u32, available: f64 },
    #[error("card in slot {slot} is cooling down ({remaining_secs:.1}s left)")]
    CardOnCooldown { slot: usize, remaining_secs: f64 },
    #[error("deck is full ({max} cards)")]
    DeckFull { max: usize },
    #[error("no card in slot {0}")]
    UnknownSlot(usize),
    #[error("unit `{0}` is not unlocked")]
    NotUnlocked(String),
    #[error("command requires {required:?} mode")]
    WrongMode { required: GameMode },
    #[error("no such entity")]
    UnknownEntity,
    #[error(transparent)]
    Sim(#[from] SimError),
}
