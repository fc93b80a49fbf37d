//! Player commands sent from the frontend to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{EntityId, Position};

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Deck ---
    /// Play the card in `slot`, spawning its unit at `position`.
    PlayCard { slot: usize, position: Position },
    /// Append an unlocked unit to the deck.
    AddCard { unit: String },
    /// Remove the card in `slot`.
    RemoveCard { slot: usize },

    // --- Game mode ---
    /// Switch between Hub and Defense.
    SwitchMode { mode: GameMode },
    /// Start a defense round immediately.
    StartDefense,

    // --- Progression ---
    /// Award experience to the player hub. Any award is one level.
    GrantExperience { amount: u32 },

    // --- Towers ---
    /// Change the spell a wizard tower casts.
    SetTowerSpell { tower: EntityId, spell: SpellKind },

    // --- Simulation control ---
    Pause,
    Resume,
}
