//! Core types and definitions for the Kingdom simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, unit templates, commands, state snapshots, events,
//! errors and constants. It has no dependency on any runtime framework.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;
pub mod units;
