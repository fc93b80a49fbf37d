//! Campaign layer for Kingdom: player profiles and level progression.
//!
//! The simulation consumes a `PlayerProfile` as its initial state and
//! writes back gold, level stats, deck and play time. Where the book is
//! stored is the host's concern; this crate only speaks JSON.

pub mod book;
pub mod profile;
pub mod progression;

pub use book::{ProfileBook, ProfileError};
pub use profile::PlayerProfile;
pub use progression::HubStats;
