//! Runner configuration: one JSON file, every field optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use kingdom_campaign::{PlayerProfile, ProfileBook};
use kingdom_core::enums::Kingdom;
use kingdom_core::error::ConfigError;
use kingdom_core::units::{UnitCatalog, UnitSpec};
use kingdom_sim::engine::SimConfig;
use kingdom_sim::scenario::ScenarioConfig;

use crate::state::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub seed: u64,
    /// Profile to play; created with the starter roster when missing.
    pub player: String,
    /// Kingdom of a newly created profile.
    pub kingdom: Kingdom,
    pub heal_includes_caster: bool,
    /// Simulated length of the scripted round.
    pub duration_secs: f64,
    /// Replaces the built-in roster when non-empty.
    pub units: Vec<UnitSpec>,
    pub scenario: ScenarioConfig,
    /// Profile book read before and written after the run.
    pub profiles_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            player: "Player".into(),
            kingdom: Kingdom::GreatZoey,
            heal_includes_caster: true,
            duration_secs: 60.0,
            units: Vec::new(),
            scenario: ScenarioConfig::default(),
            profiles_path: None,
        }
    }
}

impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        serde_json::from_str(json).map_err(|e| AppError::Config(ConfigError::from(e)))
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let json = std::fs::read_to_string(path).map_err(|source| AppError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// The configured roster, or the built-in one. Bad entries are skipped.
    pub fn catalog(&self) -> UnitCatalog {
        if self.units.is_empty() {
            return UnitCatalog::builtin();
        }
        let (catalog, rejected) = UnitCatalog::from_specs(self.units.iter().cloned());
        for err in &rejected {
            warn!(%err, "unit template skipped");
        }
        catalog
    }

    /// The profile book at `profiles_path`, or an empty one.
    pub fn profile_book(&self) -> Result<ProfileBook, AppError> {
        match &self.profiles_path {
            Some(path) if path.exists() => Ok(ProfileBook::load_from_file(path)?),
            _ => Ok(ProfileBook::new()),
        }
    }

    /// Select (or create) the configured player in `book`.
    pub fn resolve_profile(&self, book: &mut ProfileBook, catalog: &UnitCatalog) -> PlayerProfile {
        if let Some(existing) = book.get(&self.player) {
            let profile = existing.clone();
            let _ = book.select(&self.player);
            info!(player = %profile.name, level = profile.level, "profile selected");
            return profile;
        }
        let profile = PlayerProfile::starter(self.player.as_str(), self.kingdom, catalog);
        book.create(&self.player);
        book.upsert(profile.clone());
        info!(player = %profile.name, kingdom = ?profile.kingdom, "profile created");
        profile
    }

    pub fn sim_config(&self, catalog: UnitCatalog, profile: PlayerProfile) -> SimConfig {
        SimConfig {
            seed: self.seed,
            profile,
            catalog,
            scenario: self.scenario.clone(),
            heal_includes_caster: self.heal_includes_caster,
        }
    }
}
