//! Name-keyed collection of player profiles with a current selection.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::profile::PlayerProfile;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("no profile named `{0}`")]
    NotFound(String),
    #[error("failed to parse profile book: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("profile book i/o: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileBook {
    profiles: BTreeMap<String, PlayerProfile>,
    #[serde(default)]
    current: Option<String>,
}

impl ProfileBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a profile with default stats and make it current.
    /// No-op when the name is already taken.
    pub fn create(&mut self, name: &str) -> bool {
        if self.profiles.contains_key(name) {
            return false;
        }
        self.profiles
            .insert(name.to_string(), PlayerProfile::new(name));
        self.current = Some(name.to_string());
        true
    }

    /// Insert or replace a whole profile (e.g. one written back by the engine).
    pub fn upsert(&mut self, profile: PlayerProfile) {
        self.profiles.insert(profile.name.clone(), profile);
    }

    pub fn select(&mut self, name: &str) -> Result<(), ProfileError> {
        if !self.profiles.contains_key(name) {
            return Err(ProfileError::NotFound(name.to_string()));
        }
        self.current = Some(name.to_string());
        Ok(())
    }

    /// Remove a profile. Clears the selection if it was current.
    pub fn delete(&mut self, name: &str) -> Result<PlayerProfile, ProfileError> {
        let removed = self
            .profiles
            .remove(name)
            .ok_or_else(|| ProfileError::NotFound(name.to_string()))?;
        if self.current.as_deref() == Some(name) {
            self.current = None;
        }
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.profiles.clear();
        self.current = None;
    }

    pub fn get(&self, name: &str) -> Option<&PlayerProfile> {
        self.profiles.get(name)
    }

    pub fn current(&self) -> Option<&PlayerProfile> {
        self.current.as_deref().and_then(|n| self.profiles.get(n))
    }

    pub fn current_mut(&mut self) -> Option<&mut PlayerProfile> {
        match self.current.as_deref() {
            Some(n) => self.profiles.get_mut(n),
            None => None,
        }
    }

    /// Profile names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.profiles.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn to_json(&self) -> Result<String, ProfileError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a book. A dangling current selection is dropped.
    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        let mut book: ProfileBook = serde_json::from_str(json)?;
        if let Some(name) = &book.current {
            if !book.profiles.contains_key(name) {
                book.current = None;
            }
        }
        Ok(book)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ProfileError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ProfileError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
