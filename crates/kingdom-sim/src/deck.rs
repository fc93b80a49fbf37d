//! The player's deck: an ordered, size-bounded list of unit cards, each
//! with its own cooldown clock.

use std::sync::Arc;

use kingdom_ai::economy;
use kingdom_campaign::PlayerProfile;
use kingdom_core::components::ManaPool;
use kingdom_core::constants::TIMER_EPSILON;
use kingdom_core::error::{CommandError, ConfigError, SimError};
use kingdom_core::units::{UnitCatalog, UnitSpec};

#[derive(Debug, Clone)]
pub struct Card {
    pub unit: Arc<UnitSpec>,
    /// Level the card's unit is spawned at.
    pub level: u32,
    pub cooldown_remaining_secs: f64,
}

impl Card {
    pub fn is_cooling_down(&self) -> bool {
        self.cooldown_remaining_secs > TIMER_EPSILON
    }
}

#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    max_size: usize,
    /// Cooldown started by each play.
    card_cooldown_secs: f64,
}

impl Deck {
    pub fn new(max_size: usize, card_cooldown_secs: f64) -> Self {
        Self {
            cards: Vec::new(),
            max_size,
            card_cooldown_secs,
        }
    }

    /// Build the deck from the profile's saved deck, or from the first
    /// `max_deck_size` unlocked units when none is saved. Entries that are
    /// unknown or locked are skipped and reported.
    pub fn from_profile(
        profile: &PlayerProfile,
        catalog: &UnitCatalog,
        card_cooldown_secs: f64,
    ) -> (Self, Vec<CommandError>) {
        let mut deck = Self::new(profile.max_deck_size as usize, card_cooldown_secs);
        let names: Vec<&String> = if profile.deck.is_empty() {
            profile
                .unlocked_units
                .iter()
                .filter(|n| catalog.contains(n))
                .take(deck.max_size)
                .collect()
        } else {
            profile.deck.iter().collect()
        };
        let mut rejected = Vec::new();
        for name in names {
            if let Err(e) = deck.add(name, profile, catalog) {
                rejected.push(e);
            }
        }
        (deck, rejected)
    }

    /// Append an unlocked unit.
    pub fn add(
        &mut self,
        unit: &str,
        profile: &PlayerProfile,
        catalog: &UnitCatalog,
    ) -> Result<(), CommandError> {
        if self.cards.len() >= self.max_size {
            return Err(CommandError::DeckFull { max: self.max_size });
        }
        if !profile.is_unlocked(unit) {
            return Err(CommandError::NotUnlocked(unit.to_string()));
        }
        let spec = catalog.get(unit).ok_or_else(|| {
            SimError::InvalidConfiguration(ConfigError::UnknownUnit(unit.to_string()))
        })?;
        self.cards.push(Card {
            unit: spec.clone(),
            level: profile.level.max(1),
            cooldown_remaining_secs: 0.0,
        });
        Ok(())
    }

    pub fn remove(&mut self, slot: usize) -> Result<Card, CommandError> {
        if slot >= self.cards.len() {
            return Err(CommandError::UnknownSlot(slot));
        }
        Ok(self.cards.remove(slot))
    }

    /// Advance every card's cooldown.
    pub fn tick(&mut self, dt: f64) {
        for card in &mut self.cards {
            card.cooldown_remaining_secs = (card.cooldown_remaining_secs - dt).max(0.0);
        }
    }

    /// The card in `slot` if it can be played with `mana`.
    pub fn playable(&self, slot: usize, mana: &ManaPool) -> Result<&Card, CommandError> {
        let card = self.cards.get(slot).ok_or(CommandError::UnknownSlot(slot))?;
        if card.is_cooling_down() {
            return Err(CommandError::CardOnCooldown {
                slot,
                remaining_secs: card.cooldown_remaining_secs,
            });
        }
        if !economy::can_afford_card(mana, card.unit.mana_cost) {
            return Err(CommandError::NotEnoughMana {
                required: card.unit.mana_cost,
                available: mana.current,
            });
        }
        Ok(card)
    }

    pub fn start_cooldown(&mut self, slot: usize) {
        if let Some(card) = self.cards.get_mut(slot) {
            card.cooldown_remaining_secs = self.card_cooldown_secs;
        }
    }

    /// Raise the size bound and the spawn level of every card.
    pub fn on_level_up(&mut self, max_size: usize, level: u32) {
        self.max_size = max_size;
        for card in &mut self.cards {
            card.level = level;
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Unit names in slot order, for the profile write-back.
    pub fn names(&self) -> Vec<String> {
        self.cards.iter().map(|c| c.unit.name.clone()).collect()
    }
}
