//! Card instances - runtime card state.
//!
//! A `Card` is one physical copy. Its working `power` and `keywords` are
//! always derived: printed value, plus permanent modifiers from one-shot
//! effects, plus the aura contributions the passive pass last computed.
//! `reset()` drops everything but the printed values and is called on every
//! zone change.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::definition::{CardDefinition, Trigger};
use super::keyword::{Keyword, KeywordSet};
use crate::core::EntityId;
use crate::effects::CardEffect;

/// A card in a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Unique id of this physical copy.
    pub id: EntityId,

    pub def: Arc<CardDefinition>,

    /// Effective power, never negative.
    pub power: i32,

    /// Effective keywords.
    pub keywords: KeywordSet,

    /// The TOUGH reprieve has been used.
    pub is_damaged: bool,

    /// Permanent power change from one-shot effects.
    pub power_bonus: i32,

    /// Keywords granted by one-shot effects.
    pub granted: KeywordSet,

    /// Power change from passive auras.
    pub aura_power: i32,

    /// Keywords from passive auras.
    pub aura_keywords: KeywordSet,
}

impl Card {
    /// Create a fresh copy of `def`.
    #[must_use]
    pub fn new(id: EntityId, def: Arc<CardDefinition>) -> Self {
        let mut card = Self {
            id,
            power: def.power.max(0),
            keywords: def.keywords,
            def,
            is_damaged: false,
            power_bonus: 0,
            granted: KeywordSet::EMPTY,
            aura_power: 0,
            aura_keywords: KeywordSet::EMPTY,
        };
        card.recompute();
        card
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.def.name
    }

    #[must_use]
    pub fn base_power(&self) -> i32 {
        self.def.power
    }

    #[must_use]
    pub fn base_keywords(&self) -> KeywordSet {
        self.def.keywords
    }

    #[must_use]
    pub fn trigger(&self) -> Option<Trigger> {
        self.def.trigger
    }

    #[must_use]
    pub fn effects(&self) -> &[CardEffect] {
        &self.def.effects
    }

    #[must_use]
    pub fn has(&self, keyword: Keyword) -> bool {
        self.keywords.contains(keyword)
    }

    /// Power without passive contributions.
    #[must_use]
    pub fn unaura_power(&self) -> i32 {
        (self.def.power + self.power_bonus).max(0)
    }

    /// Printed plus permanently granted keywords; what COPY_KEYWORDS copies.
    #[must_use]
    pub fn own_keywords(&self) -> KeywordSet {
        self.def.keywords | self.granted
    }

    /// Back to printed values: modifiers, auras and damage are cleared.
    pub fn reset(&mut self) {
        self.is_damaged = false;
        self.power_bonus = 0;
        self.granted = KeywordSet::EMPTY;
        self.clear_aura();
        self.recompute();
    }

    pub fn clear_aura(&mut self) {
        self.aura_power = 0;
        self.aura_keywords = KeywordSet::EMPTY;
    }

    /// Rederive `power` and `keywords` from their parts.
    pub fn recompute(&mut self) {
        self.power = (self.def.power + self.power_bonus + self.aura_power).max(0);
        self.keywords = self.def.keywords | self.granted | self.aura_keywords;
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}){}", self.def.name, self.power, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tortoise() -> Card {
        let def = CardDefinition::creature("Shield Tortoise", 5).with_keyword(Keyword::Tough);
        Card::new(EntityId(1), Arc::new(def))
    }

    #[test]
    fn test_new_uses_printed_values() {
        let card = tortoise();
        assert_eq!(card.power, 5);
        assert!(card.has(Keyword::Tough));
        assert!(!card.is_damaged);
    }

    #[test]
    fn test_recompute_combines_layers() {
        let mut card = tortoise();
        card.power_bonus = 2;
        card.granted.insert(Keyword::Poison);
        card.aura_power = -10;
        card.aura_keywords.insert(Keyword::Sneaky);
        card.recompute();

        assert_eq!(card.power, 0);
        assert_eq!(card.unaura_power(), 7);
        assert!(card.has(Keyword::Poison));
        assert!(card.has(Keyword::Sneaky));
        assert!(!card.own_keywords().contains(Keyword::Sneaky));
    }

    #[test]
    fn test_reset_restores_base() {
        let mut card = tortoise();
        card.is_damaged = true;
        card.power_bonus = 3;
        card.granted.insert(Keyword::Hunter);
        card.recompute();

        card.reset();
        assert_eq!(card.power, 5);
        assert_eq!(card.keywords, card.base_keywords());
        assert!(!card.is_damaged);
    }

    #[test]
    fn test_display() {
        assert_eq!(tortoise().to_string(), "Shield Tortoise (5)#1");
    }

    #[test]
    fn test_serialization_shares_definition_contents() {
        let card = tortoise();
        let json = serde_json::to_string(&card).unwrap();
        let back: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(card, back);
    }
}
