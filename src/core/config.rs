//! Match configuration.
//!
//! The numbers that shape a Mindbug match: life, Mindbug tokens, hand size
//! and how many cards each player's deck is dealt from the pool.

use serde::{Deserialize, Serialize};

use super::PlayerId;

/// Configuration for one match.
///
/// ```
/// use mindbug_engine::core::GameConfig;
///
/// let config = GameConfig::default().with_starting_hp(5).with_hand_size(4);
/// assert_eq!(config.starting_hp, 5);
/// assert_eq!(config.starting_mindbugs, 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Life each player starts with.
    pub starting_hp: i32,

    /// Mindbug tokens each player starts with.
    pub starting_mindbugs: u8,

    /// Hands are refilled up to this many cards.
    pub hand_size: usize,

    /// Cards dealt from the shuffled pool into each player's deck.
    pub deck_size: usize,

    /// Player who takes the first turn.
    pub first_player: PlayerId,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_hp: 3,
            starting_mindbugs: 2,
            hand_size: 5,
            deck_size: 10,
            first_player: PlayerId(0),
        }
    }
}

impl GameConfig {
    /// Set starting life.
    #[must_use]
    pub fn with_starting_hp(mut self, hp: i32) -> Self {
        self.starting_hp = hp;
        self
    }

    /// Set starting Mindbug tokens.
    #[must_use]
    pub fn with_starting_mindbugs(mut self, mindbugs: u8) -> Self {
        self.starting_mindbugs = mindbugs;
        self
    }

    /// Set the hand refill size.
    #[must_use]
    pub fn with_hand_size(mut self, hand_size: usize) -> Self {
        self.hand_size = hand_size;
        self
    }

    /// Set the per-player deck size.
    #[must_use]
    pub fn with_deck_size(mut self, deck_size: usize) -> Self {
        self.deck_size = deck_size;
        self
    }

    /// Set who goes first.
    #[must_use]
    pub fn with_first_player(mut self, player: PlayerId) -> Self {
        self.first_player = player;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.starting_hp, 3);
        assert_eq!(config.starting_mindbugs, 2);
        assert_eq!(config.hand_size, 5);
        assert_eq!(config.deck_size, 10);
        assert_eq!(config.first_player, PlayerId(0));
    }

    #[test]
    fn test_serialization() {
        let config = GameConfig::default().with_first_player(PlayerId(1));
        let json = serde_json::to_string(&config).unwrap();
        let back: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
