//! Players and per-player storage.
//!
//! ## PlayerId
//!
//! Mindbug is strictly two-player, so `PlayerId` is 0 or 1 and every player
//! has exactly one opponent.
//!
//! ## PlayerMap
//!
//! Fixed two-slot storage indexed by `PlayerId`.
//!
//! ## Player
//!
//! Life, Mindbug tokens and the four private/public card zones.

use im::Vector;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use crate::cards::Card;
use crate::core::EntityId;
use crate::zones::Zone;

/// Player identifier: 0 for the first player, 1 for the second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    ///
    /// Panics if `id` is not 0 or 1.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        assert!(id < 2, "Mindbug has exactly two players");
        Self(id)
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The other player.
    #[must_use]
    pub const fn opponent(self) -> Self {
        Self(1 - self.0)
    }

    /// Both players, first player first.
    pub fn both() -> impl Iterator<Item = PlayerId> {
        [PlayerId(0), PlayerId(1)].into_iter()
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{}", self.0 + 1)
    }
}

/// Per-player data storage with O(1) access.
///
/// ```
/// use mindbug_engine::core::{PlayerId, PlayerMap};
///
/// let mut hp: PlayerMap<i32> = PlayerMap::new(|_| 3);
/// hp[PlayerId::new(1)] -= 1;
/// assert_eq!(hp[PlayerId::new(0)], 3);
/// assert_eq!(hp[PlayerId::new(1)], 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: [T; 2],
}

impl<T> PlayerMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(factory: impl Fn(PlayerId) -> T) -> Self {
        Self {
            data: [factory(PlayerId(0)), factory(PlayerId(1))],
        }
    }

    /// Get a reference to a player's data.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a player's data.
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Mutable access to both entries at once, in (player, opponent) order.
    pub fn pair_mut(&mut self, player: PlayerId) -> (&mut T, &mut T) {
        let [first, second] = &mut self.data;
        if player.index() == 0 {
            (first, second)
        } else {
            (second, first)
        }
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over (PlayerId, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}

/// One side of the table.
///
/// Zones are `im::Vector`s so cloning a player for a search iteration shares
/// structure with the original until one side writes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Display name.
    pub name: String,
    /// Life total, never below 0.
    pub hp: i32,
    /// Remaining Mindbug tokens; only ever decreases.
    pub mindbugs: u8,
    /// Draw pile; the top card is the back of the vector.
    pub deck: Vector<Card>,
    pub hand: Vector<Card>,
    pub board: Vector<Card>,
    pub discard: Vector<Card>,
}

impl Player {
    /// Create a player with empty zones.
    #[must_use]
    pub fn new(name: impl Into<String>, hp: i32, mindbugs: u8) -> Self {
        Self {
            name: name.into(),
            hp,
            mindbugs,
            deck: Vector::new(),
            hand: Vector::new(),
            board: Vector::new(),
            discard: Vector::new(),
        }
    }

    /// Cards in a zone.
    #[must_use]
    pub fn zone(&self, zone: Zone) -> &Vector<Card> {
        match zone {
            Zone::Deck => &self.deck,
            Zone::Hand => &self.hand,
            Zone::Board => &self.board,
            Zone::Discard => &self.discard,
        }
    }

    /// Mutable cards in a zone.
    pub fn zone_mut(&mut self, zone: Zone) -> &mut Vector<Card> {
        match zone {
            Zone::Deck => &mut self.deck,
            Zone::Hand => &mut self.hand,
            Zone::Board => &mut self.board,
            Zone::Discard => &mut self.discard,
        }
    }

    /// Find a card in any of this player's zones.
    #[must_use]
    pub fn find(&self, id: EntityId) -> Option<(Zone, usize)> {
        Zone::ALL.into_iter().find_map(|zone| {
            self.zone(zone)
                .iter()
                .position(|c| c.id == id)
                .map(|index| (zone, index))
        })
    }

    /// Index of a card on the board.
    #[must_use]
    pub fn board_index(&self, id: EntityId) -> Option<usize> {
        self.board.iter().position(|c| c.id == id)
    }

    /// Lose `amount` life, flooring at zero.
    pub fn lose_hp(&mut self, amount: i32) {
        self.hp = (self.hp - amount).max(0);
    }

    /// Draw the top card of the deck into hand.
    ///
    /// Returns false if the deck is empty.
    pub fn draw(&mut self) -> bool {
        match self.deck.pop_back() {
            Some(card) => {
                self.hand.push_back(card);
                true
            }
            None => false,
        }
    }

    /// Total number of physical cards this player holds across all zones.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.deck.len() + self.hand.len() + self.board.len() + self.discard.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardDefinition;
    use std::sync::Arc;

    fn card(id: u32, power: i32) -> Card {
        Card::new(EntityId(id), Arc::new(CardDefinition::creature("Test", power)))
    }

    #[test]
    fn test_player_id_opponent() {
        assert_eq!(PlayerId::new(0).opponent(), PlayerId::new(1));
        assert_eq!(PlayerId::new(1).opponent(), PlayerId::new(0));
        assert_eq!(format!("{}", PlayerId::new(0)), "P1");
    }

    #[test]
    #[should_panic(expected = "exactly two players")]
    fn test_player_id_out_of_range() {
        let _ = PlayerId::new(2);
    }

    #[test]
    fn test_player_map_pair_mut() {
        let mut map: PlayerMap<i32> = PlayerMap::new(|p| p.index() as i32);
        let (me, them) = map.pair_mut(PlayerId::new(1));
        *me += 10;
        *them += 20;
        assert_eq!(map[PlayerId::new(0)], 20);
        assert_eq!(map[PlayerId::new(1)], 11);
    }

    #[test]
    fn test_lose_hp_floors_at_zero() {
        let mut player = Player::new("A", 1, 2);
        player.lose_hp(3);
        assert_eq!(player.hp, 0);
    }

    #[test]
    fn test_draw_from_top() {
        let mut player = Player::new("A", 3, 2);
        player.deck.push_back(card(1, 1));
        player.deck.push_back(card(2, 2));

        assert!(player.draw());
        assert_eq!(player.hand[0].id, EntityId(2));
        assert!(player.draw());
        assert!(!player.draw());
        assert_eq!(player.hand.len(), 2);
    }

    #[test]
    fn test_find_across_zones() {
        let mut player = Player::new("A", 3, 2);
        player.board.push_back(card(5, 3));
        player.discard.push_back(card(6, 3));

        assert_eq!(player.find(EntityId(5)), Some((Zone::Board, 0)));
        assert_eq!(player.find(EntityId(6)), Some((Zone::Discard, 0)));
        assert_eq!(player.find(EntityId(7)), None);
        assert_eq!(player.card_count(), 2);
    }
}
