//! Card zones.
//!
//! Every player owns the same four zones. A card is in exactly one zone of
//! exactly one player at any time; `CardLocation` names that slot.
//!
//! ## Key Types
//!
//! - `Zone`: Deck, Hand, Board or Discard
//! - `ZoneVisibility`: who may look at a zone's contents
//! - `CardLocation`: (owner, zone, index) of one card

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;

/// One of a player's four card zones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Deck,
    Hand,
    Board,
    Discard,
}

/// Zone visibility rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneVisibility {
    /// All cards visible to both players.
    Public,
    /// Cards visible only to the zone owner.
    OwnerOnly,
    /// Cards visible to nobody.
    Hidden,
}

impl Zone {
    pub const ALL: [Zone; 4] = [Zone::Deck, Zone::Hand, Zone::Board, Zone::Discard];

    #[must_use]
    pub const fn visibility(self) -> ZoneVisibility {
        match self {
            Zone::Deck => ZoneVisibility::Hidden,
            Zone::Hand => ZoneVisibility::OwnerOnly,
            Zone::Board | Zone::Discard => ZoneVisibility::Public,
        }
    }

    /// Can `viewer` see the cards of `owner`'s zone?
    #[must_use]
    pub fn visible_to(self, owner: PlayerId, viewer: PlayerId) -> bool {
        match self.visibility() {
            ZoneVisibility::Public => true,
            ZoneVisibility::OwnerOnly => owner == viewer,
            ZoneVisibility::Hidden => false,
        }
    }

    /// Upper-case name used in action and card-data strings.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Zone::Deck => "DECK",
            Zone::Hand => "HAND",
            Zone::Board => "BOARD",
            Zone::Discard => "DISCARD",
        }
    }

    /// Parse an upper-case zone name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Zone> {
        Zone::ALL.into_iter().find(|z| z.name() == name)
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a card currently sits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardLocation {
    pub player: PlayerId,
    pub zone: Zone,
    pub index: usize,
}

impl CardLocation {
    #[must_use]
    pub const fn new(player: PlayerId, zone: Zone, index: usize) -> Self {
        Self { player, zone, index }
    }
}
