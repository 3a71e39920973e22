//! Game state.
//!
//! ## GameState
//!
//! Everything that changes during a match: both players and their zones,
//! turn bookkeeping, the phase, and the transient records that say which
//! input the engine is waiting for:
//!
//! - `pending_card`: played card awaiting the opponent's Mindbug decision
//! - `pending_attacker`: attacker awaiting the defender's block decision
//! - `active_request`: open target selection
//! - `continuations`: work to resume once the open selection completes
//!
//! Cloning is cheap: zones are `im` vectors and card definitions are shared
//! `Arc`s that are never mutated, so a clone and its original never observe
//! each other's writes.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::action::ActionRecord;
use super::config::GameConfig;
use super::entity::EntityId;
use super::error::SnapshotError;
use super::player::{Player, PlayerId, PlayerMap};
use super::rng::GameRng;
use crate::cards::Card;
use crate::rules::{Continuation, SelectionRequest};
use crate::zones::{CardLocation, Zone};

/// Phase of the turn state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// First player's main phase.
    P1Main,
    /// Second player's main phase.
    P2Main,
    /// The opponent of the player who just played decides whether to Mindbug.
    MindbugDecision,
    /// The defender decides how to block.
    BlockDecision,
    /// A player is picking targets for an effect.
    ResolutionChoice,
    GameOver,
}

impl Phase {
    /// Main phase of `player`.
    #[must_use]
    pub const fn main_for(player: PlayerId) -> Phase {
        if player.0 == 0 {
            Phase::P1Main
        } else {
            Phase::P2Main
        }
    }

    #[must_use]
    pub const fn is_main(self) -> bool {
        matches!(self, Phase::P1Main | Phase::P2Main)
    }
}

/// A played card waiting for the Mindbug decision.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PendingCard {
    pub card: Card,
    /// Player who played it.
    pub owner: PlayerId,
}

/// Complete game state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    pub config: GameConfig,

    pub players: PlayerMap<Player>,

    /// Turn number, starting at 1.
    pub turn_count: u32,

    /// Player whose input the engine is waiting for.
    pub active_player: PlayerId,

    /// Player whose turn it is.
    pub turn_player: PlayerId,

    pub phase: Phase,

    pub winner: Option<PlayerId>,

    pub pending_card: Option<PendingCard>,

    pub pending_attacker: Option<EntityId>,

    /// Creature a Hunter attacker picked; it must block.
    pub forced_blocker: Option<EntityId>,

    /// Frenzy creature that has already made its first attack this turn.
    pub frenzy_candidate: Option<EntityId>,

    pub active_request: Option<SelectionRequest>,

    /// Resume stack, top is the back.
    pub continuations: Vec<Continuation>,

    /// Every accepted action, in order.
    pub history: Vector<ActionRecord>,

    pub rng: GameRng,
}

impl GameState {
    /// Empty table: both players at starting life with no cards.
    #[must_use]
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let players = PlayerMap::new(|p| {
            Player::new(
                format!("Player {}", p.0 + 1),
                config.starting_hp,
                config.starting_mindbugs,
            )
        });
        let first = config.first_player;
        Self {
            config,
            players,
            turn_count: 1,
            active_player: first,
            turn_player: first,
            phase: Phase::main_for(first),
            winner: None,
            pending_card: None,
            pending_attacker: None,
            forced_blocker: None,
            frenzy_candidate: None,
            active_request: None,
            continuations: Vec::new(),
            history: Vector::new(),
            rng: GameRng::new(seed),
        }
    }

    #[must_use]
    pub fn player(&self, player: PlayerId) -> &Player {
        &self.players[player]
    }

    pub fn player_mut(&mut self, player: PlayerId) -> &mut Player {
        &mut self.players[player]
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Where a card is, if it is in any zone.
    ///
    /// The pending card is in no zone.
    #[must_use]
    pub fn locate(&self, id: EntityId) -> Option<CardLocation> {
        self.players
            .iter()
            .find_map(|(player, p)| p.find(id).map(|(zone, index)| CardLocation::new(player, zone, index)))
    }

    /// Locate a card only if it is on a board.
    #[must_use]
    pub fn locate_on_board(&self, id: EntityId) -> Option<CardLocation> {
        self.locate(id).filter(|loc| loc.zone == Zone::Board)
    }

    #[must_use]
    pub fn card(&self, id: EntityId) -> Option<&Card> {
        let loc = self.locate(id)?;
        self.players[loc.player].zone(loc.zone).get(loc.index)
    }

    pub fn card_mut(&mut self, id: EntityId) -> Option<&mut Card> {
        let loc = self.locate(id)?;
        self.players[loc.player].zone_mut(loc.zone).get_mut(loc.index)
    }

    /// Remove a card from its zone.
    pub fn take_card(&mut self, id: EntityId) -> Option<(Card, CardLocation)> {
        let loc = self.locate(id)?;
        let card = self.players[loc.player].zone_mut(loc.zone).remove(loc.index);
        Some((card, loc))
    }

    /// Put a card at the end of a zone (top of the deck), back at its printed
    /// values.
    pub fn put_card(&mut self, player: PlayerId, zone: Zone, mut card: Card) {
        card.reset();
        self.players[player].zone_mut(zone).push_back(card);
    }

    /// Move a card between zones. Returns where it came from.
    pub fn move_card(&mut self, id: EntityId, player: PlayerId, zone: Zone) -> Option<CardLocation> {
        let (card, from) = self.take_card(id)?;
        self.put_card(player, zone, card);
        Some(from)
    }

    /// Total effective power on a player's board.
    #[must_use]
    pub fn board_power(&self, player: PlayerId) -> i32 {
        self.players[player].board.iter().map(|c| c.power).sum()
    }

    /// Every card id in the game, pending card included.
    pub fn all_card_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        let zoned = self.players.iter().flat_map(|(_, p)| {
            Zone::ALL
                .into_iter()
                .flat_map(move |zone| p.zone(zone).iter().map(|c| c.id))
        });
        zoned.chain(self.pending_card.iter().map(|p| p.card.id))
    }

    /// Snapshot the state with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    /// Restore a bincode snapshot.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(bincode::deserialize(bytes)?)
    }
}
