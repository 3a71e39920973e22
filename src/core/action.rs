//! Action vocabulary.
//!
//! Every input the engine accepts is an `Action`. Its wire form is the pair
//! `(kind, index)`, e.g. `("PLAY", 2)`, `("NO_BLOCK", -1)` or
//! `("SELECT_BOARD_OPP", 0)`; indices are always relative to the zone the
//! kind names, seen from the acting player.
//!
//! ```
//! use mindbug_engine::core::Action;
//! use mindbug_engine::zones::Zone;
//!
//! let action = Action::from_parts("SELECT_BOARD_OPP", 1).unwrap();
//! assert_eq!(action, Action::Select { zone: Zone::Board, opponent: true, index: 1 });
//! assert_eq!(action.to_string(), "SELECT_BOARD_OPP 1");
//! assert_eq!(Action::NoBlock.index(), -1);
//! ```

use serde::{Deserialize, Serialize};

use super::error::ParseActionError;
use super::player::PlayerId;
use crate::zones::Zone;

/// A complete game action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Play the hand card at this index.
    Play(usize),
    /// Attack with the board creature at this index.
    Attack(usize),
    /// Block the pending attacker with the board creature at this index.
    Block(usize),
    NoBlock,
    /// Take the pending card with a Mindbug token.
    Mindbug,
    /// Let the pending card resolve for its owner.
    Pass,
    /// Pick a card for the open selection request. `opponent` is relative to
    /// the selecting player.
    Select { zone: Zone, opponent: bool, index: usize },
    /// Pick the "no target" option of a request that offers one.
    SelectSkip,
}

impl Action {
    /// Wire name of the action type.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Play(_) => "PLAY",
            Action::Attack(_) => "ATTACK",
            Action::Block(_) => "BLOCK",
            Action::NoBlock => "NO_BLOCK",
            Action::Mindbug => "MINDBUG",
            Action::Pass => "PASS",
            Action::SelectSkip => "SELECT_SKIP",
            Action::Select { zone, opponent, .. } => match (zone, opponent) {
                (Zone::Deck, false) => "SELECT_DECK",
                (Zone::Deck, true) => "SELECT_DECK_OPP",
                (Zone::Hand, false) => "SELECT_HAND",
                (Zone::Hand, true) => "SELECT_HAND_OPP",
                (Zone::Board, false) => "SELECT_BOARD",
                (Zone::Board, true) => "SELECT_BOARD_OPP",
                (Zone::Discard, false) => "SELECT_DISCARD",
                (Zone::Discard, true) => "SELECT_DISCARD_OPP",
            },
        }
    }

    /// Wire index, -1 for actions that carry none.
    #[must_use]
    pub fn index(&self) -> i32 {
        match self {
            Action::Play(i) | Action::Attack(i) | Action::Block(i) => *i as i32,
            Action::Select { index, .. } => *index as i32,
            Action::NoBlock | Action::Mindbug | Action::Pass | Action::SelectSkip => -1,
        }
    }

    /// Is this one of the selection-request answers?
    #[must_use]
    pub fn is_selection(&self) -> bool {
        matches!(self, Action::Select { .. } | Action::SelectSkip)
    }

    /// Build an action from its wire form.
    pub fn from_parts(kind: &str, index: i32) -> Result<Action, ParseActionError> {
        let indexed = |build: fn(usize) -> Action| {
            usize::try_from(index)
                .map(build)
                .map_err(|_| ParseActionError::NegativeIndex {
                    kind: kind.to_string(),
                    index,
                })
        };

        match kind {
            "PLAY" => indexed(Action::Play),
            "ATTACK" => indexed(Action::Attack),
            "BLOCK" => indexed(Action::Block),
            "NO_BLOCK" => Ok(Action::NoBlock),
            "MINDBUG" => Ok(Action::Mindbug),
            "PASS" => Ok(Action::Pass),
            "SELECT_SKIP" => Ok(Action::SelectSkip),
            _ => {
                let rest = kind
                    .strip_prefix("SELECT_")
                    .ok_or_else(|| ParseActionError::UnknownKind(kind.to_string()))?;
                let (zone_name, opponent) = match rest.strip_suffix("_OPP") {
                    Some(zone_name) => (zone_name, true),
                    None => (rest, false),
                };
                let zone = Zone::parse(zone_name)
                    .ok_or_else(|| ParseActionError::UnknownKind(kind.to_string()))?;
                let index = usize::try_from(index).map_err(|_| ParseActionError::NegativeIndex {
                    kind: kind.to_string(),
                    index,
                })?;
                Ok(Action::Select { zone, opponent, index })
            }
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind(), self.index())
    }
}

/// A recorded action with metadata for history tracking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The player who took this action.
    pub player: PlayerId,

    /// The action taken.
    pub action: Action,

    /// Turn number when the action was taken.
    pub turn: u32,
}

impl ActionRecord {
    #[must_use]
    pub fn new(player: PlayerId, action: Action, turn: u32) -> Self {
        Self { player, action, turn }
    }
}
