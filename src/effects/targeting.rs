//! Effect targeting.
//!
//! - `TargetSpec`: which group/zone an effect looks at, and how many it takes
//! - `candidates`: everything a `TargetSpec` can reach from the effect owner's side
//! - `filter_targets`: narrow candidates by a stat comparison
//! - `context_holds`: evaluate MY_TURN / IS_ALONE / FEWER_ALLIES gates

use serde::{Deserialize, Serialize};

use super::effect::Stat;
use crate::core::{EntityId, GameState, PlayerId};
use crate::zones::Zone;

/// Something an effect can act on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    Player(PlayerId),
    Card(EntityId),
    /// The "no target" option some requests offer.
    Skip,
}

/// Whose things an effect reaches, relative to the effect's owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetGroup {
    Owner,
    Opponent,
    /// The card carrying the effect.
    SelfCard,
    Allies,
    AllOtherAllies,
    Enemies,
    Any,
}

impl TargetGroup {
    #[must_use]
    pub fn parse(name: &str) -> Option<TargetGroup> {
        Some(match name {
            "OWNER" => TargetGroup::Owner,
            "OPPONENT" => TargetGroup::Opponent,
            "SELF" => TargetGroup::SelfCard,
            "ALLIES" => TargetGroup::Allies,
            "ALL_OTHER_ALLIES" => TargetGroup::AllOtherAllies,
            "ENEMIES" | "ENEMY" => TargetGroup::Enemies,
            "ANY" => TargetGroup::Any,
            _ => return None,
        })
    }
}

/// How many candidates an effect takes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetSelect {
    #[default]
    All,
    /// A player picks this many.
    Choose(u8),
    /// This many picked at random.
    Random(u8),
}

/// Targeting part of an effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub group: TargetGroup,
    /// `None` means players for OWNER/OPPONENT and the board otherwise.
    pub zone: Option<Zone>,
    #[serde(default)]
    pub select: TargetSelect,
}

impl TargetSpec {
    /// All of a group, default zone.
    #[must_use]
    pub const fn group(group: TargetGroup) -> Self {
        Self {
            group,
            zone: None,
            select: TargetSelect::All,
        }
    }

    #[must_use]
    pub const fn in_zone(mut self, zone: Zone) -> Self {
        self.zone = Some(zone);
        self
    }

    #[must_use]
    pub const fn with_select(mut self, select: TargetSelect) -> Self {
        self.select = select;
        self
    }
}

/// Context gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContextCondition {
    /// It is the effect owner's turn.
    MyTurn,
    /// The source is the owner's only creature.
    IsAlone,
    /// The owner has fewer creatures than the opponent.
    FewerAllies,
}

impl ContextCondition {
    #[must_use]
    pub fn parse(name: &str) -> Option<ContextCondition> {
        Some(match name {
            "MY_TURN" => ContextCondition::MyTurn,
            "IS_ALONE" => ContextCondition::IsAlone,
            "FEWER_ALLIES" => ContextCondition::FewerAllies,
            _ => return None,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    #[must_use]
    pub fn parse(name: &str) -> Option<CompareOp> {
        Some(match name {
            "EQ" => CompareOp::Eq,
            "GT" => CompareOp::Gt,
            "GTE" => CompareOp::Gte,
            "LT" => CompareOp::Lt,
            "LTE" => CompareOp::Lte,
            _ => return None,
        })
    }

    #[must_use]
    pub fn compare(self, lhs: i32, rhs: i32) -> bool {
        match self {
            CompareOp::Eq => lhs == rhs,
            CompareOp::Gt => lhs > rhs,
            CompareOp::Gte => lhs >= rhs,
            CompareOp::Lt => lhs < rhs,
            CompareOp::Lte => lhs <= rhs,
        }
    }
}

/// Numeric filter: power for cards, hp for players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatFilter {
    pub stat: Stat,
    pub op: CompareOp,
    pub value: i32,
}

impl StatFilter {
    #[must_use]
    pub const fn power(op: CompareOp, value: i32) -> Self {
        Self {
            stat: Stat::Power,
            op,
            value,
        }
    }
}

/// Everything `spec` reaches for an effect of `source` owned by `owner`.
///
/// Order is stable: owner's side before the opponent's, zone order within.
#[must_use]
pub fn candidates(
    state: &GameState,
    spec: &TargetSpec,
    source: EntityId,
    owner: PlayerId,
) -> Vec<Target> {
    let opponent = owner.opponent();
    let cards_of = |player: PlayerId, zone: Zone| {
        state.players[player]
            .zone(zone)
            .iter()
            .map(|c| Target::Card(c.id))
            .collect::<Vec<_>>()
    };
    let zone = spec.zone.unwrap_or(Zone::Board);

    match spec.group {
        TargetGroup::Owner => match spec.zone {
            None => vec![Target::Player(owner)],
            Some(zone) => cards_of(owner, zone),
        },
        TargetGroup::Opponent => match spec.zone {
            None => vec![Target::Player(opponent)],
            Some(zone) => cards_of(opponent, zone),
        },
        TargetGroup::SelfCard => {
            if state.locate(source).is_some() {
                vec![Target::Card(source)]
            } else {
                Vec::new()
            }
        }
        TargetGroup::Allies => cards_of(owner, zone),
        TargetGroup::AllOtherAllies => {
            let mut cards = cards_of(owner, zone);
            cards.retain(|t| *t != Target::Card(source));
            cards
        }
        TargetGroup::Enemies => cards_of(opponent, zone),
        TargetGroup::Any => {
            let mut cards = cards_of(owner, zone);
            cards.extend(cards_of(opponent, zone));
            cards
        }
    }
}

/// Keep the targets passing `filter`.
///
/// With `ignore_auras` card power is read without passive contributions,
/// which keeps the aura pass independent of the order it visits cards in.
#[must_use]
pub fn filter_targets(
    state: &GameState,
    targets: Vec<Target>,
    filter: Option<StatFilter>,
    ignore_auras: bool,
) -> Vec<Target> {
    let Some(filter) = filter else {
        return targets;
    };

    targets
        .into_iter()
        .filter(|target| match (*target, filter.stat) {
            (Target::Card(id), Stat::Power) => state.card(id).is_some_and(|card| {
                let power = if ignore_auras {
                    card.unaura_power()
                } else {
                    card.power
                };
                filter.op.compare(power, filter.value)
            }),
            (Target::Player(player), Stat::Hp) => {
                filter.op.compare(state.players[player].hp, filter.value)
            }
            _ => false,
        })
        .collect()
}

/// Does `condition` hold for an effect of `source` owned by `owner`?
#[must_use]
pub fn context_holds(
    state: &GameState,
    condition: ContextCondition,
    source: EntityId,
    owner: PlayerId,
) -> bool {
    let board = &state.players[owner].board;
    match condition {
        ContextCondition::MyTurn => state.turn_player == owner,
        ContextCondition::IsAlone => board.len() == 1 && board[0].id == source,
        ContextCondition::FewerAllies => board.len() < state.players[owner.opponent()].board.len(),
    }
}
