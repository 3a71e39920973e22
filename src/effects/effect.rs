//! Card effect definitions.
//!
//! A `CardEffect` is one line of card text: a verb, who it targets, an
//! optional gate, and the verb's parameters. Cards carry an ordered list of
//! them, all fired by the card's single trigger.
//!
//! ```
//! use mindbug_engine::effects::{CardEffect, TargetGroup, TargetSpec};
//!
//! // "Deal 1 damage to the opponent"
//! let hit = CardEffect::damage(TargetSpec::group(TargetGroup::Opponent), 1);
//! assert_eq!(hit.params.amount, 1);
//! ```

use serde::{Deserialize, Serialize};

use super::targeting::{ContextCondition, StatFilter, TargetGroup, TargetSpec};
use crate::cards::KeywordSet;
use crate::zones::Zone;

/// What an effect does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectVerb {
    /// Change a player's hp or a creature's power.
    ModifyStat,
    /// Defeat a creature through the normal death pipeline.
    Destroy,
    /// Take a card from the opponent into one of your zones.
    Steal,
    /// Put hand cards into their owner's discard pile.
    Discard,
    /// Put a card onto your board as if played.
    Play,
    /// Relocate a card within its owner's zones.
    Move,
    /// Grant keywords.
    AddKeyword,
    /// Grant the keywords of other cards.
    CopyKeywords,
    /// Restriction consulted by legality checks; never resolved.
    Ban,
}

impl EffectVerb {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            EffectVerb::ModifyStat => "MODIFY_STAT",
            EffectVerb::Destroy => "DESTROY",
            EffectVerb::Steal => "STEAL",
            EffectVerb::Discard => "DISCARD",
            EffectVerb::Play => "PLAY",
            EffectVerb::Move => "MOVE",
            EffectVerb::AddKeyword => "ADD_KEYWORD",
            EffectVerb::CopyKeywords => "COPY_KEYWORDS",
            EffectVerb::Ban => "BAN",
        }
    }

    #[must_use]
    pub fn parse(name: &str) -> Option<EffectVerb> {
        [
            EffectVerb::ModifyStat,
            EffectVerb::Destroy,
            EffectVerb::Steal,
            EffectVerb::Discard,
            EffectVerb::Play,
            EffectVerb::Move,
            EffectVerb::AddKeyword,
            EffectVerb::CopyKeywords,
            EffectVerb::Ban,
        ]
        .into_iter()
        .find(|v| v.name() == name)
    }
}

/// Gate on an effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectCondition {
    /// The effect only happens while the context holds.
    Context(ContextCondition),
    /// Only candidates passing the filter are affected.
    Stat(StatFilter),
}

/// Stat touched by MODIFY_STAT.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stat {
    Hp,
    Power,
}

/// How MODIFY_STAT combines `amount` with the current value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatMode {
    #[default]
    Add,
    Sub,
    Set,
    /// Take the value from the `copy_from` group.
    Copy,
}

impl StatMode {
    /// New value of a stat currently at `current`.
    ///
    /// `copied` is the value read from `copy_from` for `Copy`; with nothing to
    /// copy the stat is unchanged.
    #[must_use]
    pub fn apply(self, current: i32, amount: i32, copied: Option<i32>) -> i32 {
        let value = match self {
            StatMode::Add => current + amount,
            StatMode::Sub => current - amount,
            StatMode::Set => amount,
            StatMode::Copy => copied.unwrap_or(current),
        };
        value.max(0)
    }
}

/// Action a BAN forbids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BanKind {
    /// Opposing ON_PLAY triggers do not fire.
    OnPlayTrigger,
    Attack,
    Block,
}

/// Who picks targets for a CHOOSE effect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Chooser {
    #[default]
    Owner,
    Opponent,
}

/// Verb parameters. Unused fields keep their defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectParams {
    pub stat: Option<Stat>,
    #[serde(default)]
    pub mode: StatMode,
    #[serde(default)]
    pub amount: i32,
    #[serde(default)]
    pub keywords: KeywordSet,
    pub destination: Option<Zone>,
    pub copy_from: Option<TargetGroup>,
    pub ban: Option<BanKind>,
    #[serde(default)]
    pub chooser: Chooser,
}

/// One effect on a card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardEffect {
    pub verb: EffectVerb,
    pub target: TargetSpec,
    pub condition: Option<EffectCondition>,
    pub params: EffectParams,
}

impl CardEffect {
    /// Create an effect with default parameters.
    #[must_use]
    pub fn new(verb: EffectVerb, target: TargetSpec) -> Self {
        Self {
            verb,
            target,
            condition: None,
            params: EffectParams::default(),
        }
    }

    /// Players in `target` lose `amount` hp.
    #[must_use]
    pub fn damage(target: TargetSpec, amount: i32) -> Self {
        Self::modify(target, Stat::Hp, StatMode::Sub, amount)
    }

    /// Players in `target` gain `amount` hp.
    #[must_use]
    pub fn heal(target: TargetSpec, amount: i32) -> Self {
        Self::modify(target, Stat::Hp, StatMode::Add, amount)
    }

    /// Change the power of creatures in `target` by `amount`.
    #[must_use]
    pub fn power(target: TargetSpec, amount: i32) -> Self {
        if amount < 0 {
            Self::modify(target, Stat::Power, StatMode::Sub, -amount)
        } else {
            Self::modify(target, Stat::Power, StatMode::Add, amount)
        }
    }

    #[must_use]
    pub fn modify(target: TargetSpec, stat: Stat, mode: StatMode, amount: i32) -> Self {
        let mut effect = Self::new(EffectVerb::ModifyStat, target);
        effect.params.stat = Some(stat);
        effect.params.mode = mode;
        effect.params.amount = amount;
        effect
    }

    #[must_use]
    pub fn grant(target: TargetSpec, keywords: KeywordSet) -> Self {
        let mut effect = Self::new(EffectVerb::AddKeyword, target);
        effect.params.keywords = keywords;
        effect
    }

    #[must_use]
    pub fn copy_keywords(target: TargetSpec, from: TargetGroup) -> Self {
        let mut effect = Self::new(EffectVerb::CopyKeywords, target);
        effect.params.copy_from = Some(from);
        effect
    }

    #[must_use]
    pub fn ban(target: TargetSpec, kind: BanKind) -> Self {
        let mut effect = Self::new(EffectVerb::Ban, target);
        effect.params.ban = Some(kind);
        effect
    }

    /// Set the gate (builder pattern).
    #[must_use]
    pub fn with_condition(mut self, condition: EffectCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    #[must_use]
    pub fn with_destination(mut self, zone: Zone) -> Self {
        self.params.destination = Some(zone);
        self
    }

    #[must_use]
    pub fn with_chooser(mut self, chooser: Chooser) -> Self {
        self.params.chooser = chooser;
        self
    }

    /// Context gate, if any.
    #[must_use]
    pub fn context(&self) -> Option<ContextCondition> {
        match self.condition {
            Some(EffectCondition::Context(context)) => Some(context),
            _ => None,
        }
    }

    /// Stat filter, if any.
    #[must_use]
    pub fn filter(&self) -> Option<StatFilter> {
        match self.condition {
            Some(EffectCondition::Stat(filter)) => Some(filter),
            _ => None,
        }
    }

    /// Can this effect contribute to a passive aura?
    #[must_use]
    pub fn is_aura(&self) -> bool {
        match self.verb {
            EffectVerb::ModifyStat => self.params.stat == Some(Stat::Power),
            EffectVerb::AddKeyword | EffectVerb::CopyKeywords => true,
            _ => false,
        }
    }
}
