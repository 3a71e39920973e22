//! Card definitions - static card data.
//!
//! `CardDefinition` holds what is printed on a card: name, power, keywords,
//! trigger and effects. Physical copies share one definition behind an
//! `Arc`; everything that changes during play lives on `Card`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::keyword::{Keyword, KeywordSet};
use crate::effects::CardEffect;

/// Unique identifier for a card definition.
///
/// Identifies the printed card, not a physical copy in a game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// When a card's effects fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigger {
    /// When the card enters its controller's board from a play.
    OnPlay,
    /// When the card attacks.
    OnAttack,
    /// When the card is declared as a blocker.
    OnBlock,
    /// When the card's attack is blocked.
    OnBlocked,
    /// When the card's attack is not blocked; replaces the 1 hp hit.
    OnUnblocked,
    /// When the card is defeated.
    OnDeath,
    /// Continuously, while the card is on the board.
    Passive,
}

impl Trigger {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Trigger::OnPlay => "ON_PLAY",
            Trigger::OnAttack => "ON_ATTACK",
            Trigger::OnBlock => "ON_BLOCK",
            Trigger::OnBlocked => "ON_BLOCKED",
            Trigger::OnUnblocked => "ON_UNBLOCKED",
            Trigger::OnDeath => "ON_DEATH",
            Trigger::Passive => "PASSIVE",
        }
    }

    #[must_use]
    pub fn parse(name: &str) -> Option<Trigger> {
        [
            Trigger::OnPlay,
            Trigger::OnAttack,
            Trigger::OnBlock,
            Trigger::OnBlocked,
            Trigger::OnUnblocked,
            Trigger::OnDeath,
            Trigger::Passive,
        ]
        .into_iter()
        .find(|t| t.name() == name)
    }
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Static card definition.
///
/// ```
/// use mindbug_engine::cards::{CardDefinition, Keyword, Trigger};
/// use mindbug_engine::effects::{CardEffect, TargetGroup, TargetSpec};
///
/// let newt = CardDefinition::creature("Venom Newt", 1).with_keyword(Keyword::Poison);
/// assert!(newt.keywords.contains(Keyword::Poison));
///
/// let healer = CardDefinition::creature("Healing Salamander", 2)
///     .with_trigger(Trigger::OnPlay)
///     .with_effect(CardEffect::heal(TargetSpec::group(TargetGroup::Owner), 2));
/// assert!(healer.fires_on(Trigger::OnPlay));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    pub id: CardId,
    pub name: String,
    /// Printed power.
    pub power: i32,
    /// Printed keywords.
    pub keywords: KeywordSet,
    pub trigger: Option<Trigger>,
    pub effects: SmallVec<[CardEffect; 2]>,
    /// Set the card was printed in.
    pub set: String,
}

impl CardDefinition {
    /// A vanilla creature.
    #[must_use]
    pub fn creature(name: impl Into<String>, power: i32) -> Self {
        Self {
            id: CardId::default(),
            name: name.into(),
            power,
            keywords: KeywordSet::EMPTY,
            trigger: None,
            effects: SmallVec::new(),
            set: String::new(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: CardId) -> Self {
        self.id = id;
        self
    }

    #[must_use]
    pub fn with_keyword(mut self, keyword: Keyword) -> Self {
        self.keywords.insert(keyword);
        self
    }

    #[must_use]
    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = Some(trigger);
        self
    }

    #[must_use]
    pub fn with_effect(mut self, effect: CardEffect) -> Self {
        self.effects.push(effect);
        self
    }

    #[must_use]
    pub fn with_set(mut self, set: impl Into<String>) -> Self {
        self.set = set.into();
        self
    }

    /// Does this card have effects that fire on `trigger`?
    #[must_use]
    pub fn fires_on(&self, trigger: Trigger) -> bool {
        self.trigger == Some(trigger) && !self.effects.is_empty()
    }
}
