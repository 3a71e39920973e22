//! Creature keywords.
//!
//! There are only five keywords, so a card's keyword set is a single byte.

use serde::{Deserialize, Serialize};

/// A creature keyword.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    /// Kills any creature it fights, regardless of power.
    Poison,
    /// Picks which enemy creature must block it.
    Hunter,
    /// Attacks again after winning its first fight of the turn.
    Frenzy,
    /// Survives the first lethal fight, then becomes damaged.
    Tough,
    /// Can only be blocked by other Sneaky creatures.
    Sneaky,
}

impl Keyword {
    pub const ALL: [Keyword; 5] = [
        Keyword::Poison,
        Keyword::Hunter,
        Keyword::Frenzy,
        Keyword::Tough,
        Keyword::Sneaky,
    ];

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Keyword::Poison => "POISON",
            Keyword::Hunter => "HUNTER",
            Keyword::Frenzy => "FRENZY",
            Keyword::Tough => "TOUGH",
            Keyword::Sneaky => "SNEAKY",
        }
    }

    /// Parse an upper-case keyword name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Keyword> {
        Keyword::ALL.into_iter().find(|k| k.name() == name)
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Set of keywords.
///
/// ```
/// use mindbug_engine::cards::{Keyword, KeywordSet};
///
/// let mut set = KeywordSet::from_iter([Keyword::Tough]);
/// set.insert(Keyword::Poison);
/// assert!(set.contains(Keyword::Poison));
/// assert_eq!(set.len(), 2);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeywordSet(u8);

impl KeywordSet {
    pub const EMPTY: KeywordSet = KeywordSet(0);

    #[must_use]
    pub const fn contains(self, keyword: Keyword) -> bool {
        self.0 & keyword.bit() != 0
    }

    pub fn insert(&mut self, keyword: Keyword) {
        self.0 |= keyword.bit();
    }

    pub fn remove(&mut self, keyword: Keyword) {
        self.0 &= !keyword.bit();
    }

    #[must_use]
    pub const fn union(self, other: KeywordSet) -> KeywordSet {
        KeywordSet(self.0 | other.0)
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = Keyword> {
        Keyword::ALL.into_iter().filter(move |k| self.contains(*k))
    }
}

impl FromIterator<Keyword> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = Keyword>>(iter: I) -> Self {
        let mut set = KeywordSet::EMPTY;
        for keyword in iter {
            set.insert(keyword);
        }
        set
    }
}

impl std::ops::BitOr for KeywordSet {
    type Output = KeywordSet;

    fn bitor(self, rhs: KeywordSet) -> KeywordSet {
        self.union(rhs)
    }
}

impl std::ops::BitOrAssign for KeywordSet {
    fn bitor_assign(&mut self, rhs: KeywordSet) {
        self.0 |= rhs.0;
    }
}
