//! Card registry for definition lookup.
//!
//! The `CardRegistry` stores every definition of a card set together with
//! how many physical copies the set contains, and expands them into the
//! card pool a match is dealt from.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::definition::{CardDefinition, CardId};
use super::loader::CardLoader;
use crate::core::{LoadError, TracingLogger};

/// Built-in card set.
const FIRST_CONTACT: &str = include_str!("../../data/first_contact.json");

/// Registry of card definitions.
///
/// ```
/// use mindbug_engine::cards::{CardDefinition, CardId, CardRegistry};
///
/// let mut registry = CardRegistry::new();
/// registry
///     .register(CardDefinition::creature("Kraken", 9).with_id(CardId::new(1)), 2)
///     .unwrap();
///
/// assert_eq!(registry.get(CardId::new(1)).unwrap().name, "Kraken");
/// assert_eq!(registry.pool().len(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, Arc<CardDefinition>>,
    copies: FxHashMap<CardId, u32>,
    order: Vec<CardId>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in First Contact set.
    pub fn builtin() -> Result<Self, LoadError> {
        CardLoader::new(&TracingLogger).load_str(FIRST_CONTACT)
    }

    /// Register a definition with its number of physical copies.
    ///
    /// Fails if the id is already taken.
    pub fn register(
        &mut self,
        card: CardDefinition,
        copies: u32,
    ) -> Result<Arc<CardDefinition>, LoadError> {
        if self.cards.contains_key(&card.id) {
            return Err(LoadError::invalid(
                card.name,
                format!("duplicate id {}", card.id.raw()),
            ));
        }
        let id = card.id;
        let card = Arc::new(card);
        self.cards.insert(id, Arc::clone(&card));
        self.copies.insert(id, copies);
        self.order.push(id);
        Ok(card)
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Arc<CardDefinition>> {
        self.cards.get(&id)
    }

    /// Find a definition by its name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Arc<CardDefinition>> {
        self.iter().find(|c| c.name == name)
    }

    /// Physical copies of a definition in the set.
    #[must_use]
    pub fn copies(&self, id: CardId) -> u32 {
        self.copies.get(&id).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<CardDefinition>> {
        self.order.iter().filter_map(|id| self.cards.get(id))
    }

    /// Every physical card of the set, in registration order.
    #[must_use]
    pub fn pool(&self) -> Vec<Arc<CardDefinition>> {
        self.iter()
            .flat_map(|def| {
                let copies = self.copies(def.id) as usize;
                std::iter::repeat(def).take(copies).cloned()
            })
            .collect()
    }
}
