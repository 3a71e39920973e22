//! Card system: keywords, definitions, instances, registry and loader.
//!
//! ## Key Types
//!
//! - `Keyword` / `KeywordSet`: the five creature keywords
//! - `Trigger`: when a card's effects fire
//! - `CardDefinition`: printed card data, shared by `Arc`
//! - `Card`: one physical copy with its runtime modifiers
//! - `CardRegistry`: definitions of a set plus copy counts
//! - `CardLoader`: JSON card data

pub mod definition;
pub mod instance;
pub mod keyword;
pub mod loader;
pub mod registry;

pub use definition::{CardDefinition, CardId, Trigger};
pub use instance::Card;
pub use keyword::{Keyword, KeywordSet};
pub use loader::CardLoader;
pub use registry::CardRegistry;
