//! # mindbug-engine
//!
//! A Mindbug rules engine with a search-based opponent.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: every random draw goes through the seeded
//!    `GameRng` stored in the state, so a seed and an action list replay
//!    a match exactly.
//!
//! 2. **Cheap to clone**: zones are persistent `im` vectors and card
//!    definitions are shared `Arc`s, so search can copy a match thousands
//!    of times per second.
//!
//! 3. **Data-driven cards**: creatures are JSON definitions whose
//!    abilities are lists of generic effects (verb, target, condition).
//!
//! ## Architecture
//!
//! - **Commands**: each player action validates and mutates the state.
//! - **Continuations**: follow-up work (effects, combat steps, turn end)
//!   waits on an explicit stack so the engine can pause for a selection
//!   and resume exactly where it stopped.
//! - **ISMCTS**: the AI samples the hidden cards, searches one shared tree
//!   and keeps the move with the most visits.
//!
//! ## Modules
//!
//! - `core`: ids, players, state, actions, RNG, configuration, logging, errors
//! - `zones`: the four per-player zones
//! - `cards`: definitions, keywords, instances, registry and JSON loading
//! - `effects`: effect data, targeting, conditions and the effect pipeline
//! - `rules`: combat, turn flow, commands and the `MindbugGame` facade
//! - `mcts`: the search agent

pub mod core;
pub mod zones;
pub mod cards;
pub mod effects;
pub mod rules;
pub mod mcts;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionRecord, CommandError, EntityId, GameConfig, GameLogger, GameRng, GameState,
    LoadError, Phase, PlayerId, PlayerMap, TracingLogger,
};

pub use crate::zones::Zone;

pub use crate::cards::{Card, CardDefinition, CardId, CardLoader, CardRegistry, Keyword, Trigger};

pub use crate::effects::{CardEffect, EffectManager};

pub use crate::rules::{MindbugGame, MindbugGameBuilder, SelectionRequest};

pub use crate::mcts::{AgentWorker, Difficulty, MCTSAgent, MCTSConfig, SearchStats};
