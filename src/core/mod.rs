//! Core engine types: entities, players, state, actions, RNG, configuration,
//! logging and errors.

pub mod action;
pub mod config;
pub mod entity;
pub mod error;
pub mod log;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{Action, ActionRecord};
pub use config::GameConfig;
pub use entity::EntityId;
pub use error::{CommandError, LoadError, ParseActionError, SnapshotError};
pub use log::{null_logger, GameLogger, LogLevel, MemoryLogger, NullLogger, TracingLogger};
pub use player::{Player, PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use state::{GameState, PendingCard, Phase};
