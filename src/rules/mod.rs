//! Rules of Mindbug.
//!
//! - `MindbugGame`: the engine facade (`step`, `get_legal_moves`, `clone`)
//! - commands: one per action type, validate then mutate
//! - `CombatManager`: fights, blocks, Hunter/Sneaky/Tough/Poison
//! - `TurnManager`: hand refills, turn end, Mindbug replay, win checks
//! - `QueryManager`: target selection requests
//! - `Continuation`: resumable work that waits behind a selection

mod combat;
pub mod commands;
mod continuation;
mod engine;
mod query;
mod turn;

pub use combat::{CombatManager, FightOutcome};
pub use commands::{command_for, Command};
pub use continuation::{drain, Continuation, MAX_DRAIN_STEPS};
pub use engine::{legal_actions, MindbugGame, MindbugGameBuilder};
pub use query::{QueryManager, SelectionCallback, SelectionRequest};
pub use turn::TurnManager;
