//! Monte Carlo Tree Search player.
//!
//! ## Overview
//!
//! Single-observer information-set MCTS: every iteration deals a fresh guess
//! of the cards the searching player cannot see, then descends one shared
//! tree keyed by actions.
//!
//! - **Determinization**: the opponent's hand and deck are reshuffled
//!   together, the searcher's own deck is reshuffled
//! - **Availability**: selection only considers children whose move is legal
//!   in the current guess
//! - **Rollouts**: a cheap Mindbug-aware heuristic, or uniform random
//! - **Time budget**: wall clock, optionally capped by an iteration count
//!
//! ## Usage
//!
//! ```rust
//! use mindbug_engine::mcts::{MCTSAgent, MCTSConfig};
//! use mindbug_engine::rules::MindbugGame;
//!
//! let game = MindbugGame::new(7).unwrap();
//! let config = MCTSConfig::default()
//!     .with_simulation_time(5.0)
//!     .with_max_iterations(200);
//! let mut agent = MCTSAgent::new(config);
//!
//! let action = agent.get_action(&game).unwrap();
//! assert!(game.get_legal_moves().contains(&action));
//!
//! for (action, prob) in agent.action_probabilities() {
//!     println!("{action}: {:.1}%", prob * 100.0);
//! }
//! ```

pub mod config;
pub mod determinize;
pub mod node;
pub mod policy;
pub mod search;
pub mod stats;
pub mod tree;
pub mod worker;

pub use config::{Difficulty, MCTSConfig};
pub use determinize::Determinizer;
pub use node::{MCTSNode, NodeId};
pub use policy::{
    heuristic_eval, result_to_rewards, HeuristicRollout, RandomRollout, SelectionPolicy,
    SimulationPolicy, UCB1,
};
pub use search::MCTSAgent;
pub use stats::SearchStats;
pub use tree::{MCTSTree, TreeStats};
pub use worker::AgentWorker;
