//! Search configuration.

use serde::{Deserialize, Serialize};

/// How long the AI thinks per decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    /// Wall-clock budget per decision, in seconds.
    #[must_use]
    pub const fn simulation_time(self) -> f64 {
        match self {
            Difficulty::Easy => 0.5,
            Difficulty::Medium => 1.5,
            Difficulty::Hard => 3.0,
            Difficulty::Expert => 6.0,
        }
    }

    pub fn parse(name: &str) -> Option<Difficulty> {
        match name.to_ascii_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            "expert" => Some(Difficulty::Expert),
            _ => None,
        }
    }
}

/// MCTS configuration parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MCTSConfig {
    /// UCB1 exploration constant (default: sqrt(2)).
    pub exploration_constant: f64,

    /// Wall-clock budget per decision, in seconds.
    pub simulation_time: f64,

    /// Stop after this many iterations even if time remains.
    /// With a generous `simulation_time` this makes a search deterministic.
    pub max_iterations: Option<u32>,

    /// Plies a rollout may play before it is scored heuristically.
    pub rollout_depth: u32,

    /// Maximum nodes to allocate in the tree.
    pub max_nodes: usize,

    /// Same seed, same iteration budget, same answer.
    pub seed: u64,

    /// Resample hidden cards before every iteration.
    pub determinize: bool,

    /// Chance the rollout policy ignores its heuristics and plays a random move.
    pub randomization: f64,
}

impl Default for MCTSConfig {
    fn default() -> Self {
        Self {
            exploration_constant: std::f64::consts::SQRT_2,
            simulation_time: Difficulty::Medium.simulation_time(),
            max_iterations: None,
            rollout_depth: 50,
            max_nodes: 200_000,
            seed: 42,
            determinize: true,
            randomization: 0.05,
        }
    }
}

impl MCTSConfig {
    /// Default search with the time budget of a difficulty level.
    #[must_use]
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self::default().with_simulation_time(difficulty.simulation_time())
    }

    #[must_use]
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_simulation_time(mut self, seconds: f64) -> Self {
        self.simulation_time = seconds;
        self
    }

    #[must_use]
    pub fn with_max_iterations(mut self, iterations: u32) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    #[must_use]
    pub fn with_rollout_depth(mut self, depth: u32) -> Self {
        self.rollout_depth = depth;
        self
    }

    #[must_use]
    pub fn with_determinize(mut self, determinize: bool) -> Self {
        self.determinize = determinize;
        self
    }

    #[must_use]
    pub fn with_randomization(mut self, randomization: f64) -> Self {
        self.randomization = randomization;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MCTSConfig::default();
        assert!((config.exploration_constant - std::f64::consts::SQRT_2).abs() < 0.001);
        assert_eq!(config.rollout_depth, 50);
        assert_eq!(config.max_iterations, None);
        assert!(config.determinize);
    }

    #[test]
    fn test_difficulty_budgets() {
        assert_eq!(MCTSConfig::for_difficulty(Difficulty::Easy).simulation_time, 0.5);
        assert_eq!(MCTSConfig::for_difficulty(Difficulty::Hard).simulation_time, 3.0);
        assert_eq!(MCTSConfig::for_difficulty(Difficulty::Expert).simulation_time, 6.0);
        assert_eq!(Difficulty::parse("MEDIUM"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::parse("nightmare"), None);
    }

    #[test]
    fn test_builder_pattern() {
        let config = MCTSConfig::default()
            .with_exploration(2.0)
            .with_seed(123)
            .with_max_iterations(500);

        assert_eq!(config.exploration_constant, 2.0);
        assert_eq!(config.seed, 123);
        assert_eq!(config.max_iterations, Some(500));
    }

    #[test]
    fn test_serialization() {
        let config = MCTSConfig::for_difficulty(Difficulty::Hard).with_seed(7);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: MCTSConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.seed, 7);
        assert_eq!(deserialized.simulation_time, 3.0);
    }
}
