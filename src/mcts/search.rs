//! Single-observer information-set MCTS.
//!
//! Each iteration samples a determinization of the hidden cards, walks the
//! shared tree using only children whose moves are legal in that sample,
//! expands one untried move, rolls out and credits every node on the path
//! from the point of view of the player who moved into it.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::{Duration, Instant};

use crate::core::{Action, CommandError, GameRng, PlayerId};
use crate::rules::MindbugGame;

use super::config::MCTSConfig;
use super::determinize::Determinizer;
use super::node::NodeId;
use super::policy::{HeuristicRollout, SelectionPolicy, SimulationPolicy, UCB1};
use super::stats::SearchStats;
use super::tree::MCTSTree;

/// Search-based player.
///
/// The agent owns its tree and random stream; the game it is asked about is
/// never modified.
pub struct MCTSAgent {
    config: MCTSConfig,
    tree: MCTSTree,
    rng: GameRng,
    selection: Box<dyn SelectionPolicy>,
    simulation: Box<dyn SimulationPolicy>,
    stats: SearchStats,
}

impl std::fmt::Debug for MCTSAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MCTSAgent")
            .field("config", &self.config)
            .field("nodes", &self.tree.len())
            .field("stats", &self.stats)
            .finish()
    }
}

impl MCTSAgent {
    pub fn new(config: MCTSConfig) -> Self {
        Self {
            tree: MCTSTree::with_capacity(PlayerId::new(0), config.max_nodes),
            rng: GameRng::new(config.seed),
            selection: Box::new(UCB1),
            simulation: Box::new(HeuristicRollout::new(config.randomization)),
            stats: SearchStats::default(),
            config,
        }
    }

    /// Set a custom selection policy.
    pub fn with_selection<S: SelectionPolicy + 'static>(mut self, selection: S) -> Self {
        self.selection = Box::new(selection);
        self
    }

    /// Set a custom rollout policy.
    pub fn with_simulation<S: SimulationPolicy + 'static>(mut self, simulation: S) -> Self {
        self.simulation = Box::new(simulation);
        self
    }

    /// Pick a move for the active player of `game`.
    ///
    /// Returns `None` only when there is nothing to choose from. A single
    /// legal move is returned without searching.
    pub fn get_action(&mut self, game: &MindbugGame) -> Option<Action> {
        let legal = game.get_legal_moves();
        match legal.len() {
            0 => return None,
            1 => return Some(legal[0]),
            _ => {}
        }

        let searcher = game.active_player();
        let start = Instant::now();
        let budget = Duration::from_secs_f64(self.config.simulation_time.max(0.0));
        self.stats.reset();
        self.tree.reset(searcher);

        let mut started: u32 = 0;
        loop {
            if self.config.max_iterations.is_some_and(|max| started >= max) {
                break;
            }
            if start.elapsed() >= budget {
                break;
            }
            started += 1;

            match self.iteration(game, searcher) {
                Ok(()) => self.stats.iterations += 1,
                Err(err) => {
                    self.stats.abandoned += 1;
                    game.logger()
                        .debug(format_args!("search iteration {started} abandoned: {err}"));
                }
            }

            if self.tree.len() >= self.config.max_nodes {
                break;
            }
        }
        self.stats.time_us = start.elapsed().as_micros() as u64;

        let chosen = self
            .tree
            .most_visited_child()
            .and_then(|node| node.mv)
            .filter(|mv| legal.contains(mv));
        let action = match chosen {
            Some(mv) => mv,
            None => {
                game.logger()
                    .warn(format_args!("search produced no move for {searcher}, picking at random"));
                legal[self.rng.gen_range_usize(0..legal.len())]
            }
        };

        game.logger().info(format_args!(
            "{searcher} chose {action} after {} iterations ({} abandoned) in {} ms",
            self.stats.iterations,
            self.stats.abandoned,
            self.stats.time_us / 1000
        ));
        Some(action)
    }

    /// `get_action`, but a panic inside the search degrades to a random
    /// legal move instead of unwinding into the caller.
    pub fn choose_or_fallback(&mut self, game: &MindbugGame) -> Option<Action> {
        match catch_unwind(AssertUnwindSafe(|| self.get_action(game))) {
            Ok(action) => action,
            Err(_) => {
                game.logger()
                    .error(format_args!("search panicked, falling back to a random move"));
                let legal = game.get_legal_moves();
                self.rng.choose(&legal).copied()
            }
        }
    }

    /// One determinize, select, expand, rollout, backpropagate pass.
    fn iteration(&mut self, root: &MindbugGame, searcher: PlayerId) -> Result<(), CommandError> {
        let mut rng = self.rng.fork();
        let mut game = root.fork_for_search(rng.fork());
        if self.config.determinize && game.state.active_request.is_none() {
            Determinizer::determinize(&mut game.state, searcher, &mut rng);
        }

        let mut node = self.tree.root();
        loop {
            if game.is_over() {
                break;
            }
            let legal = game.get_legal_moves();
            if legal.is_empty() {
                break;
            }

            let untried = self.tree.untried(node, &legal);
            if !untried.is_empty() && self.tree.len() < self.config.max_nodes {
                let mv = untried[rng.gen_range_usize(0..untried.len())];
                let mover = game.active_player();
                game.step(mv)?;
                node = self.tree.add_child(node, mv, mover);
                self.stats.nodes_expanded += 1;
                self.stats.max_depth = self.stats.max_depth.max(self.tree.get(node).depth);
                break;
            }

            let available = self.tree.available_children(node, &legal);
            if available.is_empty() {
                break;
            }
            let child = self
                .selection
                .select(&self.tree, node, &available, self.config.exploration_constant);
            if let Some(mv) = self.tree.get(child).mv {
                game.step(mv)?;
            }
            node = child;
        }

        let rewards = self
            .simulation
            .simulate(&mut game, &mut rng, self.config.rollout_depth)?;
        self.stats.rollouts += 1;
        self.tree.backpropagate(node, &rewards);
        Ok(())
    }

    #[must_use]
    pub fn config(&self) -> &MCTSConfig {
        &self.config
    }

    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    #[must_use]
    pub fn tree(&self) -> &MCTSTree {
        &self.tree
    }

    /// Visit counts of each root move from the last search.
    #[must_use]
    pub fn root_visits(&self) -> Vec<(Action, u32)> {
        self.tree.root_visits()
    }

    /// Root visit counts normalized to sum to one.
    #[must_use]
    pub fn action_probabilities(&self) -> Vec<(Action, f64)> {
        let visits = self.root_visits();
        let total: u32 = visits.iter().map(|(_, v)| *v).sum();
        if total == 0 {
            return visits.into_iter().map(|(a, _)| (a, 0.0)).collect();
        }
        visits
            .into_iter()
            .map(|(a, v)| (a, v as f64 / total as f64))
            .collect()
    }

    /// Root of the last search.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardDefinition;
    use crate::mcts::policy::RandomRollout;
    use crate::rules::MindbugGameBuilder;
    use std::sync::Arc;

    fn def(name: &str, power: i32) -> Arc<CardDefinition> {
        Arc::new(CardDefinition::creature(name, power))
    }

    fn quick(iterations: u32) -> MCTSConfig {
        MCTSConfig::default()
            .with_simulation_time(30.0)
            .with_max_iterations(iterations)
    }

    #[test]
    fn test_no_moves_returns_none() {
        let game = MindbugGameBuilder::new()
            .hand(PlayerId(0), vec![])
            .hand(PlayerId(1), vec![def("B", 3)])
            .build(1);
        assert!(game.is_over());
        let mut agent = MCTSAgent::new(quick(10));
        assert_eq!(agent.get_action(&game), None);
        assert_eq!(agent.stats().iterations, 0);
    }

    #[test]
    fn test_single_move_skips_search() {
        let game = MindbugGameBuilder::new()
            .hand(PlayerId(0), vec![def("A", 2)])
            .hand(PlayerId(1), vec![def("B", 3)])
            .build(1);
        let mut agent = MCTSAgent::new(quick(10));
        assert_eq!(agent.get_action(&game), Some(Action::Play(0)));
        assert_eq!(agent.stats().iterations, 0);
    }

    #[test]
    fn test_root_visits_match_iterations() {
        let game = MindbugGame::new(5).unwrap();
        let mut agent = MCTSAgent::new(quick(60));
        let action = agent.get_action(&game).unwrap();

        assert!(game.get_legal_moves().contains(&action));
        let visits: u32 = agent.root_visits().iter().map(|(_, v)| *v).sum();
        assert_eq!(visits, agent.stats().iterations);
        assert_eq!(agent.tree().get(agent.root()).visits, agent.stats().iterations);
        assert_eq!(agent.stats().abandoned, 0);
    }

    #[test]
    fn test_search_leaves_game_untouched() {
        let game = MindbugGame::new(8).unwrap();
        let before = game.state.to_bytes().unwrap();
        let mut agent = MCTSAgent::new(quick(40)).with_simulation(RandomRollout);
        agent.get_action(&game);
        assert_eq!(game.state.to_bytes().unwrap(), before);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let game = MindbugGame::new(3).unwrap();
        let mut agent = MCTSAgent::new(quick(50));
        agent.choose_or_fallback(&game);
        let total: f64 = agent.action_probabilities().iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }
}
