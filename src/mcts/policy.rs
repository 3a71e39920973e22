//! MCTS policies for selection and simulation.
//!
//! - `SelectionPolicy`: which child to descend into (UCB1)
//! - `SimulationPolicy`: how rollouts pick moves (uniform or heuristic)

use crate::cards::{Card, Keyword};
use crate::core::{Action, CommandError, GameRng, GameState, Phase, PlayerId, PlayerMap};
use crate::rules::{CombatManager, MindbugGame};

use super::node::NodeId;
use super::tree::MCTSTree;

// =============================================================================
// Selection Policy
// =============================================================================

/// Policy for selecting which child node to explore.
pub trait SelectionPolicy: Send + Sync {
    /// Pick one of `children` (all children of `parent`). Never called with
    /// an empty slice.
    fn select(&self, tree: &MCTSTree, parent: NodeId, children: &[NodeId], exploration: f64) -> NodeId;
}

/// UCB1: `wins/visits + c * sqrt(ln(parent.visits) / visits)`.
///
/// Ties go to the earliest child.
#[derive(Clone, Debug, Default)]
pub struct UCB1;

impl SelectionPolicy for UCB1 {
    fn select(&self, tree: &MCTSTree, parent: NodeId, children: &[NodeId], exploration: f64) -> NodeId {
        let ln_parent = (tree.get(parent).visits.max(1) as f64).ln();
        let score = |id: NodeId| {
            let node = tree.get(id);
            if node.visits == 0 {
                f64::INFINITY
            } else {
                node.mean() + exploration * (ln_parent / node.visits as f64).sqrt()
            }
        };

        let mut best = children[0];
        let mut best_score = score(best);
        for &child in &children[1..] {
            let s = score(child);
            if s > best_score {
                best = child;
                best_score = s;
            }
        }
        best
    }
}

// =============================================================================
// Simulation Policy
// =============================================================================

/// Policy for playing out a game from a leaf.
pub trait SimulationPolicy: Send + Sync {
    /// Pick one of `legal` (never empty) for the active player.
    fn choose(&self, game: &MindbugGame, legal: &[Action], rng: &mut GameRng) -> Action;

    /// Play until someone wins or `max_depth` plies have been played.
    ///
    /// A failed step aborts the rollout with its error.
    fn simulate(
        &self,
        game: &mut MindbugGame,
        rng: &mut GameRng,
        max_depth: u32,
    ) -> Result<PlayerMap<f64>, CommandError> {
        for _ in 0..max_depth {
            if let Some(winner) = game.winner() {
                return Ok(result_to_rewards(Some(winner)));
            }
            let legal = game.get_legal_moves();
            if legal.is_empty() {
                return Ok(result_to_rewards(None));
            }
            let action = self.choose(game, &legal, rng);
            game.step(action)?;
        }
        Ok(match game.winner() {
            Some(winner) => result_to_rewards(Some(winner)),
            None => heuristic_eval(&game.state),
        })
    }
}

/// Uniformly random rollouts.
#[derive(Clone, Debug, Default)]
pub struct RandomRollout;

impl SimulationPolicy for RandomRollout {
    fn choose(&self, _game: &MindbugGame, legal: &[Action], rng: &mut GameRng) -> Action {
        legal[rng.gen_range_usize(0..legal.len())]
    }
}

/// Hand-tuned rollout play.
#[derive(Clone, Debug)]
pub struct HeuristicRollout {
    /// Chance of a uniformly random move instead.
    pub randomization: f64,
    /// Block probability when nothing forces the decision.
    pub block_chance: f64,
}

impl Default for HeuristicRollout {
    fn default() -> Self {
        Self {
            randomization: 0.05,
            block_chance: 0.8,
        }
    }
}

impl HeuristicRollout {
    #[must_use]
    pub fn new(randomization: f64) -> Self {
        Self {
            randomization,
            ..Self::default()
        }
    }

    fn mindbug_decision(state: &GameState, legal: &[Action]) -> Action {
        let Some(pending) = &state.pending_card else {
            return Action::Pass;
        };
        if !legal.contains(&Action::Mindbug) {
            return Action::Pass;
        }
        let decider = state.active_player;
        let required = required_threat(
            state.players[decider].mindbugs,
            state.players[pending.owner].hand.len(),
        );
        if threat_score(&pending.card) >= required {
            Action::Mindbug
        } else {
            Action::Pass
        }
    }

    fn block_decision(&self, state: &GameState, legal: &[Action], rng: &mut GameRng) -> Action {
        let defender = state.active_player;
        let board = &state.players[defender].board;
        let attacker = state.pending_attacker.and_then(|id| state.card(id));
        let blockers: Vec<(usize, &Card)> = legal
            .iter()
            .filter_map(|a| match a {
                Action::Block(i) => board.get(*i).map(|c| (*i, c)),
                _ => None,
            })
            .collect();
        let (Some(attacker), false) = (attacker, blockers.is_empty()) else {
            return Action::NoBlock;
        };
        if !legal.contains(&Action::NoBlock) {
            return Action::Block(blockers[0].0);
        }

        if let Some((i, _)) = blockers
            .iter()
            .find(|(_, c)| c.has(Keyword::Tough) && !c.is_damaged)
        {
            return Action::Block(*i);
        }
        if attacker.has(Keyword::Poison) {
            if let Some((i, _)) = blockers.iter().min_by_key(|(_, c)| c.power) {
                return Action::Block(*i);
            }
        }
        if let Some((i, _)) = blockers.iter().find(|(_, c)| {
            let outcome = CombatManager::predict(attacker, c);
            outcome.attacker_dies && !outcome.blocker_dies
        }) {
            return Action::Block(*i);
        }

        let must_block = state.players[defender].hp <= 1;
        if must_block || rng.gen_bool(self.block_chance) {
            blockers
                .iter()
                .max_by_key(|(_, c)| c.power)
                .map_or(Action::NoBlock, |(i, _)| Action::Block(*i))
        } else {
            Action::NoBlock
        }
    }

    fn main_phase(state: &GameState, legal: &[Action], rng: &mut GameRng) -> Action {
        let me = state.active_player;
        let board = &state.players[me].board;
        let attacks: Vec<(Action, &Card)> = legal
            .iter()
            .filter_map(|a| match a {
                Action::Attack(i) => board.get(*i).map(|c| (*a, c)),
                _ => None,
            })
            .collect();
        let unblockable = |c: &Card| CombatManager::legal_blockers(state, c.id).is_empty();

        if state.players[me.opponent()].hp <= 1 {
            if let Some((a, _)) = attacks.iter().find(|(_, c)| unblockable(*c)) {
                return *a;
            }
            if let Some((a, _)) = attacks.first() {
                return *a;
            }
        }

        if let Some((a, _)) = attacks
            .iter()
            .find(|(_, c)| c.has(Keyword::Sneaky) && unblockable(*c))
        {
            return *a;
        }
        if let Some((a, _)) = attacks
            .iter()
            .find(|(_, c)| c.has(Keyword::Poison) && poison_attack_pays(state, c))
        {
            return *a;
        }

        let mut options: Vec<Action> = legal
            .iter()
            .copied()
            .filter(|a| matches!(a, Action::Play(_)))
            .collect();
        options.extend(
            attacks
                .iter()
                .filter(|(_, c)| favorable_attack(state, c))
                .map(|(a, _)| *a),
        );
        match rng.choose(&options) {
            Some(a) => *a,
            None => legal[rng.gen_range_usize(0..legal.len())],
        }
    }
}

impl SimulationPolicy for HeuristicRollout {
    fn choose(&self, game: &MindbugGame, legal: &[Action], rng: &mut GameRng) -> Action {
        if legal.len() == 1 {
            return legal[0];
        }
        if rng.gen_bool(self.randomization) {
            return legal[rng.gen_range_usize(0..legal.len())];
        }
        let state = &game.state;
        if state.active_request.is_some() {
            return legal[rng.gen_range_usize(0..legal.len())];
        }
        match state.phase {
            Phase::MindbugDecision => Self::mindbug_decision(state, legal),
            Phase::BlockDecision => self.block_decision(state, legal, rng),
            Phase::P1Main | Phase::P2Main => Self::main_phase(state, legal, rng),
            Phase::ResolutionChoice | Phase::GameOver => legal[rng.gen_range_usize(0..legal.len())],
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// How dangerous a card is to leave with its owner.
#[must_use]
pub fn threat_score(card: &Card) -> i32 {
    let bonus = |k: Keyword, v: i32| if card.has(k) { v } else { 0 };
    card.power
        + bonus(Keyword::Poison, 3)
        + bonus(Keyword::Hunter, 2)
        + bonus(Keyword::Frenzy, 2)
        + bonus(Keyword::Tough, 1)
}

/// Threat a card needs before a rollout spends a Mindbug on it.
///
/// The opponent's hand size stands in for how far the game has gone; the
/// last token is kept for big threats until late.
#[must_use]
pub fn required_threat(mindbugs_left: u8, opponent_hand: usize) -> i32 {
    let stage = match opponent_hand {
        n if n >= 4 => 0,
        2 | 3 => 1,
        _ => 2,
    };
    match (mindbugs_left, stage) {
        (0, _) => i32::MAX,
        (1, 0) => 8,
        (1, 1) => 7,
        (1, _) => 5,
        (_, 0) => 7,
        (_, 1) => 6,
        _ => 5,
    }
}

/// Every possible block kills the blocker and spares the attacker.
fn favorable_attack(state: &GameState, attacker: &Card) -> bool {
    let Some(loc) = state.locate_on_board(attacker.id) else {
        return false;
    };
    let board = &state.players[loc.player.opponent()].board;
    CombatManager::legal_blockers(state, attacker.id)
        .into_iter()
        .filter_map(|i| board.get(i))
        .all(|b| {
            let outcome = CombatManager::predict(attacker, b);
            outcome.blocker_dies && !outcome.attacker_dies
        })
}

/// A poisoned attacker trades up against anything that can block it.
fn poison_attack_pays(state: &GameState, attacker: &Card) -> bool {
    let Some(loc) = state.locate_on_board(attacker.id) else {
        return false;
    };
    let board = &state.players[loc.player.opponent()].board;
    CombatManager::legal_blockers(state, attacker.id)
        .into_iter()
        .filter_map(|i| board.get(i))
        .all(|b| b.power >= attacker.power || CombatManager::predict(attacker, b).blocker_dies)
}

/// 1.0 for the winner, 0.0 for the loser, 0.5 each without a winner.
pub fn result_to_rewards(winner: Option<PlayerId>) -> PlayerMap<f64> {
    PlayerMap::new(|player| match winner {
        Some(w) if w == player => 1.0,
        Some(_) => 0.0,
        None => 0.5,
    })
}

/// Score an unfinished game by each side's share of life and board power.
pub fn heuristic_eval(state: &GameState) -> PlayerMap<f64> {
    let strength = |p: PlayerId| {
        let player = &state.players[p];
        (player.hp.max(0) as f64) * 4.0 + state.board_power(p).max(0) as f64
    };
    let total: f64 = PlayerId::both().map(strength).sum();
    if total <= 0.0 {
        return PlayerMap::new(|_| 0.5);
    }
    PlayerMap::new(|player| strength(player) / total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardDefinition;
    use crate::core::{EntityId, GameConfig};
    use crate::rules::MindbugGameBuilder;
    use std::sync::Arc;

    const P1: PlayerId = PlayerId(0);
    const P2: PlayerId = PlayerId(1);

    fn card(power: i32, keywords: &[Keyword]) -> Card {
        let mut def = CardDefinition::creature("Test", power);
        for k in keywords {
            def = def.with_keyword(*k);
        }
        Card::new(EntityId(1), Arc::new(def))
    }

    fn def(name: &str, power: i32, keywords: &[Keyword]) -> Arc<CardDefinition> {
        let def = keywords
            .iter()
            .fold(CardDefinition::creature(name, power), |d, k| d.with_keyword(*k));
        Arc::new(def)
    }

    fn greedy_choice(game: &MindbugGame) -> Action {
        let policy = HeuristicRollout {
            randomization: 0.0,
            block_chance: 0.0,
        };
        let legal = game.get_legal_moves();
        policy.choose(game, &legal, &mut GameRng::new(5))
    }

    fn main_phase_game(attackers: Vec<Arc<CardDefinition>>, p2_hp: i32) -> MindbugGame {
        MindbugGameBuilder::new()
            .board(P1, attackers)
            .hand(P1, vec![def("Spare", 1, &[])])
            .board(P2, vec![def("Gorillion", 10, &[])])
            .hand(P2, vec![def("Spare", 1, &[])])
            .hp(P2, p2_hp)
            .build(1)
    }

    fn block_game(attacker: Arc<CardDefinition>, defenders: Vec<Arc<CardDefinition>>) -> MindbugGame {
        let mut game = MindbugGameBuilder::new()
            .board(P1, vec![attacker])
            .hand(P1, vec![def("Spare", 1, &[])])
            .board(P2, defenders)
            .hand(P2, vec![def("Spare", 1, &[])])
            .build(1);
        game.step(Action::Attack(0)).unwrap();
        assert_eq!(game.state.phase, Phase::BlockDecision);
        game
    }

    /// P1 plays `card` from a hand of `hand` cards; P2 holds two Mindbugs.
    fn mindbug_game(card: Arc<CardDefinition>, hand: usize) -> MindbugGame {
        let mut cards = vec![card];
        cards.extend((1..hand).map(|_| def("Spare", 1, &[])));
        let mut game = MindbugGameBuilder::new()
            .hand(P1, cards)
            .hand(P2, vec![def("Spare", 1, &[])])
            .build(1);
        game.step(Action::Play(0)).unwrap();
        assert_eq!(game.state.phase, Phase::MindbugDecision);
        game
    }

    #[test]
    fn test_ucb1_selects_unvisited() {
        let mut tree = MCTSTree::new(PlayerId(0));
        let root = tree.root();
        let a = tree.add_child(root, Action::Play(0), PlayerId(0));
        let b = tree.add_child(root, Action::Play(1), PlayerId(0));
        tree.get_mut(a).visits = 10;
        tree.get_mut(a).wins = 9.0;
        tree.get_mut(root).visits = 10;

        assert_eq!(UCB1.select(&tree, root, &[a, b], std::f64::consts::SQRT_2), b);
    }

    #[test]
    fn test_ucb1_exploits_without_exploration() {
        let mut tree = MCTSTree::new(PlayerId(0));
        let root = tree.root();
        let a = tree.add_child(root, Action::Play(0), PlayerId(0));
        let b = tree.add_child(root, Action::Play(1), PlayerId(0));
        for (id, wins) in [(a, 2.0), (b, 7.0)] {
            tree.get_mut(id).visits = 10;
            tree.get_mut(id).wins = wins;
        }
        tree.get_mut(root).visits = 20;

        assert_eq!(UCB1.select(&tree, root, &[a, b], 0.0), b);
    }

    #[test]
    fn test_threat_score_keywords() {
        assert_eq!(threat_score(&card(4, &[])), 4);
        assert_eq!(threat_score(&card(1, &[Keyword::Poison])), 4);
        assert_eq!(threat_score(&card(6, &[Keyword::Hunter, Keyword::Tough])), 9);
    }

    #[test]
    fn test_required_threat_table() {
        assert_eq!(required_threat(2, 5), 7);
        assert_eq!(required_threat(2, 3), 6);
        assert_eq!(required_threat(2, 1), 5);
        assert_eq!(required_threat(1, 5), 8);
        assert_eq!(required_threat(1, 0), 5);
        assert_eq!(required_threat(0, 5), i32::MAX);
    }

    #[test]
    fn test_result_to_rewards() {
        let rewards = result_to_rewards(Some(PlayerId(1)));
        assert_eq!(rewards[PlayerId(0)], 0.0);
        assert_eq!(rewards[PlayerId(1)], 1.0);
        assert_eq!(result_to_rewards(None)[PlayerId(0)], 0.5);
    }

    #[test]
    fn test_heuristic_eval_favors_healthier_side() {
        let mut state = GameState::new(GameConfig::default(), 1);
        state.players[PlayerId(1)].hp = 1;
        let rewards = heuristic_eval(&state);
        assert!(rewards[PlayerId(0)] > rewards[PlayerId(1)]);
        assert!((rewards[PlayerId(0)] + rewards[PlayerId(1)] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rollout_goes_for_lethal() {
        let mouse = vec![def("Mouse", 1, &[])];
        assert_eq!(greedy_choice(&main_phase_game(mouse.clone(), 3)), Action::Play(0));
        assert_eq!(greedy_choice(&main_phase_game(mouse, 1)), Action::Attack(0));
    }

    #[test]
    fn test_rollout_takes_free_sneaky_attack() {
        let game = main_phase_game(
            vec![def("Mouse", 1, &[]), def("Spider Owl", 3, &[Keyword::Sneaky])],
            3,
        );
        assert_eq!(greedy_choice(&game), Action::Attack(1));
    }

    #[test]
    fn test_rollout_blocks_with_fresh_tough() {
        let game = block_game(
            def("Gorillion", 10, &[]),
            vec![def("Mouse", 1, &[]), def("Shell", 3, &[Keyword::Tough])],
        );
        assert_eq!(greedy_choice(&game), Action::Block(1));
    }

    #[test]
    fn test_rollout_feeds_cheapest_blocker_to_poison() {
        let game = block_game(
            def("Spider", 3, &[Keyword::Poison]),
            vec![def("Gorillion", 10, &[]), def("Mouse", 1, &[]), def("Rat", 2, &[])],
        );
        assert_eq!(greedy_choice(&game), Action::Block(1));
    }

    #[test]
    fn test_rollout_prefers_tough_over_cheap_against_poison() {
        let game = block_game(
            def("Spider", 3, &[Keyword::Poison]),
            vec![
                def("Gorillion", 10, &[]),
                def("Mouse", 1, &[]),
                def("Shell", 5, &[Keyword::Tough]),
            ],
        );
        assert_eq!(greedy_choice(&game), Action::Block(2));
    }

    #[test]
    fn test_rollout_mindbug_threshold() {
        let six = || def("Shark", 6, &[]);
        // Four cards left with the opponent: 6 is below the threshold of 7.
        assert_eq!(greedy_choice(&mindbug_game(six(), 5)), Action::Pass);
        // One card left: the threshold drops to 5.
        assert_eq!(greedy_choice(&mindbug_game(six(), 2)), Action::Mindbug);
        assert_eq!(greedy_choice(&mindbug_game(def("Mouse", 1, &[]), 2)), Action::Pass);
        assert_eq!(greedy_choice(&mindbug_game(def("Gorillion", 10, &[]), 5)), Action::Mindbug);
    }
}
