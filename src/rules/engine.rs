//! Engine facade.
//!
//! `MindbugGame` owns a `GameState` and a logger and is the only surface
//! drivers (tests, UI, the search agent) talk to:
//!
//! - `get_legal_moves` lists every action the active player may take
//! - `step` validates an action, runs its command, then drains the
//!   continuation stack until the game needs input again
//! - `clone` is cheap and fully independent, which is what search relies on
//!
//! Illegal input is rejected with a `CommandError` and a warning; the game
//! is left untouched.

use std::sync::Arc;

use crate::cards::{Card, CardDefinition, CardRegistry};
use crate::core::{
    null_logger, Action, ActionRecord, CommandError, EntityId, GameConfig, GameLogger, GameRng,
    GameState, LoadError, Phase, PlayerId, PlayerMap, TracingLogger,
};
use crate::effects::EffectManager;
use crate::zones::Zone;

use super::combat::CombatManager;
use super::commands::command_for;
use super::continuation;
use super::query::QueryManager;
use super::turn::TurnManager;

/// Every action the active player may take.
#[must_use]
pub fn legal_actions(state: &GameState) -> Vec<Action> {
    if state.is_over() {
        return Vec::new();
    }
    if state.active_request.is_some() {
        return QueryManager::legal_selections(state);
    }

    match state.phase {
        Phase::GameOver | Phase::ResolutionChoice => Vec::new(),
        Phase::MindbugDecision => {
            let mut moves = vec![Action::Pass];
            if state.players[state.active_player].mindbugs > 0 {
                moves.push(Action::Mindbug);
            }
            moves
        }
        Phase::BlockDecision => {
            let Some(attacker) = state.pending_attacker else {
                return Vec::new();
            };
            let mut moves: Vec<Action> = CombatManager::legal_blockers(state, attacker)
                .into_iter()
                .map(Action::Block)
                .collect();
            if !CombatManager::block_is_forced(state, attacker) {
                moves.push(Action::NoBlock);
            }
            moves
        }
        Phase::P1Main | Phase::P2Main => {
            let player = &state.players[state.active_player];
            if let Some(frenzied) = state.frenzy_candidate {
                return player
                    .board_index(frenzied)
                    .filter(|_| CombatManager::can_attack(state, frenzied))
                    .map(Action::Attack)
                    .into_iter()
                    .collect();
            }
            let plays = (0..player.hand.len()).map(Action::Play);
            let attacks = player
                .board
                .iter()
                .enumerate()
                .filter(|(_, c)| CombatManager::can_attack(state, c.id))
                .map(|(i, _)| Action::Attack(i));
            plays.chain(attacks).collect()
        }
    }
}

/// A running match.
#[derive(Clone)]
pub struct MindbugGame {
    pub state: GameState,
    logger: Arc<dyn GameLogger>,
}

impl std::fmt::Debug for MindbugGame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MindbugGame")
            .field("turn", &self.state.turn_count)
            .field("phase", &self.state.phase)
            .field("active_player", &self.state.active_player)
            .field("winner", &self.state.winner)
            .finish()
    }
}

impl MindbugGame {
    /// A standard match dealt from the built-in card set.
    pub fn new(seed: u64) -> Result<Self, LoadError> {
        let registry = CardRegistry::builtin()?;
        Ok(MindbugGameBuilder::new().registry(&registry).build(seed))
    }

    /// Wrap an existing state.
    #[must_use]
    pub fn from_state(state: GameState, logger: Arc<dyn GameLogger>) -> Self {
        Self { state, logger }
    }

    #[must_use]
    pub fn logger(&self) -> &Arc<dyn GameLogger> {
        &self.logger
    }

    pub fn set_logger(&mut self, logger: Arc<dyn GameLogger>) {
        self.logger = logger;
    }

    #[must_use]
    pub fn get_legal_moves(&self) -> Vec<Action> {
        legal_actions(&self.state)
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.state.winner
    }

    #[must_use]
    pub fn active_player(&self) -> PlayerId {
        self.state.active_player
    }

    /// Apply one action for the active player.
    pub fn step(&mut self, action: Action) -> Result<(), CommandError> {
        let log = Arc::clone(&self.logger);
        if self.state.is_over() {
            log.warn(format_args!("{action} rejected: game is over"));
            return Err(CommandError::GameOver);
        }

        EffectManager::apply_passive_effects(&mut self.state, log.as_ref());
        if !self.get_legal_moves().contains(&action) {
            log.warn(format_args!(
                "{action} is not legal for {} in {:?}",
                self.state.active_player, self.state.phase
            ));
            return Err(CommandError::IllegalAction {
                action: action.to_string(),
                phase: self.state.phase,
            });
        }

        let player = self.state.active_player;
        let turn = self.state.turn_count;
        if let Err(err) = command_for(action).execute(&mut self.state, log.as_ref()) {
            log.warn(format_args!("{action} failed: {err}"));
            return Err(err);
        }
        self.state
            .history
            .push_back(ActionRecord::new(player, action, turn));
        self.settle();
        Ok(())
    }

    /// Apply an action given in its wire form, e.g. `("ATTACK", 0)`.
    pub fn step_parts(&mut self, kind: &str, index: i32) -> Result<(), CommandError> {
        let action = Action::from_parts(kind, index).map_err(|err| {
            self.logger.warn(format_args!("cannot parse {kind} {index}: {err}"));
            CommandError::from(err)
        })?;
        self.step(action)
    }

    /// Silent copy for search, with its own random stream.
    #[must_use]
    pub fn fork_for_search(&self, rng: GameRng) -> MindbugGame {
        let mut state = self.state.clone();
        state.rng = rng;
        MindbugGame {
            state,
            logger: null_logger(),
        }
    }

    /// Drain queued work and bring auras up to date.
    fn settle(&mut self) {
        let log = Arc::clone(&self.logger);
        continuation::drain(&mut self.state, log.as_ref());
        EffectManager::apply_passive_effects(&mut self.state, log.as_ref());

        let stranded = self.state.active_request.is_none()
            && self.state.continuations.is_empty()
            && self.state.phase == Phase::ResolutionChoice
            && !self.state.is_over();
        if stranded {
            log.warn(format_args!("no work left after a selection, returning to main phase"));
            TurnManager::enter_main(&mut self.state, log.as_ref());
        }

        let lost_frenzy = self.state.phase.is_main()
            && self.state.active_request.is_none()
            && !self.state.is_over()
            && self
                .state
                .frenzy_candidate
                .is_some_and(|id| !CombatManager::can_attack(&self.state, id));
        if lost_frenzy {
            log.info(format_args!("frenzied creature can no longer attack, ending the turn"));
            self.state.frenzy_candidate = None;
            TurnManager::end_turn(&mut self.state, log.as_ref());
            EffectManager::apply_passive_effects(&mut self.state, log.as_ref());
        }
    }
}

#[derive(Clone, Debug, Default)]
struct Script {
    deck: Option<Vec<Arc<CardDefinition>>>,
    hand: Option<Vec<Arc<CardDefinition>>>,
    board: Vec<Arc<CardDefinition>>,
    discard: Vec<Arc<CardDefinition>>,
    hp: Option<i32>,
    mindbugs: Option<u8>,
}

/// Builder for a match.
///
/// By default each player is dealt `deck_size` cards from the shuffled pool
/// and draws a starting hand. Scripting a player's deck or hand replaces
/// the dealt cards for that zone, which is how tests set up exact boards.
///
/// ```
/// use std::sync::Arc;
/// use mindbug_engine::cards::CardDefinition;
/// use mindbug_engine::core::{Action, PlayerId};
/// use mindbug_engine::rules::MindbugGameBuilder;
///
/// let mut game = MindbugGameBuilder::new()
///     .hand(PlayerId(0), vec![Arc::new(CardDefinition::creature("Weakling", 1))])
///     .hand(PlayerId(1), vec![Arc::new(CardDefinition::creature("Godzilla", 10))])
///     .build(7);
///
/// assert_eq!(game.get_legal_moves(), vec![Action::Play(0)]);
/// game.step(Action::Play(0)).unwrap();
/// assert_eq!(game.get_legal_moves(), vec![Action::Pass, Action::Mindbug]);
/// ```
pub struct MindbugGameBuilder {
    config: GameConfig,
    pool: Vec<Arc<CardDefinition>>,
    scripts: PlayerMap<Script>,
    logger: Arc<dyn GameLogger>,
}

impl Default for MindbugGameBuilder {
    fn default() -> Self {
        Self {
            config: GameConfig::default(),
            pool: Vec::new(),
            scripts: PlayerMap::new(|_| Script::default()),
            logger: Arc::new(TracingLogger),
        }
    }
}

impl MindbugGameBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    /// Deal from every physical card of a registry.
    #[must_use]
    pub fn registry(mut self, registry: &CardRegistry) -> Self {
        self.pool = registry.pool();
        self
    }

    #[must_use]
    pub fn pool(mut self, pool: Vec<Arc<CardDefinition>>) -> Self {
        self.pool = pool;
        self
    }

    /// Exact deck for `player`; the last card is the top.
    #[must_use]
    pub fn deck(mut self, player: PlayerId, cards: Vec<Arc<CardDefinition>>) -> Self {
        self.scripts[player].deck = Some(cards);
        self
    }

    /// Exact starting hand for `player`.
    #[must_use]
    pub fn hand(mut self, player: PlayerId, cards: Vec<Arc<CardDefinition>>) -> Self {
        self.scripts[player].hand = Some(cards);
        self
    }

    #[must_use]
    pub fn board(mut self, player: PlayerId, cards: Vec<Arc<CardDefinition>>) -> Self {
        self.scripts[player].board = cards;
        self
    }

    #[must_use]
    pub fn discard(mut self, player: PlayerId, cards: Vec<Arc<CardDefinition>>) -> Self {
        self.scripts[player].discard = cards;
        self
    }

    #[must_use]
    pub fn hp(mut self, player: PlayerId, hp: i32) -> Self {
        self.scripts[player].hp = Some(hp);
        self
    }

    #[must_use]
    pub fn mindbugs(mut self, player: PlayerId, mindbugs: u8) -> Self {
        self.scripts[player].mindbugs = Some(mindbugs);
        self
    }

    #[must_use]
    pub fn logger(mut self, logger: Arc<dyn GameLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Build the match. The same seed always produces the same deal.
    #[must_use]
    pub fn build(self, seed: u64) -> MindbugGame {
        let Self {
            config,
            mut pool,
            scripts,
            logger,
        } = self;
        let log = logger.as_ref();
        let mut state = GameState::new(config, seed);
        let mut next_id = EntityId::FIRST;

        state.rng.shuffle(&mut pool);
        let mut pool = pool.into_iter();

        // Players in fixed order so ids are stable for a seed.
        for player in PlayerId::both() {
            let script = &scripts[player];
            let deck: Vec<Arc<CardDefinition>> = match &script.deck {
                Some(cards) => cards.clone(),
                None if script.hand.is_some() => Vec::new(),
                None => pool.by_ref().take(state.config.deck_size).collect(),
            };
            if script.deck.is_none() && script.hand.is_none() && deck.len() < state.config.deck_size {
                log.warn(format_args!(
                    "pool ran out: {player} dealt {} of {} cards",
                    deck.len(),
                    state.config.deck_size
                ));
            }

            let zones = [
                (Zone::Deck, deck),
                (Zone::Hand, script.hand.clone().unwrap_or_default()),
                (Zone::Board, script.board.clone()),
                (Zone::Discard, script.discard.clone()),
            ];
            for (zone, cards) in zones {
                for def in cards {
                    let card = Card::new(next_id.bump(), def);
                    state.players[player].zone_mut(zone).push_back(card);
                }
            }

            if let Some(hp) = script.hp {
                state.players[player].hp = hp;
            }
            if let Some(mindbugs) = script.mindbugs {
                state.players[player].mindbugs = mindbugs;
            }
            if script.hand.is_none() {
                TurnManager::refill_hand(&mut state, log, player);
            }
        }

        log.info(format_args!(
            "match ready: seed {seed}, {} starts",
            state.turn_player
        ));
        TurnManager::enter_main(&mut state, log);
        EffectManager::apply_passive_effects(&mut state, log);
        MindbugGame { state, logger }
    }
}
