//! Turn flow and game end.

use crate::core::{GameLogger, GameState, Phase, PlayerId};
use crate::zones::Zone;

use super::combat::CombatManager;

pub struct TurnManager;

impl TurnManager {
    /// Draw until `player` holds a full hand or the deck runs out.
    pub fn refill_hand(state: &mut GameState, log: &dyn GameLogger, player: PlayerId) {
        let target = state.config.hand_size;
        let mut drawn = 0;
        while state.players[player].hand.len() < target && state.players[player].draw() {
            drawn += 1;
        }
        if drawn > 0 {
            log.debug(format_args!("{player} draws {drawn}"));
        }
    }

    /// Close the current turn and hand it to the opponent.
    pub fn end_turn(state: &mut GameState, log: &dyn GameLogger) {
        if Self::check_win_condition(state, log) {
            return;
        }
        for player in PlayerId::both() {
            Self::refill_hand(state, log, player);
        }
        let next = state.turn_player.opponent();
        state.turn_player = next;
        state.frenzy_candidate = None;
        state.turn_count += 1;
        log.info(format_args!("turn {} begins for {next}", state.turn_count));
        Self::enter_main(state, log);
    }

    /// The player whose card was Mindbugged takes another turn.
    pub fn execute_mindbug_replay(state: &mut GameState, log: &dyn GameLogger, player: PlayerId) {
        if Self::check_win_condition(state, log) {
            return;
        }
        Self::refill_hand(state, log, player);
        state.turn_player = player;
        state.frenzy_candidate = None;
        state.turn_count += 1;
        log.info(format_args!("{player} replays after the Mindbug (turn {})", state.turn_count));
        Self::enter_main(state, log);
    }

    /// Give `turn_player` the main phase, or end the game if they cannot act.
    pub fn enter_main(state: &mut GameState, log: &dyn GameLogger) {
        let player = state.turn_player;
        state.active_player = player;
        state.phase = Phase::main_for(player);

        let can_play = !state.players[player].zone(Zone::Hand).is_empty();
        let can_attack = state.players[player]
            .board
            .iter()
            .any(|c| CombatManager::can_attack(state, c.id));
        if !can_play && !can_attack {
            log.info(format_args!("{player} has no legal move and loses"));
            Self::declare_winner(state, log, player.opponent());
        }
    }

    /// Set `winner` if a player is out of life. Idempotent.
    ///
    /// When both players drop to 0 at once, the player whose turn it is wins.
    pub fn check_win_condition(state: &mut GameState, log: &dyn GameLogger) -> bool {
        if state.winner.is_some() {
            return true;
        }
        let dead: Vec<PlayerId> = PlayerId::both()
            .filter(|p| state.players[*p].hp <= 0)
            .collect();
        let winner = match dead.as_slice() {
            [] => return false,
            [loser] => loser.opponent(),
            _ => state.turn_player,
        };
        Self::declare_winner(state, log, winner);
        true
    }

    fn declare_winner(state: &mut GameState, log: &dyn GameLogger, winner: PlayerId) {
        log.info(format_args!("{winner} wins on turn {}", state.turn_count));
        state.winner = Some(winner);
        state.phase = Phase::GameOver;
        state.active_request = None;
        state.continuations.clear();
        state.pending_card = None;
        state.pending_attacker = None;
        state.forced_blocker = None;
        state.frenzy_candidate = None;
    }
}
