//! One command per action type.
//!
//! A command validates everything it needs before it touches the state, so
//! an `Err` always leaves the game exactly as it was. Follow-up work is
//! pushed as continuations; `MindbugGame::step` drains them afterwards.

use crate::cards::Trigger;
use crate::core::{Action, CommandError, GameLogger, GameState, PendingCard, Phase, PlayerId};
use crate::effects::EffectManager;
use crate::zones::Zone;

use super::combat::{push_block, CombatManager};
use super::continuation::Continuation;
use super::query::QueryManager;

/// A validated state transition for one action.
pub trait Command {
    fn execute(&self, state: &mut GameState, log: &dyn GameLogger) -> Result<(), CommandError>;
}

/// Command object for an action.
#[must_use]
pub fn command_for(action: Action) -> Box<dyn Command> {
    match action {
        Action::Play(index) => Box::new(PlayCommand { index }),
        Action::Attack(index) => Box::new(AttackCommand { index }),
        Action::Block(index) => Box::new(BlockCommand { index }),
        Action::NoBlock => Box::new(NoBlockCommand),
        Action::Mindbug => Box::new(MindbugCommand),
        Action::Pass => Box::new(PassCommand),
        Action::Select { .. } | Action::SelectSkip => Box::new(ResolveSelectionCommand { action }),
    }
}

fn out_of_range(zone: Zone, index: usize, len: usize) -> CommandError {
    CommandError::IndexOutOfRange {
        zone: zone.name(),
        index,
        len,
    }
}

fn require_phase(state: &GameState, action: Action, ok: bool) -> Result<(), CommandError> {
    if state.is_over() {
        return Err(CommandError::GameOver);
    }
    if ok {
        Ok(())
    } else {
        Err(CommandError::IllegalAction {
            action: action.to_string(),
            phase: state.phase,
        })
    }
}

/// Play a hand card; the opponent may Mindbug it.
pub struct PlayCommand {
    pub index: usize,
}

impl Command for PlayCommand {
    fn execute(&self, state: &mut GameState, log: &dyn GameLogger) -> Result<(), CommandError> {
        let action = Action::Play(self.index);
        require_phase(state, action, state.phase.is_main() && state.active_request.is_none())?;
        let player = state.active_player;
        let hand_len = state.players[player].hand.len();
        if self.index >= hand_len {
            return Err(out_of_range(Zone::Hand, self.index, hand_len));
        }

        let card = state.players[player].hand.remove(self.index);
        log.info(format_args!("{player} plays {card}"));
        state.pending_card = Some(PendingCard { card, owner: player });

        let opponent = player.opponent();
        if state.players[opponent].mindbugs == 0 {
            log.debug(format_args!("{opponent} has no Mindbugs left, auto-pass"));
            return PassCommand.resolve(state, log);
        }
        state.active_player = opponent;
        state.phase = Phase::MindbugDecision;
        Ok(())
    }
}

/// Decline the Mindbug: the card resolves for the player who played it.
pub struct PassCommand;

impl PassCommand {
    fn resolve(&self, state: &mut GameState, log: &dyn GameLogger) -> Result<(), CommandError> {
        let pending = state.pending_card.take().ok_or(CommandError::NoPendingCard)?;
        let owner = pending.owner;
        let id = pending.card.id;
        state.put_card(owner, Zone::Board, pending.card);
        state.active_player = owner;
        state.phase = Phase::main_for(owner);
        state.continuations.push(Continuation::EndTurn);
        EffectManager::fire_trigger(state, log, id, owner, Trigger::OnPlay);
        Ok(())
    }
}

impl Command for PassCommand {
    fn execute(&self, state: &mut GameState, log: &dyn GameLogger) -> Result<(), CommandError> {
        require_phase(state, Action::Pass, state.phase == Phase::MindbugDecision)?;
        self.resolve(state, log)
    }
}

/// Spend a Mindbug to take the pending card.
pub struct MindbugCommand;

impl Command for MindbugCommand {
    fn execute(&self, state: &mut GameState, log: &dyn GameLogger) -> Result<(), CommandError> {
        require_phase(state, Action::Mindbug, state.phase == Phase::MindbugDecision)?;
        let decider = state.active_player;
        if state.players[decider].mindbugs == 0 {
            return Err(CommandError::NoMindbugs);
        }
        let pending = state.pending_card.take().ok_or(CommandError::NoPendingCard)?;

        state.players[decider].mindbugs -= 1;
        let id = pending.card.id;
        log.info(format_args!(
            "{decider} Mindbugs {} ({} left)",
            pending.card, state.players[decider].mindbugs
        ));
        state.put_card(decider, Zone::Board, pending.card);
        state.phase = Phase::main_for(state.turn_player);
        state.continuations.push(Continuation::MindbugReplay {
            player: pending.owner,
        });
        EffectManager::fire_trigger(state, log, id, decider, Trigger::OnPlay);
        Ok(())
    }
}

/// Declare an attack with a board creature.
pub struct AttackCommand {
    pub index: usize,
}

impl Command for AttackCommand {
    fn execute(&self, state: &mut GameState, log: &dyn GameLogger) -> Result<(), CommandError> {
        let action = Action::Attack(self.index);
        require_phase(state, action, state.phase.is_main() && state.active_request.is_none())?;
        let player = state.active_player;
        let board = &state.players[player].board;
        let attacker = board
            .get(self.index)
            .map(|c| c.id)
            .ok_or_else(|| out_of_range(Zone::Board, self.index, board.len()))?;
        if !CombatManager::can_attack(state, attacker) {
            return Err(CommandError::IllegalAction {
                action: action.to_string(),
                phase: state.phase,
            });
        }
        if state.frenzy_candidate.is_some_and(|id| id != attacker) {
            return Err(CommandError::IllegalAction {
                action: action.to_string(),
                phase: state.phase,
            });
        }

        log.info(format_args!("{player} attacks with {attacker}"));
        state.pending_attacker = Some(attacker);
        state.continuations.push(Continuation::AttackDeclared { attacker });
        EffectManager::fire_trigger(state, log, attacker, player, Trigger::OnAttack);
        Ok(())
    }
}

/// Block the pending attacker.
pub struct BlockCommand {
    pub index: usize,
}

impl Command for BlockCommand {
    fn execute(&self, state: &mut GameState, log: &dyn GameLogger) -> Result<(), CommandError> {
        let action = Action::Block(self.index);
        require_phase(state, action, state.phase == Phase::BlockDecision)?;
        let attacker = state.pending_attacker.ok_or(CommandError::NoPendingAttacker)?;
        let defender = state.active_player;
        let board = &state.players[defender].board;
        let blocker = board
            .get(self.index)
            .map(|c| c.id)
            .ok_or_else(|| out_of_range(Zone::Board, self.index, board.len()))?;
        if !CombatManager::legal_blockers(state, attacker).contains(&self.index) {
            return Err(CommandError::IllegalAction {
                action: action.to_string(),
                phase: state.phase,
            });
        }

        log.info(format_args!("{defender} blocks {attacker} with {blocker}"));
        leave_block_decision(state);
        push_block(state, log, attacker, blocker);
        Ok(())
    }
}

/// Take the hit.
pub struct NoBlockCommand;

impl Command for NoBlockCommand {
    fn execute(&self, state: &mut GameState, log: &dyn GameLogger) -> Result<(), CommandError> {
        require_phase(state, Action::NoBlock, state.phase == Phase::BlockDecision)?;
        let attacker = state.pending_attacker.ok_or(CommandError::NoPendingAttacker)?;
        if CombatManager::block_is_forced(state, attacker) {
            return Err(CommandError::IllegalAction {
                action: Action::NoBlock.to_string(),
                phase: state.phase,
            });
        }

        log.info(format_args!("{} does not block {attacker}", state.active_player));
        leave_block_decision(state);
        state.continuations.push(Continuation::EndCombat { attacker });
        state.continuations.push(Continuation::Unblocked { attacker });
        Ok(())
    }
}

fn leave_block_decision(state: &mut GameState) {
    let attacker_side: PlayerId = state.turn_player;
    state.pending_attacker = None;
    state.active_player = attacker_side;
    state.phase = Phase::main_for(attacker_side);
}

/// Answer the open selection request.
pub struct ResolveSelectionCommand {
    pub action: Action,
}

impl Command for ResolveSelectionCommand {
    fn execute(&self, state: &mut GameState, log: &dyn GameLogger) -> Result<(), CommandError> {
        if state.is_over() {
            return Err(CommandError::GameOver);
        }
        let target = QueryManager::target_for(state, self.action)?;
        QueryManager::resolve_selection(state, log, target)
    }
}
