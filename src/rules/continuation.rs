//! Resumable work.
//!
//! Multi-step interactions (trigger lists, combat, turn end) are expressed as
//! tokens on `GameState::continuations`. The engine pops and runs tokens
//! until one opens a selection request or the stack empties; answering the
//! request resumes the drain exactly where it stopped.
//!
//! A token that has follow-up work pushes its successor before acting, so
//! anything the action itself pushes (new triggers) runs first.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::combat::CombatManager;
use super::query::{QueryManager, SelectionCallback, SelectionRequest};
use super::turn::TurnManager;
use crate::cards::{CardDefinition, Keyword};
use crate::core::{EntityId, GameLogger, GameState, Phase, PlayerId};
use crate::effects::{CardEffect, EffectManager, Target};

/// Upper bound on tokens per drain. Reaching it means a trigger loop.
pub const MAX_DRAIN_STEPS: usize = 10_000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Continuation {
    /// Resolve `def`'s effects in order, starting at `next`.
    ResolveEffects {
        def: Arc<CardDefinition>,
        source: EntityId,
        owner: PlayerId,
        next: usize,
    },
    /// Apply an effect to targets picked through a selection request.
    ApplyChosen {
        effect: CardEffect,
        source: EntityId,
        owner: PlayerId,
        targets: Vec<Target>,
    },
    /// ON_ATTACK has resolved; check Hunter before asking for blocks.
    AttackDeclared { attacker: EntityId },
    /// Hand the block decision to the defender.
    EnterBlock { attacker: EntityId },
    Fight { attacker: EntityId, blocker: EntityId },
    Unblocked { attacker: EntityId },
    /// Combat is over; Frenzy or end of turn.
    EndCombat { attacker: EntityId },
    EndTurn,
    /// A Mindbugged card resolved; the original player plays again.
    MindbugReplay { player: PlayerId },
}

impl Continuation {
    pub fn run(self, state: &mut GameState, log: &dyn GameLogger) {
        match self {
            Continuation::ResolveEffects {
                def,
                source,
                owner,
                next,
            } => {
                let Some(effect) = def.effects.get(next) else {
                    return;
                };
                let effect = effect.clone();
                if next + 1 < def.effects.len() {
                    state.continuations.push(Continuation::ResolveEffects {
                        def: Arc::clone(&def),
                        source,
                        owner,
                        next: next + 1,
                    });
                }
                EffectManager::apply_effect(state, log, &effect, source, owner);
            }
            Continuation::ApplyChosen {
                effect,
                source,
                owner,
                targets,
            } => EffectManager::apply_to_targets(state, log, &effect, source, owner, &targets),
            Continuation::AttackDeclared { attacker } => declare_blocks(state, log, attacker),
            Continuation::EnterBlock { attacker } => {
                let Some(loc) = state.locate_on_board(attacker) else {
                    log.info(format_args!("attacker {attacker} left the board before blocks"));
                    state.continuations.push(Continuation::EndCombat { attacker });
                    return;
                };
                state.pending_attacker = Some(attacker);
                state.active_player = loc.player.opponent();
                state.phase = Phase::BlockDecision;
            }
            Continuation::Fight { attacker, blocker } => {
                CombatManager::resolve_fight(state, log, attacker, blocker);
            }
            Continuation::Unblocked { attacker } => CombatManager::resolve_unblocked(state, log, attacker),
            Continuation::EndCombat { attacker } => end_combat(state, log, attacker),
            Continuation::EndTurn => TurnManager::end_turn(state, log),
            Continuation::MindbugReplay { player } => TurnManager::execute_mindbug_replay(state, log, player),
        }
    }
}

/// Hunter picks its prey first; everything else goes straight to blocks.
fn declare_blocks(state: &mut GameState, log: &dyn GameLogger, attacker: EntityId) {
    let Some(owner) = state.locate_on_board(attacker).map(|loc| loc.player) else {
        state.continuations.push(Continuation::EndCombat { attacker });
        return;
    };
    let hunter = state.card(attacker).is_some_and(|c| c.has(Keyword::Hunter));
    state.continuations.push(Continuation::EnterBlock { attacker });
    if !hunter {
        return;
    }

    let defender = &state.players[owner.opponent()];
    let mut candidates: Vec<Target> = CombatManager::legal_blockers(state, attacker)
        .into_iter()
        .filter_map(|i| defender.board.get(i).map(|c| Target::Card(c.id)))
        .collect();
    if candidates.is_empty() {
        return;
    }
    candidates.push(Target::Skip);
    let request = SelectionRequest::new(candidates, 1, format!("{attacker} HUNTER"), owner)
        .with_callback(SelectionCallback::ChooseHunterPrey { attacker });
    if let Err(err) = QueryManager::start_selection_request(state, log, request) {
        log.error(format_args!("hunter choice for {attacker} dropped: {err}"));
    }
}

fn end_combat(state: &mut GameState, log: &dyn GameLogger, attacker: EntityId) {
    state.pending_attacker = None;
    state.forced_blocker = None;
    if state.winner.is_some() {
        return;
    }

    // Deaths in this fight can change auras, including attack bans.
    EffectManager::apply_passive_effects(state, log);
    let frenzy_again = state.frenzy_candidate != Some(attacker)
        && state
            .card(attacker)
            .is_some_and(|c| c.has(Keyword::Frenzy))
        && CombatManager::can_attack(state, attacker);
    if frenzy_again {
        log.info(format_args!("{attacker} is in a frenzy and may attack again"));
        state.frenzy_candidate = Some(attacker);
        state.active_player = state.turn_player;
        state.phase = Phase::main_for(state.turn_player);
        return;
    }

    state.frenzy_candidate = None;
    TurnManager::end_turn(state, log);
}

/// Run tokens until input is needed, the game ends, or the stack is empty.
pub fn drain(state: &mut GameState, log: &dyn GameLogger) {
    let mut steps = 0;
    while state.active_request.is_none() && state.winner.is_none() {
        let Some(next) = state.continuations.pop() else {
            break;
        };
        steps += 1;
        if steps > MAX_DRAIN_STEPS {
            log.error(format_args!(
                "continuation drain exceeded {MAX_DRAIN_STEPS} steps, dropping {} tokens",
                state.continuations.len() + 1
            ));
            state.continuations.clear();
            break;
        }
        next.run(state, log);
    }
}
