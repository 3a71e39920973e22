//! Target selection requests.
//!
//! An effect that needs a player's choice opens a `SelectionRequest` and
//! the engine waits in `ResolutionChoice` until it is answered. Callbacks are
//! plain data so requests clone and serialize with the rest of the state.

use serde::{Deserialize, Serialize};

use super::continuation::Continuation;
use crate::core::{Action, CommandError, EntityId, GameLogger, GameState, Phase, PlayerId};
use crate::effects::{CardEffect, Target};

/// What happens once the selection is complete.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionCallback {
    /// Apply an effect to the chosen targets.
    ApplyEffect {
        effect: CardEffect,
        source: EntityId,
        owner: PlayerId,
    },
    /// The chosen creature must block `attacker`.
    ChooseHunterPrey { attacker: EntityId },
}

/// A paused interaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRequest {
    /// Exactly the eligible targets.
    pub candidates: Vec<Target>,
    /// How many must be chosen.
    pub count: usize,
    /// Diagnostic tag.
    pub reason: String,
    /// Player who chooses.
    pub selector: PlayerId,
    pub current_selection: Vec<Target>,
    pub callback: Option<SelectionCallback>,
}

impl SelectionRequest {
    #[must_use]
    pub fn new(
        candidates: Vec<Target>,
        count: usize,
        reason: impl Into<String>,
        selector: PlayerId,
    ) -> Self {
        Self {
            candidates,
            count,
            reason: reason.into(),
            selector,
            current_selection: Vec::new(),
            callback: None,
        }
    }

    #[must_use]
    pub fn with_callback(mut self, callback: SelectionCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    /// Candidates not picked yet.
    pub fn remaining(&self) -> impl Iterator<Item = Target> + '_ {
        self.candidates
            .iter()
            .copied()
            .filter(|c| !self.current_selection.contains(c))
    }

    fn is_complete(&self) -> bool {
        self.current_selection.len() >= self.count
            || self.current_selection.contains(&Target::Skip)
            || self.remaining().next().is_none()
    }
}

/// Owns the request lifecycle: ask, accumulate, complete, call back.
pub struct QueryManager;

impl QueryManager {
    /// Open a request and hand control to its selector.
    pub fn start_selection_request(
        state: &mut GameState,
        log: &dyn GameLogger,
        request: SelectionRequest,
    ) -> Result<(), CommandError> {
        if let Some(open) = &state.active_request {
            log.error(format_args!(
                "cannot open request '{}': '{}' is still open",
                request.reason, open.reason
            ));
            return Err(CommandError::RequestAlreadyOpen);
        }
        log.debug(format_args!(
            "{} selects {} of {} for {}",
            request.selector,
            request.count,
            request.candidates.len(),
            request.reason
        ));
        state.active_player = request.selector;
        state.phase = Phase::ResolutionChoice;
        state.active_request = Some(request);
        Ok(())
    }

    /// Add one pick to the open request; completes it when enough are in.
    pub fn resolve_selection(
        state: &mut GameState,
        log: &dyn GameLogger,
        target: Target,
    ) -> Result<(), CommandError> {
        let request = state
            .active_request
            .as_mut()
            .ok_or(CommandError::NoActiveRequest)?;
        if !request.candidates.contains(&target) || request.current_selection.contains(&target) {
            return Err(CommandError::InvalidSelection);
        }
        request.current_selection.push(target);
        if !request.is_complete() {
            return Ok(());
        }

        // Closed before the callback runs, so the callback may open another.
        let Some(request) = state.active_request.take() else {
            return Ok(());
        };
        let chosen: Vec<Target> = request
            .current_selection
            .into_iter()
            .filter(|t| *t != Target::Skip)
            .collect();
        log.debug(format_args!("selection for {} complete: {:?}", request.reason, chosen));

        match request.callback {
            Some(SelectionCallback::ApplyEffect {
                effect,
                source,
                owner,
            }) => state.continuations.push(Continuation::ApplyChosen {
                effect,
                source,
                owner,
                targets: chosen,
            }),
            Some(SelectionCallback::ChooseHunterPrey { attacker }) => {
                if let Some(Target::Card(prey)) = chosen.first() {
                    log.info(format_args!("hunter {attacker} forces {prey} to block"));
                    state.forced_blocker = Some(*prey);
                }
            }
            None => {}
        }
        Ok(())
    }

    /// Map a SELECT action to the target it names.
    pub fn target_for(state: &GameState, action: Action) -> Result<Target, CommandError> {
        let request = state
            .active_request
            .as_ref()
            .ok_or(CommandError::NoActiveRequest)?;
        match action {
            Action::SelectSkip => Ok(Target::Skip),
            Action::Select {
                zone,
                opponent,
                index,
            } => {
                let player = if opponent {
                    request.selector.opponent()
                } else {
                    request.selector
                };
                let cards = state.players[player].zone(zone);
                cards
                    .get(index)
                    .map(|c| Target::Card(c.id))
                    .ok_or(CommandError::IndexOutOfRange {
                        zone: zone.name(),
                        index,
                        len: cards.len(),
                    })
            }
            _ => Err(CommandError::InvalidSelection),
        }
    }

    /// SELECT actions for the open request.
    #[must_use]
    pub fn legal_selections(state: &GameState) -> Vec<Action> {
        let Some(request) = &state.active_request else {
            return Vec::new();
        };
        request
            .remaining()
            .filter_map(|target| match target {
                Target::Skip => Some(Action::SelectSkip),
                Target::Card(id) => state.locate(id).map(|loc| Action::Select {
                    zone: loc.zone,
                    opponent: loc.player != request.selector,
                    index: loc.index,
                }),
                Target::Player(_) => None,
            })
            .collect()
    }
}
