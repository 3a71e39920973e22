//! Verb handlers.
//!
//! Each `EffectVerb` maps to one `EffectAction`. The same handler serves
//! one-shot resolution and the passive aura pass; `EffectInvocation::aura`
//! tells it which layer of the card to write.

use super::effect::{CardEffect, EffectVerb, Stat, StatMode};
use super::manager::EffectManager;
use super::targeting::{candidates, Target, TargetGroup, TargetSpec};
use crate::cards::{KeywordSet, Trigger};
use crate::core::{EntityId, GameLogger, GameState, PlayerId};
use crate::rules::{CombatManager, TurnManager};
use crate::zones::Zone;

/// One application of an effect.
#[derive(Clone, Copy, Debug)]
pub struct EffectInvocation<'a> {
    pub effect: &'a CardEffect,
    /// Card the effect is printed on.
    pub source: EntityId,
    /// Player the effect works for.
    pub owner: PlayerId,
    /// Write to the aura layer instead of the permanent one.
    pub aura: bool,
}

impl EffectInvocation<'_> {
    #[must_use]
    pub fn opponent(&self) -> PlayerId {
        self.owner.opponent()
    }
}

/// Executes one verb on one target.
pub trait EffectAction: Sync {
    fn execute(
        &self,
        state: &mut GameState,
        log: &dyn GameLogger,
        target: Target,
        invocation: &EffectInvocation<'_>,
    );
}

/// Handler for a verb.
#[must_use]
pub fn action_for(verb: EffectVerb) -> &'static dyn EffectAction {
    match verb {
        EffectVerb::ModifyStat => &ModifyStatAction,
        EffectVerb::Destroy => &DestroyAction,
        EffectVerb::Steal => &StealAction,
        EffectVerb::Discard => &DiscardAction,
        EffectVerb::Play => &PlayAction,
        EffectVerb::Move => &MoveAction,
        EffectVerb::AddKeyword => &AddKeywordAction,
        EffectVerb::CopyKeywords => &CopyKeywordsAction,
        EffectVerb::Ban => &BanAction,
    }
}

/// Cards of `group` on the boards, seen from the invocation's owner.
fn board_group(state: &GameState, group: TargetGroup, invocation: &EffectInvocation<'_>) -> Vec<EntityId> {
    candidates(state, &TargetSpec::group(group), invocation.source, invocation.owner)
        .into_iter()
        .filter_map(|t| match t {
            Target::Card(id) => Some(id),
            _ => None,
        })
        .collect()
}

pub struct ModifyStatAction;

impl EffectAction for ModifyStatAction {
    fn execute(
        &self,
        state: &mut GameState,
        log: &dyn GameLogger,
        target: Target,
        invocation: &EffectInvocation<'_>,
    ) {
        let params = &invocation.effect.params;
        match (params.stat, target) {
            (Some(Stat::Hp), Target::Player(player)) => {
                if invocation.aura {
                    return;
                }
                let copied = Some(state.players[player.opponent()].hp);
                let before = state.players[player].hp;
                let after = params.mode.apply(before, params.amount, copied);
                state.players[player].hp = after;
                log.info(format_args!("{player} hp {before} -> {after}"));
                TurnManager::check_win_condition(state, log);
            }
            (Some(Stat::Power), Target::Card(id)) => {
                let copied = if params.mode == StatMode::Copy {
                    let from = params.copy_from.unwrap_or(TargetGroup::Enemies);
                    board_group(state, from, invocation)
                        .into_iter()
                        .filter(|other| *other != id)
                        .filter_map(|other| state.card(other).map(|c| c.unaura_power()))
                        .max()
                } else {
                    None
                };
                let Some(card) = state.card_mut(id) else {
                    return;
                };
                if invocation.aura {
                    let current = card.unaura_power() + card.aura_power;
                    let after = params.mode.apply(current, params.amount, copied);
                    card.aura_power += after - current;
                } else {
                    let current = card.power;
                    let after = params.mode.apply(current, params.amount, copied);
                    card.power_bonus += after - current;
                    card.recompute();
                    log.info(format_args!("{} power {current} -> {}", card.name(), card.power));
                }
            }
            (stat, target) => {
                log.debug(format_args!("MODIFY_STAT {stat:?} does not apply to {target:?}"));
            }
        }
    }
}

pub struct DestroyAction;

impl EffectAction for DestroyAction {
    fn execute(
        &self,
        state: &mut GameState,
        log: &dyn GameLogger,
        target: Target,
        _invocation: &EffectInvocation<'_>,
    ) {
        if let Target::Card(id) = target {
            CombatManager::destroy(state, log, id);
        }
    }
}

pub struct StealAction;

impl EffectAction for StealAction {
    fn execute(
        &self,
        state: &mut GameState,
        log: &dyn GameLogger,
        target: Target,
        invocation: &EffectInvocation<'_>,
    ) {
        let Target::Card(id) = target else {
            return;
        };
        let Some(from) = state.locate(id) else {
            return;
        };
        if from.player == invocation.owner {
            log.debug(format_args!("{id} already belongs to {}", invocation.owner));
            return;
        }
        let destination = invocation.effect.params.destination.unwrap_or(from.zone);
        state.move_card(id, invocation.owner, destination);
        log.info(format_args!(
            "{} steals {id} from {} {} into {}",
            invocation.owner, from.player, from.zone, destination
        ));
        if from.zone == Zone::Hand {
            TurnManager::refill_hand(state, log, from.player);
        }
    }
}

pub struct DiscardAction;

impl EffectAction for DiscardAction {
    fn execute(
        &self,
        state: &mut GameState,
        log: &dyn GameLogger,
        target: Target,
        _invocation: &EffectInvocation<'_>,
    ) {
        let Target::Card(id) = target else {
            return;
        };
        let Some(from) = state.locate(id).filter(|loc| loc.zone == Zone::Hand) else {
            return;
        };
        state.move_card(id, from.player, Zone::Discard);
        log.info(format_args!("{} discards {id}", from.player));
        TurnManager::refill_hand(state, log, from.player);
    }
}

pub struct PlayAction;

impl EffectAction for PlayAction {
    fn execute(
        &self,
        state: &mut GameState,
        log: &dyn GameLogger,
        target: Target,
        invocation: &EffectInvocation<'_>,
    ) {
        let Target::Card(id) = target else {
            return;
        };
        if state.locate(id).is_none() {
            return;
        }
        state.move_card(id, invocation.owner, Zone::Board);
        log.info(format_args!("{} puts {id} into play", invocation.owner));
        EffectManager::fire_trigger(state, log, id, invocation.owner, Trigger::OnPlay);
    }
}

pub struct MoveAction;

impl EffectAction for MoveAction {
    fn execute(
        &self,
        state: &mut GameState,
        log: &dyn GameLogger,
        target: Target,
        invocation: &EffectInvocation<'_>,
    ) {
        let Target::Card(id) = target else {
            return;
        };
        let Some(from) = state.locate(id) else {
            return;
        };
        let destination = invocation.effect.params.destination.unwrap_or(Zone::Hand);
        state.move_card(id, from.player, destination);
        log.info(format_args!("{id} moves from {} to {destination}", from.zone));
    }
}

fn grant(state: &mut GameState, id: EntityId, keywords: KeywordSet, aura: bool) {
    if let Some(card) = state.card_mut(id) {
        if aura {
            card.aura_keywords |= keywords;
        } else {
            card.granted |= keywords;
            card.recompute();
        }
    }
}

pub struct AddKeywordAction;

impl EffectAction for AddKeywordAction {
    fn execute(
        &self,
        state: &mut GameState,
        log: &dyn GameLogger,
        target: Target,
        invocation: &EffectInvocation<'_>,
    ) {
        if let Target::Card(id) = target {
            let keywords = invocation.effect.params.keywords;
            grant(state, id, keywords, invocation.aura);
            if !invocation.aura {
                log.info(format_args!("{id} gains {:?}", keywords.iter().collect::<Vec<_>>()));
            }
        }
    }
}

pub struct CopyKeywordsAction;

impl EffectAction for CopyKeywordsAction {
    fn execute(
        &self,
        state: &mut GameState,
        log: &dyn GameLogger,
        target: Target,
        invocation: &EffectInvocation<'_>,
    ) {
        let Target::Card(id) = target else {
            return;
        };
        let from = invocation.effect.params.copy_from.unwrap_or(TargetGroup::Enemies);
        let keywords: KeywordSet = board_group(state, from, invocation)
            .into_iter()
            .filter(|other| *other != id)
            .filter_map(|other| state.card(other).map(|c| c.own_keywords()))
            .fold(KeywordSet::EMPTY, |acc, k| acc | k);
        grant(state, id, keywords, invocation.aura);
        if !invocation.aura {
            log.info(format_args!("{id} copies {:?}", keywords.iter().collect::<Vec<_>>()));
        }
    }
}

pub struct BanAction;

impl EffectAction for BanAction {
    fn execute(
        &self,
        _state: &mut GameState,
        _log: &dyn GameLogger,
        _target: Target,
        _invocation: &EffectInvocation<'_>,
    ) {
    }
}
