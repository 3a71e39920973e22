//! Effect dispatch.
//!
//! `EffectManager` turns triggers into queued work, resolves single effects
//! (conditions, targeting, selection) and keeps passive auras current.

use std::sync::Arc;

use super::actions::{action_for, EffectInvocation};
use super::effect::{BanKind, CardEffect, Chooser, EffectVerb};
use super::targeting::{candidates, context_holds, filter_targets, Target, TargetSelect};
use crate::cards::{CardDefinition, Trigger};
use crate::core::{EntityId, GameLogger, GameState, PlayerId};
use crate::rules::{Continuation, QueryManager, SelectionCallback, SelectionRequest};
use crate::zones::Zone;

pub struct EffectManager;

impl EffectManager {
    /// Queue the effects `source` has for `trigger`.
    ///
    /// ON_PLAY is suppressed while the owner is silenced. Returns whether
    /// anything was queued.
    pub fn fire_trigger(
        state: &mut GameState,
        log: &dyn GameLogger,
        source: EntityId,
        owner: PlayerId,
        trigger: Trigger,
    ) -> bool {
        let Some(def) = state.card(source).map(|c| Arc::clone(&c.def)) else {
            return false;
        };
        if !def.fires_on(trigger) {
            return false;
        }
        if trigger == Trigger::OnPlay && Self::is_silenced(state, owner) {
            log.info(format_args!("{} {trigger} is silenced", def.name));
            return false;
        }
        log.debug(format_args!("{} {trigger} fires for {owner}", def.name));
        state.continuations.push(Continuation::ResolveEffects {
            def,
            source,
            owner,
            next: 0,
        });
        true
    }

    /// Resolve one effect: check its gate, find targets, then apply or ask.
    pub fn apply_effect(
        state: &mut GameState,
        log: &dyn GameLogger,
        effect: &CardEffect,
        source: EntityId,
        owner: PlayerId,
    ) {
        if effect.verb == EffectVerb::Ban {
            return;
        }
        if let Some(context) = effect.context() {
            if !context_holds(state, context, source, owner) {
                log.debug(format_args!("{source} {} gated by {context:?}", effect.verb.name()));
                return;
            }
        }

        let found = filter_targets(
            state,
            candidates(state, &effect.target, source, owner),
            effect.filter(),
            false,
        );
        if found.is_empty() {
            log.debug(format_args!("{source} {} has no targets", effect.verb.name()));
            return;
        }

        let targets = match effect.target.select {
            TargetSelect::All => found,
            TargetSelect::Random(n) => state
                .rng
                .sample_indices(found.len(), n as usize)
                .into_iter()
                .map(|i| found[i])
                .collect(),
            TargetSelect::Choose(n) if found.len() <= n as usize => found,
            TargetSelect::Choose(n) => {
                let selector = match effect.params.chooser {
                    Chooser::Owner => owner,
                    Chooser::Opponent => owner.opponent(),
                };
                let request = SelectionRequest::new(
                    found,
                    n as usize,
                    format!("{source} {}", effect.verb.name()),
                    selector,
                )
                .with_callback(SelectionCallback::ApplyEffect {
                    effect: effect.clone(),
                    source,
                    owner,
                });
                if let Err(err) = QueryManager::start_selection_request(state, log, request) {
                    log.error(format_args!("{source} {} dropped: {err}", effect.verb.name()));
                }
                return;
            }
        };

        Self::apply_to_targets(state, log, effect, source, owner, &targets);
    }

    /// Run an effect's verb on already chosen targets.
    pub fn apply_to_targets(
        state: &mut GameState,
        log: &dyn GameLogger,
        effect: &CardEffect,
        source: EntityId,
        owner: PlayerId,
        targets: &[Target],
    ) {
        let action = action_for(effect.verb);
        let invocation = EffectInvocation {
            effect,
            source,
            owner,
            aura: false,
        };
        for target in targets {
            if state.winner.is_some() {
                return;
            }
            action.execute(state, log, *target, &invocation);
        }
    }

    /// Recompute every passive aura from scratch.
    pub fn apply_passive_effects(state: &mut GameState, log: &dyn GameLogger) {
        for (_, player) in state.players.iter_mut() {
            for zone in Zone::ALL {
                for card in player.zone_mut(zone).iter_mut() {
                    card.clear_aura();
                }
            }
        }

        let sources: Vec<(Arc<CardDefinition>, EntityId, PlayerId)> = state
            .players
            .iter()
            .flat_map(|(owner, player)| {
                player
                    .board
                    .iter()
                    .filter(|c| c.trigger() == Some(Trigger::Passive))
                    .map(move |c| (Arc::clone(&c.def), c.id, owner))
            })
            .collect();

        for (def, source, owner) in &sources {
            for effect in def.effects.iter().filter(|e| e.is_aura()) {
                if let Some(context) = effect.context() {
                    if !context_holds(state, context, *source, *owner) {
                        continue;
                    }
                }
                let targets = filter_targets(
                    state,
                    candidates(state, &effect.target, *source, *owner),
                    effect.filter(),
                    true,
                );
                let invocation = EffectInvocation {
                    effect,
                    source: *source,
                    owner: *owner,
                    aura: true,
                };
                let action = action_for(effect.verb);
                for target in targets {
                    action.execute(state, log, target, &invocation);
                }
            }
        }

        for (_, player) in state.players.iter_mut() {
            for zone in Zone::ALL {
                for card in player.zone_mut(zone).iter_mut() {
                    card.recompute();
                }
            }
        }
    }

    /// Are `player`'s ON_PLAY triggers suppressed by an opposing passive?
    #[must_use]
    pub fn is_silenced(state: &GameState, player: PlayerId) -> bool {
        let silencer = player.opponent();
        state.players[silencer].board.iter().any(|card| {
            card.trigger() == Some(Trigger::Passive)
                && card.effects().iter().any(|e| {
                    e.verb == EffectVerb::Ban
                        && e.params.ban == Some(BanKind::OnPlayTrigger)
                        && e
                            .context()
                            .map_or(true, |c| context_holds(state, c, card.id, silencer))
                })
        })
    }

    /// Is the creature `id` forbidden from the action `kind` by any passive BAN?
    #[must_use]
    pub fn is_banned(state: &GameState, id: EntityId, kind: BanKind) -> bool {
        state.players.iter().any(|(owner, player)| {
            player
                .board
                .iter()
                .filter(|c| c.trigger() == Some(Trigger::Passive))
                .any(|card| {
                    card.effects().iter().any(|e| {
                        e.verb == EffectVerb::Ban
                            && e.params.ban == Some(kind)
                            && e
                                .context()
                                .map_or(true, |c| context_holds(state, c, card.id, owner))
                            && filter_targets(
                                state,
                                candidates(state, &e.target, card.id, owner),
                                e.filter(),
                                false,
                            )
                            .contains(&Target::Card(id))
                    })
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, Keyword, KeywordSet};
    use crate::core::{GameConfig, NullLogger};
    use crate::effects::{CompareOp, ContextCondition, EffectCondition, StatFilter, TargetGroup, TargetSpec};

    fn put(state: &mut GameState, player: PlayerId, id: u32, def: CardDefinition) {
        state.players[player]
            .board
            .push_back(Card::new(EntityId(id), Arc::new(def)));
    }

    #[test]
    fn test_ally_aura_and_debuff() {
        let mut state = GameState::new(GameConfig::default(), 1);
        let me = PlayerId(0);
        let them = PlayerId(1);
        put(
            &mut state,
            me,
            1,
            CardDefinition::creature("Pack Alpha", 3)
                .with_trigger(Trigger::Passive)
                .with_effect(CardEffect::power(TargetSpec::group(TargetGroup::AllOtherAllies), 1)),
        );
        put(&mut state, me, 2, CardDefinition::creature("Pup", 2));
        put(
            &mut state,
            them,
            3,
            CardDefinition::creature("Swamp Hag", 4)
                .with_trigger(Trigger::Passive)
                .with_effect(CardEffect::power(TargetSpec::group(TargetGroup::Enemies), -1)),
        );

        EffectManager::apply_passive_effects(&mut state, &NullLogger);

        assert_eq!(state.card(EntityId(1)).unwrap().power, 2);
        assert_eq!(state.card(EntityId(2)).unwrap().power, 2);
        assert_eq!(state.card(EntityId(3)).unwrap().power, 4);

        // Idempotent: a second pass does not stack.
        EffectManager::apply_passive_effects(&mut state, &NullLogger);
        assert_eq!(state.card(EntityId(2)).unwrap().power, 2);
    }

    #[test]
    fn test_aura_follows_board_changes() {
        let mut state = GameState::new(GameConfig::default(), 1);
        let me = PlayerId(0);
        put(
            &mut state,
            me,
            1,
            CardDefinition::creature("Lone Wolf", 2)
                .with_trigger(Trigger::Passive)
                .with_effect(
                    CardEffect::power(TargetSpec::group(TargetGroup::SelfCard), 4)
                        .with_condition(EffectCondition::Context(ContextCondition::IsAlone)),
                ),
        );
        EffectManager::apply_passive_effects(&mut state, &NullLogger);
        assert_eq!(state.card(EntityId(1)).unwrap().power, 6);

        put(&mut state, me, 2, CardDefinition::creature("Friend", 1));
        EffectManager::apply_passive_effects(&mut state, &NullLogger);
        assert_eq!(state.card(EntityId(1)).unwrap().power, 2);
    }

    #[test]
    fn test_copy_keywords_aura() {
        let mut state = GameState::new(GameConfig::default(), 1);
        put(
            &mut state,
            PlayerId(0),
            1,
            CardDefinition::creature("Mimic Octopus", 3)
                .with_trigger(Trigger::Passive)
                .with_effect(CardEffect::copy_keywords(
                    TargetSpec::group(TargetGroup::SelfCard),
                    TargetGroup::Enemies,
                )),
        );
        put(
            &mut state,
            PlayerId(1),
            2,
            CardDefinition::creature("Venom Newt", 1).with_keyword(Keyword::Poison),
        );

        EffectManager::apply_passive_effects(&mut state, &NullLogger);
        let mimic = state.card(EntityId(1)).unwrap();
        assert!(mimic.has(Keyword::Poison));
        assert_eq!(mimic.granted, KeywordSet::EMPTY);
    }

    #[test]
    fn test_ban_and_silence_queries() {
        let mut state = GameState::new(GameConfig::default(), 1);
        put(
            &mut state,
            PlayerId(0),
            1,
            CardDefinition::creature("Fear Bat", 2)
                .with_trigger(Trigger::Passive)
                .with_effect(
                    CardEffect::ban(TargetSpec::group(TargetGroup::Enemies), BanKind::Block)
                        .with_condition(EffectCondition::Stat(StatFilter::power(CompareOp::Gte, 6))),
                ),
        );
        put(&mut state, PlayerId(1), 2, CardDefinition::creature("Kraken", 9));
        put(&mut state, PlayerId(1), 3, CardDefinition::creature("Newt", 1));
        put(
            &mut state,
            PlayerId(1),
            4,
            CardDefinition::creature("Silence Moth", 1)
                .with_trigger(Trigger::Passive)
                .with_effect(CardEffect::ban(
                    TargetSpec::group(TargetGroup::Opponent),
                    BanKind::OnPlayTrigger,
                )),
        );

        assert!(EffectManager::is_banned(&state, EntityId(2), BanKind::Block));
        assert!(!EffectManager::is_banned(&state, EntityId(3), BanKind::Block));
        assert!(!EffectManager::is_banned(&state, EntityId(2), BanKind::Attack));
        assert!(EffectManager::is_silenced(&state, PlayerId(0)));
        assert!(!EffectManager::is_silenced(&state, PlayerId(1)));
    }
}
