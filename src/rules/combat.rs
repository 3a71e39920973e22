//! Combat resolution.
//!
//! `predict` is the pure rule: compare effective power, let POISON override
//! it, let an undamaged TOUGH creature shrug off one lethal fight. The rest
//! of `CombatManager` applies outcomes to a `GameState` and feeds deaths
//! through the ON_DEATH pipeline.

use serde::{Deserialize, Serialize};

use super::continuation::Continuation;
use super::turn::TurnManager;
use crate::cards::{Card, Keyword, Trigger};
use crate::core::{EntityId, GameLogger, GameState, PlayerId};
use crate::effects::{BanKind, EffectManager};
use crate::zones::Zone;

/// What a fight does to its two creatures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FightOutcome {
    pub attacker_dies: bool,
    pub blocker_dies: bool,
    /// The attacker used its TOUGH reprieve.
    pub attacker_damaged: bool,
    /// The blocker used its TOUGH reprieve.
    pub blocker_damaged: bool,
}

/// Does `card` survive a lethal hit? Returns (dies, uses_reprieve).
fn take_lethal(card: &Card, lethal: bool) -> (bool, bool) {
    if !lethal {
        (false, false)
    } else if card.has(Keyword::Tough) && !card.is_damaged {
        (false, true)
    } else {
        (true, false)
    }
}

pub struct CombatManager;

impl CombatManager {
    /// Pure fight rule on effective power and keywords.
    ///
    /// ```
    /// use std::sync::Arc;
    /// use mindbug_engine::cards::{Card, CardDefinition, Keyword};
    /// use mindbug_engine::core::EntityId;
    /// use mindbug_engine::rules::CombatManager;
    ///
    /// let newt = Card::new(EntityId(1), Arc::new(CardDefinition::creature("Newt", 1).with_keyword(Keyword::Poison)));
    /// let kraken = Card::new(EntityId(2), Arc::new(CardDefinition::creature("Kraken", 9)));
    ///
    /// let outcome = CombatManager::predict(&newt, &kraken);
    /// assert!(outcome.attacker_dies && outcome.blocker_dies);
    /// ```
    #[must_use]
    pub fn predict(attacker: &Card, blocker: &Card) -> FightOutcome {
        let blocker_lethal = attacker.power >= blocker.power || attacker.has(Keyword::Poison);
        let attacker_lethal = blocker.power >= attacker.power || blocker.has(Keyword::Poison);

        let (attacker_dies, attacker_damaged) = take_lethal(attacker, attacker_lethal);
        let (blocker_dies, blocker_damaged) = take_lethal(blocker, blocker_lethal);
        FightOutcome {
            attacker_dies,
            blocker_dies,
            attacker_damaged,
            blocker_damaged,
        }
    }

    /// Fight a blocked attack. Returns (attacker_died, blocker_died).
    ///
    /// A blocker that already left the board (an ON_BLOCKED effect removed
    /// it) ends the fight as `(false, true)`.
    pub fn resolve_fight(
        state: &mut GameState,
        log: &dyn GameLogger,
        attacker: EntityId,
        blocker: EntityId,
    ) -> (bool, bool) {
        if state.locate_on_board(blocker).is_none() {
            log.info(format_args!("blocker {blocker} is gone, combat ends"));
            return (false, true);
        }
        if state.locate_on_board(attacker).is_none() {
            log.info(format_args!("attacker {attacker} is gone, combat ends"));
            return (true, false);
        }

        EffectManager::apply_passive_effects(state, log);
        let (Some(a), Some(b)) = (state.card(attacker), state.card(blocker)) else {
            return (false, false);
        };
        let outcome = Self::predict(a, b);
        log.info(format_args!("{a} fights {b}: {outcome:?}"));

        for (id, damaged) in [
            (attacker, outcome.attacker_damaged),
            (blocker, outcome.blocker_damaged),
        ] {
            if damaged {
                if let Some(card) = state.card_mut(id) {
                    card.is_damaged = true;
                }
            }
        }

        // Both leave the board before either ON_DEATH runs; the attacker's
        // trigger is pushed last so it resolves first.
        let blocker_death = outcome.blocker_dies.then(|| Self::remove_dead(state, log, blocker)).flatten();
        let attacker_death = outcome.attacker_dies.then(|| Self::remove_dead(state, log, attacker)).flatten();
        for owner in [blocker_death, attacker_death] {
            if let Some((id, owner)) = owner {
                EffectManager::fire_trigger(state, log, id, owner, Trigger::OnDeath);
            }
        }
        (outcome.attacker_dies, outcome.blocker_dies)
    }

    /// Attack that was not blocked: ON_UNBLOCKED replaces the 1 hp hit.
    pub fn resolve_unblocked(state: &mut GameState, log: &dyn GameLogger, attacker: EntityId) {
        let Some(loc) = state.locate_on_board(attacker) else {
            return;
        };
        if EffectManager::fire_trigger(state, log, attacker, loc.player, Trigger::OnUnblocked) {
            return;
        }
        let defender = loc.player.opponent();
        state.players[defender].lose_hp(1);
        log.info(format_args!(
            "{attacker} is unblocked, {defender} drops to {} hp",
            state.players[defender].hp
        ));
        TurnManager::check_win_condition(state, log);
    }

    /// Defeat a creature outside combat. TOUGH does not save it.
    pub fn destroy(state: &mut GameState, log: &dyn GameLogger, id: EntityId) -> bool {
        match Self::remove_dead(state, log, id) {
            Some((id, owner)) => {
                EffectManager::fire_trigger(state, log, id, owner, Trigger::OnDeath);
                true
            }
            None => false,
        }
    }

    /// Board to discard, reset. Returns the card and the player it died under.
    fn remove_dead(state: &mut GameState, log: &dyn GameLogger, id: EntityId) -> Option<(EntityId, PlayerId)> {
        let loc = state.locate_on_board(id)?;
        state.move_card(id, loc.player, Zone::Discard);
        log.info(format_args!("{id} of {} is defeated", loc.player));
        Some((id, loc.player))
    }

    /// Can this creature attack right now?
    #[must_use]
    pub fn can_attack(state: &GameState, id: EntityId) -> bool {
        state
            .locate_on_board(id)
            .is_some_and(|loc| loc.player == state.turn_player)
            && !EffectManager::is_banned(state, id, BanKind::Attack)
    }

    /// Board indices of the defender's creatures that may block `attacker`.
    ///
    /// A Hunter's prey, while it is still able to block, is the only option.
    #[must_use]
    pub fn legal_blockers(state: &GameState, attacker: EntityId) -> Vec<usize> {
        let Some(loc) = state.locate_on_board(attacker) else {
            return Vec::new();
        };
        let sneaky = state
            .card(attacker)
            .is_some_and(|c| c.has(Keyword::Sneaky));
        let board = &state.players[loc.player.opponent()].board;
        let able: Vec<usize> = board
            .iter()
            .enumerate()
            .filter(|(_, c)| !sneaky || c.has(Keyword::Sneaky))
            .filter(|(_, c)| !EffectManager::is_banned(state, c.id, BanKind::Block))
            .map(|(i, _)| i)
            .collect();

        let forced = state
            .forced_blocker
            .and_then(|id| able.iter().copied().find(|&i| board[i].id == id));
        match forced {
            Some(index) => vec![index],
            None => able,
        }
    }

    /// Must the defender block with the Hunter's prey?
    #[must_use]
    pub fn block_is_forced(state: &GameState, attacker: EntityId) -> bool {
        state.forced_blocker.is_some_and(|prey| {
            let blockers = Self::legal_blockers(state, attacker);
            state.locate_on_board(prey).is_some_and(|loc| blockers == [loc.index])
        })
    }
}

/// Resume token helpers used by commands.
pub(crate) fn push_block(state: &mut GameState, log: &dyn GameLogger, attacker: EntityId, blocker: EntityId) {
    state.continuations.push(Continuation::EndCombat { attacker });
    state.continuations.push(Continuation::Fight { attacker, blocker });
    if let Some(loc) = state.locate_on_board(blocker) {
        EffectManager::fire_trigger(state, log, blocker, loc.player, Trigger::OnBlock);
    }
    if let Some(loc) = state.locate_on_board(attacker) {
        EffectManager::fire_trigger(state, log, attacker, loc.player, Trigger::OnBlocked);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardDefinition;
    use std::sync::Arc;

    fn creature(id: u32, power: i32, keywords: &[Keyword]) -> Card {
        let mut def = CardDefinition::creature("Test", power);
        for k in keywords {
            def = def.with_keyword(*k);
        }
        Card::new(EntityId(id), Arc::new(def))
    }

    #[test]
    fn test_higher_power_wins() {
        let outcome = CombatManager::predict(&creature(1, 5, &[]), &creature(2, 3, &[]));
        assert!(!outcome.attacker_dies);
        assert!(outcome.blocker_dies);
    }

    #[test]
    fn test_equal_power_trades() {
        let outcome = CombatManager::predict(&creature(1, 4, &[]), &creature(2, 4, &[]));
        assert!(outcome.attacker_dies && outcome.blocker_dies);
    }

    #[test]
    fn test_poison_on_weaker_side_kills_stronger() {
        let outcome =
            CombatManager::predict(&creature(1, 9, &[]), &creature(2, 1, &[Keyword::Poison]));
        assert!(outcome.attacker_dies);
        assert!(outcome.blocker_dies);
    }

    #[test]
    fn test_tough_single_reprieve() {
        let attacker = creature(1, 6, &[]);
        let mut blocker = creature(2, 5, &[Keyword::Tough]);

        let first = CombatManager::predict(&attacker, &blocker);
        assert!(!first.blocker_dies);
        assert!(first.blocker_damaged);

        blocker.is_damaged = true;
        let second = CombatManager::predict(&attacker, &blocker);
        assert!(second.blocker_dies);
        assert!(!second.blocker_damaged);
    }

    #[test]
    fn test_tough_survives_poison_once() {
        let outcome = CombatManager::predict(
            &creature(1, 1, &[Keyword::Poison]),
            &creature(2, 5, &[Keyword::Tough]),
        );
        assert!(outcome.attacker_dies);
        assert!(!outcome.blocker_dies);
        assert!(outcome.blocker_damaged);
    }
}
