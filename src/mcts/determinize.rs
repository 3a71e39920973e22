//! Hidden-information sampling.
//!
//! The searching player knows their own hand, both boards and both
//! discards. The opponent's hand and deck are one unknown pool, and the
//! order of the searcher's own deck is unknown too. A determinization
//! replaces those with one concrete guess that is consistent with what the
//! searcher has seen.

use im::Vector;

use crate::cards::Card;
use crate::core::{GameRng, GameState, PlayerId};

pub struct Determinizer;

impl Determinizer {
    /// Resample everything `observer` cannot see, in place.
    ///
    /// The opponent keeps the same hand size and deck size, and the set of
    /// cards across their hand and deck is unchanged.
    pub fn determinize(state: &mut GameState, observer: PlayerId, rng: &mut GameRng) {
        let opponent = observer.opponent();
        let (mine, theirs) = state.players.pair_mut(observer);

        let hand_size = theirs.hand.len();
        let mut hidden: Vec<Card> = theirs.hand.iter().chain(theirs.deck.iter()).cloned().collect();
        rng.shuffle(&mut hidden);
        let deck = hidden.split_off(hand_size.min(hidden.len()));
        theirs.hand = Vector::from(hidden);
        theirs.deck = Vector::from(deck);

        rng.shuffle_vector(&mut mine.deck);

        debug_assert_eq!(theirs.hand.len(), hand_size, "{opponent} hand size changed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardDefinition;
    use crate::core::{EntityId, GameConfig};
    use std::sync::Arc;

    fn seeded_state() -> GameState {
        let mut state = GameState::new(GameConfig::default(), 3);
        let def = Arc::new(CardDefinition::creature("Filler", 1));
        let mut next = EntityId::FIRST;
        for player in PlayerId::both() {
            for _ in 0..4 {
                state.players[player].hand.push_back(Card::new(next.bump(), Arc::clone(&def)));
            }
            for _ in 0..6 {
                state.players[player].deck.push_back(Card::new(next.bump(), Arc::clone(&def)));
            }
            state.players[player].board.push_back(Card::new(next.bump(), Arc::clone(&def)));
        }
        state
    }

    #[test]
    fn test_observer_hand_and_boards_untouched() {
        let mut state = seeded_state();
        let before = state.clone();
        let mut rng = GameRng::new(99);
        Determinizer::determinize(&mut state, PlayerId(0), &mut rng);

        assert_eq!(state.players[PlayerId(0)].hand, before.players[PlayerId(0)].hand);
        for player in PlayerId::both() {
            assert_eq!(state.players[player].board, before.players[player].board);
        }
        assert_eq!(state.players[PlayerId(1)].hand.len(), 4);
        assert_eq!(state.players[PlayerId(1)].deck.len(), 6);
    }
}
