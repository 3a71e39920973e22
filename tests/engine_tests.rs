//! Full-turn scenarios driven through `MindbugGame::step`.

use std::sync::Arc;

use mindbug_engine::cards::{CardDefinition, Keyword, Trigger};
use mindbug_engine::core::{Action, CommandError, GameRng, Phase, PlayerId};
use mindbug_engine::effects::{
    BanKind, CardEffect, CompareOp, EffectCondition, EffectVerb, StatFilter, TargetGroup,
    TargetSelect, TargetSpec,
};
use mindbug_engine::rules::{MindbugGame, MindbugGameBuilder};
use mindbug_engine::zones::Zone;

const P1: PlayerId = PlayerId(0);
const P2: PlayerId = PlayerId(1);

fn creature(name: &str, power: i32) -> CardDefinition {
    CardDefinition::creature(name, power)
}

fn def(name: &str, power: i32) -> Arc<CardDefinition> {
    Arc::new(creature(name, power))
}

fn names(cards: &im::Vector<mindbug_engine::cards::Card>) -> Vec<&str> {
    cards.iter().map(|c| c.name()).collect()
}

fn step_all(game: &mut MindbugGame, actions: &[Action]) {
    for action in actions {
        game.step(*action)
            .unwrap_or_else(|err| panic!("{action} rejected: {err}"));
    }
}

// =============================================================================
// Combat flow
// =============================================================================

#[test]
fn test_frenzy_attacks_twice_then_turn_ends() {
    let mut game = MindbugGameBuilder::new()
        .board(P1, vec![Arc::new(creature("Luchataur", 9).with_keyword(Keyword::Frenzy))])
        .hand(P1, vec![def("Spare", 1)])
        .hand(P2, vec![def("Spare", 1)])
        .build(3);

    step_all(&mut game, &[Action::Attack(0), Action::NoBlock]);
    assert_eq!(game.state.player(P2).hp, 2);
    assert_eq!(game.state.phase, Phase::P1Main);
    assert_eq!(game.get_legal_moves(), vec![Action::Attack(0)]);
    assert!(game.step(Action::Play(0)).is_err());

    step_all(&mut game, &[Action::Attack(0), Action::NoBlock]);
    assert_eq!(game.state.player(P2).hp, 1);
    assert_eq!(game.state.turn_player, P2);
    assert_eq!(game.state.phase, Phase::P2Main);
    assert_eq!(game.state.frenzy_candidate, None);
}

#[test]
fn test_frenzy_ends_turn_when_a_death_bans_the_second_attack() {
    let bat = creature("Fear Bat", 2)
        .with_trigger(Trigger::Passive)
        .with_effect(
            CardEffect::ban(TargetSpec::group(TargetGroup::Enemies), BanKind::Attack)
                .with_condition(EffectCondition::Stat(StatFilter::power(CompareOp::Gte, 6))),
        );
    let hag = creature("Swamp Hag", 4)
        .with_trigger(Trigger::Passive)
        .with_effect(CardEffect::power(TargetSpec::group(TargetGroup::Enemies), -1));
    let mut game = MindbugGameBuilder::new()
        .board(P1, vec![Arc::new(creature("Berserker", 6).with_keyword(Keyword::Frenzy))])
        .hand(P1, vec![def("Spare", 1)])
        .board(P2, vec![Arc::new(bat), Arc::new(hag)])
        .hand(P2, vec![def("Spare", 1)])
        .build(3);
    assert_eq!(game.state.player(P1).board[0].power, 5);

    step_all(&mut game, &[Action::Attack(0), Action::Block(1)]);

    assert_eq!(names(&game.state.player(P2).board), vec!["Fear Bat"]);
    assert_eq!(game.state.player(P1).board[0].power, 6);
    assert!(!game.is_over());
    assert_eq!(game.state.frenzy_candidate, None);
    assert_eq!(game.state.turn_player, P2);
    assert_eq!(game.state.phase, Phase::P2Main);
    assert!(!game.get_legal_moves().is_empty());
}

#[test]
fn test_on_blocked_removes_the_blocker_before_the_fight() {
    let ambusher = creature("Ambusher", 3)
        .with_trigger(Trigger::OnBlocked)
        .with_effect(CardEffect::new(EffectVerb::Destroy, TargetSpec::group(TargetGroup::Enemies)));
    let mut game = MindbugGameBuilder::new()
        .board(P1, vec![Arc::new(ambusher)])
        .hand(P1, vec![def("Spare", 1)])
        .board(P2, vec![def("Gorillion", 10)])
        .hand(P2, vec![def("Spare", 1)])
        .build(3);

    step_all(&mut game, &[Action::Attack(0), Action::Block(0)]);

    assert_eq!(names(&game.state.player(P1).board), vec!["Ambusher"]);
    assert!(game.state.player(P2).board.is_empty());
    assert_eq!(names(&game.state.player(P2).discard), vec!["Gorillion"]);
    assert_eq!(game.state.player(P2).hp, 3);
    assert_eq!(game.state.phase, Phase::P2Main);
}

#[test]
fn test_on_unblocked_replaces_the_one_hp_hit() {
    let extorter = creature("Tusked Extorter", 3)
        .with_trigger(Trigger::OnUnblocked)
        .with_effect(CardEffect::damage(TargetSpec::group(TargetGroup::Opponent), 2));
    let mut game = MindbugGameBuilder::new()
        .board(P1, vec![Arc::new(extorter)])
        .hand(P1, vec![def("Spare", 1)])
        .board(P2, vec![def("Mouse", 1)])
        .hand(P2, vec![def("Spare", 1)])
        .build(3);

    step_all(&mut game, &[Action::Attack(0), Action::NoBlock]);

    assert_eq!(game.state.player(P2).hp, 1);
    assert!(!game.is_over());
    assert_eq!(game.state.phase, Phase::P2Main);
}

#[test]
fn test_on_attack_choice_comes_before_blocks() {
    let sniper = creature("Chameleon Sniper", 2)
        .with_trigger(Trigger::OnAttack)
        .with_effect(CardEffect::new(
            EffectVerb::Destroy,
            TargetSpec::group(TargetGroup::Enemies).with_select(TargetSelect::Choose(1)),
        ));
    let mut game = MindbugGameBuilder::new()
        .board(P1, vec![Arc::new(sniper)])
        .hand(P1, vec![def("Spare", 1)])
        .board(P2, vec![def("Mouse", 1), def("Rat", 2)])
        .hand(P2, vec![def("Spare", 1)])
        .build(3);

    game.step(Action::Attack(0)).unwrap();
    assert_eq!(game.state.phase, Phase::ResolutionChoice);
    assert_eq!(game.active_player(), P1);
    assert_eq!(game.get_legal_moves().len(), 2);

    game.step(Action::Select { zone: Zone::Board, opponent: true, index: 1 }).unwrap();
    assert_eq!(names(&game.state.player(P2).board), vec!["Mouse"]);
    assert_eq!(game.state.phase, Phase::BlockDecision);
    assert_eq!(game.active_player(), P2);
    assert_eq!(game.get_legal_moves(), vec![Action::Block(0), Action::NoBlock]);
}

#[test]
fn test_hunter_forces_the_chosen_blocker() {
    let mut game = MindbugGameBuilder::new()
        .board(P1, vec![Arc::new(creature("Killer Bee", 5).with_keyword(Keyword::Hunter))])
        .hand(P1, vec![def("Spare", 1)])
        .board(P2, vec![def("Mouse", 2), def("Gorillion", 10)])
        .hand(P2, vec![def("Spare", 1)])
        .build(3);

    game.step(Action::Attack(0)).unwrap();
    assert_eq!(game.state.phase, Phase::ResolutionChoice);
    assert_eq!(game.active_player(), P1);
    let choices = game.get_legal_moves();
    assert!(choices.contains(&Action::SelectSkip));
    assert_eq!(choices.len(), 3);

    let mouse = Action::Select { zone: Zone::Board, opponent: true, index: 0 };
    game.step(mouse).unwrap();
    assert_eq!(game.state.phase, Phase::BlockDecision);
    assert_eq!(game.active_player(), P2);
    assert_eq!(game.get_legal_moves(), vec![Action::Block(0)]);
    assert!(matches!(
        game.step(Action::NoBlock),
        Err(CommandError::IllegalAction { .. })
    ));

    game.step(Action::Block(0)).unwrap();
    assert_eq!(names(&game.state.player(P2).board), vec!["Gorillion"]);
    assert_eq!(names(&game.state.player(P2).discard), vec!["Mouse"]);
    assert_eq!(game.state.forced_blocker, None);
    assert_eq!(game.state.phase, Phase::P2Main);
}

#[test]
fn test_hunter_may_skip_and_defender_chooses() {
    let mut game = MindbugGameBuilder::new()
        .board(P1, vec![Arc::new(creature("Shark Dog", 4).with_keyword(Keyword::Hunter))])
        .hand(P1, vec![def("Spare", 1)])
        .board(P2, vec![def("Mouse", 2)])
        .hand(P2, vec![def("Spare", 1)])
        .build(3);

    step_all(&mut game, &[Action::Attack(0), Action::SelectSkip]);
    assert_eq!(game.get_legal_moves(), vec![Action::Block(0), Action::NoBlock]);
    assert_eq!(game.state.forced_blocker, None);
}

#[test]
fn test_tough_survives_one_lethal_fight() {
    let mut game = MindbugGameBuilder::new()
        .board(P1, vec![Arc::new(creature("Shield Bugs", 3).with_keyword(Keyword::Tough))])
        .hand(P1, vec![def("Spare", 1)])
        .board(P2, vec![def("Gorillion", 10)])
        .hand(P2, vec![def("Spare", 1)])
        .build(3);

    step_all(&mut game, &[Action::Attack(0), Action::Block(0)]);
    let bugs = &game.state.player(P1).board[0];
    assert_eq!(bugs.name(), "Shield Bugs");
    assert!(bugs.is_damaged);
    assert_eq!(game.state.player(P2).board.len(), 1);
}

#[test]
fn test_sneaky_can_only_be_blocked_by_sneaky() {
    let mut game = MindbugGameBuilder::new()
        .board(P1, vec![Arc::new(creature("Spider Owl", 3).with_keyword(Keyword::Sneaky))])
        .hand(P1, vec![def("Spare", 1)])
        .board(
            P2,
            vec![
                def("Gorillion", 10),
                Arc::new(creature("Ferret", 2).with_keyword(Keyword::Sneaky)),
            ],
        )
        .hand(P2, vec![def("Spare", 1)])
        .build(3);

    game.step(Action::Attack(0)).unwrap();
    assert_eq!(game.get_legal_moves(), vec![Action::Block(1), Action::NoBlock]);
}

#[test]
fn test_on_death_selection_destroys_chosen_enemy() {
    let toad = creature("Explosive Toad", 5)
        .with_trigger(Trigger::OnDeath)
        .with_effect(CardEffect::new(
            EffectVerb::Destroy,
            TargetSpec::group(TargetGroup::Enemies).with_select(TargetSelect::Choose(1)),
        ));
    let mut game = MindbugGameBuilder::new()
        .board(P1, vec![Arc::new(toad)])
        .hand(P1, vec![def("Spare", 1)])
        .board(P2, vec![def("Gorillion", 10), def("Mouse", 1), def("Cat", 2)])
        .hand(P2, vec![def("Spare", 1)])
        .build(3);

    step_all(&mut game, &[Action::Attack(0), Action::Block(0)]);
    assert_eq!(game.state.phase, Phase::ResolutionChoice);
    assert_eq!(game.active_player(), P1);
    assert_eq!(game.get_legal_moves().len(), 3);

    game.step(Action::Select { zone: Zone::Board, opponent: true, index: 1 })
        .unwrap();
    assert_eq!(names(&game.state.player(P2).board), vec!["Gorillion", "Cat"]);
    assert_eq!(names(&game.state.player(P2).discard), vec!["Mouse"]);
    assert_eq!(names(&game.state.player(P1).discard), vec!["Explosive Toad"]);
    assert_eq!(game.state.phase, Phase::P2Main);
}

#[test]
fn test_last_hit_wins_the_game() {
    let mut game = MindbugGameBuilder::new()
        .board(P1, vec![def("Tusk", 4)])
        .hand(P1, vec![def("Spare", 1)])
        .hand(P2, vec![def("Spare", 1)])
        .hp(P2, 1)
        .build(3);

    step_all(&mut game, &[Action::Attack(0), Action::NoBlock]);
    assert_eq!(game.winner(), Some(P1));
    assert_eq!(game.state.phase, Phase::GameOver);
    assert!(game.get_legal_moves().is_empty());
    assert!(matches!(game.step(Action::Play(0)), Err(CommandError::GameOver)));
}

// =============================================================================
// Mindbug flow and triggers
// =============================================================================

#[test]
fn test_mindbugged_card_triggers_for_the_thief() {
    let bee = creature("Killer Bee", 5)
        .with_trigger(Trigger::OnPlay)
        .with_effect(CardEffect::damage(TargetSpec::group(TargetGroup::Opponent), 1));
    let mut game = MindbugGameBuilder::new()
        .hand(P1, vec![Arc::new(bee), def("Spare", 1)])
        .hand(P2, vec![def("Spare", 1)])
        .build(3);

    step_all(&mut game, &[Action::Play(0), Action::Mindbug]);

    assert_eq!(game.state.player(P1).hp, 2);
    assert_eq!(names(&game.state.player(P2).board), vec!["Killer Bee"]);
    assert_eq!(game.state.player(P2).mindbugs, 1);
    assert_eq!(game.state.turn_player, P1);
    assert_eq!(game.state.phase, Phase::P1Main);
    assert_eq!(game.get_legal_moves(), vec![Action::Play(0)]);
}

#[test]
fn test_mindbug_replay_waits_for_the_thiefs_choice() {
    let fly = creature("Brain Fly", 4)
        .with_trigger(Trigger::OnPlay)
        .with_effect(CardEffect::new(
            EffectVerb::Destroy,
            TargetSpec::group(TargetGroup::Enemies).with_select(TargetSelect::Choose(1)),
        ));
    let mut game = MindbugGameBuilder::new()
        .hand(P1, vec![Arc::new(fly), def("Spare", 1)])
        .board(P1, vec![def("Mouse", 1), def("Rat", 2)])
        .hand(P2, vec![def("Spare", 1)])
        .build(3);

    step_all(&mut game, &[Action::Play(0), Action::Mindbug]);
    assert_eq!(game.state.phase, Phase::ResolutionChoice);
    assert_eq!(game.active_player(), P2);
    assert_eq!(game.state.turn_player, P1);

    game.step(Action::Select { zone: Zone::Board, opponent: true, index: 0 }).unwrap();
    assert_eq!(names(&game.state.player(P1).board), vec!["Rat"]);
    assert_eq!(names(&game.state.player(P2).board), vec!["Brain Fly"]);
    assert_eq!(game.state.phase, Phase::P1Main);
    assert_eq!(game.active_player(), P1);
}

#[test]
fn test_silenced_on_play_does_nothing() {
    let bee = creature("Killer Bee", 5)
        .with_trigger(Trigger::OnPlay)
        .with_effect(CardEffect::damage(TargetSpec::group(TargetGroup::Opponent), 1));
    let weaver = creature("Deathweaver", 2)
        .with_trigger(Trigger::Passive)
        .with_effect(CardEffect::ban(TargetSpec::group(TargetGroup::Opponent), BanKind::OnPlayTrigger));
    let mut game = MindbugGameBuilder::new()
        .hand(P1, vec![Arc::new(bee), def("Spare", 1)])
        .board(P2, vec![Arc::new(weaver)])
        .hand(P2, vec![def("Spare", 1)])
        .mindbugs(P2, 0)
        .build(3);

    game.step(Action::Play(0)).unwrap();
    assert_eq!(game.state.player(P2).hp, 3);
    assert_eq!(names(&game.state.player(P1).board), vec!["Killer Bee"]);
    assert_eq!(game.state.phase, Phase::P2Main);
}

#[test]
fn test_attack_ban_removes_attacker_from_moves() {
    let bear = creature("Bee Bear", 8)
        .with_trigger(Trigger::Passive)
        .with_effect(CardEffect::ban(TargetSpec::group(TargetGroup::Enemies), BanKind::Attack));
    let game = MindbugGameBuilder::new()
        .board(P1, vec![def("Mouse", 1)])
        .hand(P1, vec![def("Spare", 1)])
        .board(P2, vec![Arc::new(bear)])
        .hand(P2, vec![def("Spare", 1)])
        .build(3);

    assert_eq!(game.get_legal_moves(), vec![Action::Play(0)]);
}

// =============================================================================
// Whole games
// =============================================================================

fn random_game(seed: u64, max_steps: usize) -> MindbugGame {
    let mut game = MindbugGame::new(seed).unwrap();
    let mut chooser = GameRng::new(seed ^ 0xA5A5);
    let total = game.state.all_card_ids().count();

    for _ in 0..max_steps {
        let legal = game.get_legal_moves();
        if legal.is_empty() {
            assert!(game.is_over(), "no moves but no winner in {:?}", game.state.phase);
            break;
        }
        let action = *chooser.choose(&legal).unwrap();
        game.step(action)
            .unwrap_or_else(|err| panic!("legal {action} rejected: {err}"));

        assert_eq!(game.state.all_card_ids().count(), total);
        for player in PlayerId::both() {
            assert!(game.state.player(player).hp >= 0);
        }
    }
    game
}

#[test]
fn test_random_games_stay_consistent() {
    for seed in 0..25 {
        random_game(seed, 3000);
    }
}

#[test]
fn test_same_seed_same_game() {
    let a = random_game(77, 400);
    let b = random_game(77, 400);
    assert_eq!(a.state.to_bytes().unwrap(), b.state.to_bytes().unwrap());
    assert_eq!(a.state.history.len(), b.state.history.len());
}

#[test]
fn test_step_parts_accepts_wire_names() {
    let mut game = MindbugGameBuilder::new()
        .hand(P1, vec![def("A", 2)])
        .hand(P2, vec![def("B", 3)])
        .build(1);
    game.step_parts("PLAY", 0).unwrap();
    game.step_parts("PASS", -1).unwrap();
    assert_eq!(game.state.player(P1).board.len(), 1);
}
