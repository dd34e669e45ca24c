//! Game-level behaviour through the public library API: startup phases,
//! order issuance and execution, card plays and truces.

use conquest::board::{Card, CardKind, GameState, Map, Order, PlayerId, TerritoryId};
use conquest::config::{CombatConfig, GameConfig};
use conquest::engine::{GameEngine, GamePhase};
use conquest::error::{GameError, OrderError};
use conquest::resolve::{
    execute, execute_round, is_valid, play_card, reset_truces, validate, validate_issue, CardTarget,
    CombatOutcome, CombatPolicy, Effect, ProbabilisticCombat,
};
use conquest::strategy::OrderRequest;
use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

const A: PlayerId = PlayerId(0);
const B: PlayerId = PlayerId(1);
const T1: TerritoryId = TerritoryId(0);
const T2: TerritoryId = TerritoryId(1);
const T3: TerritoryId = TerritoryId(2);

/// Kills every defender and loses nothing.
struct Overwhelm;

impl CombatPolicy for Overwhelm {
    fn resolve(&mut self, attackers: u32, _defenders: u32) -> CombatOutcome {
        CombatOutcome { attackers_left: attackers, defenders_left: 0 }
    }
}

/// T1(A) - T2(B) - T3(A), with the given army counts.
fn duel(armies: [u32; 3]) -> GameState {
    let mut map = Map::new("duel");
    for name in ["t1", "t2", "t3"] {
        map.add_territory(name);
    }
    map.connect(T1, T2).unwrap();
    map.connect(T2, T3).unwrap();
    let mut state = GameState::new(map);
    state.add_player("A");
    state.add_player("B");
    for (t, owner) in [(T1, A), (T2, B), (T3, A)] {
        state.add_owned_territory(owner, t).unwrap();
    }
    for (i, n) in armies.into_iter().enumerate() {
        state.map.territories[i].armies = n;
    }
    state
}

#[test]
fn startup_phase_scenario() {
    let mut engine = GameEngine::new(GameConfig { seed: 1, ..GameConfig::default() });
    engine.register_map(Map::classic());

    engine.process_command("loadmap classic").unwrap();
    assert_eq!(engine.phase(), GamePhase::MapLoaded);
    engine.process_command("validatemap").unwrap();
    assert_eq!(engine.phase(), GamePhase::MapValidated);

    let mut fresh = GameEngine::new(GameConfig::default());
    let cmd = fresh.process_command("validatemap").unwrap();
    assert_eq!(fresh.phase(), GamePhase::Start);
    assert_eq!(fresh.processor().rejected().len(), 1);
    assert_eq!(cmd.sequence(), 1);
}

#[test]
fn every_command_is_recorded_in_order() {
    let mut engine = GameEngine::new(GameConfig::default());
    engine.register_map(Map::classic());
    for line in ["validatemap", "nonsense", "loadmap classic", "replay"] {
        engine.process_command(line).unwrap();
    }
    let seqs: Vec<u64> = engine.processor().commands().iter().map(|c| c.sequence()).collect();
    assert_eq!(seqs, vec![1, 2, 3, 4]);
    assert!(engine.processor().commands().iter().all(|c| c.effect().is_some()));
    assert_eq!(engine.processor().validated().len(), 2);
    assert_eq!(engine.phase(), GamePhase::MapLoaded);
}

#[test]
fn advance_conquers_when_defenders_reach_zero() {
    let mut state = duel([5, 3, 1]);
    let order = Order::Advance { issuer: A, source: T1, target: T2, armies: 4 };
    let effect = execute(&order, &mut state, &mut Overwhelm).unwrap();

    assert!(matches!(effect, Effect::Conquered { previous_owner: Some(B), survivors: 4, .. }));
    assert!(state.map.territories[1].is_owned_by(A));
    assert_eq!(state.map.territories[0].armies, 1);
    assert_eq!(state.map.territories[1].armies, 4);
    assert!(state.players[0].owns(T2));
    assert!(!state.players[1].owns(T2));
    assert!(state.players[1].is_eliminated());
    // Empty deck: nothing to draw, the conquest still stands.
    assert_eq!(state.players[0].hand.len(), 0);
}

#[test]
fn conquest_draws_a_card() {
    let mut state = duel([5, 3, 1]);
    state.deck.put_back(Card::new(CardKind::Airlift));
    let order = Order::Advance { issuer: A, source: T1, target: T2, armies: 4 };
    execute(&order, &mut state, &mut Overwhelm).unwrap();
    assert_eq!(state.players[0].hand.count(CardKind::Airlift), 1);
    assert!(state.deck.is_empty());
}

#[test]
fn deploy_over_pool_is_refused_and_changes_nothing() {
    let mut state = duel([2, 2, 2]);
    state.players[0].add_reinforcements(10);
    let order = Order::Deploy { issuer: A, target: T1, armies: 12 };

    assert_eq!(
        validate_issue(&order, &state),
        Err(OrderError::InsufficientReinforcements { requested: 12, available: 10 })
    );
    assert!(!is_valid(&order, &state));
    assert_eq!(state.players[0].reinforcement_pool(), 10);
    assert_eq!(state.map.territories[0].armies, 2);

    // Queued straight onto the list, it is still skipped at execution.
    state.players[0].orders.add_order(order);
    let report = execute_round(&mut state, &mut Overwhelm);
    assert_eq!(report.executed(), 0);
    assert_eq!(state.players[0].reinforcement_pool(), 10);
    assert_eq!(state.map.territories[0].armies, 2);
}

#[test]
fn bomb_card_halves_enemy_territory() {
    let mut state = duel([1, 7, 1]);
    state.players[0].hand.add(Card::new(CardKind::Bomb));
    play_card(&mut state, A, 0, CardTarget::Territory(T2), 5).unwrap();
    assert!(state.players[0].hand.is_empty());

    let report = execute_round(&mut state, &mut Overwhelm);
    assert_eq!(report.executed(), 1);
    assert_eq!(state.map.territories[1].armies, 3);
    assert!(state.map.territories[1].is_owned_by(B));
}

#[test]
fn playing_a_missing_card_fails() {
    let mut state = duel([1, 1, 1]);
    assert!(matches!(
        play_card(&mut state, A, 0, CardTarget::None, 5),
        Err(GameError::IndexOutOfRange { index: 0, len: 0 })
    ));
}

#[test]
fn negotiate_blocks_attacks_both_ways_until_reset() {
    let mut state = duel([4, 4, 4]);
    execute(&Order::Negotiate { issuer: A, target: B }, &mut state, &mut Overwhelm).unwrap();

    let a_attacks = Order::Advance { issuer: A, source: T1, target: T2, armies: 2 };
    let b_attacks = Order::Advance { issuer: B, source: T2, target: T3, armies: 2 };
    let b_bombs = Order::Bomb { issuer: B, target: T1 };
    assert_eq!(validate(&a_attacks, &state), Err(OrderError::Truce(B)));
    assert_eq!(validate(&b_attacks, &state), Err(OrderError::Truce(A)));
    assert_eq!(validate(&b_bombs, &state), Err(OrderError::Truce(A)));

    reset_truces(&mut state);
    assert_eq!(validate(&a_attacks, &state), Ok(()));
    assert_eq!(validate(&b_attacks, &state), Ok(()));
}

#[test]
fn blockade_doubles_and_neutralises() {
    let mut state = duel([3, 1, 2]);
    let effect = execute(&Order::Blockade { issuer: A, target: T3 }, &mut state, &mut Overwhelm).unwrap();
    assert_eq!(effect, Effect::Blockaded { target: T3, armies: 4 });
    assert_eq!(state.map.territories[2].owning_player(), None);
    assert!(!state.players[0].owns(T3));

    // Neutral land can be taken back by anyone adjacent.
    let retake = Order::Advance { issuer: B, source: T2, target: T3, armies: 1 };
    assert!(validate(&retake, &state).is_ok());
}

#[test]
fn airlift_ignores_adjacency() {
    let mut state = duel([6, 1, 1]);
    let order = Order::Airlift { issuer: A, source: T1, target: T3, armies: 5 };
    execute(&order, &mut state, &mut Overwhelm).unwrap();
    assert_eq!(state.map.territories[0].armies, 1);
    assert_eq!(state.map.territories[2].armies, 6);
}

#[test]
fn engine_rounds_commit_and_spend_the_pool() {
    let mut engine = GameEngine::new(GameConfig { seed: 3, ..GameConfig::default() });
    engine.register_map(Map::classic());
    for line in ["loadmap classic", "validatemap", "addplayer A", "addplayer B", "gamestart"] {
        engine.process_command(line).unwrap();
    }
    engine.start_round().unwrap();
    let state = engine.state().unwrap();
    let pool = state.players[0].reinforcement_pool();
    let target = state.to_defend(A)[0];
    let before = state.map.territories[target.0].armies;

    engine.issue(A, OrderRequest::Deploy { target, armies: pool }).unwrap();
    assert!(engine.issue(A, OrderRequest::Deploy { target, armies: 1 }).is_err());
    assert_eq!(engine.state().unwrap().players[0].reinforcement_pool(), 0);

    let mut idle: Vec<Box<dyn conquest::strategy::PlayerStrategy>> = vec![
        Box::new(conquest::strategy::ScriptedStrategy::idle()),
        Box::new(conquest::strategy::ScriptedStrategy::idle()),
    ];
    engine.issue_orders(&mut idle).unwrap();
    assert_eq!(engine.phase(), GamePhase::ExecuteOrders);
    let (report, eliminated) = engine.execute_orders().unwrap();
    assert_eq!(report.executed(), 1);
    assert!(eliminated.is_empty());
    assert_eq!(engine.phase(), GamePhase::AssignReinforcement);
    assert_eq!(engine.state().unwrap().map.territories[target.0].armies, before + pool);
}

proptest! {
    #[test]
    fn friendly_advance_conserves_armies(src in 1u32..50, dst in 0u32..50, pick in 0u32..50) {
        let mut state = duel([src, 1, dst]);
        let armies = 1 + pick % src;
        let order = Order::Advance { issuer: A, source: T1, target: T3, armies };
        execute(&order, &mut state, &mut Overwhelm).unwrap();
        prop_assert_eq!(
            state.map.territories[0].armies + state.map.territories[2].armies,
            src + dst
        );
    }

    #[test]
    fn ownership_changes_only_on_conquest(
        attackers in 1u32..30,
        defenders in 0u32..30,
        seed in 1u64..1000,
    ) {
        let mut state = duel([attackers, defenders, 1]);
        let mut combat = ProbabilisticCombat::new(&CombatConfig::default(), SmallRng::seed_from_u64(seed));
        let order = Order::Advance { issuer: A, source: T1, target: T2, armies: attackers };
        let effect = execute(&order, &mut state, &mut combat).unwrap();

        let taken = state.map.territories[1].is_owned_by(A);
        prop_assert_eq!(taken, matches!(effect, Effect::Conquered { .. }));
        if !taken {
            prop_assert!(state.map.territories[1].armies > 0);
            prop_assert!(state.map.territories[1].armies <= defenders);
            prop_assert!(state.map.territories[0].armies <= attackers);
        }
    }

    #[test]
    fn issued_deploys_never_exceed_starting_pool(requests in prop::collection::vec(1u32..40, 1..12)) {
        let mut engine = GameEngine::new(GameConfig { seed: 8, ..GameConfig::default() });
        engine.register_map(Map::classic());
        for line in ["loadmap classic", "validatemap", "addplayer A", "addplayer B", "gamestart"] {
            engine.process_command(line).unwrap();
        }
        engine.start_round().unwrap();
        let starting = engine.state().unwrap().players[0].reinforcement_pool();
        let target = engine.state().unwrap().to_defend(A)[0];

        let mut issued = 0;
        for armies in requests {
            if engine.issue(A, OrderRequest::Deploy { target, armies }).is_ok() {
                issued += armies;
            }
        }
        prop_assert!(issued <= starting);
        prop_assert_eq!(
            engine.state().unwrap().players[0].reinforcement_pool(),
            starting - issued
        );
    }
}
