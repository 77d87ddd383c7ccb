use super::*;
use blitz_core::{Side, Square};

fn sq(rank: i8, file: i8) -> Square {
    Square::new(rank, file).unwrap()
}

#[test]
fn random_engine_returns_legal_move() {
    let mut engine = RandomEngine::seeded(7);
    let state = GameState::initial();

    let choice = engine.choose(&state).unwrap();

    let legal: Vec<Choice> = state.legal_moves().into_iter().map(Choice::from).collect();
    assert!(legal.contains(&choice));
}

#[test]
fn random_engine_handles_no_moves() {
    let mut engine = RandomEngine::seeded(7);
    // a lone black king, white to move with nothing on the board
    let state = GameState::from_placement("4k3/8/8/8/8/8/8/8", Side::White).unwrap();

    assert!(engine.choose(&state).is_none());
    assert!(engine.choose(&state).is_none());
}

#[test]
fn full_bias_always_captures() {
    // the rook can take the knight on a5 or wander the open board
    let state = GameState::from_placement("4k3/8/8/n7/8/8/8/R3K3", Side::White).unwrap();
    let mut engine = RandomEngine::seeded(1).with_capture_bias(1.0);

    for _ in 0..50 {
        let choice = engine.choose(&state).unwrap();
        assert_eq!((choice.from, choice.to), (sq(0, 0), sq(4, 0)));
    }
}

#[test]
fn zero_bias_still_picks_from_all_moves() {
    let state = GameState::from_placement("4k3/8/8/n7/8/8/8/R3K3", Side::White).unwrap();
    let moves = state.legal_moves();
    let mut rng = StdRng::seed_from_u64(3);

    let mut quiet = 0;
    for _ in 0..200 {
        let picked = pick_capture_biased(&moves, 0.0, &mut rng).unwrap();
        assert!(moves.contains(&picked));
        if !picked.is_capture() {
            quiet += 1;
        }
    }
    assert!(quiet > 150, "one capture among many moves is rarely drawn uniformly");
}

#[test]
fn default_bias_prefers_captures() {
    let state = GameState::from_placement("4k3/8/8/n7/8/8/8/R3K3", Side::White).unwrap();
    let moves = state.legal_moves();
    let mut rng = StdRng::seed_from_u64(11);

    let captures = (0..1000)
        .filter(|_| {
            pick_capture_biased(&moves, DEFAULT_CAPTURE_BIAS, &mut rng)
                .unwrap()
                .is_capture()
        })
        .count();
    // 0.6 from the bias plus a small uniform share
    assert!((500..750).contains(&captures), "captures = {captures}");
}

#[test]
fn empty_move_list_yields_none() {
    let mut rng = StdRng::seed_from_u64(0);
    assert!(pick_capture_biased(&[], 1.0, &mut rng).is_none());
}

#[test]
fn seeded_engines_agree() {
    let state = GameState::initial();
    let mut a = RandomEngine::seeded(42);
    let mut b = RandomEngine::seeded(42);
    for _ in 0..10 {
        assert_eq!(a.choose(&state), b.choose(&state));
    }
}

#[test]
fn name_can_be_relabelled() {
    let engine = RandomEngine::new().with_name("Aggressive");
    assert_eq!(engine.name(), "Aggressive");
    assert_eq!(engine.capture_bias(), DEFAULT_CAPTURE_BIAS);
}
