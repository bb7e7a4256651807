use super::*;
use crate::fen;

#[test]
fn test_material_balanced_at_start() {
    let b = fen::initial_board();
    assert_eq!(Material.evaluate(&b), 0.0);
}

#[test]
fn test_material_counts_for_side_to_move() {
    // White is up a rook for a bishop.
    let b = fen::new_board("4k3/8/8/8/8/2b5/8/R3K3 w - - 0 1").unwrap();
    assert_eq!(Material.evaluate(&b), 2.0);

    // Same position from black's point of view.
    let b = fen::new_board("4k3/8/8/8/8/2b5/8/R3K3 b - - 0 1").unwrap();
    assert_eq!(Material.evaluate(&b), -2.0);
}

#[test]
fn test_nominal_values() {
    assert_eq!(nominal_value(Piece::Pawn), 1.0);
    assert_eq!(nominal_value(Piece::Knight), 3.0);
    assert_eq!(nominal_value(Piece::Bishop), 3.0);
    assert_eq!(nominal_value(Piece::Rook), 5.0);
    assert_eq!(nominal_value(Piece::Queen), 9.0);
    assert_eq!(nominal_value(Piece::King), 100.0);
}

#[test]
fn test_nominal_gain() {
    let quiet = Move {
        kind: MoveKind::Normal,
        piece: Piece::Queen,
        ..Move::null()
    };
    assert_eq!(nominal_gain(quiet), 0.0);

    let capture = Move {
        kind: MoveKind::Capture,
        piece: Piece::Knight,
        capture: Piece::Rook,
        ..Move::null()
    };
    assert_eq!(nominal_gain(capture), 5.0);

    let ep = Move {
        kind: MoveKind::EnPassant,
        piece: Piece::Pawn,
        ..Move::null()
    };
    assert_eq!(nominal_gain(ep), 1.0);

    let promo = Move {
        kind: MoveKind::Promotion,
        piece: Piece::Pawn,
        promotion: Piece::Queen,
        ..Move::null()
    };
    assert_eq!(nominal_gain(promo), 8.0);

    let capture_promo = Move {
        kind: MoveKind::CapturePromotion,
        piece: Piece::Pawn,
        capture: Piece::Rook,
        promotion: Piece::Queen,
        ..Move::null()
    };
    assert_eq!(nominal_gain(capture_promo), 13.0);
}

#[test]
fn test_unit() {
    assert_eq!(unit(Color::White), 1.0);
    assert_eq!(unit(Color::Black), -1.0);
}

#[test]
fn test_noise_disabled_is_zero() {
    let b = fen::initial_board();
    let noise = Noise::none();
    for _ in 0..32 {
        assert_eq!(noise.evaluate(&b), 0.0);
    }
    assert_eq!(Noise::new(0, 7).evaluate(&b), 0.0);
}

#[test]
fn test_noise_within_limit() {
    let b = fen::initial_board();
    let noise = Noise::new(100, 1);
    for _ in 0..256 {
        let sample = noise.evaluate(&b);
        assert!((-0.05..=0.05).contains(&sample), "out of range: {sample}");
    }
}

#[test]
fn test_noise_deterministic_for_seed() {
    let b = fen::initial_board();
    let a = Noise::new(100, 42);
    let c = Noise::new(100, 42);
    let xs: Vec<Pawns> = (0..16).map(|_| a.evaluate(&b)).collect();
    let ys: Vec<Pawns> = (0..16).map(|_| c.evaluate(&b)).collect();
    assert_eq!(xs, ys);
    assert!(xs.iter().any(|&x| x != 0.0), "noise should vary");
}
