use super::*;
use crate::fen;
use crate::types::{Color, MoveKind, Piece, Square};

// Runs a policy the way the drivers do: decide per move after pushing it,
// with the board in the post-move state.
fn explored_moves(fen_str: &str, policy: &dyn Exploration) -> Vec<String> {
    let mut b = fen::new_board(fen_str).unwrap();
    let (_, predicate) = policy.exploration(&b);

    let mut out = Vec::new();
    for m in b.position().pseudo_legal_moves(b.turn()) {
        if b.push(m).is_err() {
            continue;
        }
        if predicate(&b, m) {
            out.push(m.to_string());
        }
        b.pop();
    }
    out.sort();
    out
}

#[test]
fn test_full_explores_everything() {
    let mut b = fen::initial_board();
    let (_, predicate) = Full.exploration(&b);
    for m in b.position().pseudo_legal_moves(b.turn()) {
        if b.push(m).is_err() {
            continue;
        }
        assert!(predicate(&b, m));
        b.pop();
    }
}

#[test]
fn test_no_moves_explores_nothing() {
    assert!(explored_moves(fen::INITIAL, &NoMoves).is_empty());
}

#[test]
fn test_quick_gain_takes_winning_and_undefended_captures() {
    // The white pawn may take a defended knight (winning) and the rook an
    // undefended one; the rook must not chase the defended knight.
    //
    // d5 knight: defended by the e6 pawn, attackable by pawn (win) and rook.
    // h5 knight: undefended, attackable by the h1 rook.
    let fen_str = "k7/8/4p3/3n3n/2P5/8/8/K2R3R w - - 0 1";
    let explored = explored_moves(fen_str, &QuickGain);
    assert!(explored.contains(&"c4d5".to_string()), "pawn takes knight");
    assert!(explored.contains(&"h1h5".to_string()), "rook takes loose piece");
    assert!(
        !explored.contains(&"d1d5".to_string()),
        "rook must not take the defended knight"
    );
}

#[test]
fn test_quick_gain_explores_promotions() {
    let explored = explored_moves("4k3/8/8/8/8/8/p7/2K5 b - - 0 1", &QuickGain);
    assert!(explored.contains(&"a2a1q".to_string()));
    assert!(explored.contains(&"a2a1n".to_string()));
}

#[test]
fn test_considerable_recapture() {
    // After white takes on d5, any black recapture on d5 is considerable.
    let mut b = fen::new_board("k7/8/4p3/3p4/8/8/3R4/K7 w - - 0 1").unwrap();
    let take = b
        .position()
        .pseudo_legal_moves(Color::White)
        .into_iter()
        .find(|m| m.to == Square::D5 && m.kind == MoveKind::Capture)
        .unwrap();
    b.push(take).unwrap();

    let (_, predicate) = Considerable.exploration(&b);
    let recapture = b
        .position()
        .pseudo_legal_moves(Color::Black)
        .into_iter()
        .find(|m| m.to == Square::D5 && m.kind == MoveKind::Capture)
        .unwrap();
    b.push(recapture).unwrap();
    assert!(predicate(&b, recapture), "recapture on the last-move square");
    b.pop();
}

#[test]
fn test_considerable_higher_value_capture() {
    // A pawn takes a rook: always considerable, defended or not.
    let explored = explored_moves("k7/8/8/3r4/2P5/8/8/K7 w - - 0 1", &Considerable);
    assert!(explored.contains(&"c4d5".to_string()));
}

#[test]
fn test_considerable_ignores_quiet_moves() {
    let explored = explored_moves(fen::INITIAL, &Considerable);
    assert!(explored.is_empty());
}

#[test]
fn test_selection_ranks_and_picks() {
    let a = Move {
        kind: MoveKind::Normal,
        from: Square::E2,
        to: Square::E3,
        piece: Piece::Pawn,
        ..Move::null()
    };
    let b = Move {
        kind: MoveKind::Normal,
        from: Square::G1,
        to: Square::F3,
        piece: Piece::Knight,
        ..Move::null()
    };
    let c = Move {
        kind: MoveKind::Normal,
        from: Square::B1,
        to: Square::C3,
        piece: Piece::Knight,
        ..Move::null()
    };

    let (priority, pick) = selection(&[a, b]);
    assert!(priority(a) > priority(b), "earlier entries rank higher");
    assert_eq!(priority(c), 0);

    let board = fen::initial_board();
    assert!(pick(&board, a));
    assert!(pick(&board, b));
    assert!(!pick(&board, c), "moves off the list are not explored");
}

#[test]
fn test_plausible_wraps_a_rule_set() {
    // A rule set that nominates only knight moves.
    let policy = Plausible {
        moves: |b: &Board| {
            b.position()
                .pseudo_legal_moves(b.turn())
                .into_iter()
                .filter(|m| m.piece == Piece::Knight)
                .collect::<Vec<Move>>()
        },
    };

    let explored = explored_moves(fen::INITIAL, &policy);
    assert_eq!(explored.len(), 4);
    assert!(explored.iter().all(|m| {
        m.starts_with("b1") || m.starts_with("g1")
    }));
}