use super::*;

#[test]
fn test_decode_initial() {
    let (pos, turn, noprogress, fullmoves) = decode(INITIAL).unwrap();
    assert_eq!(turn, Color::White);
    assert_eq!(noprogress, 0);
    assert_eq!(fullmoves, 1);
    assert_eq!(pos.castling(), Castling::ALL);
    assert_eq!(pos.en_passant(), None);

    assert_eq!(pos.square(Square::E1), Some((Color::White, Piece::King)));
    assert_eq!(pos.square(Square::D8), Some((Color::Black, Piece::Queen)));
    assert_eq!(pos.square(Square::A2), Some((Color::White, Piece::Pawn)));
    assert!(pos.is_empty(Square::E4));
    assert_eq!(pos.all(Color::White).pop_count(), 16);
    assert_eq!(pos.all(Color::Black).pop_count(), 16);
}

#[test]
fn test_decode_counters_optional() {
    let (_, turn, noprogress, fullmoves) =
        decode("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -").unwrap();
    assert_eq!(turn, Color::White);
    assert_eq!(noprogress, 0);
    assert_eq!(fullmoves, 1);
}

#[test]
fn test_decode_en_passant() {
    let (pos, turn, _, _) =
        decode("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1").unwrap();
    assert_eq!(turn, Color::Black);
    assert_eq!(pos.en_passant(), Some(Square::E3));
}

#[test]
fn test_decode_rejects_malformed() {
    assert!(decode("").is_err());
    assert!(decode("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1").is_err());
    assert!(decode("rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").is_err());
    assert!(decode("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1").is_err());
    assert!(decode("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KXkq - 0 1").is_err());
    assert!(decode("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e5 0 1").is_err());
    // Two kings required.
    assert!(decode("8/8/8/8/8/8/8/K7 w - - 0 1").is_err());
}

#[test]
fn test_encode_roundtrip() {
    let fens = [
        INITIAL,
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "k7/7R/6R1/8/8/8/8/7K w - - 0 1",
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 12 34",
    ];
    for fen in fens {
        let b = new_board(fen).unwrap();
        assert_eq!(encode(&b), fen);
    }
}

#[test]
fn test_key_takes_four_fields() {
    assert_eq!(
        key(INITIAL),
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -"
    );
    assert_eq!(key("abc w - - 7 40"), "abc w - -");
}

#[test]
fn test_initial_board() {
    let b = initial_board();
    assert_eq!(b.turn(), Color::White);
    assert_eq!(encode(&b), INITIAL);
}
