//! Graded material evaluation.

use relic_core::{Board, Color, Evaluator, Pawns, Piece};

/// Material balance with conventional graded weights, from the side to
/// move's perspective. Unlike the core's nominal scale, knights and
/// bishops are distinguished so the engine prefers keeping the bishop
/// pair.
#[derive(Clone, Copy, Debug, Default)]
pub struct GradedMaterial;

impl Evaluator for GradedMaterial {
    fn evaluate(&self, b: &Board) -> Pawns {
        let pos = b.position();

        let mut score = 0.0;
        for color in Color::ALL {
            let sign = if color == b.turn() { 1.0 } else { -1.0 };
            for piece in Piece::ALL {
                score += sign * pos.piece(color, piece).pop_count() as Pawns * piece_value(piece);
            }
        }
        score
    }
}

/// The graded value of a piece in pawns.
#[inline]
pub fn piece_value(piece: Piece) -> Pawns {
    match piece {
        Piece::Pawn => 1.0,
        Piece::Knight => 3.2,
        Piece::Bishop => 3.3,
        Piece::Rook => 5.0,
        Piece::Queen => 9.0,
        Piece::King | Piece::None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relic_core::fen;

    #[test]
    fn test_balanced_at_start() {
        assert_eq!(GradedMaterial.evaluate(&fen::initial_board()), 0.0);
    }

    #[test]
    fn test_bishop_outweighs_knight() {
        // White has a bishop for black's knight.
        let b = fen::new_board("4k3/8/2n5/8/8/3B4/8/4K3 w - - 0 1").unwrap();
        let score = GradedMaterial.evaluate(&b);
        assert!(score > 0.0 && score < 0.2);
    }

    #[test]
    fn test_sign_follows_side_to_move() {
        let w = fen::new_board("4k3/8/8/8/8/8/8/Q3K3 w - - 0 1").unwrap();
        let b = fen::new_board("4k3/8/8/8/8/8/8/Q3K3 b - - 0 1").unwrap();
        assert_eq!(GradedMaterial.evaluate(&w), 9.0);
        assert_eq!(GradedMaterial.evaluate(&b), -9.0);
    }
}
