//! Attack detection by ray casting outward from the target square.

use crate::board::Board;
use crate::rules::RuleSet;
use crate::types::*;

/// Orthogonal directions first, then diagonals
const DIRECTIONS: [(i8, i8); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

/// Is `square` attacked by any piece of `by_color`?
///
/// Each of the 8 rays is walked until the first occupied square. A piece of
/// `by_color` found there attacks if its type covers that direction at that
/// distance: rooks, bishops and queens at any distance along their lines,
/// kings at distance 1, pawns at distance 1 diagonally in their forward
/// direction. Knights are looked up separately when the rule set asks for it.
pub fn is_square_attacked(square: Position, board: &Board, by_color: Color, rules: &RuleSet) -> bool {
    if !square.is_on_board() {
        return false;
    }
    for (d_row, d_col) in DIRECTIONS {
        let mut current = square.offset(d_row, d_col);
        let mut distance = 1;
        while current.is_on_board() {
            if let Some(piece) = board.piece_at(current) {
                if piece.color == by_color && attacks_along(piece, d_row, d_col, distance) {
                    return true;
                }
                break;
            }
            current = current.offset(d_row, d_col);
            distance += 1;
        }
    }

    rules.detect_knight_attacks
        && KNIGHT_OFFSETS.iter().any(|(d_row, d_col)| {
            board.piece_at(square.offset(*d_row, *d_col))
                == Some(Piece::new(by_color, PieceType::Knight))
        })
}

/// Can `piece`, sitting `distance` steps away from the target in direction
/// (`d_row`, `d_col`) as seen from the target, reach the target?
fn attacks_along(piece: Piece, d_row: i8, d_col: i8, distance: i32) -> bool {
    let orthogonal = d_row == 0 || d_col == 0;
    match piece.piece_type {
        PieceType::Rook => orthogonal,
        PieceType::Bishop => !orthogonal,
        PieceType::Queen => true,
        PieceType::King => distance == 1,
        // the pawn sits one step behind the target, relative to its own forward direction
        PieceType::Pawn => distance == 1 && !orthogonal && d_row == -piece.color.forward(),
        PieceType::Knight => false,
    }
}

/// Is the king of `color` attacked? A side without a king is never in check.
pub fn is_in_check(board: &Board, color: Color, rules: &RuleSet) -> bool {
    board
        .find_king(color)
        .is_some_and(|king| is_square_attacked(king, board, color.other_color(), rules))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(s: &str) -> Position {
        Position::from_algebraic(s).unwrap()
    }

    #[test]
    fn rook_attacks_along_open_file() {
        // . . . . ♜ . . .
        // . . . . . . . .
        // . . . . ♔ . . .
        let b = Board::from_fen("4r3/8/8/8/8/8/8/4K3").unwrap();
        let rules = RuleSet::standard();
        assert!(is_square_attacked(pos("e1"), &b, Color::Black, &rules));
        assert!(is_in_check(&b, Color::White, &rules));
        assert!(!is_square_attacked(pos("d1"), &b, Color::Black, &rules));
    }

    #[test]
    fn blocked_ray_does_not_attack() {
        let b = Board::from_fen("4r3/8/8/8/4P3/8/8/4K3").unwrap();
        assert!(!is_in_check(&b, Color::White, &RuleSet::standard()));
    }

    #[test]
    fn own_piece_on_ray_is_not_an_attacker() {
        let b = Board::from_fen("4R3/8/8/8/8/8/8/4K3").unwrap();
        assert!(!is_square_attacked(pos("e1"), &b, Color::Black, &RuleSet::standard()));
    }

    #[test]
    fn bishop_attacks_diagonally_only() {
        let b = Board::from_fen("8/8/8/8/3b4/8/8/8").unwrap();
        let rules = RuleSet::standard();
        assert!(is_square_attacked(pos("a1"), &b, Color::Black, &rules));
        assert!(is_square_attacked(pos("h8"), &b, Color::Black, &rules));
        assert!(!is_square_attacked(pos("d1"), &b, Color::Black, &rules));
    }

    #[test]
    fn queen_attacks_both_ways() {
        let b = Board::from_fen("8/8/8/8/3q4/8/8/8").unwrap();
        let rules = RuleSet::standard();
        assert!(is_square_attacked(pos("d8"), &b, Color::Black, &rules));
        assert!(is_square_attacked(pos("g1"), &b, Color::Black, &rules));
        assert!(!is_square_attacked(pos("e6"), &b, Color::Black, &rules));
    }

    #[test]
    fn king_attacks_adjacent_squares_only() {
        let b = Board::from_fen("8/8/8/8/3k4/8/8/8").unwrap();
        let rules = RuleSet::standard();
        assert!(is_square_attacked(pos("e5"), &b, Color::Black, &rules));
        assert!(is_square_attacked(pos("c3"), &b, Color::Black, &rules));
        assert!(!is_square_attacked(pos("d6"), &b, Color::Black, &rules));
    }

    #[test]
    fn pawns_attack_forward_diagonals() {
        // white pawn on d4 attacks c5 and e5, black pawn on d5 attacks c4 and e4
        let b = Board::from_fen("8/8/8/3p4/3P4/8/8/8").unwrap();
        let rules = RuleSet::standard();
        assert!(is_square_attacked(pos("c5"), &b, Color::White, &rules));
        assert!(is_square_attacked(pos("e5"), &b, Color::White, &rules));
        assert!(!is_square_attacked(pos("c3"), &b, Color::White, &rules));
        assert!(!is_square_attacked(pos("d5"), &b, Color::White, &rules));

        assert!(is_square_attacked(pos("c4"), &b, Color::Black, &rules));
        assert!(is_square_attacked(pos("e4"), &b, Color::Black, &rules));
        assert!(!is_square_attacked(pos("e6"), &b, Color::Black, &rules));
    }

    #[test]
    fn knight_attacks_depend_on_rules() {
        // black knight on f3 checks the white king on e1
        let b = Board::from_fen("8/8/8/8/8/5n2/8/4K3").unwrap();
        assert!(is_in_check(&b, Color::White, &RuleSet::standard()));
        assert!(!is_in_check(&b, Color::White, &RuleSet::legacy()));
    }

    #[test]
    fn missing_king_is_not_in_check() {
        let b = Board::from_fen("4r3/8/8/8/8/8/8/8").unwrap();
        assert!(!is_in_check(&b, Color::White, &RuleSet::standard()));
    }

    #[test]
    fn starting_position_has_no_checks() {
        let b = Board::new();
        let rules = RuleSet::standard();
        assert!(!is_in_check(&b, Color::White, &rules));
        assert!(!is_in_check(&b, Color::Black, &rules));
        // the third rank is covered by white pawns and knights
        assert!(is_square_attacked(pos("c3"), &b, Color::White, &rules));
        assert!(!is_square_attacked(pos("e4"), &b, Color::White, &rules));
    }

    #[test]
    fn squares_off_the_board_are_never_attacked() {
        let b = Board::from_fen("8/8/8/8/8/8/8/Q6N").unwrap();
        let rules = RuleSet::standard();
        assert!(!is_square_attacked(Position::new(i8::MAX, 0), &b, Color::White, &rules));
        assert!(!is_square_attacked(Position::new(0, i8::MIN), &b, Color::White, &rules));
        assert!(!is_square_attacked(Position::new(-1, 0), &b, Color::White, &rules));
    }
}
