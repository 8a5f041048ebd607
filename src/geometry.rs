//! Per-piece movement patterns.
//!
//! These answer "can this piece type get from A to B on this board" and
//! nothing else: whose turn it is, what sits on the destination (beyond the
//! pawn capture rule) and whether the king ends up attacked are all decided
//! by the caller.

use crate::board::Board;
use crate::rules::RuleSet;
use crate::types::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    /// The displacement is not one this piece type can make
    #[error("the piece cannot move that way")]
    PatternViolated,
    /// A sliding piece's path crosses an occupied square
    #[error("the path is blocked")]
    PathObstructed,
}

pub fn is_legal_geometry(
    piece: Piece,
    from: Position,
    to: Position,
    board: &Board,
    rules: &RuleSet,
) -> bool {
    check_geometry(piece, from, to, board, rules).is_ok()
}

pub fn check_geometry(
    piece: Piece,
    from: Position,
    to: Position,
    board: &Board,
    rules: &RuleSet,
) -> Result<(), GeometryError> {
    if from == to || !from.is_on_board() || !to.is_on_board() {
        return Err(GeometryError::PatternViolated);
    }

    let d_row = (to.row - from.row).abs();
    let d_col = (to.col - from.col).abs();

    let pattern_ok = match piece.piece_type {
        PieceType::Pawn => return pawn_geometry(piece.color, from, to, board, rules),
        PieceType::Rook => d_row == 0 || d_col == 0,
        PieceType::Bishop => d_row == d_col,
        PieceType::Queen => d_row == 0 || d_col == 0 || d_row == d_col,
        PieceType::King => d_row <= 1 && d_col <= 1,
        PieceType::Knight => (d_row == 2 && d_col == 1) || (d_row == 1 && d_col == 2),
    };

    if !pattern_ok {
        return Err(GeometryError::PatternViolated);
    }
    if piece.piece_type.is_sliding() && is_obstructed(from, to, board) {
        return Err(GeometryError::PathObstructed);
    }
    Ok(())
}

fn pawn_geometry(
    color: Color,
    from: Position,
    to: Position,
    board: &Board,
    rules: &RuleSet,
) -> Result<(), GeometryError> {
    let forward = color.forward();
    let d_row = to.row - from.row;
    let d_col = (to.col - from.col).abs();

    // single push
    if d_row == forward && d_col == 0 {
        return if board.is_empty_at(to) {
            Ok(())
        } else {
            Err(GeometryError::PathObstructed)
        };
    }

    // double push from the start row
    if d_row == 2 * forward && d_col == 0 && from.row == color.pawn_start_row() {
        let skipped = from.offset(forward, 0);
        if rules.guard_pawn_double_step && !board.is_empty_at(skipped) {
            return Err(GeometryError::PathObstructed);
        }
        return if board.is_empty_at(to) {
            Ok(())
        } else {
            Err(GeometryError::PathObstructed)
        };
    }

    // diagonal capture, never onto an empty square (en passant is handled elsewhere)
    if d_row == forward && d_col == 1 {
        return match board.piece_at(to) {
            Some(target) if target.color != color => Ok(()),
            _ => Err(GeometryError::PatternViolated),
        };
    }

    Err(GeometryError::PatternViolated)
}

/// Is any square strictly between `from` and `to` occupied?
///
/// Walks the unit step from `from` toward `to`, so it only makes sense for
/// straight or diagonal lines. Squares off the board never obstruct.
pub fn is_obstructed(from: Position, to: Position, board: &Board) -> bool {
    if !from.is_on_board() || !to.is_on_board() {
        return false;
    }
    let step_row = (to.row - from.row).signum();
    let step_col = (to.col - from.col).signum();

    let mut current = from.offset(step_row, step_col);
    while current != to && current.is_on_board() {
        if !board.is_empty_at(current) {
            return true;
        }
        current = current.offset(step_row, step_col);
    }
    false
}
