//! Castling and en passant: the two moves that touch more than the origin and
//! destination squares, plus the transient state they depend on.

use crate::attacks::is_square_attacked;
use crate::board::Board;
use crate::rules::RuleSet;
use crate::types::*;

const KING_HOME_COL: i8 = 4;
const ROOK_A_COL: i8 = 0;
const ROOK_H_COL: i8 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    fn rook_col(&self) -> i8 {
        match self {
            CastleSide::Kingside => ROOK_H_COL,
            CastleSide::Queenside => ROOK_A_COL,
        }
    }

    /// Column the rook lands on after castling
    fn rook_dest_col(&self) -> i8 {
        match self {
            CastleSide::Kingside => 5,
            CastleSide::Queenside => 3,
        }
    }
}

/// Which of a side's castling pieces have left home
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SideRights {
    pub king_moved: bool,
    pub rook_a_moved: bool,
    pub rook_h_moved: bool,
}

impl SideRights {
    pub fn can_castle(&self, side: CastleSide) -> bool {
        !self.king_moved
            && match side {
                CastleSide::Kingside => !self.rook_h_moved,
                CastleSide::Queenside => !self.rook_a_moved,
            }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CastlingRights {
    pub white: SideRights,
    pub black: SideRights,
}

impl CastlingRights {
    pub fn side(&self, color: Color) -> &SideRights {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    fn side_mut(&mut self, color: Color) -> &mut SideRights {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }

    /// Retire rights for every home square a move leaves or lands on.
    ///
    /// Leaving covers king and rook moves, landing covers a rook being
    /// captured at home.
    pub fn update(&mut self, from: Position, to: Position) {
        for square in [from, to] {
            for color in [Color::White, Color::Black] {
                if square.row != color.back_row() {
                    continue;
                }
                let rights = self.side_mut(color);
                match square.col {
                    KING_HOME_COL => rights.king_moved = true,
                    ROOK_A_COL => rights.rook_a_moved = true,
                    ROOK_H_COL => rights.rook_h_moved = true,
                    _ => {}
                }
            }
        }
    }
}

/// Left behind by a double pawn step, valid for the opponent's next move only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnPassantTarget {
    /// The square the pawn skipped over; a capturing pawn lands here
    pub skipped: Position,
    /// The square of the pawn that double-stepped; this is the one captured
    pub pawn: Position,
}

/// Target created by moving `piece` from `from` to `to`, if that move was a double pawn step
pub fn en_passant_after(piece: Piece, from: Position, to: Position) -> Option<EnPassantTarget> {
    let forward = piece.color.forward();
    if piece.piece_type == PieceType::Pawn && to.col == from.col && to.row - from.row == 2 * forward {
        Some(EnPassantTarget {
            skipped: from.offset(forward, 0),
            pawn: to,
        })
    } else {
        None
    }
}

/// If moving `piece` from `from` to `to` is an en passant capture, the square
/// of the pawn it takes.
///
/// The capturing pawn must stand on the same row as the double-stepped pawn,
/// one column away, and move diagonally forward onto the skipped square.
pub fn en_passant_capture(
    piece: Piece,
    from: Position,
    to: Position,
    board: &Board,
    target: Option<EnPassantTarget>,
) -> Option<Position> {
    let target = target?;
    if piece.piece_type != PieceType::Pawn {
        return None;
    }
    let victim = board.piece_at(target.pawn)?;
    let is_capture = from.row == target.pawn.row
        && (from.col - to.col).abs() == 1
        && to.row == target.pawn.row + piece.color.forward()
        && to.col == target.pawn.col
        && to == target.skipped
        && board.is_empty_at(to)
        && victim.color != piece.color
        && victim.piece_type == PieceType::Pawn;
    is_capture.then_some(target.pawn)
}

/// The castling side a king move from `from` to `to` asks for: same row, two columns.
pub fn castle_side(piece: Piece, from: Position, to: Position) -> Option<CastleSide> {
    if piece.piece_type != PieceType::King || from.row != to.row {
        return None;
    }
    match to.col - from.col {
        2 => Some(CastleSide::Kingside),
        -2 => Some(CastleSide::Queenside),
        _ => None,
    }
}

/// Whether the king of `color` on `from` may castle to `to`.
///
/// Requires unmoved king and rook (both tracked in `rights` and still on their
/// home squares), an empty path between them, and that the king neither
/// starts nor lands on an attacked square. The landing square is tested on a
/// copy of the board with the king already moved.
pub fn can_castle(
    color: Color,
    from: Position,
    to: Position,
    board: &Board,
    rights: &CastlingRights,
    rules: &RuleSet,
) -> bool {
    let king = Piece::new(color, PieceType::King);
    let Some(side) = castle_side(king, from, to) else {
        return false;
    };
    let row = color.back_row();
    if from != Position::new(row, KING_HOME_COL) || board.piece_at(from) != Some(king) {
        return false;
    }
    if !rights.side(color).can_castle(side) {
        return false;
    }

    let rook_pos = Position::new(row, side.rook_col());
    if board.piece_at(rook_pos) != Some(Piece::new(color, PieceType::Rook)) {
        return false;
    }

    let (low, high) = (from.col.min(rook_pos.col), from.col.max(rook_pos.col));
    if (low + 1..high).any(|col| !board.is_empty_at(Position::new(row, col))) {
        return false;
    }

    let opponent = color.other_color();
    if is_square_attacked(from, board, opponent, rules) {
        return false;
    }
    if rules.guard_castling_transit {
        let transit = Position::new(row, (from.col + to.col) / 2);
        if is_square_attacked(transit, board, opponent, rules) {
            return false;
        }
    }

    let mut after = board.clone();
    after.move_piece(from, to);
    !is_square_attacked(to, &after, opponent, rules)
}

/// Move the king, then the rook on the same side, without re-validating either
pub fn execute_castle(board: &mut Board, from: Position, to: Position, side: CastleSide) {
    board.move_piece(from, to);
    board.move_piece(
        Position::new(from.row, side.rook_col()),
        Position::new(from.row, side.rook_dest_col()),
    );
}
