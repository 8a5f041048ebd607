use crate::attacks::is_in_check;
use crate::board::Board;
use crate::geometry::{check_geometry, GeometryError};
use crate::rules::RuleSet;
use crate::special::*;
use crate::types::*;

/// Why a requested move was not played. None of these are fatal: the
/// selection is dropped and the board is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("the game is over")]
    GameOver,

    #[error("there is no piece on the origin square")]
    EmptySquare,

    #[error("that piece does not belong to the side to move")]
    WrongSide,

    #[error("the selected piece is no longer on its square")]
    StaleSelection,

    #[error("the destination holds a friendly piece")]
    FriendlyDestination,

    #[error("the piece cannot move that way")]
    PatternViolated,

    #[error("the path is blocked")]
    PathObstructed,

    #[error("castling is not available")]
    CastlingUnavailable,

    #[error("en passant is not available")]
    EnPassantUnavailable,

    #[error("the move would leave the king in check")]
    LeavesKingInCheck,
}

impl From<GeometryError> for Rejection {
    fn from(err: GeometryError) -> Self {
        match err {
            GeometryError::PatternViolated => Rejection::PatternViolated,
            GeometryError::PathObstructed => Rejection::PathObstructed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    Quiet,
    Capture,
    DoubleStep,
    /// Captures the pawn standing on `captured_at`, beside the origin
    EnPassant { captured_at: Position },
    Castle(CastleSide),
}

/// A validated move, ready to be applied to the board it was validated on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedMove {
    pub piece: Piece,
    pub from: Position,
    pub to: Position,
    pub kind: MoveKind,
}

impl PlannedMove {
    /// Write the move onto `board`. Returns the captured piece, if any.
    pub fn apply(&self, board: &mut Board) -> Option<Piece> {
        match self.kind {
            MoveKind::Castle(side) => {
                execute_castle(board, self.from, self.to, side);
                None
            }
            MoveKind::EnPassant { captured_at } => {
                let captured = board.piece_at(captured_at);
                board.move_piece(self.from, self.to);
                board.place(captured_at, None);
                captured
            }
            MoveKind::Quiet | MoveKind::Capture | MoveKind::DoubleStep => {
                let captured = board.piece_at(self.to);
                board.move_piece(self.from, self.to);
                captured
            }
        }
    }
}

/// Validates and enumerates moves for one position.
///
/// Everything here works off borrowed state; trial moves are made on clones
/// of the board so the position being examined is never touched.
pub struct MoveGenerator<'a> {
    board: &'a Board,
    castling: &'a CastlingRights,
    en_passant: Option<EnPassantTarget>,
    rules: &'a RuleSet,
}

impl<'a> MoveGenerator<'a> {
    pub fn new(
        board: &'a Board,
        castling: &'a CastlingRights,
        en_passant: Option<EnPassantTarget>,
        rules: &'a RuleSet,
    ) -> Self {
        Self {
            board,
            castling,
            en_passant,
            rules,
        }
    }

    /// Check a move of whatever stands on `from`. Turn order is the caller's concern.
    pub fn validate(&self, from: Position, to: Position) -> Result<PlannedMove, Rejection> {
        let piece = self.board.piece_at(from).ok_or(Rejection::EmptySquare)?;
        if !to.is_on_board() || from == to {
            return Err(Rejection::PatternViolated);
        }
        if self.board.piece_at(to).is_some_and(|p| p.color == piece.color) {
            return Err(Rejection::FriendlyDestination);
        }

        let kind = self.classify(piece, from, to)?;
        let planned = PlannedMove {
            piece,
            from,
            to,
            kind,
        };

        if self.rules.forbid_self_check && self.leaves_king_in_check(&planned) {
            return Err(Rejection::LeavesKingInCheck);
        }
        Ok(planned)
    }

    fn classify(&self, piece: Piece, from: Position, to: Position) -> Result<MoveKind, Rejection> {
        if let Some(side) = castle_side(piece, from, to) {
            return if can_castle(piece.color, from, to, self.board, self.castling, self.rules) {
                Ok(MoveKind::Castle(side))
            } else {
                Err(Rejection::CastlingUnavailable)
            };
        }

        if let Some(captured_at) = en_passant_capture(piece, from, to, self.board, self.en_passant) {
            return Ok(MoveKind::EnPassant { captured_at });
        }

        if let Err(err) = check_geometry(piece, from, to, self.board, self.rules) {
            let diagonal_step = to.row - from.row == piece.color.forward()
                && (to.col - from.col).abs() == 1;
            if piece.piece_type == PieceType::Pawn && diagonal_step && self.board.is_empty_at(to) {
                return Err(Rejection::EnPassantUnavailable);
            }
            return Err(err.into());
        }

        Ok(if self.board.piece_at(to).is_some() {
            MoveKind::Capture
        } else if en_passant_after(piece, from, to).is_some() {
            MoveKind::DoubleStep
        } else {
            MoveKind::Quiet
        })
    }

    /// Would the mover's king be attacked once `planned` is on the board?
    pub fn leaves_king_in_check(&self, planned: &PlannedMove) -> bool {
        let mut trial = self.board.clone();
        planned.apply(&mut trial);
        is_in_check(&trial, planned.piece.color, self.rules)
    }

    /// Every square the piece on `from` may move to
    pub fn destinations(&self, from: Position) -> Vec<Position> {
        Position::all()
            .filter(|to| self.validate(from, *to).is_ok())
            .collect()
    }

    /// Every valid move for the pieces of `color`
    pub fn moves_for(&self, color: Color) -> Vec<PlannedMove> {
        self.board
            .pieces(color)
            .flat_map(|(from, _)| {
                Position::all().filter_map(move |to| self.validate(from, to).ok())
            })
            .collect()
    }

    /// Is `color` in check with no move that gets the king out of it?
    ///
    /// Every piece of the side is tried, each move on a scratch board.
    pub fn is_checkmate(&self, color: Color) -> bool {
        if !is_in_check(self.board, color, self.rules) {
            return false;
        }
        self.moves_for(color)
            .iter()
            .all(|planned| self.leaves_king_in_check(planned))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pos(s: &str) -> Position {
        Position::from_algebraic(s).unwrap()
    }

    struct Fixture {
        board: Board,
        castling: CastlingRights,
        en_passant: Option<EnPassantTarget>,
        rules: RuleSet,
    }

    impl Fixture {
        fn new(fen: &str, rules: RuleSet) -> Self {
            Self {
                board: Board::from_fen(fen).unwrap(),
                castling: CastlingRights::default(),
                en_passant: None,
                rules,
            }
        }

        fn generator(&self) -> MoveGenerator<'_> {
            MoveGenerator::new(&self.board, &self.castling, self.en_passant, &self.rules)
        }
    }

    #[test]
    fn count_moves_from_start_position() {
        let f = Fixture::new(crate::board::STARTING_POSITION_FEN, RuleSet::standard());
        assert_eq!(f.generator().moves_for(Color::White).len(), 20); // 8*2 pawn moves, 2*2 knight moves
        assert_eq!(f.generator().moves_for(Color::Black).len(), 20);
    }

    #[test]
    fn destinations_revalidate() {
        let f = Fixture::new(
            "r3k2r/pp1n1ppp/2p1pn2/3p4/1b1P4/2N1PN2/PPQ2PPP/R3KB1R",
            RuleSet::standard(),
        );
        let g = f.generator();
        for color in [Color::White, Color::Black] {
            for (from, piece) in f.board.pieces(color) {
                for to in g.destinations(from) {
                    let planned = g.validate(from, to).unwrap();
                    assert_eq!(planned.piece, piece);
                    assert_eq!(planned.to, to);
                }
            }
        }
    }

    #[test]
    fn friendly_destination_is_reported() {
        let f = Fixture::new(crate::board::STARTING_POSITION_FEN, RuleSet::standard());
        assert_eq!(
            f.generator().validate(pos("a1"), pos("a2")),
            Err(Rejection::FriendlyDestination)
        );
        assert_eq!(
            f.generator().validate(pos("e4"), pos("e5")),
            Err(Rejection::EmptySquare)
        );
    }

    #[test]
    fn rejection_reasons() {
        let f = Fixture::new("r3k3/8/8/8/8/8/8/R3K2R", RuleSet::standard());
        let g = f.generator();
        assert_eq!(g.validate(pos("a1"), pos("b2")), Err(Rejection::PatternViolated));
        assert_eq!(
            g.validate(pos("h1"), pos("h8")),
            Ok(PlannedMove {
                piece: Piece::new(Color::White, PieceType::Rook),
                from: pos("h1"),
                to: pos("h8"),
                kind: MoveKind::Quiet,
            })
        );
        assert_eq!(
            g.validate(pos("a1"), pos("a8")).map(|m| m.kind),
            Ok(MoveKind::Capture)
        );
        assert_eq!(
            g.validate(pos("e1"), pos("g1")).map(|m| m.kind),
            Ok(MoveKind::Castle(CastleSide::Kingside))
        );
        // the black rook on a8 is cut off from the first rank by the white rook on a1
        assert_eq!(
            g.validate(pos("e1"), pos("c1")).map(|m| m.kind),
            Ok(MoveKind::Castle(CastleSide::Queenside))
        );
    }

    #[test]
    fn obstructed_and_castling_rejections() {
        let f = Fixture::new("4k3/8/8/8/8/8/8/R2QK2R", RuleSet::standard());
        let g = f.generator();
        assert_eq!(g.validate(pos("a1"), pos("e1")), Err(Rejection::FriendlyDestination));
        assert_eq!(g.validate(pos("d1"), pos("a1")), Err(Rejection::FriendlyDestination));
        assert_eq!(g.validate(pos("a1"), pos("f1")), Err(Rejection::PathObstructed));
        assert_eq!(g.validate(pos("e1"), pos("c1")), Err(Rejection::CastlingUnavailable));
    }

    #[test]
    fn en_passant_rejection_without_target() {
        let f = Fixture::new("4k3/8/8/3pP3/8/8/8/4K3", RuleSet::standard());
        assert_eq!(
            f.generator().validate(pos("e5"), pos("d6")),
            Err(Rejection::EnPassantUnavailable)
        );
    }

    #[test]
    fn en_passant_apply_clears_captured_pawn() {
        let mut f = Fixture::new("4k3/8/8/3pP3/8/8/8/4K3", RuleSet::standard());
        f.en_passant = Some(EnPassantTarget {
            skipped: pos("d6"),
            pawn: pos("d5"),
        });
        let planned = f.generator().validate(pos("e5"), pos("d6")).unwrap();
        assert_eq!(planned.kind, MoveKind::EnPassant { captured_at: pos("d5") });

        let mut board = f.board.clone();
        let captured = planned.apply(&mut board);
        assert_eq!(captured, Some(Piece::new(Color::Black, PieceType::Pawn)));
        assert_eq!(board.to_fen(), "4k3/8/3P4/8/8/8/8/4K3");
    }

    #[test]
    fn pinned_piece_cannot_move_under_standard_rules() {
        // white bishop on e2 is pinned by the rook on e8
        let standard = Fixture::new("4r2k/8/8/8/8/8/4B3/4K3", RuleSet::standard());
        assert_eq!(
            standard.generator().validate(pos("e2"), pos("d3")),
            Err(Rejection::LeavesKingInCheck)
        );
        let legacy = Fixture::new("4r2k/8/8/8/8/8/4B3/4K3", RuleSet::legacy());
        assert!(legacy.generator().validate(pos("e2"), pos("d3")).is_ok());
    }

    #[test]
    fn king_cannot_step_into_attack_under_standard_rules() {
        let f = Fixture::new("3r3k/8/8/8/8/8/8/4K3", RuleSet::standard());
        assert_eq!(
            f.generator().validate(pos("e1"), pos("d1")),
            Err(Rejection::LeavesKingInCheck)
        );
        assert!(f.generator().validate(pos("e1"), pos("f1")).is_ok());
    }

    #[test]
    fn back_rank_mate() {
        // . . . . . . ♚ .
        // . . . . . ♟ ♟ ♟
        // . . . . . . . .
        // ...
        // ♖ . . . . . ♔ .
        let mut f = Fixture::new("R5k1/5ppp/8/8/8/8/8/6K1", RuleSet::standard());
        assert!(f.generator().is_checkmate(Color::Black));
        assert!(!f.generator().is_checkmate(Color::White));

        // a black rook able to capture on a8 removes the mate
        f = Fixture::new("R5k1/r4ppp/8/8/8/8/8/6K1", RuleSet::standard());
        assert!(!f.generator().is_checkmate(Color::Black));
    }

    #[test]
    fn mate_search_finds_blocks_by_other_pieces() {
        // the king has no flight squares, but the knight on c6 can block on e7
        let f = Fixture::new("3rkr2/3p1p2/2n5/8/8/8/8/4R1K1", RuleSet::standard());
        assert!(!f.generator().is_checkmate(Color::Black));
    }

    #[test]
    fn knight_check_is_only_mate_when_knights_attack() {
        // smothered mate: king h8 boxed in by its own pieces, white knight on f7
        let fen = "6rk/5Npp/8/8/8/8/8/6K1";
        assert!(Fixture::new(fen, RuleSet::standard()).generator().is_checkmate(Color::Black));
        assert!(!Fixture::new(fen, RuleSet::legacy()).generator().is_checkmate(Color::Black));
    }
}
