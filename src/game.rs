use std::fmt;

use chrono::prelude::*;

use crate::attacks::is_in_check;
use crate::board::*;
use crate::movegen::*;
use crate::rules::RuleSet;
use crate::special::*;
use crate::types::*;

/// How a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    KingCaptured { winner: Color },
    Checkmate { winner: Color },
    TimeExpired { loser: Color },
}

impl Outcome {
    pub fn winner(&self) -> Color {
        match *self {
            Outcome::KingCaptured { winner } | Outcome::Checkmate { winner } => winner,
            Outcome::TimeExpired { loser } => loser.other_color(),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::KingCaptured { winner } => write!(
                f,
                "the {} king was captured, {} wins",
                winner.other_color(),
                winner
            ),
            Outcome::Checkmate { winner } => write!(f, "checkmate, {} wins", winner),
            Outcome::TimeExpired { loser } => write!(
                f,
                "{}'s time has run out, {} wins",
                loser,
                loser.other_color()
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    ToMove(Color),
    GameOver(Outcome),
}

/// A piece picked up by the input layer, together with where it was picked up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub piece: Piece,
    pub from: Position,
}

/// A move that was played
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub piece: Piece,
    pub from: Position,
    pub to: Position,
    pub kind: MoveKind,
    pub captured: Option<Piece>,
}

impl MoveRecord {
    pub fn to_human(&self) -> String {
        if let MoveKind::Castle(side) = self.kind {
            let side = match side {
                CastleSide::Kingside => "kingside",
                CastleSide::Queenside => "queenside",
            };
            return format!("{} castles {}", self.piece.color, side);
        }
        let maybe_capture_str = match self.captured {
            Some(p) => format!(" capturing {}", p.to_human()),
            None => "".to_string(),
        };
        format!(
            "{} moves {} from {} to {}{}",
            self.piece.color,
            self.piece.piece_type.to_human(),
            self.from,
            self.to,
            maybe_capture_str
        )
    }

    pub fn to_algebraic(&self) -> String {
        match self.kind {
            MoveKind::Castle(CastleSide::Kingside) => "O-O".to_string(),
            MoveKind::Castle(CastleSide::Queenside) => "O-O-O".to_string(),
            _ => format!(
                "{}{}{}{}",
                self.piece.piece_type.to_char(),
                self.from,
                if self.captured.is_some() { "x" } else { "" },
                self.to
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Applied(MoveRecord),
    /// The destination held a friendly piece; the selection is simply dropped
    Cancelled,
    Rejected(Rejection),
}

/// Turn order, move application and game-over detection for one game.
pub struct Game {
    board: Board,
    turn: Color,
    result: Option<Outcome>,
    castling: CastlingRights,
    en_passant: Option<EnPassantTarget>,
    rules: RuleSet,
    moves: Vec<MoveRecord>,
    start_fen: String,
    start_turn: Color,
    game_start_time: DateTime<Local>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(RuleSet::default())
    }
}

impl Game {
    pub fn new(rules: RuleSet) -> Self {
        Game::from_board(Board::new(), Color::White, rules)
    }

    /// Start from an arbitrary set-up. Castling rights are granted to any king
    /// and rook still standing on their home squares.
    pub fn from_board(board: Board, turn: Color, rules: RuleSet) -> Self {
        let castling = rights_from_board(&board);
        Self {
            start_fen: board.to_fen(),
            start_turn: turn,
            board,
            turn,
            result: None,
            castling,
            en_passant: None,
            rules,
            moves: Vec::new(),
            game_start_time: Local::now(),
        }
    }

    /// Back to the starting position with white to move, keeping the rule set
    pub fn reset(&mut self) {
        tracing::info!("game reset");
        *self = Game::new(self.rules);
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn castling_rights(&self) -> &CastlingRights {
        &self.castling
    }

    pub fn en_passant_target(&self) -> Option<EnPassantTarget> {
        self.en_passant
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.moves
    }

    pub fn status(&self) -> GameStatus {
        match self.result {
            Some(outcome) => GameStatus::GameOver(outcome),
            None => GameStatus::ToMove(self.turn),
        }
    }

    pub fn is_over(&self) -> bool {
        self.result.is_some()
    }

    fn generator(&self) -> MoveGenerator<'_> {
        MoveGenerator::new(&self.board, &self.castling, self.en_passant, &self.rules)
    }

    /// Pick up the piece on `from`, if it belongs to the side to move
    pub fn select(&self, from: Position) -> Option<Selection> {
        if self.is_over() {
            return None;
        }
        self.board
            .piece_at(from)
            .filter(|piece| piece.color == self.turn)
            .map(|piece| Selection { piece, from })
    }

    /// Squares to highlight for the piece on `from`; exactly the moves `request_move` accepts
    pub fn possible_moves(&self, from: Position) -> Vec<Position> {
        if self.select(from).is_none() {
            return Vec::new();
        }
        self.generator().destinations(from)
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        is_in_check(&self.board, color, &self.rules)
    }

    /// Is the side to move checkmated in the current position?
    pub fn is_checkmate(&self) -> bool {
        self.generator().is_checkmate(self.turn)
    }

    /// Select and move in one step
    pub fn play(&mut self, from: Position, to: Position) -> MoveOutcome {
        if self.is_over() {
            return MoveOutcome::Rejected(Rejection::GameOver);
        }
        match self.board.piece_at(from) {
            None => MoveOutcome::Rejected(Rejection::EmptySquare),
            Some(piece) => self.request_move(&Selection { piece, from }, to),
        }
    }

    pub fn request_move(&mut self, selection: &Selection, to: Position) -> MoveOutcome {
        match self.try_move(selection, to) {
            Ok(record) => MoveOutcome::Applied(record),
            Err(Rejection::FriendlyDestination) => {
                tracing::debug!(from = %selection.from, %to, "selection cancelled");
                MoveOutcome::Cancelled
            }
            Err(rejection) => {
                tracing::debug!(from = %selection.from, %to, %rejection, "move rejected");
                MoveOutcome::Rejected(rejection)
            }
        }
    }

    fn try_move(&mut self, selection: &Selection, to: Position) -> Result<MoveRecord, Rejection> {
        if self.is_over() {
            return Err(Rejection::GameOver);
        }
        if selection.piece.color != self.turn {
            return Err(Rejection::WrongSide);
        }
        if self.board.piece_at(selection.from) != Some(selection.piece) {
            return Err(Rejection::StaleSelection);
        }

        let planned = self.generator().validate(selection.from, to)?;

        let captured = planned.apply(&mut self.board);
        self.castling.update(planned.from, planned.to);
        self.en_passant = en_passant_after(planned.piece, planned.from, planned.to);

        let record = MoveRecord {
            piece: planned.piece,
            from: planned.from,
            to: planned.to,
            kind: planned.kind,
            captured,
        };
        self.moves.push(record);
        tracing::trace!(mv = %record.to_algebraic(), "move applied");

        self.after_move();
        Ok(record)
    }

    /// King capture ends the game outright; otherwise the turn passes and the
    /// new side to move is tested for checkmate.
    fn after_move(&mut self) {
        let mover = self.turn;
        if self.board.find_king(Color::White).is_none() {
            self.finish(Outcome::KingCaptured {
                winner: Color::Black,
            });
            return;
        }
        if self.board.find_king(Color::Black).is_none() {
            self.finish(Outcome::KingCaptured {
                winner: Color::White,
            });
            return;
        }

        self.turn = mover.other_color();
        if self.is_checkmate() {
            self.finish(Outcome::Checkmate { winner: mover });
        }
    }

    /// The side's clock ran out. Ignored once the game is already over.
    pub fn on_time_expired(&mut self, side: Color) {
        if self.is_over() {
            return;
        }
        self.finish(Outcome::TimeExpired { loser: side });
    }

    fn finish(&mut self, outcome: Outcome) {
        tracing::info!(%outcome, "game over");
        self.result = Some(outcome);
    }

    /// PGN-like listing of the moves played so far
    pub fn transcript(&self) -> String {
        let mut pgn = String::new();
        pgn.push_str(&format!(
            "[Date \"{}\"]\n",
            self.game_start_time.format("%Y.%m.%d")
        ));
        pgn.push_str("[White \"white\"]\n");
        pgn.push_str("[Black \"black\"]\n");
        if self.start_fen != STARTING_POSITION_FEN || self.start_turn == Color::Black {
            let side = match self.start_turn {
                Color::White => 'w',
                Color::Black => 'b',
            };
            pgn.push_str(&format!("[FEN \"{} {}\"]\n", self.start_fen, side));
        }
        if let Some(outcome) = self.result {
            pgn.push_str(&format!("[Termination \"{}\"]\n", outcome));
        }
        pgn.push('\n');

        // half-moves are counted from white's first move, even when black started
        let skipped = usize::from(self.start_turn == Color::Black);
        for (i, m) in self.moves.iter().enumerate() {
            let ply = i + skipped;
            if ply % 2 == 0 {
                pgn.push_str(&format!("{}. ", ply / 2 + 1));
            } else if i == 0 {
                pgn.push_str("1... ");
            }
            pgn.push_str(&m.to_algebraic());
            pgn.push(' ');
        }
        pgn.trim_end().to_string()
    }
}

/// Rights implied by which kings and rooks still stand on their home squares
fn rights_from_board(board: &Board) -> CastlingRights {
    let side = |color: Color| {
        let row = color.back_row();
        let missing = |col: i8, piece_type: PieceType| {
            board.piece_at(Position::new(row, col)) != Some(Piece::new(color, piece_type))
        };
        SideRights {
            king_moved: missing(4, PieceType::King),
            rook_a_moved: missing(0, PieceType::Rook),
            rook_h_moved: missing(7, PieceType::Rook),
        }
    };
    CastlingRights {
        white: side(Color::White),
        black: side(Color::Black),
    }
}
