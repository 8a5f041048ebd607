use once_cell::sync::Lazy;

use crate::types::*;

pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

static STARTING_BOARD: Lazy<Board> = Lazy::new(|| {
    let mut board = Board::empty();
    for color in [Color::White, Color::Black] {
        for (col, piece_type) in BACK_RANK.iter().enumerate() {
            let col = col as i8;
            board.place(Position::new(color.back_row(), col), Some(Piece::new(color, *piece_type)));
            board.place(
                Position::new(color.pawn_start_row(), col),
                Some(Piece::new(color, PieceType::Pawn)),
            );
        }
    }
    board
});

/// 8x8 grid of optional pieces, indexed `[row][col]`.
///
/// The board owns square contents and nothing else: turn, castling rights and
/// the en passant target live in [`crate::game::Game`]. Cloning yields a fully
/// independent copy, which is what look-ahead works on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Standard starting position
    pub fn new() -> Board {
        STARTING_BOARD.clone()
    }

    pub fn empty() -> Board {
        Board {
            squares: [[None; 8]; 8],
        }
    }

    /// Parse the piece placement field of a FEN string. Any further fields
    /// (side to move, castling, ...) are ignored.
    pub fn from_fen(fen_string: &str) -> Result<Board, ParseError> {
        let invalid = || ParseError::InvalidFen(fen_string.to_string());
        let placement = fen_string.split_whitespace().next().ok_or_else(invalid)?;

        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(invalid());
        }

        let mut board = Board::empty();
        for (i, rank) in ranks.iter().enumerate() {
            // first rank listed is rank 8
            let row = 7 - i as i8;
            let mut col: i8 = 0;
            for piece_char in rank.chars() {
                if let Some(skip) = piece_char.to_digit(10) {
                    col += skip as i8;
                    if col > 8 {
                        return Err(invalid());
                    }
                } else {
                    let piece = Piece::from_char(piece_char)?;
                    let pos = Position::new(row, col);
                    if !pos.is_on_board() {
                        return Err(invalid());
                    }
                    board.place(pos, Some(piece));
                    col += 1;
                }
            }
            if col != 8 {
                return Err(invalid());
            }
        }
        Ok(board)
    }

    pub fn to_fen(&self) -> String {
        let mut fen = String::new();
        for row in (0..8).rev() {
            let mut gap = 0;
            for col in 0..8 {
                match self.piece_at(Position::new(row, col)) {
                    Some(piece) => {
                        if gap > 0 {
                            fen.push_str(&gap.to_string());
                            gap = 0;
                        }
                        fen.push(piece.to_char());
                    }
                    None => gap += 1,
                }
            }
            if gap > 0 {
                fen.push_str(&gap.to_string());
            }
            if row > 0 {
                fen.push('/');
            }
        }
        fen
    }

    /// Piece on `pos`, `None` for empty squares and for positions off the board
    pub fn piece_at(&self, pos: Position) -> Option<Piece> {
        if !pos.is_on_board() {
            return None;
        }
        self.squares[pos.row as usize][pos.col as usize]
    }

    pub fn is_empty_at(&self, pos: Position) -> bool {
        self.piece_at(pos).is_none()
    }

    /// Overwrite the square unconditionally. Writes off the board are dropped.
    pub fn place(&mut self, pos: Position, piece: Option<Piece>) {
        if !pos.is_on_board() {
            tracing::warn!(square = ?pos, "ignoring write outside the board");
            return;
        }
        self.squares[pos.row as usize][pos.col as usize] = piece;
    }

    /// Transfer whatever is on `from` to `to`, leaving `from` empty
    pub fn move_piece(&mut self, from: Position, to: Position) {
        let piece = self.piece_at(from);
        self.place(to, piece);
        self.place(from, None);
    }

    /// Occupied squares of one side
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::all().filter_map(move |pos| {
            self.piece_at(pos)
                .filter(|piece| piece.color == color)
                .map(|piece| (pos, piece))
        })
    }

    pub fn find_king(&self, color: Color) -> Option<Position> {
        self.pieces(color)
            .find(|(_, piece)| piece.piece_type == PieceType::King)
            .map(|(pos, _)| pos)
    }

    /// Text diagram with rank 8 on top, `.` for empty squares
    pub fn draw_board(&self) -> String {
        let mut string = String::new();
        for row in (0..8).rev() {
            string.push_str(&format!("{} ", row + 1));
            for col in 0..8 {
                let symbol = match self.piece_at(Position::new(row, col)) {
                    Some(piece) => piece.to_symbol(),
                    None => '.',
                };
                string.push(' ');
                string.push(symbol);
            }
            string.push('\n');
        }
        string.push_str("   a b c d e f g h\n");
        string
    }
}
