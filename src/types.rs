use std::fmt;

use itertools::iproduct;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid square notation: {0}")]
    InvalidSquare(String),

    #[error("invalid piece character: {0}")]
    InvalidPiece(char),

    #[error("invalid FEN placement: {0}")]
    InvalidFen(String),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn from_case(c: char) -> Color {
        if c.is_uppercase() {
            Color::White
        } else {
            Color::Black
        }
    }

    pub fn other_color(&self) -> Color {
        if *self == Color::White {
            Color::Black
        } else {
            Color::White
        }
    }

    /// Row delta of a single pawn step for this side
    pub fn forward(&self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Row from which pawns of this color may advance two squares
    pub fn pawn_start_row(&self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    pub fn back_row(&self) -> i8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    pub fn to_human(&self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_human())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum PieceType {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceType {
    pub fn from_char(c: char) -> Result<PieceType, ParseError> {
        match c.to_ascii_lowercase() {
            'p' => Ok(PieceType::Pawn),
            'r' => Ok(PieceType::Rook),
            'n' => Ok(PieceType::Knight),
            'b' => Ok(PieceType::Bishop),
            'q' => Ok(PieceType::Queen),
            'k' => Ok(PieceType::King),
            _ => Err(ParseError::InvalidPiece(c)),
        }
    }

    /// Is the piece a sliding piece (one which can move multiple square in a given direction)
    pub fn is_sliding(&self) -> bool {
        matches!(self, PieceType::Rook | PieceType::Bishop | PieceType::Queen)
    }

    pub fn to_human(&self) -> &'static str {
        match self {
            Self::Pawn => "pawn",
            Self::Rook => "rook",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Rook => 'R',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }
}

/// A square on the 8x8 board. Row 0 is white's back rank, column 0 is the a-file.
///
/// Coordinates are signed so that offsets can step off the board; anything
/// outside `0..8` is simply not on the board and reads as empty.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}

impl Position {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    pub fn is_on_board(&self) -> bool {
        (0..8).contains(&self.row) && (0..8).contains(&self.col)
    }

    /// Saturates at the `i8` bounds; the result may be off the board
    pub fn offset(&self, d_row: i8, d_col: i8) -> Position {
        Position {
            row: self.row.saturating_add(d_row),
            col: self.col.saturating_add(d_col),
        }
    }

    /// All 64 squares, row by row starting from white's back rank
    pub fn all() -> impl Iterator<Item = Position> {
        iproduct!(0..8, 0..8).map(|(row, col)| Position { row, col })
    }

    pub fn from_algebraic(s: &str) -> Result<Position, ParseError> {
        let mut char_iter = s.trim().chars();
        let (Some(file_char), Some(rank_char), None) =
            (char_iter.next(), char_iter.next(), char_iter.next())
        else {
            return Err(ParseError::InvalidSquare(s.to_string()));
        };

        let file_char = file_char.to_ascii_lowercase();
        if !('a'..='h').contains(&file_char) || !('1'..='8').contains(&rank_char) {
            return Err(ParseError::InvalidSquare(s.to_string()));
        }

        Ok(Position {
            row: (rank_char as u8 - b'1') as i8,
            col: (file_char as u8 - b'a') as i8,
        })
    }

    pub fn to_algebraic(&self) -> String {
        if !self.is_on_board() {
            return format!("({},{})", self.row, self.col);
        }
        format!(
            "{}{}",
            (b'a' + self.col as u8) as char,
            (b'1' + self.row as u8) as char
        )
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_algebraic())
    }
}

/// A piece is only a color and a type; which piece is which is decided by the square it sits on.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Piece {
    pub color: Color,
    pub piece_type: PieceType,
}

const WHITE_SYMBOLS: [(PieceType, char); 6] = [
    (PieceType::Pawn, '♙'),
    (PieceType::Rook, '♖'),
    (PieceType::Knight, '♘'),
    (PieceType::Bishop, '♗'),
    (PieceType::Queen, '♕'),
    (PieceType::King, '♔'),
];

const BLACK_SYMBOLS: [(PieceType, char); 6] = [
    (PieceType::Pawn, '♟'),
    (PieceType::Rook, '♜'),
    (PieceType::Knight, '♞'),
    (PieceType::Bishop, '♝'),
    (PieceType::Queen, '♛'),
    (PieceType::King, '♚'),
];

impl Piece {
    pub const fn new(color: Color, piece_type: PieceType) -> Self {
        Self { color, piece_type }
    }

    /// Piece from its FEN letter: uppercase is white, lowercase is black
    pub fn from_char(c: char) -> Result<Piece, ParseError> {
        Ok(Piece {
            color: Color::from_case(c),
            piece_type: PieceType::from_char(c)?,
        })
    }

    pub fn to_char(&self) -> char {
        let c = self.piece_type.to_char();
        match self.color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Piece> {
        let lookup = |table: &[(PieceType, char); 6], color: Color| {
            table
                .iter()
                .find(|(_, s)| *s == symbol)
                .map(|(piece_type, _)| Piece::new(color, *piece_type))
        };
        lookup(&WHITE_SYMBOLS, Color::White).or_else(|| lookup(&BLACK_SYMBOLS, Color::Black))
    }

    pub fn to_symbol(&self) -> char {
        let table = match self.color {
            Color::White => &WHITE_SYMBOLS,
            Color::Black => &BLACK_SYMBOLS,
        };
        table
            .iter()
            .find(|(piece_type, _)| *piece_type == self.piece_type)
            .map(|(_, s)| *s)
            .unwrap_or('?')
    }

    pub fn to_human(&self) -> String {
        format!("{} {}", self.color.to_human(), self.piece_type.to_human())
    }
}
