use std::{error::Error, fmt};

use crate::{color::Color, piece::Piece, role::Role, square::Square};

/// Placement string for the standard starting position.
pub const STARTING_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

/// An 8×8 grid of optional pieces.
///
/// The board only places and relocates pieces; whether a move is legal
/// is the business of [`Game`](crate::Game). Rows are indexed from the
/// top, so row 0 is rank 8.
///
/// Cloning copies the whole grid of small piece values, which is what
/// legality simulation relies on: a clone shares nothing with the
/// original.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Board {
    grid: [[Option<Piece>; 8]; 8],
}

/// Error when decoding an invalid placement string.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParsePlacementError;

impl fmt::Display for ParsePlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid placement")
    }
}

impl Error for ParsePlacementError {}

impl Board {
    /// An empty board.
    pub const fn empty() -> Board {
        Board {
            grid: [[None; 8]; 8],
        }
    }

    /// Decodes a slash-delimited placement string: digits are runs of
    /// empty squares, letters are pieces, uppercase for white.
    ///
    /// A piece off the home square for its role and color starts with
    /// `has_moved` set. This is a heuristic: a placement cannot say
    /// whether a piece sitting on its home square has actually moved,
    /// so loaded positions may grant castling or double-step rights the
    /// game that produced them had lost.
    pub fn from_placement(placement: &str) -> Result<Board, ParsePlacementError> {
        let mut board = Board::empty();
        for (row, rank) in placement.split('/').take(8).enumerate() {
            let mut col: usize = 0;
            for ch in rank.chars() {
                if let Some(run) = ch.to_digit(10) {
                    col += run as usize;
                } else {
                    let mut piece = Piece::from_char(ch).ok_or(ParsePlacementError)?;
                    if col < 8 {
                        let square = Square::new(row as i8, col as i8);
                        piece.has_moved = !is_home_square(piece, square);
                        board.grid[row][col] = Some(piece);
                    }
                    col += 1;
                }
            }
        }
        Ok(board)
    }

    /// Direct cell read. The square must be valid.
    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.grid[square.row as usize][square.col as usize]
    }

    /// Direct cell write. The square must be valid.
    #[inline]
    pub fn set_piece_at(&mut self, square: Square, piece: Option<Piece>) {
        self.grid[square.row as usize][square.col as usize] = piece;
    }

    /// Relocates whatever sits on `from` to `to`, marking it moved, and
    /// returns the displaced occupant of `to`.
    ///
    /// No legality checking: this is the raw primitive behind both real
    /// moves and simulated ones.
    pub fn move_piece(&mut self, from: Square, to: Square) -> Option<Piece> {
        let captured = self.piece_at(to);
        if let Some(mut piece) = self.piece_at(from) {
            piece.has_moved = true;
            self.set_piece_at(to, Some(piece));
            self.set_piece_at(from, None);
        }
        captured
    }

    /// All pieces of `color` with their squares, in row-major scan
    /// order. The order carries no meaning but is deterministic.
    pub fn pieces(&self, color: Color) -> Vec<(Square, Piece)> {
        let mut pieces = Vec::new();
        for row in 0..8 {
            for col in 0..8 {
                if let Some(piece) = self.grid[row][col] {
                    if piece.color == color {
                        pieces.push((Square::new(row as i8, col as i8), piece));
                    }
                }
            }
        }
        pieces
    }

    /// Whether any piece of `by` attacks `square`. Pawns contribute
    /// their attack-only view, so an empty capture diagonal still
    /// counts.
    pub fn is_attacked(&self, square: Square, by: Color) -> bool {
        self.pieces(by)
            .into_iter()
            .any(|(from, piece)| piece.attacks(from, self).contains(&square))
    }

    /// Square of the first king of `color` in scan order.
    pub fn king_of(&self, color: Color) -> Option<Square> {
        self.pieces(color)
            .into_iter()
            .find(|(_, piece)| piece.role == Role::King)
            .map(|(square, _)| square)
    }

    /// Whether the king of `color` is attacked.
    ///
    /// A board without that king is out of invariant; it reports not in
    /// check rather than failing, so simulation stays total.
    pub fn is_in_check(&self, color: Color) -> bool {
        match self.king_of(color) {
            Some(king) => self.is_attacked(king, !color),
            None => false,
        }
    }
}

impl Default for Board {
    /// The standard starting position.
    fn default() -> Board {
        Board::from_placement(STARTING_PLACEMENT).expect("starting placement is valid")
    }
}

/// Diagnostic rendering: one letter per piece (uppercase white), `.`
/// for empty squares, files space-separated, ranks newline-separated.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, rank) in self.grid.iter().enumerate() {
            if row > 0 {
                f.write_str("\n")?;
            }
            for (col, cell) in rank.iter().enumerate() {
                if col > 0 {
                    f.write_str(" ")?;
                }
                match cell {
                    Some(piece) => write!(f, "{}", piece.char())?,
                    None => f.write_str(".")?,
                }
            }
        }
        Ok(())
    }
}

fn is_home_square(piece: Piece, square: Square) -> bool {
    let Square { row, col } = square;
    match piece.role {
        Role::Pawn => row == piece.color.fold(6, 1),
        Role::Rook => row == piece.color.backrank() && (col == 0 || col == 7),
        Role::Knight => row == piece.color.backrank() && (col == 1 || col == 6),
        Role::Bishop => row == piece.color.backrank() && (col == 2 || col == 5),
        Role::Queen => row == piece.color.backrank() && col == 3,
        Role::King => row == piece.color.backrank() && col == 4,
    }
}
