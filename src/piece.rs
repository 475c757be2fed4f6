use arrayvec::ArrayVec;

use crate::{board::Board, color::Color, role::Role, square::Square};

/// Destination squares for a single piece, stored inline on the stack.
///
/// A queen in the open reaches at most 27 squares; a king with both
/// castling options reaches 10. The capacity covers either.
pub type SquareList = ArrayVec<Square, 28>;

const ORTHOGONALS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const DIAGONALS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const AROUND: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];
const KNIGHT_LEAPS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// A piece on the board.
///
/// `color` and `role` never change once the piece is placed (promotion
/// replaces the pawn with a fresh piece); `has_moved` flips to true the
/// first time the board relocates it and feeds castling rights and the
/// two-square pawn advance.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Piece {
    pub color: Color,
    pub role: Role,
    pub has_moved: bool,
}

impl Piece {
    #[inline]
    pub const fn new(color: Color, role: Role) -> Piece {
        Piece {
            color,
            role,
            has_moved: false,
        }
    }

    /// Decodes a piece from its letter: uppercase white, lowercase
    /// black.
    pub fn from_char(ch: char) -> Option<Piece> {
        Role::from_char(ch).map(|role| {
            Piece::new(
                if ch.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                },
                role,
            )
        })
    }

    /// Letter for rendering: uppercase white, lowercase black.
    pub fn char(self) -> char {
        self.color.fold(self.role.upper_char(), self.role.char())
    }

    /// Pseudo-legal destination squares from `from`, ignoring whether
    /// the move would leave the own king in check.
    ///
    /// Castling and en passant depend on game-level state (move
    /// history, check status) and are generated by
    /// [`Game`](crate::Game), not here.
    pub fn possible_moves(self, from: Square, board: &Board) -> SquareList {
        match self.role {
            Role::Pawn => self.pawn_moves(from, board),
            Role::Knight => self.steps(from, board, &KNIGHT_LEAPS),
            Role::Bishop => self.slides(from, board, &DIAGONALS),
            Role::Rook => self.slides(from, board, &ORTHOGONALS),
            Role::Queen => {
                let mut moves = self.slides(from, board, &ORTHOGONALS);
                moves.extend(self.slides(from, board, &DIAGONALS));
                moves
            }
            Role::King => self.steps(from, board, &AROUND),
        }
    }

    /// Squares this piece attacks.
    ///
    /// Differs from [`Piece::possible_moves`] only for pawns: a pawn
    /// threatens its capture diagonals even when they are empty, while
    /// its forward pushes threaten nothing.
    pub fn attacks(self, from: Square, board: &Board) -> SquareList {
        match self.role {
            Role::Pawn => self.pawn_attacks(from),
            _ => self.possible_moves(from, board),
        }
    }

    /// Walks each direction until the board edge or the first occupied
    /// square, which is included only when it holds an opponent.
    fn slides(self, from: Square, board: &Board, directions: &[(i8, i8)]) -> SquareList {
        let mut moves = SquareList::new();
        for &(dr, dc) in directions {
            let mut to = from.offset(dr, dc);
            while to.is_valid() {
                if let Some(other) = board.piece_at(to) {
                    if other.color != self.color {
                        moves.push(to);
                    }
                    break;
                }
                moves.push(to);
                to = to.offset(dr, dc);
            }
        }
        moves
    }

    fn steps(self, from: Square, board: &Board, offsets: &[(i8, i8)]) -> SquareList {
        let mut moves = SquareList::new();
        for &(dr, dc) in offsets {
            let to = from.offset(dr, dc);
            if to.is_valid()
                && board
                    .piece_at(to)
                    .map_or(true, |other| other.color != self.color)
            {
                moves.push(to);
            }
        }
        moves
    }

    fn pawn_moves(self, from: Square, board: &Board) -> SquareList {
        let mut moves = SquareList::new();
        let forward = self.color.forward();

        let one = from.offset(forward, 0);
        if one.is_valid() && board.piece_at(one).is_none() {
            moves.push(one);

            // The double step stays behind the single step check: both
            // squares must be empty.
            let two = from.offset(2 * forward, 0);
            if !self.has_moved && two.is_valid() && board.piece_at(two).is_none() {
                moves.push(two);
            }
        }

        for dc in [-1, 1] {
            let diag = from.offset(forward, dc);
            if diag.is_valid() {
                if let Some(other) = board.piece_at(diag) {
                    if other.color != self.color {
                        moves.push(diag);
                    }
                }
            }
        }

        moves
    }

    fn pawn_attacks(self, from: Square) -> SquareList {
        let mut attacks = SquareList::new();
        for dc in [-1, 1] {
            let diag = from.offset(self.color.forward(), dc);
            if diag.is_valid() {
                attacks.push(diag);
            }
        }
        attacks
    }
}
