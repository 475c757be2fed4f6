use crate::{color::Color, square::Square};

/// `KingSide` (O-O) or `QueenSide` (O-O-O).
///
/// The king's two-square slide is the whole signal for castling: the
/// side, and with it the rook's relocation, follows from the king's
/// destination column.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum CastlingSide {
    KingSide,
    QueenSide,
}

impl CastlingSide {
    /// Side implied by the king's destination, if it is a castling
    /// target column.
    pub const fn from_king_to(to: Square) -> Option<CastlingSide> {
        match to.col {
            6 => Some(CastlingSide::KingSide),
            2 => Some(CastlingSide::QueenSide),
            _ => None,
        }
    }

    pub const fn king_to_col(self) -> i8 {
        match self {
            CastlingSide::KingSide => 6,
            CastlingSide::QueenSide => 2,
        }
    }

    pub const fn rook_from_col(self) -> i8 {
        match self {
            CastlingSide::KingSide => 7,
            CastlingSide::QueenSide => 0,
        }
    }

    pub const fn rook_to_col(self) -> i8 {
        match self {
            CastlingSide::KingSide => 5,
            CastlingSide::QueenSide => 3,
        }
    }

    /// Columns between king and rook that must be empty.
    pub const fn between_cols(self) -> &'static [i8] {
        match self {
            CastlingSide::KingSide => &[5, 6],
            CastlingSide::QueenSide => &[1, 2, 3],
        }
    }

    /// Columns the king crosses that must not be attacked, destination
    /// included and starting square excluded.
    pub const fn crossed_cols(self) -> &'static [i8] {
        match self {
            CastlingSide::KingSide => &[5, 6],
            CastlingSide::QueenSide => &[2, 3],
        }
    }

    pub fn king_to(self, color: Color) -> Square {
        Square::new(color.backrank(), self.king_to_col())
    }

    pub fn rook_from(self, color: Color) -> Square {
        Square::new(color.backrank(), self.rook_from_col())
    }

    pub fn rook_to(self, color: Color) -> Square {
        Square::new(color.backrank(), self.rook_to_col())
    }

    /// `KingSide` and `QueenSide`, in this order.
    pub const ALL: [CastlingSide; 2] = [CastlingSide::KingSide, CastlingSide::QueenSide];
}
