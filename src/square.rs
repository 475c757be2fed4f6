use std::{error::Error, fmt, str::FromStr};

/// A coordinate on the board: `row` counted from the top (rank 8 is
/// row 0) and `col` counted from the left (file a is column 0).
///
/// Squares are plain values. Parsing notation and [`Square::offset`]
/// can both produce coordinates outside the board, so callers validate
/// with [`Square::is_valid`] before using a square as a grid index.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Square {
    pub row: i8,
    pub col: i8,
}

impl Square {
    #[inline]
    pub const fn new(row: i8, col: i8) -> Square {
        Square { row, col }
    }

    /// Checks that both coordinates are in `0..8`.
    #[inline]
    pub const fn is_valid(self) -> bool {
        0 <= self.row && self.row < 8 && 0 <= self.col && self.col < 8
    }

    /// Returns the square shifted by the given deltas, without bounds
    /// checking.
    #[must_use]
    #[inline]
    pub const fn offset(self, dr: i8, dc: i8) -> Square {
        Square::new(self.row + dr, self.col + dc)
    }

    /// Letter of the file, `'a'` to `'h'` for a valid square.
    pub const fn file_char(self) -> char {
        b'a'.wrapping_add(self.col as u8) as char
    }

    /// Digit of the rank, `'1'` to `'8'` for a valid square.
    pub const fn rank_char(self) -> char {
        b'8'.wrapping_sub(self.row as u8) as char
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

/// Error when parsing an invalid square notation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseSquareError;

impl fmt::Display for ParseSquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid square notation")
    }
}

impl Error for ParseSquareError {}

impl FromStr for Square {
    type Err = ParseSquareError;

    /// Decodes two-character algebraic notation such as `e4`.
    ///
    /// Only the shape of the string is checked: a file letter followed
    /// by a rank digit. Characters like `'j'` or `'9'` decode to
    /// coordinates outside the board, so callers follow up with
    /// [`Square::is_valid`].
    fn from_str(s: &str) -> Result<Square, ParseSquareError> {
        let mut chars = s.chars();
        let (file, rank) = match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => (file.to_ascii_lowercase(), rank),
            _ => return Err(ParseSquareError),
        };
        if !file.is_ascii_lowercase() || !rank.is_ascii_digit() {
            return Err(ParseSquareError);
        }
        Ok(Square::new(
            8 - (rank as i8 - '0' as i8),
            file as i8 - 'a' as i8,
        ))
    }
}
