//! A library for chess rules: board representation, move generation
//! with full legality checking, and game state tracking through
//! checkmate and stalemate.
//!
//! # Examples
//!
//! Generate legal moves in the starting position:
//!
//! ```
//! use chessrules::{Game, Square};
//!
//! let game = Game::new();
//!
//! // The e2 pawn may advance one or two squares.
//! let moves = game.legal_moves(Square::new(6, 4));
//! assert_eq!(moves.len(), 2);
//! ```
//!
//! Play moves and watch the game state:
//!
//! ```
//! use chessrules::{Game, GameStatus};
//!
//! let mut game = Game::new();
//! game.make_move("e2".parse()?, "e4".parse()?, None);
//! game.make_move("f7".parse()?, "f5".parse()?, None);
//! game.make_move("d1".parse()?, "h5".parse()?, None);
//!
//! assert!(game.is_check());
//! assert_eq!(game.status(), GameStatus::Active);
//! assert_eq!(game.move_list(), vec!["e4", "f5", "Qh5+"]);
//! # Ok::<_, chessrules::ParseSquareError>(())
//! ```
//!
//! # Features
//!
//! - `serde`: Implements `Serialize` and `Deserialize` for the plain
//!   data types.

#![doc(html_root_url = "https://docs.rs/chessrules/0.1.0")]
#![warn(missing_debug_implementations)]

mod board;
mod castling_side;
mod color;
mod game;
mod piece;
mod role;
mod san;
mod square;

pub use crate::{
    board::{Board, ParsePlacementError, STARTING_PLACEMENT},
    castling_side::CastlingSide,
    color::Color,
    game::{Game, GameStatus, Move},
    piece::{Piece, SquareList},
    role::Role,
    square::{ParseSquareError, Square},
};
