//! Standard algebraic notation for committed moves.

use crate::{game::Move, role::Role};

impl Move {
    /// Renders the move in standard algebraic notation, e.g. `e4`,
    /// `Nxf3`, `Rae1`, `exd6`, `a8=Q+` or `O-O-O#`.
    ///
    /// Disambiguation was resolved against the position the move was
    /// played in, so rendering needs no board access.
    pub fn san(&self) -> String {
        let mut san = String::new();

        if self.is_castling {
            san.push_str(if self.to.col == 6 { "O-O" } else { "O-O-O" });
        } else {
            let captures = self.capture.is_some() || self.is_en_passant;

            if self.role == Role::Pawn {
                if captures {
                    san.push(self.from.file_char());
                }
            } else {
                san.push(self.role.upper_char());
                if self.disambiguate_file {
                    san.push(self.from.file_char());
                }
                if self.disambiguate_rank {
                    san.push(self.from.rank_char());
                }
            }

            if captures {
                san.push('x');
            }
            san.push(self.to.file_char());
            san.push(self.to.rank_char());

            if let Some(promotion) = self.promotion {
                san.push('=');
                san.push(promotion.upper_char());
            }
        }

        if self.is_checkmate {
            san.push('#');
        } else if self.is_check {
            san.push('+');
        }

        san
    }
}

#[cfg(test)]
mod tests {
    use crate::{game::Game, role::Role, square::Square};

    fn sq(s: &str) -> Square {
        s.parse().expect("valid square")
    }

    fn last_san(game: &Game) -> String {
        game.last_move().expect("moves played").san()
    }

    #[test]
    fn test_pawn_push_and_capture() {
        let mut game = Game::new();
        assert!(game.make_move(sq("e2"), sq("e4"), None));
        assert_eq!(last_san(&game), "e4");
        assert!(game.make_move(sq("d7"), sq("d5"), None));
        assert_eq!(last_san(&game), "d5");
        assert!(game.make_move(sq("e4"), sq("d5"), None));
        assert_eq!(last_san(&game), "exd5");
    }

    #[test]
    fn test_piece_moves_and_checkmate_mark() {
        let mut game = Game::new();
        let line = [
            ("e2", "e4"),
            ("e7", "e5"),
            ("f1", "c4"),
            ("b8", "c6"),
            ("d1", "h5"),
            ("g8", "f6"),
            ("h5", "f7"),
        ];
        for (from, to) in line {
            assert!(game.make_move(sq(from), sq(to), None));
        }
        assert_eq!(
            game.move_list(),
            vec!["e4", "e5", "Bc4", "Nc6", "Qh5", "Nf6", "Qxf7#"]
        );
    }

    #[test]
    fn test_file_disambiguation() {
        let mut game = Game::from_placement("2k5/8/8/8/8/8/6K1/R6R").expect("valid placement");
        assert!(game.make_move(sq("a1"), sq("e1"), None));
        assert_eq!(last_san(&game), "Rae1");
    }

    #[test]
    fn test_rank_disambiguation() {
        let mut game = Game::from_placement("2k5/8/R7/8/8/8/R5K1/8").expect("valid placement");
        assert!(game.make_move(sq("a2"), sq("a4"), None));
        assert_eq!(last_san(&game), "R2a4");
    }

    #[test]
    fn test_promotion_with_check() {
        let mut game = Game::from_placement("4k3/P7/8/8/8/8/8/4K3").expect("valid placement");
        assert!(game.make_move(sq("a7"), sq("a8"), Some(Role::Queen)));
        assert_eq!(last_san(&game), "a8=Q+");
    }

    #[test]
    fn test_en_passant_reads_as_pawn_capture() {
        let mut game = Game::new();
        let line = [("e2", "e4"), ("a7", "a6"), ("e4", "e5"), ("d7", "d5")];
        for (from, to) in line {
            assert!(game.make_move(sq(from), sq(to), None));
        }
        assert!(game.make_move(sq("e5"), sq("d6"), None));
        assert_eq!(last_san(&game), "exd6");
    }

    #[test]
    fn test_castling() {
        let mut game = Game::from_placement("r3k2r/8/8/8/8/8/8/R3K2R").expect("valid placement");
        assert!(game.make_move(sq("e1"), sq("g1"), None));
        assert_eq!(last_san(&game), "O-O");
        assert!(game.make_move(sq("e8"), sq("c8"), None));
        assert_eq!(last_san(&game), "O-O-O");
    }
}
