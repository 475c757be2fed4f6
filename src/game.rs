use std::fmt;

use arrayvec::ArrayVec;

use crate::{
    board::{Board, ParsePlacementError},
    castling_side::CastlingSide,
    color::Color,
    piece::{Piece, SquareList},
    role::Role,
    square::Square,
};

/// Progress of a game.
///
/// `Draw` is reserved for future rules (repetition, fifty moves) and is
/// never produced today.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum GameStatus {
    Active,
    Checkmate,
    Stalemate,
    Draw,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GameStatus::Active => "active",
            GameStatus::Checkmate => "checkmate",
            GameStatus::Stalemate => "stalemate",
            GameStatus::Draw => "draw",
        })
    }
}

/// A committed move, as recorded in the game history.
#[derive(Clone, Debug)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    /// Role of the piece that moved.
    pub role: Role,
    /// The displaced occupant of `to`. En passant leaves this `None`;
    /// the victim is identified by `is_en_passant` instead.
    pub capture: Option<Piece>,
    /// Role the pawn was replaced with, when the move promoted.
    pub promotion: Option<Role>,
    pub is_castling: bool,
    pub is_en_passant: bool,
    /// Whether the move put the opponent in check.
    pub is_check: bool,
    pub is_checkmate: bool,
    pub(crate) disambiguate_file: bool,
    pub(crate) disambiguate_rank: bool,
}

/// Long algebraic rendering, e.g. `Bf1-c4`, `e5xd6` or `O-O`. For
/// human-facing output prefer [`Move::san`].
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_castling {
            return f.write_str(if self.to.col == 6 { "O-O" } else { "O-O-O" });
        }
        if self.role != Role::Pawn {
            write!(f, "{}", self.role.upper_char())?;
        }
        let captures = self.capture.is_some() || self.is_en_passant;
        write!(
            f,
            "{}{}{}",
            self.from,
            if captures { 'x' } else { '-' },
            self.to
        )?;
        if let Some(promotion) = self.promotion {
            write!(f, "={}", promotion.upper_char())?;
        }
        Ok(())
    }
}

/// A chess game: board, side to move, move history and status.
///
/// All mutation goes through [`Game::make_move`]. The engine is not
/// internally synchronized; callers with concurrent access serialize on
/// a single writer per game.
#[derive(Debug)]
pub struct Game {
    board: Board,
    turn: Color,
    history: Vec<Move>,
    status: GameStatus,
}

impl Default for Game {
    fn default() -> Game {
        Game::new()
    }
}

impl Game {
    /// Starts a game from the standard starting position, White to
    /// move.
    pub fn new() -> Game {
        Game {
            board: Board::default(),
            turn: Color::White,
            history: Vec::new(),
            status: GameStatus::Active,
        }
    }

    /// Starts a game from an arbitrary placement string, White to move.
    ///
    /// The status of the loaded position is evaluated immediately, so a
    /// position where White is already mated or stalemated starts (and
    /// stays) terminal.
    pub fn from_placement(placement: &str) -> Result<Game, ParsePlacementError> {
        let mut game = Game {
            board: Board::from_placement(placement)?,
            turn: Color::White,
            history: Vec::new(),
            status: GameStatus::Active,
        };
        game.update_status();
        Ok(game)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Every committed move, oldest first.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.history.last()
    }

    /// Whether the side to move is in check.
    pub fn is_check(&self) -> bool {
        self.board.is_in_check(self.turn)
    }

    pub fn is_checkmate(&self) -> bool {
        self.status == GameStatus::Checkmate
    }

    pub fn is_stalemate(&self) -> bool {
        self.status == GameStatus::Stalemate
    }

    /// SAN for every move played, in order.
    pub fn move_list(&self) -> Vec<String> {
        self.history.iter().map(Move::san).collect()
    }

    /// Legal destinations for the piece on `from`.
    ///
    /// Empty when the square is invalid or empty, when the piece is not
    /// of the side to move, or when every candidate would expose the
    /// own king.
    pub fn legal_moves(&self, from: Square) -> SquareList {
        let mut legal = SquareList::new();
        if !from.is_valid() {
            return legal;
        }
        let piece = match self.board.piece_at(from) {
            Some(piece) if piece.color == self.turn => piece,
            _ => return legal,
        };

        let mut candidates = piece.possible_moves(from, &self.board);
        match piece.role {
            Role::King => candidates.extend(self.castling_moves(from)),
            Role::Pawn => candidates.extend(self.en_passant_move(from)),
            _ => {}
        }

        for to in candidates {
            if self.is_legal(from, to) {
                legal.push(to);
            }
        }
        legal
    }

    /// Plays a move.
    ///
    /// Returns `false`, leaving the game untouched, when the game is
    /// over, when `from` does not hold a piece of the side to move, or
    /// when `to` is not a legal destination. A promotion request is
    /// honored only for a pawn reaching the last rank; missing or
    /// unpromotable requests fall back to a queen.
    pub fn make_move(&mut self, from: Square, to: Square, promotion: Option<Role>) -> bool {
        if self.status != GameStatus::Active {
            return false;
        }
        if !from.is_valid() || !to.is_valid() {
            return false;
        }
        let piece = match self.board.piece_at(from) {
            Some(piece) if piece.color == self.turn => piece,
            _ => return false,
        };
        if !self.legal_moves(from).contains(&to) {
            return false;
        }

        let (disambiguate_file, disambiguate_rank) = self.disambiguation(from, to, piece);
        let mut m = Move {
            from,
            to,
            role: piece.role,
            capture: None,
            promotion: None,
            is_castling: false,
            is_en_passant: false,
            is_check: false,
            is_checkmate: false,
            disambiguate_file,
            disambiguate_rank,
        };

        if piece.role == Role::King && (to.col - from.col).abs() == 2 {
            self.castle(from, to);
            m.is_castling = true;
        } else if piece.role == Role::Pawn
            && (to.col - from.col).abs() == 1
            && self.board.piece_at(to).is_none()
        {
            self.capture_en_passant(from, to);
            m.is_en_passant = true;
        } else {
            m.capture = self.board.move_piece(from, to);
        }

        if piece.role == Role::Pawn && to.row == piece.color.fold(0, 7) {
            m.promotion = Some(self.promote(to, promotion));
        }

        // The move joins the history before the status update: the
        // opponent's legal moves may include an en passant reply to it.
        self.history.push(m);
        self.turn = !self.turn;
        self.update_status();

        let is_check = self.board.is_in_check(self.turn);
        let is_checkmate = self.status == GameStatus::Checkmate;
        if let Some(last) = self.history.last_mut() {
            last.is_check = is_check;
            last.is_checkmate = is_checkmate;
        }

        true
    }

    /// Simulates the move on a clone of the board and rejects it if the
    /// mover's own king ends up in check.
    fn is_legal(&self, from: Square, to: Square) -> bool {
        let mut test = self.board.clone();
        test.move_piece(from, to);

        // An en passant victim is not on the target square, so the
        // plain relocation above left it standing.
        if let Some(piece) = self.board.piece_at(from) {
            if piece.role == Role::Pawn
                && (to.col - from.col).abs() == 1
                && self.board.piece_at(to).is_none()
            {
                test.set_piece_at(Square::new(from.row, to.col), None);
            }
        }

        !test.is_in_check(self.turn)
    }

    /// Castling destinations for the king on `king_sq`: unmoved king
    /// and rook, empty squares between them, the king neither in check
    /// nor crossing an attacked square.
    fn castling_moves(&self, king_sq: Square) -> ArrayVec<Square, 2> {
        let mut moves = ArrayVec::new();

        match self.board.piece_at(king_sq) {
            Some(piece) if piece.role == Role::King && !piece.has_moved => {}
            _ => return moves,
        }
        if self.board.is_in_check(self.turn) {
            return moves;
        }

        let back = self.turn.backrank();
        for side in CastlingSide::ALL {
            let rook = self.board.piece_at(side.rook_from(self.turn));
            if !matches!(rook, Some(piece) if piece.role == Role::Rook && !piece.has_moved) {
                continue;
            }
            let clear = side
                .between_cols()
                .iter()
                .all(|&col| self.board.piece_at(Square::new(back, col)).is_none());
            let safe = side
                .crossed_cols()
                .iter()
                .all(|&col| !self.board.is_attacked(Square::new(back, col), !self.turn));
            if clear && safe {
                moves.push(side.king_to(self.turn));
            }
        }
        moves
    }

    /// The en passant capture available to the pawn on `pawn_sq`, if
    /// the move just played was a two-square pawn advance ending right
    /// next to it.
    fn en_passant_move(&self, pawn_sq: Square) -> Option<Square> {
        let last = self.last_move()?;
        let pawn = self.board.piece_at(pawn_sq)?;
        if pawn.role != Role::Pawn {
            return None;
        }

        // Only a pawn on the rank adjacent to the opponent's double
        // step destination can capture in passing.
        if pawn_sq.row != pawn.color.fold(3, 4) {
            return None;
        }

        let moved = self.board.piece_at(last.to)?;
        if moved.role == Role::Pawn
            && (last.from.row - last.to.row).abs() == 2
            && last.to.row == pawn_sq.row
            && (last.to.col - pawn_sq.col).abs() == 1
        {
            Some(Square::new(pawn_sq.row + pawn.color.forward(), last.to.col))
        } else {
            None
        }
    }

    /// A castling commit relocates the rook along with the king.
    fn castle(&mut self, from: Square, to: Square) {
        self.board.move_piece(from, to);
        if let Some(side) = CastlingSide::from_king_to(to) {
            self.board
                .move_piece(side.rook_from(self.turn), side.rook_to(self.turn));
        }
    }

    /// An en passant commit clears the victim from its own square, not
    /// the destination.
    fn capture_en_passant(&mut self, from: Square, to: Square) {
        self.board.move_piece(from, to);
        self.board.set_piece_at(Square::new(from.row, to.col), None);
    }

    /// Replaces the pawn on `square` with a fresh piece of the
    /// requested role, falling back to a queen for missing or
    /// unpromotable requests. Returns the role actually placed.
    fn promote(&mut self, square: Square, requested: Option<Role>) -> Role {
        let role = match requested {
            Some(role @ (Role::Queen | Role::Rook | Role::Bishop | Role::Knight)) => role,
            _ => Role::Queen,
        };
        if let Some(pawn) = self.board.piece_at(square) {
            let mut piece = Piece::new(pawn.color, role);
            piece.has_moved = true;
            self.board.set_piece_at(square, Some(piece));
        }
        role
    }

    /// Whether other pieces of the same role could also reach `to`, for
    /// SAN disambiguation. Pawns and kings never need it.
    fn disambiguation(&self, from: Square, to: Square, piece: Piece) -> (bool, bool) {
        if matches!(piece.role, Role::Pawn | Role::King) {
            return (false, false);
        }

        let rivals: Vec<Square> = self
            .board
            .pieces(piece.color)
            .into_iter()
            .filter(|&(square, other)| {
                square != from && other.role == piece.role && self.legal_moves(square).contains(&to)
            })
            .map(|(square, _)| square)
            .collect();

        if rivals.is_empty() {
            return (false, false);
        }
        let same_file = rivals.iter().any(|square| square.col == from.col);
        let same_rank = rivals.iter().any(|square| square.row == from.row);
        match (same_file, same_rank) {
            (false, _) => (true, false),
            (true, false) => (false, true),
            (true, true) => (true, true),
        }
    }

    /// After the turn flip: the new side to move either has a legal
    /// move somewhere (the game stays active) or is mated or
    /// stalemated, decided by whether it stands in check.
    fn update_status(&mut self) {
        let has_legal_moves = self
            .board
            .pieces(self.turn)
            .into_iter()
            .any(|(square, _)| !self.legal_moves(square).is_empty());

        if has_legal_moves {
            self.status = GameStatus::Active;
        } else if self.board.is_in_check(self.turn) {
            self.status = GameStatus::Checkmate;
        } else {
            self.status = GameStatus::Stalemate;
        }
    }
}

/// Diagnostic rendering: the board, the side to move and the status.
impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.board)?;
        writeln!(f)?;
        writeln!(f, "Current turn: {}", self.turn)?;
        write!(f, "Status: {}", self.status)?;
        if self.is_check() {
            write!(f, "\nCHECK!")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().expect("valid square")
    }

    fn play(game: &mut Game, moves: &[(&str, &str)]) {
        for &(from, to) in moves {
            assert!(
                game.make_move(sq(from), sq(to), None),
                "expected {from}{to} to be legal"
            );
        }
    }

    fn count_legal_moves(game: &Game, color: Color) -> usize {
        game.board()
            .pieces(color)
            .into_iter()
            .map(|(square, _)| game.legal_moves(square).len())
            .sum()
    }

    #[test]
    fn test_twenty_legal_moves_at_start() {
        let game = Game::new();
        assert_eq!(count_legal_moves(&game, Color::White), 20);
        // Black pieces produce nothing while it is not their turn.
        assert_eq!(count_legal_moves(&game, Color::Black), 0);
    }

    #[test]
    fn test_empty_and_invalid_squares_have_no_moves() {
        let game = Game::new();
        assert!(game.legal_moves(sq("e4")).is_empty());
        assert!(game.legal_moves(Square::new(-1, 9)).is_empty());
    }

    #[test]
    fn test_wrong_turn_is_rejected() {
        let mut game = Game::new();
        assert!(!game.make_move(sq("e7"), sq("e5"), None));
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_scholars_mate() {
        let mut game = Game::new();
        play(
            &mut game,
            &[
                ("e2", "e4"),
                ("e7", "e5"),
                ("f1", "c4"),
                ("b8", "c6"),
                ("d1", "h5"),
                ("g8", "f6"),
                ("h5", "f7"),
            ],
        );
        assert_eq!(game.status(), GameStatus::Checkmate);
        assert_eq!(game.turn(), Color::Black);
        assert!(game.is_checkmate());
        assert!(game.is_check());
        let last = game.last_move().expect("seven moves played");
        assert!(last.is_checkmate);
        assert_eq!(last.capture.map(|piece| piece.role), Some(Role::Pawn));
    }

    #[test]
    fn test_finished_game_rejects_moves() {
        let mut game = Game::new();
        play(
            &mut game,
            &[
                ("e2", "e4"),
                ("e7", "e5"),
                ("f1", "c4"),
                ("b8", "c6"),
                ("d1", "h5"),
                ("g8", "f6"),
                ("h5", "f7"),
            ],
        );
        let before = game.board().to_string();
        assert!(!game.make_move(sq("e8"), sq("f7"), None));
        assert_eq!(game.history().len(), 7);
        assert_eq!(game.board().to_string(), before);
    }

    #[test]
    fn test_en_passant_capture() {
        let mut game = Game::new();
        play(
            &mut game,
            &[("e2", "e4"), ("a7", "a6"), ("e4", "e5"), ("d7", "d5")],
        );
        assert!(game.legal_moves(sq("e5")).contains(&sq("d6")));
        assert!(game.make_move(sq("e5"), sq("d6"), None));

        // The victim disappears from its own square, not the target.
        assert!(game.board().piece_at(sq("d5")).is_none());
        let pawn = game.board().piece_at(sq("d6")).expect("capturing pawn");
        assert_eq!(pawn.role, Role::Pawn);
        assert_eq!(pawn.color, Color::White);

        let last = game.last_move().expect("moves played");
        assert!(last.is_en_passant);
        assert!(last.capture.is_none());
    }

    #[test]
    fn test_en_passant_expires_after_one_move() {
        let mut game = Game::new();
        play(
            &mut game,
            &[
                ("e2", "e4"),
                ("a7", "a6"),
                ("e4", "e5"),
                ("d7", "d5"),
                ("h2", "h3"),
                ("a6", "a5"),
            ],
        );
        assert!(!game.legal_moves(sq("e5")).contains(&sq("d6")));
    }

    #[test]
    fn test_castling_both_sides_available() {
        let game = Game::from_placement("r3k2r/8/8/8/8/8/8/R3K2R").expect("valid placement");
        let moves = game.legal_moves(sq("e1"));
        assert!(moves.contains(&sq("g1")));
        assert!(moves.contains(&sq("c1")));
    }

    #[test]
    fn test_castling_commit_relocates_rook() {
        let mut game = Game::from_placement("r3k2r/8/8/8/8/8/8/R3K2R").expect("valid placement");
        assert!(game.make_move(sq("e1"), sq("g1"), None));
        assert_eq!(
            game.board().piece_at(sq("g1")).map(|piece| piece.role),
            Some(Role::King)
        );
        assert_eq!(
            game.board().piece_at(sq("f1")).map(|piece| piece.role),
            Some(Role::Rook)
        );
        assert!(game.board().piece_at(sq("h1")).is_none());
        assert!(game.board().piece_at(sq("e1")).is_none());
        assert!(game.last_move().expect("castled").is_castling);
    }

    #[test]
    fn test_castling_blocked_by_attacked_crossing() {
        // The black rook on f2 covers f1, so only the queenside path is
        // safe.
        let game = Game::from_placement("r3k2r/8/8/8/8/8/5r2/R3K2R").expect("valid placement");
        let moves = game.legal_moves(sq("e1"));
        assert!(!moves.contains(&sq("g1")));
        assert!(moves.contains(&sq("c1")));
    }

    #[test]
    fn test_castling_requires_unmoved_king() {
        let mut game =
            Game::from_placement("r3k2r/p7/8/8/8/8/P7/R3K2R").expect("valid placement");
        play(
            &mut game,
            &[("e1", "e2"), ("a7", "a6"), ("e2", "e1"), ("a6", "a5")],
        );
        let moves = game.legal_moves(sq("e1"));
        assert!(!moves.contains(&sq("g1")));
        assert!(!moves.contains(&sq("c1")));
    }

    #[test]
    fn test_promotion_defaults_to_queen() {
        let mut game = Game::from_placement("4k3/P7/8/8/8/8/8/4K3").expect("valid placement");
        assert!(game.make_move(sq("a7"), sq("a8"), None));
        let queen = game.board().piece_at(sq("a8")).expect("promoted piece");
        assert_eq!(queen.role, Role::Queen);
        assert_eq!(queen.color, Color::White);
        assert!(queen.has_moved);
        let last = game.last_move().expect("promoted");
        assert_eq!(last.promotion, Some(Role::Queen));
        assert!(last.is_check);
    }

    #[test]
    fn test_promotion_honors_request() {
        let mut game = Game::from_placement("4k3/P7/8/8/8/8/8/4K3").expect("valid placement");
        assert!(game.make_move(sq("a7"), sq("a8"), Some(Role::Knight)));
        assert_eq!(
            game.board().piece_at(sq("a8")).map(|piece| piece.role),
            Some(Role::Knight)
        );
    }

    #[test]
    fn test_unpromotable_request_falls_back_to_queen() {
        let mut game = Game::from_placement("4k3/P7/8/8/8/8/8/4K3").expect("valid placement");
        assert!(game.make_move(sq("a7"), sq("a8"), Some(Role::King)));
        assert_eq!(
            game.board().piece_at(sq("a8")).map(|piece| piece.role),
            Some(Role::Queen)
        );
    }

    #[test]
    fn test_stalemate_position() {
        // White to move: the king on h1 has no square and no check.
        let game = Game::from_placement("8/8/8/8/8/6p1/5k2/7K").expect("valid placement");
        assert_eq!(game.status(), GameStatus::Stalemate);
        assert!(game.is_stalemate());
        assert!(!game.is_check());
    }

    #[test]
    fn test_stalemated_game_rejects_moves() {
        let mut game = Game::from_placement("8/8/8/8/8/6p1/5k2/7K").expect("valid placement");
        assert!(!game.make_move(sq("h1"), sq("h2"), None));
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_pinned_piece_may_only_shield_the_king() {
        let game = Game::from_placement("k3q3/8/8/8/8/8/4R3/4K3").expect("valid placement");
        let moves = game.legal_moves(sq("e2"));
        // The rook stays on the e-file between king and queen.
        assert_eq!(moves.len(), 6);
        assert!(moves.contains(&sq("e8")));
        assert!(!moves.contains(&sq("d2")));
        assert!(!moves.contains(&sq("h2")));
    }

    #[test]
    fn test_display() {
        let game = Game::new();
        let rendered = game.to_string();
        assert!(rendered.contains("Current turn: white"));
        assert!(rendered.contains("Status: active"));
        assert!(!rendered.contains("CHECK!"));
    }
}
