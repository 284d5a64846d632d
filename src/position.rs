use std::{fmt, ops::Index, sync::Arc};

use thiserror::Error;

use super::{
    bitboard::{king_attacks, knight_attacks, Bitboard},
    coordinates::{File, Rank, Square},
    move_gen::{
        attacks::{attacks_from_bishop, attacks_from_pawn, attacks_from_rook},
        generation::generate_moves,
    },
    piece::{Color, PieceType},
    r#move::{CastlingRights, Move, MoveKind},
    zobrist::{Zobrist, ZobristKeys},
};

/// Error type for parsing a FEN (Forsyth-Edwards Notation) string.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FenError {
    #[error("Invalid piece placement")]
    InvalidPiecePlacement,
    #[error("Invalid active color")]
    InvalidActiveColor,
    #[error("Invalid castling availability")]
    InvalidCastlingAvailability,
    #[error("Invalid en passant square")]
    InvalidEnPassantSquare,
    #[error("Invalid halfmove clock")]
    InvalidHalfmoveClock,
    #[error("Invalid fullmove number")]
    InvalidFullmoveNumber,
    #[error("Each side must have exactly one king")]
    InvalidKingCount,
    #[error("Missing field in FEN string")]
    MissingField,
}

/// The outcome of a position, from the rules point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Normal,
    Checkmate,
    Stalemate,
    FiftyMoveDraw,
    RepetitionDraw,
    InsufficientMaterialDraw,
}

impl GameStatus {
    /// Returns true for every drawn outcome, stalemate included.
    pub fn is_draw(self) -> bool {
        matches!(
            self,
            GameStatus::Stalemate
                | GameStatus::FiftyMoveDraw
                | GameStatus::RepetitionDraw
                | GameStatus::InsufficientMaterialDraw
        )
    }

    /// Returns true when the game is over.
    pub fn is_terminal(self) -> bool {
        self != GameStatus::Normal
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GameStatus::Normal => "in progress",
            GameStatus::Checkmate => "checkmate",
            GameStatus::Stalemate => "stalemate",
            GameStatus::FiftyMoveDraw => "draw by the fifty-move rule",
            GameStatus::RepetitionDraw => "draw by threefold repetition",
            GameStatus::InsufficientMaterialDraw => "draw by insufficient material",
        };
        write!(f, "{text}")
    }
}

/// The state a move destroys and that can not be recomputed when the move is taken back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IrreversibleState {
    pub en_passant_square: Option<Square>,
    pub castling_rights: CastlingRights,
    pub halfmove_clock: u32,
}

/// Castling rights lost when a piece leaves or lands on each square. Only the king and rook home squares carry rights.
const CASTLING_RIGHTS_MASK: [CastlingRights; Square::COUNT] = {
    let mut mask = [CastlingRights::empty(); Square::COUNT];
    mask[Square::A1.index()] = CastlingRights::WHITE_QUEENSIDE;
    mask[Square::H1.index()] = CastlingRights::WHITE_KINGSIDE;
    mask[Square::E1.index()] = CastlingRights::WHITE_KINGSIDE.union(CastlingRights::WHITE_QUEENSIDE);
    mask[Square::A8.index()] = CastlingRights::BLACK_QUEENSIDE;
    mask[Square::H8.index()] = CastlingRights::BLACK_KINGSIDE;
    mask[Square::E8.index()] = CastlingRights::BLACK_KINGSIDE.union(CastlingRights::BLACK_QUEENSIDE);
    mask
};

const INITIAL_POSITION: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A chess position and the history of the moves that led to it.
///
/// The position is mutated exclusively through [`Position::make_move`] and [`Position::unmake_move`]. Every applied
/// move pushes one entry on each of the three history stacks.
#[derive(Clone)]
pub struct Position {
    pieces: [Bitboard; PieceType::COUNT],
    colors: [Bitboard; Color::COUNT],
    board: [Option<PieceType>; Square::COUNT],
    turn: Color,
    castling_rights: CastlingRights,
    en_passant_square: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
    hash: Zobrist,
    move_history: Vec<Move>,
    irreversible_history: Vec<IrreversibleState>,
    hash_history: Vec<Zobrist>,
    keys: Arc<ZobristKeys>,
}

impl Position {
    fn empty(keys: Arc<ZobristKeys>) -> Self {
        Self {
            pieces: [Bitboard::EMPTY; PieceType::COUNT],
            colors: [Bitboard::EMPTY; Color::COUNT],
            board: [None; Square::COUNT],
            turn: Color::White,
            castling_rights: CastlingRights::empty(),
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: Zobrist::EMPTY,
            move_history: Vec::new(),
            irreversible_history: Vec::new(),
            hash_history: Vec::new(),
            keys,
        }
    }

    /// Creates a new chess position with the standard initial board setup, hashed with the process wide Zobrist keys.
    pub fn new() -> Self {
        Self::with_keys(ZobristKeys::global())
    }

    /// Creates a new chess position with the standard initial board setup, hashed with the given Zobrist keys.
    pub fn with_keys(keys: Arc<ZobristKeys>) -> Self {
        match Self::new_from_fen_with_keys(INITIAL_POSITION, keys) {
            Ok(position) => position,
            Err(error) => unreachable!("The initial position FEN is valid: {error}"),
        }
    }

    fn read_piece_placement(&mut self, piece_placement: &str) -> Result<(), FenError> {
        let ranks: Vec<&str> = piece_placement.split('/').collect();
        if ranks.len() != Rank::COUNT {
            return Err(FenError::InvalidPiecePlacement);
        }

        for (rank, description) in Rank::ALL.iter().rev().zip(ranks) {
            let mut file = 0usize;
            for c in description.chars() {
                if let Some(count) = c.to_digit(10) {
                    if !(1..=8).contains(&count) {
                        return Err(FenError::InvalidPiecePlacement);
                    }
                    file += count as usize;
                } else {
                    let piece_type = PieceType::try_from(c).map_err(|_| FenError::InvalidPiecePlacement)?;
                    let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
                    if file >= File::COUNT {
                        return Err(FenError::InvalidPiecePlacement);
                    }
                    self.put_piece(piece_type, color, Square::new(File::from(file as u8), *rank));
                    file += 1;
                }

                if file > File::COUNT {
                    return Err(FenError::InvalidPiecePlacement);
                }
            }

            if file != File::COUNT {
                return Err(FenError::InvalidPiecePlacement);
            }
        }

        for color in Color::ALL {
            if self.pieces_of(color, PieceType::King).popcnt() != 1 {
                return Err(FenError::InvalidKingCount);
            }
        }

        Ok(())
    }

    fn read_active_color(&mut self, active_color: &str) -> Result<(), FenError> {
        self.turn = match active_color {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(FenError::InvalidActiveColor),
        };
        Ok(())
    }

    fn read_castling(&mut self, castling_availability: &str) -> Result<(), FenError> {
        if castling_availability == "-" {
            return Ok(());
        }

        for c in castling_availability.chars() {
            let right = match c {
                'K' => CastlingRights::WHITE_KINGSIDE,
                'Q' => CastlingRights::WHITE_QUEENSIDE,
                'k' => CastlingRights::BLACK_KINGSIDE,
                'q' => CastlingRights::BLACK_QUEENSIDE,
                _ => return Err(FenError::InvalidCastlingAvailability),
            };
            self.castling_rights |= right;
        }

        Ok(())
    }

    fn read_en_passant_square(&mut self, en_passant_square: &str) -> Result<(), FenError> {
        self.en_passant_square = match en_passant_square {
            "-" => None,
            _ => {
                let square = Square::try_from(en_passant_square).map_err(|_| FenError::InvalidEnPassantSquare)?;
                let expected_rank = match self.turn {
                    Color::White => Rank::R6,
                    Color::Black => Rank::R3,
                };
                if square.rank() != expected_rank {
                    return Err(FenError::InvalidEnPassantSquare);
                }

                // The pawn that just moved two squares stands right behind the empty target square.
                let opponent = !self.turn;
                let pushed_pawn = square.offset(-opponent.forward());
                if self.board[square.index()].is_some()
                    || self.board[pushed_pawn.index()] != Some(PieceType::Pawn)
                    || self.color_at(pushed_pawn) != Some(opponent)
                {
                    return Err(FenError::InvalidEnPassantSquare);
                }
                Some(square)
            }
        };
        Ok(())
    }

    /// Creates a new chess position from a FEN (Forsyth-Edwards Notation) string, hashed with the process wide Zobrist
    /// keys.
    ///
    /// A FEN string contains 6 fields separated by spaces: piece placement, active color, castling availability, en
    /// passant target square, halfmove clock and fullmove number. The last four fields are optional and default to
    /// `- - 0 1`.
    pub fn new_from_fen(fen: &str) -> Result<Self, FenError> {
        Self::new_from_fen_with_keys(fen, ZobristKeys::global())
    }

    /// Creates a new chess position from a FEN string, hashed with the given Zobrist keys.
    pub fn new_from_fen_with_keys(fen: &str, keys: Arc<ZobristKeys>) -> Result<Self, FenError> {
        let mut position = Position::empty(keys);

        let mut fields = fen.split_whitespace();
        position.read_piece_placement(fields.next().ok_or(FenError::MissingField)?)?;
        position.read_active_color(fields.next().ok_or(FenError::MissingField)?)?;
        position.read_castling(fields.next().unwrap_or("-"))?;
        position.read_en_passant_square(fields.next().unwrap_or("-"))?;

        position.halfmove_clock = fields.next().unwrap_or("0").parse().map_err(|_| FenError::InvalidHalfmoveClock)?;

        position.fullmove_number =
            fields.next().unwrap_or("1").parse().map_err(|_| FenError::InvalidFullmoveNumber)?;

        position.hash = position.compute_hash();

        Ok(position)
    }

    fn write_piece_placement(&self) -> String {
        let mut result = String::with_capacity(70);
        for rank in Rank::ALL.iter().rev() {
            let mut empty_count = 0;
            for file in File::ALL {
                let square = Square::new(file, *rank);
                match (self.board[square.index()], self.color_at(square)) {
                    (Some(piece_type), Some(color)) => {
                        if empty_count > 0 {
                            result.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        result.push(piece_type.to_fen_char(color));
                    }
                    _ => empty_count += 1,
                }
            }
            if empty_count > 0 {
                result.push_str(&empty_count.to_string());
            }
            if *rank != Rank::R1 {
                result.push('/');
            }
        }
        result
    }

    fn write_castling(&self) -> String {
        if self.castling_rights.is_empty() {
            return String::from("-");
        }

        [
            (CastlingRights::WHITE_KINGSIDE, 'K'),
            (CastlingRights::WHITE_QUEENSIDE, 'Q'),
            (CastlingRights::BLACK_KINGSIDE, 'k'),
            (CastlingRights::BLACK_QUEENSIDE, 'q'),
        ]
        .iter()
        .filter(|(right, _)| self.castling_rights.contains(*right))
        .map(|(_, c)| *c)
        .collect()
    }

    /// Returns the FEN (Forsyth-Edwards Notation) representation of the position.
    pub fn to_fen(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.write_piece_placement(),
            char::from(self.turn),
            self.write_castling(),
            self.en_passant_square.map_or_else(|| String::from("-"), |square| square.to_string()),
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    /// Generates a compact string representation of the current chess position.
    ///
    /// The board is displayed from white's perspective with rank numbers on the left edge and file letters on the
    /// bottom. Empty squares are dots.
    ///
    /// ```text
    /// 8  r n b q k b n r
    /// 7  p p p p p p p p
    /// 6  . . . . . . . .
    /// 5  . . . . . . . .
    /// 4  . . . . . . . .
    /// 3  . . . . . . . .
    /// 2  P P P P P P P P
    /// 1  R N B Q K B N R
    ///    a b c d e f g h
    /// ```
    pub fn to_compact_string(&self) -> String {
        let mut board = String::with_capacity(171);
        for rank in Rank::ALL.iter().rev() {
            board.push_str(&format!("{}  ", rank));
            for file in File::ALL {
                let sq = Square::new(file, *rank);
                match (self.board[sq.index()], self.color_at(sq)) {
                    (Some(piece_type), Some(color)) => board.push(piece_type.to_fen_char(color)),
                    _ => board.push('.'),
                }
                if file != File::H {
                    board.push(' ');
                } else {
                    board.push('\n');
                }
            }
        }
        board.push_str("   a b c d e f g h");

        board
    }

    /// Returns all occupied squares.
    pub fn occupied(&self) -> Bitboard {
        self.colors[usize::from(Color::White)] | self.colors[usize::from(Color::Black)]
    }

    /// Returns the squares occupied by pieces of a type, both colors included.
    pub fn pieces(&self, piece_type: PieceType) -> Bitboard {
        self.pieces[usize::from(piece_type)]
    }

    /// Returns the squares occupied by pieces of a color.
    pub fn colors(&self, color: Color) -> Bitboard {
        self.colors[usize::from(color)]
    }

    /// Returns the squares occupied by pieces of a type and color.
    pub fn pieces_of(&self, color: Color, piece_type: PieceType) -> Bitboard {
        self.pieces(piece_type) & self.colors(color)
    }

    /// Returns the type of the piece on a square, if any.
    pub fn piece_at(&self, square: Square) -> Option<PieceType> {
        self.board[square.index()]
    }

    /// Returns the color of the piece on a square, if any.
    pub fn color_at(&self, square: Square) -> Option<Color> {
        Color::ALL.into_iter().find(|color| self.colors(*color).get(square))
    }

    /// Returns the color of the side to move.
    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    /// Returns the square a pawn passed over with a double push on the previous move.
    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    pub fn hash(&self) -> Zobrist {
        self.hash
    }

    /// Returns the Zobrist keys the position is hashed with.
    pub fn keys(&self) -> &Arc<ZobristKeys> {
        &self.keys
    }

    /// Returns the last applied move, if any.
    pub fn last_move(&self) -> Option<Move> {
        self.move_history.last().copied()
    }

    /// Returns the applied moves, oldest first.
    pub fn move_history(&self) -> &[Move] {
        &self.move_history
    }

    /// Returns the irreversible state saved before each applied move, oldest first.
    pub fn irreversible_history(&self) -> &[IrreversibleState] {
        &self.irreversible_history
    }

    /// Returns the hash of the position before each applied move, oldest first.
    pub fn hash_history(&self) -> &[Zobrist] {
        &self.hash_history
    }

    /// Returns the square occupied by the king of the specified color.
    ///
    /// # Panics
    /// Panics if no king of the specified color is found on the board, which should never happen in a valid chess
    /// position.
    pub fn king_square(&self, color: Color) -> Square {
        self.pieces_of(color, PieceType::King).lsb()
    }

    /// Computes the hash of the position from scratch: side to move, piece placement, castling rights and en passant
    /// square. The halfmove clock is not part of the hash.
    pub fn compute_hash(&self) -> Zobrist {
        let mut hash = Zobrist::EMPTY;

        if self.turn == Color::Black {
            hash.update_turn(&self.keys);
        }

        for color in Color::ALL {
            for piece_type in PieceType::ALL {
                for square in self.pieces_of(color, piece_type) {
                    hash.update_piece(&self.keys, piece_type, color, square);
                }
            }
        }

        hash.update_castling_rights(&self.keys, self.castling_rights);
        hash.update_en_passant(&self.keys, self.en_passant_square);

        hash
    }

    /// Places a piece on an empty square.
    fn put_piece(&mut self, piece_type: PieceType, color: Color, square: Square) {
        debug_assert_eq!(self.board[square.index()], None);

        self.board[square.index()] = Some(piece_type);
        self.pieces[usize::from(piece_type)] |= square;
        self.colors[usize::from(color)] |= square;
        self.hash.update_piece(&self.keys, piece_type, color, square);
    }

    /// Removes a piece from a square and returns it.
    ///
    /// # Panics
    /// Panics if the square is empty.
    fn remove_piece(&mut self, square: Square) -> (PieceType, Color) {
        let (Some(piece_type), Some(color)) = (self.board[square.index()], self.color_at(square)) else {
            panic!("It is not possible to remove a piece from the empty square {square}.");
        };

        self.board[square.index()] = None;
        self.pieces[usize::from(piece_type)] ^= square;
        self.colors[usize::from(color)] ^= square;
        self.hash.update_piece(&self.keys, piece_type, color, square);

        (piece_type, color)
    }

    /// Moves a piece from one square to an empty square.
    fn move_piece(&mut self, from: Square, to: Square) {
        let (piece_type, color) = self.remove_piece(from);
        self.put_piece(piece_type, color, to);
    }

    /// Determines whether a square is attacked by any piece of a color.
    ///
    /// Attacks are computed from the target square: a piece of `by_color` attacks `square` if a piece of the same type
    /// standing on `square` would attack it.
    pub fn is_attacked(&self, square: Square, by_color: Color) -> bool {
        let occupied = self.occupied();
        let queens = self.pieces_of(by_color, PieceType::Queen);

        let bishops = self.pieces_of(by_color, PieceType::Bishop) | queens;
        let rooks = self.pieces_of(by_color, PieceType::Rook) | queens;

        (attacks_from_pawn(!by_color, square) & self.pieces_of(by_color, PieceType::Pawn)).has_any()
            || (knight_attacks(square) & self.pieces_of(by_color, PieceType::Knight)).has_any()
            || (king_attacks(square) & self.pieces_of(by_color, PieceType::King)).has_any()
            || (attacks_from_bishop(occupied, square) & bishops).has_any()
            || (attacks_from_rook(occupied, square) & rooks).has_any()
    }

    /// Determines if the king of the side to move is attacked.
    pub fn is_check(&self) -> bool {
        self.is_attacked(self.king_square(self.turn), !self.turn)
    }

    /// Returns the pseudo-legal moves of the side to move. See [`generate_moves`].
    pub fn pseudo_legal_moves(&self, only_captures: bool) -> Vec<Move> {
        generate_moves(self, only_captures)
    }

    /// Returns the legal moves of the side to move, or only the legal captures when `include_quiet` is false.
    ///
    /// A pseudo-legal move is legal if [`Position::make_move`] accepts it. Each accepted move is taken back right
    /// away, so the position is unchanged when this returns.
    pub fn legal_moves(&mut self, include_quiet: bool) -> Vec<Move> {
        let candidates = self.pseudo_legal_moves(!include_quiet);
        let mut moves = Vec::with_capacity(candidates.len());

        for mv in candidates {
            if self.make_move(mv) {
                self.unmake_move();
                moves.push(mv);
            }
        }

        moves
    }

    /// Returns the squares the rook leaves from and lands on when castling.
    fn castling_rook_squares(mv: Move) -> (Square, Square) {
        let rank = mv.from_square().rank();
        match mv.kind() {
            MoveKind::KingCastle => (Square::new(File::H, rank), Square::new(File::F, rank)),
            _ => (Square::new(File::A, rank), Square::new(File::D, rank)),
        }
    }

    /// Returns the squares the king stands on, passes through and lands on while castling.
    fn castling_king_path(mv: Move) -> [Square; 3] {
        let rank = mv.from_square().rank();
        let files = match mv.kind() {
            MoveKind::KingCastle => [File::E, File::F, File::G],
            _ => [File::E, File::D, File::C],
        };
        files.map(|file| Square::new(file, rank))
    }

    fn apply_placement(&mut self, mv: Move) {
        if mv.is_capture() {
            self.remove_piece(mv.capture_square());
        }

        if mv.is_castle() {
            let (rook_from, rook_to) = Self::castling_rook_squares(mv);
            self.move_piece(rook_from, rook_to);
        }

        self.move_piece(mv.from_square(), mv.to_square());

        if mv.is_promotion() {
            let (_, color) = self.remove_piece(mv.to_square());
            self.put_piece(mv.promoted_piece(), color, mv.to_square());
        }
    }

    fn revert_placement(&mut self, mv: Move, mover: Color) {
        if mv.is_promotion() {
            self.remove_piece(mv.to_square());
            self.put_piece(PieceType::Pawn, mover, mv.to_square());
        }

        self.move_piece(mv.to_square(), mv.from_square());

        if mv.is_castle() {
            let (rook_from, rook_to) = Self::castling_rook_squares(mv);
            self.move_piece(rook_to, rook_from);
        }

        if mv.is_capture() {
            self.put_piece(mv.captured_piece(), !mover, mv.capture_square());
        }
    }

    /// Applies a pseudo-legal move.
    ///
    /// Returns `false` and leaves the position untouched when the move would leave the mover's king attacked, or when a
    /// castling king would start on, pass through or land on an attacked square. Returns `true` otherwise.
    pub fn make_move(&mut self, mv: Move) -> bool {
        let mover = self.turn;

        if mv.is_castle() && Self::castling_king_path(mv).iter().any(|square| self.is_attacked(*square, !mover)) {
            return false;
        }

        let hash_before = self.hash;
        self.apply_placement(mv);

        if self.is_attacked(self.king_square(mover), !mover) {
            self.revert_placement(mv, mover);
            debug_assert_eq!(self.hash, hash_before);
            return false;
        }

        self.move_history.push(mv);
        self.irreversible_history.push(IrreversibleState {
            en_passant_square: self.en_passant_square,
            castling_rights: self.castling_rights,
            halfmove_clock: self.halfmove_clock,
        });
        self.hash_history.push(hash_before);

        self.hash.update_en_passant(&self.keys, self.en_passant_square);
        self.en_passant_square = match mv.kind() {
            MoveKind::DoublePawnPush => Some(mv.from_square().offset(mover.forward())),
            _ => None,
        };
        self.hash.update_en_passant(&self.keys, self.en_passant_square);

        let lost_rights = CASTLING_RIGHTS_MASK[mv.from_square().index()] | CASTLING_RIGHTS_MASK[mv.to_square().index()];
        if self.castling_rights.intersects(lost_rights) {
            self.hash.update_castling_rights(&self.keys, self.castling_rights);
            self.castling_rights &= !lost_rights;
            self.hash.update_castling_rights(&self.keys, self.castling_rights);
        }

        if mv.is_capture() || mv.piece() == PieceType::Pawn {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        if mover == Color::Black {
            self.fullmove_number += 1;
        }

        self.turn = !mover;
        self.hash.update_turn(&self.keys);

        true
    }

    /// Takes back the last applied move and returns it, or returns `None` when no move was applied.
    pub fn unmake_move(&mut self) -> Option<Move> {
        let mv = self.move_history.pop()?;
        let state = self.irreversible_history.pop()?;
        let previous_hash = self.hash_history.pop()?;

        self.turn = !self.turn;
        self.hash.update_turn(&self.keys);
        let mover = self.turn;

        if mover == Color::Black {
            self.fullmove_number -= 1;
        }

        self.revert_placement(mv, mover);

        self.hash.update_en_passant(&self.keys, self.en_passant_square);
        self.en_passant_square = state.en_passant_square;
        self.hash.update_en_passant(&self.keys, self.en_passant_square);

        self.hash.update_castling_rights(&self.keys, self.castling_rights);
        self.castling_rights = state.castling_rights;
        self.hash.update_castling_rights(&self.keys, self.castling_rights);

        self.halfmove_clock = state.halfmove_clock;

        debug_assert_eq!(self.hash, previous_hash);

        Some(mv)
    }

    /// Returns true when neither side has the material to deliver a checkmate: no pawn, rook or queen is left and
    /// either fewer than four pieces remain, or there is no knight and all the bishops stand on squares of one color.
    pub fn is_insufficient_material(&self) -> bool {
        if (self.pieces(PieceType::Pawn) | self.pieces(PieceType::Rook) | self.pieces(PieceType::Queen)).has_any() {
            return false;
        }

        if self.occupied().popcnt() < 4 {
            return true;
        }

        let bishops = self.pieces(PieceType::Bishop);
        self.pieces(PieceType::Knight).is_empty()
            && ((bishops & Bitboard::LIGHT_SQUARES).is_empty() || (bishops & Bitboard::DARK_SQUARES).is_empty())
    }

    /// Returns true when the current position already occurred twice before, so this is its third occurrence.
    pub fn is_repetition(&self) -> bool {
        self.hash_history.iter().filter(|hash| **hash == self.hash).count() >= 2
    }

    /// Returns true for the draws that do not depend on the legal moves: fifty-move rule, repetition and insufficient
    /// material. Draws are considered claimed as soon as they are available.
    pub fn is_draw(&self) -> bool {
        self.halfmove_clock >= 100 || self.is_repetition() || self.is_insufficient_material()
    }

    /// Returns the status of the game.
    pub fn status(&mut self) -> GameStatus {
        if self.legal_moves(true).is_empty() {
            return if self.is_check() { GameStatus::Checkmate } else { GameStatus::Stalemate };
        }

        if self.halfmove_clock >= 100 {
            GameStatus::FiftyMoveDraw
        } else if self.is_repetition() {
            GameStatus::RepetitionDraw
        } else if self.is_insufficient_material() {
            GameStatus::InsufficientMaterialDraw
        } else {
            GameStatus::Normal
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Position")
            .field("fen", &self.to_fen())
            .field("hash", &self.hash)
            .field("moves", &self.move_history.len())
            .finish()
    }
}

impl Index<Square> for Position {
    type Output = Option<PieceType>;
    fn index(&self, index: Square) -> &Self::Output {
        &self.board[index.index()]
    }
}
