use std::fmt::Display;

use bitflags::bitflags;

use crate::{
    coordinates::{Rank, Square},
    piece::{Color, PieceType},
};

/// The two sides a king can castle to.
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CastlingSide {
    Kingside = 0,
    Queenside = 1,
}

impl CastlingSide {
    /// Number of castling sides.
    pub const COUNT: usize = 2;

    /// Both castling sides.
    pub const ALL: [CastlingSide; CastlingSide::COUNT] = [CastlingSide::Kingside, CastlingSide::Queenside];
}

bitflags! {
    /// Castling availability for both colors, stored in 4 bits. The bit of a right is at index
    /// `color + (kingside ? 0 : 2)`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CastlingRights: u8 {
        const WHITE_KINGSIDE = 0b0001;
        const BLACK_KINGSIDE = 0b0010;
        const WHITE_QUEENSIDE = 0b0100;
        const BLACK_QUEENSIDE = 0b1000;
    }
}

impl CastlingRights {
    /// Number of distinct castling rights values.
    pub const COUNT: usize = 16;

    /// Returns the single right of a color for a castling side.
    pub fn new(color: Color, side: CastlingSide) -> Self {
        let index = color as u8 + 2 * side as u8;
        CastlingRights::from_bits_retain(1 << index)
    }

    /// Returns both rights of a color.
    pub fn for_color(color: Color) -> Self {
        Self::new(color, CastlingSide::Kingside) | Self::new(color, CastlingSide::Queenside)
    }
}

/// The kind of a move, stored in 4 bits.
///
/// Bit 2 marks captures and bit 3 marks promotions. For promotions the two low bits select the promoted piece among
/// knight, bishop, rook and queen. The values 6 and 7 are unused.
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum MoveKind {
    Quiet = 0,
    DoublePawnPush = 1,
    KingCastle = 2,
    QueenCastle = 3,
    Capture = 4,
    EnPassant = 5,
    KnightPromotion = 8,
    BishopPromotion = 9,
    RookPromotion = 10,
    QueenPromotion = 11,
    KnightPromotionCapture = 12,
    BishopPromotionCapture = 13,
    RookPromotionCapture = 14,
    QueenPromotionCapture = 15,
}

impl MoveKind {
    const CAPTURE_FLAG: u8 = 0b0100;
    const PROMOTION_FLAG: u8 = 0b1000;

    /// Returns the promotion kind for a promoted piece. Panics if the piece is not a knight, bishop, rook or queen.
    pub fn promotion(promoted: PieceType, capture: bool) -> MoveKind {
        let index = PieceType::PROMOTIONS
            .iter()
            .position(|piece| *piece == promoted)
            .unwrap_or_else(|| panic!("A pawn can not promote to a {promoted}"));
        let capture_flag = if capture { Self::CAPTURE_FLAG } else { 0 };
        MoveKind::from(Self::PROMOTION_FLAG | capture_flag | index as u8)
    }

    /// Returns true for captures, including en passant and capturing promotions.
    pub fn is_capture(self) -> bool {
        self as u8 & Self::CAPTURE_FLAG != 0
    }

    /// Returns true for the eight promotion kinds.
    pub fn is_promotion(self) -> bool {
        self as u8 & Self::PROMOTION_FLAG != 0
    }

    /// Returns true for both castling kinds.
    pub fn is_castle(self) -> bool {
        matches!(self, MoveKind::KingCastle | MoveKind::QueenCastle)
    }

    /// Returns the promoted piece, or pawn when the kind is not a promotion.
    pub fn promoted_piece(self) -> PieceType {
        if self.is_promotion() {
            PieceType::PROMOTIONS[(self as u8 & 0b11) as usize]
        } else {
            PieceType::Pawn
        }
    }
}

impl From<u8> for MoveKind {
    /// Decodes a 4-bit move kind. Panics on the unused values 6 and 7 or on values above 15.
    fn from(value: u8) -> Self {
        match value {
            0 => MoveKind::Quiet,
            1 => MoveKind::DoublePawnPush,
            2 => MoveKind::KingCastle,
            3 => MoveKind::QueenCastle,
            4 => MoveKind::Capture,
            5 => MoveKind::EnPassant,
            8 => MoveKind::KnightPromotion,
            9 => MoveKind::BishopPromotion,
            10 => MoveKind::RookPromotion,
            11 => MoveKind::QueenPromotion,
            12 => MoveKind::KnightPromotionCapture,
            13 => MoveKind::BishopPromotionCapture,
            14 => MoveKind::RookPromotionCapture,
            15 => MoveKind::QueenPromotionCapture,
            _ => panic!("Invalid move kind: {value}"),
        }
    }
}

/// A chess move, packed in 32 bits.
///
/// Bits     Content
/// -------  ---------
///  0 - 5   From square
///  6 - 11  To square
/// 12 - 15  Move kind
/// 16 - 18  Moving piece
/// 19 - 21  Captured piece (pawn when the move is not a capture)
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Move(u32);

impl Move {
    /// Creates a move. `captured` is only meaningful for captures and should be `PieceType::Pawn` otherwise.
    pub fn new(from: Square, to: Square, kind: MoveKind, piece: PieceType, captured: PieceType) -> Self {
        let captured = if kind.is_capture() { captured } else { PieceType::Pawn };
        Move(
            u8::from(from) as u32
                | (u8::from(to) as u32) << 6
                | (kind as u32) << 12
                | (u8::from(piece) as u32) << 16
                | (u8::from(captured) as u32) << 19,
        )
    }

    /// Creates a move that does not capture anything.
    pub fn new_quiet(from: Square, to: Square, kind: MoveKind, piece: PieceType) -> Self {
        debug_assert!(!kind.is_capture());
        Self::new(from, to, kind, piece, PieceType::Pawn)
    }

    /// Returns the source square of the move.
    pub fn from_square(self) -> Square {
        Square::from((self.0 & 0b11_1111) as u8)
    }

    /// Returns the destination square of the move.
    pub fn to_square(self) -> Square {
        Square::from((self.0 >> 6 & 0b11_1111) as u8)
    }

    /// Returns the kind of the move.
    pub fn kind(self) -> MoveKind {
        MoveKind::from((self.0 >> 12 & 0b1111) as u8)
    }

    /// Returns the type of the moving piece.
    pub fn piece(self) -> PieceType {
        PieceType::from((self.0 >> 16 & 0b111) as u8)
    }

    /// Returns the captured piece. The value is only meaningful when `is_capture()` is true; other moves return pawn.
    pub fn captured_piece(self) -> PieceType {
        PieceType::from((self.0 >> 19 & 0b111) as u8)
    }

    pub fn is_capture(self) -> bool {
        self.kind().is_capture()
    }

    pub fn is_promotion(self) -> bool {
        self.kind().is_promotion()
    }

    pub fn is_castle(self) -> bool {
        self.kind().is_castle()
    }

    /// Returns the promoted piece, or pawn when the move is not a promotion.
    pub fn promoted_piece(self) -> PieceType {
        self.kind().promoted_piece()
    }

    /// Returns the square of the captured piece. It is the destination square, except for en passant captures where it
    /// is the square right behind the destination, from the point of view of the moving side.
    pub fn capture_square(self) -> Square {
        if self.kind() != MoveKind::EnPassant {
            return self.to_square();
        }

        // An en passant destination is on the 6th rank for white and on the 3rd rank for black.
        let mover = if self.to_square().rank() == Rank::R6 { Color::White } else { Color::Black };
        self.to_square().offset(-mover.forward())
    }

    /// Returns the raw packed value of the move.
    pub fn value(self) -> u32 {
        self.0
    }

    /// Renders the move in long algebraic notation: `e2-e4`, `Ng1-f3`, `Bb5xc6`, `e5xd6e.p.`, `e7-e8Q`, `0-0`.
    pub fn to_long_algebraic(self) -> String {
        match self.kind() {
            MoveKind::KingCastle => return String::from("0-0"),
            MoveKind::QueenCastle => return String::from("0-0-0"),
            _ => {}
        }

        let mut result = String::with_capacity(10);
        if self.piece() != PieceType::Pawn {
            result.push(self.piece().to_char());
        }
        result.push_str(&self.from_square().to_string());
        result.push(if self.is_capture() { 'x' } else { '-' });
        result.push_str(&self.to_square().to_string());
        if self.kind() == MoveKind::EnPassant {
            result.push_str("e.p.");
        }
        if self.is_promotion() {
            result.push(self.promoted_piece().to_char());
        }
        result
    }

    /// Renders the move in coordinate notation: `e2e4`, `e1g1`, `e7e8q`.
    pub fn to_coordinate_notation(self) -> String {
        let mut result = format!("{}{}", self.from_square(), self.to_square());
        if self.is_promotion() {
            result.push(self.promoted_piece().to_char().to_ascii_lowercase());
        }
        result
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_long_algebraic())
    }
}
