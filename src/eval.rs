use std::fmt::Display;

use crate::{
    coordinates::Square,
    move_gen::generation::generate_moves_for,
    piece::{Color, PieceType},
    position::Position,
};

/// A simple wrapper around a 32-bit integer that represents the evaluation of a position in centipawns. Positive values
/// favor white and negative values favor black.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Eval(i32);

impl Eval {
    /// The largest number of plies a mate score can be distant from the root.
    const MAX_MATE_PLY: i32 = 1000;

    /// The minimum possible evaluation score
    pub const MIN: Eval = Eval(-i32::MAX);

    /// The maximum possible evaluation score
    pub const MAX: Eval = Eval(i32::MAX);

    /// The evaluation score of a checkmate delivered at the root.
    pub const MATE: Eval = Eval(1_000_000);

    /// The evaluation score for a draw.
    pub const DRAW: Eval = Eval(0);

    /// Creates a new Eval instance with the given value.
    pub const fn new(value: i32) -> Self {
        Eval(value)
    }

    /// Returns the score of the side to move being checkmated `ply` plies away from the root. Mates closer to the root
    /// are worth more to the winner.
    pub fn mated(color: Color, ply: u16) -> Self {
        debug_assert!(i32::from(ply) <= Self::MAX_MATE_PLY);

        let score = Self::MATE.0 - i32::from(ply);
        match color {
            Color::White => Eval(-score),
            Color::Black => Eval(score),
        }
    }

    /// Returns true if the score is a forced mate for one of the sides.
    pub fn is_mate(self) -> bool {
        self.0.abs() > Self::MATE.0 - Self::MAX_MATE_PLY
    }

    /// Returns the raw value in centipawns.
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl std::ops::Add for Eval {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Eval(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for Eval {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl std::ops::Sub for Eval {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Eval(self.0 - rhs.0)
    }
}

impl std::ops::SubAssign for Eval {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl std::ops::Mul<i32> for Eval {
    type Output = Self;
    fn mul(self, rhs: i32) -> Self {
        Eval(self.0 * rhs)
    }
}

impl std::ops::Neg for Eval {
    type Output = Self;
    fn neg(self) -> Self {
        Eval(-self.0)
    }
}

impl From<Eval> for i32 {
    fn from(value: Eval) -> Self {
        value.0
    }
}

impl From<i32> for Eval {
    fn from(value: i32) -> Self {
        Eval(value)
    }
}

/// Formats the evaluation score as a number of pawns with 2 decimal places, or as the distance to mate in plies.
///
/// An evaluation of 100 centipawns is displayed as "1.00". A mate for white in 3 plies is displayed as "#3" and a mate
/// for black as "#-3".
impl Display for Eval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_mate() {
            let ply = Self::MATE.0 - self.0.abs();
            write!(f, "#{}", if self.0 > 0 { ply } else { -ply })
        } else {
            write!(f, "{:.2}", self.0 as f32 / 100.0)
        }
    }
}

const PIECE_TYPE_VALUES: [Eval; PieceType::COUNT] =
    [Eval(100), Eval(320), Eval(330), Eval(500), Eval(900), Eval(0)];

/// Bonus for a side that still holds two bishops or more.
const BISHOP_PAIR_BONUS: Eval = Eval(50);

// The tables are written as seen from white's side of the board: the first row is rank 8 and the last row is rank 1.
// A white piece on a square reads the entry of the vertically flipped square, a black piece reads its own square.
#[rustfmt::skip]
const PIECE_TYPE_SQUARE_TABLES: [[i32; Square::COUNT]; PieceType::COUNT] = [
    // Pawn
    [
          0,   0,   0,   0,   0,   0,   0,   0,
         50,  50,  50,  50,  50,  50,  50,  50,
         10,  10,  20,  30,  30,  20,  10,  10,
          5,   5,  10,  25,  25,  10,   5,   5,
          0,   0,   0,  20,  20,   0,   0,   0,
          5,  -5, -10,   0,   0, -10,  -5,   5,
          5,  10,  10, -20, -20,  10,  10,   5,
          0,   0,   0,   0,   0,   0,   0,   0,
    ],
    // Knight
    [
        -50, -40, -30, -30, -30, -30, -40, -50,
        -40, -20,   0,   0,   0,   0, -20, -40,
        -30,   0,  10,  15,  15,  10,   0, -30,
        -30,   5,  15,  20,  20,  15,   5, -30,
        -30,   0,  15,  20,  20,  15,   0, -30,
        -30,   5,  10,  15,  15,  10,   5, -30,
        -40, -20,   0,   5,   5,   0, -20, -40,
        -50, -40, -30, -30, -30, -30, -40, -50,
    ],
    // Bishop
    [
        -20, -10, -10, -10, -10, -10, -10, -20,
        -10,   0,   0,   0,   0,   0,   0, -10,
        -10,   0,   5,  10,  10,   5,   0, -10,
        -10,   5,   5,  10,  10,   5,   5, -10,
        -10,   0,  10,  10,  10,  10,   0, -10,
        -10,  10,  10,  10,  10,  10,  10, -10,
        -10,   5,   0,   0,   0,   0,   5, -10,
        -20, -10, -10, -10, -10, -10, -10, -20,
    ],
    // Rook
    [
          0,   0,   0,   0,   0,   0,   0,   0,
          5,  10,  10,  10,  10,  10,  10,   5,
         -5,   0,   0,   0,   0,   0,   0,  -5,
         -5,   0,   0,   0,   0,   0,   0,  -5,
         -5,   0,   0,   0,   0,   0,   0,  -5,
         -5,   0,   0,   0,   0,   0,   0,  -5,
         -5,   0,   0,   0,   0,   0,   0,  -5,
          0,   0,   0,   5,   5,   0,   0,   0,
    ],
    // Queen
    [
        -20, -10, -10,  -5,  -5, -10, -10, -20,
        -10,   0,   0,   0,   0,   0,   0, -10,
        -10,   0,   5,   5,   5,   5,   0, -10,
         -5,   0,   5,   5,   5,   5,   0,  -5,
          0,   0,   5,   5,   5,   5,   0,  -5,
        -10,   5,   5,   5,   5,   5,   0, -10,
        -10,   0,   5,   0,   0,   0,   0, -10,
        -20, -10, -10,  -5,  -5, -10, -10, -20,
    ],
    // King
    [
        -30, -40, -40, -50, -50, -40, -40, -30,
        -30, -40, -40, -50, -50, -40, -40, -30,
        -30, -40, -40, -50, -50, -40, -40, -30,
        -30, -40, -40, -50, -50, -40, -40, -30,
        -20, -30, -30, -40, -40, -30, -30, -20,
        -10, -20, -20, -20, -20, -20, -20, -10,
         20,  20,   0,   0,   0,   0,  20,  20,
         20,  30,  10,   0,   0,  10,  30,  20,
    ],
];

/// Returns the material value of a piece type. The king is worth nothing since it can never be traded.
pub fn piece_value(piece_type: PieceType) -> Eval {
    PIECE_TYPE_VALUES[usize::from(piece_type)]
}

/// Returns the positional bonus of a piece of a color on a square, from the point of view of that color.
pub fn piece_square_value(piece_type: PieceType, color: Color, square: Square) -> Eval {
    let index = match color {
        Color::White => square.flip(),
        Color::Black => square,
    };
    Eval(PIECE_TYPE_SQUARE_TABLES[usize::from(piece_type)][index.index()])
}

/// Returns the material and positional score of one side, from the point of view of that side.
fn evaluate_side(position: &Position, color: Color) -> Eval {
    let mut score = Eval::DRAW;

    for piece_type in PieceType::ALL {
        for square in position.pieces_of(color, piece_type) {
            score += piece_value(piece_type) + piece_square_value(piece_type, color, square);
        }
    }

    if position.pieces_of(color, PieceType::Bishop).has_many() {
        score += BISHOP_PAIR_BONUS;
    }

    score
}

/// Evaluates the given position statically.
///
/// The score is the material balance, a bonus for holding the bishop pair and the piece-square bonus of every piece.
/// It is expressed from white's point of view whoever is to move.
pub fn evaluate(position: &Position) -> Eval {
    evaluate_side(position, Color::White) - evaluate_side(position, Color::Black)
}

/// Returns the number of pseudo-legal moves a side has in the position, whether or not it is its turn to move.
///
/// Mobility is not part of [`evaluate`].
pub fn mobility(position: &Position, color: Color) -> usize {
    generate_moves_for(position, color, false).len()
}
