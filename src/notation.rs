use thiserror::Error;

use crate::{
    coordinates::{CoordinatesError, Square},
    piece::{PieceError, PieceType},
    position::Position,
    r#move::Move,
};

/// Represents errors that can occur when parsing chess move notation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NotationError {
    /// Error when the source square coordinates in the notation are invalid.
    #[error("Invalid from square: {0}")]
    InvalidFromSquare(CoordinatesError),

    /// Error when the destination square coordinates in the notation are invalid.
    #[error("Invalid to square: {0}")]
    InvalidToSquare(CoordinatesError),

    /// Error when the promotion piece notation is invalid.
    #[error("Invalid promotion piece: {0}")]
    InvalidPromotionPiece(PieceError),

    /// Error when the overall notation format is incorrect.
    #[error("Invalid notation: {0}")]
    InvalidNotation(String),

    /// Error when there is no piece of the side to move at the specified source square.
    #[error("There is not a piece of the side to move at the from square: {0}")]
    NoPieceAtFromSquare(Square),

    /// Error when the notation is well formed but names no legal move.
    #[error("Illegal move: {0}")]
    IllegalMove(String),
}

/// Parses a move and resolves it against the legal moves of the position.
///
/// Two forms are accepted:
/// * coordinate notation: the source square, the destination square and an optional promotion piece (`e2e4`, `e1g1`,
///   `e7e8q`). Castling is written as the king move.
/// * the long algebraic text produced by [`Move::to_long_algebraic`] (`Ng1-f3`, `e5xd6e.p.`, `0-0`).
///
/// # Parameters
/// * `position` - The current chess position. It is left unchanged.
/// * `notation` - The move text
///
/// # Errors
/// * `InvalidFromSquare` / `InvalidToSquare` - If a square of a coordinate move is invalid
/// * `InvalidPromotionPiece` - If the promotion piece is not a letter naming a piece
/// * `NoPieceAtFromSquare` - If the side to move has no piece on the source square
/// * `InvalidNotation` - If the text has neither shape
/// * `IllegalMove` - If the text is well formed but no legal move matches it
pub fn parse_coordinate_notation(position: &mut Position, notation: &str) -> Result<Move, NotationError> {
    let notation = notation.trim();
    let legal_moves = position.legal_moves(true);

    if let Some(mv) = legal_moves.iter().find(|mv| mv.to_long_algebraic() == notation) {
        return Ok(*mv);
    }

    if !notation.is_ascii() || !(4..=5).contains(&notation.len()) {
        return Err(NotationError::InvalidNotation(notation.to_string()));
    }

    let from = Square::try_from(&notation[0..2]).map_err(NotationError::InvalidFromSquare)?;
    let to = Square::try_from(&notation[2..4]).map_err(NotationError::InvalidToSquare)?;
    let promotion = notation[4..]
        .chars()
        .next()
        .map(|c| PieceType::try_from(c).map_err(NotationError::InvalidPromotionPiece))
        .transpose()?;

    if position.color_at(from) != Some(position.turn()) {
        return Err(NotationError::NoPieceAtFromSquare(from));
    }

    legal_moves
        .into_iter()
        .find(|mv| {
            mv.from_square() == from
                && mv.to_square() == to
                && match promotion {
                    Some(piece) => mv.is_promotion() && mv.promoted_piece() == piece,
                    None => !mv.is_promotion(),
                }
        })
        .ok_or_else(|| NotationError::IllegalMove(notation.to_string()))
}
