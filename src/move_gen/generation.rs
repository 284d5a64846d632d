use crate::{
    bitboard::Bitboard,
    coordinates::{File, Rank, Square},
    piece::{Color, PieceType},
    position::Position,
    r#move::{CastlingRights, CastlingSide, Move, MoveKind},
};

use super::attacks::{attacks_from, attacks_from_pawn};

/// Returns the rank of `rank` as seen from the side of `color`. Rank 1 for black is rank 8.
fn relative_rank(rank: Rank, color: Color) -> Rank {
    match color {
        Color::White => rank,
        Color::Black => Rank::from(7 - u8::from(rank)),
    }
}

fn push_promotions(from_sq: Square, to_sq: Square, captured: Option<PieceType>, moves: &mut Vec<Move>) {
    for promoted in PieceType::PROMOTIONS {
        let kind = MoveKind::promotion(promoted, captured.is_some());
        moves.push(Move::new(from_sq, to_sq, kind, PieceType::Pawn, captured.unwrap_or(PieceType::Pawn)));
    }
}

fn generate_pawn_moves(position: &Position, color: Color, only_captures: bool, moves: &mut Vec<Move>) {
    let forward = i32::from(color.forward());
    let pawns = position.pieces_of(color, PieceType::Pawn);
    let empty = !position.occupied();
    let them = position.colors(!color);
    let bb_last_rank = Bitboard::rank(relative_rank(Rank::R8, color));
    let bb_double_push_rank = Bitboard::rank(relative_rank(Rank::R4, color));

    if !only_captures {
        // Single pushes
        let single_pushes = pawns.shift(forward) & empty;
        for to_sq in single_pushes.and_not(bb_last_rank) {
            let from_sq = to_sq.offset(-color.forward());
            moves.push(Move::new_quiet(from_sq, to_sq, MoveKind::Quiet, PieceType::Pawn));
        }

        // Double pushes, from the home rank through two empty squares
        let double_pushes = single_pushes.shift(forward) & empty & bb_double_push_rank;
        for to_sq in double_pushes {
            let from_sq = to_sq.offset(-2 * color.forward());
            moves.push(Move::new_quiet(from_sq, to_sq, MoveKind::DoublePawnPush, PieceType::Pawn));
        }

        // Pushes onto the last rank
        for to_sq in single_pushes & bb_last_rank {
            push_promotions(to_sq.offset(-color.forward()), to_sq, None, moves);
        }
    }

    // Captures, and capturing promotions
    for from_sq in pawns {
        for to_sq in attacks_from_pawn(color, from_sq) & them {
            let captured = position.piece_at(to_sq);
            if bb_last_rank.get(to_sq) {
                push_promotions(from_sq, to_sq, captured, moves);
            } else if let Some(captured) = captured {
                moves.push(Move::new(from_sq, to_sq, MoveKind::Capture, PieceType::Pawn, captured));
            }
        }
    }

    // En passant. The candidate capturers are the pawns that would attack the en passant square if they were of the
    // other color.
    if let Some(ep_sq) = position.en_passant_square().filter(|_| color == position.turn()) {
        for from_sq in attacks_from_pawn(!color, ep_sq) & pawns {
            moves.push(Move::new(from_sq, ep_sq, MoveKind::EnPassant, PieceType::Pawn, PieceType::Pawn));
        }
    }
}

fn generate_piece_moves(
    position: &Position,
    color: Color,
    piece_type: PieceType,
    targets: Bitboard,
    moves: &mut Vec<Move>,
) {
    let occupied = position.occupied();

    for from_sq in position.pieces_of(color, piece_type) {
        for to_sq in attacks_from(piece_type, occupied, from_sq) & targets {
            match position.piece_at(to_sq) {
                Some(captured) => moves.push(Move::new(from_sq, to_sq, MoveKind::Capture, piece_type, captured)),
                None => moves.push(Move::new_quiet(from_sq, to_sq, MoveKind::Quiet, piece_type)),
            }
        }
    }
}

/// Generates a castling move when the right is still available and the squares between the king and the rook are
/// empty. Whether the king passes through an attacked square is verified when the move is made.
fn generate_castling(position: &Position, color: Color, side: CastlingSide, moves: &mut Vec<Move>) {
    if !position.castling_rights().contains(CastlingRights::new(color, side)) {
        return;
    }

    let rank = relative_rank(Rank::R1, color);
    let king_sq = Square::new(File::E, rank);
    let (rook_file, king_final_file, between) = match side {
        CastlingSide::Kingside => (File::H, File::G, [File::F, File::G].as_slice()),
        CastlingSide::Queenside => (File::A, File::C, [File::B, File::C, File::D].as_slice()),
    };

    if !position.pieces_of(color, PieceType::King).get(king_sq)
        || !position.pieces_of(color, PieceType::Rook).get(Square::new(rook_file, rank))
    {
        return;
    }

    let occupied = position.occupied();
    if between.iter().any(|file| occupied.get(Square::new(*file, rank))) {
        return;
    }

    let kind = match side {
        CastlingSide::Kingside => MoveKind::KingCastle,
        CastlingSide::Queenside => MoveKind::QueenCastle,
    };
    moves.push(Move::new_quiet(king_sq, Square::new(king_final_file, rank), kind, PieceType::King));
}

/// Generates the pseudo-legal moves of the side to move: moves that follow the movement rules of the pieces but may
/// leave the own king in check.
///
/// With `only_captures` set, only moves that take a piece are generated (en passant and capturing promotions
/// included). Castling is never a capture.
pub fn generate_moves(position: &Position, only_captures: bool) -> Vec<Move> {
    generate_moves_for(position, position.turn(), only_captures)
}

/// Generates the pseudo-legal moves of `color`, whether or not it is its turn to move. En passant captures are only
/// generated for the side to move.
pub fn generate_moves_for(position: &Position, color: Color, only_captures: bool) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    let targets = if only_captures { position.colors(!color) } else { !position.colors(color) };

    generate_pawn_moves(position, color, only_captures, &mut moves);
    for piece_type in [PieceType::Knight, PieceType::Bishop, PieceType::Rook, PieceType::Queen, PieceType::King] {
        generate_piece_moves(position, color, piece_type, targets, &mut moves);
    }

    if !only_captures {
        generate_castling(position, color, CastlingSide::Kingside, &mut moves);
        generate_castling(position, color, CastlingSide::Queenside, &mut moves);
    }

    moves
}
