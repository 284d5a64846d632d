use once_cell::sync::Lazy;

use crate::{
    bitboard::{king_attacks, knight_attacks, Bitboard, Direction},
    coordinates::Square,
    piece::{Color, PieceType},
};

static PAWN_ATTACKS: Lazy<[[Bitboard; Square::COUNT]; Color::COUNT]> = Lazy::new(|| {
    let mut attacks = [[Bitboard::EMPTY; Square::COUNT]; Color::COUNT];
    for square in Square::ALL {
        let from = Bitboard::from(square);
        attacks[usize::from(Color::White)][usize::from(square)] =
            from.step(Direction::NorthEast) | from.step(Direction::NorthWest);
        attacks[usize::from(Color::Black)][usize::from(square)] =
            from.step(Direction::SouthEast) | from.step(Direction::SouthWest);
    }
    attacks
});

/// Returns the squares attacked by a slider on `from_sq` moving in the given directions.
///
/// Each ray is cast one step at a time. A ray stops on the first occupied square it reaches, and that square is part of
/// the attacks whatever the color of the piece on it.
fn sliding_attacks(occupied: Bitboard, from_sq: Square, directions: &[Direction]) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;

    for direction in directions {
        let mut ray = Bitboard::from(from_sq).step(*direction);
        while ray.has_any() {
            attacks |= ray;
            if (ray & occupied).has_any() {
                break;
            }
            ray = ray.step(*direction);
        }
    }

    attacks
}

/// Returns a bitboard with all squares attacked by a bishop on a given square.
pub fn attacks_from_bishop(occupied: Bitboard, from_sq: Square) -> Bitboard {
    sliding_attacks(occupied, from_sq, &Direction::DIAGONALS)
}

/// Returns a bitboard with all squares attacked by a rook on a given square.
pub fn attacks_from_rook(occupied: Bitboard, from_sq: Square) -> Bitboard {
    sliding_attacks(occupied, from_sq, &Direction::ORTHOGONALS)
}

/// Returns a bitboard with all squares attacked by a queen on a given square.
pub fn attacks_from_queen(occupied: Bitboard, from_sq: Square) -> Bitboard {
    attacks_from_bishop(occupied, from_sq) | attacks_from_rook(occupied, from_sq)
}

/// Returns the squares a pawn of `color` standing on `from_sq` attacks.
pub fn attacks_from_pawn(color: Color, from_sq: Square) -> Bitboard {
    PAWN_ATTACKS[usize::from(color)][usize::from(from_sq)]
}

/// Returns the squares attacked by a piece of any type other than pawn. The occupancy is only used by sliders.
pub fn attacks_from(piece_type: PieceType, occupied: Bitboard, from_sq: Square) -> Bitboard {
    match piece_type {
        PieceType::Knight => knight_attacks(from_sq),
        PieceType::Bishop => attacks_from_bishop(occupied, from_sq),
        PieceType::Rook => attacks_from_rook(occupied, from_sq),
        PieceType::Queen => attacks_from_queen(occupied, from_sq),
        PieceType::King => king_attacks(from_sq),
        PieceType::Pawn => panic!("Pawn attacks depend on the color, use attacks_from_pawn"),
    }
}
