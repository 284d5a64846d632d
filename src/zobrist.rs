use std::sync::Arc;

use once_cell::sync::Lazy;
use rand::{rngs::StdRng, RngCore, SeedableRng};
use tracing::debug;

use crate::{
    coordinates::{File, Square},
    piece::{Color, PieceType},
    r#move::CastlingRights,
};

/// The random keys used to compute Zobrist hashes.
///
/// The table holds one key for the side to move, one key per (piece type, color, square), one key per 4-bit castling
/// rights value and one key per en passant file. Key tables built from the same seed are identical, which makes hashes
/// reproducible in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZobristKeys {
    turn: u64,
    pieces: [[[u64; Square::COUNT]; Color::COUNT]; PieceType::COUNT],
    castling: [u64; CastlingRights::COUNT],
    en_passant: [u64; File::COUNT],
}

static GLOBAL_KEYS: Lazy<Arc<ZobristKeys>> = Lazy::new(|| {
    let seed: u64 = rand::random();
    debug!(seed, "Generating the process wide Zobrist keys");
    Arc::new(ZobristKeys::new(seed))
});

impl ZobristKeys {
    /// Builds a key table from a seed.
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let turn = rng.next_u64();

        let mut pieces = [[[0; Square::COUNT]; Color::COUNT]; PieceType::COUNT];
        for colors in pieces.iter_mut() {
            for squares in colors.iter_mut() {
                for key in squares.iter_mut() {
                    *key = rng.next_u64();
                }
            }
        }

        // The index zero (no castling rights) keeps the value 0 so that the hash of an empty board is zero.
        let mut castling = [0; CastlingRights::COUNT];
        for key in castling.iter_mut().skip(1) {
            *key = rng.next_u64();
        }

        let mut en_passant = [0; File::COUNT];
        for key in en_passant.iter_mut() {
            *key = rng.next_u64();
        }

        Self { turn, pieces, castling, en_passant }
    }

    /// Returns the process wide key table. It is generated from a random seed the first time it is requested and
    /// shared afterward.
    pub fn global() -> Arc<ZobristKeys> {
        GLOBAL_KEYS.clone()
    }
}

/// An incrementally updated 64-bit fingerprint of a game state.
///
/// Every update XORs a key into the hash, so applying the same update twice leaves the hash unchanged. The same call is
/// used both to add and to remove a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Zobrist(u64);

impl Zobrist {
    /// The hash of an empty, unset state.
    pub const EMPTY: Zobrist = Zobrist(0);

    /// Returns the raw 64-bit value of the hash.
    pub fn value(self) -> u64 {
        self.0
    }

    /// Toggles the side to move.
    pub fn update_turn(&mut self, keys: &ZobristKeys) {
        self.0 ^= keys.turn;
    }

    /// Toggles a piece of a color on a square.
    pub fn update_piece(&mut self, keys: &ZobristKeys, piece_type: PieceType, color: Color, square: Square) {
        self.0 ^= keys.pieces[usize::from(piece_type)][usize::from(color)][usize::from(square)];
    }

    /// Toggles a complete castling rights value. The four bits are hashed together, not one by one.
    pub fn update_castling_rights(&mut self, keys: &ZobristKeys, rights: CastlingRights) {
        self.0 ^= keys.castling[usize::from(rights.bits())];
    }

    /// Toggles the en passant file of a square. Does nothing when there is no en passant square.
    pub fn update_en_passant(&mut self, keys: &ZobristKeys, square: Option<Square>) {
        if let Some(square) = square {
            self.0 ^= keys.en_passant[usize::from(square.file())];
        }
    }
}
