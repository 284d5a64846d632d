use once_cell::sync::Lazy;

use crate::coordinates::{File, Rank, Square};

/// A bitboard is a 64-bit integer that represents a set of squares. Bit `i` is set when square `i` is a member of the
/// set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bitboard(u64);

impl Bitboard {
    /// Represents an empty bitboard.
    pub const EMPTY: Bitboard = Bitboard(0);

    /// Represents a filled bitboard.
    pub const ALL: Bitboard = Bitboard(u64::MAX);

    /// All the light squares (h1, a2, ...).
    pub const LIGHT_SQUARES: Bitboard = Bitboard(0x55aa_55aa_55aa_55aa);

    /// All the dark squares (a1, c1, ...).
    pub const DARK_SQUARES: Bitboard = Bitboard(0xaa55_aa55_aa55_aa55);

    /// One bitboard per file, from A to H.
    pub const FILES: [Bitboard; File::COUNT] = {
        let mut files = [Bitboard(0); File::COUNT];
        let mut file = 0;
        while file < File::COUNT {
            files[file] = Bitboard(0x0101_0101_0101_0101 << file);
            file += 1;
        }
        files
    };

    /// One bitboard per rank, from 1 to 8.
    pub const RANKS: [Bitboard; Rank::COUNT] = {
        let mut ranks = [Bitboard(0); Rank::COUNT];
        let mut rank = 0;
        while rank < Rank::COUNT {
            ranks[rank] = Bitboard(0xff << (8 * rank));
            rank += 1;
        }
        ranks
    };

    /// The fifteen a1-h8 oriented diagonals, indexed by `file - rank + 7`.
    pub const DIAGONALS: [Bitboard; 15] = {
        let mut diagonals = [Bitboard(0); 15];
        let mut square = 0;
        while square < Square::COUNT {
            let index = (square % 8) + 7 - (square / 8);
            diagonals[index].0 |= 1 << square;
            square += 1;
        }
        diagonals
    };

    /// The fifteen h1-a8 oriented anti-diagonals, indexed by `file + rank`.
    pub const ANTI_DIAGONALS: [Bitboard; 15] = {
        let mut anti_diagonals = [Bitboard(0); 15];
        let mut square = 0;
        while square < Square::COUNT {
            let index = (square % 8) + (square / 8);
            anti_diagonals[index].0 |= 1 << square;
            square += 1;
        }
        anti_diagonals
    };

    /// Creates a bitboard from its raw 64-bit value.
    pub const fn new(value: u64) -> Bitboard {
        Bitboard(value)
    }

    /// Returns the raw 64-bit value of the bitboard.
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Returns the bitboard of a file.
    pub fn file(file: File) -> Bitboard {
        Self::FILES[usize::from(file)]
    }

    /// Returns the bitboard of a rank.
    pub fn rank(rank: Rank) -> Bitboard {
        Self::RANKS[usize::from(rank)]
    }

    /// Returns the a1-h8 oriented diagonal that goes through a square.
    pub fn diagonal(square: Square) -> Bitboard {
        Self::DIAGONALS[usize::from(square.file()) + 7 - usize::from(square.rank())]
    }

    /// Returns the h1-a8 oriented anti-diagonal that goes through a square.
    pub fn anti_diagonal(square: Square) -> Bitboard {
        Self::ANTI_DIAGONALS[usize::from(square.file()) + usize::from(square.rank())]
    }

    /// Returns whether a square is a member of the set.
    pub fn get(self, square: Square) -> bool {
        self.0 & (1u64 << u8::from(square)) != 0
    }

    /// Adds a square to the set.
    pub fn set(&mut self, square: Square) {
        self.0 |= 1u64 << u8::from(square);
    }

    /// Removes a square from the set.
    pub fn clear(&mut self, square: Square) {
        self.0 &= !(1u64 << u8::from(square));
    }

    /// Returns the squares of `self` that are not in `other`.
    pub fn and_not(self, other: Bitboard) -> Bitboard {
        Bitboard(self.0 & !other.0)
    }

    /// Shifts every member of the set by `amount` square indices. Positive amounts shift towards h8, negative amounts
    /// towards a1. Members shifted out of the board are lost, and shifting by 64 or more in either direction yields an
    /// empty set.
    pub fn shift(self, amount: i32) -> Bitboard {
        match amount {
            64.. | ..=-64 => Bitboard::EMPTY,
            0.. => Bitboard(self.0 << amount),
            _ => Bitboard(self.0 >> -amount),
        }
    }

    /// Moves every member one step in a direction, dropping the ones that would wrap around the board edge.
    pub fn step(self, direction: Direction) -> Bitboard {
        self.shift(direction.offset()) & direction.landing_mask()
    }

    /// Returns the number of set bits in the bitboard.
    pub fn popcnt(self) -> u32 {
        self.0.count_ones()
    }

    /// Returns the least significant member of the set.
    ///
    /// # Panics
    /// Panics if the bitboard is empty.
    pub fn lsb(self) -> Square {
        assert!(self.0 != 0, "lsb() called on an empty bitboard");
        Square::from(self.0.trailing_zeros() as u8)
    }

    /// Returns the least significant member of the set and removes it.
    ///
    /// # Panics
    /// Panics if the bitboard is empty.
    pub fn pop_lsb(&mut self) -> Square {
        let square = self.lsb();
        self.0 &= self.0 - 1;
        square
    }

    /// Returns whether the bitboard is empty.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns whether the bitboard has at least one member.
    pub fn has_any(self) -> bool {
        self.0 != 0
    }

    /// Returns whether the bitboard has more than one member.
    pub fn has_many(self) -> bool {
        self.0 & self.0.wrapping_sub(1) != 0
    }
}

/// One of the eight directions a piece can move in, one square at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    /// Directions a rook slides in.
    pub const ORTHOGONALS: [Direction; 4] = [Direction::North, Direction::South, Direction::East, Direction::West];

    /// Directions a bishop slides in.
    pub const DIAGONALS: [Direction; 4] =
        [Direction::NorthEast, Direction::NorthWest, Direction::SouthEast, Direction::SouthWest];

    /// Returns the square index offset of one step in this direction.
    pub fn offset(self) -> i32 {
        match self {
            Direction::North => 8,
            Direction::South => -8,
            Direction::East => 1,
            Direction::West => -1,
            Direction::NorthEast => 9,
            Direction::NorthWest => 7,
            Direction::SouthEast => -7,
            Direction::SouthWest => -9,
        }
    }

    /// Squares a one step shift in this direction can legally land on. A step east can never land on file A, a step
    /// west can never land on file H.
    fn landing_mask(self) -> Bitboard {
        match self {
            Direction::North | Direction::South => Bitboard::ALL,
            Direction::East | Direction::NorthEast | Direction::SouthEast => !Bitboard::FILES[0],
            Direction::West | Direction::NorthWest | Direction::SouthWest => !Bitboard::FILES[7],
        }
    }
}

static KNIGHT_ATTACKS: Lazy<[Bitboard; Square::COUNT]> = Lazy::new(|| {
    let not_a = !Bitboard::FILES[0];
    let not_ab = !(Bitboard::FILES[0] | Bitboard::FILES[1]);
    let not_h = !Bitboard::FILES[7];
    let not_gh = !(Bitboard::FILES[6] | Bitboard::FILES[7]);

    // (shift, squares the shift may land on)
    let jumps = [
        (17, not_a),
        (15, not_h),
        (10, not_ab),
        (6, not_gh),
        (-6, not_ab),
        (-10, not_gh),
        (-15, not_a),
        (-17, not_h),
    ];

    let mut attacks = [Bitboard::EMPTY; Square::COUNT];
    for square in Square::ALL {
        let from = Bitboard::from(square);
        attacks[usize::from(square)] =
            jumps.iter().fold(Bitboard::EMPTY, |acc, (shift, mask)| acc | (from.shift(*shift) & *mask));
    }
    attacks
});

static KING_ATTACKS: Lazy<[Bitboard; Square::COUNT]> = Lazy::new(|| {
    let mut attacks = [Bitboard::EMPTY; Square::COUNT];
    for square in Square::ALL {
        let from = Bitboard::from(square);
        attacks[usize::from(square)] = Direction::ORTHOGONALS
            .iter()
            .chain(Direction::DIAGONALS.iter())
            .fold(Bitboard::EMPTY, |acc, direction| acc | from.step(*direction));
    }
    attacks
});

/// Returns the squares a knight on `square` attacks.
pub fn knight_attacks(square: Square) -> Bitboard {
    KNIGHT_ATTACKS[usize::from(square)]
}

/// Returns the squares a king on `square` attacks.
pub fn king_attacks(square: Square) -> Bitboard {
    KING_ATTACKS[usize::from(square)]
}

impl From<Square> for Bitboard {
    fn from(square: Square) -> Self {
        Bitboard(1u64 << u8::from(square))
    }
}

impl From<File> for Bitboard {
    fn from(file: File) -> Self {
        Bitboard::file(file)
    }
}

impl From<Rank> for Bitboard {
    fn from(rank: Rank) -> Self {
        Bitboard::rank(rank)
    }
}

impl std::ops::BitAnd for Bitboard {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 & rhs.0)
    }
}

impl std::ops::BitOr for Bitboard {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 | rhs.0)
    }
}

impl std::ops::BitOr<Square> for Bitboard {
    type Output = Self;
    fn bitor(self, rhs: Square) -> Self::Output {
        self | Bitboard::from(rhs)
    }
}

impl std::ops::BitOr<Square> for Square {
    type Output = Bitboard;
    fn bitor(self, rhs: Square) -> Self::Output {
        Bitboard::from(self) | Bitboard::from(rhs)
    }
}

impl std::ops::BitXor for Bitboard {
    type Output = Self;
    fn bitxor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 ^ rhs.0)
    }
}

impl std::ops::BitXor<Square> for Bitboard {
    type Output = Self;
    fn bitxor(self, rhs: Square) -> Self::Output {
        self ^ Bitboard::from(rhs)
    }
}

impl std::ops::Not for Bitboard {
    type Output = Self;
    fn not(self) -> Self::Output {
        Bitboard(!self.0)
    }
}

impl std::ops::BitAndAssign for Bitboard {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl std::ops::BitOrAssign for Bitboard {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::ops::BitOrAssign<Square> for Bitboard {
    fn bitor_assign(&mut self, rhs: Square) {
        *self |= Bitboard::from(rhs);
    }
}

impl std::ops::BitXorAssign for Bitboard {
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

impl std::ops::BitXorAssign<Square> for Bitboard {
    fn bitxor_assign(&mut self, rhs: Square) {
        *self ^= Bitboard::from(rhs);
    }
}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = BitboardIterator;

    fn into_iter(self) -> Self::IntoIter {
        BitboardIterator(self)
    }
}

/// An iterator over the set bits in a bitboard, from a1 to h8.
pub struct BitboardIterator(Bitboard);

impl Iterator for BitboardIterator {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0.is_empty() {
            return None;
        }

        Some(self.0.pop_lsb())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitboard_from_square() {
        assert_eq!(Bitboard(0x0000000000000001), Square::A1.into());
        assert_eq!(Bitboard(0x0000000000000100), Square::A2.into());
        assert_eq!(Bitboard(0x0000000000000080), Square::H1.into());
        assert_eq!(Bitboard(0x0100000000000000), Square::A8.into());
        assert_eq!(Bitboard(0x8000000000000000), Square::H8.into());
    }

    #[test]
    fn test_bitboard_get_set_clear() {
        let mut bb = Bitboard::EMPTY;
        bb.set(Square::E2);
        for square in Square::ALL {
            assert!(Bitboard::ALL.get(square));
            assert!(!Bitboard::EMPTY.get(square));
            assert_eq!(bb.get(square), square == Square::E2);
        }

        bb.clear(Square::E2);
        assert_eq!(bb, Bitboard::EMPTY);
    }

    #[test]
    fn test_bitor_squares_to_create_bitboard() {
        let bb = Square::A1 | Square::H1 | Square::A8 | Square::H8;
        assert_eq!(bb, Bitboard(0x8100000000000081));
    }

    #[test]
    fn test_bitxor_and_bitxorassign_to_toggle_bit() {
        let mut bb = Bitboard::ALL;
        bb = bb ^ Square::E2;
        assert_eq!(bb, Bitboard(0xffffffffffffefff));

        bb ^= Square::E2;
        assert_eq!(bb, Bitboard::ALL);
    }

    #[test]
    fn test_and_not() {
        let bb = Square::A1 | Square::B1 | Square::C1;
        assert_eq!(bb.and_not(Square::B1.into()), Square::A1 | Square::C1);
    }

    #[test]
    fn test_shift() {
        let bb = Bitboard::from(Square::E4);
        assert_eq!(bb.shift(8), Square::E5.into());
        assert_eq!(bb.shift(-8), Square::E3.into());
        assert_eq!(bb.shift(0), bb);
        assert_eq!(Bitboard::ALL.shift(64), Bitboard::EMPTY);
        assert_eq!(Bitboard::ALL.shift(-64), Bitboard::EMPTY);
        assert_eq!(Bitboard::ALL.shift(100), Bitboard::EMPTY);
        assert_eq!(Bitboard::from(Square::H8).shift(1), Bitboard::EMPTY);
    }

    #[test]
    fn test_step_does_not_wrap() {
        assert_eq!(Bitboard::from(Square::H4).step(Direction::East), Bitboard::EMPTY);
        assert_eq!(Bitboard::from(Square::A4).step(Direction::West), Bitboard::EMPTY);
        assert_eq!(Bitboard::from(Square::A4).step(Direction::NorthWest), Bitboard::EMPTY);
        assert_eq!(Bitboard::from(Square::G4).step(Direction::NorthEast), Square::H5.into());
        assert_eq!(Bitboard::from(Square::E8).step(Direction::North), Bitboard::EMPTY);
    }

    #[test]
    fn test_bitboard_iterator() {
        let bb = Bitboard(0x8100000000000081);
        let squares: Vec<Square> = bb.into_iter().collect();
        assert_eq!(squares, vec![Square::A1, Square::H1, Square::A8, Square::H8]);
    }

    #[test]
    fn test_bitboard_lsb() {
        assert_eq!(Bitboard(0x0042000000004200).lsb(), Square::B2);
        assert_eq!(Bitboard(0x8100000000000081).lsb(), Square::A1);
        assert_eq!(Bitboard(0x0000000010000000).lsb(), Square::E4);
    }

    #[test]
    #[should_panic]
    fn test_bitboard_lsb_of_empty_panics() {
        Bitboard::EMPTY.lsb();
    }

    #[test]
    fn test_pop_lsb() {
        let mut bb = Square::C3 | Square::F6;
        assert_eq!(bb.pop_lsb(), Square::C3);
        assert_eq!(bb, Square::F6.into());
        assert_eq!(bb.pop_lsb(), Square::F6);
        assert!(bb.is_empty());
    }

    #[test]
    fn test_bitboard_popcnt() {
        assert_eq!(Bitboard(0x0042000000004200).popcnt(), 4);
        assert_eq!(Bitboard(0xffffffffffffffff).popcnt(), 64);
        assert_eq!(Bitboard(0x0000000000000000).popcnt(), 0);
    }

    #[test]
    fn test_square_colors_partition_the_board() {
        assert_eq!(Bitboard::LIGHT_SQUARES | Bitboard::DARK_SQUARES, Bitboard::ALL);
        assert!((Bitboard::LIGHT_SQUARES & Bitboard::DARK_SQUARES).is_empty());
        for square in Square::ALL {
            assert_eq!(Bitboard::LIGHT_SQUARES.get(square), square.is_light());
        }
    }

    #[test]
    fn test_files_ranks_and_diagonals() {
        assert_eq!(Bitboard::file(File::A), Bitboard(0x0101010101010101));
        assert_eq!(Bitboard::rank(Rank::R8), Bitboard(0xff00000000000000));
        assert_eq!(Bitboard::diagonal(Square::D4), Bitboard(0x8040201008040201));
        assert_eq!(Bitboard::anti_diagonal(Square::E4), Bitboard(0x0102040810204080));
        assert_eq!(Bitboard::diagonal(Square::H1), Bitboard::from(Square::H1));
        assert_eq!(Bitboard::anti_diagonal(Square::A1), Bitboard::from(Square::A1));
    }

    #[test]
    fn test_knight_attacks() {
        assert_eq!(knight_attacks(Square::A1), Square::B3 | Square::C2);
        assert_eq!(knight_attacks(Square::H8), Square::G6 | Square::F7);
        assert_eq!(knight_attacks(Square::E4).popcnt(), 8);
        assert_eq!(knight_attacks(Square::B1), Square::A3 | Square::C3 | Square::D2);
    }

    #[test]
    fn test_king_attacks() {
        assert_eq!(king_attacks(Square::A1), Square::A2 | Square::B1 | Square::B2);
        assert_eq!(king_attacks(Square::E4).popcnt(), 8);
        assert_eq!(king_attacks(Square::H5).popcnt(), 5);
    }
}
