use std::fmt::Display;

use thiserror::Error;

/// Errors produced when parsing files, ranks or squares from text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordinatesError {
    #[error("Invalid file: {0}")]
    InvalidFile(char),

    #[error("Invalid rank: {0}")]
    InvalidRank(char),

    #[error("Invalid square: \"{0}\"")]
    InvalidSquare(String),
}

/// Represents a file (column) on a chess board.
///
/// Files are labeled from A to H, going from left to right when viewing the board from White's perspective.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl File {
    /// Number of files on a board.
    pub const COUNT: usize = 8;

    /// All files on a chess board, from A to H.
    pub const ALL: [File; File::COUNT] = [File::A, File::B, File::C, File::D, File::E, File::F, File::G, File::H];
}

impl Display for File {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", (b'a' + *self as u8) as char)
    }
}

impl From<u8> for File {
    /// Converts a `u8` value to a `File`. Panics if the value is greater than 7.
    fn from(value: u8) -> Self {
        assert!(value < File::COUNT as u8, "Invalid file index: {value}");
        File::ALL[value as usize]
    }
}

impl From<File> for u8 {
    fn from(file: File) -> Self {
        file as u8
    }
}

impl From<File> for usize {
    fn from(file: File) -> Self {
        file as usize
    }
}

impl TryFrom<char> for File {
    type Error = CoordinatesError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            'a'..='h' => Ok(File::from(value as u8 - b'a')),
            _ => Err(CoordinatesError::InvalidFile(value)),
        }
    }
}

/// Represents a rank (row) on a chess board.
///
/// Ranks are labeled from 1 to 8, going from the bottom to the top when viewing the board from White's perspective.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    R1 = 0,
    R2 = 1,
    R3 = 2,
    R4 = 3,
    R5 = 4,
    R6 = 5,
    R7 = 6,
    R8 = 7,
}

impl Rank {
    /// Number of ranks on a board.
    pub const COUNT: usize = 8;

    /// All ranks on a chess board, from 1 to 8.
    pub const ALL: [Rank; Rank::COUNT] =
        [Rank::R1, Rank::R2, Rank::R3, Rank::R4, Rank::R5, Rank::R6, Rank::R7, Rank::R8];
}

impl Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", (b'1' + *self as u8) as char)
    }
}

impl From<u8> for Rank {
    /// Converts a `u8` value to a `Rank`. Panics if the value is greater than 7.
    fn from(value: u8) -> Self {
        assert!(value < Rank::COUNT as u8, "Invalid rank index: {value}");
        Rank::ALL[value as usize]
    }
}

impl From<Rank> for u8 {
    fn from(rank: Rank) -> Self {
        rank as u8
    }
}

impl From<Rank> for usize {
    fn from(rank: Rank) -> Self {
        rank as usize
    }
}

impl TryFrom<char> for Rank {
    type Error = CoordinatesError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '1'..='8' => Ok(Rank::from(value as u8 - b'1')),
            _ => Err(CoordinatesError::InvalidRank(value)),
        }
    }
}

/// Represents a square on a chess board.
///
/// Squares are indexed from 0 to 63, starting from A1 and ending at H8 with B1 being at index 1. In other words, the
/// file value is stored in the lower 3 bits and the rank value is stored in the next 3 bits.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(u8);

#[allow(dead_code)]
impl Square {
    pub const A1: Square = Square(0);
    pub const B1: Square = Square(1);
    pub const C1: Square = Square(2);
    pub const D1: Square = Square(3);
    pub const E1: Square = Square(4);
    pub const F1: Square = Square(5);
    pub const G1: Square = Square(6);
    pub const H1: Square = Square(7);
    pub const A2: Square = Square(8);
    pub const B2: Square = Square(9);
    pub const C2: Square = Square(10);
    pub const D2: Square = Square(11);
    pub const E2: Square = Square(12);
    pub const F2: Square = Square(13);
    pub const G2: Square = Square(14);
    pub const H2: Square = Square(15);
    pub const A3: Square = Square(16);
    pub const B3: Square = Square(17);
    pub const C3: Square = Square(18);
    pub const D3: Square = Square(19);
    pub const E3: Square = Square(20);
    pub const F3: Square = Square(21);
    pub const G3: Square = Square(22);
    pub const H3: Square = Square(23);
    pub const A4: Square = Square(24);
    pub const B4: Square = Square(25);
    pub const C4: Square = Square(26);
    pub const D4: Square = Square(27);
    pub const E4: Square = Square(28);
    pub const F4: Square = Square(29);
    pub const G4: Square = Square(30);
    pub const H4: Square = Square(31);
    pub const A5: Square = Square(32);
    pub const B5: Square = Square(33);
    pub const C5: Square = Square(34);
    pub const D5: Square = Square(35);
    pub const E5: Square = Square(36);
    pub const F5: Square = Square(37);
    pub const G5: Square = Square(38);
    pub const H5: Square = Square(39);
    pub const A6: Square = Square(40);
    pub const B6: Square = Square(41);
    pub const C6: Square = Square(42);
    pub const D6: Square = Square(43);
    pub const E6: Square = Square(44);
    pub const F6: Square = Square(45);
    pub const G6: Square = Square(46);
    pub const H6: Square = Square(47);
    pub const A7: Square = Square(48);
    pub const B7: Square = Square(49);
    pub const C7: Square = Square(50);
    pub const D7: Square = Square(51);
    pub const E7: Square = Square(52);
    pub const F7: Square = Square(53);
    pub const G7: Square = Square(54);
    pub const H7: Square = Square(55);
    pub const A8: Square = Square(56);
    pub const B8: Square = Square(57);
    pub const C8: Square = Square(58);
    pub const D8: Square = Square(59);
    pub const E8: Square = Square(60);
    pub const F8: Square = Square(61);
    pub const G8: Square = Square(62);
    pub const H8: Square = Square(63);

    /// Number of squares on a board.
    pub const COUNT: usize = 64;

    /// All the squares of the board, in index order.
    pub const ALL: [Square; Square::COUNT] = {
        let mut squares = [Square(0); Square::COUNT];
        let mut index = 0;
        while index < Square::COUNT {
            squares[index] = Square(index as u8);
            index += 1;
        }
        squares
    };

    /// Creates a new square from a file and a rank.
    pub const fn new(file: File, rank: Rank) -> Square {
        Square((rank as u8) << 3 | file as u8)
    }

    /// Returns the rank of the square.
    pub fn rank(self) -> Rank {
        Rank::from(self.0 >> 3)
    }

    /// Returns the file of the square.
    pub fn file(self) -> File {
        File::from(self.0 & 0b111)
    }

    /// Returns the index of the square (0..64).
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the square `offset` indices away. Panics if the result leaves the board.
    pub fn offset(self, offset: i8) -> Square {
        let index = self.0 as i8 + offset;
        assert!((0..64).contains(&index), "Square offset out of the board: {self} + {offset}");
        Square(index as u8)
    }

    /// Returns the square mirrored vertically (a1 <-> a8).
    pub fn flip(self) -> Square {
        Square(self.0 ^ 56)
    }

    /// Returns true if the square is a light square.
    pub fn is_light(self) -> bool {
        (u8::from(self.file()) + u8::from(self.rank())) % 2 == 1
    }
}

impl Display for Square {
    /// Formats the square as a two-character string.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl From<u8> for Square {
    /// Converts a square index to a `Square`. Panics if the index is out of range.
    fn from(value: u8) -> Self {
        assert!((value as usize) < Square::COUNT, "Invalid square index: {value}");
        Square(value)
    }
}

impl From<Square> for u8 {
    fn from(square: Square) -> Self {
        square.0
    }
}

impl From<Square> for usize {
    fn from(square: Square) -> Self {
        square.0 as usize
    }
}

impl TryFrom<&str> for Square {
    type Error = CoordinatesError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let mut chars = value.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => Ok(Square::new(File::try_from(file)?, Rank::try_from(rank)?)),
            _ => Err(CoordinatesError::InvalidSquare(value.to_string())),
        }
    }
}
