use std::{sync::Arc, time::Instant};

use thiserror::Error;
use tracing::info;

use crate::{
    position::{FenError, Position},
    r#move::Move,
    zobrist::ZobristKeys,
};

/// Represents errors that can occur during perft (performance test) operations.
///
/// # Variants
/// * `InvalidFen(String, FenError)` - Indicates that the provided FEN string was invalid, including both the original
///   FEN string and the specific parsing error
#[derive(Error, Debug)]
pub enum PerftError {
    #[error("Invalid FEN ({0}): {1}")]
    InvalidFen(String, FenError),
}

/// Counts the leaf nodes of the legal move tree of the given depth.
///
/// At depth 1 the legal moves are counted without being played a second time. The position is restored before this
/// returns.
pub fn perft(position: &mut Position, depth: u16) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = position.legal_moves(true);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for mv in moves {
        if position.make_move(mv) {
            nodes += perft(position, depth - 1);
            position.unmake_move();
        }
    }
    nodes
}

/// Breaks a perft count down by root move.
///
/// # Returns
/// * One entry per legal root move, in generation order, with the number of leaf nodes found beneath it
pub fn divide(position: &mut Position, depth: u16) -> Vec<(Move, u64)> {
    let mut results = Vec::new();

    for mv in position.legal_moves(true) {
        if position.make_move(mv) {
            let nodes = perft(position, depth.saturating_sub(1));
            position.unmake_move();
            results.push((mv, nodes));
        }
    }

    results
}

/// Runs a perft test on a FEN position and prints a divide report with timing information.
///
/// # Parameters
/// * `fen` - The position to analyze
/// * `depth` - The depth of the move tree to traverse
/// * `keys` - The Zobrist keys used to hash the position
///
/// # Returns
/// * The total number of leaf nodes found
///
/// # Errors
/// * `PerftError::InvalidFen` - If the FEN string cannot be parsed
pub fn run_perft(fen: &str, depth: u16, keys: Arc<ZobristKeys>) -> Result<u64, PerftError> {
    let mut position =
        Position::new_from_fen_with_keys(fen, keys).map_err(|e| PerftError::InvalidFen(fen.to_string(), e))?;

    println!("Perft ({}) for position:\n\n{}\n", depth, position.to_compact_string());

    let start = Instant::now();
    let nodes = if depth == 0 {
        1
    } else {
        let results = divide(&mut position, depth);
        for (mv, count) in &results {
            println!("{}\t{}", mv.to_coordinate_notation(), count);
        }
        results.iter().map(|(_, count)| count).sum()
    };
    let duration = start.elapsed();

    println!("\nNodes: {}", nodes);
    println!("Time: {:.3}", duration.as_secs_f64());
    println!("Nodes per second: {:.0}", nodes as f64 / duration.as_secs_f64().max(f64::EPSILON));

    info!(depth, nodes, seconds = duration.as_secs_f64(), "perft done");

    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

    #[test]
    fn test_perft_initial_position() {
        let mut position = Position::new();
        assert_eq!(perft(&mut position, 0), 1);
        assert_eq!(perft(&mut position, 1), 20);
        assert_eq!(perft(&mut position, 2), 400);
        assert_eq!(perft(&mut position, 3), 8902);
    }

    #[test]
    fn test_perft_restores_position() {
        let mut position = Position::new_from_fen(KIWIPETE).unwrap();
        let hash = position.hash();

        assert_eq!(perft(&mut position, 2), 2039);
        assert_eq!(position.hash(), hash);
        assert_eq!(position.to_fen(), KIWIPETE);
    }

    #[test]
    fn test_divide_sums_to_perft() {
        let mut position = Position::new_from_fen(KIWIPETE).unwrap();
        let results = divide(&mut position, 2);

        assert_eq!(results.len(), 48);
        assert_eq!(results.iter().map(|(_, nodes)| nodes).sum::<u64>(), 2039);
    }

    #[test]
    fn test_run_perft_invalid_fen() {
        let result = run_perft("not a fen", 1, ZobristKeys::global());
        assert!(matches!(result, Err(PerftError::InvalidFen(..))));
    }

    #[test]
    fn test_run_perft_returns_node_count() {
        assert_eq!(run_perft("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 2, ZobristKeys::global()).unwrap(), 191);
    }

    #[test]
    fn test_run_perft_with_seeded_keys() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        assert_eq!(run_perft(fen, 2, Arc::new(ZobristKeys::new(11))).unwrap(), 2039);
    }
}
