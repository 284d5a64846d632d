use std::sync::Arc;

use clap::Parser;
use quietmove::{
    config::{self, EngineConfig},
    notation::parse_coordinate_notation,
    perft::run_perft,
    position::{FenError, Position},
    search::Search,
    zobrist::ZobristKeys,
};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Error, Debug)]
enum QuietmoveError {
    #[error("Error during the perft command: {0}")]
    PerftError(#[from] quietmove::perft::PerftError),

    #[error("Error reading the configuration: {0}")]
    ConfigError(#[from] quietmove::config::ConfigError),

    #[error("Invalid FEN ({0}): {1}")]
    InvalidFen(String, FenError),

    #[error("Invalid move: {0}")]
    NotationError(#[from] quietmove::notation::NotationError),

    #[error("The position rejected the move {0}")]
    RejectedMove(String),
}

mod arguments {
    use std::path::PathBuf;

    use clap::{Parser, Subcommand};

    pub const INITIAL_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// A bitboard chess engine
    #[derive(Parser)]
    #[command(name = "quietmove", version, about = "A bitboard chess engine")]
    pub struct QuietmoveArgs {
        /// Path of a configuration file
        #[arg(short, long, global = true)]
        pub config: Option<PathBuf>,

        #[command(subcommand)]
        pub command: Commands,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Commands {
        /// Calculate the perft of a position
        Perft {
            /// The depth to calculate the perft
            #[arg(short, long)]
            depth: u16,

            /// FEN string representing the position to calculate the perft
            #[arg(short, long, default_value = INITIAL_FEN)]
            fen: String,
        },

        /// Search the best move of a position
        Bestmove {
            /// FEN string representing the position to search
            #[arg(short, long, default_value = INITIAL_FEN)]
            fen: String,

            /// The search depth, overrides the configuration
            #[arg(short, long)]
            depth: Option<u16>,

            /// Moves to play from the position before searching, in coordinate notation ("e2e4 e7e5")
            #[arg(short, long, default_value = "")]
            moves: String,
        },

        /// Let the engine play against itself
        Play {
            /// FEN string representing the starting position
            #[arg(short, long, default_value = INITIAL_FEN)]
            fen: String,

            /// Maximum number of half-moves to play
            #[arg(short, long, default_value_t = 200)]
            plies: u32,
        },
    }
}

/// Returns the Zobrist keys selected by the configuration.
fn zobrist_keys(config: &EngineConfig) -> Arc<ZobristKeys> {
    match config.zobrist_seed {
        Some(seed) => Arc::new(ZobristKeys::new(seed)),
        None => ZobristKeys::global(),
    }
}

/// Builds a position from a FEN using the keys selected by the configuration.
fn load_position(fen: &str, config: &EngineConfig) -> Result<Position, QuietmoveError> {
    Position::new_from_fen_with_keys(fen, zobrist_keys(config))
        .map_err(|e| QuietmoveError::InvalidFen(fen.to_string(), e))
}

fn bestmove(fen: &str, depth: Option<u16>, moves: &str, config: &EngineConfig) -> Result<(), QuietmoveError> {
    let mut position = load_position(fen, config)?;
    for text in moves.split_whitespace() {
        let mv = parse_coordinate_notation(&mut position, text)?;
        if !position.make_move(mv) {
            return Err(QuietmoveError::RejectedMove(mv.to_string()));
        }
    }

    let depth = depth.unwrap_or(config.search_depth);
    let mut search = Search::new(&mut position, depth).with_quiescence_depth(config.quiescence_depth);
    match search.best_move_with_score() {
        Some((mv, score)) => {
            println!("bestmove {} ({}) score {}", mv.to_coordinate_notation(), mv, score);
            info!(nodes = search.nodes(), "search finished");
        }
        None => println!("bestmove (none)"),
    }

    Ok(())
}

fn play(fen: &str, plies: u32, config: &EngineConfig) -> Result<(), QuietmoveError> {
    let mut position = load_position(fen, config)?;
    println!("{}\n", position.to_compact_string());

    for ply in 0..plies {
        let status = position.status();
        if status.is_terminal() {
            break;
        }

        let mut search =
            Search::new(&mut position, config.search_depth).with_quiescence_depth(config.quiescence_depth);
        let Some((mv, score)) = search.best_move_with_score() else {
            break;
        };
        if !position.make_move(mv) {
            return Err(QuietmoveError::RejectedMove(mv.to_string()));
        }
        println!("{:>3}. {:<10} {}", ply / 2 + 1, mv.to_string(), score);
    }

    println!("\n{}\n", position.to_compact_string());
    println!("{}", position.to_fen());
    println!("Result: {}", position.status());

    Ok(())
}

fn run() -> Result<(), QuietmoveError> {
    // Parse command line arguments
    let args = arguments::QuietmoveArgs::parse();
    let config = config::load(args.config)?;

    // Run the command
    match args.command {
        arguments::Commands::Perft { depth, fen } => {
            run_perft(&fen, depth, zobrist_keys(&config))?;
        }
        arguments::Commands::Bestmove { fen, depth, moves } => {
            bestmove(&fen, depth, &moves, &config)?;
        }
        arguments::Commands::Play { fen, plies } => {
            play(&fen, plies, &config)?;
        }
    }

    Ok(())
}

/// Main entry point for the quietmove chess engine.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
