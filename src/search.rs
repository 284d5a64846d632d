use std::cmp::Ordering;

use tracing::debug;

use crate::{
    eval::{evaluate, Eval},
    piece::{Color, PieceType},
    position::Position,
    r#move::Move,
};

/// Piece weights used to rank captures. The king gets a large weight so captures made by the king come last.
const ORDERING_VALUES: [i64; PieceType::COUNT] = [100, 320, 330, 500, 900, 20_000];

/// The kind of node searched after a move is made.
#[derive(Debug, Clone, Copy)]
enum Child {
    /// Full-width node with the remaining depth.
    Full { depth: u16, ply: u16 },
    /// Quiescence node, `qdepth` plies past the full-width horizon.
    Quiescence { ply: u16, qdepth: u16 },
}

pub struct Search<'a> {
    position: &'a mut Position,
    depth: u16,
    quiescence_depth: u16,
    nodes: u64,
}

impl<'a> Search<'a> {
    /// Depth used when none is configured.
    pub const DEFAULT_DEPTH: u16 = 3;

    /// Maximum number of plies the quiescence search extends past the nominal depth.
    pub const DEFAULT_QUIESCENCE_DEPTH: u16 = 8;

    /// Creates a new search instance with the given position and depth.
    ///
    /// # Parameters
    /// * `position` - A mutable reference to the chess position to be searched. While the position will be mutated
    ///   during search it will be restored to its original state after the search is complete.
    /// * `depth` - The depth (in half-moves) of the full-width part of the search
    ///
    /// # Returns
    /// A new Search instance configured with the specified position and depth
    pub fn new(position: &'a mut Position, depth: u16) -> Search<'a> {
        Search { position, depth, quiescence_depth: Self::DEFAULT_QUIESCENCE_DEPTH, nodes: 0 }
    }

    /// Sets the maximum depth of the quiescence search.
    pub fn with_quiescence_depth(mut self, quiescence_depth: u16) -> Search<'a> {
        self.quiescence_depth = quiescence_depth;
        self
    }

    /// Returns the number of nodes visited by the last search.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Searches the position and returns the best move for the side to move, or `None` if it has no legal move.
    pub fn best_move(&mut self) -> Option<Move> {
        self.best_move_with_score().map(|(mv, _)| mv)
    }

    /// Searches the position and returns the best move with its score.
    ///
    /// The root moves are tried in generation order and the first move reaching the best score for the side to move is
    /// kept. Scores are always from white's point of view.
    pub fn best_move_with_score(&mut self) -> Option<(Move, Eval)> {
        self.nodes = 0;

        let maximizing = self.position.turn() == Color::White;
        let next = Child::Full { depth: self.depth.saturating_sub(1), ply: 1 };
        let mut alpha = Eval::MIN;
        let mut beta = Eval::MAX;
        let mut best: Option<(Move, Eval)> = None;

        for mv in self.position.legal_moves(true) {
            if !self.position.make_move(mv) {
                continue;
            }
            let score = self.child(next, alpha, beta);
            self.position.unmake_move();

            let improves = match best {
                None => true,
                Some((_, best_score)) if maximizing => score > best_score,
                Some((_, best_score)) => score < best_score,
            };
            if improves {
                best = Some((mv, score));
                if maximizing {
                    alpha = score;
                } else {
                    beta = score;
                }
            }
        }

        match best {
            Some((mv, score)) => debug!(depth = self.depth, nodes = self.nodes, %score, best = %mv, "search done"),
            None => debug!(depth = self.depth, nodes = self.nodes, "search done without a legal move"),
        }

        best
    }

    fn child(&mut self, next: Child, alpha: Eval, beta: Eval) -> Eval {
        match next {
            Child::Full { depth, ply } => self.search(depth, ply, alpha, beta),
            Child::Quiescence { ply, qdepth } => self.quiescence(ply, qdepth, alpha, beta),
        }
    }

    /// Alpha-beta minimax. White maximizes the score and black minimizes it.
    fn search(&mut self, depth: u16, ply: u16, alpha: Eval, beta: Eval) -> Eval {
        self.nodes += 1;

        if self.position.is_draw() {
            return Eval::DRAW;
        }

        if depth == 0 {
            return self.quiescence(ply, 0, alpha, beta);
        }

        let mut moves = self.position.legal_moves(true);
        if moves.is_empty() {
            return self.no_legal_move_score(ply);
        }
        order_moves(&mut moves);

        self.minimax(&moves, alpha, beta, None, Child::Full { depth: depth - 1, ply: ply + 1 })
    }

    /// Extends the search with captures until the position is quiet, or with every move while in check.
    fn quiescence(&mut self, ply: u16, qdepth: u16, alpha: Eval, beta: Eval) -> Eval {
        self.nodes += 1;

        if self.position.is_draw() {
            return Eval::DRAW;
        }

        let in_check = self.position.is_check();
        let mut moves = self.position.legal_moves(in_check);
        if in_check && moves.is_empty() {
            return self.no_legal_move_score(ply);
        }

        let stand_pat = evaluate(&self.position);
        if moves.is_empty() || qdepth >= self.quiescence_depth {
            return stand_pat;
        }
        order_moves(&mut moves);

        let floor = if in_check { None } else { Some(stand_pat) };
        self.minimax(&moves, alpha, beta, floor, Child::Quiescence { ply: ply + 1, qdepth: qdepth + 1 })
    }

    /// Tries each move and keeps the best score for the side to move, pruning once the window closes.
    ///
    /// `stand_pat` is the score the side to move can keep without moving, if any.
    fn minimax(&mut self, moves: &[Move], alpha: Eval, beta: Eval, stand_pat: Option<Eval>, next: Child) -> Eval {
        let maximizing = self.position.turn() == Color::White;
        let mut alpha = alpha;
        let mut beta = beta;

        let mut best = match (stand_pat, maximizing) {
            (Some(score), _) => score,
            (None, true) => Eval::MIN,
            (None, false) => Eval::MAX,
        };
        if stand_pat.is_some() {
            if maximizing {
                alpha = alpha.max(best);
            } else {
                beta = beta.min(best);
            }
            if alpha >= beta {
                return best;
            }
        }

        for mv in moves {
            if !self.position.make_move(*mv) {
                continue;
            }
            let score = self.child(next, alpha, beta);
            self.position.unmake_move();

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(score);
            } else {
                best = best.min(score);
                beta = beta.min(score);
            }
            if alpha >= beta {
                break;
            }
        }

        best
    }

    /// Score of a node without legal moves: mated when in check, stalemate otherwise.
    fn no_legal_move_score(&self, ply: u16) -> Eval {
        if self.position.is_check() {
            Eval::mated(self.position.turn(), ply)
        } else {
            Eval::DRAW
        }
    }
}

/// Compares two moves for search ordering.
///
/// Captures come first, the best ratio between the captured piece and the capturing piece leading. Ties are broken by
/// the moving piece, the move kind, then the destination and the source squares.
fn compare_moves(a: &Move, b: &Move) -> Ordering {
    let ratio = match (a.is_capture(), b.is_capture()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (true, true) => {
            let a_gain = ORDERING_VALUES[usize::from(a.captured_piece())] * ORDERING_VALUES[usize::from(b.piece())];
            let b_gain = ORDERING_VALUES[usize::from(b.captured_piece())] * ORDERING_VALUES[usize::from(a.piece())];
            b_gain.cmp(&a_gain)
        }
        (false, false) => Ordering::Equal,
    };

    ratio
        .then_with(|| u8::from(a.piece()).cmp(&u8::from(b.piece())))
        .then_with(|| (a.kind() as u8).cmp(&(b.kind() as u8)))
        .then_with(|| a.to_square().cmp(&b.to_square()))
        .then_with(|| a.from_square().cmp(&b.from_square()))
}

/// Sorts moves in place so the most promising are searched first. The sort is stable.
pub fn order_moves(moves: &mut [Move]) {
    moves.sort_by(compare_moves);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{coordinates::Square, r#move::MoveKind};

    fn search_fen(fen: &str, depth: u16) -> (Option<(Move, Eval)>, Position) {
        let mut position = Position::new_from_fen(fen).unwrap();
        let result = Search::new(&mut position, depth).best_move_with_score();
        (result, position)
    }

    #[test]
    fn test_best_move_initial_position_is_legal() {
        let mut position = Position::new();
        let fen = position.to_fen();
        let hash = position.hash();

        let mv = Search::new(&mut position, 2).best_move().unwrap();

        assert!(position.legal_moves(true).contains(&mv));
        assert_eq!(position.to_fen(), fen);
        assert_eq!(position.hash(), hash);
    }

    #[test]
    fn test_best_move_without_legal_move() {
        let (result, _) = search_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", 3);
        assert_eq!(result, None);
    }

    #[test]
    fn test_finds_mate_in_one_for_white() {
        let (result, _) = search_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", 2);
        let (mv, score) = result.unwrap();
        assert_eq!(mv.from_square(), Square::A1);
        assert_eq!(mv.to_square(), Square::A8);
        assert_eq!(score, Eval::mated(Color::Black, 1));
        assert!(score.is_mate());
    }

    #[test]
    fn test_finds_mate_in_one_for_black() {
        let (result, _) = search_fen("r5k1/8/8/8/8/8/5PPP/6K1 b - - 0 1", 2);
        let (mv, score) = result.unwrap();
        assert_eq!(mv.from_square(), Square::A8);
        assert_eq!(mv.to_square(), Square::A1);
        assert_eq!(score, Eval::mated(Color::White, 1));
    }

    #[test]
    fn test_captures_hanging_queen() {
        let (result, _) = search_fen("4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1", 1);
        let (mv, _) = result.unwrap();
        assert_eq!(mv.from_square(), Square::D1);
        assert_eq!(mv.to_square(), Square::D5);
        assert!(mv.is_capture());
    }

    #[test]
    fn test_quiescence_sees_recapture() {
        // The queen takes a pawn defended by a pawn, which loses the queen a ply later.
        let (result, _) = search_fen("4k3/8/2p5/3p4/8/8/8/3QK3 w - - 0 1", 1);
        let (mv, _) = result.unwrap();
        assert_ne!(mv.to_square(), Square::D5);
    }

    #[test]
    fn test_draw_scores_zero() {
        let (result, _) = search_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1", 2);
        let (_, score) = result.unwrap();
        assert_eq!(score, Eval::DRAW);
    }

    #[test]
    fn test_nodes_are_counted() {
        let mut position = Position::new();
        let mut search = Search::new(&mut position, 2).with_quiescence_depth(0);
        search.best_move();
        assert!(search.nodes() > 20);
    }

    #[test]
    fn test_order_moves_captures_first_by_ratio() {
        let pawn_takes_queen = Move::new(Square::E4, Square::D5, MoveKind::Capture, PieceType::Pawn, PieceType::Queen);
        let queen_takes_pawn = Move::new(Square::D1, Square::D5, MoveKind::Capture, PieceType::Queen, PieceType::Pawn);
        let quiet = Move::new_quiet(Square::G1, Square::F3, MoveKind::Quiet, PieceType::Knight);
        let pawn_push = Move::new_quiet(Square::A2, Square::A3, MoveKind::Quiet, PieceType::Pawn);

        let mut moves = vec![quiet, queen_takes_pawn, pawn_push, pawn_takes_queen];
        order_moves(&mut moves);

        assert_eq!(moves, vec![pawn_takes_queen, queen_takes_pawn, pawn_push, quiet]);
    }

    #[test]
    fn test_order_moves_ties_broken_by_squares() {
        let a = Move::new_quiet(Square::B1, Square::C3, MoveKind::Quiet, PieceType::Knight);
        let b = Move::new_quiet(Square::G1, Square::F3, MoveKind::Quiet, PieceType::Knight);
        let c = Move::new_quiet(Square::B1, Square::A3, MoveKind::Quiet, PieceType::Knight);

        let mut moves = vec![b, a, c];
        order_moves(&mut moves);

        assert_eq!(moves, vec![c, a, b]);
    }
}
