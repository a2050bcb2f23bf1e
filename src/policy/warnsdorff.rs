//! Warnsdorff 策略

use super::{MovePolicy, Preference, ScoredMove};
use crate::board::Board;
use crate::error::Result;
use crate::types::Position;

/// Warnsdorff - 优先走后续出路最少的格子
///
/// 出路少的格子如果现在不走，之后很可能再也到不了
#[derive(Debug, Clone, Copy, Default)]
pub struct Warnsdorff;

impl MovePolicy for Warnsdorff {
    fn preference(&self) -> Preference {
        Preference::Lowest
    }

    fn score_moves(&self, pos: Position, board: &mut Board) -> Result<Vec<ScoredMove>> {
        let moves = board
            .legal_moves(pos)?
            .into_iter()
            .map(|to| ScoredMove {
                to,
                score: board.onward_after(to) as f64,
            })
            .collect();
        Ok(moves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scores_are_onward_counts() {
        let mut board = Board::new(8).unwrap();
        let start = Position::new(0, 0);
        board.visit(start).unwrap();
        let scored = Warnsdorff.score_moves(start, &mut board).unwrap();
        assert_eq!(scored.len(), 2);
        assert_eq!(scored[0].to, Position::new(2, 1));
        assert_eq!(scored[0].score, 5.0);
        assert_eq!(scored[1].to, Position::new(1, 2));
        assert_eq!(scored[1].score, 5.0);
    }

    #[test]
    fn test_tie_picks_first_offset() {
        let mut board = Board::new(8).unwrap();
        let start = Position::new(0, 0);
        board.visit(start).unwrap();
        assert_eq!(Warnsdorff.next_move(start, &mut board).unwrap(), Some(Position::new(2, 1)));
    }

    #[test]
    fn test_prefers_most_constrained_square() {
        let mut board = Board::new(8).unwrap();
        let start = Position::new(2, 2);
        board.visit(start).unwrap();
        let scores: Vec<f64> = Warnsdorff
            .score_moves(start, &mut board)
            .unwrap()
            .iter()
            .map(|s| s.score)
            .collect();
        assert_eq!(scores, vec![7.0, 5.0, 3.0, 2.0, 7.0, 3.0, 5.0, 2.0]);
        // (0,1) 和 (1,0) 都只有 2 个出路，取先出现的
        assert_eq!(Warnsdorff.next_move(start, &mut board).unwrap(), Some(Position::new(0, 1)));
    }
}
