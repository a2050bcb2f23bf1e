//! 有限深度回溯策略

use super::{MovePolicy, Preference, ScoredMove, MAX_BACKTRACKING_DEPTH};
use crate::board::Board;
use crate::error::Result;
use crate::types::{Position, KNIGHT_OFFSETS};

/// Backtracking - 有限深度前瞻，取总分最高的候选
///
/// 只是局部前瞻，不保证走满棋盘。
#[derive(Debug, Clone, Copy)]
pub struct Backtracking {
    depth: u32,
}

impl Backtracking {
    /// 深度超过上限时截断
    pub fn new(depth: u32) -> Self {
        let depth = if depth > MAX_BACKTRACKING_DEPTH {
            log::warn!(
                "backtracking depth {} exceeds cap, clamped to {}",
                depth,
                MAX_BACKTRACKING_DEPTH
            );
            MAX_BACKTRACKING_DEPTH
        } else {
            depth
        };
        Backtracking { depth }
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// 连通度：八个马步中落在棋盘内空格的比例
    fn connectivity(board: &Board, pos: Position) -> f64 {
        board.onward_count(pos) as f64 / KNIGHT_OFFSETS.len() as f64
    }

    /// 递归前瞻（pos 须已占用）
    ///
    /// 叶子：出路数 + 连通度；内部节点：出路数 + 子节点最高分
    fn explore(board: &mut Board, pos: Position, depth: u32) -> f64 {
        let moves = board.candidates(pos);
        if depth == 0 || moves.is_empty() {
            return moves.len() as f64 + Self::connectivity(board, pos);
        }

        let mut best = 0.0_f64;
        for &next in &moves {
            let mut guard = board.tentative(next);
            best = best.max(Self::explore(&mut guard, next, depth - 1));
        }
        best + moves.len() as f64
    }
}

impl Default for Backtracking {
    fn default() -> Self {
        Backtracking::new(super::DEFAULT_BACKTRACKING_DEPTH)
    }
}

impl MovePolicy for Backtracking {
    fn preference(&self) -> Preference {
        Preference::Highest
    }

    fn score_moves(&self, pos: Position, board: &mut Board) -> Result<Vec<ScoredMove>> {
        let moves = board
            .legal_moves(pos)?
            .into_iter()
            .map(|to| {
                let mut guard = board.tentative(to);
                // 深度 0 退化为一步出路计数
                let score = if self.depth == 0 {
                    guard.onward_count(to) as f64
                } else {
                    Self::explore(&mut guard, to, self.depth - 1)
                };
                ScoredMove { to, score }
            })
            .collect();
        Ok(moves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(depth: u32, start: Position) -> Vec<f64> {
        let mut board = Board::new(8).unwrap();
        board.visit(start).unwrap();
        Backtracking::new(depth)
            .score_moves(start, &mut board)
            .unwrap()
            .iter()
            .map(|s| s.score)
            .collect()
    }

    #[test]
    fn test_depth_zero_is_onward_count() {
        assert_eq!(
            scores(0, Position::new(2, 2)),
            vec![7.0, 5.0, 3.0, 2.0, 7.0, 3.0, 5.0, 2.0]
        );
    }

    #[test]
    fn test_depth_one_adds_connectivity() {
        assert_eq!(
            scores(1, Position::new(2, 2)),
            vec![7.875, 5.625, 3.375, 2.25, 7.875, 3.375, 5.625, 2.25]
        );
    }

    #[test]
    fn test_deeper_scores() {
        assert_eq!(scores(2, Position::new(0, 0)), vec![12.875, 12.875]);
        assert_eq!(scores(3, Position::new(0, 0)), vec![19.875, 19.875]);
        assert_eq!(
            scores(3, Position::new(2, 2)),
            vec![21.875, 19.875, 17.875, 14.875, 21.875, 17.875, 19.875, 14.875]
        );
    }

    #[test]
    fn test_picks_highest_score() {
        let mut board = Board::new(8).unwrap();
        let start = Position::new(2, 2);
        board.visit(start).unwrap();
        let policy = Backtracking::new(3);
        assert_eq!(policy.next_move(start, &mut board).unwrap(), Some(Position::new(4, 3)));
    }

    #[test]
    fn test_lookahead_restores_board() {
        let mut board = Board::new(8).unwrap();
        let start = Position::new(4, 4);
        board.visit(start).unwrap();
        board.visit(Position::new(6, 5)).unwrap();
        let snapshot = board.clone();
        Backtracking::new(4).score_moves(start, &mut board).unwrap();
        assert_eq!(board, snapshot);
    }

    #[test]
    fn test_depth_is_capped() {
        assert_eq!(Backtracking::new(50).depth(), MAX_BACKTRACKING_DEPTH);
        assert_eq!(Backtracking::new(2).depth(), 2);
        assert_eq!(Backtracking::default().depth(), 3);
    }
}
