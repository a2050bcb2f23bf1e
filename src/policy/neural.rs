//! Neural 评分策略

use super::{edge_distance, MovePolicy, Preference, ScoredMove};
use crate::board::Board;
use crate::error::Result;
use crate::types::Position;

/// 出路权重
const ACCESSIBILITY_WEIGHT: f64 = 0.6;
/// 离边距离权重
const EDGE_WEIGHT: f64 = 0.3;
/// 中心接近度权重
const CENTER_WEIGHT: f64 = 0.1;

/// Neural - 多特征线性加权评分，取最高分
///
/// 偏好出路多、靠近中心的格子
#[derive(Debug, Clone, Copy, Default)]
pub struct Neural;

impl Neural {
    /// 单个候选的加权分数（to 须已试探占用）
    fn evaluate(board: &Board, to: Position) -> f64 {
        let size = board.size();
        let accessibility = board.onward_count(to) as f64;

        let center = (size / 2) as i32;
        let center_distance = (to.row - center).abs() + (to.col - center).abs();
        let edge = edge_distance(to, size) as f64;

        accessibility * ACCESSIBILITY_WEIGHT
            + edge * EDGE_WEIGHT
            + 1.0 / (center_distance as f64 + 1.0) * CENTER_WEIGHT
    }
}

impl MovePolicy for Neural {
    fn preference(&self) -> Preference {
        Preference::Highest
    }

    fn score_moves(&self, pos: Position, board: &mut Board) -> Result<Vec<ScoredMove>> {
        let moves = board
            .legal_moves(pos)?
            .into_iter()
            .map(|to| {
                let guard = board.tentative(to);
                ScoredMove {
                    to,
                    score: Self::evaluate(&guard, to),
                }
            })
            .collect();
        Ok(moves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_weighted_score() {
        let mut board = Board::new(8).unwrap();
        let start = Position::new(3, 3);
        board.visit(start).unwrap();
        let scored = Neural.score_moves(start, &mut board).unwrap();
        assert_eq!(scored.len(), 8);
        // (5,4): 7 个出路，离边 2，离中心 1
        assert_eq!(scored[0].to, Position::new(5, 4));
        assert!(close(scored[0].score, 7.0 * 0.6 + 2.0 * 0.3 + 0.5 * 0.1));
        // (1,2): 5 个出路，离边 1，离中心 5
        assert_eq!(scored[3].to, Position::new(1, 2));
        assert!(close(scored[3].score, 5.0 * 0.6 + 0.3 + 0.1 / 6.0));
    }

    #[test]
    fn test_prefers_central_mobile_square() {
        let mut board = Board::new(8).unwrap();
        let start = Position::new(3, 3);
        board.visit(start).unwrap();
        // (5,4) 与 (4,5) 同分，取先出现的
        assert_eq!(Neural.next_move(start, &mut board).unwrap(), Some(Position::new(5, 4)));
    }

    #[test]
    fn test_corner_start() {
        let mut board = Board::new(8).unwrap();
        let start = Position::new(0, 0);
        board.visit(start).unwrap();
        assert_eq!(Neural.next_move(start, &mut board).unwrap(), Some(Position::new(2, 1)));
        assert_eq!(board.visited_count(), 1);
    }
}
