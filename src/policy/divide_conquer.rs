//! 分治策略：按象限访问次数平衡

use super::{MovePolicy, Preference, ScoredMove};
use crate::board::Board;
use crate::error::Result;
use crate::types::Position;

/// DivideAndConquer - 以中线把棋盘分成四个象限，偏向访问最少的象限
#[derive(Debug, Clone, Copy, Default)]
pub struct DivideAndConquer;

/// 象限标识 (上半, 左半)
type Quadrant = (bool, bool);

impl DivideAndConquer {
    fn quadrant(pos: Position, mid: i32) -> Quadrant {
        (pos.row < mid, pos.col < mid)
    }

    /// 象限内已访问格子数
    fn quadrant_visits(board: &Board, quadrant: Quadrant) -> usize {
        let mid = (board.size() / 2) as i32;
        board
            .positions()
            .filter(|&p| Self::quadrant(p, mid) == quadrant && board.is_visited(p))
            .count()
    }

    fn weight(visits: usize) -> f64 {
        if visits == 0 {
            2.0
        } else {
            1.0 + 1.0 / visits as f64
        }
    }
}

impl MovePolicy for DivideAndConquer {
    fn preference(&self) -> Preference {
        Preference::Highest
    }

    fn score_moves(&self, pos: Position, board: &mut Board) -> Result<Vec<ScoredMove>> {
        let mid = (board.size() / 2) as i32;
        let moves = board
            .legal_moves(pos)?
            .into_iter()
            .map(|to| {
                let visits = Self::quadrant_visits(board, Self::quadrant(to, mid));
                let onward = board.onward_after(to) as f64;
                ScoredMove {
                    to,
                    score: onward * Self::weight(visits),
                }
            })
            .collect();
        Ok(moves)
    }
}
