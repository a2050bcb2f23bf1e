//! 启发式策略模块
//!
//! 提供五种选步策略：Warnsdorff、Neural、Backtracking、DivideAndConquer、AML。
//! 所有策略在分数相同时选择偏移量顺序中最先出现的候选。

mod aml;
mod backtracking;
mod divide_conquer;
mod neural;
mod warnsdorff;

pub use aml::{Aml, AmlKey, AML_DIRECTION_PRIORITY};
pub use backtracking::Backtracking;
pub use divide_conquer::DivideAndConquer;
pub use neural::Neural;
pub use warnsdorff::Warnsdorff;

use crate::board::Board;
use crate::error::Result;
use crate::types::{PolicyName, Position};
use serde::Serialize;

/// 默认回溯深度
pub const DEFAULT_BACKTRACKING_DEPTH: u32 = 3;

/// 回溯深度上限（代价随深度指数增长）
pub const MAX_BACKTRACKING_DEPTH: u32 = 6;

/// 策略配置
#[derive(Debug, Clone)]
pub struct PolicyConfig {
    /// 回溯搜索深度
    pub backtracking_depth: u32,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        PolicyConfig {
            backtracking_depth: DEFAULT_BACKTRACKING_DEPTH,
        }
    }
}

/// 候选走法评分
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredMove {
    pub to: Position,
    pub score: f64,
}

/// 分数方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference {
    /// 分数越低越好
    Lowest,
    /// 分数越高越好
    Highest,
}

/// 选步策略接口
///
/// 实现必须在返回前撤销所有试探性占用；pos 不在棋盘内时返回 InvalidPosition
pub trait MovePolicy {
    /// 分数方向
    fn preference(&self) -> Preference;

    /// 为所有合法走法打分（按偏移量顺序）
    fn score_moves(&self, pos: Position, board: &mut Board) -> Result<Vec<ScoredMove>>;

    /// 选择下一步，没有合法走法时返回 None
    fn next_move(&self, pos: Position, board: &mut Board) -> Result<Option<Position>> {
        let scored = self.score_moves(pos, board)?;
        Ok(select_first_best(&scored, self.preference()).map(|sm| sm.to))
    }
}

/// 选出最优候选；分数相同取最先出现的
pub(crate) fn select_first_best(scored: &[ScoredMove], preference: Preference) -> Option<ScoredMove> {
    let mut best: Option<ScoredMove> = None;
    for &sm in scored {
        let better = match best {
            None => true,
            Some(b) => match preference {
                Preference::Lowest => sm.score < b.score,
                Preference::Highest => sm.score > b.score,
            },
        };
        if better {
            best = Some(sm);
        }
    }
    best
}

/// 到最近边的距离
#[inline]
pub(crate) fn edge_distance(pos: Position, size: usize) -> i32 {
    let last = size as i32 - 1;
    pos.row.min(pos.col).min(last - pos.row).min(last - pos.col)
}

/// 启发式策略（和类型，显式分派）
#[derive(Debug, Clone)]
pub enum HeuristicPolicy {
    Warnsdorff(Warnsdorff),
    Neural(Neural),
    Backtracking(Backtracking),
    DivideAndConquer(DivideAndConquer),
    Aml(Aml),
}

impl HeuristicPolicy {
    /// 按名称创建
    pub fn new(name: PolicyName, config: &PolicyConfig) -> Self {
        match name {
            PolicyName::Warnsdorff => HeuristicPolicy::Warnsdorff(Warnsdorff),
            PolicyName::Neural => HeuristicPolicy::Neural(Neural),
            PolicyName::Backtracking => {
                HeuristicPolicy::Backtracking(Backtracking::new(config.backtracking_depth))
            }
            PolicyName::DivideAndConquer => HeuristicPolicy::DivideAndConquer(DivideAndConquer),
            PolicyName::Aml => HeuristicPolicy::Aml(Aml),
        }
    }

    /// 从字符串创建，不认识的名称回退到 Warnsdorff
    pub fn from_name(name: &str, config: &PolicyConfig) -> Self {
        Self::new(PolicyName::from_name(name), config)
    }

    pub fn name(&self) -> PolicyName {
        match self {
            HeuristicPolicy::Warnsdorff(_) => PolicyName::Warnsdorff,
            HeuristicPolicy::Neural(_) => PolicyName::Neural,
            HeuristicPolicy::Backtracking(_) => PolicyName::Backtracking,
            HeuristicPolicy::DivideAndConquer(_) => PolicyName::DivideAndConquer,
            HeuristicPolicy::Aml(_) => PolicyName::Aml,
        }
    }

    /// 选择下一步
    pub fn next_move(&self, pos: Position, board: &mut Board) -> Result<Option<Position>> {
        match self {
            HeuristicPolicy::Warnsdorff(p) => p.next_move(pos, board),
            HeuristicPolicy::Neural(p) => p.next_move(pos, board),
            HeuristicPolicy::Backtracking(p) => p.next_move(pos, board),
            HeuristicPolicy::DivideAndConquer(p) => p.next_move(pos, board),
            HeuristicPolicy::Aml(p) => p.next_move(pos, board),
        }
    }

    /// 所有候选及分数
    pub fn score_moves(&self, pos: Position, board: &mut Board) -> Result<Vec<ScoredMove>> {
        match self {
            HeuristicPolicy::Warnsdorff(p) => p.score_moves(pos, board),
            HeuristicPolicy::Neural(p) => p.score_moves(pos, board),
            HeuristicPolicy::Backtracking(p) => p.score_moves(pos, board),
            HeuristicPolicy::DivideAndConquer(p) => p.score_moves(pos, board),
            HeuristicPolicy::Aml(p) => p.score_moves(pos, board),
        }
    }

    pub fn preference(&self) -> Preference {
        match self {
            HeuristicPolicy::Warnsdorff(p) => p.preference(),
            HeuristicPolicy::Neural(p) => p.preference(),
            HeuristicPolicy::Backtracking(p) => p.preference(),
            HeuristicPolicy::DivideAndConquer(p) => p.preference(),
            HeuristicPolicy::Aml(p) => p.preference(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TourError;

    fn scored(scores: &[f64]) -> Vec<ScoredMove> {
        scores
            .iter()
            .enumerate()
            .map(|(i, &score)| ScoredMove {
                to: Position::new(i as i32, 0),
                score,
            })
            .collect()
    }

    #[test]
    fn test_select_first_best_breaks_ties_by_order() {
        let moves = scored(&[3.0, 1.0, 5.0, 1.0, 5.0]);
        let lowest = select_first_best(&moves, Preference::Lowest).unwrap();
        assert_eq!(lowest.to, Position::new(1, 0));
        let highest = select_first_best(&moves, Preference::Highest).unwrap();
        assert_eq!(highest.to, Position::new(2, 0));
        assert!(select_first_best(&[], Preference::Lowest).is_none());
    }

    #[test]
    fn test_edge_distance() {
        assert_eq!(edge_distance(Position::new(0, 4), 8), 0);
        assert_eq!(edge_distance(Position::new(3, 4), 8), 3);
        assert_eq!(edge_distance(Position::new(6, 2), 8), 1);
    }

    #[test]
    fn test_policy_from_name() {
        let config = PolicyConfig::default();
        for name in PolicyName::ALL {
            assert_eq!(HeuristicPolicy::new(name, &config).name(), name);
        }
        let fallback = HeuristicPolicy::from_name("simulated_annealing", &config);
        assert_eq!(fallback.name(), PolicyName::Warnsdorff);
    }

    #[test]
    fn test_every_policy_returns_none_when_trapped() {
        let config = PolicyConfig::default();
        let mut board = Board::new(5).unwrap();
        let corner = Position::new(0, 0);
        board.visit(corner).unwrap();
        board.visit(Position::new(2, 1)).unwrap();
        board.visit(Position::new(1, 2)).unwrap();
        for name in PolicyName::ALL {
            let policy = HeuristicPolicy::new(name, &config);
            assert_eq!(policy.next_move(corner, &mut board), Ok(None), "{}", name);
            assert!(policy.score_moves(corner, &mut board).unwrap().is_empty());
        }
    }

    #[test]
    fn test_policies_leave_board_untouched() {
        let config = PolicyConfig::default();
        let mut board = Board::new(8).unwrap();
        for pos in [Position::new(3, 3), Position::new(5, 4), Position::new(0, 7)] {
            board.visit(pos).unwrap();
        }
        let snapshot = board.clone();
        for name in PolicyName::ALL {
            let policy = HeuristicPolicy::new(name, &config);
            let next = policy.next_move(Position::new(5, 4), &mut board).unwrap();
            assert!(next.is_some());
            assert_eq!(board, snapshot, "{} leaked occupancy", name);
        }
    }

    #[test]
    fn test_next_move_is_a_legal_move() {
        let config = PolicyConfig::default();
        let mut board = Board::new(8).unwrap();
        let from = Position::new(4, 4);
        board.visit(from).unwrap();
        let legal = board.legal_moves(from).unwrap();
        for name in PolicyName::ALL {
            let policy = HeuristicPolicy::new(name, &config);
            let next = policy.next_move(from, &mut board).unwrap().unwrap();
            assert!(legal.contains(&next), "{} picked {}", name, next);
        }
    }

    #[test]
    fn test_off_board_square_is_invalid_position() {
        let config = PolicyConfig::default();
        let mut board = Board::new(8).unwrap();
        let snapshot = board.clone();
        for off_board in [Position::new(8, 0), Position::new(0, -1), Position::new(-3, 9)] {
            let expected = TourError::InvalidPosition {
                position: off_board,
                size: 8,
            };
            for name in PolicyName::ALL {
                let policy = HeuristicPolicy::new(name, &config);
                let err = policy.next_move(off_board, &mut board).unwrap_err();
                assert_eq!(err, expected, "{}", name);
                let err = policy.score_moves(off_board, &mut board).unwrap_err();
                assert_eq!(err, expected, "{}", name);
            }
        }
        assert_eq!(board, snapshot);
    }
}
