//! 未访问格子分析

use crate::board::Board;
use crate::solver::Tour;
use crate::types::Position;
use serde::Serialize;
use std::collections::HashSet;

/// 未访问格子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnreachedSquare {
    pub position: Position,
    /// 所有马步邻居都已访问（被围死）
    pub boxed_in: bool,
}

/// 巡游之外的所有格子（行优先）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnreachableSet {
    squares: Vec<UnreachedSquare>,
}

impl UnreachableSet {
    pub fn len(&self) -> usize {
        self.squares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }

    pub fn squares(&self) -> &[UnreachedSquare] {
        &self.squares
    }

    pub fn positions(&self) -> Vec<Position> {
        self.squares.iter().map(|s| s.position).collect()
    }

    /// 被围死的格子数
    pub fn boxed_in_count(&self) -> usize {
        self.squares.iter().filter(|s| s.boxed_in).count()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.squares.iter().any(|s| s.position == pos)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UnreachedSquare> {
        self.squares.iter()
    }
}

/// 分析未访问格子
///
/// 邻居按最终占用计算；结果只用于展示，不影响求解
pub fn analyze_reachability(board: &Board, tour: &Tour) -> UnreachableSet {
    let visited: HashSet<Position> = tour.iter().copied().collect();
    let squares = board
        .positions()
        .filter(|pos| !visited.contains(pos))
        .map(|position| UnreachedSquare {
            position,
            boxed_in: board.onward_count(position) == 0,
        })
        .collect();
    UnreachableSet { squares }
}
