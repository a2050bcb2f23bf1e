//! AML 策略：Warnsdorff 加多级平局规则

use super::{edge_distance, MovePolicy, Preference, ScoredMove};
use crate::board::Board;
use crate::error::Result;
use crate::types::{Position, KNIGHT_OFFSETS};

/// 方向优先级（顺时针，从 (-2,1) 开始）
pub const AML_DIRECTION_PRIORITY: [(i32, i32); 8] = [
    (-2, 1),
    (-1, 2),
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
];

/// 排序键，按字段顺序字典序比较，越小越好
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AmlKey {
    /// 一步前瞻出路数
    pub onward: usize,
    /// 到最近角的曼哈顿距离
    pub corner_distance: usize,
    /// 到最近边的距离
    pub edge_distance: usize,
    /// 方向优先级下标
    pub direction: usize,
}

impl AmlKey {
    /// 编码为单个分数，顺序与字典序一致
    ///
    /// 棋盘不超过 26 时每个字段都小于 100
    pub fn encode(&self) -> f64 {
        (((self.onward * 100 + self.corner_distance) * 100 + self.edge_distance) * 100
            + self.direction) as f64
    }
}

/// AML - 依次比较出路数、离角距离、离边距离、方向优先级
#[derive(Debug, Clone, Copy, Default)]
pub struct Aml;

impl Aml {
    fn direction_rank(offset_index: usize) -> usize {
        let offset = KNIGHT_OFFSETS[offset_index];
        AML_DIRECTION_PRIORITY
            .iter()
            .position(|&d| d == offset)
            .unwrap_or(AML_DIRECTION_PRIORITY.len())
    }

    fn corner_distance(pos: Position, size: usize) -> usize {
        let last = size as i32 - 1;
        (pos.row.min(last - pos.row) + pos.col.min(last - pos.col)) as usize
    }

    /// 所有候选及其排序键（偏移量顺序）
    pub fn rank(&self, pos: Position, board: &mut Board) -> Result<Vec<(Position, AmlKey)>> {
        board.check(pos)?;
        let size = board.size();
        let ranked = board
            .candidates_with_offset(pos)
            .into_iter()
            .map(|(i, to)| {
                let key = AmlKey {
                    onward: board.onward_after(to),
                    corner_distance: Self::corner_distance(to, size),
                    edge_distance: edge_distance(to, size) as usize,
                    direction: Self::direction_rank(i),
                };
                (to, key)
            })
            .collect();
        Ok(ranked)
    }
}

impl MovePolicy for Aml {
    fn preference(&self) -> Preference {
        Preference::Lowest
    }

    fn score_moves(&self, pos: Position, board: &mut Board) -> Result<Vec<ScoredMove>> {
        let scored = self
            .rank(pos, board)?
            .into_iter()
            .map(|(to, key)| ScoredMove {
                to,
                score: key.encode(),
            })
            .collect();
        Ok(scored)
    }

    fn next_move(&self, pos: Position, board: &mut Board) -> Result<Option<Position>> {
        // min_by_key 在相等时返回第一个
        Ok(self
            .rank(pos, board)?
            .into_iter()
            .min_by_key(|&(_, key)| key)
            .map(|(to, _)| to))
    }
}
