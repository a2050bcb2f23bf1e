//! 巡游棋盘与走法生成
//!
//! 使用一维数组存储占用状态（行优先）。

use crate::error::{Result, TourError};
use crate::types::{Position, KNIGHT_OFFSETS, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use std::fmt;
use std::ops::{Deref, DerefMut};

/// N×N 占用棋盘
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    /// size*size 个格子，true 表示已访问
    visited: Vec<bool>,
}

impl Board {
    /// 创建空棋盘
    pub fn new(size: usize) -> Result<Board> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            return Err(TourError::InvalidBoardSize { size });
        }
        Ok(Board {
            size,
            visited: vec![false; size * size],
        })
    }

    /// 按巡游路径还原占用状态
    pub fn from_tour(size: usize, squares: &[Position]) -> Result<Board> {
        let mut board = Board::new(size)?;
        for &pos in squares {
            board.visit(pos)?;
        }
        Ok(board)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// 格子总数
    #[inline]
    pub fn area(&self) -> usize {
        self.size * self.size
    }

    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        pos.is_within(self.size)
    }

    #[inline]
    fn index(&self, pos: Position) -> usize {
        pos.row as usize * self.size + pos.col as usize
    }

    pub(crate) fn check(&self, pos: Position) -> Result<()> {
        if self.contains(pos) {
            Ok(())
        } else {
            Err(TourError::InvalidPosition {
                position: pos,
                size: self.size,
            })
        }
    }

    /// 是否在棋盘内且未访问
    #[inline]
    pub fn is_free(&self, pos: Position) -> bool {
        self.contains(pos) && !self.visited[self.index(pos)]
    }

    /// 是否在棋盘内且已访问
    #[inline]
    pub fn is_visited(&self, pos: Position) -> bool {
        self.contains(pos) && self.visited[self.index(pos)]
    }

    /// 标记为已访问，返回之前是否空闲
    pub fn visit(&mut self, pos: Position) -> Result<bool> {
        self.check(pos)?;
        let idx = self.index(pos);
        let was_free = !self.visited[idx];
        self.visited[idx] = true;
        Ok(was_free)
    }

    /// 取消访问标记
    pub fn unvisit(&mut self, pos: Position) -> Result<()> {
        self.check(pos)?;
        let idx = self.index(pos);
        self.visited[idx] = false;
        Ok(())
    }

    /// 已访问格子数
    pub fn visited_count(&self) -> usize {
        self.visited.iter().filter(|&&v| v).count()
    }

    /// 清空所有占用
    pub fn reset(&mut self) {
        self.visited.iter_mut().for_each(|v| *v = false);
    }

    /// 所有格子（行优先）
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let n = self.size as i32;
        (0..n).flat_map(move |row| (0..n).map(move |col| Position::new(row, col)))
    }

    /// 获取合法走法：按偏移量顺序，落在棋盘内且未访问
    pub fn legal_moves(&self, pos: Position) -> Result<Vec<Position>> {
        self.check(pos)?;
        Ok(self.candidates(pos))
    }

    /// 合法走法（调用方保证 pos 在棋盘内）
    pub(crate) fn candidates(&self, pos: Position) -> Vec<Position> {
        self.candidates_with_offset(pos)
            .into_iter()
            .map(|(_, to)| to)
            .collect()
    }

    /// 合法走法及其偏移量下标
    pub(crate) fn candidates_with_offset(&self, pos: Position) -> Vec<(usize, Position)> {
        debug_assert!(self.contains(pos), "candidates from off-board {}", pos);
        let mut moves = Vec::with_capacity(8);
        for (i, &(dr, dc)) in KNIGHT_OFFSETS.iter().enumerate() {
            let to = pos.offset(dr, dc);
            if self.is_free(to) {
                moves.push((i, to));
            }
        }
        moves
    }

    /// 合法走法数量（不分配）
    #[inline]
    pub fn onward_count(&self, pos: Position) -> usize {
        KNIGHT_OFFSETS
            .iter()
            .filter(|&&(dr, dc)| self.is_free(pos.offset(dr, dc)))
            .count()
    }

    /// 试探性占用：返回的守卫在离开作用域时自动撤销
    ///
    /// # Panics
    ///
    /// pos 不在棋盘内时 panic
    pub(crate) fn tentative(&mut self, pos: Position) -> TentativeVisit<'_> {
        assert!(self.contains(pos), "tentative visit off the board: {}", pos);
        let idx = self.index(pos);
        let was_free = !self.visited[idx];
        self.visited[idx] = true;
        TentativeVisit {
            board: self,
            idx,
            was_free,
        }
    }

    /// 试探性占用后的走法数量（Warnsdorff 一步前瞻）
    pub(crate) fn onward_after(&mut self, pos: Position) -> usize {
        let guard = self.tentative(pos);
        guard.onward_count(pos)
    }
}

/// 试探性占用守卫
///
/// 解引用为 Board；drop 时恢复该格原来的状态
pub(crate) struct TentativeVisit<'a> {
    board: &'a mut Board,
    idx: usize,
    was_free: bool,
}

impl Deref for TentativeVisit<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl DerefMut for TentativeVisit<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        self.board
    }
}

impl Drop for TentativeVisit<'_> {
    fn drop(&mut self) {
        if self.was_free {
            self.board.visited[self.idx] = false;
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..self.size).rev() {
            let line: String = (0..self.size)
                .map(|col| {
                    if self.visited[row * self.size + col] {
                        '#'
                    } else {
                        '.'
                    }
                })
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
