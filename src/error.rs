//! 错误类型

use crate::types::{Position, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use std::fmt;
use thiserror::Error;

/// 路径不合法的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourDefect {
    /// 同一格出现两次
    RepeatedSquare,
    /// 相邻两格不是马步
    NotKnightMove,
}

impl fmt::Display for TourDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TourDefect::RepeatedSquare => write!(f, "square visited twice"),
            TourDefect::NotKnightMove => write!(f, "step is not a knight move"),
        }
    }
}

/// 骑士巡游错误
///
/// 走不动（无合法走法）和走满棋盘都是正常结束，不属于错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TourError {
    /// 向走法生成传入越界坐标（调用方的 bug）
    #[error("invalid position {position} for a {size}x{size} board")]
    InvalidPosition { position: Position, size: usize },

    /// 起点不在棋盘内
    #[error("start {position} lies outside the {size}x{size} board")]
    InvalidStart { position: Position, size: usize },

    /// 棋盘尺寸不受支持
    #[error(
        "board size {size} is not supported (expected {}..={})",
        MIN_BOARD_SIZE,
        MAX_BOARD_SIZE
    )]
    InvalidBoardSize { size: usize },

    /// 给定路径不是合法巡游
    #[error("invalid tour at {position}: {reason}")]
    InvalidTour {
        position: Position,
        reason: TourDefect,
    },

    /// 无法解析的代数坐标
    #[error("invalid square name: {0:?}")]
    InvalidSquareName(String),
}

pub type Result<T> = std::result::Result<T, TourError>;
