//! 骑士巡游核心类型定义
//!
//! 定义棋盘坐标、马步偏移量和策略名称

use crate::error::TourError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 最小棋盘尺寸
pub const MIN_BOARD_SIZE: usize = 5;

/// 最大棋盘尺寸（列名保持单个字母）
pub const MAX_BOARD_SIZE: usize = 26;

/// 马的八个走法偏移量 (row, col)
///
/// 顺序固定：所有策略在分数相同时选择最先出现的候选
pub const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

/// 棋盘位置 (row, col)
///
/// 0 起始；使用有符号整数，越界坐标可以表示并被拒绝
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Position { row, col }
    }

    /// 位置加偏移量
    #[inline]
    pub fn offset(&self, row_delta: i32, col_delta: i32) -> Position {
        Position {
            row: self.row + row_delta,
            col: self.col + col_delta,
        }
    }

    /// 检查位置是否在 size×size 棋盘范围内
    #[inline]
    pub fn is_within(&self, size: usize) -> bool {
        let n = size as i32;
        (0..n).contains(&self.row) && (0..n).contains(&self.col)
    }

    /// 到另一个位置的偏移量
    pub fn delta(&self, other: Position) -> (i32, i32) {
        (other.row - self.row, other.col - self.col)
    }

    /// 两个位置之间是否相差一个马步
    pub fn is_knight_move_to(&self, other: Position) -> bool {
        KNIGHT_OFFSETS.contains(&self.delta(other))
    }

    /// 从代数坐标解析（如 "a1" = (0, 0)，"h8" = (7, 7)）
    pub fn from_algebraic(s: &str) -> Result<Position, TourError> {
        let s = s.trim();
        let mut chars = s.chars();
        let col = match chars.next() {
            Some(c) if c.is_ascii_alphabetic() => (c.to_ascii_lowercase() as i32) - ('a' as i32),
            _ => return Err(TourError::InvalidSquareName(s.to_string())),
        };
        let rank: i32 = chars
            .as_str()
            .parse()
            .map_err(|_| TourError::InvalidSquareName(s.to_string()))?;
        if rank < 1 {
            return Err(TourError::InvalidSquareName(s.to_string()));
        }
        Ok(Position { row: rank - 1, col })
    }

    /// 转换为代数坐标（如 "a1"）
    ///
    /// 负坐标没有代数名称，返回 None
    pub fn to_algebraic(&self) -> Option<String> {
        if self.row < 0 || !(0..MAX_BOARD_SIZE as i32).contains(&self.col) {
            return None;
        }
        let col_char = (b'a' + self.col as u8) as char;
        Some(format!("{}{}", col_char, self.row + 1))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// 启发式策略名称
///
/// 声明顺序即基准测试的运行顺序与平局时的优先顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PolicyName {
    Warnsdorff,
    Neural,
    Backtracking,
    DivideAndConquer,
    #[serde(rename = "AML")]
    Aml,
}

impl PolicyName {
    /// 所有策略（声明顺序）
    pub const ALL: [PolicyName; 5] = [
        PolicyName::Warnsdorff,
        PolicyName::Neural,
        PolicyName::Backtracking,
        PolicyName::DivideAndConquer,
        PolicyName::Aml,
    ];

    /// 严格解析，不认识的名称返回 None
    pub fn parse_strict(name: &str) -> Option<PolicyName> {
        match name.trim().to_lowercase().as_str() {
            "warnsdorff" => Some(PolicyName::Warnsdorff),
            "neural" => Some(PolicyName::Neural),
            "backtracking" | "backtrack" => Some(PolicyName::Backtracking),
            "divideandconquer" | "divide_and_conquer" | "divide-and-conquer" | "dc" => {
                Some(PolicyName::DivideAndConquer)
            }
            "aml" => Some(PolicyName::Aml),
            _ => None,
        }
    }

    /// 解析策略名称，不认识的名称回退到 Warnsdorff
    pub fn from_name(name: &str) -> PolicyName {
        match Self::parse_strict(name) {
            Some(policy) => policy,
            None => {
                log::warn!("unknown policy {:?}, falling back to Warnsdorff", name);
                PolicyName::Warnsdorff
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyName::Warnsdorff => "Warnsdorff",
            PolicyName::Neural => "Neural",
            PolicyName::Backtracking => "Backtracking",
            PolicyName::DivideAndConquer => "DivideAndConquer",
            PolicyName::Aml => "AML",
        }
    }

    /// 一行说明（用于 CLI 帮助）
    pub fn description(&self) -> &'static str {
        match self {
            PolicyName::Warnsdorff => "visit the square with the fewest onward moves first",
            PolicyName::Neural => {
                "weighted mix of onward moves (0.6), edge distance (0.3) and centrality (0.1)"
            }
            PolicyName::Backtracking => "bounded lookahead search, highest aggregate mobility wins",
            PolicyName::DivideAndConquer => "prefer mobile squares in the least visited quadrant",
            PolicyName::Aml => "Warnsdorff with corner, edge and direction tie-breaks",
        }
    }
}

/// 宽松解析：永远成功
impl FromStr for PolicyName {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(PolicyName::from_name(s))
    }
}

impl fmt::Display for PolicyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 策略帮助信息
pub fn policies_help() -> String {
    PolicyName::ALL
        .iter()
        .map(|p| format!("  {:<17} {}", p.as_str(), p.description()))
        .collect::<Vec<_>>()
        .join("\n")
}
