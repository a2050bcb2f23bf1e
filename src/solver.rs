//! 巡游求解器
//!
//! 两个状态：Running 与 Terminated。每一步都交给策略选择，选定后不再回退。

use crate::board::Board;
use crate::error::{Result, TourDefect, TourError};
use crate::policy::{HeuristicPolicy, PolicyConfig};
use crate::types::{PolicyName, Position};
use log::{debug, trace};
use serde::Serialize;

/// 巡游路径：第一个元素是起点，之后每一步是一个马步
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tour {
    size: usize,
    squares: Vec<Position>,
}

impl Tour {
    /// 从已知路径构建（例如调用方保存的结果）
    ///
    /// 检查棋盘尺寸、坐标范围、重复格子和马步连续性
    pub fn new(size: usize, squares: Vec<Position>) -> Result<Tour> {
        let board = Board::from_tour(size, &squares)?;
        if board.visited_count() != squares.len() {
            let repeated = squares
                .iter()
                .enumerate()
                .find(|(i, p)| squares[..*i].contains(p))
                .map(|(_, p)| *p);
            if let Some(position) = repeated {
                return Err(TourError::InvalidTour {
                    position,
                    reason: TourDefect::RepeatedSquare,
                });
            }
        }
        if let Some(pair) = squares.windows(2).find(|w| !w[0].is_knight_move_to(w[1])) {
            return Err(TourError::InvalidTour {
                position: pair[1],
                reason: TourDefect::NotKnightMove,
            });
        }
        Ok(Tour { size, squares })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn squares(&self) -> &[Position] {
        &self.squares
    }

    pub fn len(&self) -> usize {
        self.squares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }

    pub fn start(&self) -> Option<Position> {
        self.squares.first().copied()
    }

    pub fn last(&self) -> Option<Position> {
        self.squares.last().copied()
    }

    /// 是否走满整个棋盘
    pub fn is_complete(&self) -> bool {
        self.squares.len() == self.size * self.size
    }

    /// 覆盖率（百分比）
    pub fn coverage(&self) -> f64 {
        self.squares.len() as f64 / (self.size * self.size) as f64 * 100.0
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.squares.contains(&pos)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Position> {
        self.squares.iter()
    }

    /// 每个格子的步数（1 起始），未访问为 None；行优先
    pub fn step_grid(&self) -> Vec<Vec<Option<usize>>> {
        let mut grid = vec![vec![None; self.size]; self.size];
        for (step, pos) in self.squares.iter().enumerate() {
            grid[pos.row as usize][pos.col as usize] = Some(step + 1);
        }
        grid
    }
}

impl<'a> IntoIterator for &'a Tour {
    type Item = &'a Position;
    type IntoIter = std::slice::Iter<'a, Position>;

    fn into_iter(self) -> Self::IntoIter {
        self.squares.iter()
    }
}

/// 求解器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SolverState {
    Running,
    Terminated,
}

/// 结束原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Termination {
    /// 走满棋盘
    Complete,
    /// 没有合法走法
    Starved,
}

/// 求解结果：路径、最终棋盘和结束原因
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub tour: Tour,
    pub board: Board,
    pub termination: Termination,
}

/// 巡游求解器
pub struct TourSolver {
    board: Board,
    squares: Vec<Position>,
    policy: HeuristicPolicy,
    state: SolverState,
    termination: Option<Termination>,
}

impl TourSolver {
    /// 创建求解器：棋盘只占用起点
    pub fn new(size: usize, start: Position, policy: HeuristicPolicy) -> Result<Self> {
        let mut board = Board::new(size)?;
        if !board.contains(start) {
            return Err(TourError::InvalidStart {
                position: start,
                size,
            });
        }
        board.visit(start)?;

        let mut squares = Vec::with_capacity(size * size);
        squares.push(start);

        Ok(TourSolver {
            board,
            squares,
            policy,
            state: SolverState::Running,
            termination: None,
        })
    }

    pub fn state(&self) -> SolverState {
        self.state
    }

    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn squares(&self) -> &[Position] {
        &self.squares
    }

    pub fn policy(&self) -> &HeuristicPolicy {
        &self.policy
    }

    /// 当前位置
    pub fn current(&self) -> Position {
        self.squares[self.squares.len() - 1]
    }

    fn terminate(&mut self, reason: Termination) {
        self.state = SolverState::Terminated;
        self.termination = Some(reason);
        debug!(
            "{} tour terminated ({:?}) after {} squares",
            self.policy.name(),
            reason,
            self.squares.len()
        );
    }

    /// 前进一步
    pub fn step(&mut self) -> Result<SolverState> {
        if self.state == SolverState::Terminated {
            return Ok(self.state);
        }
        if self.squares.len() >= self.board.area() {
            self.terminate(Termination::Complete);
            return Ok(self.state);
        }

        let current = self.current();
        match self.policy.next_move(current, &mut self.board)? {
            Some(next) => {
                let was_free = self.board.visit(next)?;
                debug_assert!(was_free, "policy revisited {}", next);
                debug_assert!(current.is_knight_move_to(next));
                trace!("step {}: {} -> {}", self.squares.len(), current, next);
                self.squares.push(next);
                if self.squares.len() == self.board.area() {
                    self.terminate(Termination::Complete);
                }
            }
            None => self.terminate(Termination::Starved),
        }
        Ok(self.state)
    }

    /// 运行到结束
    pub fn run(mut self) -> Result<SolveOutcome> {
        while self.step()? == SolverState::Running {}
        let termination = self.termination.unwrap_or(Termination::Starved);
        Ok(SolveOutcome {
            tour: Tour {
                size: self.board.size(),
                squares: self.squares,
            },
            board: self.board,
            termination,
        })
    }
}

/// 使用给定策略求解
pub fn solve_with(size: usize, start: Position, policy: HeuristicPolicy) -> Result<SolveOutcome> {
    TourSolver::new(size, start, policy)?.run()
}

/// 使用默认配置求解
pub fn solve(size: usize, start: Position, policy: PolicyName) -> Result<Tour> {
    let policy = HeuristicPolicy::new(policy, &PolicyConfig::default());
    Ok(solve_with(size, start, policy)?.tour)
}
