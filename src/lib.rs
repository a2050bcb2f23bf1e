//! Knight's Tour Heuristic Engine
//!
//! 骑士巡游启发式引擎 - 多种选步策略、可达性分析与策略对比

pub mod benchmark;
pub mod board;
pub mod error;
pub mod policy;
pub mod reach;
pub mod solver;
pub mod types;

pub use benchmark::{benchmark, benchmark_with, BenchmarkReport, BenchmarkRow, OverallScore, Ranking};
pub use board::Board;
pub use error::{Result, TourDefect, TourError};
pub use policy::{
    HeuristicPolicy, MovePolicy, PolicyConfig, Preference, ScoredMove, DEFAULT_BACKTRACKING_DEPTH,
    MAX_BACKTRACKING_DEPTH,
};
pub use reach::{analyze_reachability, UnreachableSet, UnreachedSquare};
pub use solver::{solve, solve_with, SolveOutcome, SolverState, Termination, Tour, TourSolver};
pub use types::{
    policies_help, PolicyName, Position, KNIGHT_OFFSETS, MAX_BOARD_SIZE, MIN_BOARD_SIZE,
};
