//! 策略对比基准
//!
//! 每个策略用独立的棋盘各跑一次，统计覆盖率、耗时、未访问格子数并排名。

use crate::error::Result;
use crate::policy::{HeuristicPolicy, PolicyConfig};
use crate::reach::analyze_reachability;
use crate::solver::solve_with;
use crate::types::{PolicyName, Position};
use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;

/// 单个策略的统计
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkRow {
    pub policy: PolicyName,
    /// 访问的格子数
    pub squares_visited: usize,
    /// 覆盖率（百分比）
    pub coverage: f64,
    /// 耗时（毫秒）
    pub elapsed_ms: f64,
    /// 未访问格子数
    pub unreached: usize,
    /// 其中被围死的格子数
    pub boxed_in: usize,
}

/// 综合得分
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallScore {
    pub policy: PolicyName,
    pub score: f64,
}

/// 排名结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
    pub best_coverage: PolicyName,
    pub fastest: PolicyName,
    pub fewest_unreached: PolicyName,
    /// 综合得分从高到低
    pub overall: Vec<OverallScore>,
}

impl Ranking {
    pub fn best_overall(&self) -> PolicyName {
        self.overall[0].policy
    }

    /// 由统计行计算排名；rows 须非空且按声明顺序排列
    fn from_rows(rows: &[BenchmarkRow]) -> Ranking {
        let coverage: Vec<f64> = rows.iter().map(|r| r.coverage).collect();
        let time: Vec<f64> = rows.iter().map(|r| r.elapsed_ms).collect();
        let unreached: Vec<f64> = rows.iter().map(|r| r.unreached as f64).collect();

        let coverage_norm = normalize(&coverage, false);
        let time_norm = normalize(&time, true);
        let unreached_norm = normalize(&unreached, true);

        let mut overall: Vec<OverallScore> = rows
            .iter()
            .enumerate()
            .map(|(i, r)| OverallScore {
                policy: r.policy,
                score: (coverage_norm[i] + time_norm[i] + unreached_norm[i]) / 3.0,
            })
            .collect();
        // 稳定排序：同分保持声明顺序
        overall.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ranking {
            best_coverage: rows[first_best(&coverage, true)].policy,
            fastest: rows[first_best(&time, false)].policy,
            fewest_unreached: rows[first_best(&unreached, false)].policy,
            overall,
        }
    }
}

/// 最小-最大归一化到 [0,1]；invert 时越小越好。极差为 0 时全部记 1.0
fn normalize(values: &[f64], invert: bool) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    values
        .iter()
        .map(|&v| {
            if range <= 0.0 {
                1.0
            } else if invert {
                (max - v) / range
            } else {
                (v - min) / range
            }
        })
        .collect()
}

/// 第一个最大（或最小）值的下标
fn first_best(values: &[f64], highest: bool) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        let better = if highest {
            v > values[best]
        } else {
            v < values[best]
        };
        if better {
            best = i;
        }
    }
    best
}

/// 基准结果
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkReport {
    pub board_size: usize,
    pub start: Position,
    pub rows: BTreeMap<PolicyName, BenchmarkRow>,
    pub ranking: Ranking,
}

/// 单个策略跑一次
fn run_policy(
    size: usize,
    start: Position,
    name: PolicyName,
    config: &PolicyConfig,
) -> Result<BenchmarkRow> {
    let policy = HeuristicPolicy::new(name, config);
    let started = Instant::now();
    let outcome = solve_with(size, start, policy)?;
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    let unreachable = analyze_reachability(&outcome.board, &outcome.tour);
    let row = BenchmarkRow {
        policy: name,
        squares_visited: outcome.tour.len(),
        coverage: outcome.tour.coverage(),
        elapsed_ms,
        unreached: unreachable.len(),
        boxed_in: unreachable.boxed_in_count(),
    };
    debug!(
        "{}: {} squares ({:.1}%), {:.3} ms, {} unreached",
        name, row.squares_visited, row.coverage, row.elapsed_ms, row.unreached
    );
    Ok(row)
}

/// 对比所有策略（默认配置，顺序执行）
pub fn benchmark(size: usize, start: Position) -> Result<BenchmarkReport> {
    benchmark_with(size, start, &PolicyConfig::default(), false)
}

/// 对比所有策略
///
/// parallel 为 true 时每个策略在 rayon 线程上运行，各自拥有独立棋盘
pub fn benchmark_with(
    size: usize,
    start: Position,
    config: &PolicyConfig,
    parallel: bool,
) -> Result<BenchmarkReport> {
    let rows: Vec<BenchmarkRow> = if parallel {
        PolicyName::ALL
            .par_iter()
            .map(|&name| run_policy(size, start, name, config))
            .collect::<Result<Vec<_>>>()?
    } else {
        PolicyName::ALL
            .iter()
            .map(|&name| run_policy(size, start, name, config))
            .collect::<Result<Vec<_>>>()?
    };

    let ranking = Ranking::from_rows(&rows);
    info!(
        "benchmark {}x{} from {}: best coverage {}, fastest {}, overall {}",
        size,
        size,
        start,
        ranking.best_coverage,
        ranking.fastest,
        ranking.best_overall()
    );

    Ok(BenchmarkReport {
        board_size: size,
        start,
        rows: rows.into_iter().map(|r| (r.policy, r)).collect(),
        ranking,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TourError;

    fn row(policy: PolicyName, coverage: f64, elapsed_ms: f64, unreached: usize) -> BenchmarkRow {
        BenchmarkRow {
            policy,
            squares_visited: 0,
            coverage,
            elapsed_ms,
            unreached,
            boxed_in: 0,
        }
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(&[1.0, 3.0, 2.0], false), vec![0.0, 1.0, 0.5]);
        assert_eq!(normalize(&[1.0, 3.0, 2.0], true), vec![1.0, 0.0, 0.5]);
        assert_eq!(normalize(&[4.0, 4.0], true), vec![1.0, 1.0]);
    }

    #[test]
    fn test_first_best_keeps_earliest() {
        assert_eq!(first_best(&[1.0, 5.0, 5.0], true), 1);
        assert_eq!(first_best(&[2.0, 1.0, 1.0], false), 1);
        assert_eq!(first_best(&[3.0, 3.0], true), 0);
    }

    #[test]
    fn test_ranking_from_rows() {
        let rows = vec![
            row(PolicyName::Warnsdorff, 100.0, 1.0, 0),
            row(PolicyName::Neural, 50.0, 2.0, 32),
            row(PolicyName::Backtracking, 75.0, 9.0, 16),
        ];
        let ranking = Ranking::from_rows(&rows);
        assert_eq!(ranking.best_coverage, PolicyName::Warnsdorff);
        assert_eq!(ranking.fastest, PolicyName::Warnsdorff);
        assert_eq!(ranking.fewest_unreached, PolicyName::Warnsdorff);
        assert_eq!(ranking.best_overall(), PolicyName::Warnsdorff);
        assert_eq!(ranking.overall[0].score, 1.0);
        // Neural: (0 + 7/8 + 0) / 3；Backtracking: (0.5 + 0 + 0.5) / 3
        assert_eq!(ranking.overall[1].policy, PolicyName::Backtracking);
        assert_eq!(ranking.overall[2].policy, PolicyName::Neural);
    }

    #[test]
    fn test_overall_ties_keep_declared_order() {
        let rows = vec![
            row(PolicyName::Warnsdorff, 100.0, 1.0, 0),
            row(PolicyName::Neural, 100.0, 1.0, 0),
            row(PolicyName::Aml, 100.0, 1.0, 0),
        ];
        let ranking = Ranking::from_rows(&rows);
        let order: Vec<PolicyName> = ranking.overall.iter().map(|s| s.policy).collect();
        assert_eq!(
            order,
            vec![PolicyName::Warnsdorff, PolicyName::Neural, PolicyName::Aml]
        );
        assert_eq!(ranking.best_coverage, PolicyName::Warnsdorff);
    }

    #[test]
    fn test_benchmark_covers_every_policy() {
        let report = benchmark(8, Position::new(0, 0)).unwrap();
        assert_eq!(report.rows.len(), PolicyName::ALL.len());
        let warnsdorff = &report.rows[&PolicyName::Warnsdorff];
        assert_eq!(warnsdorff.squares_visited, 64);
        assert_eq!(warnsdorff.coverage, 100.0);
        assert_eq!(warnsdorff.unreached, 0);
        assert_eq!(report.rows[&PolicyName::Neural].unreached, 28);
        assert_eq!(report.rows[&PolicyName::Backtracking].squares_visited, 46);
        assert_eq!(report.ranking.best_coverage, PolicyName::Warnsdorff);
        assert_eq!(report.ranking.fewest_unreached, PolicyName::Warnsdorff);
        for row in report.rows.values() {
            assert!(row.elapsed_ms > 0.0);
            assert_eq!(row.squares_visited + row.unreached, 64);
        }
    }

    #[test]
    fn test_benchmark_is_idempotent_apart_from_time() {
        let a = benchmark(8, Position::new(2, 3)).unwrap();
        let b = benchmark(8, Position::new(2, 3)).unwrap();
        for policy in PolicyName::ALL {
            let (ra, rb) = (&a.rows[&policy], &b.rows[&policy]);
            assert_eq!(ra.coverage, rb.coverage);
            assert_eq!(ra.unreached, rb.unreached);
            assert_eq!(ra.squares_visited, rb.squares_visited);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let config = PolicyConfig::default();
        let seq = benchmark_with(6, Position::new(0, 0), &config, false).unwrap();
        let par = benchmark_with(6, Position::new(0, 0), &config, true).unwrap();
        for policy in PolicyName::ALL {
            assert_eq!(seq.rows[&policy].coverage, par.rows[&policy].coverage);
            assert_eq!(seq.rows[&policy].unreached, par.rows[&policy].unreached);
        }
    }

    #[test]
    fn test_benchmark_rejects_invalid_start() {
        let err = benchmark(8, Position::new(0, 9)).unwrap_err();
        assert!(matches!(err, TourError::InvalidStart { .. }));
    }
}
