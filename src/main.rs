//! Knight's Tour CLI
//!
//! 命令行界面，用于运行和对比巡游策略
//!
//! 支持两种模式：
//! 1. 单次命令模式：每次执行一个命令
//! 2. Server 模式：长驻进程，通过 stdin/stdout 通信

use clap::{Parser, Subcommand};
use knight_tour::{
    analyze_reachability, benchmark_with, policies_help, solve_with, BenchmarkReport, Board,
    HeuristicPolicy, PolicyConfig, PolicyName, Position, ScoredMove, Termination, Tour,
    TourError, UnreachableSet,
};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "knight-tour")]
#[command(about = "Knight's Tour heuristic engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// 起点参数
#[derive(clap::Args, Clone)]
struct StartArgs {
    /// 棋盘尺寸
    #[arg(long, default_value = "8")]
    size: usize,

    /// 起点行（0 起始）
    #[arg(long, default_value = "0")]
    row: i32,

    /// 起点列（0 起始）
    #[arg(long, default_value = "0")]
    col: i32,

    /// 代数坐标起点（如 a1），优先于 --row/--col
    #[arg(long)]
    square: Option<String>,

    /// 随机起点
    #[arg(long)]
    random_start: bool,

    /// 随机种子
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// 求解一次巡游
    Tour {
        #[command(flatten)]
        start: StartArgs,

        /// 策略 (Warnsdorff, Neural, Backtracking, DivideAndConquer, AML)
        #[arg(long, default_value = "Warnsdorff")]
        policy: String,

        /// 回溯深度
        #[arg(long, default_value = "3")]
        depth: u32,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 列出某个格子的候选走法及评分
    Moves {
        #[command(flatten)]
        start: StartArgs,

        /// 策略
        #[arg(long, default_value = "Warnsdorff")]
        policy: String,

        /// 回溯深度
        #[arg(long, default_value = "3")]
        depth: u32,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 对比所有策略
    Bench {
        #[command(flatten)]
        start: StartArgs,

        /// 回溯深度
        #[arg(long, default_value = "3")]
        depth: u32,

        /// 并行运行各策略
        #[arg(long)]
        parallel: bool,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 列出可用策略
    Policies,

    /// 启动 server 模式（stdin/stdout 通信）
    Server,
}

#[derive(Serialize)]
struct TourResponse {
    policy: PolicyName,
    board_size: usize,
    start: Position,
    squares: Vec<Position>,
    visited: usize,
    coverage: f64,
    termination: Termination,
    elapsed_ms: f64,
    unreached: UnreachableSet,
}

#[derive(Serialize)]
struct MovesResponse {
    policy: PolicyName,
    from: Position,
    moves: Vec<ScoredMove>,
    best: Option<Position>,
}

// Server 模式的请求和响应结构
#[derive(Serialize, Deserialize)]
struct ServerRequest {
    cmd: String,
    #[serde(default)]
    size: Option<usize>,
    #[serde(default)]
    row: Option<i32>,
    #[serde(default)]
    col: Option<i32>,
    #[serde(default)]
    policy: Option<String>,
    #[serde(default)]
    depth: Option<u32>,
    #[serde(default)]
    parallel: Option<bool>,
}

#[derive(Serialize, Default)]
struct ServerResponse {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    tour: Option<TourResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    moves: Option<MovesResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bench: Option<BenchmarkReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ServerResponse {
    fn error(msg: &str) -> Self {
        Self {
            ok: false,
            error: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) {
    let encoded = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match encoded {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Error: failed to encode JSON: {}", e),
    }
}

fn exit_with(e: TourError) -> ! {
    eprintln!("Error: {}", e);
    std::process::exit(1);
}

/// 解析起点
fn resolve_start(args: &StartArgs) -> Result<Position, TourError> {
    if args.random_start {
        let mut rng = match args.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        let n = args.size as i32;
        if n <= 0 {
            return Err(TourError::InvalidBoardSize { size: args.size });
        }
        return Ok(Position::new(rng.gen_range(0..n), rng.gen_range(0..n)));
    }
    match &args.square {
        Some(name) => Position::from_algebraic(name),
        None => Ok(Position::new(args.row, args.col)),
    }
}

fn square_name(pos: Position) -> String {
    pos.to_algebraic().unwrap_or_else(|| pos.to_string())
}

fn run_tour(size: usize, start: Position, policy: HeuristicPolicy) -> Result<TourResponse, TourError> {
    let name = policy.name();
    let started = Instant::now();
    let outcome = solve_with(size, start, policy)?;
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    let unreached = analyze_reachability(&outcome.board, &outcome.tour);

    Ok(TourResponse {
        policy: name,
        board_size: size,
        start,
        visited: outcome.tour.len(),
        coverage: outcome.tour.coverage(),
        squares: outcome.tour.squares().to_vec(),
        termination: outcome.termination,
        elapsed_ms,
        unreached,
    })
}

fn run_moves(size: usize, from: Position, policy: &HeuristicPolicy) -> Result<MovesResponse, TourError> {
    let mut board = Board::new(size)?;
    board.visit(from)?;
    let moves = policy.score_moves(from, &mut board)?;
    let best = policy.next_move(from, &mut board)?;
    Ok(MovesResponse {
        policy: policy.name(),
        from,
        moves,
        best,
    })
}

/// 打印步数网格：上方为最大行号
fn print_grid(size: usize, squares: &[Position]) {
    let tour = match Tour::new(size, squares.to_vec()) {
        Ok(t) => t,
        Err(e) => exit_with(e),
    };
    let grid = tour.step_grid();
    let width = (size * size).to_string().len() + 1;
    for (row, cells) in grid.iter().enumerate().rev() {
        let line: String = cells
            .iter()
            .map(|c| match c {
                Some(step) => format!("{:>w$}", step, w = width),
                None => format!("{:>w$}", "x", w = width),
            })
            .collect();
        println!("{:>3} {}", row + 1, line);
    }
    let files: String = (0..size)
        .map(|c| format!("{:>w$}", (b'a' + c as u8) as char, w = width))
        .collect();
    println!("    {}", files);
}

fn print_tour(resp: &TourResponse) {
    let area = resp.board_size * resp.board_size;
    println!(
        "Tour (policy={}, {}x{}, start={}):",
        resp.policy,
        resp.board_size,
        resp.board_size,
        square_name(resp.start)
    );
    print_grid(resp.board_size, &resp.squares);
    println!();
    println!("Visited:   {}/{} ({:.1}%)", resp.visited, area, resp.coverage);
    println!(
        "Unreached: {} (boxed in: {})",
        resp.unreached.len(),
        resp.unreached.boxed_in_count()
    );
    println!("Ended:     {:?} in {:.3} ms", resp.termination, resp.elapsed_ms);
    let path: Vec<String> = resp.squares.iter().map(|&p| square_name(p)).collect();
    println!("Path: {}", path.join(" "));
}

fn print_bench(report: &BenchmarkReport) {
    println!(
        "Benchmark {}x{} from {}:",
        report.board_size,
        report.board_size,
        square_name(report.start)
    );
    println!(
        "  {:<17} {:>8} {:>9} {:>11} {:>10}",
        "policy", "visited", "coverage", "time (ms)", "unreached"
    );
    for row in report.rows.values() {
        println!(
            "  {:<17} {:>8} {:>8.1}% {:>11.3} {:>10}",
            row.policy.as_str(),
            row.squares_visited,
            row.coverage,
            row.elapsed_ms,
            row.unreached
        );
    }
    let ranking = &report.ranking;
    println!();
    println!("Best coverage:    {}", ranking.best_coverage);
    println!("Fastest:          {}", ranking.fastest);
    println!("Fewest unreached: {}", ranking.fewest_unreached);
    println!("Overall:");
    for (i, s) in ranking.overall.iter().enumerate() {
        println!("  {}. {:<17} {:.3}", i + 1, s.policy.as_str(), s.score);
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Tour {
            start,
            policy,
            depth,
            json,
        } => {
            let size = start.size;
            let start = resolve_start(&start).unwrap_or_else(|e| exit_with(e));
            let config = PolicyConfig {
                backtracking_depth: depth,
            };
            let policy = HeuristicPolicy::from_name(&policy, &config);
            match run_tour(size, start, policy) {
                Ok(resp) => {
                    if json {
                        print_json(&resp, true);
                    } else {
                        print_tour(&resp);
                    }
                }
                Err(e) => exit_with(e),
            }
        }

        Commands::Moves {
            start,
            policy,
            depth,
            json,
        } => {
            let size = start.size;
            let from = resolve_start(&start).unwrap_or_else(|e| exit_with(e));
            let config = PolicyConfig {
                backtracking_depth: depth,
            };
            let policy = HeuristicPolicy::from_name(&policy, &config);
            match run_moves(size, from, &policy) {
                Ok(resp) => {
                    if json {
                        print_json(&resp, true);
                    } else {
                        println!(
                            "Moves from {} (policy={}):",
                            square_name(resp.from),
                            resp.policy
                        );
                        for sm in &resp.moves {
                            let marker = if Some(sm.to) == resp.best { " *" } else { "" };
                            println!("  {} (score: {:.3}){}", square_name(sm.to), sm.score, marker);
                        }
                    }
                }
                Err(e) => exit_with(e),
            }
        }

        Commands::Bench {
            start,
            depth,
            parallel,
            json,
        } => {
            let size = start.size;
            let start = resolve_start(&start).unwrap_or_else(|e| exit_with(e));
            let config = PolicyConfig {
                backtracking_depth: depth,
            };
            match benchmark_with(size, start, &config, parallel) {
                Ok(report) => {
                    if json {
                        print_json(&report, true);
                    } else {
                        print_bench(&report);
                    }
                }
                Err(e) => exit_with(e),
            }
        }

        Commands::Policies => {
            println!("Available policies:");
            println!("{}", policies_help());
        }

        Commands::Server => {
            run_server();
        }
    }
}

/// Server 模式主循环
/// 从 stdin 读取 JSON 请求，返回 JSON 响应到 stdout
fn run_server() {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        // 空行跳过
        if line.trim().is_empty() {
            continue;
        }

        let request: ServerRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                print_json(&ServerResponse::error(&format!("Invalid JSON: {}", e)), false);
                let _ = stdout.flush();
                continue;
            }
        };

        let response = match request.cmd.as_str() {
            "tour" => handle_tour_request(&request),
            "moves" => handle_moves_request(&request),
            "bench" => handle_bench_request(&request),
            "quit" => break,
            _ => ServerResponse::error(&format!("Unknown command: {}", request.cmd)),
        };

        print_json(&response, false);
        let _ = stdout.flush();
    }
}

fn request_parts(request: &ServerRequest) -> (usize, Position, PolicyConfig) {
    let size = request.size.unwrap_or(8);
    let start = Position::new(request.row.unwrap_or(0), request.col.unwrap_or(0));
    let config = PolicyConfig {
        backtracking_depth: request.depth.unwrap_or(knight_tour::DEFAULT_BACKTRACKING_DEPTH),
    };
    (size, start, config)
}

/// 处理 tour 命令
fn handle_tour_request(request: &ServerRequest) -> ServerResponse {
    let (size, start, config) = request_parts(request);
    let policy = HeuristicPolicy::from_name(request.policy.as_deref().unwrap_or("Warnsdorff"), &config);
    match run_tour(size, start, policy) {
        Ok(tour) => ServerResponse {
            ok: true,
            tour: Some(tour),
            ..Default::default()
        },
        Err(e) => ServerResponse::error(&e.to_string()),
    }
}

/// 处理 moves 命令
fn handle_moves_request(request: &ServerRequest) -> ServerResponse {
    let (size, from, config) = request_parts(request);
    let policy = HeuristicPolicy::from_name(request.policy.as_deref().unwrap_or("Warnsdorff"), &config);
    match run_moves(size, from, &policy) {
        Ok(moves) => ServerResponse {
            ok: true,
            moves: Some(moves),
            ..Default::default()
        },
        Err(e) => ServerResponse::error(&e.to_string()),
    }
}

/// 处理 bench 命令
fn handle_bench_request(request: &ServerRequest) -> ServerResponse {
    let (size, start, config) = request_parts(request);
    match benchmark_with(size, start, &config, request.parallel.unwrap_or(false)) {
        Ok(report) => ServerResponse {
            ok: true,
            bench: Some(report),
            ..Default::default()
        },
        Err(e) => ServerResponse::error(&e.to_string()),
    }
}
