//! A command line utility for solving sudoku.

use clap::{Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use sudoku_core::{Method, Mode};

/// Which solving strategy the CLI should use, mirroring `sudoku_core::Method`.
#[derive(Clone, Copy, ValueEnum)]
enum MethodArg {
    /// Constraint propagation with a recursive hypothesis fallback.
    Elimination,
    /// Reference brute-force backtracking.
    Backtracking,
    /// Dancing-Links exact-cover search.
    ExactCover,
}

impl From<MethodArg> for Method {
    fn from(arg: MethodArg) -> Method {
        match arg {
            MethodArg::Elimination => Method::Elimination,
            MethodArg::Backtracking => Method::Backtracking,
            MethodArg::ExactCover => Method::ExactCover,
        }
    }
}

impl std::fmt::Display for MethodArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.to_possible_value().expect("no skipped variants").get_name().fmt(f)
    }
}

/// Whether to stop at the first solution or enumerate every one, mirroring
/// `sudoku_core::Mode`.
#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Stop at the first solution.
    First,
    /// Enumerate every solution.
    All,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Mode {
        match arg {
            ModeArg::First => Mode::First,
            ModeArg::All => Mode::All,
        }
    }
}

impl std::fmt::Display for ModeArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.to_possible_value().expect("no skipped variants").get_name().fmt(f)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Take a string representation of a grid from the command line and solve it.
    Solve {
        repr: String,
        #[arg(long, value_enum, default_value_t = MethodArg::Elimination)]
        method: MethodArg,
        #[arg(long, value_enum, default_value_t = ModeArg::First)]
        mode: ModeArg,
    },

    /// Treat each line of a file as an individual puzzle, and solve all of them.
    FromFile {
        path: PathBuf,
        #[arg(long, value_enum, default_value_t = MethodArg::Elimination)]
        method: MethodArg,
        #[arg(long, value_enum, default_value_t = ModeArg::First)]
        mode: ModeArg,
    },
}

/// Solves `repr` and returns the process exit code contract.
fn solve_puzzle(repr: &str, method: Method, mode: Mode) -> i32 {
    match sudoku_core::solve_str(repr, method, mode) {
        Ok(outcome) => {
            let code = outcome.exit_code();
            if code == 0 {
                log::info!("no solution");
            } else {
                log::info!("solved ({} solution(s), method_used = {:?})", outcome.solutions.len(), outcome.method_used);
                for solution in &outcome.solutions {
                    println!("{}", sudoku_core::format_grid(&solution.to_values(), solution.n()));
                }
            }
            code
        }
        Err(e) => {
            log::error!("{e}");
            0
        }
    }
}

fn solve_file(path: &Path, method: Method, mode: Mode) -> ExitCode {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let data = BufReader::new(file);

    let mut last_code: i32 = 0;
    for (i, line) in data.lines().enumerate() {
        let repr = match line {
            Ok(repr) => repr,
            Err(e) => {
                log::error!("line {i}: {e}");
                return ExitCode::FAILURE;
            }
        };
        last_code = solve_puzzle(&repr, method, mode);
    }
    #[allow(clippy::cast_sign_loss)]
    ExitCode::from(last_code as u8)
}

#[derive(Parser)]
#[command(author, version, about, name = "sudoku_cli")]
struct Args {
    #[command(subcommand)]
    cmd: Command,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match args.cmd {
        Command::Solve { repr, method, mode } => {
            let code = solve_puzzle(&repr, method.into(), mode.into());
            #[allow(clippy::cast_sign_loss)]
            ExitCode::from(code as u8)
        }
        Command::FromFile { path, method, mode } => solve_file(&path, method.into(), mode.into()),
    }
}
