//! coverforge command line.
//!
//! `coverforge solve` reads a period file, solves, and writes one line per
//! agent. `coverforge analyze` only reports whether the budget looks
//! reachable.

use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use coverforge::io::{load_index_from_path, write_assignment, write_assignment_to_path};
use coverforge::SolverConfig;
use tracing::info;

mod report;

/// Exit code for an invalid result under `--strict`.
const EXIT_INVALID: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "coverforge")]
#[command(version, about = "Resource-to-agent allocation under an idle budget")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Solve an instance and write the assignment.
    Solve {
        #[command(flatten)]
        problem: ProblemArgs,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum refinement rounds
        #[arg(long)]
        rounds: Option<u32>,

        /// Seed for tie and candidate shuffling
        #[arg(long)]
        seed: Option<u64>,

        /// Exit with code 2 when the result violates a constraint
        #[arg(long)]
        strict: bool,
    },

    /// Report feasibility bounds without solving.
    Analyze {
        #[command(flatten)]
        problem: ProblemArgs,
    },
}

/// Input and problem parameters shared by both subcommands.
#[derive(Args, Debug)]
struct ProblemArgs {
    /// Period file, one line of resource identifiers per period
    #[arg(short, long)]
    input: PathBuf,

    /// Solver configuration (TOML or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of agents
    #[arg(long)]
    agents: Option<usize>,

    /// Resources per agent
    #[arg(long)]
    capacity: Option<usize>,

    /// Mandatory window length in periods
    #[arg(long)]
    window: Option<usize>,

    /// Global idle-period budget
    #[arg(long)]
    budget: Option<u64>,
}

impl ProblemArgs {
    /// File configuration (or defaults) with command-line overrides applied.
    fn config(&self) -> Result<SolverConfig> {
        let mut config = match &self.config {
            Some(path) => SolverConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => SolverConfig::default(),
        };
        let problem = &mut config.problem;
        if let Some(agents) = self.agents {
            problem.agent_count = agents;
        }
        if let Some(capacity) = self.capacity {
            problem.capacity = capacity;
        }
        if let Some(window) = self.window {
            problem.window = window;
        }
        if let Some(budget) = self.budget {
            problem.idle_budget = budget;
        }
        Ok(config)
    }
}

fn solve(
    problem: ProblemArgs,
    output: Option<PathBuf>,
    rounds: Option<u32>,
    seed: Option<u64>,
    strict: bool,
) -> Result<u8> {
    let mut config = problem.config()?;
    if let Some(rounds) = rounds {
        config = config.with_round_limit(rounds);
    }
    if let Some(seed) = seed {
        config = config.with_random_seed(seed);
    }

    let index = load_index_from_path(&problem.input, &config.problem)
        .with_context(|| format!("reading {}", problem.input.display()))?;
    let result = coverforge::solve(&index, config)?;
    let rows = result.rows(&index);

    match &output {
        Some(path) => {
            write_assignment_to_path(path, &rows)
                .with_context(|| format!("writing {}", path.display()))?;
            info!(event = "output_written", path = %path.display());
        }
        None => write_assignment(BufWriter::new(io::stdout().lock()), &rows)?,
    }
    report::print_solve_summary(&result);

    if strict && !result.is_valid() {
        return Ok(EXIT_INVALID);
    }
    Ok(0)
}

fn analyze(problem: ProblemArgs) -> Result<u8> {
    let config = problem.config()?;
    let index = load_index_from_path(&problem.input, &config.problem)
        .with_context(|| format!("reading {}", problem.input.display()))?;
    let analysis = coverforge::analyze(&index, &config.problem);
    report::print_analysis(&analysis);
    Ok(0)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    coverforge::console::init();

    let status = match cli.command {
        Commands::Solve {
            problem,
            output,
            rounds,
            seed,
            strict,
        } => solve(problem, output, rounds, seed, strict)?,
        Commands::Analyze { problem } => analyze(problem)?,
    };
    Ok(ExitCode::from(status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_overrides_replace_defaults() {
        let cli = parse(&[
            "coverforge", "analyze", "--input", "p.txt", "--agents", "12", "--budget", "30",
        ]);
        let Commands::Analyze { problem } = cli.command else {
            panic!("expected analyze");
        };
        let config = problem.config().unwrap();
        assert_eq!(config.problem.agent_count, 12);
        assert_eq!(config.problem.idle_budget, 30);
        assert_eq!(config.problem.capacity, 5);
    }

    #[test]
    fn test_input_is_required() {
        assert!(Cli::try_parse_from(["coverforge", "solve"]).is_err());
    }

    #[test]
    fn test_config_file_then_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("solver.toml");
        fs::write(&path, "[problem]\nagent_count = 7\nwindow = 3\n").unwrap();

        let cli = parse(&[
            "coverforge",
            "solve",
            "--input",
            "p.txt",
            "--config",
            path.to_str().unwrap(),
            "--window",
            "2",
            "--strict",
        ]);
        let Commands::Solve {
            problem, strict, ..
        } = cli.command
        else {
            panic!("expected solve");
        };
        let config = problem.config().unwrap();
        assert!(strict);
        assert_eq!(config.problem.agent_count, 7);
        assert_eq!(config.problem.window, 2);
    }

    #[test]
    fn test_strict_invalid_result_exits_with_two() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("periods.txt");
        let output = dir.path().join("out.txt");
        let scenario = coverforge_test::scenarios::scarce_window();
        fs::write(&input, coverforge_test::periods_to_text(&scenario.periods)).unwrap();

        let cli = parse(&[
            "coverforge",
            "solve",
            "--input",
            input.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
            "--agents",
            "3",
            "--capacity",
            "1",
            "--window",
            "1",
            "--budget",
            "2",
            "--strict",
        ]);
        let Commands::Solve {
            problem,
            output: out,
            rounds,
            seed,
            strict,
        } = cli.command
        else {
            panic!("expected solve");
        };
        let code = solve(problem, out, rounds, seed, strict).unwrap();
        assert_eq!(code, EXIT_INVALID);
        assert_eq!(fs::read_to_string(&output).unwrap(), "0\n-1\n-1\n");
    }
}
