//! Human-readable summaries printed to stderr.

use coverforge::{FeasibilityAnalysis, SolveResult};
use owo_colors::OwoColorize;

pub fn print_solve_summary(result: &SolveResult) {
    let evaluation = &result.evaluation;

    let status = if evaluation.valid {
        "valid".bright_green().bold().to_string()
    } else {
        "invalid".bright_red().bold().to_string()
    };
    eprintln!();
    eprintln!("{} {}", "Result:".bold(), status);
    eprintln!("  score        {}", evaluation.score);
    eprintln!(
        "  idle total   {} / {}",
        evaluation.idle_total, evaluation.idle_budget
    );
    eprintln!("  targets      {}", result.split);
    if result.quota_relaxed {
        eprintln!("  {}", "budget unreachable, targets relaxed".yellow());
    }
    if let Some(reason) = result.termination {
        eprintln!("  stopped      {}", reason);
    }
    if let Some(seed) = result.seed {
        eprintln!("  seed         {}", seed);
    }

    eprintln!("{}", "Active periods per agent:".bold());
    for (active, agents) in &evaluation.distribution {
        eprintln!("  {:>4}  {:>5} {}", active, agents, "agents".bright_black());
    }

    if !evaluation.violations.is_empty() {
        eprintln!("{}", "Violations:".bright_red().bold());
        for violation in &evaluation.violations {
            eprintln!("  - {}", violation);
        }
    }
}

pub fn print_analysis(analysis: &FeasibilityAnalysis) {
    eprintln!("{}", analysis);
    let verdict = if analysis.looks_feasible() {
        "looks feasible".bright_green().to_string()
    } else if !analysis.window_coverable() {
        "window cannot be covered for every agent".bright_red().to_string()
    } else {
        "budget below the idle lower bound".bright_red().to_string()
    };
    eprintln!("{} {}", "Verdict:".bold(), verdict);
}
