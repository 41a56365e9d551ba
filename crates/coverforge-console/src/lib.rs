//! Colorful console output for solver events.
//!
//! Provides a custom `tracing` layer that formats coverforge events with
//! colors.
//!
//! ## Log Levels
//!
//! - **INFO**: Lifecycle events (solve/phase start and end, refinement rounds)
//! - **WARN**: Degraded situations (partial load, scarce window, violations)
//! - **DEBUG**: Per-agent construction results

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();
static SOLVE_START_NANOS: AtomicU64 = AtomicU64::new(0);

/// Package version for banner display.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "coverforge_solver=info,coverforge=info";

/// Initializes the solver console output.
///
/// Safe to call multiple times - only the first call has effect.
/// Prints the banner and sets up tracing.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(SolverConsoleLayer)
            .try_init();
    });
}

// Marks the start of solving for elapsed time tracking.
fn mark_solve_start() {
    let epoch = EPOCH.get_or_init(Instant::now);
    let nanos = epoch.elapsed().as_nanos() as u64;
    SOLVE_START_NANOS.store(nanos, Ordering::Relaxed);
}

// Returns elapsed time since solve start.
fn elapsed_secs() -> f64 {
    let Some(epoch) = EPOCH.get() else {
        return 0.0;
    };
    let start_nanos = SOLVE_START_NANOS.load(Ordering::Relaxed);
    let now_nanos = epoch.elapsed().as_nanos() as u64;
    now_nanos.saturating_sub(start_nanos) as f64 / 1_000_000_000.0
}

fn print_banner() {
    let banner = r#"
  ___                 ___
 / __|_____ _____ _ _| __|__ _ _ __ _ ___
| (__/ _ \ V / -_) '_| _/ _ \ '_/ _` / -_)
 \___\___/\_/\___|_| |_|\___/_| \__, \___|
                                |___/
"#;

    let version_line = format!("          v{} - Resource Allocation Engine\n", VERSION);

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", banner.bright_cyan());
    let _ = writeln!(stdout, "{}", version_line.bright_white().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats solver events with colors.
pub struct SolverConsoleLayer;

impl<S: Subscriber> Layer<S> for SolverConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();

        if !target.starts_with("coverforge_solver") && !target.starts_with("coverforge::") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor, *metadata.level());
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    phase: Option<String>,
    score: Option<String>,
    split: Option<String>,
    detail: Option<String>,
    acceptance_rate: Option<String>,
    steps: Option<u64>,
    speed: Option<u64>,
    duration_ms: Option<u64>,
    agent_count: Option<u64>,
    resource_count: Option<u64>,
    period_count: Option<u64>,
    capacity: Option<u64>,
    window: Option<u64>,
    idle_budget: Option<u64>,
    idle_lower_bound: Option<u64>,
    idle_total: Option<u64>,
    round: Option<u64>,
    moves: Option<u64>,
    deviation: Option<u64>,
    rounds: Option<u64>,
    moves_accepted: Option<u64>,
    expected: Option<u64>,
    loaded: Option<u64>,
    dropped: Option<u64>,
    feasible: Option<bool>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        self.record_str(field, s.trim_matches('"'));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        let slot = match field.name() {
            "steps" => &mut self.steps,
            "speed" => &mut self.speed,
            "duration_ms" => &mut self.duration_ms,
            "agent_count" => &mut self.agent_count,
            "resource_count" => &mut self.resource_count,
            "period_count" => &mut self.period_count,
            "capacity" => &mut self.capacity,
            "window" => &mut self.window,
            "idle_budget" => &mut self.idle_budget,
            "idle_lower_bound" => &mut self.idle_lower_bound,
            "idle_total" => &mut self.idle_total,
            "round" => &mut self.round,
            "moves" => &mut self.moves,
            "deviation" => &mut self.deviation,
            "rounds" => &mut self.rounds,
            "moves_accepted" => &mut self.moves_accepted,
            "expected" => &mut self.expected,
            "loaded" => &mut self.loaded,
            "dropped" => &mut self.dropped,
            _ => return,
        };
        *slot = Some(value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "feasible" {
            self.feasible = Some(value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        let slot = match field.name() {
            "event" => &mut self.event,
            "phase" => &mut self.phase,
            "score" => &mut self.score,
            "split" => &mut self.split,
            "detail" => &mut self.detail,
            "acceptance_rate" => &mut self.acceptance_rate,
            _ => return,
        };
        *slot = Some(value.to_string());
    }
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    let event = v.event.as_deref().unwrap_or("");

    match event {
        "solve_start" => format_solve_start(v),
        "solve_end" => format_solve_end(v),
        "quota" => format_quota(v),
        "phase_start" => format_phase_start(v),
        "phase_end" => format_phase_end(v),
        "round" => format_round(v),
        _ if level == Level::WARN => format_warning(v, event),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs())
        .bright_black()
        .to_string()
}

fn fmt_count(n: u64) -> String {
    n.to_formatted_string(&Locale::en)
}

fn format_solve_start(v: &EventVisitor) -> String {
    mark_solve_start();
    format!(
        "{} {} Solving │ {} agents x {} slots │ {} resources │ {} periods (window {}) │ budget {} │ lower bound {}",
        format_elapsed(),
        "▶".bright_green().bold(),
        fmt_count(v.agent_count.unwrap_or(0)).bright_yellow(),
        v.capacity.unwrap_or(0).bright_yellow(),
        fmt_count(v.resource_count.unwrap_or(0)).bright_yellow(),
        v.period_count.unwrap_or(0).bright_yellow(),
        v.window.unwrap_or(0).bright_yellow(),
        fmt_count(v.idle_budget.unwrap_or(0)).bright_magenta(),
        fmt_count(v.idle_lower_bound.unwrap_or(0)).bright_magenta(),
    )
}

fn format_quota(v: &EventVisitor) -> String {
    format!(
        "{} {} Targets {}",
        format_elapsed(),
        "≡".bright_blue(),
        v.split.as_deref().unwrap_or("N/A").white().bold()
    )
}

fn format_solve_end(v: &EventVisitor) -> String {
    let score = v.score.as_deref().unwrap_or("N/A");
    let is_feasible = v.feasible.unwrap_or_else(|| score.starts_with("0hard"));

    let status = if is_feasible {
        "VALID".bright_green().bold().to_string()
    } else {
        "INVALID".bright_red().bold().to_string()
    };

    let mut output = format!(
        "{} {} Solving complete │ {} │ {}",
        format_elapsed(),
        "■".bright_cyan().bold(),
        format_score(score),
        status
    );

    output.push_str("\n\n");
    output.push_str(
        &"╔══════════════════════════════════════════════════════════╗"
            .bright_cyan()
            .to_string(),
    );
    output.push('\n');

    let status_text = if is_feasible {
        "ALL CONSTRAINTS MET"
    } else {
        "BEST EFFORT (constraints violated)"
    };
    let inner_width: usize = 58;
    let total_pad = inner_width.saturating_sub(status_text.len());
    let left_pad = total_pad / 2;
    let right_pad = total_pad - left_pad;
    let status_colored = if is_feasible {
        status_text.bright_green().bold().to_string()
    } else {
        status_text.bright_red().bold().to_string()
    };
    output.push_str(&format!(
        "{}{}{}{}{}",
        "║".bright_cyan(),
        " ".repeat(left_pad),
        status_colored,
        " ".repeat(right_pad),
        "║".bright_cyan()
    ));
    output.push('\n');
    output.push_str(
        &"╠══════════════════════════════════════════════════════════╣"
            .bright_cyan()
            .to_string(),
    );
    output.push('\n');

    let rows = [
        ("Final Score:", score.to_string()),
        ("Idle Total:", fmt_count(v.idle_total.unwrap_or(0))),
        ("Rounds:", fmt_count(v.rounds.unwrap_or(0))),
        ("Moves Applied:", fmt_count(v.moves_accepted.unwrap_or(0))),
    ];
    for (label, value) in rows {
        output.push_str(&format!(
            "{}  {:<18}{:>36}  {}",
            "║".bright_cyan(),
            label,
            value,
            "║".bright_cyan()
        ));
        output.push('\n');
    }

    output.push_str(
        &"╚══════════════════════════════════════════════════════════╝"
            .bright_cyan()
            .to_string(),
    );
    output.push('\n');

    output
}

fn format_phase_start(v: &EventVisitor) -> String {
    let phase = v.phase.as_deref().unwrap_or("Unknown");

    format!(
        "{} {} {} started",
        format_elapsed(),
        "▶".bright_blue(),
        phase.white().bold()
    )
}

fn format_phase_end(v: &EventVisitor) -> String {
    let phase = v.phase.as_deref().unwrap_or("Unknown");
    let steps = v.steps.unwrap_or(0);
    let speed = v.speed.unwrap_or(0);
    let score = v.score.as_deref().unwrap_or("N/A");
    let duration = v.duration_ms.unwrap_or(0);

    let mut output = format!(
        "{} {} {} ended │ {} │ {} steps │ {} moves/s",
        format_elapsed(),
        "◀".bright_blue(),
        phase.white().bold(),
        format_duration_ms(duration).yellow(),
        fmt_count(steps).white(),
        fmt_count(speed).bright_magenta().bold(),
    );

    if let Some(ref rate) = v.acceptance_rate {
        output.push_str(&format!(" │ {} accepted", rate.bright_yellow()));
    }
    if let Some(idle) = v.idle_total {
        output.push_str(&format!(" │ idle {}", fmt_count(idle).white()));
    }

    output.push_str(&format!(" │ {}", format_score(score)));

    output
}

fn format_round(v: &EventVisitor) -> String {
    let idle = v.idle_total.unwrap_or(0);
    let budget = v.idle_budget.unwrap_or(0);
    let idle_str = if idle <= budget {
        fmt_count(idle).bright_green().to_string()
    } else {
        fmt_count(idle).bright_red().to_string()
    };

    format!(
        "{} {} Round {:>4} │ {:>6} moves │ idle {}/{} │ deviation {}",
        format_elapsed(),
        "⚡".bright_cyan(),
        v.round.unwrap_or(0).white(),
        fmt_count(v.moves.unwrap_or(0)).bright_magenta(),
        idle_str,
        fmt_count(budget),
        fmt_count(v.deviation.unwrap_or(0)).yellow(),
    )
}

fn format_warning(v: &EventVisitor, event: &str) -> String {
    let message = match event {
        "partial_load" => format!(
            "partial load: {} of {} periods",
            v.loaded.unwrap_or(0),
            v.expected.unwrap_or(0)
        ),
        "ids_dropped" => format!("{} out-of-range identifiers dropped", v.dropped.unwrap_or(0)),
        "window_scarce" => "fewer window resources than agents".to_string(),
        "quota_infeasible" => "idle budget infeasible, targets relaxed".to_string(),
        _ => v.detail.clone().unwrap_or_else(|| event.to_string()),
    };
    format!(
        "{} {} {}",
        format_elapsed(),
        "!".bright_yellow().bold(),
        message.yellow()
    )
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

fn format_score(score: &str) -> String {
    let Some((hard, soft)) = score.split_once('/') else {
        return score.white().to_string();
    };
    let hard = hard.trim_end_matches("hard");
    let soft = soft.trim_end_matches("soft");

    let hard_num: i64 = hard.parse().unwrap_or(0);
    let soft_num: i64 = soft.parse().unwrap_or(0);

    let hard_str = if hard_num < 0 {
        format!("{}hard", hard).bright_red().to_string()
    } else {
        format!("{}hard", hard).bright_green().to_string()
    };
    let soft_str = if soft_num < 0 {
        format!("{}soft", soft).yellow().to_string()
    } else {
        format!("{}soft", soft).white().to_string()
    };

    format!("{}/{}", hard_str, soft_str)
}
