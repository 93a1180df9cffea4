//! MIDAS CLI - baseline driver
//!
//! Usage:
//!   midas                                        # 50 turns, echo A, faithful B
//!   midas --turns 10 --no-invariants             # unstructured baseline
//!   midas --model-a "./gen.sh" --model-b "./rep.sh"
//!   midas --config midas.json --summary
//!
//! Events go to stdout as JSON lines. Diagnostics go to stderr.

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use midas::core::{CommandGenerator, EchoGenerator, Generator, Harness, JsonLinesSink, RepeatGenerator};
use midas::types::{clamp_turns, HarnessConfig, HarnessResult, RunReport};
use midas::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "midas",
    version = VERSION,
    about = "MIDAS dual-model harness - measure drift and preservation until collapse",
    long_about = "Runs Model A and Model B against each other for a fixed number of turns.\n\n\
                  Each turn Model A continues the carried state, Model B resurfaces\n\
                  the result verbatim, and the harness records:\n  \
                  D(t)  drift between consecutive outputs (normalized edit distance)\n  \
                  P(t)  preservation fidelity of the resurfaced copy\n\n\
                  The run collapses when D(t) > 0.5, P stays below 0.8 for 3 turns,\n\
                  or repetition is detected.\n\n\
                  Models are shell commands reading the prompt on stdin and writing\n\
                  the reply to stdout. Without --model-a, Model A echoes its input;\n\
                  without --model-b, Model B repeats the resurfacing target exactly."
)]
struct Args {
    /// Initial interaction state H_0
    #[arg(long, default_value = "Seed text for turn 0.")]
    seed: String,

    /// Number of turns (overrides config; zero or negative runs nothing)
    #[arg(short, long, allow_negative_numbers = true)]
    turns: Option<i64>,

    /// Disable invariant enforcement
    #[arg(long)]
    no_invariants: bool,

    /// JSON config file (layered over defaults, under MIDAS_* env vars)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Shell command for Model A
    #[arg(long)]
    model_a: Option<String>,

    /// Shell command for Model B
    #[arg(long)]
    model_b: Option<String>,

    /// Print a run summary to stderr
    #[arg(long)]
    summary: bool,

    /// Disable colors in the summary
    #[arg(long)]
    no_color: bool,

    /// Log level when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() {
    let args = Args::parse();
    init_tracing(&args.log_level);

    if args.no_color {
        colored::control::set_override(false);
    }

    match run(&args) {
        Ok(report) => {
            if args.summary {
                print_summary(&report);
            }
        }
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: &Args) -> HarnessResult<RunReport> {
    let mut config = HarnessConfig::load(args.config.as_deref())?;
    if let Some(turns) = args.turns {
        config.turns = clamp_turns(turns);
    }
    if args.no_invariants {
        config.invariants_enabled = false;
    }

    let mut model_a: Box<dyn Generator> = match &args.model_a {
        Some(command) => Box::new(CommandGenerator::new(command)),
        None => Box::new(EchoGenerator),
    };
    let mut model_b: Box<dyn Generator> = match &args.model_b {
        Some(command) => Box::new(CommandGenerator::new(command)),
        None => Box::new(RepeatGenerator),
    };

    let mut harness = Harness::new(config, JsonLinesSink::stdout());
    harness.run(&mut model_a, &mut model_b, &args.seed)
}

fn print_summary(report: &RunReport) {
    let state = report.state.to_string().color(report.state.color()).bold();

    eprintln!();
    eprintln!("{} v{}", "MIDAS".bold(), VERSION);
    eprintln!("  state:   {}", state);
    eprintln!("  turns:   {}", report.turns_executed);
    if let (Some(d), Some(p)) = (report.mean_drift(), report.mean_preservation()) {
        eprintln!("  mean D:  {:.4}", d);
        eprintln!("  mean P:  {:.4}", p);
    }
    if let Some(collapse) = &report.collapse {
        let causes: Vec<&str> = report.causes.iter().map(|c| c.code()).collect();
        eprintln!(
            "  {} at turn {} ({})",
            "collapse".red(),
            collapse.turn,
            causes.join(", ").dimmed()
        );
    }
    eprintln!("  elapsed: {} ms", report.elapsed_ms());
}
