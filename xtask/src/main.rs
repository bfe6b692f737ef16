use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the ride dispatch workspace",
    long_about = "A unified CLI for running dispatch scenarios, tests, benchmarks,\n\
                  and CI checks in the ride dispatch workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the reference scenario (5 drivers, 100 requests)
    Run {
        /// Seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run the workspace tests
    Test,
    /// Run Criterion benchmarks
    Bench,
    /// Run load tests (ignored tests in dispatch_core)
    LoadTest,
    /// Run CI checks (fmt, clippy, tests, benchmarks)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, and tests
    Check,
    /// Run benchmarks
    Bench,
    /// Run check + bench
    All,
}

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn cargo(args: &[&str]) -> ExitStatus {
    eprintln!("+ cargo {}", args.join(" "));
    match Command::new("cargo").args(args).status() {
        Ok(status) => status,
        Err(err) => {
            eprintln!("failed to execute cargo: {err}");
            exit(1);
        }
    }
}

fn run_cargo(args: &[&str]) {
    let status = cargo(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_check() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);

    step("Test dispatch_core");
    run_cargo(&["test", "-p", "dispatch_core"]);

    step("Test dispatch_sim");
    run_cargo(&["test", "-p", "dispatch_sim"]);
}

fn ci_bench() {
    step("Run benchmarks");
    run_cargo(&["bench", "--package", "dispatch_core", "--bench", "performance"]);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { seed } => {
            let seed = seed.map(|seed| seed.to_string());
            let mut args = vec!["run", "-p", "dispatch_sim", "--release"];
            if let Some(seed) = seed.as_deref() {
                args.extend(["--", "--seed", seed]);
            }
            run_cargo(&args);
        }
        Commands::Test => {
            run_cargo(&["test", "--workspace"]);
        }
        Commands::Bench => ci_bench(),
        Commands::LoadTest => {
            run_cargo(&[
                "test",
                "--package",
                "dispatch_core",
                "--test",
                "load_tests",
                "--release",
                "--",
                "--ignored",
                "--nocapture",
            ]);
        }
        Commands::Ci { job } => match job {
            CiJob::Check => ci_check(),
            CiJob::Bench => ci_bench(),
            CiJob::All => {
                ci_check();
                ci_bench();
            }
        },
    }
}
