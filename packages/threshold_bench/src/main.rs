#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))]

//! Binary entry point for the threshold counting benchmark.
//!
//! This module is excluded from mutation testing because testing process entry/exit behavior
//! is impractical - it requires spawning subprocesses and checking exit codes.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use argh::FromArgs;
use threshold_bench::{BenchConfig, QuickConfig, Result, TimeUnit, run_benchmark, run_quick};
use threshold_count::GridPattern;
use tracing::{Level, error, info};

/// Compares per-worker slots against a shared atomic accumulator for combining the partial
/// counts of parallel threshold counting.
#[derive(FromArgs)]
struct Args {
    /// log details of every configuration measured
    #[argh(switch, short = 'v')]
    verbose: bool,

    /// what to run (defaults to `quick`)
    #[argh(subcommand)]
    command: Option<Command>,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Benchmark(BenchmarkArgs),
    Quick(QuickArgs),
}

/// Measure every strategy at every thread count from 1 to --threads and write the mean and
/// standard deviation of each to a CSV file.
#[derive(FromArgs)]
#[argh(subcommand, name = "benchmark")]
struct BenchmarkArgs {
    /// largest thread count to measure (default 30)
    #[argh(option)]
    threads: Option<i64>,

    /// number of grid rows (default 1000)
    #[argh(option)]
    rows: Option<i64>,

    /// number of grid columns (default 1000)
    #[argh(option)]
    cols: Option<i64>,

    /// number of grid rows and columns; --rows and --cols take precedence
    #[argh(option)]
    rowscols: Option<i64>,

    /// timed trials per strategy and thread count (default 5)
    #[argh(option)]
    iterations: Option<i64>,

    /// cells strictly greater than this value are counted (default 128)
    #[argh(option)]
    threshold: Option<i64>,

    /// grid pattern (deterministic, uniform, checkerboard, random)
    #[argh(option)]
    grid: Option<GridPattern>,

    /// unit of reported timings (ns, us, ms)
    #[argh(option)]
    unit: Option<TimeUnit>,

    /// flush processor caches before every trial
    #[argh(switch)]
    flush_cache: bool,

    /// path of the CSV file (default benchmarks_<os>_<arch>.csv)
    #[argh(option)]
    output: Option<PathBuf>,
}

/// Time one count per strategy on a 1000x1000 deterministic grid.
#[derive(Default, FromArgs)]
#[argh(subcommand, name = "quick")]
struct QuickArgs {
    /// number of worker threads (default 10)
    #[argh(option)]
    threads: Option<i64>,

    /// cells strictly greater than this value are counted (default 128)
    #[argh(option)]
    threshold: Option<i64>,

    /// unit of reported timings (ns, us, ms)
    #[argh(option)]
    unit: Option<TimeUnit>,
}

// Binary entry point - mutations would require subprocess testing which is impractical.
#[cfg_attr(test, mutants::skip)]
fn main() -> ExitCode {
    let args: Args = argh::from_env();

    // Standard output is reserved for results.
    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .with_writer(io::stderr)
        .init();

    let outcome = match args.command {
        Some(Command::Benchmark(benchmark_args)) => benchmark(benchmark_args),
        Some(Command::Quick(quick_args)) => quick(&quick_args),
        None => quick(&QuickArgs::default()),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "run failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn benchmark(args: BenchmarkArgs) -> Result<()> {
    let mut config = BenchConfig::default();

    if let Some(side) = args.rowscols {
        config.rows = side;
        config.cols = side;
    }

    if let Some(threads) = args.threads {
        config.threads = threads;
    }
    if let Some(rows) = args.rows {
        config.rows = rows;
    }
    if let Some(cols) = args.cols {
        config.cols = cols;
    }
    if let Some(iterations) = args.iterations {
        config.iterations = iterations;
    }
    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }
    if let Some(grid) = args.grid {
        config.grid = grid;
    }
    if let Some(unit) = args.unit {
        config.unit = unit;
    }
    if let Some(output) = args.output {
        config.output = output;
    }
    config.flush_cache = args.flush_cache;

    let plan = config.validate()?;
    let report = run_benchmark(&plan)?;
    let table = report.to_table();

    // The statistics are shown even if the file cannot be written.
    print!("{table}");

    table.write_csv(&plan.output)?;

    info!(path = %plan.output.display(), unit = %report.unit(), "results written");

    Ok(())
}

fn quick(args: &QuickArgs) -> Result<()> {
    let mut config = QuickConfig::default();

    if let Some(threads) = args.threads {
        config.threads = threads;
    }
    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }
    if let Some(unit) = args.unit {
        config.unit = unit;
    }

    let plan = config.validate()?;

    for result in run_quick(&plan)? {
        println!(
            "{}: {} cells above {} with {} threads in {:.3} {}",
            result.strategy,
            result.count,
            plan.threshold,
            plan.threads,
            result.elapsed,
            result.unit
        );
    }

    Ok(())
}
