// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Stowage command line front end
//!
//! Reads a bin packing instance from a file, solves it and prints the
//! packing as a table. The file holds the capacity followed by the item
//! sizes, separated by whitespace, commas or newlines; with `--capacity`
//! it holds only the sizes.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::{path::PathBuf, time::Duration};
use stowage_model::loading::InstanceLoader;
use stowage_solver::solver::SolverBuilder;

#[derive(Parser, Debug)]
#[command(name = "stowage")]
#[command(author, version, about = "Exact one-dimensional bin packing", long_about = None)]
struct Args {
    /// Instance file
    path: PathBuf,

    /// Bin capacity; the file then contains item sizes only
    #[arg(short, long)]
    capacity: Option<i64>,

    /// Time limit in seconds for the exact search
    #[arg(short, long)]
    time_limit: Option<f64>,

    /// Maximum number of search nodes
    #[arg(short, long)]
    node_limit: Option<u64>,

    /// Number of search threads
    #[arg(short = 'j', long, default_value_t = 1)]
    threads: usize,

    /// Only run first-fit decreasing
    #[arg(long, default_value_t = false)]
    heuristic_only: bool,

    /// Seconds between progress lines
    #[arg(long, default_value_t = 1.0)]
    log_interval: f64,

    /// Print search statistics after the packing
    #[arg(long, default_value_t = false)]
    stats: bool,
}

fn seconds(value: f64, option: &str) -> Result<Duration> {
    if !value.is_finite() || value < 0.0 {
        bail!("--{} must be a non-negative number of seconds, got {}", option, value);
    }
    Ok(Duration::from_secs_f64(value))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let mut loader = InstanceLoader::<i64>::new();
    if let Some(capacity) = args.capacity {
        loader = loader.capacity(capacity);
    }
    let instance = loader
        .from_path(&args.path)
        .with_context(|| format!("failed to load instance from {}", args.path.display()))?;
    log::info!("Loaded {} from {}", instance, args.path.display());

    let mut builder = SolverBuilder::new()
        .with_threads(args.threads)
        .with_log_interval(seconds(args.log_interval, "log-interval")?)
        .heuristic_only(args.heuristic_only);
    if let Some(limit) = args.time_limit {
        builder = builder.with_time_limit(seconds(limit, "time-limit")?);
    }
    if let Some(limit) = args.node_limit {
        builder = builder.with_node_limit(limit);
    }

    let outcome = builder.build().solve(&instance);

    print!("{}", outcome);
    if args.stats {
        print!("{}", outcome.statistics());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_all_options() {
        let args = Args::parse_from([
            "stowage",
            "items.txt",
            "--capacity",
            "150",
            "--time-limit",
            "2.5",
            "--node-limit",
            "1000",
            "-j",
            "4",
            "--heuristic-only",
            "--stats",
        ]);
        assert_eq!(args.path, PathBuf::from("items.txt"));
        assert_eq!(args.capacity, Some(150));
        assert_eq!(args.time_limit, Some(2.5));
        assert_eq!(args.node_limit, Some(1000));
        assert_eq!(args.threads, 4);
        assert!(args.heuristic_only);
        assert!(args.stats);
        assert_eq!(args.log_interval, 1.0);
    }

    #[test]
    fn test_seconds_rejects_negative_values() {
        assert!(seconds(-1.0, "time-limit").is_err());
        assert!(seconds(f64::NAN, "time-limit").is_err());
        assert_eq!(seconds(0.5, "time-limit").unwrap(), Duration::from_millis(500));
    }
}
