//! Sort efficiency measurement.
//!
//! Times the merge sort of `Queue::sort` against the `Queue::sort_by`
//! baseline over a persisted corpus of random strings. Run `prepare` once to
//! write the corpus, then `qsort` or `linux`.
use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use cyclic_queue::harness::{self, BenchConfig, Mode, DEFAULT_CORPUS_PATH};
use cyclic_queue::CorpusConfig;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

/// Seconds to wait for a profiler with `--wait`.
const WAIT_SECS: u64 = 10;

#[derive(Parser, Debug)]
#[command(name = "sort_eff")]
#[command(about = "Compare the queue merge sort with the baseline sort")]
struct Args {
    /// What to measure.
    #[arg(value_enum)]
    mode: Mode,

    /// Print the pid and wait 10 seconds before measuring, for perf.
    #[arg(long)]
    wait: bool,

    /// Corpus file to write or read.
    #[arg(long, default_value = DEFAULT_CORPUS_PATH, env = "SORT_EFF_CORPUS")]
    corpus: PathBuf,

    /// Number of queues in the corpus.
    #[arg(long, default_value_t = CorpusConfig::default().queues)]
    queues: usize,

    /// Number of strings per queue.
    #[arg(long, default_value_t = CorpusConfig::default().queue_len)]
    queue_len: usize,

    /// Log level, used when RUST_LOG is not set.
    #[arg(long, default_value = "warn", env = "SORT_EFF_LOG_LEVEL")]
    log_level: String,
}

impl Args {
    fn bench_config(&self) -> BenchConfig {
        BenchConfig {
            mode: self.mode,
            corpus_path: self.corpus.clone(),
            corpus: CorpusConfig {
                queues: self.queues,
                queue_len: self.queue_len,
                ..CorpusConfig::default()
            },
            wait: self.wait.then(|| Duration::from_secs(WAIT_SECS)),
        }
    }
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
        )
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let config = args.bench_config();
    let report = harness::run(&config)
        .with_context(|| format!("{:?} failed on {:?}", config.mode, config.corpus_path))?;
    println!("{}", report);
    if config.mode == Mode::Prepare {
        println!("Test cases are stored in {}", config.corpus_path.display());
    }
    Ok(())
}
