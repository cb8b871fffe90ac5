//! Timing harness comparing [`Queue::sort`] against the [`Queue::sort_by`]
//! baseline on a shared corpus.

use crate::corpus::{Corpus, CorpusConfig};
use crate::error::Result;
use crate::queue::Queue;
use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Default location of the persisted corpus.
pub const DEFAULT_CORPUS_PATH: &str = "test_cases.bin";

/// What a harness run measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    /// Sort every queue with the comparator-driven baseline.
    Linux,
    /// Sort every queue with the merge sort.
    Qsort,
    /// Load the corpus file.
    Read,
    /// Generate the corpus and write it to disk.
    Prepare,
}

impl Mode {
    fn label(self) -> &'static str {
        match self {
            Mode::Linux => "Linux sort",
            Mode::Qsort => "q_sort",
            Mode::Read => "Read testcases",
            Mode::Prepare => "Prepare testcases",
        }
    }
}

#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub mode: Mode,
    pub corpus_path: PathBuf,
    pub corpus: CorpusConfig,
    /// Print the pid and sleep this long before the measured phase, so a
    /// profiler can attach.
    pub wait: Option<Duration>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Qsort,
            corpus_path: PathBuf::from(DEFAULT_CORPUS_PATH),
            corpus: CorpusConfig::default(),
            wait: None,
        }
    }
}

/// The outcome of a harness run.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub label: &'static str,
    pub elapsed: Duration,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} took {:.6} sec", self.label, self.elapsed.as_secs_f64())
    }
}

/// Two independent copies of a corpus: one for the merge sort and one for the
/// baseline. Every queue is released when the bench is dropped.
#[derive(Debug)]
pub struct SortBench {
    primary: Vec<Queue>,
    baseline: Vec<Queue>,
}

impl SortBench {
    pub fn new(corpus: Corpus) -> Self {
        let primary = corpus.into_queues();
        let baseline = primary.clone();
        Self { primary, baseline }
    }

    pub fn primary(&self) -> &[Queue] {
        &self.primary
    }

    pub fn baseline(&self) -> &[Queue] {
        &self.baseline
    }

    /// Sort every primary queue with [`Queue::sort`].
    pub fn sort_primary(&mut self, descending: bool) {
        for queue in &mut self.primary {
            queue.sort(descending);
        }
    }

    /// Sort every baseline queue with [`Queue::sort_by`].
    pub fn sort_baseline(&mut self, descending: bool) {
        for queue in &mut self.baseline {
            if descending {
                queue.sort_by(|a, b| b.cmp(a));
            } else {
                queue.sort_by(|a, b| a.cmp(b));
            }
        }
    }
}

/// Perform `config.mode` and time its measured phase. Sorting modes sort in
/// descending order.
pub fn run(config: &BenchConfig) -> Result<Report> {
    let mode = config.mode;
    tracing::debug!("Running {:?} with corpus {:?}", mode, config.corpus_path);
    let elapsed = match mode {
        Mode::Prepare => {
            wait_for_profiler(config.wait);
            let start = Instant::now();
            Corpus::generate(config.corpus).write_to(&config.corpus_path)?;
            start.elapsed()
        }
        Mode::Read => {
            wait_for_profiler(config.wait);
            let start = Instant::now();
            let corpus = Corpus::read_from(&config.corpus_path, config.corpus)?;
            let elapsed = start.elapsed();
            drop(corpus);
            elapsed
        }
        Mode::Linux | Mode::Qsort => {
            let mut bench = SortBench::new(Corpus::read_from(&config.corpus_path, config.corpus)?);
            tracing::debug!("Loaded {} queues", bench.primary().len());
            wait_for_profiler(config.wait);
            let start = Instant::now();
            if mode == Mode::Linux {
                bench.sort_baseline(true);
            } else {
                bench.sort_primary(true);
            }
            start.elapsed()
        }
    };
    Ok(Report {
        label: mode.label(),
        elapsed,
    })
}

fn wait_for_profiler(wait: Option<Duration>) {
    if let Some(wait) = wait {
        println!("pid: {}", std::process::id());
        std::thread::sleep(wait);
    }
}
