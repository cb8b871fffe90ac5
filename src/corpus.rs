//! Deterministic string fixtures for sort benchmarks.
//!
//! A corpus is a list of queues filled with pseudo-random lowercase strings of
//! a fixed length. It can be persisted as a flat file holding the bytes of
//! every string back to back, without separators or header, and loaded again
//! given the same [`CorpusConfig`].

use crate::error::{Error, Result};
use crate::queue::Queue;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Shape of a corpus and the seed it is generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorpusConfig {
    pub queues: usize,
    pub queue_len: usize,
    pub string_len: usize,
    pub seed: u64,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            queues: 300,
            queue_len: 100_000,
            string_len: 10,
            seed: 0,
        }
    }
}

impl CorpusConfig {
    /// Total number of strings in the corpus, saturating at `usize::MAX`.
    pub fn strings(&self) -> usize {
        self.queues.saturating_mul(self.queue_len)
    }
}

#[derive(Debug)]
pub struct Corpus {
    config: CorpusConfig,
    queues: Vec<Queue>,
}

impl Corpus {
    /// Generate a corpus. The same config always yields the same strings.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::{Corpus, CorpusConfig};
    ///
    /// let config = CorpusConfig { queues: 2, queue_len: 3, string_len: 4, seed: 7 };
    /// let corpus = Corpus::generate(config);
    /// assert_eq!(corpus.queues().len(), 2);
    /// assert!(corpus.queues()[0].iter().all(|s| s.len() == 4));
    /// assert_eq!(corpus.queues(), Corpus::generate(config).queues());
    /// ```
    pub fn generate(config: CorpusConfig) -> Self {
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let queues = (0..config.queues)
            .map(|_| {
                (0..config.queue_len)
                    .map(|_| random_string(&mut rng, config.string_len))
                    .collect::<Queue>()
            })
            .collect();
        tracing::debug!(
            "Generated corpus of {} queues x {} strings (seed {})",
            config.queues,
            config.queue_len,
            config.seed
        );
        Self { config, queues }
    }

    /// Write every string, queue by queue, into a new file at `path`.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        let mut written = 0_usize;
        for queue in &self.queues {
            for value in queue {
                writer.write_all(value.as_bytes())?;
                written += 1;
            }
        }
        writer.flush()?;
        tracing::debug!("Wrote {} strings to {:?}", written, path);
        Ok(())
    }

    /// Load a corpus written by [`Corpus::write_to`] with the same `config`.
    ///
    /// The seed of `config` is not used. A file holding fewer than
    /// `config.strings()` strings is reported as `Error::ShortRead`; trailing
    /// bytes are ignored.
    pub fn read_from(path: impl AsRef<Path>, config: CorpusConfig) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = BufReader::new(File::open(path)?);
        let mut buf = vec![0_u8; config.string_len];
        let mut read = 0;
        let mut queues = Vec::new();
        for _ in 0..config.queues {
            let mut queue = Queue::new();
            for _ in 0..config.queue_len {
                match reader.read_exact(&mut buf) {
                    Ok(()) => {}
                    Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                        return Err(Error::ShortRead { read });
                    }
                    Err(e) => return Err(e.into()),
                }
                let value = String::from_utf8(buf.clone())
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
                queue.push_back(value);
                read += 1;
            }
            queues.push(queue);
        }
        tracing::debug!("Read {} strings from {:?}", read, path);
        Ok(Self { config, queues })
    }

    pub fn config(&self) -> &CorpusConfig {
        &self.config
    }

    pub fn queues(&self) -> &[Queue] {
        &self.queues
    }

    pub fn into_queues(self) -> Vec<Queue> {
        self.queues
    }
}

fn random_string(rng: &mut SmallRng, len: usize) -> String {
    (0..len).map(|_| char::from(rng.gen_range(b'a'..=b'z'))).collect()
}
