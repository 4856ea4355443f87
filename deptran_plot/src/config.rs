use crate::figure::Figure;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// by default, each figure has a single trial
const DEFAULT_TRIALS: usize = 1;

/// Benchmarks whose result documents can be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Benchmark {
    Tpca,
    Rw,
}

impl Benchmark {
    /// Top-level key of the metrics of this benchmark in a result document.
    pub fn metric_key(&self) -> &'static str {
        match self {
            Benchmark::Tpca => "PAYMENT",
            Benchmark::Rw => "WRITE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// directory holding one `<figure>_<trial>` directory per trial
    results_dir: PathBuf,
    /// key of the metrics to read from each result document
    metric_key: String,
    /// number of trials per figure
    trials: BTreeMap<Figure, usize>,
    /// if true, a JSON copy of each loaded document is written next to it
    write_derived: bool,
}

impl Config {
    pub fn new(
        results_dir: impl Into<PathBuf>,
        metric_key: impl Into<String>,
    ) -> Self {
        Self {
            results_dir: results_dir.into(),
            metric_key: metric_key.into(),
            trials: BTreeMap::new(),
            write_derived: true,
        }
    }

    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    pub fn metric_key(&self) -> &str {
        &self.metric_key
    }

    pub fn trials(&self, figure: Figure) -> usize {
        self.trials.get(&figure).copied().unwrap_or(DEFAULT_TRIALS)
    }

    pub fn set_trials(&mut self, figure: Figure, trials: usize) {
        self.trials.insert(figure, trials);
    }

    pub fn write_derived(&self) -> bool {
        self.write_derived
    }

    pub fn set_write_derived(&mut self, write_derived: bool) {
        self.write_derived = write_derived;
    }
}
