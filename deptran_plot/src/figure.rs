use crate::aggregate;
use crate::config::Config;
use crate::db::{self, DocumentLoader};
use crate::metric::{self, Series, TailMode};
use color_eyre::eyre::{self, WrapErr};
use color_eyre::Report;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Deserialize,
    Serialize,
)]
pub enum Figure {
    /// Throughput and latency with increasing load, 3 vs 5 replicas.
    Fig5a,
    /// Latency distribution per experiment, 3 vs 5 replicas.
    Fig5b,
    /// Throughput and latency with increasing load.
    Fig6a,
    /// Latency distribution per experiment, leader vs follower.
    Fig6b,
}

/// A named variant within a figure, aggregated independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Group {
    Replicas(usize),
    Leader,
    Follower,
    /// The only group of a figure without variants.
    All,
}

impl Group {
    /// Part of the result directory name identifying this group.
    fn dir_segment(&self) -> Option<String> {
        match self {
            Group::Replicas(n) => Some(n.to_string()),
            Group::Leader => Some(String::from("leader")),
            Group::Follower => Some(String::from("follower")),
            Group::All => None,
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.dir_segment() {
            Some(segment) => write!(f, "{}", segment),
            None => write!(f, "all"),
        }
    }
}

impl Figure {
    pub fn all() -> [Figure; 4] {
        [Figure::Fig5a, Figure::Fig5b, Figure::Fig6a, Figure::Fig6b]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Figure::Fig5a => "figure5a",
            Figure::Fig5b => "figure5b",
            Figure::Fig6a => "figure6a",
            Figure::Fig6b => "figure6b",
        }
    }

    /// Values of the x axis: concurrency level (a variants) or experiment
    /// index (b variants).
    pub fn domain(&self) -> Vec<u64> {
        match self {
            Figure::Fig5a => vec![
                20, 40, 60, 80, 100, 130, 160, 190, 200, 220, 260, 300, 340,
                380, 420,
            ],
            Figure::Fig5b => vec![1, 2, 3, 4, 5, 6],
            Figure::Fig6a => vec![1, 2, 4, 6, 8, 10, 12, 14, 16, 18, 20],
            Figure::Fig6b => vec![1, 2, 5, 6],
        }
    }

    pub fn groups(&self) -> Vec<Group> {
        match self {
            Figure::Fig5a | Figure::Fig5b => {
                vec![Group::Replicas(3), Group::Replicas(5)]
            }
            Figure::Fig6a => vec![Group::All],
            Figure::Fig6b => vec![Group::Leader, Group::Follower],
        }
    }

    pub fn tail_mode(&self) -> TailMode {
        match self {
            Figure::Fig5a | Figure::Fig6a => TailMode::P99,
            Figure::Fig5b | Figure::Fig6b => TailMode::Distribution,
        }
    }

    /// Result directory of a single point, e.g.
    /// `<results_dir>/figure5a_1/results_3_20`.
    pub fn dir(
        &self,
        results_dir: &Path,
        trial: usize,
        group: Group,
        x: u64,
    ) -> PathBuf {
        let point_dir = match group.dir_segment() {
            Some(segment) => format!("results_{}_{}", segment, x),
            None => format!("results_{}", x),
        };
        results_dir
            .join(format!("{}_{}", self.name(), trial))
            .join(point_dir)
    }
}

impl fmt::Display for Figure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Aggregated series of every group of a figure.
#[derive(Debug, Clone)]
pub struct FigureSeries {
    pub figure: Figure,
    pub groups: Vec<(Group, Series)>,
    /// result directories without a document, over all trials
    pub missing: Vec<PathBuf>,
}

impl FigureSeries {
    pub fn group(&self, group: Group) -> Option<&Series> {
        self.groups
            .iter()
            .find(|(g, _)| *g == group)
            .map(|(_, series)| series)
    }

    /// Removes the series of `group`.
    pub fn take(&mut self, group: Group) -> Result<Series, Report> {
        match self.groups.iter().position(|(g, _)| *g == group) {
            Some(index) => Ok(self.groups.remove(index).1),
            None => eyre::bail!("{} has no group {}", self.figure, group),
        }
    }
}

pub struct FigureSeriesBuilder<'a> {
    figure: Figure,
    config: &'a Config,
    loader: DocumentLoader,
}

impl<'a> FigureSeriesBuilder<'a> {
    pub fn new(figure: Figure, config: &'a Config) -> Self {
        let loader = DocumentLoader::new(config.write_derived());
        Self {
            figure,
            config,
            loader,
        }
    }

    pub fn build(&self) -> Result<FigureSeries, Report> {
        let trials = self.config.trials(self.figure);
        if trials == 0 {
            eyre::bail!("{} should have at least one trial", self.figure);
        }
        let domain = self.figure.domain();
        let groups = self.figure.groups();

        // group index -> series of each trial
        let mut trial_sets: Vec<Vec<Series>> =
            groups.iter().map(|_| Vec::with_capacity(trials)).collect();
        let mut missing = Vec::new();

        for trial in 1..=trials {
            for (index, group) in groups.iter().enumerate() {
                let series = self
                    .trial_series(trial, *group, &domain, &mut missing)
                    .wrap_err_with(|| {
                        format!(
                            "{} trial {} group {}",
                            self.figure, trial, group
                        )
                    })?;
                trial_sets[index].push(series);
            }
        }

        let mut aggregated = Vec::with_capacity(groups.len());
        for (group, trial_set) in groups.into_iter().zip(trial_sets) {
            let series = aggregate::aggregate(&domain, trial_set)
                .wrap_err_with(|| {
                    format!("aggregate {} group {}", self.figure, group)
                })?;
            tracing::info!(
                "{} group {}: {} of {} points over {} trial(s)",
                self.figure,
                group,
                series.len(),
                domain.len(),
                trials
            );
            aggregated.push((group, series));
        }

        Ok(FigureSeries {
            figure: self.figure,
            groups: aggregated,
            missing,
        })
    }

    fn trial_series(
        &self,
        trial: usize,
        group: Group,
        domain: &[u64],
        missing: &mut Vec<PathBuf>,
    ) -> Result<Series, Report> {
        let mut series = Vec::with_capacity(domain.len());
        for &x in domain {
            let results_dir = self.config.results_dir();
            let dir = self.figure.dir(results_dir, trial, group, x);
            match db::locate(&dir)? {
                Some(path) => {
                    let document = self.loader.load(&path)?;
                    let point = metric::extract(
                        &document,
                        self.config.metric_key(),
                        x,
                        self.figure.tail_mode(),
                    )
                    .wrap_err_with(|| {
                        format!("extract metrics from {}", path.display())
                    })?;
                    series.push(point);
                }
                None => {
                    tracing::warn!(
                        "no result document found in {}",
                        dir.display()
                    );
                    missing.push(dir);
                }
            }
        }
        Ok(series)
    }
}
