#![deny(rust_2018_idioms)]

// This module contains the median and the merging of trial series.
pub mod aggregate;

// This module contains the definition of `Config` and `Benchmark`.
pub mod config;

// This module contains the locating and loading of result documents.
pub mod db;

pub mod export;

// This module contains the definition of `Figure` and of the builder that turns
// a result tree into one aggregated series per group.
pub mod figure;

mod fmt;

// This module contains the definition of `MetricPoint` and `extract`.
pub mod metric;

// This module contains the definition of `F64`.
pub mod metrics;

// Re-exports.
pub use config::{Benchmark, Config};
pub use figure::{Figure, FigureSeries, FigureSeriesBuilder, Group};
pub use fmt::PlotFmt;
pub use metric::{MetricPoint, Percentiles, Series, Tail, TailMode};

use color_eyre::Report;

/// 3-replica and 5-replica series of figure 5a.
pub fn figure5a(config: &Config) -> Result<(Series, Series), Report> {
    let mut figure = FigureSeriesBuilder::new(Figure::Fig5a, config).build()?;
    let three = figure.take(Group::Replicas(3))?;
    let five = figure.take(Group::Replicas(5))?;
    Ok((three, five))
}

/// 3-replica and 5-replica series of figure 5b.
pub fn figure5b(config: &Config) -> Result<(Series, Series), Report> {
    let mut figure = FigureSeriesBuilder::new(Figure::Fig5b, config).build()?;
    let three = figure.take(Group::Replicas(3))?;
    let five = figure.take(Group::Replicas(5))?;
    Ok((three, five))
}

/// Series of figure 6a, which has a single group.
pub fn figure6a(config: &Config) -> Result<Series, Report> {
    let mut figure = FigureSeriesBuilder::new(Figure::Fig6a, config).build()?;
    figure.take(Group::All)
}

/// Leader and follower series of figure 6b.
pub fn figure6b(config: &Config) -> Result<(Series, Series), Report> {
    let mut figure = FigureSeriesBuilder::new(Figure::Fig6b, config).build()?;
    let leader = figure.take(Group::Leader)?;
    let follower = figure.take(Group::Follower)?;
    Ok((leader, follower))
}
