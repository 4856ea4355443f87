use crate::config::Config;
use crate::figure::{Figure, FigureSeries, Group};
use crate::fmt::PlotFmt;
use crate::metric::MetricPoint;
use crate::metrics::F64;
use color_eyre::eyre::WrapErr;
use color_eyre::Report;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize)]
pub struct FigureExport {
    pub figure: Figure,
    pub title: String,
    pub x_label: String,
    pub metric_key: String,
    pub trials: usize,
    pub groups: Vec<GroupExport>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GroupExport {
    pub group: Group,
    pub name: String,
    pub points: Vec<MetricPoint>,
}

impl FigureExport {
    pub fn new(series: &FigureSeries, config: &Config) -> Self {
        let figure = series.figure;
        let groups = series
            .groups
            .iter()
            .map(|(group, points)| GroupExport {
                group: *group,
                name: PlotFmt::group_name(*group),
                points: points.clone(),
            })
            .collect();
        Self {
            figure,
            title: PlotFmt::figure_title(figure).to_string(),
            x_label: PlotFmt::x_label(figure).to_string(),
            metric_key: config.metric_key().to_string(),
            trials: config.trials(figure),
            groups,
        }
    }
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    group: &'a str,
    x: u64,
    p50: F64,
    tps: F64,
    p99: Option<F64>,
}

/// Writes `<output_dir>/<figure>.json` and returns its path.
pub fn to_json(
    series: &FigureSeries,
    config: &Config,
    output_dir: impl AsRef<Path>,
) -> Result<PathBuf, Report> {
    let path = output_path(series.figure, output_dir.as_ref(), "json")?;
    let file = std::fs::File::create(&path)
        .wrap_err_with(|| format!("create {}", path.display()))?;
    let buf = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(buf, &FigureExport::new(series, config))
        .wrap_err_with(|| format!("serialize {}", path.display()))?;
    Ok(path)
}

/// Writes `<output_dir>/<figure>.csv` with one `group,x,p50,tps,p99` row per
/// point and returns its path.
pub fn to_csv(
    series: &FigureSeries,
    output_dir: impl AsRef<Path>,
) -> Result<PathBuf, Report> {
    let path = output_path(series.figure, output_dir.as_ref(), "csv")?;
    let mut writer = csv::Writer::from_path(&path)
        .wrap_err_with(|| format!("create {}", path.display()))?;
    for (group, points) in series.groups.iter() {
        let group = group.to_string();
        for point in points {
            writer
                .serialize(CsvRow {
                    group: &group,
                    x: point.x,
                    p50: point.p50,
                    tps: point.tps,
                    p99: point.tail.p99(),
                })
                .wrap_err("serialize csv row")?;
        }
    }
    writer.flush().wrap_err("flush csv")?;
    Ok(path)
}

fn output_path(
    figure: Figure,
    output_dir: &Path,
    extension: &str,
) -> Result<PathBuf, Report> {
    std::fs::create_dir_all(output_dir).wrap_err_with(|| {
        format!("create output directory {}", output_dir.display())
    })?;
    Ok(output_dir.join(format!("{}.{}", figure.name(), extension)))
}
