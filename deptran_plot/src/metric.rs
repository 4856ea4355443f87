use crate::metrics::F64;
use color_eyre::eyre::{self, eyre};
use color_eyre::Report;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which tail metric a figure keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TailMode {
    P99,
    Distribution,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tail {
    P99(F64),
    /// All percentiles, labeled as written in the document.
    Distribution(Percentiles),
}

impl Tail {
    pub fn mode(&self) -> TailMode {
        match self {
            Tail::P99(_) => TailMode::P99,
            Tail::Distribution(_) => TailMode::Distribution,
        }
    }

    /// The p99 latency, if known.
    pub fn p99(&self) -> Option<F64> {
        match self {
            Tail::P99(p99) => Some(*p99),
            Tail::Distribution(percentiles) => percentiles.get(P99_KEY),
        }
    }
}

/// Latency per percentile, sorted by the numeric value of the label: `5`
/// comes before `10`, and `99.9` before `100`. Labels that are not numbers go
/// last, in text order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<(String, F64)>", into = "Vec<(String, F64)>")]
pub struct Percentiles(Vec<(String, F64)>);

impl Percentiles {
    /// The latency at `percentile`, matched on the label as written.
    pub fn get(&self, percentile: &str) -> Option<F64> {
        self.0
            .iter()
            .find(|(label, _)| label == percentile)
            .map(|(_, latency)| *latency)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, F64)> + '_ {
        self.0.iter().map(|(label, latency)| (label.as_str(), *latency))
    }
}

fn percentile_value(label: &str) -> F64 {
    label
        .trim()
        .parse::<f64>()
        .map(F64::new)
        .unwrap_or_else(|_| F64::nan())
}

impl From<Vec<(String, F64)>> for Percentiles {
    fn from(mut percentiles: Vec<(String, F64)>) -> Self {
        percentiles.sort_by(|(a, _), (b, _)| {
            percentile_value(a)
                .cmp(&percentile_value(b))
                .then_with(|| a.cmp(b))
        });
        Self(percentiles)
    }
}

impl From<Percentiles> for Vec<(String, F64)> {
    fn from(percentiles: Percentiles) -> Self {
        percentiles.0
    }
}

impl FromIterator<(String, F64)> for Percentiles {
    fn from_iter<I: IntoIterator<Item = (String, F64)>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub x: u64,
    pub p50: F64,
    pub tps: F64,
    pub tail: Tail,
}

/// Points of one (figure, group) pair, in x-domain order.
pub type Series = Vec<MetricPoint>;

const ALL_LATENCY_KEY: &str = "all_latency";
const TPS_KEY: &str = "tps";
const P50_KEY: &str = "50";
const P99_KEY: &str = "99";

/// Extracts the metrics stored under `metric_key` in `document`.
pub fn extract(
    document: &Value,
    metric_key: &str,
    x: u64,
    tail_mode: TailMode,
) -> Result<MetricPoint, Report> {
    let metrics = lookup(document, &[metric_key])?;
    let all_latency = lookup(metrics, &[metric_key, ALL_LATENCY_KEY])?;

    let p50 = number(
        lookup(all_latency, &[metric_key, ALL_LATENCY_KEY, P50_KEY])?,
        &[metric_key, ALL_LATENCY_KEY, P50_KEY],
    )?;
    let tps = number(
        lookup(metrics, &[metric_key, TPS_KEY])?,
        &[metric_key, TPS_KEY],
    )?;
    let tail = match tail_mode {
        TailMode::P99 => {
            let path = [metric_key, ALL_LATENCY_KEY, P99_KEY];
            Tail::P99(number(lookup(all_latency, &path)?, &path)?)
        }
        TailMode::Distribution => {
            let object = all_latency.as_object().ok_or_else(|| {
                eyre!(
                    "{}/{} is not a mapping",
                    metric_key,
                    ALL_LATENCY_KEY
                )
            })?;
            let mut percentiles = Vec::with_capacity(object.len());
            for (percentile, value) in object {
                let value = number(
                    value,
                    &[metric_key, ALL_LATENCY_KEY, percentile.as_str()],
                )?;
                percentiles.push((percentile.clone(), value));
            }
            Tail::Distribution(Percentiles::from(percentiles))
        }
    };

    Ok(MetricPoint { x, p50, tps, tail })
}

// `path` ends with the key to look up in `value`; the rest is context for the
// error message
fn lookup<'a>(value: &'a Value, path: &[&str]) -> Result<&'a Value, Report> {
    let key = path.last().expect("lookup path should not be empty");
    value
        .get(*key)
        .ok_or_else(|| eyre!("missing key {}", path.join("/")))
}

fn number(value: &Value, path: &[&str]) -> Result<F64, Report> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match number {
        Some(n) => Ok(F64::new(n)),
        None => {
            eyre::bail!("{} is not a number: {}", path.join("/"), value)
        }
    }
}
