use crate::metric::{MetricPoint, Series, Tail};
use crate::metrics::F64;
use color_eyre::eyre;
use color_eyre::Report;
use std::collections::HashMap;

/// Returns the element at sorted position `len / 2`; with an even number of
/// values this is the upper of the two middle elements.
pub fn median(mut values: Vec<F64>) -> Option<F64> {
    values.sort();
    values.get(values.len() / 2).copied()
}

/// Merges the series of several trials into one.
///
/// Points are matched by `x`, so a trial missing some point does not shift
/// the others. For every `x` in `domain` (in that order) present in at least
/// one trial, `p50`, `tps` and a p99 tail are the median over the trials
/// having that point; a distribution tail is taken from the first of them.
pub fn aggregate(
    domain: &[u64],
    trials: Vec<Series>,
) -> Result<Series, Report> {
    // x -> points of that x, in trial order
    let mut by_x: HashMap<u64, Vec<MetricPoint>> = HashMap::new();
    for trial in trials {
        for point in trial {
            by_x.entry(point.x).or_default().push(point);
        }
    }

    let mut aggregated = Vec::with_capacity(domain.len());
    for x in domain {
        if let Some(points) = by_x.remove(x) {
            aggregated.push(merge(points)?);
        }
    }
    Ok(aggregated)
}

fn merge(points: Vec<MetricPoint>) -> Result<MetricPoint, Report> {
    let p50s = points.iter().map(|point| point.p50).collect();
    let tpss = points.iter().map(|point| point.tps).collect();
    let tails: Vec<_> = points.iter().map(|point| &point.tail).collect();
    let tail = match tails.first() {
        Some(Tail::P99(_)) => {
            let mut p99s = Vec::with_capacity(tails.len());
            for tail in tails {
                match tail {
                    Tail::P99(p99) => p99s.push(*p99),
                    Tail::Distribution(_) => eyre::bail!(
                        "x = {} has both p99 and distribution tails",
                        points[0].x
                    ),
                }
            }
            median(p99s).map(Tail::P99)
        }
        Some(Tail::Distribution(_)) => {
            if tails.iter().any(|tail| matches!(tail, Tail::P99(_))) {
                eyre::bail!(
                    "x = {} has both p99 and distribution tails",
                    points[0].x
                );
            }
            None
        }
        None => eyre::bail!("no points to merge"),
    };

    let mut points = points.into_iter();
    // the first trial's point is reused as the output
    let mut merged = points.next().expect("there should be a first point");
    merged.p50 = median(p50s).expect("there should be a p50 median");
    merged.tps = median(tpss).expect("there should be a tps median");
    if let Some(tail) = tail {
        merged.tail = tail;
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::Percentiles;
    use quickcheck_macros::quickcheck;

    fn p99_point(x: u64, p50: f64, tps: f64, p99: f64) -> MetricPoint {
        MetricPoint {
            x,
            p50: F64::new(p50),
            tps: F64::new(tps),
            tail: Tail::P99(F64::new(p99)),
        }
    }

    fn distribution_point(
        x: u64,
        p50: f64,
        tps: f64,
        percentiles: &[(&str, f64)],
    ) -> MetricPoint {
        let percentiles = percentiles
            .iter()
            .map(|(percentile, value)| {
                (percentile.to_string(), F64::new(*value))
            })
            .collect::<Percentiles>();
        MetricPoint {
            x,
            p50: F64::new(p50),
            tps: F64::new(tps),
            tail: Tail::Distribution(percentiles),
        }
    }

    fn floats(values: &[f64]) -> Vec<F64> {
        values.iter().copied().map(F64::new).collect()
    }

    #[test]
    fn median_test() {
        assert_eq!(median(Vec::new()), None);
        assert_eq!(median(floats(&[7.0])), Some(F64::new(7.0)));
        assert_eq!(median(floats(&[3.0, 1.0, 2.0])), Some(F64::new(2.0)));
        // even number of values: the upper middle value
        assert_eq!(
            median(floats(&[10.0, 30.0, 20.0, 40.0])),
            Some(F64::new(30.0))
        );
        assert_eq!(median(floats(&[5.0, 1.0])), Some(F64::new(5.0)));
    }

    #[quickcheck]
    fn median_is_rank_half(values: Vec<u32>) -> bool {
        let floats: Vec<_> =
            values.iter().map(|&v| F64::new(v as f64)).collect();
        let mut sorted = values.clone();
        sorted.sort_unstable();
        let expected =
            sorted.get(values.len() / 2).map(|&v| F64::new(v as f64));
        median(floats) == expected
    }

    #[quickcheck]
    fn single_trial_is_identity(values: Vec<(u16, u16, u16)>) -> bool {
        let domain: Vec<u64> = (1..=values.len() as u64).collect();
        let trial: Series = values
            .iter()
            .zip(domain.iter())
            .map(|(&(p50, tps, p99), &x)| {
                p99_point(x, p50 as f64, tps as f64, p99 as f64)
            })
            .collect();
        aggregate(&domain, vec![trial.clone()]).unwrap() == trial
    }

    #[test]
    fn p99_fields_are_aggregated() {
        let domain = vec![20, 40];
        let trial = |p50, tps, p99, other| {
            vec![
                p99_point(20, p50, tps, p99),
                p99_point(40, other, other, other),
            ]
        };
        let trials = vec![
            trial(10.0, 100.0, 50.0, 1.0),
            trial(30.0, 300.0, 70.0, 2.0),
            trial(20.0, 200.0, 60.0, 3.0),
            trial(40.0, 400.0, 80.0, 4.0),
        ];
        let aggregated = aggregate(&domain, trials).unwrap();
        assert_eq!(
            aggregated,
            vec![
                p99_point(20, 30.0, 300.0, 70.0),
                p99_point(40, 3.0, 3.0, 3.0)
            ]
        );
    }

    #[test]
    fn distribution_is_kept_from_first_trial() {
        let domain = vec![1];
        let first =
            distribution_point(1, 10.0, 100.0, &[("50", 10.0), ("99", 90.0)]);
        let second =
            distribution_point(1, 20.0, 300.0, &[("50", 20.0), ("99", 99.0)]);
        let third =
            distribution_point(1, 30.0, 200.0, &[("50", 30.0), ("99", 95.0)]);
        let aggregated = aggregate(
            &domain,
            vec![vec![first.clone()], vec![second], vec![third]],
        )
        .unwrap();
        assert_eq!(aggregated.len(), 1);
        assert_eq!(aggregated[0].p50, F64::new(20.0));
        assert_eq!(aggregated[0].tps, F64::new(200.0));
        assert_eq!(aggregated[0].tail, first.tail);
    }

    #[test]
    fn missing_point_does_not_shift_others() {
        let domain = vec![1, 2, 3];
        let trials = vec![
            vec![
                p99_point(1, 1.0, 10.0, 5.0),
                p99_point(2, 2.0, 20.0, 5.0),
                p99_point(3, 3.0, 30.0, 5.0),
            ],
            // x = 1 is missing in this trial
            vec![p99_point(2, 4.0, 40.0, 5.0), p99_point(3, 5.0, 50.0, 5.0)],
        ];
        let aggregated = aggregate(&domain, trials).unwrap();
        assert_eq!(
            aggregated,
            vec![
                p99_point(1, 1.0, 10.0, 5.0),
                p99_point(2, 4.0, 40.0, 5.0),
                p99_point(3, 5.0, 50.0, 5.0),
            ]
        );
    }

    #[test]
    fn point_missing_everywhere_is_omitted() {
        let domain = vec![1, 2, 3];
        let trials = vec![
            vec![p99_point(1, 1.0, 1.0, 1.0), p99_point(3, 3.0, 3.0, 3.0)],
            vec![p99_point(3, 4.0, 4.0, 4.0)],
        ];
        let aggregated = aggregate(&domain, trials).unwrap();
        let xs: Vec<_> = aggregated.iter().map(|point| point.x).collect();
        assert_eq!(xs, vec![1, 3]);
    }

    #[test]
    fn follows_domain_order() {
        let domain = vec![3, 1];
        let trials = vec![vec![
            p99_point(1, 1.0, 1.0, 1.0),
            p99_point(3, 3.0, 3.0, 3.0),
        ]];
        let aggregated = aggregate(&domain, trials).unwrap();
        let xs: Vec<_> = aggregated.iter().map(|point| point.x).collect();
        assert_eq!(xs, vec![3, 1]);
    }

    #[test]
    fn mixed_tails() {
        let domain = vec![1];
        let trials = vec![
            vec![p99_point(1, 1.0, 1.0, 1.0)],
            vec![distribution_point(1, 1.0, 1.0, &[("99", 1.0)])],
        ];
        assert!(aggregate(&domain, trials).is_err());
    }

    #[test]
    fn no_trials() {
        assert_eq!(aggregate(&[1, 2], Vec::new()).unwrap(), Vec::new());
    }
}
