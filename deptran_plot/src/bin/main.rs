use color_eyre::eyre::WrapErr;
use color_eyre::Report;
use deptran_plot::export;
use deptran_plot::{
    Benchmark, Config, Figure, FigureSeries, FigureSeriesBuilder, PlotFmt,
    Series, Tail,
};

// folder with one `<figure>_<trial>` folder per trial
const RESULTS_DIR: &str = "../";

// folder where the aggregated series will be stored
const OUTPUT_DIR: Option<&str> = Some("series");

const BENCHMARK: Benchmark = Benchmark::Tpca;
// const BENCHMARK: Benchmark = Benchmark::Rw;

// trials, by default: 1
const FIGURE5A_TRIALS: usize = 1;
const FIGURE5B_TRIALS: usize = 1;
const FIGURE6A_TRIALS: usize = 1;
const FIGURE6B_TRIALS: usize = 1;

fn main() -> Result<(), Report> {
    color_eyre::install()?;

    // init logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut config = Config::new(RESULTS_DIR, BENCHMARK.metric_key());
    config.set_trials(Figure::Fig5a, FIGURE5A_TRIALS);
    config.set_trials(Figure::Fig5b, FIGURE5B_TRIALS);
    config.set_trials(Figure::Fig6a, FIGURE6A_TRIALS);
    config.set_trials(Figure::Fig6b, FIGURE6B_TRIALS);

    let mut missing = Vec::new();
    for figure in Figure::all() {
        let series = FigureSeriesBuilder::new(figure, &config)
            .build()
            .wrap_err_with(|| format!("build {}", figure))?;
        show(&series);
        if let Some(output_dir) = OUTPUT_DIR {
            let json = export::to_json(&series, &config, output_dir)?;
            let csv = export::to_csv(&series, output_dir)?;
            println!("saved {} and {}", json.display(), csv.display());
        }
        missing.extend(series.missing);
    }

    if !missing.is_empty() {
        println!(">>>>>>>> MISSING ({}) <<<<<<<<", missing.len());
        for dir in missing {
            println!("No yml found in {}", dir.display());
        }
    }
    Ok(())
}

fn show(series: &FigureSeries) {
    let figure = series.figure;
    println!(
        ">>>>>>>> {} | {} <<<<<<<<",
        figure.name().to_uppercase(),
        PlotFmt::figure_title(figure)
    );
    for (group, points) in series.groups.iter() {
        println!("{}:", PlotFmt::group_name(*group));
        show_series(PlotFmt::x_label(figure), points);
    }
}

fn show_series(x_label: &str, series: &Series) {
    for point in series {
        let tail = match &point.tail {
            Tail::P99(p99) => format!("p99={}", p99.round()),
            Tail::Distribution(percentiles) => percentiles
                .iter()
                .map(|(percentile, latency)| {
                    format!("p{}={}", percentile, latency.round())
                })
                .collect::<Vec<_>>()
                .join(" "),
        };
        println!(
            "  {} = {:<4} | p50={:<8} tps={:<10} {}",
            x_label,
            point.x,
            point.p50.round(),
            point.tps.round(),
            tail
        );
    }
}
