//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - sets up logging
//! - builds the data source and runs the forecast
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::cli::{BatchArgs, Command, EngineArgs, ForecastArgs, PlotArgs};
use crate::data::parse_region_list;
use crate::domain::{ForecastConfig, ForecastOptions, HoltParams, SampleConfig, SeriesKey};
use crate::error::AppError;

pub mod pipeline;

/// Comma-separated list of regions the data source carries.
pub const AVAILABLE_REGIONS_VAR: &str = "MEDCOST_AVAILABLE_REGIONS";

/// Entry point for the `medcost` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Forecast(args) => handle_forecast(args),
        Command::Trend(args) => handle_trend(args),
        Command::Batch(args) => handle_batch(args),
        Command::Plot(args) => handle_plot(args),
    }
}

/// Install the stderr subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    // A subscriber may already be installed (tests, embedding).
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}

fn handle_forecast(args: ForecastArgs) -> Result<(), AppError> {
    let config = forecast_config_from_args(&args, available_regions());
    let run = pipeline::run_forecast(&config)?;

    if config.json {
        let json = serde_json::to_string_pretty(&run.output)
            .map_err(|e| AppError::new(4, format!("Failed to serialize forecast: {e}")))?;
        println!("{json}");
    } else {
        println!(
            "{}",
            crate::report::format_run_summary(&run.key, &run.region, &run.historical, &run.output, &config.options)
        );
        println!("{}", crate::report::format_forecast_table(&run.output));

        if config.plot {
            let plot = crate::plot::render_forecast_plot(
                &run.historical,
                &run.output.forecast,
                config.plot_width,
                config.plot_height,
            );
            println!("{plot}");
        }
    }

    // Optional exports.
    if let Some(path) = &config.export {
        crate::io::write_forecast_csv(path, &run.key, &run.output)?;
    }
    if let Some(path) = &args.export_report {
        let report = crate::io::build_report(
            &config.key,
            &run.region,
            config.periods,
            config.options,
            &run.historical,
            &run.output,
        );
        crate::io::write_report_json(path, &report)?;
    }

    Ok(())
}

fn handle_trend(args: ForecastArgs) -> Result<(), AppError> {
    let config = forecast_config_from_args(&args, available_regions());
    let run = pipeline::run_trend(&config)?;

    if config.json {
        let json = serde_json::to_string_pretty(&run.analysis)
            .map_err(|e| AppError::new(4, format!("Failed to serialize trend analysis: {e}")))?;
        println!("{json}");
    } else {
        print!("{}", crate::report::format_trend_analysis(&run.key, &run.region, &run.analysis));
    }
    Ok(())
}

fn handle_batch(args: BatchArgs) -> Result<(), AppError> {
    let options = engine_options_from_args(&args.engine);
    let items = pipeline::run_batch(&args.input, options, args.engine.periods)?;

    if args.json {
        let rows: Vec<serde_json::Value> = items
            .iter()
            .map(|item| match &item.outcome {
                Ok(output) => serde_json::json!({ "key": item.key, "result": output }),
                Err(e) => serde_json::json!({ "key": item.key, "error": e.to_string() }),
            })
            .collect();
        let json = serde_json::to_string_pretty(&rows)
            .map_err(|e| AppError::new(4, format!("Failed to serialize batch: {e}")))?;
        println!("{json}");
    } else {
        print!("{}", crate::report::format_batch_summary(&items));
    }

    if let Some(path) = &args.export {
        crate::io::write_batch_csv(path, &items)?;
    }
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let report = crate::io::read_report_json(&args.report)?;
    let plot = crate::plot::render_report_plot(&report, args.width, args.height);
    println!("{plot}");
    Ok(())
}

/// Regions from `MEDCOST_AVAILABLE_REGIONS` (`.env` is honored); empty if unset.
fn available_regions() -> Vec<String> {
    dotenvy::dotenv().ok();
    std::env::var(AVAILABLE_REGIONS_VAR)
        .map(|raw| parse_region_list(&raw))
        .unwrap_or_default()
}

pub fn engine_options_from_args(args: &EngineArgs) -> ForecastOptions {
    ForecastOptions {
        strategy: args.strategy,
        interval: args.interval,
        level: args.level,
        holt: HoltParams {
            alpha: args.alpha,
            beta: args.beta,
        },
        gaps: args.gaps,
        perturb: args.perturb,
        seed: args.seed,
        round: args.round,
    }
}

pub fn forecast_config_from_args(args: &ForecastArgs, available_regions: Vec<String>) -> ForecastConfig {
    let source = &args.source;
    ForecastConfig {
        key: SeriesKey::new(args.procedure.trim(), args.region.trim()),
        source: source.source,
        input: source.input.clone(),
        sample: SampleConfig {
            start: source.sample_start,
            months: source.sample_months,
            base_cost: source.sample_base_cost,
            monthly_growth: source.sample_growth,
            seasonal_amplitude: source.sample_seasonality,
            noise: source.sample_noise,
            seed: source.sample_seed,
        },

        periods: args.engine.periods,
        options: engine_options_from_args(&args.engine),

        available_regions,

        json: args.json,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export: args.export.clone(),
    }
}
