//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the forecasting code stays clean and testable
//! - output changes are localized (the table layout is pinned by tests)

use crate::data::RegionResolution;
use crate::domain::{
    ConfidenceLevel, ForecastOptions, ForecastOutput, IntervalPolicy, Observation, SeriesKey, TrendAnalysis,
};
use crate::forecast::BatchItem;

/// Header block for a single-series run: series, data range, engine settings.
pub fn format_run_summary(
    key: &SeriesKey,
    region: &RegionResolution,
    historical: &[Observation],
    output: &ForecastOutput,
    options: &ForecastOptions,
) -> String {
    let mut out = String::new();

    out.push_str("=== medcost - Procedure Cost Forecast ===\n");
    out.push_str(&format!("Procedure: {}\n", key.procedure));
    if region.using_fallback {
        out.push_str(&format!(
            "Region: {} (requested {} not available, using fallback)\n",
            region.effective, region.requested
        ));
    } else {
        out.push_str(&format!("Region: {}\n", region.effective));
    }

    match (historical.first(), historical.last()) {
        (Some(first), Some(last)) => out.push_str(&format!(
            "History: n={} | {} .. {} | last={:.2}\n",
            output.n_observations, first.date, last.date, last.cost
        )),
        _ => out.push_str("History: none\n"),
    }

    let interval = match options.interval {
        IntervalPolicy::ResidualSigma => "residual sigma",
        IntervalPolicy::CoefficientOfVariation => "historical cv",
    };
    out.push_str(&format!(
        "Strategy: {} | band: {} @ {}% (z={:.2})\n",
        output.strategy.display_name(),
        interval,
        level_label(options),
        options.level.z_score(),
    ));
    out.push_str(&format!(
        "Residual sigma: {:.2} | confidence: {:.2} | trend: {}\n",
        output.residual_std_dev, output.confidence, output.trend
    ));
    out.push('\n');

    out
}

/// Month-by-month forecast table.
pub fn format_forecast_table(output: &ForecastOutput) -> String {
    if output.forecast.is_empty() {
        return "No forecast: at least two observations are needed.\n".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!("{:<10} {:>12} {:>12} {:>12}", "date", "estimate", "lower", "upper"));
    out.push('\n');
    out.push_str(&format!("{:-<10} {:-<12} {:-<12} {:-<12}", "", "", "", ""));
    out.push('\n');

    for p in &output.forecast {
        out.push_str(&format!(
            "{:<10} {:>12.2} {:>12.2} {:>12.2}",
            p.date, p.point_estimate, p.lower_bound, p.upper_bound
        ));
        out.push('\n');
    }

    out
}

/// One-paragraph trend summary.
pub fn format_trend_analysis(key: &SeriesKey, region: &RegionResolution, analysis: &TrendAnalysis) -> String {
    let mut out = String::new();
    out.push_str(&format!("Trend for {} in {}:\n", key.procedure, region.effective));
    out.push_str(&format!("- current cost      : {:.2}\n", analysis.current_cost));
    out.push_str(&format!("- last month change : {:+.2}%\n", analysis.percent_change));
    out.push_str(&format!("- next month        : {:.2}\n", analysis.forecast_next_month));
    out.push_str(&format!("- direction         : {}\n", analysis.trend));
    out
}

/// One line per batch series; failures show their error.
pub fn format_batch_summary(items: &[BatchItem]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<24} {:<8} {:>4} {:>12} {:<10} {:>6}",
        "procedure", "region", "n", "last_est", "trend", "conf"
    ));
    out.push('\n');
    out.push_str(&format!("{:-<24} {:-<8} {:-<4} {:-<12} {:-<10} {:-<6}", "", "", "", "", "", ""));
    out.push('\n');

    for item in items {
        let procedure = truncate(&item.key.procedure, 24);
        let region = truncate(&item.key.region, 8);
        let line = match &item.outcome {
            Ok(output) => {
                let last = output
                    .forecast
                    .last()
                    .map(|p| format!("{:.2}", p.point_estimate))
                    .unwrap_or_else(|| "-".to_string());
                format!(
                    "{:<24} {:<8} {:>4} {:>12} {:<10} {:>6.2}",
                    procedure,
                    region,
                    output.n_observations,
                    last,
                    output.trend.to_string(),
                    output.confidence
                )
            }
            Err(e) => format!("{procedure:<24} {region:<8} error: {e}"),
        };
        out.push_str(line.trim_end());
        out.push('\n');
    }

    let failed = items.iter().filter(|i| i.outcome.is_err()).count();
    out.push_str(&format!("\n{} series, {} failed\n", items.len(), failed));
    out
}

fn level_label(options: &ForecastOptions) -> &'static str {
    match options.level {
        ConfidenceLevel::P95 => "95",
        ConfidenceLevel::P99 => "99",
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ForecastPoint, StrategyKind, TrendDirection};
    use crate::error::ForecastError;
    use chrono::NaiveDate;

    fn output(points: usize) -> ForecastOutput {
        ForecastOutput {
            strategy: StrategyKind::SeasonalTrend,
            n_observations: 3,
            residual_std_dev: 0.0,
            forecast: (0..points)
                .map(|i| ForecastPoint {
                    date: NaiveDate::from_ymd_opt(2023, 4 + i as u32, 1).unwrap(),
                    point_estimate: 130.0 + 10.0 * i as f64,
                    lower_bound: 130.0 + 10.0 * i as f64,
                    upper_bound: 130.0 + 10.0 * i as f64,
                })
                .collect(),
            trend: TrendDirection::Rising,
            confidence: 0.7,
        }
    }

    fn region(requested: &str, effective: &str) -> RegionResolution {
        RegionResolution {
            requested: requested.to_string(),
            effective: effective.to_string(),
            using_fallback: requested != effective,
        }
    }

    #[test]
    fn forecast_table_layout() {
        let txt = format_forecast_table(&output(2));
        let expected = concat!(
            "date           estimate        lower        upper\n",
            "---------- ------------ ------------ ------------\n",
            "2023-04-01       130.00       130.00       130.00\n",
            "2023-05-01       140.00       140.00       140.00\n",
        );
        assert_eq!(txt, expected);
        assert!(format_forecast_table(&output(0)).starts_with("No forecast"));
    }

    #[test]
    fn summary_mentions_fallback_region() {
        let key = SeriesKey::new("MRI", "99999");
        let history = vec![Observation::new(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(), 100.0)];
        let txt = format_run_summary(
            &key,
            &region("99999", "10001"),
            &history,
            &output(1),
            &ForecastOptions::default(),
        );
        assert!(txt.contains("Region: 10001 (requested 99999 not available, using fallback)"));
        assert!(txt.contains("History: n=3 | 2023-01-01 .. 2023-01-01 | last=100.00"));
        assert!(txt.contains("z=1.96"));
    }

    #[test]
    fn batch_summary_reports_failures_inline() {
        let items = vec![
            BatchItem {
                key: SeriesKey::new("CT Scan", "10001"),
                outcome: Err(ForecastError::InvalidObservation { index: 1, cost: -1.0 }),
            },
            BatchItem {
                key: SeriesKey::new("MRI", "10001"),
                outcome: Ok(output(2)),
            },
        ];
        let txt = format_batch_summary(&items);
        let lines: Vec<&str> = txt.lines().collect();
        assert!(lines[2].starts_with("CT Scan"));
        assert!(lines[2].contains("error: invalid observation at index 1"));
        assert!(lines[3].contains("140.00"));
        assert!(lines[3].contains("Rising"));
        assert!(txt.ends_with("2 series, 1 failed\n"));
    }

    #[test]
    fn trend_analysis_shows_signed_change() {
        let analysis = TrendAnalysis {
            current_cost: 1100.0,
            percent_change: -2.5,
            forecast_next_month: 1080.0,
            trend: TrendDirection::Stable,
        };
        let txt = format_trend_analysis(&SeriesKey::new("MRI", "10001"), &region("10001", "10001"), &analysis);
        assert!(txt.contains("last month change : -2.50%"));
        assert!(txt.contains("direction         : Stable"));
    }
}
