//! Synthetic monthly cost history.
//!
//! Each month's cost is:
//!
//! ```text
//! cost_i = base · (1 + growth)^i · (1 + amplitude · sin(2π · month0 / 12)) · exp(σ z_i - σ²/2)
//! ```
//!
//! with `z_i ~ N(0, 1)`. The `-σ²/2` term keeps the noise mean-one so the
//! baseline stays unbiased. The RNG seed mixes the configured seed with the
//! series key, so different procedures get different but reproducible paths.

use std::collections::hash_map::DefaultHasher;
use std::f64::consts::PI;
use std::hash::{Hash, Hasher};

use chrono::Datelike;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::data::source::HistoricalCostSource;
use crate::domain::{Observation, SampleConfig, SeriesKey};
use crate::error::AppError;
use crate::series::add_months;

/// A source that generates history instead of fetching it.
#[derive(Debug, Clone)]
pub struct SampleSource {
    config: SampleConfig,
}

impl SampleSource {
    pub fn new(config: SampleConfig) -> Self {
        Self { config }
    }
}

impl HistoricalCostSource for SampleSource {
    fn fetch_historical_costs(&self, key: &SeriesKey) -> Result<Vec<Observation>, AppError> {
        generate_history(key, &self.config)
    }
}

pub fn generate_history(key: &SeriesKey, config: &SampleConfig) -> Result<Vec<Observation>, AppError> {
    if config.months == 0 {
        return Err(AppError::new(2, "Sample month count must be > 0."));
    }
    if !(config.base_cost.is_finite() && config.base_cost > 0.0) {
        return Err(AppError::new(2, "Sample base cost must be positive."));
    }
    if !(config.monthly_growth.is_finite() && config.monthly_growth > -1.0) {
        return Err(AppError::new(2, "Sample monthly growth must be > -100%."));
    }
    if !(config.seasonal_amplitude.is_finite() && (0.0..1.0).contains(&config.seasonal_amplitude)) {
        return Err(AppError::new(2, "Sample seasonal amplitude must be in [0, 1)."));
    }
    if !(config.noise.is_finite() && config.noise >= 0.0) {
        return Err(AppError::new(2, "Sample noise must be non-negative."));
    }

    let mut rng = StdRng::seed_from_u64(sample_seed(key, config));
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let sigma = config.noise;
    let mean_correction = 0.5 * sigma * sigma;

    let mut out = Vec::with_capacity(config.months);
    for i in 0..config.months {
        let date = u32::try_from(i)
            .ok()
            .and_then(|m| add_months(config.start, m))
            .ok_or_else(|| AppError::new(2, "Sample history exceeds the supported date range."))?;

        let trend = config.base_cost * (1.0 + config.monthly_growth).powi(i as i32);
        let phase = 2.0 * PI * f64::from(date.month0()) / 12.0;
        let season = 1.0 + config.seasonal_amplitude * phase.sin();
        let z: f64 = normal.sample(&mut rng);
        let cost = trend * season * (sigma * z - mean_correction).exp();

        out.push(Observation::new(date, (cost * 100.0).round() / 100.0));
    }

    tracing::debug!(series = %key, months = out.len(), "generated sample history");
    Ok(out)
}

fn sample_seed(key: &SeriesKey, config: &SampleConfig) -> u64 {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    config.start.hash(&mut hasher);
    config.months.hash(&mut hasher);
    config.base_cost.to_bits().hash(&mut hasher);
    config.monthly_growth.to_bits().hash(&mut hasher);
    config.seasonal_amplitude.to_bits().hash(&mut hasher);
    config.noise.to_bits().hash(&mut hasher);
    config.seed.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn config() -> SampleConfig {
        SampleConfig {
            start: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            months: 24,
            base_cost: 1500.0,
            monthly_growth: 0.005,
            seasonal_amplitude: 0.05,
            noise: 0.02,
            seed: 42,
        }
    }

    #[test]
    fn history_is_monthly_positive_and_reproducible() {
        let key = SeriesKey::new("MRI", "10001");
        let a = generate_history(&key, &config()).unwrap();
        let b = generate_history(&key, &config()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 24);
        assert_eq!(a[0].date, NaiveDate::from_ymd_opt(2022, 1, 1).unwrap());
        assert_eq!(a[23].date, NaiveDate::from_ymd_opt(2023, 12, 1).unwrap());
        assert!(a.iter().all(|o| o.cost > 0.0));

        let other = generate_history(&SeriesKey::new("CT Scan", "10001"), &config()).unwrap();
        assert_ne!(a, other);
    }

    #[test]
    fn noiseless_history_follows_trend_and_season() {
        let cfg = SampleConfig {
            noise: 0.0,
            seasonal_amplitude: 0.0,
            monthly_growth: 0.0,
            ..config()
        };
        let h = generate_history(&SeriesKey::new("MRI", "10001"), &cfg).unwrap();
        assert!(h.iter().all(|o| (o.cost - 1500.0).abs() < 1e-9));
    }

    #[test]
    fn rejects_invalid_settings() {
        let key = SeriesKey::new("MRI", "10001");
        let cfg = SampleConfig { months: 0, ..config() };
        assert_eq!(generate_history(&key, &cfg).unwrap_err().exit_code(), 2);
        let cfg = SampleConfig { seasonal_amplitude: 1.5, ..config() };
        assert!(generate_history(&key, &cfg).is_err());
        let cfg = SampleConfig { base_cost: -3.0, ..config() };
        assert!(generate_history(&key, &cfg).is_err());
    }
}
