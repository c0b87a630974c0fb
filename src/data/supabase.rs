//! Hosted Postgres integration for historical procedure costs.
//!
//! Queries the `historical_procedure_costs` table through the PostgREST
//! endpoint:
//!
//! ```text
//! GET {url}/rest/v1/historical_procedure_costs
//!     ?select=date,average_cost&procedure_name=eq.<p>&zip_code=eq.<r>&order=date.asc
//! ```

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::data::source::HistoricalCostSource;
use crate::domain::{Observation, SeriesKey};
use crate::error::AppError;

const TABLE: &str = "historical_procedure_costs";

const URL_VARS: [&str; 2] = ["SUPABASE_URL", "NEXT_PUBLIC_SUPABASE_URL"];
const KEY_VARS: [&str; 2] = ["SUPABASE_ANON_KEY", "NEXT_PUBLIC_SUPABASE_ANON_KEY"];

pub struct SupabaseSource {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SupabaseSource {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let base_url = first_env(&URL_VARS)
            .ok_or_else(|| AppError::new(2, "Missing SUPABASE_URL in environment (.env)."))?;
        let api_key = first_env(&KEY_VARS)
            .ok_or_else(|| AppError::new(2, "Missing SUPABASE_ANON_KEY in environment (.env)."))?;
        Ok(Self::new(base_url, api_key))
    }

    fn endpoint(&self) -> String {
        format!("{}/rest/v1/{TABLE}", self.base_url.trim_end_matches('/'))
    }
}

impl HistoricalCostSource for SupabaseSource {
    fn fetch_historical_costs(&self, key: &SeriesKey) -> Result<Vec<Observation>, AppError> {
        let procedure_filter = format!("eq.{}", key.procedure);
        let region_filter = format!("eq.{}", key.region);

        tracing::debug!(series = %key, "querying historical costs");

        let resp = self
            .client
            .get(self.endpoint())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(&[
                ("select", "date,average_cost"),
                ("procedure_name", procedure_filter.as_str()),
                ("zip_code", region_filter.as_str()),
                ("order", "date.asc"),
            ])
            .send()
            .map_err(|e| AppError::new(4, format!("Cost database request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Cost database request failed with status {}.", resp.status()),
            ));
        }

        let rows: Vec<CostRow> = resp
            .json()
            .map_err(|e| AppError::new(4, format!("Failed to parse cost database response: {e}")))?;

        let observations = rows_to_observations(rows)?;
        tracing::info!(series = %key, n = observations.len(), "fetched historical costs");
        Ok(observations)
    }
}

#[derive(Debug, Deserialize)]
struct CostRow {
    date: String,
    average_cost: Option<f64>,
}

fn rows_to_observations(rows: Vec<CostRow>) -> Result<Vec<Observation>, AppError> {
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(cost) = row.average_cost else {
            tracing::warn!(date = %row.date, "skipping row without average_cost");
            continue;
        };
        let date = parse_db_date(&row.date)
            .ok_or_else(|| AppError::new(4, format!("Invalid date '{}' in cost database.", row.date)))?;
        out.push(Observation::new(date, cost));
    }
    Ok(out)
}

/// Accepts `YYYY-MM-DD` and timestamp forms that start with it.
fn parse_db_date(raw: &str) -> Option<NaiveDate> {
    let head = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

fn first_env(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}
