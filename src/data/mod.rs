//! Historical cost data sources.
//!
//! - `source`: the `HistoricalCostSource` seam, CSV-backed source, region fallback
//! - `supabase`: hosted Postgres (PostgREST) client
//! - `sample`: seeded synthetic history for demos and offline runs

pub mod sample;
pub mod source;
pub mod supabase;

pub use sample::{SampleSource, generate_history};
pub use source::{CsvSource, HistoricalCostSource, RegionResolution, parse_region_list, resolve_region};
pub use supabase::SupabaseSource;
