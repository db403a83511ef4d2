//! Configuration types for filter-calendar.

mod app_config;
mod filter_config;

pub use app_config::AppConfig;
pub use filter_config::{FilterConfig, MatchField, MergeConfig, SummaryMode};
