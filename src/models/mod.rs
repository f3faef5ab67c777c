pub mod user_stats;

pub use user_stats::{UserStats, UserStatsRow, COLUMNS, SHEET_TIMESTAMP_FORMAT};
