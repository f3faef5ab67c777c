use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::FromRow;

/// Column names shared by every exchange format, in their fixed order.
pub const COLUMNS: [&str; 5] = ["UserID", "UserName", "LoginCount", "LastLogin", "Active"];

/// Timestamp layout used for the `LastLogin` text cell in spreadsheets.
pub const SHEET_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStats {
    pub user_id: i64,
    pub user_name: String,
    pub login_count: u32,
    pub last_login: DateTime<Utc>,
    pub active: bool,
}

impl UserStats {
    /// RFC 3339 with whole seconds and a `Z` suffix, e.g. `2024-01-01T00:00:00Z`.
    pub fn last_login_rfc3339(&self) -> String {
        self.last_login.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    pub fn last_login_sheet(&self) -> String {
        self.last_login.format(SHEET_TIMESTAMP_FORMAT).to_string()
    }
}

/// Raw `user_stats` row as stored in SQLite.
#[derive(Debug, Clone, FromRow)]
pub struct UserStatsRow {
    pub user_id: i64,
    pub user_name: String,
    pub login_count: i64,
    pub last_login: String,
    pub active: bool,
}
