use std::collections::HashSet;

use crate::codec::RawRow;
use crate::models::{UserStats, UserStatsRow, COLUMNS, SHEET_TIMESTAMP_FORMAT};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use sqlx::SqlitePool;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },
    #[error("User {0} already exists")]
    Duplicate(i64),
    #[error("Stored record for user {user_id} is unreadable: {reason}")]
    Corrupt { user_id: i64, reason: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait UserStatsRepository: Send + Sync {
    /// All records, ordered by user id.
    async fn get_all(&self) -> StoreResult<Vec<UserStats>>;

    /// Interpret and store a batch of raw rows. Either every row is stored or
    /// none is.
    async fn append_rows(&self, rows: &[RawRow]) -> StoreResult<()>;
}

pub struct SqliteUserStatsRepository {
    pool: SqlitePool,
}

impl SqliteUserStatsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStatsRepository for SqliteUserStatsRepository {
    async fn get_all(&self) -> StoreResult<Vec<UserStats>> {
        let rows = sqlx::query_as::<_, UserStatsRow>(
            r#"
            SELECT user_id, user_name, login_count, last_login, active
            FROM user_stats
            ORDER BY user_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(UserStats::try_from).collect()
    }

    async fn append_rows(&self, rows: &[RawRow]) -> StoreResult<()> {
        let records = parse_rows(rows)?;

        // Dropping the transaction without commit rolls every insert back.
        let mut tx = self.pool.begin().await?;

        for record in &records {
            let result = sqlx::query(
                r#"
                INSERT INTO user_stats (user_id, user_name, login_count, last_login, active)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(record.user_id)
            .bind(record.user_name.as_str())
            .bind(i64::from(record.login_count))
            .bind(record.last_login_rfc3339())
            .bind(record.active)
            .execute(&mut *tx)
            .await;

            if let Err(e) = result {
                if e.to_string().contains("UNIQUE") {
                    return Err(StoreError::Duplicate(record.user_id));
                }
                return Err(StoreError::Database(e));
            }
        }

        tx.commit().await?;

        tracing::debug!("Appended {} user stats records", records.len());
        Ok(())
    }
}

impl TryFrom<UserStatsRow> for UserStats {
    type Error = StoreError;

    fn try_from(row: UserStatsRow) -> Result<Self, Self::Error> {
        let corrupt = |reason: String| StoreError::Corrupt {
            user_id: row.user_id,
            reason,
        };

        let login_count = u32::try_from(row.login_count)
            .map_err(|_| corrupt(format!("login count {} out of range", row.login_count)))?;
        let last_login = parse_timestamp(&row.last_login)
            .ok_or_else(|| corrupt(format!("bad timestamp {:?}", row.last_login)))?;

        Ok(UserStats {
            user_id: row.user_id,
            user_name: row.user_name,
            login_count,
            last_login,
            active: row.active,
        })
    }
}

/// Turn raw rows into records.
///
/// A leading row equal to the column header is skipped. Row numbers in errors
/// are 1-based positions in the input, header included.
pub fn parse_rows(rows: &[RawRow]) -> StoreResult<Vec<UserStats>> {
    let skip = usize::from(rows.first().is_some_and(|row| is_header(row)));

    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(rows.len().saturating_sub(skip));

    for (index, row) in rows.iter().enumerate().skip(skip) {
        let record = parse_row(index + 1, row)?;
        if !seen.insert(record.user_id) {
            return Err(StoreError::Duplicate(record.user_id));
        }
        records.push(record);
    }

    Ok(records)
}

fn is_header(row: &RawRow) -> bool {
    row.len() == COLUMNS.len() && row.iter().zip(COLUMNS).all(|(field, name)| field == name)
}

fn parse_row(row_number: usize, row: &RawRow) -> StoreResult<UserStats> {
    let invalid = |reason: String| StoreError::InvalidRow {
        row: row_number,
        reason,
    };

    if row.len() != COLUMNS.len() {
        return Err(invalid(format!(
            "expected {} fields, found {}",
            COLUMNS.len(),
            row.len()
        )));
    }

    let user_id = row[0]
        .trim()
        .parse::<i64>()
        .map_err(|_| invalid(format!("UserID {:?} is not an integer", row[0])))?;
    let user_name = row[1].clone();
    let login_count = row[2]
        .trim()
        .parse::<u32>()
        .map_err(|_| invalid(format!("LoginCount {:?} is not a non-negative integer", row[2])))?;
    let last_login = parse_timestamp(row[3].trim())
        .ok_or_else(|| invalid(format!("LastLogin {:?} is not a timestamp", row[3])))?;
    // Timestamps are kept to the second.
    if last_login.nanosecond() != 0 {
        return Err(invalid(format!(
            "LastLogin {:?} has fractional seconds",
            row[3]
        )));
    }
    let active = parse_bool(row[4].trim())
        .ok_or_else(|| invalid(format!("Active {:?} is not a boolean", row[4])))?;

    Ok(UserStats {
        user_id,
        user_name,
        login_count,
        last_login,
        active,
    })
}

/// Accepts RFC 3339 or the spreadsheet layout (`YYYY-MM-DD HH:MM:SS`, UTC).
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, SHEET_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
