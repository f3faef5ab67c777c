pub mod test_helpers {
    use crate::repositories::{SqliteUserStatsRepository, UserStatsRepository};
    use crate::AppState;
    use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
    use std::sync::Arc;
    use tempfile::NamedTempFile;

    /// Create a new in-memory SQLite database for testing
    pub async fn create_test_db() -> Result<SqlitePool, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await?;

        // Run migrations
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(pool)
    }

    /// Create a temporary file-based SQLite database for testing
    pub async fn create_test_db_file() -> Result<(SqlitePool, NamedTempFile), sqlx::Error> {
        let temp_file = NamedTempFile::new().map_err(sqlx::Error::Io)?;
        let db_path = temp_file
            .path()
            .to_str()
            .ok_or_else(|| sqlx::Error::Configuration("Invalid database path".into()))?;
        let database_url = format!("sqlite://{}", db_path);

        let pool = crate::db::connect_and_migrate(&database_url).await?;

        Ok((pool, temp_file))
    }

    /// App state backed by the given pool
    pub fn create_test_state(pool: SqlitePool) -> AppState {
        let repository: Arc<dyn UserStatsRepository> =
            Arc::new(SqliteUserStatsRepository::new(pool));
        AppState::new(repository)
    }

    /// Insert a user stats row directly, bypassing the repository
    pub async fn insert_test_stats(
        pool: &SqlitePool,
        user_id: i64,
        user_name: &str,
        login_count: i64,
        last_login: &str,
        active: bool,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO user_stats (user_id, user_name, login_count, last_login, active)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(user_name)
        .bind(login_count)
        .bind(last_login)
        .bind(active)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Count stored user stats rows
    pub async fn count_stats(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM user_stats")
            .fetch_one(pool)
            .await
    }

    /// Build a multipart/form-data body with a single file field
    pub fn multipart_body(field: &str, file_name: &str, contents: &[u8]) -> (String, Vec<u8>) {
        let boundary = "----user-stats-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                field, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(contents);
        body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

        (format!("multipart/form-data; boundary={}", boundary), body)
    }
}

// Re-export commonly used test functions at module level for convenience
// Note: This is test-only code. Panic on error is acceptable in tests.
#[cfg(test)]
pub async fn create_test_pool() -> sqlx::SqlitePool {
    match test_helpers::create_test_db().await {
        Ok(pool) => pool,
        Err(e) => panic!("Failed to create test pool: {}", e),
    }
}
