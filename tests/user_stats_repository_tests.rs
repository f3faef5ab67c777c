use std::sync::Arc;

use user_stats_report::{
    codec::{decode_csv, write_csv, ExchangeFormat},
    repositories::{SqliteUserStatsRepository, StoreError, UserStatsRepository},
    services::{ReportService, ReportServiceError},
    test_utils::test_helpers,
};

fn row(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|f| f.to_string()).collect()
}

#[tokio::test]
async fn test_get_all_orders_by_user_id() {
    let pool = test_helpers::create_test_db().await.unwrap();
    test_helpers::insert_test_stats(&pool, 30, "zed", 1, "2024-01-01T00:00:00Z", true)
        .await
        .unwrap();
    test_helpers::insert_test_stats(&pool, 4, "amy", 2, "2024-01-02T00:00:00Z", false)
        .await
        .unwrap();

    let repository = SqliteUserStatsRepository::new(pool);
    let records = repository.get_all().await.unwrap();

    let ids: Vec<i64> = records.iter().map(|r| r.user_id).collect();
    assert_eq!(ids, vec![4, 30]);
}

#[tokio::test]
async fn test_append_rows_accepts_header_and_both_timestamp_layouts() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let repository = SqliteUserStatsRepository::new(pool.clone());

    repository
        .append_rows(&[
            row(&["UserID", "UserName", "LoginCount", "LastLogin", "Active"]),
            row(&["1", "alice", "3", "2024-01-01T00:00:00Z", "true"]),
            row(&["2", "bob", "0", "2024-01-01 08:00:00", "FALSE"]),
        ])
        .await
        .unwrap();

    let records = repository.get_all().await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].last_login_rfc3339(), "2024-01-01T08:00:00Z");
    assert!(!records[1].active);
}

#[tokio::test]
async fn test_append_rows_rejects_malformed_batch_atomically() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let repository = SqliteUserStatsRepository::new(pool.clone());

    let result = repository
        .append_rows(&[
            row(&["1", "alice", "3", "2024-01-01T00:00:00Z", "true"]),
            row(&["2", "bob", "0", "yesterday", "false"]),
        ])
        .await;

    assert!(matches!(result, Err(StoreError::InvalidRow { row: 2, .. })));
    assert_eq!(test_helpers::count_stats(&pool).await.unwrap(), 0);
}

#[tokio::test]
async fn test_append_empty_batch_is_a_no_op() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let repository = SqliteUserStatsRepository::new(pool.clone());

    repository.append_rows(&[]).await.unwrap();
    assert_eq!(test_helpers::count_stats(&pool).await.unwrap(), 0);
}

#[tokio::test]
async fn test_reimporting_the_same_export_reports_duplicates() {
    let pool = test_helpers::create_test_db().await.unwrap();
    test_helpers::insert_test_stats(&pool, 1, "alice", 3, "2024-01-01T00:00:00Z", true)
        .await
        .unwrap();
    let service = ReportService::new(Arc::new(SqliteUserStatsRepository::new(pool.clone())));

    let export = service.export(ExchangeFormat::Csv).await.unwrap();
    let result = service.import(ExchangeFormat::Csv, &export).await;

    assert!(matches!(
        result,
        Err(ReportServiceError::Store(StoreError::Duplicate(1)))
    ));
    assert_eq!(test_helpers::count_stats(&pool).await.unwrap(), 1);
}

#[tokio::test]
async fn test_file_backed_export_round_trip() {
    let (pool, _db_file) = test_helpers::create_test_db_file().await.unwrap();
    test_helpers::insert_test_stats(&pool, 7, "Doe, Jane", 42, "2023-12-31T23:59:59Z", true)
        .await
        .unwrap();

    let repository = SqliteUserStatsRepository::new(pool);
    let records = repository.get_all().await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("user_stats.csv");
    let file = std::fs::File::create(&output_path).unwrap();
    write_csv(&records, file).unwrap();

    let contents = std::fs::read(&output_path).unwrap();
    let rows = decode_csv(&contents).unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows[1],
        row(&["7", "Doe, Jane", "42", "2023-12-31T23:59:59Z", "true"])
    );
}
