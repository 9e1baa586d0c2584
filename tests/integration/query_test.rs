//! Query execution integration tests.
//!
//! Tests SQL execution and result conversion against a live server.

use super::{test_database, test_session};
use pgbrowse::app::run_query;
use pgbrowse::db::{PostgresConnector, Value, NO_RESULTS};
use pgbrowse::error::AppError;
use sqlx::{ConnectOptions, Connection, Executor};

#[tokio::test]
async fn test_execute_simple_select() {
    let Some(session) = test_session() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let result = run_query(
        &PostgresConnector::new(),
        &session,
        &test_database(),
        "SELECT 1 AS one, 'hello' AS greeting",
    )
    .await
    .unwrap();

    assert_eq!(result.column_names(), vec!["one", "greeting"]);
    assert_eq!(
        result.rows,
        vec![vec![Value::Int(1), Value::String("hello".to_string())]]
    );
}

#[tokio::test]
async fn test_rows_keep_server_order() {
    let Some(session) = test_session() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let result = run_query(
        &PostgresConnector::new(),
        &session,
        &test_database(),
        "SELECT n, NULL::text AS missing FROM generate_series(3, 1, -1) AS n",
    )
    .await
    .unwrap();

    let firsts: Vec<&Value> = result.rows.iter().map(|r| &r[0]).collect();
    assert_eq!(firsts, vec![&Value::Int(3), &Value::Int(2), &Value::Int(1)]);
    assert!(result.rows.iter().all(|r| r[1] == Value::Null));
}

#[tokio::test]
async fn test_cells_show_server_text() {
    let Some(session) = test_session() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let result = run_query(
        &PostgresConnector::new(),
        &session,
        &test_database(),
        "SELECT 'a0eebc99-9c0b-4ef8-bb6d-6bb9bd380a11'::uuid AS id, \
                16384::oid AS oid, \
                interval '1 day' AS span, \
                ARRAY[1, 2] AS pair, \
                0.1::real AS ratio, \
                12.50::numeric AS price, \
                '10.0.0.1'::inet AS addr, \
                '12:00+02'::timetz AS noon, \
                true AS flag, \
                now() AS stamp, \
                now()::text AS stamp_text",
    )
    .await
    .unwrap();

    let cells: Vec<String> = result.rows[0]
        .iter()
        .map(|v| v.to_display_string())
        .collect();
    assert_eq!(
        &cells[..9],
        &[
            "a0eebc99-9c0b-4ef8-bb6d-6bb9bd380a11",
            "16384",
            "1 day",
            "{1,2}",
            "0.1",
            "12.50",
            "10.0.0.1",
            "12:00:00+02",
            "true",
        ]
    );
    // timestamptz follows the server's TimeZone and DateStyle
    assert_eq!(cells[9], cells[10]);
}

#[tokio::test]
async fn test_oid_column_is_readable() {
    let Some(session) = test_session() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let result = run_query(
        &PostgresConnector::new(),
        &session,
        &test_database(),
        "SELECT oid, datname FROM pg_database WHERE datname = 'template1'",
    )
    .await
    .unwrap();

    assert_eq!(result.columns[0].data_type, "OID");
    let oid = result.rows[0][0].to_display_string();
    assert!(oid.parse::<u32>().is_ok(), "unexpected oid cell {oid:?}");
    assert_eq!(result.rows[0][1], Value::from("template1"));
}

#[tokio::test]
async fn test_changes_are_rolled_back() {
    let Some(session) = test_session() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };
    let database = test_database();
    let options =
        PostgresConnector::connect_options(session.credentials().unwrap(), Some(&database))
            .unwrap();
    let mut setup = options.connect().await.unwrap();
    setup
        .execute("CREATE TABLE IF NOT EXISTS pgbrowse_rollback_check (id int)")
        .await
        .unwrap();
    setup
        .execute("TRUNCATE pgbrowse_rollback_check")
        .await
        .unwrap();

    let inserted = run_query(
        &PostgresConnector::new(),
        &session,
        &database,
        "INSERT INTO pgbrowse_rollback_check VALUES (7) RETURNING id",
    )
    .await
    .unwrap();
    assert_eq!(inserted.rows, vec![vec![Value::Int(7)]]);

    let counted = run_query(
        &PostgresConnector::new(),
        &session,
        &database,
        "SELECT count(*) FROM pgbrowse_rollback_check",
    )
    .await
    .unwrap();
    assert_eq!(counted.rows, vec![vec![Value::Int(0)]]);

    setup
        .execute("DROP TABLE pgbrowse_rollback_check")
        .await
        .unwrap();
    setup.close().await.unwrap();
}

#[tokio::test]
async fn test_invalid_sql_is_statement_error() {
    let Some(session) = test_session() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let err = run_query(
        &PostgresConnector::new(),
        &session,
        &test_database(),
        "SELEC 1",
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::Statement(_)));
    assert!(err.detail().contains("syntax error"));
}

#[tokio::test]
async fn test_statement_without_result_set() {
    let Some(session) = test_session() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let err = run_query(
        &PostgresConnector::new(),
        &session,
        &test_database(),
        "CREATE TEMPORARY TABLE pgbrowse_scratch (id int)",
    )
    .await
    .unwrap_err();

    assert_eq!(err, AppError::statement(NO_RESULTS));
}

#[tokio::test]
async fn test_unknown_database_is_connection_error() {
    let Some(session) = test_session() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let err = run_query(
        &PostgresConnector::new(),
        &session,
        "pgbrowse_no_such_database",
        "SELECT 1",
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::Connection(_)));
}
