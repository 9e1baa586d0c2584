//! Connection and listing integration tests.
//!
//! Tests catalog listing and connection failures against a live server.

use super::{test_database, test_session};
use pgbrowse::app::list_databases;
use pgbrowse::db::PostgresConnector;
use pgbrowse::error::AppError;
use pgbrowse::session::{Credentials, Session};

#[tokio::test]
async fn test_list_databases_skips_templates() {
    let Some(session) = test_session() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let names = list_databases(&PostgresConnector::new(), &session)
        .await
        .unwrap();

    assert!(names.contains(&test_database()));
    assert!(!names.iter().any(|n| n == "template0" || n == "template1"));
}

#[tokio::test]
async fn test_wrong_password_is_connection_error() {
    let Some(session) = test_session() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let mut credentials = session.credentials().unwrap().clone();
    credentials.password = "definitely-not-the-password".to_string();
    let mut wrong = Session::new();
    wrong.capture(credentials);

    let err = list_databases(&PostgresConnector::new(), &wrong)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Connection(_)));
}

#[tokio::test]
async fn test_unreachable_host_is_connection_error() {
    let mut session = Session::new();
    session.capture(Credentials::new("127.0.0.1", "nobody", "", "1"));

    let err = list_databases(&PostgresConnector::new(), &session)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Connection(_)));
}

#[tokio::test]
async fn test_invalid_port_is_connection_error() {
    let mut session = Session::new();
    session.capture(Credentials::new("localhost", "alice", "x", "54x2"));

    let err = list_databases(&PostgresConnector::new(), &session)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        AppError::connection("invalid integer value \"54x2\" for connection option \"port\"")
    );
}
