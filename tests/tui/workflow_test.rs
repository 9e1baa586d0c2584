//! Full workflow tests: connect, list, open a query dialog, execute.

use super::common::{scenario_server, Harness};
use crossterm::event::{KeyCode, MouseButton};
use pgbrowse::db::{ExecutedStatement, Value};
use pgbrowse::tui::ui;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_scenario_list_then_query_metrics() {
    let server = scenario_server();
    let mut h = Harness::new(server.clone());

    h.connect("alice", "x").await;
    assert_eq!(h.app.databases, vec!["app", "metrics"]);
    assert!(h.screen_contains("▸ app"));
    assert!(h.screen_contains("  metrics"));
    assert!(!h.screen_contains("template"));
    assert!(h.screen_contains("[alice@localhost:5432]"));

    // Select "metrics", open its menu and choose New Query
    h.key(KeyCode::Down).await;
    h.key(KeyCode::Enter).await;
    assert!(h.screen_contains("New Query"));
    h.key(KeyCode::Enter).await;
    assert!(h.screen_contains("New Query - metrics"));

    h.type_text("SELECT 1 AS one").await;
    h.key(KeyCode::F(5)).await;

    let dialog = h.app.active_dialog().unwrap();
    let result = dialog.result.as_ref().unwrap();
    assert_eq!(result.column_names(), vec!["one"]);
    assert_eq!(result.rows, vec![vec![Value::Int(1)]]);
    assert!(h.screen_contains("1 row"));
    assert!(h.app.error.is_none());

    assert_eq!(
        server.executed(),
        vec![ExecutedStatement {
            database: Some("metrics".to_string()),
            sql: "SELECT 1 AS one".to_string(),
        }]
    );
    assert_eq!(server.open_connections(), 0);
}

#[tokio::test]
async fn test_invalid_credentials_leave_list_unchanged() {
    let mut h = Harness::new(scenario_server());
    h.connect("alice", "x").await;

    h.connect("alice", "wrong").await;

    assert_eq!(h.app.databases, vec!["app", "metrics"]);
    assert_eq!(
        h.app.error.as_ref().unwrap().message,
        "Error connecting to the database:\npassword authentication failed for user \"alice\""
    );
    assert!(h.screen_contains("Error connecting to the database:"));
    assert!(h.screen_contains("[ OK ]"));

    // Dismissing the error returns to a usable main screen
    h.key(KeyCode::Enter).await;
    assert!(h.app.error.is_none());
    h.key(KeyCode::Down).await;
    assert_eq!(h.app.selected, Some(1));
}

#[tokio::test]
async fn test_bad_port_reports_driver_message() {
    let mut h = Harness::new(scenario_server());

    h.key(KeyCode::Char('c')).await;
    h.key(KeyCode::BackTab).await;
    h.type_text("x").await;
    h.key(KeyCode::Enter).await;

    assert_eq!(
        h.app.error.as_ref().unwrap().message,
        "Error connecting to the database:\ninvalid integer value \"5432x\" for connection option \"port\""
    );
    assert!(h.app.databases.is_empty());
}

#[tokio::test]
async fn test_invalid_statement_leaves_table_unchanged() {
    let server = scenario_server();
    let mut h = Harness::new(server.clone());
    h.connect("alice", "x").await;
    h.key(KeyCode::Enter).await;
    h.key(KeyCode::Enter).await;

    h.type_text("SELECT 1 AS one").await;
    h.key(KeyCode::F(5)).await;
    let before = h.app.active_dialog().unwrap().result.clone();
    assert!(before.is_some());

    for _ in 0.."SELECT 1 AS one".len() {
        h.key(KeyCode::Backspace).await;
    }
    h.type_text("SELEC oops").await;
    h.key(KeyCode::F(5)).await;

    assert_eq!(h.app.active_dialog().unwrap().result, before);
    assert_eq!(
        h.app.error.as_ref().unwrap().message,
        "Error executing query:\nsyntax error at or near \"SELEC\""
    );
    assert_eq!(server.executed().len(), 2);
}

#[tokio::test]
async fn test_whitespace_statement_fails_on_server() {
    let server = scenario_server();
    let mut h = Harness::new(server.clone());
    h.connect("alice", "x").await;
    h.key(KeyCode::Enter).await;
    h.key(KeyCode::Enter).await;

    h.type_text("   ").await;
    h.key(KeyCode::Enter).await;
    h.key(KeyCode::F(5)).await;

    assert_eq!(
        h.app.error.as_ref().unwrap().message,
        "Error executing query:\nno results to fetch"
    );
    assert_eq!(server.executed()[0].sql, "");
}

#[tokio::test]
async fn test_two_dialogs_use_their_own_database() {
    let server = scenario_server();
    let mut h = Harness::new(server.clone());
    h.connect("alice", "x").await;
    let list = ui::main_layout(h.app.screen).list_inner;

    // Right-click "app" and pick New Query with the mouse
    h.click(MouseButton::Right, list.x + 2, list.y).await;
    let menu = h.app.context_menu.clone().unwrap();
    assert_eq!(menu.database, "app");
    let item = ui::menu_inner(ui::menu_rect(menu.anchor, h.app.screen));
    h.click(MouseButton::Left, item.x + 1, item.y).await;
    let first = h.app.active_dialog.unwrap();
    h.type_text("SELECT current_user").await;

    // Back to the main screen, then a dialog for "metrics"
    h.key(KeyCode::F(6)).await;
    assert!(h.app.active_dialog.is_none());
    h.click(MouseButton::Right, list.x + 2, list.y + 1).await;
    let menu = h.app.context_menu.clone().unwrap();
    let item = ui::menu_inner(ui::menu_rect(menu.anchor, h.app.screen));
    h.click(MouseButton::Left, item.x + 1, item.y).await;
    let second = h.app.active_dialog.unwrap();
    assert_ne!(first, second);
    assert!(h.screen_contains("New Query - metrics"));

    // The canned answer only exists in "app"
    h.type_text("SELECT current_user").await;
    let button = ui::query_layout(h.app.screen).execute_button;
    h.click(MouseButton::Left, button.x + 1, button.y).await;
    assert!(h.app.error.is_some());
    h.key(KeyCode::Enter).await;

    // Cycle: metrics -> main -> app
    h.key(KeyCode::F(6)).await;
    h.key(KeyCode::F(6)).await;
    assert_eq!(h.app.active_dialog, Some(first));
    h.key(KeyCode::F(5)).await;

    let app_result = h.app.dialog(first).unwrap().result.clone().unwrap();
    assert_eq!(app_result.rows, vec![vec![Value::from("alice")]]);
    assert!(h.app.dialog(second).unwrap().result.is_none());

    let databases: Vec<Option<String>> =
        server.executed().into_iter().map(|s| s.database).collect();
    assert_eq!(
        databases,
        vec![Some("metrics".to_string()), Some("app".to_string())]
    );
}

#[tokio::test]
async fn test_right_click_on_empty_list_shows_error() {
    let mut h = Harness::new(scenario_server());
    let list = ui::main_layout(h.app.screen).list_inner;

    h.click(MouseButton::Right, list.x + 2, list.y).await;

    assert!(h.app.context_menu.is_none());
    assert!(h.screen_contains("Error handling right-click:"));
}

#[tokio::test]
async fn test_refresh_picks_up_new_session_only_after_submit() {
    let server = scenario_server();
    let mut h = Harness::new(server);

    h.key(KeyCode::Char('r')).await;
    assert_eq!(
        h.app.error.as_ref().unwrap().message,
        "Error connecting to the database:\nno connection credentials have been entered"
    );
    h.key(KeyCode::Esc).await;

    h.connect("alice", "x").await;
    h.key(KeyCode::Char('r')).await;
    assert_eq!(h.app.databases, vec!["app", "metrics"]);
}

#[tokio::test]
async fn test_escape_closes_credentials_without_touching_session() {
    let mut h = Harness::new(scenario_server());
    h.connect("alice", "x").await;

    h.key(KeyCode::Char('c')).await;
    h.type_text("elsewhere").await;
    h.key(KeyCode::Esc).await;

    assert!(h.app.credentials_form.is_none());
    assert_eq!(
        h.controller.session().credentials().unwrap().host,
        "localhost"
    );
}
