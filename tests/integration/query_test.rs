//! Execution, classification and pagination through the public API.

use pretty_assertions::assert_eq;
use sql_playground::app::Session;
use sql_playground::catalog::{predefined, PREDEFINED_QUERIES};
use sql_playground::db::{classify, DatasetShape, MOCK_ROW_COUNT};
use sql_playground::tui::app::{App, Command, PendingExecution};
use std::time::{Duration, Instant};

fn session() -> Session {
    Session::in_memory(Duration::ZERO, Some(11))
}

fn execute(query: &str) -> Vec<Command> {
    vec![Command::Execute(PendingExecution {
        query: query.to_string(),
    })]
}

#[test]
fn test_predefined_queries_classify() {
    let shapes: Vec<DatasetShape> = PREDEFINED_QUERIES.iter().map(|q| classify(q.sql)).collect();
    assert_eq!(
        shapes,
        vec![
            DatasetShape::Customers,
            DatasetShape::Orders,
            DatasetShape::Products,
            DatasetShape::Customers,
            DatasetShape::Products,
        ]
    );
}

#[tokio::test]
async fn test_every_result_has_twenty_five_rows() {
    let session = session();
    for query in PREDEFINED_QUERIES.iter().map(|q| q.sql).chain(["UPDATE x SET y = 1"]) {
        let result = session.executor().execute(query).await.unwrap();
        assert_eq!(result.row_count(), MOCK_ROW_COUNT, "{query}");
        assert!(result.is_well_formed(), "{query}");
    }
}

#[tokio::test]
async fn test_latency_is_applied() {
    let session = Session::in_memory(Duration::from_millis(50), Some(1));
    let started = Instant::now();
    session.executor().execute("SELECT 1").await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(50));
}

#[tokio::test]
async fn test_new_result_resets_to_first_page() {
    let session = session();
    let mut app = App::default();

    session.dispatch(&mut app, execute("SELECT * FROM customers")).await;
    assert!(app.next_page());
    assert!(app.next_page());
    assert_eq!(app.current_view().unwrap().current_page, 3);

    session.dispatch(&mut app, execute("SELECT * FROM products")).await;
    let view = app.current_view().unwrap();
    assert_eq!(view.current_page, 1);
    assert_eq!(view.status_line(), "Page 1 of 3 (showing 10 of 25 items)");
}

#[tokio::test]
async fn test_last_page_holds_remainder() {
    let session = session();
    let mut app = App::default();
    session.dispatch(&mut app, execute("SELECT * FROM orders")).await;

    app.next_page();
    app.next_page();
    assert!(!app.next_page());
    let view = app.current_view().unwrap();
    assert_eq!(view.rows.len(), 5);
    assert!(!view.has_next());
}

#[tokio::test]
async fn test_history_keeps_ten_most_recent() {
    let session = session();
    let mut app = App::default();
    for i in 1..=11 {
        session
            .dispatch(&mut app, execute(&format!("SELECT {i} FROM customers")))
            .await;
    }

    let queries: Vec<&str> = app.history.iter().map(|e| e.query.as_str()).collect();
    assert_eq!(queries.len(), 10);
    assert_eq!(queries.first(), Some(&"SELECT 11 FROM customers"));
    assert_eq!(queries.last(), Some(&"SELECT 2 FROM customers"));
}

#[tokio::test]
async fn test_predefined_selection_executes_its_text() {
    let session = session();
    let mut app = App::default();
    let pending = app.select_predefined(1).unwrap();
    session.dispatch(&mut app, vec![Command::Execute(pending)]).await;

    let expected = predefined(1).unwrap().sql;
    assert_eq!(app.query.text, expected);
    assert_eq!(app.history.get(0).unwrap().query, expected);
    assert_eq!(
        app.result.as_ref().unwrap().columns.first().map(String::as_str),
        Some("order_id")
    );
}
