//! Saved queries and the theme flag round-tripped through the state file.

use pretty_assertions::assert_eq;
use sql_playground::app::Session;
use sql_playground::config::Config;
use sql_playground::persistence::{
    self, filter_saved_queries, FileStore, KeyValueStore, SavedQuery, SAVED_QUERIES_KEY,
};
use sql_playground::tui::app::{App, Command};

fn file_session(dir: &tempfile::TempDir) -> Session {
    let mut config = Config::default();
    config.execution.latency_ms = 0;
    config.storage.state_file = Some(dir.path().join("state.json"));
    Session::from_config(&config, Some(3)).unwrap()
}

#[tokio::test]
async fn test_saved_query_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let session = file_session(&dir);
        let mut app = App::default();
        app.query.set("SELECT * FROM customers WHERE country = 'UK'");
        assert!(app.begin_save());
        assert!(app.confirm_save("UK customers", "2024-03-01T09:30:00.000Z"));
        session
            .dispatch(&mut app, vec![Command::PersistSavedQueries])
            .await;
    }

    let session = file_session(&dir);
    let mut app = App::default();
    session.restore(&mut app);

    assert_eq!(app.saved_queries.len(), 1);
    assert_eq!(app.saved_queries[0].name, "UK customers");
    assert_eq!(
        app.saved_queries[0].query,
        "SELECT * FROM customers WHERE country = 'UK'"
    );
}

#[tokio::test]
async fn test_theme_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let session = file_session(&dir);
        let mut app = App::default();
        app.toggle_theme();
        session.dispatch(&mut app, vec![Command::PersistTheme]).await;
    }

    let mut app = App::default();
    file_session(&dir).restore(&mut app);
    assert!(app.dark_mode);
}

#[test]
fn test_saved_queries_are_stored_as_json_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let store = FileStore::open(&path).unwrap();
    let queries = vec![
        SavedQuery::new("Stock", "SELECT * FROM products", "2024-01-01T00:00:00.000Z"),
        SavedQuery::new("Orders", "SELECT * FROM orders", "2024-01-02T00:00:00.000Z"),
    ];
    persistence::store_saved_queries(&store, &queries).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw[SAVED_QUERIES_KEY][1]["name"], "Orders");
    assert_eq!(
        store.get(SAVED_QUERIES_KEY).unwrap().unwrap()[0]["query"],
        "SELECT * FROM products"
    );
}

#[test]
fn test_corrupt_state_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "not json at all").unwrap();

    let store = FileStore::open(&path).unwrap();
    assert!(persistence::load_saved_queries(&store).is_empty());
    assert!(!persistence::load_dark_mode(&store));
}

#[test]
fn test_search_matches_name_or_text() {
    let queries = vec![
        SavedQuery::new("Top customers", "SELECT * FROM customers", "t1"),
        SavedQuery::new("Stock check", "SELECT * FROM products", "t2"),
        SavedQuery::new("Revenue", "SELECT SUM(price) FROM orders", "t3"),
    ];

    let names = |term: &str| -> Vec<&str> {
        filter_saved_queries(&queries, term)
            .into_iter()
            .map(|(_, q)| q.name.as_str())
            .collect()
    };

    assert_eq!(names("CUSTOMERS"), vec!["Top customers"]);
    assert_eq!(names("from"), vec!["Top customers", "Stock check", "Revenue"]);
    assert_eq!(names(""), vec!["Top customers", "Stock check", "Revenue"]);
    assert!(names("nothing").is_empty());
}

#[tokio::test]
async fn test_delete_is_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let session = file_session(&dir);
    let mut app = App::default();

    for (name, sql) in [("A", "SELECT * FROM customers"), ("B", "SELECT * FROM orders")] {
        app.query.set(sql);
        app.begin_save();
        app.confirm_save(name, "2024-01-01T00:00:00.000Z");
    }
    assert!(app.delete_saved(0));
    session
        .dispatch(&mut app, vec![Command::PersistSavedQueries])
        .await;

    let mut reloaded = App::default();
    file_session(&dir).restore(&mut reloaded);
    let names: Vec<&str> = reloaded.saved_queries.iter().map(|q| q.name.as_str()).collect();
    assert_eq!(names, vec!["B"]);
}

#[tokio::test]
async fn test_unreadable_saved_entry_does_not_wipe_the_list() {
    let dir = tempfile::tempdir().unwrap();
    let state = serde_json::json!({
        "savedQueries": [
            {"name": "Keep me", "query": "SELECT * FROM products", "timestamp": "2024-02-01T08:00:00.000Z"},
            {"name": "Old entry", "query": "SELECT 1"},
            {"query": "SELECT 2"}
        ]
    });
    std::fs::write(dir.path().join("state.json"), state.to_string()).unwrap();

    {
        let session = file_session(&dir);
        let mut app = App::default();
        session.restore(&mut app);
        app.query.set("SELECT * FROM orders");
        assert!(app.begin_save());
        assert!(app.confirm_save("New", "2024-03-01T09:30:00.000Z"));
        session
            .dispatch(&mut app, vec![Command::PersistSavedQueries])
            .await;
    }

    let mut reloaded = App::default();
    file_session(&dir).restore(&mut reloaded);
    let names: Vec<&str> = reloaded.saved_queries.iter().map(|q| q.name.as_str()).collect();
    assert_eq!(names, vec!["Keep me", "Old entry", "New"]);

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("state.json")).unwrap())
            .unwrap();
    assert_eq!(raw["savedQueries.bak"][2]["query"], "SELECT 2");
}
