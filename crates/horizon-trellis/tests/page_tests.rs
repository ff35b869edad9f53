//! Tests for the page orchestrator façade.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use horizon_trellis::controller::TableController;
use horizon_trellis::page::{PageEvent, TablePage};
use horizon_trellis::panel::SearchPanel;
use horizon_trellis::query::{DataSource, DataSourceError, FetchResult, QueryParams};
use horizon_trellis::schema::{FieldSchema, RowKey, RowKeyExtractor};
use horizon_trellis::selection::SelectionModel;
use parking_lot::Mutex;
use serde_json::{json, Value};

struct StaticSource {
    rows: Vec<Value>,
}

impl DataSource<Value> for StaticSource {
    fn fetch(
        &self,
        _params: QueryParams,
    ) -> BoxFuture<'static, Result<FetchResult<Value>, DataSourceError>> {
        let rows = self.rows.clone();
        async move {
            let total = rows.len() as u64;
            Ok(FetchResult {
                data: rows,
                total,
                page: None,
                page_size: None,
            })
        }
        .boxed()
    }
}

struct RejectingSource;

impl DataSource<Value> for RejectingSource {
    fn fetch(
        &self,
        _params: QueryParams,
    ) -> BoxFuture<'static, Result<FetchResult<Value>, DataSourceError>> {
        async {
            Err(DataSourceError::Rejected {
                code: Some(500),
                message: "backend unavailable".into(),
            })
        }
        .boxed()
    }
}

fn page_over(source: Arc<dyn DataSource<Value>>) -> TablePage<Value, ()> {
    let fields: Vec<FieldSchema<()>> = vec![
        FieldSchema::new("name", "Name"),
        FieldSchema::new("status", "Status"),
    ];
    TablePage::new(
        TableController::new(source),
        SelectionModel::new(RowKeyExtractor::field("id")),
        SearchPanel::new(fields),
    )
}

fn sample_rows() -> Vec<Value> {
    (1..=3).map(|n| json!({"id": n})).collect()
}

fn record_events(page: &TablePage<Value, ()>) -> Arc<Mutex<Vec<PageEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let events_clone = events.clone();
    page.events.connect(move |&event| {
        events_clone.lock().push(event);
    });
    events
}

#[tokio::test]
async fn test_search_emits_search_all_others_emit_refresh() {
    let page = page_over(Arc::new(StaticSource { rows: sample_rows() }));
    let events = record_events(&page);

    page.handle_search(BTreeMap::new()).await.unwrap();
    page.handle_refresh().await.unwrap();
    page.handle_reload().await.unwrap();
    page.handle_reset().await.unwrap();

    assert_eq!(
        *events.lock(),
        vec![
            PageEvent::Search,
            PageEvent::Refresh,
            PageEvent::Refresh,
            PageEvent::Refresh,
        ]
    );
}

#[tokio::test]
async fn test_search_clears_selection_refresh_does_not() {
    let page = page_over(Arc::new(StaticSource { rows: sample_rows() }));
    page.handle_refresh().await.unwrap();

    page.selection().select(page.rows());
    assert_eq!(page.selection().len(), 3);

    // Refresh and reload keep the user's selection.
    page.handle_refresh().await.unwrap();
    page.handle_reload().await.unwrap();
    assert_eq!(page.selection().len(), 3);

    // A new search is a new query context.
    page.handle_search(BTreeMap::new()).await.unwrap();
    assert!(page.selection().is_empty());
}

#[tokio::test]
async fn test_reset_clears_selection_and_filter_cache() {
    let page = page_over(Arc::new(StaticSource { rows: sample_rows() }));

    let mut values = BTreeMap::new();
    values.insert("name".to_string(), json!("ada"));
    page.handle_search(values).await.unwrap();
    assert_eq!(page.filter_values().get("name"), Some(&json!("ada")));

    page.selection().select(page.rows());
    page.handle_reset().await.unwrap();

    assert!(page.filter_values().is_empty());
    assert!(page.selection().is_empty());
    assert_eq!(page.controller().params().filter("name"), None);
}

#[tokio::test]
async fn test_failed_intent_emits_no_event() {
    let page = page_over(Arc::new(RejectingSource));
    let events = record_events(&page);

    assert!(page.handle_search(BTreeMap::new()).await.is_err());
    assert!(page.handle_refresh().await.is_err());

    assert!(events.lock().is_empty());
}

#[tokio::test]
async fn test_selection_survives_by_key_across_refetch() {
    let page = page_over(Arc::new(StaticSource { rows: sample_rows() }));
    page.handle_refresh().await.unwrap();

    let first = page.rows().first().cloned().unwrap();
    page.selection().toggle(first);
    assert!(page.selection().is_selected(&RowKey::Int(1)));

    // The registry does not react to the refetch; the key still matches
    // the re-fetched logical row.
    page.handle_refresh().await.unwrap();
    assert!(page.selection().is_selected(&RowKey::Int(1)));
    let refreshed = page.rows().first().cloned().unwrap();
    assert_eq!(page.selection().key_of(&refreshed), RowKey::Int(1));
}

#[tokio::test]
async fn test_panel_state_through_facade() {
    let page = page_over(Arc::new(StaticSource { rows: sample_rows() }));

    let state = page.panel_state(&());
    assert!(!state.expanded);
    assert!(!state.show_expand); // two fields fit one collapsed row
    assert_eq!(state.slots.len(), 3); // two fields + inline action slot

    page.panel().toggle_expanded();
    assert!(page.panel_state(&()).expanded);
}
