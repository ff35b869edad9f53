//! Table query controller.
//!
//! [`TableController`] owns the query parameters of one table view and
//! drives the fetch lifecycle against a [`DataSource`]. Four caller-facing
//! operations funnel into one fetch primitive, differing only in how they
//! reset state first:
//!
//! | operation   | filters            | page        |
//! |-------------|--------------------|-------------|
//! | `search`    | replaced wholesale | reset to 1  |
//! | `refresh`   | kept               | kept        |
//! | `reload`    | kept               | reset to 1  |
//! | `reset`     | back to defaults   | reset to 1  |
//!
//! Each successful fetch replaces the row set wholesale and feeds the
//! total (and any echoed page window, which is authoritative) back into
//! the pagination tracker. A failed fetch leaves rows and page state at
//! their prior values and surfaces the error to the caller; it is not
//! retried.
//!
//! # Concurrency
//!
//! The controller is single-threaded and cooperative. Overlapping fetches
//! are not cancelled: rapid repeated operations race, and the response
//! that resolves last wins, regardless of request order. Whether that
//! trade of simplicity against ordering is worth revisiting is left to
//! callers; sequencing can be layered on top of the data source. What the
//! controller does guard is teardown: after [`TableController::dispose`],
//! late responses are dropped instead of written into a dead view.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use horizon_trellis_core::{LoadingGuard, Signal};
use parking_lot::RwLock;
use serde_json::Value;

use crate::pagination::{PageState, Pagination};
use crate::query::{DataSource, DataSourceError, FetchResult, QueryParams, SortOrder, Sorter};

/// Errors surfaced by controller operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ControllerError {
    /// The data source failed; rows and page state were left untouched.
    #[error("fetch failed: {0}")]
    Fetch(#[from] DataSourceError),
}

/// Drives the query lifecycle of one table view.
///
/// Created once per view and disposed with it; see
/// [`dispose`](Self::dispose).
pub struct TableController<T> {
    source: Arc<dyn DataSource<T>>,
    /// The initial parameter set `reset()` returns to.
    defaults: QueryParams,
    /// Live filters and sorter; the page window lives in `pagination`.
    params: RwLock<QueryParams>,
    rows: RwLock<Vec<T>>,
    pagination: Pagination,
    loading: LoadingGuard,
    alive: AtomicBool,
    /// Emitted with the new row count after each successful fetch.
    pub rows_changed: Signal<usize>,
    /// Emitted with the error text when a fetch fails.
    pub load_failed: Signal<String>,
}

impl<T: Clone + Send + Sync + 'static> TableController<T> {
    /// Create a controller over a data source with default parameters
    /// (page 1, 10 rows per page, no filters, no sorter).
    pub fn new(source: Arc<dyn DataSource<T>>) -> Self {
        Self::with_defaults(source, QueryParams::default())
    }

    /// Create a controller with an explicit default parameter set.
    pub fn with_defaults(source: Arc<dyn DataSource<T>>, defaults: QueryParams) -> Self {
        let pagination = Pagination::new(defaults.page_size);
        Self {
            source,
            params: RwLock::new(defaults.clone()),
            defaults,
            rows: RwLock::new(Vec::new()),
            pagination,
            loading: LoadingGuard::new(),
            alive: AtomicBool::new(true),
            rows_changed: Signal::new(),
            load_failed: Signal::new(),
        }
    }

    /// Defer the busy flag by `delay` to avoid loading flicker on fast
    /// responses.
    pub fn with_loading_delay(mut self, delay: Duration) -> Self {
        self.loading = LoadingGuard::with_delay(delay);
        self
    }

    // =========================================================================
    // State access
    // =========================================================================

    /// The current rows. Replaced wholesale on each successful fetch,
    /// never patched incrementally.
    pub fn rows(&self) -> Vec<T> {
        self.rows.read().clone()
    }

    /// Number of rows currently held.
    pub fn row_count(&self) -> usize {
        self.rows.read().len()
    }

    /// The pagination tracker.
    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// A snapshot of the page window.
    pub fn page_state(&self) -> PageState {
        self.pagination.snapshot()
    }

    /// The loading guard; observe `busy_changed` for spinner state.
    pub fn loading(&self) -> &LoadingGuard {
        &self.loading
    }

    /// A copy of the parameters the next fetch would use.
    pub fn params(&self) -> QueryParams {
        self.compose_params()
    }

    /// Whether the controller has not been disposed.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Replace the filter keys with `values`, reset to page 1, fetch.
    pub async fn search(&self, values: BTreeMap<String, Value>) -> Result<(), ControllerError> {
        self.params.write().set_filters(values);
        self.pagination.set_page(1);
        self.load_data().await
    }

    /// Fetch with the current parameters unchanged: same page, same
    /// filters. Use after an edit that should not disturb the user's
    /// position.
    pub async fn refresh(&self) -> Result<(), ControllerError> {
        self.load_data().await
    }

    /// Keep the filters, reset to page 1, fetch. Use when the data set
    /// beneath the current filters may have shifted.
    pub async fn reload(&self) -> Result<(), ControllerError> {
        self.pagination.set_page(1);
        self.load_data().await
    }

    /// Clear everything back to the initial default parameter set (page 1,
    /// default page size, default filters and sorter), then fetch.
    pub async fn reset(&self) -> Result<(), ControllerError> {
        self.params.write().reset_to(&self.defaults);
        self.pagination.set_page_size(self.defaults.page_size);
        self.pagination.set_page(1);
        self.load_data().await
    }

    /// Move to a page; fetches only when the tracker reports an effective
    /// change (out-of-range pages clamp and may end up as no-ops).
    pub async fn set_page(&self, page: u64) -> Result<(), ControllerError> {
        if self.pagination.set_page(page) {
            self.load_data().await
        } else {
            Ok(())
        }
    }

    /// Change the page size; fetches only on effective change.
    pub async fn set_page_size(&self, page_size: u64) -> Result<(), ControllerError> {
        if self.pagination.set_page_size(page_size) {
            self.load_data().await
        } else {
            Ok(())
        }
    }

    /// Set or clear the sorter. `None` clears the sort entirely. Does not
    /// fetch by itself; combine with [`reload`](Self::reload).
    pub fn update_sorter(&self, field: impl Into<String>, order: Option<SortOrder>) {
        self.params.write().sorter = order.map(|order| Sorter {
            field: field.into(),
            order,
        });
    }

    /// Tear the controller down: cancel the loading-delay timer and turn
    /// all further operations (and any in-flight response application)
    /// into silent no-ops.
    pub fn dispose(&self) {
        self.alive.store(false, Ordering::SeqCst);
        self.loading.stop();
    }

    // =========================================================================
    // Fetch primitive
    // =========================================================================

    /// The single fetch primitive behind every operation.
    ///
    /// Overlapping calls are not sequenced; the last response to resolve
    /// wins (see module docs). Disposed controllers neither fetch nor
    /// apply.
    pub async fn load_data(&self) -> Result<(), ControllerError> {
        if !self.is_alive() {
            return Ok(());
        }

        let params = self.compose_params();
        tracing::debug!(
            target: "horizon_trellis::controller",
            page = params.page,
            page_size = params.page_size,
            filters = params.filters.len(),
            "loading table data"
        );

        match self.loading.run(self.source.fetch(params)).await {
            Ok(result) => {
                if self.is_alive() {
                    self.apply_response(result);
                }
                Ok(())
            }
            Err(err) => {
                tracing::warn!(
                    target: "horizon_trellis::controller",
                    error = %err,
                    "table fetch failed; keeping previous rows"
                );
                self.load_failed.emit(err.to_string());
                Err(ControllerError::Fetch(err))
            }
        }
    }

    /// Compose filters and sorter with the tracker's page window.
    fn compose_params(&self) -> QueryParams {
        let mut params = self.params.read().clone();
        params.page = self.pagination.current();
        params.page_size = self.pagination.page_size();
        params
    }

    /// Apply a successful response: echoed page window first (it is
    /// authoritative), then total, then the rows.
    fn apply_response(&self, result: FetchResult<T>) {
        if let Some(page_size) = result.page_size {
            self.pagination.set_page_size(page_size);
        }
        self.pagination.set_total(result.total);
        if let Some(page) = result.page {
            self.pagination.set_page(page);
        }

        let count = result.data.len();
        *self.rows.write() = result.data;
        self.rows_changed.emit(count);
    }
}

impl<T> std::fmt::Debug for TableController<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableController")
            .field("rows", &self.rows.read().len())
            .field("pagination", &self.pagination)
            .field("alive", &self.alive.load(Ordering::SeqCst))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::FutureExt;
    use serde_json::json;

    use futures_util::future::BoxFuture;

    /// A source serving `total` numbered rows, one page at a time.
    struct NumberedSource {
        total: u64,
    }

    impl DataSource<Value> for NumberedSource {
        fn fetch(
            &self,
            params: QueryParams,
        ) -> BoxFuture<'static, Result<FetchResult<Value>, DataSourceError>> {
            let total = self.total;
            async move {
                let start = (params.page - 1) * params.page_size;
                let end = (start + params.page_size).min(total);
                let data: Vec<Value> = (start..end).map(|n| json!({"id": n})).collect();
                Ok(FetchResult {
                    data,
                    total,
                    page: None,
                    page_size: None,
                })
            }
            .boxed()
        }
    }

    fn numbered_source(total: u64) -> Arc<dyn DataSource<Value>> {
        Arc::new(NumberedSource { total })
    }

    /// A source that always rejects.
    struct FailingSource;

    impl DataSource<Value> for FailingSource {
        fn fetch(
            &self,
            _params: QueryParams,
        ) -> BoxFuture<'static, Result<FetchResult<Value>, DataSourceError>> {
            async { Err(DataSourceError::Transport("connection refused".into())) }.boxed()
        }
    }

    fn failing_source() -> Arc<dyn DataSource<Value>> {
        Arc::new(FailingSource)
    }

    /// A source that records whether it was ever called.
    struct CountingSource {
        fetched: Arc<AtomicBool>,
    }

    impl DataSource<Value> for CountingSource {
        fn fetch(
            &self,
            _params: QueryParams,
        ) -> BoxFuture<'static, Result<FetchResult<Value>, DataSourceError>> {
            self.fetched.store(true, Ordering::SeqCst);
            async { Ok(FetchResult::empty()) }.boxed()
        }
    }

    #[tokio::test]
    async fn test_search_resets_page_and_applies_filters() {
        let controller = TableController::new(numbered_source(57));
        controller.refresh().await.unwrap();
        controller.set_page(3).await.unwrap();
        assert_eq!(controller.page_state().current, 3);

        let mut filters = BTreeMap::new();
        filters.insert("q".to_string(), json!("x"));
        controller.search(filters).await.unwrap();

        assert_eq!(controller.page_state().current, 1);
        assert_eq!(controller.params().filter("q"), Some(&json!("x")));
    }

    #[tokio::test]
    async fn test_refresh_preserves_page() {
        let controller = TableController::new(numbered_source(57));
        controller.refresh().await.unwrap();
        controller.set_page(3).await.unwrap();

        controller.refresh().await.unwrap();
        assert_eq!(controller.page_state().current, 3);
    }

    #[tokio::test]
    async fn test_reset_clears_filters() {
        let controller = TableController::new(numbered_source(57));
        let mut filters = BTreeMap::new();
        filters.insert("q".to_string(), json!("x"));
        controller.search(filters).await.unwrap();
        controller.update_sorter("name", Some(SortOrder::Ascend));

        controller.reset().await.unwrap();

        let params = controller.params();
        assert_eq!(params.filter("q"), None);
        assert_eq!(params.sorter, None);
        assert_eq!(controller.page_state().current, 1);
    }

    #[tokio::test]
    async fn test_fetch_updates_rows_and_total() {
        let controller = TableController::new(numbered_source(57));
        controller.refresh().await.unwrap();

        assert_eq!(controller.row_count(), 10);
        assert_eq!(controller.page_state().total, 57);
        assert_eq!(controller.pagination().total_pages(), 6);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_rows() {
        let controller = TableController::new(numbered_source(20));
        controller.refresh().await.unwrap();
        assert_eq!(controller.row_count(), 10);

        let failing = TableController::<Value>::new(failing_source());
        assert!(failing.refresh().await.is_err());
        assert_eq!(failing.row_count(), 0);
        assert_eq!(failing.page_state().total, 0);
        assert!(!failing.loading().busy());
    }

    #[tokio::test]
    async fn test_update_sorter_does_not_fetch() {
        let fetches = Arc::new(AtomicBool::new(false));
        let source: Arc<dyn DataSource<Value>> = Arc::new(CountingSource {
            fetched: fetches.clone(),
        });

        let controller = TableController::new(source);
        controller.update_sorter("name", Some(SortOrder::Descend));
        assert!(!fetches.load(Ordering::SeqCst));

        let params = controller.params();
        assert_eq!(
            params.sorter,
            Some(Sorter {
                field: "name".into(),
                order: SortOrder::Descend
            })
        );

        controller.update_sorter("name", None);
        assert_eq!(controller.params().sorter, None);
    }

    #[tokio::test]
    async fn test_disposed_controller_is_inert() {
        let fetched = Arc::new(AtomicBool::new(false));
        let source: Arc<dyn DataSource<Value>> = Arc::new(CountingSource {
            fetched: fetched.clone(),
        });

        let controller = TableController::new(source);
        controller.dispose();

        assert!(controller.refresh().await.is_ok());
        assert!(!fetched.load(Ordering::SeqCst));
    }

    /// A source that echoes a fixed page window back.
    struct EchoSource;

    impl DataSource<Value> for EchoSource {
        fn fetch(
            &self,
            _params: QueryParams,
        ) -> BoxFuture<'static, Result<FetchResult<Value>, DataSourceError>> {
            async {
                Ok(FetchResult {
                    data: vec![json!({"id": 1})],
                    total: 40,
                    page: Some(2),
                    page_size: Some(20),
                })
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn test_response_echo_is_authoritative() {
        let controller = TableController::new(Arc::new(EchoSource) as Arc<dyn DataSource<Value>>);
        controller.refresh().await.unwrap();

        let state = controller.page_state();
        assert_eq!(state.page_size, 20);
        assert_eq!(state.current, 2);
        assert_eq!(state.total, 40);
    }
}
