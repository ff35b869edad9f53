//! Horizon Trellis: declarative table interaction for Rust.
//!
//! Callers describe search panels and data grids as data (field schemas,
//! layout spans, visibility rules) and this crate interprets that data
//! into live, stateful behavior: query-parameter lifecycle, pagination,
//! sorting, row selection and adaptive search-panel layout. Painting the
//! widgets is out of scope; a rendering layer consumes the derived state
//! and draws whatever it likes.
//!
//! # Components
//!
//! - [`schema`]: field schemas, the closed [`schema::FieldKind`] set and
//!   row identity ([`schema::RowKey`], [`schema::RowKeyExtractor`])
//! - [`query`]: query parameters and the [`query::DataSource`] contract
//! - [`pagination`]: the page-window tracker
//! - [`selection`]: the key-addressed selection registry
//! - [`panel`]: the search-panel layout engine
//! - [`controller`]: the table query controller
//! - [`page`]: the page orchestrator façade
//!
//! # Architecture Overview
//!
//! ```text
//! ┌──────────────────────── TablePage ────────────────────────┐
//! │                                                           │
//! │  SearchPanel     TableController          SelectionModel  │
//! │  (layout)        (fetch lifecycle)        (row identity)  │
//! │      │              │         │                           │
//! │      ▼              ▼         ▼                           │
//! │  FieldSchema    QueryParams  Pagination                   │
//! └─────────────────────│─────────────────────────────────────┘
//!                       ▼
//!                  DataSource (collaborator)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::collections::BTreeMap;
//! use std::sync::Arc;
//!
//! use horizon_trellis::controller::TableController;
//! use horizon_trellis::page::{PageEvent, TablePage};
//! use horizon_trellis::panel::SearchPanel;
//! use horizon_trellis::schema::{FieldSchema, RowKeyExtractor};
//! use horizon_trellis::selection::SelectionModel;
//! use serde_json::{json, Value};
//!
//! # async fn demo(source: Arc<dyn horizon_trellis::query::DataSource<Value>>) -> Result<(), horizon_trellis::controller::ControllerError> {
//! let fields: Vec<FieldSchema<()>> = vec![
//!     FieldSchema::new("name", "Name"),
//!     FieldSchema::new("status", "Status"),
//! ];
//!
//! let page = TablePage::new(
//!     TableController::new(source),
//!     SelectionModel::new(RowKeyExtractor::field("id")),
//!     SearchPanel::new(fields),
//! );
//!
//! page.events.connect(|event| {
//!     if let PageEvent::Search = event {
//!         // reset scroll position, close panels, ...
//!     }
//! });
//!
//! let mut values = BTreeMap::new();
//! values.insert("name".to_string(), json!("ada"));
//! page.handle_search(values).await?;
//! # Ok(())
//! # }
//! ```

pub mod controller;
pub mod page;
pub mod pagination;
pub mod panel;
pub mod prelude;
pub mod query;
pub mod schema;
pub mod selection;

pub use controller::{ControllerError, TableController};
pub use page::{PageEvent, TablePage};
pub use pagination::{PageState, Pagination};
pub use panel::{
    compute_layout, ActionPosition, PanelSlot, SearchPanel, SearchPanelOptions, SearchPanelState,
};
pub use query::{DataSource, DataSourceError, FetchResult, QueryParams, SortOrder, Sorter};
pub use schema::{
    FieldKind, FieldSchema, RowAccess, RowKey, RowKeyExtractor, SelectOption, DEFAULT_FIELD_SPAN,
    GRID_COLUMNS,
};
pub use selection::SelectionModel;
