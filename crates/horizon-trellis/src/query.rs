//! Query parameters and the data-source contract.
//!
//! [`QueryParams`] owns everything one fetch is parameterized by: the page
//! window, the optional sorter, and the caller-defined filter keys. The
//! controller composes them into a single request mapping via
//! [`QueryParams::merged`] and hands that to a [`DataSource`].
//!
//! The data source is a collaborator, not part of this layer: anything that
//! can asynchronously turn parameters into `{ data, total }` qualifies: an
//! HTTP endpoint, a database, a fixture in tests. A data source must not
//! fail for empty results; returning [`FetchResult::empty`] is the correct
//! answer, and a returned error is the sole failure signal.

use std::collections::BTreeMap;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Reserved parameter name for the 1-based page number.
pub const PARAM_PAGE: &str = "page";
/// Reserved parameter name for the page size.
pub const PARAM_PAGE_SIZE: &str = "pageSize";
/// Reserved parameter name for the sort field.
pub const PARAM_SORT_FIELD: &str = "sortField";
/// Reserved parameter name for the sort direction.
pub const PARAM_SORT_ORDER: &str = "sortOrder";

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending.
    Ascend,
    /// Descending.
    Descend,
}

impl SortOrder {
    /// The wire spelling (`"ascend"` / `"descend"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascend => "ascend",
            Self::Descend => "descend",
        }
    }
}

/// A sort field plus direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sorter {
    /// Field to sort by.
    pub field: String,
    /// Direction.
    pub order: SortOrder,
}

/// The parameters of one table query.
///
/// `page` and `page_size` are always ≥ 1. The filter keys are the
/// caller-defined subset, replaced wholesale by a new search and never
/// allowed to shadow the reserved pagination/sorting keys.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParams {
    /// 1-based page number.
    pub page: u64,
    /// Rows per page.
    pub page_size: u64,
    /// Active sorter, if any.
    pub sorter: Option<Sorter>,
    /// Caller-defined filter keys.
    pub filters: BTreeMap<String, Value>,
}

impl QueryParams {
    /// Parameters for page 1 at the given page size.
    pub fn new(page_size: u64) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            sorter: None,
            filters: BTreeMap::new(),
        }
    }

    /// Replace the filter-key subset wholesale.
    pub fn set_filters(&mut self, filters: BTreeMap<String, Value>) {
        self.filters = filters;
    }

    /// Look up one filter value.
    pub fn filter(&self, key: &str) -> Option<&Value> {
        self.filters.get(key)
    }

    /// Restore page, size, sorter and filters from a default set.
    pub fn reset_to(&mut self, defaults: &QueryParams) {
        *self = defaults.clone();
    }

    /// Compose the single request mapping for the data source:
    /// `{ page, pageSize, ...filters, sortField, sortOrder }`.
    ///
    /// Reserved keys are written after the filters, so a filter named
    /// `page` cannot shadow the page window.
    pub fn merged(&self) -> BTreeMap<String, Value> {
        let mut params = self.filters.clone();
        params.insert(PARAM_PAGE.to_string(), json!(self.page));
        params.insert(PARAM_PAGE_SIZE.to_string(), json!(self.page_size));
        if let Some(sorter) = &self.sorter {
            params.insert(PARAM_SORT_FIELD.to_string(), json!(sorter.field));
            params.insert(PARAM_SORT_ORDER.to_string(), json!(sorter.order.as_str()));
        }
        params
    }
}

impl Default for QueryParams {
    fn default() -> Self {
        Self::new(10)
    }
}

/// One page of fetched rows.
///
/// `page`/`page_size`, when echoed by the source, are authoritative over
/// the controller's local state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchResult<T> {
    /// The rows of the requested page.
    pub data: Vec<T>,
    /// Total row count across all pages.
    pub total: u64,
    /// Echoed page number, if the source reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    /// Echoed page size, if the source reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u64>,
}

impl<T> FetchResult<T> {
    /// The well-formed empty result. Sources return this instead of
    /// failing when nothing matches.
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            total: 0,
            page: None,
            page_size: None,
        }
    }
}

/// Why a fetch failed.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DataSourceError {
    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),
    /// The response could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
    /// The source answered with a rejection.
    #[error("source rejected the request: {message}")]
    Rejected {
        /// Status code, when the source has one.
        code: Option<u16>,
        /// Human-readable reason.
        message: String,
    },
}

/// An asynchronous row provider.
///
/// Implemented for any `Fn(QueryParams) -> BoxFuture<...>`, so closures
/// work directly:
///
/// ```
/// use futures_util::future::BoxFuture;
/// use futures_util::FutureExt;
/// use horizon_trellis::query::{DataSource, DataSourceError, FetchResult, QueryParams};
///
/// let source = |params: QueryParams| -> BoxFuture<'static, Result<FetchResult<u32>, DataSourceError>> {
///     async move {
///         let _ = params.merged();
///         Ok(FetchResult::empty())
///     }
///     .boxed()
/// };
/// let _: &dyn DataSource<u32> = &source;
/// ```
pub trait DataSource<T>: Send + Sync {
    /// Fetch one page of rows for the given parameters.
    fn fetch(&self, params: QueryParams) -> BoxFuture<'static, Result<FetchResult<T>, DataSourceError>>;
}

impl<T, F> DataSource<T> for F
where
    F: Fn(QueryParams) -> BoxFuture<'static, Result<FetchResult<T>, DataSourceError>>
        + Send
        + Sync,
{
    fn fetch(&self, params: QueryParams) -> BoxFuture<'static, Result<FetchResult<T>, DataSourceError>> {
        self(params)
    }
}
