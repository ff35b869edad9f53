//! Prelude module for Horizon Trellis.
//!
//! This module re-exports the most commonly used types for convenient
//! importing:
//!
//! ```ignore
//! use horizon_trellis::prelude::*;
//! ```
//!
//! This provides access to:
//! - Signal/slot and property primitives (`Signal`, `Property`)
//! - Schema types (`FieldSchema`, `FieldKind`, `RowKey`)
//! - Query types (`QueryParams`, `DataSource`, `FetchResult`)
//! - The interaction components (`Pagination`, `SelectionModel`,
//!   `SearchPanel`, `TableController`, `TablePage`)

// ============================================================================
// Core Primitives
// ============================================================================

pub use horizon_trellis_core::{DynamicValue, LoadingGuard, Property, Signal};

// ============================================================================
// Schema
// ============================================================================

pub use crate::schema::{FieldKind, FieldSchema, RowAccess, RowKey, RowKeyExtractor, SelectOption};

// ============================================================================
// Query Model
// ============================================================================

pub use crate::query::{
    DataSource, DataSourceError, FetchResult, QueryParams, SortOrder, Sorter,
};

// ============================================================================
// Interaction Components
// ============================================================================

pub use crate::controller::{ControllerError, TableController};
pub use crate::page::{PageEvent, TablePage};
pub use crate::pagination::{PageState, Pagination};
pub use crate::panel::{ActionPosition, PanelSlot, SearchPanel, SearchPanelOptions, SearchPanelState};
pub use crate::selection::SelectionModel;
