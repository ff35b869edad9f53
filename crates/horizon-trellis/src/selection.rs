//! Row selection tracking.
//!
//! [`SelectionModel`] tracks which rows of a table are selected, addressed
//! by the stable keys a [`RowKeyExtractor`] derives. Keys and row objects
//! are kept in lockstep: every selected key has exactly one corresponding
//! row, and rows are reported in key insertion order.
//!
//! The model never reacts to data refreshes by itself; whether a refresh
//! clears the selection is the page orchestrator's policy, not the
//! registry's.
//!
//! # Signals
//!
//! - `selection_changed`: emitted after **every** mutating call with the
//!   resulting `(keys, rows)` state, including calls with no net change
//!   (e.g. clearing an already-empty selection). Observers must tolerate
//!   redundant notifications.

use std::collections::HashSet;

use horizon_trellis_core::Signal;
use parking_lot::RwLock;

use crate::schema::{RowKey, RowKeyExtractor};

struct SelectionInner<T> {
    /// Selected keys for O(1) membership checks.
    keys: HashSet<RowKey>,
    /// `(key, row)` pairs in insertion order; lockstep with `keys`.
    entries: Vec<(RowKey, T)>,
}

/// Tracks selected rows by key.
pub struct SelectionModel<T> {
    extractor: RowKeyExtractor<T>,
    inner: RwLock<SelectionInner<T>>,
    /// Emitted with the resulting `(keys, rows)` after every mutation.
    pub selection_changed: Signal<(Vec<RowKey>, Vec<T>)>,
}

impl<T: Clone + Send + Sync + 'static> SelectionModel<T> {
    /// Create an empty selection addressed by the given extractor.
    ///
    /// The extractor must be pure and stable across re-fetches of the same
    /// logical row, or selection will not survive a refresh by identity.
    pub fn new(extractor: RowKeyExtractor<T>) -> Self {
        Self {
            extractor,
            inner: RwLock::new(SelectionInner {
                keys: HashSet::new(),
                entries: Vec::new(),
            }),
            selection_changed: Signal::new(),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Number of selected rows.
    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }

    /// Whether a key is selected.
    pub fn is_selected(&self, key: &RowKey) -> bool {
        self.inner.read().keys.contains(key)
    }

    /// The selected keys, in insertion order.
    pub fn selected_keys(&self) -> Vec<RowKey> {
        self.inner
            .read()
            .entries
            .iter()
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// The selected rows, in key insertion order.
    pub fn selected_rows(&self) -> Vec<T> {
        self.inner
            .read()
            .entries
            .iter()
            .map(|(_, row)| row.clone())
            .collect()
    }

    /// Derive the key for a row with the configured extractor.
    pub fn key_of(&self, row: &T) -> RowKey {
        self.extractor.key_of(row)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add rows to the selection (union semantics, de-duplicated by key).
    pub fn select(&self, rows: Vec<T>) {
        {
            let mut inner = self.inner.write();
            for row in rows {
                let key = self.extractor.key_of(&row);
                if inner.keys.insert(key.clone()) {
                    inner.entries.push((key, row));
                }
            }
        }
        self.notify();
    }

    /// Remove keys (and their rows) from the selection.
    pub fn deselect(&self, keys: &[RowKey]) {
        {
            let mut inner = self.inner.write();
            for key in keys {
                inner.keys.remove(key);
            }
            let remaining = inner.keys.clone();
            inner.entries.retain(|(key, _)| remaining.contains(key));
        }
        self.notify();
    }

    /// Select the row if absent, deselect it if present.
    pub fn toggle(&self, row: T) {
        let key = self.extractor.key_of(&row);
        if self.is_selected(&key) {
            self.deselect(&[key]);
        } else {
            self.select(vec![row]);
        }
    }

    /// Replace the entire selection with exactly `rows` (not a union).
    pub fn select_all(&self, rows: Vec<T>) {
        {
            let mut inner = self.inner.write();
            inner.keys.clear();
            inner.entries.clear();
            for row in rows {
                let key = self.extractor.key_of(&row);
                if inner.keys.insert(key.clone()) {
                    inner.entries.push((key, row));
                }
            }
        }
        self.notify();
    }

    /// Empty the selection.
    pub fn clear(&self) {
        {
            let mut inner = self.inner.write();
            inner.keys.clear();
            inner.entries.clear();
        }
        self.notify();
    }

    /// Emit the resulting state. Called after every mutation, whether or
    /// not anything net-changed.
    fn notify(&self) {
        self.selection_changed
            .emit((self.selected_keys(), self.selected_rows()));
    }
}

impl<T> std::fmt::Debug for SelectionModel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionModel")
            .field("selected", &self.inner.read().entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn model() -> SelectionModel<Value> {
        SelectionModel::new(RowKeyExtractor::field("id"))
    }

    fn row(id: i64) -> Value {
        json!({"id": id, "name": format!("row-{id}")})
    }

    #[test]
    fn test_select_union_is_idempotent() {
        let selection = model();
        selection.select(vec![row(1)]);
        selection.select(vec![row(1)]);

        assert_eq!(selection.selected_keys(), vec![RowKey::Int(1)]);
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_select_unions_with_existing() {
        let selection = model();
        selection.select(vec![row(1)]);
        selection.select(vec![row(2), row(3)]);

        assert_eq!(
            selection.selected_keys(),
            vec![RowKey::Int(1), RowKey::Int(2), RowKey::Int(3)]
        );
    }

    #[test]
    fn test_select_all_replaces() {
        let selection = model();
        selection.select(vec![row(3)]);
        selection.select_all(vec![row(1), row(2)]);

        assert_eq!(
            selection.selected_keys(),
            vec![RowKey::Int(1), RowKey::Int(2)]
        );
        assert!(!selection.is_selected(&RowKey::Int(3)));
    }

    #[test]
    fn test_deselect_removes_key_and_row() {
        let selection = model();
        selection.select(vec![row(1), row(2)]);
        selection.deselect(&[RowKey::Int(1)]);

        assert_eq!(selection.selected_keys(), vec![RowKey::Int(2)]);
        assert_eq!(selection.selected_rows(), vec![row(2)]);
    }

    #[test]
    fn test_toggle() {
        let selection = model();
        selection.toggle(row(5));
        assert!(selection.is_selected(&RowKey::Int(5)));
        selection.toggle(row(5));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_rows_follow_key_insertion_order() {
        let selection = model();
        selection.select(vec![row(2)]);
        selection.select(vec![row(1)]);
        selection.select(vec![row(3), row(2)]);

        assert_eq!(
            selection.selected_rows(),
            vec![row(2), row(1), row(3)]
        );
    }

    #[test]
    fn test_redundant_clear_still_notifies() {
        let selection = model();
        let notified = Arc::new(Mutex::new(0));

        let notified_clone = notified.clone();
        selection.selection_changed.connect(move |_| {
            *notified_clone.lock() += 1;
        });

        selection.clear();
        selection.clear();
        assert_eq!(*notified.lock(), 2);
    }

    #[test]
    fn test_notification_carries_resulting_state() {
        let selection = model();
        let last = Arc::new(Mutex::new(None));

        let last_clone = last.clone();
        selection.selection_changed.connect(move |state| {
            *last_clone.lock() = Some(state.clone());
        });

        selection.select(vec![row(1), row(2)]);
        let (keys, rows) = last.lock().clone().unwrap();
        assert_eq!(keys, vec![RowKey::Int(1), RowKey::Int(2)]);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_missing_keys_collapse_to_single_null() {
        let selection = model();
        selection.select(vec![json!({"name": "a"}), json!({"name": "b"})]);

        // Both rows lack an id; they share RowKey::Null and deduplicate.
        assert_eq!(selection.selected_keys(), vec![RowKey::Null]);
        assert_eq!(selection.len(), 1);
    }
}
