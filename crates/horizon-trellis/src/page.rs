//! Page orchestrator.
//!
//! [`TablePage`] composes a [`TableController`], a [`SelectionModel`] and a
//! [`SearchPanel`] behind a single façade, translating the four page-level
//! intents (search, refresh, reload, reset) into the correct
//! sub-operations.
//!
//! Every intent ends by emitting a page event. The asymmetry is
//! deliberate and load-bearing: `handle_search` emits
//! [`PageEvent::Search`]; the other three emit [`PageEvent::Refresh`].
//! External listeners key off the event to decide whether to reset
//! page-level chrome (scroll position, open panels), so search must never
//! masquerade as a refresh.

use std::collections::BTreeMap;

use horizon_trellis_core::Signal;
use parking_lot::RwLock;
use serde_json::Value;

use crate::controller::{ControllerError, TableController};
use crate::pagination::PageState;
use crate::panel::{SearchPanel, SearchPanelState};
use crate::selection::SelectionModel;

/// Page-level notifications to the surrounding view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    /// A new search was submitted; view chrome should reset.
    Search,
    /// Data was refreshed in place (refresh, reload or reset).
    Refresh,
}

/// One table page: query lifecycle, selection and search panel behind a
/// single façade.
pub struct TablePage<T, C> {
    controller: TableController<T>,
    selection: SelectionModel<T>,
    panel: SearchPanel<C>,
    /// The last submitted search values, kept for re-dispatch by the view.
    filter_cache: RwLock<BTreeMap<String, Value>>,
    /// Emitted at the end of every successful intent.
    pub events: Signal<PageEvent>,
}

impl<T, C> TablePage<T, C>
where
    T: Clone + Send + Sync + 'static,
    C: 'static,
{
    /// Compose a page out of its three parts.
    pub fn new(
        controller: TableController<T>,
        selection: SelectionModel<T>,
        panel: SearchPanel<C>,
    ) -> Self {
        Self {
            controller,
            selection,
            panel,
            filter_cache: RwLock::new(BTreeMap::new()),
            events: Signal::new(),
        }
    }

    // =========================================================================
    // Intents
    // =========================================================================

    /// The user submitted the search form.
    ///
    /// Starts a new query context: the selection is cleared, the filters
    /// replace the previous ones, the page resets to 1. Emits
    /// [`PageEvent::Search`].
    pub async fn handle_search(
        &self,
        values: BTreeMap<String, Value>,
    ) -> Result<(), ControllerError> {
        *self.filter_cache.write() = values.clone();
        self.selection.clear();
        self.controller.search(values).await?;
        self.events.emit(PageEvent::Search);
        Ok(())
    }

    /// Re-fetch in place after an edit; page, filters and selection all
    /// stay put. Emits [`PageEvent::Refresh`].
    pub async fn handle_refresh(&self) -> Result<(), ControllerError> {
        self.controller.refresh().await?;
        self.events.emit(PageEvent::Refresh);
        Ok(())
    }

    /// The data set under the current filters shifted; back to page 1 with
    /// filters kept. Emits [`PageEvent::Refresh`].
    pub async fn handle_reload(&self) -> Result<(), ControllerError> {
        self.controller.reload().await?;
        self.events.emit(PageEvent::Refresh);
        Ok(())
    }

    /// Clear the cached filter values and restore the default parameters.
    /// Emits [`PageEvent::Refresh`].
    pub async fn handle_reset(&self) -> Result<(), ControllerError> {
        self.filter_cache.write().clear();
        self.selection.clear();
        self.controller.reset().await?;
        self.events.emit(PageEvent::Refresh);
        Ok(())
    }

    // =========================================================================
    // Façade access
    // =========================================================================

    /// The query controller.
    pub fn controller(&self) -> &TableController<T> {
        &self.controller
    }

    /// The selection registry.
    pub fn selection(&self) -> &SelectionModel<T> {
        &self.selection
    }

    /// The search panel.
    pub fn panel(&self) -> &SearchPanel<C> {
        &self.panel
    }

    /// The current rows.
    pub fn rows(&self) -> Vec<T> {
        self.controller.rows()
    }

    /// The current page window.
    pub fn page_state(&self) -> PageState {
        self.controller.page_state()
    }

    /// The current panel layout against a context.
    pub fn panel_state(&self, ctx: &C) -> SearchPanelState<C> {
        self.panel.state(ctx)
    }

    /// The last submitted search values.
    pub fn filter_values(&self) -> BTreeMap<String, Value> {
        self.filter_cache.read().clone()
    }

    /// Tear the page down; the controller stops fetching and applying.
    pub fn dispose(&self) {
        self.controller.dispose();
    }
}

impl<T, C> std::fmt::Debug for TablePage<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TablePage")
            .field("controller", &self.controller)
            .field("selection", &self.selection)
            .finish()
    }
}
