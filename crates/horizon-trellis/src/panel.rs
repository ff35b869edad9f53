//! Search-panel layout engine.
//!
//! Given an ordered field schema and a row-capacity budget, the engine
//! computes which fields are visible (collapsed vs. expanded) and where
//! the action slot (submit/reset buttons) lands on the 24-unit grid.
//!
//! The engine produces data only, a [`SearchPanelState`] of layout slots.
//! Painting the widgets is the rendering layer's job.
//!
//! # Placement
//!
//! Visible fields are walked in order, accumulating spans in a running
//! row-fill counter that resets to 0 whenever it reaches or exceeds
//! [`GRID_COLUMNS`]. If the last row has unused capacity the action slot is
//! squeezed into it (`min(remaining, requested)`); otherwise it opens a new
//! row at its full requested span.

use horizon_trellis_core::{Property, Signal};

use crate::schema::{FieldSchema, DEFAULT_FIELD_SPAN, GRID_COLUMNS};

/// Where the action slot is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionPosition {
    /// Appended to the field grid as a synthetic trailing slot.
    #[default]
    Inline,
    /// Rendered by the caller outside the grid; no slot is appended.
    Footer,
}

/// Layout policy for a search panel.
#[derive(Debug, Clone)]
pub struct SearchPanelOptions {
    /// Rows of fields shown while collapsed.
    pub collapsed_rows: usize,
    /// Requested action-slot width in span units.
    pub action_span: u16,
    /// Where the action slot goes.
    pub action_position: ActionPosition,
    /// Span assumed per field when estimating fields-per-row; the packing
    /// policy treats fields as uniformly wide for the collapse budget.
    pub default_field_span: u16,
}

impl Default for SearchPanelOptions {
    fn default() -> Self {
        Self {
            collapsed_rows: 1,
            action_span: DEFAULT_FIELD_SPAN,
            action_position: ActionPosition::Inline,
            default_field_span: DEFAULT_FIELD_SPAN,
        }
    }
}

/// One rendered cell of the panel grid.
#[derive(Debug, Clone)]
pub enum PanelSlot<C> {
    /// A search field.
    Field(FieldSchema<C>),
    /// The synthetic action slot.
    Action {
        /// Width granted to the slot.
        span: u16,
    },
}

/// The derived layout of a search panel.
///
/// This is computed state: recompute it after anything feeding it changes;
/// it is never mutated in place.
#[derive(Debug, Clone)]
pub struct SearchPanelState<C> {
    /// Whether the panel is expanded.
    pub expanded: bool,
    /// Whether an expand/collapse button should be offered.
    pub show_expand: bool,
    /// The visible slots, in order; includes the trailing action slot when
    /// the action position is inline.
    pub slots: Vec<PanelSlot<C>>,
    /// Width granted to the action slot (also for footer rendering).
    pub action_span: u16,
}

/// Compute the panel layout for one schema, context and expansion state.
pub fn compute_layout<C>(
    fields: &[FieldSchema<C>],
    ctx: &C,
    options: &SearchPanelOptions,
    expanded: bool,
) -> SearchPanelState<C>
where
    C: 'static,
{
    let visible: Vec<&FieldSchema<C>> = fields.iter().filter(|f| !f.is_hidden(ctx)).collect();

    let fields_per_row = (GRID_COLUMNS / options.default_field_span.clamp(1, GRID_COLUMNS)) as usize;
    let collapsed_count = fields_per_row.max(1) * options.collapsed_rows;

    let show_expand = visible.len() > collapsed_count;
    let window: &[&FieldSchema<C>] = if expanded || !show_expand {
        &visible
    } else {
        &visible[..collapsed_count]
    };

    // Running row-fill counter over the 24-unit grid.
    let mut fill: u16 = 0;
    for field in window {
        fill += field.span;
        if fill >= GRID_COLUMNS {
            fill = 0;
        }
    }

    let action_span = if fill > 0 {
        (GRID_COLUMNS - fill).min(options.action_span)
    } else {
        options.action_span
    };

    let mut slots: Vec<PanelSlot<C>> = window
        .iter()
        .map(|field| PanelSlot::Field((*field).clone()))
        .collect();
    if options.action_position == ActionPosition::Inline {
        slots.push(PanelSlot::Action { span: action_span });
    }

    SearchPanelState {
        expanded,
        show_expand,
        slots,
        action_span,
    }
}

/// A search panel: schema, layout policy and the expansion flag.
pub struct SearchPanel<C> {
    fields: Vec<FieldSchema<C>>,
    options: SearchPanelOptions,
    expanded: Property<bool>,
    /// Emitted when the expansion flag actually changes.
    pub expanded_changed: Signal<bool>,
}

impl<C: 'static> SearchPanel<C> {
    /// Create a collapsed panel over the given schema with default policy.
    pub fn new(fields: Vec<FieldSchema<C>>) -> Self {
        Self {
            fields,
            options: SearchPanelOptions::default(),
            expanded: Property::new(false),
            expanded_changed: Signal::new(),
        }
    }

    /// Override the layout policy.
    pub fn with_options(mut self, options: SearchPanelOptions) -> Self {
        self.options = options;
        self
    }

    /// The schema, in layout order.
    pub fn fields(&self) -> &[FieldSchema<C>] {
        &self.fields
    }

    /// Replace the schema.
    pub fn set_fields(&mut self, fields: Vec<FieldSchema<C>>) {
        self.fields = fields;
    }

    /// The layout policy.
    pub fn options(&self) -> &SearchPanelOptions {
        &self.options
    }

    /// Whether the panel is expanded.
    pub fn expanded(&self) -> bool {
        self.expanded.get()
    }

    /// Set the expansion flag.
    pub fn set_expanded(&self, expanded: bool) {
        if self.expanded.set(expanded) {
            self.expanded_changed.emit(expanded);
        }
    }

    /// Flip the expansion flag.
    pub fn toggle_expanded(&self) {
        self.set_expanded(!self.expanded.get());
    }

    /// Compute the current layout against a context.
    pub fn state(&self, ctx: &C) -> SearchPanelState<C> {
        compute_layout(&self.fields, ctx, &self.options, self.expanded.get())
    }
}

impl<C> std::fmt::Debug for SearchPanel<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchPanel")
            .field("fields", &self.fields.len())
            .field("expanded", &self.expanded.get())
            .finish()
    }
}
