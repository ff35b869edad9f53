//! Declarative field schemas.
//!
//! A schema is a data-only description of a search field (key, label,
//! layout span, visibility rule) consumed by the interpretation layer.
//! Callers describe their search panels as ordered lists of
//! [`FieldSchema`] values; order is significant for layout packing.
//!
//! Field kinds are a closed enumeration (one variant per kind, each
//! carrying its kind-specific configuration) resolved through an
//! exhaustive `match` at the rendering boundary. There is no string-keyed
//! component registry.
//!
//! # Example
//!
//! ```
//! use horizon_trellis::schema::{FieldKind, FieldSchema};
//!
//! #[derive(Default)]
//! struct SearchCtx { show_advanced: bool }
//!
//! let fields: Vec<FieldSchema<SearchCtx>> = vec![
//!     FieldSchema::new("name", "Name"),
//!     FieldSchema::new("status", "Status").with_kind(FieldKind::Select {
//!         options: vec![("enabled", "Enabled").into(), ("disabled", "Disabled").into()],
//!     }),
//!     FieldSchema::new("created", "Created").with_kind(FieldKind::DateRange),
//!     FieldSchema::new("owner", "Owner").hidden_when(|ctx: &SearchCtx| !ctx.show_advanced),
//! ];
//!
//! let ctx = SearchCtx::default();
//! assert!(fields[3].is_hidden(&ctx));
//! ```

use std::fmt;
use std::sync::Arc;

use horizon_trellis_core::DynamicValue;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use static_assertions::const_assert;

/// Width of the layout grid, in span units.
pub const GRID_COLUMNS: u16 = 24;

/// Default span of a search field when none is given.
pub const DEFAULT_FIELD_SPAN: u16 = 6;

const_assert!(GRID_COLUMNS > 0);
const_assert!(DEFAULT_FIELD_SPAN <= GRID_COLUMNS);

/// One choice of a [`FieldKind::Select`] field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Value submitted as the filter value.
    pub value: String,
    /// Text shown to the user.
    pub label: String,
}

impl From<(&str, &str)> for SelectOption {
    fn from((value, label): (&str, &str)) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

/// The closed set of search-field kinds.
///
/// The rendering layer matches exhaustively on this enum; adding a kind is
/// a compile-visible change everywhere it is consumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// Free-form text input.
    #[default]
    Text,
    /// Numeric input with optional bounds.
    Number {
        /// Inclusive lower bound.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        /// Inclusive upper bound.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    /// Single choice out of a fixed option list.
    Select {
        /// The selectable options, in display order.
        options: Vec<SelectOption>,
    },
    /// A from/to date pair submitted as one filter value.
    DateRange,
    /// Boolean on/off toggle.
    Switch,
}

/// A declarative description of one search field.
///
/// `C` is the caller's data context for dynamic configuration; schemas
/// whose behavior never depends on live state can use `()`.
pub struct FieldSchema<C> {
    /// Parameter name; unique within a schema.
    pub key: String,
    /// Text shown next to the input.
    pub label: String,
    /// Grid width in `[1, GRID_COLUMNS]` span units.
    pub span: u16,
    /// What to render for this field.
    pub kind: FieldKind,
    /// Visibility rule; absent means visible.
    pub hidden: Option<DynamicValue<C, bool>>,
}

impl<C> FieldSchema<C> {
    /// Create a text field with the default span.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            span: DEFAULT_FIELD_SPAN,
            kind: FieldKind::default(),
            hidden: None,
        }
    }

    /// Set the grid span, clamped into `[1, GRID_COLUMNS]`.
    pub fn with_span(mut self, span: u16) -> Self {
        self.span = span.clamp(1, GRID_COLUMNS);
        self
    }

    /// Set the field kind.
    pub fn with_kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    /// Hide or show the field unconditionally.
    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = Some(DynamicValue::from(hidden));
        self
    }

    /// Hide the field whenever the predicate holds for the context.
    pub fn hidden_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.hidden = Some(DynamicValue::from_fn(predicate));
        self
    }

    /// Resolve the visibility rule against a context.
    pub fn is_hidden(&self, ctx: &C) -> bool {
        DynamicValue::resolve_opt(self.hidden.as_ref(), ctx, false)
    }
}

// Manual impl: cloning a schema must not require `C: Clone`.
impl<C> Clone for FieldSchema<C> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            label: self.label.clone(),
            span: self.span,
            kind: self.kind.clone(),
            hidden: self.hidden.clone(),
        }
    }
}

impl<C> fmt::Debug for FieldSchema<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSchema")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("span", &self.span)
            .field("kind", &self.kind)
            .field("hidden", &self.hidden.is_some())
            .finish()
    }
}

/// A stable identifier for a row object, for selection tracking.
///
/// `Null` models a row that lacked an extractable key: it is still
/// inserted into the selection like any other key (and deduplicates to a
/// single entry). Supplying an extractor that produces real keys is the
/// caller's contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowKey {
    /// The row had no extractable key.
    Null,
    /// Numeric identity.
    Int(i64),
    /// String identity.
    Str(String),
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RowKey {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for RowKey {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for RowKey {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<&Value> for RowKey {
    fn from(value: &Value) -> Self {
        match value {
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Str(n.to_string()),
            },
            Value::String(s) => Self::Str(s.clone()),
            Value::Null => Self::Null,
            other => Self::Str(other.to_string()),
        }
    }
}

/// Named-field access on row objects, for field-name key extraction.
pub trait RowAccess {
    /// Look up a field by name, if present.
    fn field(&self, name: &str) -> Option<Value>;
}

impl RowAccess for Value {
    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

/// Derives a stable [`RowKey`] from a row object.
///
/// The extractor must be deterministic for a given logical row across
/// fetches if selection is expected to survive a refresh by identity.
///
/// # Example
///
/// ```
/// use horizon_trellis::schema::{RowKey, RowKeyExtractor};
/// use serde_json::json;
///
/// // By field name, for JSON rows...
/// let by_field = RowKeyExtractor::field("id");
/// assert_eq!(by_field.key_of(&json!({"id": 7})), RowKey::Int(7));
///
/// // ...or by closure, for typed rows.
/// struct User { id: u32 }
/// let by_fn = RowKeyExtractor::with(|u: &User| RowKey::Int(u.id as i64));
/// assert_eq!(by_fn.key_of(&User { id: 3 }), RowKey::Int(3));
/// ```
pub struct RowKeyExtractor<T> {
    extract: Arc<dyn Fn(&T) -> RowKey + Send + Sync>,
}

impl<T> RowKeyExtractor<T> {
    /// Derive keys with a closure.
    pub fn with<F>(f: F) -> Self
    where
        F: Fn(&T) -> RowKey + Send + Sync + 'static,
    {
        Self {
            extract: Arc::new(f),
        }
    }

    /// Derive the key for one row.
    pub fn key_of(&self, row: &T) -> RowKey {
        (self.extract)(row)
    }
}

impl<T: RowAccess> RowKeyExtractor<T> {
    /// Derive keys by looking up a named field on each row.
    ///
    /// Rows without the field yield [`RowKey::Null`].
    pub fn field(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::with(move |row: &T| match row.field(&name) {
            Some(value) => RowKey::from(&value),
            None => RowKey::Null,
        })
    }
}

impl<T> Clone for RowKeyExtractor<T> {
    fn clone(&self) -> Self {
        Self {
            extract: self.extract.clone(),
        }
    }
}

impl<T> fmt::Debug for RowKeyExtractor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RowKeyExtractor(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_span_is_clamped() {
        let field: FieldSchema<()> = FieldSchema::new("q", "Query").with_span(40);
        assert_eq!(field.span, GRID_COLUMNS);

        let field: FieldSchema<()> = FieldSchema::new("q", "Query").with_span(0);
        assert_eq!(field.span, 1);
    }

    #[test]
    fn test_hidden_defaults_to_visible() {
        let field: FieldSchema<()> = FieldSchema::new("q", "Query");
        assert!(!field.is_hidden(&()));
    }

    #[test]
    fn test_hidden_predicate() {
        struct Ctx {
            admin: bool,
        }
        let field = FieldSchema::new("role", "Role").hidden_when(|ctx: &Ctx| !ctx.admin);
        assert!(field.is_hidden(&Ctx { admin: false }));
        assert!(!field.is_hidden(&Ctx { admin: true }));
    }

    #[test]
    fn test_field_kind_serde_round_trip() {
        let kind = FieldKind::Select {
            options: vec![("a", "A").into()],
        };
        let text = serde_json::to_string(&kind).unwrap();
        let back: FieldKind = serde_json::from_str(&text).unwrap();
        assert_eq!(kind, back);
    }

    #[test]
    fn test_row_key_from_json_values() {
        assert_eq!(RowKey::from(&json!(42)), RowKey::Int(42));
        assert_eq!(RowKey::from(&json!("abc")), RowKey::Str("abc".into()));
        assert_eq!(RowKey::from(&json!(null)), RowKey::Null);
    }

    #[test]
    fn test_field_extractor_missing_key_is_null() {
        let extractor = RowKeyExtractor::field("id");
        assert_eq!(extractor.key_of(&json!({"name": "x"})), RowKey::Null);
    }
}
