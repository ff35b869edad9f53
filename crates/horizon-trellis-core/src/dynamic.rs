//! Dynamic configuration values.
//!
//! A dynamic value is a configuration value that is either a constant or a
//! function of the current data context, resolved on demand. Field schemas
//! use them for visibility predicates; the rest of the interaction layer
//! uses them wherever a caller may want behavior to depend on live state.
//!
//! # Example
//!
//! ```
//! use horizon_trellis_core::DynamicValue;
//!
//! struct Ctx { advanced: bool }
//!
//! let always: DynamicValue<Ctx, bool> = DynamicValue::from(true);
//! let when_advanced = DynamicValue::from_fn(|ctx: &Ctx| ctx.advanced);
//!
//! let ctx = Ctx { advanced: false };
//! assert!(always.resolve(&ctx));
//! assert!(!when_advanced.resolve(&ctx));
//! ```

use std::fmt;
use std::sync::Arc;

/// A value that is either a constant or computed from a context.
///
/// Resolution never fails: a computed value that panics propagates the
/// panic to the caller untouched. This is a deliberate pass-through, not a
/// swallowed error: the closure is caller-supplied and its failures are
/// the caller's to see.
pub enum DynamicValue<C, T> {
    /// A fixed value, returned as-is.
    Constant(T),
    /// A value computed from the context on every resolution.
    Computed(Arc<dyn Fn(&C) -> T + Send + Sync>),
}

impl<C, T: Clone> DynamicValue<C, T> {
    /// Create a computed value from a closure.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&C) -> T + Send + Sync + 'static,
    {
        Self::Computed(Arc::new(f))
    }

    /// Resolve this value against a context.
    pub fn resolve(&self, ctx: &C) -> T {
        match self {
            Self::Constant(value) => value.clone(),
            Self::Computed(f) => f(ctx),
        }
    }

    /// Resolve an optional dynamic value, falling back when absent.
    ///
    /// This is the full contract used across the interaction layer:
    /// a computed value is invoked with the context, a constant is returned
    /// as-is, and `None` yields the fallback.
    pub fn resolve_opt(value: Option<&Self>, ctx: &C, fallback: T) -> T {
        match value {
            Some(v) => v.resolve(ctx),
            None => fallback,
        }
    }
}

impl<C, T> From<T> for DynamicValue<C, T> {
    fn from(value: T) -> Self {
        Self::Constant(value)
    }
}

impl<C, T: Clone> Clone for DynamicValue<C, T> {
    fn clone(&self) -> Self {
        match self {
            Self::Constant(value) => Self::Constant(value.clone()),
            Self::Computed(f) => Self::Computed(f.clone()),
        }
    }
}

impl<C, T: fmt::Debug> fmt::Debug for DynamicValue<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}
