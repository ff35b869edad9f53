//! Core systems for Horizon Trellis.
//!
//! This crate provides the foundational primitives of the Horizon Trellis
//! table-interaction framework:
//!
//! - **Signal/Slot System**: Type-safe change notification between
//!   components and their observers
//! - **Property System**: Reactive values with change detection
//! - **Dynamic Values**: Constant-or-computed configuration, resolved
//!   against a data context on demand
//! - **Loading Guard**: A busy flag around async operations, with an
//!   optional anti-flicker delay
//!
//! The interaction layer built on top (crate `horizon-trellis`) is
//! single-threaded and cooperative: state containers are explicitly
//! constructed and passed by reference, and all cross-component
//! communication goes through registered callbacks on signals.
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_trellis_core::Signal;
//!
//! let value_changed = Signal::<i32>::new();
//!
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! value_changed.emit(42);
//!
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Property Example
//!
//! ```
//! use horizon_trellis_core::{Property, Signal};
//!
//! // A reactive counter with change notification
//! struct Counter {
//!     value: Property<i32>,
//!     value_changed: Signal<i32>,
//! }
//!
//! impl Counter {
//!     fn increment(&self) {
//!         let new_value = self.value.get() + 1;
//!         if self.value.set(new_value) {
//!             self.value_changed.emit(new_value);
//!         }
//!     }
//! }
//! ```

pub mod dynamic;
pub mod loading;
pub mod logging;
pub mod property;
pub mod signal;

pub use dynamic::DynamicValue;
pub use loading::LoadingGuard;
pub use property::Property;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
