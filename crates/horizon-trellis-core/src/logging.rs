//! Logging facilities for Horizon Trellis.
//!
//! Horizon Trellis uses the `tracing` crate for instrumentation. To see
//! logs, install a tracing subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     // Initialize tracing (you can customize this)
//!     tracing_subscriber::fmt::init();
//!
//!     // Your application code...
//! }
//! ```
//!
//! Use the constants in [`targets`] with `tracing` directives to filter
//! logs by subsystem, e.g. `RUST_LOG=horizon_trellis::controller=debug`.

/// Target names for log filtering.
pub mod targets {
    /// Core primitives target.
    pub const CORE: &str = "horizon_trellis_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_trellis_core::signal";
    /// Loading guard target.
    pub const LOADING: &str = "horizon_trellis_core::loading";
    /// Table query controller target.
    pub const CONTROLLER: &str = "horizon_trellis::controller";
    /// Page orchestrator target.
    pub const PAGE: &str = "horizon_trellis::page";
}

/// Convenience wrappers around the `tracing` macros with the crate's
/// target naming.
#[macro_export]
macro_rules! trellis_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "horizon_trellis_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! trellis_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "horizon_trellis_core", $($arg)*)
    };
}
