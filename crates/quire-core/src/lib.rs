#![forbid(unsafe_code)]

//! Core: geometry, host events, frame coalescing, and scoped global effects.

pub mod event;
pub mod frame;
pub mod geometry;
pub mod logging;
pub mod scope;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
