//! Steptrace - trace-replay stepping debugger
//!
//! This crate re-exports all layers of the steptrace system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: steptrace_runtime     — MessagePack persistence of trace documents
//! Layer 1: steptrace_debug       — Player (step / step-over / step-out), listings
//! Layer 0: steptrace_foundation  — TraceDocument, TraceOp, slot metadata, formatting
//! ```

pub use steptrace_debug as debug;
pub use steptrace_foundation as foundation;
pub use steptrace_runtime as runtime;
