//! Trace documents, slot metadata, and value formatting for steptrace.
//!
//! This crate provides:
//! - [`TraceDocument`] - The immutable recorded trace and its directories
//! - [`TraceOp`] - The op log entries a producer emits
//! - [`SlotInfo`] / [`FuncInfo`] - Static metadata for slots and functions
//! - [`RawValue`] with [`format_value`] and [`component_suffix`] for display
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod document;
pub mod error;
pub mod id;
pub mod op;
pub mod types;
pub mod value;

pub use document::{TraceDocument, TraceDocumentBuilder, UNKNOWN};
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use id::{FunctionId, SlotId};
pub use op::{FunctionResult, TraceOp};
pub use types::{BaseType, FuncInfo, Shape, SlotInfo};
pub use value::{RawValue, component_suffix, format_value};
