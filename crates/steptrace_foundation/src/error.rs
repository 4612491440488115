//! Error types for steptrace.
//!
//! Uses `thiserror` for ergonomic error definition with rich context. The
//! player itself never fails; these errors come from persistence and from
//! producer-side validation of trace documents.

use std::fmt;

use thiserror::Error;

use crate::id::{FunctionId, SlotId};

/// Result type alias using the steptrace [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for steptrace operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Adds the op position to this error's context.
    #[must_use]
    pub fn at_op(self, position: usize) -> Self {
        let context = self.context.clone().unwrap_or_default().with_op(position);
        self.with_context(context)
    }

    /// Creates an unknown function error.
    #[must_use]
    pub fn unknown_function(id: FunctionId, directory_len: usize) -> Self {
        Self::new(ErrorKind::UnknownFunction { id, directory_len })
    }

    /// Creates an unknown slot error.
    #[must_use]
    pub fn unknown_slot(id: SlotId, directory_len: usize) -> Self {
        Self::new(ErrorKind::UnknownSlot { id, directory_len })
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Serialization(message.into()))
    }

    /// Creates an I/O error.
    #[must_use]
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io(message.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// A function id outside the function directory.
    #[error("unknown function {id} (directory has {directory_len} entries)")]
    UnknownFunction {
        /// The offending id.
        id: FunctionId,
        /// Size of the function directory.
        directory_len: usize,
    },

    /// A slot id outside the slot directory.
    #[error("unknown slot {id} (directory has {directory_len} entries)")]
    UnknownSlot {
        /// The offending id.
        id: SlotId,
        /// Size of the slot directory.
        directory_len: usize,
    },

    /// `ExitScope` with no open scope, or scopes left open at a frame exit.
    #[error("unbalanced scope: {0}")]
    UnbalancedScope(String),

    /// `ExitFunction` with no active frame, or frames left open at the end.
    #[error("unbalanced frame: {0}")]
    UnbalancedFrame(String),

    /// `ExitFunction` names a different function than the one on top.
    #[error("exit from {exited} while {active} is active")]
    FunctionMismatch {
        /// The function the exit op names.
        exited: FunctionId,
        /// The function actually on top of the stack.
        active: FunctionId,
    },

    /// Encoding or decoding a trace document failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Reading or writing a trace file failed.
    #[error("i/o error: {0}")]
    Io(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Index of the op being examined.
    pub op: Option<usize>,
    /// File path involved, if any.
    pub path: Option<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the op position.
    #[must_use]
    pub fn with_op(mut self, position: usize) -> Self {
        self.op = Some(position);
        self
    }

    /// Sets the file path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(path) = &self.path {
            write!(f, "in {path}")?;
        }
        if let Some(op) = self.op {
            if self.path.is_some() {
                write!(f, " ")?;
            }
            write!(f, "at op #{op}")?;
        }
        Ok(())
    }
}
