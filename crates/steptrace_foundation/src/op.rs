//! Trace operations recorded by the producer.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::id::{FunctionId, SlotId};
use crate::value::RawValue;

/// A return value produced when a function exits.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FunctionResult {
    /// Slot describing the result (usually named `[name].result`).
    pub slot: SlotId,
    /// The returned value.
    pub value: RawValue,
}

/// One entry of the execution log.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TraceOp {
    /// Execution reached a source line.
    Line {
        /// 1-based source line.
        line: u32,
    },

    /// A new call frame begins.
    EnterFunction {
        /// The function being entered.
        function: FunctionId,
    },

    /// The innermost call frame returns.
    ExitFunction {
        /// The function being exited.
        function: FunctionId,
        /// The synthesized return value, if the function produces one.
        result: Option<FunctionResult>,
    },

    /// A lexical block begins in the current frame.
    EnterScope,

    /// The innermost lexical block ends, retiring every slot declared in it.
    ExitScope,

    /// A variable slot was written.
    SlotWrite {
        /// The slot written.
        slot: SlotId,
        /// The new value.
        value: RawValue,
    },
}

impl TraceOp {
    /// Returns a short name for the op kind.
    #[must_use]
    pub fn op_type(&self) -> &'static str {
        match self {
            Self::Line { .. } => "line",
            Self::EnterFunction { .. } => "enter",
            Self::ExitFunction { .. } => "exit",
            Self::EnterScope => "scope-enter",
            Self::ExitScope => "scope-exit",
            Self::SlotWrite { .. } => "write",
        }
    }

    /// Returns the line number if this is a line marker.
    #[must_use]
    pub fn line(&self) -> Option<u32> {
        match self {
            Self::Line { line } => Some(*line),
            _ => None,
        }
    }

    /// Returns true if this op changes the call stack depth.
    #[must_use]
    pub fn is_frame_boundary(&self) -> bool {
        matches!(self, Self::EnterFunction { .. } | Self::ExitFunction { .. })
    }

    /// Returns true if this op changes lexical scope nesting.
    #[must_use]
    pub fn is_scope_boundary(&self) -> bool {
        matches!(self, Self::EnterScope | Self::ExitScope)
    }
}
