//! The immutable trace artifact consumed by the player.
//!
//! A [`TraceDocument`] bundles the ordered op log with the function and slot
//! directories that give its ids meaning. Documents are built once, by the
//! producer, through [`TraceDocumentBuilder`]; nothing mutates them afterward,
//! so any number of players can share one behind an `Arc`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind, Result};
use crate::id::{FunctionId, SlotId};
use crate::op::{FunctionResult, TraceOp};
use crate::types::{BaseType, FuncInfo, Shape, SlotInfo};
use crate::value::{RawValue, component_suffix, format_value};

/// Placeholder rendered for ids outside their directory.
pub const UNKNOWN: &str = "???";

// =============================================================================
// Trace Document
// =============================================================================

/// A recorded execution trace plus its static metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceDocument {
    ops: Vec<TraceOp>,
    functions: Vec<FuncInfo>,
    slots: Vec<SlotInfo>,
    #[cfg_attr(feature = "serde", serde(default))]
    source: Vec<String>,
}

impl TraceDocument {
    /// Creates a document from its parts.
    #[must_use]
    pub fn new(ops: Vec<TraceOp>, functions: Vec<FuncInfo>, slots: Vec<SlotInfo>) -> Self {
        Self {
            ops,
            functions,
            slots,
            source: Vec::new(),
        }
    }

    /// Attaches program source text, one entry per line.
    #[must_use]
    pub fn with_source(mut self, source: Vec<String>) -> Self {
        self.source = source;
        self
    }

    /// Returns a builder for assembling a document.
    #[must_use]
    pub fn builder() -> TraceDocumentBuilder {
        TraceDocumentBuilder::new()
    }

    /// Returns the op log.
    #[must_use]
    pub fn ops(&self) -> &[TraceOp] {
        &self.ops
    }

    /// Returns the op at `position`.
    #[must_use]
    pub fn op(&self, position: usize) -> Option<&TraceOp> {
        self.ops.get(position)
    }

    /// Returns the number of ops.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns true if the op log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Returns the function directory.
    #[must_use]
    pub fn functions(&self) -> &[FuncInfo] {
        &self.functions
    }

    /// Returns the slot directory.
    #[must_use]
    pub fn slots(&self) -> &[SlotInfo] {
        &self.slots
    }

    /// Returns the program source lines, if any were attached.
    #[must_use]
    pub fn source(&self) -> &[String] {
        &self.source
    }

    /// Looks up function metadata.
    #[must_use]
    pub fn function(&self, id: FunctionId) -> Option<&FuncInfo> {
        self.functions.get(id.index())
    }

    /// Looks up slot metadata.
    #[must_use]
    pub fn slot(&self, id: SlotId) -> Option<&SlotInfo> {
        self.slots.get(id.index())
    }

    /// Returns a function's display name, or [`UNKNOWN`].
    #[must_use]
    pub fn function_name(&self, id: FunctionId) -> &str {
        self.function(id).map_or(UNKNOWN, |f| f.display_name.as_str())
    }

    /// Returns a slot's variable name with its component suffix, e.g. `c.x`.
    #[must_use]
    pub fn slot_label(&self, id: SlotId) -> String {
        match self.slot(id) {
            Some(info) => format!("{}{}", info.display_name, component_suffix(info)),
            None => UNKNOWN.to_string(),
        }
    }

    /// Renders a raw value as the given slot's type, or [`UNKNOWN`].
    #[must_use]
    pub fn slot_value_text(&self, id: SlotId, value: RawValue) -> String {
        self.slot(id)
            .map_or_else(|| UNKNOWN.to_string(), |info| format_value(info, value))
    }

    /// Returns the text of a 1-based source line.
    #[must_use]
    pub fn source_line(&self, line: u32) -> Option<&str> {
        let index = (line as usize).checked_sub(1)?;
        self.source.get(index).map(String::as_str)
    }

    /// Checks that every id is in range and that frames and scopes nest.
    ///
    /// This is a producer-side check; the player accepts any document.
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency found, with the op position attached
    /// as context.
    pub fn validate(&self) -> Result<()> {
        // (function, open scopes) per active frame
        let mut frames: Vec<(FunctionId, usize)> = Vec::new();
        let mut global_scopes = 0usize;

        for (position, op) in self.ops.iter().enumerate() {
            match op {
                TraceOp::Line { .. } => {}
                TraceOp::EnterFunction { function } => {
                    self.check_function(*function)
                        .map_err(|e| e.at_op(position))?;
                    frames.push((*function, 0));
                }
                TraceOp::ExitFunction { function, result } => {
                    self.check_function(*function)
                        .map_err(|e| e.at_op(position))?;
                    if let Some(result) = result {
                        self.check_slot(result.slot).map_err(|e| e.at_op(position))?;
                    }
                    let Some((active, open_scopes)) = frames.pop() else {
                        return Err(Error::new(ErrorKind::UnbalancedFrame(format!(
                            "exit from {function} with no active frame"
                        )))
                        .at_op(position));
                    };
                    if active != *function {
                        return Err(Error::new(ErrorKind::FunctionMismatch {
                            exited: *function,
                            active,
                        })
                        .at_op(position));
                    }
                    if open_scopes != 0 {
                        return Err(Error::new(ErrorKind::UnbalancedScope(format!(
                            "{open_scopes} scope(s) still open when {function} exits"
                        )))
                        .at_op(position));
                    }
                }
                TraceOp::EnterScope => {
                    let depth = frames.last_mut().map_or(&mut global_scopes, |f| &mut f.1);
                    *depth += 1;
                }
                TraceOp::ExitScope => {
                    let depth = frames.last_mut().map_or(&mut global_scopes, |f| &mut f.1);
                    if *depth == 0 {
                        return Err(Error::new(ErrorKind::UnbalancedScope(
                            "scope exit with no open scope".to_string(),
                        ))
                        .at_op(position));
                    }
                    *depth -= 1;
                }
                TraceOp::SlotWrite { slot, .. } => {
                    self.check_slot(*slot).map_err(|e| e.at_op(position))?;
                }
            }
        }

        if let Some((function, _)) = frames.last() {
            return Err(Error::new(ErrorKind::UnbalancedFrame(format!(
                "{} frame(s) never exited, innermost {function}",
                frames.len()
            ))));
        }
        Ok(())
    }

    fn check_function(&self, id: FunctionId) -> Result<()> {
        if self.function(id).is_some() {
            Ok(())
        } else {
            Err(Error::unknown_function(id, self.functions.len()))
        }
    }

    fn check_slot(&self, id: SlotId) -> Result<()> {
        if self.slot(id).is_some() {
            Ok(())
        } else {
            Err(Error::unknown_slot(id, self.slots.len()))
        }
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Incrementally assembles a [`TraceDocument`].
///
/// Directory entries are allocated densely in call order. Op methods return
/// `&mut Self` so a trace reads top to bottom like the program it records.
#[derive(Clone, Debug, Default)]
pub struct TraceDocumentBuilder {
    doc: TraceDocument,
}

impl TraceDocumentBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a function and returns its id.
    #[allow(clippy::cast_possible_truncation)]
    pub fn add_function(&mut self, display_name: impl Into<String>) -> FunctionId {
        let id = FunctionId::new(self.doc.functions.len() as u32);
        self.doc.functions.push(FuncInfo::new(display_name));
        id
    }

    /// Registers a scalar variable and returns its slot.
    pub fn add_variable(&mut self, name: impl Into<String>, base_type: BaseType) -> SlotId {
        self.push_slot(SlotInfo::scalar(name, base_type))
    }

    /// Registers a vector variable and returns one slot per component.
    pub fn add_vector(&mut self, name: &str, base_type: BaseType, len: u8) -> Vec<SlotId> {
        self.add_aggregate(name, base_type, Shape::Vector { len })
    }

    /// Registers a column-major matrix and returns one slot per cell.
    pub fn add_matrix(
        &mut self,
        name: &str,
        base_type: BaseType,
        columns: u8,
        rows: u8,
    ) -> Vec<SlotId> {
        self.add_aggregate(name, base_type, Shape::Matrix { columns, rows })
    }

    /// Registers the slot that carries a function's return value.
    ///
    /// The slot is named `[name].result`.
    pub fn add_result(&mut self, name: &str, base_type: BaseType) -> SlotId {
        self.push_slot(SlotInfo::scalar(format!("[{name}].result"), base_type))
    }

    /// Attaches program source text.
    pub fn source(&mut self, text: &str) -> &mut Self {
        self.doc.source = text.lines().map(str::to_string).collect();
        self
    }

    /// Appends an arbitrary op.
    pub fn push(&mut self, op: TraceOp) -> &mut Self {
        self.doc.ops.push(op);
        self
    }

    /// Appends a line marker.
    pub fn line(&mut self, line: u32) -> &mut Self {
        self.push(TraceOp::Line { line })
    }

    /// Appends a function entry.
    pub fn enter(&mut self, function: FunctionId) -> &mut Self {
        self.push(TraceOp::EnterFunction { function })
    }

    /// Appends a function exit without a result.
    pub fn exit(&mut self, function: FunctionId) -> &mut Self {
        self.push(TraceOp::ExitFunction {
            function,
            result: None,
        })
    }

    /// Appends a function exit that produces a result.
    pub fn exit_with(
        &mut self,
        function: FunctionId,
        slot: SlotId,
        value: impl Into<RawValue>,
    ) -> &mut Self {
        self.push(TraceOp::ExitFunction {
            function,
            result: Some(FunctionResult {
                slot,
                value: value.into(),
            }),
        })
    }

    /// Appends a scope entry.
    pub fn enter_scope(&mut self) -> &mut Self {
        self.push(TraceOp::EnterScope)
    }

    /// Appends a scope exit.
    pub fn exit_scope(&mut self) -> &mut Self {
        self.push(TraceOp::ExitScope)
    }

    /// Appends a slot write.
    pub fn write(&mut self, slot: SlotId, value: impl Into<RawValue>) -> &mut Self {
        self.push(TraceOp::SlotWrite {
            slot,
            value: value.into(),
        })
    }

    /// Finishes the document.
    #[must_use]
    pub fn build(&self) -> TraceDocument {
        self.doc.clone()
    }

    #[allow(clippy::cast_possible_truncation)]
    fn push_slot(&mut self, info: SlotInfo) -> SlotId {
        let id = SlotId::new(self.doc.slots.len() as u32);
        self.doc.slots.push(info);
        id
    }

    fn add_aggregate(&mut self, name: &str, base_type: BaseType, shape: Shape) -> Vec<SlotId> {
        #[allow(clippy::cast_possible_truncation)]
        let count = shape.component_count() as u8;
        (0..count)
            .map(|index| self.push_slot(SlotInfo::component(name, base_type, shape, index)))
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================
