//! Trace listing formatters.
//!
//! Provides human-readable and JSON renderings of a document's op log, with
//! function and slot ids resolved to names.

use steptrace_foundation::{FunctionResult, RawValue, SlotId, TraceDocument, TraceOp};

// =============================================================================
// Trace Formatter Trait
// =============================================================================

/// Trait for rendering trace ops.
pub trait TraceFormatter {
    /// Formats one op found at `position` in `doc`.
    fn format(&self, position: usize, op: &TraceOp, doc: &TraceDocument) -> String;

    /// Formats every op of a document.
    fn format_document(&self, doc: &TraceDocument) -> String {
        doc.ops()
            .iter()
            .enumerate()
            .map(|(position, op)| self.format(position, op, doc))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// =============================================================================
// Human-Readable Formatter
// =============================================================================

/// Formats trace ops in human-readable form.
#[derive(Clone, Debug, Default)]
pub struct HumanFormatter {
    /// Whether to prefix each op with its position.
    pub show_indices: bool,
    /// Whether to indent ops by call and scope nesting.
    pub indent: bool,
}

impl HumanFormatter {
    /// Creates a new human formatter with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to show op positions.
    #[must_use]
    pub fn with_indices(mut self) -> Self {
        self.show_indices = true;
        self
    }

    /// Builder method to indent by nesting depth.
    #[must_use]
    pub fn with_indent(mut self) -> Self {
        self.indent = true;
        self
    }

    fn describe(op: &TraceOp, doc: &TraceDocument) -> String {
        match op {
            TraceOp::Line { line } => match doc.source_line(*line) {
                Some(text) => format!("line {line}: {}", text.trim()),
                None => format!("line {line}"),
            },
            TraceOp::EnterFunction { function } => {
                format!("enter {}", doc.function_name(*function))
            }
            TraceOp::ExitFunction { function, result } => {
                let name = doc.function_name(*function);
                match result {
                    Some(FunctionResult { slot, value }) => format!(
                        "exit {name} -> {} = {}",
                        doc.slot_label(*slot),
                        doc.slot_value_text(*slot, *value)
                    ),
                    None => format!("exit {name}"),
                }
            }
            TraceOp::EnterScope => "scope +1".to_string(),
            TraceOp::ExitScope => "scope -1".to_string(),
            TraceOp::SlotWrite { slot, value } => format!(
                "{} = {}",
                doc.slot_label(*slot),
                doc.slot_value_text(*slot, *value)
            ),
        }
    }

    fn prefix(&self, position: usize) -> String {
        if self.show_indices {
            format!("[{position:06}] ")
        } else {
            String::new()
        }
    }
}

impl TraceFormatter for HumanFormatter {
    fn format(&self, position: usize, op: &TraceOp, doc: &TraceDocument) -> String {
        format!("{}{}", self.prefix(position), Self::describe(op, doc))
    }

    fn format_document(&self, doc: &TraceDocument) -> String {
        let mut depth = 0usize;
        let mut lines = Vec::with_capacity(doc.len());

        for (position, op) in doc.ops().iter().enumerate() {
            // Closing ops dedent before they print.
            if matches!(op, TraceOp::ExitFunction { .. } | TraceOp::ExitScope) {
                depth = depth.saturating_sub(1);
            }
            let indent = if self.indent {
                "  ".repeat(depth)
            } else {
                String::new()
            };
            lines.push(format!(
                "{}{indent}{}",
                self.prefix(position),
                Self::describe(op, doc)
            ));
            if matches!(op, TraceOp::EnterFunction { .. } | TraceOp::EnterScope) {
                depth += 1;
            }
        }

        lines.join("\n")
    }
}

// =============================================================================
// JSON Formatter
// =============================================================================

/// Formats trace ops as JSON.
#[derive(Clone, Debug, Default)]
pub struct JsonFormatter {
    /// Whether to pretty-print the document array.
    pub pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method for pretty printing.
    #[must_use]
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Escapes a string for JSON.
    fn escape_string(s: &str) -> String {
        s.replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    fn slot_fields(doc: &TraceDocument, slot: SlotId, value: RawValue) -> String {
        format!(
            "\"slot\":{},\"name\":\"{}\",\"value\":\"{}\"",
            slot.0,
            Self::escape_string(&doc.slot_label(slot)),
            Self::escape_string(&doc.slot_value_text(slot, value))
        )
    }
}

impl TraceFormatter for JsonFormatter {
    fn format(&self, position: usize, op: &TraceOp, doc: &TraceDocument) -> String {
        let op_data = match op {
            TraceOp::Line { line } => format!("\"line\":{line}"),
            TraceOp::EnterFunction { function } => format!(
                "\"function\":{},\"name\":\"{}\"",
                function.0,
                Self::escape_string(doc.function_name(*function))
            ),
            TraceOp::ExitFunction { function, result } => {
                let result_json = result
                    .map(|r| format!(",\"result\":{{{}}}", Self::slot_fields(doc, r.slot, r.value)))
                    .unwrap_or_default();
                format!(
                    "\"function\":{},\"name\":\"{}\"{result_json}",
                    function.0,
                    Self::escape_string(doc.function_name(*function))
                )
            }
            TraceOp::EnterScope | TraceOp::ExitScope => String::new(),
            TraceOp::SlotWrite { slot, value } => Self::slot_fields(doc, *slot, *value),
        };

        let separator = if op_data.is_empty() { "" } else { "," };
        format!(
            "{{\"index\":{position},\"type\":\"{}\"{separator}{op_data}}}",
            op.op_type()
        )
    }

    fn format_document(&self, doc: &TraceDocument) -> String {
        let items: Vec<_> = doc
            .ops()
            .iter()
            .enumerate()
            .map(|(position, op)| self.format(position, op, doc))
            .collect();
        if self.pretty {
            format!("[\n  {}\n]", items.join(",\n  "))
        } else {
            format!("[{}]", items.join(","))
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
