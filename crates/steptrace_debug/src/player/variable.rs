//! Variable snapshots returned by player queries.

use steptrace_foundation::{RawValue, SlotId, TraceDocument};

/// A visible slot and its current value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Variable {
    /// The slot holding the value.
    pub slot: SlotId,
    /// The last value written to the slot.
    pub value: RawValue,
    /// Whether the slot was written during the most recent step.
    pub dirty: bool,
}

impl Variable {
    /// The variable's name and component suffix, e.g. `c.y`.
    #[must_use]
    pub fn label(&self, doc: &TraceDocument) -> String {
        doc.slot_label(self.slot)
    }

    /// The value rendered as the slot's type.
    #[must_use]
    pub fn value_text(&self, doc: &TraceDocument) -> String {
        doc.slot_value_text(self.slot, self.value)
    }

    /// Renders `label = value`.
    #[must_use]
    pub fn describe(&self, doc: &TraceDocument) -> String {
        format!("{} = {}", self.label(doc), self.value_text(doc))
    }
}
