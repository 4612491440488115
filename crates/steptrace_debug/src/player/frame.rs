//! Call frames and the lexical scopes nested inside them.

use im::OrdSet;
use steptrace_foundation::{FunctionId, SlotId};

/// A stack of lexical scopes, each holding the slots declared in it.
///
/// The bottom scope is the frame's own body and is never popped. Result
/// slots surfaced by returning callees are tracked apart from the scopes so
/// they can be retired at the start of the next step.
#[derive(Clone, Debug)]
pub struct ScopeStack {
    scopes: Vec<OrdSet<SlotId>>,
    results: OrdSet<SlotId>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    /// Creates a stack holding only the body scope.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scopes: vec![OrdSet::new()],
            results: OrdSet::new(),
        }
    }

    /// Number of open scopes, counting the body scope.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Returns true if the slot is visible in any open scope or as a result.
    #[must_use]
    pub fn contains(&self, slot: SlotId) -> bool {
        self.results.contains(&slot) || self.scopes.iter().any(|s| s.contains(&slot))
    }

    /// Every visible slot, in ascending slot order.
    #[must_use]
    pub fn visible(&self) -> OrdSet<SlotId> {
        self.scopes
            .iter()
            .cloned()
            .fold(self.results.clone(), OrdSet::union)
    }

    /// Opens a nested scope.
    pub(crate) fn enter(&mut self) {
        self.scopes.push(OrdSet::new());
    }

    /// Closes the innermost scope, retiring its slots.
    ///
    /// Returns `false` if only the body scope is open.
    pub(crate) fn exit(&mut self) -> bool {
        if self.scopes.len() > 1 {
            self.scopes.pop();
            true
        } else {
            false
        }
    }

    /// Makes a written slot visible.
    ///
    /// A slot already visible in an outer scope stays where it was declared.
    pub(crate) fn declare(&mut self, slot: SlotId) {
        if self.scopes.iter().any(|s| s.contains(&slot)) {
            return;
        }
        if let Some(innermost) = self.scopes.last_mut() {
            innermost.insert(slot);
        }
    }

    /// Surfaces a callee's result slot.
    pub(crate) fn surface_result(&mut self, slot: SlotId, transient: bool) {
        if transient {
            self.results.insert(slot);
        } else {
            self.declare(slot);
        }
    }

    /// Retires every surfaced result slot.
    pub(crate) fn clear_results(&mut self) {
        self.results.clear();
    }
}

/// One active function invocation.
#[derive(Clone, Debug)]
pub struct Frame {
    function: FunctionId,
    line: Option<u32>,
    scopes: ScopeStack,
}

impl Frame {
    pub(crate) fn new(function: FunctionId) -> Self {
        Self {
            function,
            line: None,
            scopes: ScopeStack::new(),
        }
    }

    /// The function this frame is executing.
    #[must_use]
    pub fn function(&self) -> FunctionId {
        self.function
    }

    /// The last line reached in this frame.
    #[must_use]
    pub fn line(&self) -> Option<u32> {
        self.line
    }

    /// The frame's scopes.
    #[must_use]
    pub fn scopes(&self) -> &ScopeStack {
        &self.scopes
    }

    pub(crate) fn set_line(&mut self, line: u32) {
        self.line = Some(line);
    }

    pub(crate) fn scopes_mut(&mut self) -> &mut ScopeStack {
        &mut self.scopes
    }
}
