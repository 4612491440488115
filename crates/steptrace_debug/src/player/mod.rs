//! Stepping debugger over a recorded trace.
//!
//! The [`Player`] replays a [`TraceDocument`] one source line at a time,
//! rebuilding the call stack, lexical scopes, and variable values as it
//! goes. It never fails: ids outside the document's directories are logged
//! and rendered as placeholders, and stepping past the end is a no-op.
//!
//! # Example
//!
//! ```text
//! let mut player = Player::new(doc);
//! player.step();                ;; stop at the first line of main
//! player.step_over();           ;; run any calls on this line to completion
//! player.step_out();            ;; finish the current function
//! player.local_variables(0)     ;; inspect the outermost frame
//! ```

pub mod frame;
pub mod variable;

pub use frame::{Frame, ScopeStack};
pub use variable::Variable;

use std::fmt;
use std::sync::Arc;

use im::{OrdMap, OrdSet};
use steptrace_foundation::{FunctionId, RawValue, SlotId, TraceDocument, TraceOp};

use crate::config::{PlayerConfig, VariableOrder};

const LOG_TARGET: &str = "steptrace::player";

// =============================================================================
// Player State
// =============================================================================

/// Coarse lifecycle state of a player.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlayerState {
    /// No op has been consumed since the last reset.
    NotStarted,
    /// Ops have been consumed and the trace has not completed.
    Running,
    /// Every op has been consumed and no frame is active.
    Completed,
}

impl fmt::Display for PlayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => write!(f, "not-started"),
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// Where a step-family call stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// Stopped at a line marker.
    Line(u32),
    /// The trace ran out with no frame active.
    Completed,
    /// The trace ran out while frames were still active.
    Exhausted,
}

/// Navigation mode for a single step-family call.
#[derive(Copy, Clone, Debug)]
enum StepMode {
    /// Stop at the next line, at any depth.
    Into,
    /// Stop at the next line reached at or above `depth`.
    Over { depth: usize },
    /// Stop at the next line reached above `depth`.
    Out { depth: usize },
}

impl StepMode {
    fn stops(self, depth_before: usize, depth_after: usize) -> bool {
        match self {
            Self::Into => true,
            Self::Over { depth } => depth_before <= depth,
            Self::Out { depth } => depth_after < depth,
        }
    }
}

// =============================================================================
// Player
// =============================================================================

/// Replays a trace document with debugger semantics.
///
/// Cloning a player is cheap and yields an independent snapshot that shares
/// the same document.
#[derive(Clone, Debug)]
pub struct Player {
    doc: Arc<TraceDocument>,
    config: PlayerConfig,
    /// Index of the next unconsumed op.
    cursor: usize,
    stack: Vec<Frame>,
    /// Slots written while no frame was active, plus outermost results.
    globals: ScopeStack,
    values: OrdMap<SlotId, RawValue>,
    /// Cursor position of each slot's most recent write.
    write_times: OrdMap<SlotId, usize>,
    dirty: OrdSet<SlotId>,
    /// Line markers still ahead of the cursor, per line.
    pending_lines: OrdMap<u32, usize>,
}

impl Player {
    /// Creates a player positioned before the first op of `doc`.
    #[must_use]
    pub fn new(doc: Arc<TraceDocument>) -> Self {
        Self::with_config(doc, PlayerConfig::default())
    }

    /// Creates a player with a custom configuration.
    #[must_use]
    pub fn with_config(doc: Arc<TraceDocument>, config: PlayerConfig) -> Self {
        let mut player = Self {
            doc: Arc::clone(&doc),
            config,
            cursor: 0,
            stack: Vec::new(),
            globals: ScopeStack::new(),
            values: OrdMap::new(),
            write_times: OrdMap::new(),
            dirty: OrdSet::new(),
            pending_lines: OrdMap::new(),
        };
        player.reset(doc);
        player
    }

    /// Discards all state and starts over on `doc`.
    pub fn reset(&mut self, doc: Arc<TraceDocument>) {
        self.doc = doc;
        self.cursor = 0;
        self.stack.clear();
        self.globals = ScopeStack::new();
        self.values = OrdMap::new();
        self.write_times = OrdMap::new();
        self.dirty = OrdSet::new();
        self.pending_lines = OrdMap::new();
        for line in self.doc.ops().iter().filter_map(TraceOp::line) {
            let count = self.pending_lines.get(&line).copied().unwrap_or(0);
            self.pending_lines.insert(line, count + 1);
        }
        log::debug!(
            target: LOG_TARGET,
            "reset: {} ops, {} functions, {} slots",
            self.doc.len(),
            self.doc.functions().len(),
            self.doc.slots().len()
        );
    }

    /// Starts over on the current document.
    pub fn rewind(&mut self) {
        let doc = Arc::clone(&self.doc);
        self.reset(doc);
    }

    /// Returns the document being replayed.
    #[must_use]
    pub fn document(&self) -> &Arc<TraceDocument> {
        &self.doc
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Runs up to and including the next line marker, diving into calls.
    pub fn step(&mut self) -> StopReason {
        self.run(StepMode::Into)
    }

    /// Runs to the next line marker at the current depth or shallower.
    ///
    /// Calls made along the way execute in full without stopping. With no
    /// frame active yet, this enters the first function like [`step`].
    ///
    /// [`step`]: Player::step
    pub fn step_over(&mut self) -> StopReason {
        let depth = self.stack.len().max(1);
        self.run(StepMode::Over { depth })
    }

    /// Runs until the innermost frame returns, stopping at the caller's
    /// next line marker or at the end of the trace.
    pub fn step_out(&mut self) -> StopReason {
        let depth = self.stack.len();
        self.run(StepMode::Out { depth })
    }

    fn run(&mut self, mode: StepMode) -> StopReason {
        if self.is_exhausted() {
            return self.end_reason();
        }
        self.tidy();

        let doc = Arc::clone(&self.doc);
        while let Some(op) = doc.op(self.cursor) {
            let position = self.cursor;
            let depth_before = self.stack.len();
            self.cursor += 1;

            let Some(line) = self.apply(position, op) else {
                continue;
            };
            if mode.stops(depth_before, self.stack.len()) {
                log::debug!(
                    target: LOG_TARGET,
                    "{mode:?} stopped at line {line}, depth {}, cursor {}",
                    self.stack.len(),
                    self.cursor
                );
                return StopReason::Line(line);
            }
        }

        let reason = self.end_reason();
        log::debug!(target: LOG_TARGET, "{mode:?} ran off the end: {reason:?}");
        reason
    }

    /// Clears per-step state before a step-family call.
    fn tidy(&mut self) {
        self.dirty.clear();
        if !self.config.keep_results {
            self.globals.clear_results();
            for frame in &mut self.stack {
                frame.scopes_mut().clear_results();
            }
        }
    }

    fn end_reason(&self) -> StopReason {
        if self.stack.is_empty() {
            StopReason::Completed
        } else {
            StopReason::Exhausted
        }
    }

    /// Applies one op; returns the line if it was a line marker.
    fn apply(&mut self, position: usize, op: &TraceOp) -> Option<u32> {
        log::trace!(target: LOG_TARGET, "op #{position}: {op:?}");
        match *op {
            TraceOp::Line { line } => {
                if let Some(frame) = self.stack.last_mut() {
                    frame.set_line(line);
                }
                let remaining = self
                    .pending_lines
                    .get(&line)
                    .map_or(0, |count| count.saturating_sub(1));
                if remaining == 0 {
                    self.pending_lines.remove(&line);
                } else {
                    self.pending_lines.insert(line, remaining);
                }
                return Some(line);
            }
            TraceOp::EnterFunction { function } => {
                if self.doc.function(function).is_none() {
                    self.warn_unknown_function(position, function);
                }
                self.stack.push(Frame::new(function));
            }
            TraceOp::ExitFunction { function, result } => {
                match self.stack.pop() {
                    Some(frame) if frame.function() != function => log::warn!(
                        target: LOG_TARGET,
                        "op #{position}: exit from {function} while {} is active",
                        frame.function()
                    ),
                    Some(_) => {}
                    None => log::warn!(
                        target: LOG_TARGET,
                        "op #{position}: exit from {function} with no active frame"
                    ),
                }
                if let Some(result) = result {
                    self.record_write(position, result.slot, result.value);
                    let transient = !self.config.keep_results;
                    self.current_scopes_mut()
                        .surface_result(result.slot, transient);
                }
            }
            TraceOp::EnterScope => self.current_scopes_mut().enter(),
            TraceOp::ExitScope => {
                if !self.current_scopes_mut().exit() {
                    log::warn!(target: LOG_TARGET, "op #{position}: scope exit with no open scope");
                }
            }
            TraceOp::SlotWrite { slot, value } => {
                self.record_write(position, slot, value);
                self.current_scopes_mut().declare(slot);
            }
        }
        None
    }

    fn record_write(&mut self, position: usize, slot: SlotId, value: RawValue) {
        if self.doc.slot(slot).is_none() {
            log::warn!(
                target: LOG_TARGET,
                "op #{position}: write to {slot} outside the slot directory ({} entries)",
                self.doc.slots().len()
            );
        }
        self.values.insert(slot, value);
        self.write_times.insert(slot, position);
        self.dirty.insert(slot);
    }

    fn current_scopes_mut(&mut self) -> &mut ScopeStack {
        match self.stack.last_mut() {
            Some(frame) => frame.scopes_mut(),
            None => &mut self.globals,
        }
    }

    fn warn_unknown_function(&self, position: usize, function: FunctionId) {
        log::warn!(
            target: LOG_TARGET,
            "op #{position}: {function} outside the function directory ({} entries)",
            self.doc.functions().len()
        );
    }

    // -------------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------------

    /// Index of the next unconsumed op.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns true once every op is consumed.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.doc.len()
    }

    /// Returns true once every op is consumed and no frame is active.
    #[must_use]
    pub fn trace_has_completed(&self) -> bool {
        self.is_exhausted() && self.stack.is_empty()
    }

    /// Coarse lifecycle state.
    #[must_use]
    pub fn state(&self) -> PlayerState {
        if self.trace_has_completed() {
            PlayerState::Completed
        } else if self.cursor == 0 {
            PlayerState::NotStarted
        } else {
            PlayerState::Running
        }
    }

    /// The line the innermost frame last reached, or `None` with no frame.
    #[must_use]
    pub fn current_line(&self) -> Option<u32> {
        self.stack.last().and_then(Frame::line)
    }

    /// Source text of the current line, if the document carries source.
    #[must_use]
    pub fn current_source_line(&self) -> Option<&str> {
        self.current_line()
            .and_then(|line| self.doc.source_line(line))
    }

    /// Active functions, outermost first.
    #[must_use]
    pub fn call_stack(&self) -> Vec<FunctionId> {
        self.stack.iter().map(Frame::function).collect()
    }

    /// Active frames, outermost first.
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.stack
    }

    /// Number of active frames.
    #[must_use]
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Visible global slots.
    #[must_use]
    pub fn global_variables(&self) -> Vec<Variable> {
        self.variables(&self.globals.visible())
    }

    /// Slots visible in one frame's own scopes; 0 is the outermost frame.
    ///
    /// Returns an empty list for a frame index outside the stack.
    #[must_use]
    pub fn local_variables(&self, frame: usize) -> Vec<Variable> {
        self.stack
            .get(frame)
            .map_or_else(Vec::new, |f| self.variables(&f.scopes().visible()))
    }

    /// Slots visible in the innermost frame.
    #[must_use]
    pub fn current_local_variables(&self) -> Vec<Variable> {
        match self.stack.len() {
            0 => Vec::new(),
            depth => self.local_variables(depth - 1),
        }
    }

    /// Slots written during the most recent step-family call.
    #[must_use]
    pub fn dirty_slots(&self) -> Vec<SlotId> {
        self.dirty.iter().copied().collect()
    }

    /// The last value written to a slot, visible or not.
    #[must_use]
    pub fn slot_value(&self, slot: SlotId) -> Option<RawValue> {
        self.values.get(&slot).copied()
    }

    /// How many more times each line will be reached from the cursor on.
    ///
    /// Lines never reached again are absent.
    pub fn pending_line_hits(&self) -> impl Iterator<Item = (u32, usize)> + '_ {
        self.pending_lines.iter().map(|(line, count)| (*line, *count))
    }

    /// Returns true if a line marker for `line` lies ahead of the cursor.
    #[must_use]
    pub fn will_reach_line(&self, line: u32) -> bool {
        self.pending_lines.contains_key(&line)
    }

    fn variables(&self, visible: &OrdSet<SlotId>) -> Vec<Variable> {
        let mut vars: Vec<Variable> = visible
            .iter()
            .map(|&slot| Variable {
                slot,
                value: self.values.get(&slot).copied().unwrap_or_default(),
                dirty: self.dirty.contains(&slot),
            })
            .collect();

        if self.config.variable_order == VariableOrder::RecentlyWritten {
            vars.sort_by_key(|v| std::cmp::Reverse(self.write_times.get(&v.slot).copied()));
        }
        vars
    }
}

// =============================================================================
// Tests
// =============================================================================
