//! Property tests over randomly generated, well-formed traces.
//!
//! Programs are generated as nested statements and lowered to ops the way a
//! trace producer would: every call site emits its line marker before the
//! call and again once the callee returns.

use std::collections::BTreeSet;
use std::sync::Arc;

use proptest::prelude::*;
use steptrace_debug::{Player, PlayerState, StopReason, Variable};
use steptrace_foundation::{
    BaseType, FunctionId, SlotId, TraceDocument, TraceDocumentBuilder, TraceOp,
};

// =============================================================================
// Program Generators
// =============================================================================

const VARIABLES: usize = 6;

#[derive(Clone, Debug)]
enum Stmt {
    Assign { line: u32, slot: usize, value: i32 },
    Block(Vec<Stmt>),
    Call { line: u32, body: Vec<Stmt> },
}

fn stmt() -> impl Strategy<Value = Stmt> {
    let assign = (1u32..40, 0..VARIABLES, any::<i32>())
        .prop_map(|(line, slot, value)| Stmt::Assign { line, slot, value });

    assign.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Stmt::Block),
            (1u32..40, prop::collection::vec(inner, 0..4))
                .prop_map(|(line, body)| Stmt::Call { line, body }),
        ]
    })
}

fn program() -> impl Strategy<Value = Arc<TraceDocument>> {
    prop::collection::vec(stmt(), 0..6).prop_map(|body| {
        let mut b = TraceDocument::builder();
        let vars: Vec<_> = (0..VARIABLES)
            .map(|i| b.add_variable(format!("v{i}"), BaseType::Int))
            .collect();
        let main = b.add_function("int main()");
        let result = b.add_result("main", BaseType::Int);
        b.enter(main);
        lower(&mut b, &vars, &body);
        b.exit_with(main, result, 0);
        Arc::new(b.build())
    })
}

fn lower(b: &mut TraceDocumentBuilder, vars: &[SlotId], body: &[Stmt]) {
    for stmt in body {
        match stmt {
            Stmt::Assign { line, slot, value } => {
                b.line(*line).write(vars[*slot], *value);
            }
            Stmt::Block(inner) => {
                b.enter_scope();
                lower(b, vars, inner);
                b.exit_scope();
            }
            Stmt::Call { line, body } => {
                let callee = b.add_function(format!("int f{line}()"));
                let result = b.add_result(&format!("f{line}"), BaseType::Int);
                b.line(*line).enter(callee);
                lower(b, vars, body);
                b.exit_with(callee, result, *line as i32).line(*line);
            }
        }
    }
}

// =============================================================================
// Observations
// =============================================================================

/// Everything a debugger UI would display after a step.
#[derive(Debug, PartialEq)]
struct Snapshot {
    reason: StopReason,
    cursor: usize,
    line: Option<u32>,
    stack: Vec<FunctionId>,
    locals: Vec<Variable>,
    globals: Vec<Variable>,
}

fn snapshot(player: &Player, reason: StopReason) -> Snapshot {
    Snapshot {
        reason,
        cursor: player.cursor(),
        line: player.current_line(),
        stack: player.call_stack(),
        locals: player.current_local_variables(),
        globals: player.global_variables(),
    }
}

fn play_to_end(player: &mut Player) -> Vec<Snapshot> {
    let mut seen = Vec::new();
    while !player.is_exhausted() {
        let reason = player.step();
        seen.push(snapshot(player, reason));
    }
    seen
}

/// Slot and value pairs, ignoring dirty flags.
fn values(vars: &[Variable]) -> Vec<(SlotId, u32)> {
    vars.iter().map(|v| (v.slot, v.value.bits())).collect()
}

/// Slots written by the ops in `range`.
fn written(doc: &TraceDocument, range: std::ops::Range<usize>) -> BTreeSet<SlotId> {
    doc.ops()[range]
        .iter()
        .filter_map(|op| match op {
            TraceOp::SlotWrite { slot, .. } => Some(*slot),
            TraceOp::ExitFunction {
                result: Some(result),
                ..
            } => Some(result.slot),
            _ => None,
        })
        .collect()
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn generated_traces_validate(doc in program()) {
        prop_assert!(doc.validate().is_ok());
    }

    #[test]
    fn line_is_known_exactly_when_a_frame_is_active(doc in program()) {
        let mut player = Player::new(doc);
        while !player.is_exhausted() {
            player.step();
            prop_assert_eq!(player.current_line().is_none(), player.call_stack().is_empty());
        }
        prop_assert_eq!(player.state(), PlayerState::Completed);
    }

    #[test]
    fn completion_is_idempotent(doc in program()) {
        let mut player = Player::new(doc);
        let last = play_to_end(&mut player).pop();
        let cursor = player.cursor();

        prop_assert_eq!(player.step(), StopReason::Completed);
        prop_assert_eq!(player.step_over(), StopReason::Completed);
        prop_assert_eq!(player.step_out(), StopReason::Completed);
        prop_assert_eq!(player.cursor(), cursor);
        if let Some(last) = last {
            prop_assert_eq!(snapshot(&player, StopReason::Completed), last);
        }
    }

    #[test]
    fn replay_is_deterministic(doc in program()) {
        let mut player = Player::new(Arc::clone(&doc));
        let first = play_to_end(&mut player);

        player.rewind();
        let second = play_to_end(&mut player);
        prop_assert_eq!(&first, &second);

        let mut fresh = Player::new(doc);
        prop_assert_eq!(play_to_end(&mut fresh), first);
    }

    #[test]
    fn step_over_matches_repeated_steps(doc in program()) {
        let mut player = Player::new(doc);
        while !player.is_exhausted() {
            player.step();
            if player.is_exhausted() {
                break;
            }
            let depth = player.stack_depth();

            let mut over = player.clone();
            over.step_over();

            let mut stepped = player.clone();
            loop {
                stepped.step();
                if stepped.is_exhausted() || stepped.stack_depth() <= depth {
                    break;
                }
            }

            prop_assert_eq!(over.cursor(), stepped.cursor());
            prop_assert_eq!(over.current_line(), stepped.current_line());
            prop_assert_eq!(over.call_stack(), stepped.call_stack());
            prop_assert_eq!(
                values(&over.current_local_variables()),
                values(&stepped.current_local_variables())
            );
            prop_assert_eq!(
                values(&over.global_variables()),
                values(&stepped.global_variables())
            );
        }
    }

    #[test]
    fn step_out_pops_exactly_one_frame(doc in program()) {
        let mut player = Player::new(doc);
        while !player.is_exhausted() {
            player.step();
            let depth = player.stack_depth();
            if depth == 0 {
                continue;
            }

            let mut out = player.clone();
            match out.step_out() {
                StopReason::Line(_) => prop_assert_eq!(out.stack_depth(), depth - 1),
                StopReason::Completed => prop_assert_eq!(depth, 1),
                StopReason::Exhausted => prop_assert!(false, "well-formed trace exhausted"),
            }
        }
    }

    #[test]
    fn dirty_slots_are_exactly_the_last_step_writes(doc in program()) {
        let mut player = Player::new(Arc::clone(&doc));
        while !player.is_exhausted() {
            let before = player.cursor();
            player.step();
            let expected = written(&doc, before..player.cursor());
            let dirty: BTreeSet<_> = player.dirty_slots().into_iter().collect();
            prop_assert_eq!(dirty, expected);
        }
    }
}
