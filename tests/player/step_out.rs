//! Leaving a function part way through its body.

use std::sync::Arc;

use steptrace_debug::{Player, StopReason};
use steptrace_foundation::{BaseType, TraceDocument};

use crate::support::{globals, locals, stack_string};

//                          // Line 1
// int fn() {               // Line 2
//     int a = 11;          // Line 3
//     int b = a + 11;      // Line 4
//     int c = b + 11;      // Line 5
//     int d = c + 11;      // Line 6
//     return d;            // Line 7
// }                        // Line 8
// int main() {             // Line 9
//     return fn();         // Line 10
// }                        // Line 11
fn four_locals() -> Arc<TraceDocument> {
    let mut b = TraceDocument::builder();
    let main = b.add_function("int main()");
    let callee = b.add_function("int fn()");
    let vars: Vec<_> = ["a", "b", "c", "d"]
        .into_iter()
        .map(|name| b.add_variable(name, BaseType::Int))
        .collect();
    let fn_result = b.add_result("fn", BaseType::Int);
    let main_result = b.add_result("main", BaseType::Int);

    b.enter(main).line(10).enter(callee);
    for ((line, slot), value) in (3u32..).zip(&vars).zip([11, 22, 33, 44]) {
        b.line(line).write(*slot, value);
    }
    b.line(7)
        .exit_with(callee, fn_result, 44)
        .line(10)
        .exit_with(main, main_result, 44);
    Arc::new(b.build())
}

#[test]
fn step_out_returns_to_caller_line() {
    let mut player = Player::new(four_locals());

    player.step();
    assert_eq!(player.current_line(), Some(10));
    assert_eq!(stack_string(&player), "int main()");

    player.step();
    assert_eq!(player.current_line(), Some(3));
    assert_eq!(stack_string(&player), "int main() -> int fn()");
    assert_eq!(locals(&player), "");

    player.step();
    assert_eq!(player.current_line(), Some(4));
    assert_eq!(locals(&player), "##a = 11");

    player.step();
    assert_eq!(player.current_line(), Some(5));
    assert_eq!(locals(&player), "a = 11, ##b = 22");

    assert_eq!(player.step_out(), StopReason::Line(10));
    assert_eq!(stack_string(&player), "int main()");
    assert_eq!(locals(&player), "##[fn].result = 44");

    assert_eq!(player.step_out(), StopReason::Completed);
    assert!(player.trace_has_completed());
    assert_eq!(globals(&player), "##[main].result = 44");
}

#[test]
fn step_out_marks_everything_written_on_the_way() {
    let mut player = Player::new(four_locals());
    player.step();
    player.step();
    player.step_out();

    let dirty: Vec<_> = player
        .dirty_slots()
        .iter()
        .map(|slot| player.document().slot_label(*slot))
        .collect();
    assert_eq!(dirty, ["a", "b", "c", "d", "[fn].result"]);
}
