//! Rendering helpers shared by the player tests.
//!
//! Dirty variables are prefixed with `##` so a single string captures both
//! values and what changed on the last step.

use steptrace_debug::{Player, Variable};
use steptrace_foundation::TraceDocument;

/// Renders the call stack as `outer -> inner`.
pub fn stack_string(player: &Player) -> String {
    let doc = player.document();
    player
        .call_stack()
        .iter()
        .map(|f| doc.function_name(*f))
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Renders variables as `name = value`, dirty ones prefixed with `##`.
pub fn vars_string(doc: &TraceDocument, vars: &[Variable]) -> String {
    vars.iter()
        .map(|v| {
            let marker = if v.dirty { "##" } else { "" };
            format!("{marker}{}", v.describe(doc))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Renders the innermost frame's locals.
pub fn locals(player: &Player) -> String {
    vars_string(player.document(), &player.current_local_variables())
}

/// Renders the globals.
pub fn globals(player: &Player) -> String {
    vars_string(player.document(), &player.global_variables())
}
