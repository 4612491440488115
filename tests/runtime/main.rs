//! Integration tests for Layer 2: Runtime
//!
//! Saves recorded traces, loads them back, and replays the loaded copy.

use std::sync::Arc;

use steptrace_debug::Player;
use steptrace_foundation::{BaseType, ErrorKind, TraceDocument};
use steptrace_runtime::{from_bytes, load_from_file, save_to_file, to_bytes};

fn recorded() -> TraceDocument {
    let mut b = TraceDocument::builder();
    let main = b.add_function("float main()");
    let c = b.add_vector("c", BaseType::Float, 2);
    let ok = b.add_variable("ok", BaseType::Bool);
    let result = b.add_result("main", BaseType::Float);
    b.source("\nfloat main() {\n    float2 c = float2(0.5, -2);\n    bool ok = true;\n    return c.x;\n}");
    b.enter(main)
        .line(3)
        .write(c[0], 0.5f32)
        .write(c[1], -2.0f32)
        .line(4)
        .write(ok, true)
        .line(5)
        .exit_with(main, result, 0.5f32);
    b.build()
}

fn transcript(doc: TraceDocument) -> Vec<String> {
    let doc = Arc::new(doc);
    let mut player = Player::new(Arc::clone(&doc));
    let mut lines = Vec::new();
    while !player.is_exhausted() {
        player.step();
        let vars: Vec<_> = player
            .current_local_variables()
            .iter()
            .chain(player.global_variables().iter())
            .map(|v| v.describe(&doc))
            .collect();
        lines.push(format!("{:?}: {}", player.current_line(), vars.join(", ")));
    }
    lines
}

#[test]
fn loaded_trace_replays_identically() {
    let dir = std::env::temp_dir().join(format!("steptrace-runtime-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("replay.msgpack");

    let doc = recorded();
    save_to_file(&doc, &path).expect("save");
    let loaded = load_from_file(&path).expect("load");
    std::fs::remove_dir_all(&dir).ok();

    assert_eq!(loaded, doc);
    assert_eq!(loaded.source_line(3).map(str::trim), Some("float2 c = float2(0.5, -2);"));
    assert_eq!(transcript(loaded), transcript(doc));
}

#[test]
fn bytes_carry_names_and_values() {
    let doc = recorded();
    let bytes = to_bytes(&doc).expect("encode");
    let decoded = from_bytes(&bytes).expect("decode");

    let lines = transcript(decoded);
    assert_eq!(lines[1], "Some(4): c.x = 0.5, c.y = -2");
    assert_eq!(lines.last().map(String::as_str), Some("None: [main].result = 0.5"));
}

#[test]
fn truncated_bytes_are_rejected() {
    let bytes = to_bytes(&recorded()).expect("encode");
    let err = from_bytes(&bytes[..bytes.len() / 2]).expect_err("truncated");
    assert!(matches!(err.kind, ErrorKind::Serialization(_)));
}

#[test]
fn missing_file_reports_path() {
    let err = load_from_file("/nonexistent/steptrace/trace.msgpack").expect_err("missing");
    assert!(matches!(err.kind, ErrorKind::Io(_)));
    let path = err.context.and_then(|c| c.path).unwrap_or_default();
    assert!(path.contains("trace.msgpack"));
}
