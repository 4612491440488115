//! Trace listings for a document's op log.
//!
//! A listing is a static view of the whole recording, independent of any
//! player position. It is what a debugging UI shows in its "raw trace" pane.
//!
//! # Example
//!
//! ```text
//! enter int main()
//!   line 3: int a = 123;
//!   a = 123
//! exit int main() -> [main].result = 123
//! ```

pub mod format;

pub use format::{HumanFormatter, JsonFormatter, TraceFormatter};
