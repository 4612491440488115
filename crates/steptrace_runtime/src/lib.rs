//! Trace document persistence for steptrace.
//!
//! The player consumes documents in memory; this crate moves them to and
//! from `MessagePack` so a recording can be captured once and replayed later.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod serialize;

pub use serialize::{from_bytes, load_from_file, save_to_file, to_bytes};
