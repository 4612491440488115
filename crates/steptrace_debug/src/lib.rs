//! Stepping, call stack reconstruction, and variable inspection for steptrace.
//!
//! This crate provides:
//! - `Player` - Step, step-over, and step-out over a recorded trace
//! - `PlayerConfig` - Variable ordering and result retention
//! - `TraceFormatter` - Human-readable and JSON trace listings

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod player;
pub mod trace;

pub use config::{PlayerConfig, VariableOrder};
pub use player::{Frame, Player, PlayerState, ScopeStack, StopReason, Variable};
pub use trace::{HumanFormatter, JsonFormatter, TraceFormatter};
