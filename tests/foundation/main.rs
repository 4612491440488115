//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: RawValue formatting, TraceDocument, and Error.
