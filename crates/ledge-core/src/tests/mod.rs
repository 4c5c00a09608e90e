//! Test module for determinism and scenario tests.
//!
//! These tests drive whole players through worlds tick by tick:
//! - **Determinism tests**: Verify identical input scripts produce identical state
//! - **Scenario tests**: Jumps, coyote time, buffering, bounces, slopes and triggers
//! - **Helper functions**: Utilities for test setup
//!
//! # Test Structure
//!
//! - `determinism.rs`: Tests that verify deterministic execution
//! - `scenarios.rs`: End-to-end movement scenarios
//! - `helpers.rs`: Test setup utilities and factory functions

mod helpers;

// Re-export for convenience
pub use helpers::*;
