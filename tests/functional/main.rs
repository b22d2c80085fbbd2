// Test code is allowed to panic on failure
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic,
    clippy::string_slice
)]

//! Functional tests for webhook registration reconciliation.
//!
//! These tests drive the real reconciler against an in-memory registration
//! store — no cluster required.
//!
//! ```bash
//! # Run all functional tests
//! cargo test --test functional
//!
//! # Run with verbose output
//! cargo test --test functional -- --nocapture
//! ```
//!
//! ## Test Categories
//!
//! - **Reconcile tests**: create, conflict-then-update, metadata merging,
//!   behavior-block replacement, idempotence, and the error paths
//! - **Property tests**: dispatch-path construction and merge-patch
//!   round-trips over generated inputs

mod prop_tests;

pub use fake_store::*;
