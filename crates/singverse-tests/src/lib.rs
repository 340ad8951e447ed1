//! SingTheVerse End-to-End Test Infrastructure
//!
//! This crate provides integration tests for the reader's critical flows:
//!
//! - Data: raw source -> normalized, validated, cached verse data
//! - Reader: references, routes, search, last position
//! - **Determinism**: identical verses and settings give byte-identical
//!   melodies and rendered files
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p singverse-tests
//! ```

pub mod determinism;
pub mod fixtures;
