//! SingTheVerse CLI library.
//!
//! This crate provides the core functionality for the `singverse` binary:
//! configuration, the offline cache, verse data acquisition, the persisted
//! reader position, and the command implementations.

pub mod cache;
pub mod commands;
pub mod config;
pub mod logging;
pub mod source;
pub mod state;
