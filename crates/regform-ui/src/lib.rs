//! Terminal UI helpers for the regform CLI.
//!
//! Provides Ayu-themed color styling and terminal detection.

pub mod styles;
pub mod terminal;
