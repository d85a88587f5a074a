//! Configuration management for the regform tool.
//!
//! This crate handles loading and saving `.regform/config.yaml` files,
//! discovering `.regform/` directories in the filesystem, and providing
//! typed access to configuration values.

pub mod config;
pub mod regform_dir;
