//! # cascade-common
//!
//! Shared types, error definitions, configuration models, and constants
//! used across the entire Cascade workspace.
//!
//! This crate is the leaf of the dependency graph: it depends on no other
//! internal crate and provides the primitives that the resolver, the
//! pipeline renderer, and the CLI all build upon.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
