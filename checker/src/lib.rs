//! The Opal declaration checker and evaluator core.
//!
//! This crate consumes already-resolved declarations and bodies: an external
//! parser and name resolver produce `hir` nodes with `types` database ids
//! attached, after which `type_check` verifies signatures and bodies, and
//! `eval` runs them in either checked or unchecked mode.
pub mod config;
pub mod diagnostics;
pub mod eval;
pub mod hir;
pub mod state;
pub mod type_check;
