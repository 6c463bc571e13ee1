//! famtree: a family tree kept as one hierarchical document.
//!
//! Layers, innermost first:
//! - `domain`: the tree document, pure mutations and queries
//! - `application`: persistence, rendering, export, i18n and the editing session
//! - `infrastructure`: filesystem I/O and dependency wiring
//! - `cli`: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
