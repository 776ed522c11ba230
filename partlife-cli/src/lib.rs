//! Partlife CLI Library
//!
//! Argument-to-draft conversion and terminal rendering used by the
//! `partlife` binary (main.rs).

pub mod draft_args;
pub mod render;
