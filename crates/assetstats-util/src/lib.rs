#![forbid(unsafe_code)]
//! Filesystem and text helpers for assetstats.

pub mod ansi;
pub mod error;
pub mod fs;
