//! GitHub Contents API module.
//!
//! The repository file is the source of truth for all application data.

mod client;

pub use client::*;
