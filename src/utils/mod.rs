//! Utility functions.
//!
//! This module provides:
//! - CSS selector parsing utilities
//! - Character-safe truncation and whitespace collapsing

mod selector;
mod text;

pub use selector::parse_selector_unsafe;
pub use text::{collapse_whitespace, prefix_chars, truncate_chars};
