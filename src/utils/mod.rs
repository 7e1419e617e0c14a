//! Utility functions.
//!
//! This module provides:
//! - Record id and share token generation
//! - CSS selector and regex compilation for static patterns

mod ids;
mod selector;

pub use ids::{new_record_id, new_share_token};
pub use selector::{compile_regex_unsafe, parse_selector_unsafe};
