//! Validation of raw model output
//!
//! This module decides which generated lines become relations.

mod filter;

pub use filter::{accept_line, clean_line, filter_line, filter_output, is_allowed_char, MAX_NAME_TOKENS};
