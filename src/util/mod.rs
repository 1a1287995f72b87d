//! Utility functions for common operations.
//!
//! This module provides reusable utilities for:
//!
//! - **Text sanitization**: dropping code points that XML 1.0 forbids before
//!   a document reaches the XML reader, and replacing them in text the
//!   encoder writes
//!
//! # Examples
//!
//! ```
//! use feedkit::util::{is_xml_char, strip_invalid_xml_chars};
//!
//! assert!(!is_xml_char('\u{b}'));
//! assert_eq!(strip_invalid_xml_chars(b"<a>x\x0by</a>"), "<a>xy</a>");
//! ```

mod text;

pub use text::{is_xml_char, replace_invalid_xml_chars, strip_invalid_xml_chars};
