//! Feed decoding and encoding.
//!
//! This module turns syndication documents into one common model and back:
//!
//! - **Decoding**: RSS 2.0, RDF (RSS 1.0) and Atom bytes into a [`Feed`],
//!   whatever their declared encoding
//! - **Encoding**: any [`Feed`] into a canonical RSS 2.0 document
//! - **Dates**: the many date layouts found in the wild into
//!   `DateTime<FixedOffset>`
//!
//! # Architecture
//!
//! Decoding is a pipeline of small, pure steps:
//!
//! - [`encoding`] - reads the XML declaration and transcodes to UTF-8
//! - [`util::strip_invalid_xml_chars`](crate::util::strip_invalid_xml_chars) -
//!   drops code points XML 1.0 forbids
//! - [`prolog`] - rewrites the declaration of transcoded documents
//! - [`tree`] - parses the document once into an element tree
//! - [`rss`], [`rdf`], [`atom`] - decode the tree, tried in that order by [`decode`]
//! - [`timestamp`] - parses every date field
//!
//! # Example
//!
//! ```
//! use feedkit::feed::{decode_feed, encode_feed, Dialect};
//!
//! let atom = br#"<?xml version="1.0" encoding="utf-8"?>
//! <feed xmlns="http://www.w3.org/2005/Atom">
//!   <title>Example</title>
//!   <entry><id>1</id><title>Hello</title></entry>
//! </feed>"#;
//!
//! let feed = decode_feed(atom)?;
//! assert_eq!(feed.dialect, Dialect::Atom);
//! assert_eq!(feed.items[0].title, "Hello");
//!
//! let rss = String::from_utf8(encode_feed(&feed)?)?;
//! assert!(rss.contains("<title>Hello</title>"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod atom;
mod decode;
mod encode;
mod encoding;
mod error;
mod prolog;
mod rdf;
mod rss;
mod timestamp;
mod tree;
mod types;

pub use decode::{decode_feed, decode_feed_with};
pub use encode::{encode_feed, write_feed_file};
pub use error::{DecodeError, DialectError, EncodeError};
pub use prolog::CANONICAL_PROLOG;
pub use timestamp::{fallback_time, parse_timestamp, timestamp_or_fallback};
pub use types::{Dialect, Feed, Item};

/// Namespace of Atom elements, which RSS and RDF decoding ignore.
pub const ATOM_NAMESPACE: &str = "http://www.w3.org/2005/Atom";
