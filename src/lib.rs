//! Decode RSS, RDF and Atom feeds into one model and re-emit them as
//! canonical RSS 2.0.
//!
//! ```
//! let rss = br#"<?xml version="1.0"?>
//! <rss version="2.0"><channel><title>News</title></channel></rss>"#;
//!
//! let feed = feedkit::decode_feed(rss)?;
//! assert_eq!(feed.title, "News");
//! # Ok::<(), feedkit::DecodeError>(())
//! ```

pub mod config;
pub mod feed;
pub mod util;

pub use config::Config;
pub use feed::{
    decode_feed, decode_feed_with, encode_feed, write_feed_file, DecodeError, Dialect,
    DialectError, EncodeError, Feed, Item,
};
