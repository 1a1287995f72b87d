use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Which grammar a document was decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Dialect {
    /// RSS 2.0 (`<rss><channel>`)
    #[default]
    Rss,
    /// RDF Site Summary, a.k.a. RSS 1.0 (`<rdf:RDF>`)
    Rdf,
    /// Atom, RFC 4287 (`<feed xmlns="http://www.w3.org/2005/Atom">`)
    Atom,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dialect::Rss => "RSS",
            Dialect::Rdf => "RDF",
            Dialect::Atom => "Atom",
        })
    }
}

/// A feed in the common model, whatever dialect it was read from.
///
/// Plain values only, so a `Feed` can be cloned, compared and serialized
/// freely. `Default` gives empty strings, the epoch timestamp and
/// [`Dialect::Rss`], which is handy when composing a feed to encode:
///
/// ```
/// use feedkit::Feed;
///
/// let feed = Feed {
///     title: "Example".to_string(),
///     ..Default::default()
/// };
/// assert!(feed.items.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Feed {
    pub title: String,
    pub link: String,
    pub description: String,
    /// Channel `pubDate`, RDF `dc:date` or Atom `updated`. The epoch when absent
    /// or unparseable.
    pub publication_time: DateTime<FixedOffset>,
    /// Entries in document order.
    pub items: Vec<Item>,
    pub dialect: Dialect,
}

/// One entry within a [`Feed`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Item {
    pub title: String,
    pub link: String,
    pub description: String,
    pub publication_time: DateTime<FixedOffset>,
    /// RSS `guid` or Atom `id`. Always empty for RDF.
    pub guid: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::timestamp::fallback_time;

    #[test]
    fn test_dialect_display() {
        assert_eq!(Dialect::Rss.to_string(), "RSS");
        assert_eq!(Dialect::Rdf.to_string(), "RDF");
        assert_eq!(Dialect::Atom.to_string(), "Atom");
    }

    #[test]
    fn test_default_feed_uses_fallback_time() {
        let feed = Feed::default();
        assert_eq!(feed.publication_time, fallback_time());
        assert_eq!(feed.dialect, Dialect::Rss);
        assert!(feed.title.is_empty());
    }

    #[test]
    fn test_feed_serializes_to_json() {
        let feed = Feed {
            title: "t".to_string(),
            dialect: Dialect::Atom,
            ..Default::default()
        };
        let json = serde_json::to_string(&feed).expect("serialize feed");
        assert!(json.contains("\"dialect\":\"Atom\""));
        assert!(json.contains("\"publication_time\":\"1970-01-01T00:00:00"));

        let back: Feed = serde_json::from_str(&json).expect("deserialize feed");
        assert_eq!(back, feed);
    }
}
