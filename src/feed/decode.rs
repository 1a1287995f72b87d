//! Dialect detection: the full decode pipeline from raw bytes to [`Feed`].

use std::borrow::Cow;

use super::error::{DecodeError, DialectError};
use super::tree::{self, Element};
use super::types::{Dialect, Feed};
use super::{atom, encoding, prolog, rdf, rss};
use crate::config::Config;
use crate::util::strip_invalid_xml_chars;

type DialectParser = fn(&Element, &Config) -> Result<Feed, DialectError>;

/// Dialects in priority order. On ambiguous input the earliest wins.
const DIALECTS: [(Dialect, DialectParser); 3] = [
    (Dialect::Rss, rss::parse),
    (Dialect::Rdf, rdf::parse),
    (Dialect::Atom, atom::parse),
];

/// Outcome of decoding the tree with one dialect.
#[derive(Debug)]
enum Attempt {
    Rss(Feed),
    Rdf(Feed),
    Atom(Feed),
    Failed(DialectError),
}

impl Attempt {
    fn into_result(self) -> Result<Feed, DialectError> {
        match self {
            Attempt::Rss(feed) | Attempt::Rdf(feed) | Attempt::Atom(feed) => Ok(feed),
            Attempt::Failed(err) => Err(err),
        }
    }
}

fn attempt(dialect: Dialect, parser: DialectParser, root: &Element, config: &Config) -> Attempt {
    match parser(root, config) {
        Ok(feed) => match dialect {
            Dialect::Rss => Attempt::Rss(feed),
            Dialect::Rdf => Attempt::Rdf(feed),
            Dialect::Atom => Attempt::Atom(feed),
        },
        Err(err) => {
            if config.verbose {
                tracing::debug!(%dialect, error = %err, "Dialect rejected document");
            }
            Attempt::Failed(err)
        }
    }
}

/// Reduce the attempts, given in [`DIALECTS`] order, to one result.
fn resolve(attempts: [Attempt; 3]) -> Result<Feed, DecodeError> {
    let [rss, rdf, atom] = attempts.map(Attempt::into_result);
    match (rss, rdf, atom) {
        (Ok(feed), _, _) | (Err(_), Ok(feed), _) | (Err(_), Err(_), Ok(feed)) => Ok(feed),
        (Err(rss), Err(rdf), Err(atom)) => Err(DecodeError::UnrecognizedFeed { rss, rdf, atom }),
    }
}

/// Decode a feed document with default settings.
///
/// See [`decode_feed_with`].
pub fn decode_feed(bytes: &[u8]) -> Result<Feed, DecodeError> {
    decode_feed_with(bytes, &Config::default())
}

/// Decode an RSS, RDF or Atom document into a [`Feed`].
///
/// The pipeline:
/// 1. Resolve the declared encoding and transcode to UTF-8
/// 2. Drop code points XML 1.0 does not allow
/// 3. If the source was not UTF-8, rewrite the prolog to declare UTF-8
/// 4. Parse the element tree once
/// 5. Try RSS, then RDF, then Atom; the first to succeed wins
///
/// `config.verbose` only controls diagnostics. The result is the same either way.
///
/// # Errors
///
/// Any prolog or encoding failure, or [`DecodeError::UnrecognizedFeed`]
/// carrying each dialect's rejection when none of them accepts the document.
pub fn decode_feed_with(bytes: &[u8], config: &Config) -> Result<Feed, DecodeError> {
    let normalized = encoding::normalize(bytes)?;
    if config.verbose && normalized.was_transcoded() {
        tracing::debug!(
            declared = %normalized.declared,
            encoding = normalized.encoding.name(),
            "Transcoded document to UTF-8"
        );
    }

    let sanitized = strip_invalid_xml_chars(&normalized.bytes);
    if config.verbose {
        if let Cow::Owned(ref cleaned) = sanitized {
            let dropped = String::from_utf8_lossy(&normalized.bytes)
                .chars()
                .count()
                .saturating_sub(cleaned.chars().count());
            tracing::info!(dropped, "Removed characters not allowed in XML");
        }
    }

    let text: Cow<'_, str> = if normalized.was_transcoded() {
        Cow::Owned(prolog::rewrite_as_utf8(&sanitized)?)
    } else {
        sanitized
    };

    let root = match tree::parse(&text) {
        Ok(root) => root,
        Err(err) => {
            if config.verbose {
                tracing::debug!(error = %err, "Document is not well-formed XML");
            }
            return Err(DecodeError::UnrecognizedFeed {
                rss: err.clone(),
                rdf: err.clone(),
                atom: err,
            });
        }
    };

    let attempts = DIALECTS.map(|(dialect, parser)| attempt(dialect, parser, &root, config));
    let feed = resolve(attempts)?;
    if config.verbose {
        tracing::info!(
            dialect = %feed.dialect,
            title = %feed.title,
            items = feed.items.len(),
            "Parsed feed"
        );
    }
    Ok(feed)
}
