use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while decoding a feed document.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The XML declaration is missing, unsupported, or does not follow the grammar.
    #[error("malformed XML prolog: {0}")]
    MalformedProlog(String),

    /// The declared encoding name could not be resolved to a character set.
    #[error("unknown encoding: {0:?}")]
    UnknownEncoding(String),

    /// The document bytes are not valid in the declared encoding.
    #[error("failed to decode document as {encoding}: {reason}")]
    Transcode { encoding: String, reason: String },

    /// No `?>` terminates the XML declaration.
    #[error("XML prolog is not terminated by `?>`")]
    MissingPrologEnd,

    /// Nothing follows the XML declaration.
    #[error("document has no content after the XML prolog")]
    EmptyDocumentBody,

    /// The document matched none of the supported dialects.
    #[error("unable to parse as RSS, RDF, or Atom (RSS: {rss}; RDF: {rdf}; Atom: {atom})")]
    UnrecognizedFeed {
        rss: DialectError,
        rdf: DialectError,
        atom: DialectError,
    },
}

/// Why a single dialect attempt rejected a document.
///
/// These never escape on their own; all three are carried by
/// [`DecodeError::UnrecognizedFeed`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DialectError {
    /// The document is not well-formed XML.
    #[error("XML syntax error: {0}")]
    Syntax(String),

    /// Element nesting exceeds the reader's depth limit.
    #[error("XML nesting depth exceeds maximum of {0} levels")]
    TooDeep(usize),

    /// An Atom entry has no `<id>`.
    #[error("entry {0} has no <id> element")]
    MissingEntryId(usize),

    /// Root tag is not `rss`.
    #[error("base tag is not RSS (found <{0}>)")]
    NotRss(String),

    /// Root tag is not `rdf`.
    #[error("base tag is not RDF (found <{0}>)")]
    NotRdf(String),

    /// Root is not `feed` in the Atom namespace.
    #[error("root element is not an Atom feed (found <{0}>)")]
    NotAtom(String),
}

/// Errors that can occur while serializing a feed.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The XML writer failed.
    #[error("failed to write XML: {0}")]
    Xml(String),

    /// Writing the serialized feed to disk failed.
    #[error("failed to write feed to '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
