//! Source encoding detection and transcoding to UTF-8.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

use super::error::DecodeError;
use super::prolog::parse_declaration;

/// A document buffer after transcoding.
#[derive(Debug)]
pub(crate) struct Normalized<'a> {
    /// UTF-8 bytes. May still hold invalid sequences when the source declared
    /// UTF-8; the sanitizer drops those.
    pub bytes: Cow<'a, [u8]>,
    /// Encoding name exactly as declared, `"UTF-8"` when the declaration has none.
    pub declared: String,
    /// The resolved character set.
    pub encoding: &'static Encoding,
}

impl Normalized<'_> {
    /// Whether the source was something other than UTF-8, meaning the prolog
    /// still names the old encoding.
    pub fn was_transcoded(&self) -> bool {
        self.encoding != UTF_8
    }
}

/// Detect the declared encoding and transcode `bytes` to UTF-8.
///
/// Names are resolved with [`Encoding::for_label`], which is case-insensitive
/// and knows the common aliases (`latin1`, `ISO-8859-1`, `utf8`, ...).
///
/// # Errors
///
/// - [`DecodeError::MalformedProlog`] if the XML declaration is missing or invalid
/// - [`DecodeError::UnknownEncoding`] if the declared name is not a known charset
/// - [`DecodeError::Transcode`] if the bytes are invalid for that charset, or
///   the label names UTF-16 although the declaration itself was readable as
///   single bytes
pub(crate) fn normalize(bytes: &[u8]) -> Result<Normalized<'_>, DecodeError> {
    let declaration = parse_declaration(bytes)?;
    let declared = declaration.encoding.unwrap_or("UTF-8");

    let encoding = Encoding::for_label(declared.as_bytes())
        .ok_or_else(|| DecodeError::UnknownEncoding(declared.to_string()))?;

    // A real UTF-16 document could not have yielded an ASCII declaration
    if encoding == UTF_16LE || encoding == UTF_16BE {
        return Err(DecodeError::Transcode {
            encoding: declared.to_string(),
            reason: "declaration is single-byte text but names a UTF-16 encoding".to_string(),
        });
    }

    if encoding == UTF_8 {
        return Ok(Normalized {
            bytes: Cow::Borrowed(bytes),
            declared: declared.to_string(),
            encoding,
        });
    }

    let text = encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .ok_or_else(|| DecodeError::Transcode {
            encoding: declared.to_string(),
            reason: format!("byte sequence is not valid {}", encoding.name()),
        })?;

    Ok(Normalized {
        bytes: Cow::Owned(text.into_owned().into_bytes()),
        declared: declared.to_string(),
        encoding,
    })
}
