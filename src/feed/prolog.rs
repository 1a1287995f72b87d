//! XML declaration parsing and rewriting.
//!
//! The declaration is read straight from the raw bytes, before any
//! transcoding, so only ASCII-compatible source encodings can be detected.

use super::error::DecodeError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Declaration written in front of every rewritten or serialized document.
pub const CANONICAL_PROLOG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// The parsed `<?xml ... ?>` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Declaration<'a> {
    /// Value of the `encoding` attribute, if present. Never empty.
    pub encoding: Option<&'a str>,
}

/// Parse the XML declaration at the start of `bytes`.
///
/// Accepts an optional UTF-8 BOM, then
/// `<?xml S version=("1.0"|'1.0') (S encoding=...)? (S standalone=...)? S? ?>`.
///
/// # Errors
///
/// Returns [`DecodeError::MalformedProlog`] if the declaration is missing,
/// declares a version other than `1.0`, has an empty encoding name, or
/// otherwise deviates from the grammar.
pub(crate) fn parse_declaration(bytes: &[u8]) -> Result<Declaration<'_>, DecodeError> {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut cursor = Cursor { bytes: body, pos: 0 };

    if !cursor.eat(b"<?xml") {
        return Err(malformed("document does not start with an XML declaration"));
    }

    let mut attributes: Vec<(&[u8], &[u8])> = Vec::with_capacity(3);
    loop {
        let spaced = cursor.skip_whitespace();
        if cursor.eat(b"?>") {
            break;
        }
        if cursor.at_end() {
            return Err(malformed("XML declaration is not terminated"));
        }
        if !spaced {
            return Err(malformed("expected whitespace between declaration attributes"));
        }

        let name = cursor.name();
        if name.is_empty() {
            return Err(malformed("unexpected character in XML declaration"));
        }
        cursor.skip_whitespace();
        if !cursor.eat(b"=") {
            return Err(malformed(format!(
                "expected '=' after `{}`",
                String::from_utf8_lossy(name)
            )));
        }
        cursor.skip_whitespace();
        let value = cursor.quoted()?;
        attributes.push((name, value));
    }

    let mut attributes = attributes.into_iter();
    match attributes.next() {
        Some((b"version", b"1.0")) => {}
        Some((b"version", other)) => {
            return Err(malformed(format!(
                "unsupported XML version {:?}",
                String::from_utf8_lossy(other)
            )));
        }
        _ => return Err(malformed("declaration has no version")),
    }

    let mut encoding = None;
    let mut standalone = false;
    for (name, value) in attributes {
        match name {
            b"encoding" if encoding.is_none() && !standalone => {
                let value = std::str::from_utf8(value)
                    .map_err(|_| malformed("encoding name is not ASCII"))?;
                if value.trim().is_empty() {
                    return Err(malformed("empty encoding name"));
                }
                encoding = Some(value);
            }
            b"standalone" if !standalone => {
                if !matches!(value, b"yes" | b"no") {
                    return Err(malformed("standalone must be \"yes\" or \"no\""));
                }
                standalone = true;
            }
            other => {
                return Err(malformed(format!(
                    "unexpected attribute `{}` in XML declaration",
                    String::from_utf8_lossy(other)
                )));
            }
        }
    }

    Ok(Declaration { encoding })
}

/// Replace the prolog of a transcoded document with [`CANONICAL_PROLOG`].
///
/// Everything up to and including the first `?>` is replaced; the remainder is
/// appended unchanged.
///
/// # Errors
///
/// - [`DecodeError::MissingPrologEnd`] if there is no `?>`
/// - [`DecodeError::EmptyDocumentBody`] if nothing follows it
pub(crate) fn rewrite_as_utf8(text: &str) -> Result<String, DecodeError> {
    let end = text.find("?>").ok_or(DecodeError::MissingPrologEnd)?;
    let body = &text[end + 2..];
    if body.is_empty() {
        return Err(DecodeError::EmptyDocumentBody);
    }

    let mut out = String::with_capacity(CANONICAL_PROLOG.len() + body.len());
    out.push_str(CANONICAL_PROLOG);
    out.push_str(body);
    Ok(out)
}

fn malformed(reason: impl Into<String>) -> DecodeError {
    DecodeError::MalformedProlog(reason.into())
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn eat(&mut self, literal: &[u8]) -> bool {
        if self.bytes[self.pos..].starts_with(literal) {
            self.pos += literal.len();
            true
        } else {
            false
        }
    }

    /// Skips XML whitespace (`S`), returning whether any was consumed.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while let Some(b' ' | b'\t' | b'\r' | b'\n') = self.bytes.get(self.pos) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn name(&mut self) -> &'a [u8] {
        let start = self.pos;
        while self
            .bytes
            .get(self.pos)
            .is_some_and(|b| b.is_ascii_alphabetic())
        {
            self.pos += 1;
        }
        &self.bytes[start..self.pos]
    }

    fn quoted(&mut self) -> Result<&'a [u8], DecodeError> {
        let quote = match self.bytes.get(self.pos) {
            Some(&q @ (b'"' | b'\'')) => q,
            _ => return Err(malformed("attribute value is not quoted")),
        };
        let start = self.pos + 1;
        let len = self.bytes[start..]
            .iter()
            .position(|&b| b == quote)
            .ok_or_else(|| malformed("unterminated attribute value"))?;
        self.pos = start + len + 1;
        Ok(&self.bytes[start..start + len])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoding_of(input: &str) -> Option<&str> {
        parse_declaration(input.as_bytes())
            .expect("declaration should parse")
            .encoding
    }

    #[test]
    fn test_plain_declaration() {
        let decl = parse_declaration(br#"<?xml version="1.0"?><rss/>"#).unwrap();
        assert_eq!(decl.encoding, None);
    }

    #[test]
    fn test_encoding_double_and_single_quotes() {
        assert_eq!(
            encoding_of(r#"<?xml version="1.0" encoding="ISO-8859-1"?><a/>"#),
            Some("ISO-8859-1")
        );
        assert_eq!(
            encoding_of("<?xml version='1.0' encoding='utf-8'?><a/>"),
            Some("utf-8")
        );
    }

    #[test]
    fn test_standalone_and_spacing() {
        let decl = parse_declaration(
            b"<?xml  version = \"1.0\"\n\tencoding=\"UTF-8\" standalone='yes' ?>\n<a/>",
        )
        .unwrap();
        assert_eq!(decl.encoding, Some("UTF-8"));
    }

    #[test]
    fn test_standalone_value_checked() {
        assert!(parse_declaration(br#"<?xml version="1.0" standalone="no"?><a/>"#).is_ok());
        let err = parse_declaration(br#"<?xml version="1.0" standalone="maybe"?><a/>"#);
        assert!(matches!(err, Err(DecodeError::MalformedProlog(_))));
    }

    #[test]
    fn test_bom_is_skipped() {
        let mut input = UTF8_BOM.to_vec();
        input.extend_from_slice(br#"<?xml version="1.0" encoding="utf-8"?><a/>"#);
        assert_eq!(parse_declaration(&input).unwrap().encoding, Some("utf-8"));
    }

    #[test]
    fn test_missing_declaration_rejected() {
        let err = parse_declaration(b"<rss version=\"2.0\"></rss>").unwrap_err();
        assert!(matches!(err, DecodeError::MalformedProlog(_)));
    }

    #[test]
    fn test_version_must_be_1_0() {
        let err = parse_declaration(br#"<?xml version="1.1"?><a/>"#).unwrap_err();
        assert!(err.to_string().contains("1.1"), "{}", err);
    }

    #[test]
    fn test_version_must_come_first() {
        let err = parse_declaration(br#"<?xml encoding="UTF-8" version="1.0"?><a/>"#);
        assert!(matches!(err, Err(DecodeError::MalformedProlog(_))));
    }

    #[test]
    fn test_empty_encoding_rejected() {
        let err = parse_declaration(br#"<?xml version="1.0" encoding=""?><a/>"#).unwrap_err();
        assert!(err.to_string().contains("empty encoding"), "{}", err);
    }

    #[test]
    fn test_standalone_before_encoding_rejected() {
        let err =
            parse_declaration(br#"<?xml version="1.0" standalone="no" encoding="UTF-8"?><a/>"#);
        assert!(matches!(err, Err(DecodeError::MalformedProlog(_))));
    }

    #[test]
    fn test_stylesheet_pi_is_not_a_declaration() {
        let err = parse_declaration(br#"<?xml-stylesheet href="a.xsl"?><a/>"#);
        assert!(matches!(err, Err(DecodeError::MalformedProlog(_))));
    }

    #[test]
    fn test_unterminated_declaration() {
        assert!(parse_declaration(br#"<?xml version="1.0""#).is_err());
        assert!(parse_declaration(br#"<?xml version="1.0"#).is_err());
        assert!(parse_declaration(b"<?xml version=1.0?>").is_err());
    }

    #[test]
    fn test_rewrite_replaces_prolog() {
        let out = rewrite_as_utf8("<?xml version='1.0' encoding='ISO-8859-1'?><a>caf\u{e9}</a>")
            .unwrap();
        assert_eq!(out, "<?xml version=\"1.0\" encoding=\"UTF-8\"?><a>caf\u{e9}</a>");
    }

    #[test]
    fn test_rewrite_keeps_following_processing_instructions() {
        let out = rewrite_as_utf8(
            "<?xml version=\"1.0\" encoding=\"latin1\"?>\n<?xml-stylesheet href=\"a\"?><a/>",
        )
        .unwrap();
        assert_eq!(
            out,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<?xml-stylesheet href=\"a\"?><a/>"
        );
    }

    #[test]
    fn test_rewrite_missing_end() {
        let err = rewrite_as_utf8("<?xml version=\"1.0\"").unwrap_err();
        assert!(matches!(err, DecodeError::MissingPrologEnd));
    }

    #[test]
    fn test_rewrite_empty_body() {
        let err = rewrite_as_utf8("<?xml version=\"1.0\" encoding=\"latin1\"?>").unwrap_err();
        assert!(matches!(err, DecodeError::EmptyDocumentBody));
    }
}
