use std::borrow::Cow;

/// Returns `true` if `c` is allowed by the XML 1.0 `Char` production.
///
/// `#x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]`
pub fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\u{9}'
            | '\u{A}'
            | '\u{D}'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Strip everything from a UTF-8 buffer that XML 1.0 does not allow in a document.
///
/// The buffer is walked as decoded scalar values rather than raw bytes:
/// - Scalars outside the `Char` production (C0 controls other than tab,
///   newline and carriage return, `U+FFFE`, `U+FFFF`) are dropped
/// - Invalid UTF-8 sequences, which a lossy decode would turn into
///   `U+FFFD`, are dropped as well
///
/// Never fails. The output may be shorter than the input.
///
/// Returns `Cow::Borrowed` when the input is valid UTF-8 containing only legal
/// characters (the common case).
///
/// # Examples
///
/// ```
/// use feedkit::util::strip_invalid_xml_chars;
///
/// assert_eq!(strip_invalid_xml_chars(b"a\x0bb"), "ab");
/// assert_eq!(strip_invalid_xml_chars(b"caf\xff\xc3\xa9"), "caf\u{e9}");
/// ```
pub fn strip_invalid_xml_chars(bytes: &[u8]) -> Cow<'_, str> {
    // Fast path: already valid UTF-8 with nothing to drop
    if let Ok(s) = std::str::from_utf8(bytes) {
        if s.chars().all(is_xml_char) {
            return Cow::Borrowed(s);
        }
    }

    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.extend(chunk.valid().chars().filter(|&c| is_xml_char(c)));
        // chunk.invalid() is discarded
    }

    Cow::Owned(out)
}

/// Replace every character XML 1.0 forbids in `text` with `U+FFFD`.
///
/// Used on field values before they are written, so a `Feed` built by hand
/// always serializes to a well-formed document.
///
/// ```
/// use feedkit::util::replace_invalid_xml_chars;
///
/// assert_eq!(replace_invalid_xml_chars("a\u{b}b"), "a\u{fffd}b");
/// ```
pub fn replace_invalid_xml_chars(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.chars()
            .map(|c| if is_xml_char(c) { c } else { '\u{FFFD}' })
            .collect(),
    )
}
