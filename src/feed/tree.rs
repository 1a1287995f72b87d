//! A small owned element tree built from the sanitized document.
//!
//! Every dialect decoder walks the same tree, so the XML is only tokenized once
//! per [`decode_feed`](super::decode_feed) call.

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

use super::error::DialectError;

/// SEC-003: Maximum element nesting depth.
/// Prevents unbounded stack growth from maliciously nested documents.
pub(crate) const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Element {
    /// Resolved namespace URI, `None` for unqualified names or unbound prefixes.
    pub namespace: Option<String>,
    /// Local name with any prefix stripped.
    pub name: String,
    /// Attributes by local name. Namespace declarations are not included.
    pub attributes: Vec<(String, String)>,
    /// Unescaped character data directly inside this element, untrimmed.
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn in_namespace(&self, namespace: &str) -> bool {
        self.namespace.as_deref() == Some(namespace)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Children named `name` in namespace `namespace`.
    pub fn children_in<'a, 'b>(
        &'a self,
        namespace: &'b str,
        name: &'b str,
    ) -> impl Iterator<Item = &'a Element> + 'b
    where
        'a: 'b,
    {
        self.children
            .iter()
            .filter(move |child| child.name == name && child.in_namespace(namespace))
    }

    /// Children named `name` in any namespace except `foreign`.
    pub fn children_outside<'a, 'b>(
        &'a self,
        foreign: &'b str,
        name: &'b str,
    ) -> impl Iterator<Item = &'a Element> + 'b
    where
        'a: 'b,
    {
        self.children
            .iter()
            .filter(move |child| child.name == name && !child.in_namespace(foreign))
    }

    /// Text of the first child named `name` in `namespace`, or `""`.
    pub fn text_in(&self, namespace: &str, name: &str) -> &str {
        self.children_in(namespace, name)
            .next()
            .map_or("", |child| child.text.as_str())
    }

    /// Text of the first child named `name` outside `foreign`, or `""`.
    pub fn text_outside(&self, foreign: &str, name: &str) -> &str {
        self.children_outside(foreign, name)
            .next()
            .map_or("", |child| child.text.as_str())
    }
}

/// Parse `text` into a tree rooted at its document element.
///
/// Comments, processing instructions, the declaration and any DOCTYPE are
/// skipped. Reading stops once the root element closes.
///
/// SEC-002: `quick-xml` (0.37) never parses `<!ENTITY>` declarations. Only the
/// five predefined entities and character references are resolved; anything
/// else (`&xxe;`) is reported as a syntax error rather than expanded.
pub(crate) fn parse(text: &str) -> Result<Element, DialectError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = NsReader::from_str(text);
    let mut stack: Vec<Element> = Vec::new();

    loop {
        let (namespace, event) = match reader.read_resolved_event() {
            Ok((namespace, event)) => (owned_namespace(namespace), event),
            Err(e) => {
                return Err(DialectError::Syntax(format!(
                    "{} (at byte {})",
                    e,
                    reader.buffer_position()
                )))
            }
        };

        match event {
            Event::Start(e) => {
                // SEC-003: Reject excessively nested documents
                if stack.len() >= MAX_DEPTH {
                    return Err(DialectError::TooDeep(MAX_DEPTH));
                }
                stack.push(open_element(namespace, &e)?);
            }
            Event::Empty(e) => {
                let element = open_element(namespace, &e)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => return Ok(element),
                }
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| DialectError::Syntax("unexpected closing tag".to_string()))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => return Ok(element),
                }
            }
            Event::Text(e) => {
                if let Some(current) = stack.last_mut() {
                    let unescaped = e
                        .unescape()
                        .map_err(|err| DialectError::Syntax(err.to_string()))?;
                    current.text.push_str(&unescaped);
                }
            }
            Event::CData(e) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::Eof => {
                return Err(DialectError::Syntax(match stack.last() {
                    Some(open) => format!("unexpected end of document inside <{}>", open.name),
                    None => "document has no root element".to_string(),
                }));
            }
            // Declaration, processing instructions, comments, DOCTYPE
            _ => {}
        }
    }
}

fn owned_namespace(resolved: ResolveResult<'_>) -> Option<String> {
    match resolved {
        ResolveResult::Bound(Namespace(uri)) => Some(String::from_utf8_lossy(uri).into_owned()),
        ResolveResult::Unbound | ResolveResult::Unknown(_) => None,
    }
}

fn open_element(namespace: Option<String>, start: &BytesStart<'_>) -> Result<Element, DialectError> {
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| DialectError::Syntax(e.to_string()))?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| DialectError::Syntax(e.to_string()))?
            .into_owned();
        attributes.push((key, value));
    }

    Ok(Element {
        namespace,
        name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
        attributes,
        text: String::new(),
        children: Vec::new(),
    })
}
