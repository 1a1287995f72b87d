//! RDF Site Summary (RSS 1.0) decoding.
//!
//! Unlike RSS 2.0, items are siblings of `<channel>` under the root, and dates
//! come from Dublin Core `dc:date`.

use super::error::DialectError;
use super::timestamp::timestamp_or_fallback;
use super::tree::Element;
use super::types::{Dialect, Feed, Item};
use super::ATOM_NAMESPACE;
use crate::config::Config;

#[derive(Default)]
struct Document<'a> {
    title: &'a str,
    link: &'a str,
    description: &'a str,
    date: &'a str,
    items: Vec<RawItem<'a>>,
}

struct RawItem<'a> {
    title: &'a str,
    link: &'a str,
    description: &'a str,
    date: &'a str,
}

pub(crate) fn parse(root: &Element, config: &Config) -> Result<Feed, DialectError> {
    if !root.name.eq_ignore_ascii_case("rdf") {
        return Err(DialectError::NotRdf(root.name.clone()));
    }
    Ok(into_feed(structure(root), config))
}

fn structure(root: &Element) -> Document<'_> {
    let items = root
        .children_outside(ATOM_NAMESPACE, "item")
        .map(|item| RawItem {
            title: item.text_outside(ATOM_NAMESPACE, "title"),
            link: item.text_outside(ATOM_NAMESPACE, "link"),
            description: item.text_outside(ATOM_NAMESPACE, "description"),
            date: item.text_outside(ATOM_NAMESPACE, "date"),
        })
        .collect();

    // Without a channel the items still decode
    let Some(channel) = root.children_outside(ATOM_NAMESPACE, "channel").next() else {
        return Document {
            items,
            ..Document::default()
        };
    };

    Document {
        title: channel.text_outside(ATOM_NAMESPACE, "title"),
        // First of possibly several <link> elements
        link: channel.text_outside(ATOM_NAMESPACE, "link"),
        description: channel.text_outside(ATOM_NAMESPACE, "description"),
        date: channel.text_outside(ATOM_NAMESPACE, "date"),
        items,
    }
}

fn into_feed(document: Document<'_>, config: &Config) -> Feed {
    let items = document
        .items
        .into_iter()
        .map(|item| Item {
            title: item.title.to_string(),
            link: item.link.to_string(),
            description: item.description.to_string(),
            publication_time: timestamp_or_fallback(item.date, config),
            guid: String::new(),
        })
        .collect();

    Feed {
        title: document.title.to_string(),
        link: document.link.to_string(),
        description: document.description.to_string(),
        publication_time: timestamp_or_fallback(document.date, config),
        items,
        dialect: Dialect::Rdf,
    }
}
