//! RSS 2.0 decoding.

use super::error::DialectError;
use super::timestamp::timestamp_or_fallback;
use super::tree::Element;
use super::types::{Dialect, Feed, Item};
use super::ATOM_NAMESPACE;
use crate::config::Config;

#[derive(Default)]
struct Channel<'a> {
    title: &'a str,
    link: &'a str,
    description: &'a str,
    pub_date: &'a str,
    items: Vec<RawItem<'a>>,
}

struct RawItem<'a> {
    title: &'a str,
    link: &'a str,
    description: &'a str,
    pub_date: &'a str,
    guid: &'a str,
}

/// Decode `root` as an `<rss><channel>` document.
///
/// Fields are matched by local name. Elements in the Atom namespace (the
/// common `<atom:link rel="self"/>`) are never used as RSS fields. Absent
/// elements, the channel included, read as empty.
pub(crate) fn parse(root: &Element, config: &Config) -> Result<Feed, DialectError> {
    if !root.name.eq_ignore_ascii_case("rss") {
        return Err(DialectError::NotRss(root.name.clone()));
    }
    Ok(into_feed(structure(root), config))
}

fn structure(root: &Element) -> Channel<'_> {
    let Some(channel) = root.children_outside(ATOM_NAMESPACE, "channel").next() else {
        return Channel::default();
    };

    let items = channel
        .children_outside(ATOM_NAMESPACE, "item")
        .map(|item| RawItem {
            title: item.text_outside(ATOM_NAMESPACE, "title"),
            link: item.text_outside(ATOM_NAMESPACE, "link"),
            description: item.text_outside(ATOM_NAMESPACE, "description"),
            pub_date: item.text_outside(ATOM_NAMESPACE, "pubDate"),
            guid: item.text_outside(ATOM_NAMESPACE, "guid"),
        })
        .collect();

    Channel {
        title: channel.text_outside(ATOM_NAMESPACE, "title"),
        link: channel.text_outside(ATOM_NAMESPACE, "link"),
        description: channel.text_outside(ATOM_NAMESPACE, "description"),
        pub_date: channel.text_outside(ATOM_NAMESPACE, "pubDate"),
        items,
    }
}

fn into_feed(channel: Channel<'_>, config: &Config) -> Feed {
    let items = channel
        .items
        .into_iter()
        .map(|item| Item {
            title: item.title.to_string(),
            link: item.link.to_string(),
            description: item.description.to_string(),
            publication_time: timestamp_or_fallback(item.pub_date, config),
            guid: item.guid.to_string(),
        })
        .collect();

    Feed {
        title: channel.title.to_string(),
        link: channel.link.to_string(),
        description: channel.description.to_string(),
        publication_time: timestamp_or_fallback(channel.pub_date, config),
        items,
        dialect: Dialect::Rss,
    }
}
