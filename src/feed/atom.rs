//! Atom (RFC 4287) decoding.

use super::error::DialectError;
use super::timestamp::timestamp_or_fallback;
use super::tree::Element;
use super::types::{Dialect, Feed, Item};
use super::ATOM_NAMESPACE;
use crate::config::Config;

/// A `<link href rel>` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Link<'a> {
    href: &'a str,
    rel: &'a str,
}

struct RawFeed<'a> {
    title: &'a str,
    subtitle: &'a str,
    links: Vec<Link<'a>>,
    updated: &'a str,
    entries: Vec<Entry<'a>>,
}

struct Entry<'a> {
    id: &'a str,
    title: &'a str,
    links: Vec<Link<'a>>,
    updated: &'a str,
    content: &'a str,
}

pub(crate) fn parse(root: &Element, config: &Config) -> Result<Feed, DialectError> {
    if !(root.in_namespace(ATOM_NAMESPACE) && root.name == "feed") {
        return Err(DialectError::NotAtom(root.name.clone()));
    }
    let raw = structure(root)?;
    Ok(into_feed(raw, config))
}

fn structure(root: &Element) -> Result<RawFeed<'_>, DialectError> {
    let entries = root
        .children_in(ATOM_NAMESPACE, "entry")
        .enumerate()
        .map(|(index, element)| entry(index, element))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RawFeed {
        title: root.text_in(ATOM_NAMESPACE, "title"),
        subtitle: root.text_in(ATOM_NAMESPACE, "subtitle"),
        links: links(root),
        updated: root.text_in(ATOM_NAMESPACE, "updated"),
        entries,
    })
}

fn entry(index: usize, element: &Element) -> Result<Entry<'_>, DialectError> {
    let id = element
        .children_in(ATOM_NAMESPACE, "id")
        .next()
        .ok_or(DialectError::MissingEntryId(index))?;
    Ok(Entry {
        id: &id.text,
        title: element.text_in(ATOM_NAMESPACE, "title"),
        links: links(element),
        updated: first_present(element, &["updated", "published"]),
        content: first_present(element, &["content", "summary"]),
    })
}

fn links(element: &Element) -> Vec<Link<'_>> {
    element
        .children_in(ATOM_NAMESPACE, "link")
        .map(|link| Link {
            href: link.attribute("href").unwrap_or(""),
            rel: link.attribute("rel").unwrap_or(""),
        })
        .collect()
}

/// Text of the first of `names` that is present as a child.
fn first_present<'a>(element: &'a Element, names: &[&str]) -> &'a str {
    names
        .iter()
        .find_map(|name| element.children_in(ATOM_NAMESPACE, name).next())
        .map_or("", |child| child.text.as_str())
}

/// `rel="self"` wins, then the first link declared.
fn choose_link<'a>(links: &[Link<'a>]) -> &'a str {
    links
        .iter()
        .find(|link| link.rel == "self")
        .or_else(|| links.first())
        .map_or("", |link| link.href)
}

fn into_feed(raw: RawFeed<'_>, config: &Config) -> Feed {
    let items = raw
        .entries
        .into_iter()
        .map(|entry| Item {
            title: entry.title.to_string(),
            link: choose_link(&entry.links).to_string(),
            description: entry.content.to_string(),
            publication_time: timestamp_or_fallback(entry.updated, config),
            guid: entry.id.to_string(),
        })
        .collect();

    Feed {
        title: raw.title.to_string(),
        link: choose_link(&raw.links).to_string(),
        description: raw.subtitle.to_string(),
        publication_time: timestamp_or_fallback(raw.updated, config),
        items,
        dialect: Dialect::Atom,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::timestamp::fallback_time;
    use crate::feed::tree;
    use chrono::{TimeZone, Utc};

    fn decode(xml: &str) -> Result<Feed, DialectError> {
        let root = tree::parse(xml).expect("test document should be well-formed");
        parse(&root, &Config::default())
    }

    fn link<'a>(href: &'a str, rel: &'a str) -> Link<'a> {
        Link { href, rel }
    }

    #[test]
    fn test_choose_link() {
        assert_eq!(choose_link(&[]), "");
        assert_eq!(choose_link(&[link("a", ""), link("b", "alternate")]), "a");
        assert_eq!(
            choose_link(&[link("a", "alternate"), link("b", "self"), link("c", "self")]),
            "b"
        );
    }

    #[test]
    fn test_feed_and_entries() {
        let feed = decode(
            r#"<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Example Atom</title>
  <subtitle>All the news</subtitle>
  <link href="https://example.com/"/>
  <link href="https://example.com/atom.xml" rel="self"/>
  <updated>2017-01-11T20:30:23-05:00</updated>
  <entry>
    <id>urn:uuid:1</id>
    <title>One</title>
    <link href="https://example.com/1" rel="alternate"/>
    <updated>2017-01-11T20:00:00-05:00</updated>
    <content type="html">&lt;p&gt;Hello&lt;/p&gt;</content>
    <summary>ignored</summary>
  </entry>
  <entry>
    <id>urn:uuid:2</id>
    <title>Two</title>
    <published>2017-01-10T08:00:00Z</published>
    <summary>Short</summary>
  </entry>
</feed>"#,
        )
        .unwrap();

        assert_eq!(feed.dialect, Dialect::Atom);
        assert_eq!(feed.title, "Example Atom");
        assert_eq!(feed.description, "All the news");
        assert_eq!(feed.link, "https://example.com/atom.xml");
        assert_eq!(
            feed.publication_time,
            Utc.with_ymd_and_hms(2017, 1, 12, 1, 30, 23).unwrap()
        );
        assert_eq!(feed.publication_time.offset().local_minus_utc(), -5 * 3600);

        let first = &feed.items[0];
        assert_eq!(first.guid, "urn:uuid:1");
        assert_eq!(first.link, "https://example.com/1");
        assert_eq!(first.description, "<p>Hello</p>");

        let second = &feed.items[1];
        assert_eq!(second.link, "");
        assert_eq!(second.description, "Short");
        assert_eq!(
            second.publication_time,
            Utc.with_ymd_and_hms(2017, 1, 10, 8, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_missing_dates_fall_back() {
        let feed = decode(
            r#"<feed xmlns="http://www.w3.org/2005/Atom"><entry><id>x</id></entry></feed>"#,
        )
        .unwrap();
        assert_eq!(feed.publication_time, fallback_time());
        assert_eq!(feed.items[0].publication_time, fallback_time());
    }

    #[test]
    fn test_entry_without_id_rejected() {
        let err = decode(
            r#"<feed xmlns="http://www.w3.org/2005/Atom">
<entry><id>a</id></entry><entry><title>no id</title></entry></feed>"#,
        )
        .unwrap_err();
        assert_eq!(err, DialectError::MissingEntryId(1));
    }

    #[test]
    fn test_feed_outside_atom_namespace_rejected() {
        assert_eq!(
            decode("<feed><title>t</title></feed>").unwrap_err(),
            DialectError::NotAtom("feed".to_string())
        );
        assert_eq!(
            decode("<rss><channel/></rss>").unwrap_err(),
            DialectError::NotAtom("rss".to_string())
        );
    }
}
