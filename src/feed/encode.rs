//! Canonical RSS 2.0 serialization.

use std::fs::File;
use std::io::{self, Cursor, Write as _};
use std::path::Path;

use chrono::{DateTime, FixedOffset};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::error::EncodeError;
use super::types::Feed;
use crate::config::Config;
use crate::util::replace_invalid_xml_chars;

/// RFC 1123 with a numeric offset: `Sun, 25 Dec 2016 11:00:00 +0000`.
const DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

type XmlWriter = Writer<Cursor<Vec<u8>>>;

/// Serialize `feed` as an RSS 2.0 document.
///
/// Whatever dialect the feed was read from, the output is always RSS 2.0 with
/// two-space indentation and no trailing newline. Both `pubDate` and
/// `lastBuildDate` of the channel come from `publication_time`, and each
/// item's `guid` is its link.
///
/// # Errors
///
/// Returns [`EncodeError::Xml`] if the writer fails.
///
/// Text that XML 1.0 cannot carry (C0 controls other than tab, newline and
/// carriage return, `U+FFFE`, `U+FFFF`) is written as `U+FFFD`.
pub fn encode_feed(feed: &Feed) -> Result<Vec<u8>, EncodeError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    emit(&mut writer, Event::Start(rss))?;
    emit(&mut writer, Event::Start(BytesStart::new("channel")))?;

    let published = format_date(&feed.publication_time);
    text_element(&mut writer, "title", &feed.title)?;
    text_element(&mut writer, "link", &feed.link)?;
    text_element(&mut writer, "description", &feed.description)?;
    text_element(&mut writer, "pubDate", &published)?;
    text_element(&mut writer, "lastBuildDate", &published)?;

    for item in &feed.items {
        emit(&mut writer, Event::Start(BytesStart::new("item")))?;
        text_element(&mut writer, "title", &item.title)?;
        text_element(&mut writer, "link", &item.link)?;
        text_element(&mut writer, "description", &item.description)?;
        text_element(&mut writer, "pubDate", &format_date(&item.publication_time))?;
        text_element(&mut writer, "guid", &item.link)?;
        emit(&mut writer, Event::End(BytesEnd::new("item")))?;
    }

    emit(&mut writer, Event::End(BytesEnd::new("channel")))?;
    emit(&mut writer, Event::End(BytesEnd::new("rss")))?;

    Ok(writer.into_inner().into_inner())
}

/// Encode `feed` and write it to `path` atomically.
///
/// The document goes to a temporary file next to `path`, is synced to disk, and
/// is then renamed over the destination, so `path` never holds a partial file.
///
/// # Errors
///
/// [`EncodeError::Xml`] if serialization fails, [`EncodeError::Io`] for any
/// filesystem failure (the temporary file is removed).
pub fn write_feed_file(feed: &Feed, path: &Path, config: &Config) -> Result<(), EncodeError> {
    use std::time::{SystemTime, UNIX_EPOCH};

    let content = encode_feed(feed)?;

    // Temp name carries the current time in nanoseconds. create_new below
    // refuses to reuse an existing file.
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let temp_path = path.with_extension(format!("tmp.{:016x}", suffix));

    let io_error = |source: io::Error| EncodeError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)
        .map_err(io_error)?;

    let written =
        write_synced(file, &content).and_then(|()| std::fs::rename(&temp_path, path));
    if let Err(e) = written {
        let _ = std::fs::remove_file(&temp_path);
        return Err(io_error(e));
    }

    if config.verbose {
        tracing::info!(path = %path.display(), bytes = content.len(), "Wrote feed");
    }
    Ok(())
}

fn write_synced(mut file: File, content: &[u8]) -> io::Result<()> {
    file.write_all(content)?;
    file.sync_all()
}

fn format_date(time: &DateTime<FixedOffset>) -> String {
    time.format(DATE_FORMAT).to_string()
}

/// Writes `<name>text</name>` with `text` escaped. Characters XML 1.0 does
/// not allow become `U+FFFD`.
fn text_element(writer: &mut XmlWriter, name: &str, text: &str) -> Result<(), EncodeError> {
    let text = replace_invalid_xml_chars(text);
    emit(writer, Event::Start(BytesStart::new(name)))?;
    emit(writer, Event::Text(BytesText::new(&text)))?;
    emit(writer, Event::End(BytesEnd::new(name)))
}

fn emit(writer: &mut XmlWriter, event: Event<'_>) -> Result<(), EncodeError> {
    writer
        .write_event(event)
        .map_err(|e| EncodeError::Xml(e.to_string()))
}
