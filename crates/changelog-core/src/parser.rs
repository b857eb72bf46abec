//! Streaming parser for the change log XML dialect.
//!
//! The grammar is fixed and case-sensitive:
//!
//! ```text
//! <changelog>
//!   <release version="STRING" versioncode="INTEGER" [date="STRING"]>
//!     <change>TEXT</change>
//!     ...
//!   </release>
//!   ...
//! </changelog>
//! ```
//!
//! Parsing is a single forward pass over the `quick-xml` event stream. Any
//! structural violation fails the whole call; no partial result is returned.

use std::collections::VecDeque;
use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use crate::error::{ChangeLogError, Result};
use crate::release::{parse_version_code, ReleaseItem, NO_VERSION};

const TAG_CHANGELOG: &str = "changelog";
const TAG_RELEASE: &str = "release";
const TAG_CHANGE: &str = "change";
const ATTRIBUTE_VERSION: &str = "version";
const ATTRIBUTE_VERSION_CODE: &str = "versioncode";
const ATTRIBUTE_DATE: &str = "date";

/// Parse every release in the document, in document order.
pub fn parse<R: BufRead>(reader: R) -> Result<Vec<ReleaseItem>> {
    ChangeLogParser::new(reader, None).read_change_log()
}

/// Parse only the releases newer than `last_version_code`.
///
/// Documents list releases newest first, so parsing stops at the first
/// release whose version code is `<= last_version_code`. Passing
/// [`NO_VERSION`] behaves like [`parse`].
pub fn parse_since<R: BufRead>(reader: R, last_version_code: i32) -> Result<Vec<ReleaseItem>> {
    let since = (last_version_code != NO_VERSION).then_some(last_version_code);
    ChangeLogParser::new(reader, since).read_change_log()
}

/// Convenience wrapper over [`parse`] for in-memory documents.
pub fn parse_str(xml: &str) -> Result<Vec<ReleaseItem>> {
    parse(xml.as_bytes())
}

/// Collapse whitespace runs to a single space and trim both ends.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ============================================================================
// Token stream
// ============================================================================

#[derive(Debug)]
struct Tag {
    name: String,
    attributes: Vec<(String, String)>,
}

impl Tag {
    fn from_event(event: &BytesStart<'_>) -> Result<Self> {
        let name = std::str::from_utf8(event.name().as_ref())?.to_string();
        let mut attributes = Vec::new();
        for attribute in event.attributes() {
            let attribute = attribute.map_err(quick_xml::Error::from)?;
            let key = std::str::from_utf8(attribute.key.as_ref())?.to_string();
            let value = attribute.unescape_value()?.into_owned();
            attributes.push((key, value));
        }
        Ok(Self { name, attributes })
    }

    fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn require(&self, wanted: &'static str) -> Result<()> {
        if self.name == wanted {
            Ok(())
        } else {
            Err(ChangeLogError::UnexpectedTag {
                found: self.name.clone(),
                wanted,
            })
        }
    }
}

#[derive(Debug)]
enum Token {
    Start(Tag),
    End(String),
    Text(String),
    Eof,
}

/// Structural position: whitespace between elements has been skipped.
#[derive(Debug)]
enum Node {
    Start(Tag),
    End,
    Eof,
}

struct Lexer<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
    pending: VecDeque<Token>,
}

impl<R: BufRead> Lexer<R> {
    fn new(reader: R) -> Self {
        Self {
            reader: Reader::from_reader(reader),
            buf: Vec::new(),
            pending: VecDeque::new(),
        }
    }

    /// Next raw token. Comments, processing instructions, declarations and
    /// DOCTYPE are dropped; `<x/>` becomes a start/end pair.
    fn read_token(&mut self) -> Result<Token> {
        if let Some(token) = self.pending.pop_front() {
            return Ok(token);
        }

        loop {
            self.buf.clear();
            let token = match self.reader.read_event_into(&mut self.buf)? {
                Event::Start(e) => Token::Start(Tag::from_event(&e)?),
                Event::Empty(e) => {
                    let tag = Tag::from_event(&e)?;
                    self.pending.push_back(Token::End(tag.name.clone()));
                    Token::Start(tag)
                }
                Event::End(e) => Token::End(std::str::from_utf8(e.name().as_ref())?.to_string()),
                Event::Text(e) => Token::Text(e.unescape()?.into_owned()),
                Event::CData(e) => Token::Text(std::str::from_utf8(&e)?.to_string()),
                Event::Eof => Token::Eof,
                _ => continue,
            };
            return Ok(token);
        }
    }

    /// Next token with adjacent text and CDATA coalesced into one text node.
    fn next_token(&mut self) -> Result<Token> {
        let mut text = match self.read_token()? {
            Token::Text(text) => text,
            other => return Ok(other),
        };

        loop {
            match self.read_token()? {
                Token::Text(more) => text.push_str(&more),
                other => {
                    self.pending.push_front(other);
                    return Ok(Token::Text(text));
                }
            }
        }
    }

    fn next_node(&mut self) -> Result<Node> {
        loop {
            match self.next_token()? {
                Token::Start(tag) => return Ok(Node::Start(tag)),
                Token::End(_) => return Ok(Node::End),
                Token::Eof => return Ok(Node::Eof),
                Token::Text(text) if text.trim().is_empty() => continue,
                Token::Text(text) => return Err(ChangeLogError::UnexpectedText(clean_text(&text))),
            }
        }
    }
}

// ============================================================================
// Grammar
// ============================================================================

struct ChangeLogParser<R> {
    lexer: Lexer<R>,
    since: Option<i32>,
}

impl<R: BufRead> ChangeLogParser<R> {
    fn new(reader: R, since: Option<i32>) -> Self {
        Self {
            lexer: Lexer::new(reader),
            since,
        }
    }

    fn read_change_log(mut self) -> Result<Vec<ReleaseItem>> {
        match self.lexer.next_node()? {
            Node::Start(root) => root.require(TAG_CHANGELOG)?,
            Node::End | Node::Eof => return Err(ChangeLogError::MissingRoot),
        }

        let mut releases = Vec::new();
        loop {
            match self.lexer.next_node()? {
                Node::Start(tag) => {
                    tag.require(TAG_RELEASE)?;
                    match self.read_release(&tag)? {
                        Some(release) => releases.push(release),
                        None => break,
                    }
                }
                Node::End | Node::Eof => break,
            }
        }

        debug!(releases = releases.len(), since = ?self.since, "Parsed change log");
        Ok(releases)
    }

    /// Returns `None` once the since-bound is reached.
    fn read_release(&mut self, tag: &Tag) -> Result<Option<ReleaseItem>> {
        let version_name = tag
            .attribute(ATTRIBUTE_VERSION)
            .filter(|name| !name.is_empty())
            .ok_or(ChangeLogError::MissingAttribute(ATTRIBUTE_VERSION))?;
        let version_code = tag
            .attribute(ATTRIBUTE_VERSION_CODE)
            .map(parse_version_code)
            .ok_or(ChangeLogError::MissingAttribute(ATTRIBUTE_VERSION))?;

        if let Some(since) = self.since {
            if version_code != NO_VERSION && version_code <= since {
                debug!(version_code, since, "Reached already seen release");
                return Ok(None);
            }
        }

        let mut changes = Vec::new();
        loop {
            match self.lexer.next_node()? {
                Node::Start(child) => {
                    child.require(TAG_CHANGE)?;
                    changes.push(self.read_change()?);
                }
                Node::End => break,
                Node::Eof => return Err(ChangeLogError::UnexpectedEof),
            }
        }

        let date = tag.attribute(ATTRIBUTE_DATE).map(str::to_string);
        ReleaseItem::new(version_code, version_name, date, changes).map(Some)
    }

    fn read_change(&mut self) -> Result<String> {
        let text = match self.lexer.next_token()? {
            Token::Text(text) => text,
            Token::Eof => return Err(ChangeLogError::UnexpectedEof),
            _ => return Err(ChangeLogError::ExpectedText),
        };

        match self.lexer.next_token()? {
            Token::End(name) if name == TAG_CHANGE => {}
            Token::Eof => return Err(ChangeLogError::UnexpectedEof),
            _ => return Err(ChangeLogError::ExpectedEndTag(TAG_CHANGE)),
        }

        let text = clean_text(&text);
        if text.is_empty() {
            return Err(ChangeLogError::ExpectedText);
        }
        Ok(text)
    }
}
