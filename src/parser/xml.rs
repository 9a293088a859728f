//! Incremental tag/attribute parser.
//!
//! Classifies an XML-like document up to a cutoff offset into a
//! [`XmlParserState`]. The parser is a byte-level state machine: every
//! syntactic delimiter is ASCII, so byte offsets always land on char
//! boundaries. Malformed input never fails; the parser reports whatever
//! state it last reached, which is exactly what completion needs when the
//! user is mid-typing.
//!
//! ```
//! use axaml::parser::{XmlParser, XmlParserState};
//!
//! let text = r#"<Window xmlns="a" Title=""#;
//! let parser = XmlParser::parse(text, text.len());
//! assert_eq!(parser.state(), XmlParserState::AttributeValue);
//! assert_eq!(parser.attribute_name(), Some("Title"));
//! ```

use crate::base::chars::is_xml_whitespace;
use crate::base::{TextRange, clamp_offset, span};

const COMMENT_START: &str = "<!--";
const COMMENT_END: &str = "-->";
const CDATA_START: &str = "<![CDATA[";
const CDATA_END: &str = "]]>";

/// What construct the cutoff position falls inside.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum XmlParserState {
    /// Element content (text between tags) or before the first tag.
    None,
    /// Inside `<!-- ... -->`.
    InsideComment,
    /// Inside `<![CDATA[ ... ]]>`.
    InsideCdata,
    /// Typing the tag name right after `<`.
    StartElement,
    /// Inside a start tag, between attributes.
    InsideElement,
    /// Typing an attribute name.
    StartAttribute,
    /// After `=`, before the opening quote.
    BeforeAttributeValue,
    /// Inside a (quoted) attribute value.
    AttributeValue,
    /// Right after the closing quote of an attribute value.
    AfterAttributeValue,
}

impl XmlParserState {
    /// True while the cutoff sits somewhere inside a start tag.
    pub fn is_inside_tag(&self) -> bool {
        matches!(
            self,
            XmlParserState::StartElement
                | XmlParserState::InsideElement
                | XmlParserState::StartAttribute
                | XmlParserState::BeforeAttributeValue
                | XmlParserState::AttributeValue
                | XmlParserState::AfterAttributeValue
        )
    }
}

/// Incremental parser over caller-owned text.
///
/// Cheap to clone; a clone can be advanced independently (used for
/// lookahead such as [`XmlParser::seek_next_sibling_start_tag`]).
#[derive(Clone, Debug)]
pub struct XmlParser<'a> {
    text: &'a str,
    state: XmlParserState,
    /// Number of bytes consumed so far.
    pos: usize,
    /// Offset of the `<` that opened the current comment/CDATA/tag.
    tag_open: usize,
    element_name_start: Option<usize>,
    element_name_end: Option<usize>,
    closing_tag: bool,
    attribute_name_start: Option<usize>,
    attribute_name_end: Option<usize>,
    attribute_value_start: Option<usize>,
    attribute_value_end: Option<usize>,
    quote: Option<u8>,
    /// Start offsets (`<`) of the currently open ancestors, outermost first.
    containing_tags: Vec<usize>,
}

impl<'a> XmlParser<'a> {
    /// Create a parser positioned at the start of `text`.
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            state: XmlParserState::None,
            pos: 0,
            tag_open: 0,
            element_name_start: None,
            element_name_end: None,
            closing_tag: false,
            attribute_name_start: None,
            attribute_name_end: None,
            attribute_value_start: None,
            attribute_value_end: None,
            quote: None,
            containing_tags: Vec::new(),
        }
    }

    /// Parse `text` from the start up to `offset` (clamped to the text).
    pub fn parse(text: &'a str, offset: usize) -> Self {
        let mut parser = Self::new(text);
        parser.parse_until(offset);
        parser
    }

    /// Continue parsing up to `offset`. Offsets behind the current position
    /// are ignored; the parser never rewinds.
    pub fn parse_until(&mut self, offset: usize) {
        let end = clamp_offset(self.text, offset);
        while self.pos < end {
            self.step();
        }
    }

    /// Consume one byte. Returns `false` at end of text.
    fn step(&mut self) -> bool {
        let bytes = self.text.as_bytes();
        let Some(&b) = bytes.get(self.pos) else {
            return false;
        };
        let i = self.pos;
        self.pos += 1;

        match self.state {
            XmlParserState::InsideComment => {
                if self.ends_with_at(i, COMMENT_END) && i >= self.tag_open + COMMENT_START.len() + 2
                {
                    self.state = XmlParserState::None;
                }
            }
            XmlParserState::InsideCdata => {
                if self.ends_with_at(i, CDATA_END) && i >= self.tag_open + CDATA_START.len() + 2 {
                    self.state = XmlParserState::None;
                }
            }
            XmlParserState::None => {
                if b == b'<' {
                    self.open_tag(i);
                }
            }
            XmlParserState::StartElement => self.step_start_element(i, b),
            XmlParserState::InsideElement => match b {
                b'>' => self.close_tag_bracket(i),
                b'<' => self.abandon_tag(i),
                b'/' => {}
                _ if is_xml_whitespace(b) => {}
                _ => self.start_attribute(i),
            },
            XmlParserState::StartAttribute => match b {
                b'=' => {
                    self.attribute_name_end.get_or_insert(i);
                    self.state = XmlParserState::BeforeAttributeValue;
                }
                b'>' => {
                    self.attribute_name_end.get_or_insert(i);
                    self.close_tag_bracket(i);
                }
                b'<' => self.abandon_tag(i),
                b'/' => self.leave_attribute(),
                _ if is_xml_whitespace(b) => {
                    self.attribute_name_end.get_or_insert(i);
                }
                _ => {
                    // A name char after `Name ` starts a value-less neighbour
                    if self.attribute_name_end.is_some() {
                        self.start_attribute(i);
                    }
                }
            },
            XmlParserState::BeforeAttributeValue => match b {
                b'"' | b'\'' => {
                    self.quote = Some(b);
                    self.attribute_value_start = Some(i + 1);
                    self.state = XmlParserState::AttributeValue;
                }
                b'>' => self.close_tag_bracket(i),
                b'<' => self.abandon_tag(i),
                _ if is_xml_whitespace(b) => {}
                _ => {
                    self.quote = None;
                    self.attribute_value_start = Some(i);
                    self.state = XmlParserState::AttributeValue;
                }
            },
            XmlParserState::AttributeValue => match self.quote {
                Some(q) if b == q => {
                    self.attribute_value_end = Some(i);
                    self.state = XmlParserState::AfterAttributeValue;
                }
                Some(_) => {}
                None if is_xml_whitespace(b) => self.leave_attribute(),
                None if b == b'>' => {
                    self.attribute_value_end = Some(i);
                    self.close_tag_bracket(i);
                }
                None => {}
            },
            XmlParserState::AfterAttributeValue => match b {
                b'>' => self.close_tag_bracket(i),
                b'/' => self.leave_attribute(),
                b'<' => self.abandon_tag(i),
                _ if is_xml_whitespace(b) => self.leave_attribute(),
                _ => self.start_attribute(i),
            },
        }
        true
    }

    fn step_start_element(&mut self, i: usize, b: u8) {
        if self.ends_with_at(i, COMMENT_START) && i + 1 - self.tag_open == COMMENT_START.len() {
            self.containing_tags.pop();
            self.state = XmlParserState::InsideComment;
            return;
        }
        if self.ends_with_at(i, CDATA_START) && i + 1 - self.tag_open == CDATA_START.len() {
            self.containing_tags.pop();
            self.state = XmlParserState::InsideCdata;
            return;
        }
        match b {
            b'/' if self.element_name_start == Some(i) && !self.closing_tag => {
                self.closing_tag = true;
                self.element_name_start = Some(i + 1);
            }
            b'/' => {
                self.element_name_end = Some(i);
                self.state = XmlParserState::InsideElement;
            }
            b'>' => {
                self.element_name_end = Some(i);
                self.close_tag_bracket(i);
            }
            b'<' => self.abandon_tag(i),
            _ if is_xml_whitespace(b) => {
                self.element_name_end = Some(i);
                self.state = XmlParserState::InsideElement;
            }
            _ => {}
        }
    }

    fn open_tag(&mut self, i: usize) {
        self.state = XmlParserState::StartElement;
        self.tag_open = i;
        self.element_name_start = Some(i + 1);
        self.element_name_end = None;
        self.closing_tag = false;
        self.reset_attribute();
        self.containing_tags.push(i);
    }

    /// `<` inside an unfinished tag: drop the unfinished tag and open anew.
    fn abandon_tag(&mut self, i: usize) {
        self.containing_tags.pop();
        self.open_tag(i);
    }

    fn start_attribute(&mut self, i: usize) {
        self.reset_attribute();
        self.attribute_name_start = Some(i);
        self.state = XmlParserState::StartAttribute;
    }

    /// Back between attributes; the finished attribute is no longer current.
    fn leave_attribute(&mut self) {
        self.reset_attribute();
        self.state = XmlParserState::InsideElement;
    }

    fn reset_attribute(&mut self) {
        self.attribute_name_start = None;
        self.attribute_name_end = None;
        self.attribute_value_start = None;
        self.attribute_value_end = None;
        self.quote = None;
    }

    /// Handle the `>` that ends the current tag.
    fn close_tag_bracket(&mut self, i: usize) {
        let bytes = self.text.as_bytes();
        let self_closing = i > 0 && bytes[i - 1] == b'/';
        let declaration = matches!(bytes.get(self.tag_open + 1), Some(b'?' | b'!'));
        if self.closing_tag {
            // Pops the closing tag itself and the element it closes
            self.containing_tags.pop();
            self.containing_tags.pop();
        } else if self_closing || declaration {
            self.containing_tags.pop();
        }
        self.state = XmlParserState::None;
    }

    /// Whether `text[..=i]` ends with `suffix`.
    fn ends_with_at(&self, i: usize, suffix: &str) -> bool {
        self.text.as_bytes()[..=i].ends_with(suffix.as_bytes())
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// The text this parser runs over.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Current state at the parse position.
    pub fn state(&self) -> XmlParserState {
        self.state
    }

    /// Byte offset parsing stopped at.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// True when the current (or last) tag is a closing tag (`</Name`).
    pub fn is_closing_tag(&self) -> bool {
        self.closing_tag
    }

    /// Span of the current tag name. While the name is still being typed the
    /// span ends at the parse position.
    pub fn tag_name_range(&self) -> Option<TextRange> {
        if matches!(
            self.state,
            XmlParserState::InsideComment | XmlParserState::InsideCdata
        ) {
            return None;
        }
        let start = self.element_name_start?;
        let end = self.element_name_end.unwrap_or(self.pos);
        Some(span(start, end))
    }

    /// Current tag name (without the `/` of a closing tag).
    pub fn tag_name(&self) -> Option<&'a str> {
        self.tag_name_range().map(|r| self.slice(r))
    }

    /// Span of the current attribute name.
    pub fn attribute_name_range(&self) -> Option<TextRange> {
        let start = self.attribute_name_start?;
        if !self.state.is_inside_tag() {
            return None;
        }
        Some(span(start, self.attribute_name_end.unwrap_or(self.pos)))
    }

    /// Current attribute name.
    pub fn attribute_name(&self) -> Option<&'a str> {
        self.attribute_name_range().map(|r| self.slice(r))
    }

    /// Span of the current attribute value: from after the opening quote to
    /// the closing quote, or to the parse position while still open.
    pub fn attribute_value_range(&self) -> Option<TextRange> {
        let start = self.attribute_value_start?;
        if !matches!(
            self.state,
            XmlParserState::AttributeValue | XmlParserState::AfterAttributeValue
        ) {
            return None;
        }
        let end = match self.state {
            XmlParserState::AttributeValue => self.pos,
            _ => self.attribute_value_end?,
        };
        Some(span(start, end))
    }

    /// Current attribute value text.
    pub fn attribute_value(&self) -> Option<&'a str> {
        self.attribute_value_range().map(|r| self.slice(r))
    }

    /// Number of currently open ancestor tags (including the tag being
    /// typed, if any).
    pub fn nesting_level(&self) -> usize {
        self.containing_tags.len()
    }

    /// Offset of the `<` of the innermost open tag.
    pub fn containing_tag_start(&self) -> Option<usize> {
        self.containing_tags.last().copied()
    }

    /// Start offsets of every open tag, outermost first.
    pub fn containing_tags(&self) -> &[usize] {
        &self.containing_tags
    }

    /// Name of the open tag `level` steps out from the innermost one
    /// (`0` = innermost).
    pub fn enclosing_tag_name(&self, level: usize) -> Option<&'a str> {
        let idx = self.containing_tags.len().checked_sub(level + 1)?;
        let start = self.containing_tags[idx] + 1;
        let rest = self.text.get(start..)?;
        let len = rest
            .bytes()
            .position(|b| is_xml_whitespace(b) || matches!(b, b'>' | b'/' | b'<'))
            .unwrap_or(rest.len());
        Some(&rest[..len])
    }

    /// Value of attribute `name` on the nearest open ancestor that declares
    /// it, searching at most `max_levels` levels outward from the innermost
    /// open tag.
    pub fn find_ancestor_attribute_value(&self, name: &str, max_levels: usize) -> Option<&'a str> {
        self.containing_tags
            .iter()
            .rev()
            .take(max_levels)
            .find_map(|&start| tag_attribute_value(self.text, start, name))
    }

    /// Advance to the start tag of the next sibling of the current element.
    ///
    /// Skips to the end of the currently open tag, then past the element's
    /// content until nesting returns to the element's parent level, then to
    /// the next `<` that does not open a comment, CDATA section or
    /// declaration. Returns the offset of that `<`, or `None` when the text
    /// ends or the next tag closes the parent.
    pub fn seek_next_sibling_start_tag(&mut self) -> Option<usize> {
        let parent_level = if self.state.is_inside_tag() {
            self.containing_tags.len().saturating_sub(1)
        } else {
            self.containing_tags.len()
        };

        while self.state.is_inside_tag() {
            if !self.step() {
                return None;
            }
        }
        while self.containing_tags.len() > parent_level {
            if !self.step() {
                return None;
            }
        }
        loop {
            if self.state == XmlParserState::StartElement
                && self.pos == self.tag_open + 1
                && !matches!(self.text.as_bytes().get(self.pos), Some(b'!' | b'?'))
            {
                break;
            }
            if !self.step() {
                return None;
            }
        }
        let start = self.tag_open;
        if self.text.as_bytes().get(start + 1) == Some(&b'/') {
            return None;
        }
        Some(start)
    }

    fn slice(&self, range: TextRange) -> &'a str {
        crate::base::range_text(self.text, range)
    }
}

/// Scan the start tag at `tag_start` for attribute `name` and return its
/// value.
fn tag_attribute_value<'a>(text: &'a str, tag_start: usize, name: &str) -> Option<&'a str> {
    let mut parser = XmlParser::new(text);
    parser.pos = tag_start;
    loop {
        let before = parser.state;
        if !parser.step() {
            return None;
        }
        if before == XmlParserState::AttributeValue
            && parser.state == XmlParserState::AfterAttributeValue
            && parser.attribute_name() == Some(name)
        {
            return parser.attribute_value();
        }
        if parser.state == XmlParserState::None && parser.pos > tag_start + 1 {
            return None;
        }
    }
}
