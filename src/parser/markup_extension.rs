//! Markup-extension parser for `{Name Arg=Value, Arg2={Inner X}}` values.
//!
//! A bracket stack saves the outer extension's cursor context on every `{`
//! that opens a nested extension and restores it on the matching `}`.
//! There is no error state: `,` always ends the current argument and starts
//! the next one, and anything ambiguous degrades to best-effort spans.

use crate::base::{TextRange, clamp_offset, range_text, span};

/// Cursor context inside a markup extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkupExtensionState {
    /// Outside any `{...}` (plain text, or after the outermost `}`).
    None,
    /// Typing the extension name right after `{`.
    StartElement,
    /// Between arguments, after a nested extension or quoted value closed.
    InsideElement,
    /// Typing an argument name after `,`.
    StartAttribute,
    /// Argument name finished by whitespace, `=` not typed yet.
    AfterAttribute,
    /// After `=`, value not started yet.
    BeforeAttributeValue,
    /// Typing an argument value (named or positional).
    AttributeValue,
}

/// Saved parser context for one `{...}` level.
#[derive(Clone, Copy, Debug)]
struct Frame {
    state: MarkupExtensionState,
    element_name_start: usize,
    element_name_end: Option<usize>,
    attribute_name_start: Option<usize>,
    attribute_name_end: Option<usize>,
    attribute_value_start: Option<usize>,
    attribute_value_end: Option<usize>,
    attributes_count: usize,
    in_quotes: bool,
}

impl Frame {
    fn new(state: MarkupExtensionState, element_name_start: usize) -> Self {
        Self {
            state,
            element_name_start,
            element_name_end: None,
            attribute_name_start: None,
            attribute_name_end: None,
            attribute_value_start: None,
            attribute_value_end: None,
            attributes_count: 0,
            in_quotes: false,
        }
    }

    fn clear_attribute(&mut self) {
        self.attribute_name_start = None;
        self.attribute_name_end = None;
        self.attribute_value_start = None;
        self.attribute_value_end = None;
        self.in_quotes = false;
    }
}

/// Incremental parser for a single attribute value.
#[derive(Clone, Debug)]
pub struct MarkupExtensionParser<'a> {
    text: &'a str,
    pos: usize,
    frame: Frame,
    stack: Vec<Frame>,
    /// `{}` escape prefix: the rest of the value is literal text.
    literal: bool,
}

impl<'a> MarkupExtensionParser<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            frame: Frame::new(MarkupExtensionState::None, 0),
            stack: Vec::new(),
            literal: false,
        }
    }

    /// Parse `text` up to `offset` (clamped).
    pub fn parse(text: &'a str, offset: usize) -> Self {
        let mut parser = Self::new(text);
        parser.parse_until(offset);
        parser
    }

    pub fn parse_until(&mut self, offset: usize) {
        let end = clamp_offset(self.text, offset);
        while self.pos < end {
            let b = self.text.as_bytes()[self.pos];
            let i = self.pos;
            self.pos += 1;
            if !self.literal {
                self.step(i, b);
            }
        }
    }

    fn step(&mut self, i: usize, b: u8) {
        use MarkupExtensionState as S;

        let ws = b.is_ascii_whitespace();
        match self.frame.state {
            S::None => {
                if b == b'{' && self.stack.is_empty() {
                    self.frame = Frame::new(S::StartElement, i + 1);
                }
            }
            S::StartElement => match b {
                b'}' if self.stack.is_empty() && i == self.frame.element_name_start => {
                    self.literal = true;
                    self.frame.state = S::None;
                }
                _ if ws && i == self.frame.element_name_start => {
                    self.frame.element_name_start = i + 1;
                }
                _ if ws => {
                    self.frame.element_name_end = Some(i);
                    self.frame.clear_attribute();
                    self.frame.state = S::AttributeValue;
                }
                b'}' => {
                    self.frame.element_name_end = Some(i);
                    self.close(i);
                }
                b',' => {
                    self.frame.element_name_end = Some(i);
                    self.next_attribute();
                }
                _ => {}
            },
            S::AttributeValue => self.step_value(i, b),
            S::StartAttribute => match b {
                _ if ws => {
                    if self.frame.attribute_name_start.is_some() {
                        self.frame.attribute_name_end = Some(i);
                        self.frame.state = S::AfterAttribute;
                    }
                }
                b'=' => {
                    let start = *self.frame.attribute_name_start.get_or_insert(i);
                    self.frame.attribute_name_end = Some(i.max(start));
                    self.frame.state = S::BeforeAttributeValue;
                }
                b',' => self.next_attribute(),
                b'}' => self.close(i),
                b'{' => {
                    self.frame.state = S::AttributeValue;
                    self.open_nested(i);
                }
                b'\'' => {
                    self.frame.state = S::AttributeValue;
                    self.frame.attribute_value_start = Some(i + 1);
                    self.frame.in_quotes = true;
                }
                _ => {
                    self.frame.attribute_name_start.get_or_insert(i);
                }
            },
            S::AfterAttribute => match b {
                _ if ws => {}
                b'=' => self.frame.state = S::BeforeAttributeValue,
                b',' => self.next_attribute(),
                b'}' => self.close(i),
                _ => {
                    self.frame.clear_attribute();
                    self.frame.attribute_name_start = Some(i);
                    self.frame.state = S::StartAttribute;
                }
            },
            S::BeforeAttributeValue => match b {
                _ if ws => {}
                b'\'' => {
                    self.frame.attribute_value_start = Some(i + 1);
                    self.frame.in_quotes = true;
                    self.frame.state = S::AttributeValue;
                }
                b'{' => {
                    self.frame.state = S::AttributeValue;
                    self.open_nested(i);
                }
                b',' => self.next_attribute(),
                b'}' => self.close(i),
                _ => {
                    self.frame.attribute_value_start = Some(i);
                    self.frame.state = S::AttributeValue;
                }
            },
            S::InsideElement => match b {
                b',' => self.next_attribute(),
                b'}' => self.close(i),
                _ => {}
            },
        }
    }

    fn step_value(&mut self, i: usize, b: u8) {
        use MarkupExtensionState as S;

        if self.frame.in_quotes {
            if b == b'\'' {
                self.frame.attribute_value_end = Some(i);
                self.frame.in_quotes = false;
                self.frame.state = S::InsideElement;
            }
            return;
        }
        match b {
            b',' => {
                self.frame.attribute_value_end = Some(self.trim_end(i));
                self.next_attribute();
            }
            b'}' => {
                self.frame.attribute_value_end = Some(self.trim_end(i));
                self.close(i);
            }
            b'{' => self.open_nested(i),
            b'=' if self.frame.attribute_name_start.is_none() => {
                // Positional text turns out to be the argument name
                let start = self.frame.attribute_value_start.unwrap_or(i);
                self.frame.attribute_name_start = Some(start);
                self.frame.attribute_name_end = Some(self.trim_end(i).max(start));
                self.frame.attribute_value_start = None;
                self.frame.attribute_value_end = None;
                self.frame.state = S::BeforeAttributeValue;
            }
            b'\'' if self.frame.attribute_value_start.is_none() => {
                self.frame.attribute_value_start = Some(i + 1);
                self.frame.in_quotes = true;
            }
            _ if b.is_ascii_whitespace() => {}
            _ => {
                self.frame.attribute_value_start.get_or_insert(i);
            }
        }
    }

    fn open_nested(&mut self, i: usize) {
        self.frame.attribute_value_start.get_or_insert(i);
        self.stack.push(self.frame);
        self.frame = Frame::new(MarkupExtensionState::StartElement, i + 1);
    }

    fn close(&mut self, i: usize) {
        match self.stack.pop() {
            Some(outer) => {
                self.frame = outer;
                self.frame.attribute_value_end = Some(i + 1);
                self.frame.state = MarkupExtensionState::InsideElement;
            }
            None => self.frame.state = MarkupExtensionState::None,
        }
    }

    fn next_attribute(&mut self) {
        self.frame.attributes_count += 1;
        self.frame.clear_attribute();
        self.frame.state = MarkupExtensionState::StartAttribute;
    }

    /// Offset `end` moved back over trailing whitespace.
    fn trim_end(&self, end: usize) -> usize {
        let bytes = self.text.as_bytes();
        let floor = self.frame.attribute_value_start.unwrap_or(end);
        let mut end = end;
        while end > floor && bytes[end - 1].is_ascii_whitespace() {
            end -= 1;
        }
        end
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn state(&self) -> MarkupExtensionState {
        self.frame.state
    }

    /// Depth of the bracket stack (`0` = outermost extension).
    pub fn nesting_level(&self) -> usize {
        self.stack.len()
    }

    /// Number of `,`-separated arguments seen so far at the current level.
    pub fn attributes_count(&self) -> usize {
        self.frame.attributes_count
    }

    /// True when the value started with the `{}` literal escape.
    pub fn is_literal(&self) -> bool {
        self.literal
    }

    pub fn extension_name_range(&self) -> Option<TextRange> {
        if self.literal {
            return None;
        }
        if self.frame.state == MarkupExtensionState::None && self.frame.element_name_start == 0 {
            return None;
        }
        let end = self.frame.element_name_end.unwrap_or(self.pos);
        Some(span(self.frame.element_name_start, end))
    }

    /// Name of the innermost extension at the cursor (`Binding`, `x:Static`).
    pub fn extension_name(&self) -> Option<&'a str> {
        self.extension_name_range()
            .map(|r| range_text(self.text, r))
    }

    pub fn attribute_name_range(&self) -> Option<TextRange> {
        let start = self.frame.attribute_name_start?;
        let end = match self.frame.state {
            MarkupExtensionState::StartAttribute => self.pos,
            _ => self.frame.attribute_name_end.unwrap_or(self.pos),
        };
        Some(span(start, end))
    }

    /// Name of the current argument; `None` for positional arguments.
    pub fn attribute_name(&self) -> Option<&'a str> {
        self.attribute_name_range().map(|r| range_text(self.text, r))
    }

    pub fn attribute_value_range(&self) -> Option<TextRange> {
        match self.frame.state {
            MarkupExtensionState::AttributeValue => {
                let start = self.frame.attribute_value_start.unwrap_or(self.pos);
                Some(span(start, self.pos))
            }
            MarkupExtensionState::InsideElement => {
                let start = self.frame.attribute_value_start?;
                Some(span(start, self.frame.attribute_value_end.unwrap_or(self.pos)))
            }
            _ => None,
        }
    }

    /// Value typed so far for the current argument.
    pub fn attribute_value(&self) -> Option<&'a str> {
        self.attribute_value_range()
            .map(|r| range_text(self.text, r))
    }
}
