//! Style selector parser.
//!
//! Recursive-descent over a single selector chain such as
//! `Button:pointerover.warning#okBtn[IsEnabled=True] > ContentPresenter`,
//! driven by an explicit [`SelectorStatement`] enum. Unlike the tag and
//! markup-extension parsers, a selector is a whole expression, so an invalid
//! token sets [`SelectorParser::is_error`] and halts. Completion still works
//! on the valid prefix through [`SelectorParser::last_parsed_position`] and
//! [`SelectorParser::last_segment_start`].
//!
//! Every recognised component is exposed as a span into the input; the
//! fields always hold the *most recent* occurrence of each component, which
//! is the one under the caret when parsing a prefix.

use crate::base::chars::{is_identifier_continue, is_identifier_start, is_style_class_char};
use crate::base::{TextRange, clamp_offset, range_text, span};

const TEMPLATE_TRAVERSAL: &str = "/template/";

/// Parser position in the selector grammar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SelectorStatement {
    Start,
    Middle,
    Colon,
    Class,
    Name,
    CanHaveType,
    Traversal,
    TypeName,
    Property,
    AttachedProperty,
    Template,
    Value,
    Function,
    FunctionArgs,
    End,
}

/// Selector pseudo-functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SelectorFunction {
    Is,
    Not,
    NthChild,
    NthLastChild,
}

impl SelectorFunction {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "is" => Some(SelectorFunction::Is),
            "not" => Some(SelectorFunction::Not),
            "nth-child" => Some(SelectorFunction::NthChild),
            "nth-last-child" => Some(SelectorFunction::NthLastChild),
            _ => None,
        }
    }
}

/// Result of parsing a selector; also the parser itself.
#[derive(Clone, Debug)]
pub struct SelectorParser<'a> {
    text: &'a str,
    pos: usize,
    statement: SelectorStatement,
    is_error: bool,
    /// A segment must follow (after `,`, a combinator, `/template/`, `:not(`).
    expect_segment: bool,
    last_segment_start: usize,
    last_parsed_position: usize,
    open_functions: Vec<SelectorFunction>,
    current_function: Option<SelectorFunction>,
    /// `[(Type.Prop)=...]` form.
    attached_in_parens: bool,

    namespace: Option<TextRange>,
    type_name: Option<TextRange>,
    class: Option<TextRange>,
    pseudo_class: Option<TextRange>,
    element_name: Option<TextRange>,
    property_name: Option<TextRange>,
    attached_namespace: Option<TextRange>,
    attached_type: Option<TextRange>,
    value: Option<TextRange>,
    function_name: Option<TextRange>,
    function_args: Option<TextRange>,
}

impl<'a> SelectorParser<'a> {
    /// Parse the whole of `text`.
    pub fn parse(text: &'a str) -> Self {
        Self::parse_until(text, text.len())
    }

    /// Parse the prefix of `text` ending at `offset` (clamped).
    pub fn parse_until(text: &'a str, offset: usize) -> Self {
        let text = &text[..clamp_offset(text, offset)];
        let mut parser = Self {
            text,
            pos: 0,
            statement: SelectorStatement::Start,
            is_error: false,
            expect_segment: false,
            last_segment_start: 0,
            last_parsed_position: 0,
            open_functions: Vec::new(),
            current_function: None,
            attached_in_parens: false,
            namespace: None,
            type_name: None,
            class: None,
            pseudo_class: None,
            element_name: None,
            property_name: None,
            attached_namespace: None,
            attached_type: None,
            value: None,
            function_name: None,
            function_args: None,
        };
        parser.run();
        parser
    }

    fn run(&mut self) {
        while self.statement != SelectorStatement::End {
            let next = match self.statement {
                SelectorStatement::Start => self.parse_start(),
                SelectorStatement::Middle => self.parse_middle(),
                SelectorStatement::CanHaveType => self.parse_can_have_type(),
                SelectorStatement::Colon => self.parse_colon(),
                SelectorStatement::Class => self.parse_class(),
                SelectorStatement::Name => self.parse_name(),
                SelectorStatement::Traversal => self.parse_traversal(),
                SelectorStatement::TypeName => self.parse_type_name(),
                SelectorStatement::Property => self.parse_property(),
                SelectorStatement::AttachedProperty => self.parse_attached_property(),
                SelectorStatement::Template => self.parse_template(),
                SelectorStatement::Value => self.parse_value(),
                SelectorStatement::Function => self.parse_function(),
                SelectorStatement::FunctionArgs => self.parse_function_args(),
                SelectorStatement::End => None,
            };
            match next {
                Some(statement) => {
                    self.statement = statement;
                    self.last_parsed_position = self.pos;
                }
                None => {
                    self.is_error = true;
                    self.statement = SelectorStatement::End;
                }
            }
        }
    }

    // ---------------------------------------------------------------------
    // Grammar
    // ---------------------------------------------------------------------

    fn parse_start(&mut self) -> Option<SelectorStatement> {
        self.skip_whitespace();
        let Some(c) = self.peek() else {
            return (!self.expect_segment).then_some(SelectorStatement::End);
        };
        self.expect_segment = false;
        self.last_segment_start = self.pos;
        match c {
            ':' => {
                self.bump();
                Some(SelectorStatement::Colon)
            }
            '.' => {
                self.bump();
                Some(SelectorStatement::Class)
            }
            '#' => {
                self.bump();
                Some(SelectorStatement::Name)
            }
            '^' => {
                self.bump();
                Some(SelectorStatement::Middle)
            }
            _ if is_identifier_start(c) => Some(SelectorStatement::TypeName),
            _ => None,
        }
    }

    fn parse_middle(&mut self) -> Option<SelectorStatement> {
        let Some(c) = self.peek() else {
            return self
                .open_functions
                .is_empty()
                .then_some(SelectorStatement::End);
        };
        match c {
            ':' | '.' | '#' | '[' => {
                self.last_segment_start = self.pos;
                self.bump();
                Some(match c {
                    ':' => SelectorStatement::Colon,
                    '.' => SelectorStatement::Class,
                    '#' => SelectorStatement::Name,
                    _ => SelectorStatement::Property,
                })
            }
            '/' => Some(SelectorStatement::Template),
            '>' => Some(SelectorStatement::Traversal),
            _ if c.is_whitespace() => Some(SelectorStatement::Traversal),
            ',' => {
                self.bump();
                self.expect_segment = true;
                Some(SelectorStatement::Start)
            }
            ')' if !self.open_functions.is_empty() => {
                self.bump();
                self.open_functions.pop();
                Some(SelectorStatement::Middle)
            }
            _ => None,
        }
    }

    fn parse_can_have_type(&mut self) -> Option<SelectorStatement> {
        if self.peek() == Some('[') {
            self.last_segment_start = self.pos;
            self.bump();
            return Some(SelectorStatement::Property);
        }
        Some(SelectorStatement::Middle)
    }

    fn parse_colon(&mut self) -> Option<SelectorStatement> {
        let ident = self.take_while(is_style_class_char)?;
        if self.peek() == Some('(') {
            let function = SelectorFunction::from_name(range_text(self.text, ident))?;
            self.function_name = Some(ident);
            self.function_args = None;
            self.current_function = Some(function);
            self.bump();
            return Some(SelectorStatement::Function);
        }
        self.pseudo_class = Some(ident);
        Some(SelectorStatement::Middle)
    }

    fn parse_function(&mut self) -> Option<SelectorStatement> {
        let function = self.current_function.take()?;
        match function {
            SelectorFunction::Is => {
                self.open_functions.push(function);
                Some(SelectorStatement::TypeName)
            }
            SelectorFunction::Not => {
                self.open_functions.push(function);
                self.expect_segment = true;
                Some(SelectorStatement::Start)
            }
            SelectorFunction::NthChild | SelectorFunction::NthLastChild => {
                Some(SelectorStatement::FunctionArgs)
            }
        }
    }

    fn parse_function_args(&mut self) -> Option<SelectorStatement> {
        let start = self.pos;
        let rest = &self.text[start..];
        let close = rest.find(')')?;
        let args = rest[..close].trim();
        let valid = matches!(args, "odd" | "even")
            || (!args.is_empty()
                && args
                    .chars()
                    .all(|c| c.is_ascii_digit() || matches!(c, 'n' | '+' | '-') || c.is_whitespace()));
        if !valid {
            return None;
        }
        self.function_args = Some(span(start, start + close));
        self.pos = start + close + 1;
        Some(SelectorStatement::Middle)
    }

    fn parse_class(&mut self) -> Option<SelectorStatement> {
        self.class = Some(self.take_while(is_style_class_char)?);
        Some(SelectorStatement::Middle)
    }

    fn parse_name(&mut self) -> Option<SelectorStatement> {
        self.element_name = Some(self.take_identifier()?);
        Some(SelectorStatement::CanHaveType)
    }

    fn parse_traversal(&mut self) -> Option<SelectorStatement> {
        self.skip_whitespace();
        match self.peek() {
            Some('>') => {
                self.bump();
                self.skip_whitespace();
                self.expect_segment = true;
                Some(SelectorStatement::Start)
            }
            Some('/') => Some(SelectorStatement::Template),
            None | Some(',') | Some(')') => Some(SelectorStatement::Middle),
            Some(_) => {
                self.expect_segment = true;
                Some(SelectorStatement::Start)
            }
        }
    }

    fn parse_type_name(&mut self) -> Option<SelectorStatement> {
        self.last_segment_start = self.pos;
        let first = self.take_identifier()?;
        if self.peek() == Some('|') {
            self.bump();
            let name = self.take_identifier()?;
            self.namespace = Some(first);
            self.type_name = Some(name);
        } else {
            self.namespace = None;
            self.type_name = Some(first);
        }
        Some(SelectorStatement::CanHaveType)
    }

    fn parse_template(&mut self) -> Option<SelectorStatement> {
        self.last_segment_start = self.pos;
        if !self.text[self.pos..].starts_with(TEMPLATE_TRAVERSAL) {
            return None;
        }
        self.pos += TEMPLATE_TRAVERSAL.len();
        self.expect_segment = true;
        Some(SelectorStatement::Start)
    }

    fn parse_property(&mut self) -> Option<SelectorStatement> {
        self.attached_namespace = None;
        self.attached_type = None;
        self.attached_in_parens = false;
        self.value = None;
        self.skip_whitespace();
        if self.peek() == Some('(') {
            self.bump();
            self.attached_in_parens = true;
            return Some(SelectorStatement::AttachedProperty);
        }

        let first = self.take_identifier()?;
        let (namespace, name) = if self.peek() == Some('|') {
            self.bump();
            (Some(first), self.take_identifier()?)
        } else {
            (None, first)
        };
        if self.peek() == Some('.') {
            self.bump();
            self.attached_namespace = namespace;
            self.attached_type = Some(name);
            return Some(SelectorStatement::AttachedProperty);
        }
        if namespace.is_some() {
            return None;
        }
        self.property_name = Some(name);
        self.expect_equals()
    }

    fn parse_attached_property(&mut self) -> Option<SelectorStatement> {
        if self.attached_in_parens && self.attached_type.is_none() {
            let first = self.take_identifier()?;
            if self.peek() == Some('|') {
                self.bump();
                self.attached_namespace = Some(first);
                self.attached_type = Some(self.take_identifier()?);
            } else {
                self.attached_type = Some(first);
            }
            if self.peek() != Some('.') {
                return None;
            }
            self.bump();
        }
        self.property_name = Some(self.take_identifier()?);
        if self.attached_in_parens {
            if self.peek() != Some(')') {
                return None;
            }
            self.bump();
        }
        self.expect_equals()
    }

    fn expect_equals(&mut self) -> Option<SelectorStatement> {
        self.skip_whitespace();
        if self.peek() != Some('=') {
            return None;
        }
        self.bump();
        Some(SelectorStatement::Value)
    }

    fn parse_value(&mut self) -> Option<SelectorStatement> {
        let start = self.pos;
        match self.text[start..].find(']') {
            Some(close) => {
                self.value = Some(span(start, start + close));
                self.pos = start + close + 1;
                Some(SelectorStatement::Middle)
            }
            None => {
                // Partial value stays visible for completion
                self.value = Some(span(start, self.text.len()));
                None
            }
        }
    }

    // ---------------------------------------------------------------------
    // Character reader
    // ---------------------------------------------------------------------

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    /// Consume a run of chars matching `pred`; `None` if the run is empty.
    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> Option<TextRange> {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
        (self.pos > start).then(|| span(start, self.pos))
    }

    fn take_identifier(&mut self) -> Option<TextRange> {
        if !self.peek().is_some_and(is_identifier_start) {
            return None;
        }
        self.take_while(is_identifier_continue)
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Statement the parser stopped in (`End` once finished or failed).
    pub fn statement(&self) -> SelectorStatement {
        self.statement
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }

    /// Offset where the most recent selector segment started.
    pub fn last_segment_start(&self) -> usize {
        self.last_segment_start
    }

    /// Offset up to which parsing succeeded before any error.
    pub fn last_parsed_position(&self) -> usize {
        self.last_parsed_position
    }

    /// Pseudo-functions still open at the end of input.
    pub fn open_functions(&self) -> &[SelectorFunction] {
        &self.open_functions
    }

    fn get(&self, range: Option<TextRange>) -> Option<&'a str> {
        range.map(|r| range_text(self.text, r))
    }

    pub fn namespace(&self) -> Option<&'a str> {
        self.get(self.namespace)
    }

    pub fn type_name(&self) -> Option<&'a str> {
        self.get(self.type_name)
    }

    pub fn class(&self) -> Option<&'a str> {
        self.get(self.class)
    }

    pub fn pseudo_class(&self) -> Option<&'a str> {
        self.get(self.pseudo_class)
    }

    pub fn element_name(&self) -> Option<&'a str> {
        self.get(self.element_name)
    }

    pub fn property_name(&self) -> Option<&'a str> {
        self.get(self.property_name)
    }

    pub fn attached_namespace(&self) -> Option<&'a str> {
        self.get(self.attached_namespace)
    }

    /// Owner type of an attached-property predicate (`Grid` in `[Grid.Row=1]`).
    pub fn attached_type(&self) -> Option<&'a str> {
        self.get(self.attached_type)
    }

    pub fn value(&self) -> Option<&'a str> {
        self.get(self.value)
    }

    pub fn function_name(&self) -> Option<&'a str> {
        self.get(self.function_name)
    }

    pub fn function_args(&self) -> Option<&'a str> {
        self.get(self.function_args)
    }

    pub fn namespace_range(&self) -> Option<TextRange> {
        self.namespace
    }

    pub fn type_name_range(&self) -> Option<TextRange> {
        self.type_name
    }

    pub fn class_range(&self) -> Option<TextRange> {
        self.class
    }

    pub fn property_name_range(&self) -> Option<TextRange> {
        self.property_name
    }

    pub fn value_range(&self) -> Option<TextRange> {
        self.value
    }
}
