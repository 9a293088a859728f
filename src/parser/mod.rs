//! Incremental, fault-tolerant markup parsers
//!
//! Three small state machines answer "where is the caret?" questions over
//! partially typed text:
//!
//! - **xml**: tag/attribute context of an AXAML document at an offset
//! - **markup_extension**: position inside a `{Binding ...}` attribute value
//! - **selector**: components of a style selector such as `Button:pointerover`
//!
//! ```text
//! document text + caret
//!     ↓
//! XmlParser → tag name, attribute name, attribute value, ancestors
//!     ↓ (attribute value)
//! MarkupExtensionParser → extension name, argument, nesting level
//!     ↓ (Selector="...")
//! SelectorParser → type, class, pseudo-class, property predicate
//! ```
//!
//! None of them build a tree or allocate per token. Parsing a prefix is
//! always safe: the tag and extension parsers never fail, the selector
//! parser reports `is_error` and how far it got.

mod markup_extension;
mod selector;
mod xml;

pub use markup_extension::{MarkupExtensionParser, MarkupExtensionState};
pub use selector::{SelectorFunction, SelectorParser, SelectorStatement};
pub use xml::{XmlParser, XmlParserState};
