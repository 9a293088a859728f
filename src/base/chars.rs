//! Character classes for markup names and selector identifiers.

/// XML whitespace (space, tab, CR, LF).
#[inline]
pub fn is_xml_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

/// First character of a selector identifier (type, class, property name).
#[inline]
pub fn is_identifier_start(c: char) -> bool {
    c == '_' || unicode_ident::is_xid_start(c)
}

/// Continuation character of a selector identifier.
#[inline]
pub fn is_identifier_continue(c: char) -> bool {
    unicode_ident::is_xid_continue(c)
}

/// Style classes additionally allow `-` (e.g. `.accent-button`).
#[inline]
pub fn is_style_class_char(c: char) -> bool {
    c == '-' || is_identifier_continue(c)
}
