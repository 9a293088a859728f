//! Offset helpers shared by the incremental parsers.
//!
//! Parsers record plain `usize` byte offsets while they run and hand out
//! [`TextRange`]s once a span is complete.

use text_size::{TextRange, TextSize};

/// Build a [`TextRange`] from two byte offsets.
///
/// `end` is clamped so that `start <= end` always holds.
#[inline]
pub fn span(start: usize, end: usize) -> TextRange {
    let end = end.max(start);
    TextRange::new(TextSize::from(start as u32), TextSize::from(end as u32))
}

/// Clamp a caret offset into `text`, flooring it to a char boundary.
pub fn clamp_offset(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Slice `text` by `range`, returning `""` for ranges outside the text.
pub fn range_text(text: &str, range: TextRange) -> &str {
    text.get(usize::from(range.start())..usize::from(range.end()))
        .unwrap_or("")
}
