//! The cell sequence consumed by the row's write protocol.
//!
//! The VT layer hands [`Row::write_cells`](crate::Row::write_cells) a lazy
//! sequence of [`OutputCell`]s: one primary character, its width class, the
//! attribute to paint with, and any trailing combining marks destined for the
//! overflow store.
//!
//! A cell's width class is only ever [`Narrow`](CellWidth::Narrow) or
//! [`Wide`](CellWidth::Wide); the trailing half of a wide glyph is a storage
//! detail owned by the character store, so a malformed "trail without lead"
//! sequence cannot be expressed at this boundary.

use smallvec::SmallVec;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::overflow::{Marks, MAX_COMBINING};

/// Width class of a cell: how many columns it advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellWidth {
    /// One column.
    Narrow,
    /// Two adjacent columns (lead + trail halves).
    Wide,
}

impl CellWidth {
    /// Columns this cell advances.
    #[must_use]
    #[inline]
    pub const fn columns(self) -> u16 {
        match self {
            CellWidth::Narrow => 1,
            CellWidth::Wide => 2,
        }
    }
}

/// One unit of the write protocol: character, width class, attribute, and
/// trailing combining marks.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputCell<T> {
    /// The primary character.
    pub ch: char,
    /// Width class.
    pub width: CellWidth,
    /// The attribute to paint the covered column(s) with.
    pub attr: T,
    /// Supplementary codepoints that follow the primary character.
    pub combining: Marks,
}

impl<T> OutputCell<T> {
    /// A single-column cell.
    #[must_use]
    pub fn narrow(ch: char, attr: T) -> Self {
        Self {
            ch,
            width: CellWidth::Narrow,
            attr,
            combining: SmallVec::new(),
        }
    }

    /// A two-column cell.
    #[must_use]
    pub fn wide(ch: char, attr: T) -> Self {
        Self {
            ch,
            width: CellWidth::Wide,
            attr,
            combining: SmallVec::new(),
        }
    }

    /// Attach trailing combining marks, capped at
    /// [`MAX_COMBINING`](crate::MAX_COMBINING).
    #[must_use]
    pub fn with_combining(mut self, marks: impl IntoIterator<Item = char>) -> Self {
        self.combining = marks.into_iter().take(MAX_COMBINING).collect();
        self
    }
}

/// Segment `text` into the cell sequence `write_cells` consumes.
///
/// Splits on grapheme-cluster boundaries (UAX #29); each cluster becomes one
/// cell whose primary character is the cluster's first codepoint and whose
/// remaining codepoints ride along as combining marks. Width classing follows
/// terminal convention: the cluster's display width clamped to two columns,
/// with zero-width clusters treated as narrow. Control characters produce no
/// cell — the caller decides replacement rendering, not this crate.
///
/// The iterator is lazy and borrows `text`.
pub fn cells_of_text<'a, T: Copy + 'a>(
    text: &'a str,
    attr: T,
) -> impl Iterator<Item = OutputCell<T>> + 'a {
    text.graphemes(true).filter_map(move |cluster| {
        let mut chars = cluster.chars();
        let ch = chars.next()?;
        if ch.is_control() {
            return None;
        }
        let width = if UnicodeWidthStr::width(cluster) >= 2 {
            CellWidth::Wide
        } else {
            CellWidth::Narrow
        };
        let combining: Marks = chars.take(MAX_COMBINING).collect();
        Some(OutputCell {
            ch,
            width,
            attr,
            combining,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_text_is_narrow_cells() {
        let cells: Vec<_> = cells_of_text("abc", 0u8).collect();
        assert_eq!(cells.len(), 3);
        assert_eq!(cells[0].ch, 'a');
        assert_eq!(cells[0].width, CellWidth::Narrow);
        assert!(cells[0].combining.is_empty());
    }

    #[test]
    fn cjk_is_wide() {
        let cells: Vec<_> = cells_of_text("世界", 0u8).collect();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].ch, '世');
        assert_eq!(cells[0].width, CellWidth::Wide);
        assert_eq!(cells[0].width.columns(), 2);
    }

    #[test]
    fn combining_cluster_becomes_one_cell() {
        // 'e' + combining acute: one grapheme, one narrow cell, one mark.
        let cells: Vec<_> = cells_of_text("e\u{0301}x", 0u8).collect();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].ch, 'e');
        assert_eq!(cells[0].width, CellWidth::Narrow);
        assert_eq!(cells[0].combining.as_slice(), &['\u{0301}']);
        assert_eq!(cells[1].ch, 'x');
    }

    #[test]
    fn control_characters_are_dropped() {
        let cells: Vec<_> = cells_of_text("a\nb", 0u8).collect();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].ch, 'a');
        assert_eq!(cells[1].ch, 'b');
    }

    #[test]
    fn emoji_is_wide_with_riders() {
        // Waving hand + medium skin tone: one cluster, wide, modifier rides.
        let cells: Vec<_> = cells_of_text("\u{1F44B}\u{1F3FD}", 0u8).collect();
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].width, CellWidth::Wide);
        assert_eq!(cells[0].combining.as_slice(), &['\u{1F3FD}']);
    }

    #[test]
    fn constructors_set_width_class() {
        let narrow = OutputCell::narrow('a', 1u8);
        let wide = OutputCell::wide('世', 1u8);
        assert_eq!(narrow.width.columns(), 1);
        assert_eq!(wide.width.columns(), 2);
    }

    #[test]
    fn with_combining_caps_marks() {
        let cell = OutputCell::narrow('e', 0u8)
            .with_combining(std::iter::repeat('\u{0301}').take(MAX_COMBINING + 5));
        assert_eq!(cell.combining.len(), MAX_COMBINING);
    }

    #[test]
    fn iterator_is_lazy() {
        // Only the consumed prefix is segmented.
        let mut cells = cells_of_text("abcdef", 0u8);
        assert_eq!(cells.next().map(|c| c.ch), Some('a'));
        assert_eq!(cells.next().map(|c| c.ch), Some('b'));
    }
}
