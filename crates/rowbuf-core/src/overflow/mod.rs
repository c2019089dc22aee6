//! Buffer-scoped overflow storage for supplementary codepoints.
//!
//! ## Design
//!
//! A character slot holds exactly one code unit, but a column sometimes needs
//! more: combining marks, grapheme extensions. Instead of bloating every slot
//! for the rare case, those trailing codepoints live in an external lookup
//! table shared by all rows of a buffer, keyed by `(row id, column)`.
//!
//! ```text
//! CharRow slot              OverflowStore (FxHashMap)
//! ┌───────────┐             ┌──────────────────────────────┐
//! │ 'e'       │────────────▶│ (row, col) -> ['\u{0301}']   │
//! └───────────┘             └──────────────────────────────┘
//! ```
//!
//! An entry exists only while the owning column holds content; overwriting or
//! clearing the column removes it. The buffer orchestrator reassigns row ids
//! when it scrolls and calls [`OverflowStore::rekey_row`] so entries follow
//! their row.
//!
//! Most columns that have an entry carry one or two marks, so the sequence
//! is stored inline (`SmallVec<[char; 2]>`) and capped at [`MAX_COMBINING`]
//! to bound memory against pathological input.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Signed row index, assigned by the owning buffer, never by the row.
pub type RowKey = i32;

/// Maximum supplementary codepoints per column.
pub const MAX_COMBINING: usize = 16;

/// Inline sequence of supplementary codepoints for one column.
pub type Marks = SmallVec<[char; 2]>;

/// Coordinate for overflow lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellCoord {
    /// Row id, as assigned by the owning buffer.
    pub row: RowKey,
    /// Column index.
    pub col: u16,
}

impl CellCoord {
    /// Create a new coordinate.
    #[must_use]
    #[inline]
    pub const fn new(row: RowKey, col: u16) -> Self {
        Self { row, col }
    }
}

/// Mapping from `(row id, column)` to supplementary codepoints.
#[derive(Debug, Clone, Default)]
pub struct OverflowStore {
    data: FxHashMap<CellCoord, Marks>,
}

impl OverflowStore {
    /// Create an empty store.
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self {
            data: FxHashMap::default(),
        }
    }

    /// The codepoints stored for a column, if any. Entries are never empty.
    #[must_use]
    #[inline]
    pub fn get(&self, coord: CellCoord) -> Option<&[char]> {
        self.data.get(&coord).map(SmallVec::as_slice)
    }

    /// Store the codepoints for a column.
    ///
    /// An empty sequence removes the entry; longer sequences are capped at
    /// [`MAX_COMBINING`].
    pub fn set(&mut self, coord: CellCoord, mut marks: Marks) {
        marks.truncate(MAX_COMBINING);
        if marks.is_empty() {
            self.data.remove(&coord);
        } else {
            self.data.insert(coord, marks);
        }
    }

    /// Append one codepoint to a column, up to the cap.
    pub fn push(&mut self, coord: CellCoord, mark: char) {
        let marks = self.data.entry(coord).or_default();
        if marks.len() < MAX_COMBINING {
            marks.push(mark);
        }
    }

    /// Remove the entry for a column.
    #[inline]
    pub fn remove(&mut self, coord: CellCoord) {
        self.data.remove(&coord);
    }

    /// Remove every entry belonging to `row`. Called on row reset and when a
    /// row scrolls off.
    pub fn clear_row(&mut self, row: RowKey) {
        self.data.retain(|coord, _| coord.row != row);
    }

    /// Remove entries for columns `[start_col, end_col)` of `row`.
    pub fn clear_range(&mut self, row: RowKey, start_col: u16, end_col: u16) {
        self.data.retain(|coord, _| {
            !(coord.row == row && coord.col >= start_col && coord.col < end_col)
        });
    }

    /// Move every entry of row `old` under row `new`.
    ///
    /// The buffer reassigns row ids when it scrolls; overflow entries must
    /// follow. Existing entries under `new` are replaced.
    pub fn rekey_row(&mut self, old: RowKey, new: RowKey) {
        if old == new {
            return;
        }
        let cols: Vec<u16> = self
            .data
            .keys()
            .filter(|coord| coord.row == old)
            .map(|coord| coord.col)
            .collect();
        for col in cols {
            if let Some(marks) = self.data.remove(&CellCoord::new(old, col)) {
                self.data.insert(CellCoord::new(new, col), marks);
            }
        }
    }

    /// Drop every entry.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Number of columns with overflow entries.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the store has no entries.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate over all entries.
    pub fn iter(&self) -> impl Iterator<Item = (&CellCoord, &[char])> {
        self.data
            .iter()
            .map(|(coord, marks)| (coord, marks.as_slice()))
    }

    /// Approximate heap usage of the store.
    #[must_use]
    pub fn memory_used(&self) -> usize {
        let entry = std::mem::size_of::<CellCoord>() + std::mem::size_of::<Marks>();
        let base = std::mem::size_of::<Self>() + self.data.capacity() * entry;
        let spilled: usize = self
            .data
            .values()
            .filter(|marks| marks.spilled())
            .map(|marks| marks.capacity() * std::mem::size_of::<char>())
            .sum();
        base + spilled
    }
}

/// Check if a character is a Unicode combining mark.
///
/// Covers the diacritical mark blocks terminals meet in practice:
/// U+0300-U+036F, their Extended/Supplement blocks, marks for symbols, and
/// half marks.
#[must_use]
#[inline]
pub fn is_combining_mark(c: char) -> bool {
    matches!(c,
        '\u{0300}'..='\u{036F}' |  // Combining Diacritical Marks
        '\u{1AB0}'..='\u{1AFF}' |  // Combining Diacritical Marks Extended
        '\u{1DC0}'..='\u{1DFF}' |  // Combining Diacritical Marks Supplement
        '\u{20D0}'..='\u{20FF}' |  // Combining Diacritical Marks for Symbols
        '\u{FE20}'..='\u{FE2F}'    // Combining Half Marks
    )
}

/// Check if a character is a zero-width character (ZWSP, ZWNJ, ZWJ, word
/// joiner, ZWNBSP).
#[must_use]
#[inline]
pub fn is_zero_width(c: char) -> bool {
    matches!(
        c,
        '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}'
    )
}
