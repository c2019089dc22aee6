//! One row of the screen buffer.
//!
//! A [`Row`] composes the three stores — fixed character slots, run-length
//! attributes, and the buffer-shared overflow table — and owns the row-level
//! metadata: id, width, forced-wrap and double-byte-padded flags, line
//! rendition, and the high-water mark of written content.
//!
//! Rows are created once by the buffer orchestrator and reused in place: the
//! orchestrator calls [`Row::reset`] when the buffer scrolls and
//! [`Row::resize`] when the buffer width changes. Content arrives only
//! through [`Row::write_cells`].
//!
//! The overflow store is owned by the buffer and shared across its rows, so
//! operations that touch it borrow it explicitly. The borrow stands in for
//! the non-owning parent pointer a C++ row would carry: the compiler enforces
//! that a row call never outlives the buffer state it reads.

use std::iter::Peekable;

use crate::cell::{CellWidth, OutputCell};
use crate::charrow::{CharRow, Slot};
use crate::overflow::{CellCoord, OverflowStore, RowKey};
use crate::rle::AttrRow;
use crate::ResizeError;

/// How the row's columns map to physical glyph cells.
///
/// Affects rendering coordinates only, never storage layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineRendition {
    /// Normal single-width line.
    #[default]
    Single,
    /// Double-width line (DECDWL).
    DoubleWidth,
    /// Top half of a double-height line (DECDHL).
    DoubleHeightTop,
    /// Bottom half of a double-height line (DECDHL).
    DoubleHeightBottom,
}

/// One line's worth of character and attribute storage.
#[derive(Debug, Clone)]
pub struct Row<T> {
    chars: CharRow,
    attrs: AttrRow<T>,
    id: RowKey,
    width: u16,
    /// Rightmost column written since the last reset.
    high_water_mark: u16,
    line_rendition: LineRendition,
    /// Content ran out of columns before a natural line break; the next row
    /// continues this logical line.
    wrap_forced: bool,
    /// The last column holds a padding placeholder because a wide glyph did
    /// not fit before the right edge.
    double_byte_padded: bool,
}

impl<T: Copy + PartialEq> Row<T> {
    /// Create a row of `width` columns filled with `fill`.
    ///
    /// `id` is assigned by the owning buffer; `width` must be >= 1 (zero is
    /// clamped in release builds).
    #[must_use]
    pub fn new(id: RowKey, width: u16, fill: T) -> Self {
        let width = width.max(1);
        Self {
            chars: CharRow::new(width),
            attrs: AttrRow::new(width, fill),
            id,
            width,
            high_water_mark: 0,
            line_rendition: LineRendition::default(),
            wrap_forced: false,
            double_byte_padded: false,
        }
    }

    /// Row id within the owning buffer.
    #[must_use]
    #[inline]
    pub fn id(&self) -> RowKey {
        self.id
    }

    /// Reassign the row id. The orchestrator must also call
    /// [`OverflowStore::rekey_row`] so overflow entries follow.
    #[inline]
    pub fn set_id(&mut self, id: RowKey) {
        self.id = id;
    }

    /// Row width in columns.
    #[must_use]
    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Whether this row's content continues on the next row.
    #[must_use]
    #[inline]
    pub fn wrap_forced(&self) -> bool {
        self.wrap_forced
    }

    /// Set the forced-wrap flag directly.
    #[inline]
    pub fn set_wrap_forced(&mut self, wrap: bool) {
        self.wrap_forced = wrap;
    }

    /// Whether the last column is a placeholder for a deferred wide glyph.
    #[must_use]
    #[inline]
    pub fn double_byte_padded(&self) -> bool {
        self.double_byte_padded
    }

    /// Set the double-byte-padded flag directly.
    #[inline]
    pub fn set_double_byte_padded(&mut self, padded: bool) {
        self.double_byte_padded = padded;
    }

    /// The row's line rendition.
    #[must_use]
    #[inline]
    pub fn line_rendition(&self) -> LineRendition {
        self.line_rendition
    }

    /// Set the line rendition.
    #[inline]
    pub fn set_line_rendition(&mut self, rendition: LineRendition) {
        self.line_rendition = rendition;
    }

    /// Rightmost column written since the last reset.
    ///
    /// Distinguishes never-written trailing columns from written blanks
    /// during text extraction; independent of [`Row::measure_right`], which
    /// scans actual content.
    #[must_use]
    #[inline]
    pub fn high_water_mark(&self) -> u16 {
        self.high_water_mark
    }

    /// The character slot at `col`.
    #[must_use]
    #[inline]
    pub fn slot(&self, col: u16) -> Slot {
        self.chars.slot(col)
    }

    /// The attribute covering `col`.
    #[must_use]
    #[inline]
    pub fn attr_at(&self, col: u16) -> T {
        self.attrs.at(col)
    }

    /// The attribute run store, for renderer enumeration.
    #[must_use]
    #[inline]
    pub fn attrs(&self) -> &AttrRow<T> {
        &self.attrs
    }

    /// Write a cell sequence starting at `start`, advancing one column per
    /// narrow cell and two per wide cell.
    ///
    /// - Each cell's attribute splits the enclosing attribute run at the
    ///   column boundary when it differs from what is already there.
    /// - A wide cell whose trailing half would cross `limit_right` (default:
    ///   the row width) is not written at all: the current column receives an
    ///   empty padding placeholder painted with the cell's attribute, the
    ///   double-byte-padded flag is raised, and consumption stops with the
    ///   wide cell still in the returned iterator so the caller can write it
    ///   at the start of the next row.
    /// - `wrap_hint`, when provided, is stored verbatim into the forced-wrap
    ///   flag. When absent the flag is inferred: forced exactly when cells
    ///   remain unconsumed at return (the producer was truncated by the
    ///   limit), not forced when the input exhausted mid-row.
    ///
    /// Returns the iterator positioned at the first unconsumed cell; empty if
    /// everything was consumed. `start` must be inside the row (programming
    /// error otherwise; release builds write nothing).
    pub fn write_cells<I>(
        &mut self,
        cells: I,
        start: u16,
        wrap_hint: Option<bool>,
        limit_right: Option<u16>,
        overflow: &mut OverflowStore,
    ) -> Peekable<I>
    where
        I: Iterator<Item = OutputCell<T>>,
    {
        let mut cells = cells.peekable();
        debug_assert!(start < self.width, "start column {start} out of range");
        let limit = limit_right.unwrap_or(self.width).min(self.width);
        let mut col = start;
        let mut wrote = false;

        while col < limit {
            let (width, attr) = match cells.peek() {
                Some(cell) => (cell.width, cell.attr),
                None => break,
            };

            match width {
                CellWidth::Narrow => {
                    let Some(cell) = cells.next() else { break };
                    self.put_narrow(col, cell, overflow);
                    col += 1;
                    wrote = true;
                }
                CellWidth::Wide if col + 2 <= limit => {
                    let Some(cell) = cells.next() else { break };
                    self.put_wide(col, cell, overflow);
                    col += 2;
                    wrote = true;
                }
                CellWidth::Wide => {
                    // No room for both halves before the limit: pad this
                    // column, keep the glyph for the next row.
                    self.put_pad(col, attr, overflow);
                    self.double_byte_padded = true;
                    col += 1;
                    wrote = true;
                    break;
                }
            }
        }

        if wrote {
            self.high_water_mark = self.high_water_mark.max(col - 1);
        }

        self.wrap_forced = match wrap_hint {
            Some(wrap) => wrap,
            None => cells.peek().is_some(),
        };

        cells
    }

    /// Overwrite every column to empty with `attr`, clear all flags and the
    /// high-water mark, and drop this row's overflow entries.
    ///
    /// Always succeeds; the orchestrator calls this to reuse the row slot
    /// when the buffer scrolls.
    pub fn reset(&mut self, attr: T, overflow: &mut OverflowStore) {
        self.chars.fill_empty();
        self.attrs.fill(attr);
        self.wrap_forced = false;
        self.double_byte_padded = false;
        self.high_water_mark = 0;
        self.line_rendition = LineRendition::Single;
        overflow.clear_row(self.id);
    }

    /// Resize to `new_width` columns.
    ///
    /// Shrinking truncates both stores, splitting the attribute run that
    /// straddles the boundary; a wide pair cut by the boundary leaves an
    /// empty placeholder where its lead was, and dropped columns lose their
    /// overflow entries. Growing appends empty columns painted with the
    /// attribute of the row's last run.
    ///
    /// On allocation failure the row is left unchanged.
    pub fn resize(&mut self, new_width: u16, overflow: &mut OverflowStore) -> Result<(), ResizeError> {
        debug_assert!(new_width >= 1, "row width must be >= 1");
        let new_width = new_width.max(1);
        if new_width == self.width {
            return Ok(());
        }

        // The fallible store goes first; if it cannot allocate, nothing has
        // been touched yet.
        let severed = self.chars.resize(new_width)?;
        self.attrs.resize(new_width);

        if new_width < self.width {
            overflow.clear_range(self.id, new_width, self.width);
            if let Some(col) = severed {
                overflow.remove(CellCoord::new(self.id, col));
            }
            self.high_water_mark = self.high_water_mark.min(new_width - 1);
        }
        self.width = new_width;
        Ok(())
    }

    /// Set `col` to empty, leaving its attribute untouched, and drop its
    /// overflow entry. A wide pair half is healed along with its partner.
    ///
    /// Out-of-range is a programming error; release builds do nothing.
    pub fn clear_column(&mut self, col: u16, overflow: &mut OverflowStore) {
        debug_assert!(col < self.width, "column {col} out of range");
        if col >= self.width {
            return;
        }
        for healed in self.chars.clear(col) {
            overflow.remove(CellCoord::new(self.id, healed));
        }
        overflow.remove(CellCoord::new(self.id, col));
    }

    /// Highest column index holding content, or 0 when the row is blank.
    #[must_use]
    #[inline]
    pub fn measure_right(&self) -> u16 {
        self.chars.measure_right()
    }

    /// Extract the row's logical text line.
    ///
    /// Concatenates the primary character of each column from 0 through
    /// [`Row::measure_right`] inclusive, with each column's overflow
    /// codepoints inserted immediately after its primary character. Wide
    /// trailing halves are skipped; empty columns inside the content range
    /// render as spaces. A blank row yields an empty string.
    #[must_use]
    pub fn text(&self, overflow: &OverflowStore) -> String {
        if self.chars.is_blank() {
            return String::new();
        }
        let last = self.chars.measure_right();
        let mut out = String::with_capacity(last as usize + 1);
        for col in 0..=last {
            match self.chars.slot(col) {
                Slot::WideTrail => {}
                Slot::Empty => out.push(' '),
                Slot::Narrow(ch) | Slot::WideLead(ch) => {
                    out.push(ch);
                    if let Some(marks) = overflow.get(CellCoord::new(self.id, col)) {
                        out.extend(marks.iter().copied());
                    }
                }
            }
        }
        out
    }

    fn put_narrow(&mut self, col: u16, cell: OutputCell<T>, overflow: &mut OverflowStore) {
        for healed in self.chars.set_narrow(col, cell.ch) {
            overflow.remove(CellCoord::new(self.id, healed));
        }
        self.attrs.replace_range(col, col + 1, cell.attr);
        overflow.set(CellCoord::new(self.id, col), cell.combining);
    }

    fn put_wide(&mut self, col: u16, cell: OutputCell<T>, overflow: &mut OverflowStore) {
        for healed in self.chars.set_wide(col, cell.ch) {
            overflow.remove(CellCoord::new(self.id, healed));
        }
        self.attrs.replace_range(col, col + 2, cell.attr);
        // The trail never carries marks of its own.
        overflow.remove(CellCoord::new(self.id, col + 1));
        overflow.set(CellCoord::new(self.id, col), cell.combining);
    }

    fn put_pad(&mut self, col: u16, attr: T, overflow: &mut OverflowStore) {
        for healed in self.chars.clear(col) {
            overflow.remove(CellCoord::new(self.id, healed));
        }
        self.attrs.replace_range(col, col + 1, attr);
        overflow.remove(CellCoord::new(self.id, col));
    }
}
