//! Screen-buffer row storage.
//!
//! One row of a terminal screen buffer has to reconcile three conflicting
//! storage constraints at once:
//!
//! - fixed-width column slots for O(1) random access and cheap redraw,
//! - variable-width glyphs (CJK, most emoji) that occupy two adjacent columns
//!   and must never be severed at the right edge,
//! - per-column attributes that are stored run-length-compressed and need
//!   careful run splitting and merging on every write.
//!
//! This crate keeps the three stores separate and composes them in [`Row`]:
//!
//! ```text
//! Row
//! ├── CharRow       [a][b][世][·][c][ ][ ][ ]   fixed slots, wide pairs
//! ├── AttrRow       [(Bold, 4), (Normal, 4)]    run-length attributes
//! └── OverflowStore (row, col) -> combining     buffer-scoped side table
//! ```
//!
//! The character and attribute stores are independently resizable containers
//! kept in lockstep by width; the overflow store is owned by the surrounding
//! buffer and shared across rows, keyed by `(row id, column)`.
//!
//! ## Write protocol
//!
//! The VT layer produces a lazy sequence of [`OutputCell`]s and feeds it to
//! [`Row::write_cells`], which consumes cells left to right and returns the
//! iterator positioned at the first unconsumed cell. A wide glyph that does
//! not fit before the right limit is not written; the row records a padding
//! placeholder, raises its double-byte-padded flag, and leaves the glyph in
//! the returned iterator for the caller to write at the start of the next
//! row.
//!
//! ## Concurrency
//!
//! Single-threaded and non-reentrant: a row is mutated only by the owning
//! buffer's state-update path, and the overflow store is reached through the
//! owning buffer's exclusive borrow. No internal locking.

pub mod cell;
pub mod charrow;
pub mod overflow;
pub mod rle;
pub mod row;
pub mod style;

#[cfg(test)]
mod tests;

pub use cell::{cells_of_text, CellWidth, OutputCell};
pub use charrow::{CharRow, Slot};
pub use overflow::{
    is_combining_mark, is_zero_width, CellCoord, OverflowStore, RowKey, MAX_COMBINING,
};
pub use rle::{AttrRow, Run};
pub use row::{LineRendition, Row};
pub use style::{AttrFlags, Color, TextAttribute};

use std::collections::TryReserveError;
use std::fmt;

/// Allocation failure while resizing a row.
///
/// Reported to the caller with the row left unchanged; the operation is
/// retryable once memory is available elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResizeError {
    /// The new capacity could not be obtained.
    OutOfMemory(TryReserveError),
}

impl fmt::Display for ResizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResizeError::OutOfMemory(err) => write!(f, "row resize failed: {err}"),
        }
    }
}

impl std::error::Error for ResizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResizeError::OutOfMemory(err) => Some(err),
        }
    }
}

impl From<TryReserveError> for ResizeError {
    fn from(err: TryReserveError) -> Self {
        ResizeError::OutOfMemory(err)
    }
}
