//! Run-length attribute storage for one row.
//!
//! Terminal output tends to paint long spans of columns with the same
//! attribute (a prompt in one color, then plain text), so attributes are
//! stored as `(value, length)` runs instead of one value per column — the
//! pattern Windows Terminal uses in `til/rle.h`.
//!
//! ```text
//! Columns:    [0][1][2][3][4][5][6][7]
//! Attributes:  Bold ------>  Normal -->
//! Stored as:  [(Bold, 4), (Normal, 4)]
//! ```
//!
//! Unlike a general-purpose RLE sequence, an [`AttrRow`] is never empty: it
//! is constructed filled to the row width and every mutation preserves
//!
//! - sum of run lengths == width,
//! - every run length > 0,
//! - no two adjacent runs with equal values (runs are maximally merged).
//!
//! Point query is an O(runs) linear scan; rows are narrow and runs are few,
//! so a search structure would cost more than it saves.

/// A maximal span of columns sharing one attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run<T> {
    /// The attribute painted over this span.
    pub value: T,
    /// Number of consecutive columns, always > 0.
    pub length: u16,
}

/// Run-length list mapping contiguous column ranges to an attribute.
///
/// # Type Parameters
///
/// - `T`: the attribute type (`Copy + PartialEq`); the row never inspects it
///   beyond equality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrRow<T> {
    /// Runs in column order. Invariant: non-empty, lengths sum to `width`.
    runs: Vec<Run<T>>,
    /// Row width in columns, >= 1.
    width: u16,
}

impl<T: Copy + PartialEq> AttrRow<T> {
    /// Create a row of `width` columns all painted with `fill`.
    ///
    /// `width` must be >= 1; zero is clamped in release builds.
    #[must_use]
    pub fn new(width: u16, fill: T) -> Self {
        debug_assert!(width >= 1, "attribute row width must be >= 1");
        let width = width.max(1);
        Self {
            runs: vec![Run {
                value: fill,
                length: width,
            }],
            width,
        }
    }

    /// Row width in columns.
    #[must_use]
    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Number of runs.
    #[must_use]
    #[inline]
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// The runs in column order, for renderer enumeration.
    #[must_use]
    #[inline]
    pub fn runs(&self) -> &[Run<T>] {
        &self.runs
    }

    /// The attribute covering `col`.
    ///
    /// Out-of-range columns are a programming error; release builds clamp to
    /// the last column.
    #[must_use]
    pub fn at(&self, col: u16) -> T {
        debug_assert!(col < self.width, "column {col} out of range");
        let col = col.min(self.width - 1);
        let (idx, _) = self.locate(col);
        self.runs[idx].value
    }

    /// Collapse the whole row to a single run of `value`.
    pub fn fill(&mut self, value: T) {
        self.runs.clear();
        self.runs.push(Run {
            value,
            length: self.width,
        });
    }

    /// Paint `[start, end)` with `value`, splitting and re-merging runs as
    /// needed. The range is clamped to the row; an empty range is a no-op.
    pub fn replace_range(&mut self, start: u16, end: u16, value: T) {
        let end = end.min(self.width);
        if start >= end {
            return;
        }

        let (first, first_off) = self.locate(start);
        let (last, last_off) = self.locate(end - 1);

        // Patch: prefix remainder of the first overlapped run, the new run,
        // suffix remainder of the last overlapped run.
        let mut patch: Vec<Run<T>> = Vec::with_capacity(3);
        if first_off > 0 {
            patch.push(Run {
                value: self.runs[first].value,
                length: first_off,
            });
        }
        patch.push(Run {
            value,
            length: end - start,
        });
        let last_run = self.runs[last];
        let suffix = last_run.length - (last_off + 1);
        if suffix > 0 {
            patch.push(Run {
                value: last_run.value,
                length: suffix,
            });
        }

        self.runs.splice(first..=last, patch);
        self.coalesce();
    }

    /// Paint from `col` through the right edge with `value`.
    pub fn replace_to_end(&mut self, col: u16, value: T) {
        self.replace_range(col, self.width, value);
    }

    /// Resize to `new_width` columns, preserving content below the minimum
    /// of both widths.
    ///
    /// Shrinking splits the run straddling the new boundary; growing extends
    /// the final run, so appended columns take the attribute of the row's
    /// last existing run. Never allocates, so it cannot fail.
    pub fn resize(&mut self, new_width: u16) {
        debug_assert!(new_width >= 1, "attribute row width must be >= 1");
        let new_width = new_width.max(1);
        if new_width == self.width {
            return;
        }

        if new_width > self.width {
            let grow = new_width - self.width;
            if let Some(last) = self.runs.last_mut() {
                last.length += grow;
            }
        } else {
            let (idx, off) = self.locate(new_width - 1);
            self.runs.truncate(idx + 1);
            if let Some(last) = self.runs.last_mut() {
                last.length = off + 1;
            }
        }
        self.width = new_width;
    }

    /// Iterate over the expanded per-column attributes.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.runs
            .iter()
            .flat_map(|run| std::iter::repeat(run.value).take(run.length as usize))
    }

    /// Find the run covering `col`, returning `(run index, offset in run)`.
    ///
    /// `col` must be < `width`; guaranteed to resolve while the length
    /// invariant holds.
    fn locate(&self, col: u16) -> (usize, u16) {
        let mut acc = 0u16;
        for (idx, run) in self.runs.iter().enumerate() {
            if acc + run.length > col {
                return (idx, col - acc);
            }
            acc += run.length;
        }
        debug_assert!(false, "run lengths no longer sum to width");
        let last = self.runs.len() - 1;
        (last, self.runs[last].length - 1)
    }

    /// Merge adjacent runs holding equal values.
    fn coalesce(&mut self) {
        let mut idx = 1;
        while idx < self.runs.len() {
            if self.runs[idx - 1].value == self.runs[idx].value {
                self.runs[idx - 1].length += self.runs[idx].length;
                self.runs.remove(idx);
            } else {
                idx += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total<T: Copy + PartialEq>(row: &AttrRow<T>) -> u16 {
        row.runs().iter().map(|run| run.length).sum()
    }

    fn assert_merged<T: Copy + PartialEq>(row: &AttrRow<T>) {
        for pair in row.runs().windows(2) {
            assert!(pair[0].value != pair[1].value, "adjacent runs not merged");
        }
    }

    #[test]
    fn new_is_single_run() {
        let row = AttrRow::new(10, 7u8);
        assert_eq!(row.width(), 10);
        assert_eq!(row.run_count(), 1);
        assert_eq!(row.at(0), 7);
        assert_eq!(row.at(9), 7);
    }

    #[test]
    fn replace_middle_splits_into_three() {
        let mut row = AttrRow::new(10, 0u8);
        row.replace_range(3, 6, 9);
        assert_eq!(row.run_count(), 3);
        assert_eq!(row.at(2), 0);
        assert_eq!(row.at(3), 9);
        assert_eq!(row.at(5), 9);
        assert_eq!(row.at(6), 0);
        assert_eq!(total(&row), 10);
        assert_merged(&row);
    }

    #[test]
    fn replace_prefix_and_suffix() {
        let mut row = AttrRow::new(8, 0u8);
        row.replace_range(0, 3, 1);
        row.replace_range(5, 8, 2);
        assert_eq!(row.run_count(), 3);
        assert_eq!(row.at(0), 1);
        assert_eq!(row.at(4), 0);
        assert_eq!(row.at(7), 2);
        assert_eq!(total(&row), 8);
    }

    #[test]
    fn replace_across_runs_merges() {
        let mut row = AttrRow::new(6, 0u8);
        row.replace_range(0, 2, 1);
        row.replace_range(4, 6, 2);
        // Overwrite everything back to a single attribute.
        row.replace_range(0, 6, 5);
        assert_eq!(row.run_count(), 1);
        assert_eq!(total(&row), 6);
    }

    #[test]
    fn replace_with_equal_neighbor_coalesces() {
        let mut row = AttrRow::new(6, 0u8);
        row.replace_range(2, 4, 1);
        assert_eq!(row.run_count(), 3);
        row.replace_range(2, 4, 0);
        assert_eq!(row.run_count(), 1);
        assert_merged(&row);
    }

    #[test]
    fn replace_same_value_is_stable() {
        let mut row = AttrRow::new(5, 3u8);
        row.replace_range(1, 4, 3);
        assert_eq!(row.run_count(), 1);
        assert_eq!(total(&row), 5);
    }

    #[test]
    fn replace_empty_range_is_noop() {
        let mut row = AttrRow::new(5, 3u8);
        row.replace_range(2, 2, 9);
        assert_eq!(row.run_count(), 1);
        assert_eq!(row.at(2), 3);
    }

    #[test]
    fn replace_clamps_end_to_width() {
        let mut row = AttrRow::new(5, 0u8);
        row.replace_range(3, 100, 9);
        assert_eq!(row.at(3), 9);
        assert_eq!(row.at(4), 9);
        assert_eq!(total(&row), 5);
    }

    #[test]
    fn replace_to_end_reaches_right_edge() {
        let mut row = AttrRow::new(7, 0u8);
        row.replace_to_end(4, 2);
        assert_eq!(row.at(3), 0);
        assert_eq!(row.at(6), 2);
    }

    #[test]
    fn fill_collapses_runs() {
        let mut row = AttrRow::new(6, 0u8);
        row.replace_range(1, 3, 1);
        row.replace_range(4, 5, 2);
        row.fill(7);
        assert_eq!(row.run_count(), 1);
        assert_eq!(row.at(0), 7);
        assert_eq!(row.at(5), 7);
    }

    #[test]
    fn resize_grow_extends_final_run() {
        let mut row = AttrRow::new(4, 0u8);
        row.replace_range(2, 4, 9);
        row.resize(8);
        assert_eq!(row.width(), 8);
        assert_eq!(row.at(7), 9);
        assert_eq!(row.run_count(), 2);
        assert_eq!(total(&row), 8);
    }

    #[test]
    fn resize_shrink_splits_straddling_run() {
        let mut row = AttrRow::new(8, 0u8);
        row.replace_range(2, 6, 9);
        row.resize(4);
        assert_eq!(row.width(), 4);
        assert_eq!(row.at(1), 0);
        assert_eq!(row.at(3), 9);
        assert_eq!(total(&row), 4);
        assert_merged(&row);
    }

    #[test]
    fn resize_round_trip_preserves_low_columns() {
        let mut row = AttrRow::new(10, 0u8);
        row.replace_range(1, 4, 1);
        row.replace_range(6, 9, 2);
        let before: Vec<u8> = row.iter().take(5).collect();
        row.resize(5);
        row.resize(10);
        let after: Vec<u8> = row.iter().take(5).collect();
        assert_eq!(before, after);
        assert_eq!(total(&row), 10);
    }

    #[test]
    fn iter_expands_runs_in_order() {
        let mut row = AttrRow::new(5, 0u8);
        row.replace_range(2, 4, 1);
        let cols: Vec<u8> = row.iter().collect();
        assert_eq!(cols, vec![0, 0, 1, 1, 0]);
    }
}

#[cfg(kani)]
mod proofs {
    use super::*;

    /// Range replacement never changes the total width.
    #[kani::proof]
    fn replace_range_preserves_width() {
        let width: u8 = kani::any();
        let start: u8 = kani::any();
        let end: u8 = kani::any();
        kani::assume(width >= 1 && width <= 16);
        kani::assume(start < width);
        kani::assume(end <= width);

        let mut row = AttrRow::new(width as u16, 0u8);
        row.replace_range(start as u16, end as u16, 1);

        let total: u16 = row.runs().iter().map(|run| run.length).sum();
        kani::assert(total == width as u16, "run lengths must sum to width");
    }

    /// Point query after a range replacement reflects the write.
    #[kani::proof]
    fn replace_range_visible_at_point() {
        let width: u8 = kani::any();
        let col: u8 = kani::any();
        kani::assume(width >= 1 && width <= 16);
        kani::assume(col < width);

        let mut row = AttrRow::new(width as u16, 0u8);
        row.replace_range(col as u16, col as u16 + 1, 9);
        kani::assert(row.at(col as u16) == 9, "written column must read back");
    }

    /// Resize in either direction keeps the width invariant.
    #[kani::proof]
    fn resize_keeps_invariant() {
        let width: u8 = kani::any();
        let new_width: u8 = kani::any();
        kani::assume(width >= 1 && width <= 16);
        kani::assume(new_width >= 1 && new_width <= 16);

        let mut row = AttrRow::new(width as u16, 0u8);
        row.resize(new_width as u16);

        let total: u16 = row.runs().iter().map(|run| run.length).sum();
        kani::assert(total == new_width as u16, "resize must keep sum == width");
    }
}
