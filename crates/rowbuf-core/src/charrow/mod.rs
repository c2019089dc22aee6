//! Fixed-width character slot storage for one row.
//!
//! Every column owns one slot holding at most one code unit, tagged with its
//! width class. A wide glyph occupies two adjacent slots: the leading half
//! carries the character, the trailing half is a continuation marker. The
//! pair invariant is
//!
//! - `WideLead` at column `c` implies `WideTrail` at `c + 1`, and
//!   `c + 1 < width` — a lead never sits in the last column.
//!
//! The invariant is enforced at the single mutation boundary: every write or
//! clear first heals any pair it would sever, turning the orphaned half into
//! an empty slot. Healed columns are reported back so the owning row can drop
//! their overflow-store entries.

use smallvec::SmallVec;

use crate::ResizeError;

/// One column's character storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Slot {
    /// Nothing written, or a padding placeholder.
    #[default]
    Empty,
    /// A single-column character.
    Narrow(char),
    /// Leading half of a wide glyph; the glyph's character lives here.
    WideLead(char),
    /// Trailing half of a wide glyph; the character is in the lead slot.
    WideTrail,
}

impl Slot {
    /// Whether the slot holds no content.
    #[must_use]
    #[inline]
    pub fn is_empty(self) -> bool {
        matches!(self, Slot::Empty)
    }

    /// The primary character, if this slot carries one.
    ///
    /// Trailing halves return `None`; their character is in the lead slot.
    #[must_use]
    #[inline]
    pub fn glyph(self) -> Option<char> {
        match self {
            Slot::Narrow(ch) | Slot::WideLead(ch) => Some(ch),
            Slot::Empty | Slot::WideTrail => None,
        }
    }
}

/// Columns implicitly cleared while healing severed wide pairs.
///
/// At most two columns per mutation; inline storage avoids allocation.
pub type Healed = SmallVec<[u16; 2]>;

/// Fixed-capacity sequence of per-column character slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharRow {
    slots: Vec<Slot>,
}

impl CharRow {
    /// Create a row of `width` empty slots. `width` must be >= 1; zero is
    /// clamped in release builds.
    #[must_use]
    pub fn new(width: u16) -> Self {
        debug_assert!(width >= 1, "character row width must be >= 1");
        Self {
            slots: vec![Slot::Empty; width.max(1) as usize],
        }
    }

    /// Row width in columns.
    #[must_use]
    #[inline]
    #[allow(clippy::cast_possible_truncation)] // constructed from u16
    pub fn width(&self) -> u16 {
        self.slots.len() as u16
    }

    /// The slot at `col`. Out-of-range reads return `Empty`.
    #[must_use]
    #[inline]
    pub fn slot(&self, col: u16) -> Slot {
        self.slots.get(col as usize).copied().unwrap_or(Slot::Empty)
    }

    /// Write a narrow character at `col`.
    ///
    /// Returns the columns cleared while healing a severed wide pair.
    /// Out-of-range is a programming error; release builds ignore the write.
    pub fn set_narrow(&mut self, col: u16, ch: char) -> Healed {
        let mut healed = Healed::new();
        let idx = col as usize;
        if idx >= self.slots.len() {
            debug_assert!(false, "column {col} out of range");
            return healed;
        }
        if let Some(other) = self.heal(idx) {
            healed.push(other);
        }
        self.slots[idx] = Slot::Narrow(ch);
        healed
    }

    /// Write a wide glyph's lead half at `col` and its trail at `col + 1`.
    ///
    /// The trail must fit inside the row; a lead in the last column is a
    /// programming error (release builds ignore the write — callers pad and
    /// defer instead, see `Row::write_cells`). Returns healed columns.
    pub fn set_wide(&mut self, col: u16, ch: char) -> Healed {
        let mut healed = Healed::new();
        let lead = col as usize;
        let trail = lead + 1;
        if trail >= self.slots.len() {
            debug_assert!(false, "wide lead may not occupy the last column");
            return healed;
        }
        // Healing the lead may clear our own trail column (and vice versa);
        // those are overwritten below and not reported.
        if let Some(other) = self.heal(lead) {
            if other as usize != trail {
                healed.push(other);
            }
        }
        if let Some(other) = self.heal(trail) {
            if other as usize != lead {
                healed.push(other);
            }
        }
        self.slots[lead] = Slot::WideLead(ch);
        self.slots[trail] = Slot::WideTrail;
        healed
    }

    /// Clear `col` to `Empty`, healing any wide pair it belonged to.
    ///
    /// Returns healed columns. Out-of-range is a programming error; release
    /// builds do nothing.
    pub fn clear(&mut self, col: u16) -> Healed {
        let mut healed = Healed::new();
        let idx = col as usize;
        if idx >= self.slots.len() {
            debug_assert!(false, "column {col} out of range");
            return healed;
        }
        if let Some(other) = self.heal(idx) {
            healed.push(other);
        }
        self.slots[idx] = Slot::Empty;
        healed
    }

    /// Clear every slot.
    pub fn fill_empty(&mut self) {
        self.slots.fill(Slot::Empty);
    }

    /// Whether no slot holds content.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.slots.iter().all(|slot| slot.is_empty())
    }

    /// Highest column index holding content, or 0 when the row is blank.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // bounded by u16 width
    pub fn measure_right(&self) -> u16 {
        self.slots
            .iter()
            .rposition(|slot| !slot.is_empty())
            .unwrap_or(0) as u16
    }

    /// Resize to `new_width` columns.
    ///
    /// Growth appends empty slots; shrinking truncates, converting a lead
    /// severed at the new boundary into an empty placeholder. Returns the
    /// column of such a converted lead, if any. On allocation failure the
    /// row is unchanged.
    pub fn resize(&mut self, new_width: u16) -> Result<Option<u16>, ResizeError> {
        debug_assert!(new_width >= 1, "character row width must be >= 1");
        let new = new_width.max(1) as usize;
        let cur = self.slots.len();

        if new > cur {
            self.slots.try_reserve(new - cur)?;
            self.slots.resize(new, Slot::Empty);
            Ok(None)
        } else {
            self.slots.truncate(new);
            // A pair straddling the boundary leaves its lead behind.
            let last = new - 1;
            if matches!(self.slots[last], Slot::WideLead(_)) {
                self.slots[last] = Slot::Empty;
                Ok(Some(last as u16))
            } else {
                Ok(None)
            }
        }
    }

    /// Clear the partner half of any wide pair that writing `idx` would
    /// sever. The slot at `idx` itself is left for the caller to overwrite.
    fn heal(&mut self, idx: usize) -> Option<u16> {
        match self.slots[idx] {
            Slot::WideLead(_) => {
                let trail = idx + 1;
                if let Some(slot) = self.slots.get_mut(trail) {
                    debug_assert!(
                        matches!(*slot, Slot::WideTrail),
                        "lead without trail at column {trail}"
                    );
                    *slot = Slot::Empty;
                    return Some(trail as u16);
                }
                None
            }
            Slot::WideTrail => {
                let lead = idx.checked_sub(1)?;
                debug_assert!(
                    matches!(self.slots[lead], Slot::WideLead(_)),
                    "trail without lead at column {lead}"
                );
                self.slots[lead] = Slot::Empty;
                Some(lead as u16)
            }
            Slot::Empty | Slot::Narrow(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Pair invariant check used across the tests.
    fn assert_pairs_intact(row: &CharRow) {
        for col in 0..row.width() {
            match row.slot(col) {
                Slot::WideLead(_) => {
                    assert!(col + 1 < row.width(), "lead in last column");
                    assert_eq!(row.slot(col + 1), Slot::WideTrail);
                }
                Slot::WideTrail => {
                    assert!(col > 0);
                    assert!(matches!(row.slot(col - 1), Slot::WideLead(_)));
                }
                _ => {}
            }
        }
    }

    #[test]
    fn new_row_is_blank() {
        let row = CharRow::new(8);
        assert!(row.is_blank());
        assert_eq!(row.measure_right(), 0);
        assert_eq!(row.slot(3), Slot::Empty);
    }

    #[test]
    fn narrow_write_reads_back() {
        let mut row = CharRow::new(8);
        assert!(row.set_narrow(2, 'a').is_empty());
        assert_eq!(row.slot(2), Slot::Narrow('a'));
        assert_eq!(row.measure_right(), 2);
        assert!(!row.is_blank());
    }

    #[test]
    fn wide_write_creates_pair() {
        let mut row = CharRow::new(8);
        assert!(row.set_wide(3, '世').is_empty());
        assert_eq!(row.slot(3), Slot::WideLead('世'));
        assert_eq!(row.slot(4), Slot::WideTrail);
        assert_eq!(row.slot(3).glyph(), Some('世'));
        assert_eq!(row.slot(4).glyph(), None);
        assert_eq!(row.measure_right(), 4);
        assert_pairs_intact(&row);
    }

    #[test]
    fn overwriting_lead_heals_trail() {
        let mut row = CharRow::new(8);
        row.set_wide(3, '世');
        let healed = row.set_narrow(3, 'x');
        assert_eq!(healed.as_slice(), &[4]);
        assert_eq!(row.slot(3), Slot::Narrow('x'));
        assert_eq!(row.slot(4), Slot::Empty);
        assert_pairs_intact(&row);
    }

    #[test]
    fn overwriting_trail_heals_lead() {
        let mut row = CharRow::new(8);
        row.set_wide(3, '世');
        let healed = row.set_narrow(4, 'x');
        assert_eq!(healed.as_slice(), &[3]);
        assert_eq!(row.slot(3), Slot::Empty);
        assert_eq!(row.slot(4), Slot::Narrow('x'));
        assert_pairs_intact(&row);
    }

    #[test]
    fn wide_over_wide_offset_by_one() {
        let mut row = CharRow::new(8);
        row.set_wide(2, '世');
        // New pair at 3..=4 severs the old trail at 3; lead at 2 is healed.
        let healed = row.set_wide(3, '界');
        assert_eq!(healed.as_slice(), &[2]);
        assert_eq!(row.slot(2), Slot::Empty);
        assert_eq!(row.slot(3), Slot::WideLead('界'));
        assert_eq!(row.slot(4), Slot::WideTrail);
        assert_pairs_intact(&row);
    }

    #[test]
    fn wide_overwrite_next_pair_lead() {
        let mut row = CharRow::new(8);
        row.set_wide(4, '世');
        // New pair at 3..=4 overwrites the old lead at 4; trail at 5 healed.
        let healed = row.set_wide(3, '界');
        assert_eq!(healed.as_slice(), &[5]);
        assert_eq!(row.slot(5), Slot::Empty);
        assert_pairs_intact(&row);
    }

    #[test]
    fn clear_heals_pair_halves() {
        let mut row = CharRow::new(8);
        row.set_wide(3, '世');
        let healed = row.clear(4);
        assert_eq!(healed.as_slice(), &[3]);
        assert!(row.is_blank());
        assert_pairs_intact(&row);
    }

    #[test]
    fn wide_lead_in_last_column_is_rejected() {
        let mut row = CharRow::new(4);
        // Release behavior: ignored. (Debug builds assert.)
        if !cfg!(debug_assertions) {
            row.set_wide(3, '世');
            assert!(row.is_blank());
        }
        let _ = row;
    }

    #[test]
    fn measure_right_counts_trail() {
        let mut row = CharRow::new(8);
        row.set_narrow(0, 'a');
        row.set_wide(1, '世');
        assert_eq!(row.measure_right(), 2);
    }

    #[test]
    fn fill_empty_resets_content() {
        let mut row = CharRow::new(8);
        row.set_narrow(5, 'z');
        row.fill_empty();
        assert!(row.is_blank());
        assert_eq!(row.measure_right(), 0);
    }

    #[test]
    fn resize_grow_appends_empty() {
        let mut row = CharRow::new(4);
        row.set_narrow(3, 'a');
        assert_eq!(row.resize(8).unwrap(), None);
        assert_eq!(row.width(), 8);
        assert_eq!(row.slot(3), Slot::Narrow('a'));
        assert_eq!(row.slot(7), Slot::Empty);
    }

    #[test]
    fn resize_shrink_truncates() {
        let mut row = CharRow::new(8);
        row.set_narrow(1, 'a');
        row.set_narrow(6, 'b');
        assert_eq!(row.resize(4).unwrap(), None);
        assert_eq!(row.width(), 4);
        assert_eq!(row.slot(1), Slot::Narrow('a'));
        assert_eq!(row.measure_right(), 1);
    }

    #[test]
    fn resize_shrink_converts_severed_lead() {
        let mut row = CharRow::new(8);
        row.set_wide(3, '世');
        // Boundary falls between lead (3) and trail (4).
        assert_eq!(row.resize(4).unwrap(), Some(3));
        assert_eq!(row.slot(3), Slot::Empty);
        assert_pairs_intact(&row);
    }

    #[test]
    fn resize_round_trip_preserves_low_columns() {
        let mut row = CharRow::new(10);
        row.set_narrow(0, 'a');
        row.set_wide(2, '世');
        row.set_narrow(9, 'z');
        row.resize(6).unwrap();
        row.resize(10).unwrap();
        assert_eq!(row.slot(0), Slot::Narrow('a'));
        assert_eq!(row.slot(2), Slot::WideLead('世'));
        assert_eq!(row.slot(3), Slot::WideTrail);
        assert_eq!(row.slot(9), Slot::Empty);
        assert_pairs_intact(&row);
    }
}

#[cfg(kani)]
mod proofs {
    use super::*;

    /// A narrow write never leaves a severed wide pair behind.
    #[kani::proof]
    fn narrow_write_keeps_pairs_intact() {
        let width: u8 = kani::any();
        let wide_col: u8 = kani::any();
        let write_col: u8 = kani::any();
        kani::assume(width >= 2 && width <= 8);
        kani::assume(wide_col + 1 < width);
        kani::assume(write_col < width);

        let mut row = CharRow::new(width as u16);
        row.set_wide(wide_col as u16, 'W');
        row.set_narrow(write_col as u16, 'x');

        for col in 0..width as u16 {
            if let Slot::WideLead(_) = row.slot(col) {
                kani::assert(
                    row.slot(col + 1) == Slot::WideTrail,
                    "every lead must keep its trail",
                );
            }
        }
    }

    /// Shrinking never leaves a lead in the last column.
    #[kani::proof]
    fn shrink_never_leaves_dangling_lead() {
        let width: u8 = kani::any();
        let wide_col: u8 = kani::any();
        let new_width: u8 = kani::any();
        kani::assume(width >= 2 && width <= 8);
        kani::assume(wide_col + 1 < width);
        kani::assume(new_width >= 1 && new_width < width);

        let mut row = CharRow::new(width as u16);
        row.set_wide(wide_col as u16, 'W');
        let _ = row.resize(new_width as u16);

        let last = row.width() - 1;
        kani::assert(
            !matches!(row.slot(last), Slot::WideLead(_)),
            "lead may not survive in the last column",
        );
    }
}
