//! In-crate integration tests.
//!
//! Unit tests live next to the stores they cover; these files exercise the
//! composed pipeline: text segmentation through [`Row::write_cells`] into the
//! three stores and back out through [`Row::text`].
