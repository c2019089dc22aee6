//! A concrete attribute type for the generic stores.
//!
//! [`AttrRow`](crate::AttrRow) and [`Row`](crate::Row) only require
//! `Copy + PartialEq` of their attribute; this module supplies the attribute
//! a terminal actually paints with so the crate is usable end to end.

use bitflags::bitflags;

/// RGBA color.
///
/// Note: `Default` is black (the default background); use
/// [`Color::DEFAULT_FG`] for the default foreground explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(C)]
pub struct Color {
    /// Red component.
    pub r: u8,
    /// Green component.
    pub g: u8,
    /// Blue component.
    pub b: u8,
    /// Alpha component.
    pub a: u8,
}

impl Default for Color {
    fn default() -> Self {
        Self::DEFAULT_BG
    }
}

impl Color {
    /// Default foreground color (white).
    pub const DEFAULT_FG: Self = Self::new(255, 255, 255);

    /// Default background color (black).
    pub const DEFAULT_BG: Self = Self::new(0, 0, 0);

    /// Create a new opaque color.
    #[must_use]
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Get RGB components as a tuple.
    #[must_use]
    #[inline]
    pub const fn to_rgb(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

bitflags! {
    /// SGR-style rendition flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AttrFlags: u16 {
        /// Bold / increased intensity.
        const BOLD = 1 << 0;
        /// Faint / decreased intensity.
        const FAINT = 1 << 1;
        /// Italic.
        const ITALIC = 1 << 2;
        /// Underline.
        const UNDERLINE = 1 << 3;
        /// Slow blink.
        const BLINK = 1 << 4;
        /// Reverse video.
        const INVERSE = 1 << 5;
        /// Concealed.
        const INVISIBLE = 1 << 6;
        /// Crossed out.
        const STRIKETHROUGH = 1 << 7;
    }
}

/// The formatting attribute painted over a run of columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextAttribute {
    /// Foreground color.
    pub fg: Color,
    /// Background color.
    pub bg: Color,
    /// Rendition flags.
    pub attrs: AttrFlags,
}

impl Default for TextAttribute {
    /// White on black with no flags.
    fn default() -> Self {
        Self {
            fg: Color::DEFAULT_FG,
            bg: Color::DEFAULT_BG,
            attrs: AttrFlags::empty(),
        }
    }
}

impl TextAttribute {
    /// Create an attribute with the given colors and no flags.
    #[must_use]
    pub const fn new(fg: Color, bg: Color) -> Self {
        Self {
            fg,
            bg,
            attrs: AttrFlags::empty(),
        }
    }

    /// Replace the rendition flags.
    #[must_use]
    pub const fn with_flags(mut self, attrs: AttrFlags) -> Self {
        self.attrs = attrs;
        self
    }

    /// Check if this is the default attribute.
    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}
