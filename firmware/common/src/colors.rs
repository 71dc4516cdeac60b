//! Color constants for the build farm display.
//!
//! The palette is Solarized (dark), converted to RGB565 at compile time.
//!
//! ## Rgb565 Color Format
//!
//! Rgb565 uses 16 bits per pixel: 5 bits red, 6 bits green, 5 bits blue.
//! [`rgb888`] drops the low bits of each 8-bit channel so the constants can be
//! written with the familiar 0-255 values.

use embedded_graphics::pixelcolor::Rgb565;

/// Convert 8-bit channels to RGB565 in a `const` context.
#[inline]
pub const fn rgb888(
    r: u8,
    g: u8,
    b: u8,
) -> Rgb565 {
    Rgb565::new(r >> 3, g >> 2, b >> 3)
}

// =============================================================================
// Base Tones
// =============================================================================

/// Screen background (base03).
pub const BASE03: Rgb565 = rgb888(0, 43, 54);

/// Highlighted background (base02). Used for row separators.
pub const BASE02: Rgb565 = rgb888(7, 54, 66);

/// Secondary content (base01). Dimmed text: offline machines, changelists.
pub const BASE01: Rgb565 = rgb888(88, 110, 117);

/// Body text (base0).
pub const BASE0: Rgb565 = rgb888(131, 148, 150);

/// Emphasized body text (base1). Online machines and build names.
pub const BASE1: Rgb565 = rgb888(147, 161, 161);

// =============================================================================
// Accent Colors
// =============================================================================

/// Yellow (181, 137, 0).
pub const YELLOW: Rgb565 = rgb888(181, 137, 0);

/// Orange (203, 75, 22). Aborted builds.
pub const ORANGE: Rgb565 = rgb888(203, 75, 22);

/// Red (220, 50, 47). Failed builds and stale data.
pub const RED: Rgb565 = rgb888(220, 50, 47);

/// Violet (108, 113, 196).
pub const VIOLET: Rgb565 = rgb888(108, 113, 196);

/// Blue (38, 139, 210). Divider above the recent build band.
pub const BLUE: Rgb565 = rgb888(38, 139, 210);

/// Green (133, 153, 0). Successful builds.
pub const GREEN: Rgb565 = rgb888(133, 153, 0);
