//! Waiting screen, shown until the first snapshot is accepted.
//!
//! # Layout
//!
//! ```text
//! Waiting for status...             (title)
//! ---------------------------------
//! 812 bytes pending                 (partial line in the decoder)
//!
//! [W]    12s bad snapshot: ...      (latest diagnostics)
//! [I]    14s line too long, ...
//! ```

use core::fmt::Write;

use embedded_graphics::{
    mono_font::{MonoTextStyle, ascii::FONT_10X20},
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{Line, PrimitiveStyle},
    text::{Baseline, Text},
};
use heapless::String;

use crate::{
    config::SCREEN_HEIGHT,
    diagnostics::{DiagnosticEntry, DiagnosticLog, LOG_ENTRIES, Severity},
    theme::Theme,
};

const MARGIN_X: i32 = 10;
const TITLE_Y: i32 = 10;
const DIVIDER_Y: i32 = 36;
const PENDING_Y: i32 = 44;
const ENTRIES_Y: i32 = 68;
const ENTRY_LINE_HEIGHT: i32 = 14;

/// Entry lines that fit between the counter and the bottom of the screen.
const ENTRY_ROWS: usize = ((SCREEN_HEIGHT as i32 - ENTRIES_Y) / ENTRY_LINE_HEIGHT) as usize;

/// Diagnostic entries drawn: the whole log, or as much of it as fits.
pub const MAX_VISIBLE_ENTRIES: usize = if LOG_ENTRIES < ENTRY_ROWS { LOG_ENTRIES } else { ENTRY_ROWS };

/// Draw the waiting screen.
///
/// `pending` is the size of the partial line buffered by the decoder, so a
/// stalled sender shows up as a number that stops moving.
pub fn draw_waiting<D>(
    display: &mut D,
    theme: &Theme,
    pending: usize,
    log: &DiagnosticLog,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let palette = &theme.palette;
    display.clear(palette.background).ok();

    let width = display.bounding_box().size.width as i32;

    Text::with_baseline(
        "Waiting for status...",
        Point::new(MARGIN_X, TITLE_Y),
        MonoTextStyle::new(&FONT_10X20, palette.online),
        Baseline::Top,
    )
    .draw(display)
    .ok();

    Line::new(Point::new(MARGIN_X, DIVIDER_Y), Point::new(width - MARGIN_X, DIVIDER_Y))
        .into_styled(PrimitiveStyle::with_stroke(palette.accent, 1))
        .draw(display)
        .ok();

    let mut counter: String<32> = String::new();
    let _ = write!(counter, "{pending} bytes pending");
    Text::with_baseline(
        &counter,
        Point::new(MARGIN_X, PENDING_Y),
        theme.status_style(palette.step),
        Baseline::Top,
    )
    .draw(display)
    .ok();

    let mut y = ENTRIES_Y;
    for entry in log.latest(MAX_VISIBLE_ENTRIES) {
        draw_entry(display, theme, entry, y);
        y += ENTRY_LINE_HEIGHT;
    }
}

/// `[L] SSSSSs message`, prefix colored by severity.
fn draw_entry<D>(
    display: &mut D,
    theme: &Theme,
    entry: &DiagnosticEntry,
    y: i32,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let palette = &theme.palette;
    let prefix_color = match entry.severity {
        Severity::Info => palette.changelist,
        Severity::Warn => palette.aborted,
    };

    let mut prefix: String<24> = String::new();
    let _ = write!(prefix, "[{}] {:>5}s", entry.severity.prefix(), entry.at_ms / 1000);

    let prefix_style = theme.status_style(prefix_color);
    let next = Text::with_baseline(&prefix, Point::new(MARGIN_X, y), prefix_style, Baseline::Top)
        .draw(display)
        .unwrap_or(Point::new(MARGIN_X, y));

    let char_width = theme.status_font.character_size.width as i32;
    Text::with_baseline(
        &entry.message,
        Point::new(next.x + char_width, y),
        theme.status_style(palette.step),
        Baseline::Top,
    )
    .draw(display)
    .ok();
}
