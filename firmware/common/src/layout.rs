//! Farm status layout.
//!
//! Turns a [`StatusSnapshot`] and the time since it arrived into draw calls.
//! The layout holds no state between frames: the same snapshot, theme and
//! timer always produce the same picture.
//!
//! ```text
//! +--------------------------------------------------------+
//! |------------------------------------------------- 0:42 -|  separator, data age
//! |  N1    Health: Rel PS5 Rel 24302 ->                    |  name, build
//! |        24302 Deploy-Playstation ->      1:33:42        |  changelist, step, duration
//! |--------------------------------------------------------|
//! |  N2    (idle)                                          |
//! |========================================================|  accent divider
//! |  ( )   Deploy: PS4 Rel 20220                           |  result circle, recent build
//! |        20220                                   0:05:00 |  changelist, age
//! +--------------------------------------------------------+
//! ```

use core::fmt::Write;

use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{Circle, Line, PrimitiveStyle, Rectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};
use heapless::String;

use crate::{
    elapsed::{TimeText, format_age, format_hms},
    scroll::{draw_prefixed_scrolling_text, draw_scrolling_text, text_width},
    snapshot::{BuildInfo, MachineStatus, RecentBuild, StatusSnapshot},
    theme::Theme,
};

/// Split a build name at its first colon.
///
/// The label keeps its colon; the remainder loses its leading whitespace.
/// Names without a colon have an empty label.
///
/// ```
/// use farm_display_common::layout::split_category;
///
/// assert_eq!(split_category("Health: Rel PS5"), ("Health:", "Rel PS5"));
/// assert_eq!(split_category("Rel PS5"), ("", "Rel PS5"));
/// ```
pub fn split_category(name: &str) -> (&str, &str) {
    match name.find(':') {
        Some(colon) => (&name[..=colon], name[colon + 1..].trim_start()),
        None => ("", name),
    }
}

/// Snapshot seconds plus the time the snapshot has been on screen, as `H:MM:SS`.
pub fn extrapolated_hms(
    base_secs: u32,
    timer_ms: u64,
) -> TimeText {
    format_hms(u64::from(base_secs).saturating_add(timer_ms / 1000))
}

/// Draw the whole screen for `snapshot`, `timer_ms` after it was received.
pub fn draw_farm_status<D>(
    display: &mut D,
    theme: &Theme,
    snapshot: &StatusSnapshot,
    timer_ms: u64,
) where
    D: DrawTarget<Color = Rgb565>,
{
    display.clear(theme.palette.background).ok();

    let screen = display.bounding_box();
    let bottom = screen.top_left.y + screen.size.height as i32;
    let row_height = theme.row_height() as i32;

    let mut cursor = screen.top_left.y + theme.top_margin as i32;
    for machine in &snapshot.machines {
        // Rows past the bottom edge would be clipped entirely
        if cursor >= bottom {
            break;
        }
        draw_machine_row(display, theme, machine, cursor, screen.size.width, timer_ms);
        cursor += row_height;
    }

    if cursor < bottom {
        draw_recent_band(display, theme, &snapshot.recent, cursor, bottom, screen.size.width, timer_ms);
    }

    draw_data_age(display, theme, timer_ms / 1000, screen.size.width);
}

// =============================================================================
// Machine Rows
// =============================================================================

fn draw_machine_row<D>(
    display: &mut D,
    theme: &Theme,
    machine: &MachineStatus,
    top: i32,
    width: u32,
    timer_ms: u64,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let palette = &theme.palette;

    Line::new(Point::new(0, top), Point::new(width as i32 - 1, top))
        .into_styled(PrimitiveStyle::with_stroke(palette.separator, 1))
        .draw(display)
        .ok();

    let content_top = top + theme.row_padding as i32;
    let name_color = if machine.online { palette.online } else { palette.offline };
    let name_window = Rectangle::new(
        Point::new(theme.name_x as i32, content_top),
        Size::new(
            theme.info_x.saturating_sub(theme.name_x + theme.prefix_gap),
            theme.name_font.character_size.height,
        ),
    );
    draw_scrolling_text(display, &machine.name, theme.name_style(name_color), name_window, timer_ms, theme.scroll);

    if let Some(build) = &machine.build {
        draw_build_lines(display, theme, build, content_top, width, timer_ms);
    }
}

fn draw_build_lines<D>(
    display: &mut D,
    theme: &Theme,
    build: &BuildInfo,
    top: i32,
    width: u32,
    timer_ms: u64,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let palette = &theme.palette;
    let line_height = theme.info_font.character_size.height;
    let info_x = theme.info_x as i32;

    // Build name across the rest of the row
    let (label, rest) = split_category(&build.name);
    let build_window = Rectangle::new(
        Point::new(info_x, top),
        Size::new(width.saturating_sub(theme.info_x + theme.right_margin), line_height),
    );
    draw_prefixed_scrolling_text(
        display,
        label,
        theme.info_style(palette.category_color(label)),
        rest,
        theme.info_style(palette.build),
        build_window,
        timer_ms,
        theme.scroll,
        theme.prefix_gap,
    );

    let second_line = top + (line_height + theme.line_gap) as i32;

    // Changelist and step, stopping short of the duration column
    if build.changelist.is_some() || build.step.is_some() {
        let mut changelist: String<10> = String::new();
        if let Some(number) = build.changelist {
            write!(changelist, "{number}").ok();
        }
        let step = build.step.as_deref().unwrap_or("");
        let step_window = Rectangle::new(
            Point::new(info_x, second_line),
            Size::new(theme.duration_x.saturating_sub(theme.info_x + theme.prefix_gap), line_height),
        );
        draw_prefixed_scrolling_text(
            display,
            &changelist,
            theme.info_style(palette.changelist),
            step,
            theme.info_style(palette.step),
            step_window,
            timer_ms,
            theme.scroll,
            theme.prefix_gap,
        );
    }

    if let Some(duration) = build.duration_secs {
        let text = extrapolated_hms(duration, timer_ms);
        Text::with_baseline(
            &text,
            Point::new(theme.duration_x as i32, second_line),
            theme.info_style(palette.duration),
            Baseline::Top,
        )
        .draw(display)
        .ok();
    }
}

// =============================================================================
// Recent Build Band
// =============================================================================

#[allow(clippy::too_many_arguments)]
fn draw_recent_band<D>(
    display: &mut D,
    theme: &Theme,
    recent: &RecentBuild,
    top: i32,
    bottom: i32,
    width: u32,
    timer_ms: u64,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let palette = &theme.palette;
    let padding = theme.band_padding;
    let result_color = palette.result_color(recent.result);

    Line::new(Point::new(0, top), Point::new(width as i32 - 1, top))
        .into_styled(PrimitiveStyle::with_stroke(palette.accent, 1))
        .draw(display)
        .ok();

    let remaining = (bottom - top) as u32;
    let diameter = remaining.saturating_sub(2 * padding);

    let (text_x, center_y) = if diameter > 0 {
        let circle = Circle::new(Point::new(theme.name_x as i32, top + padding as i32), diameter);
        circle
            .into_styled(PrimitiveStyle::with_fill(result_color))
            .draw(display)
            .ok();
        (theme.name_x + diameter + padding, circle.center().y)
    } else {
        (theme.name_x, top + remaining as i32 / 2)
    };

    // Two text lines centered on the circle
    let line_height = theme.info_font.character_size.height;
    let block_height = 2 * line_height + theme.line_gap;
    let first_line = center_y - block_height as i32 / 2;
    let second_line = first_line + (line_height + theme.line_gap) as i32;
    let right_edge = width.saturating_sub(theme.right_margin);

    let (label, rest) = split_category(&recent.name);
    let name_window = Rectangle::new(
        Point::new(text_x as i32, first_line),
        Size::new(right_edge.saturating_sub(text_x), line_height),
    );
    draw_prefixed_scrolling_text(
        display,
        label,
        theme.info_style(palette.category_color(label)),
        rest,
        theme.info_style(result_color),
        name_window,
        timer_ms,
        theme.scroll,
        theme.prefix_gap,
    );

    let mut changelist: String<10> = String::new();
    write!(changelist, "{}", recent.changelist).ok();
    Text::with_baseline(
        &changelist,
        Point::new(text_x as i32, second_line),
        theme.info_style(palette.changelist),
        Baseline::Top,
    )
    .draw(display)
    .ok();

    let age = extrapolated_hms(recent.age_secs, timer_ms);
    let right_aligned = TextStyleBuilder::new().alignment(Alignment::Right).baseline(Baseline::Top).build();
    Text::with_text_style(
        &age,
        Point::new(right_edge as i32, second_line),
        theme.info_style(palette.duration),
        right_aligned,
    )
    .draw(display)
    .ok();
}

// =============================================================================
// Data Age
// =============================================================================

/// Time since the snapshot arrived, top-right, on a cleared box.
fn draw_data_age<D>(
    display: &mut D,
    theme: &Theme,
    age_secs: u64,
    width: u32,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let palette = &theme.palette;
    let color = if theme.is_stale(age_secs) { palette.stale } else { palette.fresh };
    let style = theme.status_style(color);

    let text = format_age(age_secs);
    let text_w = text_width(&text, &style);
    let x = width.saturating_sub(theme.right_margin + text_w) as i32;

    data_age_box(theme, width, text_w)
        .into_styled(PrimitiveStyle::with_fill(palette.background))
        .draw(display)
        .ok();
    Text::with_baseline(&text, Point::new(x, 0), style, Baseline::Top)
        .draw(display)
        .ok();
}

/// Area cleared behind the data-age text, one pixel wider on each side.
pub fn data_age_box(
    theme: &Theme,
    width: u32,
    text_w: u32,
) -> Rectangle {
    let x = width.saturating_sub(theme.right_margin + text_w + 1) as i32;
    Rectangle::new(Point::new(x, 0), Size::new(text_w + 2, theme.status_font.character_size.height))
}
