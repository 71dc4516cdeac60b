//! Time-driven horizontal scrolling for text wider than its slot.
//!
//! The scroll position is a pure function of the text width, the slot width
//! and a monotonic timer. Nothing is stored between frames, so redrawing at
//! any rate gives the same picture for the same timer value.
//!
//! # Cycle
//!
//! ```text
//!  offset
//!    px |          ___________
//!       |         /           \
//!       |        /             \
//!     0 |_______/               \_______
//!       +-------+-----+-------+-----+---> t
//!         pause  scroll pause  scroll
//!       RestLeft  ->  RestRight  <-
//! ```
//!
//! `px` is the overflow (`text_width - slot_width`). Text that fits never
//! moves. Values on the ramps are rounded half up using integer math only.

use embedded_graphics::{
    mono_font::MonoTextStyle,
    pixelcolor::Rgb565,
    prelude::*,
    primitives::Rectangle,
    text::{Baseline, Text, renderer::TextRenderer},
};

// =============================================================================
// Timing
// =============================================================================

/// Durations of one scroll cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScrollTiming {
    /// Rest at each end.
    pub pause_ms: u32,
    /// Travel time from one end to the other.
    pub scroll_ms: u32,
}

impl ScrollTiming {
    pub const fn new(
        pause_ms: u32,
        scroll_ms: u32,
    ) -> Self {
        Self { pause_ms, scroll_ms }
    }

    /// Length of a full back-and-forth cycle.
    #[inline]
    pub const fn cycle_ms(&self) -> u64 { 2 * (self.pause_ms as u64 + self.scroll_ms as u64) }
}

/// Where in the cycle a timer value falls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScrollPhase {
    /// Resting with the start of the text visible.
    RestLeft,
    /// Moving toward the end of the text.
    ScrollRight,
    /// Resting with the end of the text visible.
    RestRight,
    /// Moving back toward the start.
    ScrollLeft,
}

/// Phase plus the time already spent in it.
fn locate(
    timer_ms: u64,
    timing: ScrollTiming,
) -> (ScrollPhase, u64) {
    let cycle = timing.cycle_ms();
    if cycle == 0 {
        return (ScrollPhase::RestLeft, 0);
    }

    let pause = u64::from(timing.pause_ms);
    let scroll = u64::from(timing.scroll_ms);
    let t = timer_ms % cycle;

    if t < pause {
        (ScrollPhase::RestLeft, t)
    } else if t < pause + scroll {
        (ScrollPhase::ScrollRight, t - pause)
    } else if t < 2 * pause + scroll {
        (ScrollPhase::RestRight, t - pause - scroll)
    } else {
        (ScrollPhase::ScrollLeft, t - 2 * pause - scroll)
    }
}

/// Current phase of the scroll cycle.
pub fn scroll_phase(
    timer_ms: u64,
    timing: ScrollTiming,
) -> ScrollPhase {
    locate(timer_ms, timing).0
}

/// `round(elapsed / span * px)`, half up. `span` is non-zero on every ramp.
///
/// Computed in `u128`: `elapsed` and `px` are each up to `u32::MAX`.
#[inline]
fn ramp(
    elapsed: u64,
    span: u64,
    px: u64,
) -> u64 {
    let (elapsed, span, px) = (u128::from(elapsed), u128::from(span), u128::from(px));
    ((2 * elapsed * px + span) / (2 * span)) as u64
}

/// Horizontal offset in `[0, measured - available]`.
///
/// Returns 0 for any timer when the text fits.
pub fn scroll_offset(
    measured: u32,
    available: u32,
    timer_ms: u64,
    timing: ScrollTiming,
) -> u32 {
    if measured <= available {
        return 0;
    }

    let px = u64::from(measured - available);
    let span = u64::from(timing.scroll_ms);
    let offset = match locate(timer_ms, timing) {
        (ScrollPhase::RestLeft, _) => 0,
        (ScrollPhase::ScrollRight, elapsed) => ramp(elapsed, span, px),
        (ScrollPhase::RestRight, _) => px,
        (ScrollPhase::ScrollLeft, elapsed) => ramp(span - elapsed, span, px),
    };

    // ramp() never exceeds px, so this fits the u32 overflow it came from
    offset.min(px) as u32
}

// =============================================================================
// Character-Cell Windows
// =============================================================================

/// The slice of `text` visible through a window `visible_chars` wide.
///
/// Offsets are counted in characters, for sinks that draw whole cells.
pub fn visible_window(
    text: &str,
    visible_chars: usize,
    timer_ms: u64,
    timing: ScrollTiming,
) -> &str {
    let total = text.chars().count();
    if total <= visible_chars {
        return text;
    }

    let skip = scroll_offset(total as u32, visible_chars as u32, timer_ms, timing) as usize;
    let mut starts = text.char_indices().map(|(i, _)| i).chain(core::iter::once(text.len()));
    let start = starts.nth(skip).unwrap_or(text.len());
    let end = text[start..]
        .char_indices()
        .nth(visible_chars)
        .map_or(text.len(), |(i, _)| start + i);
    &text[start..end]
}

// =============================================================================
// Pixel Layout
// =============================================================================

/// Where to draw a scrolling text and what to clip it to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollLayout {
    /// Left edge of the text's first glyph. Left of the window while scrolled.
    pub draw_x: i32,
    /// `None` when the text fits the window, else the window itself.
    pub clip: Option<Rectangle>,
}

impl ScrollLayout {
    pub fn compute(
        measured: u32,
        window: Rectangle,
        timer_ms: u64,
        timing: ScrollTiming,
    ) -> Self {
        let available = window.size.width;
        let offset = scroll_offset(measured, available, timer_ms, timing);
        Self {
            draw_x: window.top_left.x - offset as i32,
            clip: (measured > available).then_some(window),
        }
    }
}

/// Rendered width of `text` in pixels.
pub fn text_width<S: TextRenderer>(
    text: &str,
    style: &S,
) -> u32 {
    style.measure_string(text, Point::zero(), Baseline::Top).bounding_box.size.width
}

/// Draw `text` in `window`, scrolled for `timer_ms` and clipped to the window.
///
/// The text's top edge sits on the window's top edge.
pub fn draw_scrolling_text<D>(
    display: &mut D,
    text: &str,
    style: MonoTextStyle<'_, Rgb565>,
    window: Rectangle,
    timer_ms: u64,
    timing: ScrollTiming,
) -> ScrollLayout
where
    D: DrawTarget<Color = Rgb565>,
{
    let layout = ScrollLayout::compute(text_width(text, &style), window, timer_ms, timing);
    let text = Text::with_baseline(text, Point::new(layout.draw_x, window.top_left.y), style, Baseline::Top);

    match layout.clip {
        Some(area) => {
            text.draw(&mut display.clipped(&area)).ok();
        }
        None => {
            text.draw(display).ok();
        }
    }

    layout
}

/// The part of `window` left for scrolling text after a prefix.
///
/// An empty prefix takes no gap. A prefix wider than the window leaves a
/// zero-width window.
pub fn split_window(
    window: Rectangle,
    prefix_width: u32,
    gap: u32,
) -> Rectangle {
    let taken = if prefix_width == 0 { 0 } else { prefix_width + gap };
    let taken = taken.min(window.size.width);
    Rectangle::new(
        window.top_left + Point::new(taken as i32, 0),
        Size::new(window.size.width - taken, window.size.height),
    )
}

/// Draw a fixed `prefix` at the window's left edge, then scroll `text` in the
/// space that remains.
///
/// Returns the layout of the scrolling part.
#[allow(clippy::too_many_arguments)]
pub fn draw_prefixed_scrolling_text<D>(
    display: &mut D,
    prefix: &str,
    prefix_style: MonoTextStyle<'_, Rgb565>,
    text: &str,
    text_style: MonoTextStyle<'_, Rgb565>,
    window: Rectangle,
    timer_ms: u64,
    timing: ScrollTiming,
    gap: u32,
) -> ScrollLayout
where
    D: DrawTarget<Color = Rgb565>,
{
    let prefix_width = if prefix.is_empty() { 0 } else { text_width(prefix, &prefix_style) };

    if prefix_width > 0 {
        Text::with_baseline(prefix, window.top_left, prefix_style, Baseline::Top)
            .draw(&mut display.clipped(&window))
            .ok();
    }

    let rest = split_window(window, prefix_width, gap);
    draw_scrolling_text(display, text, text_style, rest, timer_ms, timing)
}

#[cfg(test)]
mod tests {
    use embedded_graphics::mono_font::ascii::FONT_6X10;

    use super::*;
    use crate::test_canvas::TestCanvas;

    const TIMING: ScrollTiming = ScrollTiming::new(1000, 2000);

    #[test]
    fn test_cycle_length() {
        assert_eq!(TIMING.cycle_ms(), 6000);
        assert_eq!(ScrollTiming::new(0, 0).cycle_ms(), 0);
    }

    #[test]
    fn test_fitting_text_never_moves() {
        for t in (0..12_000).step_by(250) {
            assert_eq!(scroll_offset(80, 100, t, TIMING), 0);
            assert_eq!(scroll_offset(100, 100, t, TIMING), 0);
        }
    }

    #[test]
    fn test_offsets_through_one_cycle() {
        // 100 px of overflow
        let offset = |t| scroll_offset(300, 200, t, TIMING);
        assert_eq!(offset(0), 0);
        assert_eq!(offset(999), 0);
        assert_eq!(offset(1500), 25);
        assert_eq!(offset(2000), 50);
        assert_eq!(offset(3000), 100);
        assert_eq!(offset(3999), 100);
        assert_eq!(offset(5000), 50);
        assert_eq!(offset(6000), 0);
    }

    #[test]
    fn test_rounding_is_half_up() {
        // 3 px over 2000 ms: at 1000 ms the exact value is 1.5
        assert_eq!(scroll_offset(103, 100, 2000, TIMING), 2);
        // at 500 ms it is 0.75
        assert_eq!(scroll_offset(103, 100, 1500, TIMING), 1);
    }

    #[test]
    fn test_offset_is_bounded_and_idempotent() {
        for px in [1u32, 7, 100, 999] {
            for t in (0..20_000).step_by(37) {
                let a = scroll_offset(200 + px, 200, t, TIMING);
                let b = scroll_offset(200 + px, 200, t, TIMING);
                assert_eq!(a, b);
                assert!(a <= px);
            }
        }
    }

    #[test]
    fn test_offset_is_monotonic_on_ramps() {
        let mut last = 0;
        for t in 1000..=3000 {
            let now = scroll_offset(350, 200, t, TIMING);
            assert!(now >= last);
            last = now;
        }
        for t in 4000..=6000 {
            let now = scroll_offset(350, 200, t, TIMING);
            assert!(now <= last);
            last = now;
        }
    }

    #[test]
    fn test_extreme_timing_does_not_overflow() {
        let timing = ScrollTiming::new(u32::MAX, u32::MAX);
        let px = u32::MAX;
        // Midway through the first ramp
        let t = u64::from(u32::MAX) + u64::from(u32::MAX) / 2;
        let offset = scroll_offset(u32::MAX, 0, t, timing);
        assert!(offset > px / 2 - 2 && offset < px / 2 + 2);
        // Rest-right plateau
        assert_eq!(scroll_offset(u32::MAX, 0, 2 * u64::from(u32::MAX), timing), px);
    }

    #[test]
    fn test_zero_length_cycle() {
        let timing = ScrollTiming::new(0, 0);
        assert_eq!(scroll_offset(300, 100, 1234, timing), 0);
        assert_eq!(scroll_phase(1234, timing), ScrollPhase::RestLeft);
    }

    #[test]
    fn test_zero_pause_still_cycles() {
        let timing = ScrollTiming::new(0, 1000);
        assert_eq!(scroll_offset(110, 100, 500, timing), 5);
        assert_eq!(scroll_offset(110, 100, 1000, timing), 10);
        assert_eq!(scroll_offset(110, 100, 1500, timing), 5);
    }

    #[test]
    fn test_phases() {
        assert_eq!(scroll_phase(0, TIMING), ScrollPhase::RestLeft);
        assert_eq!(scroll_phase(1000, TIMING), ScrollPhase::ScrollRight);
        assert_eq!(scroll_phase(3000, TIMING), ScrollPhase::RestRight);
        assert_eq!(scroll_phase(4000, TIMING), ScrollPhase::ScrollLeft);
        assert_eq!(scroll_phase(6000, TIMING), ScrollPhase::RestLeft);
    }

    #[test]
    fn test_visible_window() {
        let text = "0123456789";
        assert_eq!(visible_window(text, 4, 0, TIMING), "0123");
        assert_eq!(visible_window(text, 4, 3000, TIMING), "6789");
        assert_eq!(visible_window(text, 4, 2000, TIMING), "3456");
        assert_eq!(visible_window(text, 20, 3000, TIMING), text);
    }

    #[test]
    fn test_visible_window_multibyte() {
        assert_eq!(visible_window("ééééé", 3, 3000, TIMING), "ééé");
        assert_eq!(visible_window("aéb", 2, 3000, TIMING), "éb");
    }

    #[test]
    fn test_layout_for_fitting_text() {
        let window = Rectangle::new(Point::new(55, 20), Size::new(100, 13));
        let layout = ScrollLayout::compute(60, window, 3000, TIMING);
        assert_eq!(layout.draw_x, 55);
        assert_eq!(layout.clip, None);
    }

    #[test]
    fn test_layout_for_overflowing_text() {
        let window = Rectangle::new(Point::new(55, 20), Size::new(100, 13));
        let layout = ScrollLayout::compute(160, window, 3000, TIMING);
        assert_eq!(layout.draw_x, 55 - 60);
        assert_eq!(layout.clip, Some(window));
    }

    #[test]
    fn test_text_width_of_mono_font() {
        let style = MonoTextStyle::new(&FONT_6X10, Rgb565::WHITE);
        assert_eq!(text_width("", &style), 0);
        assert_eq!(text_width("abcd", &style), 24);
    }

    #[test]
    fn test_split_window() {
        let window = Rectangle::new(Point::new(10, 5), Size::new(100, 10));
        assert_eq!(split_window(window, 0, 4), window);
        assert_eq!(
            split_window(window, 30, 4),
            Rectangle::new(Point::new(44, 5), Size::new(66, 10))
        );
        assert_eq!(split_window(window, 200, 4).size.width, 0);
    }

    #[test]
    fn test_scrolling_text_stays_inside_window() {
        let mut canvas = TestCanvas::new();
        let style = MonoTextStyle::new(&FONT_6X10, Rgb565::WHITE);
        let window = Rectangle::new(Point::new(50, 50), Size::new(60, 10));

        // 30 chars = 180 px in a 60 px window, caught mid-scroll
        let layout = draw_scrolling_text(&mut canvas, "MMMMMMMMMMMMMMMMMMMMMMMMMMMMMM", style, window, 2000, TIMING);
        assert_eq!(layout.clip, Some(window));
        assert!(canvas.any_in(&window, Rgb565::WHITE));
        assert_eq!(canvas.count_outside(&window, Rgb565::WHITE), 0);
    }

    #[test]
    fn test_prefix_is_drawn_left_of_scrolling_text() {
        let mut canvas = TestCanvas::new();
        let prefix_style = MonoTextStyle::new(&FONT_6X10, Rgb565::RED);
        let text_style = MonoTextStyle::new(&FONT_6X10, Rgb565::GREEN);
        let window = Rectangle::new(Point::new(0, 0), Size::new(120, 10));

        let layout = draw_prefixed_scrolling_text(
            &mut canvas,
            "Tag:",
            prefix_style,
            "some long build name here",
            text_style,
            window,
            0,
            TIMING,
            4,
        );

        // "Tag:" is 24 px wide, plus the gap
        let prefix_area = Rectangle::new(Point::zero(), Size::new(24, 10));
        assert_eq!(layout.draw_x, 28);
        assert!(canvas.any_in(&prefix_area, Rgb565::RED));
        assert!(!canvas.any_in(&prefix_area, Rgb565::GREEN));
    }

    #[test]
    fn test_empty_prefix_takes_no_space() {
        let mut canvas = TestCanvas::new();
        let style = MonoTextStyle::new(&FONT_6X10, Rgb565::WHITE);
        let window = Rectangle::new(Point::new(10, 0), Size::new(120, 10));

        let layout = draw_prefixed_scrolling_text(&mut canvas, "", style, "short", style, window, 0, TIMING, 4);
        assert_eq!(layout.draw_x, 10);
    }
}
