//! Visual tunables: palette, fonts, column positions and timing.
//!
//! A [`Theme`] is built once and passed by reference to every draw function.
//! Nothing in the layout reads global style state, so two displays with
//! different themes can share the same code.

use embedded_graphics::{
    mono_font::{
        MonoFont, MonoTextStyle,
        ascii::{FONT_6X10, FONT_8X13},
    },
    pixelcolor::Rgb565,
};
use profont::PROFONT_24_POINT;

use crate::{
    colors::{BASE0, BASE01, BASE02, BASE03, BASE1, BLUE, GREEN, ORANGE, RED, VIOLET, YELLOW},
    config,
    scroll::ScrollTiming,
    snapshot::BuildResult,
};

// =============================================================================
// Palette
// =============================================================================

/// Category label (before the colon in a build name) and its color.
pub type CategoryColor = (&'static str, Rgb565);

/// Default build categories.
pub const DEFAULT_CATEGORIES: &[CategoryColor] = &[
    ("Health", BLUE),
    ("Deploy", GREEN),
    ("Release", YELLOW),
    ("Nightly", VIOLET),
];

/// Every color the layout uses.
#[derive(Clone, Copy, Debug)]
pub struct Palette {
    pub background: Rgb565,
    /// Line between machine rows.
    pub separator: Rgb565,
    /// Divider above the recent build band.
    pub accent: Rgb565,
    /// Name of an online machine.
    pub online: Rgb565,
    /// Name of an offline machine.
    pub offline: Rgb565,
    /// Build name without a known category.
    pub build: Rgb565,
    pub step: Rgb565,
    pub changelist: Rgb565,
    pub duration: Rgb565,
    /// Data-age indicator while the snapshot is fresh.
    pub fresh: Rgb565,
    /// Data-age indicator once the snapshot is stale.
    pub stale: Rgb565,
    pub success: Rgb565,
    pub aborted: Rgb565,
    pub failure: Rgb565,
    /// Category label that matches no entry of `categories`.
    pub category_default: Rgb565,
    /// Matched case-insensitively against the label, without its colon.
    pub categories: &'static [CategoryColor],
}

impl Palette {
    /// Solarized dark.
    pub const DEFAULT: Self = Self {
        background: BASE03,
        separator: BASE02,
        accent: BLUE,
        online: BASE1,
        offline: BASE01,
        build: BASE1,
        step: BASE0,
        changelist: BASE01,
        duration: BASE0,
        fresh: BASE01,
        stale: RED,
        success: GREEN,
        aborted: ORANGE,
        failure: RED,
        category_default: BASE01,
        categories: DEFAULT_CATEGORIES,
    };

    /// Color for a category label such as `"Health:"`.
    pub fn category_color(
        &self,
        label: &str,
    ) -> Rgb565 {
        let keyword = label.trim_end_matches(':').trim();
        self.categories
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(keyword))
            .map_or(self.category_default, |&(_, color)| color)
    }

    /// Color for a build result.
    pub const fn result_color(
        &self,
        result: BuildResult,
    ) -> Rgb565 {
        match result {
            BuildResult::Success => self.success,
            BuildResult::Aborted => self.aborted,
            BuildResult::Failure => self.failure,
        }
    }
}

impl Default for Palette {
    fn default() -> Self { Self::DEFAULT }
}

// =============================================================================
// Theme
// =============================================================================

/// Fonts, geometry, timing and colors for one display.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub palette: Palette,
    /// Machine names and the recent build name.
    pub name_font: &'static MonoFont<'static>,
    /// Build and step lines.
    pub info_font: &'static MonoFont<'static>,
    /// Durations, ages and the waiting screen.
    pub status_font: &'static MonoFont<'static>,
    pub scroll: ScrollTiming,
    pub top_margin: u32,
    pub row_padding: u32,
    pub line_gap: u32,
    pub name_x: u32,
    pub info_x: u32,
    pub duration_x: u32,
    pub right_margin: u32,
    pub prefix_gap: u32,
    pub band_padding: u32,
    pub stale_after_secs: u64,
}

impl Theme {
    pub const DEFAULT: Self = Self {
        palette: Palette::DEFAULT,
        name_font: &PROFONT_24_POINT,
        info_font: &FONT_8X13,
        status_font: &FONT_6X10,
        scroll: ScrollTiming::new(config::SCROLL_PAUSE_MS, config::SCROLL_DURATION_MS),
        top_margin: config::TOP_MARGIN,
        row_padding: config::ROW_PADDING,
        line_gap: config::LINE_GAP,
        name_x: config::NAME_X,
        info_x: config::INFO_X,
        duration_x: config::DURATION_X,
        right_margin: config::RIGHT_MARGIN,
        prefix_gap: config::PREFIX_GAP,
        band_padding: config::BAND_PADDING,
        stale_after_secs: config::STALE_AFTER_SECS,
    };

    /// Height of one machine row: the name font plus padding above and below.
    #[inline]
    pub const fn row_height(&self) -> u32 { self.name_font.character_size.height + 2 * self.row_padding }

    /// Style for the machine and recent build names.
    #[inline]
    pub fn name_style(
        &self,
        color: Rgb565,
    ) -> MonoTextStyle<'static, Rgb565> {
        MonoTextStyle::new(self.name_font, color)
    }

    #[inline]
    pub fn info_style(
        &self,
        color: Rgb565,
    ) -> MonoTextStyle<'static, Rgb565> {
        MonoTextStyle::new(self.info_font, color)
    }

    #[inline]
    pub fn status_style(
        &self,
        color: Rgb565,
    ) -> MonoTextStyle<'static, Rgb565> {
        MonoTextStyle::new(self.status_font, color)
    }

    #[inline]
    pub fn is_stale(
        &self,
        age_secs: u64,
    ) -> bool {
        age_secs >= self.stale_after_secs
    }
}

impl Default for Theme {
    fn default() -> Self { Self::DEFAULT }
}
