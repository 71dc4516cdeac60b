//! Display dimensions, buffer capacities and default tunables.
//!
//! Everything here is a compile-time constant. Runtime-adjustable values
//! (timings, column positions, colors) are collected into [`crate::theme::Theme`],
//! whose `DEFAULT` is built from these constants.
//!
//! # Compile-Time Validation
//!
//! Groups that must stay consistent carry `const` assertions, so a bad edit
//! fails the build instead of producing a broken layout.

use crate::line_decoder::LineDecoder;

// =============================================================================
// Display Configuration
// =============================================================================

/// Display width in pixels (ST7789, 320x240 landscape).
pub const SCREEN_WIDTH: u32 = 320;

/// Display height in pixels.
pub const SCREEN_HEIGHT: u32 = 240;

// =============================================================================
// Serial Input Capacities
// =============================================================================

/// Longest accepted line in bytes. Longer lines are discarded.
pub const LINE_CAPACITY: usize = 2048;

/// Completed lines held until the consumer pops them.
pub const QUEUE_DEPTH: usize = 4;

/// Decoder sized for status snapshots.
pub type SerialLineDecoder = LineDecoder<LINE_CAPACITY, QUEUE_DEPTH>;

// =============================================================================
// Snapshot Capacities
// =============================================================================

/// Maximum machines per snapshot. More than this rejects the frame.
pub const MAX_MACHINES: usize = 8;

/// Capacity of a machine name.
pub const MACHINE_NAME_LEN: usize = 24;

/// Capacity of a build name (including its category label).
pub const BUILD_NAME_LEN: usize = 64;

/// Capacity of a build step name.
pub const STEP_NAME_LEN: usize = 48;

/// Scratch space for one unescaped JSON string (`\"`, `\u00e9`, ...).
///
/// Larger than every name capacity so that escaped strings in ignored fields
/// do not reject the frame.
pub const UNESCAPE_LEN: usize = 256;

const _: () = assert!(UNESCAPE_LEN >= BUILD_NAME_LEN && UNESCAPE_LEN >= STEP_NAME_LEN && UNESCAPE_LEN >= MACHINE_NAME_LEN);

// A full snapshot must fit on one line
const _: () = assert!(MAX_MACHINES * (MACHINE_NAME_LEN + BUILD_NAME_LEN + STEP_NAME_LEN) < LINE_CAPACITY);

// =============================================================================
// Scroll Timing
// =============================================================================

/// Rest at each end of a scroll cycle.
pub const SCROLL_PAUSE_MS: u32 = 2_000;

/// Time to travel from one end to the other.
pub const SCROLL_DURATION_MS: u32 = 3_000;

const _: () = assert!(SCROLL_DURATION_MS > 0);

// =============================================================================
// Layout
// =============================================================================

/// Space above the first row.
pub const TOP_MARGIN: u32 = 5;

/// Padding above and below the machine name inside a row.
pub const ROW_PADDING: u32 = 10;

/// Space between the two info lines of a row.
pub const LINE_GAP: u32 = 2;

/// Left edge of the machine name column.
pub const NAME_X: u32 = 10;

/// Left edge of the build / step column.
pub const INFO_X: u32 = 55;

/// Left edge of the elapsed duration column.
pub const DURATION_X: u32 = 250;

/// Space kept free at the right edge of the screen.
pub const RIGHT_MARGIN: u32 = 4;

/// Gap between a non-scrolling prefix and its scrolling text, and between columns.
pub const PREFIX_GAP: u32 = 6;

/// Padding around the result circle in the recent build band.
pub const BAND_PADDING: u32 = 10;

const _: () = assert!(NAME_X < INFO_X);
const _: () = assert!(INFO_X + PREFIX_GAP < DURATION_X);
const _: () = assert!(DURATION_X + RIGHT_MARGIN < SCREEN_WIDTH);

// =============================================================================
// Staleness
// =============================================================================

/// Data older than this is flagged with the attention color (15 minutes).
pub const STALE_AFTER_SECS: u64 = 15 * 60;
