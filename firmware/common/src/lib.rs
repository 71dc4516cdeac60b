//! Platform-agnostic core of the build farm status display.
//!
//! The display receives newline-delimited JSON snapshots of a build farm over a
//! serial byte stream and keeps rendering the latest one, extrapolating elapsed
//! build time and scrolling text that does not fit its column.
//!
//! - [`line_decoder`]: byte stream to complete, trimmed lines
//! - [`snapshot`]: JSON line to [`StatusSnapshot`]
//! - [`scroll`]: time-driven horizontal scroll offsets for oversized text
//! - [`layout`]: snapshot + timer to draw calls on any `DrawTarget`
//! - [`screens`]: the waiting screen shown before the first snapshot
//! - [`farm`]: [`FarmDisplay`], tying the above together for a host loop
//! - [`theme`], [`colors`], [`config`]: palette, fonts and tunables
//! - [`diagnostics`]: ring buffer of recent diagnostic lines for the waiting screen
//! - [`elapsed`]: `H:MM:SS` / `M:SS` formatting
//!
//! # no_std Compatibility
//!
//! The crate is `no_std` and allocation-free: every buffer is a fixed-capacity
//! `heapless` collection. Tests run on the host with `std`:
//!
//! ```bash
//! cargo test -p farm-display-common
//! ```

#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod colors;
pub mod config;
pub mod diagnostics;
pub mod elapsed;
pub mod farm;
pub mod layout;
pub mod line_decoder;
pub mod screens;
pub mod scroll;
pub mod snapshot;
pub mod theme;

#[cfg(test)]
mod test_canvas;

// Re-export commonly used items
pub use diagnostics::{DiagnosticLog, Severity};
pub use farm::{FarmDisplay, PumpReport, ReceivedSnapshot};
pub use line_decoder::{DecodeFault, LineDecoder};
pub use scroll::{ScrollLayout, ScrollPhase, ScrollTiming};
pub use snapshot::{BuildInfo, BuildResult, MachineStatus, RecentBuild, SnapshotError, StatusSnapshot};
pub use theme::{Palette, Theme};
