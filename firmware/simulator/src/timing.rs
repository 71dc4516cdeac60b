//! Timing constants for the simulator.
//!
//! These constants use `std::time::Duration` which is not available in `no_std`
//! environments, so they are defined here rather than in the common crate.

use std::time::Duration;

/// How often received bytes are fed to the decoder.
pub const PUMP_INTERVAL: Duration = Duration::from_millis(20);

/// How often the window is redrawn.
pub const RENDER_INTERVAL: Duration = Duration::from_millis(100);

/// Gap between lines when replaying a file, so each snapshot stays visible.
pub const REPLAY_LINE_INTERVAL: Duration = Duration::from_secs(3);
