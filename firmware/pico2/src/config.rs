//! Firmware timing, USB and SPI configuration.
//!
//! Display geometry and layout tunables live in `farm_display_common`; this
//! module only holds what is specific to the Pico 2 board.

// =============================================================================
// Loop Timing
// =============================================================================

/// Interval between draining USB input into the decoder.
pub const PUMP_INTERVAL_MS: u64 = 20;

/// Interval between frames. Scrolling and elapsed times are derived from the
/// clock, so a late frame never drifts the animation.
pub const RENDER_INTERVAL_MS: u64 = 100;

const _: () = assert!(RENDER_INTERVAL_MS >= PUMP_INTERVAL_MS);

// =============================================================================
// USB CDC-ACM
// =============================================================================

/// Raspberry Pi vendor ID.
pub const USB_VID: u16 = 0x2e8a;

/// Raspberry Pi Pico CDC serial product ID.
pub const USB_PID: u16 = 0x000a;

pub const USB_MANUFACTURER: &str = "Raspberry Pi";
pub const USB_PRODUCT: &str = "Build Farm Display";

/// Full-speed bulk packet size.
pub const USB_MAX_PACKET_SIZE: u16 = 64;

/// Bytes buffered between the USB task and the main loop.
pub const RX_PIPE_CAPACITY: usize = 1024;

// =============================================================================
// Display SPI
// =============================================================================

/// ST7789 SPI clock (datasheet maximum).
pub const SPI_FREQUENCY_HZ: u32 = 62_500_000;

// =============================================================================
// Render Cadence
// =============================================================================

/// Decides which pump ticks also render a frame.
///
/// Frames stay on a fixed grid of `interval_ms`. When a frame is late by more
/// than one interval the grid restarts from the current time instead of
/// rendering a burst of catch-up frames.
#[derive(Clone, Copy, Debug)]
pub struct RenderCadence {
    interval_ms: u64,
    next_ms: u64,
}

impl RenderCadence {
    /// First frame is due immediately.
    pub const fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            next_ms: 0,
        }
    }

    /// Whether a frame is due at `now_ms`. Advances the schedule when it is.
    pub fn due(
        &mut self,
        now_ms: u64,
    ) -> bool {
        if now_ms < self.next_ms {
            return false;
        }

        self.next_ms += self.interval_ms;
        if self.next_ms <= now_ms {
            self.next_ms = now_ms + self.interval_ms;
        }
        true
    }
}

impl Default for RenderCadence {
    fn default() -> Self { Self::new(RENDER_INTERVAL_MS) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_is_immediate() {
        let mut cadence = RenderCadence::new(100);
        assert!(cadence.due(0));
        assert!(!cadence.due(0));
    }

    #[test]
    fn test_frames_follow_grid() {
        let mut cadence = RenderCadence::new(100);
        let rendered: std::vec::Vec<u64> = (0..=300).step_by(20).filter(|&t| cadence.due(t)).collect();
        assert_eq!(rendered, [0, 100, 200, 300]);
    }

    #[test]
    fn test_jittered_ticks_keep_grid() {
        let mut cadence = RenderCadence::new(100);
        assert!(cadence.due(0));
        assert!(cadence.due(105));
        // Next frame is still due at 200, not 205
        assert!(cadence.due(200));
    }

    #[test]
    fn test_long_stall_does_not_burst() {
        let mut cadence = RenderCadence::new(100);
        assert!(cadence.due(0));
        assert!(cadence.due(1_000));
        assert!(!cadence.due(1_020));
        assert!(cadence.due(1_100));
    }

    #[test]
    fn test_default_interval() {
        let mut cadence = RenderCadence::default();
        assert!(cadence.due(0));
        assert!(!cadence.due(RENDER_INTERVAL_MS - 1));
        assert!(cadence.due(RENDER_INTERVAL_MS));
    }
}
