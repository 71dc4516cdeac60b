//! The display controller.
//!
//! [`FarmDisplay`] owns the line decoder, the snapshot currently on screen and
//! the diagnostics log. A host drives it with two independent ticks:
//!
//! ```ignore
//! // every 20 ms
//! let report = farm.pump(&received_bytes, now_ms);
//!
//! // every 100 ms
//! farm.render(&mut display, &theme, now_ms);
//! ```
//!
//! Both take the host's monotonic clock in milliseconds. The controller never
//! reads a clock itself, so it behaves the same on the device, the simulator
//! and in tests.

use embedded_graphics::{pixelcolor::Rgb565, prelude::*};

use crate::{
    config::SerialLineDecoder,
    diagnostics::{DiagnosticLog, Severity},
    layout::draw_farm_status,
    screens::draw_waiting,
    snapshot::StatusSnapshot,
    theme::Theme,
};

/// A snapshot and the host time it was accepted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReceivedSnapshot {
    pub snapshot: StatusSnapshot,
    pub received_at_ms: u64,
}

impl ReceivedSnapshot {
    /// Time on screen so far. Never negative, even if the clock goes backwards.
    #[inline]
    pub fn age_ms(
        &self,
        now_ms: u64,
    ) -> u64 {
        now_ms.saturating_sub(self.received_at_ms)
    }
}

/// What one [`FarmDisplay::pump`] call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PumpReport {
    /// Lines decoded into a snapshot.
    pub accepted: u16,
    /// Lines that failed to decode.
    pub rejected: u16,
    /// Decoder faults (dropped data).
    pub faults: u16,
}

impl PumpReport {
    #[inline]
    pub const fn is_quiet(&self) -> bool { self.accepted == 0 && self.rejected == 0 && self.faults == 0 }
}

/// Decoder, current snapshot and diagnostics for one display.
pub struct FarmDisplay {
    decoder: SerialLineDecoder,
    current: Option<ReceivedSnapshot>,
    log: DiagnosticLog,
}

impl FarmDisplay {
    pub const fn new() -> Self {
        Self {
            decoder: SerialLineDecoder::new(),
            current: None,
            log: DiagnosticLog::new(),
        }
    }

    /// Feed received bytes and decode every line they complete.
    ///
    /// Each accepted line replaces the snapshot on screen; a rejected line
    /// leaves it untouched. Both outcomes and any decoder faults are recorded
    /// in the diagnostics log.
    pub fn pump(
        &mut self,
        bytes: &[u8],
        now_ms: u64,
    ) -> PumpReport {
        let mut report = PumpReport::default();
        self.decoder.feed(bytes);

        while let Some(fault) = self.decoder.pop_fault() {
            report.faults = report.faults.saturating_add(1);
            self.log.push_fmt(Severity::Warn, now_ms, format_args!("{fault}"));
        }

        while let Some(line) = self.decoder.next_line() {
            match StatusSnapshot::parse(&line) {
                Ok(snapshot) => {
                    report.accepted = report.accepted.saturating_add(1);
                    self.log.push_fmt(
                        Severity::Info,
                        now_ms,
                        format_args!("snapshot: {} machines", snapshot.machines.len()),
                    );
                    self.current = Some(ReceivedSnapshot {
                        snapshot,
                        received_at_ms: now_ms,
                    });
                }
                Err(err) => {
                    report.rejected = report.rejected.saturating_add(1);
                    self.log.push_fmt(Severity::Warn, now_ms, format_args!("{err}"));
                }
            }
        }

        report
    }

    /// Draw the current snapshot, or the waiting screen before the first one.
    pub fn render<D>(
        &self,
        display: &mut D,
        theme: &Theme,
        now_ms: u64,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        match &self.current {
            Some(received) => draw_farm_status(display, theme, &received.snapshot, received.age_ms(now_ms)),
            None => draw_waiting(display, theme, self.decoder.pending_len(), &self.log),
        }
    }

    #[inline]
    pub fn snapshot(&self) -> Option<&ReceivedSnapshot> { self.current.as_ref() }

    /// Bytes of the line currently being received.
    #[inline]
    pub fn pending_len(&self) -> usize { self.decoder.pending_len() }

    #[inline]
    pub fn log(&self) -> &DiagnosticLog { &self.log }
}

impl Default for FarmDisplay {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use embedded_graphics::primitives::{Circle, Rectangle};

    use super::*;
    use crate::{line_decoder::LineDecoder, test_canvas::TestCanvas};

    const IDLE_LINE: &str = r#"{"machines":[{"machine":"N1","is_online":true}],"recent":{"build":"Deploy: x","changelist":1,"age":0,"result":"SUCCESS"}}"#;

    const BUILDING_LINE: &str = r#"{"machines":[{"machine":"N1","is_online":true,"build":"Health: Rel PS5","changelist":24302,"step":"Deploy-Playstation","duration":5580}],"recent":{"build":"Deploy: x","changelist":1,"age":0,"result":"SUCCESS"}}"#;

    fn with_newline(line: &str) -> std::string::String { std::format!("{line}\n") }

    #[test]
    fn test_byte_by_byte_yields_one_line() {
        let input = with_newline(IDLE_LINE);
        let mut decoder = LineDecoder::<2048, 4>::new();
        for byte in input.as_bytes() {
            decoder.feed(core::slice::from_ref(byte));
        }
        assert!(decoder.has_next());
        assert_eq!(decoder.pop_next().as_str(), IDLE_LINE.trim());
        assert!(!decoder.has_next());
    }

    #[test]
    fn test_end_to_end_idle_machine() {
        let theme = Theme::DEFAULT;
        let mut farm = FarmDisplay::new();

        let input = with_newline(IDLE_LINE);
        let mut accepted = 0;
        for (i, byte) in input.as_bytes().iter().enumerate() {
            accepted += farm.pump(core::slice::from_ref(byte), i as u64).accepted;
        }
        assert_eq!(accepted, 1);

        let received = farm.snapshot().unwrap();
        assert_eq!(received.snapshot.machines.len(), 1);
        assert_eq!(received.received_at_ms, input.len() as u64 - 1);

        let mut canvas = TestCanvas::new();
        farm.render(&mut canvas, &theme, received.received_at_ms);

        // Name in the online color, no build text beside it
        let row = theme.top_margin as i32 + 1;
        let row_height = theme.row_height() - 1;
        let name_area = Rectangle::new(Point::new(theme.name_x as i32, row), Size::new(theme.info_x - theme.name_x, row_height));
        assert!(canvas.any_in(&name_area, theme.palette.online));

        let info_area = Rectangle::new(Point::new(theme.info_x as i32, row), Size::new(theme.duration_x - theme.info_x, row_height));
        assert!(canvas.only_in(&info_area, &[theme.palette.background, theme.palette.separator]));

        // Success-colored circle in the recent build band
        let band_top = theme.top_margin + theme.row_height();
        let diameter = 240 - band_top - 2 * theme.band_padding;
        let circle = Circle::new(Point::new(theme.name_x as i32, (band_top + theme.band_padding) as i32), diameter);
        assert_eq!(canvas.pixel(circle.center()), Some(theme.palette.success));
    }

    #[test]
    fn test_waiting_screen_until_first_snapshot() {
        let theme = Theme::DEFAULT;
        let mut farm = FarmDisplay::new();
        farm.pump(b"{\"machines\":", 0);
        assert!(farm.snapshot().is_none());
        assert_eq!(farm.pending_len(), 12);

        let mut waiting = TestCanvas::new();
        farm.render(&mut waiting, &theme, 0);

        farm.pump(IDLE_LINE[12..].as_bytes(), 10);
        farm.pump(b"\n", 20);
        assert!(farm.snapshot().is_some());

        let mut status = TestCanvas::new();
        farm.render(&mut status, &theme, 20);
        assert!(waiting != status);
    }

    #[test]
    fn test_rejected_line_keeps_previous_snapshot() {
        let mut farm = FarmDisplay::new();
        let report = farm.pump(with_newline(BUILDING_LINE).as_bytes(), 100);
        assert_eq!(report.accepted, 1);
        let before = farm.snapshot().cloned();

        // Machine without is_online
        let bad = r#"{"machines":[{"machine":"N1"}],"recent":{"build":"b","changelist":1,"age":0,"result":"SUCCESS"}}"#;
        let report = farm.pump(with_newline(bad).as_bytes(), 200);
        assert_eq!(report.rejected, 1);
        assert_eq!(report.accepted, 0);
        assert_eq!(farm.snapshot().cloned(), before);

        let last = farm.log().iter().last().unwrap();
        assert_eq!(last.severity, Severity::Warn);
        assert!(last.message.starts_with("bad snapshot"));
    }

    #[test]
    fn test_newer_snapshot_replaces_older() {
        let mut farm = FarmDisplay::new();
        let both = std::format!("{BUILDING_LINE}\n{IDLE_LINE}\n");
        let report = farm.pump(both.as_bytes(), 500);
        assert_eq!(report.accepted, 2);

        let received = farm.snapshot().unwrap();
        assert!(!received.snapshot.machines[0].is_building());
        assert_eq!(received.received_at_ms, 500);
    }

    #[test]
    fn test_decoder_faults_are_reported() {
        let mut farm = FarmDisplay::new();
        let report = farm.pump(&[0xFF, 0xFE, b'\n'], 0);
        assert_eq!(report.faults, 1);
        assert!(farm.snapshot().is_none());
        assert_eq!(farm.log().iter().last().unwrap().severity, Severity::Warn);
    }

    #[test]
    fn test_quiet_pump() {
        let mut farm = FarmDisplay::new();
        assert!(farm.pump(b"", 0).is_quiet());
        assert!(farm.pump(b"partial", 0).is_quiet());
    }

    #[test]
    fn test_age_never_negative() {
        let received = ReceivedSnapshot {
            snapshot: crate::snapshot::StatusSnapshot::parse(IDLE_LINE).unwrap(),
            received_at_ms: 1_000,
        };
        assert_eq!(received.age_ms(500), 0);
        assert_eq!(received.age_ms(4_000), 3_000);
    }
}
