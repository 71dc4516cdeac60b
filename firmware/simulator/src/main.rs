//! Build Farm Display Simulator for Windows/Desktop.
//!
//! Renders the same screens as the firmware in an `embedded-graphics-simulator`
//! window. Status lines come from stdin, or from a file given as the first
//! argument:
//!
//! ```bash
//! cargo run -p farm-display-simulator -- firmware/simulator/demo/status.jsonl
//! some-status-feed | cargo run -p farm-display-simulator
//! ```
//!
//! Set `RUST_LOG=debug` to see every accepted snapshot.

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]

mod input;
mod timing;

use std::sync::mpsc::TryRecvError;
use std::thread;
use std::time::Instant;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::sdl2::Keycode;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use env_logger::Env;
use farm_display_common::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use farm_display_common::{FarmDisplay, PumpReport, Severity, Theme};
use log::{debug, info, warn};

use crate::input::{Source, spawn_reader};
use crate::timing::{PUMP_INTERVAL, RENDER_INTERVAL};

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let source = std::env::args_os().nth(1).map_or(Source::Stdin, |path| Source::Replay(path.into()));
    let rx = spawn_reader(source);

    let theme = Theme::DEFAULT;
    let mut farm = FarmDisplay::new();

    let mut display: SimulatorDisplay<Rgb565> = SimulatorDisplay::new(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT));
    let output_settings = OutputSettingsBuilder::new().scale(2).build();
    let mut window = Window::new("Build Farm Display Sim", &output_settings);

    let start = Instant::now();
    let mut next_render = start;
    let mut input_open = true;

    info!("Simulator started");

    loop {
        let tick = Instant::now();
        let now_ms = start.elapsed().as_millis() as u64;

        // Pump: feed everything received since the last tick
        while input_open {
            match rx.try_recv() {
                Ok(chunk) => {
                    let report = farm.pump(&chunk, now_ms);
                    log_report(&farm, report);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    info!("Input ended, keeping the last snapshot on screen");
                    input_open = false;
                }
            }
        }

        if tick >= next_render {
            farm.render(&mut display, &theme, now_ms);
            window.update(&display);

            for ev in window.events() {
                match ev {
                    SimulatorEvent::Quit
                    | SimulatorEvent::KeyDown {
                        keycode: Keycode::Escape,
                        ..
                    } => return,
                    _ => {}
                }
            }

            next_render += RENDER_INTERVAL;
            // Restart the grid after a stall instead of rendering a burst
            if next_render < tick {
                next_render = tick + RENDER_INTERVAL;
            }
        }

        let elapsed = tick.elapsed();
        if elapsed < PUMP_INTERVAL {
            thread::sleep(PUMP_INTERVAL - elapsed);
        }
    }
}

/// Forward the diagnostics one pump produced to the terminal.
///
/// Every accepted line, rejected line and decoder fault adds exactly one log
/// entry, so the newest `accepted + rejected + faults` entries are this pump's.
fn log_report(
    farm: &FarmDisplay,
    report: PumpReport,
) {
    if report.is_quiet() {
        return;
    }
    let produced = usize::from(report.accepted) + usize::from(report.rejected) + usize::from(report.faults);
    for entry in farm.log().latest(produced) {
        match entry.severity {
            Severity::Info => debug!("{}", entry.message),
            Severity::Warn => warn!("{}", entry.message),
        }
    }
}
