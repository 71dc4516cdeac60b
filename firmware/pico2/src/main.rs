//! Build Farm Display Firmware for Raspberry Pi Pico 2 (RP2350)
//!
//! Shows build farm status, received as JSON lines over USB serial, on the
//! Pimoroni PIM715 Display Pack 2.8".
//!
//! # Architecture
//!
//! - USB task: copies received packets into a pipe
//! - Main task: every 20 ms drains the pipe into [`FarmDisplay::pump`]; every
//!   100 ms renders into the free framebuffer and hands it to the flush task
//! - Flush task: waits for a buffer index, DMAs that buffer to the display
//!
//! Feed it from a host with e.g.:
//!
//! ```bash
//! cat status.jsonl > /dev/ttyACM0
//! ```

#![no_std]
#![no_main]
// Crate-level lints (match lib.rs for consistency)
#![allow(clippy::cast_possible_truncation)]

mod display;
mod st7789;
mod tasks;

use core::sync::atomic::Ordering;

use defmt::{debug, info, warn};
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::USB;
use embassy_rp::spi::Spi;
use embassy_rp::usb::{Driver, InterruptHandler};
use embassy_time::{Duration, Instant, Ticker};
use embassy_usb::class::cdc_acm::{CdcAcmClass, State};
use embedded_graphics::prelude::*;
use farm_display_common::{FarmDisplay, Theme};
use farm_display_pico2::RenderCadence;
use farm_display_pico2::config::{
    PUMP_INTERVAL_MS,
    RENDER_INTERVAL_MS,
    USB_MANUFACTURER,
    USB_MAX_PACKET_SIZE,
    USB_PID,
    USB_PRODUCT,
    USB_VID,
};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use crate::display::display_spi_config;
use crate::st7789::{DoubleBuffer, St7789Flusher};
use crate::tasks::{
    FLUSH_DONE,
    FLUSH_SIGNAL,
    LAST_FLUSH_TIME_US,
    RX_PIPE,
    display_flush_task,
    serial_rx_task,
    usb_device_task,
};

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => InterruptHandler<USB>;
});

// Program metadata for `picotool info`
#[unsafe(link_section = ".bi_entries")]
#[used]
pub static PICOTOOL_ENTRIES: [embassy_rp::binary_info::EntryAddr; 4] = [
    embassy_rp::binary_info::rp_program_name!(c"pico2-farm-display"),
    embassy_rp::binary_info::rp_program_description!(c"Build farm status display on PIM715"),
    embassy_rp::binary_info::rp_cargo_version!(),
    embassy_rp::binary_info::rp_program_build_attribute!(),
];

static THEME: Theme = Theme::DEFAULT;

/// Interval between status lines in the defmt log.
const STATUS_LOG_INTERVAL_MS: u64 = 10_000;

/// Bytes moved from the pipe into the decoder per read.
const PUMP_CHUNK: usize = 256;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Build farm display starting...");

    let p = embassy_rp::init(Default::default());

    // PIM715 pinout: CS=17, DC=16, CLK=18, MOSI=19, Backlight=20
    let cs = Output::new(p.PIN_17, Level::High);
    let dc = Output::new(p.PIN_16, Level::Low);
    let _backlight = Output::new(p.PIN_20, Level::High);

    // TX-only SPI with DMA, the display has no MISO
    let spi = Spi::new_txonly(p.SPI0, p.PIN_18, p.PIN_19, p.DMA_CH0, display_spi_config());

    let mut flusher = St7789Flusher::new(spi, dc, cs);
    flusher.init().await;
    info!("Display initialized");

    // SAFETY: Only one DoubleBuffer instance exists
    let mut double_buffer = unsafe { DoubleBuffer::new() };

    // Clear both framebuffers before the flush task takes over
    for _ in 0..2 {
        // SAFETY: the flush task is not running yet
        unsafe { double_buffer.renderer() }.clear(THEME.palette.background).ok();
        let idx = double_buffer.swap();
        flusher.flush_buffer(unsafe { st7789::frame(idx) }).await;
    }

    // Embassy tasks need 'static references
    static FLUSHER: StaticCell<St7789Flusher<'static>> = StaticCell::new();
    let flusher: &'static mut St7789Flusher<'static> = FLUSHER.init(flusher);
    spawner.spawn(display_flush_task(flusher)).unwrap();
    info!("Display flush task spawned");

    // USB CDC-ACM serial port
    let driver = Driver::new(p.USB, Irqs);
    let mut usb_config = embassy_usb::Config::new(USB_VID, USB_PID);
    usb_config.manufacturer = Some(USB_MANUFACTURER);
    usb_config.product = Some(USB_PRODUCT);
    usb_config.serial_number = Some("farm-display");
    usb_config.max_power = 100;
    usb_config.max_packet_size_0 = 64;

    static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
    static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
    static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();
    static CDC_STATE: StaticCell<State> = StaticCell::new();

    let mut builder = embassy_usb::Builder::new(
        driver,
        usb_config,
        CONFIG_DESCRIPTOR.init([0; 256]),
        BOS_DESCRIPTOR.init([0; 256]),
        &mut [], // no MS OS descriptors
        CONTROL_BUF.init([0; 64]),
    );
    let class = CdcAcmClass::new(&mut builder, CDC_STATE.init(State::new()), USB_MAX_PACKET_SIZE);
    let usb = builder.build();

    spawner.spawn(usb_device_task(usb)).unwrap();
    spawner.spawn(serial_rx_task(class)).unwrap();
    info!("USB serial tasks spawned");

    // Decoder and line queue are several KiB, keep them out of the task future
    static FARM: StaticCell<FarmDisplay> = StaticCell::new();
    let farm: &'static mut FarmDisplay = FARM.init_with(FarmDisplay::new);

    let boot = Instant::now();
    let mut ticker = Ticker::every(Duration::from_millis(PUMP_INTERVAL_MS));
    let mut cadence = RenderCadence::new(RENDER_INTERVAL_MS);
    let mut chunk = [0u8; PUMP_CHUNK];
    let mut flush_in_progress = false;
    let mut next_status_log_ms = STATUS_LOG_INTERVAL_MS;

    info!("Main loop starting");

    loop {
        let now_ms = boot.elapsed().as_millis();

        // Drain everything USB delivered since the last tick
        while let Ok(n) = RX_PIPE.try_read(&mut chunk) {
            let report = farm.pump(&chunk[..n], now_ms);
            if report.rejected > 0 || report.faults > 0 {
                warn!("Input problem: {}", report);
            } else if report.accepted > 0 {
                debug!("Snapshot accepted: {}", report);
            }
        }

        if cadence.due(now_ms) {
            // SAFETY: this buffer's previous flush completed before the last swap
            let mut renderer = unsafe { double_buffer.renderer() };
            farm.render(&mut renderer, &THEME, now_ms);

            if flush_in_progress {
                FLUSH_DONE.wait().await;
            }
            FLUSH_SIGNAL.signal(double_buffer.swap());
            flush_in_progress = true;
        }

        if now_ms >= next_status_log_ms {
            info!(
                "STATUS: snapshot={} pending={}B flush={}us",
                farm.snapshot().is_some(),
                farm.pending_len(),
                LAST_FLUSH_TIME_US.load(Ordering::Relaxed)
            );
            next_status_log_ms = now_ms + STATUS_LOG_INTERVAL_MS;
        }

        ticker.next().await;
    }
}
