//! Display flush task for parallel rendering and DMA transfers.
//!
//! Receives a buffer index from the main loop, DMAs that framebuffer to the
//! display and signals completion, while the main loop renders into the other
//! buffer.

use core::sync::atomic::{AtomicU32, Ordering};

use defmt::info;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::Instant;

use crate::st7789::{St7789Flusher, frame};

/// Index of the framebuffer to flush.
pub static FLUSH_SIGNAL: Signal<CriticalSectionRawMutex, usize> = Signal::new();

/// Set when the last requested flush has finished.
pub static FLUSH_DONE: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Duration of the last flush in microseconds.
pub static LAST_FLUSH_TIME_US: AtomicU32 = AtomicU32::new(0);

#[embassy_executor::task]
pub async fn display_flush_task(flusher: &'static mut St7789Flusher<'static>) {
    info!("Display flush task started");

    loop {
        let buffer_idx = FLUSH_SIGNAL.wait().await;
        let flush_start = Instant::now();

        // SAFETY: the main loop renders into the other buffer until FLUSH_DONE
        let buffer = unsafe { frame(buffer_idx) };
        flusher.flush_buffer(buffer).await;

        LAST_FLUSH_TIME_US.store(flush_start.elapsed().as_micros() as u32, Ordering::Relaxed);
        FLUSH_DONE.signal(());
    }
}
