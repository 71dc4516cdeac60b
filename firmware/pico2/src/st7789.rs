//! Async ST7789 display driver with double buffering for embassy-rp.
//!
//! Two static framebuffers (2 x 150 KiB for 320x240 RGB565) let the main loop
//! render the next frame while the flush task DMAs the previous one.
//!
//! - [`DoubleBuffer`]: tracks which framebuffer is being rendered
//! - [`St7789Flusher`]: owns the SPI peripheral and pushes a framebuffer to the panel
//!
//! Drawing itself is done by [`FramebufferRenderer`], which lives in the
//! library so it can be tested on the host.

use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{Async, Spi};
use embassy_time::Timer;
use farm_display_pico2::framebuffer::{BUFFER_SIZE, FramebufferRenderer, HEIGHT, WIDTH};

/// Static framebuffer A.
static mut FRAMEBUFFER_A: [u8; BUFFER_SIZE] = [0u8; BUFFER_SIZE];
/// Static framebuffer B.
static mut FRAMEBUFFER_B: [u8; BUFFER_SIZE] = [0u8; BUFFER_SIZE];

// ST7789 Commands
const SWRESET: u8 = 0x01;
const SLPOUT: u8 = 0x11;
const NORON: u8 = 0x13;
const INVON: u8 = 0x21;
const DISPON: u8 = 0x29;
const CASET: u8 = 0x2A;
const RASET: u8 = 0x2B;
const RAMWR: u8 = 0x2C;
const MADCTL: u8 = 0x36;
const COLMOD: u8 = 0x3A;

// MADCTL flags
const MADCTL_MX: u8 = 0x40; // Column address order
const MADCTL_MV: u8 = 0x20; // Row/column exchange

/// Which of the two framebuffers the main loop is rendering into.
pub struct DoubleBuffer {
    render_idx: usize,
}

impl DoubleBuffer {
    /// # Safety
    /// Must only be called once. The static framebuffers are owned by this instance.
    pub unsafe fn new() -> Self { Self { render_idx: 0 } }

    /// Renderer over the buffer currently owned by the main loop.
    ///
    /// # Safety
    /// The flush task must not be reading this buffer, i.e. the previous flush
    /// of this index has signalled completion.
    #[inline]
    pub unsafe fn renderer(&mut self) -> FramebufferRenderer<'static> {
        let buffer = if self.render_idx == 0 {
            unsafe { &mut *core::ptr::addr_of_mut!(FRAMEBUFFER_A) }
        } else {
            unsafe { &mut *core::ptr::addr_of_mut!(FRAMEBUFFER_B) }
        };
        FramebufferRenderer::new(buffer)
    }

    /// Switch buffers. Returns the index of the buffer that was just rendered.
    #[inline]
    pub fn swap(&mut self) -> usize {
        let completed_idx = self.render_idx;
        self.render_idx = 1 - self.render_idx;
        completed_idx
    }
}

/// Read-only view of a framebuffer for flushing.
///
/// # Safety
/// The main loop must be rendering into the other buffer.
#[inline]
pub unsafe fn frame(idx: usize) -> &'static [u8] {
    if idx == 0 {
        unsafe { &*core::ptr::addr_of!(FRAMEBUFFER_A) }
    } else {
        unsafe { &*core::ptr::addr_of!(FRAMEBUFFER_B) }
    }
}

/// Owns the SPI bus and control pins, sends framebuffers to the panel.
pub struct St7789Flusher<'d> {
    spi: Spi<'d, SPI0, Async>,
    dc: Output<'d>,
    cs: Output<'d>,
}

impl<'d> St7789Flusher<'d> {
    pub fn new(
        spi: Spi<'d, SPI0, Async>,
        dc: Output<'d>,
        cs: Output<'d>,
    ) -> Self {
        Self { spi, dc, cs }
    }

    /// Reset and configure the panel for landscape RGB565.
    pub async fn init(&mut self) {
        self.write_command(SWRESET).await;
        Timer::after_millis(150).await;

        self.write_command(SLPOUT).await;
        Timer::after_millis(10).await;

        // 16 bits per pixel
        self.write_command(COLMOD).await;
        self.write_data(&[0x55]).await;

        // Landscape: row/column exchange plus X mirror
        self.write_command(MADCTL).await;
        self.write_data(&[MADCTL_MV | MADCTL_MX]).await;

        // PIM715 panel needs inversion on
        self.write_command(INVON).await;
        Timer::after_millis(10).await;

        self.write_command(NORON).await;
        Timer::after_millis(10).await;

        self.write_command(DISPON).await;
        Timer::after_millis(10).await;

        // Every flush is full screen, so the window is set once
        self.set_window(0, 0, WIDTH as u16, HEIGHT as u16).await;
    }

    async fn write_command(
        &mut self,
        cmd: u8,
    ) {
        self.cs.set_low();
        self.dc.set_low();
        self.spi.write(&[cmd]).await.ok();
        self.cs.set_high();
    }

    async fn write_data(
        &mut self,
        data: &[u8],
    ) {
        self.cs.set_low();
        self.dc.set_high();
        self.spi.write(data).await.ok();
        self.cs.set_high();
    }

    async fn set_window(
        &mut self,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
    ) {
        let [x0h, x0l] = x.to_be_bytes();
        let [x1h, x1l] = (x + w - 1).to_be_bytes();
        let [y0h, y0l] = y.to_be_bytes();
        let [y1h, y1l] = (y + h - 1).to_be_bytes();

        self.write_command(CASET).await;
        self.write_data(&[x0h, x0l, x1h, x1l]).await;

        self.write_command(RASET).await;
        self.write_data(&[y0h, y0l, y1h, y1l]).await;
    }

    /// Send a full frame via DMA.
    pub async fn flush_buffer(
        &mut self,
        buffer: &[u8],
    ) {
        // RAMWR and the pixel data share one CS assertion
        self.cs.set_low();
        self.dc.set_low();
        self.spi.blocking_write(&[RAMWR]).ok();
        self.dc.set_high();
        self.spi.write(buffer).await.ok();
        self.cs.set_high();
    }
}
