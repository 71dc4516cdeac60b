//! RGB565 framebuffer renderer for the ST7789.
//!
//! Draws into a byte slice laid out exactly as the panel expects it on the
//! wire: row-major, 2 bytes per pixel, big-endian. The flush task can then DMA
//! the slice to the display without any conversion.
//!
//! The renderer owns no hardware, so it runs (and is tested) on the host.

use embedded_graphics::{
    pixelcolor::{Rgb565, raw::RawU16},
    prelude::*,
    primitives::Rectangle,
};

/// Display dimensions (landscape mode after 90° rotation).
pub const WIDTH: usize = 320;
pub const HEIGHT: usize = 240;

/// Bytes in one full frame.
pub const BUFFER_SIZE: usize = WIDTH * HEIGHT * 2;

#[inline]
fn wire_bytes(color: Rgb565) -> [u8; 2] { RawU16::from(color).into_inner().to_be_bytes() }

/// `DrawTarget` over one framebuffer. Create a new renderer each frame after
/// swapping buffers.
pub struct FramebufferRenderer<'a> {
    framebuffer: &'a mut [u8],
}

impl<'a> FramebufferRenderer<'a> {
    /// Wrap a framebuffer of at least [`BUFFER_SIZE`] bytes.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is too small for one frame.
    pub fn new(framebuffer: &'a mut [u8]) -> Self {
        assert!(framebuffer.len() >= BUFFER_SIZE, "framebuffer smaller than one frame");
        Self { framebuffer }
    }

    /// Fill the whole frame with one color.
    pub fn clear_buffer(
        &mut self,
        color: Rgb565,
    ) {
        let bytes = wire_bytes(color);
        for pixel in self.framebuffer[..BUFFER_SIZE].chunks_exact_mut(2) {
            pixel.copy_from_slice(&bytes);
        }
    }

    #[inline]
    fn set_pixel(
        &mut self,
        x: i32,
        y: i32,
        color: Rgb565,
    ) {
        if x >= 0 && x < WIDTH as i32 && y >= 0 && y < HEIGHT as i32 {
            let idx = (y as usize * WIDTH + x as usize) * 2;
            self.framebuffer[idx..idx + 2].copy_from_slice(&wire_bytes(color));
        }
    }

    /// Byte range of the pixels `x..x + width` on row `y`.
    #[inline]
    fn span(
        x: usize,
        y: usize,
        width: usize,
    ) -> core::ops::Range<usize> {
        let start = (y * WIDTH + x) * 2;
        start..start + width * 2
    }
}

impl OriginDimensions for FramebufferRenderer<'_> {
    fn size(&self) -> Size { Size::new(WIDTH as u32, HEIGHT as u32) }
}

impl DrawTarget for FramebufferRenderer<'_> {
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color);
        }
        Ok(())
    }

    fn fill_contiguous<I>(
        &mut self,
        area: &Rectangle,
        colors: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        // Colors are given for the whole area, including any part off screen
        let visible = area.intersection(&self.bounding_box());
        if visible.size == Size::zero() {
            return Ok(());
        }
        self.draw_iter(
            area.points()
                .zip(colors)
                .filter(|(point, _)| visible.contains(*point))
                .map(|(point, color)| Pixel(point, color)),
        )
    }

    fn fill_solid(
        &mut self,
        area: &Rectangle,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        let visible = area.intersection(&self.bounding_box());
        if visible.size == Size::zero() {
            return Ok(());
        }

        let bytes = wire_bytes(color);
        let x = visible.top_left.x as usize;
        let width = visible.size.width as usize;
        for y in visible.rows() {
            let row = Self::span(x, y as usize, width);
            for pixel in self.framebuffer[row].chunks_exact_mut(2) {
                pixel.copy_from_slice(&bytes);
            }
        }
        Ok(())
    }

    fn clear(
        &mut self,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        self.clear_buffer(color);
        Ok(())
    }
}
