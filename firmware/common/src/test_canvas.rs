//! In-memory 320x240 draw target for pixel assertions in tests.

use core::convert::Infallible;

use embedded_graphics::{pixelcolor::Rgb565, prelude::*, primitives::Rectangle};

use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};

#[derive(Clone, PartialEq, Eq)]
pub struct TestCanvas {
    pixels: std::vec::Vec<Rgb565>,
}

impl TestCanvas {
    pub fn new() -> Self {
        Self {
            pixels: std::vec![Rgb565::BLACK; (SCREEN_WIDTH * SCREEN_HEIGHT) as usize],
        }
    }

    fn index(point: Point) -> Option<usize> {
        let in_bounds =
            point.x >= 0 && point.y >= 0 && (point.x as u32) < SCREEN_WIDTH && (point.y as u32) < SCREEN_HEIGHT;
        in_bounds.then(|| point.y as usize * SCREEN_WIDTH as usize + point.x as usize)
    }

    pub fn pixel(
        &self,
        point: Point,
    ) -> Option<Rgb565> {
        Self::index(point).map(|i| self.pixels[i])
    }

    fn colors_in<'a>(
        &'a self,
        area: &Rectangle,
    ) -> impl Iterator<Item = Rgb565> + 'a {
        area.points().filter_map(|p| self.pixel(p))
    }

    /// Whether any pixel inside `area` has `color`.
    pub fn any_in(
        &self,
        area: &Rectangle,
        color: Rgb565,
    ) -> bool {
        self.colors_in(area).any(|c| c == color)
    }

    /// Whether every pixel inside `area` is one of `allowed`.
    pub fn only_in(
        &self,
        area: &Rectangle,
        allowed: &[Rgb565],
    ) -> bool {
        self.colors_in(area).all(|c| allowed.contains(&c))
    }

    /// Pixels of `color` outside `area`.
    pub fn count_outside(
        &self,
        area: &Rectangle,
        color: Rgb565,
    ) -> usize {
        self.bounding_box()
            .points()
            .filter(|p| !area.contains(*p))
            .filter(|p| self.pixel(*p) == Some(color))
            .count()
    }

    /// Whether both canvases agree on every pixel inside `area`.
    pub fn same_in(
        &self,
        other: &Self,
        area: &Rectangle,
    ) -> bool {
        self.colors_in(area).eq(other.colors_in(area))
    }
}

impl OriginDimensions for TestCanvas {
    fn size(&self) -> Size { Size::new(SCREEN_WIDTH, SCREEN_HEIGHT) }
}

impl DrawTarget for TestCanvas {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some(i) = Self::index(point) {
                self.pixels[i] = color;
            }
        }
        Ok(())
    }
}
