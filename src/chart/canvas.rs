//! Minimal raster canvas over an [`RgbImage`].
//!
//! Only the primitives the report charts need are provided: clipped rectangles, horizontal lines,
//! pie sectors, discs and anti-aliased text.

use image::{Rgb, RgbImage};
use rusttype::{point, Font, Scale};

/// Reference point a text box is positioned by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    /// `(x, y)` is the middle of the top edge.
    TopCenter,
    /// `(x, y)` is the centre of the box.
    Center,
    /// `(x, y)` is the middle of the left edge.
    MiddleLeft,
    /// `(x, y)` is the middle of the right edge.
    MiddleRight,
}

impl Anchor {
    fn top_left(self, x: f32, y: f32, width: f32, height: f32) -> (f32, f32) {
        match self {
            Self::TopCenter => (x - width / 2.0, y),
            Self::Center => (x - width / 2.0, y - height / 2.0),
            Self::MiddleLeft => (x, y - height / 2.0),
            Self::MiddleRight => (x - width, y - height / 2.0),
        }
    }
}

/// Angle of `(dx, dy)` in degrees, measured clockwise from 12 o'clock, in `[0, 360)`.
pub fn clockwise_angle(dx: f64, dy: f64) -> f64 {
    let degrees = dx.atan2(-dy).to_degrees();
    if degrees < 0.0 {
        degrees + 360.0
    } else {
        degrees
    }
}

fn sector_contains(angle: f64, start: f64, sweep: f64) -> bool {
    if sweep >= 360.0 {
        return true;
    }
    let end = start + sweep;
    (angle >= start && angle < end) || (angle + 360.0 >= start && angle + 360.0 < end)
}

/// Width in pixels of `text` laid out at `size`.
pub fn text_width(font: &Font<'_>, size: f32, text: &str) -> f32 {
    font.layout(text, Scale::uniform(size), point(0.0, 0.0))
        .last()
        .map(|glyph| glyph.position().x + glyph.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

/// Pixel buffer the charts are drawn onto.
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    /// Creates a canvas filled with `background`.
    pub fn new(width: u32, height: u32, background: Rgb<u8>) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, background),
        }
    }

    /// Colour at `(x, y)`, `None` outside the canvas.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb<u8>> {
        if self.contains(x, y) {
            Some(*self.image.get_pixel(x as u32, y as u32))
        } else {
            None
        }
    }

    fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.image.width() && (y as u32) < self.image.height()
    }

    fn put(&mut self, x: i32, y: i32, color: Rgb<u8>) {
        if self.contains(x, y) {
            self.image.put_pixel(x as u32, y as u32, color);
        }
    }

    fn blend(&mut self, x: i32, y: i32, color: Rgb<u8>, coverage: f32) {
        if !self.contains(x, y) || coverage <= 0.0 {
            return;
        }
        let coverage = coverage.min(1.0);
        let pixel = self.image.get_pixel_mut(x as u32, y as u32);
        for channel in 0..3 {
            let under = pixel[channel] as f32;
            let over = color[channel] as f32;
            pixel[channel] = (over * coverage + under * (1.0 - coverage)).round() as u8;
        }
    }

    /// Fills the `width`×`height` rectangle whose top-left corner is `(x, y)`.
    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Rgb<u8>) {
        for py in y..y + height as i32 {
            for px in x..x + width as i32 {
                self.put(px, py, color);
            }
        }
    }

    /// Draws a one pixel horizontal line from `x0` to `x1` inclusive.
    pub fn hline(&mut self, x0: i32, x1: i32, y: i32, color: Rgb<u8>) {
        for x in x0.min(x1)..=x0.max(x1) {
            self.put(x, y, color);
        }
    }

    /// Fills a pie sector of `radius` around `(cx, cy)`.
    ///
    /// Angles are in degrees, clockwise from 12 o'clock.
    pub fn fill_sector(
        &mut self,
        cx: i32,
        cy: i32,
        radius: u32,
        start: f64,
        sweep: f64,
        color: Rgb<u8>,
    ) {
        if sweep <= 0.0 {
            return;
        }
        let r = radius as i32;
        let limit = (radius as f64) * (radius as f64);
        for y in cy - r..=cy + r {
            for x in cx - r..=cx + r {
                let dx = x as f64 + 0.5 - cx as f64;
                let dy = y as f64 + 0.5 - cy as f64;
                if dx * dx + dy * dy > limit {
                    continue;
                }
                if sector_contains(clockwise_angle(dx, dy), start, sweep) {
                    self.put(x, y, color);
                }
            }
        }
    }

    /// Fills a disc of `radius` around `(cx, cy)`.
    pub fn fill_circle(&mut self, cx: i32, cy: i32, radius: u32, color: Rgb<u8>) {
        self.fill_sector(cx, cy, radius, 0.0, 360.0, color);
    }

    /// Draws `text` at `size` pixels, positioned by `anchor` relative to `(x, y)`.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_text(
        &mut self,
        font: &Font<'_>,
        size: f32,
        text: &str,
        x: i32,
        y: i32,
        anchor: Anchor,
        color: Rgb<u8>,
    ) {
        let scale = Scale::uniform(size);
        let metrics = font.v_metrics(scale);
        let width = text_width(font, size, text);
        let height = metrics.ascent - metrics.descent;
        let (left, top) = anchor.top_left(x as f32, y as f32, width, height);

        for glyph in font.layout(text, scale, point(left, top + metrics.ascent)) {
            if let Some(bounds) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, coverage| {
                    self.blend(
                        bounds.min.x + gx as i32,
                        bounds.min.y + gy as i32,
                        color,
                        coverage,
                    );
                });
            }
        }
    }

    /// Consumes the canvas and returns the image.
    pub fn into_image(self) -> RgbImage {
        self.image
    }
}
