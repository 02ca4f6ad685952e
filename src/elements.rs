//! `genpdf` elements used by the report layout.
//!
//! Charts are raster images; [`ChartImage`] embeds one and scales it so that it fits a fixed box
//! on the page while keeping its aspect ratio.

use image::{DynamicImage, GenericImageView, RgbImage};

use genpdf::elements::Image;
use genpdf::error::Error;
use genpdf::style::Style;
use genpdf::{render, Alignment, Element, Mm, RenderResult, Scale, Size};

const DEFAULT_IMAGE_DPI: f64 = 300.0;
const MM_PER_INCH: f64 = 25.4;

pub(crate) fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

pub(crate) fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

fn estimated_image_size(image: &DynamicImage, dpi: f64) -> Size {
    let (px_width, px_height) = image.dimensions();
    let width_mm = MM_PER_INCH * (px_width as f64) / dpi;
    let height_mm = MM_PER_INCH * (px_height as f64) / dpi;
    Size::new(mm_from_f64(width_mm), mm_from_f64(height_mm))
}

/// Uniform scale factor that makes `natural` fit into `bounds`.
pub fn fit_scale(natural: Size, bounds: Size) -> f64 {
    let natural_width = mm_to_f64(natural.width);
    let natural_height = mm_to_f64(natural.height);
    if natural_width <= f64::EPSILON || natural_height <= f64::EPSILON {
        return 1.0;
    }
    let by_width = mm_to_f64(bounds.width) / natural_width;
    let by_height = mm_to_f64(bounds.height) / natural_height;
    by_width.min(by_height)
}

/// A chart image scaled to fit a fixed box.
pub struct ChartImage {
    image: Image,
    natural_size: Size,
    bounds: Size,
}

impl ChartImage {
    /// Wraps a rendered chart, fitting it into `bounds`.
    pub fn new(chart: RgbImage, bounds: Size) -> Result<Self, Error> {
        let dynamic = DynamicImage::ImageRgb8(chart);
        let natural_size = estimated_image_size(&dynamic, DEFAULT_IMAGE_DPI);
        let image = Image::from_dynamic_image(dynamic)?;
        let mut element = Self {
            image,
            natural_size,
            bounds,
        };
        element.apply_layout();
        Ok(element)
    }

    /// Size the image occupies on the page.
    pub fn rendered_size(&self) -> Size {
        let scale = fit_scale(self.natural_size, self.bounds);
        Size::new(
            mm_from_f64(mm_to_f64(self.natural_size.width) * scale),
            mm_from_f64(mm_to_f64(self.natural_size.height) * scale),
        )
    }

    fn apply_layout(&mut self) {
        let scale = fit_scale(self.natural_size, self.bounds);
        self.image.set_scale(Scale::new(scale, scale));
        self.image.set_alignment(Alignment::Center);
    }
}

impl Element for ChartImage {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        self.apply_layout();
        self.image.render(context, area, style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn size(width: f64, height: f64) -> Size {
        Size::new(mm_from_f64(width), mm_from_f64(height))
    }

    #[test]
    fn scale_is_limited_by_the_tighter_side() {
        assert!((fit_scale(size(60.0, 20.0), size(180.0, 90.0)) - 3.0).abs() < 1e-9);
        assert!((fit_scale(size(60.0, 30.0), size(180.0, 60.0)) - 2.0).abs() < 1e-9);
        assert!((fit_scale(size(0.0, 30.0), size(180.0, 60.0)) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn chart_keeps_aspect_ratio_inside_box() {
        let chart = RgbImage::from_pixel(720, 270, Rgb([255, 255, 255]));
        let element = ChartImage::new(chart, size(170.0, 80.0)).unwrap();
        let rendered = element.rendered_size();

        let width = mm_to_f64(rendered.width);
        let height = mm_to_f64(rendered.height);
        assert!(width <= 170.0 + 1e-6);
        assert!(height <= 80.0 + 1e-6);
        assert!((width / height - 720.0 / 270.0).abs() < 1e-6);
        assert!((width - 170.0).abs() < 1e-6 || (height - 80.0).abs() < 1e-6);
    }
}
