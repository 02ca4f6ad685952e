//! Chart rasterization for attendance reports.
//!
//! Both charts are drawn pixel by pixel onto an [`image::RgbImage`].  Geometry is computed first
//! ([`BarChartLayout`], [`DoughnutLayout`]) so that the numbers shown in a chart can be inspected
//! without decoding the image; the layout is then painted and labelled with the report font.

pub mod bar;
pub mod canvas;
pub mod doughnut;

use image::{Rgb, RgbImage};

use crate::error::ChartRenderingError;
use crate::fonts::ReportFont;
use crate::model::StatusCountMap;
use crate::status::StatusLabelMap;

pub use bar::{Bar, BarChartLayout, Gridline, BAR_CHART_TITLE};
pub use doughnut::{DoughnutLayout, Slice, DOUGHNUT_CHART_TITLE};

pub(crate) const TEXT_COLOR: Rgb<u8> = Rgb([33, 33, 33]);
pub(crate) const GRID_COLOR: Rgb<u8> = Rgb([221, 221, 221]);
pub(crate) const AXIS_COLOR: Rgb<u8> = Rgb([128, 128, 128]);

/// Largest day count a single status may have in one month.
pub const MAX_DAYS_PER_MONTH: u64 = 31;

pub(crate) fn check_day_counts(counts: &StatusCountMap) -> Result<(), ChartRenderingError> {
    match counts.iter().find(|(_, count)| *count > MAX_DAYS_PER_MONTH) {
        Some((code, count)) => Err(ChartRenderingError::CountOutOfRange {
            code,
            count,
            max: MAX_DAYS_PER_MONTH,
        }),
        None => Ok(()),
    }
}

/// Space between the canvas border and the plot area, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Padding {
    /// Left padding, holds the gridline labels.
    pub left: u32,
    /// Right padding.
    pub right: u32,
    /// Top padding, holds the title.
    pub top: u32,
    /// Bottom padding, holds the bar labels.
    pub bottom: u32,
}

/// Canvas sizes and drawing parameters for both charts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartOptions {
    /// Bar chart canvas `(width, height)`.
    pub bar_size: (u32, u32),
    /// Bar chart plot padding.
    pub bar_padding: Padding,
    /// Gap before, between and after bars.
    pub bar_spacing: u32,
    /// Doughnut chart canvas `(width, height)`.
    pub doughnut_size: (u32, u32),
    /// Space reserved above the ring for the title.
    pub doughnut_top: u32,
    /// Space left of the ring.
    pub doughnut_left: u32,
    /// Outer ring radius.
    pub outer_radius: u32,
    /// Radius of the hollow centre.
    pub inner_radius: u32,
    /// Gap between ring and legend.
    pub legend_gap: u32,
    /// Legend row pitch.
    pub legend_row_height: u32,
    /// Canvas and hole colour.
    pub background: Rgb<u8>,
    /// Distance of the title from the top edge.
    pub title_top: u32,
    /// Title font size in pixels.
    pub title_size: f32,
    /// Axis, bar and legend label size in pixels.
    pub label_size: f32,
    /// Size of the total shown inside the ring.
    pub center_size: f32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            bar_size: (720, 270),
            bar_padding: Padding {
                left: 60,
                right: 20,
                top: 50,
                bottom: 40,
            },
            bar_spacing: 20,
            doughnut_size: (720, 360),
            doughnut_top: 50,
            doughnut_left: 60,
            outer_radius: 130,
            inner_radius: 75,
            legend_gap: 60,
            legend_row_height: 28,
            background: Rgb([255, 255, 255]),
            title_top: 12,
            title_size: 20.0,
            label_size: 14.0,
            center_size: 24.0,
        }
    }
}

/// A rasterized chart together with the layout it was drawn from.
///
/// Charts are produced per request and never cached.
#[derive(Clone, Debug)]
pub struct RenderedChart<L> {
    image: RgbImage,
    layout: L,
}

impl<L> RenderedChart<L> {
    /// The chart pixels.
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// The geometry the chart was drawn from.
    pub fn layout(&self) -> &L {
        &self.layout
    }

    /// Pixel dimensions `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Splits the chart into image and layout.
    pub fn into_parts(self) -> (RgbImage, L) {
        (self.image, self.layout)
    }
}

/// Draws the bar and doughnut charts of a report.
#[derive(Clone)]
pub struct ChartRenderer {
    font: rusttype::Font<'static>,
    labels: StatusLabelMap,
    options: ChartOptions,
}

impl ChartRenderer {
    /// Creates a renderer drawing text with `font` and resolving codes through `labels`.
    pub fn new(font: &ReportFont, labels: StatusLabelMap) -> Self {
        Self {
            font: font.raster().clone(),
            labels,
            options: ChartOptions::default(),
        }
    }

    /// Replaces the drawing options and returns the updated renderer.
    pub fn with_options(mut self, options: ChartOptions) -> Self {
        self.options = options;
        self
    }

    /// The drawing options in use.
    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    /// Renders one bar per status code in natural map order.
    pub fn render_bar_chart(
        &self,
        counts: &StatusCountMap,
    ) -> Result<RenderedChart<BarChartLayout>, ChartRenderingError> {
        let layout = BarChartLayout::compute(counts, &self.labels, &self.options)?;
        let mut canvas = bar::paint(&layout, &self.options);
        bar::annotate(&mut canvas, &layout, &self.font, &self.options);
        Ok(RenderedChart {
            image: canvas.into_image(),
            layout,
        })
    }

    /// Renders the status ratios as a ring in canonical code order.
    pub fn render_doughnut_chart(
        &self,
        counts: &StatusCountMap,
    ) -> Result<RenderedChart<DoughnutLayout>, ChartRenderingError> {
        let layout = DoughnutLayout::compute(counts, &self.labels, &self.options)?;
        let mut canvas = doughnut::paint(&layout, &self.options);
        doughnut::annotate(&mut canvas, &layout, &self.font, &self.options);
        Ok(RenderedChart {
            image: canvas.into_image(),
            layout,
        })
    }
}
