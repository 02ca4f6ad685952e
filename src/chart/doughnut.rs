//! Doughnut chart: status ratios in canonical code order with a side legend.
//!
//! Only codes of [`CANONICAL_ORDER`] are drawn.  Codes outside it still appear in the table and
//! the bar chart but have no slice here.

use image::Rgb;
use rusttype::Font;

use super::canvas::{Anchor, Canvas};
use super::{check_day_counts, ChartOptions, TEXT_COLOR};
use crate::error::ChartRenderingError;
use crate::model::StatusCountMap;
use crate::status::{StatusCode, StatusLabelMap, CANONICAL_ORDER};

/// Title drawn above the ring.
pub const DOUGHNUT_CHART_TITLE: &str = "근태 유형 비율";

const LEGEND_SWATCH: u32 = 16;

/// One slice of the ring and its legend row.
#[derive(Clone, Debug, PartialEq)]
pub struct Slice {
    /// Status code.
    pub code: StatusCode,
    /// Legend label.
    pub label: &'static str,
    /// Day count.
    pub count: u64,
    /// Start angle in degrees, clockwise from 12 o'clock.
    pub start_angle: u32,
    /// Arc length in whole degrees.
    pub sweep: u32,
    /// Share of the total, rounded to one decimal.
    pub percent: f64,
    /// Fill colour.
    pub color: Rgb<u8>,
}

impl Slice {
    /// Legend text, e.g. `연차 (100.0%)`.
    pub fn legend_text(&self) -> String {
        format!("{} ({:.1}%)", self.label, self.percent)
    }
}

/// Everything needed to draw the doughnut chart.
#[derive(Clone, Debug, PartialEq)]
pub struct DoughnutLayout {
    /// Canvas width.
    pub width: u32,
    /// Canvas height.
    pub height: u32,
    /// Ring centre.
    pub center: (i32, i32),
    /// Outer ring radius.
    pub outer_radius: u32,
    /// Radius of the punched-out centre.
    pub inner_radius: u32,
    /// Sum of the charted counts.
    pub total: u64,
    /// Slices in canonical order.
    pub slices: Vec<Slice>,
    /// Top-left corner of the first legend row.
    pub legend_origin: (i32, i32),
    /// Vertical distance between legend rows.
    pub legend_row_height: u32,
}

impl DoughnutLayout {
    /// Lays out `counts` in canonical order.
    ///
    /// Every slice sweeps `round(count / total * 360)` degrees starting where the previous one
    /// ended, so the ring may over- or undershoot a full turn by a few degrees.
    pub fn compute(
        counts: &StatusCountMap,
        labels: &StatusLabelMap,
        options: &ChartOptions,
    ) -> Result<Self, ChartRenderingError> {
        check_day_counts(counts)?;
        let present: Vec<(StatusCode, u64)> = CANONICAL_ORDER
            .iter()
            .filter_map(|code| counts.get(*code).map(|count| (*code, count)))
            .collect();

        let total: u64 = present.iter().map(|(_, count)| *count).sum();
        if total == 0 {
            return Err(ChartRenderingError::ZeroTotal);
        }

        let mut cursor = 0u32;
        let slices = present
            .into_iter()
            .map(|(code, count)| {
                let ratio = count as f64 / total as f64;
                let sweep = (ratio * 360.0).round() as u32;
                let slice = Slice {
                    code,
                    label: labels.label_for(code),
                    count,
                    start_angle: cursor,
                    sweep,
                    percent: (ratio * 1000.0).round() / 10.0,
                    color: labels.color_for(code),
                };
                cursor += sweep;
                slice
            })
            .collect::<Vec<_>>();

        let (width, height) = options.doughnut_size;
        let top = options.doughnut_top as i32;
        let center = (
            (options.outer_radius + options.doughnut_left) as i32,
            top + (height as i32 - top) / 2,
        );
        let legend_height = slices.len() as u32 * options.legend_row_height;
        let legend_origin = (
            center.0 + options.outer_radius as i32 + options.legend_gap as i32,
            center.1 - legend_height as i32 / 2,
        );

        Ok(Self {
            width,
            height,
            center,
            outer_radius: options.outer_radius,
            inner_radius: options.inner_radius,
            total,
            slices,
            legend_origin,
            legend_row_height: options.legend_row_height,
        })
    }

    /// Sum of all slice sweeps in degrees.
    pub fn total_sweep(&self) -> u32 {
        self.slices.iter().map(|slice| slice.sweep).sum()
    }

    /// Sum of all legend percentages.
    pub fn percent_sum(&self) -> f64 {
        self.slices.iter().map(|slice| slice.percent).sum()
    }

    /// Legend lines in drawing order.
    pub fn legend(&self) -> Vec<String> {
        self.slices.iter().map(Slice::legend_text).collect()
    }
}

pub(crate) fn paint(layout: &DoughnutLayout, options: &ChartOptions) -> Canvas {
    let mut canvas = Canvas::new(layout.width, layout.height, options.background);
    let (cx, cy) = layout.center;

    for slice in &layout.slices {
        canvas.fill_sector(
            cx,
            cy,
            layout.outer_radius,
            slice.start_angle as f64,
            slice.sweep as f64,
            slice.color,
        );
    }
    canvas.fill_circle(cx, cy, layout.inner_radius, options.background);

    let (lx, ly) = layout.legend_origin;
    for (row, slice) in layout.slices.iter().enumerate() {
        let y = ly + (row as u32 * layout.legend_row_height) as i32;
        canvas.fill_rect(lx, y, LEGEND_SWATCH, LEGEND_SWATCH, slice.color);
    }

    canvas
}

pub(crate) fn annotate(
    canvas: &mut Canvas,
    layout: &DoughnutLayout,
    font: &Font<'_>,
    options: &ChartOptions,
) {
    let (cx, cy) = layout.center;
    canvas.draw_text(
        font,
        options.title_size,
        DOUGHNUT_CHART_TITLE,
        (layout.width / 2) as i32,
        options.title_top as i32,
        Anchor::TopCenter,
        TEXT_COLOR,
    );
    canvas.draw_text(
        font,
        options.center_size,
        &format!("{}일", layout.total),
        cx,
        cy,
        Anchor::Center,
        TEXT_COLOR,
    );

    let (lx, ly) = layout.legend_origin;
    for (row, slice) in layout.slices.iter().enumerate() {
        let y = ly + (row as u32 * layout.legend_row_height) as i32;
        canvas.draw_text(
            font,
            options.label_size,
            &slice.legend_text(),
            lx + LEGEND_SWATCH as i32 + 8,
            y + LEGEND_SWATCH as i32 / 2,
            Anchor::MiddleLeft,
            TEXT_COLOR,
        );
    }
}
