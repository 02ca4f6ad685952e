//! Bar chart: one bar per status code, in the aggregate's natural order.

use image::Rgb;
use rusttype::Font;

use super::canvas::{Anchor, Canvas};
use super::{check_day_counts, ChartOptions, AXIS_COLOR, GRID_COLOR, TEXT_COLOR};
use crate::error::ChartRenderingError;
use crate::model::StatusCountMap;
use crate::status::{StatusCode, StatusLabelMap};

/// Title drawn above the bars.
pub const BAR_CHART_TITLE: &str = "근태 상태별 일수";

/// A labelled horizontal gridline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gridline {
    /// Day count the line stands for.
    pub value: u64,
    /// Vertical pixel position.
    pub y: u32,
    /// Axis label, e.g. `3일`.
    pub label: String,
}

/// Geometry of a single bar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bar {
    /// Status code.
    pub code: StatusCode,
    /// Label drawn under the bar.
    pub label: &'static str,
    /// Day count.
    pub count: u64,
    /// Left edge.
    pub x: u32,
    /// Bar width; shared by all bars of a chart.
    pub width: u32,
    /// Bar height above the baseline.
    pub height: u32,
    /// Fill colour.
    pub color: Rgb<u8>,
}

/// Everything needed to draw the bar chart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BarChartLayout {
    /// Canvas width.
    pub width: u32,
    /// Canvas height.
    pub height: u32,
    /// Left edge of the plot area.
    pub plot_left: u32,
    /// Right edge of the plot area.
    pub plot_right: u32,
    /// Y coordinate bars grow up from.
    pub baseline: u32,
    /// Height of the tallest bar.
    pub max_bar_height: u32,
    /// Largest single count.
    pub max_count: u64,
    /// Gridlines from 0 to `max_count`.
    pub gridlines: Vec<Gridline>,
    /// Bars in natural map order.
    pub bars: Vec<Bar>,
}

impl BarChartLayout {
    /// Lays out `counts` on a canvas described by `options`.
    ///
    /// Bar width is not fixed: the plot width minus the spacing gaps is split evenly between the
    /// bars, so two or eight categories both fill the chart.
    pub fn compute(
        counts: &StatusCountMap,
        labels: &StatusLabelMap,
        options: &ChartOptions,
    ) -> Result<Self, ChartRenderingError> {
        let max_count = counts.max_count().ok_or(ChartRenderingError::EmptyCounts)?;
        if max_count == 0 {
            return Err(ChartRenderingError::ZeroMaximum);
        }
        check_day_counts(counts)?;

        let (width, height) = options.bar_size;
        let padding = options.bar_padding;
        let plot_left = padding.left;
        let plot_right = width.saturating_sub(padding.right);
        let baseline = height.saturating_sub(padding.bottom);
        let max_bar_height = baseline.saturating_sub(padding.top);

        let bars_count = counts.len();
        let gaps = options.bar_spacing * (bars_count as u32 + 1);
        let available = plot_right.saturating_sub(plot_left).saturating_sub(gaps);
        let bar_width = available / bars_count as u32;
        if bar_width == 0 {
            return Err(ChartRenderingError::BarsDoNotFit {
                bars: bars_count,
                available,
            });
        }

        let scaled = |value: u64| -> u32 {
            (value as f64 / max_count as f64 * max_bar_height as f64).round() as u32
        };

        let gridlines = (0..=max_count)
            .map(|value| Gridline {
                value,
                y: baseline - scaled(value),
                label: format!("{}일", value),
            })
            .collect();

        let bars = counts
            .iter()
            .enumerate()
            .map(|(index, (code, count))| Bar {
                code,
                label: labels.label_for(code),
                count,
                x: plot_left + options.bar_spacing + index as u32 * (bar_width + options.bar_spacing),
                width: bar_width,
                height: scaled(count),
                color: labels.color_for(code),
            })
            .collect();

        Ok(Self {
            width,
            height,
            plot_left,
            plot_right,
            baseline,
            max_bar_height,
            max_count,
            gridlines,
            bars,
        })
    }

    /// Bar heights as fractions of the full plot height.
    pub fn height_fractions(&self) -> Vec<f64> {
        self.bars
            .iter()
            .map(|bar| bar.height as f64 / self.max_bar_height as f64)
            .collect()
    }
}

pub(crate) fn paint(layout: &BarChartLayout, options: &ChartOptions) -> Canvas {
    let mut canvas = Canvas::new(layout.width, layout.height, options.background);

    for line in &layout.gridlines {
        let color = if line.value == 0 { AXIS_COLOR } else { GRID_COLOR };
        canvas.hline(
            layout.plot_left as i32,
            layout.plot_right as i32,
            line.y as i32,
            color,
        );
    }

    for bar in &layout.bars {
        canvas.fill_rect(
            bar.x as i32,
            (layout.baseline - bar.height) as i32,
            bar.width,
            bar.height,
            bar.color,
        );
    }

    canvas
}

pub(crate) fn annotate(
    canvas: &mut Canvas,
    layout: &BarChartLayout,
    font: &Font<'_>,
    options: &ChartOptions,
) {
    canvas.draw_text(
        font,
        options.title_size,
        BAR_CHART_TITLE,
        (layout.width / 2) as i32,
        options.title_top as i32,
        Anchor::TopCenter,
        TEXT_COLOR,
    );

    for line in &layout.gridlines {
        canvas.draw_text(
            font,
            options.label_size,
            &line.label,
            layout.plot_left as i32 - 6,
            line.y as i32,
            Anchor::MiddleRight,
            TEXT_COLOR,
        );
    }

    for bar in &layout.bars {
        canvas.draw_text(
            font,
            options.label_size,
            bar.label,
            (bar.x + bar.width / 2) as i32,
            layout.baseline as i32 + 6,
            Anchor::TopCenter,
            TEXT_COLOR,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout_for(pairs: &[(StatusCode, u64)]) -> Result<BarChartLayout, ChartRenderingError> {
        let counts: StatusCountMap = pairs.iter().copied().collect();
        BarChartLayout::compute(&counts, &StatusLabelMap::standard(), &ChartOptions::default())
    }

    #[test]
    fn tallest_bar_reaches_full_height_once() {
        let layout = layout_for(&[(1, 5), (2, 2), (3, 1)]).unwrap();
        let full: Vec<_> = layout
            .bars
            .iter()
            .filter(|bar| bar.height == layout.max_bar_height)
            .collect();

        assert_eq!(full.len(), 1);
        assert_eq!(full[0].code, 1);

        let fractions: f64 = layout.height_fractions().iter().sum();
        let expected = (5 + 2 + 1) as f64 / 5.0;
        assert!((fractions - expected).abs() < 0.02);
    }

    #[test]
    fn bar_width_adapts_to_category_count() {
        let options = ChartOptions::default();
        let plot = options.bar_size.0 - options.bar_padding.left - options.bar_padding.right;

        for n in [1usize, 2, 5, 8] {
            let pairs: Vec<_> = (1..=n as i64).map(|code| (code, code as u64)).collect();
            let layout = layout_for(&pairs).unwrap();
            let width = layout.bars[0].width;
            assert!(layout.bars.iter().all(|bar| bar.width == width));

            let used = n as u32 * width + (n as u32 + 1) * options.bar_spacing;
            assert!(used <= plot);
            assert!(plot - used < n as u32, "n={} leaves {} px unused", n, plot - used);
        }

        let two = layout_for(&[(1, 1), (2, 1)]).unwrap();
        let eight = layout_for(&(1..=8).map(|code| (code, 1)).collect::<Vec<_>>()).unwrap();
        assert!(two.bars[0].width > eight.bars[0].width);
    }

    #[test]
    fn bars_follow_natural_order() {
        let layout = layout_for(&[(3, 1), (9, 2), (1, 4)]).unwrap();
        let labels: Vec<_> = layout.bars.iter().map(|bar| bar.label).collect();
        assert_eq!(labels, vec!["결근", "기타", "출근"]);
        assert!(layout.bars.windows(2).all(|pair| pair[0].x < pair[1].x));
    }

    #[test]
    fn gridlines_cover_zero_to_max() {
        let layout = layout_for(&[(1, 4)]).unwrap();
        let values: Vec<_> = layout.gridlines.iter().map(|line| line.value).collect();
        assert_eq!(values, vec![0, 1, 2, 3, 4]);
        assert_eq!(layout.gridlines[0].y, layout.baseline);
        assert_eq!(layout.gridlines[4].y, layout.baseline - layout.max_bar_height);
        assert_eq!(layout.gridlines[2].label, "2일");
    }

    #[test]
    fn degenerate_inputs_are_rejected() {
        assert_eq!(layout_for(&[]), Err(ChartRenderingError::EmptyCounts));
        assert_eq!(
            layout_for(&[(1, 0), (2, 0)]),
            Err(ChartRenderingError::ZeroMaximum)
        );

        let crowded: Vec<_> = (0..40).map(|code| (code, 1)).collect();
        assert!(matches!(
            layout_for(&crowded),
            Err(ChartRenderingError::BarsDoNotFit { bars: 40, .. })
        ));
    }

    #[test]
    fn counts_beyond_a_month_are_rejected() {
        assert_eq!(
            layout_for(&[(1, 32), (2, 1)]),
            Err(ChartRenderingError::CountOutOfRange {
                code: 1,
                count: 32,
                max: 31
            })
        );
        assert!(matches!(
            layout_for(&[(1, u64::MAX), (2, 1)]),
            Err(ChartRenderingError::CountOutOfRange { code: 1, .. })
        ));

        let full = layout_for(&[(1, 31)]).unwrap();
        assert_eq!(full.gridlines.len(), 32);
    }

    #[test]
    fn painted_bars_use_status_colours() {
        let options = ChartOptions::default();
        let layout = layout_for(&[(5, 10)]).unwrap();
        let canvas = paint(&layout, &options);
        let bar = &layout.bars[0];

        let inside_top = (layout.baseline - bar.height + 1) as i32;
        let center_x = (bar.x + bar.width / 2) as i32;
        assert_eq!(bar.height, layout.max_bar_height);
        assert_eq!(canvas.pixel(center_x, inside_top), Some(bar.color));
        assert_eq!(
            canvas.pixel(center_x, (layout.baseline - bar.height) as i32 - 2),
            Some(options.background)
        );
    }
}
