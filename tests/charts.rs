use attendance_report::chart::{ChartOptions, ChartRenderer};
use attendance_report::fonts::{self, ReportFont};
use attendance_report::{StatusCountMap, StatusLabelMap};
use image::RgbImage;
use sha2::{Digest, Sha256};

fn renderer(test: &str) -> Option<ChartRenderer> {
    if !fonts::default_font_available() {
        eprintln!(
            "Skipping {}: no Hangul font found. Set ATTENDANCE_REPORT_FONT or copy NotoSansKR-Regular.ttf into assets/fonts.",
            test
        );
        return None;
    }
    let font: ReportFont = fonts::load_default_font().expect("load report font");
    Some(ChartRenderer::new(&font, StatusLabelMap::standard()))
}

fn counts(pairs: &[(i64, u64)]) -> StatusCountMap {
    pairs.iter().copied().collect()
}

fn pixel_hash(image: &RgbImage) -> [u8; 32] {
    Sha256::digest(image.as_raw()).into()
}

fn has_ink(image: &RgbImage, x0: u32, y0: u32, x1: u32, y1: u32) -> bool {
    let background = ChartOptions::default().background;
    (y0..y1).any(|y| (x0..x1).any(|x| *image.get_pixel(x, y) != background))
}

#[test]
fn bar_chart_has_configured_size_and_title() {
    let Some(renderer) = renderer("bar_chart_has_configured_size_and_title") else { return };

    let chart = renderer
        .render_bar_chart(&counts(&[(1, 5), (2, 2), (3, 1)]))
        .expect("render bar chart");
    let options = renderer.options();

    assert_eq!(chart.dimensions(), options.bar_size);
    let (width, _) = options.bar_size;
    assert!(has_ink(chart.image(), width / 2 - 40, 0, width / 2 + 40, options.bar_padding.top));
}

#[test]
fn doughnut_chart_labels_centre_and_legend() {
    let Some(renderer) = renderer("doughnut_chart_labels_centre_and_legend") else { return };

    let chart = renderer
        .render_doughnut_chart(&counts(&[(1, 5), (2, 2), (3, 1)]))
        .expect("render doughnut chart");
    let layout = chart.layout();
    let (cx, cy) = layout.center;

    let (cx, cy) = (cx as u32, cy as u32);
    assert!(has_ink(chart.image(), cx - 20, cy - 10, cx + 20, cy + 10));

    let (lx, ly) = layout.legend_origin;
    let text_left = lx as u32 + 24;
    assert!(has_ink(
        chart.image(),
        text_left,
        ly as u32,
        text_left + 80,
        ly as u32 + layout.legend_row_height
    ));
}

#[test]
fn charts_are_pixel_stable() {
    let Some(renderer) = renderer("charts_are_pixel_stable") else { return };
    let input = counts(&[(4, 3), (1, 12), (7, 1)]);

    let a = renderer.render_bar_chart(&input).expect("first bar chart");
    let b = renderer.render_bar_chart(&input).expect("second bar chart");
    assert_eq!(pixel_hash(a.image()), pixel_hash(b.image()));

    let a = renderer.render_doughnut_chart(&input).expect("first doughnut");
    let b = renderer.render_doughnut_chart(&input).expect("second doughnut");
    assert_eq!(pixel_hash(a.image()), pixel_hash(b.image()));
}

#[test]
fn custom_canvas_sizes_are_honoured() {
    let Some(renderer) = renderer("custom_canvas_sizes_are_honoured") else { return };
    let options = ChartOptions {
        bar_size: (480, 240),
        doughnut_size: (600, 320),
        ..ChartOptions::default()
    };
    let renderer = renderer.with_options(options);
    let input = counts(&[(1, 2), (6, 1)]);

    let bar = renderer.render_bar_chart(&input).expect("bar chart");
    let doughnut = renderer.render_doughnut_chart(&input).expect("doughnut chart");
    assert_eq!(bar.dimensions(), (480, 240));
    assert_eq!(doughnut.dimensions(), (600, 320));
}
