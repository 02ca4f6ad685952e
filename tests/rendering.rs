use std::thread;

use attendance_report::error::{ChartRenderingError, GenerationCause};
use attendance_report::{fonts, postprocess};
use attendance_report::{
    AttendanceRecord, ReportError, ReportRenderingService, ReportStage, StatusCountMap,
};

fn service(test: &str) -> Option<ReportRenderingService> {
    if !fonts::default_font_available() {
        eprintln!(
            "Skipping {}: no Hangul font found. Set ATTENDANCE_REPORT_FONT or copy NotoSansKR-Regular.ttf into assets/fonts.",
            test
        );
        return None;
    }
    Some(ReportRenderingService::new().expect("load report font"))
}

fn counts(pairs: &[(i64, u64)]) -> StatusCountMap {
    pairs.iter().copied().collect()
}

fn records(codes: &[i64]) -> Vec<AttendanceRecord> {
    codes
        .iter()
        .enumerate()
        .map(|(day, code)| AttendanceRecord::new(2025, 6, day as u32 + 1, *code))
        .collect()
}

fn image_count(bytes: &[u8]) -> usize {
    let document = lopdf::Document::load_mem(bytes).expect("parse rendered pdf");
    document
        .objects
        .values()
        .filter(|object| match object {
            lopdf::Object::Stream(stream) => stream
                .dict
                .get(b"Subtype")
                .and_then(|subtype| subtype.as_name())
                .map(|name| name == b"Image")
                .unwrap_or(false),
            _ => false,
        })
        .count()
}

#[test]
fn renders_three_status_report() {
    let Some(service) = service("renders_three_status_report") else { return };

    let document = service
        .generate_from_counts("홍길동", 2025, 6, counts(&[(1, 5), (2, 2), (3, 1)]))
        .expect("render report");

    assert!(document.bytes.len() > 1000);
    assert!(document.bytes.starts_with(b"%PDF"));
    assert_eq!(document.title, "2025년 6월 근태 리포트 (홍길동 사원)");

    let rows: Vec<_> = document
        .rows
        .iter()
        .map(|row| row.to_compact_string())
        .collect();
    assert_eq!(rows, vec!["출근/5일", "지각/2일", "결근/1일"]);
    assert_eq!(image_count(&document.bytes), 2);
}

#[test]
fn font_program_is_embedded_once() {
    let Some(service) = service("font_program_is_embedded_once") else { return };

    let document = service
        .generate_from_counts("홍길동", 2025, 6, counts(&[(1, 5), (2, 2), (3, 1)]))
        .expect("render report");
    let parsed = lopdf::Document::load_mem(&document.bytes).expect("parse rendered pdf");

    assert_eq!(postprocess::font_file_ids(&parsed).len(), 1);
}

#[test]
fn empty_aggregate_reports_no_data() {
    let Some(service) = service("empty_aggregate_reports_no_data") else { return };

    let err = service
        .generate_from_counts("홍길동", 2025, 6, StatusCountMap::new())
        .unwrap_err();
    assert!(err.is_no_data());

    let err = service.generate("홍길동", 2025, 6, &[]).unwrap_err();
    assert!(matches!(err, ReportError::NoData(_)));
}

#[test]
fn single_category_fills_both_charts() {
    let Some(service) = service("single_category_fills_both_charts") else { return };

    let document = service
        .generate_from_counts("홍길동", 2025, 6, counts(&[(5, 10)]))
        .expect("render report");

    let bar = &document.bar_chart;
    assert_eq!(bar.bars.len(), 1);
    assert_eq!(bar.bars[0].height, bar.max_bar_height);

    let doughnut = &document.doughnut_chart;
    assert_eq!(doughnut.slices.len(), 1);
    assert_eq!(doughnut.slices[0].sweep, 360);
    assert_eq!(doughnut.legend(), vec!["연차 (100.0%)".to_string()]);
}

#[test]
fn table_and_doughnut_orders_differ() {
    let Some(service) = service("table_and_doughnut_orders_differ") else { return };

    let document = service
        .generate_from_counts("홍길동", 2025, 6, counts(&[(3, 1), (1, 5), (2, 2)]))
        .expect("render report");

    let table: Vec<_> = document.rows.iter().map(|row| row.label.as_str()).collect();
    let bars: Vec<_> = document.bar_chart.bars.iter().map(|bar| bar.label).collect();
    let slices: Vec<_> = document
        .doughnut_chart
        .slices
        .iter()
        .map(|slice| slice.label)
        .collect();

    assert_eq!(table, vec!["결근", "출근", "지각"]);
    assert_eq!(bars, table);
    assert_eq!(slices, vec!["출근", "지각", "결근"]);
    assert_ne!(table, slices);
}

#[test]
fn generation_is_idempotent() {
    let Some(service) = service("generation_is_idempotent") else { return };
    let input = records(&[1, 1, 2, 1, 3, 1, 4, 1, 1, 7]);

    let first = service.generate("홍길동", 2025, 6, &input).expect("first render");
    let second = service.generate("홍길동", 2025, 6, &input).expect("second render");

    assert_eq!(first.title, second.title);
    assert_eq!(first.rows, second.rows);
    assert_eq!(first.bar_chart, second.bar_chart);
    assert_eq!(first.doughnut_chart, second.doughnut_chart);
}

#[test]
fn period_filtering_happens_before_aggregation() {
    let Some(service) = service("period_filtering_happens_before_aggregation") else { return };
    let mut input = records(&[1, 2]);
    input.push(AttendanceRecord::new(2025, 5, 31, 3));

    let document = service
        .generate_for_period("홍길동", 2025, 6, &input)
        .expect("render report");
    assert_eq!(document.rows.len(), 2);

    let err = service
        .generate_for_period("홍길동", 2024, 1, &input)
        .unwrap_err();
    assert!(err.is_no_data());
}

#[test]
fn zero_counts_fail_as_generation_error() {
    let Some(service) = service("zero_counts_fail_as_generation_error") else { return };

    let err = service
        .generate_from_counts("홍길동", 2025, 6, counts(&[(1, 0)]))
        .unwrap_err();
    let inner = match err {
        ReportError::Generation(inner) => inner,
        other => panic!("expected a generation error, got {other:?}"),
    };
    assert_eq!(inner.stage(), ReportStage::ChartsRendered);
    assert!(matches!(
        inner.cause(),
        GenerationCause::Chart(ChartRenderingError::ZeroMaximum)
    ));
}

#[test]
fn unknown_codes_only_break_the_doughnut() {
    let Some(service) = service("unknown_codes_only_break_the_doughnut") else { return };

    let err = service
        .generate_from_counts("홍길동", 2025, 6, counts(&[(9, 3)]))
        .unwrap_err();
    let inner = match err {
        ReportError::Generation(inner) => inner,
        other => panic!("expected a generation error, got {other:?}"),
    };
    assert!(matches!(
        inner.cause(),
        GenerationCause::Chart(ChartRenderingError::ZeroTotal)
    ));

    let document = service
        .generate_from_counts("홍길동", 2025, 6, counts(&[(9, 3), (1, 2)]))
        .expect("render report");
    assert_eq!(document.rows[0].to_compact_string(), "기타/3일");
    assert_eq!(document.bar_chart.bars.len(), 2);
    assert_eq!(document.doughnut_chart.slices.len(), 1);
}

#[test]
fn concurrent_reports_do_not_interfere() {
    let Some(service) = service("concurrent_reports_do_not_interfere") else { return };

    let handles: Vec<_> = (1..=4u64)
        .map(|late_days| {
            let service = service.clone();
            thread::spawn(move || {
                let document = service
                    .generate_from_counts("홍길동", 2025, 6, counts(&[(1, 10), (2, late_days)]))
                    .expect("render report");
                (late_days, document.rows)
            })
        })
        .collect();

    for handle in handles {
        let (late_days, rows) = handle.join().expect("render thread panicked");
        assert_eq!(rows[1].to_compact_string(), format!("지각/{}일", late_days));
    }
}
