//! Entry point used by the HR service layer.
//!
//! A call moves through `Received → Aggregated → ChartsRendered → DocumentAssembled → Done`; any
//! step may fail instead.  Calls share no mutable state, so one service value can be cloned into
//! as many worker threads as needed.

use log::{debug, info, warn};

use crate::aggregator::AttendanceAggregator;
use crate::builder::{PdfDocument, ReportDocumentBuilder};
use crate::error::{EmptyInputError, FontLoadError, ReportError, ReportStage};
use crate::fonts::{self, ReportFont};
use crate::model::{AttendanceRecord, AttendanceReport, StatusCountMap};

/// MIME type of the generated documents.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Download file name, e.g. `홍길동_근무_리포트_2025-6.pdf`.
pub fn report_file_name(employee_name: &str, year: i32, month: u32) -> String {
    format!("{}_근무_리포트_{}-{}.pdf", employee_name, year, month)
}

/// `Content-Disposition` header value offering the report as an attachment.
pub fn content_disposition(employee_name: &str, year: i32, month: u32) -> String {
    format!(
        "attachment; filename=\"{}\"",
        report_file_name(employee_name, year, month)
    )
}

struct StageLog<'a> {
    employee_name: &'a str,
    year: i32,
    month: u32,
    stage: ReportStage,
}

impl<'a> StageLog<'a> {
    fn received(employee_name: &'a str, year: i32, month: u32) -> Self {
        info!(
            "Attendance report requested for {} ({}-{:02})",
            employee_name, year, month
        );
        Self {
            employee_name,
            year,
            month,
            stage: ReportStage::Received,
        }
    }

    fn advance(&mut self, next: ReportStage) {
        debug!(
            "Report {} {}-{:02}: {} -> {}",
            self.employee_name, self.year, self.month, self.stage, next
        );
        self.stage = next;
    }

    fn finish(
        mut self,
        result: Result<PdfDocument, ReportError>,
    ) -> Result<PdfDocument, ReportError> {
        match result {
            Ok(document) => {
                self.advance(ReportStage::Done);
                info!(
                    "Attendance report for {} ({}-{:02}) generated, {} bytes",
                    self.employee_name,
                    self.year,
                    self.month,
                    document.bytes.len()
                );
                Ok(document)
            }
            Err(err) => {
                warn!(
                    "Report {} {}-{:02} failed after '{}': {}",
                    self.employee_name, self.year, self.month, self.stage, err
                );
                Err(err)
            }
        }
    }
}

/// Generates attendance report PDFs.
#[derive(Clone, Debug)]
pub struct ReportRenderingService {
    aggregator: AttendanceAggregator,
    builder: ReportDocumentBuilder,
}

impl ReportRenderingService {
    /// Loads the report font and creates a service with default settings.
    ///
    /// Call this once at start-up; a missing or corrupt font fails here rather than per request.
    pub fn new() -> Result<Self, FontLoadError> {
        Ok(Self::with_font(fonts::load_default_font()?))
    }

    /// Creates a service around an already loaded font.
    pub fn with_font(font: ReportFont) -> Self {
        Self::with_builder(ReportDocumentBuilder::new(font))
    }

    /// Creates a service around a configured document builder.
    pub fn with_builder(builder: ReportDocumentBuilder) -> Self {
        Self {
            aggregator: AttendanceAggregator::new(*builder.labels()),
            builder,
        }
    }

    /// Aggregates `records` (already scoped to the period) and renders the report.
    pub fn generate(
        &self,
        employee_name: &str,
        year: i32,
        month: u32,
        records: &[AttendanceRecord],
    ) -> Result<PdfDocument, ReportError> {
        self.run(employee_name, year, month, || {
            self.aggregator.aggregate(year, month, records)
        })
    }

    /// Drops records outside `year`/`month`, then aggregates and renders the rest.
    pub fn generate_for_period(
        &self,
        employee_name: &str,
        year: i32,
        month: u32,
        records: &[AttendanceRecord],
    ) -> Result<PdfDocument, ReportError> {
        self.run(employee_name, year, month, || {
            self.aggregator.aggregate_period(year, month, records)
        })
    }

    /// Renders a report from an existing status count map.
    pub fn generate_from_counts(
        &self,
        employee_name: &str,
        year: i32,
        month: u32,
        counts: StatusCountMap,
    ) -> Result<PdfDocument, ReportError> {
        self.run(employee_name, year, month, || {
            AttendanceReport::from_counts(year, month, counts, self.aggregator.labels())
        })
    }

    fn run<F>(
        &self,
        employee_name: &str,
        year: i32,
        month: u32,
        aggregate: F,
    ) -> Result<PdfDocument, ReportError>
    where
        F: FnOnce() -> Result<AttendanceReport, EmptyInputError>,
    {
        let mut log = StageLog::received(employee_name, year, month);

        let report = match aggregate() {
            Ok(report) => report,
            Err(err) => return log.finish(Err(err.into())),
        };
        log.advance(ReportStage::Aggregated);

        let result = self
            .builder
            .build_observed(&report, employee_name, &mut |stage| log.advance(stage))
            .map_err(ReportError::from);
        log.finish(result)
    }
}
