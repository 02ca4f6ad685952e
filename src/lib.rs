//! Monthly attendance report rendering.
//!
//! Daily attendance records are aggregated into per-status day counts, which are drawn as a bar
//! chart and a doughnut chart and assembled together with a summary table into a PDF document.

pub mod aggregator;
pub mod builder;
pub mod chart;
pub mod elements;
pub mod error;
pub mod fonts;
pub mod model;
pub mod postprocess;
pub mod service;
pub mod status;

pub use aggregator::AttendanceAggregator;
pub use builder::{PdfDocument, ReportDocumentBuilder, TableRow};
pub use chart::{ChartOptions, ChartRenderer, RenderedChart};
pub use error::{
    ChartRenderingError, EmptyInputError, FontLoadError, ReportError, ReportGenerationError,
    ReportStage,
};
pub use fonts::ReportFont;
pub use model::{AttendanceRecord, AttendanceReport, StatusCountMap};
pub use service::ReportRenderingService;
pub use status::{StatusCode, StatusLabelMap};
