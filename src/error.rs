//! Error types raised while aggregating and rendering attendance reports.

use std::fmt;
use std::io;

use thiserror::Error;

use crate::status::StatusCode;

/// No attendance records exist for the requested period.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("no attendance records for {year}-{month:02}")]
pub struct EmptyInputError {
    /// Requested year.
    pub year: i32,
    /// Requested month (1-12).
    pub month: u32,
}

/// Invariant violations detected while laying out or drawing a chart.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ChartRenderingError {
    /// The status count map had no entries.
    #[error("status count map is empty; nothing to chart")]
    EmptyCounts,
    /// Every count was zero, so the bar chart has no scale.
    #[error("largest status count is zero; bar chart scale is undefined")]
    ZeroMaximum,
    /// The doughnut chart total was zero, so ratios are undefined.
    #[error("doughnut total is zero; status ratios are undefined")]
    ZeroTotal,
    /// Too many bars for the plot width.
    #[error("{bars} bars do not fit into {available} px of plot width")]
    BarsDoNotFit {
        /// Number of bars requested.
        bars: usize,
        /// Horizontal space left after spacing, in pixels.
        available: u32,
    },
    /// A status was counted on more days than a month has.
    #[error("status {code} counts {count} days, more than the {max} days of a month")]
    CountOutOfRange {
        /// Offending status code.
        code: StatusCode,
        /// Its day count.
        count: u64,
        /// Largest accepted count.
        max: u64,
    },
}

/// The font required for Hangul text could not be loaded.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct FontLoadError {
    message: String,
    #[source]
    source: Option<io::Error>,
}

impl FontLoadError {
    /// Creates an error with a message only.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an error carrying an underlying I/O cause.
    pub fn with_source(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Returns whether the error was caused by missing files rather than a corrupt font.
    pub fn is_not_found(&self) -> bool {
        matches!(&self.source, Some(err) if err.kind() == io::ErrorKind::NotFound)
    }
}

/// Stages a single report generation call passes through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReportStage {
    /// Request accepted, nothing computed yet.
    Received,
    /// Records turned into a status count map and summary.
    Aggregated,
    /// Bar and doughnut charts rasterized.
    ChartsRendered,
    /// PDF elements laid out and serialized.
    DocumentAssembled,
    /// Bytes handed back to the caller.
    Done,
}

impl fmt::Display for ReportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Received => "received",
            Self::Aggregated => "aggregated",
            Self::ChartsRendered => "charts rendered",
            Self::DocumentAssembled => "document assembled",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Underlying failure wrapped by [`ReportGenerationError`].
#[derive(Debug, Error)]
pub enum GenerationCause {
    /// Chart layout or rasterization failed.
    #[error(transparent)]
    Chart(#[from] ChartRenderingError),
    /// Chart image could not be converted for embedding.
    #[error("chart image conversion failed: {0}")]
    Image(#[source] genpdf::error::Error),
    /// `genpdf` failed to lay out or serialize the document.
    #[error("PDF assembly failed: {0}")]
    Pdf(#[source] genpdf::error::Error),
    /// The rendered PDF could not be re-read or rewritten.
    #[error("PDF post-processing failed: {0}")]
    Postprocess(#[source] lopdf::Error),
}

/// Any failure while turning an aggregate into a PDF document.
#[derive(Debug, Error)]
#[error("attendance report generation failed before reaching '{stage}': {cause}")]
pub struct ReportGenerationError {
    stage: ReportStage,
    #[source]
    cause: GenerationCause,
}

impl ReportGenerationError {
    /// Wraps `cause`, recording the stage that could not be reached.
    pub fn new(stage: ReportStage, cause: impl Into<GenerationCause>) -> Self {
        Self {
            stage,
            cause: cause.into(),
        }
    }

    /// The stage that was being entered when the failure happened.
    pub fn stage(&self) -> ReportStage {
        self.stage
    }

    /// The underlying cause.
    pub fn cause(&self) -> &GenerationCause {
        &self.cause
    }
}

/// Result of a report request as seen by collaborators.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Nothing to report for the period; maps to a "not found" response.
    #[error("no attendance data for this period: {0}")]
    NoData(#[from] EmptyInputError),
    /// Rendering failed; maps to a server error.
    #[error(transparent)]
    Generation(#[from] ReportGenerationError),
}

impl ReportError {
    /// Returns whether the error means "no data" rather than an internal failure.
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData(_))
    }
}
