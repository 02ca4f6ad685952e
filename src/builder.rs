//! Assembly of the attendance report PDF.
//!
//! The document always contains, top to bottom: a centred title, the status table, the bar chart
//! and the doughnut chart.  Every failure on the way is reported as a [`ReportGenerationError`]
//! carrying the underlying cause.

use genpdf::elements::{Break, FrameCellDecorator, Paragraph, TableLayout};
use genpdf::error::{Error, ErrorKind};
use genpdf::style::Style;
use genpdf::{self, Alignment, Element, Margins, Mm, PageDecorator, Position, Size};
use log::debug;

use crate::chart::{BarChartLayout, ChartOptions, ChartRenderer, DoughnutLayout};
use crate::elements::{mm_from_f64, ChartImage};
use crate::error::{
    ChartRenderingError, FontLoadError, GenerationCause, ReportGenerationError, ReportStage,
};
use crate::fonts::{self, ReportFont};
use crate::model::AttendanceReport;
use crate::postprocess;
use crate::status::StatusLabelMap;

/// Column headers of the status table.
pub const TABLE_HEADER: [&str; 2] = ["근태 구분", "일수"];

const TITLE_FONT_SIZE: u8 = 16;
const BODY_FONT_SIZE: u8 = 11;
const FOOTER_FONT_SIZE: u8 = 9;
const FOOTER_HEIGHT_MM: f64 = 8.0;
const DEFAULT_MARGIN_MM: i32 = 15;
const DEFAULT_CHART_BOX_MM: (f64, f64) = (170.0, 85.0);

/// One row of the status table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableRow {
    /// Status label, e.g. `출근`.
    pub label: String,
    /// Day count with unit, e.g. `5일`.
    pub days: String,
}

impl TableRow {
    /// Row rendered as `label/days`.
    pub fn to_compact_string(&self) -> String {
        format!("{}/{}", self.label, self.days)
    }
}

/// Table rows for `report`, in the aggregate's natural order.
pub fn table_rows(report: &AttendanceReport, labels: &StatusLabelMap) -> Vec<TableRow> {
    report
        .status_count_map()
        .iter()
        .map(|(code, days)| TableRow {
            label: labels.label_for(code).to_owned(),
            days: format!("{}일", days),
        })
        .collect()
}

/// Document title for the given period and employee.
pub fn report_title(year: i32, month: u32, employee_name: &str) -> String {
    format!("{}년 {}월 근태 리포트 ({} 사원)", year, month, employee_name)
}

/// A finished report PDF together with the content it was drawn from.
#[derive(Clone, Debug)]
pub struct PdfDocument {
    /// Serialized PDF.
    pub bytes: Vec<u8>,
    /// Title line.
    pub title: String,
    /// Status table rows.
    pub rows: Vec<TableRow>,
    /// Bar chart geometry.
    pub bar_chart: BarChartLayout,
    /// Doughnut chart geometry.
    pub doughnut_chart: DoughnutLayout,
}

impl PdfDocument {
    /// Consumes the document and returns the PDF bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Builds attendance report PDFs.
///
/// The builder holds only read-only configuration and the shared font, so one instance can serve
/// any number of reports.
#[derive(Clone, Debug)]
pub struct ReportDocumentBuilder {
    font: ReportFont,
    labels: StatusLabelMap,
    chart_options: ChartOptions,
    paper_size: Size,
    margins: Margins,
    chart_box: Size,
    footer: bool,
}

impl ReportDocumentBuilder {
    /// Creates a builder with A4 portrait pages and the standard labels.
    pub fn new(font: ReportFont) -> Self {
        Self {
            font,
            labels: StatusLabelMap::standard(),
            chart_options: ChartOptions::default(),
            paper_size: Size::new(210, 297),
            margins: Margins::from(DEFAULT_MARGIN_MM),
            chart_box: Size::new(
                mm_from_f64(DEFAULT_CHART_BOX_MM.0),
                mm_from_f64(DEFAULT_CHART_BOX_MM.1),
            ),
            footer: true,
        }
    }

    /// Creates a builder using the font found by [`fonts::load_default_font`].
    pub fn with_default_font() -> Result<Self, FontLoadError> {
        Ok(Self::new(fonts::load_default_font()?))
    }

    /// Replaces the status labels used by the table and both charts.
    pub fn with_labels(mut self, labels: StatusLabelMap) -> Self {
        self.labels = labels;
        self
    }

    /// Replaces the chart drawing options.
    pub fn with_chart_options(mut self, options: ChartOptions) -> Self {
        self.chart_options = options;
        self
    }

    /// Sets the paper size.
    pub fn with_paper_size(mut self, paper_size: impl Into<Size>) -> Self {
        self.paper_size = paper_size.into();
        self
    }

    /// Sets the page margins.
    pub fn with_margins(mut self, margins: impl Into<Margins>) -> Self {
        self.margins = margins.into();
        self
    }

    /// Sets the box each chart is scaled into, in millimetres.
    pub fn with_chart_box(mut self, width_mm: f64, height_mm: f64) -> Self {
        self.chart_box = Size::new(mm_from_f64(width_mm), mm_from_f64(height_mm));
        self
    }

    /// Enables or disables the page footer.
    pub fn with_footer(mut self, footer: bool) -> Self {
        self.footer = footer;
        self
    }

    /// The label map in use.
    pub fn labels(&self) -> &StatusLabelMap {
        &self.labels
    }

    /// Renders `report` for `employee_name` into a PDF.
    pub fn build(
        &self,
        report: &AttendanceReport,
        employee_name: &str,
    ) -> Result<PdfDocument, ReportGenerationError> {
        self.build_observed(report, employee_name, &mut |_| {})
    }

    /// Like [`build`](Self::build), reporting every stage reached to `observer`.
    pub fn build_observed(
        &self,
        report: &AttendanceReport,
        employee_name: &str,
        observer: &mut dyn FnMut(ReportStage),
    ) -> Result<PdfDocument, ReportGenerationError> {
        let counts = report.status_count_map();
        let renderer =
            ChartRenderer::new(&self.font, self.labels).with_options(self.chart_options);

        let charts_failed =
            |err: ChartRenderingError| ReportGenerationError::new(ReportStage::ChartsRendered, err);
        let bar_chart = renderer.render_bar_chart(counts).map_err(charts_failed)?;
        let doughnut_chart = renderer
            .render_doughnut_chart(counts)
            .map_err(charts_failed)?;
        observer(ReportStage::ChartsRendered);
        debug!(
            "Rendered charts for {}-{:02}: bar {:?}, doughnut {:?}",
            report.year(),
            report.month(),
            bar_chart.dimensions(),
            doughnut_chart.dimensions()
        );

        let title = report_title(report.year(), report.month(), employee_name);
        let rows = table_rows(report, &self.labels);
        let (bar_image, bar_layout) = bar_chart.into_parts();
        let (doughnut_image, doughnut_layout) = doughnut_chart.into_parts();

        let assembly_failed = |cause: GenerationCause| {
            ReportGenerationError::new(ReportStage::DocumentAssembled, cause)
        };

        let bar_element = ChartImage::new(bar_image, self.chart_box)
            .map_err(|err| assembly_failed(GenerationCause::Image(err)))?;
        let doughnut_element = ChartImage::new(doughnut_image, self.chart_box)
            .map_err(|err| assembly_failed(GenerationCause::Image(err)))?;

        let mut document = genpdf::Document::new(self.font.family());
        document.set_title(title.clone());
        document.set_paper_size(self.paper_size);
        document.set_font_size(BODY_FONT_SIZE);

        let footer = if self.footer {
            Some(footer_line(employee_name, report.year(), report.month()))
        } else {
            None
        };
        document.set_page_decorator(ReportPageDecorator::new(self.margins, footer));

        document.push(title_element(&title));
        document.push(Break::new(1));
        document.push(
            status_table(&rows).map_err(|err| assembly_failed(GenerationCause::Pdf(err)))?,
        );
        document.push(Break::new(1));
        document.push(bar_element);
        document.push(Break::new(1));
        document.push(doughnut_element);

        let mut rendered = Vec::new();
        document
            .render(&mut rendered)
            .map_err(|err| assembly_failed(GenerationCause::Pdf(err)))?;
        let bytes = postprocess::dedup_font_files(&rendered)
            .map_err(|err| assembly_failed(GenerationCause::Postprocess(err)))?;
        observer(ReportStage::DocumentAssembled);
        debug!("Assembled report '{}' ({} bytes)", title, bytes.len());

        Ok(PdfDocument {
            bytes,
            title,
            rows,
            bar_chart: bar_layout,
            doughnut_chart: doughnut_layout,
        })
    }
}

fn title_element(title: &str) -> impl Element {
    let mut style = Style::new();
    style.set_bold();
    style.set_font_size(TITLE_FONT_SIZE);

    let mut paragraph = Paragraph::new(title.to_owned());
    paragraph.set_alignment(Alignment::Center);
    paragraph.styled(style)
}

fn status_table(rows: &[TableRow]) -> Result<TableLayout, Error> {
    let mut table = TableLayout::new(vec![3, 2]);
    table.set_cell_decorator(FrameCellDecorator::new(true, true, false));

    let mut header_style = Style::new();
    header_style.set_bold();
    table
        .row()
        .element(Paragraph::new(TABLE_HEADER[0]).styled(header_style).padded(1))
        .element(Paragraph::new(TABLE_HEADER[1]).styled(header_style).padded(1))
        .push()?;

    for row in rows {
        let mut days = Paragraph::new(row.days.clone());
        days.set_alignment(Alignment::Right);
        table
            .row()
            .element(Paragraph::new(row.label.clone()).padded(1))
            .element(days.padded(1))
            .push()?;
    }

    Ok(table)
}

fn footer_line(employee_name: &str, year: i32, month: u32) -> Box<FooterFactory> {
    let prefix = format!("{} · {}-{:02}", employee_name, year, month);
    Box::new(move |page| {
        let mut style = Style::new();
        style.set_font_size(FOOTER_FONT_SIZE);
        let mut paragraph = Paragraph::new(format!("{} · {}", prefix, page));
        paragraph.set_alignment(Alignment::Right);
        paragraph.styled(style)
    })
}

type FooterFactory = dyn Fn(usize) -> genpdf::elements::StyledElement<Paragraph>;

struct ReportPageDecorator {
    page: usize,
    margins: Margins,
    footer: Option<Box<FooterFactory>>,
}

impl ReportPageDecorator {
    fn new(margins: Margins, footer: Option<Box<FooterFactory>>) -> Self {
        Self {
            page: 0,
            margins,
            footer,
        }
    }
}

impl PageDecorator for ReportPageDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &genpdf::Context,
        mut area: genpdf::render::Area<'a>,
        style: Style,
    ) -> Result<genpdf::render::Area<'a>, Error> {
        self.page += 1;
        area.add_margins(self.margins);

        if let Some(footer) = &self.footer {
            let height: Mm = mm_from_f64(FOOTER_HEIGHT_MM);
            let available = area.size().height;
            if height > available {
                return Err(Error::new(
                    "Footer height exceeds available space",
                    ErrorKind::InvalidData,
                ));
            }

            let mut footer_area = area.clone();
            footer_area.add_offset(Position::new(0, available - height));
            let mut element = footer(self.page);
            let result = element.render(context, footer_area, style)?;
            if result.has_more {
                return Err(Error::new(
                    "Footer does not fit into the reserved space",
                    ErrorKind::PageSizeExceeded,
                ));
            }

            area.set_height(available - height);
        }

        Ok(area)
    }
}
