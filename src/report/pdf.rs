#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use anyhow::anyhow;
use chrono::Local;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rgb,
};
use tracing::debug;

use super::{
    ReportDocument, StudentReport, SubjectReport, UNAVAILABLE,
    factory::{RenderError, Renderer, ReportArtifact, ReportFormat, artifact_filename,
              display_stamp},
};

/// Letter page width.
const PAGE_WIDTH: Mm = Mm(215.9);
/// Letter page height.
const PAGE_HEIGHT: Mm = Mm(279.4);
/// Left page margin.
const MARGIN_LEFT: f64 = 20.0;
/// First baseline on a fresh page.
const TOP_START: f64 = 255.0;
/// Baselines below this trigger a page break.
const BOTTOM_MARGIN: f64 = 25.0;
/// Vertical distance between table rows.
const ROW_HEIGHT: f64 = 8.0;
/// Header/title accent color (matches the HTML renderer's `#1a237e`).
const ACCENT: (f64, f64, f64) = (0.102, 0.137, 0.494);

/// Renders a paginated PDF with a styled title, an optional identity table,
/// and the same column semantics as the HTML renderer (including the `N/A`
/// policy for missing averages).
#[derive(Debug, Default)]
pub struct PdfRenderer;

/// Cursor over the current page; adds pages as rows run past the margin.
struct PageWriter<'a> {
    /// Document being written.
    doc:   &'a PdfDocumentReference,
    /// Layer of the current page.
    layer: PdfLayerReference,
    /// Current baseline, in mm from the page bottom.
    y:     f64,
}

impl PageWriter<'_> {
    /// Starts a new page when the current baseline is inside the bottom
    /// margin.
    fn ensure_room(&mut self) {
        if self.y < BOTTOM_MARGIN {
            let (page, layer) = self.doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = TOP_START;
        }
    }

    /// Writes one text run at the given x offset on the current baseline.
    fn text(&mut self, text: &str, size: f64, x: f64, font: &IndirectFontRef) {
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
    }

    /// Moves the baseline down.
    fn advance(&mut self, dy: f64) {
        self.y -= dy;
        self.ensure_room();
    }

    /// Draws a horizontal rule across the table width just below the
    /// baseline.
    fn rule(&mut self) {
        let y = self.y - 2.0;
        let line = Line {
            points:           vec![
                (Point::new(Mm(MARGIN_LEFT), Mm(y)), false),
                (Point::new(Mm(PAGE_WIDTH.0 - MARGIN_LEFT), Mm(y)), false),
            ],
            is_closed:        false,
            has_fill:         false,
            has_stroke:       true,
            is_clipping_path: false,
        };
        self.layer.add_shape(line);
    }
}

impl Renderer for PdfRenderer {
    fn render(&self, document: &ReportDocument) -> Result<ReportArtifact, RenderError> {
        let now = Local::now();
        let title = document.title();

        let (doc, page, layer) = PdfDocument::new(&title, PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| RenderError::Backend(anyhow!(e)))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| RenderError::Backend(anyhow!(e)))?;

        {
            let mut writer = PageWriter {
                doc:   &doc,
                layer: doc.get_page(page).get_layer(layer),
                y:     TOP_START,
            };

            writer
                .layer
                .set_fill_color(Color::Rgb(Rgb::new(ACCENT.0, ACCENT.1, ACCENT.2, None)));
            writer.text(&title, 18.0, MARGIN_LEFT, &bold);
            writer.layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
            writer.rule();
            writer.advance(14.0);

            match document {
                ReportDocument::Student(report) => {
                    write_student_pages(&mut writer, report, &regular, &bold);
                }
                ReportDocument::Subject(report) => {
                    write_subject_pages(&mut writer, report, &regular, &bold);
                }
                ReportDocument::Generic(_) => {
                    writer.text("No data available", 11.0, MARGIN_LEFT, &regular);
                    writer.advance(ROW_HEIGHT);
                }
            }

            writer.advance(ROW_HEIGHT);
            writer.text(
                &format!("Generated on {}", display_stamp(now)),
                9.0,
                MARGIN_LEFT,
                &regular,
            );
        }

        let mut buffer = std::io::BufWriter::new(Vec::new());
        doc.save(&mut buffer).map_err(|e| RenderError::Backend(anyhow!(e)))?;
        let content = buffer
            .into_inner()
            .map_err(|e| RenderError::Backend(anyhow!("pdf buffer flush failed: {e}")))?;

        let filename = artifact_filename(document, now, ReportFormat::Pdf);
        debug!(%filename, bytes = content.len(), "rendered pdf report");

        Ok(ReportArtifact {
            content,
            filename,
            content_type: ReportFormat::Pdf.content_type(),
        })
    }
}

/// Writes the identity table and subject rows of a student report.
fn write_student_pages(
    writer: &mut PageWriter<'_>,
    report: &StudentReport,
    regular: &IndirectFontRef,
    bold: &IndirectFontRef,
) {
    writer.text("Institutional code:", 10.0, MARGIN_LEFT, bold);
    writer.text(&report.student.code, 10.0, MARGIN_LEFT + 55.0, regular);
    writer.advance(6.0);
    if let Some(program) = &report.student.academic_program {
        writer.text("Academic program:", 10.0, MARGIN_LEFT, bold);
        writer.text(program, 10.0, MARGIN_LEFT + 55.0, regular);
        writer.advance(6.0);
    }
    writer.advance(6.0);

    writer.text("Subject", 11.0, MARGIN_LEFT, bold);
    writer.text("Code", 11.0, 95.0, bold);
    writer.text("Credits", 11.0, 135.0, bold);
    writer.text("Average", 11.0, 165.0, bold);
    writer.rule();
    writer.advance(ROW_HEIGHT);

    if report.subjects.is_empty() {
        writer.text("No data available", 10.0, MARGIN_LEFT, regular);
        writer.advance(ROW_HEIGHT);
    } else {
        for line in &report.subjects {
            writer.text(&line.subject.name, 10.0, MARGIN_LEFT, regular);
            writer.text(&line.subject.code, 10.0, 95.0, regular);
            writer.text(&line.subject.credits.to_string(), 10.0, 135.0, regular);
            writer.text(&line.average.to_string(), 10.0, 165.0, regular);
            writer.advance(ROW_HEIGHT);
        }
    }

    writer.rule();
    writer.advance(ROW_HEIGHT);
    writer.text("Overall weighted average:", 11.0, MARGIN_LEFT, bold);
    writer.text(&report.overall_average.to_string(), 11.0, 95.0, regular);
    writer.advance(ROW_HEIGHT);
}

/// Writes the student rows of a subject report.
fn write_subject_pages(
    writer: &mut PageWriter<'_>,
    report: &SubjectReport,
    regular: &IndirectFontRef,
    bold: &IndirectFontRef,
) {
    writer.text("Student", 11.0, MARGIN_LEFT, bold);
    writer.text("Code", 11.0, 110.0, bold);
    writer.text("Average", 11.0, 165.0, bold);
    writer.rule();
    writer.advance(ROW_HEIGHT);

    if report.students.is_empty() {
        writer.text("No data available", 10.0, MARGIN_LEFT, regular);
        writer.advance(ROW_HEIGHT);
        return;
    }

    for line in &report.students {
        let (name, code) = match &line.student {
            Some(student) => (student.display_name(), student.code.clone()),
            None => (UNAVAILABLE.to_string(), UNAVAILABLE.to_string()),
        };
        writer.text(&name, 10.0, MARGIN_LEFT, regular);
        writer.text(&code, 10.0, 110.0, regular);
        writer.text(&line.average.to_string(), 10.0, 165.0, regular);
        writer.advance(ROW_HEIGHT);
    }
}
