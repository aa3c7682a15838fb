#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt::Write as _;

use chrono::Local;
use tracing::debug;

use super::{
    ReportDocument, StudentReport, SubjectReport, UNAVAILABLE,
    factory::{RenderError, Renderer, ReportArtifact, ReportFormat, artifact_filename,
              display_stamp},
};

/// Inline stylesheet; the page must stay self-contained with no external
/// assets.
const STYLE: &str = r#"
        body { font-family: Arial, sans-serif; margin: 20px; background-color: #f5f5f5; }
        .container { background-color: white; padding: 30px; border-radius: 8px;
                     box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
        h1 { color: #1a237e; border-bottom: 3px solid #1a237e; padding-bottom: 10px; }
        .info-section { margin: 20px 0; padding: 15px; background-color: #f9f9f9;
                        border-radius: 5px; }
        .info-row { display: flex; margin: 10px 0; }
        .info-label { font-weight: bold; width: 200px; color: #555; }
        table { width: 100%; border-collapse: collapse; margin: 20px 0; }
        th { background-color: #1a237e; color: white; padding: 12px; text-align: left; }
        td { padding: 10px; border-bottom: 1px solid #ddd; }
        tr:nth-child(even) { background-color: #f9f9f9; }
        .average { font-weight: bold; color: #1a237e; }
        .footer { margin-top: 30px; padding-top: 20px; border-top: 1px solid #ddd;
                  color: #666; font-size: 12px; }
"#;

/// Escapes text interpolated into HTML element content or attribute values.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders a self-contained HTML document with inline styling.
///
/// Missing averages render as the literal `N/A` token, never blank or zero;
/// empty tables render an explicit "no data available" row.
#[derive(Debug, Default)]
pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn render(&self, document: &ReportDocument) -> Result<ReportArtifact, RenderError> {
        let now = Local::now();
        let mut body = String::new();

        let w = &mut body;
        let _ = writeln!(w, "<!DOCTYPE html>");
        let _ = writeln!(w, "<html lang=\"en\">");
        let _ = writeln!(w, "<head>");
        let _ = writeln!(w, "    <meta charset=\"UTF-8\">");
        let _ = writeln!(
            w,
            "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
        );
        let _ = writeln!(w, "    <title>{}</title>", escape(&document.title()));
        let _ = writeln!(w, "    <style>{STYLE}    </style>");
        let _ = writeln!(w, "</head>");
        let _ = writeln!(w, "<body>");
        let _ = writeln!(w, "<div class=\"container\">");
        let _ = writeln!(w, "    <h1>{}</h1>", escape(&document.title()));

        match document {
            ReportDocument::Student(report) => write_student_body(w, report),
            ReportDocument::Subject(report) => write_subject_body(w, report),
            ReportDocument::Generic(_) => write_empty_table(w, 1),
        }

        let _ = writeln!(
            w,
            "    <div class=\"footer\">Generated on {}</div>",
            display_stamp(now)
        );
        let _ = writeln!(w, "</div>");
        let _ = writeln!(w, "</body>");
        let _ = writeln!(w, "</html>");

        let filename = artifact_filename(document, now, ReportFormat::Html);
        debug!(%filename, bytes = body.len(), "rendered html report");

        Ok(ReportArtifact {
            content:      body.into_bytes(),
            filename,
            content_type: ReportFormat::Html.content_type(),
        })
    }
}

/// Writes the student info section and subject table.
fn write_student_body(w: &mut String, report: &StudentReport) {
    let _ = writeln!(w, "    <div class=\"info-section\">");
    let _ = writeln!(
        w,
        "        <div class=\"info-row\"><span class=\"info-label\">Institutional \
         code:</span><span>{}</span></div>",
        escape(&report.student.code)
    );
    if let Some(program) = &report.student.academic_program {
        let _ = writeln!(
            w,
            "        <div class=\"info-row\"><span class=\"info-label\">Academic \
             program:</span><span>{}</span></div>",
            escape(program)
        );
    }
    let _ = writeln!(w, "    </div>");

    let _ = writeln!(w, "    <table>");
    let _ = writeln!(
        w,
        "        <thead><tr><th>Subject</th><th>Code</th><th>Credits</th><th>Average</th></tr></thead>"
    );
    let _ = writeln!(w, "        <tbody>");
    if report.subjects.is_empty() {
        let _ = writeln!(
            w,
            "        <tr><td colspan=\"4\">No data available</td></tr>"
        );
    } else {
        for line in &report.subjects {
            let _ = writeln!(
                w,
                "        <tr><td>{}</td><td>{}</td><td>{}</td><td \
                 class=\"average\">{}</td></tr>",
                escape(&line.subject.name),
                escape(&line.subject.code),
                line.subject.credits,
                line.average,
            );
        }
    }
    let _ = writeln!(w, "        </tbody>");
    let _ = writeln!(w, "    </table>");

    let _ = writeln!(
        w,
        "    <div class=\"info-section\"><span class=\"info-label\">Overall weighted \
         average:</span><span class=\"average\">{}</span></div>",
        report.overall_average,
    );
}

/// Writes the student table for a subject-centric report.
fn write_subject_body(w: &mut String, report: &SubjectReport) {
    let _ = writeln!(w, "    <table>");
    let _ = writeln!(
        w,
        "        <thead><tr><th>Student</th><th>Code</th><th>Average</th></tr></thead>"
    );
    let _ = writeln!(w, "        <tbody>");
    if report.students.is_empty() {
        let _ = writeln!(
            w,
            "        <tr><td colspan=\"3\">No data available</td></tr>"
        );
    } else {
        for line in &report.students {
            let (name, code) = match &line.student {
                Some(student) => (escape(&student.display_name()), escape(&student.code)),
                None => (UNAVAILABLE.to_string(), UNAVAILABLE.to_string()),
            };
            let _ = writeln!(
                w,
                "        <tr><td>{}</td><td>{}</td><td class=\"average\">{}</td></tr>",
                name, code, line.average,
            );
        }
    }
    let _ = writeln!(w, "        </tbody>");
    let _ = writeln!(w, "    </table>");
}

/// Writes a placeholder table for documents with no data rows.
fn write_empty_table(w: &mut String, columns: usize) {
    let _ = writeln!(w, "    <table>");
    let _ = writeln!(
        w,
        "        <tbody><tr><td colspan=\"{columns}\">No data available</td></tr></tbody>"
    );
    let _ = writeln!(w, "    </table>");
}
