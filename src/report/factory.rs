#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Renderer registry and the artifact contract shared by every format.
//!
//! The registry is a compile-time-enumerable mapping from format identifier to
//! renderer: the supported set is the [`ReportFormat`] enum, the instances are
//! statics. Nothing registers at runtime and nothing mutates after startup.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Local};

use super::{ReportDocument, html::HtmlRenderer, json::JsonRenderer, pdf::PdfRenderer};

/// Errors a render request can fail with.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// The caller asked for a format no renderer is registered for. Surfaced
    /// to the calling layer as a validation failure; never silently replaced
    /// with a fallback format.
    #[error("Unsupported report format: `{0}`. Available formats: json, html, pdf.")]
    UnsupportedFormat(String),
    /// The document violated the shape a renderer expects. A programmer error
    /// upstream; aborts the single request.
    #[error("Malformed report document: {0}")]
    MalformedDocument(String),
    /// The rendering backend itself failed.
    #[error("Report rendering failed: {0}")]
    Backend(#[from] anyhow::Error),
}

/// The set of output formats a report can be rendered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportFormat {
    /// `application/json`
    Json,
    /// `text/html`
    Html,
    /// `application/pdf`
    Pdf,
}

impl ReportFormat {
    /// Every registered format, in registry order.
    pub const ALL: [ReportFormat; 3] = [ReportFormat::Json, ReportFormat::Html, ReportFormat::Pdf];

    /// Canonical lowercase identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Html => "html",
            ReportFormat::Pdf => "pdf",
        }
    }

    /// File extension used in artifact filenames.
    pub fn extension(self) -> &'static str {
        self.as_str()
    }

    /// MIME content type of artifacts in this format.
    pub fn content_type(self) -> &'static str {
        match self {
            ReportFormat::Json => "application/json",
            ReportFormat::Html => "text/html",
            ReportFormat::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportFormat {
    type Err = RenderError;

    /// Case-insensitive lookup; unknown identifiers carry the offending
    /// string back to the caller.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "html" => Ok(ReportFormat::Html),
            "pdf" => Ok(ReportFormat::Pdf),
            _ => Err(RenderError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Identifiers of every registered format.
pub fn supported_formats() -> Vec<&'static str> {
    ReportFormat::ALL.iter().map(|f| f.as_str()).collect()
}

/// A rendered report ready for the calling layer to transmit.
///
/// Constructed fresh on every render call, never cached or mutated after
/// construction. This crate performs no I/O with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifact {
    /// Payload bytes (UTF-8 text for JSON/HTML, binary for PDF).
    pub content:      Vec<u8>,
    /// Suggested filename, `report_<code>_<YYYYMMDD_HHMMSS>.<ext>`.
    pub filename:     String,
    /// MIME content type.
    pub content_type: &'static str,
}

impl ReportArtifact {
    /// Payload interpreted as UTF-8, for the text formats.
    pub fn content_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.content).ok()
    }
}

/// A stateless component that turns a canonical document into one format's
/// artifact. Renderers must not mutate the document and must not fail on
/// empty subject/student lists.
pub trait Renderer: std::fmt::Debug + Send + Sync {
    /// Renders `document` into a fresh artifact.
    fn render(&self, document: &ReportDocument) -> Result<ReportArtifact, RenderError>;
}

/// Singleton JSON renderer.
static JSON_RENDERER: JsonRenderer = JsonRenderer;
/// Singleton HTML renderer.
static HTML_RENDERER: HtmlRenderer = HtmlRenderer;
/// Singleton PDF renderer.
static PDF_RENDERER: PdfRenderer = PdfRenderer;

/// Looks up the renderer registered for `format`.
///
/// Renderers are stateless with respect to the documents they render, so the
/// same instance is handed out for every call; reuse is an optimization, not
/// a correctness requirement.
pub fn renderer_for(format: &str) -> Result<&'static dyn Renderer, RenderError> {
    Ok(match ReportFormat::from_str(format)? {
        ReportFormat::Json => &JSON_RENDERER,
        ReportFormat::Html => &HTML_RENDERER,
        ReportFormat::Pdf => &PDF_RENDERER,
    })
}

/// Builds the artifact filename for a document rendered at `now`.
pub(super) fn artifact_filename(
    document: &ReportDocument,
    now: DateTime<Local>,
    format: ReportFormat,
) -> String {
    let stamp = now.format("%Y%m%d_%H%M%S");
    match document.filename_code() {
        Some(code) => format!("report_{code}_{stamp}.{}", format.extension()),
        None => format!("report_{stamp}.{}", format.extension()),
    }
}

/// Formats the human-readable generation timestamp used in report footers.
pub(super) fn display_stamp(now: DateTime<Local>) -> String {
    now.format("%d/%m/%Y %H:%M:%S").to_string()
}
