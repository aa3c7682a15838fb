#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use chrono::Local;
use serde_json::{Value, json};
use tracing::debug;

use super::{
    ReportDocument,
    factory::{RenderError, Renderer, ReportArtifact, ReportFormat, artifact_filename},
};

/// Renders the canonical document verbatim as JSON.
///
/// Averages serialize through `rust_decimal`'s string representation, so a
/// parsed-back document reproduces every average with no binary-float drift.
/// A `metadata` key carries the generation timestamp and format tag.
#[derive(Debug, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, document: &ReportDocument) -> Result<ReportArtifact, RenderError> {
        let now = Local::now();

        let mut value = serde_json::to_value(document)
            .map_err(|e| RenderError::MalformedDocument(e.to_string()))?;
        let Value::Object(ref mut map) = value else {
            return Err(RenderError::MalformedDocument(
                "report document did not serialize to a JSON object".to_string(),
            ));
        };
        map.insert(
            "metadata".to_string(),
            json!({
                "generated_at": now.to_rfc3339(),
                "format": ReportFormat::Json.as_str(),
            }),
        );

        let content = serde_json::to_vec_pretty(&value)
            .map_err(|e| RenderError::MalformedDocument(e.to_string()))?;
        let filename = artifact_filename(document, now, ReportFormat::Json);
        debug!(%filename, bytes = content.len(), "rendered json report");

        Ok(ReportArtifact {
            content,
            filename,
            content_type: ReportFormat::Json.content_type(),
        })
    }
}
