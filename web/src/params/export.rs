use serde::Deserialize;
use utoipa::IntoParams;

/// Query parameters for the export endpoint. The format defaults to pdf.
#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct ExportParams {
    pub(crate) format: Option<String>,
}

impl ExportParams {
    pub(crate) fn format_or_default(&self) -> &str {
        self.format.as_deref().unwrap_or("pdf")
    }
}
