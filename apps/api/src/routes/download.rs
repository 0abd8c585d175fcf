use axum::{
    http::header,
    response::{IntoResponse, Response},
};

use crate::render::ExportArtifact;

/// Exported PDFs go back as attachments named after the document kind.
impl IntoResponse for ExportArtifact {
    fn into_response(self) -> Response {
        (
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", self.filename),
                ),
            ],
            self.bytes,
        )
            .into_response()
    }
}
