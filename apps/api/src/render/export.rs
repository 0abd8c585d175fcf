//! Export Adapter — drives the rendering engine against a composed view.
//!
//! The engine owns rasterization and pagination; this module owns the policy
//! (page size, margins, scale, pagination mode) and the failure reporting.
//! Every export is a single engine call. Failures are returned, never retried.

use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::render::pdf_engine::{EngineError, RenderingEngine};

// ────────────────────────────────────────────────────────────────────────────
// Document kinds
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    #[default]
    Resume,
    CoverLetter,
}

impl DocumentKind {
    pub fn filename(self) -> &'static str {
        match self {
            DocumentKind::Resume => "resume.pdf",
            DocumentKind::CoverLetter => "cover-letter.pdf",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Policy
// ────────────────────────────────────────────────────────────────────────────

/// How the engine may split content across pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationMode {
    /// Break only between lines of text. No word is split across pages.
    Text,
    /// Break at fixed pixel offsets.
    #[allow(dead_code)]
    Slice,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub name: &'static str,
    pub width_mm: f32,
    pub height_mm: f32,
}

pub const A4: PageSize = PageSize {
    name: "A4",
    width_mm: 210.0,
    height_mm: 297.0,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top_mm: f32,
    pub right_mm: f32,
    pub bottom_mm: f32,
    pub left_mm: f32,
}

impl Margins {
    pub const fn uniform(mm: f32) -> Self {
        Self {
            top_mm: mm,
            right_mm: mm,
            bottom_mm: mm,
            left_mm: mm,
        }
    }
}

/// Fidelity vs. size parameters handed to the engine on every export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportPolicy {
    pub page: PageSize,
    pub margins: Margins,
    /// Offset of the content box inside the margins.
    pub offset_x_mm: f32,
    pub offset_y_mm: f32,
    /// Printed width of the content box.
    pub content_width_mm: f32,
    /// Logical viewport width the markup is laid out at before scaling.
    pub window_width_px: u32,
    /// Millimetres per CSS pixel. 0.275 keeps multi-page text from being
    /// clipped mid-glyph at page boundaries.
    pub scale: f32,
    pub pagination: PaginationMode,
}

impl Default for ExportPolicy {
    fn default() -> Self {
        Self {
            page: A4,
            margins: Margins::uniform(10.0),
            offset_x_mm: 5.0,
            offset_y_mm: 5.0,
            content_width_mm: 190.0,
            window_width_px: 650,
            scale: 0.275,
            pagination: PaginationMode::Text,
        }
    }
}

impl ExportPolicy {
    /// Wraps a view in a standalone document for the engine. The view is
    /// already inline-styled; the only stylesheet here is page-level.
    ///
    /// The outer box is the printed content area (`content_width_mm`, offset
    /// inside the margins); the inner box lays the view out at the logical
    /// window width.
    pub fn document(&self, view: &str) -> String {
        let pagination_css = match self.pagination {
            PaginationMode::Text => {
                "p, pre { orphans: 2; widows: 2; } h1, h2 { page-break-after: avoid; }"
            }
            PaginationMode::Slice => "",
        };
        format!(
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\">\
             <style>body {{ margin: 0; }} {pagination_css}</style></head>\
             <body><div style=\"max-width: {content}mm; overflow: hidden; margin: {y}mm 0 0 {x}mm;\">\
             <div style=\"width: {width}px;\">{view}</div></div></body></html>",
            content = self.content_width_mm,
            width = self.window_width_px,
            x = self.offset_x_mm,
            y = self.offset_y_mm,
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Errors and artifacts
// ────────────────────────────────────────────────────────────────────────────

/// Export failures. `Display` is the message shown to the user.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PDF generation library not loaded. Please try again.")]
    EngineUnavailable,

    #[error("Nothing to export.")]
    NothingToExport,

    /// Engine detail stays in the logs, not in the user-facing message.
    #[error("PDF generation failed.")]
    Engine(#[from] EngineError),
}

/// Handed to the engine for a single export.
#[derive(Debug)]
pub struct RenderJob<'a> {
    pub document: String,
    pub policy: &'a ExportPolicy,
}

#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub filename: &'static str,
    pub bytes: Bytes,
}

// ────────────────────────────────────────────────────────────────────────────
// Adapter
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct ExportAdapter {
    engine: Arc<dyn RenderingEngine>,
    policy: ExportPolicy,
}

impl ExportAdapter {
    pub fn new(engine: Arc<dyn RenderingEngine>) -> Self {
        Self::with_policy(engine, ExportPolicy::default())
    }

    pub fn with_policy(engine: Arc<dyn RenderingEngine>, policy: ExportPolicy) -> Self {
        Self { engine, policy }
    }

    /// Exports `source_view` as `kind`. Both preconditions (engine loaded, view
    /// present) are checked before the engine is called.
    pub async fn export(
        &self,
        source_view: Option<&str>,
        kind: DocumentKind,
    ) -> Result<ExportArtifact, ExportError> {
        if !self.engine.is_available().await {
            warn!(
                "Export of {} aborted: {} engine unavailable",
                kind.filename(),
                self.engine.name()
            );
            return Err(ExportError::EngineUnavailable);
        }

        let view = match source_view {
            Some(v) if !v.trim().is_empty() => v,
            _ => {
                warn!("Export of {} aborted: no source view", kind.filename());
                return Err(ExportError::NothingToExport);
            }
        };

        let job = RenderJob {
            document: self.policy.document(view),
            policy: &self.policy,
        };

        let bytes = self.engine.render(&job).await.map_err(|e| {
            error!("{} engine failed for {}: {e}", self.engine.name(), kind.filename());
            ExportError::Engine(e)
        })?;

        info!(
            "Exported {} ({} bytes) via {}",
            kind.filename(),
            bytes.len(),
            self.engine.name()
        );

        Ok(ExportArtifact {
            filename: kind.filename(),
            bytes,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    /// Engine double that records calls and returns canned bytes.
    pub(crate) struct FakeEngine {
        pub available: bool,
        pub fail: bool,
        pub calls: AtomicUsize,
        pub last_document: std::sync::Mutex<Option<String>>,
    }

    impl FakeEngine {
        pub(crate) fn working() -> Self {
            Self {
                available: true,
                fail: false,
                calls: AtomicUsize::new(0),
                last_document: std::sync::Mutex::new(None),
            }
        }

        pub(crate) fn unavailable() -> Self {
            Self {
                available: false,
                ..Self::working()
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                fail: true,
                ..Self::working()
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RenderingEngine for FakeEngine {
        fn name(&self) -> &'static str {
            "fake"
        }

        async fn is_available(&self) -> bool {
            self.available
        }

        async fn render(&self, job: &RenderJob<'_>) -> Result<Bytes, EngineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_document.lock().unwrap() = Some(job.document.clone());
            if self.fail {
                return Err(EngineError::Failed {
                    status: Some(1),
                    stderr: "boom".to_string(),
                });
            }
            Ok(Bytes::from_static(b"%PDF-1.4 fake"))
        }
    }

    #[test]
    fn test_filenames_per_kind() {
        assert_eq!(DocumentKind::Resume.filename(), "resume.pdf");
        assert_eq!(DocumentKind::CoverLetter.filename(), "cover-letter.pdf");
    }

    #[test]
    fn test_default_policy_is_a4_with_text_pagination() {
        let policy = ExportPolicy::default();
        assert_eq!(policy.page, A4);
        assert_eq!(policy.margins, Margins::uniform(10.0));
        assert_eq!(policy.scale, 0.275);
        assert_eq!(policy.content_width_mm, 190.0);
        assert_eq!(policy.window_width_px, 650);
        assert_eq!(policy.pagination, PaginationMode::Text);
    }

    #[test]
    fn test_document_wraps_view_at_window_width() {
        let doc = ExportPolicy::default().document("<p>hi</p>");
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<p>hi</p>"));
        assert!(doc.contains("width: 650px"));
        assert!(doc.contains("max-width: 190mm"));
        assert!(doc.contains("orphans: 2"));
    }

    #[test]
    fn test_content_width_shapes_document() {
        let narrow = ExportPolicy {
            content_width_mm: 100.0,
            ..ExportPolicy::default()
        };
        let doc = narrow.document("<p>hi</p>");
        assert!(doc.contains("max-width: 100mm"));
        assert_ne!(doc, ExportPolicy::default().document("<p>hi</p>"));
    }

    #[test]
    fn test_slice_pagination_drops_text_break_rules() {
        let policy = ExportPolicy {
            pagination: PaginationMode::Slice,
            ..ExportPolicy::default()
        };
        assert!(!policy.document("<p>x</p>").contains("orphans"));
    }

    #[tokio::test]
    async fn test_export_produces_named_artifact() {
        let engine = Arc::new(FakeEngine::working());
        let adapter = ExportAdapter::new(engine.clone());

        let artifact = adapter
            .export(Some("<div>resume</div>"), DocumentKind::Resume)
            .await
            .unwrap();

        assert_eq!(artifact.filename, "resume.pdf");
        assert!(artifact.bytes.starts_with(b"%PDF"));
        assert_eq!(engine.calls(), 1);
        let sent = engine.last_document.lock().unwrap().clone().unwrap();
        assert!(sent.contains("<div>resume</div>"));
    }

    #[tokio::test]
    async fn test_unavailable_engine_reports_one_error_and_never_renders() {
        let engine = Arc::new(FakeEngine::unavailable());
        let adapter = ExportAdapter::new(engine.clone());

        let result = adapter
            .export(Some("<div>resume</div>"), DocumentKind::Resume)
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, ExportError::EngineUnavailable));
        assert_eq!(
            err.to_string(),
            "PDF generation library not loaded. Please try again."
        );
        assert_eq!(engine.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_view_is_nothing_to_export() {
        let engine = Arc::new(FakeEngine::working());
        let adapter = ExportAdapter::new(engine.clone());

        let missing = adapter.export(None, DocumentKind::CoverLetter).await;
        assert!(matches!(missing, Err(ExportError::NothingToExport)));

        let blank = adapter.export(Some("   "), DocumentKind::Resume).await;
        assert!(matches!(blank, Err(ExportError::NothingToExport)));
        assert_eq!(engine.calls(), 0);
    }

    #[tokio::test]
    async fn test_engine_failure_is_reported_without_retry() {
        let engine = Arc::new(FakeEngine::failing());
        let adapter = ExportAdapter::new(engine.clone());

        let result = adapter.export(Some("<p>x</p>"), DocumentKind::Resume).await;
        let err = result.unwrap_err();
        assert!(matches!(err, ExportError::Engine(_)));
        assert_eq!(err.to_string(), "PDF generation failed.");
        assert!(!err.to_string().contains("boom"));
        assert_eq!(engine.calls(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_exports_are_independent() {
        let engine = Arc::new(FakeEngine::working());
        let adapter = ExportAdapter::new(engine.clone());

        let (a, b) = tokio::join!(
            adapter.export(Some("<p>a</p>"), DocumentKind::Resume),
            adapter.export(Some("<p>b</p>"), DocumentKind::CoverLetter),
        );
        assert_eq!(a.unwrap().filename, "resume.pdf");
        assert_eq!(b.unwrap().filename, "cover-letter.pdf");
        assert_eq!(engine.calls(), 2);
    }
}
