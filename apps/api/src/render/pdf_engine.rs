//! Rendering engines — the external rasterizer behind the Export Adapter.
//!
//! Carried in `AppState` as `Arc<dyn RenderingEngine>`. Completion is an explicit
//! `Result`: bytes on success, an `EngineError` describing the failure otherwise.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

use crate::render::export::{ExportPolicy, RenderJob};

/// wkhtmltopdf lays pages out at 96 dpi, i.e. 25.4 / 96 mm per CSS pixel at zoom 1.
const MM_PER_CSS_PX: f32 = 25.4 / 96.0;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("rendering engine is not installed")]
    Unavailable,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("engine exited with status {status:?}: {stderr}")]
    Failed { status: Option<i32>, stderr: String },
}

#[async_trait]
pub trait RenderingEngine: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether the engine can be invoked right now.
    async fn is_available(&self) -> bool;

    /// Rasterizes one document. Called at most once per export.
    async fn render(&self, job: &RenderJob<'_>) -> Result<Bytes, EngineError>;
}

// ────────────────────────────────────────────────────────────────────────────
// wkhtmltopdf
// ────────────────────────────────────────────────────────────────────────────

/// Shells out to a `wkhtmltopdf` binary through a scratch directory.
pub struct WkhtmltopdfEngine {
    binary: PathBuf,
}

impl WkhtmltopdfEngine {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl RenderingEngine for WkhtmltopdfEngine {
    fn name(&self) -> &'static str {
        "wkhtmltopdf"
    }

    async fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    async fn render(&self, job: &RenderJob<'_>) -> Result<Bytes, EngineError> {
        let scratch = tempfile::tempdir()?;
        let input = scratch.path().join("document.html");
        let output = scratch.path().join("document.pdf");
        tokio::fs::write(&input, job.document.as_bytes()).await?;

        let args = wkhtmltopdf_args(job.policy);
        debug!("Running {} {}", self.binary.display(), args.join(" "));

        let result = Command::new(&self.binary)
            .args(&args)
            .arg(&input)
            .arg(&output)
            .stdin(Stdio::null())
            .output()
            .await?;

        if !result.status.success() {
            return Err(EngineError::Failed {
                status: result.status.code(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        let pdf = tokio::fs::read(&output).await?;
        Ok(Bytes::from(pdf))
    }
}

/// Translates the export policy into wkhtmltopdf flags.
fn wkhtmltopdf_args(policy: &ExportPolicy) -> Vec<String> {
    let m = &policy.margins;
    // Policy scale is mm per CSS px; wkhtmltopdf wants a multiplier of its native size.
    let zoom = policy.scale / MM_PER_CSS_PX;
    vec![
        "--quiet".to_string(),
        "--encoding".to_string(),
        "utf-8".to_string(),
        "--page-size".to_string(),
        policy.page.name.to_string(),
        "--margin-top".to_string(),
        format!("{}mm", m.top_mm),
        "--margin-right".to_string(),
        format!("{}mm", m.right_mm),
        "--margin-bottom".to_string(),
        format!("{}mm", m.bottom_mm),
        "--margin-left".to_string(),
        format!("{}mm", m.left_mm),
        "--viewport-size".to_string(),
        format!("{}x{}", policy.window_width_px, viewport_height(policy)),
        "--zoom".to_string(),
        format!("{zoom:.3}"),
        "--disable-smart-shrinking".to_string(),
    ]
}

/// Viewport height matching the page aspect ratio at the logical window width.
fn viewport_height(policy: &ExportPolicy) -> u32 {
    let ratio = policy.page.height_mm / policy.page.width_mm;
    (policy.window_width_px as f32 * ratio).round() as u32
}

// ────────────────────────────────────────────────────────────────────────────
// Unavailable
// ────────────────────────────────────────────────────────────────────────────

/// Stand-in when no rasterizer is configured. Every export reports the engine
/// as not loaded.
pub struct UnavailableEngine;

#[async_trait]
impl RenderingEngine for UnavailableEngine {
    fn name(&self) -> &'static str {
        "none"
    }

    async fn is_available(&self) -> bool {
        false
    }

    async fn render(&self, _job: &RenderJob<'_>) -> Result<Bytes, EngineError> {
        Err(EngineError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_carry_page_and_margins() {
        let args = wkhtmltopdf_args(&ExportPolicy::default());
        let pos = |flag: &str| args.iter().position(|a| a == flag).unwrap();

        assert_eq!(args[pos("--page-size") + 1], "A4");
        assert_eq!(args[pos("--margin-top") + 1], "10mm");
        assert_eq!(args[pos("--margin-left") + 1], "10mm");
        assert_eq!(args[pos("--viewport-size") + 1], "650x919");
    }

    #[test]
    fn test_zoom_converts_mm_per_px_scale() {
        let args = wkhtmltopdf_args(&ExportPolicy::default());
        let zoom_at = args.iter().position(|a| a == "--zoom").unwrap();
        let zoom: f32 = args[zoom_at + 1].parse().unwrap();
        // 0.275 mm/px against a native 0.2646 mm/px.
        assert!((zoom - 1.039).abs() < 0.002, "zoom was {zoom}");
    }

    #[tokio::test]
    async fn test_missing_binary_is_unavailable() {
        let engine = WkhtmltopdfEngine::new("/nonexistent/wkhtmltopdf-for-tests");
        assert!(!engine.is_available().await);
    }

    #[tokio::test]
    async fn test_unavailable_engine_never_renders() {
        let engine = UnavailableEngine;
        assert!(!engine.is_available().await);
        let policy = ExportPolicy::default();
        let job = RenderJob {
            document: policy.document("<p>x</p>"),
            policy: &policy,
        };
        assert!(matches!(
            engine.render(&job).await,
            Err(EngineError::Unavailable)
        ));
    }
}
