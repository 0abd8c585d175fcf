// Rendering pipeline: record → template markup → composed views → PDF artifact.
// Template rendering and composition are pure; only the engine touches the outside world.

pub mod composer;
pub mod export;
pub mod pdf_engine;
pub mod template;

pub use composer::{compose, ActiveView, ComposedDocument};
pub use export::{DocumentKind, ExportAdapter, ExportArtifact, ExportError};
pub use pdf_engine::{RenderingEngine, UnavailableEngine, WkhtmltopdfEngine};
pub use template::{render_template, TemplateId};
