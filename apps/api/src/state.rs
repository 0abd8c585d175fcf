use std::sync::Arc;

use crate::config::Config;
use crate::identity::IdentityResolver;
use crate::preview::PreviewSessions;
use crate::render::ExportAdapter;
use crate::store::RecordStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable record store. PostgreSQL when `DATABASE_URL` is set, in-memory otherwise.
    pub store: Arc<dyn RecordStore>,
    pub identity: Arc<dyn IdentityResolver>,
    /// Export policy plus the rendering engine it drives.
    pub exporter: ExportAdapter,
    /// Open preview sessions. Scoped per session, never a process-wide "current record".
    pub previews: PreviewSessions,
    pub config: Config,
}
