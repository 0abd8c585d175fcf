use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use crate::models::resume::ResumeRecord;
use crate::render::{compose, ActiveView, ComposedDocument, DocumentKind, TemplateId};

/// One preview: a cached record plus the options it is composed with.
#[derive(Debug)]
pub struct PreviewSession {
    id: Uuid,
    owner: Uuid,
    record: ResumeRecord,
    include_cover_letter: bool,
    document: ComposedDocument,
    last_touched: Instant,
}

/// Client-facing view of a session. `cover_view` is only filled in while the
/// cover letter is the active view.
#[derive(Debug, Serialize)]
pub struct PreviewSnapshot {
    pub session_id: Uuid,
    pub resume_id: Uuid,
    pub template: TemplateId,
    pub include_cover_letter: bool,
    pub active_view: ActiveView,
    pub main_view: String,
    pub cover_view: Option<String>,
}

impl PreviewSession {
    /// Opens a session on `record` with the résumé view active.
    pub fn open(
        owner: Uuid,
        record: ResumeRecord,
        template: TemplateId,
        include_cover_letter: bool,
    ) -> Self {
        let document = compose(&record, template, include_cover_letter);
        Self {
            id: Uuid::new_v4(),
            owner,
            record,
            include_cover_letter,
            document,
            last_touched: Instant::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn owner(&self) -> Uuid {
        self.owner
    }

    pub fn record_id(&self) -> Uuid {
        self.record.id
    }

    #[cfg(test)]
    pub fn document(&self) -> &ComposedDocument {
        &self.document
    }

    /// Replaces the cached record. Everything derived from the previous record
    /// is discarded and options return to their defaults.
    pub fn load(&mut self, record: ResumeRecord) {
        debug!("Preview {} reset for resume {}", self.id, record.id);
        self.record = record;
        self.include_cover_letter = true;
        self.document = compose(&self.record, TemplateId::default(), true);
    }

    /// Re-renders the cached record with another template. Keeps the active view.
    pub fn switch_template(&mut self, template: TemplateId) {
        self.recompose(template);
    }

    pub fn set_include_cover_letter(&mut self, include: bool) {
        if include != self.include_cover_letter {
            self.include_cover_letter = include;
            self.recompose(self.document.template());
        }
    }

    pub fn select(&mut self, view: ActiveView) {
        self.document.select(view);
    }

    /// Owned copy of the active view's markup and the kind it exports as.
    pub fn export_source(&self) -> (Option<String>, DocumentKind) {
        (
            self.document.active_markup().map(str::to_string),
            self.document.active_view().document_kind(),
        )
    }

    pub fn snapshot(&self) -> PreviewSnapshot {
        let active_view = self.document.active_view();
        PreviewSnapshot {
            session_id: self.id,
            resume_id: self.record.id,
            template: self.document.template(),
            include_cover_letter: self.include_cover_letter,
            active_view,
            main_view: self.document.main_view().to_string(),
            cover_view: match active_view {
                ActiveView::CoverLetter => self.document.cover_view().map(str::to_string),
                ActiveView::Resume => None,
            },
        }
    }

    fn recompose(&mut self, template: TemplateId) {
        let active = self.document.active_view();
        self.document = compose(&self.record, template, self.include_cover_letter);
        self.document.select(active);
    }
}

/// Sessions untouched for this long are dropped.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// All open preview sessions, keyed by session id and visible only to their owner.
/// Idle sessions are evicted on every `insert` and on access.
#[derive(Clone)]
pub struct PreviewSessions {
    inner: Arc<RwLock<HashMap<Uuid, PreviewSession>>>,
    idle_timeout: Duration,
}

impl Default for PreviewSessions {
    fn default() -> Self {
        Self::with_idle_timeout(DEFAULT_IDLE_TIMEOUT)
    }
}

impl PreviewSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout,
        }
    }

    pub async fn insert(&self, session: PreviewSession) -> PreviewSnapshot {
        let snapshot = session.snapshot();
        let mut sessions = self.inner.write().await;

        let before = sessions.len();
        sessions.retain(|_, s| s.last_touched.elapsed() < self.idle_timeout);
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!("Evicted {evicted} idle preview sessions");
        }

        sessions.insert(session.id(), session);
        snapshot
    }

    /// Runs `f` against the owner's session and marks it as used. `None` when
    /// the session is unknown, idle past the timeout, or belongs to someone else.
    pub async fn with_session<R>(
        &self,
        owner: Uuid,
        id: Uuid,
        f: impl FnOnce(&mut PreviewSession) -> R,
    ) -> Option<R> {
        let mut sessions = self.inner.write().await;

        let expired = sessions
            .get(&id)
            .is_some_and(|s| s.last_touched.elapsed() >= self.idle_timeout);
        if expired {
            sessions.remove(&id);
            return None;
        }

        let session = sessions.get_mut(&id).filter(|s| s.owner() == owner)?;
        session.last_touched = Instant::now();
        Some(f(session))
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn remove(&self, owner: Uuid, id: Uuid) -> bool {
        let mut sessions = self.inner.write().await;
        let owned = sessions.get(&id).is_some_and(|s| s.owner() == owner);
        if owned {
            sessions.remove(&id);
        }
        owned
    }
}
