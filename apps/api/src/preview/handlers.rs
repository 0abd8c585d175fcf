//! Axum route handlers for preview sessions.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::CurrentUser;
use crate::preview::session::{PreviewSession, PreviewSnapshot};
use crate::render::{ActiveView, ExportArtifact, TemplateId};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct OpenPreviewRequest {
    pub resume_id: Uuid,
    pub template: Option<String>,
    pub include_cover_letter: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePreviewRequest {
    /// Loading a different résumé resets the session.
    pub resume_id: Option<Uuid>,
    pub template: Option<String>,
    pub include_cover_letter: Option<bool>,
    pub active_view: Option<ActiveView>,
}

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Preview session {id} not found"))
}

/// POST /api/v1/previews
pub async fn handle_open_preview(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<OpenPreviewRequest>,
) -> Result<(StatusCode, Json<PreviewSnapshot>), AppError> {
    let record = state.store.get(user.id, req.resume_id).await?;
    let session = PreviewSession::open(
        user.id,
        record,
        TemplateId::parse_opt(req.template.as_deref()),
        req.include_cover_letter.unwrap_or(true),
    );
    let snapshot = state.previews.insert(session).await;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

/// GET /api/v1/previews/:session_id
pub async fn handle_get_preview(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(session_id): Path<Uuid>,
) -> Result<Json<PreviewSnapshot>, AppError> {
    state
        .previews
        .with_session(user.id, session_id, |s| s.snapshot())
        .await
        .map(Json)
        .ok_or_else(|| session_not_found(session_id))
}

/// PATCH /api/v1/previews/:session_id
///
/// A new `resume_id` is fetched from the store before the session is touched,
/// so a failed fetch leaves the session as it was.
pub async fn handle_update_preview(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(session_id): Path<Uuid>,
    Json(req): Json<UpdatePreviewRequest>,
) -> Result<Json<PreviewSnapshot>, AppError> {
    let current = state
        .previews
        .with_session(user.id, session_id, |s| s.record_id())
        .await
        .ok_or_else(|| session_not_found(session_id))?;

    let replacement = match req.resume_id {
        Some(id) if id != current => Some(state.store.get(user.id, id).await?),
        _ => None,
    };

    state
        .previews
        .with_session(user.id, session_id, move |s| {
            if let Some(record) = replacement {
                s.load(record);
            }
            if let Some(include) = req.include_cover_letter {
                s.set_include_cover_letter(include);
            }
            if let Some(name) = req.template.as_deref() {
                s.switch_template(TemplateId::parse(name));
            }
            if let Some(view) = req.active_view {
                s.select(view);
            }
            s.snapshot()
        })
        .await
        .map(Json)
        .ok_or_else(|| session_not_found(session_id))
}

/// POST /api/v1/previews/:session_id/export
///
/// Exports whichever view is active. The session lock is released before the
/// engine runs.
pub async fn handle_export_preview(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(session_id): Path<Uuid>,
) -> Result<ExportArtifact, AppError> {
    let (markup, kind) = state
        .previews
        .with_session(user.id, session_id, |s| s.export_source())
        .await
        .ok_or_else(|| session_not_found(session_id))?;

    Ok(state.exporter.export(markup.as_deref(), kind).await?)
}

/// DELETE /api/v1/previews/:session_id
pub async fn handle_close_preview(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.previews.remove(user.id, session_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_not_found(session_id))
    }
}
