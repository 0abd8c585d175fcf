//! Axum route handlers for the Resume API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{ResumeFields, ResumeRecord, ResumeSummary};
use crate::models::user::CurrentUser;
use crate::render::{compose, render_template, ActiveView, DocumentKind, ExportArtifact, TemplateId};
use crate::resumes::validation::validate_fields;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RenderQuery {
    pub template: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportRequest {
    pub template: Option<String>,
    #[serde(default)]
    pub kind: DocumentKind,
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<ResumeSummary>>, AppError> {
    let records = state.store.list(user.id).await?;
    Ok(Json(records.iter().map(ResumeSummary::from).collect()))
}

/// POST /api/v1/resumes
pub async fn handle_create_resume(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(fields): Json<ResumeFields>,
) -> Result<(StatusCode, Json<ResumeRecord>), AppError> {
    validate_fields(&fields)?;
    let record = state.store.create(user.id, fields).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeRecord>, AppError> {
    Ok(Json(state.store.get(user.id, id).await?))
}

/// PUT /api/v1/resumes/:id
///
/// Overwrites every section field.
pub async fn handle_update_resume(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(fields): Json<ResumeFields>,
) -> Result<StatusCode, AppError> {
    validate_fields(&fields)?;
    state.store.update(user.id, id, fields).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.store.delete(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/resumes/:id/render?template=
///
/// Unknown template names render with the default template.
pub async fn handle_render_resume(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Query(query): Query<RenderQuery>,
) -> Result<Html<String>, AppError> {
    let record = state.store.get(user.id, id).await?;
    let template = TemplateId::parse_opt(query.template.as_deref());
    Ok(Html(render_template(&record, template)))
}

/// POST /api/v1/resumes/:id/export
///
/// One-shot export without a preview session.
pub async fn handle_export_resume(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<ExportRequest>,
) -> Result<ExportArtifact, AppError> {
    let record = state.store.get(user.id, id).await?;
    let template = TemplateId::parse_opt(req.template.as_deref());

    let mut document = compose(&record, template, req.kind == DocumentKind::CoverLetter);
    if req.kind == DocumentKind::CoverLetter {
        document.select(ActiveView::CoverLetter);
    }

    Ok(state.exporter.export(document.active_markup(), req.kind).await?)
}
