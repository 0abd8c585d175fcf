pub mod download;
pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::preview::handlers as previews;
use crate::resumes::handlers as resumes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume API
        .route(
            "/api/v1/resumes",
            get(resumes::handle_list_resumes).post(resumes::handle_create_resume),
        )
        .route(
            "/api/v1/resumes/:id",
            get(resumes::handle_get_resume)
                .put(resumes::handle_update_resume)
                .delete(resumes::handle_delete_resume),
        )
        .route(
            "/api/v1/resumes/:id/render",
            get(resumes::handle_render_resume),
        )
        .route(
            "/api/v1/resumes/:id/export",
            post(resumes::handle_export_resume),
        )
        // Preview API
        .route("/api/v1/previews", post(previews::handle_open_preview))
        .route(
            "/api/v1/previews/:session_id",
            get(previews::handle_get_preview)
                .patch(previews::handle_update_preview)
                .delete(previews::handle_close_preview),
        )
        .route(
            "/api/v1/previews/:session_id/export",
            post(previews::handle_export_preview),
        )
        .with_state(state)
}
