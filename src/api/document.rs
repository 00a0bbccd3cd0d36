//! Document-level API endpoints: snapshot, revision, reload, and sync.

use axum::extract::State;
use serde::Serialize;

use super::{error, success, ApiResult};
use crate::models::Document;
use crate::AppState;

/// Revision marker of the remote document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionInfo {
    pub revision: Option<String>,
}

/// GET /api/document - Get the full in-memory document.
pub async fn get_document(State(state): State<AppState>) -> ApiResult<Document> {
    let revision = state.store.revision().await;
    success(state.store.document().await, revision)
}

/// GET /api/document/revision - Get the current revision marker.
pub async fn get_revision(State(state): State<AppState>) -> ApiResult<RevisionInfo> {
    let revision = state.store.revision().await;
    success(
        RevisionInfo {
            revision: revision.clone(),
        },
        revision,
    )
}

/// POST /api/document/reload - Re-load the document from the repository,
/// discarding local unsaved edits.
pub async fn reload_document(State(state): State<AppState>) -> ApiResult<Document> {
    let revision = state.store.revision().await;

    match state.store.load().await {
        Ok(document) => {
            let new_revision = state.store.revision().await;
            success(document, new_revision)
        }
        Err(e) => error(e, revision),
    }
}

/// POST /api/sync - Persist the current document wholesale.
pub async fn sync_document(State(state): State<AppState>) -> ApiResult<RevisionInfo> {
    let revision = state.store.revision().await;

    match state.store.sync().await {
        Ok(sha) => success(
            RevisionInfo {
                revision: Some(sha.clone()),
            },
            Some(sha),
        ),
        Err(e) => error(e, revision),
    }
}
