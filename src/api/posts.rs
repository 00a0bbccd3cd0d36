//! Post API endpoints.
//!
//! Unlike category edits, every post mutation triggers an immediate
//! wholesale save to the repository.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::{error, success, ApiResult};
use crate::models::{CreatePostRequest, Post, UpdatePostRequest};
use crate::AppState;

/// Query parameters for listing posts.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPostsParams {
    #[serde(default)]
    pub category_id: Option<i64>,
}

/// GET /api/posts - List all posts, optionally filtered by sub-category id,
/// preserving newest-first order.
pub async fn list_posts(
    State(state): State<AppState>,
    Query(params): Query<ListPostsParams>,
) -> ApiResult<Vec<Post>> {
    let revision = state.store.revision().await;
    success(state.store.posts(params.category_id).await, revision)
}

/// GET /api/posts/:id - Get a single post.
pub async fn get_post(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Post> {
    let revision = state.store.revision().await;

    match state.store.post(id).await {
        Ok(post) => success(post, revision),
        Err(e) => error(e, revision),
    }
}

/// POST /api/posts - Create a post and persist the document.
pub async fn create_post(
    State(state): State<AppState>,
    Json(request): Json<CreatePostRequest>,
) -> ApiResult<Post> {
    let revision = state.store.revision().await;

    match state
        .store
        .create_post(&request.title, request.content, request.category_id)
        .await
    {
        Ok(post) => {
            let new_revision = state.store.revision().await;
            success(post, new_revision)
        }
        Err(e) => error(e, revision),
    }
}

/// PUT /api/posts/:id - Update a post in place and persist the document.
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdatePostRequest>,
) -> ApiResult<Post> {
    let revision = state.store.revision().await;

    match state
        .store
        .update_post(id, &request.title, request.content, request.category_id)
        .await
    {
        Ok(post) => {
            let new_revision = state.store.revision().await;
            success(post, new_revision)
        }
        Err(e) => error(e, revision),
    }
}

/// DELETE /api/posts/:id - Delete a post and persist the document.
pub async fn delete_post(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    let revision = state.store.revision().await;

    match state.store.delete_post(id).await {
        Ok(()) => {
            let new_revision = state.store.revision().await;
            success((), new_revision)
        }
        Err(e) => error(e, revision),
    }
}
