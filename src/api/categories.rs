//! Category API endpoints.
//!
//! Category edits mutate the in-memory document only; they are persisted by
//! the next post save or an explicit sync.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{error, success, ApiResult};
use crate::models::{Category, CreateCategoryRequest, ReorderChildRequest, SubCategory};
use crate::AppState;

/// GET /api/categories - The full two-level category tree.
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Vec<Category>> {
    let revision = state.store.revision().await;
    success(state.store.categories().await, revision)
}

/// POST /api/categories - Add a top-level category.
pub async fn create_category(
    State(state): State<AppState>,
    Json(request): Json<CreateCategoryRequest>,
) -> ApiResult<Category> {
    let revision = state.store.revision().await;

    match state.store.add_root_category(&request.name).await {
        Ok(category) => success(category, revision),
        Err(e) => error(e, revision),
    }
}

/// POST /api/categories/:id/children - Add a sub-category under a parent.
pub async fn create_sub_category(
    State(state): State<AppState>,
    Path(parent_id): Path<i64>,
    Json(request): Json<CreateCategoryRequest>,
) -> ApiResult<SubCategory> {
    let revision = state.store.revision().await;

    match state.store.add_sub_category(parent_id, &request.name).await {
        Ok(sub) => success(sub, revision),
        Err(e) => error(e, revision),
    }
}

/// PUT /api/categories/:id/children/reorder - Swap a child with its
/// neighbor. Returns whether a swap happened; an out-of-bounds move is a
/// successful no-op.
pub async fn reorder_children(
    State(state): State<AppState>,
    Path(parent_id): Path<i64>,
    Json(request): Json<ReorderChildRequest>,
) -> ApiResult<bool> {
    let revision = state.store.revision().await;

    match state
        .store
        .reorder_child(parent_id, request.index, request.direction.offset())
        .await
    {
        Ok(moved) => success(moved, revision),
        Err(e) => error(e, revision),
    }
}

/// DELETE /api/categories/:id - Delete a top-level category. Posts under its
/// children are kept with dangling references.
pub async fn delete_category(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    let revision = state.store.revision().await;

    match state.store.delete_root_category(id).await {
        Ok(()) => success((), revision),
        Err(e) => error(e, revision),
    }
}

/// DELETE /api/subcategories/:id - Delete a sub-category from every parent.
pub async fn delete_sub_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<()> {
    let revision = state.store.revision().await;

    match state.store.delete_sub_category(id).await {
        Ok(()) => success((), revision),
        Err(e) => error(e, revision),
    }
}
