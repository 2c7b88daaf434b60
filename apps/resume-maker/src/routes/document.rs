use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::editor::{FieldPath, FieldValue, ListPath};
use crate::errors::AppError;
use crate::models::Document;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct FieldUpdateRequest {
    /// Dotted address, e.g. `experience.0.bullets.1`.
    pub path: String,
    pub value: FieldValue,
}

#[derive(Deserialize)]
pub struct AddItemRequest {
    pub list: String,
    /// Element to append; the list's blank element when absent.
    pub item: Option<serde_json::Value>,
}

#[derive(Deserialize)]
pub struct RemoveItemRequest {
    pub list: String,
    pub index: usize,
}

#[derive(Deserialize)]
pub struct TagRequest {
    pub text: String,
}

/// GET /api/document
pub async fn handle_get_document(State(state): State<AppState>) -> Json<Document> {
    Json(state.session.lock().await.document().clone())
}

/// PATCH /api/document/field
pub async fn handle_update_field(
    State(state): State<AppState>,
    Json(req): Json<FieldUpdateRequest>,
) -> Result<Json<Document>, AppError> {
    let path: FieldPath = req.path.parse()?;
    let mut session = state.session.lock().await;
    session.apply_update(&path, req.value)?;
    Ok(Json(session.document().clone()))
}

/// POST /api/document/items
pub async fn handle_add_item(
    State(state): State<AppState>,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<Document>, AppError> {
    let list: ListPath = req.list.parse()?;
    let item = req.item.map(|v| list.item_from_json(v)).transpose()?;
    let mut session = state.session.lock().await;
    session.add_item(&list, item)?;
    Ok(Json(session.document().clone()))
}

/// DELETE /api/document/items
pub async fn handle_remove_item(
    State(state): State<AppState>,
    Json(req): Json<RemoveItemRequest>,
) -> Result<Json<Document>, AppError> {
    let list: ListPath = req.list.parse()?;
    let mut session = state.session.lock().await;
    session.remove_item(&list, req.index)?;
    Ok(Json(session.document().clone()))
}

/// POST /api/document/skills
pub async fn handle_add_skill(
    State(state): State<AppState>,
    Json(req): Json<TagRequest>,
) -> Json<Document> {
    let mut session = state.session.lock().await;
    session.add_skill(&req.text);
    Json(session.document().clone())
}

/// POST /api/document/projects/:index/tech
pub async fn handle_add_tech(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(req): Json<TagRequest>,
) -> Result<Json<Document>, AppError> {
    let mut session = state.session.lock().await;
    session.add_tech(index, &req.text)?;
    Ok(Json(session.document().clone()))
}

/// POST /api/document/reset
pub async fn handle_reset(State(state): State<AppState>) -> Json<Document> {
    let mut session = state.session.lock().await;
    session.reset();
    Json(session.document().clone())
}
