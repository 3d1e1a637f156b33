use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use parley_session::RenderModel;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    sessions::SessionHandle,
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
    pub state: RenderModel,
}

#[derive(Debug, Deserialize)]
pub struct SetThemeRequest {
    pub theme: parley_types::Theme,
}

pub(crate) async fn find_session(state: &AppState, session_id: &str) -> ApiResult<SessionHandle> {
    state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| ApiError::SessionNotFound(session_id.to_string()))
}

/// Create a session seeded from the backend's thread registry
pub async fn create_session(
    State(state): State<Arc<AppState>>,
) -> ApiResult<(StatusCode, Json<CreateSessionResponse>)> {
    let session = state.coordinator.start_session().await?;
    let snapshot = session.render();
    let session_id = state.sessions.insert(session).await;
    tracing::info!(session_id = %session_id, "Session created");

    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id,
            state: snapshot,
        }),
    ))
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<RenderModel>> {
    let handle = find_session(&state, &session_id).await?;
    let snapshot = handle.lock().await.render();
    Ok(Json(snapshot))
}

/// "New Chat"
pub async fn new_thread(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<RenderModel>> {
    let handle = find_session(&state, &session_id).await?;
    let mut session = handle.lock().await;
    state.coordinator.new_chat(&mut session);
    Ok(Json(session.render()))
}

pub async fn select_thread(
    State(state): State<Arc<AppState>>,
    Path((session_id, thread_id)): Path<(String, String)>,
) -> ApiResult<Json<RenderModel>> {
    let handle = find_session(&state, &session_id).await?;
    let mut session = handle.lock().await;
    state
        .coordinator
        .select_thread(&mut session, &thread_id)
        .await?;
    Ok(Json(session.render()))
}

pub async fn delete_thread(
    State(state): State<Arc<AppState>>,
    Path((session_id, thread_id)): Path<(String, String)>,
) -> ApiResult<Json<RenderModel>> {
    let handle = find_session(&state, &session_id).await?;
    let mut session = handle.lock().await;
    state.coordinator.delete_thread(&mut session, &thread_id)?;
    Ok(Json(session.render()))
}

pub async fn set_theme(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(req): Json<SetThemeRequest>,
) -> ApiResult<Json<RenderModel>> {
    let handle = find_session(&state, &session_id).await?;
    let mut session = handle.lock().await;
    session.set_theme(req.theme);
    Ok(Json(session.render()))
}
