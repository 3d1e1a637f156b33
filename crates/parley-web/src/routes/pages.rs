use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use parley_types::Theme;
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{ApiError, PageResult},
    render::{render_page, session_path, PageContext},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct ThemeForm {
    pub theme: String,
}

/// Start a session and send the browser to its page
pub async fn index(State(state): State<Arc<AppState>>) -> PageResult<Redirect> {
    let session = state.coordinator.start_session().await?;
    let session_id = state.sessions.insert(session).await;
    tracing::info!(session_id = %session_id, "Session created");
    Ok(Redirect::to(&session_path(&session_id)))
}

/// Render pass: sidebar, chat log and input box
pub async fn show_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Response {
    let Some(handle) = state.sessions.get(&session_id).await else {
        return Redirect::to("/").into_response();
    };

    let model = handle.lock().await.render();
    let ctx = PageContext {
        app_title: &state.config.ui.app_title,
        session_id: &session_id,
    };
    Html(render_page(ctx, &model)).into_response()
}

pub async fn new_chat(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Redirect {
    if let Some(handle) = state.sessions.get(&session_id).await {
        let mut session = handle.lock().await;
        state.coordinator.new_chat(&mut session);
    }
    back_to(&session_id)
}

pub async fn select_thread(
    State(state): State<Arc<AppState>>,
    Path((session_id, thread_id)): Path<(String, String)>,
) -> PageResult<Redirect> {
    let Some(handle) = state.sessions.get(&session_id).await else {
        return Ok(Redirect::to("/"));
    };

    let mut session = handle.lock().await;
    state
        .coordinator
        .select_thread(&mut session, &thread_id)
        .await?;
    Ok(back_to(&session_id))
}

pub async fn delete_thread(
    State(state): State<Arc<AppState>>,
    Path((session_id, thread_id)): Path<(String, String)>,
) -> PageResult<Redirect> {
    let Some(handle) = state.sessions.get(&session_id).await else {
        return Ok(Redirect::to("/"));
    };

    let mut session = handle.lock().await;
    state.coordinator.delete_thread(&mut session, &thread_id)?;
    Ok(back_to(&session_id))
}

pub async fn set_theme(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Form(form): Form<ThemeForm>,
) -> PageResult<Redirect> {
    let theme: Theme = form
        .theme
        .parse()
        .map_err(|e: parley_types::UnknownTheme| ApiError::BadRequest(e.to_string()))?;

    let Some(handle) = state.sessions.get(&session_id).await else {
        return Ok(Redirect::to("/"));
    };

    handle.lock().await.set_theme(theme);
    tracing::debug!(session_id = %session_id, theme = theme.as_str(), "Theme changed");
    Ok(back_to(&session_id))
}

/// Unknown sessions fall through to `/` when the page is loaded
pub(crate) fn back_to(session_id: &str) -> Redirect {
    Redirect::to(&session_path(session_id))
}
