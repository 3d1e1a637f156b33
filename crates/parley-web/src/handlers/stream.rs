use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Redirect, Response,
    },
    Form, Json,
};
use futures::stream::{Stream, StreamExt};
use parley_session::{ReplyStream, SessionError, SessionState};
use parley_types::ChatRecord;
use serde::Deserialize;
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;

use crate::{
    error::ApiResult,
    render::page::{self, PageContext},
    routes::{pages::back_to, sessions::find_session},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

/// What one chat turn produces, in order: fragments, then exactly one of
/// `Done` or `Failed`
#[derive(Debug)]
pub enum TurnEvent {
    Fragment(String),
    Done(ChatRecord),
    Failed(SessionError),
}

/// Drive a started turn to completion while holding the session lock
///
/// The session stays locked until the stream is dropped, so interactions on
/// the same session wait for the reply.
pub fn run_turn(
    mut session: OwnedMutexGuard<SessionState>,
    mut reply: ReplyStream,
) -> impl Stream<Item = TurnEvent> + Send {
    async_stream::stream! {
        let mut failure = None;
        while let Some(fragment) = reply.next_fragment().await {
            match fragment {
                Ok(text) => yield TurnEvent::Fragment(text),
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        match failure {
            Some(e) => yield TurnEvent::Failed(e),
            None => match reply.finish(&mut session) {
                Ok(record) => yield TurnEvent::Done(record),
                Err(e) => yield TurnEvent::Failed(e),
            },
        }
    }
}

/// Send a message from the chat form and stream the page as the reply arrives
pub async fn send_message_page(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Form(form): Form<SendMessageRequest>,
) -> Response {
    let Some(handle) = state.sessions.get(&session_id).await else {
        return Redirect::to("/").into_response();
    };
    if form.content.is_empty() {
        return back_to(&session_id).into_response();
    }

    let app_title = state.config.ui.app_title.clone();
    let mut session = handle.lock_owned().await;

    let reply = match state.coordinator.begin_turn(&mut session, &form.content).await {
        Ok(reply) => reply,
        Err(e) => {
            let ctx = PageContext {
                app_title: &app_title,
                session_id: &session_id,
            };
            let mut html = page::page_start(ctx, &session.render());
            html.push_str(&page::error_notice(&e.to_string()));
            html.push_str(&page::page_end(ctx));
            return (StatusCode::BAD_GATEWAY, axum::response::Html(html)).into_response();
        }
    };

    let head = page::page_start(
        PageContext {
            app_title: &app_title,
            session_id: &session_id,
        },
        &session.render(),
    );

    let body = async_stream::stream! {
        yield Ok::<String, Infallible>(head);
        yield Ok(page::assistant_open().to_string());

        let mut turn = Box::pin(run_turn(session, reply));
        while let Some(event) = turn.next().await {
            match event {
                TurnEvent::Fragment(text) => yield Ok(page::fragment(&text)),
                TurnEvent::Done(_) => yield Ok(page::bubble_close().to_string()),
                TurnEvent::Failed(e) => {
                    yield Ok(page::bubble_close().to_string());
                    yield Ok(page::error_notice(&e.to_string()));
                }
            }
        }
        drop(turn);

        let ctx = PageContext {
            app_title: &app_title,
            session_id: &session_id,
        };
        yield Ok(page::page_end(ctx));
    };

    (
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        Body::from_stream(body),
    )
        .into_response()
}

/// Send a message and stream the reply as Server-Sent Events
///
/// Events: `message` per fragment, then `done` with the full reply or
/// `error` if the backend stream broke.
pub async fn send_message_stream(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let handle = find_session(&state, &session_id).await?;
    let mut session = handle.lock_owned().await;
    let reply = state.coordinator.begin_turn(&mut session, &req.content).await?;

    let sse_stream = run_turn(session, reply).map(|event| {
        let sse_event = match event {
            TurnEvent::Fragment(content) => sse_event("message", json!({ "content": content })),
            TurnEvent::Done(record) => sse_event("done", json!({ "content": record.content })),
            TurnEvent::Failed(e) => sse_event("error", json!({ "error": e.to_string() })),
        };
        Ok::<Event, Infallible>(sse_event)
    });

    Ok(Sse::new(sse_stream).keep_alive(KeepAlive::default()))
}

fn sse_event(name: &str, data: serde_json::Value) -> Event {
    Event::default().event(name).data(data.to_string())
}
