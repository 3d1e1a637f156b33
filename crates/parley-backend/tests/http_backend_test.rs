use futures::StreamExt;
use mockito::Matcher;
use parley_backend::{BackendError, ConversationBackend, HttpBackend, ThreadRegistry};
use parley_types::{GraphInput, RunConfig, StreamMode};
use std::time::Duration;

fn backend(url: &str) -> HttpBackend {
    HttpBackend::new(url, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_retrieve_all_threads() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/threads")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"threads":["t1","t2"]}"#)
        .create_async()
        .await;

    let threads = backend(&server.url()).retrieve_all_threads().await.unwrap();

    assert_eq!(threads, vec!["t1", "t2"]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_get_state_sends_thread_config() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/threads/t1/state")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "configurable": {"thread_id": "t1"}
        })))
        .with_status(200)
        .with_body(
            r#"{"values":{"messages":[
                {"role":"user","content":"hi"},
                {"role":"assistant","content":"hello"}
            ]}}"#,
        )
        .create_async()
        .await;

    let state = backend(&server.url())
        .get_state(&RunConfig::for_thread("t1"))
        .await
        .unwrap();

    assert_eq!(state.messages().len(), 2);
    assert!(state.messages()[0].is_human());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_get_state_unknown_thread_is_empty() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/threads/missing/state")
        .with_status(404)
        .create_async()
        .await;

    let state = backend(&server.url())
        .get_state(&RunConfig::for_thread("missing"))
        .await
        .unwrap();

    assert!(state.messages().is_empty());
}

#[tokio::test]
async fn test_get_state_server_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/threads/t1/state")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let err = backend(&server.url())
        .get_state(&RunConfig::for_thread("t1"))
        .await
        .unwrap_err();

    match err {
        BackendError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("Expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_stream_yields_fragments_in_order() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/threads/t1/stream")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "input": {"messages": [{"role": "user", "content": "Hello"}]},
            "config": {"configurable": {"thread_id": "t1"}, "run_name": "chat_turn"},
            "stream_mode": "messages"
        })))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(
            "event: messages\ndata: {\"content\":\"Hi\"}\n\n\
             event: messages\ndata: {\"content\":\" there\"}\n\n\
             data: [DONE]\n\n",
        )
        .create_async()
        .await;

    let stream = backend(&server.url())
        .stream(
            GraphInput::human("Hello"),
            RunConfig::chat_turn("t1"),
            StreamMode::Messages,
        )
        .await
        .unwrap();

    let fragments: Vec<String> = stream.map(|c| c.unwrap().content).collect().await;

    assert_eq!(fragments, vec!["Hi", " there"]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_stream_error_frame() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/threads/t1/stream")
        .with_status(200)
        .with_body(
            "data: {\"content\":\"partial\"}\n\n\
             event: error\ndata: {\"error\":\"model overloaded\"}\n\n",
        )
        .create_async()
        .await;

    let results: Vec<_> = backend(&server.url())
        .stream(
            GraphInput::human("x"),
            RunConfig::chat_turn("t1"),
            StreamMode::Messages,
        )
        .await
        .unwrap()
        .collect()
        .await;

    assert_eq!(results.len(), 2);
    assert!(matches!(&results[1], Err(BackendError::Stream(m)) if m == "model overloaded"));
}

#[tokio::test]
async fn test_api_key_header_sent() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/threads")
        .match_header("x-api-key", "secret")
        .with_status(200)
        .with_body(r#"{"threads":[]}"#)
        .create_async()
        .await;

    let threads = backend(&server.url())
        .with_api_key("secret")
        .retrieve_all_threads()
        .await
        .unwrap();

    assert!(threads.is_empty());
    mock.assert_async().await;
}
