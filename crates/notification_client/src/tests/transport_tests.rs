use super::*;
use std::convert::Infallible;

use anyhow::Result;
use axum::{
    extract::State,
    http::HeaderMap,
    response::sse::{Event, Sse},
    routing::get,
    Router,
};
use tokio::net::TcpListener;

async fn spawn_server(app: Router) -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

type SeenIds = Arc<Mutex<Vec<Option<String>>>>;

async fn resumable_handler(
    State(seen): State<SeenIds>,
    headers: HeaderMap,
) -> Sse<impl futures::Stream<Item = Result<Event, Infallible>>> {
    let last_id = headers
        .get(LAST_EVENT_ID)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    seen.lock().await.push(last_id);
    let events = vec![Ok(Event::default().event("unreadCount").id("7").data("2"))];
    Sse::new(futures::stream::iter(events))
}

async fn drain(mut stream: PushStream) -> Vec<Result<StreamMessage, TransportError>> {
    let mut items = Vec::new();
    while let Some(item) = stream.next().await {
        items.push(item);
    }
    items
}

#[tokio::test]
async fn reconnect_resumes_from_last_seen_event_id() {
    let seen = SeenIds::default();
    let app = Router::new()
        .route("/api/notifications/subscribe", get(resumable_handler))
        .with_state(seen.clone());
    let base_url = spawn_server(app).await.expect("server");
    let transport = HttpPushTransport::new(Client::new(), &base_url);

    let first = drain(transport.open().await.expect("first open")).await;
    assert!(matches!(
        first.first(),
        Some(Ok(StreamMessage::Event(SseFrame { id: Some(id), .. }))) if id == "7"
    ));
    assert!(matches!(first.last(), Some(Err(TransportError::Ended))));

    drop(transport.open().await.expect("second open"));

    assert_eq!(*seen.lock().await, vec![None, Some("7".to_string())]);
}

#[tokio::test]
async fn error_status_is_rejected() {
    let app = Router::new().route(
        "/api/notifications/subscribe",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let base_url = spawn_server(app).await.expect("server");

    let result = HttpPushTransport::new(Client::new(), &base_url).open().await;

    assert!(matches!(
        result,
        Err(TransportError::Status(StatusCode::INTERNAL_SERVER_ERROR))
    ));
}

#[tokio::test]
async fn non_event_stream_response_is_rejected() {
    let app = Router::new().route("/api/notifications/subscribe", get(|| async { "ok" }));
    let base_url = spawn_server(app).await.expect("server");

    let result = HttpPushTransport::new(Client::new(), &base_url).open().await;

    let Err(TransportError::ContentType(content_type)) = result else {
        panic!("expected a content type rejection");
    };
    assert!(content_type.starts_with("text/plain"));
}
