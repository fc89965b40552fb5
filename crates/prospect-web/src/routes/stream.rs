//! Live event stream over Server-Sent Events.

use crate::state::AppState;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::get;
use axum::Router;
use futures::Stream;
use std::convert::Infallible;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

pub fn stream_routes() -> Router<AppState> {
    Router::new().route("/api/stream", get(event_stream))
}

/// One-way event feed: an initial `connected` frame, then every hub
/// event as a JSON `data:` frame. The connection lives until the client
/// disconnects; a subscriber that lags past its queue loses events but
/// keeps the stream.
async fn event_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.hub.subscribe();
    tracing::debug!(
        subscribers = state.hub.subscriber_count(),
        "SSE client connected"
    );

    let connected = tokio_stream::once(Ok(Event::default().event("connected").data("{}")));

    let feed = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(event) => {
            let data = serde_json::to_string(&event).unwrap_or_else(|_| "{}".to_string());
            Some(Ok(Event::default().data(data)))
        }
        Err(BroadcastStreamRecvError::Lagged(missed)) => {
            tracing::warn!(missed, "SSE client lagged; events dropped");
            None
        }
    });

    Sse::new(connected.chain(feed)).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use prospect_core::{BroadcastHub, FeedEvent, RecordStore};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_stream_holds_a_hub_subscription_for_its_lifetime() {
        let hub = BroadcastHub::new();
        let state = AppState::new(Arc::new(RecordStore::new()), hub.clone());

        assert_eq!(hub.subscriber_count(), 0);
        let sse = event_stream(State(state)).await;
        assert_eq!(hub.subscriber_count(), 1);

        // Publishing to a connected-but-unpolled stream must not block.
        hub.publish(FeedEvent::BatchSummary {
            file: "x.csv".to_string(),
            new_rows: 1,
            total_rows: 1,
        });

        drop(sse);
        assert_eq!(hub.subscriber_count(), 0);
    }
}
