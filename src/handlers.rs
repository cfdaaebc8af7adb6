// HTTP handlers. Each one is a single pass-through: produce a number, forward
// to the state store, or decode and log a broker delivery. Failures never
// reach the caller as an error status; they are logged and the request
// completes with `200 OK` and whatever body could be produced.
use crate::{
    metrics::{Metrics, StateOp},
    model::{InboundEvent, NumberPayload, StateEntry, SAVED_NUMBERS_KEY, TOPICS},
    random::NumberSource,
    state_client::StateClient,
};
use axum::{
    body::Bytes,
    extract::Extension,
    http::{header::CONTENT_TYPE, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use prometheus::{Encoder, TextEncoder};
use std::sync::Arc;
use tracing::{error, info, warn};

/// `GET /randomNumber`
pub async fn random_number(Extension(source): Extension<Arc<dyn NumberSource>>) -> Json<i64> {
    Json(source.next_number())
}

/// `GET /savedNumber` forwards the stored body re-encoded as a JSON string.
/// An unreachable store yields an empty `200 OK`.
pub async fn saved_number(
    Extension(client): Extension<StateClient>,
    Extension(metrics): Extension<Metrics>,
) -> Response {
    match client.get_raw(SAVED_NUMBERS_KEY).await {
        Ok(body) => {
            metrics.state_request(StateOp::Get, true);
            Json(body).into_response()
        }
        Err(e) => {
            metrics.state_request(StateOp::Get, false);
            error!(error = %format!("{e:#}"), "could not fetch saved number");
            StatusCode::OK.into_response()
        }
    }
}

/// `POST /saveNumber`. A body that does not decode is saved as `0`.
pub async fn save_number(
    Extension(client): Extension<StateClient>,
    Extension(metrics): Extension<Metrics>,
    body: Bytes,
) -> StatusCode {
    let payload = decode_number(&body);
    let entries = [StateEntry::saved_number(payload.number)];

    match client.save(&entries).await {
        Ok(()) => metrics.state_request(StateOp::Save, true),
        Err(e) => {
            metrics.state_request(StateOp::Save, false);
            error!(error = %format!("{e:#}"), "could not save state");
        }
    }
    StatusCode::OK
}

/// Decode the first JSON value in `body`; anything after it is ignored.
fn decode_number(body: &[u8]) -> NumberPayload {
    match serde_json::Deserializer::from_slice(body).into_iter::<NumberPayload>().next() {
        Some(Ok(payload)) => payload,
        Some(Err(e)) => {
            warn!(error = %e, "could not decode number payload, using 0");
            NumberPayload::default()
        }
        None => {
            warn!("empty number payload, using 0");
            NumberPayload::default()
        }
    }
}

/// `GET /dapr/subscribe`
pub async fn subscribe() -> Json<[&'static str; 2]> {
    Json(TOPICS)
}

/// `POST /A`
pub async fn topic_a(Extension(metrics): Extension<Metrics>, body: Bytes) -> StatusCode {
    receive_event("A", &metrics, &body)
}

/// `POST /B`
pub async fn topic_b(Extension(metrics): Extension<Metrics>, body: Bytes) -> StatusCode {
    receive_event("B", &metrics, &body)
}

fn receive_event(topic: &str, metrics: &Metrics, body: &[u8]) -> StatusCode {
    info!("Got message of topic '{topic}'");
    metrics.topic_message(topic);
    match serde_json::from_slice::<InboundEvent>(body) {
        Ok(event) => info!(topic, event = %serde_json::Value::Object(event), "decoded event"),
        Err(e) => warn!(topic, error = %e, "could not decode event"),
    }
    StatusCode::OK
}

/// Prometheus text exposition of the service registry.
pub async fn metrics_handler(Extension(metrics): Extension<Metrics>) -> (HeaderMap, String) {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metrics.registry.gather(), &mut buffer) {
        error!(error = %e, "could not encode metrics");
    }
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(encoder.format_type()) {
        headers.insert(CONTENT_TYPE, value);
    }
    (headers, String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::testing::capture;

    #[test]
    fn test_decode_number_valid() {
        assert_eq!(decode_number(br#"{"number":42}"#).number, 42);
    }

    #[test]
    fn test_decode_number_malformed_is_zero() {
        assert_eq!(decode_number(b"not json").number, 0);
        assert_eq!(decode_number(b"").number, 0);
        assert_eq!(decode_number(br#"{"number":"x"}"#).number, 0);
    }

    #[test]
    fn test_decode_number_ignores_trailing_bytes() {
        assert_eq!(decode_number(br#"{"number":42} x"#).number, 42);
        assert_eq!(decode_number(b"  {\"number\":7}\n{\"number\":8}").number, 7);
    }

    #[test]
    fn test_receive_event_logs_decoded_map() {
        let (subscriber, captured) = capture();
        let metrics = Metrics::new().unwrap();
        let status = tracing::subscriber::with_default(subscriber, || {
            receive_event("A", &metrics, br#"{"foo":"bar"}"#)
        });
        assert_eq!(status, StatusCode::OK);

        let text = captured.text();
        assert!(text.contains("Got message of topic 'A'"), "{text}");
        assert!(text.contains(r#"{"foo":"bar"}"#), "{text}");
    }

    #[test]
    fn test_receive_event_logs_decode_error() {
        let (subscriber, captured) = capture();
        let metrics = Metrics::new().unwrap();
        tracing::subscriber::with_default(subscriber, || receive_event("B", &metrics, b"[1,2]"));

        let text = captured.text();
        assert!(text.contains("Got message of topic 'B'"), "{text}");
        assert!(text.contains("could not decode event"), "{text}");
    }

    #[test]
    fn test_receive_event_counts_even_when_malformed() {
        let metrics = Metrics::new().unwrap();
        assert_eq!(receive_event("A", &metrics, br#"{"foo":"bar"}"#), StatusCode::OK);
        assert_eq!(receive_event("A", &metrics, b"{oops"), StatusCode::OK);
        assert_eq!(metrics.topic_count("A"), 2);
        assert_eq!(metrics.topic_count("B"), 0);
    }
}
