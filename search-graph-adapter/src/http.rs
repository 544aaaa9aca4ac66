//! HTTP exchange with the search-graph service.

use crate::error::SearchGraphError;
use crate::types::{GraphRequest, GraphResponse, NodeExecInfo};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::{Duration, Instant};
use url::Url;

const MAX_ERROR_BODY_CHARS: usize = 500;

const RATE_LIMIT_MARKERS: &[&str] = &[
    "rate_limit_exceeded",
    "rate_limit_error",
    "ratelimiterror",
    "rate_limited",
    "too_many_requests",
    "resource_exhausted",
];

/// POSTs `body` to `url` and decodes the reply.
///
/// # Errors
///
/// Returns `SearchGraphError::Transport` if the exchange fails,
/// `RateLimited` or `Api` for non-success statuses (see [`classify_failure`]),
/// and `Decode` when a success body is not JSON.
pub async fn post_graph(
    http: &reqwest::Client,
    url: &Url,
    body: &GraphRequest,
) -> Result<GraphResponse, SearchGraphError> {
    let start_time = Instant::now();

    let response = http.post(url.clone()).json(body).send().await?;
    let status = response.status();
    let retry_after = parse_retry_after(response.headers());
    let text = response.text().await?;

    tracing::debug!(
        status = status.as_u16(),
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        bytes = text.len(),
        "search graph responded"
    );

    if status.is_success() {
        return decode_response(&text);
    }

    Err(classify_failure(status, retry_after, &text))
}

/// Maps a non-success response onto the adapter's error taxonomy.
#[must_use]
pub fn classify_failure(
    status: StatusCode,
    retry_after: Option<Duration>,
    body: &str,
) -> SearchGraphError {
    let body = truncate_chars(body, MAX_ERROR_BODY_CHARS);
    if status == StatusCode::TOO_MANY_REQUESTS || body_signals_rate_limit(&body) {
        SearchGraphError::RateLimited { retry_after, body }
    } else {
        SearchGraphError::Api {
            status: status.as_u16(),
            body,
        }
    }
}

/// Decodes a success body, accepting both `{result, exec_info}` and a bare record.
///
/// # Errors
///
/// Returns `SearchGraphError::Decode` when the body is not JSON or `exec_info`
/// is malformed.
pub fn decode_response(text: &str) -> Result<GraphResponse, SearchGraphError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| SearchGraphError::Decode(e.to_string()))?;

    match value {
        Value::Object(mut map) if map.contains_key("result") => {
            let exec_info = match map.remove("exec_info") {
                Some(Value::Null) | None => Vec::new(),
                Some(raw) => serde_json::from_value::<Vec<NodeExecInfo>>(raw)
                    .map_err(|e| SearchGraphError::Decode(format!("exec_info: {e}")))?,
            };
            Ok(GraphResponse {
                result: map.remove("result").unwrap_or(Value::Null),
                exec_info,
            })
        }
        other => Ok(GraphResponse {
            result: other,
            exec_info: Vec::new(),
        }),
    }
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

fn body_signals_rate_limit(body: &str) -> bool {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return false;
    };
    let Some(error) = value.get("error") else {
        return false;
    };

    ["type", "code", "status"].iter().any(|key| {
        error
            .get(*key)
            .and_then(Value::as_str)
            .is_some_and(|s| RATE_LIMIT_MARKERS.contains(&s.to_ascii_lowercase().as_str()))
    })
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(max).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}
