use reqwest::StatusCode;

use crate::application::ports::ProviderFailure;

/// Substrings providers are known to use when reporting exhausted quota or
/// billing problems, regardless of status code.
const QUOTA_MARKERS: [&str; 4] = [
    "insufficient_quota",
    "quota",
    "billing",
    "exceeded your current",
];

/// Maps a transport-level failure (no HTTP response) onto the retry
/// taxonomy. Everything at this level is expected to be retry-recoverable.
pub fn classify_transport_error(err: &reqwest::Error) -> ProviderFailure {
    if err.is_timeout() {
        ProviderFailure::Transient("request timed out".to_string())
    } else if err.is_connect() {
        ProviderFailure::Transient(format!("connection failed: {}", err))
    } else {
        ProviderFailure::Transient(format!("network error: {}", err))
    }
}

/// Maps an HTTP error response onto the retry taxonomy.
///
/// Quota markers in the body win over the status code: some providers
/// report exhausted billing through 400/403 responses.
pub fn classify_error_response(status: StatusCode, body: &str) -> ProviderFailure {
    if body_reports_quota(body) {
        return ProviderFailure::QuotaExceeded(summarize(status, body));
    }

    match status.as_u16() {
        401 | 403 => ProviderFailure::Authentication(summarize(status, body)),
        402 | 429 => ProviderFailure::QuotaExceeded(summarize(status, body)),
        400 | 404 | 413 | 415 | 422 => ProviderFailure::UnsupportedAudio(summarize(status, body)),
        _ if status.is_server_error() => ProviderFailure::Transient(summarize(status, body)),
        _ => ProviderFailure::Internal(summarize(status, body)),
    }
}

fn body_reports_quota(body: &str) -> bool {
    let body = body.to_ascii_lowercase();
    QUOTA_MARKERS.iter().any(|marker| body.contains(marker))
}

fn summarize(status: StatusCode, body: &str) -> String {
    let mut snippet: String = body.chars().take(200).collect();
    if snippet.len() < body.len() {
        snippet.push_str("...");
    }
    format!("status {}: {}", status, snippet.trim())
}
