//! REST clients for Firebase Authentication and Cloud Firestore.

pub mod auth;
pub mod firestore;

use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum FirebaseError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{context} returned {status}: {message}")]
    Status {
        context: &'static str,
        status: StatusCode,
        message: String,
    },
    #[error("Malformed response: {0}")]
    Malformed(String),
    #[error("Not signed in")]
    NotSignedIn,
    #[error("Firebase is not configured (API key and project id are required)")]
    NotConfigured,
}

/// Turn a non-success response into a [`FirebaseError::Status`], pulling the
/// human-readable message out of Google's `{"error": {"message": ...}}` envelope.
pub(crate) async fn status_error(context: &'static str, resp: reqwest::Response) -> FirebaseError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    FirebaseError::Status {
        context,
        status,
        message: error_message(&body),
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_from_google_envelope() {
        let body = r#"{"error":{"code":400,"message":"ADMIN_ONLY_OPERATION","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(error_message(body), "ADMIN_ONLY_OPERATION");
    }

    #[test]
    fn error_message_falls_back_to_body() {
        assert_eq!(error_message(" upstream timeout \n"), "upstream timeout");
    }
}
