use reqwest::{Client, StatusCode};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP error {0}")]
    Status(StatusCode),
}

/// Posts free-text commands to an automation webhook.
#[derive(Clone)]
pub struct WebhookClient {
    url: String,
    http: Client,
}

impl WebhookClient {
    pub fn new(url: &str, http: Client) -> Self {
        Self {
            url: url.trim().to_string(),
            http,
        }
    }

    /// Send `{"command": <text>}` and return the text to display.
    pub async fn send_command(&self, command: &str) -> Result<String, WebhookError> {
        log::info!("Sending command to webhook ({} chars)", command.chars().count());

        let resp = self
            .http
            .post(&self.url)
            .json(&serde_json::json!({ "command": command }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            log::warn!("Webhook returned {}", status);
            return Err(WebhookError::Status(status));
        }

        let body = resp.text().await?;
        log::debug!("Webhook reply: {}", body);
        Ok(reply_text(&body))
    }
}

/// The `message` field when the reply carries a non-empty, non-zero, non-false
/// scalar, otherwise the whole JSON document pretty-printed, otherwise the body
/// as received.
pub fn reply_text(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.to_string();
    };
    match &value["message"] {
        Value::String(message) if !message.is_empty() => message.clone(),
        Value::Number(n) if n.as_f64() != Some(0.0) => n.to_string(),
        Value::Bool(true) => "true".to_string(),
        _ => serde_json::to_string_pretty(&value).unwrap_or_else(|_| body.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_field_wins() {
        assert_eq!(reply_text(r#"{"message":"Plán upraven.","plan":[1,2]}"#), "Plán upraven.");
    }

    #[test]
    fn json_without_message_is_pretty_printed() {
        assert_eq!(reply_text(r#"{"plan":"A"}"#), "{\n  \"plan\": \"A\"\n}");
    }

    #[test]
    fn empty_or_falsy_message_falls_back_to_json() {
        assert_eq!(reply_text(r#"{"message":""}"#), "{\n  \"message\": \"\"\n}");
        assert_eq!(reply_text(r#"{"message":0}"#), "{\n  \"message\": 0\n}");
        assert_eq!(reply_text(r#"{"message":null}"#), "{\n  \"message\": null\n}");
        assert_eq!(reply_text(r#"{"message":false}"#), "{\n  \"message\": false\n}");
    }

    #[test]
    fn scalar_message_is_shown_as_text() {
        assert_eq!(reply_text(r#"{"message":42}"#), "42");
        assert_eq!(reply_text(r#"{"message":2.5}"#), "2.5");
        assert_eq!(reply_text(r#"{"message":true}"#), "true");
    }

    #[test]
    fn plain_text_body_is_shown_raw() {
        assert_eq!(reply_text("Accepted"), "Accepted");
    }

    #[test]
    fn status_error_display() {
        assert_eq!(
            WebhookError::Status(StatusCode::INTERNAL_SERVER_ERROR).to_string(),
            "HTTP error 500 Internal Server Error"
        );
    }
}
