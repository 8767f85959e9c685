pub mod webhook;

use webhook::WebhookError;

/// What the reply area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Greeting,
    Thinking,
    Answer(String),
    Apology,
}

/// State of the assistant chat panel: one input line, one reply, at most one request in flight.
#[derive(Debug)]
pub struct ChatPanel {
    input: String,
    reply: Reply,
    error: Option<String>,
    in_flight: bool,
}

impl Default for ChatPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatPanel {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            reply: Reply::Greeting,
            error: None,
            in_flight: false,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn reply(&self) -> &Reply {
        &self.reply
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn set_input(&mut self, value: String) {
        if !self.in_flight {
            self.input = value;
        }
    }

    /// Start a request. Returns the command to send, or `None` while one is outstanding.
    pub fn begin(&mut self) -> Option<String> {
        if self.in_flight {
            return None;
        }
        self.in_flight = true;
        self.error = None;
        self.reply = Reply::Thinking;
        Some(self.input.clone())
    }

    /// Show the outcome of the outstanding request. The input is kept for another try.
    pub fn finish(&mut self, result: Result<String, WebhookError>) {
        self.finish_with(result.map_err(|e| e.to_string()));
    }

    /// Like [`Self::finish`] with the error already rendered, as it crosses the UI message boundary.
    pub fn finish_with(&mut self, result: Result<String, String>) {
        self.in_flight = false;
        match result {
            Ok(text) => {
                self.reply = Reply::Answer(text);
            }
            Err(e) => {
                log::error!("Webhook call failed: {}", e);
                self.reply = Reply::Apology;
                self.error = Some(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn starts_with_greeting() {
        let panel = ChatPanel::new();
        assert_eq!(panel.reply(), &Reply::Greeting);
        assert!(!panel.is_in_flight());
        assert_eq!(panel.error(), None);
    }

    #[test]
    fn begin_shows_thinking_and_blocks_a_second_request() {
        let mut panel = ChatPanel::new();
        panel.set_input("zvýš výrobu o 10%".to_string());

        assert_eq!(panel.begin(), Some("zvýš výrobu o 10%".to_string()));
        assert_eq!(panel.reply(), &Reply::Thinking);
        assert!(panel.is_in_flight());
        assert_eq!(panel.begin(), None);
    }

    #[test]
    fn input_is_frozen_while_in_flight() {
        let mut panel = ChatPanel::new();
        panel.set_input("first".to_string());
        panel.begin();
        panel.set_input("second".to_string());
        assert_eq!(panel.input(), "first");
    }

    #[test]
    fn answer_replaces_thinking() {
        let mut panel = ChatPanel::new();
        panel.set_input("stav".to_string());
        panel.begin();
        panel.finish(Ok("Plán upraven.".to_string()));
        assert_eq!(panel.reply(), &Reply::Answer("Plán upraven.".to_string()));
        assert!(!panel.is_in_flight());
        assert_eq!(panel.input(), "stav");
    }

    #[test]
    fn failure_apologises_and_keeps_detail() {
        let mut panel = ChatPanel::new();
        panel.set_input("stav".to_string());
        panel.begin();
        panel.finish(Err(WebhookError::Status(StatusCode::BAD_GATEWAY)));
        assert_eq!(panel.reply(), &Reply::Apology);
        assert_eq!(panel.error(), Some("HTTP error 502 Bad Gateway"));
        assert_eq!(panel.input(), "stav");

        // A retry clears the previous error.
        assert!(panel.begin().is_some());
        assert_eq!(panel.error(), None);
    }
}
