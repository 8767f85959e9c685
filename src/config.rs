use cosmic::cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use serde::{Deserialize, Serialize};

pub const CONFIG_VERSION: u64 = 1;

pub const DEFAULT_WEBHOOK_URL: &str = "https://hook.eu1.make.com/wonkykm9tztt7qqfbbqp9pnsgxf2zvl5";

pub const DEFAULT_AUTH_URL: &str = "https://identitytoolkit.googleapis.com";
pub const DEFAULT_TOKEN_URL: &str = "https://securetoken.googleapis.com";
pub const DEFAULT_FIRESTORE_URL: &str = "https://firestore.googleapis.com";

/// Firebase web-app settings. The endpoint URLs can point at the emulator suite
/// (e.g. `http://127.0.0.1:9099/identitytoolkit.googleapis.com`).
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct FirebaseConfig {
    pub api_key: String,
    pub project_id: String,
    /// Namespace segment under `artifacts/` that keeps one app's users apart from another's.
    pub app_id: String,
    pub auth_url: String,
    pub token_url: String,
    pub firestore_url: String,
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            project_id: String::new(),
            app_id: "default-app-id".to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            firestore_url: DEFAULT_FIRESTORE_URL.to_string(),
        }
    }
}

impl FirebaseConfig {
    /// Sign-in needs an API key and Firestore needs a project.
    pub fn is_ready(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.project_id.trim().is_empty()
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, CosmicConfigEntry)]
pub struct DeskConfig {
    pub webhook_url: String,
    pub firebase: FirebaseConfig,
    /// Seconds between contact collection polls.
    pub poll_interval_secs: u64,
    pub debug_logging: bool,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            webhook_url: DEFAULT_WEBHOOK_URL.to_string(),
            firebase: FirebaseConfig::default(),
            poll_interval_secs: 5,
            debug_logging: false,
        }
    }
}

impl DeskConfig {
    /// Poll interval clamped to at least one second.
    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_firebase_config_is_not_ready() {
        let config = DeskConfig::default();
        assert!(!config.firebase.is_ready());
        assert_eq!(config.webhook_url, DEFAULT_WEBHOOK_URL);
    }

    #[test]
    fn poll_interval_never_zero() {
        let config = DeskConfig {
            poll_interval_secs: 0,
            ..DeskConfig::default()
        };
        assert_eq!(config.poll_interval(), std::time::Duration::from_secs(1));
    }
}
