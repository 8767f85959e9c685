use std::time::{Duration, Instant};

use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;

use super::{FirebaseError, status_error};
use crate::config::FirebaseConfig;

/// Refresh the ID token this long before Firebase says it expires.
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// An anonymous Firebase user, held in memory for the life of the app.
#[derive(Debug, Clone)]
struct Session {
    uid: String,
    id_token: String,
    refresh_token: String,
    expires_at: Instant,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignUpResponse {
    id_token: String,
    refresh_token: String,
    expires_in: String,
    local_id: String,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    expires_in: String,
    user_id: String,
}

pub struct FirebaseAuth {
    http: Client,
    api_key: String,
    auth_url: String,
    token_url: String,
    session: Mutex<Option<Session>>,
}

impl FirebaseAuth {
    pub fn new(config: &FirebaseConfig, http: Client) -> Self {
        Self {
            http,
            api_key: config.api_key.trim().to_string(),
            auth_url: config.auth_url.trim_end_matches('/').to_string(),
            token_url: config.token_url.trim_end_matches('/').to_string(),
            session: Mutex::new(None),
        }
    }

    /// Sign in as a new anonymous user and return its uid.
    ///
    /// Only the first successful call talks to the server; later calls return the
    /// same uid. Failures are not retried.
    pub async fn sign_in_anonymously(&self) -> Result<String, FirebaseError> {
        let mut guard = self.session.lock().await;
        if let Some(session) = guard.as_ref() {
            return Ok(session.uid.clone());
        }
        if self.api_key.is_empty() {
            return Err(FirebaseError::NotConfigured);
        }

        let url = format!("{}/v1/accounts:signUp", self.auth_url);
        log::info!("Firebase anonymous sign-in at {}", url);

        let resp = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&serde_json::json!({ "returnSecureToken": true }))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(status_error("Sign-in", resp).await);
        }

        let body: SignUpResponse = resp
            .json()
            .await
            .map_err(|e| FirebaseError::Malformed(format!("sign-in response: {}", e)))?;

        let session = Session {
            uid: body.local_id,
            id_token: body.id_token,
            refresh_token: body.refresh_token,
            expires_at: expiry(&body.expires_in),
        };
        let uid = session.uid.clone();
        *guard = Some(session);
        Ok(uid)
    }

    /// A valid ID token for `Authorization: Bearer`, refreshed when close to expiry.
    pub async fn id_token(&self) -> Result<String, FirebaseError> {
        let mut guard = self.session.lock().await;
        let session = guard.as_mut().ok_or(FirebaseError::NotSignedIn)?;

        if Instant::now() + REFRESH_MARGIN < session.expires_at {
            return Ok(session.id_token.clone());
        }

        log::debug!("Refreshing Firebase ID token for {}", session.uid);
        let url = format!("{}/v1/token", self.token_url);
        let resp = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&serde_json::json!({
                "grant_type": "refresh_token",
                "refresh_token": session.refresh_token,
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(status_error("Token refresh", resp).await);
        }

        let body: RefreshResponse = resp
            .json()
            .await
            .map_err(|e| FirebaseError::Malformed(format!("token refresh response: {}", e)))?;

        if body.user_id != session.uid {
            return Err(FirebaseError::Malformed(format!(
                "token refresh switched user from {} to {}",
                session.uid, body.user_id
            )));
        }

        session.id_token = body.id_token;
        session.refresh_token = body.refresh_token;
        session.expires_at = expiry(&body.expires_in);
        Ok(session.id_token.clone())
    }
}

/// `expiresIn` arrives as a decimal string of seconds.
fn expiry(expires_in: &str) -> Instant {
    let secs = expires_in.trim().parse::<u64>().unwrap_or(3600);
    Instant::now() + Duration::from_secs(secs)
}
