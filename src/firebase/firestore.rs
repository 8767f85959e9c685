use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::Stream;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use super::auth::FirebaseAuth;
use super::{FirebaseError, status_error};
use crate::config::FirebaseConfig;
use crate::contacts::{Contact, ContactDraft, sort_contacts};

const PAGE_SIZE: u32 = 300;

/// Writable fields, in the order they appear in an update mask.
const DRAFT_FIELDS: [&str; 5] = ["name", "email", "linkedin", "notes", "image"];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Document {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
    create_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<Document>,
    next_page_token: Option<String>,
}

/// Contacts stored under `artifacts/<app>/users/<uid>/contacts` in Firestore.
pub struct FirestoreClient {
    http: Client,
    auth: Arc<FirebaseAuth>,
    base_url: String,
    project_id: String,
    app_id: String,
}

impl FirestoreClient {
    pub fn new(config: &FirebaseConfig, http: Client, auth: Arc<FirebaseAuth>) -> Self {
        Self {
            http,
            auth,
            base_url: config.firestore_url.trim_end_matches('/').to_string(),
            project_id: config.project_id.trim().to_string(),
            app_id: config.app_id.trim().to_string(),
        }
    }

    /// Resource name prefix: `projects/<p>/databases/(default)/documents`.
    fn database_path(&self) -> String {
        format!("projects/{}/databases/(default)/documents", self.project_id)
    }

    fn collection_path(&self, uid: &str) -> String {
        format!("artifacts/{}/users/{}/contacts", self.app_id, uid)
    }

    fn document_name(&self, uid: &str, id: &str) -> String {
        format!("{}/{}/{}", self.database_path(), self.collection_path(uid), id)
    }

    fn collection_url(&self, uid: &str) -> String {
        format!("{}/v1/{}/{}", self.base_url, self.database_path(), self.collection_path(uid))
    }

    fn commit_url(&self) -> String {
        format!("{}/v1/{}:commit", self.base_url, self.database_path())
    }

    /// Fetch the full collection, following page tokens.
    pub async fn list_contacts(&self, uid: &str) -> Result<Vec<Contact>, FirebaseError> {
        let token = self.auth.id_token().await?;
        let url = self.collection_url(uid);
        let mut contacts = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut req = self
                .http
                .get(&url)
                .bearer_auth(&token)
                .query(&[("pageSize", PAGE_SIZE.to_string())]);
            if let Some(ref page) = page_token {
                req = req.query(&[("pageToken", page.as_str())]);
            }

            let resp = req.send().await?;
            if !resp.status().is_success() {
                return Err(status_error("List contacts", resp).await);
            }

            let page: ListResponse = resp
                .json()
                .await
                .map_err(|e| FirebaseError::Malformed(format!("contact list: {}", e)))?;

            for doc in &page.documents {
                contacts.push(decode_contact(doc));
            }

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        sort_contacts(&mut contacts);
        log::debug!("Listed {} contacts for {}", contacts.len(), uid);
        Ok(contacts)
    }

    /// Create a contact with a server-assigned `createdAt`. Returns the new document id.
    pub async fn create_contact(&self, uid: &str, draft: &ContactDraft) -> Result<String, FirebaseError> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let body = create_write(&self.document_name(uid, &id), draft);
        self.commit(&body, "Create contact").await?;
        log::info!("Created contact {} ({})", id, draft.name);
        Ok(id)
    }

    /// Overwrite the writable fields of an existing contact and stamp `updatedAt`.
    pub async fn update_contact(&self, uid: &str, id: &str, draft: &ContactDraft) -> Result<(), FirebaseError> {
        let body = update_write(&self.document_name(uid, id), draft);
        self.commit(&body, "Update contact").await?;
        log::info!("Updated contact {}", id);
        Ok(())
    }

    pub async fn delete_contact(&self, uid: &str, id: &str) -> Result<(), FirebaseError> {
        let token = self.auth.id_token().await?;
        let url = format!("{}/{}", self.collection_url(uid), id);

        let resp = self.http.delete(&url).bearer_auth(&token).send().await?;
        if !resp.status().is_success() {
            return Err(status_error("Delete contact", resp).await);
        }
        log::info!("Deleted contact {}", id);
        Ok(())
    }

    async fn commit(&self, body: &Value, context: &'static str) -> Result<(), FirebaseError> {
        let token = self.auth.id_token().await?;
        let resp = self
            .http
            .post(self.commit_url())
            .bearer_auth(&token)
            .json(body)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(status_error(context, resp).await);
        }
        Ok(())
    }

    /// Live view of the user's contacts as a stream of full snapshots.
    ///
    /// The collection is polled every `interval`; a snapshot is yielded first and
    /// then only when it differs from the previous one. The stream yields an error
    /// once and ends when a poll fails. Dropping the stream stops polling.
    pub fn watch_contacts(
        self: Arc<Self>,
        uid: String,
        interval: Duration,
    ) -> impl Stream<Item = Result<Vec<Contact>, FirebaseError>> + Send + 'static {
        struct Watch {
            client: Arc<FirestoreClient>,
            uid: String,
            interval: Duration,
            last: Option<Vec<Contact>>,
        }

        let start = Watch {
            client: self,
            uid,
            interval,
            last: None,
        };

        futures::stream::unfold(Some(start), |state| async move {
            let mut watch = state?;
            loop {
                if watch.last.is_some() {
                    tokio::time::sleep(watch.interval).await;
                }
                match watch.client.list_contacts(&watch.uid).await {
                    Ok(contacts) => {
                        if watch.last.as_ref() == Some(&contacts) {
                            continue;
                        }
                        watch.last = Some(contacts.clone());
                        return Some((Ok(contacts), Some(watch)));
                    }
                    Err(e) => {
                        log::warn!("Contact poll for {} failed: {}", watch.uid, e);
                        return Some((Err(e), None));
                    }
                }
            }
        })
    }
}

fn string_value(s: &str) -> Value {
    json!({ "stringValue": s })
}

fn draft_fields(draft: &ContactDraft) -> Value {
    json!({
        "name": string_value(&draft.name),
        "email": string_value(&draft.email),
        "linkedin": string_value(&draft.linkedin),
        "notes": string_value(&draft.notes),
        "image": string_value(&draft.image),
    })
}

fn server_time(field: &str) -> Value {
    json!([{ "fieldPath": field, "setToServerValue": "REQUEST_TIME" }])
}

fn create_write(document_name: &str, draft: &ContactDraft) -> Value {
    json!({
        "writes": [{
            "update": { "name": document_name, "fields": draft_fields(draft) },
            "currentDocument": { "exists": false },
            "updateTransforms": server_time("createdAt"),
        }]
    })
}

fn update_write(document_name: &str, draft: &ContactDraft) -> Value {
    json!({
        "writes": [{
            "update": { "name": document_name, "fields": draft_fields(draft) },
            "updateMask": { "fieldPaths": DRAFT_FIELDS },
            "currentDocument": { "exists": true },
            "updateTransforms": server_time("updatedAt"),
        }]
    })
}

fn string_field(fields: &Map<String, Value>, key: &str) -> String {
    fields
        .get(key)
        .and_then(|v| v["stringValue"].as_str())
        .unwrap_or_default()
        .to_string()
}

fn timestamp_field(fields: &Map<String, Value>, key: &str) -> Option<DateTime<Utc>> {
    let raw = fields.get(key)?["timestampValue"].as_str()?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn decode_contact(doc: &Document) -> Contact {
    let id = doc.name.rsplit('/').next().unwrap_or_default().to_string();
    let created_at = timestamp_field(&doc.fields, "createdAt")
        .or(doc.create_time)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

    Contact {
        id,
        name: string_field(&doc.fields, "name"),
        email: string_field(&doc.fields, "email"),
        linkedin: string_field(&doc.fields, "linkedin"),
        notes: string_field(&doc.fields, "notes"),
        image: string_field(&doc.fields, "image"),
        created_at,
        updated_at: timestamp_field(&doc.fields, "updatedAt"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn client() -> FirestoreClient {
        let config = FirebaseConfig {
            api_key: "key".to_string(),
            project_id: "vyroba".to_string(),
            app_id: "desk".to_string(),
            ..FirebaseConfig::default()
        };
        let auth = Arc::new(FirebaseAuth::new(&config, Client::new()));
        FirestoreClient::new(&config, Client::new(), auth)
    }

    fn jana() -> ContactDraft {
        ContactDraft {
            name: "Jana".to_string(),
            email: "jana@x.cz".to_string(),
            ..ContactDraft::default()
        }
    }

    #[test]
    fn paths_are_scoped_to_the_user() {
        let c = client();
        assert_eq!(
            c.collection_url("u1"),
            "https://firestore.googleapis.com/v1/projects/vyroba/databases/(default)/documents/artifacts/desk/users/u1/contacts"
        );
        assert_eq!(
            c.document_name("u1", "abc"),
            "projects/vyroba/databases/(default)/documents/artifacts/desk/users/u1/contacts/abc"
        );
        assert_eq!(
            c.commit_url(),
            "https://firestore.googleapis.com/v1/projects/vyroba/databases/(default)/documents:commit"
        );
    }

    #[test]
    fn create_write_stamps_created_at_and_keeps_empty_image() {
        let body = create_write("projects/p/databases/(default)/documents/x/y", &jana());
        let write = &body["writes"][0];
        assert_eq!(write["update"]["fields"]["image"]["stringValue"], "");
        assert_eq!(write["update"]["fields"]["name"]["stringValue"], "Jana");
        assert_eq!(write["currentDocument"]["exists"], false);
        assert_eq!(write["updateTransforms"][0]["fieldPath"], "createdAt");
        assert_eq!(write["updateTransforms"][0]["setToServerValue"], "REQUEST_TIME");
        assert!(write.get("updateMask").is_none());
    }

    #[test]
    fn update_write_masks_draft_fields_and_stamps_updated_at() {
        let body = update_write("projects/p/databases/(default)/documents/x/y", &jana());
        let write = &body["writes"][0];
        assert_eq!(
            write["updateMask"]["fieldPaths"],
            json!(["name", "email", "linkedin", "notes", "image"])
        );
        assert_eq!(write["currentDocument"]["exists"], true);
        assert_eq!(write["updateTransforms"][0]["fieldPath"], "updatedAt");
    }

    #[test]
    fn decodes_document_fields() {
        let doc: Document = serde_json::from_value(json!({
            "name": "projects/p/databases/(default)/documents/artifacts/a/users/u/contacts/k1",
            "fields": {
                "name": { "stringValue": "Jana" },
                "email": { "stringValue": "jana@x.cz" },
                "linkedin": { "stringValue": "https://linkedin.com/in/jana" },
                "image": { "stringValue": "" },
                "createdAt": { "timestampValue": "2025-05-01T09:30:00.123456Z" },
                "updatedAt": { "timestampValue": "2025-05-02T10:00:00Z" }
            },
            "createTime": "2025-05-01T09:30:00.200000Z",
            "updateTime": "2025-05-02T10:00:00Z"
        }))
        .unwrap();

        let contact = decode_contact(&doc);
        assert_eq!(contact.id, "k1");
        assert_eq!(contact.name, "Jana");
        assert_eq!(contact.linkedin, "https://linkedin.com/in/jana");
        assert_eq!(contact.notes, "");
        assert!(!contact.has_image());
        assert_eq!(
            contact.updated_at,
            Some(Utc.with_ymd_and_hms(2025, 5, 2, 10, 0, 0).unwrap())
        );
        assert_eq!(
            contact.created_at.timestamp(),
            Utc.with_ymd_and_hms(2025, 5, 1, 9, 30, 0).unwrap().timestamp()
        );
    }

    #[test]
    fn created_at_falls_back_to_create_time() {
        let doc: Document = serde_json::from_value(json!({
            "name": "projects/p/databases/(default)/documents/c/k2",
            "fields": { "name": { "stringValue": "Old" } },
            "createTime": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        let contact = decode_contact(&doc);
        assert_eq!(contact.created_at, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(contact.updated_at, None);
        assert_eq!(contact.email, "");
    }

    #[test]
    fn empty_collection_lists_nothing() {
        let page: ListResponse = serde_json::from_str("{}").unwrap();
        assert!(page.documents.is_empty());
        assert!(page.next_page_token.is_none());
    }
}
