pub mod board;
pub mod image;

use chrono::{DateTime, Utc};

/// A contact record as stored in the user's remote collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    /// Document id assigned on create; opaque to the UI.
    pub id: String,
    pub name: String,
    pub email: String,
    pub linkedin: String,
    pub notes: String,
    /// Base64 data URL, or empty when no image is attached.
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Contact {
    pub fn has_image(&self) -> bool {
        !self.image.is_empty()
    }

    /// The writable fields of this record, as an update would send them.
    pub fn draft(&self) -> ContactDraft {
        ContactDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            linkedin: self.linkedin.clone(),
            notes: self.notes.clone(),
            image: self.image.clone(),
        }
    }
}

/// The user-editable part of a contact, sent on create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub linkedin: String,
    pub notes: String,
    pub image: String,
}

/// Order snapshots oldest first so new contacts land at the end of the list.
pub fn sort_contacts(contacts: &mut [Contact]) {
    contacts.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
}
