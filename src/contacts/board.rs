//! Contact list controller: session bootstrap state, snapshot feed state and the
//! add/edit/delete workflow. Holds no I/O besides reading an attached image; the
//! caller performs the remote writes this board hands out.

use std::path::Path;

use super::image;
use super::{Contact, ContactDraft, sort_contacts};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Ready(String),
    /// Sign-in failed. Contacts stay unavailable until the app restarts.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Adding,
    Editing(String),
    ConfirmingDelete(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Linkedin,
    Notes,
    ImagePath,
}

/// Input buffers for the add/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub linkedin: String,
    pub notes: String,
    /// Local file to attach; encoded by `attach_image` or at submit.
    pub image_path: String,
    /// Data URL of the attached image, if any.
    pub image: Option<String>,
}

impl ContactForm {
    fn from_contact(contact: &Contact) -> Self {
        Self {
            name: contact.name.clone(),
            email: contact.email.clone(),
            linkedin: contact.linkedin.clone(),
            notes: contact.notes.clone(),
            image_path: String::new(),
            image: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A remote write the caller must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Write {
    Create(ContactDraft),
    Update { id: String, draft: ContactDraft },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Not signed in to the contacts service")]
    NoSession,
    #[error("Name is required")]
    MissingName,
    #[error("Email is required")]
    MissingEmail,
    #[error("A previous change is still being saved")]
    Busy,
    #[error("No contact form is open")]
    NotEditing,
    #[error("The contact no longer exists")]
    UnknownContact,
    #[error("{0}")]
    Image(String),
}

#[derive(Debug)]
pub struct ContactBoard {
    session: SessionState,
    contacts: Vec<Contact>,
    loading: bool,
    /// Bumped to restart the snapshot feed after it failed.
    feed_generation: u64,
    /// Why the feed ended, kept until the user reconnects.
    feed_error: Option<String>,
    mode: Mode,
    form: ContactForm,
    /// A create, update or delete is in flight.
    pending: bool,
    /// Validation or write error for the open form.
    error: Option<String>,
}

impl Default for ContactBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactBoard {
    pub fn new() -> Self {
        Self {
            session: SessionState::Connecting,
            contacts: Vec::new(),
            loading: true,
            feed_generation: 0,
            feed_error: None,
            mode: Mode::Idle,
            form: ContactForm::default(),
            pending: false,
            error: None,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn session_uid(&self) -> Option<&str> {
        match &self.session {
            SessionState::Ready(uid) => Some(uid),
            _ => None,
        }
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn contact(&self, id: &str) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn feed_generation(&self) -> u64 {
        self.feed_generation
    }

    pub fn feed_stopped(&self) -> bool {
        self.feed_error.is_some()
    }

    pub fn feed_error(&self) -> Option<&str> {
        self.feed_error.as_deref()
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    // --- Session and feed ---

    /// Record the outcome of the one sign-in attempt made per app run.
    pub fn session_started(&mut self, result: Result<String, String>) {
        if self.session != SessionState::Connecting {
            log::warn!("Ignoring repeated sign-in result, session already {:?}", self.session);
            return;
        }
        match result {
            Ok(uid) => {
                log::info!("Contacts session ready for {}", uid);
                self.session = SessionState::Ready(uid);
            }
            Err(e) => {
                log::error!("Contacts sign-in failed: {}", e);
                self.session = SessionState::Failed(e);
                self.loading = false;
            }
        }
    }

    /// Replace the list with a full snapshot from the feed.
    pub fn apply_snapshot(&mut self, mut contacts: Vec<Contact>) {
        sort_contacts(&mut contacts);
        log::debug!("Contact snapshot with {} records", contacts.len());
        self.contacts = contacts;
        self.loading = false;
        self.feed_error = None;
    }

    /// The feed stopped; keep the last list and surface the error until a reconnect.
    pub fn subscription_failed(&mut self, error: String) {
        log::error!("Contact feed failed: {}", error);
        self.loading = false;
        self.feed_error = Some(error);
    }

    /// Start a fresh feed after a failure.
    pub fn resubscribe(&mut self) {
        if self.session_uid().is_none() {
            return;
        }
        self.feed_generation += 1;
        self.feed_error = None;
        self.loading = true;
    }

    // --- Workflow ---

    pub fn open_add(&mut self) {
        if self.pending {
            return;
        }
        self.reset_form();
        self.mode = Mode::Adding;
    }

    pub fn start_edit(&mut self, id: &str) {
        if self.pending {
            return;
        }
        let Some(contact) = self.contact(id) else {
            return;
        };
        let form = ContactForm::from_contact(contact);
        self.reset_form();
        self.form = form;
        self.mode = Mode::Editing(id.to_string());
    }

    /// Stage a contact for deletion; nothing is removed until [`Self::confirm_delete`].
    pub fn request_delete(&mut self, id: &str) {
        if self.pending || self.contact(id).is_none() {
            return;
        }
        self.reset_form();
        self.mode = Mode::ConfirmingDelete(id.to_string());
    }

    /// Leave any mode without touching the remote collection.
    pub fn cancel(&mut self) {
        if self.pending {
            return;
        }
        self.reset_form();
    }

    pub fn set_field(&mut self, field: FormField, value: String) {
        match field {
            FormField::Name => self.form.name = value,
            FormField::Email => self.form.email = value,
            FormField::Linkedin => self.form.linkedin = value,
            FormField::Notes => self.form.notes = value,
            FormField::ImagePath => {
                if value != self.form.image_path {
                    self.form.image = None;
                }
                self.form.image_path = value;
            }
        }
    }

    /// Read and encode an image into the open form. Nothing is sent until submit.
    pub fn attach_image(&mut self, path: &Path) -> Result<(), FormError> {
        if !matches!(self.mode, Mode::Adding | Mode::Editing(_)) {
            return Err(FormError::NotEditing);
        }
        match image::encode_file(path) {
            Ok(data_url) => {
                log::debug!("Attached {} ({} bytes)", path.display(), image::payload_len(&data_url));
                self.form.image_path = path.display().to_string();
                self.form.image = Some(data_url);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                let err = FormError::Image(e.to_string());
                self.form.image = None;
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Validate the open form and hand out the write to perform.
    ///
    /// A typed image path that was never attached is encoded here. When editing
    /// without a new image the record keeps its current image.
    pub fn submit(&mut self) -> Result<Write, FormError> {
        let result = self.build_write();
        match &result {
            Ok(_) => {
                self.pending = true;
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
        result
    }

    fn build_write(&self) -> Result<Write, FormError> {
        if self.session_uid().is_none() {
            return Err(FormError::NoSession);
        }
        if self.pending {
            return Err(FormError::Busy);
        }
        if !matches!(self.mode, Mode::Adding | Mode::Editing(_)) {
            return Err(FormError::NotEditing);
        }

        let name = self.form.name.trim();
        if name.is_empty() {
            return Err(FormError::MissingName);
        }
        let email = self.form.email.trim();
        if email.is_empty() {
            return Err(FormError::MissingEmail);
        }

        let path = self.form.image_path.trim();
        let new_image = match &self.form.image {
            Some(data_url) => Some(data_url.clone()),
            None if path.is_empty() => None,
            None => Some(image::encode_file(Path::new(path)).map_err(|e| FormError::Image(e.to_string()))?),
        };

        let (mut draft, id) = match &self.mode {
            Mode::Adding => (ContactDraft::default(), None),
            Mode::Editing(id) => {
                let existing = self.contact(id).ok_or(FormError::UnknownContact)?;
                (existing.draft(), Some(id.clone()))
            }
            _ => return Err(FormError::NotEditing),
        };

        draft.name = name.to_string();
        draft.email = email.to_string();
        draft.linkedin = self.form.linkedin.trim().to_string();
        draft.notes = self.form.notes.trim().to_string();
        if let Some(data_url) = new_image {
            draft.image = data_url;
        }

        Ok(match id {
            None => Write::Create(draft),
            Some(id) => Write::Update { id, draft },
        })
    }

    /// Finish a create or update. The form stays open and filled on failure.
    pub fn write_finished(&mut self, result: Result<(), String>) {
        self.pending = false;
        match result {
            Ok(()) => self.reset_form(),
            Err(e) => {
                log::error!("Contact write failed: {}", e);
                self.error = Some(e);
            }
        }
    }

    /// Confirm the staged delete. Yields the id to remove at most once per staging.
    pub fn confirm_delete(&mut self) -> Option<String> {
        if self.pending || self.session_uid().is_none() {
            return None;
        }
        match &self.mode {
            Mode::ConfirmingDelete(id) => {
                self.pending = true;
                self.error = None;
                Some(id.clone())
            }
            _ => None,
        }
    }

    pub fn delete_finished(&mut self, result: Result<(), String>) {
        self.pending = false;
        match result {
            Ok(()) => {
                if matches!(self.mode, Mode::ConfirmingDelete(_)) {
                    self.mode = Mode::Idle;
                }
            }
            Err(e) => {
                log::error!("Contact delete failed: {}", e);
                self.error = Some(e);
            }
        }
    }

    fn reset_form(&mut self) {
        self.form = ContactForm::default();
        self.mode = Mode::Idle;
        self.error = None;
    }
}
