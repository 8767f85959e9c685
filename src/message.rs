use crate::contacts::Contact;
use crate::contacts::board::FormField;
use crate::fl;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingField {
    WebhookUrl,
    ApiKey,
    ProjectId,
    AppId,
    AuthUrl,
    TokenUrl,
    FirestoreUrl,
    PollInterval,
}

#[derive(Debug, Clone)]
pub enum Message {
    // Assistant
    AssistantInputChanged(String),
    AssistantSubmit,
    AssistantReplied(Result<String, String>),

    // Contacts session and feed
    SignedIn(Result<String, String>),
    ContactsSnapshot(Result<Vec<Contact>, String>),
    ReconnectContacts,

    // Contacts CRUD
    OpenAddContact,
    EditContact(String),
    ContactFieldChanged(FormField, String),
    AttachContactImage,
    ContactSubmit,
    ContactSaved(Result<(), String>),
    ConfirmDeleteContact(String),
    CancelContactForm,
    DeleteContact,
    ContactDeleted(Result<(), String>),
    DismissContactError,

    // Settings
    SetSetting(SettingField, String),
    ToggleDebugLogging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Assistant,
    Contacts,
    Settings,
}

impl Page {
    pub fn title(&self) -> String {
        match self {
            Self::Assistant => fl!("page-assistant"),
            Self::Contacts => fl!("page-contacts"),
            Self::Settings => fl!("page-settings"),
        }
    }

    pub fn icon_name(&self) -> &'static str {
        match self {
            Self::Assistant => "user-available-symbolic",
            Self::Contacts => "system-users-symbolic",
            Self::Settings => "emblem-system-symbolic",
        }
    }

    pub const ALL: &'static [Page] = &[Page::Assistant, Page::Contacts, Page::Settings];
}
