use std::sync::Arc;

use cosmic::app::{Core, Task as CosmicTask};
use cosmic::iced::Subscription;
use cosmic::widget::{icon, nav_bar};
use cosmic::{Application, Element, executor};
use futures::StreamExt;

use crate::assistant::ChatPanel;
use crate::assistant::webhook::WebhookClient;
use crate::config::DeskConfig;
use crate::contacts::board::{ContactBoard, Write};
use crate::firebase::FirebaseError;
use crate::firebase::auth::FirebaseAuth;
use crate::firebase::firestore::FirestoreClient;
use crate::message::{Message, Page, SettingField};
use crate::pages;

pub struct Desk {
    core: Core,
    nav_model: nav_bar::Model,
    config: DeskConfig,
    cosmic_config: cosmic::cosmic_config::Config,
    active_page: Page,

    // Remote clients
    http: reqwest::Client,
    webhook: WebhookClient,
    auth: Arc<FirebaseAuth>,
    firestore: Arc<FirestoreClient>,

    // Page state
    chat: ChatPanel,
    board: ContactBoard,

    // Settings
    poll_interval_input: String,
}

pub struct Flags {
    pub config: DeskConfig,
    pub cosmic_config: cosmic::cosmic_config::Config,
}

impl Application for Desk {
    type Executor = executor::Default;
    type Flags = Flags;
    type Message = Message;

    const APP_ID: &'static str = "dev.desk.app";

    fn core(&self) -> &Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut Core {
        &mut self.core
    }

    fn init(core: Core, flags: Self::Flags) -> (Self, CosmicTask<Self::Message>) {
        let config = flags.config;
        let cosmic_config = flags.cosmic_config;

        let mut nav_model = nav_bar::Model::default();
        for page in Page::ALL {
            nav_model
                .insert()
                .text(page.title())
                .icon(icon::from_name(page.icon_name()).icon())
                .data(*page);
        }
        nav_model.activate_position(0);

        let http = reqwest::Client::new();
        let webhook = WebhookClient::new(&config.webhook_url, http.clone());
        let auth = Arc::new(FirebaseAuth::new(&config.firebase, http.clone()));
        let firestore = Arc::new(FirestoreClient::new(&config.firebase, http.clone(), auth.clone()));

        let mut app = Self {
            core,
            nav_model,
            poll_interval_input: config.poll_interval_secs.to_string(),
            config,
            cosmic_config,
            active_page: Page::Assistant,
            http,
            webhook,
            auth,
            firestore,
            chat: ChatPanel::new(),
            board: ContactBoard::new(),
        };

        // One anonymous sign-in per run; a failure leaves contacts disabled.
        if !app.config.firebase.is_ready() {
            app.board.session_started(Err(FirebaseError::NotConfigured.to_string()));
            return (app, CosmicTask::none());
        }

        let auth = app.auth.clone();
        let task = CosmicTask::perform(
            async move { auth.sign_in_anonymously().await.map_err(|e| e.to_string()) },
            |result| cosmic::Action::App(Message::SignedIn(result)),
        );

        (app, task)
    }

    fn nav_model(&self) -> Option<&nav_bar::Model> {
        Some(&self.nav_model)
    }

    fn on_nav_select(&mut self, id: nav_bar::Id) -> CosmicTask<Message> {
        if let Some(page) = self.nav_model.data::<Page>(id).cloned() {
            self.active_page = page;
            self.nav_model.activate(id);
        }
        CosmicTask::none()
    }

    fn update(&mut self, message: Message) -> CosmicTask<Message> {
        match message {
            // --- Assistant ---
            Message::AssistantInputChanged(value) => {
                self.chat.set_input(value);
            }

            Message::AssistantSubmit => {
                if let Some(command) = self.chat.begin() {
                    let webhook = self.webhook.clone();
                    return CosmicTask::perform(
                        async move { webhook.send_command(&command).await.map_err(|e| e.to_string()) },
                        |result| cosmic::Action::App(Message::AssistantReplied(result)),
                    );
                }
            }

            Message::AssistantReplied(result) => {
                self.chat.finish_with(result);
            }

            // --- Contacts session and feed ---
            Message::SignedIn(result) => {
                self.board.session_started(result);
            }

            Message::ContactsSnapshot(result) => match result {
                Ok(contacts) => self.board.apply_snapshot(contacts),
                Err(e) => self.board.subscription_failed(e),
            },

            Message::ReconnectContacts => {
                self.board.resubscribe();
            }

            // --- Contacts CRUD ---
            Message::OpenAddContact => {
                self.board.open_add();
            }

            Message::EditContact(id) => {
                self.board.start_edit(&id);
            }

            Message::ContactFieldChanged(field, value) => {
                self.board.set_field(field, value);
            }

            Message::AttachContactImage => {
                let path = self.board.form().image_path.trim().to_string();
                if !path.is_empty() {
                    if let Err(e) = self.board.attach_image(std::path::Path::new(&path)) {
                        log::warn!("Could not attach {}: {}", path, e);
                    }
                }
            }

            Message::ContactSubmit => {
                let uid = self.board.session_uid().map(str::to_string);
                if let (Some(uid), Ok(write)) = (uid, self.board.submit()) {
                    let firestore = self.firestore.clone();
                    return CosmicTask::perform(
                        async move {
                            let result = match write {
                                Write::Create(draft) => {
                                    firestore.create_contact(&uid, &draft).await.map(|_| ())
                                }
                                Write::Update { id, draft } => {
                                    firestore.update_contact(&uid, &id, &draft).await
                                }
                            };
                            result.map_err(|e| e.to_string())
                        },
                        |result| cosmic::Action::App(Message::ContactSaved(result)),
                    );
                }
            }

            Message::ContactSaved(result) => {
                self.board.write_finished(result);
            }

            Message::ConfirmDeleteContact(id) => {
                self.board.request_delete(&id);
            }

            Message::CancelContactForm => {
                self.board.cancel();
            }

            Message::DeleteContact => {
                let uid = self.board.session_uid().map(str::to_string);
                if let (Some(uid), Some(id)) = (uid, self.board.confirm_delete()) {
                    let firestore = self.firestore.clone();
                    return CosmicTask::perform(
                        async move {
                            firestore
                                .delete_contact(&uid, &id)
                                .await
                                .map_err(|e| e.to_string())
                        },
                        |result| cosmic::Action::App(Message::ContactDeleted(result)),
                    );
                }
            }

            Message::ContactDeleted(result) => {
                self.board.delete_finished(result);
            }

            Message::DismissContactError => {
                self.board.dismiss_error();
            }

            // --- Settings ---
            Message::SetSetting(field, value) => {
                match field {
                    SettingField::WebhookUrl => {
                        self.config.webhook_url = value;
                        self.webhook = WebhookClient::new(&self.config.webhook_url, self.http.clone());
                    }
                    SettingField::ApiKey => self.config.firebase.api_key = value,
                    SettingField::ProjectId => self.config.firebase.project_id = value,
                    SettingField::AppId => self.config.firebase.app_id = value,
                    SettingField::AuthUrl => self.config.firebase.auth_url = value,
                    SettingField::TokenUrl => self.config.firebase.token_url = value,
                    SettingField::FirestoreUrl => self.config.firebase.firestore_url = value,
                    SettingField::PollInterval => {
                        if let Ok(secs) = value.trim().parse::<u64>() {
                            self.config.poll_interval_secs = secs;
                        }
                        self.poll_interval_input = value;
                    }
                }
                self.save_config();
            }

            Message::ToggleDebugLogging => {
                self.config.debug_logging = !self.config.debug_logging;
                crate::set_debug_logging(self.config.debug_logging);
                self.save_config();
            }
        }

        CosmicTask::none()
    }

    fn on_escape(&mut self) -> CosmicTask<Message> {
        if self.active_page == Page::Contacts {
            self.board.cancel();
        }
        CosmicTask::none()
    }

    fn subscription(&self) -> Subscription<Message> {
        // Keyed by uid and generation: a new key starts a fresh feed and the old
        // stream is dropped, which ends its polling loop.
        let Some(uid) = self.board.session_uid() else {
            return Subscription::none();
        };

        let feed = self
            .firestore
            .clone()
            .watch_contacts(uid.to_string(), self.config.poll_interval())
            .map(|result| Message::ContactsSnapshot(result.map_err(|e| e.to_string())));

        Subscription::run_with_id((uid.to_string(), self.board.feed_generation()), feed)
    }

    fn view(&self) -> Element<'_, Message> {
        match self.active_page {
            Page::Assistant => pages::assistant::assistant_view(&self.chat),
            Page::Contacts => pages::contacts::contacts_view(&self.board),
            Page::Settings => pages::settings::settings_view(&self.config, &self.poll_interval_input),
        }
    }
}

impl Desk {
    fn save_config(&self) {
        use cosmic::cosmic_config::CosmicConfigEntry;
        if let Err(e) = self.config.write_entry(&self.cosmic_config) {
            log::error!("Failed to save config: {:?}", e);
        }
    }
}
