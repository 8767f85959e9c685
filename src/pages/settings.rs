use cosmic::iced::{Alignment, Length};
use cosmic::widget::{column, container, row, scrollable, text, text_input};
use cosmic::Element;

use crate::config::DeskConfig;
use crate::fl;
use crate::message::{Message, SettingField};

fn setting_input<'a>(label: String, value: &'a str, field: SettingField) -> Element<'a, Message> {
    column()
        .spacing(4)
        .push(text::caption(label))
        .push(
            text_input::text_input("", value)
                .on_input(move |v| Message::SetSetting(field, v))
                .width(Length::Fill),
        )
        .into()
}

pub fn settings_view<'a>(config: &'a DeskConfig, poll_interval_input: &'a str) -> Element<'a, Message> {
    let mut content = column().spacing(12);

    // --- Assistant ---
    content = content.push(text::title4(fl!("settings-assistant")));
    content = content.push(setting_input(
        fl!("settings-webhook-url"),
        &config.webhook_url,
        SettingField::WebhookUrl,
    ));

    // --- Contacts backend ---
    content = content.push(text::title4(fl!("settings-firebase")));
    content = content.push(text::caption(fl!("settings-restart-note")));
    content = content.push(
        column()
            .spacing(4)
            .push(text::caption(fl!("settings-api-key")))
            .push(
                text_input::secure_input("", &config.firebase.api_key, None::<Message>, true)
                    .on_input(|v| Message::SetSetting(SettingField::ApiKey, v))
                    .width(Length::Fill),
            ),
    );
    content = content.push(setting_input(
        fl!("settings-project-id"),
        &config.firebase.project_id,
        SettingField::ProjectId,
    ));
    content = content.push(setting_input(
        fl!("settings-app-id"),
        &config.firebase.app_id,
        SettingField::AppId,
    ));
    content = content.push(setting_input(
        fl!("settings-auth-url"),
        &config.firebase.auth_url,
        SettingField::AuthUrl,
    ));
    content = content.push(setting_input(
        fl!("settings-token-url"),
        &config.firebase.token_url,
        SettingField::TokenUrl,
    ));
    content = content.push(setting_input(
        fl!("settings-firestore-url"),
        &config.firebase.firestore_url,
        SettingField::FirestoreUrl,
    ));
    content = content.push(setting_input(
        fl!("settings-poll-interval"),
        poll_interval_input,
        SettingField::PollInterval,
    ));

    // --- Debug logging ---
    content = content.push(
        row()
            .spacing(8)
            .align_y(Alignment::Center)
            .push(text::body(fl!("settings-debug-logging")).width(Length::Fill))
            .push(
                cosmic::widget::toggler(config.debug_logging)
                    .on_toggle(|_| Message::ToggleDebugLogging),
            ),
    );

    container(scrollable(content.padding(16).width(Length::Fill)))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
