use cosmic::iced::{Alignment, Length};
use cosmic::widget::{button, column, container, flex_row, icon, row, scrollable, text, text_input};
use cosmic::{Element, theme};

use crate::contacts::Contact;
use crate::contacts::board::{ContactBoard, ContactForm, FormField, Mode, SessionState};
use crate::contacts::image;
use crate::fl;
use crate::message::Message;

const CARD_WIDTH: f32 = 280.0;

fn detail_line(label: String, value: &str) -> Option<Element<'static, Message>> {
    if value.is_empty() {
        return None;
    }
    Some(
        row()
            .spacing(6)
            .push(text::caption(format!("{}:", label)))
            .push(text::caption(value.to_string()))
            .into(),
    )
}

fn form_input(
    placeholder: String,
    value: &str,
    field: FormField,
) -> Element<'static, Message> {
    text_input::text_input(placeholder, value.to_string())
        .on_input(move |v| Message::ContactFieldChanged(field, v))
        .on_submit(|_| Message::ContactSubmit)
        .width(Length::Fill)
        .into()
}

fn contact_form(form: &ContactForm, editing: Option<&Contact>, pending: bool) -> Element<'static, Message> {
    let mut col = column().spacing(8);

    let heading = match editing {
        Some(c) => fl!("contacts-editing", name = c.name.clone()),
        None => fl!("contacts-new"),
    };
    col = col.push(text::title4(heading));

    col = col.push(form_input(fl!("contacts-name"), &form.name, FormField::Name));
    col = col.push(form_input(fl!("contacts-email"), &form.email, FormField::Email));
    col = col.push(form_input(fl!("contacts-linkedin"), &form.linkedin, FormField::Linkedin));
    col = col.push(form_input(fl!("contacts-notes"), &form.notes, FormField::Notes));
    let mut attach = button::standard(fl!("contacts-attach"));
    if !pending && !form.image_path.trim().is_empty() {
        attach = attach.on_press(Message::AttachContactImage);
    }
    col = col.push(
        row()
            .spacing(8)
            .align_y(Alignment::Center)
            .push(form_input(fl!("contacts-image-path"), &form.image_path, FormField::ImagePath))
            .push(attach),
    );

    if let Some(data_url) = &form.image {
        let size = image::payload_len(data_url) as u64;
        col = col.push(text::caption(fl!("contacts-image-attached", size = size)));
    } else if let Some(c) = editing.filter(|c| c.has_image()) {
        let size = image::payload_len(&c.image) as u64;
        col = col.push(text::caption(fl!("contacts-keeps-image", size = size)));
    }

    let save = if pending {
        button::suggested(fl!("contacts-saving"))
    } else {
        button::suggested(fl!("contacts-save")).on_press(Message::ContactSubmit)
    };
    let mut cancel = button::standard(fl!("contacts-cancel"));
    if !pending {
        cancel = cancel.on_press(Message::CancelContactForm);
    }

    col = col.push(row().spacing(8).push(save).push(cancel));

    container(col)
        .padding(12)
        .width(Length::Fill)
        .class(theme::Container::Card)
        .into()
}

fn contact_card(contact: &Contact, confirming_delete: bool, pending: bool) -> Element<'static, Message> {
    let mut col = column().spacing(6);

    col = col.push(text::body(contact.name.clone()));

    if let Some(line) = detail_line(fl!("contacts-email"), &contact.email) {
        col = col.push(line);
    }
    if let Some(line) = detail_line(fl!("contacts-linkedin"), &contact.linkedin) {
        col = col.push(line);
    }
    if !contact.notes.is_empty() {
        col = col.push(text::caption(contact.notes.clone()));
    }
    if contact.has_image() {
        let size = image::payload_len(&contact.image) as u64;
        col = col.push(
            row()
                .spacing(6)
                .align_y(Alignment::Center)
                .push(icon::from_name("image-x-generic-symbolic").size(16).icon())
                .push(text::caption(fl!("contacts-has-image", size = size))),
        );
    }

    let stamp = match contact.updated_at {
        Some(updated) => {
            let date = updated.format("%Y-%m-%d %H:%M").to_string();
            fl!("contacts-updated", date = date)
        }
        None => {
            let date = contact.created_at.format("%Y-%m-%d %H:%M").to_string();
            fl!("contacts-created", date = date)
        }
    };
    col = col.push(text::caption(stamp).size(11.0));

    if confirming_delete {
        col = col.push(text::caption(fl!("contacts-delete-confirm", name = contact.name.clone())));
        let mut delete = button::destructive(fl!("contacts-delete"));
        let mut cancel = button::standard(fl!("contacts-cancel"));
        if !pending {
            delete = delete.on_press(Message::DeleteContact);
            cancel = cancel.on_press(Message::CancelContactForm);
        }
        col = col.push(row().spacing(8).push(delete).push(cancel));
    } else {
        let mut edit = button::standard(fl!("contacts-edit"));
        let mut delete = button::icon(icon::from_name("edit-delete-symbolic"));
        if !pending {
            edit = edit.on_press(Message::EditContact(contact.id.clone()));
            delete = delete.on_press(Message::ConfirmDeleteContact(contact.id.clone()));
        }
        col = col.push(row().spacing(8).align_y(Alignment::Center).push(edit).push(delete));
    }

    container(col)
        .padding(12)
        .width(Length::Fixed(CARD_WIDTH))
        .class(theme::Container::Card)
        .into()
}

pub fn contacts_view(board: &ContactBoard) -> Element<'static, Message> {
    let mut content = column().spacing(12);

    let ready = board.session_uid().is_some();
    let mut add = button::icon(icon::from_name("list-add-symbolic"));
    if ready && !board.is_pending() {
        add = add.on_press(Message::OpenAddContact);
    }
    content = content.push(
        row()
            .spacing(8)
            .align_y(Alignment::Center)
            .push(text::title4(fl!("contacts-title")).width(Length::Fill))
            .push(add),
    );

    match board.session() {
        SessionState::Connecting => {
            content = content.push(text::caption(fl!("contacts-connecting")));
        }
        SessionState::Failed(e) => {
            content = content.push(
                container(text::body(fl!("contacts-session-failed", detail = e.clone())))
                    .padding(32)
                    .center_x(Length::Fill)
                    .width(Length::Fill),
            );
            return container(scrollable(content.padding(16).width(Length::Fill)))
                .width(Length::Fill)
                .height(Length::Fill)
                .into();
        }
        SessionState::Ready(_) => {}
    }

    // The feed stays down until the user reconnects, so this banner has no dismiss.
    if let Some(err) = board.feed_error() {
        content = content.push(
            row()
                .spacing(8)
                .align_y(Alignment::Center)
                .push(icon::from_name("network-error-symbolic").size(16).icon())
                .push(text::body(err.to_string()).width(Length::Fill))
                .push(
                    button::standard(fl!("contacts-reconnect"))
                        .on_press(Message::ReconnectContacts),
                ),
        );
    }

    if let Some(err) = board.error() {
        content = content.push(
            row()
                .spacing(8)
                .align_y(Alignment::Center)
                .push(icon::from_name("dialog-warning-symbolic").size(16).icon())
                .push(text::body(err.to_string()).width(Length::Fill))
                .push(
                    button::icon(icon::from_name("window-close-symbolic"))
                        .on_press(Message::DismissContactError),
                ),
        );
    }

    match board.mode() {
        Mode::Adding => {
            content = content.push(contact_form(board.form(), None, board.is_pending()));
        }
        Mode::Editing(id) => {
            content = content.push(contact_form(board.form(), board.contact(id), board.is_pending()));
        }
        Mode::Idle | Mode::ConfirmingDelete(_) => {}
    }

    if board.is_loading() && ready {
        content = content.push(text::caption(fl!("contacts-loading")));
    } else if board.contacts().is_empty() && ready {
        content = content.push(
            container(text::body(fl!("contacts-empty")))
                .padding(32)
                .center_x(Length::Fill)
                .width(Length::Fill),
        );
    } else {
        let staged = match board.mode() {
            Mode::ConfirmingDelete(id) => Some(id.as_str()),
            _ => None,
        };
        let cards: Vec<Element<'static, Message>> = board
            .contacts()
            .iter()
            .map(|c| contact_card(c, staged == Some(c.id.as_str()), board.is_pending()))
            .collect();

        content = content.push(flex_row(cards).row_spacing(12).column_spacing(12));
    }

    container(scrollable(content.padding(16).width(Length::Fill)))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
