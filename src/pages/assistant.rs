use cosmic::iced::{Alignment, Length};
use cosmic::widget::{button, column, container, row, scrollable, text, text_input};
use cosmic::{Element, theme};

use crate::assistant::{ChatPanel, Reply};
use crate::fl;
use crate::message::Message;

const REPLY_HEIGHT: f32 = 160.0;

fn reply_text(reply: &Reply) -> String {
    match reply {
        Reply::Greeting => fl!("assistant-greeting"),
        Reply::Thinking => fl!("assistant-thinking"),
        Reply::Answer(text) => text.clone(),
        Reply::Apology => fl!("assistant-apology"),
    }
}

pub fn assistant_view(chat: &ChatPanel) -> Element<'static, Message> {
    let mut content = column().spacing(16);

    content = content.push(text::title4(fl!("assistant-title")));

    // Reply area
    let mut reply_col = column().spacing(8).push(text::body(reply_text(chat.reply())));
    if let Some(err) = chat.error() {
        reply_col = reply_col.push(text::caption(fl!("assistant-error", detail = err.to_string())));
    }
    content = content.push(
        container(scrollable(reply_col.padding(12).width(Length::Fill)))
            .width(Length::Fill)
            .height(Length::Fixed(REPLY_HEIGHT))
            .class(theme::Container::Card),
    );

    // Input row; both controls are inert while a request is outstanding
    let mut input = text_input::text_input(fl!("assistant-placeholder"), chat.input().to_string())
        .width(Length::Fill);
    let mut send = if chat.is_in_flight() {
        button::suggested(fl!("assistant-sending"))
    } else {
        button::suggested(fl!("assistant-send"))
    };
    if !chat.is_in_flight() {
        input = input
            .on_input(Message::AssistantInputChanged)
            .on_submit(|_| Message::AssistantSubmit);
        send = send.on_press(Message::AssistantSubmit);
    }

    content = content.push(
        row()
            .spacing(8)
            .align_y(Alignment::Center)
            .push(input)
            .push(send),
    );

    container(content.padding(16).max_width(640))
        .center_x(Length::Fill)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
