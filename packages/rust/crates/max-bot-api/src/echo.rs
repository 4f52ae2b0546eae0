use max_bot_api::schemes::{
    AttachmentRequest, BotStartedUpdate, Button, CallbackAnswer, MessageCallbackUpdate,
    MessageCreatedUpdate, Update, UpdateEvent,
};
use max_bot_api::{BotApi, ClassifiedError, MessageTarget, OutgoingMessage};

const HELP_TEXT: &str = "Send me anything and I will send it back.";

/// Reacts to one update: echoes messages, greets on start, answers buttons.
pub(crate) async fn handle_update(api: &BotApi, update: Update) -> Result<(), ClassifiedError> {
    match update {
        Update::MessageCreated(created) => echo_message(api, &created).await,
        Update::BotStarted(started) => greet(api, &started).await,
        Update::MessageCallback(callback) => answer_button(api, &callback).await,
        other => {
            tracing::debug!(update_type = %other.update_type(), "ignoring update");
            Ok(())
        }
    }
}

async fn echo_message(api: &BotApi, created: &MessageCreatedUpdate) -> Result<(), ClassifiedError> {
    let message = &created.message;
    let target = match (message.chat_id(), message.sender_id()) {
        (Some(chat_id), _) => MessageTarget::Chat(chat_id),
        (None, Some(user_id)) => MessageTarget::User(user_id),
        (None, None) => {
            tracing::debug!(mid = %message.body.mid, "message without chat or sender; skipping");
            return Ok(());
        }
    };

    let reply = match created.command() {
        Some("/start" | "/help") => OutgoingMessage::new(target)
            .text(HELP_TEXT)
            .attach(help_keyboard()),
        _ if message.body.text.is_empty() => OutgoingMessage::new(target).text(format!(
            "Got {} attachment(s).",
            message.body.attachments.len()
        )),
        _ => OutgoingMessage::new(target).text(message.body.text.clone()),
    };
    let sent = api
        .messages()
        .send_with_result(&reply.reply_to(message.body.mid.clone()))
        .await?;
    tracing::info!(target = %target, mid = %sent.body.mid, "echoed message");
    Ok(())
}

async fn greet(api: &BotApi, started: &BotStartedUpdate) -> Result<(), ClassifiedError> {
    let greeting = format!("Hello, {}! {HELP_TEXT}", started.user.display_name());
    api.messages()
        .send(
            &OutgoingMessage::to_chat(started.chat_id)
                .text(greeting)
                .attach(help_keyboard()),
        )
        .await
}

async fn answer_button(
    api: &BotApi,
    update: &MessageCallbackUpdate,
) -> Result<(), ClassifiedError> {
    let payload = update.callback.payload.as_deref().unwrap_or_default();
    let answer = CallbackAnswer {
        message: None,
        notification: Some(format!("You pressed {payload}")),
    };
    api.messages()
        .answer_on_callback(&update.callback.callback_id, &answer)
        .await?;
    Ok(())
}

fn help_keyboard() -> AttachmentRequest {
    AttachmentRequest::inline_keyboard(vec![vec![
        Button::callback("Ping", "ping"),
        Button::link("API docs", "https://dev.max.ru/docs-api"),
    ]])
}
