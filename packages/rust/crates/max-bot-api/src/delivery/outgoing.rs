use max_bot_schemes::{
    AttachmentRequest, MessageLinkType, NewMessageBody, NewMessageLink, TextFormat,
};

use crate::transport::AuthMode;

/// Where a message goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageTarget {
    Chat(i64),
    User(i64),
}

impl MessageTarget {
    pub(crate) fn query_pair(self) -> (&'static str, i64) {
        match self {
            Self::Chat(chat_id) => ("chat_id", chat_id),
            Self::User(user_id) => ("user_id", user_id),
        }
    }
}

impl std::fmt::Display for MessageTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Chat(chat_id) => write!(f, "chat {chat_id}"),
            Self::User(user_id) => write!(f, "user {user_id}"),
        }
    }
}

/// A message ready for `POST /messages`.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMessage {
    target: MessageTarget,
    body: NewMessageBody,
    auth: AuthMode,
}

impl OutgoingMessage {
    #[must_use]
    pub fn to_chat(chat_id: i64) -> Self {
        Self::new(MessageTarget::Chat(chat_id))
    }

    #[must_use]
    pub fn to_user(user_id: i64) -> Self {
        Self::new(MessageTarget::User(user_id))
    }

    #[must_use]
    pub fn new(target: MessageTarget) -> Self {
        Self {
            target,
            body: NewMessageBody::default(),
            auth: AuthMode::Bot,
        }
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.body.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn format(mut self, format: TextFormat) -> Self {
        self.body.format = Some(format);
        self
    }

    /// Sends as a reply to message `mid`.
    #[must_use]
    pub fn reply_to(mut self, mid: impl Into<String>) -> Self {
        self.body.link = Some(NewMessageLink {
            link_type: MessageLinkType::Reply,
            mid: mid.into(),
        });
        self
    }

    /// Forwards message `mid`.
    #[must_use]
    pub fn forward(mut self, mid: impl Into<String>) -> Self {
        self.body.link = Some(NewMessageLink {
            link_type: MessageLinkType::Forward,
            mid: mid.into(),
        });
        self
    }

    /// `false` delivers silently.
    #[must_use]
    pub fn notify(mut self, notify: bool) -> Self {
        self.body.notify = Some(notify);
        self
    }

    #[must_use]
    pub fn attach(mut self, attachment: AttachmentRequest) -> Self {
        self.body.push_attachment(attachment);
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: NewMessageBody) -> Self {
        self.body = body;
        self
    }

    #[must_use]
    pub fn with_auth(mut self, auth: AuthMode) -> Self {
        self.auth = auth;
        self
    }

    #[must_use]
    pub fn target(&self) -> MessageTarget {
        self.target
    }

    #[must_use]
    pub fn body(&self) -> &NewMessageBody {
        &self.body
    }

    #[must_use]
    pub fn auth_mode(&self) -> AuthMode {
        self.auth
    }
}
