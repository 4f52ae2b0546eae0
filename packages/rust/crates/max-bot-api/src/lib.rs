//! max-bot-api - Client for the MAX messenger bot API
//!
//! Long polling with a server-side marker, send/edit calls that ride out the
//! attachment-not-ready race after uploads, typed resource operations, and an
//! `axum` webhook router. Wire types and the update decoder live in
//! [`max_bot_schemes`], re-exported here as [`schemes`].
//!
//! # Architecture
//!
//! ```text
//! max-bot-api/src/
//! ├── lib.rs        # Re-exports (this file)
//! ├── api.rs        # BotApi: shared transport, config, root cancellation token
//! ├── config/       # ClientConfig, env + YAML settings resolution
//! ├── constants.rs  # Defaults and endpoint paths
//! ├── error.rs      # ClassifiedError, ApiError, ConfigError
//! ├── transport/    # Transport trait, reqwest implementation
//! ├── polling/      # Update pages, polling loop, UpdateStream
//! ├── delivery/     # OutgoingMessage, RetryPolicy, retry engine
//! ├── resources/    # Bots, Chats, Messages, Subscriptions, Uploads
//! └── webhook/      # axum ingestion router and server
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use max_bot_api::{BotApi, OutgoingMessage, schemes::Update};
//!
//! let api = BotApi::from_env()?;
//! let mut updates = api.start_polling();
//! while let Some(update) = updates.recv().await {
//!     if let Update::MessageCreated(created) = update
//!         && let Some(chat_id) = created.message.chat_id()
//!     {
//!         api.messages()
//!             .send(&OutgoingMessage::to_chat(chat_id).text("pong"))
//!             .await?;
//!     }
//! }
//! ```

#![allow(missing_docs)]

mod api;
mod config;
mod constants;
mod delivery;
mod error;
mod polling;
mod resources;
mod transport;
mod webhook;

pub use max_bot_schemes as schemes;

pub use api::BotApi;
pub use config::{
    BotSettings, ClientConfig, ENV_API_URL, ENV_API_VERSION, ENV_HTTP_TIMEOUT_SECS,
    ENV_POLL_LIMIT, ENV_POLL_PAUSE_MS, ENV_POLL_TIMEOUT_SECS, ENV_TOKEN, ENV_UPDATE_TYPES,
    ENV_UPDATES_CAPACITY, PollingSettings, WebhookSettings,
};
pub use constants::{DEFAULT_API_URL, DEFAULT_API_VERSION, WEBHOOK_SECRET_HEADER};
pub use delivery::{MessageTarget, OutgoingMessage, RetryPolicy};
pub use error::{ATTACHMENT_NOT_READY_CODES, ApiError, ClassifiedError, ConfigError};
pub use polling::{PollingOptions, UpdateStream, UpdatesPage, UpdatesQuery};
pub use resources::{Bots, Chats, Messages, MessagesQuery, Subscriptions, Uploads};
pub use transport::{
    ApiRequest, AuthMode, DownloadedFile, HttpTransport, MultipartUpload, Transport,
};
pub use webhook::{WebhookApp, WebhookConfig, build_webhook_app, run_webhook_server};
