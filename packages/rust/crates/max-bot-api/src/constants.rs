/// Production endpoint of the MAX bot API.
pub const DEFAULT_API_URL: &str = "https://platform-api.max.ru/";
/// API schema version sent as the `v` query parameter.
pub const DEFAULT_API_VERSION: &str = "1.2.5";
/// Header carrying the subscription secret on webhook deliveries.
pub const WEBHOOK_SECRET_HEADER: &str = "x-max-bot-api-secret";

pub(crate) const USER_AGENT: &str = concat!("max-bot-api-rust/", env!("CARGO_PKG_VERSION"));

pub(crate) const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub(crate) const DEFAULT_HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;

pub(crate) const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;
pub(crate) const DEFAULT_POLL_PAUSE_MS: u64 = 1_000;
pub(crate) const DEFAULT_POLL_LIMIT: u32 = 50;
pub(crate) const MIN_POLL_LIMIT: u32 = 1;
pub(crate) const MAX_POLL_LIMIT: u32 = 1_000;
pub(crate) const POLL_TIMEOUT_GRACE_SECS: u64 = 5;
pub(crate) const DEFAULT_UPDATES_CAPACITY: usize = 8;

pub(crate) const SEND_RETRY_INITIAL_MS: u64 = 300;
pub(crate) const SEND_RETRY_MAX_MS: u64 = 3_000;
pub(crate) const SEND_MAX_RETRIES: u32 = 5;

pub(crate) const ERROR_BODY_DISPLAY_LIMIT: usize = 500;
pub(crate) const DEFAULT_WEBHOOK_PATH: &str = "/max/webhook";
pub(crate) const UPLOAD_FIELD_NAME: &str = "data";
pub(crate) const UPLOAD_FALLBACK_FILE_NAME: &str = "file";

pub(crate) const PATH_ME: &str = "me";
pub(crate) const PATH_CHATS: &str = "chats";
pub(crate) const PATH_ANSWERS: &str = "answers";
pub(crate) const PATH_UPDATES: &str = "updates";
pub(crate) const PATH_UPLOADS: &str = "uploads";
pub(crate) const PATH_MESSAGES: &str = "messages";
pub(crate) const PATH_SUBSCRIPTIONS: &str = "subscriptions";
pub(crate) const PATH_NOTIFY_EXISTS: &str = "notify/exists";
