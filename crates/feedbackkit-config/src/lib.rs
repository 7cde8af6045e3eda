//! Configuration model, discovery, and validation for feedbackkit
//!
//! Precedence: environment > `feedbackkit.toml` > built-in defaults.
//!
//! ```toml
//! [provider]
//! kind = "jira"          # noop | preview | jira | webhook
//! timeout_secs = 60
//!
//! [jira]
//! base_url = "https://acme.atlassian.net"
//! email = "bot@acme.test"
//! api_token = "..."      # or JIRA_API_TOKEN
//! project_key = "PROJ"
//! issue_type = "Bug"
//!
//! [jira.custom_fields]
//! customfield_10001 = "iOS"
//! customfield_10002 = ["mobile", "beta"]
//!
//! [ai]
//! provider = "openai"    # or anthropic; key from OPENAI_API_KEY / ANTHROPIC_API_KEY
//!
//! [app]
//! version = "2.0.0"
//! build = "42"
//!
//! [flow]
//! copied_confirmation_ms = 2000
//! ```

mod builder;
mod discovery;
mod error;
mod model;
mod validation;

pub use builder::ConfigBuilder;
pub use discovery::{CONFIG_FILE_NAME, CONFIG_PATH_ENV};
pub use error::ConfigError;
pub use model::{
    AiProviderKind, AiSettings, AppSettings, Config, DEFAULT_COPIED_CONFIRMATION_MS,
    DEFAULT_JIRA_ISSUE_TYPE, DEFAULT_MAX_ATTACHMENT_BYTES, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_WEBHOOK_NAME, FlowSettings, JiraFieldValue, JiraSettings, ProviderKind,
    WebhookSettings,
};
