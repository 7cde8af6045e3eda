//! Feedback backends for feedbackkit
//!
//! [`JiraProvider`] files issues through the Jira Cloud REST API and
//! [`WebhookProvider`] posts JSON to any HTTP endpoint. [`from_config`] picks
//! the backend named by the resolved [`Config`], including the in-process
//! `noop` and `preview` providers from `feedbackkit-core`.

mod jira;
mod webhook;

use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub use jira::{AI_MARKER, JiraConfig, JiraError, JiraProvider, format_description};
pub use webhook::{WebhookConfig, WebhookError, WebhookProvider};

use feedbackkit_config::{Config, ProviderKind};
use feedbackkit_core::{FeedbackError, FeedbackProvider, NoOpProvider, PreviewProvider};

/// Simulated latency of the preview provider
pub const PREVIEW_DELAY: Duration = Duration::from_secs(1);

/// Construct the provider selected by `config.provider`
///
/// # Errors
///
/// Returns `FeedbackError::InvalidConfiguration` when the selected backend has
/// no settings section, or the HTTP client cannot be built.
pub fn from_config(config: &Config) -> Result<Arc<dyn FeedbackProvider>, FeedbackError> {
    let provider: Arc<dyn FeedbackProvider> = match config.provider {
        ProviderKind::NoOp => Arc::new(NoOpProvider),
        ProviderKind::Preview => Arc::new(PreviewProvider::new(PREVIEW_DELAY)),
        ProviderKind::Jira => {
            let settings = config.jira.as_ref().ok_or_else(|| {
                FeedbackError::InvalidConfiguration("provider 'jira' has no [jira] settings".into())
            })?;
            let jira = JiraConfig::from_settings(settings, config.request_timeout);
            Arc::new(JiraProvider::new(jira).map_err(FeedbackError::from)?)
        }
        ProviderKind::Webhook => {
            let settings = config.webhook.as_ref().ok_or_else(|| {
                FeedbackError::InvalidConfiguration(
                    "provider 'webhook' has no [webhook] settings".into(),
                )
            })?;
            let webhook = WebhookConfig::from_settings(settings, config.request_timeout);
            Arc::new(WebhookProvider::new(webhook).map_err(FeedbackError::from)?)
        }
    };

    info!(provider = %config.provider, name = provider.name(), "Feedback provider ready");
    Ok(provider)
}


#[cfg(test)]
mod tests {
    use super::*;
    use feedbackkit_config::ConfigBuilder;
    use feedbackkit_core::{FeedbackItem, FeedbackMetadata};

    #[tokio::test]
    async fn test_from_config_defaults_to_noop() {
        let provider = from_config(&Config::default()).unwrap();
        assert_eq!(provider.name(), "NoOp");

        let result = provider
            .submit(
                &FeedbackItem::new("t", "d"),
                &FeedbackMetadata::new("1", "1", "d", "o", "l"),
            )
            .await
            .unwrap();
        assert!(result.identifier.starts_with("NOOP-"));
    }

    #[test]
    fn test_from_config_builds_selected_backend() {
        let jira = ConfigBuilder::new()
            .provider(ProviderKind::Jira)
            .jira("https://acme.atlassian.net", "a@b.c", "tok", "PROJ")
            .build()
            .unwrap();
        assert_eq!(from_config(&jira).unwrap().name(), "Jira");

        let webhook = ConfigBuilder::new()
            .provider(ProviderKind::Webhook)
            .webhook("https://hooks.test/feedback")
            .webhook_name("Inbox")
            .build()
            .unwrap();
        assert_eq!(from_config(&webhook).unwrap().name(), "Inbox");

        let preview = ConfigBuilder::new()
            .provider(ProviderKind::Preview)
            .build()
            .unwrap();
        assert_eq!(from_config(&preview).unwrap().name(), "Preview");
    }

    #[test]
    fn test_from_config_without_section_is_invalid_configuration() {
        let config = Config {
            provider: ProviderKind::Jira,
            ..Config::default()
        };
        let err = from_config(&config).err().unwrap();
        assert!(matches!(err, FeedbackError::InvalidConfiguration(_)));
    }
}
