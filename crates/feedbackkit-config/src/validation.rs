use std::path::PathBuf;
use std::time::Duration;

use crate::discovery::{RawAi, RawConfig, RawJira, RawWebhook};
use crate::error::ConfigError;
use crate::model::{
    AiProviderKind, AiSettings, AppSettings, Config, DEFAULT_COPIED_CONFIRMATION_MS,
    DEFAULT_JIRA_ISSUE_TYPE, DEFAULT_MAX_ATTACHMENT_BYTES, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_WEBHOOK_NAME, FlowSettings, JiraSettings, ProviderKind, WebhookSettings,
};

const MAX_REQUEST_TIMEOUT_SECS: u64 = 600;
const MAX_COPIED_CONFIRMATION_MS: u64 = 60_000;

impl RawConfig {
    /// Check every value and produce the effective configuration
    pub(crate) fn resolve(self, source: Option<PathBuf>) -> Result<Config, ConfigError> {
        let provider = match self.provider.kind.as_deref() {
            Some(kind) => kind.parse::<ProviderKind>()?,
            None => ProviderKind::default(),
        };

        let timeout_secs = self
            .provider
            .timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "provider.timeout_secs",
                "must be greater than 0",
            ));
        }
        if timeout_secs > MAX_REQUEST_TIMEOUT_SECS {
            return Err(ConfigError::invalid(
                "provider.timeout_secs",
                format!("exceeds maximum limit of {MAX_REQUEST_TIMEOUT_SECS} seconds"),
            ));
        }

        let jira = match provider {
            ProviderKind::Jira => Some(resolve_jira(self.jira)?),
            _ => None,
        };
        let webhook = match provider {
            ProviderKind::Webhook => Some(resolve_webhook(self.webhook)?),
            _ => None,
        };
        let ai = resolve_ai(self.ai)?;

        let copied_ms = self
            .flow
            .copied_confirmation_ms
            .unwrap_or(DEFAULT_COPIED_CONFIRMATION_MS);
        if copied_ms > MAX_COPIED_CONFIRMATION_MS {
            return Err(ConfigError::invalid(
                "flow.copied_confirmation_ms",
                format!("exceeds maximum limit of {MAX_COPIED_CONFIRMATION_MS} ms"),
            ));
        }

        Ok(Config {
            provider,
            request_timeout: Duration::from_secs(timeout_secs),
            jira,
            webhook,
            ai,
            app: AppSettings {
                version: non_blank(self.app.version),
                build: non_blank(self.app.build),
                custom_fields: self.app.custom_fields,
            },
            flow: FlowSettings {
                copied_confirmation_delay: Duration::from_millis(copied_ms),
            },
            source,
        })
    }
}

fn resolve_jira(raw: RawJira) -> Result<JiraSettings, ConfigError> {
    let base_url = required(raw.base_url, "JIRA_BASE_URL")?;
    let base_url = http_url("jira.base_url", &base_url)?;
    let email = required(raw.email, "JIRA_EMAIL")?;
    let api_token = required(raw.api_token, "JIRA_API_TOKEN")?;
    let project_key = required(raw.project_key, "JIRA_PROJECT_KEY")?;
    let issue_type =
        non_blank(raw.issue_type).unwrap_or_else(|| DEFAULT_JIRA_ISSUE_TYPE.to_string());

    Ok(JiraSettings {
        base_url,
        email,
        api_token,
        project_key,
        issue_type,
        custom_fields: raw.custom_fields,
        max_attachment_bytes: attachment_limit("jira.max_attachment_bytes", raw.max_attachment_bytes)?,
    })
}

fn resolve_webhook(raw: RawWebhook) -> Result<WebhookSettings, ConfigError> {
    let url = required(raw.url, "WEBHOOK_URL")?;
    let url = http_url("webhook.url", &url)?;

    for name in raw.headers.keys() {
        if name.trim().is_empty() || name.chars().any(|c| c.is_whitespace() || c == ':') {
            return Err(ConfigError::invalid(
                "webhook.headers",
                format!("'{name}' is not a valid header name"),
            ));
        }
    }

    Ok(WebhookSettings {
        url,
        token: non_blank(raw.token),
        name: non_blank(raw.name).unwrap_or_else(|| DEFAULT_WEBHOOK_NAME.to_string()),
        headers: raw.headers,
        max_attachment_bytes: attachment_limit(
            "webhook.max_attachment_bytes",
            raw.max_attachment_bytes,
        )?,
    })
}

fn resolve_ai(raw: RawAi) -> Result<Option<AiSettings>, ConfigError> {
    let Some(provider) = non_blank(raw.provider) else {
        return Ok(None);
    };
    let provider = provider.parse::<AiProviderKind>()?;
    let api_key = required(raw.api_key, provider.api_key_env())?;

    if let Some(max_tokens) = raw.max_tokens
        && max_tokens == 0
    {
        return Err(ConfigError::invalid("ai.max_tokens", "must be greater than 0"));
    }
    if let Some(temperature) = raw.temperature
        && !(0.0..=2.0).contains(&temperature)
    {
        return Err(ConfigError::invalid(
            "ai.temperature",
            format!("{temperature} is outside 0.0..=2.0"),
        ));
    }
    let base_url = match non_blank(raw.base_url) {
        Some(url) => Some(http_url("ai.base_url", &url)?),
        None => None,
    };

    Ok(Some(AiSettings {
        provider,
        api_key,
        model: non_blank(raw.model),
        max_tokens: raw.max_tokens,
        temperature: raw.temperature,
        system_prompt: non_blank(raw.system_prompt),
        base_url,
    }))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, env_name: &str) -> Result<String, ConfigError> {
    non_blank(value).ok_or_else(|| ConfigError::MissingRequired(env_name.to_string()))
}

/// Accept only absolute http(s) URLs; trailing slashes are dropped
fn http_url(key: &str, value: &str) -> Result<String, ConfigError> {
    let host = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    match host {
        Some(rest) if !rest.trim_matches('/').is_empty() => {
            Ok(value.trim_end_matches('/').to_string())
        }
        _ => Err(ConfigError::invalid(
            key,
            format!("'{value}' is not an http(s) URL"),
        )),
    }
}

fn attachment_limit(key: &str, value: Option<usize>) -> Result<usize, ConfigError> {
    match value {
        Some(0) => Err(ConfigError::invalid(key, "must be greater than 0")),
        Some(limit) => Ok(limit),
        None => Ok(DEFAULT_MAX_ATTACHMENT_BYTES),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> Result<Config, ConfigError> {
        Config::from_toml_str(toml)
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_unknown_provider_is_invalid_value() {
        let err = parse("[provider]\nkind = \"github\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_timeout_bounds() {
        assert!(parse("[provider]\ntimeout_secs = 0\n").is_err());
        assert!(parse("[provider]\ntimeout_secs = 601\n").is_err());
        assert_eq!(
            parse("[provider]\ntimeout_secs = 5\n").unwrap().request_timeout,
            Duration::from_secs(5)
        );
    }

    #[test]
    fn test_jira_section_ignored_for_other_providers() {
        let config = parse("[jira]\nbase_url = \"not a url\"\n").unwrap();
        assert_eq!(config.provider, ProviderKind::NoOp);
        assert!(config.jira.is_none());
    }

    #[test]
    fn test_jira_requires_values_in_order() {
        let err = parse("[provider]\nkind = \"jira\"\n").unwrap_err();
        assert_eq!(err, ConfigError::MissingRequired("JIRA_BASE_URL".into()));

        let err = parse(
            "[provider]\nkind = \"jira\"\n[jira]\nbase_url = \"https://x.test\"\nemail = \"a@b\"\napi_token = \"t\"\n",
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::MissingRequired("JIRA_PROJECT_KEY".into()));
    }

    #[test]
    fn test_jira_rejects_non_http_url() {
        let err = parse(
            "[provider]\nkind = \"jira\"\n[jira]\nbase_url = \"ftp://x\"\nemail = \"a\"\napi_token = \"t\"\nproject_key = \"P\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "jira.base_url"));
    }

    #[test]
    fn test_webhook_defaults_and_header_validation() {
        let config = parse(
            "[provider]\nkind = \"webhook\"\n[webhook]\nurl = \"https://hooks.test/fb/\"\n",
        )
        .unwrap();
        let webhook = config.webhook.unwrap();
        assert_eq!(webhook.url, "https://hooks.test/fb");
        assert_eq!(webhook.name, "Webhook");
        assert_eq!(webhook.token, None);
        assert_eq!(webhook.max_attachment_bytes, DEFAULT_MAX_ATTACHMENT_BYTES);

        let err = parse(
            "[provider]\nkind = \"webhook\"\n[webhook]\nurl = \"https://h.test\"\n[webhook.headers]\n\"X Bad\" = \"1\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "webhook.headers"));
    }

    #[test]
    fn test_ai_validation() {
        let ok = parse("[ai]\nprovider = \"openai\"\napi_key = \"sk\"\ntemperature = 0.2\n").unwrap();
        let ai = ok.ai.unwrap();
        assert_eq!(ai.provider, AiProviderKind::OpenAi);
        assert_eq!(ai.temperature, Some(0.2));

        assert!(parse("[ai]\nprovider = \"openai\"\napi_key = \"sk\"\ntemperature = 3.0\n").is_err());
        assert!(parse("[ai]\nprovider = \"openai\"\napi_key = \"sk\"\nmax_tokens = 0\n").is_err());
        assert_eq!(
            parse("[ai]\nprovider = \"anthropic\"\n").unwrap_err(),
            ConfigError::MissingRequired("ANTHROPIC_API_KEY".into())
        );
    }

    #[test]
    fn test_blank_ai_provider_disables_enhancement() {
        assert!(parse("[ai]\nprovider = \"  \"\n").unwrap().ai.is_none());
    }

    #[test]
    fn test_http_url_helper() {
        assert_eq!(http_url("k", "http://a/").unwrap(), "http://a");
        assert!(http_url("k", "https://").is_err());
        assert!(http_url("k", "example.com").is_err());
    }
}
