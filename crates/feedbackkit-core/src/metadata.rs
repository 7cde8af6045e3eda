//! Metadata collectors

use async_trait::async_trait;
use std::collections::BTreeMap;
use sysinfo::System;
use tracing::debug;

use crate::capability::MetadataCollector;
use crate::types::FeedbackMetadata;

/// Value reported for anything the host does not expose
pub const UNKNOWN: &str = "Unknown";

/// Collects metadata from the running host
///
/// App version and build come from the embedding application, usually its
/// `CARGO_PKG_VERSION`, since this crate cannot see them.
#[derive(Debug, Clone, Default)]
pub struct DefaultMetadataCollector {
    app_version: Option<String>,
    app_build: Option<String>,
    custom_fields: BTreeMap<String, String>,
}

impl DefaultMetadataCollector {
    #[must_use]
    pub fn new(app_version: impl Into<String>, app_build: impl Into<String>) -> Self {
        Self {
            app_version: Some(app_version.into()),
            app_build: Some(app_build.into()),
            custom_fields: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_custom_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_fields.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_custom_fields(mut self, fields: BTreeMap<String, String>) -> Self {
        self.custom_fields.extend(fields);
        self
    }
}

#[async_trait]
impl MetadataCollector for DefaultMetadataCollector {
    async fn collect(&self) -> FeedbackMetadata {
        let metadata = FeedbackMetadata {
            app_version: non_empty_or_unknown(self.app_version.as_deref()),
            app_build: non_empty_or_unknown(self.app_build.as_deref()),
            device_model: device_model(),
            os_version: os_version(),
            locale: locale_from(|key| std::env::var(key).ok()),
            custom_fields: self.custom_fields.clone(),
        };
        debug!(
            os_version = %metadata.os_version,
            locale = %metadata.locale,
            custom_fields = metadata.custom_fields.len(),
            "Collected feedback metadata"
        );
        metadata
    }
}

/// Returns the same metadata on every call
#[derive(Debug, Clone)]
pub struct StaticMetadataCollector {
    metadata: FeedbackMetadata,
}

impl StaticMetadataCollector {
    #[must_use]
    pub fn new(metadata: FeedbackMetadata) -> Self {
        Self { metadata }
    }
}

impl Default for StaticMetadataCollector {
    fn default() -> Self {
        Self::new(FeedbackMetadata::new(
            "1.0.0", "1", "Preview Device", "Preview OS", "en_US",
        ))
    }
}

#[async_trait]
impl MetadataCollector for StaticMetadataCollector {
    async fn collect(&self) -> FeedbackMetadata {
        self.metadata.clone()
    }
}

fn non_empty_or_unknown(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

fn device_model() -> String {
    format!("{} ({})", std::env::consts::ARCH, std::env::consts::OS)
}

fn os_version() -> String {
    System::long_os_version()
        .or_else(|| match (System::name(), System::os_version()) {
            (Some(name), Some(version)) => Some(format!("{name} {version}")),
            (Some(name), None) => Some(name),
            _ => None,
        })
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Resolve the locale from POSIX environment variables
///
/// `LC_ALL` wins over `LC_MESSAGES`, which wins over `LANG`. The encoding and
/// modifier suffixes are dropped (`de_DE.UTF-8@euro` becomes `de_DE`). `C` and
/// `POSIX` are not real locales and count as unset.
pub(crate) fn locale_from(lookup: impl Fn(&str) -> Option<String>) -> String {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .into_iter()
        .filter_map(|key| lookup(key))
        .map(|raw| {
            raw.split(['.', '@'])
                .next()
                .unwrap_or_default()
                .trim()
                .to_string()
        })
        .find(|locale| !locale.is_empty() && locale != "C" && locale != "POSIX")
        .unwrap_or_else(|| UNKNOWN.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_locale_precedence() {
        let lookup = env(&[("LANG", "fr_FR.UTF-8"), ("LC_ALL", "de_DE.UTF-8@euro")]);
        assert_eq!(locale_from(lookup), "de_DE");

        let lookup = env(&[("LANG", "fr_FR.UTF-8"), ("LC_MESSAGES", "es_ES")]);
        assert_eq!(locale_from(lookup), "es_ES");
    }

    #[test]
    fn test_locale_skips_posix_and_empty() {
        let lookup = env(&[("LC_ALL", "C"), ("LC_MESSAGES", ""), ("LANG", "en_GB.UTF-8")]);
        assert_eq!(locale_from(lookup), "en_GB");
        assert_eq!(locale_from(env(&[("LANG", "POSIX")])), UNKNOWN);
        assert_eq!(locale_from(env(&[])), UNKNOWN);
    }

    #[tokio::test]
    async fn test_default_collector_fills_every_field() {
        let collector =
            DefaultMetadataCollector::new("2.1.0", "  ").with_custom_field("tenant", "acme");
        let metadata = collector.collect().await;

        assert_eq!(metadata.app_version, "2.1.0");
        assert_eq!(metadata.app_build, UNKNOWN);
        assert!(!metadata.device_model.is_empty());
        assert!(!metadata.os_version.is_empty());
        assert!(!metadata.locale.is_empty());
        assert_eq!(metadata.custom_fields.get("tenant").map(String::as_str), Some("acme"));
    }

    #[tokio::test]
    async fn test_default_collector_without_app_info() {
        let metadata = DefaultMetadataCollector::default().collect().await;
        assert_eq!(metadata.app_version, UNKNOWN);
        assert_eq!(metadata.app_build, UNKNOWN);
        assert!(metadata.custom_fields.is_empty());
    }

    #[tokio::test]
    async fn test_static_collector_returns_fixed_value() {
        let fixed = FeedbackMetadata::new("1.0", "1", "iPhone", "17.0", "en_US");
        let collector = StaticMetadataCollector::new(fixed.clone());
        assert_eq!(collector.collect().await, fixed);
        assert_eq!(collector.collect().await, fixed);
    }
}
