//! Feedback value types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::attachment::Attachment;

/// Description used when the user left the message empty
pub const NO_DESCRIPTION: &str = "No description provided";

/// A feedback submission: title, description and attachments
///
/// Built fresh for each submission attempt and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackItem {
    /// The title/summary of the feedback
    pub title: String,
    /// The detailed description of the feedback
    pub description: String,
    /// Screenshots and files, owned by this item
    pub attachments: Vec<Attachment>,
    /// Whether the description was rewritten by an enhancer
    pub is_ai_generated: bool,
}

impl FeedbackItem {
    /// Create a new feedback item without attachments
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            attachments: Vec::new(),
            is_ai_generated: false,
        }
    }

    /// Add an attachment
    #[must_use]
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Mark the description as AI-generated
    #[must_use]
    pub fn ai_generated(mut self, is_ai_generated: bool) -> Self {
        self.is_ai_generated = is_ai_generated;
        self
    }

    /// Description text, or [`NO_DESCRIPTION`] when it is blank
    #[must_use]
    pub fn description_or_placeholder(&self) -> &str {
        if self.description.trim().is_empty() {
            NO_DESCRIPTION
        } else {
            &self.description
        }
    }

    /// Total size of all attachments in bytes
    #[must_use]
    pub fn attachments_len(&self) -> usize {
        self.attachments.iter().map(Attachment::len).sum()
    }
}

/// App and device context collected when feedback is submitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackMetadata {
    /// App version (e.g., "1.0.0")
    pub app_version: String,
    /// App build number (e.g., "123")
    pub app_build: String,
    /// Device model (e.g., "x86_64 (linux)")
    pub device_model: String,
    /// OS version (e.g., "Linux 6.8 Ubuntu 24.04")
    pub os_version: String,
    /// Locale identifier (e.g., "en_US")
    pub locale: String,
    /// Custom key-value pairs, ordered by key
    #[serde(default)]
    pub custom_fields: BTreeMap<String, String>,
}

impl FeedbackMetadata {
    #[must_use]
    pub fn new(
        app_version: impl Into<String>,
        app_build: impl Into<String>,
        device_model: impl Into<String>,
        os_version: impl Into<String>,
        locale: impl Into<String>,
    ) -> Self {
        Self {
            app_version: app_version.into(),
            app_build: app_build.into(),
            device_model: device_model.into(),
            os_version: os_version.into(),
            locale: locale.into(),
            custom_fields: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_custom_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_fields.insert(key.into(), value.into());
        self
    }
}

/// The receipt of a successful submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackResult {
    /// Identifier assigned by the backend (e.g., "IOS-1234")
    pub identifier: String,
    /// Where the feedback can be viewed, if the backend has a page for it
    pub url: Option<String>,
    /// Name of the provider that handled the submission
    pub provider_name: String,
}

impl FeedbackResult {
    #[must_use]
    pub fn new(
        identifier: impl Into<String>,
        url: Option<String>,
        provider_name: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            url,
            provider_name: provider_name.into(),
        }
    }

    /// The value to copy or share: the URL when present, else the identifier
    #[must_use]
    pub fn reference(&self) -> &str {
        self.url.as_deref().unwrap_or(&self.identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachment::Attachment;

    #[test]
    fn test_reference_prefers_url() {
        let with_url = FeedbackResult::new(
            "PROJ-42",
            Some("https://x/PROJ-42".to_string()),
            "Tracker",
        );
        assert_eq!(with_url.reference(), "https://x/PROJ-42");

        let without_url = FeedbackResult::new("PROJ-42", None, "Tracker");
        assert_eq!(without_url.reference(), "PROJ-42");
    }

    #[test]
    fn test_description_placeholder() {
        assert_eq!(
            FeedbackItem::new("t", "  ").description_or_placeholder(),
            NO_DESCRIPTION
        );
        assert_eq!(FeedbackItem::new("t", "body").description_or_placeholder(), "body");
    }

    #[test]
    fn test_attachments_len_sums_all() {
        let item = FeedbackItem::new("t", "d")
            .with_attachment(Attachment::data(vec![0; 3], "text/plain", "a.txt"))
            .with_attachment(Attachment::data(vec![0; 4], "text/plain", "b.txt"));
        assert_eq!(item.attachments_len(), 7);
    }

    #[test]
    fn test_metadata_custom_fields_are_key_ordered() {
        let metadata = FeedbackMetadata::new("1.0", "1", "dev", "os", "en_US")
            .with_custom_field("zeta", "1")
            .with_custom_field("alpha", "2");
        let keys: Vec<_> = metadata.custom_fields.keys().cloned().collect();
        assert_eq!(keys, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_metadata_serializes_with_snake_case_fields() {
        let metadata = FeedbackMetadata::new("1.0", "7", "dev", "os", "en_US");
        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["app_version"], "1.0");
        assert_eq!(json["app_build"], "7");
        assert!(json["custom_fields"].as_object().unwrap().is_empty());
    }
}
