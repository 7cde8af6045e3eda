//! Screenshot capture from an image file

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, warn};

use feedbackkit_core::{Screenshot, ScreenshotCapture};

/// "Captures" by reading an already encoded image from disk
///
/// Unreadable files and non-image bytes yield no screenshot.
#[derive(Debug, Clone)]
pub struct FileScreenshotCapture {
    path: PathBuf,
}

impl FileScreenshotCapture {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ScreenshotCapture for FileScreenshotCapture {
    async fn capture(&self) -> Option<Screenshot> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "Cannot read screenshot");
                return None;
            }
        };

        let screenshot = Screenshot::new(bytes);
        match screenshot.format() {
            Some(format) => {
                debug!(path = %self.path.display(), mime = format.mime_type(), "Loaded screenshot");
                Some(screenshot)
            }
            None => {
                warn!(path = %self.path.display(), "Screenshot is not PNG, JPEG, GIF or WebP");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_png_and_rejects_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("shot.png");
        std::fs::write(&png, [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0]).unwrap();
        let text = dir.path().join("notes.txt");
        std::fs::write(&text, "hello").unwrap();

        assert!(FileScreenshotCapture::new(&png).capture().await.is_some());
        assert!(FileScreenshotCapture::new(&text).capture().await.is_none());
        assert!(
            FileScreenshotCapture::new(dir.path().join("missing.png"))
                .capture()
                .await
                .is_none()
        );
    }
}
