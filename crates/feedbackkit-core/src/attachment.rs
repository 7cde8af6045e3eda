//! Attachments carried by a feedback item
//!
//! An attachment is either an encoded image (typically a screenshot) or raw
//! data with an explicit MIME type. Both hold their bytes in memory; nothing
//! here refers to a file or a UI resource.

use feedbackkit_utils::error::FeedbackError;

/// Compression hint used when none is given
pub const DEFAULT_COMPRESSION_QUALITY: f32 = 0.9;

/// Image encodings recognised from their magic bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageFormat {
    /// Detect the encoding from the leading bytes
    #[must_use]
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some(Self::Png)
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some(Self::Gif)
        } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            Some(Self::Webp)
        } else {
            None
        }
    }

    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }

    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }
}

/// An encoded screenshot produced by a [`ScreenshotCapture`](crate::ScreenshotCapture)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screenshot {
    pub bytes: Vec<u8>,
}

impl Screenshot {
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    #[must_use]
    pub fn format(&self) -> Option<ImageFormat> {
        ImageFormat::sniff(&self.bytes)
    }

    /// Turn the screenshot into an image attachment
    #[must_use]
    pub fn into_attachment(self) -> Attachment {
        Attachment::image(self.bytes, DEFAULT_COMPRESSION_QUALITY)
    }
}

/// Content of an attachment
#[derive(Debug, Clone, PartialEq)]
pub enum AttachmentKind {
    /// Encoded image bytes plus the quality the encoder was asked for
    Image {
        bytes: Vec<u8>,
        compression_quality: f32,
    },
    /// Arbitrary bytes with an explicit MIME type and file name
    Data {
        bytes: Vec<u8>,
        mime_type: String,
        filename: String,
    },
}

/// A screenshot, image or file attached to feedback
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub kind: AttachmentKind,
    pub caption: Option<String>,
}

impl Attachment {
    /// Create an image attachment from encoded bytes
    #[must_use]
    pub fn image(bytes: Vec<u8>, compression_quality: f32) -> Self {
        Self {
            kind: AttachmentKind::Image {
                bytes,
                compression_quality: compression_quality.clamp(0.0, 1.0),
            },
            caption: None,
        }
    }

    /// Create a data attachment
    #[must_use]
    pub fn data(bytes: Vec<u8>, mime_type: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            kind: AttachmentKind::Data {
                bytes,
                mime_type: mime_type.into(),
                filename: filename.into(),
            },
            caption: None,
        }
    }

    #[must_use]
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        match &self.kind {
            AttachmentKind::Image { bytes, .. } | AttachmentKind::Data { bytes, .. } => bytes,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes().is_empty()
    }

    /// MIME type to send with the bytes
    ///
    /// # Errors
    ///
    /// Returns `FeedbackError::UnsupportedAttachment` for image bytes in an
    /// unrecognised encoding.
    pub fn mime_type(&self) -> Result<&str, FeedbackError> {
        match &self.kind {
            AttachmentKind::Image { bytes, .. } => ImageFormat::sniff(bytes)
                .map(ImageFormat::mime_type)
                .ok_or_else(|| {
                    FeedbackError::UnsupportedAttachment(
                        "image data is not PNG, JPEG, GIF or WebP".to_string(),
                    )
                }),
            AttachmentKind::Data { mime_type, .. } => Ok(mime_type),
        }
    }

    /// File name to upload under
    #[must_use]
    pub fn filename(&self) -> String {
        match &self.kind {
            AttachmentKind::Image { bytes, .. } => {
                let ext = ImageFormat::sniff(bytes).map_or("bin", ImageFormat::extension);
                format!("screenshot.{ext}")
            }
            AttachmentKind::Data { filename, .. } => filename.clone(),
        }
    }

    /// Check the attachment against a size limit and the supported encodings
    ///
    /// # Errors
    ///
    /// - `FeedbackError::AttachmentTooLarge` when the bytes exceed `max_size`
    /// - `FeedbackError::UnsupportedAttachment` for empty attachments,
    ///   unrecognised images, or data without a MIME type or file name
    pub fn validate(&self, max_size: usize) -> Result<(), FeedbackError> {
        if self.is_empty() {
            return Err(FeedbackError::UnsupportedAttachment(format!(
                "{} is empty",
                self.filename()
            )));
        }
        if self.len() > max_size {
            return Err(FeedbackError::AttachmentTooLarge {
                size: self.len(),
                max_size,
            });
        }
        if let AttachmentKind::Data {
            mime_type,
            filename,
            ..
        } = &self.kind
        {
            if filename.trim().is_empty() {
                return Err(FeedbackError::UnsupportedAttachment(
                    "data attachment has no file name".to_string(),
                ));
            }
            if !mime_type.contains('/') {
                return Err(FeedbackError::UnsupportedAttachment(format!(
                    "invalid MIME type '{mime_type}' for {filename}"
                )));
            }
        }
        self.mime_type().map(|_| ())
    }
}
