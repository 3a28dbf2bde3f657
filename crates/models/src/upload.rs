use bytes::Bytes;

use crate::validation::FieldErrors;

pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "gif", "webp", "svg", "avif"];

/// A binary asset attached to a form submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, content_type: Option<String>, bytes: impl Into<Bytes>) -> Self {
        Self { file_name: file_name.into(), content_type, bytes: bytes.into() }
    }

    pub fn is_image(&self) -> bool {
        match self.content_type.as_deref() {
            Some(ct) if !ct.is_empty() && ct != "application/octet-stream" => ct.starts_with("image/"),
            _ => self
                .extension()
                .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str())),
        }
    }

    fn extension(&self) -> Option<String> {
        self.file_name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase())
    }

    /// File constraints, reported against the `image` field.
    pub fn check(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.bytes.is_empty() {
            errors.add("image", "The uploaded file is empty.");
        } else if self.bytes.len() > MAX_UPLOAD_BYTES {
            errors.add("image", "Images must be 5 MB or smaller.");
        }
        if !self.is_image() {
            errors.add("image", "Only image files can be uploaded.");
        }
        errors
    }

    /// Filename reduced to `[A-Za-z0-9._-]`, safe as an object path segment.
    pub fn sanitized_file_name(&self) -> String {
        let base = self.file_name.rsplit(['/', '\\']).next().unwrap_or_default();
        let cleaned: String = base
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '-' })
            .collect();
        let trimmed = cleaned.trim_matches(|c| c == '.' || c == '-');
        if trimmed.is_empty() { "upload".to_string() } else { trimmed.to_string() }
    }
}
