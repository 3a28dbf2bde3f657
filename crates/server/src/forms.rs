//! Request bodies to [`FormInput`].

use axum::extract::Multipart;
use models::{FormInput, RawForm, Upload};
use tracing::debug;

use crate::errors::JsonApiError;

/// Field name carrying the image file.
pub const IMAGE_FIELD: &str = "image";

/// Text parts become form fields; the `image` file part becomes the upload.
/// An empty file input (no name, no bytes) counts as no upload.
pub async fn read_multipart(mut multipart: Multipart) -> Result<FormInput, JsonApiError> {
    let mut fields = RawForm::new();
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| JsonApiError::bad_request(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(|e| JsonApiError::bad_request(e.body_text()))?;
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                if name == IMAGE_FIELD {
                    upload = Some(Upload::new(file_name, content_type, bytes));
                } else {
                    debug!(field = %name, "ignoring unexpected file part");
                }
            }
            None => {
                let text = field.text().await.map_err(|e| JsonApiError::bad_request(e.body_text()))?;
                fields.push(name, text);
            }
        }
    }
    Ok(FormInput { fields, upload })
}

/// JSON objects from the public forms: `{"name": "..", "rating": 5}`.
pub fn from_json(value: &serde_json::Value) -> Result<FormInput, JsonApiError> {
    if !value.is_object() {
        return Err(JsonApiError::bad_request("expected a JSON object"));
    }
    Ok(FormInput::new(RawForm::from_json(value)))
}
