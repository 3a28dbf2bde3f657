use std::fmt;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::kind::ContentKind;
use crate::upload::Upload;
use crate::validation::{FieldErrors, RawForm};

/// Opaque identifier assigned by the document store. It has no setters:
/// once a document exists its id cannot change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self { Self(s.to_string()) }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self { Self(s) }
}

/// A stored record together with its store-managed metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document<T> {
    pub id: DocumentId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub record: T,
}

/// Behaviour shared by every content type.
pub trait Content:
    Serialize + DeserializeOwned + Clone + PartialEq + fmt::Debug + Send + Sync + 'static
{
    const KIND: ContentKind;

    /// Parse a raw form into the typed record, then apply [`Content::check`].
    fn from_form(form: &RawForm) -> Result<Self, FieldErrors>;

    /// Declarative rules over the typed record.
    fn check(&self) -> FieldErrors;

    /// Human label used in log lines and messages.
    fn label(&self) -> &str;

    fn image_url(&self) -> Option<&str> { None }

    fn set_image_url(&mut self, _url: Option<String>) {}

    fn featured(&self) -> bool { false }

    fn set_featured(&mut self, _featured: bool) {}

    /// Carry store-owned values from the existing record into an edit.
    /// `submitted` is the edit's form; fields it left out keep their stored
    /// value where the type says so. By default an edit without an image
    /// keeps the current one.
    fn carry_over(&mut self, existing: &Self, _submitted: &RawForm) {
        if self.image_url().is_none() {
            self.set_image_url(existing.image_url().map(str::to_string));
        }
    }
}

/// A record that has passed its type's rules. Only obtainable through
/// validation, so persistence never sees unchecked input. Records built
/// from a form remember it for [`Content::carry_over`].
#[derive(Debug, Clone, PartialEq)]
pub struct Validated<T> {
    record: T,
    submitted: RawForm,
}

impl<T: Content> Validated<T> {
    pub fn new(record: T) -> Result<Self, FieldErrors> {
        record.check().into_result(Self { record, submitted: RawForm::new() })
    }

    /// Validate a full submission: fields, the attached file, and the
    /// image requirement for kinds that cannot exist without one.
    pub fn from_input(input: &FormInput, is_create: bool) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        if let Some(upload) = &input.upload {
            if T::KIND.has_image() {
                errors.merge(upload.check());
            } else {
                errors.add("image", "This content type does not accept images.");
            }
        }
        if is_create
            && T::KIND.requires_image()
            && input.upload.is_none()
            && !input.fields.contains("image_url")
        {
            errors.add("image", "An image is required.");
        }
        match T::from_form(&input.fields) {
            Ok(record) => errors.into_result(Self { record, submitted: input.fields.clone() }),
            Err(field_errors) => {
                errors.merge(field_errors);
                Err(errors)
            }
        }
    }

    pub fn get(&self) -> &T { &self.record }

    pub fn into_inner(self) -> T { self.record }

    /// Substitute the URL of a freshly stored asset.
    pub fn with_image_url(mut self, url: String) -> Self {
        self.record.set_image_url(Some(url));
        self
    }

    pub fn carry_over(mut self, existing: &T) -> Self {
        self.record.carry_over(existing, &self.submitted);
        self
    }
}

/// Everything a form post delivers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormInput {
    pub fields: RawForm,
    pub upload: Option<Upload>,
}

impl FormInput {
    pub fn new(fields: RawForm) -> Self { Self { fields, upload: None } }

    pub fn with_upload(mut self, upload: Upload) -> Self {
        self.upload = Some(upload);
        self
    }
}
