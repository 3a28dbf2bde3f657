//! Content records for the site and the rules that validate them.
//!
//! Every content type implements [`Content`]: parse a [`RawForm`], check the
//! typed record, and expose the image/featured hooks the persistence layer
//! needs. Records only reach persistence wrapped in [`Validated`].

pub mod errors;
pub mod validation;
pub mod kind;
pub mod content;
pub mod upload;
pub mod icon;
pub mod moderation;

pub mod service;
pub mod project;
pub mod article;
pub mod gallery;
pub mod event;
pub mod job;
pub mod testimonial;
pub mod inquiry;

pub use content::{Content, Document, DocumentId, FormInput, Validated};
pub use errors::ModelError;
pub use kind::ContentKind;
pub use upload::Upload;
pub use validation::{FieldErrors, RawForm};

pub use article::Article;
pub use event::Event;
pub use gallery::{GalleryCategory, GalleryImage};
pub use icon::ServiceIcon;
pub use inquiry::Inquiry;
pub use job::{EmploymentType, Job};
pub use moderation::ModerationStatus;
pub use project::Project;
pub use service::Service;
pub use testimonial::Testimonial;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validated_requires_image_on_create() {
        let fields = RawForm::new()
            .with("title", "Demo")
            .with("description", "Desc")
            .with("technologies", "Go");
        let input = FormInput::new(fields.clone());
        let errors = Validated::<Project>::from_input(&input, true).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["image"]);

        // edits keep the current image
        assert!(Validated::<Project>::from_input(&input, false).is_ok());

        let with_file = FormInput::new(fields)
            .with_upload(Upload::new("shot.png", Some("image/png".into()), vec![1u8, 2, 3]));
        assert!(Validated::<Project>::from_input(&with_file, true).is_ok());
    }

    #[test]
    fn upload_rejected_for_kinds_without_images() {
        let fields = RawForm::new()
            .with("title", "ML Engineer")
            .with("description", "Build")
            .with("location", "Remote")
            .with("employment_type", "remote");
        let input = FormInput::new(fields).with_upload(Upload::new("a.png", None, vec![1u8]));
        assert!(Validated::<Job>::from_input(&input, true).unwrap_err().contains("image"));
    }

    #[test]
    fn document_flattens_record() {
        let doc = Document {
            id: DocumentId::new("abc"),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
            record: Job {
                title: "ML Engineer".into(),
                description: "Build".into(),
                location: "Remote".into(),
                employment_type: EmploymentType::Contract,
            },
        };
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["id"], "abc");
        assert_eq!(json["employment_type"], "contract");
        let back: Document<Job> = serde_json::from_value(json).unwrap();
        assert_eq!(back, doc);
    }
}
