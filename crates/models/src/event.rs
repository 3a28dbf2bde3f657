use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::content::Content;
use crate::kind::ContentKind;
use crate::validation::{optional, owned, FieldErrors, RawForm, Rules};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Content for Event {
    const KIND: ContentKind = ContentKind::Events;

    fn from_form(form: &RawForm) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        let date = match form.text("date") {
            None => {
                errors.add("date", "Date is required.");
                NaiveDate::default()
            }
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap_or_else(|_| {
                errors.add("date", "Date must be in YYYY-MM-DD format.");
                NaiveDate::default()
            }),
        };
        let event = Event {
            title: owned(form, "title"),
            description: owned(form, "description"),
            location: owned(form, "location"),
            date,
            featured: form.flag("featured"),
            image_url: optional(form, "image_url"),
        };
        errors.merge(event.check());
        errors.into_result(event)
    }

    fn check(&self) -> FieldErrors {
        Rules::new()
            .required("title", &self.title, "Title")
            .required("description", &self.description, "Description")
            .required("location", &self.location, "Location")
            .url("image_url", self.image_url.as_deref(), "Image URL")
            .finish()
    }

    fn label(&self) -> &str { &self.title }
    fn image_url(&self) -> Option<&str> { self.image_url.as_deref() }
    fn set_image_url(&mut self, url: Option<String>) { self.image_url = url; }
    fn featured(&self) -> bool { self.featured }
    fn set_featured(&mut self, featured: bool) { self.featured = featured; }
}
