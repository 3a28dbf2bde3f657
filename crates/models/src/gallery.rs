use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::content::Content;
use crate::errors::ModelError;
use crate::kind::ContentKind;
use crate::validation::{optional, owned, parse_choice, FieldErrors, RawForm, Rules};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GalleryCategory {
    #[default]
    Events,
    Team,
    Office,
    Projects,
    Workshops,
}

impl GalleryCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            GalleryCategory::Events => "events",
            GalleryCategory::Team => "team",
            GalleryCategory::Office => "office",
            GalleryCategory::Projects => "projects",
            GalleryCategory::Workshops => "workshops",
        }
    }
}

impl fmt::Display for GalleryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for GalleryCategory {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "events" => Ok(GalleryCategory::Events),
            "team" => Ok(GalleryCategory::Team),
            "office" => Ok(GalleryCategory::Office),
            "projects" => Ok(GalleryCategory::Projects),
            "workshops" => Ok(GalleryCategory::Workshops),
            _ => Err(ModelError::UnknownVariant { kind: "category", value: s.to_string() }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub title: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub category: GalleryCategory,
    #[serde(default)]
    pub featured: bool,
}

impl Content for GalleryImage {
    const KIND: ContentKind = ContentKind::Gallery;

    fn from_form(form: &RawForm) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        let category = parse_choice(form, "category", "Category", &mut errors);
        let image = GalleryImage {
            title: owned(form, "title"),
            image_url: optional(form, "image_url"),
            category,
            featured: form.flag("featured"),
        };
        errors.merge(image.check());
        errors.into_result(image)
    }

    fn check(&self) -> FieldErrors {
        Rules::new()
            .required("title", &self.title, "Title")
            .max_len("title", &self.title, 120, "Title")
            .url("image_url", self.image_url.as_deref(), "Image URL")
            .finish()
    }

    fn label(&self) -> &str { &self.title }
    fn image_url(&self) -> Option<&str> { self.image_url.as_deref() }
    fn set_image_url(&mut self, url: Option<String>) { self.image_url = url; }
    fn featured(&self) -> bool { self.featured }
    fn set_featured(&mut self, featured: bool) { self.featured = featured; }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_title_names_title() {
        let form = RawForm::new().with("title", "").with("category", "team");
        let errors = GalleryImage::from_form(&form).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["title"]);
    }

    #[test]
    fn category_must_be_known() {
        let form = RawForm::new().with("title", "Offsite").with("category", "parties");
        assert!(GalleryImage::from_form(&form).unwrap_err().contains("category"));
    }
}
