use serde::{Deserialize, Serialize};

use crate::content::Content;
use crate::icon::ServiceIcon;
use crate::kind::ContentKind;
use crate::validation::{optional, owned, parse_choice, FieldErrors, RawForm, Rules};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub title: String,
    pub description: String,
    pub icon: ServiceIcon,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub featured: bool,
}

impl Content for Service {
    const KIND: ContentKind = ContentKind::Services;

    fn from_form(form: &RawForm) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        let icon = parse_choice(form, "icon", "Icon", &mut errors);
        let service = Service {
            title: owned(form, "title"),
            description: owned(form, "description"),
            icon,
            image_url: optional(form, "image_url"),
            benefits: form.values("benefits").iter().flat_map(|v| v.lines()).map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect(),
            price: optional(form, "price"),
            featured: form.flag("featured"),
        };
        errors.merge(service.check());
        errors.into_result(service)
    }

    fn check(&self) -> FieldErrors {
        Rules::new()
            .required("title", &self.title, "Title")
            .max_len("title", &self.title, 120, "Title")
            .required("description", &self.description, "Description")
            .url("image_url", self.image_url.as_deref(), "Image URL")
            .custom("benefits", self.benefits.iter().all(|b| !b.trim().is_empty()), "Benefits cannot be blank.")
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
    fn benefits_split_by_line() {
        let form = RawForm::new()
            .with("title", "AI Strategy")
            .with("description", "Roadmaps")
            .with("icon", "brain-circuit")
            .with("benefits", "Faster delivery\n\nLower cost\n");
        let s = Service::from_form(&form).unwrap();
        assert_eq!(s.benefits, vec!["Faster delivery", "Lower cost"]);
        assert_eq!(s.icon, ServiceIcon::BrainCircuit);
        assert!(!s.featured);
    }

    #[test]
    fn unknown_icon_is_a_field_error() {
        let form = RawForm::new().with("title", "X").with("description", "Y").with("icon", "rocket");
        let errors = Service::from_form(&form).unwrap_err();
        assert!(errors.contains("icon"));
        assert!(!errors.contains("title"));
    }
}
