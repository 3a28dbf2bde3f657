use serde::{Deserialize, Serialize};

use crate::content::Content;
use crate::kind::ContentKind;
use crate::validation::{optional, owned, FieldErrors, RawForm, Rules};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub case_study: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

impl Content for Project {
    const KIND: ContentKind = ContentKind::Projects;

    fn from_form(form: &RawForm) -> Result<Self, FieldErrors> {
        let project = Project {
            title: owned(form, "title"),
            description: owned(form, "description"),
            image_url: optional(form, "image_url"),
            technologies: form.list("technologies"),
            featured: form.flag("featured"),
            case_study: optional(form, "case_study"),
            link: optional(form, "link"),
        };
        project.check().into_result(project)
    }

    fn check(&self) -> FieldErrors {
        Rules::new()
            .required("title", &self.title, "Title")
            .max_len("title", &self.title, 120, "Title")
            .required("description", &self.description, "Description")
            .non_empty_list("technologies", &self.technologies, "At least one technology is required.")
            .url("image_url", self.image_url.as_deref(), "Image URL")
            .absolute_url("link", self.link.as_deref(), "Project link")
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

    fn demo_form() -> RawForm {
        RawForm::new().with("title", "Demo").with("description", "Desc").with("technologies", "Go")
    }

    #[test]
    fn single_technology_tag_is_kept() {
        let p = Project::from_form(&demo_form()).unwrap();
        assert_eq!(p.technologies, vec!["Go"]);
    }

    #[test]
    fn technologies_required() {
        let form = RawForm::new().with("title", "Demo").with("description", "Desc").with("technologies", " , ");
        let errors = Project::from_form(&form).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["technologies"]);
    }

    #[test]
    fn validation_is_idempotent() {
        let p = Project::from_form(&demo_form()).unwrap();
        assert!(p.check().is_empty());
        assert!(p.check().is_empty());

        let bad = RawForm::new().with("link", "not-a-url");
        let first = Project::from_form(&bad).unwrap_err();
        let second = Project::from_form(&bad).unwrap_err();
        assert_eq!(first, second);
        assert!(first.contains("link"));
        assert!(first.contains("title"));
    }
}
