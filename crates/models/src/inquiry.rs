use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::Content;
use crate::kind::ContentKind;
use crate::validation::{optional, owned, FieldErrors, RawForm, Rules};

/// A contact-form submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inquiry {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub service_interest: Option<String>,
    pub project_details: String,
    pub submitted_at: DateTime<Utc>,
}

impl Content for Inquiry {
    const KIND: ContentKind = ContentKind::Inquiries;

    fn from_form(form: &RawForm) -> Result<Self, FieldErrors> {
        let inquiry = Inquiry {
            name: owned(form, "name"),
            email: owned(form, "email"),
            company: optional(form, "company"),
            phone: optional(form, "phone"),
            service_interest: optional(form, "service_interest"),
            project_details: owned(form, "project_details"),
            submitted_at: Utc::now(),
        };
        inquiry.check().into_result(inquiry)
    }

    fn check(&self) -> FieldErrors {
        Rules::new()
            .required("name", &self.name, "Name")
            .email("email", &self.email)
            .required("project_details", &self.project_details, "Project details")
            .max_len("project_details", &self.project_details, 5000, "Project details")
            .finish()
    }

    fn label(&self) -> &str { &self.name }

    fn carry_over(&mut self, existing: &Self, _submitted: &RawForm) {
        self.submitted_at = existing.submitted_at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_form_validates_email() {
        let form = RawForm::new()
            .with("name", "Sam")
            .with("email", "sam-at-example")
            .with("project_details", "Need a chatbot");
        let errors = Inquiry::from_form(&form).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["email"]);
    }

    #[test]
    fn optional_fields_stay_empty() {
        let form = RawForm::new()
            .with("name", "Sam")
            .with("email", "sam@example.com")
            .with("project_details", "Need a chatbot");
        let inquiry = Inquiry::from_form(&form).unwrap();
        assert_eq!(inquiry.company, None);
        assert_eq!(inquiry.phone, None);
    }
}
