use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::Content;
use crate::kind::ContentKind;
use crate::moderation::ModerationStatus;
use crate::validation::{owned, FieldErrors, RawForm, Rules};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    pub author: String,
    pub company: String,
    pub feedback: String,
    pub rating: u8,
    pub submitted_at: DateTime<Utc>,
    #[serde(default)]
    pub status: ModerationStatus,
}

pub fn clamp_rating(value: i64) -> u8 {
    value.clamp(MIN_RATING as i64, MAX_RATING as i64) as u8
}

impl Content for Testimonial {
    const KIND: ContentKind = ContentKind::Testimonials;

    /// Submissions always enter moderation as `pending`, whatever the form says.
    fn from_form(form: &RawForm) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        let rating = match form.text("rating") {
            None => {
                errors.add("rating", "Rating is required.");
                MIN_RATING
            }
            Some(raw) => match raw.parse::<i64>() {
                Ok(n) => clamp_rating(n),
                Err(_) => {
                    errors.add("rating", "Rating must be a whole number.");
                    MIN_RATING
                }
            },
        };
        let testimonial = Testimonial {
            author: owned(form, "author"),
            company: owned(form, "company"),
            feedback: owned(form, "feedback"),
            rating,
            submitted_at: Utc::now(),
            status: ModerationStatus::Pending,
        };
        errors.merge(testimonial.check());
        errors.into_result(testimonial)
    }

    fn check(&self) -> FieldErrors {
        Rules::new()
            .required("author", &self.author, "Name")
            .required("company", &self.company, "Company")
            .required("feedback", &self.feedback, "Feedback")
            .max_len("feedback", &self.feedback, 2000, "Feedback")
            .range("rating", self.rating as i64, MIN_RATING as i64, MAX_RATING as i64, "Rating")
            .finish()
    }

    fn label(&self) -> &str { &self.author }

    /// Edits never reset moderation or the submission time.
    fn carry_over(&mut self, existing: &Self, _submitted: &RawForm) {
        self.status = existing.status;
        self.submitted_at = existing.submitted_at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(rating: &str) -> RawForm {
        RawForm::new()
            .with("author", "Dana")
            .with("company", "Acme")
            .with("feedback", "Great partner")
            .with("rating", rating)
            .with("status", "approved")
    }

    #[test]
    fn rating_is_clamped() {
        assert_eq!(Testimonial::from_form(&form("9")).unwrap().rating, 5);
        assert_eq!(Testimonial::from_form(&form("-3")).unwrap().rating, 1);
        assert_eq!(Testimonial::from_form(&form("4")).unwrap().rating, 4);
    }

    #[test]
    fn non_integer_rating_rejected() {
        assert!(Testimonial::from_form(&form("4.5")).unwrap_err().contains("rating"));
    }

    #[test]
    fn new_submissions_are_pending() {
        let t = Testimonial::from_form(&form("5")).unwrap();
        assert_eq!(t.status, ModerationStatus::Pending);
    }

    #[test]
    fn edits_keep_moderation_state() {
        let mut existing = Testimonial::from_form(&form("5")).unwrap();
        existing.status = ModerationStatus::Approved;
        let mut edit = Testimonial::from_form(&form("3")).unwrap();
        edit.carry_over(&existing, &form("3"));
        assert_eq!(edit.status, ModerationStatus::Approved);
        assert_eq!(edit.submitted_at, existing.submitted_at);
        assert_eq!(edit.rating, 3);
    }
}
