use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::content::Content;
use crate::kind::ContentKind;
use crate::validation::{optional, owned, FieldErrors, RawForm, Rules};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub excerpt: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub external_url: Option<String>,
    #[serde(default)]
    pub body_html: Option<String>,
}

/// RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

impl Content for Article {
    const KIND: ContentKind = ContentKind::Articles;

    fn from_form(form: &RawForm) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        let published_at = match form.text("published_at") {
            None => Utc::now(),
            Some(raw) => parse_timestamp(raw).unwrap_or_else(|| {
                errors.add("published_at", "Publication date must be a date (YYYY-MM-DD) or timestamp.");
                Utc::now()
            }),
        };
        let article = Article {
            title: owned(form, "title"),
            excerpt: owned(form, "excerpt"),
            image_url: optional(form, "image_url"),
            published_at,
            featured: form.flag("featured"),
            external_url: optional(form, "external_url"),
            body_html: optional(form, "body_html"),
        };
        errors.merge(article.check());
        errors.into_result(article)
    }

    fn check(&self) -> FieldErrors {
        Rules::new()
            .required("title", &self.title, "Title")
            .max_len("title", &self.title, 160, "Title")
            .required("excerpt", &self.excerpt, "Excerpt")
            .max_len("excerpt", &self.excerpt, 500, "Excerpt")
            .url("image_url", self.image_url.as_deref(), "Image URL")
            .absolute_url("external_url", self.external_url.as_deref(), "Full article URL")
            .finish()
    }

    fn label(&self) -> &str { &self.title }
    fn image_url(&self) -> Option<&str> { self.image_url.as_deref() }
    fn set_image_url(&mut self, url: Option<String>) { self.image_url = url; }
    fn featured(&self) -> bool { self.featured }
    fn set_featured(&mut self, featured: bool) { self.featured = featured; }

    /// An edit without a publication date keeps the stored one.
    fn carry_over(&mut self, existing: &Self, submitted: &RawForm) {
        if self.image_url.is_none() {
            self.image_url = existing.image_url.clone();
        }
        if !submitted.contains("published_at") {
            self.published_at = existing.published_at;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_dates() {
        let ts = parse_timestamp("2024-03-05").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-03-05T00:00:00+00:00");
        assert!(parse_timestamp("2024-03-05T10:00:00Z").is_some());
        assert!(parse_timestamp("March 5th").is_none());
    }

    #[test]
    fn edit_without_date_keeps_publication_date() {
        let created = RawForm::new()
            .with("title", "Agents in production")
            .with("excerpt", "Lessons learned")
            .with("published_at", "2020-01-01")
            .with("image_url", "https://cdn.example.com/agents.png");
        let existing = Article::from_form(&created).unwrap();

        let edit = RawForm::new().with("title", "Agents in production, revisited").with("excerpt", "Lessons learned");
        let mut article = Article::from_form(&edit).unwrap();
        article.carry_over(&existing, &edit);
        assert_eq!(article.published_at, parse_timestamp("2020-01-01").unwrap());
        assert_eq!(article.image_url, existing.image_url);

        let redated = edit.clone().with("published_at", "2024-05-01");
        let mut article = Article::from_form(&redated).unwrap();
        article.carry_over(&existing, &redated);
        assert_eq!(article.published_at, parse_timestamp("2024-05-01").unwrap());
    }

    #[test]
    fn bad_date_is_reported() {
        let form = RawForm::new()
            .with("title", "Agents in production")
            .with("excerpt", "Lessons learned")
            .with("published_at", "yesterday");
        let errors = Article::from_form(&form).unwrap_err();
        assert!(errors.contains("published_at"));
    }
}
