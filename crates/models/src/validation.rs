//! Schema validation shared by every content type.
//!
//! A [`RawForm`] is the untyped field map coming from a form post. Each
//! content type parses it into its typed record and then runs its rules
//! through [`Content::check`](crate::content::Content::check), so
//! re-validating a stored record applies exactly the same rules as the
//! original submission.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Untyped form input: field name to one or more submitted values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawForm {
    fields: BTreeMap<String, Vec<String>>,
}

impl RawForm {
    pub fn new() -> Self { Self::default() }

    /// Builder-style push, convenient for tests and JSON adapters.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.entry(key.into()).or_default().push(value.into());
    }

    /// First submitted value, trimmed; blank values count as absent.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(|v| v.first())
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    pub fn values(&self, key: &str) -> &[String] {
        self.fields.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Checkbox semantics: `on`, `true`, `1` and `yes` are truthy.
    pub fn flag(&self, key: &str) -> bool {
        matches!(
            self.text(key).map(|s| s.to_ascii_lowercase()).as_deref(),
            Some("on" | "true" | "1" | "yes")
        )
    }

    /// Every value of a list field, splitting comma-separated entries and
    /// dropping blanks.
    pub fn list(&self, key: &str) -> Vec<String> {
        self.values(key)
            .iter()
            .flat_map(|v| v.split(','))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn contains(&self, key: &str) -> bool { self.text(key).is_some() }

    /// Flatten a JSON object into form fields. Arrays become repeated values;
    /// nulls are skipped.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let mut form = Self::new();
        if let Some(obj) = value.as_object() {
            for (key, v) in obj {
                match v {
                    serde_json::Value::Array(items) => {
                        for item in items {
                            if let Some(s) = scalar_to_string(item) { form.push(key.clone(), s); }
                        }
                    }
                    other => {
                        if let Some(s) = scalar_to_string(other) { form.push(key.clone(), s); }
                    }
                }
            }
        }
        form
    }
}

fn scalar_to_string(v: &serde_json::Value) -> Option<String> {
    match v {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Field name to human-readable violation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(transparent)]
#[error("{}", describe(.0))]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

fn describe(errors: &BTreeMap<String, Vec<String>>) -> String {
    errors
        .iter()
        .flat_map(|(field, messages)| messages.iter().map(move |m| format!("{field}: {m}")))
        .collect::<Vec<_>>()
        .join("; ")
}

impl FieldErrors {
    pub fn new() -> Self { Self::default() }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn contains(&self, field: &str) -> bool { self.0.contains_key(field) }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> { self.0.keys().map(String::as_str) }

    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

/// Rule helpers used by the per-type `check` implementations.
pub struct Rules {
    errors: FieldErrors,
}

impl Rules {
    pub fn new() -> Self { Self { errors: FieldErrors::new() } }

    pub fn required(&mut self, field: &str, value: &str, label: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.errors.add(field, format!("{label} is required."));
        }
        self
    }

    pub fn max_len(&mut self, field: &str, value: &str, max: usize, label: &str) -> &mut Self {
        if value.chars().count() > max {
            self.errors.add(field, format!("{label} must be at most {max} characters."));
        }
        self
    }

    pub fn url(&mut self, field: &str, value: Option<&str>, label: &str) -> &mut Self {
        if let Some(v) = value {
            if !is_well_formed_url(v) {
                self.errors.add(field, format!("{label} must be a valid URL."));
            }
        }
        self
    }

    pub fn absolute_url(&mut self, field: &str, value: Option<&str>, label: &str) -> &mut Self {
        if let Some(v) = value {
            if !is_absolute_http_url(v) {
                self.errors.add(field, format!("{label} must be a valid http(s) URL."));
            }
        }
        self
    }

    pub fn non_empty_list(&mut self, field: &str, values: &[String], message: &str) -> &mut Self {
        if values.iter().all(|v| v.trim().is_empty()) {
            self.errors.add(field, message);
        }
        self
    }

    pub fn range(&mut self, field: &str, value: i64, min: i64, max: i64, label: &str) -> &mut Self {
        if value < min || value > max {
            self.errors.add(field, format!("{label} must be between {min} and {max}."));
        }
        self
    }

    pub fn email(&mut self, field: &str, value: &str) -> &mut Self {
        if !looks_like_email(value) {
            self.errors.add(field, "Please enter a valid email address.");
        }
        self
    }

    pub fn custom(&mut self, field: &str, ok: bool, message: &str) -> &mut Self {
        if !ok { self.errors.add(field, message); }
        self
    }

    pub fn finish(&mut self) -> FieldErrors { std::mem::take(&mut self.errors) }
}

impl Default for Rules {
    fn default() -> Self { Self::new() }
}

/// Parse an enumerated field, recording an error and falling back to the
/// default variant so the remaining rules still run.
pub fn parse_choice<E>(form: &RawForm, field: &str, label: &str, errors: &mut FieldErrors) -> E
where
    E: FromStr + Default,
{
    match form.text(field) {
        None => {
            errors.add(field, format!("{label} is required."));
            E::default()
        }
        Some(raw) => raw.parse::<E>().unwrap_or_else(|_| {
            errors.add(field, format!("{label} '{raw}' is not a recognised option."));
            E::default()
        }),
    }
}

pub fn owned(form: &RawForm, field: &str) -> String {
    form.text(field).unwrap_or_default().to_string()
}

pub fn optional(form: &RawForm, field: &str) -> Option<String> {
    form.text(field).map(str::to_string)
}

/// Site-relative paths (`/uploads/..`) and absolute http(s) URLs.
pub fn is_well_formed_url(value: &str) -> bool {
    let v = value.trim();
    if v.starts_with('/') && !v.starts_with("//") {
        return !v.contains(char::is_whitespace);
    }
    is_absolute_http_url(v)
}

pub fn is_absolute_http_url(value: &str) -> bool {
    url::Url::parse(value.trim())
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
        .unwrap_or(false)
}

fn looks_like_email(value: &str) -> bool {
    let v = value.trim();
    match v.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain.contains('.')
                && !v.contains(char::is_whitespace)
                && !domain.contains('@')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_errors_behave_as_an_error() {
        let mut errors = FieldErrors::new();
        errors.add("title", "Title is required.");
        errors.add("image", "An image is required.");
        let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(errors);
        assert_eq!(boxed.to_string(), "image: An image is required.; title: Title is required.");
    }

    #[test]
    fn text_trims_and_treats_blank_as_absent() {
        let form = RawForm::new().with("title", "  Demo  ").with("empty", "   ");
        assert_eq!(form.text("title"), Some("Demo"));
        assert_eq!(form.text("empty"), None);
        assert_eq!(form.text("missing"), None);
    }

    #[test]
    fn list_splits_commas_and_repeats() {
        let form = RawForm::new()
            .with("technologies", "Rust, Go")
            .with("technologies", " ")
            .with("technologies", "Python");
        assert_eq!(form.list("technologies"), vec!["Rust", "Go", "Python"]);
    }

    #[test]
    fn flag_accepts_checkbox_values() {
        let form = RawForm::new().with("a", "on").with("b", "TRUE").with("c", "off");
        assert!(form.flag("a"));
        assert!(form.flag("b"));
        assert!(!form.flag("c"));
        assert!(!form.flag("missing"));
    }

    #[test]
    fn from_json_flattens_scalars_and_arrays() {
        let form = RawForm::from_json(&serde_json::json!({
            "title": "Demo",
            "rating": 4,
            "featured": true,
            "technologies": ["Go", "Rust"],
            "nothing": null
        }));
        assert_eq!(form.text("rating"), Some("4"));
        assert!(form.flag("featured"));
        assert_eq!(form.list("technologies"), vec!["Go", "Rust"]);
        assert!(!form.contains("nothing"));
    }

    #[test]
    fn url_rules() {
        assert!(is_well_formed_url("/uploads/projects/1-a.png"));
        assert!(is_well_formed_url("https://cdn.example.com/a.png"));
        assert!(!is_well_formed_url("//evil.example.com/a.png"));
        assert!(!is_well_formed_url("not a url"));
        assert!(!is_absolute_http_url("ftp://example.com/file"));
        assert!(!is_absolute_http_url("/relative"));
    }

    #[test]
    fn email_rule() {
        assert!(looks_like_email("ada@example.com"));
        assert!(!looks_like_email("ada@example"));
        assert!(!looks_like_email("ada example.com"));
        assert!(!looks_like_email("@example.com"));
    }

    #[test]
    fn field_errors_display_and_merge() {
        let mut a = FieldErrors::new();
        a.add("title", "Title is required.");
        let mut b = FieldErrors::new();
        b.add("title", "too long");
        b.add("image", "missing");
        a.merge(b);
        assert_eq!(a.get("title").map(|m| m.len()), Some(2));
        assert!(a.contains("image"));
        assert_eq!(a.fields().collect::<Vec<_>>(), vec!["image", "title"]);
        assert!(a.to_string().contains("title: Title is required."));
    }
}
