use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::content::Content;
use crate::errors::ModelError;
use crate::kind::ContentKind;
use crate::validation::{owned, parse_choice, FieldErrors, RawForm, Rules};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmploymentType {
    #[default]
    FullTime,
    PartTime,
    Contract,
    Internship,
    Remote,
}

impl EmploymentType {
    pub fn as_str(self) -> &'static str {
        match self {
            EmploymentType::FullTime => "full-time",
            EmploymentType::PartTime => "part-time",
            EmploymentType::Contract => "contract",
            EmploymentType::Internship => "internship",
            EmploymentType::Remote => "remote",
        }
    }
}

impl fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for EmploymentType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace([' ', '_'], "-").as_str() {
            "full-time" => Ok(EmploymentType::FullTime),
            "part-time" => Ok(EmploymentType::PartTime),
            "contract" => Ok(EmploymentType::Contract),
            "internship" => Ok(EmploymentType::Internship),
            "remote" => Ok(EmploymentType::Remote),
            _ => Err(ModelError::UnknownVariant { kind: "employment type", value: s.to_string() }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub title: String,
    pub description: String,
    pub location: String,
    pub employment_type: EmploymentType,
}

impl Content for Job {
    const KIND: ContentKind = ContentKind::Jobs;

    fn from_form(form: &RawForm) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        let employment_type = parse_choice(form, "employment_type", "Employment type", &mut errors);
        let job = Job {
            title: owned(form, "title"),
            description: owned(form, "description"),
            location: owned(form, "location"),
            employment_type,
        };
        errors.merge(job.check());
        errors.into_result(job)
    }

    fn check(&self) -> FieldErrors {
        Rules::new()
            .required("title", &self.title, "Title")
            .required("description", &self.description, "Description")
            .required("location", &self.location, "Location")
            .finish()
    }

    fn label(&self) -> &str { &self.title }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn employment_type_accepts_spacing_variants() {
        assert_eq!("Full Time".parse::<EmploymentType>().unwrap(), EmploymentType::FullTime);
        assert_eq!("part_time".parse::<EmploymentType>().unwrap(), EmploymentType::PartTime);
        assert!("gig".parse::<EmploymentType>().is_err());
    }

    #[test]
    fn job_requires_employment_type() {
        let form = RawForm::new().with("title", "ML Engineer").with("description", "Build").with("location", "Remote");
        let errors = Job::from_form(&form).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["employment_type"]);
    }
}
