//! Built-in sample content shown while the store is empty or unconfigured.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use models::{
    Article, Content, Document, DocumentId, EmploymentType, Event, GalleryCategory, GalleryImage, Job,
    ModerationStatus, Project, Service, ServiceIcon, Testimonial,
};

/// Content kinds that have public sample data.
pub trait Samples: Content {
    fn samples() -> Vec<Document<Self>>;
}

fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 0, 0).single().unwrap_or_default()
}

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn sample<T>(kind: &str, n: usize, created_at: DateTime<Utc>, record: T) -> Document<T> {
    Document { id: DocumentId::new(format!("sample-{kind}-{n}")), created_at, updated_at: created_at, record }
}

fn strings(items: &[&str]) -> Vec<String> { items.iter().map(|s| s.to_string()).collect() }

impl Samples for Service {
    fn samples() -> Vec<Document<Self>> {
        let rows = [
            (
                "AI Strategy & Roadmapping",
                "Identify where machine learning pays off in your business and plan the path to production.",
                ServiceIcon::BrainCircuit,
                &["Opportunity assessment", "ROI modelling", "Delivery roadmap"][..],
                Some("From $4,000"),
            ),
            (
                "Conversational Agents",
                "Assistants and support bots grounded in your own documents and systems.",
                ServiceIcon::Bot,
                &["Retrieval-augmented answers", "Human handoff", "Analytics"][..],
                None,
            ),
            (
                "Data Platform Engineering",
                "Pipelines, warehouses and feature stores that keep models fed with clean data.",
                ServiceIcon::Database,
                &["Batch and streaming ingestion", "Data quality checks"][..],
                None,
            ),
            (
                "Responsible AI Review",
                "Bias, privacy and safety audits for models already in production.",
                ServiceIcon::ShieldCheck,
                &["Model cards", "Risk register", "Red-team exercises"][..],
                Some("From $2,500"),
            ),
        ];
        rows.into_iter()
            .enumerate()
            .map(|(i, (title, description, icon, benefits, price))| {
                sample(
                    "service",
                    i + 1,
                    at(2024, 1, 10 + i as u32),
                    Service {
                        title: title.into(),
                        description: description.into(),
                        icon,
                        image_url: None,
                        benefits: strings(benefits),
                        price: price.map(str::to_string),
                        featured: i < 3,
                    },
                )
            })
            .collect()
    }
}

impl Samples for Project {
    fn samples() -> Vec<Document<Self>> {
        vec![
            sample(
                "project",
                1,
                at(2024, 3, 4),
                Project {
                    title: "Claims Triage Assistant".into(),
                    description: "Document understanding pipeline that routes insurance claims in seconds.".into(),
                    image_url: Some("/static/samples/claims.jpg".into()),
                    technologies: strings(&["Python", "LayoutLM", "Kubernetes"]),
                    featured: true,
                    case_study: Some("Cut manual triage time by 70% across three regional offices.".into()),
                    link: None,
                },
            ),
            sample(
                "project",
                2,
                at(2024, 5, 21),
                Project {
                    title: "Demand Forecasting Platform".into(),
                    description: "Weekly SKU-level forecasts for a grocery chain with 400 stores.".into(),
                    image_url: Some("/static/samples/forecast.jpg".into()),
                    technologies: strings(&["Rust", "Polars", "LightGBM"]),
                    featured: true,
                    case_study: None,
                    link: Some("https://example.com/forecasting".into()),
                },
            ),
            sample(
                "project",
                3,
                at(2024, 8, 2),
                Project {
                    title: "Field Service Copilot".into(),
                    description: "Voice assistant that walks technicians through repairs offline.".into(),
                    image_url: Some("/static/samples/copilot.jpg".into()),
                    technologies: strings(&["Whisper", "Llama", "React Native"]),
                    featured: false,
                    case_study: None,
                    link: None,
                },
            ),
        ]
    }
}

impl Samples for Article {
    fn samples() -> Vec<Document<Self>> {
        vec![
            sample(
                "article",
                1,
                at(2024, 6, 12),
                Article {
                    title: "Evaluating LLM Features Before Launch".into(),
                    excerpt: "A practical checklist for offline evals, guardrails and rollout metrics.".into(),
                    image_url: Some("/static/samples/evals.jpg".into()),
                    published_at: at(2024, 6, 12),
                    featured: true,
                    external_url: None,
                    body_html: Some("<p>Start with a small, versioned evaluation set drawn from real traffic.</p>".into()),
                },
            ),
            sample(
                "article",
                2,
                at(2024, 9, 3),
                Article {
                    title: "When Not To Fine-Tune".into(),
                    excerpt: "Retrieval and prompt design solve most problems teams reach for fine-tuning to fix.".into(),
                    image_url: Some("/static/samples/finetune.jpg".into()),
                    published_at: at(2024, 9, 3),
                    featured: false,
                    external_url: Some("https://example.com/blog/when-not-to-fine-tune".into()),
                    body_html: None,
                },
            ),
        ]
    }
}

impl Samples for GalleryImage {
    fn samples() -> Vec<Document<Self>> {
        let rows = [
            ("Team offsite", GalleryCategory::Team, "/static/samples/offsite.jpg", true),
            ("Prompt engineering workshop", GalleryCategory::Workshops, "/static/samples/workshop.jpg", true),
            ("New studio", GalleryCategory::Office, "/static/samples/studio.jpg", false),
        ];
        rows.into_iter()
            .enumerate()
            .map(|(i, (title, category, url, featured))| {
                sample(
                    "gallery",
                    i + 1,
                    at(2024, 4, 1 + i as u32),
                    GalleryImage { title: title.into(), image_url: Some(url.into()), category, featured },
                )
            })
            .collect()
    }
}

impl Samples for Event {
    fn samples() -> Vec<Document<Self>> {
        vec![
            sample(
                "event",
                1,
                at(2024, 7, 1),
                Event {
                    title: "Applied GenAI Meetup".into(),
                    description: "Lightning talks from teams shipping language models in production.".into(),
                    location: "Berlin".into(),
                    date: day(2024, 10, 17),
                    featured: true,
                    image_url: Some("/static/samples/meetup.jpg".into()),
                },
            ),
            sample(
                "event",
                2,
                at(2024, 7, 15),
                Event {
                    title: "Data Quality Clinic".into(),
                    description: "Bring a dataset and work through profiling and validation with our engineers.".into(),
                    location: "Online".into(),
                    date: day(2024, 11, 5),
                    featured: false,
                    image_url: None,
                },
            ),
        ]
    }
}

impl Samples for Job {
    fn samples() -> Vec<Document<Self>> {
        vec![
            sample(
                "job",
                1,
                at(2024, 8, 20),
                Job {
                    title: "Senior Machine Learning Engineer".into(),
                    description: "Design, train and ship models for client engagements end to end.".into(),
                    location: "Berlin or remote".into(),
                    employment_type: EmploymentType::FullTime,
                },
            ),
            sample(
                "job",
                2,
                at(2024, 9, 2),
                Job {
                    title: "Data Engineering Intern".into(),
                    description: "Help build ingestion pipelines and data quality tooling.".into(),
                    location: "Berlin".into(),
                    employment_type: EmploymentType::Internship,
                },
            ),
        ]
    }
}

impl Samples for Testimonial {
    fn samples() -> Vec<Document<Self>> {
        let rows = [
            ("Maria Keller", "Nordlicht Insurance", "They took us from a vague idea to a model in production in ten weeks.", 5),
            ("Daniel Osei", "FreshCart", "Forecast accuracy went up and the handover documentation was excellent.", 5),
            ("Priya Raman", "Helix Robotics", "Pragmatic advice, no hype. We will work with them again.", 4),
        ];
        rows.into_iter()
            .enumerate()
            .map(|(i, (author, company, feedback, rating))| {
                let submitted_at = at(2024, 2, 5 + i as u32);
                sample(
                    "testimonial",
                    i + 1,
                    submitted_at,
                    Testimonial {
                        author: author.into(),
                        company: company.into(),
                        feedback: feedback.into(),
                        rating,
                        submitted_at,
                        status: ModerationStatus::Approved,
                    },
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_valid<T: Samples>() {
        let docs = T::samples();
        assert!(!docs.is_empty(), "{} has samples", T::KIND);
        for doc in docs {
            assert!(doc.record.check().is_empty(), "{} sample {} is valid", T::KIND, doc.id);
            assert!(doc.id.as_str().starts_with("sample-"));
        }
    }

    #[test]
    fn every_sample_passes_validation() {
        all_valid::<Service>();
        all_valid::<Project>();
        all_valid::<Article>();
        all_valid::<GalleryImage>();
        all_valid::<Event>();
        all_valid::<Job>();
        all_valid::<Testimonial>();
    }

    #[test]
    fn sample_projects_have_stable_ids() {
        let ids: Vec<_> = Project::samples().into_iter().map(|d| d.id.to_string()).collect();
        assert_eq!(ids, vec!["sample-project-1", "sample-project-2", "sample-project-3"]);
    }
}
