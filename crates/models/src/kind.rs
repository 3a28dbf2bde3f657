use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Every content type the site manages, one document collection each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Services,
    Projects,
    Articles,
    Gallery,
    Events,
    Jobs,
    Testimonials,
    Inquiries,
}

impl ContentKind {
    pub const ALL: [ContentKind; 8] = [
        ContentKind::Services,
        ContentKind::Projects,
        ContentKind::Articles,
        ContentKind::Gallery,
        ContentKind::Events,
        ContentKind::Jobs,
        ContentKind::Testimonials,
        ContentKind::Inquiries,
    ];

    pub fn collection(self) -> &'static str {
        match self {
            ContentKind::Services => "services",
            ContentKind::Projects => "projects",
            ContentKind::Articles => "articles",
            ContentKind::Gallery => "gallery",
            ContentKind::Events => "events",
            ContentKind::Jobs => "jobs",
            ContentKind::Testimonials => "testimonials",
            ContentKind::Inquiries => "inquiries",
        }
    }

    /// Public index page; inquiries are admin-only.
    pub fn index_page(self) -> Option<&'static str> {
        match self {
            ContentKind::Services => Some("/services"),
            ContentKind::Projects => Some("/projects"),
            ContentKind::Articles => Some("/blog"),
            ContentKind::Gallery => Some("/gallery"),
            ContentKind::Events => Some("/events"),
            ContentKind::Jobs => Some("/careers"),
            ContentKind::Testimonials => Some("/feedback"),
            ContentKind::Inquiries => None,
        }
    }

    pub fn detail_page(self, id: &str) -> Option<String> {
        match self {
            ContentKind::Projects | ContentKind::Articles | ContentKind::Events | ContentKind::Jobs => {
                self.index_page().map(|index| format!("{index}/{id}"))
            }
            _ => None,
        }
    }

    pub fn singular(self) -> &'static str {
        match self {
            ContentKind::Services => "Service",
            ContentKind::Projects => "Project",
            ContentKind::Articles => "Article",
            ContentKind::Gallery => "Gallery image",
            ContentKind::Events => "Event",
            ContentKind::Jobs => "Job",
            ContentKind::Testimonials => "Testimonial",
            ContentKind::Inquiries => "Inquiry",
        }
    }

    pub fn admin_page(self) -> String { format!("/admin/{}", self.collection()) }

    /// Kinds whose items surface on the homepage.
    pub fn on_homepage(self) -> bool {
        !matches!(self, ContentKind::Jobs | ContentKind::Inquiries)
    }

    pub fn has_image(self) -> bool {
        matches!(
            self,
            ContentKind::Services
                | ContentKind::Projects
                | ContentKind::Articles
                | ContentKind::Gallery
                | ContentKind::Events
        )
    }

    /// Kinds that cannot be created without an image.
    pub fn requires_image(self) -> bool {
        matches!(self, ContentKind::Projects | ContentKind::Articles | ContentKind::Gallery)
    }

    pub fn featurable(self) -> bool { self.has_image() }

    /// Cached pages that can display this kind: the index, the item's detail
    /// page when one exists, the homepage, and the admin list.
    pub fn dependent_pages(self, id: Option<&str>) -> Vec<String> {
        let mut pages = Vec::with_capacity(4);
        if let Some(index) = self.index_page() {
            pages.push(index.to_string());
        }
        if let Some(detail) = id.and_then(|id| self.detail_page(id)) {
            pages.push(detail);
        }
        if self.on_homepage() {
            pages.push("/".to_string());
        }
        pages.push(self.admin_page());
        pages
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.collection()) }
}

impl FromStr for ContentKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let kind = match lower.as_str() {
            "services" => ContentKind::Services,
            "projects" => ContentKind::Projects,
            "articles" | "blog" => ContentKind::Articles,
            "gallery" => ContentKind::Gallery,
            "events" => ContentKind::Events,
            "jobs" | "careers" => ContentKind::Jobs,
            "testimonials" | "feedback" => ContentKind::Testimonials,
            "inquiries" | "contacts" => ContentKind::Inquiries,
            _ => return Err(ModelError::UnknownVariant { kind: "collection", value: s.to_string() }),
        };
        Ok(kind)
    }
}
