//! Post models: the rendered public view and the lightweight management summary

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use crate::helpers;

/// A blog post as seen by the query engine: defaulted metadata plus the
/// rendered body and derived reading statistics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Slug (URL-friendly name, also the file stem)
    pub slug: String,

    /// Post title, "Untitled" when missing
    pub title: String,

    /// Short description, empty when missing
    pub description: String,

    /// Date as stored, or the render time when missing
    pub date: String,

    /// Author, "Anonymous" when missing
    pub author: String,

    /// Post tags in file order
    pub tags: Vec<String>,

    /// Category, falls back to the configured default category
    pub category: Option<String>,

    /// Whether the post is published (absent counts as published)
    pub published: bool,

    /// Cover image URL
    pub cover_image: Option<String>,

    /// Raw markdown body
    #[serde(skip)]
    pub raw: String,

    /// Rendered HTML body
    pub html_content: String,

    /// Naive whitespace word count of the raw body
    pub word_count: usize,

    /// Reading time in minutes
    pub reading_time: usize,

    /// Parsed `date`, `None` when unparsable
    #[serde(skip)]
    pub timestamp: Option<DateTime<Utc>>,

    /// Custom front-matter fields
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl Post {
    /// "N min read"
    pub fn reading_time_label(&self) -> String {
        helpers::reading_time_label(self.reading_time)
    }

    /// Whether the post carries `tag`, ignoring case
    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == tag)
    }

    /// Whether the post is in `category`, ignoring case
    pub fn in_category(&self, category: &str) -> bool {
        self.category
            .as_deref()
            .is_some_and(|c| !c.is_empty() && c.to_lowercase() == category.to_lowercase())
    }

    /// Case-insensitive substring match against title, description,
    /// rendered HTML and tags
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.title.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
            || self.html_content.to_lowercase().contains(&query)
            || self.tags.iter().any(|t| t.to_lowercase().contains(&query))
    }

    /// Whether `other` shares a tag or the same non-empty category
    pub fn is_related_to(&self, other: &Post) -> bool {
        let shares_tag = other.tags.iter().any(|t| self.has_tag(t));
        let same_category = other
            .category
            .as_deref()
            .is_some_and(|c| self.in_category(c));
        shares_tag || same_category
    }

    /// Date for display: the parsed date, or now when unparsable
    pub fn display_date(&self) -> DateTime<Utc> {
        self.timestamp.unwrap_or_else(Utc::now)
    }
}

/// A lightweight record for management listings: metadata only, drafts
/// included, no body or HTML.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub author: String,
    /// Date as stored, empty when missing
    pub date: String,
    pub category: String,
    /// Absent counts as a draft here
    pub published: bool,
    pub tags: Vec<String>,
}

/// A standalone markdown document read outside the post store
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// First `# ` heading, or the file stem
    pub title: String,
    /// Rendered HTML of the whole file
    pub content: String,
    /// Reading time in minutes at the document rate
    pub reading_time: usize,
    pub word_count: usize,
}

impl Document {
    /// "N min read"
    pub fn reading_time_label(&self) -> String {
        helpers::reading_time_label(self.reading_time)
    }
}
