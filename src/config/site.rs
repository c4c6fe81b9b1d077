//! Blog configuration (_config.yml)

use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main blog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    // Site
    pub title: String,
    pub description: String,
    /// Author written into posts scaffolded by `new`
    pub author: String,
    /// IANA timezone used for "today" when a date is defaulted
    pub timezone: Option<String>,

    // Directory
    /// Flat directory holding one `<slug>.md` per post
    pub posts_dir: String,

    // Listing
    pub per_page: usize,
    pub related_limit: usize,
    pub featured_limit: usize,
    /// Category shown for posts without one; empty disables the fallback
    pub default_category: String,

    // Rendering
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Import
    #[serde(default)]
    pub import: ImportConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            title: "Inkwell".to_string(),
            description: String::new(),
            author: String::new(),
            timezone: None,

            posts_dir: "posts".to_string(),

            per_page: 6,
            related_limit: 3,
            featured_limit: 3,
            default_category: "General".to_string(),

            highlight: HighlightConfig::default(),
            import: ImportConfig::default(),
            extra: IndexMap::new(),
        }
    }
}

impl BlogConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: BlogConfig = serde_yaml::from_str(&content)?;
        tracing::debug!("Loaded config from {:?}", path.as_ref());
        Ok(config)
    }

    /// Fallback category, `None` when disabled
    pub fn default_category(&self) -> Option<&str> {
        let category = self.default_category.trim();
        (!category.is_empty()).then_some(category)
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

/// Markdown import configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Largest accepted file, in bytes
    pub max_file_size: u64,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_file_size: 5 * 1024 * 1024,
        }
    }
}
