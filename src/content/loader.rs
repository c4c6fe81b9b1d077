//! Content loader - turns stored records into rendered posts and documents

use anyhow::Result;
use std::fs;
use std::path::Path;

use super::{Document, FrontMatter, MarkdownRenderer, Post};
use crate::config::BlogConfig;
use crate::helpers;
use crate::store::{ContentStore, StoreError};

/// Renders records from a [`ContentStore`] with display defaults applied
pub struct ContentLoader<'a> {
    config: &'a BlogConfig,
    renderer: &'a MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(config: &'a BlogConfig, renderer: &'a MarkdownRenderer) -> Self {
        Self { config, renderer }
    }

    /// Load every published post, newest first.
    ///
    /// A record that cannot be read or parsed is skipped with a warning so
    /// one bad file never hides the others.
    pub fn load_posts(&self, store: &ContentStore) -> Result<Vec<Post>> {
        let mut posts = Vec::new();

        for slug in store.slugs()? {
            match self.load_post(store, &slug) {
                Ok(post) => {
                    if post.published {
                        posts.push(post);
                    } else {
                        tracing::debug!("Skipping draft '{}'", slug);
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to load post '{}': {}", slug, e);
                }
            }
        }

        // Sort by date descending (newest first), unparsable dates last
        posts.sort_by(|a, b| helpers::newest_first(a.timestamp.as_ref(), b.timestamp.as_ref()));

        tracing::debug!("Loaded {} published posts", posts.len());
        Ok(posts)
    }

    /// Load a single post, drafts included
    pub fn load_post(&self, store: &ContentStore, slug: &str) -> std::result::Result<Post, StoreError> {
        let content = store.read_file(slug)?;
        self.render_post(slug, &content)
            .map_err(|source| StoreError::InvalidFrontMatter {
                slug: slug.to_string(),
                source,
            })
    }

    /// Build a post from full file content
    pub fn render_post(&self, slug: &str, content: &str) -> std::result::Result<Post, serde_yaml::Error> {
        let (fm, body) = FrontMatter::parse(content)?;

        let date = fm
            .date
            .filter(|d| !d.is_empty())
            .unwrap_or_else(helpers::now_iso);
        let timestamp = helpers::parse_date(&date);

        let category = fm
            .category
            .filter(|c| !c.is_empty())
            .or_else(|| self.config.default_category().map(str::to_string));

        let word_count = helpers::word_count(body);

        Ok(Post {
            slug: slug.to_string(),
            title: fm
                .title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "Untitled".to_string()),
            description: fm.description.unwrap_or_default(),
            date,
            author: fm
                .author
                .filter(|a| !a.is_empty())
                .unwrap_or_else(|| "Anonymous".to_string()),
            tags: fm.tags.unwrap_or_default(),
            category,
            published: fm.published != Some(false),
            cover_image: fm.cover_image.filter(|c| !c.is_empty()),
            raw: body.to_string(),
            html_content: self.renderer.render(body),
            word_count,
            reading_time: helpers::reading_time(word_count, helpers::POST_WORDS_PER_MINUTE),
            timestamp,
            extra: fm.extra,
        })
    }

    /// Read a standalone markdown file.
    ///
    /// The whole file is rendered and counted, front-matter included, at the
    /// slower document reading rate.
    pub fn load_document(&self, path: &Path) -> Result<Document> {
        let content = fs::read_to_string(path)?;

        let title = helpers::first_heading(&content).unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Untitled")
                .to_string()
        });
        let word_count = helpers::word_count(&content);

        Ok(Document {
            title,
            content: self.renderer.render(&content),
            reading_time: helpers::reading_time(word_count, helpers::DOCUMENT_WORDS_PER_MINUTE),
            word_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn loader_parts() -> (BlogConfig, MarkdownRenderer) {
        (BlogConfig::default(), MarkdownRenderer::plain())
    }

    #[test]
    fn test_render_post_applies_defaults() {
        let (config, renderer) = loader_parts();
        let loader = ContentLoader::new(&config, &renderer);
        let post = loader.render_post("bare", "---\ndate: someday\n---\nHello there").unwrap();
        assert_eq!(post.title, "Untitled");
        assert_eq!(post.description, "");
        assert_eq!(post.author, "Anonymous");
        assert_eq!(post.category.as_deref(), Some("General"));
        assert!(post.published);
        assert_eq!(post.date, "someday");
        assert!(post.timestamp.is_none());
        assert!(post.html_content.contains("<p>Hello there</p>"));
    }

    #[test]
    fn test_missing_date_is_render_time() {
        let (config, renderer) = loader_parts();
        let loader = ContentLoader::new(&config, &renderer);
        let post = loader.render_post("x", "---\ntitle: X\n---\nbody").unwrap();
        assert!(post.timestamp.is_some());
    }

    #[test]
    fn test_reading_time_uses_post_rate() {
        let (config, renderer) = loader_parts();
        let loader = ContentLoader::new(&config, &renderer);
        let body = vec!["word"; 401].join(" ");
        let post = loader
            .render_post("long", &format!("---\ntitle: Long\n---\n{}", body))
            .unwrap();
        assert_eq!(post.word_count, 401);
        assert_eq!(post.reading_time, 3);
        assert_eq!(post.reading_time_label(), "3 min read");
    }

    #[test]
    fn test_disabled_default_category() {
        let (mut config, renderer) = loader_parts();
        config.default_category = String::new();
        let loader = ContentLoader::new(&config, &renderer);
        let post = loader.render_post("x", "---\ntitle: X\ncategory: ''\n---\n").unwrap();
        assert_eq!(post.category, None);
    }

    #[test]
    fn test_load_posts_skips_drafts_and_broken() {
        let dir = TempDir::new().unwrap();
        let store = ContentStore::new(dir.path(), None);
        fs::write(dir.path().join("a.md"), "---\ntitle: A\ndate: 2024-01-01\n---\na").unwrap();
        fs::write(dir.path().join("b.md"), "---\ntitle: B\ndate: 2024-02-01\npublished: false\n---\nb").unwrap();
        fs::write(dir.path().join("c.md"), "---\ntitle: [broken\n---\nc").unwrap();
        fs::write(dir.path().join("d.md"), "---\ntitle: D\ndate: 2024-03-01\n---\nd").unwrap();

        let (config, renderer) = loader_parts();
        let loader = ContentLoader::new(&config, &renderer);
        let posts = loader.load_posts(&store).unwrap();
        let slugs: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["d", "a"]);
    }

    #[test]
    fn test_load_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("theory.md");
        let text = format!("# Consensus\n\n{}", vec!["word"; 150].join(" "));
        fs::write(&path, &text).unwrap();

        let (config, renderer) = loader_parts();
        let loader = ContentLoader::new(&config, &renderer);
        let doc = loader.load_document(&path).unwrap();
        assert_eq!(doc.title, "Consensus");
        assert_eq!(doc.word_count, 152);
        assert_eq!(doc.reading_time, 2);
        assert!(doc.content.contains("<h1>Consensus</h1>"));

        let untitled = dir.path().join("notes.md");
        fs::write(&untitled, "no heading here").unwrap();
        assert_eq!(loader.load_document(&untitled).unwrap().title, "notes");
    }
}
