//! inkwell: a flat-file markdown blog store
//!
//! Posts live as `<slug>.md` files (YAML front-matter plus markdown body) in
//! one directory. The [`store`] module owns reading and writing records; the
//! [`query`] module answers listing, tag, category, search and related-post
//! questions over the published, rendered collection. [`Blog`] ties both to
//! a site configuration and keeps the query index in sync with mutations.

pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod query;
pub mod store;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use content::import;
use content::loader::ContentLoader;
use content::{Document, FrontMatter, MarkdownRenderer, Post, PostSummary};
use query::{Paginated, PostIndex};
use store::{ContentStore, RawRecord};

/// Name of the configuration file in the base directory
pub const CONFIG_FILE: &str = "_config.yml";

/// The main blog application
#[derive(Clone)]
pub struct Blog {
    /// Blog configuration
    pub config: config::BlogConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Posts directory
    pub posts_dir: PathBuf,
    store: ContentStore,
    renderer: Arc<MarkdownRenderer>,
    index: Arc<RwLock<Option<Arc<PostIndex>>>>,
    /// Bumped on every invalidation; an index built from an older scan is
    /// never cached
    generation: Arc<AtomicU64>,
}

/// Outcome of a batch import
#[derive(Debug, Default)]
pub struct ImportReport {
    /// Slugs of the posts created
    pub imported: Vec<String>,
    /// Files that were not imported, with the reason
    pub failed: Vec<(PathBuf, String)>,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let config_path = base_dir.as_ref().join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::BlogConfig::load(&config_path)?
        } else {
            config::BlogConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a Blog instance with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::BlogConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let posts_dir = base_dir.join(&config.posts_dir);
        let store = ContentStore::new(&posts_dir, config.timezone.clone());
        let renderer = Arc::new(MarkdownRenderer::with_options(&config.highlight));

        Self {
            config,
            base_dir,
            posts_dir,
            store,
            renderer,
            index: Arc::new(RwLock::new(None)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The underlying content store
    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    /// A loader bound to this blog's config and renderer
    pub fn loader(&self) -> ContentLoader<'_> {
        ContentLoader::new(&self.config, &self.renderer)
    }

    /// Today's date in the configured timezone
    pub fn today(&self) -> String {
        helpers::today(self.config.timezone.as_deref())
    }

    // ------------------------------------------------------------------
    // Index
    // ------------------------------------------------------------------

    /// Current query index, rebuilt from disk when invalidated.
    ///
    /// A rebuild that overlaps an invalidation is returned to its caller but
    /// not cached, so a write made during the scan is seen by the next query.
    pub fn index(&self) -> Result<Arc<PostIndex>> {
        if let Some(index) = self
            .index
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
        {
            return Ok(Arc::clone(index));
        }

        let generation = self.generation.load(Ordering::SeqCst);
        let posts = self.loader().load_posts(&self.store)?;
        let index = Arc::new(PostIndex::new(posts));

        let mut slot = self.index.write().unwrap_or_else(|e| e.into_inner());
        if self.generation.load(Ordering::SeqCst) == generation {
            *slot = Some(Arc::clone(&index));
        } else {
            tracing::debug!("Post index changed during rebuild, not caching");
        }
        Ok(index)
    }

    /// Drop the cached index; the next query rescans the store
    pub fn invalidate(&self) {
        let mut slot = self.index.write().unwrap_or_else(|e| e.into_inner());
        self.generation.fetch_add(1, Ordering::SeqCst);
        *slot = None;
        tracing::debug!("Post index invalidated");
    }

    // ------------------------------------------------------------------
    // Query engine
    // ------------------------------------------------------------------

    /// Every published post, newest first
    pub fn get_all_posts(&self) -> Result<Vec<Post>> {
        Ok(self.index()?.all().to_vec())
    }

    /// The post stored under `slug` (a trailing `.md` is ignored), drafts
    /// included; `None` when absent. Published posts come from the index,
    /// drafts straight from the store.
    pub fn get_post_by_slug(&self, slug: &str) -> Result<Option<Post>> {
        let slug = slug.strip_suffix(".md").unwrap_or(slug);
        if let Some(post) = self.index()?.get(slug) {
            return Ok(Some(post.clone()));
        }
        match self.loader().load_post(&self.store, slug) {
            Ok(post) => Ok(Some(post)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Published posts with `tag`, ignoring case
    pub fn get_posts_by_tag(&self, tag: &str) -> Result<Vec<Post>> {
        Ok(owned(self.index()?.by_tag(tag)))
    }

    /// Published posts in `category`, ignoring case
    pub fn get_posts_by_category(&self, category: &str) -> Result<Vec<Post>> {
        Ok(owned(self.index()?.by_category(category)))
    }

    /// Distinct tags across published posts, sorted
    pub fn get_all_tags(&self) -> Result<Vec<String>> {
        Ok(self.index()?.tags())
    }

    /// Distinct non-empty categories across published posts, sorted
    pub fn get_all_categories(&self) -> Result<Vec<String>> {
        Ok(self.index()?.categories())
    }

    /// Case-insensitive substring search
    pub fn search_posts(&self, query: &str) -> Result<Vec<Post>> {
        Ok(owned(self.index()?.search(query)))
    }

    /// Related posts for `post`, padded in list order up to `limit`
    pub fn get_related_posts(&self, post: &Post, limit: usize) -> Result<Vec<Post>> {
        Ok(owned(self.index()?.related(post, limit)))
    }

    /// The newest `limit` published posts
    pub fn get_featured_posts(&self, limit: usize) -> Result<Vec<Post>> {
        Ok(owned(self.index()?.featured(limit)))
    }

    /// One page of published posts
    pub fn get_posts_with_pagination(&self, page: usize, per_page: usize) -> Result<Paginated> {
        Ok(self.index()?.paginate(page, per_page))
    }

    /// Render a standalone markdown document
    pub fn read_document<P: AsRef<Path>>(&self, path: P) -> Result<Document> {
        self.loader().load_document(path.as_ref())
    }

    // ------------------------------------------------------------------
    // Content store
    // ------------------------------------------------------------------

    /// Create the posts directory if needed
    pub fn ensure_ready(&self) -> store::Result<()> {
        self.store.ensure_ready()
    }

    /// Create (`slug` is `None`) or overwrite (`slug` given) a post
    pub fn save_post(&self, slug: Option<&str>, front_matter: &FrontMatter, body: &str) -> store::Result<String> {
        let result = self.store.write(slug, front_matter, body);
        self.invalidate();
        result
    }

    /// Save an edit of `old_slug`, moving the record when the title now
    /// implies another slug. Returns the slug the record ends up under.
    ///
    /// A move creates the new record first and removes the old one after,
    /// so a failed write leaves the old record as it was. If only the
    /// removal fails, both records exist and the error is returned.
    pub fn save_edit(&self, old_slug: &str, front_matter: &FrontMatter, body: &str) -> store::Result<String> {
        let new_slug = helpers::slugify(front_matter.title.as_deref().unwrap_or(""));

        if new_slug.is_empty() || new_slug == old_slug {
            return self.save_post(Some(old_slug), front_matter, body);
        }

        if !self.store.exists(old_slug) {
            return Err(store::StoreError::NotFound {
                slug: old_slug.to_string(),
            });
        }

        let created = self.save_post(None, front_matter, body)?;
        self.delete_post(old_slug)?;
        tracing::info!("Moved post '{}' to '{}'", old_slug, created);
        Ok(created)
    }

    /// Front-matter and body exactly as stored
    pub fn read_raw(&self, slug: &str) -> store::Result<RawRecord> {
        self.store.read_raw(slug)
    }

    /// Delete a post
    pub fn delete_post(&self, slug: &str) -> store::Result<()> {
        let result = self.store.delete(slug);
        self.invalidate();
        result
    }

    /// Move a post to a new slug
    pub fn rename_post(&self, old_slug: &str, new_slug: &str) -> store::Result<()> {
        let result = self.store.rename(old_slug, new_slug);
        self.invalidate();
        result
    }

    /// Management listing: every post, drafts included, newest first
    pub fn list_summaries(&self) -> store::Result<Vec<PostSummary>> {
        self.store.list_summaries()
    }

    // ------------------------------------------------------------------
    // Import
    // ------------------------------------------------------------------

    /// Import one markdown file as a new post
    pub fn import_file<P: AsRef<Path>>(&self, path: P) -> Result<String> {
        let today = self.today();
        let parsed = import::prepare_file(path.as_ref(), self.config.import.max_file_size, &today)?;
        let slug = self.save_post(None, &parsed.front_matter, &parsed.body)?;
        Ok(slug)
    }

    /// Import every file matched by the glob patterns. Failures are
    /// collected per file; existing posts are never overwritten.
    pub fn import_glob(&self, patterns: &[String]) -> Result<ImportReport> {
        let mut report = ImportReport::default();

        for pattern in patterns {
            let paths = glob::glob(pattern)
                .map_err(|e| anyhow::anyhow!("Invalid pattern '{}': {}", pattern, e))?;
            for entry in paths {
                let path = match entry {
                    Ok(path) => path,
                    Err(e) => {
                        report.failed.push((e.path().to_path_buf(), e.to_string()));
                        continue;
                    }
                };
                if path.is_dir() {
                    continue;
                }
                match self.import_file(&path) {
                    Ok(slug) => {
                        tracing::info!("Imported {:?} as '{}'", path, slug);
                        report.imported.push(slug);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to import {:?}: {}", path, e);
                        report.failed.push((path, e.to_string()));
                    }
                }
            }
        }

        Ok(report)
    }
}

fn owned(posts: Vec<&Post>) -> Vec<Post> {
    posts.into_iter().cloned().collect()
}
