//! Content store: one `<slug>.md` file per post in a single flat directory
//!
//! The store owns existence, read, write, delete and rename of records. It
//! never applies display defaults to what it returns from `read_raw`; the
//! management listing is the only place it fills in placeholders.
//!
//! There is no locking. Concurrent writers to the same slug race and the
//! last write wins; new files are staged in a temporary file and moved into
//! place, so readers never observe a half-written record.

mod error;

pub use error::{ErrorKind, Result, StoreError};

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::content::{FrontMatter, PostSummary};
use crate::helpers;

/// File extension of stored records
const RECORD_EXTENSION: &str = "md";

/// A record as stored: verbatim front-matter plus markdown body
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub slug: String,
    pub front_matter: FrontMatter,
    pub body: String,
}

/// Flat-file post storage keyed by slug
#[derive(Debug, Clone)]
pub struct ContentStore {
    dir: PathBuf,
    timezone: Option<String>,
}

impl ContentStore {
    /// Create a store rooted at `dir`. `timezone` decides "today" for
    /// defaulted dates.
    pub fn new<P: AsRef<Path>>(dir: P, timezone: Option<String>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            timezone,
        }
    }

    /// Storage directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the storage directory if it does not exist. Idempotent.
    pub fn ensure_ready(&self) -> Result<()> {
        if !self.dir.is_dir() {
            fs::create_dir_all(&self.dir)?;
            tracing::debug!("Created posts directory {:?}", self.dir);
        }
        Ok(())
    }

    /// Path of the file backing `slug`
    pub fn path_for(&self, slug: &str) -> Result<PathBuf> {
        validate_slug(slug)?;
        Ok(self.dir.join(format!("{}.{}", slug, RECORD_EXTENSION)))
    }

    /// Whether a record exists for `slug`
    pub fn exists(&self, slug: &str) -> bool {
        self.path_for(slug).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Write a record and return its slug.
    ///
    /// Without `slug` this is a create: the slug is derived from the title
    /// and an existing record under it is a [`StoreError::Conflict`]. With
    /// `slug` this is an update that replaces the record unconditionally,
    /// even when the title now implies another slug; renaming is the
    /// caller's job. A missing `date` is filled with today's date.
    pub fn write(&self, slug: Option<&str>, front_matter: &FrontMatter, body: &str) -> Result<String> {
        self.ensure_ready()?;

        let (slug, is_update) = match slug {
            Some(slug) => (slug.to_string(), true),
            None => (
                helpers::slugify(front_matter.title.as_deref().unwrap_or("")),
                false,
            ),
        };
        let path = self.path_for(&slug)?;

        let mut front_matter = front_matter.clone();
        if front_matter.date.is_none() {
            front_matter.date = Some(helpers::today(self.timezone.as_deref()));
        }
        let content = front_matter.to_file_string(body)?;

        if !is_update && path.exists() {
            return Err(StoreError::Conflict { slug });
        }

        let mut staged = NamedTempFile::new_in(&self.dir)?;
        staged.write_all(content.as_bytes())?;
        staged.flush()?;

        if is_update {
            staged.persist(&path).map_err(|e| StoreError::Io(e.error))?;
            tracing::info!("Updated post '{}'", slug);
        } else {
            staged.persist_noclobber(&path).map_err(|e| {
                if e.error.kind() == io::ErrorKind::AlreadyExists {
                    StoreError::Conflict { slug: slug.clone() }
                } else {
                    StoreError::Io(e.error)
                }
            })?;
            tracing::info!("Created post '{}'", slug);
        }

        Ok(slug)
    }

    /// Read a record's front-matter and body exactly as stored
    pub fn read_raw(&self, slug: &str) -> Result<RawRecord> {
        let content = self.read_file(slug)?;
        let (front_matter, body) =
            FrontMatter::parse(&content).map_err(|source| StoreError::InvalidFrontMatter {
                slug: slug.to_string(),
                source,
            })?;

        Ok(RawRecord {
            slug: slug.to_string(),
            front_matter,
            body: body.to_string(),
        })
    }

    /// Full file content of a record
    pub fn read_file(&self, slug: &str) -> Result<String> {
        let path = self.path_for(slug)?;
        fs::read_to_string(&path).map_err(|e| not_found_or_io(e, slug))
    }

    /// Remove a record
    pub fn delete(&self, slug: &str) -> Result<()> {
        let path = self.path_for(slug)?;
        if !path.is_file() {
            return Err(StoreError::NotFound {
                slug: slug.to_string(),
            });
        }
        fs::remove_file(&path).map_err(|e| not_found_or_io(e, slug))?;
        tracing::info!("Deleted post '{}'", slug);
        Ok(())
    }

    /// Move a record to a new slug. Fails when the source is missing or the
    /// destination is taken; on failure nothing changes.
    pub fn rename(&self, old_slug: &str, new_slug: &str) -> Result<()> {
        let old_path = self.path_for(old_slug)?;
        let new_path = self.path_for(new_slug)?;

        if !old_path.is_file() {
            return Err(StoreError::NotFound {
                slug: old_slug.to_string(),
            });
        }
        if new_path.exists() {
            return Err(StoreError::Conflict {
                slug: new_slug.to_string(),
            });
        }

        fs::rename(&old_path, &new_path).map_err(|e| not_found_or_io(e, old_slug))?;
        tracing::info!("Renamed post '{}' to '{}'", old_slug, new_slug);
        Ok(())
    }

    /// Slugs of every stored record, in file-name order
    pub fn slugs(&self) -> Result<Vec<String>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut slugs = Vec::new();
        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                StoreError::Io(e.into_io_error().unwrap_or_else(|| {
                    io::Error::new(io::ErrorKind::Other, "directory walk failed")
                }))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let is_record = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e == RECORD_EXTENSION);
            if let (true, Some(stem)) = (is_record, path.file_stem().and_then(|s| s.to_str())) {
                slugs.push(stem.to_string());
            }
        }
        Ok(slugs)
    }

    /// Every record's metadata, drafts included, newest first.
    ///
    /// Missing fields get management placeholders and an absent `published`
    /// counts as a draft. Records with unparsable dates sort last. A record
    /// whose front-matter cannot be read is skipped with a warning.
    pub fn list_summaries(&self) -> Result<Vec<PostSummary>> {
        self.ensure_ready()?;

        let mut summaries = Vec::new();
        for slug in self.slugs()? {
            match self.read_raw(&slug) {
                Ok(record) => summaries.push(summarize_record(record)),
                Err(e) => tracing::warn!("Skipping post '{}': {}", slug, e),
            }
        }

        summaries.sort_by(|a, b| {
            helpers::newest_first(
                helpers::parse_date(&a.date).as_ref(),
                helpers::parse_date(&b.date).as_ref(),
            )
        });
        Ok(summaries)
    }
}

fn summarize_record(record: RawRecord) -> PostSummary {
    let fm = record.front_matter;
    PostSummary {
        slug: record.slug,
        title: non_empty(fm.title).unwrap_or_else(|| "Untitled".to_string()),
        description: fm.description.unwrap_or_default(),
        author: non_empty(fm.author).unwrap_or_else(|| "Unknown author".to_string()),
        date: fm.date.unwrap_or_default(),
        category: non_empty(fm.category).unwrap_or_else(|| "Uncategorized".to_string()),
        published: fm.published.unwrap_or(false),
        tags: fm.tags.unwrap_or_default(),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn not_found_or_io(e: io::Error, slug: &str) -> StoreError {
    if e.kind() == io::ErrorKind::NotFound {
        StoreError::NotFound {
            slug: slug.to_string(),
        }
    } else {
        StoreError::Io(e)
    }
}

/// A slug must be usable as a single file name inside the store directory
fn validate_slug(slug: &str) -> Result<()> {
    let reason = if slug.is_empty() {
        Some("slug is empty")
    } else if slug.contains(['/', '\\', '\0']) {
        Some("slug contains a path separator")
    } else if slug.starts_with('.') {
        Some("slug starts with a dot")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(StoreError::InvalidSlug {
            slug: slug.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}
