//! Markdown file import: validation, lenient parsing and metadata fill-in

use std::fs;
use std::path::Path;
use thiserror::Error;

use super::FrontMatter;
use crate::helpers;

/// Errors raised while preparing a file for import
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("{path}: not a markdown file (expected .md)")]
    NotMarkdown { path: String },

    #[error("{path}: file is {size} bytes, the limit is {limit}")]
    TooLarge { path: String, size: u64, limit: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A markdown file parsed with creation defaults
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedImport {
    /// Front-matter with every schema field filled in
    pub front_matter: FrontMatter,
    /// Trimmed body, or the whole file when the front-matter was unreadable
    pub body: String,
    /// Whether the file carried a front-matter block with at least one key
    pub has_valid_front_matter: bool,
}

/// Check extension and size before reading a file
pub fn validate_file(path: &Path, max_file_size: u64) -> Result<(), ImportError> {
    let display = path.display().to_string();
    let is_markdown = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.to_lowercase().ends_with(".md"));
    if !is_markdown {
        return Err(ImportError::NotMarkdown { path: display });
    }

    let size = fs::metadata(path)?.len();
    if size > max_file_size {
        return Err(ImportError::TooLarge {
            path: display,
            size,
            limit: max_file_size,
        });
    }
    Ok(())
}

/// Parse file content with the defaults used for new posts.
///
/// Unlike the query view, an absent `published` means draft here. A
/// `published` that is not a boolean counts as absent and `tags` that are not
/// a list are dropped; the rest of the block is kept.
pub fn parse_import(content: &str, today: &str) -> ParsedImport {
    match FrontMatter::parse_lenient(content) {
        Ok((fm, body)) => {
            let has_valid_front_matter = !fm.is_empty();
            ParsedImport {
                front_matter: with_creation_defaults(fm, today),
                body: body.trim().to_string(),
                has_valid_front_matter,
            }
        }
        Err(e) => {
            tracing::warn!("Failed to parse front matter, importing as plain content: {}", e);
            ParsedImport {
                front_matter: with_creation_defaults(FrontMatter::default(), today),
                body: content.to_string(),
                has_valid_front_matter: false,
            }
        }
    }
}

fn with_creation_defaults(fm: FrontMatter, today: &str) -> FrontMatter {
    FrontMatter {
        title: Some(fm.title.unwrap_or_default()),
        description: Some(fm.description.unwrap_or_default()),
        date: Some(fm.date.filter(|d| !d.is_empty()).unwrap_or_else(|| today.to_string())),
        author: Some(fm.author.unwrap_or_default()),
        tags: Some(fm.tags.unwrap_or_default()),
        category: Some(fm.category.unwrap_or_default()),
        published: Some(fm.published.unwrap_or(false)),
        cover_image: Some(fm.cover_image.unwrap_or_default()),
        extra: fm.extra,
    }
}

/// Read, validate and parse a file, filling in a missing title (first
/// heading, else file name) and description (summary of the body).
pub fn prepare_file(path: &Path, max_file_size: u64, today: &str) -> Result<ParsedImport, ImportError> {
    validate_file(path, max_file_size)?;
    let content = fs::read_to_string(path)?;
    let mut parsed = parse_import(&content, today);

    let fm = &mut parsed.front_matter;
    if fm.title.as_deref().unwrap_or("").is_empty() {
        let title = helpers::first_heading(&parsed.body).unwrap_or_else(|| file_title(path));
        fm.title = Some(title);
    }
    if fm.description.as_deref().unwrap_or("").is_empty() {
        fm.description = Some(helpers::summarize(&parsed.body));
    }

    Ok(parsed)
}

/// File name without a `.md` extension, any case
fn file_title(path: &Path) -> String {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    if name.to_lowercase().ends_with(".md") {
        name[..name.len() - 3].to_string()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_import_defaults() {
        let parsed = parse_import("---\ntitle: Hello\n---\n\n  Body  \n", "2024-05-05");
        assert!(parsed.has_valid_front_matter);
        assert_eq!(parsed.body, "Body");
        let fm = parsed.front_matter;
        assert_eq!(fm.title.as_deref(), Some("Hello"));
        assert_eq!(fm.date.as_deref(), Some("2024-05-05"));
        assert_eq!(fm.published, Some(false));
        assert_eq!(fm.tags, Some(vec![]));
        assert_eq!(fm.author.as_deref(), Some(""));
    }

    #[test]
    fn test_parse_import_keeps_explicit_published() {
        let parsed = parse_import("---\npublished: true\n---\nx", "2024-05-05");
        assert_eq!(parsed.front_matter.published, Some(true));
    }

    #[test]
    fn test_parse_import_broken_front_matter() {
        let text = "---\ntitle: [nope\n---\nbody";
        let parsed = parse_import(text, "2024-05-05");
        assert!(!parsed.has_valid_front_matter);
        assert_eq!(parsed.body, text);
        assert_eq!(parsed.front_matter.title.as_deref(), Some(""));
    }

    #[test]
    fn test_validate_file() {
        let dir = TempDir::new().unwrap();
        let txt = dir.path().join("notes.txt");
        fs::write(&txt, "x").unwrap();
        assert!(matches!(validate_file(&txt, 100), Err(ImportError::NotMarkdown { .. })));

        let big = dir.path().join("BIG.MD");
        fs::write(&big, "x".repeat(20)).unwrap();
        assert!(matches!(validate_file(&big, 10), Err(ImportError::TooLarge { .. })));
        assert!(validate_file(&big, 20).is_ok());
    }

    #[test]
    fn test_prepare_file_fills_title_and_description() {
        let dir = TempDir::new().unwrap();
        let with_heading = dir.path().join("a.md");
        fs::write(&with_heading, "# Heading Title\n\nFirst *paragraph* here.\n").unwrap();
        let parsed = prepare_file(&with_heading, 1024, "2024-05-05").unwrap();
        assert!(!parsed.has_valid_front_matter);
        assert_eq!(parsed.front_matter.title.as_deref(), Some("Heading Title"));
        assert_eq!(parsed.front_matter.description.as_deref(), Some("First paragraph here."));

        let no_heading = dir.path().join("My Notes.Md");
        fs::write(&no_heading, "just text").unwrap();
        let parsed = prepare_file(&no_heading, 1024, "2024-05-05").unwrap();
        assert_eq!(parsed.front_matter.title.as_deref(), Some("My Notes"));
    }

    #[test]
    fn test_parse_import_non_boolean_published() {
        let parsed = parse_import("---\ntitle: Hi\npublished: 'yes'\n---\nbody", "2024-05-05");
        assert!(parsed.has_valid_front_matter);
        assert_eq!(parsed.body, "body");
        assert_eq!(parsed.front_matter.title.as_deref(), Some("Hi"));
        assert_eq!(parsed.front_matter.published, Some(false));
    }

    #[test]
    fn test_parse_import_tags_must_be_a_list() {
        let parsed = parse_import("---\ntitle: Hi\ntags: rust\n---\nbody", "2024-05-05");
        assert_eq!(parsed.front_matter.tags, Some(vec![]));
        assert_eq!(parsed.front_matter.title.as_deref(), Some("Hi"));

        let parsed = parse_import("---\ntags: 42\n---\nbody", "2024-05-05");
        assert_eq!(parsed.front_matter.tags, Some(vec![]));

        let parsed = parse_import("---\ntags:\n  - rust\n  - web\n---\nbody", "2024-05-05");
        assert_eq!(
            parsed.front_matter.tags,
            Some(vec!["rust".to_string(), "web".to_string()])
        );
    }
}
