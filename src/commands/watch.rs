//! Check posts edited outside inkwell as they change on disk

use anyhow::Result;
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEvent};
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

use crate::Blog;

/// What a changed record looks like to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordStatus {
    Published { title: String },
    Draft { title: String },
    Removed,
    /// The record cannot be read; it is left out of every listing
    Invalid { reason: String },
}

/// Watch the posts directory and check every record that changes: report
/// whether it is published, a draft, gone, or unreadable. Runs until Ctrl+C.
pub async fn run(blog: &Blog) -> Result<()> {
    blog.ensure_ready()?;
    check_all(blog);

    let watcher_blog = blog.clone();
    let watcher = tokio::task::spawn_blocking(move || watch_posts(&watcher_blog));

    tracing::info!("Watching {:?} for changes. Press Ctrl+C to stop.", blog.posts_dir);

    tokio::select! {
        result = watcher => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Stopped watching");
            Ok(())
        }
    }
}

fn watch_posts(blog: &Blog) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();

    // Debounce so a burst of saves is checked once
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;
    debouncer
        .watcher()
        .watch(&blog.posts_dir, RecursiveMode::NonRecursive)?;
    tracing::debug!("Watching: {:?}", blog.posts_dir);

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let slugs = changed_slugs(&events);
                if slugs.is_empty() {
                    continue;
                }
                blog.invalidate();
                for slug in &slugs {
                    report(slug, &check_record(blog, slug));
                }
                summary(blog);
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

/// Status of the record stored under `slug`
pub fn check_record(blog: &Blog, slug: &str) -> RecordStatus {
    if !blog.store().exists(slug) {
        return RecordStatus::Removed;
    }
    match blog.loader().load_post(blog.store(), slug) {
        Ok(post) if post.published => RecordStatus::Published { title: post.title },
        Ok(post) => RecordStatus::Draft { title: post.title },
        Err(e) if e.is_not_found() => RecordStatus::Removed,
        Err(e) => RecordStatus::Invalid {
            reason: e.to_string(),
        },
    }
}

/// Check every record once, so problems already on disk show up at start
fn check_all(blog: &Blog) {
    match blog.store().slugs() {
        Ok(slugs) => {
            for slug in &slugs {
                if let status @ RecordStatus::Invalid { .. } = check_record(blog, slug) {
                    report(slug, &status);
                }
            }
        }
        Err(e) => tracing::error!("Failed to scan {:?}: {}", blog.posts_dir, e),
    }
    summary(blog);
}

fn report(slug: &str, status: &RecordStatus) {
    match status {
        RecordStatus::Published { title } => tracing::info!("'{}' published: {}", slug, title),
        RecordStatus::Draft { title } => tracing::info!("'{}' draft: {}", slug, title),
        RecordStatus::Removed => tracing::info!("'{}' removed", slug),
        RecordStatus::Invalid { reason } => tracing::warn!("'{}' cannot be read: {}", slug, reason),
    }
}

fn summary(blog: &Blog) {
    match blog.index() {
        Ok(index) => tracing::info!(
            "{} published posts, {} tags, {} categories",
            index.len(),
            index.tags().len(),
            index.categories().len()
        ),
        Err(e) => tracing::error!("Failed to load posts: {}", e),
    }
}

/// Distinct slugs behind the changed paths, ignoring non-record files
fn changed_slugs(events: &[DebouncedEvent]) -> BTreeSet<String> {
    events
        .iter()
        .filter(|e| is_record_path(&e.path))
        .filter_map(|e| e.path.file_stem().and_then(|s| s.to_str()))
        .map(str::to_string)
        .collect()
}

/// Only `<slug>.md` files count; editor backups and staging files do not
fn is_record_path(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    !name.starts_with('.') && !name.ends_with('~') && name.ends_with(".md")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_is_record_path() {
        assert!(is_record_path(Path::new("posts/hello.md")));
        assert!(!is_record_path(Path::new("posts/.tmpA1b2C3")));
        assert!(!is_record_path(Path::new("posts/.hello.md.swp")));
        assert!(!is_record_path(Path::new("posts/hello.md~")));
        assert!(!is_record_path(Path::new("posts/notes.txt")));
    }

    #[test]
    fn test_check_record() {
        let dir = TempDir::new().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        blog.ensure_ready().unwrap();
        fs::write(blog.posts_dir.join("live.md"), "---\ntitle: Live\n---\nx").unwrap();
        fs::write(
            blog.posts_dir.join("wip.md"),
            "---\ntitle: WIP\npublished: false\n---\nx",
        )
        .unwrap();
        fs::write(blog.posts_dir.join("bad.md"), "---\ntitle: [oops\n---\nx").unwrap();

        assert_eq!(
            check_record(&blog, "live"),
            RecordStatus::Published {
                title: "Live".to_string()
            }
        );
        assert_eq!(
            check_record(&blog, "wip"),
            RecordStatus::Draft {
                title: "WIP".to_string()
            }
        );
        assert!(matches!(check_record(&blog, "bad"), RecordStatus::Invalid { .. }));
        assert_eq!(check_record(&blog, "gone"), RecordStatus::Removed);
    }
}
