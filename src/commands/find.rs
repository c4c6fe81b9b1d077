//! Filtered listings: by tag, by category, search and featured posts

use anyhow::{bail, Result};

use super::list::print_posts;
use crate::content::Post;
use crate::Blog;

/// Posts carrying a tag
pub fn by_tag(blog: &Blog, tag: &str, json: bool) -> Result<()> {
    let posts = blog.get_posts_by_tag(tag)?;
    output(&format!("Tagged '{}'", tag), &posts, json)
}

/// Posts in a category
pub fn by_category(blog: &Blog, category: &str, json: bool) -> Result<()> {
    let posts = blog.get_posts_by_category(category)?;
    output(&format!("In category '{}'", category), &posts, json)
}

/// Full-text search. An empty query is refused rather than listing
/// everything.
pub fn search(blog: &Blog, query: &str, json: bool) -> Result<()> {
    let query = query.trim();
    if query.is_empty() {
        bail!("Search query must not be empty");
    }
    let posts = blog.search_posts(query)?;
    output(&format!("Matching '{}'", query), &posts, json)
}

/// The newest posts
pub fn featured(blog: &Blog, limit: Option<usize>, json: bool) -> Result<()> {
    let posts = blog.get_featured_posts(limit.unwrap_or(blog.config.featured_limit))?;
    output("Featured", &posts, json)
}

fn output(heading: &str, posts: &[Post], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(posts)?);
    } else {
        println!("{} ({}):", heading, posts.len());
        print_posts(posts);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_search_is_refused() {
        let dir = TempDir::new().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        assert!(search(&blog, "   ", false).is_err());
        assert!(search(&blog, "rust", false).is_ok());
    }
}
