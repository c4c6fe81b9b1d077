//! List blog content

use anyhow::Result;

use crate::content::Post;
use crate::helpers;
use crate::Blog;

/// List blog content by type
pub fn run(blog: &Blog, content_type: &str, page: Option<usize>, json: bool) -> Result<()> {
    match content_type {
        "post" | "posts" => {
            let page = blog.get_posts_with_pagination(page.unwrap_or(1), blog.config.per_page)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&page)?);
                return Ok(());
            }
            println!(
                "Posts ({}), page {}/{}:",
                page.total_posts,
                page.current_page,
                page.total_pages.max(1)
            );
            print_posts(&page.posts);
        }
        "manage" | "all" => {
            let summaries = blog.list_summaries()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
                return Ok(());
            }
            println!("All posts ({}):", summaries.len());
            for s in summaries {
                let state = if s.published { "published" } else { "draft" };
                let date = if s.date.is_empty() {
                    "-".to_string()
                } else {
                    helpers::display_date(&s.date)
                };
                println!(
                    "  {:<18} {:<9} {} [{}] ({}, {})",
                    date, state, s.title, s.slug, s.author, s.category
                );
            }
        }
        "tag" | "tags" => {
            let tags = blog.get_all_tags()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tags)?);
                return Ok(());
            }
            println!("Tags ({}):", tags.len());
            for tag in tags {
                let count = blog.get_posts_by_tag(&tag)?.len();
                println!("  {} ({})", tag, count);
            }
        }
        "category" | "categories" => {
            let categories = blog.get_all_categories()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&categories)?);
                return Ok(());
            }
            println!("Categories ({}):", categories.len());
            for category in categories {
                let count = blog.get_posts_by_category(&category)?.len();
                println!("  {} ({})", category, count);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, manage, tag, category",
                content_type
            );
        }
    }

    Ok(())
}

/// Print one line per post
pub fn print_posts(posts: &[Post]) {
    for post in posts {
        println!(
            "  {} - {} [{}] {}",
            post.display_date().format("%Y-%m-%d"),
            post.title,
            post.slug,
            post.reading_time_label()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_unknown_type() {
        let dir = TempDir::new().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        assert!(run(&blog, "pages", None, false).is_err());
        assert!(run(&blog, "post", None, false).is_ok());
        assert!(run(&blog, "manage", None, true).is_ok());
    }
}
