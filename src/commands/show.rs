//! Show a single post: rendered, raw, or its related posts

use anyhow::{bail, Result};

use super::list::print_posts;
use crate::content::Post;
use crate::helpers;
use crate::Blog;

/// Look up a post for display, drafts included
fn find_post(blog: &Blog, slug: &str) -> Result<Post> {
    match blog.get_post_by_slug(slug)? {
        Some(post) => Ok(post),
        None => bail!("Post not found: {}", slug),
    }
}

/// Print a rendered post
pub fn show(blog: &Blog, slug: &str, json: bool) -> Result<()> {
    let post = find_post(blog, slug)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&post)?);
        return Ok(());
    }

    println!("{}", post.title);
    if !post.published {
        println!("(draft)");
    }
    let date = post.display_date();
    println!(
        "{} ({}) by {} - {} ({} words)",
        helpers::full_date(&date),
        helpers::relative_date(&date),
        post.author,
        post.reading_time_label(),
        post.word_count
    );
    if let Some(category) = &post.category {
        println!("Category: {}", category);
    }
    if !post.tags.is_empty() {
        println!("Tags: {}", post.tags.join(", "));
    }
    if !post.description.is_empty() {
        println!("\n{}", post.description);
    }
    println!("\n{}", post.html_content);
    Ok(())
}

/// Print the stored file content of a post
pub fn raw(blog: &Blog, slug: &str) -> Result<()> {
    let content = blog.store().read_file(slug)?;
    print!("{}", content);
    Ok(())
}

/// Print posts related to `slug`
pub fn related(blog: &Blog, slug: &str, limit: Option<usize>, json: bool) -> Result<()> {
    let post = find_post(blog, slug)?;
    let related = blog.get_related_posts(&post, limit.unwrap_or(blog.config.related_limit))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&related)?);
        return Ok(());
    }
    println!("Related to '{}' ({}):", post.title, related.len());
    print_posts(&related);
    Ok(())
}
