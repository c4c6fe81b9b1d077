//! Delete and rename posts

use anyhow::Result;

use crate::Blog;

/// Delete a post
pub fn delete(blog: &Blog, slug: &str) -> Result<()> {
    blog.delete_post(slug)?;
    println!("Deleted: {}", slug);
    Ok(())
}

/// Rename a post; the destination must be free
pub fn rename(blog: &Blog, old_slug: &str, new_slug: &str) -> Result<()> {
    blog.rename_post(old_slug, new_slug)?;
    println!("Renamed: {} -> {}", old_slug, new_slug);
    Ok(())
}
