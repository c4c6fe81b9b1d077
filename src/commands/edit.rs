//! Replace an existing post from a markdown file

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::content::FrontMatter;
use crate::Blog;

/// Replace post `slug` with the front-matter and body of `file`.
///
/// Nothing is merged: the file becomes the whole record. When its title
/// implies another slug the post is renamed first. Returns the final slug.
pub fn edit_post(blog: &Blog, slug: &str, file: &Path) -> Result<String> {
    // The post has to exist before it can be edited
    blog.read_raw(slug)?;

    let content = fs::read_to_string(file).with_context(|| format!("Failed to read {:?}", file))?;
    let (front_matter, body) =
        FrontMatter::parse(&content).with_context(|| format!("Invalid front matter in {:?}", file))?;

    let new_slug = blog.save_edit(slug, &front_matter, body)?;
    if new_slug != slug {
        println!("Renamed: {} -> {}", slug, new_slug);
    }
    println!("Saved: {:?}", blog.store().path_for(&new_slug)?);
    Ok(new_slug)
}
