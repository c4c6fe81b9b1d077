//! Create a new post

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::content::FrontMatter;
use crate::Blog;

/// Fields for a new post, as collected from the command line
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: String,
    pub description: Option<String>,
    pub author: Option<String>,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub publish: bool,
    pub cover_image: Option<String>,
    /// Markdown file to take the body from
    pub body_file: Option<PathBuf>,
}

impl NewPost {
    /// Front-matter with the creation defaults: every field present and
    /// `published: false` unless asked otherwise
    pub fn front_matter(&self, blog: &Blog) -> FrontMatter {
        FrontMatter {
            title: Some(self.title.clone()),
            description: Some(self.description.clone().unwrap_or_default()),
            date: Some(blog.today()),
            author: Some(
                self.author
                    .clone()
                    .unwrap_or_else(|| blog.config.author.clone()),
            ),
            tags: Some(self.tags.clone()),
            category: Some(self.category.clone().unwrap_or_default()),
            published: Some(self.publish),
            cover_image: Some(self.cover_image.clone().unwrap_or_default()),
            extra: Default::default(),
        }
    }
}

/// Create a new post and return its slug
pub fn create_post(blog: &Blog, post: &NewPost) -> Result<String> {
    let body = match &post.body_file {
        Some(path) => fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?,
        None => String::new(),
    };

    let slug = blog.save_post(None, &post.front_matter(blog), &body)?;
    println!("Created: {:?}", blog.store().path_for(&slug)?);
    Ok(slug)
}
