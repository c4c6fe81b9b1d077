//! Content module - front-matter, markdown rendering, post models and import

mod frontmatter;
pub mod import;
pub mod loader;
mod markdown;
mod post;

pub use frontmatter::FrontMatter;
pub use markdown::MarkdownRenderer;
pub use post::{Document, Post, PostSummary};
