//! Import markdown files and read standalone documents

use anyhow::{bail, Result};
use std::path::Path;

use crate::Blog;

/// Import every file matching the glob patterns as a new post
pub fn run(blog: &Blog, patterns: &[String]) -> Result<()> {
    let report = blog.import_glob(patterns)?;

    for slug in &report.imported {
        println!("Imported: {}", slug);
    }
    for (path, reason) in &report.failed {
        eprintln!("Skipped {:?}: {}", path, reason);
    }
    println!(
        "{} imported, {} skipped",
        report.imported.len(),
        report.failed.len()
    );

    if report.imported.is_empty() && !report.failed.is_empty() {
        bail!("Nothing was imported");
    }
    Ok(())
}

/// Render a standalone markdown document
pub fn read(blog: &Blog, path: &Path, json: bool) -> Result<()> {
    let doc = blog.read_document(path)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }
    println!("{}", doc.title);
    println!("{} ({} words)\n", doc.reading_time_label(), doc.word_count);
    println!("{}", doc.content);
    Ok(())
}
