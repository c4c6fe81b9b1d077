//! Initialize a new blog directory

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::content::FrontMatter;
use crate::{Blog, CONFIG_FILE};

const DEFAULT_CONFIG: &str = r#"# Inkwell Configuration

# Site
title: Inkwell
description: ''
author: ''
# IANA timezone for defaulted dates, e.g. Europe/Berlin (empty = local time)
timezone:

# Directory
posts_dir: posts

# Listing
per_page: 6
related_limit: 3
featured_limit: 3
# Shown for posts without a category; '' disables it
default_category: General

# Code highlighting
highlight:
  enable: true
  theme: base16-ocean.dark
  line_number: false

# Markdown import
import:
  max_file_size: 5242880
"#;

const WELCOME_BODY: &str = r#"Welcome to Inkwell! This is your very first post.

## Quick Start

### Create a new post

```bash
$ inkwell new "My New Post" --tag notes --publish
```

### Find things

```bash
$ inkwell list
$ inkwell tag notes
$ inkwell search "quick start"
```

### Bring existing markdown

```bash
$ inkwell import "drafts/*.md"
```
"#;

/// Initialize a blog in the given directory.
///
/// Writes a default `_config.yml` and a welcome post unless they already
/// exist; running it twice is harmless.
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;

    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        tracing::info!("Keeping existing {:?}", config_path);
    } else {
        fs::write(&config_path, DEFAULT_CONFIG)?;
    }

    let blog = Blog::new(target_dir)?;
    blog.ensure_ready()?;

    if blog.store().slugs()?.is_empty() {
        let front_matter = FrontMatter {
            title: Some("Hello World".to_string()),
            description: Some("Your first Inkwell post".to_string()),
            author: Some("Inkwell".to_string()),
            tags: Some(vec!["welcome".to_string()]),
            category: Some("General".to_string()),
            published: Some(true),
            ..Default::default()
        };
        blog.save_post(None, &front_matter, WELCOME_BODY)?;
    }

    Ok(())
}
