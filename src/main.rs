//! CLI entry point for inkwell

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inkwell::commands;
use inkwell::commands::new::NewPost;
use inkwell::Blog;

#[derive(Parser)]
#[command(name = "inkwell")]
#[command(version)]
#[command(about = "A flat-file markdown blog store", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new blog
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post (a draft unless --publish)
    New {
        /// Title of the new post
        title: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        author: Option<String>,

        /// Tag, may be repeated
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        #[arg(long)]
        category: Option<String>,

        /// Publish immediately
        #[arg(long)]
        publish: bool,

        /// Cover image URL
        #[arg(long)]
        cover: Option<String>,

        /// Markdown file with the post body
        #[arg(long)]
        body_file: Option<PathBuf>,
    },

    /// Replace a post with the content of a markdown file
    Edit {
        slug: String,
        file: PathBuf,
    },

    /// Show a rendered post
    Show {
        slug: String,
        #[arg(long)]
        json: bool,
    },

    /// Print a post's stored file
    Raw { slug: String },

    /// Delete a post
    Delete { slug: String },

    /// Rename a post
    Rename { old: String, new: String },

    /// List posts, all posts for management, tags or categories
    #[command(alias = "ls")]
    List {
        /// Type of content to list (post, manage, tag, category)
        #[arg(default_value = "post")]
        r#type: String,

        /// Page number for post listings
        #[arg(short, long)]
        page: Option<usize>,

        #[arg(long)]
        json: bool,
    },

    /// Posts with a tag
    Tag {
        tag: String,
        #[arg(long)]
        json: bool,
    },

    /// Posts in a category
    Category {
        category: String,
        #[arg(long)]
        json: bool,
    },

    /// Search titles, descriptions, content and tags
    Search {
        query: String,
        #[arg(long)]
        json: bool,
    },

    /// Posts related to a post
    Related {
        slug: String,
        #[arg(short, long)]
        limit: Option<usize>,
        #[arg(long)]
        json: bool,
    },

    /// The newest posts
    Featured {
        #[arg(short, long)]
        limit: Option<usize>,
        #[arg(long)]
        json: bool,
    },

    /// Import markdown files as new posts
    Import {
        /// Files or glob patterns
        #[arg(required = true)]
        patterns: Vec<String>,
    },

    /// Render a standalone markdown document
    Read {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },

    /// Keep the post index up to date while files change
    Watch,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "inkwell=debug,info"
    } else {
        "inkwell=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing blog in {:?}", target_dir);
            commands::init::init_site(&target_dir)?;
            println!("Initialized blog in {:?}", target_dir);
        }

        Commands::New {
            title,
            description,
            author,
            tags,
            category,
            publish,
            cover,
            body_file,
        } => {
            let blog = Blog::new(&base_dir)?;
            let post = NewPost {
                title,
                description,
                author,
                tags,
                category,
                publish,
                cover_image: cover,
                body_file,
            };
            commands::new::create_post(&blog, &post)?;
        }

        Commands::Edit { slug, file } => {
            let blog = Blog::new(&base_dir)?;
            commands::edit::edit_post(&blog, &slug, &file)?;
        }

        Commands::Show { slug, json } => {
            let blog = Blog::new(&base_dir)?;
            commands::show::show(&blog, &slug, json)?;
        }

        Commands::Raw { slug } => {
            let blog = Blog::new(&base_dir)?;
            commands::show::raw(&blog, &slug)?;
        }

        Commands::Delete { slug } => {
            let blog = Blog::new(&base_dir)?;
            commands::manage::delete(&blog, &slug)?;
        }

        Commands::Rename { old, new } => {
            let blog = Blog::new(&base_dir)?;
            commands::manage::rename(&blog, &old, &new)?;
        }

        Commands::List { r#type, page, json } => {
            let blog = Blog::new(&base_dir)?;
            commands::list::run(&blog, &r#type, page, json)?;
        }

        Commands::Tag { tag, json } => {
            let blog = Blog::new(&base_dir)?;
            commands::find::by_tag(&blog, &tag, json)?;
        }

        Commands::Category { category, json } => {
            let blog = Blog::new(&base_dir)?;
            commands::find::by_category(&blog, &category, json)?;
        }

        Commands::Search { query, json } => {
            let blog = Blog::new(&base_dir)?;
            commands::find::search(&blog, &query, json)?;
        }

        Commands::Related { slug, limit, json } => {
            let blog = Blog::new(&base_dir)?;
            commands::show::related(&blog, &slug, limit, json)?;
        }

        Commands::Featured { limit, json } => {
            let blog = Blog::new(&base_dir)?;
            commands::find::featured(&blog, limit, json)?;
        }

        Commands::Import { patterns } => {
            let blog = Blog::new(&base_dir)?;
            commands::import::run(&blog, &patterns)?;
        }

        Commands::Read { file, json } => {
            let blog = Blog::new(&base_dir)?;
            commands::import::read(&blog, &file, json)?;
        }

        Commands::Watch => {
            let blog = Blog::new(&base_dir)?;
            commands::watch::run(&blog).await?;
        }

        Commands::Version => {
            println!("inkwell version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
