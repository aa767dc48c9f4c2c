//! # datinghub CLI
//!
//! Command-line interface and web server for the Dating Hub research site.

mod api;
mod commands;
mod context;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "datinghub")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "datinghub.yml", env = "DATINGHUB_CONFIG")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new site
    Init {
        /// Target directory (defaults to current directory)
        path: Option<PathBuf>,
    },

    /// Serve the blog and survey
    Serve {
        /// Server port (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Create a post
    New(commands::NewPostArgs),

    /// Change a post; slug and metadata are re-derived unless customized
    Edit(commands::EditPostArgs),

    /// Create posts from markdown files with frontmatter
    Import {
        /// Directory to scan (defaults to paths.content from config)
        dir: Option<PathBuf>,
    },

    /// List posts
    List {
        /// Include drafts
        #[arg(long)]
        all: bool,

        /// Only this category
        #[arg(long)]
        category: Option<String>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show a single post
    Show {
        /// Post slug
        slug: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = ShowFormat::Json)]
        format: ShowFormat,
    },

    /// Make a post visible on the site
    Publish {
        /// Post slug
        slug: String,
    },

    /// Move a post back to draft
    Unpublish {
        /// Post slug
        slug: String,
    },

    /// Format raw post text into content blocks
    Format {
        /// Input file (reads stdin when omitted)
        file: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = FormatOutput::Html)]
        output: FormatOutput,
    },

    /// Review survey submissions
    Submissions {
        #[command(subcommand)]
        command: SubmissionCommands,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum SubmissionCommands {
    /// List submissions, newest first
    List {
        /// Only submissions not yet processed
        #[arg(long)]
        pending: bool,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Record that recommendations were sent
    MarkProcessed {
        /// Submission id
        id: u64,

        /// Admin notes to store with the submission
        #[arg(long)]
        notes: Option<String>,

        /// Move the submission back to pending instead
        #[arg(long)]
        unprocessed: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print a value by dotted key (e.g. site.name, paths.data)
    Get { key: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Init { path } => commands::init_project(path.as_deref()),
        Commands::Serve { port } => commands::serve(&cli.config, port).await,
        Commands::New(args) => commands::new_post(&cli.config, args),
        Commands::Edit(args) => commands::edit_post(&cli.config, args),
        Commands::Import { dir } => commands::import_posts(&cli.config, dir.as_deref()),
        Commands::List {
            all,
            category,
            json,
        } => commands::list_posts(&cli.config, all, category.as_deref(), json),
        Commands::Show { slug, format } => commands::show_post(&cli.config, &slug, format),
        Commands::Publish { slug } => commands::set_published(&cli.config, &slug, true),
        Commands::Unpublish { slug } => commands::set_published(&cli.config, &slug, false),
        Commands::Format { file, output } => commands::format_file(file.as_deref(), output),
        Commands::Submissions { command } => match command {
            SubmissionCommands::List { pending, json } => {
                commands::list_submissions(&cli.config, pending, json)
            }
            SubmissionCommands::MarkProcessed {
                id,
                notes,
                unprocessed,
            } => commands::mark_processed(&cli.config, id, !unprocessed, notes.as_deref()),
        },
        Commands::Config { command } => match command {
            ConfigCommands::Get { key } => commands::get_value(&cli.config, &key),
        },
    }
}

#[derive(Copy, Clone, ValueEnum)]
pub enum ShowFormat {
    Json,
    Html,
    Blocks,
    Raw,
}

#[derive(Copy, Clone, ValueEnum)]
pub enum FormatOutput {
    Json,
    Html,
}
