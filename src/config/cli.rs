use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

use crate::application::seed::DEFAULT_SEED_COUNT;
use crate::domain::types::PostStatus;

/// Command-line arguments for the Postline binary.
#[derive(Debug, Parser)]
#[command(name = "postline", version, about = "Postline blog publishing API")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "POSTLINE_CONFIG_FILE",
        value_name = "PATH",
        value_hint = ValueHint::FilePath
    )]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the read-only HTTP API.
    Serve(Box<ServeArgs>),
    /// Apply pending database migrations and exit.
    Migrate(MigrateArgs),
    /// Populate the database with sample authors and posts.
    Seed(SeedArgs),
    /// Manage authors.
    #[command(subcommand)]
    Authors(AuthorsCommand),
    /// Create posts and move them through their lifecycle.
    #[command(subcommand)]
    Posts(PostsCommand),
}

#[derive(Debug, Args, Default, Clone)]
pub struct DatabaseOverride {
    /// Override the database connection URL.
    #[arg(long = "database-url", value_name = "URL")]
    pub database_url: Option<String>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Absolute origin used when building links, e.g. https://blog.example.
    #[arg(long = "public-url", value_name = "URL", value_hint = ValueHint::Url)]
    pub public_url: Option<String>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Override the database connection URL.
    #[arg(long = "database-url", value_name = "URL")]
    pub database_url: Option<String>,

    /// Override the database pool size.
    #[arg(long = "database-max-connections", value_name = "COUNT")]
    pub database_max_connections: Option<u32>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub database: DatabaseOverride,
}

#[derive(Debug, Args, Clone)]
pub struct SeedArgs {
    /// Number of posts to create.
    #[arg(long, default_value_t = DEFAULT_SEED_COUNT)]
    pub count: u32,

    /// Delete every existing post before seeding.
    #[arg(long)]
    pub clear: bool,

    #[command(flatten)]
    pub database: DatabaseOverride,
}

#[derive(Debug, Subcommand, Clone)]
pub enum AuthorsCommand {
    /// Register an author, or report the existing one with that username.
    Add(AddAuthorArgs),
}

#[derive(Debug, Args, Clone)]
pub struct AddAuthorArgs {
    #[arg(long)]
    pub username: String,

    #[arg(long = "first-name", default_value = "")]
    pub first_name: String,

    #[arg(long = "last-name", default_value = "")]
    pub last_name: String,

    #[command(flatten)]
    pub database: DatabaseOverride,
}

#[derive(Debug, Subcommand, Clone)]
pub enum PostsCommand {
    /// Create a post.
    Create(CreatePostArgs),
    /// Change the status of the post with the given slug.
    Status(SetStatusArgs),
}

#[derive(Debug, Args, Clone)]
#[command(group(
    ArgGroup::new("body_source")
        .required(true)
        .args(["body", "body_file"])
))]
pub struct CreatePostArgs {
    #[arg(long)]
    pub title: String,

    /// Username of the author.
    #[arg(long)]
    pub author: String,

    /// Explicit slug; derived from the title when omitted.
    #[arg(long)]
    pub slug: Option<String>,

    #[arg(long, default_value_t = PostStatus::Draft)]
    pub status: PostStatus,

    /// Markdown body given inline.
    #[arg(long)]
    pub body: Option<String>,

    /// Read the markdown body from a file.
    #[arg(long = "body-file", value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub body_file: Option<PathBuf>,

    #[command(flatten)]
    pub database: DatabaseOverride,
}

#[derive(Debug, Args, Clone)]
pub struct SetStatusArgs {
    pub slug: String,

    pub status: PostStatus,

    #[command(flatten)]
    pub database: DatabaseOverride,
}
