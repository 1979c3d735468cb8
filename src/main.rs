use std::{process, sync::Arc};

use postline::{
    application::{
        error::AppError,
        posts::{CreatePostCommand, PostReader, PostStore},
        render::render_service,
        repos::{AuthorsRepo, CreateAuthorParams, PostsRepo},
        seed::{SeedOptions, SeedService},
    },
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, ApiState},
        telemetry,
    },
};
use rand::{SeedableRng, rngs::StdRng};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Migrate(_) => run_migrate(settings).await,
        config::Command::Seed(args) => run_seed(settings, args).await,
        config::Command::Authors(config::AuthorsCommand::Add(args)) => {
            run_add_author(settings, args).await
        }
        config::Command::Posts(config::PostsCommand::Create(args)) => {
            run_create_post(settings, args).await
        }
        config::Command::Posts(config::PostsCommand::Status(args)) => {
            run_set_status(settings, args).await
        }
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let reader = PostReader::new(repositories, render_service());
    let state = ApiState::new(Arc::new(reader), settings.server.public_url.as_deref());
    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "postline::serve",
        addr = %settings.server.addr,
        public_url = settings.server.public_url.as_deref().unwrap_or(""),
        "listening"
    );

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    info!(target = "postline::serve", "server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(
            target = "postline::serve",
            error = %err,
            "failed to listen for ctrl-c; shutting down"
        );
    }
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    let pool = connect_pool(&settings).await?;
    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    info!(target = "postline::migrate", "migrations applied");
    Ok(())
}

async fn run_seed(settings: config::Settings, args: config::SeedArgs) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let service = SeedService::new(
        repositories.clone(),
        repositories.clone(),
        repositories,
    );

    let mut rng = StdRng::from_entropy();
    let summary = service
        .run(
            SeedOptions {
                count: args.count,
                clear: args.clear,
            },
            &mut rng,
        )
        .await?;

    if args.clear {
        println!("Cleared {} existing posts", summary.cleared);
    }
    println!("Successfully created {} blog posts", summary.created);
    println!("Total posts in database: {}", summary.total);
    println!("Published posts: {}", summary.published);
    println!("Draft posts: {}", summary.drafts);
    println!("Authors available: {}", summary.authors);
    Ok(())
}

async fn run_add_author(
    settings: config::Settings,
    args: config::AddAuthorArgs,
) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let (author, created) = repositories
        .get_or_create(CreateAuthorParams {
            username: args.username,
            first_name: args.first_name,
            last_name: args.last_name,
        })
        .await?;

    if created {
        println!("Created author {} ({})", author.username, author.id);
    } else {
        println!("Author {} already exists ({})", author.username, author.id);
    }
    Ok(())
}

async fn run_create_post(
    settings: config::Settings,
    args: config::CreatePostArgs,
) -> Result<(), AppError> {
    let body_markdown = match (args.body, args.body_file) {
        (Some(body), _) => body,
        (None, Some(path)) => tokio::fs::read_to_string(&path)
            .await
            .map_err(|err| AppError::from(InfraError::from(err)))?,
        (None, None) => {
            return Err(AppError::validation(
                "either --body or --body-file is required",
            ));
        }
    };

    let repositories = init_repositories(&settings).await?;
    let author = repositories
        .find_by_username(&args.author)
        .await?
        .ok_or_else(|| AppError::not_found(format!("author `{}`", args.author)))?;

    let store = post_store(repositories);
    let post = store
        .create(CreatePostCommand {
            title: args.title,
            slug: args.slug,
            body_markdown,
            author_id: author.id,
            status: args.status,
        })
        .await?;

    println!("Created post {} [{}] ({})", post.slug, post.status, post.id);
    Ok(())
}

async fn run_set_status(
    settings: config::Settings,
    args: config::SetStatusArgs,
) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let post = PostsRepo::find_by_slug(repositories.as_ref(), &args.slug)
        .await?
        .ok_or_else(|| AppError::not_found(format!("post `{}`", args.slug)))?;

    let store = post_store(repositories);
    let saved = store.set_status(post.id, args.status).await?;

    println!("Post {} is now {}", saved.slug, saved.status);
    Ok(())
}

fn post_store(repositories: Arc<PostgresRepositories>) -> PostStore {
    PostStore::new(repositories.clone(), repositories.clone(), repositories)
}

async fn connect_pool(settings: &config::Settings) -> Result<sqlx::PgPool, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let pool = connect_pool(settings).await?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}
