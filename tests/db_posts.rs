//! Postgres-backed repository and store tests against a migrated database.

use std::collections::HashSet;
use std::sync::Arc;

use rand::{SeedableRng, rngs::StdRng};
use sqlx::PgPool;
use time::Duration;
use time::macros::datetime;

use postline::application::pagination::PageNumber;
use postline::application::posts::{
    CreatePostCommand, PostReadError, PostReader, PostStore, PostStoreError, PublishedPostQuery,
    parse_ordering,
};
use postline::application::render::render_service;
use postline::application::repos::{
    AuthorsRepo, CreateAuthorParams, CreatePostParams, PostsRepo, PostsWriteRepo,
    PublishedPostFilter, RepoError,
};
use postline::application::seed::{SeedOptions, SeedService};
use postline::domain::entities::AuthorRecord;
use postline::domain::types::PostStatus;
use postline::infra::db::PostgresRepositories;

async fn author(
    repos: &PostgresRepositories,
    username: &str,
    first: &str,
    last: &str,
) -> AuthorRecord {
    let (author, created) = repos
        .get_or_create(CreateAuthorParams {
            username: username.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
        })
        .await
        .expect("create author");
    assert!(created);
    author
}

fn post_params(
    author: &AuthorRecord,
    slug: &str,
    days_ago: i64,
    status: PostStatus,
) -> CreatePostParams {
    let at = datetime!(2025-06-01 12:00 UTC) - Duration::days(days_ago);
    CreatePostParams {
        title: format!("Title {slug}"),
        slug: slug.to_string(),
        body_markdown: format!("Body of {slug}"),
        author_id: author.id,
        status,
        created_at: at,
        published_at: status.is_published().then_some(at),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn post_indexes_exist(pool: PgPool) {
    let rows: Vec<String> = sqlx::query_scalar(
        "SELECT indexname FROM pg_indexes WHERE schemaname = 'public' AND tablename = 'posts'",
    )
    .fetch_all(&pool)
    .await
    .expect("fetch post indexes");

    let indexes: HashSet<String> = rows.into_iter().collect();

    assert!(indexes.contains("posts_slug_key"), "missing posts_slug_key");
    assert!(
        indexes.contains("posts_status_published_at_idx"),
        "missing posts_status_published_at_idx"
    );
    assert!(
        indexes.contains("posts_created_at_idx"),
        "missing posts_created_at_idx"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_slug_is_reported(pool: PgPool) {
    let repos = PostgresRepositories::new(pool);
    let ada = author(&repos, "ada", "Ada", "Lovelace").await;

    repos
        .create_post(post_params(&ada, "same", 0, PostStatus::Draft))
        .await
        .expect("first insert");
    let err = repos
        .create_post(post_params(&ada, "same", 1, PostStatus::Draft))
        .await
        .expect_err("second insert must fail");

    assert!(matches!(err, RepoError::Duplicate { .. }), "{err:?}");
}

#[sqlx::test(migrations = "./migrations")]
async fn published_listing_filters_and_orders(pool: PgPool) {
    let repos = PostgresRepositories::new(pool);
    let ada = author(&repos, "ada", "Ada", "Lovelace").await;
    let grace = author(&repos, "grace", "Grace", "Hopper").await;

    for (slug, days, who) in [("a", 0, &ada), ("b", 1, &grace), ("c", 2, &ada)] {
        repos
            .create_post(post_params(who, slug, days, PostStatus::Published))
            .await
            .expect("insert");
    }
    repos
        .create_post(post_params(&ada, "hidden", 0, PostStatus::Draft))
        .await
        .expect("insert draft");

    let all = PublishedPostFilter::default();
    assert_eq!(repos.count_published(&all).await.unwrap(), 3);
    assert_eq!(repos.count_by_status(None).await.unwrap(), 4);
    assert_eq!(
        repos
            .count_by_status(Some(PostStatus::Draft))
            .await
            .unwrap(),
        1
    );

    let window = PageNumber::FIRST.window(20);
    let newest_first = repos
        .list_published(&all, &parse_ordering(None), window)
        .await
        .unwrap();
    let slugs: Vec<_> = newest_first.iter().map(|post| post.slug.as_str()).collect();
    assert_eq!(slugs, vec!["a", "b", "c"]);

    let oldest_first = repos
        .list_published(&all, &parse_ordering(Some("created_at")), window)
        .await
        .unwrap();
    let slugs: Vec<_> = oldest_first.iter().map(|post| post.slug.as_str()).collect();
    assert_eq!(slugs, vec!["c", "b", "a"]);

    let query = PublishedPostQuery::parse(Some("HOPPER"), None, None, None, None).unwrap();
    let found = repos
        .list_published(&query.filter, &query.ordering, window)
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].slug, "b");

    let detail = repos
        .find_published_by_slug("b")
        .await
        .unwrap()
        .expect("published post");
    assert_eq!(detail.author.username, "grace");
    assert!(repos.find_published_by_slug("hidden").await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn search_treats_wildcards_literally(pool: PgPool) {
    let repos = PostgresRepositories::new(pool);
    let ada = author(&repos, "ada", "Ada", "Lovelace").await;
    repos
        .create_post(post_params(&ada, "plain", 0, PostStatus::Published))
        .await
        .unwrap();

    let filter = PublishedPostFilter {
        search: Some("%".to_string()),
        ..PublishedPostFilter::default()
    };
    assert_eq!(repos.count_published(&filter).await.unwrap(), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn get_or_create_author_is_idempotent(pool: PgPool) {
    let repos = PostgresRepositories::new(pool);
    let first = author(&repos, "ada", "Ada", "Lovelace").await;

    let (again, created) = repos
        .get_or_create(CreateAuthorParams {
            username: "ada".to_string(),
            first_name: "Someone".to_string(),
            last_name: "Else".to_string(),
        })
        .await
        .unwrap();

    assert!(!created);
    assert_eq!(again.id, first.id);
    assert_eq!(again.first_name, "Ada");
}

#[sqlx::test(migrations = "./migrations")]
async fn seeding_creates_requested_posts(pool: PgPool) {
    let repos = Arc::new(PostgresRepositories::new(pool));
    let service = SeedService::new(repos.clone(), repos.clone(), repos.clone());
    let mut rng = StdRng::seed_from_u64(11);

    let summary = service
        .run(
            SeedOptions {
                count: 12,
                clear: true,
            },
            &mut rng,
        )
        .await
        .expect("seed");

    assert_eq!(summary.created, 12);
    assert_eq!(summary.total, 12);
    assert_eq!(summary.published + summary.drafts, 12);
    assert_eq!(summary.authors, 5);
    assert_eq!(repos.count_by_status(None).await.unwrap(), 12);
}

#[sqlx::test(migrations = "./migrations")]
async fn store_lifecycle_round_trips_through_postgres(pool: PgPool) {
    let repos = Arc::new(PostgresRepositories::new(pool));
    let ada = author(&repos, "ada", "Ada", "Lovelace").await;
    let store = PostStore::new(repos.clone(), repos.clone(), repos.clone());
    let reader = PostReader::new(repos.clone(), render_service());

    let draft = store
        .create(CreatePostCommand {
            title: "Draft one".to_string(),
            slug: Some("draft-one".to_string()),
            body_markdown: "# Draft".to_string(),
            author_id: ada.id,
            status: PostStatus::Draft,
        })
        .await
        .expect("create draft");
    assert!(draft.published_at.is_none());
    assert!(matches!(
        reader.get_published("draft-one").await,
        Err(PostReadError::NotFound)
    ));

    let duplicate = store
        .create(CreatePostCommand {
            title: "Another".to_string(),
            slug: Some("draft-one".to_string()),
            body_markdown: "body".to_string(),
            author_id: ada.id,
            status: PostStatus::Draft,
        })
        .await
        .expect_err("duplicate slug");
    assert!(
        matches!(&duplicate, PostStoreError::DuplicateSlug(slug) if slug == "draft-one"),
        "{duplicate:?}"
    );

    let published = store
        .set_status(draft.id, PostStatus::Published)
        .await
        .expect("publish");
    let first_stamp = published.published_at.expect("stamped");

    let resaved = store.save(published).await.expect("save again");
    assert!(resaved.published_at.expect("still stamped") >= first_stamp);

    let detail = reader.get_published("draft-one").await.expect("detail");
    assert_eq!(detail.author, "Ada Lovelace");
    assert!(detail.body.contains("<h1>Draft</h1>"), "{}", detail.body);
}

#[sqlx::test(migrations = "./migrations")]
async fn pages_are_disjoint_and_past_the_end_is_empty(pool: PgPool) {
    let repos = Arc::new(PostgresRepositories::new(pool));
    let ada = author(&repos, "ada", "Ada", "Lovelace").await;

    // Pairs of posts share a timestamp so only the id tie-break separates them.
    for index in 0..46 {
        repos
            .create_post(post_params(
                &ada,
                &format!("post-{index}"),
                index / 2,
                PostStatus::Published,
            ))
            .await
            .expect("insert");
    }

    let reader = PostReader::new(repos.clone(), render_service());
    let mut seen = HashSet::new();
    let mut sizes = Vec::new();
    for page in ["1", "2", "3"] {
        let query = PublishedPostQuery::parse(None, None, None, None, Some(page)).unwrap();
        let listed = reader.list_published(&query).await.expect("list");
        assert_eq!(listed.count, 46);
        sizes.push(listed.results.len());
        for post in listed.results {
            assert!(seen.insert(post.id), "post {} repeated", post.slug);
        }
    }
    assert_eq!(sizes, vec![20, 20, 6]);
    assert_eq!(seen.len(), 46);

    let query = PublishedPostQuery::parse(None, None, None, None, Some("999999")).unwrap();
    let beyond = reader.list_published(&query).await.expect("list");
    assert_eq!(beyond.count, 46);
    assert!(beyond.results.is_empty());
    assert_eq!(beyond.next_page(), None);
    assert_eq!(beyond.previous_page(), Some(3));
}

#[sqlx::test(migrations = "./migrations")]
async fn date_bounds_are_inclusive_in_sql(pool: PgPool) {
    let repos = PostgresRepositories::new(pool);
    let ada = author(&repos, "ada", "Ada", "Lovelace").await;
    for days in 0..5 {
        repos
            .create_post(post_params(
                &ada,
                &format!("day-{days}"),
                days,
                PostStatus::Published,
            ))
            .await
            .expect("insert");
    }

    let query = PublishedPostQuery::parse(
        None,
        Some("2025-05-29T12:00:00Z"),
        Some("2025-05-31T12:00:00Z"),
        None,
        None,
    )
    .unwrap();
    let listed = repos
        .list_published(&query.filter, &query.ordering, PageNumber::FIRST.window(20))
        .await
        .unwrap();
    let slugs: Vec<_> = listed.iter().map(|post| post.slug.as_str()).collect();
    assert_eq!(slugs, vec!["day-1", "day-2", "day-3"]);
}
