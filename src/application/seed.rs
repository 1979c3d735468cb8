//! Sample-data generator for local development and API smoke testing.

use std::sync::Arc;

use rand::{Rng, seq::SliceRandom};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::info;

use crate::application::repos::{
    AuthorsRepo, CreateAuthorParams, CreatePostParams, PostsRepo, PostsWriteRepo, RepoError,
};
use crate::domain::entities::AuthorRecord;
use crate::domain::slug::{SlugAsyncError, SlugError, generate_unique_slug_async};
use crate::domain::types::PostStatus;

pub const DEFAULT_SEED_COUNT: u32 = 25;

const SEED_WINDOW_DAYS: i64 = 180;
const PUBLISHED_RATIO: f64 = 0.7;
const VARIATION_RATIO: f64 = 0.3;

const AUTHORS: [(&str, &str, &str); 5] = [
    ("john_blogger", "John", "Doe"),
    ("jane_writer", "Jane", "Smith"),
    ("mike_author", "Mike", "Johnson"),
    ("sarah_editor", "Sarah", "Wilson"),
    ("alex_creator", "Alex", "Brown"),
];

const TECH_TITLES: [&str; 10] = [
    "Getting Started with Django REST Framework",
    "Python Best Practices for Web Development",
    "Understanding Database Optimization",
    "Building Scalable APIs with Django",
    "JavaScript Modern Development Techniques",
    "Docker for Python Developers",
    "Testing Strategies for Web Applications",
    "React Component Design Patterns",
    "PostgreSQL Performance Tuning Guide",
    "CI/CD Pipeline Implementation",
];

const GENERAL_TITLES: [&str; 10] = [
    "The Future of Remote Work Technology",
    "Digital Transformation in Small Business",
    "Cybersecurity Best Practices for Teams",
    "Data Privacy in the Modern Web",
    "Open Source Software Benefits",
    "Cloud Computing Cost Optimization",
    "Mobile App Development Trends",
    "AI and Machine Learning Applications",
    "Blockchain Technology Explained",
    "Software Architecture Principles",
];

const TUTORIAL_TITLES: [&str; 10] = [
    "How to Build a REST API Tutorial",
    "Step-by-Step Django Project Setup",
    "Creating Interactive Web Forms",
    "Database Migration Best Practices",
    "Setting Up Development Environment",
    "Git Workflow for Team Projects",
    "Debugging Python Applications",
    "Code Review Process Implementation",
    "Automated Testing Setup Guide",
    "Performance Monitoring Setup",
];

const TAGLINES: [&str; 8] = [
    "Lessons From Production",
    "A Practical Field Guide",
    "What We Learned the Hard Way",
    "Beyond the Basics",
    "Notes From the Trenches",
    "A Pragmatic Approach",
    "Patterns That Scale",
    "Common Pitfalls Revisited",
];

const TOPICS: [&str; 10] = [
    "Incremental Data Pipelines",
    "Event-Driven Architecture",
    "Zero-Downtime Deployments",
    "Observability Tooling",
    "Schema Evolution",
    "Edge Caching Strategies",
    "Dependency Management",
    "Asynchronous Task Queues",
    "Access Control Models",
    "Continuous Delivery",
];

const TEMPLATES: [&str; 3] = [
    "In today's rapidly evolving tech landscape, understanding {topic} has become more crucial than ever.

This guide walks through the essential concepts and practical implementations every developer should know.

## Key Benefits

The main advantages of adopting {topic} include:
- Improved performance and efficiency
- Better code maintainability
- Enhanced user experience
- Scalable architecture design

## Implementation Steps

1. **Planning**: analyse the current setup and identify areas for improvement.
2. **Setup**: configure the development environment with the necessary tools.
3. **Implementation**: follow best practices while building the core functionality.
4. **Testing**: test thoroughly at each stage.
5. **Deployment**: ship using industry-standard practices.

## Conclusion

Mastering {topic} will improve your development workflow and help you build more robust applications.",
    "The world of web development keeps changing, and {topic} is one of the most significant advances in recent years.

## Core Concepts

### Architecture
The architecture focuses on modularity and reuse, making applications easier to maintain and scale.

### Performance
Performance comes from efficient algorithms and careful resource management.

### Security
Security is part of the core design, protecting against common vulnerabilities.

## Real-World Applications

- **Enterprise Applications**: large business systems benefit from the reliability.
- **Startup Projects**: quick prototyping and short development cycles.
- **Educational Platforms**: learning systems can use these features effectively.

## Tips

> Start small and iterate.

Teams that embrace {topic} early tend to ship with more confidence.",
    "Exploring {topic} opens up new possibilities for developers looking to build better applications.

## Why {topic} Matters

Staying ahead means adopting proven methods and tools that deliver results.

## Technical Overview

The system consists of several components:
- Core processing engine
- Data management layer
- API integration services

## Step-by-Step Process

**Phase 1: Planning**
- Define requirements
- Establish milestones

**Phase 2: Development**
- Set up the project structure
- Implement core functionality

**Phase 3: Quality Assurance**
- Unit and integration testing
- Security auditing

## Troubleshooting

- Configuration errors: check `ENVIRONMENT` variables
- Performance bottlenecks: profile before optimising

This approach to {topic} helps you build robust and maintainable applications.",
];

const ADDITIONAL_NOTES: &str = "\n\n## Additional Notes\n\nResults vary between teams; measure before and after every change and keep the notes next to the code.";

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error("cannot derive slug: {0}")]
    Slug(#[from] SlugError),
}

#[derive(Debug, Clone, Copy)]
pub struct SeedOptions {
    pub count: u32,
    pub clear: bool,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            count: DEFAULT_SEED_COUNT,
            clear: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub created: u32,
    pub cleared: u64,
    pub total: u64,
    pub published: u64,
    pub drafts: u64,
    pub authors: usize,
}

/// Populates the store with sample authors and posts.
///
/// Posts are written straight through the repository so their backdated
/// `created_at`/`published_at` values survive; going through the store would
/// re-stamp publication to the current time.
#[derive(Clone)]
pub struct SeedService {
    reader: Arc<dyn PostsRepo>,
    writer: Arc<dyn PostsWriteRepo>,
    authors: Arc<dyn AuthorsRepo>,
}

impl SeedService {
    pub fn new(
        reader: Arc<dyn PostsRepo>,
        writer: Arc<dyn PostsWriteRepo>,
        authors: Arc<dyn AuthorsRepo>,
    ) -> Self {
        Self {
            reader,
            writer,
            authors,
        }
    }

    pub async fn run<R>(&self, options: SeedOptions, rng: &mut R) -> Result<SeedSummary, SeedError>
    where
        R: Rng + Send,
    {
        let cleared = if options.clear {
            let removed = self.writer.delete_all_posts().await?;
            info!(target = "postline::seed", removed, "cleared existing posts");
            removed
        } else {
            0
        };

        let authors = self.ensure_authors().await?;
        let now = OffsetDateTime::now_utc();

        for index in 0..options.count {
            let draft = random_post(rng, now);
            let slug = self.free_slug(&draft.title).await?;
            let author = &authors[rng.gen_range(0..authors.len())];

            self.writer
                .create_post(CreatePostParams {
                    title: draft.title,
                    slug,
                    body_markdown: draft.body,
                    author_id: author.id,
                    status: draft.status,
                    created_at: draft.created_at,
                    published_at: draft.published_at,
                })
                .await?;

            let created = index + 1;
            if created % 5 == 0 {
                info!(target = "postline::seed", created, "seeding posts");
            }
        }

        let summary = SeedSummary {
            created: options.count,
            cleared,
            total: self.reader.count_by_status(None).await?,
            published: self
                .reader
                .count_by_status(Some(PostStatus::Published))
                .await?,
            drafts: self.reader.count_by_status(Some(PostStatus::Draft)).await?,
            authors: authors.len(),
        };

        Ok(summary)
    }

    async fn ensure_authors(&self) -> Result<Vec<AuthorRecord>, SeedError> {
        let mut records = Vec::with_capacity(AUTHORS.len());
        for (username, first_name, last_name) in AUTHORS {
            let (author, created) = self
                .authors
                .get_or_create(CreateAuthorParams {
                    username: username.to_string(),
                    first_name: first_name.to_string(),
                    last_name: last_name.to_string(),
                })
                .await?;
            if created {
                info!(target = "postline::seed", username, "created author");
            }
            records.push(author);
        }
        Ok(records)
    }

    async fn free_slug(&self, title: &str) -> Result<String, SeedError> {
        let reader = self.reader.clone();
        generate_unique_slug_async(title, move |candidate| {
            let reader = reader.clone();
            let candidate = candidate.to_string();
            async move {
                reader
                    .find_by_slug(&candidate)
                    .await
                    .map(|existing| existing.is_none())
            }
        })
        .await
        .map_err(|err| match err {
            SlugAsyncError::Slug(err) => SeedError::Slug(err),
            SlugAsyncError::Predicate(err) => SeedError::Repo(err),
        })
    }
}

struct DraftPost {
    title: String,
    body: String,
    status: PostStatus,
    created_at: OffsetDateTime,
    published_at: Option<OffsetDateTime>,
}

fn random_post<R: Rng>(rng: &mut R, now: OffsetDateTime) -> DraftPost {
    let titles: Vec<&str> = TECH_TITLES
        .iter()
        .chain(GENERAL_TITLES.iter())
        .chain(TUTORIAL_TITLES.iter())
        .copied()
        .collect();

    let base_title = titles.choose(rng).copied().unwrap_or(TECH_TITLES[0]);
    let title = if rng.gen_bool(VARIATION_RATIO) {
        let tagline = TAGLINES.choose(rng).copied().unwrap_or(TAGLINES[0]);
        format!("{base_title} - {tagline}")
    } else {
        base_title.to_string()
    };

    let topic = TOPICS.choose(rng).copied().unwrap_or(TOPICS[0]);
    let template = TEMPLATES.choose(rng).copied().unwrap_or(TEMPLATES[0]);
    let mut body = template.replace("{topic}", topic);
    if rng.gen_bool(VARIATION_RATIO) {
        body.push_str(ADDITIONAL_NOTES);
    }

    let status = if rng.gen_bool(PUBLISHED_RATIO) {
        PostStatus::Published
    } else {
        PostStatus::Draft
    };

    let window = Duration::days(SEED_WINDOW_DAYS).whole_seconds();
    let created_at = now - Duration::seconds(rng.gen_range(0..=window));
    let published_at = status.is_published().then(|| {
        let since_created = (now - created_at).whole_seconds();
        created_at + Duration::seconds(rng.gen_range(0..=since_created))
    });

    DraftPost {
        title,
        body,
        status,
        created_at,
        published_at,
    }
}
