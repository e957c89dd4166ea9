use crate::{creation_time, record::PostRecord};
use async_trait::async_trait;
use blogapp_common::model::{
    ModelValidationError,
    post::{BlogPost, NewBlogPost, PostContent, PostId},
};
use blogapp_common::object_id::{ObjectIdGenerator, ObjectIdTimestampError};
use sqlx::{
    PgPool, Postgres, QueryBuilder, migrate::MigrateError, postgres::PgPoolOptions, query,
    query_as, query_scalar, types::Json,
};
use thiserror::Error;
use tracing::{debug, info};

pub type Result<T, E = DbError> = std::result::Result<T, E>;

/// The most bind parameters the database accepts in one statement.
const BIND_LIMIT: usize = 65_535;
const POST_COLUMNS: usize = 7;
const INSERT_CHUNK_ROWS: usize = BIND_LIMIT / POST_COLUMNS;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("An object in the database was invalid: {0}")]
    Data(#[from] ModelValidationError),
    #[error("Could not generate a post id: {0}")]
    IdGeneration(#[from] ObjectIdTimestampError),
    #[error("Applying migrations failed: {0}")]
    Migrate(#[from] MigrateError),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Storage for blog posts. Every operation touches a single query or document.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Inserts all `posts` at once. Meant for seeding.
    async fn insert_many(&self, posts: &[NewBlogPost]) -> Result<Vec<BlogPost>>;

    /// Inserts one post, assigning its id and creation time.
    async fn insert(&self, post: &NewBlogPost) -> Result<BlogPost>;

    /// All posts, oldest first.
    async fn find_all(&self) -> Result<Vec<BlogPost>>;

    async fn find_by_id(&self, id: PostId) -> Result<Option<BlogPost>>;

    /// Replaces title, author and content. `None` if there is no such post.
    async fn update_by_id(&self, id: PostId, content: &PostContent) -> Result<Option<BlogPost>>;

    /// Returns whether a post was removed.
    async fn delete_by_id(&self, id: PostId) -> Result<bool>;

    async fn count(&self) -> Result<u64>;

    /// Removes every post.
    async fn clear(&self) -> Result<()>;
}

/// Assigns id and creation time to a post about to be inserted.
pub(crate) fn stamp_post(generator: &ObjectIdGenerator, post: &NewBlogPost) -> Result<BlogPost> {
    let created = creation_time();
    let id = generator.generate_at(created)?.into();

    Ok(BlogPost::new(id, created, post.clone()))
}

#[derive(Debug)]
pub struct DbClient {
    pool: PgPool,
    id_generator: ObjectIdGenerator,
}

impl DbClient {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            id_generator: ObjectIdGenerator::random(),
        }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        info!(max_connections, "Connected to database");
        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;

        info!("Database migrations applied");
        Ok(())
    }
}

#[async_trait]
impl PostStore for DbClient {
    async fn insert_many(&self, posts: &[NewBlogPost]) -> Result<Vec<BlogPost>> {
        let posts = posts
            .iter()
            .map(|post| stamp_post(&self.id_generator, post))
            .collect::<Result<Vec<_>>>()?;

        if posts.is_empty() {
            return Ok(posts);
        }

        let mut transaction = self.pool.begin().await?;
        for chunk in posts.chunks(INSERT_CHUNK_ROWS) {
            let mut builder = QueryBuilder::<Postgres>::new(
                "
                INSERT INTO blog.posts
                (post_id, title, author_first_name, author_last_name, content, created, comments)
                ",
            );
            builder.push_values(chunk, |mut row, post| {
                row.push_bind(post.id.to_string())
                    .push_bind(post.title.clone())
                    .push_bind(post.author.first_name.clone())
                    .push_bind(post.author.last_name.clone())
                    .push_bind(post.content.clone())
                    .push_bind(post.created)
                    .push_bind(Json(post.comments.clone()));
            });
            builder.build().execute(&mut *transaction).await?;
        }
        transaction.commit().await?;

        debug!(count = posts.len(), "Inserted posts");
        Ok(posts)
    }

    async fn insert(&self, post: &NewBlogPost) -> Result<BlogPost> {
        let post = stamp_post(&self.id_generator, post)?;

        let record = query_as::<_, PostRecord>(
            "
            INSERT INTO blog.posts
                (post_id, title, author_first_name, author_last_name, content, created, comments)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING
                post_id, title, author_first_name, author_last_name, content, created, comments
            ",
        )
        .bind(post.id.to_string())
        .bind(&post.title)
        .bind(&post.author.first_name)
        .bind(&post.author.last_name)
        .bind(&post.content)
        .bind(post.created)
        .bind(Json(&post.comments))
        .fetch_one(&self.pool)
        .await?;

        let post = BlogPost::try_from(record)?;
        debug!(id = %post.id, "Inserted post");
        Ok(post)
    }

    async fn find_all(&self) -> Result<Vec<BlogPost>> {
        let records = query_as::<_, PostRecord>(
            "
            SELECT
                post_id, title, author_first_name, author_last_name, content, created, comments
            FROM
                blog.posts
            ORDER BY
                created, post_id
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        let posts = records
            .into_iter()
            .map(BlogPost::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(posts)
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<BlogPost>> {
        let record = query_as::<_, PostRecord>(
            "
            SELECT
                post_id, title, author_first_name, author_last_name, content, created, comments
            FROM
                blog.posts
            WHERE
                post_id = $1
            ",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        let post = record.map(BlogPost::try_from).transpose()?;
        Ok(post)
    }

    async fn update_by_id(&self, id: PostId, content: &PostContent) -> Result<Option<BlogPost>> {
        let record = query_as::<_, PostRecord>(
            "
            UPDATE blog.posts
            SET
                title = $2,
                author_first_name = $3,
                author_last_name = $4,
                content = $5
            WHERE
                post_id = $1
            RETURNING
                post_id, title, author_first_name, author_last_name, content, created, comments
            ",
        )
        .bind(id.to_string())
        .bind(&content.title)
        .bind(&content.author.first_name)
        .bind(&content.author.last_name)
        .bind(&content.content)
        .fetch_optional(&self.pool)
        .await?;

        let post = record.map(BlogPost::try_from).transpose()?;
        debug!(%id, found = post.is_some(), "Updated post");
        Ok(post)
    }

    async fn delete_by_id(&self, id: PostId) -> Result<bool> {
        let result = query("DELETE FROM blog.posts WHERE post_id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        debug!(%id, deleted, "Deleted post");
        Ok(deleted)
    }

    async fn count(&self) -> Result<u64> {
        let count = query_scalar::<_, i64>("SELECT COUNT(*) FROM blog.posts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.cast_unsigned())
    }

    async fn clear(&self) -> Result<()> {
        let result = query("DELETE FROM blog.posts").execute(&self.pool).await?;

        debug!(count = result.rows_affected(), "Cleared posts");
        Ok(())
    }
}
