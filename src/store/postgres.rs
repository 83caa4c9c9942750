use anyhow::{Context, Result};
use chrono::Utc;
use log::LevelFilter;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions, PgRow, PgSslMode},
    ConnectOptions, PgPool, Row,
};
use std::str::FromStr;

use crate::config::DatabaseConfig;
use crate::model::{Assignment, ImageEntry, NewImageEntry, SortKey, UpdatableField};
use crate::store::traits::ImageStore;

// Tags are stored as varchar(100)[]; cast so they decode as Vec<String>
const IMAGE_COLUMNS: &str = "id, name, tags::text[] AS tags, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store from the database section of the config
    pub async fn new(config: &DatabaseConfig, url: Option<&str>) -> Result<Self> {
        let options = connect_options(config, url)?;
        let max_connections = config.max_connections.unwrap_or(20);

        log::info!(
            "Connecting to PostgreSQL at {}:{} (database {}, max {} connections)",
            options.get_host(),
            options.get_port(),
            options.get_database().unwrap_or("<default>"),
            max_connections
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Create a store from a connection URL with default pool settings
    pub async fn from_url(url: &str) -> Result<Self> {
        Self::new(&DatabaseConfig::default(), Some(url)).await
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Wait for in-flight queries and close every pooled connection
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Connection options from an explicit URL, or from the individual fields.
fn connect_options(config: &DatabaseConfig, url: Option<&str>) -> Result<PgConnectOptions> {
    let options = match url {
        Some(url) => PgConnectOptions::from_str(url).context("Invalid database URL")?,
        None => PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name)
            .ssl_mode(
                PgSslMode::from_str(&config.sslmode)
                    .with_context(|| format!("Invalid sslmode '{}'", config.sslmode))?,
            ),
    };

    Ok(if config.log_queries {
        options.log_statements(LevelFilter::Info)
    } else {
        options.disable_statement_logging()
    })
}

fn image_from_row(row: &PgRow) -> Result<ImageEntry> {
    Ok(ImageEntry {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        tags: row.try_get("tags")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Build the upsert statement. `$1..$4` are id, name, tags and the current
/// time; assigned values follow in `UpdatableField` order.
fn upsert_sql(assignment: &Assignment) -> String {
    let mut sets = vec!["updated_at = EXCLUDED.updated_at".to_string()];
    let mut param = 5;

    for (field, present) in [
        (UpdatableField::Name, assignment.name.is_some()),
        (UpdatableField::Tags, assignment.tags.is_some()),
    ] {
        if present {
            sets.push(format!("{} = ${}", field.column(), param));
            param += 1;
        }
    }

    format!(
        r#"
        INSERT INTO images (id, name, tags, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $4)
        ON CONFLICT (id) DO UPDATE SET {}
        "#,
        sets.join(", ")
    )
}

fn list_sql(sort: SortKey, filtered: bool) -> String {
    let filter = if filtered { " WHERE name = $1" } else { "" };
    format!(
        "SELECT {} FROM images{} ORDER BY {} DESC",
        IMAGE_COLUMNS,
        filter,
        sort.column()
    )
}

#[async_trait::async_trait]
impl ImageStore for PostgresStore {
    async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database health check failed")?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ImageEntry>> {
        let row = sqlx::query(&format!("SELECT {} FROM images WHERE id = $1", IMAGE_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch image")?;

        row.as_ref().map(image_from_row).transpose()
    }

    async fn find_all_ordered(&self, sort: SortKey, name: Option<&str>) -> Result<Vec<ImageEntry>> {
        let sql = list_sql(sort, name.is_some());
        let mut query = sqlx::query(&sql);
        if let Some(name) = name {
            query = query.bind(name);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .context("Failed to list images")?;

        rows.iter().map(image_from_row).collect()
    }

    async fn find_or_create_with_assign(
        &self,
        defaults: NewImageEntry,
        assignment: Assignment,
    ) -> Result<()> {
        let sql = upsert_sql(&assignment);
        let mut query = sqlx::query(&sql)
            .bind(defaults.id)
            .bind(defaults.name)
            .bind(defaults.tags)
            .bind(Utc::now());

        if let Some(name) = assignment.name {
            query = query.bind(name);
        }
        if let Some(tags) = assignment.tags {
            query = query.bind(tags);
        }

        query
            .execute(&self.pool)
            .await
            .context("Failed to upsert image")?;

        Ok(())
    }

    async fn delete_by_id(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM images WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete image")?;

        Ok(())
    }
}
