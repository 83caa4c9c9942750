use crate::model::{Assignment, ImageEntry, NewImageEntry, SortKey};
use anyhow::Result;

/// Persistence boundary for image allowlist entries.
#[async_trait::async_trait]
pub trait ImageStore: Send + Sync {
    /// Ensure the schema exists
    async fn migrate(&self) -> Result<()>;

    /// Check that the backing store answers
    async fn health_check(&self) -> Result<()>;

    async fn find_by_id(&self, id: &str) -> Result<Option<ImageEntry>>;

    /// All entries, optionally restricted to an exact `name`, in descending
    /// order of `sort`.
    async fn find_all_ordered(&self, sort: SortKey, name: Option<&str>) -> Result<Vec<ImageEntry>>;

    /// Atomically create `defaults` if no entry has its id, otherwise write
    /// `assignment` onto the existing entry. Both paths stamp `updated_at`.
    async fn find_or_create_with_assign(
        &self,
        defaults: NewImageEntry,
        assignment: Assignment,
    ) -> Result<()>;

    /// Remove the entry if present. A missing id is not an error.
    async fn delete_by_id(&self, id: &str) -> Result<()>;
}
