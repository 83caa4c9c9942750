use anyhow::Result;
use chrono::Utc;
use itertools::Itertools;
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::model::{Assignment, Id, ImageEntry, NewImageEntry, SortKey};
use crate::store::traits::ImageStore;

/// In-process store backed by a locked map. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<Id, ImageEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait::async_trait]
impl ImageStore for MemoryStore {
    async fn migrate(&self) -> Result<()> {
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ImageEntry>> {
        Ok(self.entries.read().get(id).cloned())
    }

    async fn find_all_ordered(&self, sort: SortKey, name: Option<&str>) -> Result<Vec<ImageEntry>> {
        let entries = self.entries.read();

        Ok(entries
            .values()
            .filter(|entry| name.map_or(true, |name| entry.name == name))
            .sorted_by(|a, b| sort.compare(b, a))
            .cloned()
            .collect())
    }

    async fn find_or_create_with_assign(
        &self,
        defaults: NewImageEntry,
        assignment: Assignment,
    ) -> Result<()> {
        // Held across lookup and write so same-id upserts cannot interleave
        let mut entries = self.entries.write();
        let now = Utc::now();

        match entries.get_mut(&defaults.id) {
            Some(existing) => {
                assignment.apply(existing);
                existing.updated_at = now;
            }
            None => {
                entries.insert(defaults.id.clone(), defaults.into_entry(now));
            }
        }

        Ok(())
    }

    async fn delete_by_id(&self, id: &str) -> Result<()> {
        self.entries.write().remove(id);
        Ok(())
    }
}
