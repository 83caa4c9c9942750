use crate::error::{RegistryError, RegistryResult};
use crate::model::{ImageEntry, SortKey};
use crate::store::traits::ImageStore;

/// A validated listing request: exact `name` filter plus a resolved sort key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPlan {
    pub name: Option<String>,
    pub sort: SortKey,
}

impl ListPlan {
    /// Build a plan from raw query values. An empty name means no filter and
    /// an unknown sort key falls back to `updated_at`.
    pub fn resolve(name: Option<&str>, sort: Option<&str>) -> Self {
        Self {
            name: name.filter(|name| !name.is_empty()).map(str::to_string),
            sort: SortKey::resolve(sort),
        }
    }
}

/// Read path over an injected store handle
pub struct QueryResolver<'a, S: ImageStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: ImageStore + ?Sized> QueryResolver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub async fn get_by_id(&self, id: &str) -> RegistryResult<ImageEntry> {
        self.store
            .find_by_id(id)
            .await
            .map_err(RegistryError::Store)?
            .ok_or_else(|| RegistryError::not_found(id))
    }

    pub async fn list(&self, plan: &ListPlan) -> RegistryResult<Vec<ImageEntry>> {
        log::debug!(
            "Listing images (name={:?}, sort={} desc)",
            plan.name,
            plan.sort.column()
        );

        self.store
            .find_all_ordered(plan.sort, plan.name.as_deref())
            .await
            .map_err(RegistryError::Store)
    }
}
