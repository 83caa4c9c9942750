use crate::error::{RegistryError, RegistryResult};
use crate::model::{ImageEntry, NewImageEntry, UpdatableFields};
use crate::store::traits::ImageStore;

/// Create-or-merge for a PUT. A new id is created from every candidate
/// field; an existing id only receives the fields named by the policy.
/// The returned entry is always read back from the store.
pub struct UpsertResolver<'a, S: ImageStore + ?Sized> {
    store: &'a S,
    policy: UpdatableFields,
}

impl<'a, S: ImageStore + ?Sized> UpsertResolver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self::with_policy(store, UpdatableFields::default())
    }

    pub fn with_policy(store: &'a S, policy: UpdatableFields) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> UpdatableFields {
        self.policy
    }

    pub async fn upsert(&self, candidate: NewImageEntry) -> RegistryResult<ImageEntry> {
        candidate.validate()?;

        let id = candidate.id.clone();
        let assignment = self.policy.assignment_for(&candidate);

        self.store
            .find_or_create_with_assign(candidate, assignment)
            .await
            .map_err(RegistryError::Store)?;

        let persisted = self
            .store
            .find_by_id(&id)
            .await
            .map_err(RegistryError::Store)?
            .ok_or_else(|| {
                RegistryError::Store(anyhow::anyhow!(
                    "Image {} was written but could not be read back",
                    id
                ))
            })?;

        log::info!(
            "Upserted image {} ({} tags, updated_at {})",
            persisted.id,
            persisted.tags.len(),
            persisted.updated_at.to_rfc3339()
        );

        Ok(persisted)
    }
}
