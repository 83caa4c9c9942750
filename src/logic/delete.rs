use crate::error::{RegistryError, RegistryResult};
use crate::store::traits::ImageStore;

pub struct DeleteResolver<'a, S: ImageStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: ImageStore + ?Sized> DeleteResolver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Deleting an id that does not exist succeeds
    pub async fn delete_by_id(&self, id: &str) -> RegistryResult<()> {
        self.store
            .delete_by_id(id)
            .await
            .map_err(RegistryError::Store)?;

        log::info!("Deleted image {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::test_support::{seed, FailingStore};
    use crate::logic::QueryResolver;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_delete_existing() {
        let store = MemoryStore::new();
        seed(&store, "123", "foo").await;

        DeleteResolver::new(&store).delete_by_id("123").await.unwrap();

        assert!(matches!(
            QueryResolver::new(&store).get_by_id("123").await,
            Err(RegistryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_is_noop() {
        let store = MemoryStore::new();
        seed(&store, "keep", "foo").await;

        DeleteResolver::new(&store).delete_by_id("missing").await.unwrap();
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_store_failure() {
        let result = DeleteResolver::new(&FailingStore).delete_by_id("123").await;
        assert!(matches!(result, Err(RegistryError::Store(_))));
    }
}
