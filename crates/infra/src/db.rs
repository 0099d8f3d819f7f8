use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bson::{oid::ObjectId, Document};
use tokio::time::Instant;

use crate::error::{StoreError, StoreResult};
use crate::indexes::IndexSpec;
use crate::store::{DocumentStore, Filter, Pipeline, Update, UpdateOutcome};

/// Point in time after which store calls made on behalf of a request are
/// abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline(pub Instant);

impl Deadline {
    pub fn after(timeout: Duration) -> Self {
        Deadline(Instant::now() + timeout)
    }
}

/// Shared handle to the document store.
///
/// Cloning is cheap. A handle obtained through [`Db::scoped`] bounds every
/// call by the request deadline.
#[derive(Clone)]
pub struct Db {
    store: Arc<dyn DocumentStore>,
    deadline: Option<Deadline>,
}

impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db")
            .field("backend", &self.store.backend_name())
            .field("deadline", &self.deadline)
            .finish()
    }
}

impl Db {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            deadline: None,
        }
    }

    pub fn scoped(&self, deadline: Deadline) -> Self {
        Self {
            store: Arc::clone(&self.store),
            deadline: Some(deadline),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    async fn bounded<T>(&self, call: impl Future<Output = StoreResult<T>>) -> StoreResult<T> {
        match self.deadline {
            Some(Deadline(at)) => tokio::time::timeout_at(at, call)
                .await
                .map_err(|_| StoreError::Timeout)?,
            None => call.await,
        }
    }

    pub async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        self.bounded(self.store.find_one(collection, filter)).await
    }

    pub async fn find_by_id(&self, collection: &str, id: ObjectId) -> StoreResult<Option<Document>> {
        self.find_one(collection, &Filter::by_id(id)).await
    }

    pub async fn insert_one(&self, collection: &str, document: Document) -> StoreResult<ObjectId> {
        self.bounded(self.store.insert_one(collection, document)).await
    }

    pub async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
    ) -> StoreResult<UpdateOutcome> {
        self.bounded(self.store.update_one(collection, filter, update))
            .await
    }

    pub async fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        self.bounded(self.store.delete_one(collection, filter)).await
    }

    pub async fn aggregate(&self, collection: &str, pipeline: &Pipeline) -> StoreResult<Vec<Document>> {
        self.bounded(self.store.aggregate(collection, pipeline)).await
    }

    pub async fn ensure_indexes(&self, indexes: &[IndexSpec]) -> StoreResult<()> {
        self.bounded(self.store.ensure_indexes(indexes)).await
    }

    pub async fn ping(&self) -> StoreResult<()> {
        self.bounded(self.store.ping()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use async_trait::async_trait;

    struct SlowStore;

    #[async_trait]
    impl DocumentStore for SlowStore {
        async fn find_one(&self, _: &str, _: &Filter) -> StoreResult<Option<Document>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(None)
        }
        async fn insert_one(&self, _: &str, _: Document) -> StoreResult<ObjectId> {
            Ok(ObjectId::new())
        }
        async fn update_one(&self, _: &str, _: &Filter, _: &Update) -> StoreResult<UpdateOutcome> {
            Ok(UpdateOutcome::default())
        }
        async fn delete_one(&self, _: &str, _: &Filter) -> StoreResult<u64> {
            Ok(0)
        }
        async fn aggregate(&self, _: &str, _: &Pipeline) -> StoreResult<Vec<Document>> {
            Ok(Vec::new())
        }
        async fn ensure_indexes(&self, _: &[IndexSpec]) -> StoreResult<()> {
            Ok(())
        }
        async fn ping(&self) -> StoreResult<()> {
            Ok(())
        }
        fn backend_name(&self) -> &'static str {
            "slow"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn expired_deadline_surfaces_as_timeout() {
        let db = Db::new(Arc::new(SlowStore)).scoped(Deadline::after(Duration::from_millis(50)));

        let result = db.find_by_id("talhoes", ObjectId::new()).await;

        assert!(matches!(result, Err(StoreError::Timeout)));
    }

    #[tokio::test]
    async fn unscoped_handle_waits_for_the_store() {
        let db = Db::new(Arc::new(MemoryStore::new()));
        assert!(db.find_by_id("talhoes", ObjectId::new()).await.unwrap().is_none());
        assert_eq!(db.backend_name(), "memory");
    }
}
