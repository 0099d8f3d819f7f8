use std::time::Duration;

use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures_util::TryStreamExt;
use mongodb::{options::ClientOptions, Client, Collection, Database, IndexModel};

use super::{DocumentStore, Filter, Pipeline, Update, UpdateOutcome};
use crate::error::{StoreError, StoreResult};
use crate::indexes::IndexSpec;

/// Connection settings for [`MongoStore`]. Pool limits and timeouts are
/// handed to the driver unchanged.
#[derive(Debug, Clone)]
pub struct MongoOptions {
    pub uri: String,
    pub database: String,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub max_idle_time: Duration,
    pub server_selection_timeout: Duration,
}

/// MongoDB backend.
#[derive(Clone, Debug)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    /// Builds a pooled client and verifies the server answers a ping.
    pub async fn connect(options: &MongoOptions) -> StoreResult<Self> {
        let mut client_options = ClientOptions::parse(&options.uri).await?;
        client_options.app_name = Some("pulverizacao-api".to_string());
        client_options.max_pool_size = Some(options.max_pool_size);
        client_options.min_pool_size = Some(options.min_pool_size);
        client_options.max_idle_time = Some(options.max_idle_time);
        client_options.server_selection_timeout = Some(options.server_selection_timeout);

        let client = Client::with_options(client_options)?;
        let db = client.database(&options.database);
        let store = Self { db };

        store.ping().await?;
        tracing::info!(
            database = %options.database,
            max_pool_size = options.max_pool_size,
            "Connected to MongoDB"
        );

        Ok(store)
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection::<Document>(name)
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        Ok(self
            .collection(collection)
            .find_one(filter.as_document().clone())
            .await?)
    }

    async fn insert_one(&self, collection: &str, document: Document) -> StoreResult<ObjectId> {
        let result = self.collection(collection).insert_one(document).await?;
        result.inserted_id.as_object_id().ok_or_else(|| {
            StoreError::operation_failed(format!(
                "inserted id in '{collection}' is not an ObjectId: {}",
                result.inserted_id
            ))
        })
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
    ) -> StoreResult<UpdateOutcome> {
        let result = self
            .collection(collection)
            .update_one(filter.as_document().clone(), update.to_document())
            .await?;

        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        let result = self
            .collection(collection)
            .delete_one(filter.as_document().clone())
            .await?;
        Ok(result.deleted_count)
    }

    async fn aggregate(
        &self,
        collection: &str,
        pipeline: &Pipeline,
    ) -> StoreResult<Vec<Document>> {
        let cursor = self
            .collection(collection)
            .aggregate(pipeline.to_documents())
            .await?;
        Ok(cursor.try_collect::<Vec<Document>>().await?)
    }

    async fn ensure_indexes(&self, indexes: &[IndexSpec]) -> StoreResult<()> {
        for index in indexes {
            let mut keys = Document::new();
            keys.insert(index.field, index.direction.as_i32());
            let model = IndexModel::builder().keys(keys).build();
            self.collection(index.collection).create_index(model).await?;
            tracing::debug!(
                collection = index.collection,
                field = index.field,
                "Index ensured"
            );
        }
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "mongodb"
    }
}
