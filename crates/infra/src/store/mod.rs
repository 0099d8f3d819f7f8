//! Document store gateway.
//!
//! Repositories talk to the store exclusively through [`DocumentStore`]. Two
//! backends implement it: [`mongo::MongoStore`] for production and
//! [`memory::MemoryStore`], an in-process interpreter of the same contract
//! used by the test suite and the `memory` development backend.

use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Bson, Document};

use crate::error::{StoreError, StoreResult};
use crate::indexes::IndexSpec;

pub mod memory;
pub mod mongo;
pub mod pipeline;

pub use memory::MemoryStore;
pub use mongo::{MongoOptions, MongoStore};
pub use pipeline::{Pipeline, SortDirection, Stage};

/// The contract every store backend must satisfy.
///
/// Implementations must be thread-safe; a single instance is shared by every
/// request handler.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns the first document of `collection` matching `filter`.
    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>>;

    /// Inserts `document` and returns its `_id`. A document without `_id`
    /// gets one assigned by the backend.
    async fn insert_one(&self, collection: &str, document: Document) -> StoreResult<ObjectId>;

    /// Applies `update` to the first document matching `filter` as a single
    /// document write.
    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
    ) -> StoreResult<UpdateOutcome>;

    /// Removes the first document matching `filter`; returns the number of
    /// documents removed (0 or 1).
    async fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<u64>;

    /// Runs `pipeline` against `collection` in one round trip.
    async fn aggregate(&self, collection: &str, pipeline: &Pipeline)
        -> StoreResult<Vec<Document>>;

    /// Creates the given single-field indexes if they do not exist yet.
    async fn ensure_indexes(&self, indexes: &[IndexSpec]) -> StoreResult<()>;

    /// Cheap round trip proving the backend is reachable.
    async fn ping(&self) -> StoreResult<()>;

    /// Name of the backend, for logs.
    fn backend_name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

/// Top-level equality filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter(Document);

impl Filter {
    pub fn by_id(id: ObjectId) -> Self {
        Self(doc! { "_id": id })
    }

    pub fn eq(field: &str, value: impl Into<Bson>) -> Self {
        Self::default().and_eq(field, value)
    }

    pub fn and_eq(mut self, field: &str, value: impl Into<Bson>) -> Self {
        self.0.insert(field, value.into());
        self
    }

    pub fn as_document(&self) -> &Document {
        &self.0
    }

    /// True when every key of the filter is present in `document` with an
    /// equal value.
    pub fn matches(&self, document: &Document) -> bool {
        self.0
            .iter()
            .all(|(key, expected)| document.get(key) == Some(expected))
    }
}

/// A sparse document update: `$set`, `$unset` and `$push` with `$each`.
///
/// Fields not mentioned are left untouched by the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    set: Document,
    unset: Vec<String>,
    push: Vec<(String, Vec<Bson>)>,
}

impl Update {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: &str, value: impl Into<Bson>) -> &mut Self {
        self.unset.retain(|f| f != field);
        self.set.insert(field, value.into());
        self
    }

    pub fn unset(&mut self, field: &str) -> &mut Self {
        self.set.remove(field);
        if !self.unset.iter().any(|f| f == field) {
            self.unset.push(field.to_string());
        }
        self
    }

    /// Appends `values` to the array at `field`, keeping their order.
    pub fn push_each(&mut self, field: &str, values: Vec<Bson>) -> &mut Self {
        if !values.is_empty() {
            self.push.push((field.to_string(), values));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.unset.is_empty() && self.push.is_empty()
    }

    pub fn set_fields(&self) -> &Document {
        &self.set
    }

    pub fn unset_fields(&self) -> &[String] {
        &self.unset
    }

    pub fn pushed(&self) -> &[(String, Vec<Bson>)] {
        &self.push
    }

    /// Renders the update in the store's operator syntax.
    pub fn to_document(&self) -> Document {
        let mut out = Document::new();
        if !self.set.is_empty() {
            out.insert("$set", self.set.clone());
        }
        if !self.unset.is_empty() {
            let unset: Document = self
                .unset
                .iter()
                .map(|f| (f.clone(), Bson::String(String::new())))
                .collect();
            out.insert("$unset", unset);
        }
        if !self.push.is_empty() {
            let push: Document = self
                .push
                .iter()
                .map(|(f, values)| (f.clone(), Bson::Document(doc! { "$each": values.clone() })))
                .collect();
            out.insert("$push", push);
        }
        out
    }

    /// Applies the update to an in-memory document.
    pub fn apply(&self, document: &mut Document) -> StoreResult<()> {
        for (key, value) in &self.set {
            document.insert(key.clone(), value.clone());
        }
        for key in &self.unset {
            document.remove(key);
        }
        for (key, values) in &self.push {
            match document.get_mut(key) {
                Some(Bson::Array(items)) => items.extend(values.iter().cloned()),
                None => {
                    document.insert(key.clone(), Bson::Array(values.clone()));
                }
                Some(other) => {
                    return Err(StoreError::operation_failed(format!(
                        "cannot push to non-array field '{key}' of type {:?}",
                        other.element_type()
                    )))
                }
            }
        }
        Ok(())
    }
}
