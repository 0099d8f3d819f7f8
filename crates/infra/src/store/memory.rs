use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use bson::{oid::ObjectId, Bson, Document};
use parking_lot::RwLock;

use super::{DocumentStore, Filter, Pipeline, SortDirection, Stage, Update, UpdateOutcome};
use crate::error::{StoreError, StoreResult};
use crate::indexes::IndexSpec;

/// In-process backend keeping each collection as an insertion-ordered list
/// of documents. Pipelines are interpreted stage by stage with the same
/// semantics the MongoDB server applies to the stages we emit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| filter.matches(d)).cloned()))
    }

    async fn insert_one(&self, collection: &str, mut document: Document) -> StoreResult<ObjectId> {
        let id = match document.get("_id") {
            Some(Bson::ObjectId(id)) => *id,
            Some(other) => {
                return Err(StoreError::operation_failed(format!(
                    "unsupported _id type {:?}",
                    other.element_type()
                )))
            }
            None => {
                let id = ObjectId::new();
                document.insert("_id", id);
                id
            }
        };

        let mut collections = self.collections.write();
        let docs = collections.entry(collection.to_string()).or_default();
        if docs.iter().any(|d| d.get("_id") == Some(&Bson::ObjectId(id))) {
            return Err(StoreError::operation_failed(format!(
                "duplicate key in '{collection}': _id {id}"
            )));
        }
        docs.push(document);
        Ok(id)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
    ) -> StoreResult<UpdateOutcome> {
        let mut collections = self.collections.write();
        let Some(target) = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| filter.matches(d)))
        else {
            return Ok(UpdateOutcome::default());
        };

        // Work on a copy so a failing operator leaves the stored document intact.
        let mut updated = target.clone();
        update.apply(&mut updated)?;
        let modified = u64::from(updated != *target);
        *target = updated;

        Ok(UpdateOutcome {
            matched: 1,
            modified,
        })
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        let mut collections = self.collections.write();
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };
        match docs.iter().position(|d| filter.matches(d)) {
            Some(index) => {
                docs.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn aggregate(
        &self,
        collection: &str,
        pipeline: &Pipeline,
    ) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read();
        let source = collections.get(collection).cloned().unwrap_or_default();
        run_pipeline(&collections, source, pipeline)
    }

    async fn ensure_indexes(&self, _indexes: &[IndexSpec]) -> StoreResult<()> {
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

fn run_pipeline(
    collections: &HashMap<String, Vec<Document>>,
    mut docs: Vec<Document>,
    pipeline: &Pipeline,
) -> StoreResult<Vec<Document>> {
    for stage in pipeline.stages() {
        docs = match stage {
            Stage::Match(filter) => docs.into_iter().filter(|d| filter.matches(d)).collect(),
            Stage::Lookup {
                from,
                local_field,
                foreign_field,
                as_field,
            } => {
                let foreign = collections.get(from).map(Vec::as_slice).unwrap_or(&[]);
                docs.into_iter()
                    .map(|mut doc| {
                        let local = doc.get(local_field).cloned().unwrap_or(Bson::Null);
                        let joined: Vec<Bson> = foreign
                            .iter()
                            .filter(|f| f.get(foreign_field).unwrap_or(&Bson::Null) == &local)
                            .cloned()
                            .map(Bson::Document)
                            .collect();
                        doc.insert(as_field.clone(), Bson::Array(joined));
                        doc
                    })
                    .collect()
            }
            Stage::Unwind {
                path,
                preserve_null_and_empty_arrays,
            } => unwind(docs, path, *preserve_null_and_empty_arrays),
            Stage::Sort(keys) => {
                docs.sort_by(|a, b| compare_by_keys(a, b, keys));
                docs
            }
            Stage::Skip(n) => docs
                .into_iter()
                .skip(usize::try_from(*n).unwrap_or(usize::MAX))
                .collect(),
            Stage::Limit(n) => {
                if *n == 0 {
                    return Err(StoreError::operation_failed("the limit must be positive"));
                }
                docs.into_iter()
                    .take(usize::try_from(*n).unwrap_or(usize::MAX))
                    .collect()
            }
        };
    }
    Ok(docs)
}

fn unwind(docs: Vec<Document>, path: &str, preserve: bool) -> Vec<Document> {
    let mut out = Vec::with_capacity(docs.len());
    for doc in docs {
        match doc.get(path).cloned() {
            Some(Bson::Array(items)) if items.is_empty() => {
                if preserve {
                    let mut doc = doc;
                    doc.remove(path);
                    out.push(doc);
                }
            }
            Some(Bson::Array(items)) => {
                for item in items {
                    let mut copy = doc.clone();
                    copy.insert(path, item);
                    out.push(copy);
                }
            }
            None | Some(Bson::Null) => {
                if preserve {
                    out.push(doc);
                }
            }
            // A non-array value behaves like a single-element array.
            Some(_) => out.push(doc),
        }
    }
    out
}

fn compare_by_keys(a: &Document, b: &Document, keys: &[(String, SortDirection)]) -> Ordering {
    for (field, direction) in keys {
        let ordering = compare_bson(a.get(field), b.get(field));
        let ordering = match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Orders the value types the repositories sort on. Missing values and
/// nulls sort first, as they do on the server.
fn compare_bson(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    fn number(value: &Bson) -> Option<f64> {
        match value {
            Bson::Int32(v) => Some(f64::from(*v)),
            Bson::Int64(v) => Some(*v as f64),
            Bson::Double(v) => Some(*v),
            _ => None,
        }
    }

    match (a, b) {
        (None | Some(Bson::Null), None | Some(Bson::Null)) => Ordering::Equal,
        (None | Some(Bson::Null), _) => Ordering::Less,
        (_, None | Some(Bson::Null)) => Ordering::Greater,
        (Some(Bson::DateTime(x)), Some(Bson::DateTime(y))) => x.cmp(y),
        (Some(Bson::ObjectId(x)), Some(Bson::ObjectId(y))) => x.bytes().cmp(&y.bytes()),
        (Some(Bson::String(x)), Some(Bson::String(y))) => x.cmp(y),
        (Some(Bson::Boolean(x)), Some(Bson::Boolean(y))) => x.cmp(y),
        (Some(x), Some(y)) => match (number(x), number(y)) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    fn store() -> MemoryStore {
        MemoryStore::new()
    }

    #[tokio::test]
    async fn insert_assigns_id_and_rejects_duplicates() {
        let store = store();
        let id = store.insert_one("talhoes", doc! { "nome": "A" }).await.unwrap();

        let found = store
            .find_one("talhoes", &Filter::by_id(id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.get_str("nome").unwrap(), "A");

        let duplicate = store.insert_one("talhoes", doc! { "_id": id }).await;
        assert!(matches!(duplicate, Err(StoreError::OperationFailed(_))));
    }

    #[tokio::test]
    async fn update_reports_match_and_modification() {
        let store = store();
        let id = store.insert_one("c", doc! { "n": 1 }).await.unwrap();

        let mut update = Update::new();
        update.set("n", 2);
        let outcome = store.update_one("c", &Filter::by_id(id), &update).await.unwrap();
        assert_eq!(outcome, UpdateOutcome { matched: 1, modified: 1 });

        let outcome = store
            .update_one("c", &Filter::by_id(ObjectId::new()), &update)
            .await
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::default());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = store();
        let id = store.insert_one("c", doc! {}).await.unwrap();

        assert_eq!(store.delete_one("c", &Filter::by_id(id)).await.unwrap(), 1);
        assert_eq!(store.delete_one("c", &Filter::by_id(id)).await.unwrap(), 0);
        assert_eq!(store.delete_one("missing", &Filter::by_id(id)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn join_one_keeps_documents_with_dangling_references() {
        let store = store();
        let talhao = store.insert_one("talhoes", doc! { "nome": "Norte" }).await.unwrap();
        store
            .insert_one("aplicacoes", doc! { "talhao_id": talhao })
            .await
            .unwrap();
        store
            .insert_one("aplicacoes", doc! { "talhao_id": ObjectId::new() })
            .await
            .unwrap();

        let docs = store
            .aggregate(
                "aplicacoes",
                &Pipeline::new().join_one("talhoes", "talhao_id", "talhao"),
            )
            .await
            .unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(
            docs[0].get_document("talhao").unwrap().get_str("nome").unwrap(),
            "Norte"
        );
        assert!(docs[1].get("talhao").is_none());
    }

    #[test]
    fn unwind_without_preserve_drops_unmatched() {
        let docs = unwind(
            vec![doc! { "a": [] }, doc! { "a": [1, 2] }, doc! {}],
            "a",
            false,
        );
        assert_eq!(docs, vec![doc! { "a": 1 }, doc! { "a": 2 }]);
    }

    #[tokio::test]
    async fn sort_skip_limit_page_through_results() {
        let store = store();
        for n in 0..5 {
            store.insert_one("c", doc! { "n": n }).await.unwrap();
        }

        let docs = store
            .aggregate(
                "c",
                &Pipeline::new()
                    .sort(&[("n", SortDirection::Descending)])
                    .skip(1)
                    .limit(2),
            )
            .await
            .unwrap();

        let values: Vec<i32> = docs.iter().map(|d| d.get_i32("n").unwrap()).collect();
        assert_eq!(values, vec![3, 2]);
    }

    #[tokio::test]
    async fn zero_limit_is_rejected() {
        let store = store();
        let result = store.aggregate("c", &Pipeline::new().limit(0)).await;
        assert!(result.is_err());
    }
}
