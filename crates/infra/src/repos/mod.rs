//! One module per collection. Every function takes the shared [`Db`]
//! handle; the request deadline, if any, is already carried by it.

use bson::{oid::ObjectId, Document};
use serde::{de::DeserializeOwned, Serialize};

use crate::db::Db;
use crate::error::StoreResult;
use crate::models::{decode, encode, fields};
use crate::pagination::LimitOffset;
use crate::store::{Filter, Pipeline, Update};

pub mod aplicacoes;
pub mod equipamentos;
pub mod geo_trajetorias;
pub mod talhoes;
pub mod tipos_aplicacao;

pub use aplicacoes::{CreateAplicacao, UpdateAplicacao};
pub use equipamentos::{CreateEquipamento, UpdateEquipamento};
pub use geo_trajetorias::{CreateGeoTrajetoria, UpdateGeoTrajetoria};
pub use talhoes::{CreateTalhao, UpdateTalhao};
pub use tipos_aplicacao::{CreateTipoAplicacao, UpdateTipoAplicacao};

async fn insert<T: Serialize>(db: &Db, collection: &str, document: &T) -> StoreResult<ObjectId> {
    db.insert_one(collection, encode(document)?).await
}

async fn find_by_id<T: DeserializeOwned>(
    db: &Db,
    collection: &str,
    id: ObjectId,
) -> StoreResult<Option<T>> {
    db.find_by_id(collection, id).await?.map(decode).transpose()
}

/// Page over `collection` in store-natural order.
async fn list_natural<T: DeserializeOwned>(
    db: &Db,
    collection: &str,
    page: LimitOffset,
) -> StoreResult<Vec<T>> {
    let pipeline = Pipeline::new().skip(page.skip()).limit(page.take());
    decode_all(db.aggregate(collection, &pipeline).await?)
}

/// Applies `update` to the document with `id`. Returns `false` when no
/// document matched.
async fn apply_update(db: &Db, collection: &str, id: ObjectId, update: &Update) -> StoreResult<bool> {
    let outcome = db.update_one(collection, &Filter::by_id(id), update).await?;
    Ok(outcome.matched > 0)
}

async fn delete_by_id(db: &Db, collection: &str, id: ObjectId) -> StoreResult<bool> {
    Ok(db.delete_one(collection, &Filter::by_id(id)).await? > 0)
}

fn decode_all<T: DeserializeOwned>(documents: Vec<Document>) -> StoreResult<Vec<T>> {
    documents.into_iter().map(decode).collect()
}

/// Starts an update that refreshes `updated_at`.
fn touched(now: bson::DateTime) -> Update {
    let mut update = Update::new();
    update.set(fields::UPDATED_AT, now);
    update
}
