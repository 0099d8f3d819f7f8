//! GPS trajectories of spraying runs.
//!
//! The point list only grows through updates: new points are appended with
//! `$push`/`$each` in the order received, and the initial point is never
//! rewritten after creation.

use bson::{oid::ObjectId, Bson, DateTime};

use crate::db::Db;
use crate::error::StoreResult;
use crate::models::{
    collections::GEO_TRAJETORIAS, fields, fields::geo_trajetoria::*, GeoPointDoc,
    GeoTrajetoriaDoc,
};
use crate::pagination::LimitOffset;
use crate::patch::Patch;
use crate::store::{Filter, Pipeline, SortDirection, Update};

const NEWEST_FIRST: &[(&str, SortDirection)] = &[
    (fields::CREATED_AT, SortDirection::Descending),
    (fields::ID, SortDirection::Descending),
];

#[derive(Debug, Clone)]
pub struct CreateGeoTrajetoria {
    pub aplicacao_id: ObjectId,
    pub ponto_inicial: GeoPointDoc,
    pub ponto_final: Option<GeoPointDoc>,
    pub trajetoria: Vec<GeoPointDoc>,
    pub area_cobertura: f64,
    pub distancia_percorrida: f64,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateGeoTrajetoria {
    pub ponto_final: Patch<GeoPointDoc>,
    pub area_cobertura: Option<f64>,
    pub distancia_percorrida: Option<f64>,
    pub novos_pontos: Vec<GeoPointDoc>,
}

pub async fn create(db: &Db, data: CreateGeoTrajetoria) -> StoreResult<GeoTrajetoriaDoc> {
    let now = DateTime::now();
    let trajetoria = GeoTrajetoriaDoc {
        id: ObjectId::new(),
        aplicacao_id: data.aplicacao_id,
        ponto_inicial: data.ponto_inicial,
        ponto_final: data.ponto_final,
        trajetoria: data.trajetoria,
        area_cobertura: data.area_cobertura,
        distancia_percorrida: data.distancia_percorrida,
        created_at: now,
        updated_at: now,
    };
    super::insert(db, GEO_TRAJETORIAS, &trajetoria).await?;
    Ok(trajetoria)
}

pub async fn get_by_id(db: &Db, id: ObjectId) -> StoreResult<Option<GeoTrajetoriaDoc>> {
    super::find_by_id(db, GEO_TRAJETORIAS, id).await
}

/// Newest first; the order is fixed before the window is applied.
pub async fn list(db: &Db, page: LimitOffset) -> StoreResult<Vec<GeoTrajetoriaDoc>> {
    let pipeline = Pipeline::new()
        .sort(NEWEST_FIRST)
        .skip(page.skip())
        .limit(page.take());
    super::decode_all(db.aggregate(GEO_TRAJETORIAS, &pipeline).await?)
}

/// Most recently created trajectory recorded for `aplicacao_id`.
pub async fn get_latest_by_aplicacao(
    db: &Db,
    aplicacao_id: ObjectId,
) -> StoreResult<Option<GeoTrajetoriaDoc>> {
    let pipeline = Pipeline::new()
        .matching(Filter::eq(APLICACAO_ID, aplicacao_id))
        .sort(NEWEST_FIRST)
        .limit(1);
    let documents = db.aggregate(GEO_TRAJETORIAS, &pipeline).await?;
    documents.into_iter().next().map(crate::models::decode).transpose()
}

pub async fn update(
    db: &Db,
    id: ObjectId,
    data: UpdateGeoTrajetoria,
) -> StoreResult<Option<GeoTrajetoriaDoc>> {
    let update = update_document(&data, DateTime::now())?;
    if !super::apply_update(db, GEO_TRAJETORIAS, id, &update).await? {
        return Ok(None);
    }

    tracing::debug!(
        id = %id,
        appended = data.novos_pontos.len(),
        "geo trajetoria updated"
    );

    get_by_id(db, id).await
}

pub async fn delete(db: &Db, id: ObjectId) -> StoreResult<bool> {
    super::delete_by_id(db, GEO_TRAJETORIAS, id).await
}

fn update_document(data: &UpdateGeoTrajetoria, now: DateTime) -> StoreResult<Update> {
    let mut update = super::touched(now);

    match &data.ponto_final {
        Patch::Keep => {}
        Patch::Clear => {
            update.unset(PONTO_FINAL);
        }
        Patch::Set(ponto) => {
            update.set(PONTO_FINAL, bson::to_bson(ponto)?);
        }
    }
    if let Some(area) = data.area_cobertura {
        update.set(AREA_COBERTURA, area);
    }
    if let Some(distancia) = data.distancia_percorrida {
        update.set(DISTANCIA_PERCORRIDA, distancia);
    }

    let pontos = data
        .novos_pontos
        .iter()
        .map(bson::to_bson)
        .collect::<Result<Vec<Bson>, _>>()?;
    update.push_each(TRAJETORIA, pontos);

    Ok(update)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use bson::doc;
    use std::sync::Arc;

    fn db() -> Db {
        Db::new(Arc::new(MemoryStore::new()))
    }

    fn ponto(latitude: f64, longitude: f64) -> GeoPointDoc {
        GeoPointDoc {
            latitude,
            longitude,
            timestamp: DateTime::now(),
            altitude: None,
            speed: None,
            accuracy: None,
        }
    }

    fn trajetoria(aplicacao_id: ObjectId) -> CreateGeoTrajetoria {
        CreateGeoTrajetoria {
            aplicacao_id,
            ponto_inicial: ponto(-25.2637, -51.3005),
            ponto_final: None,
            trajetoria: Vec::new(),
            area_cobertura: 0.0,
            distancia_percorrida: 0.0,
        }
    }

    #[test]
    fn update_document_combines_set_unset_and_push() {
        let now = DateTime::now();
        let novo = ponto(-25.2640, -51.3010);

        let update = update_document(
            &UpdateGeoTrajetoria {
                ponto_final: Patch::Clear,
                area_cobertura: Some(12.5),
                distancia_percorrida: None,
                novos_pontos: vec![novo.clone()],
            },
            now,
        )
        .unwrap();

        assert_eq!(
            update.set_fields(),
            &doc! { fields::UPDATED_AT: now, AREA_COBERTURA: 12.5 }
        );
        assert_eq!(update.unset_fields(), &[PONTO_FINAL.to_string()]);
        assert_eq!(
            update.pushed(),
            &[(TRAJETORIA.to_string(), vec![bson::to_bson(&novo).unwrap()])]
        );
    }

    #[test]
    fn no_points_means_no_push() {
        let update = update_document(&UpdateGeoTrajetoria::default(), DateTime::now()).unwrap();
        assert!(update.pushed().is_empty());
    }

    #[tokio::test]
    async fn appended_points_keep_order_and_initial_point_is_untouched() {
        let db = db();
        let created = create(&db, trajetoria(ObjectId::new())).await.unwrap();

        let first = vec![ponto(-25.1, -51.1), ponto(-25.2, -51.2)];
        let second = vec![ponto(-25.3, -51.3)];
        update(
            &db,
            created.id,
            UpdateGeoTrajetoria {
                novos_pontos: first.clone(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let updated = update(
            &db,
            created.id,
            UpdateGeoTrajetoria {
                novos_pontos: second.clone(),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(updated.trajetoria, [first, second].concat());
        assert_eq!(updated.ponto_inicial, created.ponto_inicial);
    }

    #[tokio::test]
    async fn latest_by_aplicacao_prefers_newest() {
        let db = db();
        let aplicacao_id = ObjectId::new();
        create(&db, trajetoria(aplicacao_id)).await.unwrap();
        let newest = create(&db, trajetoria(aplicacao_id)).await.unwrap();
        create(&db, trajetoria(ObjectId::new())).await.unwrap();

        let found = get_latest_by_aplicacao(&db, aplicacao_id).await.unwrap();

        assert_eq!(found.map(|t| t.id), Some(newest.id));
    }
}
