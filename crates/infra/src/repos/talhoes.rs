use bson::{oid::ObjectId, DateTime};

use crate::db::Db;
use crate::error::StoreResult;
use crate::models::{collections::TALHOES, fields::talhao::*, TalhaoDoc};
use crate::pagination::LimitOffset;
use crate::store::Update;

#[derive(Debug, Clone)]
pub struct CreateTalhao {
    pub nome: String,
    pub area_hectares: f64,
    pub cultura: String,
    pub variedade: String,
    pub coordenadas_geograficas: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateTalhao {
    pub nome: Option<String>,
    pub area_hectares: Option<f64>,
    pub cultura: Option<String>,
    pub variedade: Option<String>,
    pub coordenadas_geograficas: Option<String>,
}

pub async fn create(db: &Db, data: CreateTalhao) -> StoreResult<TalhaoDoc> {
    let now = DateTime::now();
    let talhao = TalhaoDoc {
        id: ObjectId::new(),
        nome: data.nome,
        area_hectares: data.area_hectares,
        cultura: data.cultura,
        variedade: data.variedade,
        coordenadas_geograficas: data.coordenadas_geograficas,
        created_at: now,
        updated_at: now,
    };
    super::insert(db, TALHOES, &talhao).await?;
    Ok(talhao)
}

pub async fn get_by_id(db: &Db, id: ObjectId) -> StoreResult<Option<TalhaoDoc>> {
    super::find_by_id(db, TALHOES, id).await
}

pub async fn list(db: &Db, page: LimitOffset) -> StoreResult<Vec<TalhaoDoc>> {
    super::list_natural(db, TALHOES, page).await
}

pub async fn update(db: &Db, id: ObjectId, data: UpdateTalhao) -> StoreResult<Option<TalhaoDoc>> {
    let update = update_document(&data, DateTime::now());
    if !super::apply_update(db, TALHOES, id, &update).await? {
        return Ok(None);
    }
    get_by_id(db, id).await
}

pub async fn delete(db: &Db, id: ObjectId) -> StoreResult<bool> {
    super::delete_by_id(db, TALHOES, id).await
}

fn update_document(data: &UpdateTalhao, now: DateTime) -> Update {
    let mut update = super::touched(now);
    if let Some(nome) = &data.nome {
        update.set(NOME, nome.as_str());
    }
    if let Some(area) = data.area_hectares {
        update.set(AREA_HECTARES, area);
    }
    if let Some(cultura) = &data.cultura {
        update.set(CULTURA, cultura.as_str());
    }
    if let Some(variedade) = &data.variedade {
        update.set(VARIEDADE, variedade.as_str());
    }
    if let Some(coordenadas) = &data.coordenadas_geograficas {
        update.set(COORDENADAS_GEOGRAFICAS, coordenadas.as_str());
    }
    update
}
