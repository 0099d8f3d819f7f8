use bson::{oid::ObjectId, DateTime};

use crate::db::Db;
use crate::error::StoreResult;
use crate::models::{collections::EQUIPAMENTOS, fields::equipamento::*, EquipamentoDoc};
use crate::pagination::LimitOffset;
use crate::store::Update;

#[derive(Debug, Clone)]
pub struct CreateEquipamento {
    pub nome: String,
    pub modelo: String,
    pub fabricante: String,
    pub ano_fabricacao: i32,
    pub largura_barra: f64,
    pub capacidade_tanque: f64,
    pub numero_serie: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateEquipamento {
    pub nome: Option<String>,
    pub modelo: Option<String>,
    pub fabricante: Option<String>,
    pub ano_fabricacao: Option<i32>,
    pub largura_barra: Option<f64>,
    pub capacidade_tanque: Option<f64>,
    pub numero_serie: Option<String>,
}

pub async fn create(db: &Db, data: CreateEquipamento) -> StoreResult<EquipamentoDoc> {
    let now = DateTime::now();
    let equipamento = EquipamentoDoc {
        id: ObjectId::new(),
        nome: data.nome,
        modelo: data.modelo,
        fabricante: data.fabricante,
        ano_fabricacao: data.ano_fabricacao,
        largura_barra: data.largura_barra,
        capacidade_tanque: data.capacidade_tanque,
        numero_serie: data.numero_serie,
        created_at: now,
        updated_at: now,
    };
    super::insert(db, EQUIPAMENTOS, &equipamento).await?;
    Ok(equipamento)
}

pub async fn get_by_id(db: &Db, id: ObjectId) -> StoreResult<Option<EquipamentoDoc>> {
    super::find_by_id(db, EQUIPAMENTOS, id).await
}

pub async fn list(db: &Db, page: LimitOffset) -> StoreResult<Vec<EquipamentoDoc>> {
    super::list_natural(db, EQUIPAMENTOS, page).await
}

pub async fn update(
    db: &Db,
    id: ObjectId,
    data: UpdateEquipamento,
) -> StoreResult<Option<EquipamentoDoc>> {
    let update = update_document(&data, DateTime::now());
    if !super::apply_update(db, EQUIPAMENTOS, id, &update).await? {
        return Ok(None);
    }
    get_by_id(db, id).await
}

pub async fn delete(db: &Db, id: ObjectId) -> StoreResult<bool> {
    super::delete_by_id(db, EQUIPAMENTOS, id).await
}

fn update_document(data: &UpdateEquipamento, now: DateTime) -> Update {
    let mut update = super::touched(now);
    if let Some(nome) = &data.nome {
        update.set(NOME, nome.as_str());
    }
    if let Some(modelo) = &data.modelo {
        update.set(MODELO, modelo.as_str());
    }
    if let Some(fabricante) = &data.fabricante {
        update.set(FABRICANTE, fabricante.as_str());
    }
    if let Some(ano) = data.ano_fabricacao {
        update.set(ANO_FABRICACAO, ano);
    }
    if let Some(largura) = data.largura_barra {
        update.set(LARGURA_BARRA, largura);
    }
    if let Some(capacidade) = data.capacidade_tanque {
        update.set(CAPACIDADE_TANQUE, capacidade);
    }
    if let Some(serie) = &data.numero_serie {
        update.set(NUMERO_SERIE, serie.as_str());
    }
    update
}
