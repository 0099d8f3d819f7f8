use bson::{oid::ObjectId, DateTime};

use crate::db::Db;
use crate::error::StoreResult;
use crate::models::{collections::TIPOS_APLICACAO, fields::tipo_aplicacao::*, TipoAplicacaoDoc};
use crate::pagination::LimitOffset;
use crate::store::Update;

#[derive(Debug, Clone)]
pub struct CreateTipoAplicacao {
    pub nome: String,
    pub descricao: String,
    pub vazao_padrao: f64,
    pub tipo_produto: String,
    pub unidade_medida: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateTipoAplicacao {
    pub nome: Option<String>,
    pub descricao: Option<String>,
    pub vazao_padrao: Option<f64>,
    pub tipo_produto: Option<String>,
    pub unidade_medida: Option<String>,
}

pub async fn create(db: &Db, data: CreateTipoAplicacao) -> StoreResult<TipoAplicacaoDoc> {
    let now = DateTime::now();
    let tipo = TipoAplicacaoDoc {
        id: ObjectId::new(),
        nome: data.nome,
        descricao: data.descricao,
        vazao_padrao: data.vazao_padrao,
        tipo_produto: data.tipo_produto,
        unidade_medida: data.unidade_medida,
        created_at: now,
        updated_at: now,
    };
    super::insert(db, TIPOS_APLICACAO, &tipo).await?;
    Ok(tipo)
}

pub async fn get_by_id(db: &Db, id: ObjectId) -> StoreResult<Option<TipoAplicacaoDoc>> {
    super::find_by_id(db, TIPOS_APLICACAO, id).await
}

pub async fn list(db: &Db, page: LimitOffset) -> StoreResult<Vec<TipoAplicacaoDoc>> {
    super::list_natural(db, TIPOS_APLICACAO, page).await
}

pub async fn update(
    db: &Db,
    id: ObjectId,
    data: UpdateTipoAplicacao,
) -> StoreResult<Option<TipoAplicacaoDoc>> {
    let update = update_document(&data, DateTime::now());
    if !super::apply_update(db, TIPOS_APLICACAO, id, &update).await? {
        return Ok(None);
    }
    get_by_id(db, id).await
}

pub async fn delete(db: &Db, id: ObjectId) -> StoreResult<bool> {
    super::delete_by_id(db, TIPOS_APLICACAO, id).await
}

fn update_document(data: &UpdateTipoAplicacao, now: DateTime) -> Update {
    let mut update = super::touched(now);
    if let Some(nome) = &data.nome {
        update.set(NOME, nome.as_str());
    }
    if let Some(descricao) = &data.descricao {
        update.set(DESCRICAO, descricao.as_str());
    }
    if let Some(vazao) = data.vazao_padrao {
        update.set(VAZAO_PADRAO, vazao);
    }
    if let Some(tipo) = &data.tipo_produto {
        update.set(TIPO_PRODUTO, tipo.as_str());
    }
    if let Some(unidade) = &data.unidade_medida {
        update.set(UNIDADE_MEDIDA, unidade.as_str());
    }
    update
}
