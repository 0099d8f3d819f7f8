//! Applications, always read back enriched with the field, equipment and
//! application type they reference.

use bson::{oid::ObjectId, DateTime};

use crate::db::Db;
use crate::error::StoreResult;
use crate::models::{collections, fields::aplicacao::*, AplicacaoDoc};
use crate::pagination::LimitOffset;
use crate::patch::Patch;
use crate::store::{Filter, Pipeline, Update};

#[derive(Debug, Clone)]
pub struct CreateAplicacao {
    pub talhao_id: ObjectId,
    pub equipamento_id: ObjectId,
    pub tipo_aplicacao_id: ObjectId,
    pub data_inicio: DateTime,
    pub dosagem: f64,
    pub volume_aplicado: Option<f64>,
    pub operador: String,
    pub condicao_climatica: String,
    pub observacoes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateAplicacao {
    pub talhao_id: Option<ObjectId>,
    pub equipamento_id: Option<ObjectId>,
    pub tipo_aplicacao_id: Option<ObjectId>,
    pub data_inicio: Option<DateTime>,
    pub data_fim: Patch<DateTime>,
    pub dosagem: Option<f64>,
    pub volume_aplicado: Patch<f64>,
    pub operador: Option<String>,
    pub condicao_climatica: Option<String>,
    pub observacoes: Patch<String>,
    pub finalizada: Option<bool>,
}

/// The three lookups that attach the referenced documents.
fn enrich(pipeline: Pipeline) -> Pipeline {
    pipeline
        .join_one(collections::TALHOES, TALHAO_ID, TALHAO)
        .join_one(collections::EQUIPAMENTOS, EQUIPAMENTO_ID, EQUIPAMENTO)
        .join_one(collections::TIPOS_APLICACAO, TIPO_APLICACAO_ID, TIPO_APLICACAO)
}

pub async fn create(db: &Db, data: CreateAplicacao) -> StoreResult<AplicacaoDoc> {
    let now = DateTime::now();
    let aplicacao = AplicacaoDoc {
        id: ObjectId::new(),
        talhao_id: data.talhao_id,
        equipamento_id: data.equipamento_id,
        tipo_aplicacao_id: data.tipo_aplicacao_id,
        data_inicio: data.data_inicio,
        data_fim: None,
        dosagem: data.dosagem,
        volume_aplicado: data.volume_aplicado,
        operador: data.operador,
        condicao_climatica: data.condicao_climatica,
        observacoes: data.observacoes.unwrap_or_default(),
        finalizada: false,
        created_at: now,
        updated_at: now,
        talhao: None,
        equipamento: None,
        tipo_aplicacao: None,
    };
    let id = super::insert(db, collections::APLICACOES, &aplicacao).await?;

    tracing::debug!(id = %id, "aplicacao inserted");

    // Re-read so the caller gets the enriched view.
    Ok(get_by_id(db, id).await?.unwrap_or(aplicacao))
}

pub async fn get_by_id(db: &Db, id: ObjectId) -> StoreResult<Option<AplicacaoDoc>> {
    let pipeline = enrich(Pipeline::new().matching(Filter::by_id(id))).limit(1);
    let documents = db.aggregate(collections::APLICACOES, &pipeline).await?;
    documents.into_iter().next().map(crate::models::decode).transpose()
}

/// Enriched page in store-natural order. Lookups run before the window is
/// applied.
pub async fn list(db: &Db, page: LimitOffset) -> StoreResult<Vec<AplicacaoDoc>> {
    let pipeline = enrich(Pipeline::new()).skip(page.skip()).limit(page.take());
    super::decode_all(db.aggregate(collections::APLICACOES, &pipeline).await?)
}

pub async fn update(
    db: &Db,
    id: ObjectId,
    data: UpdateAplicacao,
) -> StoreResult<Option<AplicacaoDoc>> {
    let now = DateTime::now();
    let finished_at = if data.finalizada == Some(true) {
        let inicio = match data.data_inicio {
            Some(inicio) => Some(inicio),
            None => stored_data_inicio(db, id).await?,
        };
        finish_time(now, inicio)
    } else {
        now
    };

    let update = update_document(&data, now, finished_at);
    if !super::apply_update(db, collections::APLICACOES, id, &update).await? {
        return Ok(None);
    }
    get_by_id(db, id).await
}

async fn stored_data_inicio(db: &Db, id: ObjectId) -> StoreResult<Option<DateTime>> {
    Ok(db
        .find_by_id(collections::APLICACOES, id)
        .await?
        .and_then(|doc| doc.get_datetime(DATA_INICIO).ok().copied()))
}

/// End time stamped on finishing: now, but never before the start.
fn finish_time(now: DateTime, data_inicio: Option<DateTime>) -> DateTime {
    data_inicio.map_or(now, |inicio| inicio.max(now))
}

pub async fn delete(db: &Db, id: ObjectId) -> StoreResult<bool> {
    super::delete_by_id(db, collections::APLICACOES, id).await
}

fn update_document(data: &UpdateAplicacao, now: DateTime, finished_at: DateTime) -> Update {
    let mut update = super::touched(now);

    if let Some(id) = data.talhao_id {
        update.set(TALHAO_ID, id);
    }
    if let Some(id) = data.equipamento_id {
        update.set(EQUIPAMENTO_ID, id);
    }
    if let Some(id) = data.tipo_aplicacao_id {
        update.set(TIPO_APLICACAO_ID, id);
    }
    if let Some(inicio) = data.data_inicio {
        update.set(DATA_INICIO, inicio);
    }
    match data.data_fim {
        Patch::Keep => {}
        Patch::Clear => {
            update.unset(DATA_FIM);
        }
        Patch::Set(fim) => {
            update.set(DATA_FIM, fim);
        }
    }
    if let Some(dosagem) = data.dosagem {
        update.set(DOSAGEM, dosagem);
    }
    match data.volume_aplicado {
        Patch::Keep => {}
        Patch::Clear => {
            update.unset(VOLUME_APLICADO);
        }
        Patch::Set(volume) => {
            update.set(VOLUME_APLICADO, volume);
        }
    }
    if let Some(operador) = &data.operador {
        update.set(OPERADOR, operador.as_str());
    }
    if let Some(condicao) = &data.condicao_climatica {
        update.set(CONDICAO_CLIMATICA, condicao.as_str());
    }
    match &data.observacoes {
        Patch::Keep => {}
        Patch::Clear => {
            update.set(OBSERVACOES, "");
        }
        Patch::Set(observacoes) => {
            update.set(OBSERVACOES, observacoes.as_str());
        }
    }

    // Finishing stamps the end time, even over an explicit dataFim.
    if let Some(finalizada) = data.finalizada {
        update.set(FINALIZADA, finalizada);
        if finalizada {
            update.set(DATA_FIM, finished_at);
        }
    }

    update
}
