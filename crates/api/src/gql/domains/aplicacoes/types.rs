use async_graphql::{InputObject, MaybeUndefined, SimpleObject, ID};
use bson::oid::ObjectId;
use infra::models::AplicacaoDoc;
use infra::repos::{CreateAplicacao, UpdateAplicacao};
use infra::Patch;

use crate::config::DateTimeParsePolicy;
use crate::gql::domains::equipamentos::types::Equipamento;
use crate::gql::domains::talhoes::types::Talhao;
use crate::gql::domains::tipos_aplicacao::types::TipoAplicacao;
use crate::gql::error::GqlError;
use crate::gql::input::{clearable, finite, parse_object_id, present};
use crate::gql::scalars::DateTime;

/// One spraying run over a plot.
///
/// `talhao`, `equipamento` and `tipoAplicacao` are resolved from the ids at
/// read time and are null when the referenced document no longer exists.
#[derive(SimpleObject, Clone)]
pub struct Aplicacao {
    pub id: ID,
    pub talhao_id: ID,
    pub equipamento_id: ID,
    pub tipo_aplicacao_id: ID,
    pub data_inicio: DateTime,
    pub data_fim: Option<DateTime>,
    pub dosagem: f64,
    pub volume_aplicado: Option<f64>,
    pub operador: String,
    pub condicao_climatica: String,
    pub observacoes: String,
    pub finalizada: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
    pub talhao: Option<Talhao>,
    pub equipamento: Option<Equipamento>,
    pub tipo_aplicacao: Option<TipoAplicacao>,
}

impl From<AplicacaoDoc> for Aplicacao {
    fn from(doc: AplicacaoDoc) -> Self {
        Self {
            id: doc.id.to_hex().into(),
            talhao_id: doc.talhao_id.to_hex().into(),
            equipamento_id: doc.equipamento_id.to_hex().into(),
            tipo_aplicacao_id: doc.tipo_aplicacao_id.to_hex().into(),
            data_inicio: doc.data_inicio.into(),
            data_fim: doc.data_fim.map(DateTime::from),
            dosagem: doc.dosagem,
            volume_aplicado: doc.volume_aplicado,
            operador: doc.operador,
            condicao_climatica: doc.condicao_climatica,
            observacoes: doc.observacoes,
            finalizada: doc.finalizada,
            created_at: doc.created_at.into(),
            updated_at: doc.updated_at.into(),
            talhao: doc.talhao.map(Talhao::from),
            equipamento: doc.equipamento.map(Equipamento::from),
            tipo_aplicacao: doc.tipo_aplicacao.map(TipoAplicacao::from),
        }
    }
}

#[derive(InputObject)]
pub struct AplicacaoInput {
    pub talhao_id: ID,
    pub equipamento_id: ID,
    pub tipo_aplicacao_id: ID,
    pub data_inicio: DateTime,
    pub dosagem: f64,
    pub volume_aplicado: Option<f64>,
    pub operador: String,
    pub condicao_climatica: String,
    pub observacoes: Option<String>,
}

impl AplicacaoInput {
    pub fn decode(self, policy: DateTimeParsePolicy) -> Result<CreateAplicacao, GqlError> {
        Ok(CreateAplicacao {
            talhao_id: parse_object_id(&self.talhao_id)?,
            equipamento_id: parse_object_id(&self.equipamento_id)?,
            tipo_aplicacao_id: parse_object_id(&self.tipo_aplicacao_id)?,
            data_inicio: policy.required("dataInicio", self.data_inicio)?,
            dosagem: finite("dosagem", self.dosagem)?,
            volume_aplicado: self
                .volume_aplicado
                .map(|v| finite("volumeAplicado", v))
                .transpose()?,
            operador: self.operador,
            condicao_climatica: self.condicao_climatica,
            observacoes: self.observacoes,
        })
    }
}

fn reference_id(field: &str, value: MaybeUndefined<ID>) -> Result<Option<ObjectId>, GqlError> {
    present(field, value)?
        .map(|id| parse_object_id(&id))
        .transpose()
}

/// Sparse update. `dataFim`, `volumeAplicado` and `observacoes` accept an
/// explicit null to clear them; every other field rejects null.
#[derive(InputObject, Default)]
pub struct AplicacaoUpdateInput {
    pub talhao_id: MaybeUndefined<ID>,
    pub equipamento_id: MaybeUndefined<ID>,
    pub tipo_aplicacao_id: MaybeUndefined<ID>,
    pub data_inicio: MaybeUndefined<DateTime>,
    pub data_fim: MaybeUndefined<DateTime>,
    pub dosagem: MaybeUndefined<f64>,
    pub volume_aplicado: MaybeUndefined<f64>,
    pub operador: MaybeUndefined<String>,
    pub condicao_climatica: MaybeUndefined<String>,
    pub observacoes: MaybeUndefined<String>,
    /// Setting this to true also stamps `dataFim` with the current time.
    pub finalizada: MaybeUndefined<bool>,
}

impl AplicacaoUpdateInput {
    pub fn decode(self, policy: DateTimeParsePolicy) -> Result<UpdateAplicacao, GqlError> {
        Ok(UpdateAplicacao {
            talhao_id: reference_id("talhaoId", self.talhao_id)?,
            equipamento_id: reference_id("equipamentoId", self.equipamento_id)?,
            tipo_aplicacao_id: reference_id("tipoAplicacaoId", self.tipo_aplicacao_id)?,
            data_inicio: policy.present("dataInicio", self.data_inicio)?,
            data_fim: policy.clearable("dataFim", self.data_fim)?,
            dosagem: present("dosagem", self.dosagem)?
                .map(|v| finite("dosagem", v))
                .transpose()?,
            volume_aplicado: match clearable(self.volume_aplicado) {
                Patch::Set(v) => Patch::Set(finite("volumeAplicado", v)?),
                other => other,
            },
            operador: present("operador", self.operador)?,
            condicao_climatica: present("condicaoClimatica", self.condicao_climatica)?,
            observacoes: clearable(self.observacoes),
            finalizada: present("finalizada", self.finalizada)?,
        })
    }
}
