use async_graphql::{InputObject, MaybeUndefined, SimpleObject, ID};
use infra::models::TipoAplicacaoDoc;
use infra::repos::{CreateTipoAplicacao, UpdateTipoAplicacao};

use crate::gql::error::GqlError;
use crate::gql::input::{finite, present};
use crate::gql::scalars::DateTime;

#[derive(SimpleObject, Clone)]
pub struct TipoAplicacao {
    pub id: ID,
    pub nome: String,
    pub descricao: String,
    pub vazao_padrao: f64,
    pub tipo_produto: String,
    pub unidade_medida: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl From<TipoAplicacaoDoc> for TipoAplicacao {
    fn from(doc: TipoAplicacaoDoc) -> Self {
        Self {
            id: doc.id.to_hex().into(),
            nome: doc.nome,
            descricao: doc.descricao,
            vazao_padrao: doc.vazao_padrao,
            tipo_produto: doc.tipo_produto,
            unidade_medida: doc.unidade_medida,
            created_at: doc.created_at.into(),
            updated_at: doc.updated_at.into(),
        }
    }
}

#[derive(InputObject)]
pub struct TipoAplicacaoInput {
    pub nome: String,
    pub descricao: String,
    pub vazao_padrao: f64,
    pub tipo_produto: String,
    pub unidade_medida: String,
}

impl TryFrom<TipoAplicacaoInput> for CreateTipoAplicacao {
    type Error = GqlError;

    fn try_from(input: TipoAplicacaoInput) -> Result<Self, GqlError> {
        Ok(Self {
            nome: input.nome,
            descricao: input.descricao,
            vazao_padrao: finite("vazaoPadrao", input.vazao_padrao)?,
            tipo_produto: input.tipo_produto,
            unidade_medida: input.unidade_medida,
        })
    }
}

#[derive(InputObject, Default)]
pub struct TipoAplicacaoUpdateInput {
    pub nome: MaybeUndefined<String>,
    pub descricao: MaybeUndefined<String>,
    pub vazao_padrao: MaybeUndefined<f64>,
    pub tipo_produto: MaybeUndefined<String>,
    pub unidade_medida: MaybeUndefined<String>,
}

impl TryFrom<TipoAplicacaoUpdateInput> for UpdateTipoAplicacao {
    type Error = GqlError;

    fn try_from(input: TipoAplicacaoUpdateInput) -> Result<Self, GqlError> {
        Ok(Self {
            nome: present("nome", input.nome)?,
            descricao: present("descricao", input.descricao)?,
            vazao_padrao: present("vazaoPadrao", input.vazao_padrao)?
                .map(|v| finite("vazaoPadrao", v))
                .transpose()?,
            tipo_produto: present("tipoProduto", input.tipo_produto)?,
            unidade_medida: present("unidadeMedida", input.unidade_medida)?,
        })
    }
}
