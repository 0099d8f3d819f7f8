use async_graphql::{InputObject, MaybeUndefined, SimpleObject, ID};
use infra::models::EquipamentoDoc;
use infra::repos::{CreateEquipamento, UpdateEquipamento};

use crate::gql::error::GqlError;
use crate::gql::input::{finite, present};
use crate::gql::scalars::DateTime;

/// A sprayer.
#[derive(SimpleObject, Clone)]
pub struct Equipamento {
    pub id: ID,
    pub nome: String,
    pub modelo: String,
    pub fabricante: String,
    pub ano_fabricacao: i32,
    pub largura_barra: f64,
    pub capacidade_tanque: f64,
    pub numero_serie: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl From<EquipamentoDoc> for Equipamento {
    fn from(doc: EquipamentoDoc) -> Self {
        Self {
            id: doc.id.to_hex().into(),
            nome: doc.nome,
            modelo: doc.modelo,
            fabricante: doc.fabricante,
            ano_fabricacao: doc.ano_fabricacao,
            largura_barra: doc.largura_barra,
            capacidade_tanque: doc.capacidade_tanque,
            numero_serie: doc.numero_serie,
            created_at: doc.created_at.into(),
            updated_at: doc.updated_at.into(),
        }
    }
}

#[derive(InputObject)]
pub struct EquipamentoInput {
    pub nome: String,
    pub modelo: String,
    pub fabricante: String,
    pub ano_fabricacao: i32,
    pub largura_barra: f64,
    pub capacidade_tanque: f64,
    pub numero_serie: String,
}

impl TryFrom<EquipamentoInput> for CreateEquipamento {
    type Error = GqlError;

    fn try_from(input: EquipamentoInput) -> Result<Self, GqlError> {
        Ok(Self {
            nome: input.nome,
            modelo: input.modelo,
            fabricante: input.fabricante,
            ano_fabricacao: input.ano_fabricacao,
            largura_barra: finite("larguraBarra", input.largura_barra)?,
            capacidade_tanque: finite("capacidadeTanque", input.capacidade_tanque)?,
            numero_serie: input.numero_serie,
        })
    }
}

#[derive(InputObject, Default)]
pub struct EquipamentoUpdateInput {
    pub nome: MaybeUndefined<String>,
    pub modelo: MaybeUndefined<String>,
    pub fabricante: MaybeUndefined<String>,
    pub ano_fabricacao: MaybeUndefined<i32>,
    pub largura_barra: MaybeUndefined<f64>,
    pub capacidade_tanque: MaybeUndefined<f64>,
    pub numero_serie: MaybeUndefined<String>,
}

impl TryFrom<EquipamentoUpdateInput> for UpdateEquipamento {
    type Error = GqlError;

    fn try_from(input: EquipamentoUpdateInput) -> Result<Self, GqlError> {
        Ok(Self {
            nome: present("nome", input.nome)?,
            modelo: present("modelo", input.modelo)?,
            fabricante: present("fabricante", input.fabricante)?,
            ano_fabricacao: present("anoFabricacao", input.ano_fabricacao)?,
            largura_barra: present("larguraBarra", input.largura_barra)?
                .map(|v| finite("larguraBarra", v))
                .transpose()?,
            capacidade_tanque: present("capacidadeTanque", input.capacidade_tanque)?
                .map(|v| finite("capacidadeTanque", v))
                .transpose()?,
            numero_serie: present("numeroSerie", input.numero_serie)?,
        })
    }
}
