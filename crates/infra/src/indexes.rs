use crate::models::{collections, fields};
use crate::store::SortDirection;

/// A single-field index on one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpec {
    pub collection: &'static str,
    pub field: &'static str,
    pub direction: SortDirection,
}

const fn asc(collection: &'static str, field: &'static str) -> IndexSpec {
    IndexSpec {
        collection,
        field,
        direction: SortDirection::Ascending,
    }
}

/// Indexes backing the foreign-key lookups, listings and common filters.
pub const INDEXES: &[IndexSpec] = &[
    asc(collections::APLICACOES, fields::aplicacao::TALHAO_ID),
    asc(collections::APLICACOES, fields::aplicacao::EQUIPAMENTO_ID),
    asc(collections::APLICACOES, fields::aplicacao::TIPO_APLICACAO_ID),
    asc(collections::APLICACOES, fields::aplicacao::DATA_INICIO),
    asc(collections::APLICACOES, fields::aplicacao::FINALIZADA),
    asc(collections::APLICACOES, fields::CREATED_AT),
    asc(collections::TALHOES, fields::talhao::NOME),
    asc(collections::TALHOES, fields::talhao::CULTURA),
    asc(collections::EQUIPAMENTOS, fields::equipamento::NOME),
    asc(collections::EQUIPAMENTOS, fields::equipamento::FABRICANTE),
    asc(collections::EQUIPAMENTOS, fields::equipamento::MODELO),
    asc(collections::TIPOS_APLICACAO, fields::tipo_aplicacao::NOME),
    asc(collections::TIPOS_APLICACAO, fields::tipo_aplicacao::TIPO_PRODUTO),
    asc(collections::GEO_TRAJETORIAS, fields::geo_trajetoria::APLICACAO_ID),
    IndexSpec {
        collection: collections::GEO_TRAJETORIAS,
        field: fields::CREATED_AT,
        direction: SortDirection::Descending,
    },
];
