//! Storage-side documents.
//!
//! Field names here are the storage names (snake_case). The GraphQL layer
//! exposes the same data under camelCase names; the [`fields`] table is the
//! single place that spells out every storage key used in filters, updates
//! and pipelines.

use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::StoreResult;

pub mod collections {
    pub const TALHOES: &str = "talhoes";
    pub const EQUIPAMENTOS: &str = "equipamentos";
    pub const TIPOS_APLICACAO: &str = "tipos_aplicacao";
    pub const APLICACOES: &str = "aplicacoes";
    pub const GEO_TRAJETORIAS: &str = "geo_trajetorias";
}

pub mod fields {
    pub const ID: &str = "_id";
    pub const CREATED_AT: &str = "created_at";
    pub const UPDATED_AT: &str = "updated_at";

    pub mod talhao {
        pub const NOME: &str = "nome";
        pub const AREA_HECTARES: &str = "area_hectares";
        pub const CULTURA: &str = "cultura";
        pub const VARIEDADE: &str = "variedade";
        pub const COORDENADAS_GEOGRAFICAS: &str = "coordenadas_geograficas";
    }

    pub mod equipamento {
        pub const NOME: &str = "nome";
        pub const MODELO: &str = "modelo";
        pub const FABRICANTE: &str = "fabricante";
        pub const ANO_FABRICACAO: &str = "ano_fabricacao";
        pub const LARGURA_BARRA: &str = "largura_barra";
        pub const CAPACIDADE_TANQUE: &str = "capacidade_tanque";
        pub const NUMERO_SERIE: &str = "numero_serie";
    }

    pub mod tipo_aplicacao {
        pub const NOME: &str = "nome";
        pub const DESCRICAO: &str = "descricao";
        pub const VAZAO_PADRAO: &str = "vazao_padrao";
        pub const TIPO_PRODUTO: &str = "tipo_produto";
        pub const UNIDADE_MEDIDA: &str = "unidade_medida";
    }

    pub mod aplicacao {
        pub const TALHAO_ID: &str = "talhao_id";
        pub const EQUIPAMENTO_ID: &str = "equipamento_id";
        pub const TIPO_APLICACAO_ID: &str = "tipo_aplicacao_id";
        pub const DATA_INICIO: &str = "data_inicio";
        pub const DATA_FIM: &str = "data_fim";
        pub const DOSAGEM: &str = "dosagem";
        pub const VOLUME_APLICADO: &str = "volume_aplicado";
        pub const OPERADOR: &str = "operador";
        pub const CONDICAO_CLIMATICA: &str = "condicao_climatica";
        pub const OBSERVACOES: &str = "observacoes";
        pub const FINALIZADA: &str = "finalizada";
        // Filled by lookups at read time, never stored.
        pub const TALHAO: &str = "talhao";
        pub const EQUIPAMENTO: &str = "equipamento";
        pub const TIPO_APLICACAO: &str = "tipo_aplicacao";
    }

    pub mod geo_trajetoria {
        pub const APLICACAO_ID: &str = "aplicacao_id";
        pub const PONTO_INICIAL: &str = "ponto_inicial";
        pub const PONTO_FINAL: &str = "ponto_final";
        pub const TRAJETORIA: &str = "trajetoria";
        pub const AREA_COBERTURA: &str = "area_cobertura";
        pub const DISTANCIA_PERCORRIDA: &str = "distancia_percorrida";
    }

    pub mod geo_point {
        pub const LATITUDE: &str = "latitude";
        pub const LONGITUDE: &str = "longitude";
        pub const TIMESTAMP: &str = "timestamp";
        pub const ALTITUDE: &str = "altitude";
        pub const SPEED: &str = "speed";
        pub const ACCURACY: &str = "accuracy";
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TalhaoDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub nome: String,
    pub area_hectares: f64,
    pub cultura: String,
    pub variedade: String,
    pub coordenadas_geograficas: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipamentoDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub nome: String,
    pub modelo: String,
    pub fabricante: String,
    #[serde(deserialize_with = "integral_i32")]
    pub ano_fabricacao: i32,
    pub largura_barra: f64,
    pub capacidade_tanque: f64,
    pub numero_serie: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TipoAplicacaoDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub nome: String,
    pub descricao: String,
    pub vazao_padrao: f64,
    pub tipo_produto: String,
    pub unidade_medida: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AplicacaoDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub talhao_id: ObjectId,
    pub equipamento_id: ObjectId,
    pub tipo_aplicacao_id: ObjectId,
    pub data_inicio: DateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_fim: Option<DateTime>,
    pub dosagem: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_aplicado: Option<f64>,
    pub operador: String,
    pub condicao_climatica: String,
    #[serde(default)]
    pub observacoes: String,
    #[serde(default)]
    pub finalizada: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub talhao: Option<TalhaoDoc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipamento: Option<EquipamentoDoc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tipo_aplicacao: Option<TipoAplicacaoDoc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPointDoc {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoTrajetoriaDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub aplicacao_id: ObjectId,
    pub ponto_inicial: GeoPointDoc,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ponto_final: Option<GeoPointDoc>,
    #[serde(default)]
    pub trajetoria: Vec<GeoPointDoc>,
    #[serde(default)]
    pub area_cobertura: f64,
    #[serde(default)]
    pub distancia_percorrida: f64,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// Accepts any BSON number with an integral value. Documents written by the
/// mongo shell store every number as a double.
fn integral_i32<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = f64::deserialize(deserializer)?;
    if value.fract() != 0.0 || value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
        return Err(D::Error::custom(format!("expected an integral i32, found {value}")));
    }
    Ok(value as i32)
}

pub(crate) fn decode<T: serde::de::DeserializeOwned>(document: bson::Document) -> StoreResult<T> {
    Ok(bson::from_document(document)?)
}

pub(crate) fn encode<T: Serialize>(value: &T) -> StoreResult<bson::Document> {
    Ok(bson::to_document(value)?)
}
