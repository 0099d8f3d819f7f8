use async_graphql::{InputObject, MaybeUndefined, SimpleObject, ID};
use infra::models::{GeoPointDoc, GeoTrajetoriaDoc};
use infra::repos::{CreateGeoTrajetoria, UpdateGeoTrajetoria};
use infra::Patch;

use crate::config::DateTimeParsePolicy;
use crate::gql::error::GqlError;
use crate::gql::input::{clearable, finite, latitude, longitude, parse_object_id, present};
use crate::gql::scalars::DateTime;

#[derive(SimpleObject, Clone)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime,
    pub altitude: Option<f64>,
    pub speed: Option<f64>,
    pub accuracy: Option<f64>,
}

impl From<GeoPointDoc> for GeoPoint {
    fn from(doc: GeoPointDoc) -> Self {
        Self {
            latitude: doc.latitude,
            longitude: doc.longitude,
            timestamp: doc.timestamp.into(),
            altitude: doc.altitude,
            speed: doc.speed,
            accuracy: doc.accuracy,
        }
    }
}

/// GPS log of one spraying run. `trajetoria` keeps the points in the order
/// they were recorded.
#[derive(SimpleObject, Clone)]
pub struct GeoTrajetoria {
    pub id: ID,
    pub aplicacao_id: ID,
    pub ponto_inicial: GeoPoint,
    pub ponto_final: Option<GeoPoint>,
    pub trajetoria: Vec<GeoPoint>,
    pub area_cobertura: f64,
    pub distancia_percorrida: f64,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl From<GeoTrajetoriaDoc> for GeoTrajetoria {
    fn from(doc: GeoTrajetoriaDoc) -> Self {
        Self {
            id: doc.id.to_hex().into(),
            aplicacao_id: doc.aplicacao_id.to_hex().into(),
            ponto_inicial: doc.ponto_inicial.into(),
            ponto_final: doc.ponto_final.map(GeoPoint::from),
            trajetoria: doc.trajetoria.into_iter().map(GeoPoint::from).collect(),
            area_cobertura: doc.area_cobertura,
            distancia_percorrida: doc.distancia_percorrida,
            created_at: doc.created_at.into(),
            updated_at: doc.updated_at.into(),
        }
    }
}

#[derive(InputObject, Clone)]
pub struct GeoPointInput {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime,
    pub altitude: Option<f64>,
    pub speed: Option<f64>,
    pub accuracy: Option<f64>,
}

impl GeoPointInput {
    /// `field` is the path of this point in the request, used in error
    /// messages (`pontoInicial`, `novosPontos[3]`).
    pub fn decode(self, policy: DateTimeParsePolicy, field: &str) -> Result<GeoPointDoc, GqlError> {
        let optional = |name: &str, value: Option<f64>| {
            value
                .map(|v| finite(&format!("{field}.{name}"), v))
                .transpose()
        };

        Ok(GeoPointDoc {
            latitude: latitude(&format!("{field}.latitude"), self.latitude)?,
            longitude: longitude(&format!("{field}.longitude"), self.longitude)?,
            timestamp: policy.required(&format!("{field}.timestamp"), self.timestamp)?,
            altitude: optional("altitude", self.altitude)?,
            speed: optional("speed", self.speed)?,
            accuracy: optional("accuracy", self.accuracy)?,
        })
    }
}

fn decode_points(
    policy: DateTimeParsePolicy,
    field: &str,
    points: Vec<GeoPointInput>,
) -> Result<Vec<GeoPointDoc>, GqlError> {
    points
        .into_iter()
        .enumerate()
        .map(|(i, point)| point.decode(policy, &format!("{field}[{i}]")))
        .collect()
}

#[derive(InputObject)]
pub struct GeoTrajetoriaInput {
    pub aplicacao_id: ID,
    pub ponto_inicial: GeoPointInput,
    pub ponto_final: Option<GeoPointInput>,
    pub trajetoria: Option<Vec<GeoPointInput>>,
    pub area_cobertura: Option<f64>,
    pub distancia_percorrida: Option<f64>,
}

impl GeoTrajetoriaInput {
    pub fn decode(self, policy: DateTimeParsePolicy) -> Result<CreateGeoTrajetoria, GqlError> {
        Ok(CreateGeoTrajetoria {
            aplicacao_id: parse_object_id(&self.aplicacao_id)?,
            ponto_inicial: self.ponto_inicial.decode(policy, "pontoInicial")?,
            ponto_final: self
                .ponto_final
                .map(|p| p.decode(policy, "pontoFinal"))
                .transpose()?,
            trajetoria: decode_points(policy, "trajetoria", self.trajetoria.unwrap_or_default())?,
            area_cobertura: finite("areaCobertura", self.area_cobertura.unwrap_or(0.0))?,
            distancia_percorrida: finite(
                "distanciaPercorrida",
                self.distancia_percorrida.unwrap_or(0.0),
            )?,
        })
    }
}

/// Sparse update. `novosPontos` are appended to the stored point list;
/// `pontoFinal: null` removes the final point.
#[derive(InputObject, Default)]
pub struct GeoTrajetoriaUpdateInput {
    pub ponto_final: MaybeUndefined<GeoPointInput>,
    pub area_cobertura: MaybeUndefined<f64>,
    pub distancia_percorrida: MaybeUndefined<f64>,
    pub novos_pontos: MaybeUndefined<Vec<GeoPointInput>>,
}

impl GeoTrajetoriaUpdateInput {
    pub fn decode(self, policy: DateTimeParsePolicy) -> Result<UpdateGeoTrajetoria, GqlError> {
        let ponto_final = match clearable(self.ponto_final) {
            Patch::Keep => Patch::Keep,
            Patch::Clear => Patch::Clear,
            Patch::Set(p) => Patch::Set(p.decode(policy, "pontoFinal")?),
        };

        Ok(UpdateGeoTrajetoria {
            ponto_final,
            area_cobertura: present("areaCobertura", self.area_cobertura)?
                .map(|v| finite("areaCobertura", v))
                .transpose()?,
            distancia_percorrida: present("distanciaPercorrida", self.distancia_percorrida)?
                .map(|v| finite("distanciaPercorrida", v))
                .transpose()?,
            novos_pontos: decode_points(
                policy,
                "novosPontos",
                present("novosPontos", self.novos_pontos)?.unwrap_or_default(),
            )?,
        })
    }
}
