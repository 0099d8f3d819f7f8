use async_graphql::{InputObject, MaybeUndefined, SimpleObject, ID};
use infra::models::TalhaoDoc;
use infra::repos::{CreateTalhao, UpdateTalhao};

use crate::gql::error::GqlError;
use crate::gql::input::{finite, present};
use crate::gql::scalars::DateTime;

/// A cultivated plot.
#[derive(SimpleObject, Clone)]
pub struct Talhao {
    pub id: ID,
    pub nome: String,
    pub area_hectares: f64,
    pub cultura: String,
    pub variedade: String,
    pub coordenadas_geograficas: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl From<TalhaoDoc> for Talhao {
    fn from(doc: TalhaoDoc) -> Self {
        Self {
            id: doc.id.to_hex().into(),
            nome: doc.nome,
            area_hectares: doc.area_hectares,
            cultura: doc.cultura,
            variedade: doc.variedade,
            coordenadas_geograficas: doc.coordenadas_geograficas,
            created_at: doc.created_at.into(),
            updated_at: doc.updated_at.into(),
        }
    }
}

#[derive(InputObject)]
pub struct TalhaoInput {
    pub nome: String,
    pub area_hectares: f64,
    pub cultura: String,
    pub variedade: String,
    pub coordenadas_geograficas: String,
}

impl TryFrom<TalhaoInput> for CreateTalhao {
    type Error = GqlError;

    fn try_from(input: TalhaoInput) -> Result<Self, GqlError> {
        Ok(Self {
            nome: input.nome,
            area_hectares: finite("areaHectares", input.area_hectares)?,
            cultura: input.cultura,
            variedade: input.variedade,
            coordenadas_geograficas: input.coordenadas_geograficas,
        })
    }
}

#[derive(InputObject, Default)]
pub struct TalhaoUpdateInput {
    pub nome: MaybeUndefined<String>,
    pub area_hectares: MaybeUndefined<f64>,
    pub cultura: MaybeUndefined<String>,
    pub variedade: MaybeUndefined<String>,
    pub coordenadas_geograficas: MaybeUndefined<String>,
}

impl TryFrom<TalhaoUpdateInput> for UpdateTalhao {
    type Error = GqlError;

    fn try_from(input: TalhaoUpdateInput) -> Result<Self, GqlError> {
        Ok(Self {
            nome: present("nome", input.nome)?,
            area_hectares: present("areaHectares", input.area_hectares)?
                .map(|v| finite("areaHectares", v))
                .transpose()?,
            cultura: present("cultura", input.cultura)?,
            variedade: present("variedade", input.variedade)?,
            coordenadas_geograficas: present(
                "coordenadasGeograficas",
                input.coordenadas_geograficas,
            )?,
        })
    }
}
