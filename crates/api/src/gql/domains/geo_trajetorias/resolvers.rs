use async_graphql::{Context, Object, Result, ID};
use infra::repos::geo_trajetorias;

use super::types::{GeoTrajetoria, GeoTrajetoriaInput, GeoTrajetoriaUpdateInput};
use crate::gql::common::helpers::{datetime_policy, page, scoped_db};
use crate::gql::error::StoreResultExt;
use crate::gql::input::parse_object_id;

#[derive(Default)]
pub struct GeoTrajetoriaQuery;

#[Object]
impl GeoTrajetoriaQuery {
    async fn geo_trajetoria(&self, ctx: &Context<'_>, id: ID) -> Result<Option<GeoTrajetoria>> {
        let id = parse_object_id(&id)?;
        let db = scoped_db(ctx)?;
        Ok(geo_trajetorias::get_by_id(&db, id)
            .await
            .sanitized()?
            .map(GeoTrajetoria::from))
    }

    /// Newest trajectories first.
    async fn geo_trajetorias(
        &self,
        ctx: &Context<'_>,
        #[graphql(default = 10)] limit: Option<i32>,
        #[graphql(default = 0)] offset: Option<i32>,
    ) -> Result<Vec<GeoTrajetoria>> {
        let page = page(ctx, limit, offset)?;
        let db = scoped_db(ctx)?;
        let docs = geo_trajetorias::list(&db, page).await.sanitized()?;
        Ok(docs.into_iter().map(GeoTrajetoria::from).collect())
    }

    /// Most recent trajectory recorded for an application.
    async fn geo_trajetoria_por_aplicacao(
        &self,
        ctx: &Context<'_>,
        aplicacao_id: ID,
    ) -> Result<Option<GeoTrajetoria>> {
        let aplicacao_id = parse_object_id(&aplicacao_id)?;
        let db = scoped_db(ctx)?;
        Ok(geo_trajetorias::get_latest_by_aplicacao(&db, aplicacao_id)
            .await
            .sanitized()?
            .map(GeoTrajetoria::from))
    }
}

#[derive(Default)]
pub struct GeoTrajetoriaMutation;

#[Object]
impl GeoTrajetoriaMutation {
    async fn create_geo_trajetoria(
        &self,
        ctx: &Context<'_>,
        input: GeoTrajetoriaInput,
    ) -> Result<GeoTrajetoria> {
        let data = input.decode(datetime_policy(ctx)?)?;
        let db = scoped_db(ctx)?;
        let trajetoria = geo_trajetorias::create(&db, data).await.sanitized()?;
        tracing::info!(
            id = %trajetoria.id,
            aplicacao_id = %trajetoria.aplicacao_id,
            pontos = trajetoria.trajetoria.len(),
            "geo trajetoria created"
        );
        Ok(trajetoria.into())
    }

    /// Appends `novosPontos` and sets or clears the other supplied fields.
    /// Returns null when no trajectory has the given id.
    async fn update_geo_trajetoria(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: GeoTrajetoriaUpdateInput,
    ) -> Result<Option<GeoTrajetoria>> {
        let id = parse_object_id(&id)?;
        let data = input.decode(datetime_policy(ctx)?)?;
        let db = scoped_db(ctx)?;
        Ok(geo_trajetorias::update(&db, id, data)
            .await
            .sanitized()?
            .map(GeoTrajetoria::from))
    }

    async fn delete_geo_trajetoria(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let id = parse_object_id(&id)?;
        let db = scoped_db(ctx)?;
        Ok(geo_trajetorias::delete(&db, id).await.sanitized()?)
    }
}
