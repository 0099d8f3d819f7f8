use async_graphql::{Context, Object, Result, ID};
use infra::repos::{tipos_aplicacao, CreateTipoAplicacao, UpdateTipoAplicacao};

use super::types::{TipoAplicacao, TipoAplicacaoInput, TipoAplicacaoUpdateInput};
use crate::gql::common::helpers::{page, scoped_db};
use crate::gql::error::StoreResultExt;
use crate::gql::input::parse_object_id;

#[derive(Default)]
pub struct TipoAplicacaoQuery;

#[Object]
impl TipoAplicacaoQuery {
    async fn tipo_aplicacao(&self, ctx: &Context<'_>, id: ID) -> Result<Option<TipoAplicacao>> {
        let id = parse_object_id(&id)?;
        let db = scoped_db(ctx)?;
        Ok(tipos_aplicacao::get_by_id(&db, id)
            .await
            .sanitized()?
            .map(TipoAplicacao::from))
    }

    async fn tipos_aplicacao(
        &self,
        ctx: &Context<'_>,
        #[graphql(default = 10)] limit: Option<i32>,
        #[graphql(default = 0)] offset: Option<i32>,
    ) -> Result<Vec<TipoAplicacao>> {
        let page = page(ctx, limit, offset)?;
        let db = scoped_db(ctx)?;
        let docs = tipos_aplicacao::list(&db, page).await.sanitized()?;
        Ok(docs.into_iter().map(TipoAplicacao::from).collect())
    }
}

#[derive(Default)]
pub struct TipoAplicacaoMutation;

#[Object]
impl TipoAplicacaoMutation {
    async fn create_tipo_aplicacao(
        &self,
        ctx: &Context<'_>,
        input: TipoAplicacaoInput,
    ) -> Result<TipoAplicacao> {
        let data = CreateTipoAplicacao::try_from(input)?;
        let db = scoped_db(ctx)?;
        let tipo = tipos_aplicacao::create(&db, data).await.sanitized()?;
        tracing::info!(id = %tipo.id, "tipo de aplicacao created");
        Ok(tipo.into())
    }

    async fn update_tipo_aplicacao(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: TipoAplicacaoUpdateInput,
    ) -> Result<Option<TipoAplicacao>> {
        let id = parse_object_id(&id)?;
        let data = UpdateTipoAplicacao::try_from(input)?;
        let db = scoped_db(ctx)?;
        Ok(tipos_aplicacao::update(&db, id, data)
            .await
            .sanitized()?
            .map(TipoAplicacao::from))
    }

    async fn delete_tipo_aplicacao(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let id = parse_object_id(&id)?;
        let db = scoped_db(ctx)?;
        Ok(tipos_aplicacao::delete(&db, id).await.sanitized()?)
    }
}
