use async_graphql::{Context, Object, Result, ID};
use infra::repos::{talhoes, CreateTalhao, UpdateTalhao};

use super::types::{Talhao, TalhaoInput, TalhaoUpdateInput};
use crate::gql::common::helpers::{page, scoped_db};
use crate::gql::error::StoreResultExt;
use crate::gql::input::parse_object_id;

#[derive(Default)]
pub struct TalhaoQuery;

#[Object]
impl TalhaoQuery {
    async fn talhao(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Talhao>> {
        let id = parse_object_id(&id)?;
        let db = scoped_db(ctx)?;
        Ok(talhoes::get_by_id(&db, id).await.sanitized()?.map(Talhao::from))
    }

    async fn talhoes(
        &self,
        ctx: &Context<'_>,
        #[graphql(default = 10)] limit: Option<i32>,
        #[graphql(default = 0)] offset: Option<i32>,
    ) -> Result<Vec<Talhao>> {
        let page = page(ctx, limit, offset)?;
        let db = scoped_db(ctx)?;
        let docs = talhoes::list(&db, page).await.sanitized()?;
        Ok(docs.into_iter().map(Talhao::from).collect())
    }
}

#[derive(Default)]
pub struct TalhaoMutation;

#[Object]
impl TalhaoMutation {
    async fn create_talhao(&self, ctx: &Context<'_>, input: TalhaoInput) -> Result<Talhao> {
        let data = CreateTalhao::try_from(input)?;
        let db = scoped_db(ctx)?;
        let talhao = talhoes::create(&db, data).await.sanitized()?;
        tracing::info!(id = %talhao.id, "talhao created");
        Ok(talhao.into())
    }

    async fn update_talhao(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: TalhaoUpdateInput,
    ) -> Result<Option<Talhao>> {
        let id = parse_object_id(&id)?;
        let data = UpdateTalhao::try_from(input)?;
        let db = scoped_db(ctx)?;
        Ok(talhoes::update(&db, id, data).await.sanitized()?.map(Talhao::from))
    }

    async fn delete_talhao(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let id = parse_object_id(&id)?;
        let db = scoped_db(ctx)?;
        Ok(talhoes::delete(&db, id).await.sanitized()?)
    }
}
