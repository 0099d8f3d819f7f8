use async_graphql::{Context, Object, Result, ID};
use infra::repos::{equipamentos, CreateEquipamento, UpdateEquipamento};

use super::types::{Equipamento, EquipamentoInput, EquipamentoUpdateInput};
use crate::gql::common::helpers::{page, scoped_db};
use crate::gql::error::StoreResultExt;
use crate::gql::input::parse_object_id;

#[derive(Default)]
pub struct EquipamentoQuery;

#[Object]
impl EquipamentoQuery {
    async fn equipamento(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Equipamento>> {
        let id = parse_object_id(&id)?;
        let db = scoped_db(ctx)?;
        Ok(equipamentos::get_by_id(&db, id)
            .await
            .sanitized()?
            .map(Equipamento::from))
    }

    async fn equipamentos(
        &self,
        ctx: &Context<'_>,
        #[graphql(default = 10)] limit: Option<i32>,
        #[graphql(default = 0)] offset: Option<i32>,
    ) -> Result<Vec<Equipamento>> {
        let page = page(ctx, limit, offset)?;
        let db = scoped_db(ctx)?;
        let docs = equipamentos::list(&db, page).await.sanitized()?;
        Ok(docs.into_iter().map(Equipamento::from).collect())
    }
}

#[derive(Default)]
pub struct EquipamentoMutation;

#[Object]
impl EquipamentoMutation {
    async fn create_equipamento(
        &self,
        ctx: &Context<'_>,
        input: EquipamentoInput,
    ) -> Result<Equipamento> {
        let data = CreateEquipamento::try_from(input)?;
        let db = scoped_db(ctx)?;
        let equipamento = equipamentos::create(&db, data).await.sanitized()?;
        tracing::info!(id = %equipamento.id, "equipamento created");
        Ok(equipamento.into())
    }

    async fn update_equipamento(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: EquipamentoUpdateInput,
    ) -> Result<Option<Equipamento>> {
        let id = parse_object_id(&id)?;
        let data = UpdateEquipamento::try_from(input)?;
        let db = scoped_db(ctx)?;
        Ok(equipamentos::update(&db, id, data)
            .await
            .sanitized()?
            .map(Equipamento::from))
    }

    async fn delete_equipamento(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let id = parse_object_id(&id)?;
        let db = scoped_db(ctx)?;
        Ok(equipamentos::delete(&db, id).await.sanitized()?)
    }
}
