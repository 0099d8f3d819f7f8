use async_graphql::{Context, Object, Result, ID};
use infra::repos::aplicacoes;

use super::types::{Aplicacao, AplicacaoInput, AplicacaoUpdateInput};
use crate::gql::common::helpers::{datetime_policy, page, scoped_db};
use crate::gql::error::StoreResultExt;
use crate::gql::input::parse_object_id;

#[derive(Default)]
pub struct AplicacaoQuery;

#[Object]
impl AplicacaoQuery {
    /// Application with its plot, equipment and application type attached.
    async fn aplicacao(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Aplicacao>> {
        let id = parse_object_id(&id)?;
        let db = scoped_db(ctx)?;
        Ok(aplicacoes::get_by_id(&db, id)
            .await
            .sanitized()?
            .map(Aplicacao::from))
    }

    async fn aplicacoes(
        &self,
        ctx: &Context<'_>,
        #[graphql(default = 10)] limit: Option<i32>,
        #[graphql(default = 0)] offset: Option<i32>,
    ) -> Result<Vec<Aplicacao>> {
        let page = page(ctx, limit, offset)?;
        let db = scoped_db(ctx)?;
        let docs = aplicacoes::list(&db, page).await.sanitized()?;
        Ok(docs.into_iter().map(Aplicacao::from).collect())
    }
}

#[derive(Default)]
pub struct AplicacaoMutation;

#[Object]
impl AplicacaoMutation {
    async fn create_aplicacao(&self, ctx: &Context<'_>, input: AplicacaoInput) -> Result<Aplicacao> {
        let data = input.decode(datetime_policy(ctx)?)?;
        let db = scoped_db(ctx)?;
        let aplicacao = aplicacoes::create(&db, data).await.sanitized()?;
        tracing::info!(
            id = %aplicacao.id,
            talhao_id = %aplicacao.talhao_id,
            "aplicacao created"
        );
        Ok(aplicacao.into())
    }

    async fn update_aplicacao(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: AplicacaoUpdateInput,
    ) -> Result<Option<Aplicacao>> {
        let id = parse_object_id(&id)?;
        let data = input.decode(datetime_policy(ctx)?)?;
        let finishing = data.finalizada == Some(true);
        let db = scoped_db(ctx)?;

        let updated = aplicacoes::update(&db, id, data).await.sanitized()?;
        if finishing && updated.is_some() {
            tracing::info!(id = %id, "aplicacao finalizada");
        }
        Ok(updated.map(Aplicacao::from))
    }

    async fn delete_aplicacao(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let id = parse_object_id(&id)?;
        let db = scoped_db(ctx)?;
        Ok(aplicacoes::delete(&db, id).await.sanitized()?)
    }
}
