use async_graphql::Context;
use infra::pagination::LimitOffset;
use infra::{Db, Deadline};

use crate::config::DateTimeParsePolicy;
use crate::state::AppState;

/// Store handle for this request, bounded by the request deadline when the
/// transport supplied one.
pub fn scoped_db(ctx: &Context<'_>) -> async_graphql::Result<Db> {
    let state = ctx.data::<AppState>()?;
    Ok(match ctx.data_opt::<Deadline>() {
        Some(deadline) => state.db.scoped(*deadline),
        None => state.db.clone(),
    })
}

/// Page window from optional list arguments, bounded by `MAX_PAGE_SIZE`.
pub fn page(
    ctx: &Context<'_>,
    limit: Option<i32>,
    offset: Option<i32>,
) -> async_graphql::Result<LimitOffset> {
    let state = ctx.data::<AppState>()?;
    Ok(LimitOffset::bounded(
        limit.map(i64::from),
        offset.map(i64::from),
        state.config().max_page_size,
    ))
}

pub fn datetime_policy(ctx: &Context<'_>) -> async_graphql::Result<DateTimeParsePolicy> {
    Ok(ctx.data::<AppState>()?.config().datetime_policy)
}
