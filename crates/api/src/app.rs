use std::time::Duration;

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    http::{
        header::{HeaderValue, CONTENT_TYPE, LOCATION},
        Method, StatusCode,
    },
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use infra::Deadline;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::error::AppError;
use crate::gql::AppSchema;
use crate::state::AppState;

const GRAPHQL_PATH: &str = "/graphql";

/// Build the Axum router: GraphQL on POST, GraphiQL on GET, plus a health
/// probe and a redirect from `/`.
pub fn build_router(state: AppState, schema: AppSchema) -> Router {
    let request_timeout = state.config().request_timeout;
    let cors = cors_layer(&state.config().allowed_origins);

    Router::new()
        .route("/", get(root))
        // Simple liveness check; also proves store connectivity.
        .route("/health", get(health))
        .route(
            GRAPHQL_PATH,
            get(graphiql).post(move |state: State<AppState>, req: GraphQLRequest| {
                graphql_handler(state, req, schema.clone())
            }),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(cors)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(3600));

    if allowed_origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    base.allow_origin(origins)
}

/// Executes one GraphQL request. Every store call it triggers shares a
/// deadline of `REQUEST_TIMEOUT_SECS` from now.
async fn graphql_handler(
    State(state): State<AppState>,
    req: GraphQLRequest,
    schema: AppSchema,
) -> GraphQLResponse {
    let deadline = Deadline::after(state.config().request_timeout);
    let request = req.into_inner().data(deadline);
    schema.execute(request).await.into()
}

async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint(GRAPHQL_PATH).finish())
}

async fn root() -> impl IntoResponse {
    (StatusCode::FOUND, [(LOCATION, GRAPHQL_PATH)])
}

/// Liveness + quick store probe.
async fn health(State(state): State<AppState>) -> Result<&'static str, AppError> {
    let deadline = Deadline::after(state.config().request_timeout);
    state.db.scoped(deadline).ping().await?;
    Ok("ok")
}
