#![allow(dead_code)]

use std::sync::Arc;

use api::config::DateTimeParsePolicy;
use api::gql::{build_schema, AppSchema};
use api::{AppConfig, AppState};
use async_graphql::{Request, Variables};
use infra::store::MemoryStore;
use infra::Db;
use serde_json::{json, Value};

pub fn test_config() -> AppConfig {
    AppConfig {
        introspection: true,
        ..AppConfig::default()
    }
}

/// State over a fresh in-memory store.
pub fn setup_test_state() -> AppState {
    setup_test_state_with(test_config())
}

pub fn setup_test_state_with(config: AppConfig) -> AppState {
    AppState::new(Db::new(Arc::new(MemoryStore::new())), config)
}

pub fn setup_schema() -> AppSchema {
    build_schema(setup_test_state())
}

pub fn setup_lenient_schema() -> AppSchema {
    build_schema(setup_test_state_with(AppConfig {
        datetime_policy: DateTimeParsePolicy::Lenient,
        ..test_config()
    }))
}

/// Helper function to execute GraphQL queries and mutations
pub async fn execute_graphql(
    schema: &AppSchema,
    query: &str,
    variables: Option<Variables>,
) -> async_graphql::Response {
    let mut request = Request::new(query);

    if let Some(vars) = variables {
        request = request.variables(vars);
    }

    schema.execute(request).await
}

/// Executes and returns `data` as JSON, panicking on GraphQL errors.
pub async fn execute_ok(schema: &AppSchema, query: &str, variables: Value) -> Value {
    let response = execute_graphql(schema, query, Some(Variables::from_json(variables))).await;
    assert!(
        response.errors.is_empty(),
        "GraphQL errors: {:?}",
        response.errors
    );
    response.data.into_json().expect("data is valid JSON")
}

/// Executes and returns the first error message, panicking if there is none.
pub async fn execute_err(schema: &AppSchema, query: &str, variables: Value) -> String {
    let response = execute_graphql(schema, query, Some(Variables::from_json(variables))).await;
    assert!(
        !response.errors.is_empty(),
        "expected an error, got data: {:?}",
        response.data
    );
    response.errors[0].message.clone()
}

pub async fn create_test_talhao(schema: &AppSchema, nome: &str) -> String {
    let data = execute_ok(
        schema,
        r#"
        mutation CreateTalhao($input: TalhaoInput!) {
            createTalhao(input: $input) { id }
        }
        "#,
        json!({
            "input": {
                "nome": nome,
                "areaHectares": 45.5,
                "cultura": "Soja",
                "variedade": "BMX Potência RR",
                "coordenadasGeograficas": "-25.2637,-51.3005"
            }
        }),
    )
    .await;
    data["createTalhao"]["id"].as_str().unwrap().to_string()
}

pub async fn create_test_equipamento(schema: &AppSchema, nome: &str) -> String {
    let data = execute_ok(
        schema,
        r#"
        mutation CreateEquipamento($input: EquipamentoInput!) {
            createEquipamento(input: $input) { id }
        }
        "#,
        json!({
            "input": {
                "nome": nome,
                "modelo": "Uniport 3030",
                "fabricante": "Jacto",
                "anoFabricacao": 2023,
                "larguraBarra": 30.0,
                "capacidadeTanque": 3000.0,
                "numeroSerie": "JAC2023001"
            }
        }),
    )
    .await;
    data["createEquipamento"]["id"].as_str().unwrap().to_string()
}

pub async fn create_test_tipo_aplicacao(schema: &AppSchema, nome: &str) -> String {
    let data = execute_ok(
        schema,
        r#"
        mutation CreateTipo($input: TipoAplicacaoInput!) {
            createTipoAplicacao(input: $input) { id }
        }
        "#,
        json!({
            "input": {
                "nome": nome,
                "descricao": "Aplicação para controle de plantas daninhas",
                "vazaoPadrao": 150.0,
                "tipoProduto": "Herbicida",
                "unidadeMedida": "L/ha"
            }
        }),
    )
    .await;
    data["createTipoAplicacao"]["id"].as_str().unwrap().to_string()
}

pub struct TestRefs {
    pub talhao_id: String,
    pub equipamento_id: String,
    pub tipo_aplicacao_id: String,
}

pub async fn create_test_refs(schema: &AppSchema) -> TestRefs {
    TestRefs {
        talhao_id: create_test_talhao(schema, "Talhão Norte").await,
        equipamento_id: create_test_equipamento(schema, "Pulverizador Autopropelido").await,
        tipo_aplicacao_id: create_test_tipo_aplicacao(schema, "Herbicida Pré-emergente").await,
    }
}

pub fn aplicacao_input(refs: &TestRefs) -> Value {
    json!({
        "talhaoId": refs.talhao_id,
        "equipamentoId": refs.equipamento_id,
        "tipoAplicacaoId": refs.tipo_aplicacao_id,
        "dataInicio": "2024-03-05T08:00:00Z",
        "dosagem": 2.5,
        "operador": "João Silva",
        "condicaoClimatica": "Ensolarado, 25°C, vento 5 km/h"
    })
}

pub async fn create_test_aplicacao(schema: &AppSchema, input: Value) -> String {
    let data = execute_ok(
        schema,
        r#"
        mutation CreateAplicacao($input: AplicacaoInput!) {
            createAplicacao(input: $input) { id }
        }
        "#,
        json!({ "input": input }),
    )
    .await;
    data["createAplicacao"]["id"].as_str().unwrap().to_string()
}

pub fn point(latitude: f64, longitude: f64, timestamp: &str) -> Value {
    json!({
        "latitude": latitude,
        "longitude": longitude,
        "timestamp": timestamp,
    })
}

pub async fn create_test_trajetoria(schema: &AppSchema, aplicacao_id: &str) -> String {
    let data = execute_ok(
        schema,
        r#"
        mutation CreateTrajetoria($input: GeoTrajetoriaInput!) {
            createGeoTrajetoria(input: $input) { id }
        }
        "#,
        json!({
            "input": {
                "aplicacaoId": aplicacao_id,
                "pontoInicial": point(-25.2637, -51.3005, "2024-03-05T08:00:00Z")
            }
        }),
    )
    .await;
    data["createGeoTrajetoria"]["id"].as_str().unwrap().to_string()
}

/// A well-formed id no document uses.
pub fn missing_id() -> String {
    bson::oid::ObjectId::new().to_hex()
}
