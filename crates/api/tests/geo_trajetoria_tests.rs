mod common;

use common::*;
use serde_json::{json, Value};

const TRAJETORIA_FIELDS: &str = r#"
    id aplicacaoId areaCobertura distanciaPercorrida createdAt
    pontoInicial { latitude longitude timestamp altitude speed accuracy }
    pontoFinal { latitude longitude timestamp }
    trajetoria { latitude longitude timestamp speed }
"#;

fn update_mutation() -> String {
    format!(
        "mutation Update($id: ID!, $input: GeoTrajetoriaUpdateInput!) {{
            updateGeoTrajetoria(id: $id, input: $input) {{ {TRAJETORIA_FIELDS} }}
        }}"
    )
}

async fn update(schema: &api::gql::AppSchema, id: &str, input: Value) -> Value {
    let data = execute_ok(schema, &update_mutation(), json!({ "id": id, "input": input })).await;
    data["updateGeoTrajetoria"].clone()
}

#[tokio::test]
async fn test_create_applies_defaults() {
    let schema = setup_schema();
    let aplicacao_id = missing_id();

    let data = execute_ok(
        &schema,
        &format!(
            "mutation Create($input: GeoTrajetoriaInput!) {{
                createGeoTrajetoria(input: $input) {{ {TRAJETORIA_FIELDS} }}
            }}"
        ),
        json!({
            "input": {
                "aplicacaoId": aplicacao_id,
                "pontoInicial": {
                    "latitude": -25.2637,
                    "longitude": -51.3005,
                    "timestamp": "2024-03-05T08:00:00-03:00",
                    "speed": 0.0
                }
            }
        }),
    )
    .await;

    let trajetoria = &data["createGeoTrajetoria"];
    assert_eq!(trajetoria["aplicacaoId"], aplicacao_id);
    assert_eq!(trajetoria["trajetoria"], json!([]));
    assert!(trajetoria["pontoFinal"].is_null());
    assert_eq!(trajetoria["areaCobertura"], 0.0);
    assert_eq!(trajetoria["distanciaPercorrida"], 0.0);

    let inicial = &trajetoria["pontoInicial"];
    assert_eq!(inicial["timestamp"], "2024-03-05T11:00:00Z");
    assert_eq!(inicial["speed"], 0.0);
    assert!(inicial["altitude"].is_null());
    assert!(inicial["accuracy"].is_null());
}

#[tokio::test]
async fn test_points_are_appended_in_order() {
    let schema = setup_schema();
    let id = create_test_trajetoria(&schema, &missing_id()).await;

    update(
        &schema,
        &id,
        json!({
            "novosPontos": [
                point(-25.2640, -51.3010, "2024-03-05T08:01:00Z"),
                point(-25.2643, -51.3015, "2024-03-05T08:02:00Z")
            ]
        }),
    )
    .await;
    let trajetoria = update(
        &schema,
        &id,
        json!({ "novosPontos": [point(-25.2646, -51.3020, "2024-03-05T08:03:00Z")] }),
    )
    .await;

    let timestamps: Vec<&str> = trajetoria["trajetoria"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["timestamp"].as_str().unwrap())
        .collect();
    assert_eq!(
        timestamps,
        vec![
            "2024-03-05T08:01:00Z",
            "2024-03-05T08:02:00Z",
            "2024-03-05T08:03:00Z"
        ]
    );
    assert_eq!(trajetoria["pontoInicial"]["latitude"], -25.2637);
}

#[tokio::test]
async fn test_ponto_final_is_set_replaced_and_cleared() {
    let schema = setup_schema();
    let id = create_test_trajetoria(&schema, &missing_id()).await;

    let set = update(
        &schema,
        &id,
        json!({
            "pontoFinal": point(-25.2700, -51.3100, "2024-03-05T11:30:00Z"),
            "areaCobertura": 45.5,
            "distanciaPercorrida": 12800.0
        }),
    )
    .await;
    assert_eq!(set["pontoFinal"]["latitude"], -25.27);
    assert_eq!(set["areaCobertura"], 45.5);

    let replaced = update(
        &schema,
        &id,
        json!({ "pontoFinal": point(-25.2710, -51.3110, "2024-03-05T11:45:00Z") }),
    )
    .await;
    assert_eq!(replaced["pontoFinal"]["timestamp"], "2024-03-05T11:45:00Z");
    assert_eq!(replaced["distanciaPercorrida"], 12800.0);

    let cleared = update(&schema, &id, json!({ "pontoFinal": null })).await;
    assert!(cleared["pontoFinal"].is_null());
    assert_eq!(cleared["areaCobertura"], 45.5);
}

#[tokio::test]
async fn test_null_area_is_malformed() {
    let schema = setup_schema();
    let id = create_test_trajetoria(&schema, &missing_id()).await;

    let message = execute_err(
        &schema,
        &update_mutation(),
        json!({ "id": id, "input": { "areaCobertura": null } }),
    )
    .await;

    assert_eq!(
        message,
        "Malformed input for field 'areaCobertura': cannot be null"
    );
}

#[tokio::test]
async fn test_update_of_missing_trajetoria_returns_null() {
    let schema = setup_schema();

    let trajetoria = update(
        &schema,
        &missing_id(),
        json!({ "novosPontos": [point(-25.0, -51.0, "2024-03-05T08:00:00Z")] }),
    )
    .await;

    assert!(trajetoria.is_null());
}

#[tokio::test]
async fn test_list_is_newest_first_before_windowing() {
    let schema = setup_schema();
    let mut ids = Vec::new();
    for _ in 0..4 {
        ids.push(create_test_trajetoria(&schema, &missing_id()).await);
    }

    let data = execute_ok(
        &schema,
        r#"
        query {
            first: geoTrajetorias(limit: 2) { id }
            second: geoTrajetorias(limit: 2, offset: 2) { id }
        }
        "#,
        json!({}),
    )
    .await;

    let listed: Vec<&str> = ["first", "second"]
        .iter()
        .flat_map(|page| data[*page].as_array().unwrap())
        .map(|t| t["id"].as_str().unwrap())
        .collect();
    let newest_first: Vec<&str> = ids.iter().rev().map(String::as_str).collect();
    assert_eq!(listed, newest_first);
}

#[tokio::test]
async fn test_lookup_by_aplicacao_returns_latest() {
    let schema = setup_schema();
    let aplicacao_id = missing_id();
    create_test_trajetoria(&schema, &aplicacao_id).await;
    let latest = create_test_trajetoria(&schema, &aplicacao_id).await;
    create_test_trajetoria(&schema, &missing_id()).await;

    let query = r#"
        query ByAplicacao($id: ID!) {
            geoTrajetoriaPorAplicacao(aplicacaoId: $id) { id }
        }
    "#;
    let data = execute_ok(&schema, query, json!({ "id": aplicacao_id })).await;
    assert_eq!(data["geoTrajetoriaPorAplicacao"]["id"], latest);

    let none = execute_ok(&schema, query, json!({ "id": missing_id() })).await;
    assert!(none["geoTrajetoriaPorAplicacao"].is_null());
}

#[tokio::test]
async fn test_delete_trajetoria() {
    let schema = setup_schema();
    let id = create_test_trajetoria(&schema, &missing_id()).await;
    let mutation = "mutation Delete($id: ID!) { deleteGeoTrajetoria(id: $id) }";

    let first = execute_ok(&schema, mutation, json!({ "id": id })).await;
    let second = execute_ok(&schema, mutation, json!({ "id": id })).await;

    assert_eq!(first["deleteGeoTrajetoria"], true);
    assert_eq!(second["deleteGeoTrajetoria"], false);
}
