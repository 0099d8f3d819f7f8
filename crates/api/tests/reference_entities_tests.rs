mod common;

use common::*;
use serde_json::json;

#[tokio::test]
async fn test_talhao_roundtrip_through_schema() {
    let schema = setup_schema();
    let id = create_test_talhao(&schema, "Talhão Sul").await;

    let data = execute_ok(
        &schema,
        r#"
        query Talhao($id: ID!) {
            talhao(id: $id) {
                id nome areaHectares cultura variedade coordenadasGeograficas createdAt updatedAt
            }
        }
        "#,
        json!({ "id": id }),
    )
    .await;

    let talhao = &data["talhao"];
    assert_eq!(talhao["id"], id);
    assert_eq!(talhao["nome"], "Talhão Sul");
    assert_eq!(talhao["areaHectares"], 45.5);
    assert!(talhao["createdAt"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_unknown_id_returns_null() {
    let schema = setup_schema();

    let data = execute_ok(
        &schema,
        r#"
        query Get($id: ID!) {
            talhao(id: $id) { id }
            equipamento(id: $id) { id }
            tipoAplicacao(id: $id) { id }
        }
        "#,
        json!({ "id": missing_id() }),
    )
    .await;

    assert!(data["talhao"].is_null());
    assert!(data["equipamento"].is_null());
    assert!(data["tipoAplicacao"].is_null());
}

#[tokio::test]
async fn test_malformed_id_is_rejected() {
    let schema = setup_schema();

    let message = execute_err(
        &schema,
        "query { talhao(id: \"12345\") { id } }",
        json!({}),
    )
    .await;

    assert!(
        message.starts_with("Invalid ID: "),
        "unexpected message: {message}"
    );
}

#[tokio::test]
async fn test_sparse_update_changes_only_supplied_fields() {
    let schema = setup_schema();
    let id = create_test_equipamento(&schema, "Pulverizador de Arrasto").await;

    let data = execute_ok(
        &schema,
        r#"
        mutation Update($id: ID!, $input: EquipamentoUpdateInput!) {
            updateEquipamento(id: $id, input: $input) {
                nome modelo anoFabricacao capacidadeTanque createdAt updatedAt
            }
        }
        "#,
        json!({ "id": id, "input": { "capacidadeTanque": 3500.0 } }),
    )
    .await;

    let equipamento = &data["updateEquipamento"];
    assert_eq!(equipamento["nome"], "Pulverizador de Arrasto");
    assert_eq!(equipamento["modelo"], "Uniport 3030");
    assert_eq!(equipamento["anoFabricacao"], 2023);
    assert_eq!(equipamento["capacidadeTanque"], 3500.0);
}

#[tokio::test]
async fn test_null_on_required_field_is_malformed() {
    let schema = setup_schema();
    let id = create_test_tipo_aplicacao(&schema, "Fungicida").await;

    let message = execute_err(
        &schema,
        r#"
        mutation Update($id: ID!, $input: TipoAplicacaoUpdateInput!) {
            updateTipoAplicacao(id: $id, input: $input) { id }
        }
        "#,
        json!({ "id": id, "input": { "nome": null } }),
    )
    .await;

    assert_eq!(message, "Malformed input for field 'nome': cannot be null");
}

#[tokio::test]
async fn test_update_of_missing_returns_null() {
    let schema = setup_schema();

    let data = execute_ok(
        &schema,
        r#"
        mutation Update($id: ID!) {
            updateTalhao(id: $id, input: { cultura: "Milho" }) { id }
        }
        "#,
        json!({ "id": missing_id() }),
    )
    .await;

    assert!(data["updateTalhao"].is_null());
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let schema = setup_schema();
    let id = create_test_talhao(&schema, "Talhão Leste").await;
    let mutation = r#"
        mutation Delete($id: ID!) { deleteTalhao(id: $id) }
    "#;

    let first = execute_ok(&schema, mutation, json!({ "id": id })).await;
    let second = execute_ok(&schema, mutation, json!({ "id": id })).await;

    assert_eq!(first["deleteTalhao"], true);
    assert_eq!(second["deleteTalhao"], false);
}

#[tokio::test]
async fn test_list_defaults_and_clamping() {
    let schema = setup_schema();
    for n in 0..12 {
        create_test_talhao(&schema, &format!("Talhão {n}")).await;
    }

    let data = execute_ok(
        &schema,
        r#"
        query {
            defaults: talhoes { nome }
            huge: talhoes(limit: 5000) { nome }
            zero: talhoes(limit: 0) { nome }
            negative: talhoes(limit: 2, offset: -7) { nome }
            tail: talhoes(limit: 5, offset: 10) { nome }
        }
        "#,
        json!({}),
    )
    .await;

    assert_eq!(data["defaults"].as_array().unwrap().len(), 10);
    assert_eq!(data["huge"].as_array().unwrap().len(), 12);
    assert_eq!(data["zero"].as_array().unwrap().len(), 1);
    assert_eq!(data["negative"][0]["nome"], "Talhão 0");
    assert_eq!(data["tail"].as_array().unwrap().len(), 2);
    // Store-natural order is insertion order.
    assert_eq!(data["tail"][0]["nome"], "Talhão 10");
}

#[tokio::test]
async fn test_out_of_range_coordinates_are_rejected() {
    let schema = setup_schema();

    let message = execute_err(
        &schema,
        r#"
        mutation Create($input: GeoTrajetoriaInput!) {
            createGeoTrajetoria(input: $input) { id }
        }
        "#,
        json!({
            "input": {
                "aplicacaoId": missing_id(),
                "pontoInicial": point(-25.0, 181.0, "2024-03-05T08:00:00Z")
            }
        }),
    )
    .await;

    assert!(
        message.starts_with("Malformed input for field 'pontoInicial.longitude'"),
        "unexpected message: {message}"
    );
}
