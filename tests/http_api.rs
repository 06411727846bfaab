use serde_json::{json, Value};
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use tempfile::TempDir;

use maillots_catalog::config::Config;
use maillots_catalog::server::{catalog_service, router};

const PASSWORD: &str = "secreto";

fn test_config(tmp: &TempDir) -> Config {
    let mut config = Config::minimal();
    config.catalog.path = tmp.path().join("datos").join("maillots.json");
    config.auth.edit_password = PASSWORD.to_string();
    config
}

fn seed_catalog(path: &PathBuf) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let catalog = json!([
        { "nºModelo": "10A", "imagenLocal": "/images/10A.jpg", "etiquetas": [] },
        { "nºModelo": "2A", "imagenLocal": "/images/2A.jpg", "etiquetas": ["ROJO"] },
        { "nºModelo": 7, "imagenLocal": "/images/7.jpg", "etiquetas": [] }
    ]);
    fs::write(path, serde_json::to_string_pretty(&catalog).unwrap()).unwrap();
}

async fn spawn_server(config: &Config) -> SocketAddr {
    let app = router(catalog_service(config).unwrap());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn post_update(addr: SocketAddr, body: &Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("http://{}/api/maillots/actualizar-etiquetas", addr))
        .json(body)
        .send()
        .await
        .unwrap()
}

async fn get_all(addr: SocketAddr) -> Value {
    reqwest::get(format!("http://{}/api/maillots", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let tmp = TempDir::new().unwrap();
    let addr = spawn_server(&test_config(&tmp)).await;

    let resp = reqwest::get(format!("http://{}/health", addr)).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_get_all_missing_file_is_empty() {
    let tmp = TempDir::new().unwrap();
    let addr = spawn_server(&test_config(&tmp)).await;

    assert_eq!(get_all(addr).await, json!([]));
}

#[tokio::test]
async fn test_get_all_corrupt_file_is_empty() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(&tmp);
    fs::create_dir_all(config.catalog.path.parent().unwrap()).unwrap();
    fs::write(&config.catalog.path, "{ not json").unwrap();
    let addr = spawn_server(&config).await;

    assert_eq!(get_all(addr).await, json!([]));
}

#[tokio::test]
async fn test_get_all_returns_stored_order() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(&tmp);
    seed_catalog(&config.catalog.path);
    let addr = spawn_server(&config).await;

    let catalog = get_all(addr).await;
    let ids: Vec<&str> = catalog
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["nºModelo"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["10A", "2A", "7"]);
    assert_eq!(catalog[1]["etiquetas"], json!(["ROJO"]));
}

#[tokio::test]
async fn test_update_tags_success_persists() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(&tmp);
    seed_catalog(&config.catalog.path);
    let addr = spawn_server(&config).await;

    let resp = post_update(
        addr,
        &json!({ "modeloNo": "2A", "etiquetas": ["AZUL", "BRILLO"], "password": PASSWORD }),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["maillotActualizado"]["nºModelo"], "2A");
    assert_eq!(body["maillotActualizado"]["etiquetas"], json!(["AZUL", "BRILLO"]));
    assert!(body["message"].is_string());

    let catalog = get_all(addr).await;
    assert_eq!(catalog[1]["etiquetas"], json!(["AZUL", "BRILLO"]));
    // Order untouched by a tag update.
    assert_eq!(catalog[0]["nºModelo"], "10A");

    let on_disk: Value =
        serde_json::from_str(&fs::read_to_string(&config.catalog.path).unwrap()).unwrap();
    assert_eq!(on_disk[1]["etiquetas"], json!(["AZUL", "BRILLO"]));
}

#[tokio::test]
async fn test_update_tags_numeric_model_id() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(&tmp);
    seed_catalog(&config.catalog.path);
    let addr = spawn_server(&config).await;

    let resp = post_update(
        addr,
        &json!({ "modeloNo": 7, "etiquetas": ["VERDE"], "password": PASSWORD }),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["maillotActualizado"]["nºModelo"], "7");
}

#[tokio::test]
async fn test_update_tags_wrong_password() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(&tmp);
    seed_catalog(&config.catalog.path);
    let before = fs::read_to_string(&config.catalog.path).unwrap();
    let addr = spawn_server(&config).await;

    let resp = post_update(
        addr,
        &json!({ "modeloNo": "2A", "etiquetas": ["AZUL"], "password": "nope" }),
    )
    .await;
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "unauthorized");

    assert_eq!(fs::read_to_string(&config.catalog.path).unwrap(), before);
}

#[tokio::test]
async fn test_update_tags_password_checked_before_fields() {
    let tmp = TempDir::new().unwrap();
    let addr = spawn_server(&test_config(&tmp)).await;

    let resp = post_update(addr, &json!({})).await;
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_update_tags_missing_fields() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(&tmp);
    seed_catalog(&config.catalog.path);
    let addr = spawn_server(&config).await;

    let resp = post_update(addr, &json!({ "etiquetas": ["AZUL"], "password": PASSWORD })).await;
    assert_eq!(resp.status(), 400);

    let resp = post_update(addr, &json!({ "modeloNo": "2A", "password": PASSWORD })).await;
    assert_eq!(resp.status(), 400);

    let resp = post_update(
        addr,
        &json!({ "modeloNo": "2A", "etiquetas": "AZUL", "password": PASSWORD }),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "bad_request");
}

#[tokio::test]
async fn test_update_tags_malformed_json() {
    let tmp = TempDir::new().unwrap();
    let addr = spawn_server(&test_config(&tmp)).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{}/api/maillots/actualizar-etiquetas", addr))
        .header("content-type", "application/json")
        .body("{ \"modeloNo\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_update_tags_unknown_model() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(&tmp);
    seed_catalog(&config.catalog.path);
    let addr = spawn_server(&config).await;

    let resp = post_update(
        addr,
        &json!({ "modeloNo": "99Z", "etiquetas": ["AZUL"], "password": PASSWORD }),
    )
    .await;
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn test_update_tags_missing_catalog_is_not_found() {
    let tmp = TempDir::new().unwrap();
    let addr = spawn_server(&test_config(&tmp)).await;

    let resp = post_update(
        addr,
        &json!({ "modeloNo": "2A", "etiquetas": [], "password": PASSWORD }),
    )
    .await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_cors_header_present() {
    let tmp = TempDir::new().unwrap();
    let addr = spawn_server(&test_config(&tmp)).await;

    let resp = reqwest::Client::new()
        .get(format!("http://{}/api/maillots", addr))
        .header("origin", "http://localhost:5173")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
