//! End-to-end scenarios over real HTTP.

use std::path::PathBuf;

use reqwest::{Method, StatusCode};
use scalar_docs::DocsConfig;

use crate::{TestProject, TestServer};

const PETSTORE_JSON: &str = r#"{
  "openapi": "3.0.3",
  "info": {"title": "Petstore", "version": "1.0.0"},
  "paths": {"/pets": {"get": {"responses": {"200": {"description": "ok"}}}}}
}"#;

const PETSTORE_YAML: &str = "openapi: 3.0.3\ninfo:\n  title: Petstore\n  version: 1.0.0\npaths: {}\n";

fn content_type(resp: &reqwest::Response) -> String {
    resp.headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
async fn serves_docs_and_discovered_json() {
    let project = TestProject::new().unwrap();
    project.file("api/openapi.json", PETSTORE_JSON).unwrap();
    let server = TestServer::start(&project, DocsConfig::default())
        .await
        .unwrap();

    let resp = server.get("/scalar").await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(content_type(&resp).starts_with("text/html"));
    let html = resp.text().await.unwrap();
    assert!(html.contains(r#"data-url="/api/openapi.json""#));
    assert!(html.contains("@scalar/api-reference"));

    let resp = server.get("/api/openapi.json").await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(content_type(&resp), "application/json; charset=utf-8");
    assert_eq!(resp.text().await.unwrap(), PETSTORE_JSON);
}

#[tokio::test]
async fn docs_prefix_covers_subpaths() {
    let project = TestProject::new().unwrap();
    project.file("api/openapi.json", PETSTORE_JSON).unwrap();
    let server = TestServer::start(&project, DocsConfig::default())
        .await
        .unwrap();

    let resp = server.get("/scalar/anything/here").await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("api-reference"));
}

#[tokio::test]
async fn other_paths_reach_the_application() {
    let project = TestProject::new().unwrap();
    project.file("api/openapi.json", PETSTORE_JSON).unwrap();
    let server = TestServer::start(&project, DocsConfig::default())
        .await
        .unwrap();

    let resp = server.get("/hello-world").await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.text().await.unwrap(),
        "Hello, world from the main application!\n"
    );

    let resp = server.get("/unrelated").await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Spec paths match exactly.
    let resp = server.get("/api/openapi.json/extra").await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn method_is_not_inspected() {
    let project = TestProject::new().unwrap();
    project.file("api/openapi.json", PETSTORE_JSON).unwrap();
    let server = TestServer::start(&project, DocsConfig::default())
        .await
        .unwrap();

    let resp = server.request(Method::POST, "/scalar").await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = server
        .request(Method::DELETE, "/api/openapi.json")
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn yaml_is_primary_when_both_exist() {
    let project = TestProject::new().unwrap();
    project
        .file("doc/openapi.yaml", PETSTORE_YAML)
        .unwrap()
        .file("api/openapi.json", PETSTORE_JSON)
        .unwrap();
    let server = TestServer::start(&project, DocsConfig::default())
        .await
        .unwrap();

    let html = server.get("/scalar").await.unwrap().text().await.unwrap();
    assert!(html.contains(r#"data-url="/doc/openapi.yaml""#));

    let resp = server.get("/doc/openapi.yaml").await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(content_type(&resp), "text/yaml; charset=utf-8");

    // The JSON file is still served at its own path.
    let resp = server.get("/api/openapi.json").await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_spec_fails_docs_only() {
    let project = TestProject::new().unwrap();
    let server = TestServer::start(&project, DocsConfig::default())
        .await
        .unwrap();

    let resp = server.get("/scalar").await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = resp.text().await.unwrap();
    assert!(body.starts_with("Scalar UI unavailable: "));

    let resp = server.get("/hello-world").await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn explicit_path_and_custom_docs_path() {
    let project = TestProject::new().unwrap();
    project
        .file("custom/myapi.json", PETSTORE_JSON)
        .unwrap()
        .file("api/openapi.json", r#"{"ignored": true}"#)
        .unwrap();

    let docs = DocsConfig::default()
        .with_json_spec(PathBuf::from("custom/myapi.json"))
        .with_docs_path("/reference");
    let server = TestServer::start(&project, docs).await.unwrap();

    let html = server.get("/reference").await.unwrap().text().await.unwrap();
    assert!(html.contains(r#"data-url="/myapi.json""#));

    let resp = server.get("/myapi.json").await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), PETSTORE_JSON);

    // Explicit paths disable the directory search.
    let resp = server.get("/api/openapi.json").await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // The default prefix is no longer claimed.
    let resp = server.get("/scalar").await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn spec_is_read_once() {
    let project = TestProject::new().unwrap();
    project.file("api/openapi.json", PETSTORE_JSON).unwrap();
    let server = TestServer::start(&project, DocsConfig::default())
        .await
        .unwrap();

    let first = server.get("/api/openapi.json").await.unwrap();
    assert_eq!(first.text().await.unwrap(), PETSTORE_JSON);

    std::fs::write(project.path().join("api/openapi.json"), r#"{"openapi":"3.1.0"}"#).unwrap();
    let second = server.get("/api/openapi.json").await.unwrap();
    assert_eq!(second.text().await.unwrap(), PETSTORE_JSON);
}

#[tokio::test]
async fn auto_mode_finds_nested_spec() {
    let project = TestProject::new().unwrap();
    project
        .file("docs/notes.json", r#"{"not": "a spec"}"#)
        .unwrap()
        .file("openapi/v2/service.yaml", PETSTORE_YAML)
        .unwrap();
    let server = TestServer::start_auto(&project).await.unwrap();

    let html = server.get("/scalar").await.unwrap().text().await.unwrap();
    assert!(html.contains(r#"data-url="/service.yaml""#));

    let resp = server.get("/service.yaml").await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), PETSTORE_YAML);
}

#[tokio::test]
async fn auto_mode_without_valid_spec_fails_docs() {
    let project = TestProject::new().unwrap();
    project.file("api/config.json", r#"{"port": 8080}"#).unwrap();
    let server = TestServer::start_auto(&project).await.unwrap();

    let resp = server.get("/scalar").await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let resp = server.get("/hello-world").await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn auto_mode_never_serves_rejected_files() {
    let project = TestProject::new().unwrap();
    project.file("api/openapi.json", r#"{"port": 8080}"#).unwrap();
    let server = TestServer::start_auto(&project).await.unwrap();

    let resp = server.get("/scalar").await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let resp = server.get("/api/openapi.json").await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn spec_in_directory_with_space() {
    let project = TestProject::new().unwrap();
    project.file("my docs/openapi.json", PETSTORE_JSON).unwrap();
    let docs = DocsConfig::default().with_search_dirs(["my docs"]);
    let server = TestServer::start(&project, docs).await.unwrap();
    assert_ne!(server.port(), 0);

    let html = server.get("/scalar").await.unwrap().text().await.unwrap();
    assert!(html.contains(r#"data-url="/my%20docs/openapi.json""#));

    let resp = server.get("/my%20docs/openapi.json").await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), PETSTORE_JSON);
}

#[tokio::test]
async fn non_ascii_file_name() {
    let project = TestProject::new().unwrap();
    project.file("spec/api-\u{fc}.json", PETSTORE_JSON).unwrap();
    let docs = DocsConfig::default().with_json_spec("spec/api-\u{fc}.json");
    let server = TestServer::start(&project, docs).await.unwrap();

    let html = server.get("/scalar").await.unwrap().text().await.unwrap();
    assert!(html.contains(r#"data-url="/api-%C3%BC.json""#));

    let resp = server.get("/api-%C3%BC.json").await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
