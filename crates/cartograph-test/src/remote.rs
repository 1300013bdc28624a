//! Loading documents over HTTP from a mock server.
//!
//! The loader uses a blocking client, so library calls run on
//! `spawn_blocking`; CLI calls run in a separate process anyway.

use std::time::Duration;

use assert_cmd::Command;
use predicates::str::contains;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cartograph_resolver::Resolver;
use cartograph_spec::{load_from_url, LoadError, LoadOptions, OpenApiSpec};

const PETSTORE_YAML: &str = r##"
openapi: 3.0.3
info:
  title: Remote Petstore
  version: 1.0.0
paths:
  /pets:
    get:
      operationId: listPets
      responses:
        "200":
          $ref: "#/components/responses/PetList"
components:
  responses:
    PetList:
      description: A list of pets
"##;

const PETSTORE_JSON: &str = r#"{
  "openapi": "3.1.0",
  "info": {"title": "Remote JSON", "version": "1.0.0"},
  "paths": {}
}"#;

async fn serve(route: &str, template: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(template)
        .mount(&server)
        .await;
    server
}

async fn load(url: String, options: LoadOptions) -> Result<OpenApiSpec, LoadError> {
    tokio::task::spawn_blocking(move || load_from_url(&url, &options))
        .await
        .expect("loader task panicked")
}

#[tokio::test]
async fn yaml_content_type_selects_yaml() {
    let server = serve(
        "/openapi.yaml",
        ResponseTemplate::new(200).set_body_raw(PETSTORE_YAML, "application/yaml"),
    )
    .await;

    let spec = load(
        format!("{}/openapi.yaml", server.uri()),
        LoadOptions::default(),
    )
    .await
    .expect("spec should load");

    assert_eq!(spec.title(), Some("Remote Petstore"));
    let resolver = Resolver::new(&spec);
    let resolved = resolver
        .resolve("#/components/responses/PetList", true)
        .expect("reference should resolve");
    assert_eq!(resolved.kind(), "Response");
}

#[tokio::test]
async fn unlabelled_body_tries_json_then_yaml() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/spec.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PETSTORE_JSON, "text/plain"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/spec"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PETSTORE_YAML, "text/plain"))
        .mount(&server)
        .await;

    let json = load(format!("{}/spec.json", server.uri()), LoadOptions::default())
        .await
        .expect("JSON body should load");
    assert_eq!(json.title(), Some("Remote JSON"));

    let yaml = load(format!("{}/spec", server.uri()), LoadOptions::default())
        .await
        .expect("YAML body should load");
    assert_eq!(yaml.title(), Some("Remote Petstore"));
}

#[tokio::test]
async fn user_agent_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/openapi.json"))
        .and(header("user-agent", "cartograph-tests/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PETSTORE_JSON, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let options = LoadOptions::default().with_user_agent("cartograph-tests/1.0");
    let spec = load(format!("{}/openapi.json", server.uri()), options)
        .await
        .expect("spec should load");
    assert_eq!(spec.version.minor, 1);
}

#[tokio::test]
async fn http_errors_are_reported() {
    let server = serve("/missing.yaml", ResponseTemplate::new(404)).await;

    let err = load(
        format!("{}/missing.yaml", server.uri()),
        LoadOptions::default(),
    )
    .await
    .expect_err("404 should fail");

    assert_eq!(err.code(), "E2104");
    assert!(err.to_string().contains("/missing.yaml"));
}

#[tokio::test]
async fn slow_servers_time_out() {
    let server = serve(
        "/slow.yaml",
        ResponseTemplate::new(200)
            .set_body_raw(PETSTORE_YAML, "application/yaml")
            .set_delay(Duration::from_secs(5)),
    )
    .await;

    let options = LoadOptions::default().with_timeout(Duration::from_millis(200));
    let err = load(format!("{}/slow.yaml", server.uri()), options)
        .await
        .expect_err("request should time out");
    assert_eq!(err.code(), "E2104");
}

#[tokio::test(flavor = "multi_thread")]
async fn cli_inspects_a_url() {
    let server = serve(
        "/openapi.yaml",
        ResponseTemplate::new(200).set_body_raw(PETSTORE_YAML, "application/yaml"),
    )
    .await;
    let url = format!("{}/openapi.yaml", server.uri());

    tokio::task::spawn_blocking(move || {
        #[allow(deprecated)]
        Command::cargo_bin("cartograph")
            .expect("cartograph binary not found, run `cargo build -p cartograph` first")
            .env_remove("RUST_LOG")
            .args(["refs", &url])
            .assert()
            .success()
            .stdout(contains("#/components/responses/PetList"));
    })
    .await
    .expect("cli task panicked");
}
