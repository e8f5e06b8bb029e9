//! Binary-level tests for the `evals` command.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Command with an isolated config directory and no OPENAI_* variables
fn evals(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("evals").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("OPENAI_API_KEY")
        .env_remove("OPENAI_BASE_URL")
        .env_remove("OPENAI_ORGANIZATION_ID")
        .env_remove("OPENAI_PROJECT_ID")
        .env_remove("EVALS_PROFILE")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_resources() {
    let home = TempDir::new().unwrap();
    evals(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("evals"))
        .stdout(predicate::str::contains("runs"))
        .stdout(predicate::str::contains("output-items"));
}

#[test]
fn test_create_requires_params() {
    let home = TempDir::new().unwrap();
    evals(&home)
        .args(["evals", "create"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--file"));
}

#[test]
fn test_missing_api_key() {
    let home = TempDir::new().unwrap();
    evals(&home)
        .args(["--no-color", "evals", "get", "eval_1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No API key configured"));
}

#[test]
fn test_invalid_inline_json() {
    let home = TempDir::new().unwrap();
    evals(&home)
        .args(["--api-key", "sk-test", "evals", "create", "--data", "{oops"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid JSON"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_get_eval_prints_raw_json() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/evals/eval_1"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "eval",
            "id": "eval_1",
            "name": "Sentiment",
            "custom_field": 7
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let home = TempDir::new().unwrap();
    let api_url = format!("{}/v1", mock_server.uri());

    evals(&home)
        .args(["--api-url", api_url.as_str(), "--api-key", "sk-test", "-o", "json"])
        .args(["evals", "get", "eval_1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"custom_field\": 7"))
        .stdout(predicate::str::contains("\"id\": \"eval_1\""));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_runs_forwards_filters() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/evals/eval_1/runs"))
        .and(query_param("status", "completed"))
        .and(query_param("limit", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [
                {"object": "eval.run", "id": "evalrun_1", "eval_id": "eval_1", "status": "completed"}
            ],
            "first_id": "evalrun_1",
            "last_id": "evalrun_1",
            "has_more": false
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let home = TempDir::new().unwrap();
    let api_url = format!("{}/v1", mock_server.uri());

    evals(&home)
        .args(["--api-url", api_url.as_str(), "--api-key", "sk-test", "-o", "compact"])
        .args(["runs", "list", "eval_1", "--status", "completed", "--limit", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("evalrun_1\tcompleted"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_api_error_exits_nonzero() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"message": "Eval not found.", "type": "invalid_request_error"}
        })))
        .mount(&mock_server)
        .await;

    let home = TempDir::new().unwrap();
    let api_url = format!("{}/v1", mock_server.uri());

    evals(&home)
        .args(["--api-url", api_url.as_str(), "--api-key", "sk-test", "--no-color"])
        .args(["evals", "get", "missing"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Eval not found."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_raw_output_ignores_unexpected_field_types() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/evals/eval_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "eval",
            "id": "eval_1",
            "created_at": "2025-01-01"
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/evals/eval_1/runs/evalrun_1/output_items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [{"id": "outputitem_1", "datasource_item_id": "row-7"}],
            "has_more": false
        })))
        .mount(&mock_server)
        .await;

    let home = TempDir::new().unwrap();
    let api_url = format!("{}/v1", mock_server.uri());

    evals(&home)
        .args(["--api-url", api_url.as_str(), "--api-key", "sk-test", "-o", "json"])
        .args(["evals", "get", "eval_1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"created_at\": \"2025-01-01\""));

    evals(&home)
        .args(["--api-url", api_url.as_str(), "--api-key", "sk-test", "-o", "yaml"])
        .args(["output-items", "list", "eval_1", "evalrun_1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("row-7"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_not_confirmed_by_server_exits_nonzero() {
    let mock_server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/evals/eval_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "eval.deleted",
            "deleted": false,
            "eval_id": "eval_1"
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/evals/eval_1/runs/evalrun_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "eval.run.deleted",
            "deleted": false,
            "run_id": "evalrun_1"
        })))
        .mount(&mock_server)
        .await;

    let home = TempDir::new().unwrap();
    let api_url = format!("{}/v1", mock_server.uri());

    evals(&home)
        .args(["--api-url", api_url.as_str(), "--api-key", "sk-test", "--no-color"])
        .args(["evals", "delete", "eval_1", "--force"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Eval eval_1 was not deleted"));

    evals(&home)
        .args(["--api-url", api_url.as_str(), "--api-key", "sk-test", "-o", "json"])
        .args(["runs", "delete", "eval_1", "evalrun_1", "--force"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("eval.run.deleted"))
        .stderr(predicate::str::contains("Run evalrun_1 was not deleted"));
}

#[test]
fn test_config_profiles_round_trip() {
    let home = TempDir::new().unwrap();

    evals(&home)
        .args(["config", "set-profile", "work", "--api-key", "sk-work"])
        .assert()
        .success();

    evals(&home)
        .args(["--no-color", "config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("work"));
}
