//! HTTP round-trip tests for the MCP server.
//!
//! Spawns the Axum server on a test port and exercises the JSON tools API
//! with a real HTTP client, including the error contract (status codes and
//! tagged error bodies).

use corpus_harness::config::Config;
use corpus_harness::server::run_server_with_extensions;
use corpus_harness::store::DocumentStore;
use corpus_harness::tools::ToolRegistry;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

const BIND: &str = "127.0.0.1:17341";

async fn spawn_server() -> String {
    let mut config = Config::default();
    config.server.bind = BIND.to_string();

    let store = Arc::new(DocumentStore::new());
    let extras = Arc::new(ToolRegistry::new());
    tokio::spawn(async move {
        run_server_with_extensions(&config, store, extras)
            .await
            .expect("server failed to start");
    });

    let base = format!("http://{}", BIND);

    // Wait until the health endpoint answers.
    let client = reqwest::Client::new();
    for _ in 0..50 {
        if client.get(format!("{}/health", base)).send().await.is_ok() {
            return base;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    panic!("server did not become ready on {}", BIND);
}

#[tokio::test]
async fn test_http_tool_protocol_round_trip() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    // Health reports ok with a version.
    let health: Value = client
        .get(format!("{}/health", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");
    assert!(health["version"].as_str().is_some());

    // All five built-ins are discoverable with schemas.
    let listing: Value = client
        .get(format!("{}/tools/list", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let tools = listing["tools"].as_array().unwrap();
    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec!["register", "search", "get_content", "list", "remove"]
    );
    assert!(tools.iter().all(|t| t["builtin"] == true));
    assert!(tools.iter().all(|t| t["parameters"]["type"] == "object"));

    // Register a document.
    let registered: Value = client
        .post(format!("{}/tools/register", base))
        .json(&json!({
            "filePath": "/ingest/manual.pdf",
            "content": "Press the red button to stop. The red light blinks twice.",
            "pageCount": 1,
            "sizeBytes": 2048
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let doc_id = registered["result"]["docId"].as_str().unwrap().to_string();
    assert_eq!(registered["result"]["filename"], "manual.pdf");

    // Search for it.
    let found: Value = client
        .post(format!("{}/tools/search", base))
        .json(&json!({ "query": "red", "maxResults": 5, "contextLength": 8 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let result = &found["result"];
    assert_eq!(result["totalDocuments"], 1);
    assert_eq!(result["resultsFound"], 1);
    assert_eq!(result["results"][0]["totalMatches"], 2);
    assert!(result["results"][0]["matches"][0]["preview"]
        .as_str()
        .unwrap()
        .contains("**red**"));

    // Invalid arguments produce a 400 with a tagged error body.
    let response = client
        .post(format!("{}/tools/search", base))
        .json(&json!({ "query": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "invalid_argument");

    // Unknown document ids produce a 404.
    let response = client
        .post(format!("{}/tools/get_content", base))
        .json(&json!({ "docId": "doc_0_unknown00" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "not_found");

    // Unknown tool names produce a 404.
    let response = client
        .post(format!("{}/tools/summarize", base))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    // Remove the document and verify it is gone.
    let removed: Value = client
        .post(format!("{}/tools/remove", base))
        .json(&json!({ "docId": doc_id }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(removed["result"]["docId"], doc_id);

    let listing: Value = client
        .post(format!("{}/tools/list", base))
        .json(&json!({}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listing["result"]["totalDocuments"], 0);
}
