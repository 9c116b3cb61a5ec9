use super::*;
use crate::utils::test_utils::{StubResponse, StubServer};
use std::time::Duration;

#[tokio::test]
async fn list_prompts_decodes_prompt_files() {
    let server = StubServer::start([(
        "/api/prompts",
        StubResponse::json(
            r#"[{"name": "summary", "description": "Summarize", "filename": "summary.md"}]"#,
        ),
    )])
    .await;
    let client = BackendClient::new(server.backend_config()).unwrap();

    let prompts = client.list_prompts().await.unwrap();
    assert_eq!(
        prompts,
        vec![PromptFile {
            name: "summary".to_string(),
            description: "Summarize".to_string(),
            filename: "summary.md".to_string(),
        }]
    );
}

#[tokio::test]
async fn get_prompt_encodes_the_name_segment() {
    let server = StubServer::start([(
        "/api/prompts/weekly%20report",
        StubResponse::json(r##"{"name": "weekly report", "content": "# Weekly"}"##),
    )])
    .await;
    let client = BackendClient::new(server.backend_config()).unwrap();

    let detail = client.get_prompt("weekly report").await.unwrap();
    assert_eq!(detail.content, "# Weekly");
    assert_eq!(server.hits("/api/prompts/weekly%20report").await, 1);
}

#[tokio::test]
async fn get_prompt_rejects_empty_name_without_a_request() {
    let server = StubServer::start(Vec::<(String, StubResponse)>::new()).await;
    let client = BackendClient::new(server.backend_config()).unwrap();

    let err = client.get_prompt("  ").await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidName));
    assert!(server.requests().await.is_empty());
}

#[tokio::test]
async fn unknown_prompt_reports_not_found() {
    let server = StubServer::start(Vec::<(String, StubResponse)>::new()).await;
    let client = BackendClient::new(server.backend_config()).unwrap();

    let err = client.get_prompt("missing").await.unwrap_err();
    assert!(err.is_not_found());
    assert!(!err.is_validation());
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn unprocessable_entity_becomes_validation_error() {
    let server = StubServer::start([(
        "/api/mcp_info/discovery",
        StubResponse::status(
            422,
            r#"{"detail": [{"loc": ["query", "limit"], "msg": "value is not a valid integer", "type": "type_error.integer"}]}"#,
        ),
    )])
    .await;
    let client = BackendClient::new(server.backend_config()).unwrap();

    let err = client.discovery().await.unwrap_err();
    match &err {
        ApiError::Validation { detail, .. } => {
            assert_eq!(detail.detail.len(), 1);
            assert_eq!(detail.detail[0].location(), "query.limit");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(err.to_string().contains("query.limit: value is not a valid integer"));
}

#[tokio::test]
async fn validation_error_tolerates_unparseable_body() {
    let server = StubServer::start([(
        "/api/prompts",
        StubResponse::status(422, "not json"),
    )])
    .await;
    let client = BackendClient::new(server.backend_config()).unwrap();

    let err = client.list_prompts().await.unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn server_error_keeps_status_and_body() {
    let server = StubServer::start([(
        "/api/prompts",
        StubResponse::status(500, "boom"),
    )])
    .await;
    let client = BackendClient::new(server.backend_config()).unwrap();

    let err = client.list_prompts().await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert!(err.to_string().ends_with("boom"));
}

#[tokio::test]
async fn malformed_payload_is_a_decode_error() {
    let server = StubServer::start([(
        "/api/prompts",
        StubResponse::json(r#"{"not": "a list"}"#),
    )])
    .await;
    let client = BackendClient::new(server.backend_config()).unwrap();

    let err = client.list_prompts().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode { .. }));
    assert!(StdError::source(&err).is_some());
}

#[tokio::test]
async fn bearer_token_is_sent_when_configured() {
    let server = StubServer::start([(
        "/api/mcp_info/info",
        StubResponse::json(r#"{"server_name": "Databricks MCP Server", "transport": "http"}"#),
    )])
    .await;
    let client = BackendClient::new(server.backend_config().with_token("dapi-secret")).unwrap();

    let info = client.info().await.unwrap();
    assert_eq!(
        info.0.get("server_name").and_then(|v| v.as_str()),
        Some("Databricks MCP Server")
    );

    let requests = server.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].header("authorization"), Some("Bearer dapi-secret"));
}

#[tokio::test]
async fn no_authorization_header_without_token() {
    let server = StubServer::start([(
        "/api/mcp_info/discovery",
        StubResponse::json("{}"),
    )])
    .await;
    let client = BackendClient::new(server.backend_config()).unwrap();

    client.discovery().await.unwrap();
    let requests = server.requests().await;
    assert_eq!(requests[0].header("authorization"), None);
}

#[tokio::test]
async fn timeout_surfaces_as_transport_error() {
    let server = StubServer::start([(
        "/api/prompts",
        StubResponse::json("[]").delayed(Duration::from_millis(500)),
    )])
    .await;
    let client = BackendClient::new(
        server
            .backend_config()
            .with_timeout(Duration::from_millis(50)),
    )
    .unwrap();

    let err = client.list_prompts().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport { .. }));
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = BackendClient::new(BackendConfig::new(format!("http://{addr}"))).unwrap();
    let err = client.discovery().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport { .. }));
    assert_eq!(err.status(), None);
}
