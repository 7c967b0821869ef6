//! tools/list and tools/call over a live MCP session

use std::sync::Arc;
use std::time::Duration;

use azdo_core::branding;
use azdo_server::{AzdoMcpHandler, AzdoServer, MapEnv, ServerConfig};
use rmcp::model::{CallToolRequestParams, ClientCapabilities, ClientInfo, Implementation};
use rmcp::service::RunningService;
use rmcp::{RoleClient, ServiceExt};
use serde_json::json;
use tests::async_helpers::{with_timeout, DEFAULT_TIMEOUT};
use tests::backend::{mock_org, org_url};
use tests::results::{is_error, text};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

fn handler(config: ServerConfig, env: MapEnv) -> AzdoMcpHandler {
    AzdoServer::with_env(config, Arc::new(env))
        .expect("server should build")
        .handler()
        .clone()
}

/// Start `handler` on one end of a duplex pipe and connect a client to the other
async fn connect(handler: AzdoMcpHandler) -> RunningService<RoleClient, ClientInfo> {
    let (server_io, client_io) = tokio::io::duplex(64 * 1024);

    tokio::spawn(async move {
        if let Ok(service) = handler.serve(server_io).await {
            let _ = service.waiting().await;
        }
    });

    ClientInfo {
        protocol_version: Default::default(),
        capabilities: ClientCapabilities::default(),
        client_info: Implementation {
            name: "test-client".to_string(),
            version: "1.0.0".to_string(),
            ..Default::default()
        },
        ..Default::default()
    }
    .serve(client_io)
    .await
    .expect("client should connect")
}

fn call(name: &str, arguments: serde_json::Value) -> CallToolRequestParams {
    CallToolRequestParams {
        name: name.to_string().into(),
        arguments: arguments.as_object().cloned(),
        task: None,
        meta: None,
    }
}

async fn wait_for_client_identity(handler: &AzdoMcpHandler) {
    with_timeout(DEFAULT_TIMEOUT, async {
        while !handler.user_agent().has_client() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
}

#[tokio::test]
async fn test_server_info_and_tool_listing() {
    let handler = handler(
        ServerConfig::new("contoso").with_domains(["core", "wiki"]),
        MapEnv::new(),
    );
    let expected = handler.registry().names();
    let client = connect(handler).await;

    let info = client.peer_info().expect("server info after initialize");
    assert_eq!(info.server_info.name, branding::SERVER_NAME);
    assert!(info.capabilities.tools.is_some());

    let tools = client.list_all_tools().await.unwrap();
    let names: Vec<String> = tools.iter().map(|t| t.name.to_string()).collect();
    assert_eq!(names, expected);
    assert!(names.iter().all(|n| n.starts_with("core_") || n.starts_with("wiki_")));

    client.cancel().await.ok();
}

#[tokio::test]
async fn test_client_identity_appended_to_user_agent() {
    let handler = handler(ServerConfig::new("contoso"), MapEnv::new());
    let client = connect(handler.clone()).await;

    wait_for_client_identity(&handler).await;
    assert_eq!(
        handler.user_agent().get(),
        format!(
            "{}/{} (local) test-client/1.0.0",
            branding::PRODUCT_NAME,
            branding::version()
        )
    );

    client.cancel().await.ok();
}

#[tokio::test]
async fn test_missing_credential_is_a_failure_payload() {
    let handler = handler(
        ServerConfig::new("contoso").with_domains(["core"]),
        MapEnv::new(),
    );
    let client = connect(handler).await;

    let result = client
        .call_tool(call("core_list_projects", json!({})))
        .await
        .expect("credential failures are not protocol errors");
    assert!(is_error(&result));
    assert!(text(&result).contains(branding::PAT_ENV_VAR));

    client.cancel().await.ok();
}

#[tokio::test]
async fn test_invalid_arguments_are_a_failure_payload() {
    let handler = handler(
        ServerConfig::new("contoso")
            .with_domains(["work-items"])
            .with_token(Some("pat".to_string())),
        MapEnv::new(),
    );
    let client = connect(handler).await;

    let result = client
        .call_tool(call("wit_get_work_item", json!({ "id": "not-a-number" })))
        .await
        .unwrap();
    assert!(is_error(&result));
    assert!(text(&result).contains("Invalid arguments for wit_get_work_item"));

    client.cancel().await.ok();
}

#[tokio::test]
async fn test_unknown_or_disabled_tool_is_a_protocol_error() {
    let handler = handler(
        ServerConfig::new("contoso").with_domains(["core"]),
        MapEnv::new(),
    );
    let client = connect(handler).await;

    assert!(client
        .call_tool(call("no_such_tool", json!({})))
        .await
        .is_err());
    assert!(client
        .call_tool(call("search_code", json!({ "searchText": "x" })))
        .await
        .is_err());

    client.cancel().await.ok();
}

#[tokio::test]
async fn test_tool_call_reaches_backend_with_client_user_agent() {
    let server = mock_org().await;
    let user_agent = format!(
        "{}/{} (local) test-client/1.0.0",
        branding::PRODUCT_NAME,
        branding::version()
    );
    Mock::given(method("GET"))
        .and(path("/contoso/_apis/projects"))
        .and(header("user-agent", user_agent.as_str()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "count": 1, "value": [{ "name": "Fabrikam" }] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let env = MapEnv::new().with(branding::PAT_ENV_VAR, "secret");
    let handler = handler(
        ServerConfig::new(org_url(&server)).with_domains(["core"]),
        env,
    );
    let client = connect(handler.clone()).await;
    wait_for_client_identity(&handler).await;

    let result = client
        .call_tool(call("core_list_projects", json!({})))
        .await
        .unwrap();
    assert!(!is_error(&result), "{}", text(&result));
    assert!(text(&result).contains("Fabrikam"));

    client.cancel().await.ok();
}
