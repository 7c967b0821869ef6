//! One session client per process, built on the first tool call

use std::sync::Arc;

use azdo_core::{Domain, DomainSet};
use futures::future::join_all;
use serde_json::json;
use tests::async_helpers::{with_timeout, DEFAULT_TIMEOUT};
use tests::backend::{mock_org, org_url};
use tests::results::{is_error, text};
use tests::{fixtures, CountingTokens, FailingTokens};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

fn core_only() -> DomainSet {
    [Domain::Core].into_iter().collect()
}

#[tokio::test]
async fn test_registration_does_not_resolve_credentials() {
    let tokens = Arc::new(CountingTokens::new("pat"));
    let deps = fixtures::deps(fixtures::OFFLINE_ORG, tokens.clone());
    let registry = fixtures::registry(&deps, &DomainSet::all());

    assert!(!registry.is_empty());
    assert_eq!(tokens.calls(), 0);
    assert_eq!(deps.clients.build_count(), 0);
}

#[tokio::test]
async fn test_concurrent_calls_share_one_client() {
    let server = mock_org().await;
    Mock::given(method("GET"))
        .and(path("/contoso/_apis/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "count": 0, "value": [] })))
        .expect(8)
        .mount(&server)
        .await;

    let tokens = Arc::new(CountingTokens::new("pat"));
    let deps = fixtures::deps(&org_url(&server), tokens.clone());
    let registry = Arc::new(fixtures::registry(&deps, &core_only()));

    let calls = (0..8).map(|_| {
        let registry = registry.clone();
        tokio::spawn(async move {
            let tool = registry
                .get("core_list_projects")
                .expect("core_list_projects registered");
            tool.call(Default::default()).await
        })
    });
    let results = with_timeout(DEFAULT_TIMEOUT, join_all(calls)).await;

    for result in results {
        let result = result.expect("task panicked");
        assert!(!is_error(&result), "{}", text(&result));
    }
    assert_eq!(tokens.calls(), 1);
    assert_eq!(deps.clients.build_count(), 1);
}

#[tokio::test]
async fn test_credential_failure_is_reported_per_call() {
    let deps = fixtures::deps(
        fixtures::OFFLINE_ORG,
        Arc::new(FailingTokens::new("ADO_MCP_AUTH_TOKEN")),
    );
    let registry = fixtures::registry(&deps, &core_only());
    let tool = registry.get("core_list_projects").unwrap();

    for _ in 0..2 {
        let result = tool.call(Default::default()).await;
        assert!(is_error(&result));
        assert!(text(&result).contains("ADO_MCP_AUTH_TOKEN"));
    }
    assert_eq!(deps.clients.build_count(), 0);
}

#[tokio::test]
async fn test_user_agent_sent_on_backend_calls() {
    let server = mock_org().await;
    Mock::given(method("GET"))
        .and(path("/contoso/_apis/projects"))
        .and(wiremock::matchers::header(
            "user-agent",
            "AzureDevOps.MCP/test (local) vscode/1.95",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let deps = fixtures::deps(&org_url(&server), Arc::new(CountingTokens::new("pat")));
    deps.user_agent.append_client("vscode", "1.95");
    let registry = fixtures::registry(&deps, &core_only());

    let result = registry
        .get("core_list_projects")
        .unwrap()
        .call(Default::default())
        .await;
    assert!(!is_error(&result), "{}", text(&result));
}
