//! Argument checks that fail before any backend request

use std::sync::Arc;

use azdo_core::DomainSet;
use serde_json::{json, Value};
use tests::backend::{mock_org, org_url};
use tests::results::{is_error, text};
use tests::{fixtures, CountingTokens};

async fn call(organization: &str, name: &str, arguments: Value) -> rmcp::model::CallToolResult {
    let deps = fixtures::deps(organization, Arc::new(CountingTokens::new("pat")));
    let registry = fixtures::registry(&deps, &DomainSet::all());
    let tool = registry.get(name).expect("tool registered");
    let arguments = arguments.as_object().cloned().unwrap_or_default();
    tool.call(arguments).await
}

#[tokio::test]
async fn test_batch_rejects_more_than_200_ids() {
    let server = mock_org().await;
    let ids: Vec<u32> = (1..=201).collect();

    let result = call(
        &org_url(&server),
        "wit_get_work_items_batch_by_ids",
        json!({ "project": "Fabrikam", "ids": ids }),
    )
    .await;

    assert!(is_error(&result));
    assert!(text(&result).contains("at most 200"), "{}", text(&result));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_batch_rejects_empty_ids() {
    let server = mock_org().await;
    let result = call(
        &org_url(&server),
        "wit_get_work_items_batch_by_ids",
        json!({ "project": "Fabrikam", "ids": [] }),
    )
    .await;
    assert!(is_error(&result));
}

#[tokio::test]
async fn test_missing_required_argument() {
    let result = call(fixtures::OFFLINE_ORG, "core_list_project_teams", json!({})).await;
    assert!(is_error(&result));
    assert!(text(&result).contains("project"), "{}", text(&result));
}

#[tokio::test]
async fn test_wrong_argument_type() {
    let result = call(
        fixtures::OFFLINE_ORG,
        "pipelines_get_build_status",
        json!({ "project": "Fabrikam", "buildId": "latest" }),
    )
    .await;
    assert!(is_error(&result));
    assert!(text(&result).starts_with("Tool execution failed: Invalid arguments"));
}

#[tokio::test]
async fn test_create_work_item_requires_fields() {
    let server = mock_org().await;
    let result = call(
        &org_url(&server),
        "wit_create_work_item",
        json!({ "project": "Fabrikam", "workItemType": "Task", "fields": [] }),
    )
    .await;
    assert!(is_error(&result));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}
