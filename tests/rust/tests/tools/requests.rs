//! Backend requests issued by individual tools

use std::sync::Arc;

use azdo_core::DomainSet;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tests::backend::{mock_org, org_url};
use tests::results::{is_error, text};
use tests::{fixtures, CountingTokens};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn call(server: &MockServer, name: &str, arguments: Value) -> rmcp::model::CallToolResult {
    let deps = fixtures::deps(&org_url(server), Arc::new(CountingTokens::new("pat")));
    let registry = fixtures::registry(&deps, &DomainSet::all());
    let arguments = arguments.as_object().cloned().unwrap_or_default();
    let result = registry.get(name).expect("tool registered").call(arguments).await;
    assert!(!is_error(&result), "{name}: {}", text(&result));
    result
}

fn ok(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

#[tokio::test]
async fn test_list_projects_sends_basic_auth_and_paging() {
    let server = mock_org().await;
    // base64(":pat")
    Mock::given(method("GET"))
        .and(path("/contoso/_apis/projects"))
        .and(header("authorization", "Basic OnBhdA=="))
        .and(query_param("api-version", "7.1"))
        .and(query_param("$top", "5"))
        .and(query_param("stateFilter", "wellFormed"))
        .respond_with(ok(json!({ "count": 1, "value": [{ "name": "Fabrikam" }] })))
        .expect(1)
        .mount(&server)
        .await;

    let result = call(
        &server,
        "core_list_projects",
        json!({ "top": 5, "stateFilter": "wellFormed" }),
    )
    .await;
    let payload: Value = serde_json::from_str(&text(&result)).unwrap();
    assert_eq!(payload["value"][0]["name"], "Fabrikam");
}

#[tokio::test]
async fn test_backend_error_becomes_failure_payload() {
    let server = mock_org().await;
    Mock::given(method("GET"))
        .and(path("/contoso/Fabrikam/_apis/wit/workitems/42"))
        .respond_with(ResponseTemplate::new(404).set_body_string("TF401232: Work item 42 does not exist"))
        .mount(&server)
        .await;

    let deps = fixtures::deps(&org_url(&server), Arc::new(CountingTokens::new("pat")));
    let registry = fixtures::registry(&deps, &DomainSet::all());
    let result = registry
        .get("wit_get_work_item")
        .unwrap()
        .call(json!({ "id": 42, "project": "Fabrikam" }).as_object().cloned().unwrap())
        .await;

    assert!(is_error(&result));
    let message = text(&result);
    assert!(message.contains("Failed to get work item 42"), "{message}");
    assert!(message.contains("404"), "{message}");
}

#[tokio::test]
async fn test_work_item_batch_posts_ids_and_fields() {
    let server = mock_org().await;
    Mock::given(method("POST"))
        .and(path("/contoso/Fabrikam/_apis/wit/workitemsbatch"))
        .and(body_json(json!({ "ids": [1, 2], "fields": ["System.Title"] })))
        .respond_with(ok(json!({ "count": 2, "value": [] })))
        .expect(1)
        .mount(&server)
        .await;

    call(
        &server,
        "wit_get_work_items_batch_by_ids",
        json!({ "project": "Fabrikam", "ids": [1, 2], "fields": ["System.Title"] }),
    )
    .await;
}

#[tokio::test]
async fn test_create_work_item_sends_json_patch() {
    let server = mock_org().await;
    Mock::given(method("POST"))
        .and(path("/contoso/Fabrikam/_apis/wit/workitems/$Task"))
        .and(header("content-type", "application/json-patch+json"))
        .and(body_json(json!([
            { "op": "add", "path": "/fields/System.Title", "value": "Write docs" }
        ])))
        .respond_with(ok(json!({ "id": 7 })))
        .expect(1)
        .mount(&server)
        .await;

    call(
        &server,
        "wit_create_work_item",
        json!({
            "project": "Fabrikam",
            "workItemType": "Task",
            "fields": [{ "name": "System.Title", "value": "Write docs" }]
        }),
    )
    .await;
}

#[tokio::test]
async fn test_comments_use_preview_api_version() {
    let server = mock_org().await;
    Mock::given(method("GET"))
        .and(path("/contoso/Fabrikam/_apis/wit/workItems/9/comments"))
        .and(query_param("api-version", "7.1-preview.4"))
        .respond_with(ok(json!({ "comments": [] })))
        .expect(1)
        .mount(&server)
        .await;

    call(
        &server,
        "wit_list_work_item_comments",
        json!({ "project": "Fabrikam", "workItemId": 9 }),
    )
    .await;

    let requests = server.received_requests().await.unwrap();
    let versions: Vec<String> = requests[0]
        .url
        .query_pairs()
        .filter(|(k, _)| k == "api-version")
        .map(|(_, v)| v.into_owned())
        .collect();
    assert_eq!(versions, vec!["7.1-preview.4".to_string()]);
}

#[tokio::test]
async fn test_create_pull_request_qualifies_branches() {
    let server = mock_org().await;
    Mock::given(method("POST"))
        .and(path("/contoso/Fabrikam/_apis/git/repositories/web/pullrequests"))
        .and(body_json(json!({
            "sourceRefName": "refs/heads/feature/login",
            "targetRefName": "refs/heads/main",
            "title": "Login page",
            "description": "",
            "isDraft": true
        })))
        .respond_with(ok(json!({ "pullRequestId": 12 })))
        .expect(1)
        .mount(&server)
        .await;

    call(
        &server,
        "repo_create_pull_request",
        json!({
            "project": "Fabrikam",
            "repositoryId": "web",
            "sourceRefName": "feature/login",
            "targetRefName": "refs/heads/main",
            "title": "Login page",
            "isDraft": true
        }),
    )
    .await;
}

#[tokio::test]
async fn test_build_log_returns_plain_text() {
    let server = mock_org().await;
    Mock::given(method("GET"))
        .and(path("/contoso/Fabrikam/_apis/build/builds/31/logs/4"))
        .respond_with(ResponseTemplate::new(200).set_body_string("##[section]Starting: Build"))
        .expect(1)
        .mount(&server)
        .await;

    let result = call(
        &server,
        "pipelines_get_build_log",
        json!({ "project": "Fabrikam", "buildId": 31, "logId": 4 }),
    )
    .await;
    assert_eq!(text(&result), "##[section]Starting: Build");
}

#[tokio::test]
async fn test_wiki_page_content_is_unwrapped() {
    let server = mock_org().await;
    Mock::given(method("GET"))
        .and(path("/contoso/Fabrikam/_apis/wiki/wikis/Fabrikam.wiki/pages"))
        .and(query_param("path", "/Home"))
        .and(query_param("includeContent", "true"))
        .respond_with(ok(json!({ "path": "/Home", "content": "# Welcome" })))
        .expect(1)
        .mount(&server)
        .await;

    let result = call(
        &server,
        "wiki_get_page_content",
        json!({ "project": "Fabrikam", "wikiIdentifier": "Fabrikam.wiki", "path": "/Home" }),
    )
    .await;
    assert_eq!(text(&result), "# Welcome");
}

#[tokio::test]
async fn test_wiki_update_sends_if_match() {
    let server = mock_org().await;
    Mock::given(method("PUT"))
        .and(path("/contoso/Fabrikam/_apis/wiki/wikis/Fabrikam.wiki/pages"))
        .and(header("if-match", "\"abc\""))
        .and(body_json(json!({ "content": "updated" })))
        .respond_with(ok(json!({ "path": "/Home" })))
        .expect(1)
        .mount(&server)
        .await;

    call(
        &server,
        "wiki_create_or_update_page",
        json!({
            "project": "Fabrikam",
            "wikiIdentifier": "Fabrikam.wiki",
            "path": "/Home",
            "content": "updated",
            "etag": "\"abc\""
        }),
    )
    .await;
}

#[tokio::test]
async fn test_code_search_body() {
    let server = mock_org().await;
    Mock::given(method("POST"))
        .and(path("/contoso/_apis/search/codesearchresults"))
        .and(body_json(json!({
            "searchText": "TokenProvider",
            "$skip": 0,
            "$top": 10,
            "includeFacets": false,
            "filters": { "Repository": ["web"] }
        })))
        .respond_with(ok(json!({ "count": 0, "results": [] })))
        .expect(1)
        .mount(&server)
        .await;

    call(
        &server,
        "search_code",
        json!({ "searchText": "TokenProvider", "repository": ["web"] }),
    )
    .await;
}

#[tokio::test]
async fn test_test_results_by_build_uri() {
    let server = mock_org().await;
    Mock::given(method("GET"))
        .and(path("/contoso/Fabrikam/_apis/test/runs"))
        .and(query_param("buildUri", "vstfs:///Build/Build/77"))
        .respond_with(ok(json!({ "value": [] })))
        .expect(1)
        .mount(&server)
        .await;

    call(
        &server,
        "testplan_show_test_results_from_build_id",
        json!({ "project": "Fabrikam", "buildId": 77 }),
    )
    .await;
}

#[tokio::test]
async fn test_security_alerts_criteria() {
    let server = mock_org().await;
    Mock::given(method("GET"))
        .and(path("/contoso/Fabrikam/_apis/alert/repositories/web/alerts"))
        .and(query_param("api-version", "7.2-preview.1"))
        .and(query_param("criteria.alertType", "secret"))
        .and(query_param("criteria.states", "active,dismissed"))
        .respond_with(ok(json!({ "value": [] })))
        .expect(1)
        .mount(&server)
        .await;

    call(
        &server,
        "advsec_get_alerts",
        json!({
            "project": "Fabrikam",
            "repository": "web",
            "alertType": "secret",
            "states": ["active", "dismissed"]
        }),
    )
    .await;
}

#[tokio::test]
async fn test_team_iterations_path() {
    let server = mock_org().await;
    Mock::given(method("GET"))
        .and(path("/contoso/Fabrikam/Web%20Team/_apis/work/teamsettings/iterations"))
        .and(query_param("$timeframe", "current"))
        .respond_with(ok(json!({ "value": [] })))
        .expect(1)
        .mount(&server)
        .await;

    call(
        &server,
        "work_list_team_iterations",
        json!({ "project": "Fabrikam", "team": "Web Team", "timeframe": "current" }),
    )
    .await;
}
