//! Repositories domain: git repositories, branches, pull requests

use std::sync::Arc;

use anyhow::Context;
use azdo_core::{Domain, Result};
use serde::Deserialize;
use serde_json::{json, Value};

use super::handler::object_schema;
use super::{DomainTools, Query, ToolDeps, ToolRegistry};
use crate::client::{segment, ApiArea, DevOpsClient};

pub fn register(registry: &mut ToolRegistry, deps: &ToolDeps) -> Result<()> {
    let mut tools = DomainTools::new(registry, Domain::Repositories, deps);

    tools.add(
        "repo_list_repos_by_project",
        "List git repositories in a project.",
        object_schema(json!({ "project": { "type": "string" } }), &["project"]),
        list_repos,
    )?;

    tools.add(
        "repo_get_repo_by_name_or_id",
        "Get a repository by name or id.",
        object_schema(
            json!({
                "project": { "type": "string" },
                "repositoryNameOrId": { "type": "string" }
            }),
            &["project", "repositoryNameOrId"],
        ),
        get_repo,
    )?;

    tools.add(
        "repo_list_branches_by_repo",
        "List branches of a repository.",
        object_schema(
            json!({
                "project": { "type": "string" },
                "repositoryId": { "type": "string" },
                "top": { "type": "integer", "minimum": 1 }
            }),
            &["project", "repositoryId"],
        ),
        list_branches,
    )?;

    tools.add(
        "repo_list_pull_requests_by_repo",
        "List pull requests of a repository.",
        object_schema(
            json!({
                "project": { "type": "string" },
                "repositoryId": { "type": "string" },
                "status": { "type": "string", "enum": ["active", "abandoned", "completed", "all"], "description": "Default active" },
                "top": { "type": "integer", "minimum": 1 },
                "skip": { "type": "integer", "minimum": 0 }
            }),
            &["project", "repositoryId"],
        ),
        list_pull_requests,
    )?;

    tools.add(
        "repo_get_pull_request_by_id",
        "Get a pull request by id.",
        object_schema(
            json!({
                "project": { "type": "string" },
                "repositoryId": { "type": "string" },
                "pullRequestId": { "type": "integer" }
            }),
            &["project", "repositoryId", "pullRequestId"],
        ),
        get_pull_request,
    )?;

    tools.add(
        "repo_create_pull_request",
        "Create a pull request.",
        object_schema(
            json!({
                "project": { "type": "string" },
                "repositoryId": { "type": "string" },
                "sourceRefName": { "type": "string", "description": "Source branch, e.g. feature/x or refs/heads/feature/x" },
                "targetRefName": { "type": "string" },
                "title": { "type": "string" },
                "description": { "type": "string" },
                "isDraft": { "type": "boolean" }
            }),
            &["project", "repositoryId", "sourceRefName", "targetRefName", "title"],
        ),
        create_pull_request,
    )?;

    tools.add(
        "repo_list_pull_request_threads",
        "List comment threads of a pull request.",
        object_schema(
            json!({
                "project": { "type": "string" },
                "repositoryId": { "type": "string" },
                "pullRequestId": { "type": "integer" }
            }),
            &["project", "repositoryId", "pullRequestId"],
        ),
        list_threads,
    )?;

    Ok(())
}

fn repo_path(project: &str, repository: &str, rest: &str) -> String {
    let base = format!(
        "{}/_apis/git/repositories/{}",
        segment(project),
        segment(repository)
    );
    if rest.is_empty() {
        base
    } else {
        format!("{}/{}", base, rest)
    }
}

/// Qualify a short branch name as `refs/heads/<name>`
fn branch_ref(name: &str) -> String {
    if name.starts_with("refs/") {
        name.to_string()
    } else {
        format!("refs/heads/{}", name)
    }
}

#[derive(Debug, Deserialize)]
struct Project {
    project: String,
}

async fn list_repos(client: Arc<DevOpsClient>, p: Project) -> anyhow::Result<Value> {
    let path = format!("{}/_apis/git/repositories", segment(&p.project));
    Ok(client.get(ApiArea::Core, &path, &[]).await?)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetRepo {
    project: String,
    repository_name_or_id: String,
}

async fn get_repo(client: Arc<DevOpsClient>, p: GetRepo) -> anyhow::Result<Value> {
    let path = repo_path(&p.project, &p.repository_name_or_id, "");
    client
        .get(ApiArea::Core, &path, &[])
        .await
        .with_context(|| format!("Repository '{}' not found", p.repository_name_or_id))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListBranches {
    project: String,
    repository_id: String,
    top: Option<u32>,
}

async fn list_branches(client: Arc<DevOpsClient>, p: ListBranches) -> anyhow::Result<Value> {
    let path = repo_path(&p.project, &p.repository_id, "refs");
    let query = Query::new()
        .push("filter", "heads/")
        .opt("$top", p.top)
        .build();
    Ok(client.get(ApiArea::Core, &path, &query).await?)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListPullRequests {
    project: String,
    repository_id: String,
    status: Option<String>,
    top: Option<u32>,
    skip: Option<u32>,
}

async fn list_pull_requests(
    client: Arc<DevOpsClient>,
    p: ListPullRequests,
) -> anyhow::Result<Value> {
    let path = repo_path(&p.project, &p.repository_id, "pullrequests");
    let query = Query::new()
        .push("searchCriteria.status", p.status.as_deref().unwrap_or("active"))
        .opt("$top", p.top)
        .opt("$skip", p.skip)
        .build();
    Ok(client.get(ApiArea::Core, &path, &query).await?)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestRef {
    project: String,
    repository_id: String,
    pull_request_id: u32,
}

async fn get_pull_request(client: Arc<DevOpsClient>, p: PullRequestRef) -> anyhow::Result<Value> {
    let path = repo_path(
        &p.project,
        &p.repository_id,
        &format!("pullrequests/{}", p.pull_request_id),
    );
    Ok(client.get(ApiArea::Core, &path, &[]).await?)
}

async fn list_threads(client: Arc<DevOpsClient>, p: PullRequestRef) -> anyhow::Result<Value> {
    let path = repo_path(
        &p.project,
        &p.repository_id,
        &format!("pullrequests/{}/threads", p.pull_request_id),
    );
    Ok(client.get(ApiArea::Core, &path, &[]).await?)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatePullRequest {
    project: String,
    repository_id: String,
    source_ref_name: String,
    target_ref_name: String,
    title: String,
    description: Option<String>,
    #[serde(default)]
    is_draft: bool,
}

async fn create_pull_request(
    client: Arc<DevOpsClient>,
    p: CreatePullRequest,
) -> anyhow::Result<Value> {
    let body = json!({
        "sourceRefName": branch_ref(&p.source_ref_name),
        "targetRefName": branch_ref(&p.target_ref_name),
        "title": p.title,
        "description": p.description.unwrap_or_default(),
        "isDraft": p.is_draft,
    });
    let path = repo_path(&p.project, &p.repository_id, "pullrequests");
    Ok(client.post(ApiArea::Core, &path, &[], &body).await?)
}
