//! Core domain: projects, teams, identities

use std::sync::Arc;

use anyhow::Context;
use azdo_core::{Domain, Result};
use serde::Deserialize;
use serde_json::{json, Value};

use super::handler::object_schema;
use super::{DomainTools, Query, ToolDeps, ToolRegistry};
use crate::client::{segment, ApiArea, DevOpsClient};

pub fn register(registry: &mut ToolRegistry, deps: &ToolDeps) -> Result<()> {
    let mut tools = DomainTools::new(registry, Domain::Core, deps);

    tools.add(
        "core_list_projects",
        "List projects in the organization.",
        object_schema(
            json!({
                "stateFilter": { "type": "string", "enum": ["all", "wellFormed", "createPending", "deleted"], "description": "Project state filter (default wellFormed)" },
                "top": { "type": "integer", "minimum": 1, "description": "Maximum number of projects" },
                "skip": { "type": "integer", "minimum": 0 },
                "continuationToken": { "type": "string" }
            }),
            &[],
        ),
        list_projects,
    )?;

    tools.add(
        "core_list_project_teams",
        "List teams in a project.",
        object_schema(
            json!({
                "project": { "type": "string", "description": "Project name or id" },
                "mine": { "type": "boolean", "description": "Only teams the caller belongs to" },
                "top": { "type": "integer", "minimum": 1 },
                "skip": { "type": "integer", "minimum": 0 }
            }),
            &["project"],
        ),
        list_project_teams,
    )?;

    tools.add(
        "core_get_identity_ids",
        "Find identity ids matching a display name or email.",
        object_schema(
            json!({
                "searchFilter": { "type": "string", "description": "Name or email to search for" }
            }),
            &["searchFilter"],
        ),
        get_identity_ids,
    )?;

    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListProjects {
    state_filter: Option<String>,
    top: Option<u32>,
    skip: Option<u32>,
    continuation_token: Option<String>,
}

async fn list_projects(client: Arc<DevOpsClient>, p: ListProjects) -> anyhow::Result<Value> {
    let query = Query::new()
        .opt("stateFilter", p.state_filter)
        .opt("$top", p.top)
        .opt("$skip", p.skip)
        .opt("continuationToken", p.continuation_token)
        .build();
    client
        .get(ApiArea::Core, "_apis/projects", &query)
        .await
        .context("Failed to list projects")
}

#[derive(Debug, Deserialize)]
struct ListProjectTeams {
    project: String,
    mine: Option<bool>,
    top: Option<u32>,
    skip: Option<u32>,
}

async fn list_project_teams(
    client: Arc<DevOpsClient>,
    p: ListProjectTeams,
) -> anyhow::Result<Value> {
    let query = Query::new()
        .opt("$mine", p.mine)
        .opt("$top", p.top)
        .opt("$skip", p.skip)
        .build();
    let path = format!("_apis/projects/{}/teams", segment(&p.project));
    client
        .get(ApiArea::Core, &path, &query)
        .await
        .context("Failed to list teams")
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetIdentityIds {
    search_filter: String,
}

async fn get_identity_ids(client: Arc<DevOpsClient>, p: GetIdentityIds) -> anyhow::Result<Value> {
    let query = Query::new()
        .push("searchFilter", "General")
        .push("filterValue", &p.search_filter)
        .build();
    let found = client
        .get(ApiArea::Identity, "_apis/identities", &query)
        .await?;

    let ids: Vec<Value> = found["value"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|i| {
                    json!({
                        "id": i["id"],
                        "displayName": i["providerDisplayName"],
                        "descriptor": i["descriptor"],
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    if ids.is_empty() {
        anyhow::bail!("No identities found for '{}'", p.search_filter);
    }
    Ok(Value::Array(ids))
}
