//! Advanced Security domain: code scanning, secret and dependency alerts

use std::sync::Arc;

use azdo_core::{Domain, Result};
use serde::Deserialize;
use serde_json::{json, Value};

use super::handler::object_schema;
use super::{DomainTools, Query, ToolDeps, ToolRegistry};
use crate::client::{segment, ApiArea, DevOpsClient};

const ALERTS_API_VERSION: &str = "7.2-preview.1";

pub fn register(registry: &mut ToolRegistry, deps: &ToolDeps) -> Result<()> {
    let mut tools = DomainTools::new(registry, Domain::AdvancedSecurity, deps);

    tools.add(
        "advsec_get_alerts",
        "List security alerts of a repository.",
        object_schema(
            json!({
                "project": { "type": "string" },
                "repository": { "type": "string" },
                "alertType": { "type": "string", "enum": ["code", "secret", "dependency"] },
                "states": { "type": "array", "items": { "type": "string", "enum": ["active", "dismissed", "fixed"] } },
                "severities": { "type": "array", "items": { "type": "string", "enum": ["critical", "high", "medium", "low", "note", "warning", "error"] } },
                "ref": { "type": "string", "description": "Branch ref, e.g. refs/heads/main" },
                "top": { "type": "integer", "minimum": 1, "description": "Default 100" },
                "continuationToken": { "type": "string" }
            }),
            &["project", "repository"],
        ),
        get_alerts,
    )?;

    tools.add(
        "advsec_get_alert_details",
        "Get the details of one security alert.",
        object_schema(
            json!({
                "project": { "type": "string" },
                "repository": { "type": "string" },
                "alertId": { "type": "integer" },
                "ref": { "type": "string" }
            }),
            &["project", "repository", "alertId"],
        ),
        get_alert_details,
    )?;

    Ok(())
}

fn alerts_path(project: &str, repository: &str) -> String {
    format!(
        "{}/_apis/alert/repositories/{}/alerts",
        segment(project),
        segment(repository)
    )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Alerts {
    project: String,
    repository: String,
    alert_type: Option<String>,
    #[serde(default)]
    states: Vec<String>,
    #[serde(default)]
    severities: Vec<String>,
    #[serde(rename = "ref")]
    git_ref: Option<String>,
    top: Option<u32>,
    continuation_token: Option<String>,
}

async fn get_alerts(client: Arc<DevOpsClient>, p: Alerts) -> anyhow::Result<Value> {
    let query = Query::new()
        .push("api-version", ALERTS_API_VERSION)
        .opt("criteria.alertType", p.alert_type)
        .list("criteria.states", &p.states)
        .list("criteria.severities", &p.severities)
        .opt("criteria.ref", p.git_ref)
        .push("top", p.top.unwrap_or(100))
        .opt("continuationToken", p.continuation_token)
        .build();
    let path = alerts_path(&p.project, &p.repository);
    Ok(client.get(ApiArea::AdvancedSecurity, &path, &query).await?)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AlertDetails {
    project: String,
    repository: String,
    alert_id: u64,
    #[serde(rename = "ref")]
    git_ref: Option<String>,
}

async fn get_alert_details(client: Arc<DevOpsClient>, p: AlertDetails) -> anyhow::Result<Value> {
    let path = format!("{}/{}", alerts_path(&p.project, &p.repository), p.alert_id);
    let query = Query::new()
        .push("api-version", ALERTS_API_VERSION)
        .opt("ref", p.git_ref)
        .build();
    Ok(client.get(ApiArea::AdvancedSecurity, &path, &query).await?)
}
