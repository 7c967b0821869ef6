//! Pipelines domain: build definitions, builds, logs, runs

use std::collections::HashMap;
use std::sync::Arc;

use azdo_core::{Domain, Result};
use serde::Deserialize;
use serde_json::{json, Value};

use super::handler::object_schema;
use super::{DomainTools, Query, ToolDeps, ToolRegistry};
use crate::client::{segment, ApiArea, DevOpsClient};

pub fn register(registry: &mut ToolRegistry, deps: &ToolDeps) -> Result<()> {
    let mut tools = DomainTools::new(registry, Domain::Pipelines, deps);

    tools.add(
        "pipelines_get_build_definitions",
        "List build definitions in a project.",
        object_schema(
            json!({
                "project": { "type": "string" },
                "name": { "type": "string", "description": "Filter by definition name" },
                "top": { "type": "integer", "minimum": 1 }
            }),
            &["project"],
        ),
        get_build_definitions,
    )?;

    tools.add(
        "pipelines_get_builds",
        "List builds in a project.",
        object_schema(
            json!({
                "project": { "type": "string" },
                "definitions": { "type": "array", "items": { "type": "integer" } },
                "branchName": { "type": "string" },
                "statusFilter": { "type": "string", "enum": ["all", "cancelling", "completed", "inProgress", "notStarted", "postponed"] },
                "resultFilter": { "type": "string", "enum": ["canceled", "failed", "none", "partiallySucceeded", "succeeded"] },
                "top": { "type": "integer", "minimum": 1 }
            }),
            &["project"],
        ),
        get_builds,
    )?;

    tools.add(
        "pipelines_get_build_status",
        "Get the status of a build.",
        object_schema(
            json!({
                "project": { "type": "string" },
                "buildId": { "type": "integer" }
            }),
            &["project", "buildId"],
        ),
        get_build_status,
    )?;

    tools.add(
        "pipelines_get_build_log",
        "List the logs of a build, or fetch one log's text when logId is given.",
        object_schema(
            json!({
                "project": { "type": "string" },
                "buildId": { "type": "integer" },
                "logId": { "type": "integer" }
            }),
            &["project", "buildId"],
        ),
        get_build_log,
    )?;

    tools.add(
        "pipelines_run_pipeline",
        "Queue a run of a pipeline.",
        object_schema(
            json!({
                "project": { "type": "string" },
                "pipelineId": { "type": "integer" },
                "branch": { "type": "string", "description": "Branch to run, e.g. refs/heads/main" },
                "templateParameters": { "type": "object", "additionalProperties": { "type": "string" } }
            }),
            &["project", "pipelineId"],
        ),
        run_pipeline,
    )?;

    Ok(())
}

#[derive(Debug, Deserialize)]
struct BuildDefinitions {
    project: String,
    name: Option<String>,
    top: Option<u32>,
}

async fn get_build_definitions(
    client: Arc<DevOpsClient>,
    p: BuildDefinitions,
) -> anyhow::Result<Value> {
    let path = format!("{}/_apis/build/definitions", segment(&p.project));
    let query = Query::new().opt("name", p.name).opt("$top", p.top).build();
    Ok(client.get(ApiArea::Core, &path, &query).await?)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Builds {
    project: String,
    #[serde(default)]
    definitions: Vec<u32>,
    branch_name: Option<String>,
    status_filter: Option<String>,
    result_filter: Option<String>,
    top: Option<u32>,
}

async fn get_builds(client: Arc<DevOpsClient>, p: Builds) -> anyhow::Result<Value> {
    let definitions: Vec<String> = p.definitions.iter().map(u32::to_string).collect();
    let path = format!("{}/_apis/build/builds", segment(&p.project));
    let query = Query::new()
        .list("definitions", &definitions)
        .opt("branchName", p.branch_name)
        .opt("statusFilter", p.status_filter)
        .opt("resultFilter", p.result_filter)
        .opt("$top", p.top)
        .build();
    Ok(client.get(ApiArea::Core, &path, &query).await?)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuildRef {
    project: String,
    build_id: u32,
}

async fn get_build_status(client: Arc<DevOpsClient>, p: BuildRef) -> anyhow::Result<Value> {
    let path = format!("{}/_apis/build/builds/{}", segment(&p.project), p.build_id);
    Ok(client.get(ApiArea::Core, &path, &[]).await?)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuildLog {
    project: String,
    build_id: u32,
    log_id: Option<u32>,
}

async fn get_build_log(client: Arc<DevOpsClient>, p: BuildLog) -> anyhow::Result<Value> {
    let logs = format!("{}/_apis/build/builds/{}/logs", segment(&p.project), p.build_id);
    match p.log_id {
        Some(log_id) => {
            let text = client
                .get_text(ApiArea::Core, &format!("{}/{}", logs, log_id), &[])
                .await?;
            Ok(Value::String(text))
        }
        None => Ok(client.get(ApiArea::Core, &logs, &[]).await?),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunPipeline {
    project: String,
    pipeline_id: u32,
    branch: Option<String>,
    #[serde(default)]
    template_parameters: HashMap<String, String>,
}

async fn run_pipeline(client: Arc<DevOpsClient>, p: RunPipeline) -> anyhow::Result<Value> {
    let mut body = json!({});
    if let Some(branch) = &p.branch {
        body["resources"] = json!({ "repositories": { "self": { "refName": branch } } });
    }
    if !p.template_parameters.is_empty() {
        body["templateParameters"] = json!(p.template_parameters);
    }
    let path = format!(
        "{}/_apis/pipelines/{}/runs",
        segment(&p.project),
        p.pipeline_id
    );
    Ok(client.post(ApiArea::Core, &path, &[], &body).await?)
}
