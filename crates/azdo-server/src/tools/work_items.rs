//! Work items domain: read, batch read, create, update, comments, queries

use std::sync::Arc;

use anyhow::Context;
use azdo_core::{Domain, Result};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};

use super::handler::object_schema;
use super::{DomainTools, Query, ToolDeps, ToolRegistry};
use crate::client::{segment, ApiArea, Body, DevOpsClient};

/// Upper bound of the work items batch endpoint
pub const MAX_BATCH_IDS: usize = 200;

/// Comments API is only published as preview
const COMMENTS_API_VERSION: &str = "7.1-preview.4";

pub fn register(registry: &mut ToolRegistry, deps: &ToolDeps) -> Result<()> {
    let mut tools = DomainTools::new(registry, Domain::WorkItems, deps);

    tools.add(
        "wit_get_work_item",
        "Get a single work item by id.",
        object_schema(
            json!({
                "id": { "type": "integer" },
                "project": { "type": "string" },
                "fields": { "type": "array", "items": { "type": "string" } },
                "expand": { "type": "string", "enum": ["none", "relations", "fields", "links", "all"] }
            }),
            &["id", "project"],
        ),
        get_work_item,
    )?;

    tools.add(
        "wit_get_work_items_batch_by_ids",
        "Get up to 200 work items by id in one call.",
        object_schema(
            json!({
                "project": { "type": "string" },
                "ids": { "type": "array", "items": { "type": "integer" }, "minItems": 1, "maxItems": MAX_BATCH_IDS },
                "fields": { "type": "array", "items": { "type": "string" } }
            }),
            &["project", "ids"],
        ),
        get_work_items_batch,
    )?;

    tools.add(
        "wit_my_work_items",
        "List work items assigned to the authenticated user in a project.",
        object_schema(
            json!({
                "project": { "type": "string" },
                "includeCompleted": { "type": "boolean" },
                "top": { "type": "integer", "minimum": 1 }
            }),
            &["project"],
        ),
        my_work_items,
    )?;

    tools.add(
        "wit_list_work_item_comments",
        "List comments on a work item.",
        object_schema(
            json!({
                "project": { "type": "string" },
                "workItemId": { "type": "integer" },
                "top": { "type": "integer", "minimum": 1 }
            }),
            &["project", "workItemId"],
        ),
        list_comments,
    )?;

    tools.add(
        "wit_add_work_item_comment",
        "Add a comment to a work item.",
        object_schema(
            json!({
                "project": { "type": "string" },
                "workItemId": { "type": "integer" },
                "comment": { "type": "string" }
            }),
            &["project", "workItemId", "comment"],
        ),
        add_comment,
    )?;

    tools.add(
        "wit_create_work_item",
        "Create a work item of the given type with field values.",
        object_schema(
            json!({
                "project": { "type": "string" },
                "workItemType": { "type": "string", "description": "e.g. Task, Bug, User Story" },
                "fields": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string", "description": "Reference name, e.g. System.Title" },
                            "value": {}
                        },
                        "required": ["name", "value"]
                    }
                }
            }),
            &["project", "workItemType", "fields"],
        ),
        create_work_item,
    )?;

    tools.add(
        "wit_update_work_item",
        "Apply JSON patch operations to a work item.",
        object_schema(
            json!({
                "id": { "type": "integer" },
                "updates": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "op": { "type": "string", "enum": ["add", "replace", "remove"] },
                            "path": { "type": "string", "description": "e.g. /fields/System.State" },
                            "value": {}
                        },
                        "required": ["path"]
                    }
                }
            }),
            &["id", "updates"],
        ),
        update_work_item,
    )?;

    tools.add(
        "wit_get_query_results_by_id",
        "Run a saved query and return its results.",
        object_schema(
            json!({
                "id": { "type": "string", "description": "Query GUID" },
                "project": { "type": "string" },
                "top": { "type": "integer", "minimum": 1 }
            }),
            &["id"],
        ),
        get_query_results,
    )?;

    Ok(())
}

#[derive(Debug, Deserialize)]
struct GetWorkItem {
    id: u32,
    project: String,
    #[serde(default)]
    fields: Vec<String>,
    expand: Option<String>,
}

async fn get_work_item(client: Arc<DevOpsClient>, p: GetWorkItem) -> anyhow::Result<Value> {
    let path = format!("{}/_apis/wit/workitems/{}", segment(&p.project), p.id);
    let query = Query::new()
        .list("fields", &p.fields)
        .opt("$expand", p.expand)
        .build();
    client
        .get(ApiArea::Core, &path, &query)
        .await
        .with_context(|| format!("Failed to get work item {}", p.id))
}

#[derive(Debug, Deserialize)]
struct BatchByIds {
    project: String,
    ids: Vec<u32>,
    #[serde(default)]
    fields: Vec<String>,
}

async fn get_work_items_batch(client: Arc<DevOpsClient>, p: BatchByIds) -> anyhow::Result<Value> {
    validate_batch(&p.ids)?;

    let mut body = json!({ "ids": p.ids });
    if !p.fields.is_empty() {
        body["fields"] = json!(p.fields);
    }
    let path = format!("{}/_apis/wit/workitemsbatch", segment(&p.project));
    Ok(client.post(ApiArea::Core, &path, &[], &body).await?)
}

fn validate_batch(ids: &[u32]) -> anyhow::Result<()> {
    if ids.is_empty() {
        anyhow::bail!("At least one work item id is required");
    }
    if ids.len() > MAX_BATCH_IDS {
        anyhow::bail!(
            "Too many ids: {} requested, at most {} per batch",
            ids.len(),
            MAX_BATCH_IDS
        );
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyWorkItems {
    project: String,
    #[serde(default)]
    include_completed: bool,
    top: Option<u32>,
}

async fn my_work_items(client: Arc<DevOpsClient>, p: MyWorkItems) -> anyhow::Result<Value> {
    let body = json!({ "query": my_work_items_wiql(&p.project, p.include_completed) });
    let path = format!("{}/_apis/wit/wiql", segment(&p.project));
    let query = Query::new().push("$top", p.top.unwrap_or(50)).build();
    Ok(client.post(ApiArea::Core, &path, &query, &body).await?)
}

fn my_work_items_wiql(project: &str, include_completed: bool) -> String {
    let mut wiql = format!(
        "SELECT [System.Id] FROM WorkItems WHERE [System.AssignedTo] = @Me AND [System.TeamProject] = '{}'",
        project.replace('\'', "''")
    );
    if !include_completed {
        wiql.push_str(" AND [System.State] NOT IN ('Closed', 'Done', 'Removed', 'Completed')");
    }
    wiql.push_str(" ORDER BY [System.ChangedDate] DESC");
    wiql
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListComments {
    project: String,
    work_item_id: u32,
    top: Option<u32>,
}

async fn list_comments(client: Arc<DevOpsClient>, p: ListComments) -> anyhow::Result<Value> {
    let path = format!(
        "{}/_apis/wit/workItems/{}/comments",
        segment(&p.project),
        p.work_item_id
    );
    let query = Query::new()
        .push("api-version", COMMENTS_API_VERSION)
        .opt("$top", p.top)
        .build();
    Ok(client.get(ApiArea::Core, &path, &query).await?)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddComment {
    project: String,
    work_item_id: u32,
    comment: String,
}

async fn add_comment(client: Arc<DevOpsClient>, p: AddComment) -> anyhow::Result<Value> {
    let path = format!(
        "{}/_apis/wit/workItems/{}/comments",
        segment(&p.project),
        p.work_item_id
    );
    let query = Query::new().push("api-version", COMMENTS_API_VERSION).build();
    Ok(client
        .post(ApiArea::Core, &path, &query, &json!({ "text": p.comment }))
        .await?)
}

#[derive(Debug, Deserialize)]
struct FieldValue {
    name: String,
    value: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateWorkItem {
    project: String,
    work_item_type: String,
    fields: Vec<FieldValue>,
}

async fn create_work_item(client: Arc<DevOpsClient>, p: CreateWorkItem) -> anyhow::Result<Value> {
    if p.fields.is_empty() {
        anyhow::bail!("At least one field (e.g. System.Title) is required");
    }
    let patch: Vec<Value> = p
        .fields
        .iter()
        .map(|f| json!({ "op": "add", "path": format!("/fields/{}", f.name), "value": f.value }))
        .collect();
    let path = format!(
        "{}/_apis/wit/workitems/${}",
        segment(&p.project),
        segment(&p.work_item_type)
    );
    Ok(client
        .request(Method::POST, ApiArea::Core, &path, &[], Body::JsonPatch(&Value::Array(patch)))
        .await?)
}

#[derive(Debug, Deserialize)]
struct PatchOperation {
    #[serde(default = "default_op")]
    op: String,
    path: String,
    #[serde(default)]
    value: Value,
}

fn default_op() -> String {
    "add".to_string()
}

#[derive(Debug, Deserialize)]
struct UpdateWorkItem {
    id: u32,
    updates: Vec<PatchOperation>,
}

async fn update_work_item(client: Arc<DevOpsClient>, p: UpdateWorkItem) -> anyhow::Result<Value> {
    if p.updates.is_empty() {
        anyhow::bail!("No updates given");
    }
    let patch: Vec<Value> = p
        .updates
        .iter()
        .map(|u| {
            if u.op == "remove" {
                json!({ "op": u.op, "path": u.path })
            } else {
                json!({ "op": u.op, "path": u.path, "value": u.value })
            }
        })
        .collect();
    let path = format!("_apis/wit/workitems/{}", p.id);
    Ok(client
        .request(Method::PATCH, ApiArea::Core, &path, &[], Body::JsonPatch(&Value::Array(patch)))
        .await?)
}

#[derive(Debug, Deserialize)]
struct QueryResults {
    id: String,
    project: Option<String>,
    top: Option<u32>,
}

async fn get_query_results(client: Arc<DevOpsClient>, p: QueryResults) -> anyhow::Result<Value> {
    let path = match &p.project {
        Some(project) => format!("{}/_apis/wit/wiql/{}", segment(project), segment(&p.id)),
        None => format!("_apis/wit/wiql/{}", segment(&p.id)),
    };
    let query = Query::new().opt("$top", p.top).build();
    Ok(client.get(ApiArea::Core, &path, &query).await?)
}
