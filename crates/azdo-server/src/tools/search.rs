//! Search domain: code, wiki and work item search
//!
//! All three endpoints live on the search host and take the same request
//! shape: `searchText`, `$skip`, `$top` and an optional `filters` map of
//! facet name to accepted values.

use std::collections::BTreeMap;
use std::sync::Arc;

use azdo_core::{Domain, Result};
use serde::Deserialize;
use serde_json::{json, Value};

use super::handler::object_schema;
use super::{DomainTools, ToolDeps, ToolRegistry};
use crate::client::{ApiArea, DevOpsClient};

const DEFAULT_TOP: u32 = 10;

pub fn register(registry: &mut ToolRegistry, deps: &ToolDeps) -> Result<()> {
    let mut tools = DomainTools::new(registry, Domain::Search, deps);

    tools.add(
        "search_code",
        "Search source code across repositories.",
        search_schema(json!({
            "project": { "type": "array", "items": { "type": "string" } },
            "repository": { "type": "array", "items": { "type": "string" } },
            "path": { "type": "array", "items": { "type": "string" } },
            "branch": { "type": "array", "items": { "type": "string" } }
        })),
        search_code,
    )?;

    tools.add(
        "search_wiki",
        "Search wiki pages.",
        search_schema(json!({
            "project": { "type": "array", "items": { "type": "string" } },
            "wiki": { "type": "array", "items": { "type": "string" } }
        })),
        search_wiki,
    )?;

    tools.add(
        "search_workitem",
        "Search work items by text.",
        search_schema(json!({
            "project": { "type": "array", "items": { "type": "string" } },
            "areaPath": { "type": "array", "items": { "type": "string" } },
            "workItemType": { "type": "array", "items": { "type": "string" } },
            "state": { "type": "array", "items": { "type": "string" } },
            "assignedTo": { "type": "array", "items": { "type": "string" } }
        })),
        search_workitem,
    )?;

    Ok(())
}

fn search_schema(filters: Value) -> Value {
    let mut props = json!({
        "searchText": { "type": "string" },
        "skip": { "type": "integer", "minimum": 0 },
        "top": { "type": "integer", "minimum": 1, "description": "Default 10" }
    });
    if let Value::Object(filters) = filters {
        for (name, schema) in filters {
            props[name] = schema;
        }
    }
    object_schema(props, &["searchText"])
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CodeSearch {
    search_text: String,
    skip: Option<u32>,
    top: Option<u32>,
    #[serde(default)]
    project: Vec<String>,
    #[serde(default)]
    repository: Vec<String>,
    #[serde(default)]
    path: Vec<String>,
    #[serde(default)]
    branch: Vec<String>,
}

async fn search_code(client: Arc<DevOpsClient>, p: CodeSearch) -> anyhow::Result<Value> {
    let filters = Filters::default()
        .with("Project", p.project)
        .with("Repository", p.repository)
        .with("Path", p.path)
        .with("Branch", p.branch);
    let body = search_body(&p.search_text, p.skip, p.top, filters);
    Ok(client
        .post(ApiArea::Search, "_apis/search/codesearchresults", &[], &body)
        .await?)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WikiSearch {
    search_text: String,
    skip: Option<u32>,
    top: Option<u32>,
    #[serde(default)]
    project: Vec<String>,
    #[serde(default)]
    wiki: Vec<String>,
}

async fn search_wiki(client: Arc<DevOpsClient>, p: WikiSearch) -> anyhow::Result<Value> {
    let filters = Filters::default()
        .with("Project", p.project)
        .with("Wiki", p.wiki);
    let body = search_body(&p.search_text, p.skip, p.top, filters);
    Ok(client
        .post(ApiArea::Search, "_apis/search/wikisearchresults", &[], &body)
        .await?)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkItemSearch {
    search_text: String,
    skip: Option<u32>,
    top: Option<u32>,
    #[serde(default)]
    project: Vec<String>,
    #[serde(default)]
    area_path: Vec<String>,
    #[serde(default)]
    work_item_type: Vec<String>,
    #[serde(default)]
    state: Vec<String>,
    #[serde(default)]
    assigned_to: Vec<String>,
}

async fn search_workitem(client: Arc<DevOpsClient>, p: WorkItemSearch) -> anyhow::Result<Value> {
    let filters = Filters::default()
        .with("System.TeamProject", p.project)
        .with("System.AreaPath", p.area_path)
        .with("System.WorkItemType", p.work_item_type)
        .with("System.State", p.state)
        .with("System.AssignedTo", p.assigned_to);
    let body = search_body(&p.search_text, p.skip, p.top, filters);
    Ok(client
        .post(ApiArea::Search, "_apis/search/workitemsearchresults", &[], &body)
        .await?)
}

/// Facet filters, empty facets dropped
#[derive(Debug, Default)]
struct Filters(BTreeMap<&'static str, Vec<String>>);

impl Filters {
    fn with(mut self, facet: &'static str, values: Vec<String>) -> Self {
        if !values.is_empty() {
            self.0.insert(facet, values);
        }
        self
    }
}

fn search_body(text: &str, skip: Option<u32>, top: Option<u32>, filters: Filters) -> Value {
    let mut body = json!({
        "searchText": text,
        "$skip": skip.unwrap_or(0),
        "$top": top.unwrap_or(DEFAULT_TOP),
        "includeFacets": false,
    });
    if !filters.0.is_empty() {
        body["filters"] = json!(filters.0);
    }
    body
}
