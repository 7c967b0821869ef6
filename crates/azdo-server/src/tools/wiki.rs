//! Wiki domain

use std::sync::Arc;

use azdo_core::{Domain, Result};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};

use super::handler::object_schema;
use super::{DomainTools, Query, ToolDeps, ToolRegistry};
use crate::client::{segment, ApiArea, Body, DevOpsClient};

pub fn register(registry: &mut ToolRegistry, deps: &ToolDeps) -> Result<()> {
    let mut tools = DomainTools::new(registry, Domain::Wiki, deps);

    tools.add(
        "wiki_list_wikis",
        "List wikis in the organization or a project.",
        object_schema(json!({ "project": { "type": "string" } }), &[]),
        list_wikis,
    )?;

    tools.add(
        "wiki_get_wiki",
        "Get a wiki by name or id.",
        object_schema(
            json!({
                "project": { "type": "string" },
                "wikiIdentifier": { "type": "string" }
            }),
            &["wikiIdentifier"],
        ),
        get_wiki,
    )?;

    tools.add(
        "wiki_list_pages",
        "List pages of a wiki.",
        object_schema(
            json!({
                "project": { "type": "string" },
                "wikiIdentifier": { "type": "string" },
                "top": { "type": "integer", "minimum": 1, "description": "Default 20" },
                "continuationToken": { "type": "string" }
            }),
            &["project", "wikiIdentifier"],
        ),
        list_pages,
    )?;

    tools.add(
        "wiki_get_page_content",
        "Get the markdown content of a wiki page.",
        object_schema(
            json!({
                "project": { "type": "string" },
                "wikiIdentifier": { "type": "string" },
                "path": { "type": "string", "description": "Page path, e.g. /Home" }
            }),
            &["project", "wikiIdentifier", "path"],
        ),
        get_page_content,
    )?;

    tools.add(
        "wiki_create_or_update_page",
        "Create a wiki page, or update it when etag is given.",
        object_schema(
            json!({
                "project": { "type": "string" },
                "wikiIdentifier": { "type": "string" },
                "path": { "type": "string" },
                "content": { "type": "string" },
                "etag": { "type": "string", "description": "Version of the page being replaced" }
            }),
            &["project", "wikiIdentifier", "path", "content"],
        ),
        create_or_update_page,
    )?;

    Ok(())
}

fn wiki_path(project: Option<&str>, wiki: &str, rest: &str) -> String {
    let mut path = match project {
        Some(project) => format!("{}/_apis/wiki/wikis/{}", segment(project), segment(wiki)),
        None => format!("_apis/wiki/wikis/{}", segment(wiki)),
    };
    if !rest.is_empty() {
        path.push('/');
        path.push_str(rest);
    }
    path
}

#[derive(Debug, Deserialize)]
struct ListWikis {
    project: Option<String>,
}

async fn list_wikis(client: Arc<DevOpsClient>, p: ListWikis) -> anyhow::Result<Value> {
    let path = match &p.project {
        Some(project) => format!("{}/_apis/wiki/wikis", segment(project)),
        None => "_apis/wiki/wikis".to_string(),
    };
    Ok(client.get(ApiArea::Core, &path, &[]).await?)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetWiki {
    project: Option<String>,
    wiki_identifier: String,
}

async fn get_wiki(client: Arc<DevOpsClient>, p: GetWiki) -> anyhow::Result<Value> {
    let path = wiki_path(p.project.as_deref(), &p.wiki_identifier, "");
    Ok(client.get(ApiArea::Core, &path, &[]).await?)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListPages {
    project: String,
    wiki_identifier: String,
    top: Option<u32>,
    continuation_token: Option<String>,
}

async fn list_pages(client: Arc<DevOpsClient>, p: ListPages) -> anyhow::Result<Value> {
    let mut body = json!({ "top": p.top.unwrap_or(20) });
    if let Some(token) = &p.continuation_token {
        body["continuationToken"] = json!(token);
    }
    let path = wiki_path(Some(&p.project), &p.wiki_identifier, "pagesbatch");
    Ok(client.post(ApiArea::Core, &path, &[], &body).await?)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageContent {
    project: String,
    wiki_identifier: String,
    path: String,
}

async fn get_page_content(client: Arc<DevOpsClient>, p: PageContent) -> anyhow::Result<Value> {
    let path = wiki_path(Some(&p.project), &p.wiki_identifier, "pages");
    let query = Query::new()
        .push("path", &p.path)
        .push("includeContent", true)
        .build();
    let page = client.get(ApiArea::Core, &path, &query).await?;
    match page.get("content") {
        Some(Value::String(content)) => Ok(Value::String(content.clone())),
        _ => anyhow::bail!("Page '{}' has no content", p.path),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WritePage {
    project: String,
    wiki_identifier: String,
    path: String,
    content: String,
    etag: Option<String>,
}

async fn create_or_update_page(client: Arc<DevOpsClient>, p: WritePage) -> anyhow::Result<Value> {
    let path = wiki_path(Some(&p.project), &p.wiki_identifier, "pages");
    let query = Query::new().push("path", &p.path).build();
    let body = json!({ "content": p.content });
    let headers: Vec<(&'static str, String)> = p
        .etag
        .iter()
        .map(|etag| ("If-Match", etag.clone()))
        .collect();
    Ok(client
        .request_with_headers(
            Method::PUT,
            ApiArea::Core,
            &path,
            &query,
            Body::Json(&body),
            &headers,
        )
        .await?)
}
