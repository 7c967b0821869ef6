//! Test plans domain

use std::sync::Arc;

use azdo_core::{Domain, Result};
use serde::Deserialize;
use serde_json::{json, Value};

use super::handler::object_schema;
use super::{DomainTools, Query, ToolDeps, ToolRegistry};
use crate::client::{segment, ApiArea, DevOpsClient};

pub fn register(registry: &mut ToolRegistry, deps: &ToolDeps) -> Result<()> {
    let mut tools = DomainTools::new(registry, Domain::TestPlans, deps);

    tools.add(
        "testplan_list_test_plans",
        "List test plans in a project.",
        object_schema(
            json!({
                "project": { "type": "string" },
                "filterActivePlans": { "type": "boolean", "description": "Default true" },
                "includePlanDetails": { "type": "boolean" },
                "continuationToken": { "type": "string" }
            }),
            &["project"],
        ),
        list_test_plans,
    )?;

    tools.add(
        "testplan_list_test_suites",
        "List test suites of a test plan.",
        object_schema(
            json!({
                "project": { "type": "string" },
                "planId": { "type": "integer" }
            }),
            &["project", "planId"],
        ),
        list_test_suites,
    )?;

    tools.add(
        "testplan_list_test_cases",
        "List test cases of a test suite.",
        object_schema(
            json!({
                "project": { "type": "string" },
                "planId": { "type": "integer" },
                "suiteId": { "type": "integer" }
            }),
            &["project", "planId", "suiteId"],
        ),
        list_test_cases,
    )?;

    tools.add(
        "testplan_show_test_results_from_build_id",
        "List test runs produced by a build.",
        object_schema(
            json!({
                "project": { "type": "string" },
                "buildId": { "type": "integer" }
            }),
            &["project", "buildId"],
        ),
        test_results_from_build,
    )?;

    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListPlans {
    project: String,
    filter_active_plans: Option<bool>,
    #[serde(default)]
    include_plan_details: bool,
    continuation_token: Option<String>,
}

async fn list_test_plans(client: Arc<DevOpsClient>, p: ListPlans) -> anyhow::Result<Value> {
    let path = format!("{}/_apis/testplan/plans", segment(&p.project));
    let query = Query::new()
        .push("filterActivePlans", p.filter_active_plans.unwrap_or(true))
        .push("includePlanDetails", p.include_plan_details)
        .opt("continuationToken", p.continuation_token)
        .build();
    Ok(client.get(ApiArea::Core, &path, &query).await?)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListSuites {
    project: String,
    plan_id: u32,
}

async fn list_test_suites(client: Arc<DevOpsClient>, p: ListSuites) -> anyhow::Result<Value> {
    let path = format!(
        "{}/_apis/testplan/Plans/{}/suites",
        segment(&p.project),
        p.plan_id
    );
    let query = Query::new().push("asTreeView", true).build();
    Ok(client.get(ApiArea::Core, &path, &query).await?)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListCases {
    project: String,
    plan_id: u32,
    suite_id: u32,
}

async fn list_test_cases(client: Arc<DevOpsClient>, p: ListCases) -> anyhow::Result<Value> {
    let path = format!(
        "{}/_apis/testplan/Plans/{}/Suites/{}/TestCase",
        segment(&p.project),
        p.plan_id,
        p.suite_id
    );
    Ok(client.get(ApiArea::Core, &path, &[]).await?)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuildResults {
    project: String,
    build_id: u32,
}

async fn test_results_from_build(
    client: Arc<DevOpsClient>,
    p: BuildResults,
) -> anyhow::Result<Value> {
    let path = format!("{}/_apis/test/runs", segment(&p.project));
    let query = Query::new()
        .push("buildUri", format!("vstfs:///Build/Build/{}", p.build_id))
        .build();
    Ok(client.get(ApiArea::Core, &path, &query).await?)
}
