//! Work domain: iterations and team capacity

use std::sync::Arc;

use azdo_core::{Domain, Result};
use serde::Deserialize;
use serde_json::{json, Value};

use super::handler::object_schema;
use super::{DomainTools, Query, ToolDeps, ToolRegistry};
use crate::client::{segment, ApiArea, DevOpsClient};

pub fn register(registry: &mut ToolRegistry, deps: &ToolDeps) -> Result<()> {
    let mut tools = DomainTools::new(registry, Domain::Work, deps);

    tools.add(
        "work_list_team_iterations",
        "List the iterations assigned to a team.",
        object_schema(
            json!({
                "project": { "type": "string" },
                "team": { "type": "string" },
                "timeframe": { "type": "string", "enum": ["current"], "description": "Only the current iteration" }
            }),
            &["project", "team"],
        ),
        list_team_iterations,
    )?;

    tools.add(
        "work_list_iterations",
        "List the iteration tree of a project.",
        object_schema(
            json!({
                "project": { "type": "string" },
                "depth": { "type": "integer", "minimum": 1, "description": "Tree depth to return (default 2)" }
            }),
            &["project"],
        ),
        list_iterations,
    )?;

    tools.add(
        "work_get_team_capacity",
        "Get member capacity for a team iteration.",
        object_schema(
            json!({
                "project": { "type": "string" },
                "team": { "type": "string" },
                "iterationId": { "type": "string", "description": "Iteration GUID" }
            }),
            &["project", "team", "iterationId"],
        ),
        get_team_capacity,
    )?;

    Ok(())
}

#[derive(Debug, Deserialize)]
struct TeamIterations {
    project: String,
    team: String,
    timeframe: Option<String>,
}

async fn list_team_iterations(client: Arc<DevOpsClient>, p: TeamIterations) -> anyhow::Result<Value> {
    let path = format!(
        "{}/{}/_apis/work/teamsettings/iterations",
        segment(&p.project),
        segment(&p.team)
    );
    let query = Query::new().opt("$timeframe", p.timeframe).build();
    Ok(client.get(ApiArea::Core, &path, &query).await?)
}

#[derive(Debug, Deserialize)]
struct Iterations {
    project: String,
    depth: Option<u32>,
}

async fn list_iterations(client: Arc<DevOpsClient>, p: Iterations) -> anyhow::Result<Value> {
    let path = format!(
        "{}/_apis/wit/classificationnodes/Iterations",
        segment(&p.project)
    );
    let query = Query::new().push("$depth", p.depth.unwrap_or(2)).build();
    Ok(client.get(ApiArea::Core, &path, &query).await?)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TeamCapacity {
    project: String,
    team: String,
    iteration_id: String,
}

async fn get_team_capacity(client: Arc<DevOpsClient>, p: TeamCapacity) -> anyhow::Result<Value> {
    let path = format!(
        "{}/{}/_apis/work/teamsettings/iterations/{}/capacities",
        segment(&p.project),
        segment(&p.team),
        segment(&p.iteration_id)
    );
    Ok(client.get(ApiArea::Core, &path, &[]).await?)
}
