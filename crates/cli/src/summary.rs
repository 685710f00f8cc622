use anyhow::{Context, Result};
use covplan::plan::AgentPath;
use covplan::GeoPoint;
use serde_json::{json, Value};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Great-circle length of a waypoint sequence in metres.
fn ground_length(path: &[GeoPoint]) -> f64 {
    path.windows(2).map(|w| w[0].distance_bearing(&w[1]).0).sum()
}

/// Per-agent waypoint counts, ground lengths and entry points, plus the idle agents.
pub fn plan_summary(paths: &[AgentPath]) -> Value {
    let agents: Vec<Value> = paths
        .iter()
        .map(|a| {
            json!({
                "agent": a.agent,
                "waypoints": a.path.len(),
                "ground_length_m": ground_length(&a.path),
                "entry": a.entry.map(|e| [e.lat, e.lon]),
            })
        })
        .collect();
    json!({
        "agent_count": paths.len(),
        "total_waypoints": paths.iter().map(|a| a.path.len()).sum::<usize>(),
        "total_length_m": paths.iter().map(|a| ground_length(&a.path)).sum::<f64>(),
        "idle_agents": paths.iter().filter(|a| a.path.is_empty()).map(|a| a.agent).collect::<Vec<_>>(),
        "agents": agents,
    })
}

/// Write `<plan stem>.summary.json` next to the plan with the request, run label and summary.
pub fn write_summary<P: AsRef<Path>>(
    plan: P,
    request: Value,
    tag: Option<&str>,
    paths: &[AgentPath],
) -> Result<PathBuf> {
    let plan = plan.as_ref();
    let sidecar = summary_path(plan);
    let doc = json!({
        "version": covplan::VERSION,
        "tag": tag,
        "plan": plan.to_string_lossy(),
        "request": request,
        "summary": plan_summary(paths),
    });
    fs::write(&sidecar, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", sidecar.display()))?;
    tracing::debug!(path = %sidecar.display(), "summary written");
    Ok(sidecar)
}

fn summary_path(plan: &Path) -> PathBuf {
    let mut name = plan
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("plan"));
    name.push(".summary.json");
    plan.with_file_name(name)
}
