use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use covplan::bands::{plan_band_groups, plan_band_sites};
use covplan::plan::{plan_explicit, plan_fair, AgentPath};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing_subscriber::fmt::SubscriberBuilder;

mod request;
mod summary;

use request::{BandsDoc, BandsPlan, ExplicitDoc, FairDoc};
use summary::write_summary;

#[derive(Parser)]
#[command(name = "covplan")]
#[command(about = "Coverage sweeps and area partitioning for agent fleets")]
struct Cmd {
    /// Optional run label; propagated to outputs and logs
    #[arg(long)]
    tag: Option<String>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Fair split: agents spread evenly over the regions
    Plan {
        #[arg(long)]
        input: String,
        #[arg(long)]
        out: String,
    },
    /// Explicit split: each region lists the agent ids that sweep it
    Assign {
        #[arg(long)]
        input: String,
        #[arg(long)]
        out: String,
    },
    /// Rectangular bands around one or more centers
    Bands {
        #[arg(long)]
        input: String,
        #[arg(long)]
        out: String,
    },
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Plan { input, out } => plan(&input, &out, cmd.tag),
        Action::Assign { input, out } => assign(&input, &out, cmd.tag),
        Action::Bands { input, out } => bands(&input, &out, cmd.tag),
    }
}

fn read_doc<T: DeserializeOwned>(input: &str) -> Result<T> {
    let raw = std::fs::read(input).with_context(|| format!("reading {input}"))?;
    serde_json::from_slice(&raw).with_context(|| format!("parsing {input}"))
}

fn write_paths(out: &str, paths: &[AgentPath]) -> Result<()> {
    let out_path = Path::new(out);
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(out_path, serde_json::to_vec_pretty(paths)?)
        .with_context(|| format!("writing {out}"))
}

fn finish(out: &str, tag: Option<String>, request: serde_json::Value, paths: &[AgentPath]) -> Result<()> {
    write_paths(out, paths)?;
    let sidecar = write_summary(out, request, tag.as_deref(), paths)?;
    tracing::info!(out, summary = %sidecar.display(), agents = paths.len(), "plan written");
    Ok(())
}

fn plan(input: &str, out: &str, tag: Option<String>) -> Result<()> {
    tracing::info!(input, out, tag = ?tag, "plan");
    let doc: FairDoc = read_doc(input)?;
    let frame = doc.origin.frame().context("building local frame")?;
    let paths = plan_fair(&frame, &doc.request()?, &doc.cfg.apply()).context("fair partition")?;
    finish(out, tag, serde_json::to_value(&doc)?, &paths)
}

fn assign(input: &str, out: &str, tag: Option<String>) -> Result<()> {
    tracing::info!(input, out, tag = ?tag, "assign");
    let doc: ExplicitDoc = read_doc(input)?;
    let frame = doc.origin.frame().context("building local frame")?;
    let paths = plan_explicit(&frame, &doc.request()?, &doc.cfg.apply()).context("explicit partition")?;
    finish(out, tag, serde_json::to_value(&doc)?, &paths)
}

fn bands(input: &str, out: &str, tag: Option<String>) -> Result<()> {
    tracing::info!(input, out, tag = ?tag, "bands");
    let doc: BandsDoc = read_doc(input)?;
    let cfg = doc.cfg();
    let paths = match doc.plan()? {
        BandsPlan::Groups(req) => plan_band_groups(&req, &cfg),
        BandsPlan::Sites(sites) => plan_band_sites(&sites, doc.agent_count, &cfg),
    }
    .context("band layout")?;
    finish(out, tag, serde_json::to_value(&doc)?, &paths)
}
