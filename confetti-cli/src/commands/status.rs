//! `confetti status`: mirrored components and Map freshness.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use confetti_core::types::MirrorLayout;
use confetti_renderer::MapRenderer;
use confetti_sync::map::{known_component_names, render_map};
use confetti_sync::naming::accessor_identifier;

/// Arguments for `confetti status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Project root.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let layout = MirrorLayout::new(&self.root);
        let report = build_report(&layout)?;
        if self.json {
            print_json(&report)?;
            return Ok(());
        }
        print_table(report);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum MapState {
    /// On-disk Map matches a fresh render.
    Current,
    /// On-disk Map differs from a fresh render.
    Stale,
    Missing,
}

#[derive(Debug, Serialize)]
struct ComponentStatus {
    name: String,
    accessor: String,
    file: PathBuf,
}

#[derive(Debug, Serialize)]
struct StatusReport {
    root: PathBuf,
    map: MapState,
    components: Vec<ComponentStatus>,
}

#[derive(Tabled)]
struct StatusTableRow {
    #[tabled(rename = "component")]
    component: String,
    #[tabled(rename = "accessor")]
    accessor: String,
    #[tabled(rename = "file")]
    file: String,
}

fn build_report(layout: &MirrorLayout) -> Result<StatusReport> {
    let components_dir = layout.components_dir();
    let names = if components_dir.is_dir() {
        known_component_names(&components_dir)
            .with_context(|| format!("failed to scan {}", components_dir.display()))?
    } else {
        Vec::new()
    };

    let renderer =
        MapRenderer::for_project(layout.root()).context("failed to load Map template")?;
    let map = map_state(layout, &components_dir, &renderer)?;

    let components = names
        .iter()
        .map(|name| ComponentStatus {
            name: name.to_string(),
            accessor: accessor_identifier(name.as_str()),
            file: layout.component_path(name),
        })
        .collect();

    Ok(StatusReport {
        root: layout.root().to_path_buf(),
        map,
        components,
    })
}

fn map_state(
    layout: &MirrorLayout,
    components_dir: &Path,
    renderer: &MapRenderer,
) -> Result<MapState> {
    let map_path = layout.map_path();
    let Ok(on_disk) = std::fs::read_to_string(&map_path) else {
        return Ok(MapState::Missing);
    };
    let expected = render_map(components_dir, renderer).context("failed to render Map")?;
    Ok(if expected == on_disk {
        MapState::Current
    } else {
        MapState::Stale
    })
}

fn print_json(report: &StatusReport) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(report).context("failed to serialize status JSON")?
    );
    Ok(())
}

fn print_table(report: StatusReport) {
    println!(
        "Confetti v{} | {} | {} components | Map {}",
        env!("CARGO_PKG_VERSION"),
        report.root.display(),
        report.components.len(),
        map_indicator(report.map),
    );

    if report.components.is_empty() {
        println!("No hidden components mirrored yet.");
    } else {
        let rows: Vec<StatusTableRow> = report
            .components
            .into_iter()
            .map(|c| StatusTableRow {
                component: c.name,
                accessor: c.accessor,
                file: c.file.display().to_string(),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
    }

    if report.map != MapState::Current {
        println!("Run 'confetti sync map' to rebuild Map.php.");
    }
}

fn map_indicator(state: MapState) -> String {
    match state {
        MapState::Current => "CURRENT".green().bold().to_string(),
        MapState::Stale => "STALE".yellow().bold().to_string(),
        MapState::Missing => "MISSING".red().bold().to_string(),
    }
}
