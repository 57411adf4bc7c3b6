//! Bundle and draft listing commands: `list`, `show`, `drafts`.

use anyhow::{Context, Result, bail};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use uuid::Uuid;

use bundler_core::repository::bundle::BundleRepository;
use bundler_core::wizard::draft_store::WizardDraftStore;
use bundler_types::record::BundleRecord;

use crate::state::AppState;

/// List bundles, newest first.
pub async fn list_bundles(state: &AppState, limit: Option<i64>, json: bool) -> Result<()> {
    let bundles = state
        .bundle_repo
        .list(limit)
        .await
        .context("Failed to list bundles")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&bundles)?);
        return Ok(());
    }

    if bundles.is_empty() {
        println!();
        println!(
            "  {} No bundles yet. Create one with: {}",
            style("i").blue().bold(),
            style("bundler create").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Title").fg(Color::White),
        Cell::new("Components").fg(Color::White),
        Cell::new("Status").fg(Color::White),
        Cell::new("Created").fg(Color::White),
        Cell::new("Id").fg(Color::White),
    ]);

    for bundle in &bundles {
        table.add_row(vec![
            Cell::new(&bundle.title).fg(Color::Cyan),
            Cell::new(bundle.component_count()),
            status_cell(&bundle.operation.status),
            Cell::new(bundle.created_at.format("%Y-%m-%d %H:%M").to_string()).fg(Color::DarkGrey),
            Cell::new(bundle.id).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}

/// Show one bundle with its component breakdown.
pub async fn show_bundle(state: &AppState, id: &str, json: bool) -> Result<()> {
    let Ok(id) = Uuid::parse_str(id) else {
        bail!("'{id}' is not a valid bundle id");
    };
    let bundle = state
        .bundle_repo
        .get_by_id(&id)
        .await
        .context("Failed to load bundle")?
        .with_context(|| format!("Bundle {id} not found"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&bundle)?);
        return Ok(());
    }

    print_bundle(&bundle);
    Ok(())
}

pub(crate) fn print_bundle(bundle: &BundleRecord) {
    println!();
    println!("  {}", style(&bundle.title).cyan().bold());
    println!();
    println!("  {}", style("── Details ──").dim());
    println!("  {}         {}", style("Id:").bold(), bundle.id);
    println!("  {}     {}", style("Status:").bold(), bundle.operation.status);
    if let Some(operation_id) = &bundle.operation.id {
        println!("  {}  {}", style("Operation:").bold(), operation_id);
    }
    println!(
        "  {}    {}",
        style("Created:").bold(),
        bundle.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!();
    println!("  {}", style("── Components ──").dim());
    for component in &bundle.definition.components {
        println!(
            "  {} x{}",
            style(&component.product_id).white(),
            component.quantity
        );
        for selection in &component.option_selections {
            println!(
                "      {} {}",
                style(format!("{}:", selection.name)).dim(),
                selection.values.join(", ")
            );
        }
    }
    println!();
}

/// List saved wizard sessions.
pub async fn list_drafts(state: &AppState, json: bool) -> Result<()> {
    let drafts = state
        .draft_store
        .list_drafts()
        .await
        .context("Failed to list wizard drafts")?;

    if json {
        let rows: Vec<serde_json::Value> = drafts
            .iter()
            .map(|d| {
                serde_json::json!({
                    "session_id": d.session_id,
                    "bundle_name": d.bundle_name,
                    "step": d.step,
                    "updated_at": d.updated_at.to_rfc3339(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if drafts.is_empty() {
        println!();
        println!("  No saved drafts found. Start a new session with: bundler create");
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Bundle", "Step", "Updated", "Session"]);
    for draft in &drafts {
        let name = if draft.bundle_name.trim().is_empty() {
            "(unnamed)".to_string()
        } else {
            draft.bundle_name.clone()
        };
        table.add_row(vec![
            Cell::new(name).fg(Color::Cyan),
            Cell::new(draft.step),
            Cell::new(draft.updated_at.format("%Y-%m-%d %H:%M").to_string()),
            Cell::new(draft.session_id).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!(
        "  Resume with: {}",
        style("bundler create --resume").yellow()
    );
    println!();
    Ok(())
}

fn status_cell(status: &str) -> Cell {
    let color = match status {
        "CREATED" | "ACTIVE" | "COMPLETE" => Color::Green,
        "FAILED" => Color::Red,
        _ => Color::Yellow,
    };
    Cell::new(status).fg(color)
}
