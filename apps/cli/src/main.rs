#![deny(warnings)]

//! Headless CLI for inspecting and updating a force document: ledger
//! reports, downtime actions, snapshots, and rollback.

use anyhow::{bail, Context, Result};
use downtime::ActionDescriptor;
use force_core::{validate_force, SnapshotType};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Args {
    force_path: Option<String>,
    catalog_path: Option<String>,
    out_path: Option<String>,
    apply: Option<String>,
    unit: Option<String>,
    date: Option<String>,
    snapshot: Option<String>,
    rollback: Option<String>,
    ledger: bool,
}

fn parse_args() -> Args {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--force" => args.force_path = it.next(),
            "--catalog" => args.catalog_path = it.next(),
            "--out" => args.out_path = it.next(),
            "--apply" => args.apply = it.next(),
            "--unit" => args.unit = it.next(),
            "--date" => args.date = it.next(),
            "--snapshot" => args.snapshot = it.next(),
            "--rollback" => args.rollback = it.next(),
            "--ledger" => args.ledger = true,
            _ => {}
        }
    }
    args
}

fn load_catalog(path: &str) -> Result<Vec<ActionDescriptor>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading action catalog {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("parsing action catalog {path}"))
}

fn print_ledger(force: &force_core::Force) {
    let rows = ledger::build_ledger_entries(force);
    for row in &rows {
        let amount = if row.cost != 0 { row.cost } else { row.gain };
        println!(
            "{} | {:>10} WP | {:?} {} | {}",
            row.timestamp,
            ledger::format_wp(amount),
            row.source,
            row.name,
            row.detail
        );
    }
    let summary = ledger::summarise_ledger(&rows);
    println!(
        "Totals | spent: {} | gained: {} | net: {}",
        summary.total_spent_display, summary.total_gained_display, summary.net_display
    );
}

fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .init();

    let args = parse_args();
    let Some(force_path) = args.force_path.as_deref() else {
        bail!("--force <path> is required");
    };
    let mut force = persistence::load_force(force_path)?;
    validate_force(&force)?;
    info!(force = %force.name, "force loaded");

    if args.ledger {
        print_ledger(&force);
    }

    if let Some(action_id) = args.apply.as_deref() {
        let Some(unit_id) = args.unit.as_deref() else {
            bail!("--apply requires --unit <unitId>");
        };
        let Some(catalog_path) = args.catalog_path.as_deref() else {
            bail!("--apply requires --catalog <path>");
        };
        let catalog = load_catalog(catalog_path)?;
        let Some(action) = catalog.iter().find(|a| a.id == action_id) else {
            bail!("action {action_id} not found in catalog");
        };
        let cost = downtime::action_cost(&force, unit_id, action);
        let timestamp = args
            .date
            .clone()
            .unwrap_or_else(|| chronicle::snapshot_date(&force));
        let last_mission = force
            .missions
            .iter()
            .rev()
            .find(|m| m.completed)
            .map(|m| m.name.clone());
        force = downtime::apply_downtime_action(
            &force,
            unit_id,
            action,
            cost,
            &timestamp,
            last_mission.as_deref(),
        );
        println!(
            "Applied {} to {} for {} WP | warchest: {}",
            action.name,
            unit_id,
            cost,
            ledger::format_wp(force.current_warchest)
        );
    }

    if let Some(label) = args.snapshot.as_deref() {
        force = chronicle::record_snapshot(&force, SnapshotType::PostDowntime, label);
        let snap = force.snapshots.last().expect("just recorded");
        println!(
            "Snapshot {} ({}) | warchest: {} | missions completed: {}",
            snap.id,
            snap.created_at,
            ledger::format_wp(snap.current_warchest),
            snap.missions_completed
        );
    }

    if let Some(snapshot_id) = args.rollback.as_deref() {
        match chronicle::rollback_to_snapshot(&force, snapshot_id) {
            Some(restored) => {
                force = restored;
                println!("Rolled back to {snapshot_id}");
            }
            None => bail!("no full snapshot retained for {snapshot_id}; rollback not possible"),
        }
    }

    let available = roster::available_pilots(&force).len();
    let eligible_mechs = force
        .mechs
        .iter()
        .filter(|m| roster::mech_mission_eligible(m))
        .count();
    println!(
        "Force OK | mechs: {} ({} mission-ready) | pilots: {} ({} available) | warchest: {}",
        force.mechs.len(),
        eligible_mechs,
        force.pilots.len(),
        available,
        ledger::format_wp(force.current_warchest)
    );

    if let Some(out) = args.out_path.as_deref() {
        persistence::save_force(out, &force)?;
        println!("Wrote {out}");
    }

    Ok(())
}
