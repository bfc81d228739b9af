#![deny(warnings)]

//! Campaign chronicle: point-in-time snapshots and rollback.
//!
//! Summary snapshots are cheap and kept forever; the heavy full-force
//! payloads that make rollback possible are retained only for the most
//! recent `MAX_FULL_SNAPSHOTS` snapshots. Rollback truncates the timeline
//! at the restored point; it never branches.

use chrono::Local;
use force_core::{Force, FullSnapshot, Snapshot, SnapshotType, StatusCounts, UnitStatus};
use tracing::info;

/// How many full-force payloads are retained for rollback.
pub const MAX_FULL_SNAPSHOTS: usize = 5;

fn count_statuses(statuses: impl Iterator<Item = UnitStatus>) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for s in statuses {
        counts.bump(s);
    }
    counts
}

/// The in-universe date stamp for new snapshots: the force's current date,
/// or the real-world date when the campaign does not track one.
pub fn snapshot_date(force: &Force) -> String {
    match &force.current_date {
        Some(date) if !date.is_empty() => date.clone(),
        _ => Local::now().date_naive().format("%Y-%m-%d").to_string(),
    }
}

fn numeric_suffix(id: &str) -> Option<u64> {
    id.strip_prefix("snap-").and_then(|n| n.parse().ok())
}

/// Next snapshot id, `snap-N`: one past the highest suffix among the
/// retained summaries, so a live id is never reissued.
pub fn next_snapshot_id(force: &Force) -> String {
    let max = force
        .snapshots
        .iter()
        .filter_map(|s| numeric_suffix(&s.id))
        .max()
        .unwrap_or(0);
    format!("snap-{}", max + 1)
}

/// Capture a summary snapshot of the force. Pure: the force is not
/// touched; pair with [`record_snapshot`] to append it.
pub fn create_snapshot(force: &Force, snapshot_type: SnapshotType, label: &str) -> Snapshot {
    Snapshot {
        id: next_snapshot_id(force),
        snapshot_type,
        label: label.to_string(),
        created_at: snapshot_date(force),
        current_warchest: force.current_warchest,
        starting_warchest: force.starting_warchest,
        net_warchest_change: force.current_warchest - force.starting_warchest,
        missions_completed: force.missions_completed(),
        mech_status_counts: count_statuses(force.mechs.iter().map(|m| m.status)),
        elemental_status_counts: count_statuses(force.elementals.iter().map(|e| e.status)),
    }
}

/// Append a summary snapshot plus its full payload, enforcing the
/// retention window (oldest full payloads dropped; summaries kept).
///
/// The stored payload has its own full-snapshot list cleared so documents
/// do not nest unboundedly; rollback re-attaches the truncated lists.
pub fn record_snapshot(force: &Force, snapshot_type: SnapshotType, label: &str) -> Force {
    let snapshot = create_snapshot(force, snapshot_type, label);
    let mut payload = force.clone();
    payload.full_snapshots.clear();
    let mut next = force.clone();
    next.full_snapshots.push(FullSnapshot {
        id: snapshot.id.clone(),
        force: payload,
    });
    if next.full_snapshots.len() > MAX_FULL_SNAPSHOTS {
        let drop = next.full_snapshots.len() - MAX_FULL_SNAPSHOTS;
        next.full_snapshots.drain(..drop);
    }
    info!(id = %snapshot.id, label, "recorded snapshot");
    next.snapshots.push(snapshot);
    next
}

/// Restore the force to the state captured at `snapshot_id`.
///
/// Returns `None` — and leaves the caller's force untouched — when no full
/// payload is retained for that id (the expected case for snapshots that
/// have aged out of the window). On success the restored force carries the
/// snapshot timeline truncated to end at the restored point.
pub fn rollback_to_snapshot(force: &Force, snapshot_id: &str) -> Option<Force> {
    let full = force
        .full_snapshots
        .iter()
        .find(|f| f.id == snapshot_id)?;
    let target = force.snapshots.iter().position(|s| s.id == snapshot_id)?;
    let mut restored = full.force.clone();
    restored.snapshots = force.snapshots[..=target].to_vec();
    let kept: Vec<&str> = restored.snapshots.iter().map(|s| s.id.as_str()).collect();
    restored.full_snapshots = force
        .full_snapshots
        .iter()
        .filter(|f| kept.contains(&f.id.as_str()))
        .cloned()
        .collect();
    info!(
        snapshot_id,
        discarded = force.snapshots.len() - restored.snapshots.len(),
        "rolled back"
    );
    Some(restored)
}
