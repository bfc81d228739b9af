#![deny(warnings)]

//! Downtime action application: repair, resupply, training, and healing
//! between missions.
//!
//! Each catalog action id maps to one hardcoded, enumerable effect; adding
//! a new action kind means adding a table entry here, not a conditional in
//! UI code. The applicator never mutates its input force; it returns an
//! updated copy with the activity log appended and the warchest debited.

use force_core::{Elemental, Force, Mech, Pilot, UnitRef, UnitStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

/// A downtime action descriptor from the caller-supplied catalog.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDescriptor {
    pub id: String,
    pub name: String,
    /// Arithmetic cost formula evaluated against the unit context.
    #[serde(default)]
    pub formula: String,
    /// Generic actions with this flag park the unit as `Unavailable`.
    #[serde(default)]
    pub makes_unavailable: bool,
}

/// Enumerated side effect of an action, keyed by action id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionEffect {
    /// `repair-armor`: a `Damaged` unit returns to `Operational`.
    RepairArmor,
    /// `repair-structure`: the unit goes to `Repairing` (excluded from
    /// missions but distinct from plain unavailability).
    RepairStructure,
    /// `repair-elemental`: damaged suits reset; back to `Operational` when
    /// the point was merely `Damaged` and has no destroyed suits.
    RepairElemental,
    /// `purchase-elemental`: destroyed suits replaced; point goes to
    /// `Repairing` while the new suits are fitted.
    PurchaseElemental,
    /// `train-gunnery`: pilot gunnery improves by one (clamped to [0,8]).
    TrainGunnery,
    /// `train-piloting`: pilot piloting improves by one (clamped to [0,8]).
    TrainPiloting,
    /// `heal-injury`: one injury healed (clamped to [0,6]).
    HealInjury,
    /// Anything else: log and debit only, optionally parking the unit.
    Generic { makes_unavailable: bool },
}

/// The transition table: action id to effect. Unrecognized ids fall
/// through to `Generic`, carrying the descriptor's availability flag.
pub fn effect_for(action: &ActionDescriptor) -> ActionEffect {
    match action.id.as_str() {
        "repair-armor" => ActionEffect::RepairArmor,
        "repair-structure" => ActionEffect::RepairStructure,
        "repair-elemental" => ActionEffect::RepairElemental,
        "purchase-elemental" => ActionEffect::PurchaseElemental,
        "train-gunnery" => ActionEffect::TrainGunnery,
        "train-piloting" => ActionEffect::TrainPiloting,
        "heal-injury" => ActionEffect::HealInjury,
        _ => ActionEffect::Generic {
            makes_unavailable: action.makes_unavailable,
        },
    }
}

/// Build the formula variable context for a unit: `wpMultiplier` always,
/// then the unit's numeric fields under their JSON names.
pub fn cost_context(force: &Force, unit: UnitRef<'_>) -> HashMap<String, f64> {
    let mut ctx = HashMap::new();
    ctx.insert("wpMultiplier".to_string(), force.wp_multiplier as f64);
    match unit {
        UnitRef::Mech(m) => {
            ctx.insert("weight".to_string(), m.weight);
            ctx.insert("bv".to_string(), m.bv as f64);
        }
        UnitRef::Elemental(e) => {
            ctx.insert("bv".to_string(), e.bv as f64);
            ctx.insert("gunnery".to_string(), e.gunnery as f64);
            ctx.insert("antimech".to_string(), e.antimech as f64);
            ctx.insert("suitsDamaged".to_string(), e.suits_damaged as f64);
            ctx.insert("suitsDestroyed".to_string(), e.suits_destroyed as f64);
        }
        UnitRef::Pilot(p) => {
            ctx.insert("gunnery".to_string(), p.gunnery as f64);
            ctx.insert("piloting".to_string(), p.piloting as f64);
            ctx.insert("injuries".to_string(), p.injuries as f64);
        }
    }
    ctx
}

/// Compute the warchest cost of applying `action` to `unit_id`.
///
/// Unknown unit ids and unevaluable formulas both cost 0.
pub fn action_cost(force: &Force, unit_id: &str, action: &ActionDescriptor) -> i64 {
    match force.find_unit(unit_id) {
        Some(unit) => formula::evaluate(&action.formula, &cost_context(force, unit)),
        None => 0,
    }
}

fn log_entry(
    action: &ActionDescriptor,
    cost: i64,
    timestamp: &str,
    last_mission: Option<&str>,
) -> force_core::ActivityEntry {
    force_core::ActivityEntry {
        timestamp: timestamp.to_string(),
        action: format!("{} performed ({} WP)", action.name, cost),
        mission: last_mission.map(str::to_string),
        cost,
    }
}

fn apply_to_mech(mech: &mut Mech, effect: ActionEffect) {
    match effect {
        ActionEffect::RepairArmor => {
            if mech.status == UnitStatus::Damaged {
                mech.status = UnitStatus::Operational;
            }
        }
        ActionEffect::RepairStructure => mech.status = UnitStatus::Repairing,
        ActionEffect::Generic {
            makes_unavailable: true,
        } => mech.status = UnitStatus::Unavailable,
        // Elemental- and pilot-specific effects are inert on a mech.
        _ => {}
    }
}

fn apply_to_elemental(point: &mut Elemental, effect: ActionEffect) {
    match effect {
        ActionEffect::RepairArmor => {
            if point.status == UnitStatus::Damaged {
                point.status = UnitStatus::Operational;
            }
        }
        ActionEffect::RepairStructure => point.status = UnitStatus::Repairing,
        ActionEffect::RepairElemental => {
            point.suits_damaged = 0;
            if point.suits_destroyed == 0 && point.status == UnitStatus::Damaged {
                point.status = UnitStatus::Operational;
            }
        }
        ActionEffect::PurchaseElemental => {
            point.suits_destroyed = 0;
            point.status = UnitStatus::Repairing;
        }
        ActionEffect::Generic {
            makes_unavailable: true,
        } => point.status = UnitStatus::Unavailable,
        _ => {}
    }
}

fn apply_to_pilot(pilot: &mut Pilot, effect: ActionEffect) {
    match effect {
        ActionEffect::TrainGunnery => pilot.gunnery = (pilot.gunnery - 1).clamp(0, 8),
        ActionEffect::TrainPiloting => pilot.piloting = (pilot.piloting - 1).clamp(0, 8),
        ActionEffect::HealInjury => {
            if pilot.injuries > 0 {
                pilot.injuries = (pilot.injuries - 1).clamp(0, 6);
                pilot.combat_record.total_injuries_healed += 1;
            }
        }
        // Pilots carry no status; availability flags are inert on them.
        _ => {}
    }
}

/// Apply a downtime action to the unit with `unit_id`.
///
/// Returns an updated copy of the force: the warchest is debited by
/// `cost` (it may go negative; affordability is the caller's concern) and
/// the matching unit gains one activity-log entry plus the effect from the
/// transition table. When no unit matches, the roster is returned
/// unchanged and nothing is logged, but the debit still applies.
pub fn apply_downtime_action(
    force: &Force,
    unit_id: &str,
    action: &ActionDescriptor,
    cost: i64,
    timestamp: &str,
    last_mission: Option<&str>,
) -> Force {
    let mut next = force.clone();
    next.current_warchest -= cost;
    let effect = effect_for(action);
    if let Some(mech) = next.mechs.iter_mut().find(|m| m.id == unit_id) {
        mech.activity_log
            .push(log_entry(action, cost, timestamp, last_mission));
        apply_to_mech(mech, effect);
    } else if let Some(point) = next.elementals.iter_mut().find(|e| e.id == unit_id) {
        point
            .activity_log
            .push(log_entry(action, cost, timestamp, last_mission));
        apply_to_elemental(point, effect);
    } else if let Some(pilot) = next.pilots.iter_mut().find(|p| p.id == unit_id) {
        pilot
            .activity_log
            .push(log_entry(action, cost, timestamp, last_mission));
        apply_to_pilot(pilot, effect);
    }
    info!(
        unit_id,
        action = %action.id,
        cost,
        warchest = next.current_warchest,
        "applied downtime action"
    );
    next
}
