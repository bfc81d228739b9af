#![deny(warnings)]

//! Core domain models and invariants for the warchest campaign tracker.
//!
//! This crate defines the serializable Force aggregate used across the
//! workspace, with validation helpers to guarantee basic invariants. Field
//! names are renamed to camelCase so the JSON document round-trips
//! byte-compatibly with existing force files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Operational status shared by mechs and elemental points.
///
/// No formal state machine constrains transitions; the downtime applicator
/// is the only component that encodes transition rules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UnitStatus {
    #[default]
    Operational,
    Damaged,
    Disabled,
    Destroyed,
    Repairing,
    Unavailable,
}

impl UnitStatus {
    /// All status values, in the order used by status-distribution summaries.
    pub const ALL: [UnitStatus; 6] = [
        UnitStatus::Operational,
        UnitStatus::Damaged,
        UnitStatus::Disabled,
        UnitStatus::Destroyed,
        UnitStatus::Repairing,
        UnitStatus::Unavailable,
    ];
}

/// One append-only activity record on a unit.
///
/// `cost` is positive for warchest spends; history is never edited or
/// removed once written.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    /// In-universe date string, `YYYY-MM-DD`.
    pub timestamp: String,
    /// Human-readable description of what happened.
    pub action: String,
    /// Mission providing audit context, if any.
    #[serde(default)]
    pub mission: Option<String>,
    /// Warchest points involved (positive = spend).
    #[serde(default)]
    pub cost: i64,
}

/// A battlemech on the roster.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mech {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: UnitStatus,
    /// Weak reference to a pilot; at most one mech may reference a pilot.
    #[serde(default)]
    pub pilot_id: Option<String>,
    /// Battle value (non-negative).
    #[serde(default)]
    pub bv: i64,
    /// Weight in tons.
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub activity_log: Vec<ActivityEntry>,
}

/// An elemental (battle-armor infantry) point of up to five suits.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Elemental {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub commander: String,
    /// Gunnery skill, 0-8, lower is better.
    #[serde(default)]
    pub gunnery: i64,
    /// Anti-mech skill, 0-8, lower is better.
    #[serde(default)]
    pub antimech: i64,
    /// Suits lost permanently this campaign, 0-6.
    #[serde(default)]
    pub suits_destroyed: i64,
    /// Suits awaiting repair, 0-6.
    #[serde(default)]
    pub suits_damaged: i64,
    #[serde(default)]
    pub bv: i64,
    #[serde(default)]
    pub status: UnitStatus,
    #[serde(default)]
    pub activity_log: Vec<ActivityEntry>,
}

/// One confirmed kill on a pilot's combat record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kill {
    pub mech_model: String,
    pub tonnage: f64,
    #[serde(default)]
    pub mission: String,
    #[serde(default)]
    pub date: String,
}

/// Career statistics from which achievements are derived.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatRecord {
    #[serde(default)]
    pub kills: Vec<Kill>,
    #[serde(default)]
    pub assists: i64,
    #[serde(default)]
    pub missions_completed: i64,
    #[serde(default)]
    pub missions_without_injury: i64,
    #[serde(default)]
    pub total_injuries_healed: i64,
}

/// A mechwarrior.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pilot {
    pub id: String,
    pub name: String,
    /// Gunnery skill, 0-8, lower is better.
    #[serde(default)]
    pub gunnery: i64,
    /// Piloting skill, 0-8, lower is better.
    #[serde(default)]
    pub piloting: i64,
    /// Injury count, 0-6; 6 means killed in action.
    #[serde(default)]
    pub injuries: i64,
    /// Narrative "disgraced" flag; cosmetic to the core logic.
    #[serde(default)]
    pub dezgra: bool,
    #[serde(default)]
    pub combat_record: CombatRecord,
    /// Derived achievement ids, recomputed from the combat record.
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub activity_log: Vec<ActivityEntry>,
}

/// A mission objective with an optional warchest reward.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Objective {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub wp_reward: i64,
    #[serde(default)]
    pub achieved: bool,
}

/// An itemized support-point purchase on a mission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpPurchase {
    pub name: String,
    pub cost: i64,
}

/// A tracked mission or scenario.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    pub id: String,
    pub name: String,
    /// Warchest points spent to launch the mission (must be > 5).
    #[serde(default)]
    pub cost: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub objectives: Vec<Objective>,
    /// Free-text after-action recap.
    #[serde(default)]
    pub recap: String,
    #[serde(default)]
    pub completed: bool,
    /// Assigned mech ids (weak references; dangling ids filtered at read time).
    #[serde(default)]
    pub assigned_mechs: Vec<String>,
    /// Assigned elemental ids (weak references).
    #[serde(default)]
    pub assigned_elementals: Vec<String>,
    /// Support-point budget for the mission.
    #[serde(default)]
    pub sp_budget: i64,
    #[serde(default)]
    pub sp_purchases: Vec<SpPurchase>,
    /// Cached sum of assigned mech tonnage, recomputed on save.
    #[serde(default)]
    pub total_tonnage: f64,
    /// In-universe creation date, `YYYY-MM-DD`.
    #[serde(default)]
    pub created_at: String,
    /// In-universe completion date, if completed.
    #[serde(default)]
    pub completed_at: Option<String>,
    /// Explicit warchest gain; when absent, achieved objective rewards apply.
    #[serde(default)]
    pub warchest_gained: Option<i64>,
}

/// The kind of moment a snapshot captures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapshotType {
    PreMission,
    PostMission,
    PostDowntime,
}

/// Per-status unit counts for one roster collection.
///
/// The six counts always sum to the collection length; absent statuses
/// count 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub operational: u32,
    pub damaged: u32,
    pub disabled: u32,
    pub destroyed: u32,
    pub repairing: u32,
    pub unavailable: u32,
}

impl StatusCounts {
    /// Count of the given status.
    pub fn get(&self, status: UnitStatus) -> u32 {
        match status {
            UnitStatus::Operational => self.operational,
            UnitStatus::Damaged => self.damaged,
            UnitStatus::Disabled => self.disabled,
            UnitStatus::Destroyed => self.destroyed,
            UnitStatus::Repairing => self.repairing,
            UnitStatus::Unavailable => self.unavailable,
        }
    }

    /// Increment the count of the given status.
    pub fn bump(&mut self, status: UnitStatus) {
        match status {
            UnitStatus::Operational => self.operational += 1,
            UnitStatus::Damaged => self.damaged += 1,
            UnitStatus::Disabled => self.disabled += 1,
            UnitStatus::Destroyed => self.destroyed += 1,
            UnitStatus::Repairing => self.repairing += 1,
            UnitStatus::Unavailable => self.unavailable += 1,
        }
    }

    /// Sum across all six statuses.
    pub fn total(&self) -> u32 {
        UnitStatus::ALL.iter().map(|s| self.get(*s)).sum()
    }
}

/// Lightweight point-in-time summary; retained indefinitely.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub id: String,
    #[serde(rename = "type")]
    pub snapshot_type: SnapshotType,
    pub label: String,
    /// In-universe date stamp.
    pub created_at: String,
    pub current_warchest: i64,
    pub starting_warchest: i64,
    pub net_warchest_change: i64,
    pub missions_completed: u32,
    pub mech_status_counts: StatusCounts,
    pub elemental_status_counts: StatusCounts,
}

/// Complete force payload backing rollback; only a bounded window of these
/// is retained.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullSnapshot {
    /// Matches the id of the summary snapshot taken at the same moment.
    pub id: String,
    pub force: Force,
}

fn default_wp_multiplier() -> i64 {
    5
}

/// The root aggregate: one player's campaign force.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Force {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Warchest points at campaign start.
    pub starting_warchest: i64,
    /// Current balance; mutated only by signed deltas, may go negative.
    pub current_warchest: i64,
    /// Multiplier available to cost formulas (default 5).
    #[serde(default = "default_wp_multiplier")]
    pub wp_multiplier: i64,
    /// In-universe "today", `YYYY-MM-DD`; snapshot stamps fall back to the
    /// real-world date when absent.
    #[serde(default)]
    pub current_date: Option<String>,
    #[serde(default)]
    pub mechs: Vec<Mech>,
    #[serde(default)]
    pub elementals: Vec<Elemental>,
    #[serde(default)]
    pub pilots: Vec<Pilot>,
    #[serde(default)]
    pub missions: Vec<Mission>,
    #[serde(default)]
    pub snapshots: Vec<Snapshot>,
    #[serde(default)]
    pub full_snapshots: Vec<FullSnapshot>,
    /// Free-text campaign notes.
    #[serde(default)]
    pub notes: String,
}

/// Borrowed view over any roster unit, resolved by id.
#[derive(Clone, Copy, Debug)]
pub enum UnitRef<'a> {
    Mech(&'a Mech),
    Elemental(&'a Elemental),
    Pilot(&'a Pilot),
}

impl UnitRef<'_> {
    pub fn id(&self) -> &str {
        match self {
            UnitRef::Mech(m) => &m.id,
            UnitRef::Elemental(e) => &e.id,
            UnitRef::Pilot(p) => &p.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            UnitRef::Mech(m) => &m.name,
            UnitRef::Elemental(e) => &e.name,
            UnitRef::Pilot(p) => &p.name,
        }
    }
}

impl Force {
    /// Resolve a unit id against the roster, mechs first, then elementals,
    /// then pilots. Dangling ids resolve to `None`.
    pub fn find_unit(&self, unit_id: &str) -> Option<UnitRef<'_>> {
        if let Some(m) = self.mechs.iter().find(|m| m.id == unit_id) {
            return Some(UnitRef::Mech(m));
        }
        if let Some(e) = self.elementals.iter().find(|e| e.id == unit_id) {
            return Some(UnitRef::Elemental(e));
        }
        self.pilots
            .iter()
            .find(|p| p.id == unit_id)
            .map(UnitRef::Pilot)
    }

    /// Mission completed so far.
    pub fn missions_completed(&self) -> u32 {
        self.missions.iter().filter(|m| m.completed).count() as u32
    }
}

/// Validation errors for domain invariants.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Skill values are conventionally 0-8.
    #[error("skill {0} is out of range [0, 8]")]
    SkillOutOfRange(i64),
    /// Injuries are clamped to [0, 6]; 6 is killed in action.
    #[error("injuries {0} is out of range [0, 6]")]
    InjuriesOutOfRange(i64),
    /// Suit counters live in [0, 6].
    #[error("suit counter {0} is out of range [0, 6]")]
    SuitsOutOfRange(i64),
    /// Battle value must be non-negative.
    #[error("battle value must be >= 0")]
    NegativeBv,
    /// Starting warchest must be non-negative.
    #[error("starting warchest must be >= 0")]
    NegativeWarchest,
    /// Mission launch cost must exceed 5 WP.
    #[error("mission cost {0} must be > 5")]
    MissionCostTooLow(i64),
    /// Entity ids must be unique across the whole force.
    #[error("duplicate entity id: {0}")]
    DuplicateId(String),
    /// A pilot may be assigned to at most one mech.
    #[error("pilot {0} is assigned to more than one mech")]
    PilotDoubleAssigned(String),
}

fn check_skill(v: i64) -> Result<(), ValidationError> {
    if !(0..=8).contains(&v) {
        return Err(ValidationError::SkillOutOfRange(v));
    }
    Ok(())
}

/// Validate a mech.
pub fn validate_mech(m: &Mech) -> Result<(), ValidationError> {
    if m.bv < 0 {
        return Err(ValidationError::NegativeBv);
    }
    Ok(())
}

/// Validate an elemental point.
pub fn validate_elemental(e: &Elemental) -> Result<(), ValidationError> {
    check_skill(e.gunnery)?;
    check_skill(e.antimech)?;
    for v in [e.suits_destroyed, e.suits_damaged] {
        if !(0..=6).contains(&v) {
            return Err(ValidationError::SuitsOutOfRange(v));
        }
    }
    if e.bv < 0 {
        return Err(ValidationError::NegativeBv);
    }
    Ok(())
}

/// Validate a pilot.
pub fn validate_pilot(p: &Pilot) -> Result<(), ValidationError> {
    check_skill(p.gunnery)?;
    check_skill(p.piloting)?;
    if !(0..=6).contains(&p.injuries) {
        return Err(ValidationError::InjuriesOutOfRange(p.injuries));
    }
    Ok(())
}

/// Validate a mission.
pub fn validate_mission(m: &Mission) -> Result<(), ValidationError> {
    if m.cost <= 5 {
        return Err(ValidationError::MissionCostTooLow(m.cost));
    }
    Ok(())
}

/// Validate the whole force, including cross-entity invariants:
/// id uniqueness and the one-mech-per-pilot rule.
pub fn validate_force(force: &Force) -> Result<(), ValidationError> {
    if force.starting_warchest < 0 {
        return Err(ValidationError::NegativeWarchest);
    }
    let mut ids: BTreeSet<&str> = BTreeSet::new();
    for m in &force.mechs {
        validate_mech(m)?;
        if !ids.insert(&m.id) {
            return Err(ValidationError::DuplicateId(m.id.clone()));
        }
    }
    for e in &force.elementals {
        validate_elemental(e)?;
        if !ids.insert(&e.id) {
            return Err(ValidationError::DuplicateId(e.id.clone()));
        }
    }
    for p in &force.pilots {
        validate_pilot(p)?;
        if !ids.insert(&p.id) {
            return Err(ValidationError::DuplicateId(p.id.clone()));
        }
    }
    for m in &force.missions {
        validate_mission(m)?;
        if !ids.insert(&m.id) {
            return Err(ValidationError::DuplicateId(m.id.clone()));
        }
    }
    let mut seen_pilots: BTreeSet<&str> = BTreeSet::new();
    for m in &force.mechs {
        if let Some(pid) = &m.pilot_id {
            if !seen_pilots.insert(pid) {
                return Err(ValidationError::PilotDoubleAssigned(pid.clone()));
            }
        }
    }
    Ok(())
}
