#![deny(warnings)]

//! Warchest ledger: a read-only, time-ordered transaction view built from
//! unit activity logs and mission costs/rewards.
//!
//! Nothing here writes back to the force. Timestamps are in-universe
//! `YYYY-MM-DD` strings and ordering is plain lexical comparison, which
//! for that format is chronological.

use force_core::{Force, Mission};
use serde::{Deserialize, Serialize};

/// What kind of record a ledger row came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntrySource {
    Mech,
    Elemental,
    Pilot,
    Mission,
}

/// One ledger row. Exactly one of `cost` (<= 0) and `gain` (>= 0) is
/// nonzero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub timestamp: String,
    pub source: EntrySource,
    /// Owning unit or mission name.
    pub name: String,
    /// What the row records, e.g. an action description.
    pub detail: String,
    pub cost: i64,
    pub gain: i64,
}

impl LedgerEntry {
    fn spend(timestamp: &str, source: EntrySource, name: &str, detail: &str, amount: i64) -> Self {
        LedgerEntry {
            timestamp: timestamp.to_string(),
            source,
            name: name.to_string(),
            detail: detail.to_string(),
            cost: -amount,
            gain: 0,
        }
    }

    fn gain(timestamp: &str, source: EntrySource, name: &str, detail: &str, amount: i64) -> Self {
        LedgerEntry {
            timestamp: timestamp.to_string(),
            source,
            name: name.to_string(),
            detail: detail.to_string(),
            cost: 0,
            gain: amount,
        }
    }
}

fn push_activity_rows(
    rows: &mut Vec<LedgerEntry>,
    source: EntrySource,
    name: &str,
    log: &[force_core::ActivityEntry],
) {
    for entry in log {
        if entry.cost == 0 {
            continue;
        }
        // Positive log costs are spends; a negative one is a recorded gain.
        if entry.cost > 0 {
            rows.push(LedgerEntry::spend(
                &entry.timestamp,
                source,
                name,
                &entry.action,
                entry.cost,
            ));
        } else {
            rows.push(LedgerEntry::gain(
                &entry.timestamp,
                source,
                name,
                &entry.action,
                -entry.cost,
            ));
        }
    }
}

/// Warchest gained by a mission: the explicit figure when recorded,
/// otherwise the sum of achieved objective rewards.
pub fn mission_gain(mission: &Mission) -> i64 {
    match mission.warchest_gained {
        Some(gained) => gained,
        None => mission
            .objectives
            .iter()
            .filter(|o| o.achieved)
            .map(|o| o.wp_reward)
            .sum(),
    }
}

/// Flatten every costed activity entry and mission cost/reward into one
/// list, sorted ascending by timestamp (lexical).
pub fn build_ledger_entries(force: &Force) -> Vec<LedgerEntry> {
    let mut rows = Vec::new();
    for m in &force.mechs {
        push_activity_rows(&mut rows, EntrySource::Mech, &m.name, &m.activity_log);
    }
    for e in &force.elementals {
        push_activity_rows(&mut rows, EntrySource::Elemental, &e.name, &e.activity_log);
    }
    for p in &force.pilots {
        push_activity_rows(&mut rows, EntrySource::Pilot, &p.name, &p.activity_log);
    }
    for mission in &force.missions {
        if mission.cost != 0 {
            rows.push(LedgerEntry::spend(
                &mission.created_at,
                EntrySource::Mission,
                &mission.name,
                "Mission launched",
                mission.cost,
            ));
        }
        if mission.completed {
            let gained = mission_gain(mission);
            if gained != 0 {
                let stamp = mission
                    .completed_at
                    .as_deref()
                    .unwrap_or(&mission.created_at);
                rows.push(LedgerEntry::gain(
                    stamp,
                    EntrySource::Mission,
                    &mission.name,
                    "Mission rewards",
                    gained,
                ));
            }
        }
    }
    rows.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    rows
}

/// Aggregate totals over a ledger, with display strings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    /// Sum of all cost sides; always <= 0.
    pub total_spent: i64,
    /// Sum of all gain sides; always >= 0.
    pub total_gained: i64,
    /// `total_gained + total_spent`.
    pub net: i64,
    pub total_spent_display: String,
    pub total_gained_display: String,
    pub net_display: String,
}

/// Format warchest points with an apostrophe every three digits from the
/// right, e.g. `12345` -> `"12'345"`, `-1200` -> `"-1'200"`.
pub fn format_wp(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('\'');
        }
        grouped.push(c);
    }
    if amount < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Total up a ledger.
pub fn summarise_ledger(entries: &[LedgerEntry]) -> LedgerSummary {
    let total_spent: i64 = entries.iter().map(|e| e.cost).sum();
    let total_gained: i64 = entries.iter().map(|e| e.gain).sum();
    let net = total_gained + total_spent;
    LedgerSummary {
        total_spent,
        total_gained,
        net,
        total_spent_display: format_wp(total_spent),
        total_gained_display: format_wp(total_gained),
        net_display: format_wp(net),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use force_core::{ActivityEntry, Mech, Objective, UnitStatus};
    use proptest::prelude::*;

    fn entry(timestamp: &str, cost: i64) -> ActivityEntry {
        ActivityEntry {
            timestamp: timestamp.to_string(),
            action: format!("Spent {cost}"),
            mission: None,
            cost,
        }
    }

    fn mission(id: &str, cost: i64, completed: bool) -> Mission {
        Mission {
            id: id.to_string(),
            name: format!("Mission {id}"),
            cost,
            description: String::new(),
            objectives: vec![],
            recap: String::new(),
            completed,
            assigned_mechs: vec![],
            assigned_elementals: vec![],
            sp_budget: 0,
            sp_purchases: vec![],
            total_tonnage: 0.0,
            created_at: "3052-03-01".to_string(),
            completed_at: Some("3052-03-10".to_string()),
            warchest_gained: None,
        }
    }

    fn force() -> Force {
        Force {
            id: "force-1".to_string(),
            name: "Test Lance".to_string(),
            description: String::new(),
            starting_warchest: 1000,
            current_warchest: 900,
            wp_multiplier: 5,
            current_date: None,
            mechs: vec![Mech {
                id: "mech-1".to_string(),
                name: "Marauder".to_string(),
                status: UnitStatus::Operational,
                pilot_id: None,
                bv: 1400,
                weight: 75.0,
                activity_log: vec![entry("3052-04-01", 15), entry("3052-02-01", 8)],
            }],
            elementals: vec![],
            pilots: vec![],
            missions: vec![mission("m1", 20, true)],
            snapshots: vec![],
            full_snapshots: vec![],
            notes: String::new(),
        }
    }

    #[test]
    fn rows_are_sorted_by_timestamp() {
        let mut f = force();
        f.missions[0].objectives.push(Objective {
            id: "o1".to_string(),
            title: "Hold the pass".to_string(),
            description: String::new(),
            wp_reward: 30,
            achieved: true,
        });
        let rows = build_ledger_entries(&f);
        let stamps: Vec<&str> = rows.iter().map(|r| r.timestamp.as_str()).collect();
        assert_eq!(
            stamps,
            vec!["3052-02-01", "3052-03-01", "3052-03-10", "3052-04-01"]
        );
    }

    #[test]
    fn each_row_has_exactly_one_side() {
        let mut f = force();
        f.missions[0].warchest_gained = Some(50);
        for row in build_ledger_entries(&f) {
            assert!(
                (row.cost != 0) ^ (row.gain != 0),
                "row has both or neither side: {row:?}"
            );
            assert!(row.cost <= 0);
            assert!(row.gain >= 0);
        }
    }

    #[test]
    fn zero_cost_activity_is_skipped() {
        let mut f = force();
        f.mechs[0].activity_log.push(entry("3052-05-01", 0));
        let rows = build_ledger_entries(&f);
        assert!(rows.iter().all(|r| r.timestamp != "3052-05-01"));
    }

    #[test]
    fn explicit_mission_gain_wins_over_objectives() {
        let mut f = force();
        f.missions[0].warchest_gained = Some(100);
        f.missions[0].objectives.push(Objective {
            id: "o1".to_string(),
            title: "Ignored".to_string(),
            description: String::new(),
            wp_reward: 30,
            achieved: true,
        });
        let gain: i64 = build_ledger_entries(&f).iter().map(|r| r.gain).sum();
        assert_eq!(gain, 100);
    }

    #[test]
    fn incomplete_mission_yields_no_gain_row() {
        let mut f = force();
        f.missions[0].completed = false;
        f.missions[0].warchest_gained = Some(100);
        let gain: i64 = build_ledger_entries(&f).iter().map(|r| r.gain).sum();
        assert_eq!(gain, 0);
    }

    #[test]
    fn summary_matches_hand_totals() {
        let mut f = force();
        f.missions[0].warchest_gained = Some(50);
        let rows = build_ledger_entries(&f);
        let summary = summarise_ledger(&rows);
        assert_eq!(summary.total_spent, -(15 + 8 + 20));
        assert_eq!(summary.total_gained, 50);
        assert_eq!(summary.net, 50 - 43);
        assert_eq!(summary.total_spent_display, "-43");
        assert_eq!(summary.net_display, "7");
    }

    #[test]
    fn thousands_grouping_uses_apostrophes() {
        assert_eq!(format_wp(0), "0");
        assert_eq!(format_wp(999), "999");
        assert_eq!(format_wp(1000), "1'000");
        assert_eq!(format_wp(12345), "12'345");
        assert_eq!(format_wp(1234567), "1'234'567");
        assert_eq!(format_wp(-1200), "-1'200");
        assert_eq!(format_wp(-1000000), "-1'000'000");
    }

    proptest! {
        #[test]
        fn ledger_rows_nondecreasing_and_one_sided(costs in prop::collection::vec((0u32..12, -500i64..500), 0..30)) {
            let mut f = force();
            f.mechs[0].activity_log = costs
                .iter()
                .map(|(day, cost)| entry(&format!("3052-06-{:02}", day + 1), *cost))
                .collect();
            let rows = build_ledger_entries(&f);
            for pair in rows.windows(2) {
                prop_assert!(pair[0].timestamp <= pair[1].timestamp);
            }
            for row in &rows {
                prop_assert!((row.cost != 0) ^ (row.gain != 0));
            }
        }

        #[test]
        fn summary_net_identity(costs in prop::collection::vec(-500i64..500, 0..30)) {
            let mut f = force();
            f.missions.clear();
            f.mechs[0].activity_log = costs
                .iter()
                .map(|c| entry("3052-06-01", *c))
                .collect();
            let rows = build_ledger_entries(&f);
            let s = summarise_ledger(&rows);
            prop_assert_eq!(s.net, s.total_gained + s.total_spent);
            prop_assert!(s.total_spent <= 0);
            prop_assert!(s.total_gained >= 0);
        }

        #[test]
        fn grouping_round_trips_through_digit_removal(n in -10_000_000i64..10_000_000) {
            let shown = format_wp(n);
            let stripped: String = shown.chars().filter(|c| *c != '\'').collect();
            prop_assert_eq!(stripped.parse::<i64>().unwrap(), n);
        }
    }
}
