#![deny(warnings)]

//! Read-side roster queries: pilot availability, skill-adjusted battle
//! value, mission eligibility, tonnage totals, and achievement
//! recomputation.
//!
//! Associations are weak string ids resolved by linear scan; dangling ids
//! are filtered out rather than reported.

use force_core::{CombatRecord, Elemental, Force, Mech, Pilot, UnitStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Injury count at which a pilot is killed in action.
pub const KIA_INJURIES: i64 = 6;

/// Pilots who can be assigned to a mech: not already referenced by any
/// mech's `pilotId`, and still alive.
pub fn available_pilots<'a>(force: &'a Force) -> Vec<&'a Pilot> {
    force
        .pilots
        .iter()
        .filter(|p| p.injuries < KIA_INJURIES)
        .filter(|p| {
            !force
                .mechs
                .iter()
                .any(|m| m.pilot_id.as_deref() == Some(p.id.as_str()))
        })
        .collect()
}

/// Battle value adjusted by pilot skill: each point of gunnery below 4
/// adds 20%, each point of piloting below 5 adds 5% (worse skills
/// subtract the same), floored at 0. Without an assigned pilot the base
/// value stands.
pub fn adjusted_bv(mech: &Mech, pilot: Option<&Pilot>) -> i64 {
    let Some(pilot) = pilot else {
        return mech.bv;
    };
    let gunnery_mod = (4 - pilot.gunnery) as f64 * 0.20;
    let piloting_mod = (5 - pilot.piloting) as f64 * 0.05;
    let scaled = mech.bv as f64 * (1.0 + gunnery_mod + piloting_mod);
    (scaled.round() as i64).max(0)
}

/// Adjusted battle value for a mech inside a force, resolving its
/// (possibly dangling) pilot reference.
pub fn force_adjusted_bv(force: &Force, mech: &Mech) -> i64 {
    let pilot = mech
        .pilot_id
        .as_deref()
        .and_then(|pid| force.pilots.iter().find(|p| p.id == pid));
    adjusted_bv(mech, pilot)
}

/// A mech can be assigned to a mission only while operational.
pub fn mech_mission_eligible(mech: &Mech) -> bool {
    mech.status == UnitStatus::Operational
}

/// An elemental point is eligible while operational with fewer than five
/// suits destroyed.
///
/// Note the threshold here (5) intentionally differs from
/// [`elemental_fully_destroyed`] (6); the game rules treat them as two
/// distinct conditions and they must not be unified.
pub fn elemental_mission_eligible(point: &Elemental) -> bool {
    point.status == UnitStatus::Operational && point.suits_destroyed < 5
}

/// A point with six suits gone is fully destroyed and hidden from
/// assignment lists entirely.
pub fn elemental_fully_destroyed(point: &Elemental) -> bool {
    point.suits_destroyed >= 6
}

/// Recompute a mission's total tonnage from its assigned mech ids,
/// silently skipping ids that no longer resolve.
pub fn assigned_tonnage(force: &Force, assigned_mechs: &[String]) -> f64 {
    assigned_mechs
        .iter()
        .filter_map(|id| force.mechs.iter().find(|m| &m.id == id))
        .map(|m| m.weight)
        .sum()
}

/// A caller-supplied achievement definition; `condition` is an AND-only
/// comparison expression over combat-stat variables.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    pub condition: String,
}

/// The variable context an achievement condition is checked against.
pub fn combat_stat_context(record: &CombatRecord) -> HashMap<String, f64> {
    let tonnage: f64 = record.kills.iter().map(|k| k.tonnage).sum();
    HashMap::from([
        ("killCount".to_string(), record.kills.len() as f64),
        ("assists".to_string(), record.assists as f64),
        (
            "missionsCompleted".to_string(),
            record.missions_completed as f64,
        ),
        (
            "missionsWithoutInjury".to_string(),
            record.missions_without_injury as f64,
        ),
        (
            "totalInjuriesHealed".to_string(),
            record.total_injuries_healed as f64,
        ),
        ("tonnageDestroyed".to_string(), tonnage),
    ])
}

/// Recompute the achievement ids a pilot has earned, in definition order.
pub fn recompute_achievements(pilot: &Pilot, defs: &[AchievementDef]) -> Vec<String> {
    let ctx = combat_stat_context(&pilot.combat_record);
    defs.iter()
        .filter(|def| formula::condition::check(&def.condition, &ctx))
        .map(|def| def.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use force_core::Kill;
    use proptest::prelude::*;

    fn pilot(id: &str, gunnery: i64, piloting: i64) -> Pilot {
        Pilot {
            id: id.to_string(),
            name: format!("Pilot {id}"),
            gunnery,
            piloting,
            injuries: 0,
            dezgra: false,
            combat_record: CombatRecord::default(),
            achievements: vec![],
            activity_log: vec![],
        }
    }

    fn mech(id: &str, pilot_id: Option<&str>) -> Mech {
        Mech {
            id: id.to_string(),
            name: format!("Mech {id}"),
            status: UnitStatus::Operational,
            pilot_id: pilot_id.map(str::to_string),
            bv: 1000,
            weight: 50.0,
            activity_log: vec![],
        }
    }

    fn force() -> Force {
        Force {
            id: "force-1".to_string(),
            name: "Test Lance".to_string(),
            description: String::new(),
            starting_warchest: 1000,
            current_warchest: 1000,
            wp_multiplier: 5,
            current_date: None,
            mechs: vec![mech("mech-1", Some("pilot-1")), mech("mech-2", None)],
            elementals: vec![],
            pilots: vec![pilot("pilot-1", 4, 5), pilot("pilot-2", 3, 4)],
            missions: vec![],
            snapshots: vec![],
            full_snapshots: vec![],
            notes: String::new(),
        }
    }

    #[test]
    fn assigned_and_dead_pilots_are_not_available() {
        let mut f = force();
        let ids: Vec<&str> = available_pilots(&f).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["pilot-2"]);
        f.pilots[1].injuries = KIA_INJURIES;
        assert!(available_pilots(&f).is_empty());
    }

    #[test]
    fn baseline_skills_leave_bv_unchanged() {
        let f = force();
        // Gunnery 4 / piloting 5 is the baseline crew.
        assert_eq!(force_adjusted_bv(&f, &f.mechs[0]), 1000);
        // No pilot at all: base value stands.
        assert_eq!(force_adjusted_bv(&f, &f.mechs[1]), 1000);
    }

    #[test]
    fn better_skills_raise_bv_and_worse_lower_it() {
        let m = mech("m", None);
        assert_eq!(adjusted_bv(&m, Some(&pilot("p", 3, 4))), 1250);
        assert_eq!(adjusted_bv(&m, Some(&pilot("p", 2, 5))), 1400);
        assert_eq!(adjusted_bv(&m, Some(&pilot("p", 5, 6))), 750);
    }

    #[test]
    fn dangling_pilot_reference_falls_back_to_base_bv() {
        let mut f = force();
        f.mechs[0].pilot_id = Some("gone".to_string());
        assert_eq!(force_adjusted_bv(&f, &f.mechs[0]), 1000);
    }

    #[test]
    fn eligibility_thresholds_stay_distinct() {
        let mut point = Elemental {
            id: "e".to_string(),
            name: "Point".to_string(),
            commander: String::new(),
            gunnery: 3,
            antimech: 4,
            suits_destroyed: 4,
            suits_damaged: 0,
            bv: 400,
            status: UnitStatus::Operational,
            activity_log: vec![],
        };
        assert!(elemental_mission_eligible(&point));
        assert!(!elemental_fully_destroyed(&point));
        point.suits_destroyed = 5;
        assert!(!elemental_mission_eligible(&point));
        assert!(!elemental_fully_destroyed(&point));
        point.suits_destroyed = 6;
        assert!(!elemental_mission_eligible(&point));
        assert!(elemental_fully_destroyed(&point));
    }

    #[test]
    fn tonnage_skips_dangling_ids() {
        let f = force();
        let assigned = vec![
            "mech-1".to_string(),
            "gone".to_string(),
            "mech-2".to_string(),
        ];
        assert_eq!(assigned_tonnage(&f, &assigned), 100.0);
    }

    #[test]
    fn achievements_recompute_from_the_combat_record() {
        let defs: Vec<AchievementDef> = serde_json::from_str(
            r#"[
                {"id":"ace","name":"Ace","condition":"killCount >= 5"},
                {"id":"wingman","name":"Wingman","condition":"killCount >= 5 && assists >= 2"},
                {"id":"heavy","name":"Heavy Hitter","condition":"tonnageDestroyed >= 300"}
            ]"#,
        )
        .unwrap();
        let mut p = pilot("p", 4, 5);
        for i in 0..5 {
            p.combat_record.kills.push(Kill {
                mech_model: format!("Target {i}"),
                tonnage: 65.0,
                mission: String::new(),
                date: String::new(),
            });
        }
        p.combat_record.assists = 1;
        assert_eq!(recompute_achievements(&p, &defs), vec!["ace", "heavy"]);
        p.combat_record.assists = 2;
        assert_eq!(
            recompute_achievements(&p, &defs),
            vec!["ace", "wingman", "heavy"]
        );
    }

    proptest! {
        #[test]
        fn adjusted_bv_never_negative(bv in 0i64..5000, g in 0i64..=8, pl in 0i64..=8) {
            let mut m = mech("m", None);
            m.bv = bv;
            prop_assert!(adjusted_bv(&m, Some(&pilot("p", g, pl))) >= 0);
        }

        #[test]
        fn available_pilots_never_includes_assigned(n in 1usize..8) {
            let mut f = force();
            f.mechs = (0..n)
                .map(|i| mech(&format!("mech-{i}"), Some(&format!("pilot-{i}"))))
                .collect();
            f.pilots = (0..n + 2).map(|i| pilot(&format!("pilot-{i}"), 4, 5)).collect();
            let avail = available_pilots(&f);
            for p in avail {
                prop_assert!(!f.mechs.iter().any(|m| m.pilot_id.as_deref() == Some(p.id.as_str())));
            }
        }
    }
}
