#![deny(warnings)]

//! Force document persistence: a single JSON file round-trip.
//!
//! The core never reads or writes files on its own; this crate is the
//! boundary where a caller loads a Force document and later serializes the
//! same shape back out. Missing optional fields load as empty collections,
//! never as errors.

use force_core::Force;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed force document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Parse a Force document from JSON text.
pub fn force_from_json(text: &str) -> Result<Force, PersistError> {
    Ok(serde_json::from_str(text)?)
}

/// Serialize a Force document to pretty-printed JSON, the format force
/// files are kept in under version control.
pub fn force_to_json(force: &Force) -> Result<String, PersistError> {
    Ok(serde_json::to_string_pretty(force)?)
}

/// Load a Force document from a file.
pub fn load_force<P: AsRef<Path>>(path: P) -> Result<Force, PersistError> {
    let text = fs::read_to_string(&path)?;
    let force = force_from_json(&text)?;
    info!(
        path = %path.as_ref().display(),
        mechs = force.mechs.len(),
        pilots = force.pilots.len(),
        "loaded force"
    );
    Ok(force)
}

/// Save a Force document to a file.
pub fn save_force<P: AsRef<Path>>(path: P, force: &Force) -> Result<(), PersistError> {
    fs::write(&path, force_to_json(force)?)?;
    info!(path = %path.as_ref().display(), "saved force");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn sparse_document_loads_with_defaults() {
        let f = force_from_json(r#"{"id":"f","name":"F","startingWarchest":50,"currentWarchest":20}"#)
            .unwrap();
        assert!(f.mechs.is_empty());
        assert!(f.snapshots.is_empty());
        assert_eq!(f.wp_multiplier, 5);
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(matches!(
            force_from_json("{not json"),
            Err(PersistError::Malformed(_))
        ));
        assert!(matches!(
            force_from_json(r#"{"id":"f"}"#),
            Err(PersistError::Malformed(_))
        ));
    }

    #[test]
    fn file_round_trip_preserves_field_names() {
        let f = force_from_json(
            r#"{"id":"f","name":"F","startingWarchest":50,"currentWarchest":20,
                "mechs":[{"id":"m","name":"Shadow Hawk","bv":1064,"weight":55,
                          "activityLog":[{"timestamp":"3052-01-01","action":"Repaired","cost":4}]}]}"#,
        )
        .unwrap();
        let dir = std::env::temp_dir().join("warchest-persistence-test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("force.json");
        save_force(&path, &f).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"startingWarchest\""));
        assert!(text.contains("\"activityLog\""));
        let back = load_force(&path).unwrap();
        assert_eq!(back.mechs[0].activity_log[0].cost, 4);
        assert_eq!(back.mechs[0].weight, 55.0);
    }

    proptest! {
        #[test]
        fn json_round_trip_is_stable(warchest in -10_000i64..10_000, notes in ".{0,40}") {
            let mut f = force_from_json(r#"{"id":"f","name":"F","startingWarchest":0,"currentWarchest":0}"#).unwrap();
            f.current_warchest = warchest;
            f.notes = notes;
            let text = force_to_json(&f).unwrap();
            let back = force_from_json(&text).unwrap();
            prop_assert_eq!(back.current_warchest, f.current_warchest);
            prop_assert_eq!(back.notes, f.notes);
        }
    }
}
