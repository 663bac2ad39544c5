//! Snapshot encoding for save/load collaborators
//!
//! The envelope is the plain JSON form of `SnapshotV1`. The version is read
//! before the body so a snapshot from another format version is reported as
//! a mismatch instead of a parse failure.

use serde::Deserialize;
use thiserror::Error;

use crate::consts::SNAPSHOT_VERSION;
use crate::sim::SnapshotV1;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot version {found} is not supported (expected {expected})")]
    VersionMismatch { found: u32, expected: u32 },
}

#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

/// Serialize a snapshot to JSON
pub fn encode(snapshot: &SnapshotV1) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(snapshot)?)
}

/// Parse a snapshot, rejecting any version other than the current one
pub fn decode(json: &str) -> Result<SnapshotV1, SnapshotError> {
    let probe: VersionProbe = serde_json::from_str(json)?;
    if probe.version != SNAPSHOT_VERSION {
        return Err(SnapshotError::VersionMismatch {
            found: probe.version,
            expected: SNAPSHOT_VERSION,
        });
    }
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GameState, export_snapshot};

    #[test]
    fn test_encode_decode() {
        let mut state = GameState::new(21);
        state.player.gold = 123;
        state.progress.kills.orcs = 7;
        let snapshot = export_snapshot(&state);

        let json = encode(&snapshot).unwrap();
        assert!(json.contains("\"version\":1"));
        assert_eq!(decode(&json).unwrap(), snapshot);
    }

    #[test]
    fn test_version_mismatch() {
        let json = r#"{ "version": 2, "anything": "goes" }"#;
        match decode(json) {
            Err(SnapshotError::VersionMismatch { found, expected }) => {
                assert_eq!(found, 2);
                assert_eq!(expected, 1);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_garbage_is_json_error() {
        assert!(matches!(decode("not json"), Err(SnapshotError::Json(_))));
        assert!(matches!(
            decode(r#"{ "version": 1 }"#),
            Err(SnapshotError::Json(_))
        ));
    }

    #[test]
    fn test_legacy_snapshot_without_abilities() {
        let state = GameState::new(3);
        let mut value = serde_json::to_value(export_snapshot(&state)).unwrap();
        value["player"]
            .as_object_mut()
            .unwrap()
            .remove("abilities");
        value.as_object_mut().unwrap().remove("kill_counts");

        let snapshot = decode(&value.to_string()).unwrap();
        assert!(snapshot.player.abilities.is_none());
        assert_eq!(snapshot.kill_counts.slimes, 0);
    }
}
