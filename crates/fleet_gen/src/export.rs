//! Write generated records to disk as one payload file per record kind.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fleet_core::payload::{assemble, Payload};
use fleet_core::records::{StatusChange, Trip};

use crate::encoding::Encoder;

pub const STATUS_CHANGES_FILE: &str = "status_changes.json";
pub const TRIPS_FILE: &str = "trips.json";

/// Paths of the payload files written by [`export_payloads`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFiles {
    pub status_changes: PathBuf,
    pub trips: PathBuf,
}

/// Write `status_changes.json` and `trips.json` into `dir`, creating it if needed.
pub fn export_payloads(
    dir: impl AsRef<Path>,
    encoder: &Encoder,
    status_changes: Vec<StatusChange>,
    trips: Vec<Trip>,
) -> Result<ExportedFiles> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir).with_context(|| format!("creating output directory {}", dir.display()))?;

    let version = encoder.version().clone();
    let files = ExportedFiles {
        status_changes: dir.join(STATUS_CHANGES_FILE),
        trips: dir.join(TRIPS_FILE),
    };

    let payload = assemble(version.clone(), Some(status_changes), None)?;
    write_payload(&files.status_changes, encoder, &payload)?;

    let payload = assemble(version, None, Some(trips))?;
    write_payload(&files.trips, encoder, &payload)?;

    Ok(files)
}

/// Encode one payload as pretty-printed JSON at `path`.
pub fn write_payload(path: impl AsRef<Path>, encoder: &Encoder, payload: &Payload) -> Result<()> {
    let path = path.as_ref();
    let mut writer = create_output_file(path)?;
    serde_json::to_writer_pretty(&mut writer, &encoder.payload(payload))
        .with_context(|| format!("writing {}", path.display()))?;
    writer.flush()?;
    Ok(())
}

fn create_output_file(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    Ok(BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::DateFormat;
    use fleet_core::records::EventTypeReason;
    use fleet_core::test_helpers::{human_bicycle, test_time};
    use fleet_core::version::MdsVersion;
    use geo::Point;
    use serde_json::Value;

    #[test]
    fn export_writes_both_payloads() {
        let dir = tempfile::tempdir().expect("temp dir");
        let out = dir.path().join("nested/data");
        let device = human_bicycle();
        let events = vec![
            StatusChange::new(&device, EventTypeReason::ServiceStart, test_time(6), Point::new(0.5, 0.5)),
            StatusChange::new(&device, EventTypeReason::ServiceEnd, test_time(20), Point::new(0.5, 0.5)),
        ];
        let encoder = Encoder::new(MdsVersion::lower(), DateFormat::Unix);

        let files = export_payloads(&out, &encoder, events, Vec::new()).expect("export");

        let status: Value =
            serde_json::from_str(&std::fs::read_to_string(&files.status_changes).expect("read")).expect("json");
        assert_eq!(status["version"], "0.2.0");
        assert_eq!(status["data"]["status_changes"].as_array().map(Vec::len), Some(2));

        let trips: Value = serde_json::from_str(&std::fs::read_to_string(&files.trips).expect("read")).expect("json");
        assert_eq!(trips["data"]["trips"], serde_json::json!([]));
    }
}
