use std::path::Path;

use schemport_convert::BatchSummary;

/// Write a batch summary as pretty-printed JSON, creating parent folders.
pub fn save_summary(path: &Path, summary: &BatchSummary) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(summary).map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemport_convert::FileOutcome;

    #[test]
    fn test_save_summary() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("reports").join("batch.json");
        let summary = BatchSummary {
            total_voxels: 8,
            files: vec![FileOutcome {
                source: "a.schematic".into(),
                dest: "a.nbt".into(),
                voxels: 8,
                error: None,
            }],
        };
        save_summary(&path, &summary).expect("save should succeed");
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).expect("read back"))
                .expect("valid json");
        assert_eq!(value["total_voxels"], 8);
        assert_eq!(value["files"][0]["dest"], "a.nbt");
    }
}
