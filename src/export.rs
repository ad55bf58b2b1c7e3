//! Export of the current view and snapshot
//!
//! File names carry a UTC timestamp: `nexus-graph-YYYYMMDD-HHMMSS.png` and
//! `nexus-snapshot-YYYYMMDD-HHMMSS.json`, written into `export.directory`.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use image::ImageFormat;
use nexus_graph::GraphSurface;

use crate::config::ExplorerConfig;
use crate::error::ExplorerError;
use crate::session::Session;

const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

pub fn png_file_name(now: DateTime<Utc>) -> String {
    format!("nexus-graph-{}.png", now.format(TIMESTAMP_FORMAT))
}

pub fn json_file_name(now: DateTime<Utc>) -> String {
    format!("nexus-snapshot-{}.json", now.format(TIMESTAMP_FORMAT))
}

/// Rasterize the surface at the configured background and scale, write a PNG
pub fn export_png<S: GraphSurface>(
    session: &Session<S>,
    config: &ExplorerConfig,
    now: DateTime<Utc>,
) -> Result<PathBuf, ExplorerError> {
    let background = config.export_background()?;
    let image = session
        .surface()
        .rasterize(background, config.export.scale)?;

    let path = target_path(&config.export.directory, &png_file_name(now))?;
    image
        .save_with_format(&path, ImageFormat::Png)
        .map_err(|e| ExplorerError::Export(format!("{}: {}", path.display(), e)))?;

    tracing::info!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "graph image exported"
    );
    Ok(path)
}

/// Write the loaded snapshot as pretty-printed JSON
pub fn export_json<S: GraphSurface>(
    session: &Session<S>,
    config: &ExplorerConfig,
    now: DateTime<Utc>,
) -> Result<PathBuf, ExplorerError> {
    let snapshot = session
        .snapshot()
        .ok_or_else(|| ExplorerError::Export("no snapshot loaded".to_string()))?;
    let json = serde_json::to_string_pretty(snapshot)
        .map_err(|e| ExplorerError::Export(format!("snapshot serialization failed: {}", e)))?;

    let path = target_path(&config.export.directory, &json_file_name(now))?;
    std::fs::write(&path, json)?;

    tracing::info!(path = %path.display(), nodes = snapshot.nodes.len(), "snapshot exported");
    Ok(path)
}

fn target_path(directory: &Path, file_name: &str) -> Result<PathBuf, ExplorerError> {
    std::fs::create_dir_all(directory)?;
    Ok(directory.join(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use nexus_graph::HeadlessSurface;
    use nexus_types::{GraphNode, GraphSnapshot};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 7, 9, 5, 1).unwrap()
    }

    fn config(dir: &Path) -> ExplorerConfig {
        let mut config = ExplorerConfig::default();
        config.export.directory = dir.to_path_buf();
        config.export.scale = 1.0;
        config
    }

    fn loaded_session() -> Session<HeadlessSurface> {
        let mut session = Session::new(HeadlessSurface::new(64, 48), &ExplorerConfig::default());
        session.reload(GraphSnapshot {
            meta: None,
            nodes: vec![GraphNode {
                id: "A".into(),
                label: "Acme".into(),
                entity_type: None,
                claim_count: Some(3),
            }],
            edges: vec![],
            adjacency: None,
        });
        session
    }

    #[test]
    fn test_file_names_are_timestamped() {
        assert_eq!(png_file_name(now()), "nexus-graph-20250307-090501.png");
        assert_eq!(json_file_name(now()), "nexus-snapshot-20250307-090501.json");
    }

    #[test]
    fn test_export_json_round_trips_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let session = loaded_session();
        let path = export_json(&session, &config(dir.path()), now()).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\n  \"nodes\""));
        let parsed: GraphSnapshot = serde_json::from_str(&raw).unwrap();
        assert_eq!(Some(&parsed), session.snapshot());
    }

    #[test]
    fn test_export_json_without_snapshot_fails() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::new(HeadlessSurface::new(64, 48), &ExplorerConfig::default());
        let err = export_json(&session, &config(dir.path()), now()).unwrap_err();
        assert_eq!(err.code(), "EXPORT");
    }

    #[test]
    fn test_export_png_writes_scaled_image() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(&dir.path().join("shots"));
        config.export.scale = 2.0;
        let path = export_png(&loaded_session(), &config, now()).unwrap();

        assert!(path.ends_with("shots/nexus-graph-20250307-090501.png"));
        let image = image::open(&path).unwrap();
        assert_eq!((image.width(), image.height()), (128, 96));
    }

    #[test]
    fn test_export_png_oversized_scale_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path());
        config.export.scale = 100_000.0;
        let err = export_png(&loaded_session(), &config, now()).unwrap_err();
        assert_eq!(err.code(), "VIEW_TOO_LARGE");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
