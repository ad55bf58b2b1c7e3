//! Explorer configuration
//!
//! Loaded from an optional YAML file, then environment overrides, then CLI
//! flags (applied by the binary). Every field has a default, so an empty or
//! partial file is valid.
//!
//! ```yaml
//! api_base: http://127.0.0.1:8099
//! notification:
//!   duration_ms: 3200
//! focus:
//!   min_zoom: 0.8
//! export:
//!   background: "#0b0f1a"
//!   scale: 2.0
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use egui::{Color32, Vec2};
use nexus_graph::graph::parse_hex_color;
use nexus_graph::{AnimationSpec, FocusNavigator};
use serde::{Deserialize, Serialize};

use crate::error::ExplorerError;

pub const API_BASE_ENV_VAR: &str = "NEXUS_API_BASE";
pub const CONFIG_ENV_VAR: &str = "NEXUS_CONFIG";

/// Upper bound on `export.scale`
pub const MAX_EXPORT_SCALE: f32 = 8.0;

/// Backend started with no flags listens here
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8099";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub api_base: String,
    pub notification: NotificationSettings,
    pub focus: FocusSettings,
    pub tooltip: TooltipSettings,
    pub export: ExportSettings,
    pub surface: SurfaceSettings,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            notification: NotificationSettings::default(),
            focus: FocusSettings::default(),
            tooltip: TooltipSettings::default(),
            export: ExportSettings::default(),
            surface: SurfaceSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    pub duration_ms: u64,
    /// Initial snapshot failures stay up longer
    pub snapshot_failure_duration_ms: u64,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            duration_ms: 3200,
            snapshot_failure_duration_ms: 8000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusSettings {
    pub min_zoom: f32,
    pub duration_ms: u64,
}

impl Default for FocusSettings {
    fn default() -> Self {
        Self {
            min_zoom: 0.8,
            duration_ms: 400,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipSettings {
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Default for TooltipSettings {
    fn default() -> Self {
        Self {
            offset_x: 12.0,
            offset_y: 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub background: String,
    pub scale: f32,
    pub directory: PathBuf,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            background: "#0b0f1a".to_string(),
            scale: 2.0,
            directory: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceSettings {
    pub width: u32,
    pub height: u32,
}

impl Default for SurfaceSettings {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
        }
    }
}

impl ExplorerConfig {
    /// Load from `path` (or defaults), apply environment overrides, validate
    pub fn load(path: Option<&Path>) -> Result<Self, ExplorerError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ExplorerError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ExplorerError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&raw)
            .map_err(|e| ExplorerError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_yaml(raw: &str) -> Result<Self, ExplorerError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw).map_err(|e| ExplorerError::Config(e.to_string()))
    }

    fn apply_env(&mut self) {
        if let Ok(base) = std::env::var(API_BASE_ENV_VAR) {
            if !base.trim().is_empty() {
                tracing::debug!(api_base = %base, "api base overridden from environment");
                self.api_base = base;
            }
        }
    }

    pub fn validate(&self) -> Result<(), ExplorerError> {
        if self.api_base.trim().is_empty() {
            return Err(ExplorerError::Config("api_base must not be empty".into()));
        }
        if self.notification.duration_ms == 0 || self.notification.snapshot_failure_duration_ms == 0
        {
            return Err(ExplorerError::Config(
                "notification durations must be positive".into(),
            ));
        }
        if self.focus.duration_ms == 0 {
            return Err(ExplorerError::Config("focus.duration_ms must be positive".into()));
        }
        if self.focus.min_zoom.is_nan() || self.focus.min_zoom <= 0.0 {
            return Err(ExplorerError::Config("focus.min_zoom must be positive".into()));
        }
        if !(self.export.scale > 0.0 && self.export.scale <= MAX_EXPORT_SCALE) {
            return Err(ExplorerError::Config(format!(
                "export.scale must be in (0, {}]",
                MAX_EXPORT_SCALE
            )));
        }
        if self.surface.width == 0 || self.surface.height == 0 {
            return Err(ExplorerError::Config("surface size must be non-zero".into()));
        }
        self.export_background()?;
        Ok(())
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_millis(self.notification.duration_ms)
    }

    pub fn snapshot_failure_duration(&self) -> Duration {
        Duration::from_millis(self.notification.snapshot_failure_duration_ms)
    }

    pub fn focus_navigator(&self) -> FocusNavigator {
        FocusNavigator::new(
            self.focus.min_zoom,
            AnimationSpec::ease_out(self.focus.duration_ms),
        )
    }

    pub fn tooltip_offset(&self) -> Vec2 {
        Vec2::new(self.tooltip.offset_x, self.tooltip.offset_y)
    }

    pub fn export_background(&self) -> Result<Color32, ExplorerError> {
        parse_hex_color(&self.export.background).ok_or_else(|| {
            ExplorerError::Config(format!(
                "export.background '{}' is not a #rrggbb color",
                self.export.background
            ))
        })
    }
}
