//! Overlay configuration.
//!
//! One TOML table per gear. Every table carries the gear's `enabled` and
//! `visible` flags next to its own tunables:
//!
//! ```toml
//! [world_lines]
//! enabled = true
//! visible = true
//! capacity = 10000
//!
//! [plots]
//! history_length = 120
//! hidden = ["frame_time"]
//! ```
//!
//! Missing tables and fields fall back to their defaults.

use std::collections::BTreeSet;

use gearbox_core::Vec2;
use gearbox_ui::Color;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::gear::GearConfig;

/// Default persistent line budget.
pub const DEFAULT_LINE_CAPACITY: usize = 10_000;

/// Line drawer tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineDrawerConfig {
    /// Flags.
    #[serde(flatten)]
    pub gear: GearConfig,
    /// Maximum keyed lines.
    pub capacity: usize,
    /// Maximum single-frame lines.
    pub once_capacity: usize,
}

impl Default for LineDrawerConfig {
    fn default() -> Self {
        Self {
            gear: GearConfig::default(),
            capacity: DEFAULT_LINE_CAPACITY,
            once_capacity: DEFAULT_LINE_CAPACITY,
        }
    }
}

/// Marker tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// Flags.
    #[serde(flatten)]
    pub gear: GearConfig,
    /// Maximum keyed marks.
    pub capacity: usize,
    /// Maximum single-frame marks.
    pub once_capacity: usize,
    /// Crosshair arm length in world units.
    pub size: f32,
    /// Pixel offset of a mark's label from its projected center.
    pub label_offset: Vec2,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            gear: GearConfig::default(),
            capacity: 1_000,
            once_capacity: 1_000,
            size: 0.5,
            label_offset: Vec2::new(4.0, -14.0),
        }
    }
}

/// Labeler tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelerConfig {
    /// Flags.
    #[serde(flatten)]
    pub gear: GearConfig,
    /// Maximum keyed labels.
    pub capacity: usize,
    /// Maximum single-frame labels.
    pub once_capacity: usize,
}

impl Default for LabelerConfig {
    fn default() -> Self {
        Self {
            gear: GearConfig::default(),
            capacity: 1_000,
            once_capacity: 1_000,
        }
    }
}

/// Alerter tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlerterConfig {
    /// Flags.
    #[serde(flatten)]
    pub gear: GearConfig,
    /// Oldest alerts are dropped beyond this many lines.
    pub max_lines: usize,
    /// Seconds an alert stays up.
    pub lifetime: f32,
    /// Seconds of fade at the end of the lifetime.
    pub fade_time: f32,
    /// Top-left of the first line.
    pub position: Vec2,
    /// Extra pixels between lines.
    pub line_spacing: f32,
}

impl Default for AlerterConfig {
    fn default() -> Self {
        Self {
            gear: GearConfig::default(),
            max_lines: 8,
            lifetime: 5.0,
            fade_time: 1.0,
            position: Vec2::new(8.0, 8.0),
            line_spacing: 2.0,
        }
    }
}

/// Tree view tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeViewConfig {
    /// Flags.
    #[serde(flatten)]
    pub gear: GearConfig,
    /// Window position.
    pub position: Vec2,
    /// Window size.
    pub size: Vec2,
    /// Pixel height of one row.
    pub row_height: f32,
    /// Pixel indent per depth level.
    pub indent: f32,
    /// Row text color.
    pub text_color: Color,
}

impl Default for TreeViewConfig {
    fn default() -> Self {
        Self {
            gear: GearConfig::default(),
            position: Vec2::new(8.0, 360.0),
            size: Vec2::new(260.0, 220.0),
            row_height: 14.0,
            indent: 12.0,
            text_color: Color::WHITE,
        }
    }
}

/// Temporary box tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TempBoxConfig {
    /// Flags.
    #[serde(flatten)]
    pub gear: GearConfig,
    /// Maximum boxes per frame.
    pub capacity: usize,
}

impl Default for TempBoxConfig {
    fn default() -> Self {
        Self {
            gear: GearConfig::default(),
            capacity: 1_000,
        }
    }
}

/// Plotter tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotterConfig {
    /// Flags.
    #[serde(flatten)]
    pub gear: GearConfig,
    /// Size of a new plot window.
    pub default_size: Vec2,
    /// Where the first plot goes.
    pub origin: Vec2,
    /// Gap between packed plots.
    pub spacing: f32,
    /// Samples kept by samplers the plotter creates.
    pub history_length: usize,
    /// Frames between pulls for samplers the plotter creates.
    pub sample_rate: u32,
    /// Fraction of the gap to the instantaneous range closed each frame.
    pub smoothing: f32,
    /// Single-frame line budget shared by every plot.
    pub line_budget: usize,
    /// Plot line color.
    pub line_color: Color,
    /// Names of plots the user hid.
    pub hidden: BTreeSet<String>,
}

impl Default for PlotterConfig {
    fn default() -> Self {
        Self {
            gear: GearConfig::default(),
            default_size: Vec2::new(200.0, 100.0),
            origin: Vec2::new(8.0, 140.0),
            spacing: 8.0,
            history_length: 100,
            sample_rate: 1,
            smoothing: 0.3,
            line_budget: DEFAULT_LINE_CAPACITY,
            line_color: Color::GREEN,
            hidden: BTreeSet::new(),
        }
    }
}

/// Configuration for the whole overlay.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Master switch.
    #[serde(flatten)]
    pub overlay: GearConfig,
    /// 2D lines in pixels.
    pub screen_lines: LineDrawerConfig,
    /// 3D lines in world units.
    pub world_lines: LineDrawerConfig,
    /// Marks.
    pub marks: MarkerConfig,
    /// Labels.
    pub labels: LabelerConfig,
    /// Alerts.
    pub alerts: AlerterConfig,
    /// Tree inspector.
    pub tree_view: TreeViewConfig,
    /// Wireframe boxes.
    pub temp_boxes: TempBoxConfig,
    /// Plots.
    pub plots: PlotterConfig,
}

impl OverlayConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] on malformed TOML, [`ConfigError::InvalidValue`]
    /// on out-of-range values.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        tracing::info!(hidden_plots = config.plots.hidden.len(), "overlay config loaded");
        Ok(config)
    }

    /// Writes the config as TOML.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Serialize`] if a value cannot be represented.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        let text = toml::to_string(self)?;
        tracing::info!(bytes = text.len(), "overlay config serialized");
        Ok(text)
    }

    /// Checks ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> ConfigResult<()> {
        fn check(ok: bool, field: &'static str, reason: &'static str) -> ConfigResult<()> {
            if ok {
                Ok(())
            } else {
                Err(ConfigError::InvalidValue { field, reason })
            }
        }

        check(self.alerts.max_lines > 0, "alerts.max_lines", "must be at least 1")?;
        check(self.alerts.lifetime > 0.0, "alerts.lifetime", "must be positive")?;
        check(self.alerts.fade_time >= 0.0, "alerts.fade_time", "must not be negative")?;
        check(self.tree_view.row_height > 0.0, "tree_view.row_height", "must be positive")?;
        check(self.plots.history_length > 0, "plots.history_length", "must be at least 1")?;
        check(
            self.plots.smoothing > 0.0 && self.plots.smoothing <= 1.0,
            "plots.smoothing",
            "must be in (0, 1]",
        )?;
        check(self.marks.size >= 0.0, "marks.size", "must not be negative")?;
        Ok(())
    }
}
