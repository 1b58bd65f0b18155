//! # Gearbox
//!
//! In-process debug overlay: independent "gears" that draw diagnostics into
//! the host's frame through a handful of shared render passes.
//!
//! ## Frame Flow
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         DebugOverlay                                │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │  update(dt, pointer)                                                │
//! │    1. reconcile gear configs (clear requests, flag changes)         │
//! │    2. MouseRouter → box events                                      │
//! │    3. gear tree update, pre-order (once buffers reset here)         │
//! │                                                                     │
//! │  draw(pass, renderer, text)   × ScreenSpace, GameSpace, UiBox, Sprite│
//! │    each gear submits only the buffers that belong to `pass`         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Budgets
//!
//! Every gear owns fixed-capacity storage. Running out is never an error:
//! the call is dropped and a sentinel is returned.

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod buffer;
pub mod config;
pub mod error;
pub mod gear;
pub mod gears;
pub mod overlay;
pub mod picking;
pub mod render;

pub use gearbox_core as core;
pub use gearbox_ui as ui;

pub use buffer::{OnceBuffer, SlotBuffer, SlotHandle};
pub use config::OverlayConfig;
pub use error::{ConfigError, ConfigResult};
pub use gear::{draw_tree, reconcile_tree, resize_tree, update_tree, Gear, GearConfig, UpdateContext};
pub use gears::{
    Alerter, DataSampler, DataSamplerManager, Labeler, LineDrawer, LineSpace, Marker, Plotter,
    SampleSource, TempBoxDrawer, TreeRow, TreeView,
};
pub use overlay::DebugOverlay;
pub use picking::{PickHit, PickShape, Ray};
pub use render::{DrawFrame, DrawStats, OverlayVertex, RenderPass, Renderer, TextRenderer};
