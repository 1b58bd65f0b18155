//! Text at screen positions.

use std::collections::BTreeMap;

use gearbox_core::Vec2;
use gearbox_ui::Color;

use crate::config::LabelerConfig;
use crate::gear::{Gear, GearConfig, UpdateContext};
use crate::render::{DrawFrame, RenderPass};

#[derive(Debug, Clone, PartialEq)]
struct Label {
    text: String,
    position: Vec2,
    color: Color,
}

/// Keyed and single-frame labels.
#[derive(Debug)]
pub struct Labeler {
    name: &'static str,
    config: LabelerConfig,
    labels: BTreeMap<String, Label>,
    once: Vec<Label>,
    overflowed: bool,
}

impl Labeler {
    /// Creates a labeler.
    #[must_use]
    pub fn new(config: LabelerConfig) -> Self {
        Self::named("labels", config)
    }

    pub(crate) fn named(name: &'static str, config: LabelerConfig) -> Self {
        Self {
            name,
            config,
            labels: BTreeMap::new(),
            once: Vec::new(),
            overflowed: false,
        }
    }

    /// Tunables.
    #[must_use]
    pub const fn settings(&self) -> &LabelerConfig {
        &self.config
    }

    /// Number of keyed labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True if there are no keyed labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of single-frame labels this frame.
    #[must_use]
    pub fn once_len(&self) -> usize {
        self.once.len()
    }

    /// Text of a keyed label.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(|l| l.text.as_str())
    }

    /// Shows or replaces the label named `key`. False when full.
    pub fn show_label(&mut self, key: &str, text: &str, position: Vec2, color: Color) -> bool {
        if let Some(label) = self.labels.get_mut(key) {
            label.text.clear();
            label.text.push_str(text);
            label.position = position;
            label.color = color;
            return true;
        }
        if self.labels.len() >= self.config.capacity {
            self.report_overflow();
            return false;
        }
        self.labels.insert(
            key.to_owned(),
            Label {
                text: text.to_owned(),
                position,
                color,
            },
        );
        true
    }

    /// Shows a label for this frame only. False when full.
    pub fn show_label_once(&mut self, text: &str, position: Vec2, color: Color) -> bool {
        if self.once.len() >= self.config.once_capacity {
            self.report_overflow();
            return false;
        }
        self.once.push(Label {
            text: text.to_owned(),
            position,
            color,
        });
        true
    }

    /// Deletes a keyed label.
    pub fn delete_label(&mut self, key: &str) -> bool {
        let removed = self.labels.remove(key).is_some();
        if removed {
            self.overflowed = false;
        }
        removed
    }

    /// Drops this frame's single-frame labels.
    pub fn begin_frame(&mut self) {
        self.once.clear();
    }

    fn report_overflow(&mut self) {
        if !self.overflowed {
            self.overflowed = true;
            tracing::debug!(
                gear = self.name,
                capacity = self.config.capacity,
                "label budget exhausted"
            );
        }
    }
}

impl Gear for Labeler {
    fn name(&self) -> &str {
        self.name
    }

    fn config(&self) -> &GearConfig {
        &self.config.gear
    }

    fn config_mut(&mut self) -> &mut GearConfig {
        &mut self.config.gear
    }

    fn update(&mut self, _ctx: &mut UpdateContext<'_>, _dt: f32) {
        self.begin_frame();
    }

    fn draw(&mut self, frame: &mut DrawFrame<'_>) {
        if frame.pass() != RenderPass::Sprite {
            return;
        }
        for label in self.labels.values().chain(&self.once) {
            frame.text(&label.text, label.position, label.color);
        }
    }

    fn clear(&mut self) {
        self.labels.clear();
        self.once.clear();
        self.overflowed = false;
    }
}
