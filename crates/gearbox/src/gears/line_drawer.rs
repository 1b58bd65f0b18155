//! Keyed and single-frame line segments.

use gearbox_core::{Vec2, Vec3};
use gearbox_ui::Color;

use crate::buffer::{OnceBuffer, SlotBuffer, SlotHandle};
use crate::config::LineDrawerConfig;
use crate::gear::{Gear, GearConfig, UpdateContext};
use crate::render::{DrawFrame, OverlayVertex, RenderPass};

/// Coordinate space a [`LineDrawer`] works in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSpace {
    /// Pixels, y down.
    Screen,
    /// World units.
    Game,
}

impl LineSpace {
    /// Pass the lines are drawn in.
    #[must_use]
    pub const fn pass(self) -> RenderPass {
        match self {
            Self::Screen => RenderPass::ScreenSpace,
            Self::Game => RenderPass::GameSpace,
        }
    }
}

/// Draws line segments in one coordinate space.
#[derive(Debug)]
pub struct LineDrawer {
    name: &'static str,
    space: LineSpace,
    config: LineDrawerConfig,
    lines: SlotBuffer<2>,
    once: OnceBuffer<2>,
}

fn segment(a: Vec3, b: Vec3, color: Color) -> [OverlayVertex; 2] {
    [OverlayVertex::new(a, color), OverlayVertex::new(b, color)]
}

impl LineDrawer {
    /// Creates a drawer.
    #[must_use]
    pub fn new(space: LineSpace, config: LineDrawerConfig) -> Self {
        Self {
            name: match space {
                LineSpace::Screen => "screen_lines",
                LineSpace::Game => "world_lines",
            },
            space,
            lines: SlotBuffer::new(config.capacity),
            once: OnceBuffer::new(config.once_capacity),
            config,
        }
    }

    /// Coordinate space.
    #[must_use]
    pub const fn space(&self) -> LineSpace {
        self.space
    }

    /// Tunables.
    #[must_use]
    pub const fn settings(&self) -> &LineDrawerConfig {
        &self.config
    }

    /// Keyed lines.
    #[must_use]
    pub const fn lines(&self) -> &SlotBuffer<2> {
        &self.lines
    }

    /// This frame's single-frame lines.
    #[must_use]
    pub const fn once_lines(&self) -> &OnceBuffer<2> {
        &self.once
    }

    /// Shows or moves the line named `key`.
    ///
    /// Returns [`SlotHandle::INVALID`] when the drawer is full.
    pub fn show_line(&mut self, key: &str, a: Vec3, b: Vec3, color: Color) -> SlotHandle {
        self.lines.show(key, segment(a, b, color))
    }

    /// Pixel-space variant of [`LineDrawer::show_line`].
    pub fn show_line_2d(&mut self, key: &str, a: Vec2, b: Vec2, color: Color) -> SlotHandle {
        self.show_line(key, a.extend(0.0), b.extend(0.0), color)
    }

    /// Updates a line through its handle.
    pub fn update_line(&mut self, handle: SlotHandle, a: Vec3, b: Vec3, color: Color) -> bool {
        self.lines.update(handle, segment(a, b, color))
    }

    /// Shows a line for this frame only.
    pub fn show_line_once(&mut self, a: Vec3, b: Vec3, color: Color) -> bool {
        self.once.push(segment(a, b, color))
    }

    /// Pixel-space variant of [`LineDrawer::show_line_once`].
    pub fn show_line_2d_once(&mut self, a: Vec2, b: Vec2, color: Color) -> bool {
        self.show_line_once(a.extend(0.0), b.extend(0.0), color)
    }

    /// Deletes a keyed line.
    pub fn delete_line(&mut self, key: &str) -> bool {
        self.lines.delete(key)
    }

    /// Deletes a keyed line through its handle.
    pub fn delete_handle(&mut self, handle: SlotHandle) -> bool {
        self.lines.delete_handle(handle)
    }

    /// Drops this frame's single-frame lines.
    pub fn begin_frame(&mut self) {
        self.once.begin_frame();
    }
}

impl Gear for LineDrawer {
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
        if frame.pass() != self.space.pass() {
            return;
        }
        if !self.lines.is_empty() {
            frame.lines(self.lines.vertices());
        }
        frame.lines(self.once.vertices());
    }

    fn clear(&mut self) {
        self.lines.clear();
        self.once.begin_frame();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_2d_lines_sit_on_z_zero() {
        let mut drawer = LineDrawer::new(LineSpace::Screen, LineDrawerConfig::default());
        let handle = drawer.show_line_2d("a", Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0), Color::RED);

        assert!(handle.is_valid());
        let vertices = drawer.lines().get("a").unwrap();
        assert_eq!(vertices[0].position, [1.0, 2.0, 0.0]);
        assert_eq!(vertices[1].position, [3.0, 4.0, 0.0]);
    }

    #[test]
    fn test_capacity_from_config() {
        let config = LineDrawerConfig {
            capacity: 1,
            once_capacity: 1,
            ..LineDrawerConfig::default()
        };
        let mut drawer = LineDrawer::new(LineSpace::Game, config);

        assert!(drawer.show_line("a", Vec3::ZERO, Vec3::X, Color::WHITE).is_valid());
        assert!(!drawer.show_line("b", Vec3::ZERO, Vec3::X, Color::WHITE).is_valid());
        assert!(drawer.show_line_once(Vec3::ZERO, Vec3::Y, Color::WHITE));
        assert!(!drawer.show_line_once(Vec3::ZERO, Vec3::Y, Color::WHITE));
    }

    #[test]
    fn test_update_and_delete_by_handle() {
        let mut drawer = LineDrawer::new(LineSpace::Game, LineDrawerConfig::default());
        let handle = drawer.show_line("a", Vec3::ZERO, Vec3::X, Color::WHITE);

        assert!(drawer.update_line(handle, Vec3::ZERO, Vec3::Y, Color::RED));
        assert_eq!(drawer.lines().get("a").unwrap()[1].position, [0.0, 1.0, 0.0]);
        assert!(drawer.delete_handle(handle));
        assert!(!drawer.delete_line("a"));
    }
}
