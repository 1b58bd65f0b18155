//! 3D crosshair marks with optional labels and hover-picking.

use std::collections::BTreeMap;

use gearbox_core::Vec3;
use gearbox_ui::Color;

use crate::buffer::{OnceBuffer, SlotBuffer, SlotHandle};
use crate::config::MarkerConfig;
use crate::gear::{Gear, GearConfig, UpdateContext};
use crate::picking::{PickHit, PickShape, Ray};
use crate::render::{DrawFrame, OverlayVertex, RenderPass};

/// Three axis-aligned segments through `center`.
#[must_use]
pub fn crosshair(center: Vec3, size: f32, color: Color) -> [OverlayVertex; 6] {
    let half = size * 0.5;
    let arm = |axis: Vec3| {
        [
            OverlayVertex::new(center - axis * half, color),
            OverlayVertex::new(center + axis * half, color),
        ]
    };
    let [x0, x1] = arm(Vec3::X);
    let [y0, y1] = arm(Vec3::Y);
    let [z0, z1] = arm(Vec3::Z);
    [x0, x1, y0, y1, z0, z1]
}

#[derive(Debug, Clone)]
struct Mark {
    position: Vec3,
    color: Color,
    label: Option<String>,
    shape: PickShape,
}

/// Keyed and single-frame marks in world space.
#[derive(Debug)]
pub struct Marker {
    config: MarkerConfig,
    marks: SlotBuffer<6>,
    once: OnceBuffer<6>,
    /// Keyed by mark name so labels draw in a stable order.
    info: BTreeMap<String, Mark>,
    once_labels: Vec<(Vec3, String, Color)>,
}

impl Marker {
    /// Creates a marker.
    #[must_use]
    pub fn new(config: MarkerConfig) -> Self {
        Self {
            marks: SlotBuffer::new(config.capacity),
            once: OnceBuffer::new(config.once_capacity),
            info: BTreeMap::new(),
            once_labels: Vec::new(),
            config,
        }
    }

    /// Tunables.
    #[must_use]
    pub const fn settings(&self) -> &MarkerConfig {
        &self.config
    }

    /// Keyed marks.
    #[must_use]
    pub const fn marks(&self) -> &SlotBuffer<6> {
        &self.marks
    }

    /// Shows or moves the mark named `key`.
    ///
    /// The mark is pickable as a sphere as wide as the crosshair until
    /// [`Marker::set_pick_shape`] says otherwise.
    pub fn show_mark(&mut self, key: &str, position: Vec3, color: Color, label: Option<&str>) -> SlotHandle {
        let handle = self
            .marks
            .show(key, crosshair(position, self.config.size, color));
        if !handle.is_valid() {
            return handle;
        }

        let radius = self.config.size * 0.5;
        let label = label.map(str::to_owned);
        match self.info.get_mut(key) {
            Some(mark) => {
                if let PickShape::Sphere { center, .. } = &mut mark.shape {
                    *center = position;
                }
                mark.position = position;
                mark.color = color;
                mark.label = label;
            }
            None => {
                self.info.insert(
                    key.to_owned(),
                    Mark {
                        position,
                        color,
                        label,
                        shape: PickShape::Sphere { center: position, radius },
                    },
                );
            }
        }
        handle
    }

    /// Shows a mark for this frame only.
    pub fn show_mark_once(&mut self, position: Vec3, color: Color, label: Option<&str>) -> bool {
        if !self.once.push(crosshair(position, self.config.size, color)) {
            return false;
        }
        if let Some(text) = label {
            self.once_labels.push((position, text.to_owned(), color));
        }
        true
    }

    /// Replaces the shape a mark is picked by.
    pub fn set_pick_shape(&mut self, key: &str, shape: PickShape) -> bool {
        match self.info.get_mut(key) {
            Some(mark) => {
                mark.shape = shape;
                true
            }
            None => false,
        }
    }

    /// Deletes a mark.
    pub fn delete_mark(&mut self, key: &str) -> bool {
        self.info.remove(key);
        self.marks.delete(key)
    }

    /// Nearest keyed mark along `ray`.
    #[must_use]
    pub fn pick(&self, ray: &Ray) -> Option<PickHit> {
        self.info
            .iter()
            .filter_map(|(key, mark)| mark.shape.intersect(ray).map(|t| (key, t)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(key, distance)| PickHit {
                key: key.clone(),
                distance,
            })
    }

    fn draw_label(&self, frame: &mut DrawFrame<'_>, position: Vec3, text: &str, color: Color) {
        if let Some(screen) = frame.world_to_screen(position) {
            frame.text(text, screen + self.config.label_offset, color);
        }
    }
}

impl Gear for Marker {
    fn name(&self) -> &str {
        "marks"
    }

    fn config(&self) -> &GearConfig {
        &self.config.gear
    }

    fn config_mut(&mut self) -> &mut GearConfig {
        &mut self.config.gear
    }

    fn update(&mut self, _ctx: &mut UpdateContext<'_>, _dt: f32) {
        self.once.begin_frame();
        self.once_labels.clear();
    }

    fn draw(&mut self, frame: &mut DrawFrame<'_>) {
        match frame.pass() {
            RenderPass::GameSpace => {
                if !self.marks.is_empty() {
                    frame.lines(self.marks.vertices());
                }
                frame.lines(self.once.vertices());
            }
            RenderPass::Sprite => {
                for mark in self.info.values() {
                    if let Some(text) = &mark.label {
                        self.draw_label(frame, mark.position, text, mark.color);
                    }
                }
                for (position, text, color) in &self.once_labels {
                    self.draw_label(frame, *position, text, *color);
                }
            }
            RenderPass::ScreenSpace | RenderPass::UiBox => {}
        }
    }

    fn clear(&mut self) {
        self.marks.clear();
        self.info.clear();
        self.once.begin_frame();
        self.once_labels.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Renderer, TextRenderer};
    use gearbox_core::{Mat4, Vec2};

    struct NoLines;

    impl Renderer for NoLines {
        fn draw_line_list(&mut self, _pass: RenderPass, _vertices: &[OverlayVertex]) {}

        fn draw_triangle_list(&mut self, _pass: RenderPass, _vertices: &[OverlayVertex]) {}
    }

    #[derive(Default)]
    struct Strings(Vec<String>);

    impl TextRenderer for Strings {
        fn measure_string(&self, _text: &str) -> Vec2 {
            Vec2::ZERO
        }

        fn draw_string(&mut self, text: &str, _position: Vec2, _color: Color) {
            self.0.push(text.to_owned());
        }
    }

    #[test]
    fn test_crosshair_spans_size() {
        let vertices = crosshair(Vec3::new(1.0, 1.0, 1.0), 2.0, Color::WHITE);
        assert_eq!(vertices[0].position, [0.0, 1.0, 1.0]);
        assert_eq!(vertices[1].position, [2.0, 1.0, 1.0]);
        assert_eq!(vertices[5].position, [1.0, 1.0, 2.0]);
    }

    #[test]
    fn test_pick_returns_nearest() {
        let mut marker = Marker::new(MarkerConfig::default());
        marker.show_mark("far", Vec3::new(0.0, 0.0, 10.0), Color::WHITE, None);
        marker.show_mark("near", Vec3::new(0.0, 0.0, 2.0), Color::WHITE, Some("near"));
        marker.show_mark("aside", Vec3::new(5.0, 0.0, 1.0), Color::WHITE, None);

        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert_eq!(marker.pick(&ray).unwrap().key, "near");

        marker.delete_mark("near");
        assert_eq!(marker.pick(&ray).unwrap().key, "far");
    }

    #[test]
    fn test_moving_mark_moves_pick_sphere() {
        let mut marker = Marker::new(MarkerConfig::default());
        marker.show_mark("m", Vec3::new(0.0, 0.0, 5.0), Color::WHITE, None);
        marker.show_mark("m", Vec3::new(9.0, 0.0, 5.0), Color::WHITE, None);

        assert!(marker.pick(&Ray::new(Vec3::ZERO, Vec3::Z)).is_none());
        assert_eq!(marker.marks().len(), 1);
    }

    #[test]
    fn test_overflow_leaves_no_pick_shape() {
        let config = MarkerConfig {
            capacity: 1,
            ..MarkerConfig::default()
        };
        let mut marker = Marker::new(config);
        marker.show_mark("a", Vec3::ZERO, Color::WHITE, None);
        let handle = marker.show_mark("b", Vec3::new(0.0, 0.0, 3.0), Color::WHITE, None);

        assert!(!handle.is_valid());
        assert!(!marker.set_pick_shape("b", PickShape::Plane { point: Vec3::ZERO, normal: Vec3::Z }));
    }

    #[test]
    fn test_labels_draw_in_key_order() {
        let mut marker = Marker::new(MarkerConfig::default());
        for key in ["delta", "alpha", "charlie", "bravo"] {
            marker.show_mark(key, Vec3::ZERO, Color::WHITE, Some(key));
        }
        marker.show_mark("unlabeled", Vec3::ZERO, Color::WHITE, None);

        let mut lines = NoLines;
        let mut text = Strings::default();
        let mut frame = DrawFrame::new(
            RenderPass::Sprite,
            &mut lines,
            &mut text,
            Vec2::new(100.0, 100.0),
            Mat4::IDENTITY,
        );
        marker.draw(&mut frame);

        assert_eq!(text.0, vec!["alpha", "bravo", "charlie", "delta"]);
    }
}
