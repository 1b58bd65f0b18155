//! Single-frame wireframe boxes.

use gearbox_core::Vec3;
use gearbox_ui::Color;

use crate::buffer::OnceBuffer;
use crate::config::TempBoxConfig;
use crate::gear::{Gear, GearConfig, UpdateContext};
use crate::render::{DrawFrame, OverlayVertex, RenderPass};

/// The 12 edges of an axis-aligned box as a line list.
#[must_use]
pub fn box_edges(min: Vec3, max: Vec3, color: Color) -> [OverlayVertex; 24] {
    // Corner pairs differing in exactly one bit.
    const EDGES: [(usize, usize); 12] = [
        (0, 1), (2, 3), (4, 5), (6, 7),
        (0, 2), (1, 3), (4, 6), (5, 7),
        (0, 4), (1, 5), (2, 6), (3, 7),
    ];

    let corner = |i: usize| {
        OverlayVertex::new(
            Vec3::new(
                if i & 1 == 0 { min.x } else { max.x },
                if i & 2 == 0 { min.y } else { max.y },
                if i & 4 == 0 { min.z } else { max.z },
            ),
            color,
        )
    };
    let mut out = [OverlayVertex::CLEAR; 24];
    for (i, (a, b)) in EDGES.iter().enumerate() {
        out[i * 2] = corner(*a);
        out[i * 2 + 1] = corner(*b);
    }
    out
}

/// Wireframe boxes that last one frame.
#[derive(Debug)]
pub struct TempBoxDrawer {
    config: TempBoxConfig,
    boxes: OnceBuffer<24>,
}

impl TempBoxDrawer {
    /// Creates a drawer.
    #[must_use]
    pub fn new(config: TempBoxConfig) -> Self {
        Self {
            boxes: OnceBuffer::new(config.capacity),
            config,
        }
    }

    /// Tunables.
    #[must_use]
    pub const fn settings(&self) -> &TempBoxConfig {
        &self.config
    }

    /// Shows a box until the next update. False when full.
    pub fn show_box_once(&mut self, min: Vec3, max: Vec3, color: Color) -> bool {
        self.boxes.push(box_edges(min.min(max), min.max(max), color))
    }

    /// Boxes queued this frame.
    #[must_use]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// True if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

impl Gear for TempBoxDrawer {
    fn name(&self) -> &str {
        "temp_boxes"
    }

    fn config(&self) -> &GearConfig {
        &self.config.gear
    }

    fn config_mut(&mut self) -> &mut GearConfig {
        &mut self.config.gear
    }

    fn update(&mut self, _ctx: &mut UpdateContext<'_>, _dt: f32) {
        self.boxes.begin_frame();
    }

    fn draw(&mut self, frame: &mut DrawFrame<'_>) {
        if frame.pass() == RenderPass::GameSpace {
            frame.lines(self.boxes.vertices());
        }
    }

    fn clear(&mut self) {
        self.boxes.begin_frame();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_edge_is_axis_aligned() {
        let edges = box_edges(Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0), Color::WHITE);
        for pair in edges.chunks(2) {
            let differing = (0..3)
                .filter(|&axis| pair[0].position[axis] != pair[1].position[axis])
                .count();
            assert_eq!(differing, 1);
        }
    }

    #[test]
    fn test_swapped_corners_are_normalized() {
        let mut drawer = TempBoxDrawer::new(TempBoxConfig::default());
        assert!(drawer.show_box_once(Vec3::new(1.0, 1.0, 1.0), Vec3::ZERO, Color::WHITE));
        assert_eq!(drawer.len(), 1);
    }
}
