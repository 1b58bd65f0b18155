//! The seam between gears and the host's renderer.
//!
//! Gears never talk to a GPU. They hand vertex slices to a [`Renderer`] and
//! strings to a [`TextRenderer`], both implemented by the host, through a
//! [`DrawFrame`] that also counts what was submitted.

use bytemuck::{Pod, Zeroable};
use gearbox_core::{Mat4, Vec2, Vec3};
use gearbox_ui::{Color, Rect};

/// A named phase of the host's frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderPass {
    /// 2D lines in pixel coordinates.
    ScreenSpace,
    /// 3D lines and wireframes in world coordinates.
    GameSpace,
    /// Window backgrounds as triangle lists, pixel coordinates.
    UiBox,
    /// Text.
    Sprite,
}

impl RenderPass {
    /// Passes in the order a host is expected to run them.
    pub const ALL: [Self; 4] = [Self::GameSpace, Self::ScreenSpace, Self::UiBox, Self::Sprite];
}

/// Vertex handed to the renderer. Layout is stable for direct upload.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct OverlayVertex {
    /// World position, or pixel position with z = 0 for screen passes.
    pub position: [f32; 3],
    /// RGBA color.
    pub color: [f32; 4],
}

impl OverlayVertex {
    /// Fully transparent vertex at the origin. Freed slots hold this.
    pub const CLEAR: Self = Self {
        position: [0.0; 3],
        color: [0.0; 4],
    };

    /// Creates a world-space vertex.
    #[must_use]
    pub const fn new(position: Vec3, color: Color) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
        }
    }

    /// Creates a screen-space vertex.
    #[must_use]
    pub const fn screen(position: Vec2, color: Color) -> Self {
        Self::new(position.extend(0.0), color)
    }

    /// True if the vertex cannot show up.
    #[must_use]
    pub fn is_transparent(&self) -> bool {
        self.color[3] <= 0.0
    }
}

/// Two triangles covering `rect`.
#[must_use]
pub fn rect_triangles(rect: Rect, color: Color) -> [OverlayVertex; 6] {
    let tl = OverlayVertex::screen(Vec2::new(rect.x, rect.y), color);
    let tr = OverlayVertex::screen(Vec2::new(rect.right(), rect.y), color);
    let bl = OverlayVertex::screen(Vec2::new(rect.x, rect.bottom()), color);
    let br = OverlayVertex::screen(Vec2::new(rect.right(), rect.bottom()), color);
    [tl, tr, bl, bl, tr, br]
}

/// Geometry sink implemented by the host.
pub trait Renderer {
    /// Draws `vertices.len() / 2` independent line segments.
    fn draw_line_list(&mut self, pass: RenderPass, vertices: &[OverlayVertex]);

    /// Draws `vertices.len() / 3` independent triangles.
    fn draw_triangle_list(&mut self, pass: RenderPass, vertices: &[OverlayVertex]);
}

/// Text measurement and drawing implemented by the host.
pub trait TextRenderer {
    /// Size of `text` in pixels.
    fn measure_string(&self, text: &str) -> Vec2;

    /// Draws `text` with its top-left corner at `position`.
    fn draw_string(&mut self, text: &str, position: Vec2, color: Color);
}

/// What one pass submitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    /// Number of draw calls.
    pub draw_calls: usize,
    /// Vertices submitted as line lists.
    pub line_vertices: usize,
    /// Vertices submitted as triangle lists.
    pub triangle_vertices: usize,
    /// Strings drawn.
    pub strings: usize,
}

impl DrawStats {
    /// Adds another pass's counters.
    pub fn accumulate(&mut self, other: &Self) {
        self.draw_calls += other.draw_calls;
        self.line_vertices += other.line_vertices;
        self.triangle_vertices += other.triangle_vertices;
        self.strings += other.strings;
    }
}

/// Everything a gear needs during one `draw(pass)` call.
pub struct DrawFrame<'a> {
    pass: RenderPass,
    renderer: &'a mut dyn Renderer,
    text: &'a mut dyn TextRenderer,
    viewport: Vec2,
    view_projection: Mat4,
    stats: DrawStats,
}

impl<'a> DrawFrame<'a> {
    /// Creates a frame for `pass`.
    pub fn new(
        pass: RenderPass,
        renderer: &'a mut dyn Renderer,
        text: &'a mut dyn TextRenderer,
        viewport: Vec2,
        view_projection: Mat4,
    ) -> Self {
        Self {
            pass,
            renderer,
            text,
            viewport,
            view_projection,
            stats: DrawStats::default(),
        }
    }

    /// The pass being drawn.
    #[must_use]
    pub const fn pass(&self) -> RenderPass {
        self.pass
    }

    /// Viewport size in pixels.
    #[must_use]
    pub const fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Projects a world point to pixels. `None` behind the camera.
    #[must_use]
    pub fn world_to_screen(&self, point: Vec3) -> Option<Vec2> {
        self.view_projection.world_to_screen(point, self.viewport)
    }

    /// Submits a line list. Empty slices issue no call.
    pub fn lines(&mut self, vertices: &[OverlayVertex]) {
        if vertices.is_empty() {
            return;
        }
        self.renderer.draw_line_list(self.pass, vertices);
        self.stats.draw_calls += 1;
        self.stats.line_vertices += vertices.len();
    }

    /// Submits a triangle list. Empty slices issue no call.
    pub fn triangles(&mut self, vertices: &[OverlayVertex]) {
        if vertices.is_empty() {
            return;
        }
        self.renderer.draw_triangle_list(self.pass, vertices);
        self.stats.draw_calls += 1;
        self.stats.triangle_vertices += vertices.len();
    }

    /// Measures a string.
    #[must_use]
    pub fn measure(&self, text: &str) -> Vec2 {
        self.text.measure_string(text)
    }

    /// Draws a string.
    pub fn text(&mut self, text: &str, position: Vec2, color: Color) {
        if text.is_empty() || color.is_invisible() {
            return;
        }
        self.text.draw_string(text, position, color);
        self.stats.strings += 1;
    }

    /// Counters so far.
    #[must_use]
    pub const fn stats(&self) -> DrawStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Count(usize);

    impl Renderer for Count {
        fn draw_line_list(&mut self, _pass: RenderPass, _vertices: &[OverlayVertex]) {
            self.0 += 1;
        }

        fn draw_triangle_list(&mut self, _pass: RenderPass, _vertices: &[OverlayVertex]) {
            self.0 += 1;
        }
    }

    struct NoText;

    impl TextRenderer for NoText {
        fn measure_string(&self, _text: &str) -> Vec2 {
            Vec2::ZERO
        }

        fn draw_string(&mut self, _text: &str, _position: Vec2, _color: Color) {}
    }

    #[test]
    fn test_empty_batches_issue_no_call() {
        let mut renderer = Count(0);
        let mut text = NoText;
        let mut frame = DrawFrame::new(
            RenderPass::ScreenSpace,
            &mut renderer,
            &mut text,
            Vec2::ONE,
            Mat4::IDENTITY,
        );

        frame.lines(&[]);
        frame.triangles(&[]);
        frame.lines(&[OverlayVertex::CLEAR; 2]);

        assert_eq!(frame.stats().draw_calls, 1);
        assert_eq!(frame.stats().line_vertices, 2);
        drop(frame);
        assert_eq!(renderer.0, 1);
    }

    #[test]
    fn test_vertex_is_pod() {
        let vertices = [OverlayVertex::screen(Vec2::new(1.0, 2.0), Color::WHITE)];
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), std::mem::size_of::<f32>() * 7);
    }

    #[test]
    fn test_rect_triangles_cover_corners() {
        let quad = rect_triangles(Rect::new(0.0, 0.0, 4.0, 2.0), Color::RED);
        assert_eq!(quad[0].position, [0.0, 0.0, 0.0]);
        assert_eq!(quad[5].position, [4.0, 2.0, 0.0]);
    }
}
