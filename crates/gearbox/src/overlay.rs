//! The host-facing overlay.

use gearbox_core::{Mat4, Vec2, Vec3};
use gearbox_ui::{Color, MouseRouter, PointerSnapshot, UiContext};

use crate::buffer::SlotHandle;
use crate::config::OverlayConfig;
use crate::gear::{draw_tree, reconcile_tree, resize_tree, update_tree, Gear, GearConfig, UpdateContext};
use crate::gears::{
    Alerter, DataSampler, Labeler, LineDrawer, LineSpace, Marker, Plotter, TempBoxDrawer, TreeView,
};
use crate::picking::{PickHit, Ray};
use crate::render::{DrawFrame, DrawStats, RenderPass, Renderer, TextRenderer};

/// Root of the gear tree.
#[derive(Debug)]
struct OverlayGears {
    config: GearConfig,
    world_lines: LineDrawer,
    screen_lines: LineDrawer,
    marker: Marker,
    temp_boxes: TempBoxDrawer,
    labeler: Labeler,
    alerter: Alerter,
    tree_view: TreeView,
    plotter: Plotter,
}

impl Gear for OverlayGears {
    fn name(&self) -> &str {
        "overlay"
    }

    fn config(&self) -> &GearConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut GearConfig {
        &mut self.config
    }

    fn update(&mut self, _ctx: &mut UpdateContext<'_>, _dt: f32) {}

    fn draw(&mut self, _frame: &mut DrawFrame<'_>) {}

    fn clear(&mut self) {
        self.for_each_child(&mut |child| child.clear());
    }

    fn for_each_child(&mut self, visit: &mut dyn FnMut(&mut dyn Gear)) {
        visit(&mut self.world_lines);
        visit(&mut self.screen_lines);
        visit(&mut self.marker);
        visit(&mut self.temp_boxes);
        visit(&mut self.plotter);
        visit(&mut self.tree_view);
        visit(&mut self.labeler);
        visit(&mut self.alerter);
    }
}

/// In-process debug overlay.
///
/// The host calls [`DebugOverlay::update`] once per frame, then
/// [`DebugOverlay::draw`] once per [`RenderPass`]. Everything else can be
/// called from anywhere between frames.
#[derive(Debug)]
pub struct DebugOverlay {
    ui: UiContext,
    router: MouseRouter,
    gears: OverlayGears,
    viewport: Vec2,
    view_projection: Mat4,
    inverse_view_projection: Mat4,
    frame: u64,
    elapsed: f32,
}

impl DebugOverlay {
    /// Creates an overlay for a viewport of `width` × `height` pixels.
    #[must_use]
    pub fn new(config: OverlayConfig, width: f32, height: f32) -> Self {
        let viewport = Vec2::new(width, height);
        let mut ui = UiContext::new();
        let gears = OverlayGears {
            config: config.overlay,
            world_lines: LineDrawer::new(LineSpace::Game, config.world_lines),
            screen_lines: LineDrawer::new(LineSpace::Screen, config.screen_lines),
            marker: Marker::new(config.marks),
            temp_boxes: TempBoxDrawer::new(config.temp_boxes),
            labeler: Labeler::new(config.labels),
            alerter: Alerter::new(config.alerts),
            tree_view: TreeView::new(&mut ui, config.tree_view),
            plotter: Plotter::new(config.plots, viewport),
        };
        Self {
            ui,
            router: MouseRouter::new(),
            gears,
            viewport,
            view_projection: Mat4::IDENTITY,
            inverse_view_projection: Mat4::IDENTITY,
            frame: 0,
            elapsed: 0.0,
        }
    }

    /// Runs one frame: config reconciliation, pointer routing, gear updates.
    pub fn update(&mut self, dt: f32, pointer: PointerSnapshot) {
        reconcile_tree(&mut self.gears, &mut self.ui);
        if !self.gears.config.enabled {
            return;
        }
        self.router.update(&mut self.ui, pointer);

        let mut ctx = UpdateContext {
            ui: &mut self.ui,
            pointer,
            frame: self.frame,
            elapsed: self.elapsed,
            viewport: self.viewport,
            view_projection: self.view_projection,
        };
        update_tree(&mut self.gears, &mut ctx, dt);

        self.frame += 1;
        self.elapsed += dt;
    }

    /// Submits everything that belongs to `pass`.
    pub fn draw(&mut self, pass: RenderPass, renderer: &mut dyn Renderer, text: &mut dyn TextRenderer) -> DrawStats {
        let mut frame = DrawFrame::new(pass, renderer, text, self.viewport, self.view_projection);
        draw_tree(&mut self.gears, &mut frame);
        frame.stats()
    }

    /// Tells every gear about a new viewport size.
    pub fn on_resolution_changed(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height);
        resize_tree(&mut self.gears, &mut self.ui, self.viewport);
    }

    /// Sets the camera used for marks, labels and picking.
    pub fn set_camera(&mut self, view_projection: Mat4, inverse_view_projection: Mat4) {
        self.view_projection = view_projection;
        self.inverse_view_projection = inverse_view_projection;
    }

    /// Frames updated so far.
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// Viewport size.
    #[must_use]
    pub const fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Box registry.
    #[must_use]
    pub const fn ui(&self) -> &UiContext {
        &self.ui
    }

    /// Master flags.
    pub fn config_mut(&mut self) -> &mut GearConfig {
        &mut self.gears.config
    }

    /// Current configuration, including the plotter's hidden set.
    #[must_use]
    pub fn config(&self) -> OverlayConfig {
        let gears = &self.gears;
        OverlayConfig {
            overlay: gears.config,
            screen_lines: gears.screen_lines.settings().clone(),
            world_lines: gears.world_lines.settings().clone(),
            marks: gears.marker.settings().clone(),
            labels: gears.labeler.settings().clone(),
            alerts: gears.alerter.settings().clone(),
            tree_view: gears.tree_view.settings().clone(),
            temp_boxes: gears.temp_boxes.settings().clone(),
            plots: gears.plotter.settings().clone(),
        }
    }

    /// 3D line drawer.
    pub fn world_lines_mut(&mut self) -> &mut LineDrawer {
        &mut self.gears.world_lines
    }

    /// 2D line drawer.
    pub fn screen_lines_mut(&mut self) -> &mut LineDrawer {
        &mut self.gears.screen_lines
    }

    /// Marker.
    pub fn marker_mut(&mut self) -> &mut Marker {
        &mut self.gears.marker
    }

    /// Labeler.
    pub fn labeler_mut(&mut self) -> &mut Labeler {
        &mut self.gears.labeler
    }

    /// Alerter.
    pub fn alerter_mut(&mut self) -> &mut Alerter {
        &mut self.gears.alerter
    }

    /// Tree view.
    #[must_use]
    pub const fn tree_view(&self) -> &TreeView {
        &self.gears.tree_view
    }

    /// Tree view, mutably.
    pub fn tree_view_mut(&mut self) -> &mut TreeView {
        &mut self.gears.tree_view
    }

    /// Temporary box drawer.
    pub fn temp_boxes_mut(&mut self) -> &mut TempBoxDrawer {
        &mut self.gears.temp_boxes
    }

    /// Plotter.
    #[must_use]
    pub const fn plotter(&self) -> &Plotter {
        &self.gears.plotter
    }

    /// Plotter, mutably.
    pub fn plotter_mut(&mut self) -> &mut Plotter {
        &mut self.gears.plotter
    }

    /// Shows or moves a 3D line.
    pub fn show_line(&mut self, key: &str, a: Vec3, b: Vec3, color: Color) -> SlotHandle {
        self.gears.world_lines.show_line(key, a, b, color)
    }

    /// Shows a 3D line for this frame only.
    pub fn show_line_once(&mut self, a: Vec3, b: Vec3, color: Color) -> bool {
        self.gears.world_lines.show_line_once(a, b, color)
    }

    /// Deletes a 3D line.
    pub fn delete_line(&mut self, key: &str) -> bool {
        self.gears.world_lines.delete_line(key)
    }

    /// Shows or moves a 2D line in pixels.
    pub fn show_line_2d(&mut self, key: &str, a: Vec2, b: Vec2, color: Color) -> SlotHandle {
        self.gears.screen_lines.show_line_2d(key, a, b, color)
    }

    /// Shows a 2D line for this frame only.
    pub fn show_line_2d_once(&mut self, a: Vec2, b: Vec2, color: Color) -> bool {
        self.gears.screen_lines.show_line_2d_once(a, b, color)
    }

    /// Deletes a 2D line.
    pub fn delete_line_2d(&mut self, key: &str) -> bool {
        self.gears.screen_lines.delete_line(key)
    }

    /// Shows or moves a mark.
    pub fn show_mark(&mut self, key: &str, position: Vec3, color: Color, label: Option<&str>) -> SlotHandle {
        self.gears.marker.show_mark(key, position, color, label)
    }

    /// Deletes a mark.
    pub fn delete_mark(&mut self, key: &str) -> bool {
        self.gears.marker.delete_mark(key)
    }

    /// Shows or replaces a label.
    pub fn show_label(&mut self, key: &str, text: &str, position: Vec2, color: Color) -> bool {
        self.gears.labeler.show_label(key, text, position, color)
    }

    /// Queues an alert.
    pub fn alert(&mut self, text: impl Into<String>, color: Color) {
        self.gears.alerter.alert(text, color);
    }

    /// Pushes a sample, creating the sampler on first use.
    pub fn add_sample(&mut self, name: &str, value: f32) {
        self.gears.plotter.add_sample(name, value);
    }

    /// Registers a sampler.
    pub fn add_sampler(&mut self, sampler: DataSampler) {
        self.gears.plotter.add_sampler(sampler);
    }

    /// Opens a plot. Returns false if it was already open.
    pub fn show_plot(&mut self, name: &str) -> bool {
        self.gears.plotter.show_plot(&mut self.ui, name)
    }

    /// Hides a plot and remembers it as hidden.
    pub fn hide_plot(&mut self, name: &str) -> bool {
        self.gears.plotter.hide_plot(&mut self.ui, name)
    }

    /// Closes a plot.
    pub fn remove_plot(&mut self, name: &str) -> bool {
        self.gears.plotter.remove_plot(&mut self.ui, name)
    }

    /// Sets a tree view value at a dotted path.
    pub fn set_tree_value(&mut self, path: &str, value: impl std::fmt::Display) -> bool {
        self.gears.tree_view.set_value(path, value.to_string())
    }

    /// Shows a wireframe box for this frame only.
    pub fn show_box_once(&mut self, min: Vec3, max: Vec3, color: Color) -> bool {
        self.gears.temp_boxes.show_box_once(min, max, color)
    }

    /// Nearest mark under a pixel.
    #[must_use]
    pub fn pick(&self, point: Vec2) -> Option<PickHit> {
        let ray = Ray::from_screen(point, self.viewport, &self.inverse_view_projection)?;
        self.gears.marker.pick(&ray)
    }
}
