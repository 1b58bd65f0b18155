//! Live line graphs of sampler histories, one window per sampler.
//!
//! ```text
//! ┌ fps ──────────────┐ ┌ frame_ms ─────────┐
//! │61   /\    /\      │ │12 ___/\___        │  ← packed left to right,
//! │    /  \__/  \__   │ │                   │    wrapping below when the
//! │58                 │ │ 8                 │    viewport runs out
//! └───────────────────┘ └───────────────────┘
//! ```
//!
//! The displayed range chases the history's instantaneous range
//! (`ceil(max)`, `floor(min)`) with exponential smoothing. A collapsed range
//! draws a flat line through the middle of the plot.

use gearbox_core::Vec2;
use gearbox_ui::{Color, Rect, UiContext, Window};

use crate::config::{LabelerConfig, LineDrawerConfig, PlotterConfig};
use crate::gear::{Gear, GearConfig, UpdateContext};
use crate::gears::labeler::Labeler;
use crate::gears::line_drawer::{LineDrawer, LineSpace};
use crate::gears::sampler::{DataSampler, DataSamplerManager};
use crate::render::{rect_triangles, DrawFrame, OverlayVertex, RenderPass};

/// Inner padding between a plot window's edge and its graph.
const PADDING: f32 = 4.0;

#[derive(Debug)]
struct Plot {
    name: String,
    window: Window,
    visible: bool,
    /// Smoothed displayed range, `None` until the first finite sample.
    range: Option<(f32, f32)>,
}

/// Owns every sampler and draws the ones that have plots.
#[derive(Debug)]
pub struct Plotter {
    config: PlotterConfig,
    samplers: DataSamplerManager,
    plots: Vec<Plot>,
    lines: LineDrawer,
    labels: Labeler,
    background: Vec<OverlayVertex>,
    titles: Vec<(String, Vec2)>,
    /// Where the next plot goes.
    cursor: Vec2,
    /// Tallest plot in the current row.
    row_height: f32,
    viewport: Vec2,
    removing: bool,
    /// Effective gear visibility from the last UI sync.
    shown: bool,
}

impl Plotter {
    /// Creates a plotter for a viewport of the given size.
    #[must_use]
    pub fn new(config: PlotterConfig, viewport: Vec2) -> Self {
        let lines = LineDrawer::new(
            LineSpace::Screen,
            LineDrawerConfig {
                capacity: 0,
                once_capacity: config.line_budget,
                ..LineDrawerConfig::default()
            },
        );
        let labels = Labeler::named(
            "plot_labels",
            LabelerConfig {
                capacity: 0,
                ..LabelerConfig::default()
            },
        );
        Self {
            cursor: config.origin,
            config,
            samplers: DataSamplerManager::new(),
            plots: Vec::new(),
            lines,
            labels,
            background: Vec::new(),
            titles: Vec::new(),
            row_height: 0.0,
            viewport,
            removing: false,
            shown: true,
        }
    }

    /// Tunables, including the hidden set.
    #[must_use]
    pub const fn settings(&self) -> &PlotterConfig {
        &self.config
    }

    /// The samplers.
    #[must_use]
    pub const fn samplers(&self) -> &DataSamplerManager {
        &self.samplers
    }

    /// The samplers, mutably.
    pub fn samplers_mut(&mut self) -> &mut DataSamplerManager {
        &mut self.samplers
    }

    /// Registers a sampler, replacing one with the same name.
    pub fn add_sampler(&mut self, sampler: DataSampler) {
        self.samplers.add(sampler);
    }

    /// Pushes a value, creating a push-only sampler on first use.
    pub fn add_sample(&mut self, name: &str, value: f32) {
        self.samplers
            .add_sample(name, value, self.config.history_length);
    }

    /// True if a plot exists for `name`.
    #[must_use]
    pub fn has_plot(&self, name: &str) -> bool {
        self.plot_index(name).is_some()
    }

    /// Visibility of a plot, `None` if there is no plot.
    #[must_use]
    pub fn is_plot_visible(&self, name: &str) -> Option<bool> {
        self.plot_index(name).map(|i| self.plots[i].visible)
    }

    /// Displayed range of a plot, once it has seen a finite sample.
    #[must_use]
    pub fn displayed_range(&self, name: &str) -> Option<(f32, f32)> {
        self.plot_index(name).and_then(|i| self.plots[i].range)
    }

    /// Screen rectangle of a plot's window.
    #[must_use]
    pub fn plot_rect(&self, ui: &UiContext, name: &str) -> Option<Rect> {
        self.plot_index(name).map(|i| self.plots[i].window.rect(ui))
    }

    fn plot_index(&self, name: &str) -> Option<usize> {
        self.plots.iter().position(|p| p.name == name)
    }

    /// Opens a plot for `name`. Does nothing if one is already open.
    ///
    /// Creates a sampler if none exists. A name in the hidden set opens
    /// hidden. Returns true if a plot was created.
    pub fn show_plot(&mut self, ui: &mut UiContext, name: &str) -> bool {
        if self.has_plot(name) {
            return false;
        }
        if self.samplers.get(name).is_none() {
            let sampler = DataSampler::new(name, self.config.history_length);
            self.samplers.add(sampler);
        }

        let size = self.config.default_size;
        if self.cursor.x > self.config.origin.x && self.cursor.x + size.x > self.viewport.x {
            self.cursor = Vec2::new(
                self.config.origin.x,
                self.cursor.y + self.row_height + self.config.spacing,
            );
            self.row_height = 0.0;
        }
        let mut window = Window::new(ui, name, self.cursor, size);
        self.cursor.x += size.x + self.config.spacing;
        self.row_height = self.row_height.max(size.y);

        let visible = !self.config.hidden.contains(name);
        if !(visible && self.shown) {
            window.set_visible(ui, false);
        }
        tracing::trace!(plot = name, visible, "plot created");
        self.plots.push(Plot {
            name: name.to_owned(),
            window,
            visible,
            range: None,
        });
        true
    }

    /// Shows or hides a plot.
    ///
    /// Hiding records the name in the hidden set unless the plot is being
    /// removed; showing forgets it.
    pub fn set_plot_visible(&mut self, ui: &mut UiContext, name: &str, visible: bool) -> bool {
        let Some(index) = self.plot_index(name) else {
            return false;
        };
        let plot = &mut self.plots[index];
        plot.visible = visible;
        plot.window.set_visible(ui, visible && self.shown);

        if visible {
            self.config.hidden.remove(name);
        } else if !self.removing {
            self.config.hidden.insert(name.to_owned());
        }
        true
    }

    /// Hides a plot and remembers that it was hidden.
    pub fn hide_plot(&mut self, ui: &mut UiContext, name: &str) -> bool {
        self.set_plot_visible(ui, name, false)
    }

    /// Closes a plot. Its sampler keeps running.
    ///
    /// Removal hides the window first without touching the hidden set, so
    /// removing a plot never marks it hidden.
    pub fn remove_plot(&mut self, ui: &mut UiContext, name: &str) -> bool {
        if !self.has_plot(name) {
            return false;
        }
        self.removing = true;
        self.set_plot_visible(ui, name, false);
        self.removing = false;

        if let Some(index) = self.plot_index(name) {
            let plot = self.plots.remove(index);
            plot.window.dispose(ui);
            tracing::trace!(plot = name, "plot removed");
        }
        true
    }

    fn smooth_range(&self, current: Option<(f32, f32)>, target: (f32, f32)) -> (f32, f32) {
        match current {
            None => target,
            Some((min, max)) => {
                let k = self.config.smoothing;
                (min + (target.0 - min) * k, max + (target.1 - max) * k)
            }
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn build_plot(&mut self, index: usize, ui: &UiContext) {
        let plot = &self.plots[index];
        let Some(sampler) = self.samplers.get(&plot.name) else {
            return;
        };
        let Some((min, max)) = plot.range else {
            return;
        };
        let area = plot.window.content_rect(ui).shrink(PADDING);
        if area.width <= 0.0 || area.height <= 0.0 {
            return;
        }
        let color = self.config.line_color;

        if max - min <= f32::EPSILON {
            let y = area.y + area.height * 0.5;
            self.lines
                .show_line_2d_once(Vec2::new(area.x, y), Vec2::new(area.right(), y), color);
            self.labels
                .show_label_once(&format!("{min}"), Vec2::new(area.x, y - 12.0), Color::WHITE);
            return;
        }

        let span = max - min;
        let steps = sampler.capacity().saturating_sub(1).max(1) as f32;
        let point = |i: usize, value: f32| {
            let t = ((value - min) / span).clamp(0.0, 1.0);
            Vec2::new(area.x + area.width * (i as f32 / steps), area.bottom() - area.height * t)
        };

        let mut previous: Option<Vec2> = None;
        for (i, value) in sampler.history().iter().enumerate() {
            if !value.is_finite() {
                previous = None;
                continue;
            }
            let current = point(i, *value);
            if let Some(start) = previous {
                self.lines.show_line_2d_once(start, current, color);
            }
            previous = Some(current);
        }

        self.labels
            .show_label_once(&format!("{max}"), Vec2::new(area.x, area.y), Color::WHITE);
        self.labels.show_label_once(
            &format!("{min}"),
            Vec2::new(area.x, area.bottom() - 12.0),
            Color::WHITE,
        );
    }
}

impl Gear for Plotter {
    fn name(&self) -> &str {
        "plots"
    }

    fn config(&self) -> &GearConfig {
        &self.config.gear
    }

    fn config_mut(&mut self) -> &mut GearConfig {
        &mut self.config.gear
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>, dt: f32) {
        self.samplers.update(dt);
        self.lines.begin_frame();
        self.labels.begin_frame();
        self.background.clear();
        self.titles.clear();

        for index in 0..self.plots.len() {
            let target = self
                .samplers
                .get(&self.plots[index].name)
                .and_then(|s| s.history().finite_range())
                .map(|(lo, hi)| (lo.floor(), hi.ceil()));
            let range = match target {
                Some(target) => Some(self.smooth_range(self.plots[index].range, target)),
                None => self.plots[index].range,
            };

            let plot = &mut self.plots[index];
            plot.range = range;
            plot.window.update(ctx.ui);
            if !plot.window.is_visible() {
                continue;
            }

            let rect = plot.window.rect(ctx.ui);
            let title = plot.window.title_rect(ctx.ui);
            self.background
                .extend_from_slice(&rect_triangles(rect, Color::PANEL));
            self.background
                .extend_from_slice(&rect_triangles(title, Color::TITLE_BAR));
            self.titles
                .push((plot.name.clone(), Vec2::new(title.x + PADDING, title.y + 1.0)));

            self.build_plot(index, ctx.ui);
        }
    }

    fn draw(&mut self, frame: &mut DrawFrame<'_>) {
        match frame.pass() {
            RenderPass::UiBox => frame.triangles(&self.background),
            RenderPass::ScreenSpace => self.lines.draw(frame),
            RenderPass::Sprite => {
                for (title, position) in &self.titles {
                    frame.text(title, *position, Color::WHITE);
                }
                self.labels.draw(frame);
            }
            RenderPass::GameSpace => {}
        }
    }

    fn sync_ui(&mut self, ui: &mut UiContext, shown: bool) {
        self.shown = shown;
        for plot in &mut self.plots {
            let target = plot.visible && shown;
            if plot.window.is_visible() != target {
                plot.window.set_visible(ui, target);
            }
        }
    }

    fn clear(&mut self) {
        for plot in &mut self.plots {
            plot.range = None;
        }
        self.samplers.clear_histories();
    }

    fn on_resolution_changed(&mut self, ui: &mut UiContext, viewport: Vec2) {
        self.viewport = viewport;
        for plot in &self.plots {
            let rect = plot.window.rect(ui);
            let x = rect.x.min(viewport.x - rect.width).max(0.0);
            let y = rect.y.min(viewport.y - rect.height).max(0.0);
            if (x, y) != (rect.x, rect.y) {
                plot.window.set_position(ui, Vec2::new(x, y));
                tracing::trace!(plot = %plot.name, x, y, "plot kept on screen");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gearbox_core::Mat4;
    use gearbox_ui::PointerSnapshot;

    const VIEWPORT: Vec2 = Vec2::new(500.0, 400.0);

    fn plotter() -> Plotter {
        Plotter::new(PlotterConfig::default(), VIEWPORT)
    }

    fn step(plotter: &mut Plotter, ui: &mut UiContext) {
        let mut ctx = UpdateContext {
            ui,
            pointer: PointerSnapshot::default(),
            frame: 0,
            elapsed: 0.0,
            viewport: VIEWPORT,
            view_projection: Mat4::IDENTITY,
        };
        plotter.update(&mut ctx, 0.016);
    }

    #[test]
    fn test_show_plot_is_idempotent() {
        let mut ui = UiContext::new();
        let mut plotter = plotter();

        assert!(plotter.show_plot(&mut ui, "fps"));
        assert!(!plotter.show_plot(&mut ui, "fps"));
        assert_eq!(ui.len(), 3);
        assert_eq!(plotter.samplers().len(), 1);
    }

    #[test]
    fn test_plots_pack_then_wrap() {
        let mut ui = UiContext::new();
        let mut plotter = plotter();
        for name in ["a", "b", "c"] {
            plotter.show_plot(&mut ui, name);
        }

        let a = plotter.plot_rect(&ui, "a").unwrap();
        let b = plotter.plot_rect(&ui, "b").unwrap();
        let c = plotter.plot_rect(&ui, "c").unwrap();
        assert_eq!(b.y, a.y);
        assert_eq!(b.x, a.right() + 8.0);
        assert_eq!(c.x, a.x);
        assert_eq!(c.y, a.bottom() + 8.0);
    }

    #[test]
    fn test_hidden_set_survives_reopen() {
        let mut ui = UiContext::new();
        let mut plotter = plotter();
        plotter.show_plot(&mut ui, "fps");
        plotter.hide_plot(&mut ui, "fps");
        assert!(plotter.settings().hidden.contains("fps"));

        let mut reopened = Plotter::new(plotter.settings().clone(), VIEWPORT);
        reopened.show_plot(&mut ui, "fps");
        assert_eq!(reopened.is_plot_visible("fps"), Some(false));
    }

    #[test]
    fn test_ui_sync_hides_every_window_but_keeps_plot_flags() {
        let mut ui = UiContext::new();
        let mut plotter = plotter();
        plotter.show_plot(&mut ui, "a");
        plotter.show_plot(&mut ui, "b");
        plotter.hide_plot(&mut ui, "b");
        let a = plotter.plot_rect(&ui, "a").unwrap();
        let inside = Vec2::new(a.x + 4.0, a.y + 4.0);

        plotter.sync_ui(&mut ui, false);
        assert!(ui.hit_test(inside).is_empty());
        plotter.show_plot(&mut ui, "c");
        let c = plotter.plot_rect(&ui, "c").unwrap();
        assert!(ui.hit_test(Vec2::new(c.x + 4.0, c.y + 4.0)).is_empty());
        assert_eq!(plotter.is_plot_visible("a"), Some(true));

        plotter.sync_ui(&mut ui, true);
        assert!(!ui.hit_test(inside).is_empty());
        assert_eq!(plotter.is_plot_visible("b"), Some(false));
    }

    #[test]
    fn test_remove_does_not_mark_hidden() {
        let mut ui = UiContext::new();
        let mut plotter = plotter();
        plotter.show_plot(&mut ui, "fps");

        assert!(plotter.remove_plot(&mut ui, "fps"));
        assert!(!plotter.has_plot("fps"));
        assert!(plotter.settings().hidden.is_empty());
        assert!(ui.is_empty());
        assert!(plotter.samplers().get("fps").is_some());
    }

    #[test]
    fn test_flat_history_collapses_range() {
        let mut ui = UiContext::new();
        let mut plotter = plotter();
        for _ in 0..10 {
            plotter.add_sample("fps", 5.0);
        }
        plotter.show_plot(&mut ui, "fps");
        step(&mut plotter, &mut ui);

        assert_eq!(plotter.displayed_range("fps"), Some((5.0, 5.0)));
        assert_eq!(plotter.lines.once_lines().len(), 1);
        let line = plotter.lines.once_lines().vertices();
        assert!(line.iter().all(|v| v.position.iter().all(|c| c.is_finite())));
        assert_eq!(line[0].position[1], line[1].position[1]);
    }

    #[test]
    fn test_range_is_smoothed_toward_target() {
        let mut ui = UiContext::new();
        let mut plotter = plotter();
        plotter.add_sample("v", 0.0);
        plotter.add_sample("v", 10.0);
        plotter.show_plot(&mut ui, "v");
        step(&mut plotter, &mut ui);
        assert_eq!(plotter.displayed_range("v"), Some((0.0, 10.0)));

        plotter.add_sample("v", 20.0);
        step(&mut plotter, &mut ui);
        let (min, max) = plotter.displayed_range("v").unwrap();
        assert_eq!(min, 0.0);
        assert!((max - 13.0).abs() < 1e-4);
    }

    #[test]
    fn test_nan_samples_break_the_polyline() {
        let mut ui = UiContext::new();
        let mut plotter = plotter();
        for v in [1.0, 2.0, f32::NAN, 3.0, 4.0] {
            plotter.add_sample("v", v);
        }
        plotter.show_plot(&mut ui, "v");
        step(&mut plotter, &mut ui);

        assert_eq!(plotter.lines.once_lines().len(), 2);
        assert_eq!(plotter.displayed_range("v"), Some((1.0, 4.0)));
    }
}
