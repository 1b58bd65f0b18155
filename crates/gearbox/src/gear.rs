//! The gear contract and the tree walks that drive it.

use gearbox_core::{Mat4, Vec2};
use gearbox_ui::{PointerSnapshot, UiContext};
use serde::{Deserialize, Serialize};

use crate::render::DrawFrame;

/// Flags every gear carries.
///
/// Setters report whether anything changed and mark the config dirty; the
/// overlay polls the dirty and clear flags once per frame instead of pushing
/// notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GearConfig {
    /// Disabled gears skip update and draw, children included.
    pub enabled: bool,
    /// Invisible gears still update but skip draw, children included.
    pub visible: bool,
    #[serde(skip)]
    dirty: bool,
    #[serde(skip)]
    clear_requested: bool,
}

impl Default for GearConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            visible: true,
            dirty: false,
            clear_requested: false,
        }
    }
}

impl GearConfig {
    /// Sets the enabled flag.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        if self.enabled == enabled {
            return false;
        }
        self.enabled = enabled;
        self.dirty = true;
        true
    }

    /// Sets the visible flag.
    pub fn set_visible(&mut self, visible: bool) -> bool {
        if self.visible == visible {
            return false;
        }
        self.visible = visible;
        self.dirty = true;
        true
    }

    /// Asks the gear to drop its content on the next frame.
    pub fn request_clear(&mut self) {
        self.clear_requested = true;
        self.dirty = true;
    }

    /// True if something changed since the last [`GearConfig::take_dirty`].
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Reads and resets the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Reads and resets the clear request.
    pub fn take_clear_request(&mut self) -> bool {
        std::mem::take(&mut self.clear_requested)
    }
}

/// Per-frame state handed to [`Gear::update`].
pub struct UpdateContext<'a> {
    /// Box registry, for gears that own windows.
    pub ui: &'a mut UiContext,
    /// Pointer state this frame.
    pub pointer: PointerSnapshot,
    /// Frames since the overlay was created.
    pub frame: u64,
    /// Seconds since the overlay was created.
    pub elapsed: f32,
    /// Viewport size in pixels.
    pub viewport: Vec2,
    /// Camera view-projection.
    pub view_projection: Mat4,
}

/// A self-contained overlay component.
pub trait Gear {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Current flags.
    fn config(&self) -> &GearConfig;

    /// Mutable flags.
    fn config_mut(&mut self) -> &mut GearConfig;

    /// Advances one frame. Single-frame content is dropped here.
    fn update(&mut self, ctx: &mut UpdateContext<'_>, dt: f32);

    /// Submits whatever belongs to `frame.pass()`.
    fn draw(&mut self, frame: &mut DrawFrame<'_>);

    /// Drops all content.
    fn clear(&mut self) {}

    /// Keeps retained UI boxes in step with the effective flags.
    ///
    /// `shown` is false when this gear or any ancestor is disabled or
    /// hidden. Called every frame, disabled gears included.
    fn sync_ui(&mut self, _ui: &mut UiContext, _shown: bool) {}

    /// Called when the viewport changes size.
    fn on_resolution_changed(&mut self, _ui: &mut UiContext, _viewport: Vec2) {}

    /// Visits direct children in order.
    fn for_each_child(&mut self, _visit: &mut dyn FnMut(&mut dyn Gear)) {}
}

/// Applies pending clear requests, logs flag changes and syncs retained UI,
/// whole subtree.
///
/// Runs regardless of the enabled flag so a disabled gear can still be
/// cleared and its windows stop catching the pointer.
pub fn reconcile_tree(gear: &mut dyn Gear, ui: &mut UiContext) {
    reconcile_subtree(gear, ui, true);
}

fn reconcile_subtree(gear: &mut dyn Gear, ui: &mut UiContext, parent_shown: bool) {
    let config = gear.config_mut();
    let clear = config.take_clear_request();
    let changed = config.take_dirty();
    let (enabled, visible) = (config.enabled, config.visible);

    if changed {
        tracing::trace!(gear = gear.name(), enabled, visible, "gear config changed");
    }
    if clear {
        gear.clear();
    }
    let shown = parent_shown && enabled && visible;
    gear.sync_ui(ui, shown);
    gear.for_each_child(&mut |child| reconcile_subtree(child, ui, shown));
}

/// Pre-order update of every enabled gear.
pub fn update_tree(gear: &mut dyn Gear, ctx: &mut UpdateContext<'_>, dt: f32) {
    if !gear.config().enabled {
        return;
    }
    gear.update(ctx, dt);
    gear.for_each_child(&mut |child| update_tree(child, ctx, dt));
}

/// Pre-order draw of every enabled, visible gear.
pub fn draw_tree(gear: &mut dyn Gear, frame: &mut DrawFrame<'_>) {
    let config = gear.config();
    if !config.enabled || !config.visible {
        return;
    }
    gear.draw(frame);
    gear.for_each_child(&mut |child| draw_tree(child, frame));
}

/// Propagates a viewport change to every gear.
pub fn resize_tree(gear: &mut dyn Gear, ui: &mut UiContext, viewport: Vec2) {
    gear.on_resolution_changed(ui, viewport);
    gear.for_each_child(&mut |child| resize_tree(child, ui, viewport));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Stub {
        name: &'static str,
        config: GearConfig,
        updates: Vec<&'static str>,
        cleared: bool,
        shown: Option<bool>,
        children: Vec<Stub>,
    }

    impl Gear for Stub {
        fn name(&self) -> &str {
            self.name
        }

        fn config(&self) -> &GearConfig {
            &self.config
        }

        fn config_mut(&mut self) -> &mut GearConfig {
            &mut self.config
        }

        fn update(&mut self, _ctx: &mut UpdateContext<'_>, _dt: f32) {
            self.updates.push(self.name);
        }

        fn draw(&mut self, _frame: &mut DrawFrame<'_>) {}

        fn clear(&mut self) {
            self.cleared = true;
        }

        fn sync_ui(&mut self, _ui: &mut UiContext, shown: bool) {
            self.shown = Some(shown);
        }

        fn for_each_child(&mut self, visit: &mut dyn FnMut(&mut dyn Gear)) {
            for child in &mut self.children {
                visit(child);
            }
        }
    }

    fn context(ui: &mut UiContext) -> UpdateContext<'_> {
        UpdateContext {
            ui,
            pointer: PointerSnapshot::default(),
            frame: 0,
            elapsed: 0.0,
            viewport: Vec2::new(800.0, 600.0),
            view_projection: Mat4::IDENTITY,
        }
    }

    #[test]
    fn test_setters_report_change() {
        let mut config = GearConfig::default();
        assert!(!config.set_enabled(true));
        assert!(config.set_enabled(false));
        assert!(config.take_dirty());
        assert!(!config.take_dirty());
    }

    #[test]
    fn test_disabled_gear_skips_subtree() {
        let mut root = Stub {
            name: "root",
            children: vec![Stub {
                name: "child",
                ..Stub::default()
            }],
            ..Stub::default()
        };
        let mut ui = UiContext::new();

        update_tree(&mut root, &mut context(&mut ui), 0.1);
        assert_eq!(root.updates, vec!["root"]);
        assert_eq!(root.children[0].updates, vec!["child"]);

        root.config.set_enabled(false);
        update_tree(&mut root, &mut context(&mut ui), 0.1);
        assert_eq!(root.children[0].updates.len(), 1);
    }

    #[test]
    fn test_reconcile_clears_disabled_gears() {
        let mut root = Stub {
            name: "root",
            ..Stub::default()
        };
        root.config.set_enabled(false);
        root.config.request_clear();

        reconcile_tree(&mut root, &mut UiContext::new());
        assert!(root.cleared);
        assert!(!root.config.is_dirty());
    }

    #[test]
    fn test_reconcile_hides_ui_under_disabled_parent() {
        let mut root = Stub {
            name: "root",
            children: vec![Stub {
                name: "child",
                ..Stub::default()
            }],
            ..Stub::default()
        };
        let mut ui = UiContext::new();

        reconcile_tree(&mut root, &mut ui);
        assert_eq!(root.children[0].shown, Some(true));

        root.config.set_enabled(false);
        reconcile_tree(&mut root, &mut ui);
        assert_eq!(root.shown, Some(false));
        assert_eq!(root.children[0].shown, Some(false));

        root.config.set_enabled(true);
        root.children[0].config.set_visible(false);
        reconcile_tree(&mut root, &mut ui);
        assert_eq!(root.shown, Some(true));
        assert_eq!(root.children[0].shown, Some(false));
    }
}
