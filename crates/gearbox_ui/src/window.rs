//! Movable, resizable windows built from three boxes.

use crate::layout::{BoxEvent, BoxId, Rect, UiContext};
use gearbox_core::Vec2;

/// Title bar height a new window starts with, in pixels.
pub const TITLE_BAR_HEIGHT: f32 = 16.0;
/// Side of the square resize handle in the bottom-right corner.
pub const RESIZE_HANDLE_SIZE: f32 = 10.0;

/// What happened to a window during one [`Window::update`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WindowResponse {
    /// Body was clicked.
    pub clicked: bool,
    /// Title bar was clicked.
    pub title_clicked: bool,
    /// Window moved by this much.
    pub moved: Option<Vec2>,
    /// Window was resized.
    pub resized: bool,
}

/// A body box with a title bar and a resize handle as children.
///
/// Dragging the body or the title bar moves the window; dragging the handle
/// resizes it. Child boxes are re-laid out as soon as the size changes.
///
/// Sizes are floor-clamped at zero unless [`Window::set_min_size`] raises
/// the floor. The title bar never exceeds the body height.
#[derive(Debug)]
pub struct Window {
    title: String,
    body: BoxId,
    title_bar: BoxId,
    resize_handle: BoxId,
    visible: bool,
    title_bar_height: f32,
    min_size: Vec2,
}

impl Window {
    /// Registers the window's boxes.
    pub fn new(ui: &mut UiContext, title: impl Into<String>, position: Vec2, size: Vec2) -> Self {
        let size = size.max(Vec2::ZERO);
        let body = ui.add_box(position, size, None);
        let title_bar = ui.add_box(Vec2::ZERO, Vec2::ZERO, Some(body));
        let resize_handle = ui.add_box(Vec2::ZERO, Vec2::ZERO, Some(body));
        let window = Self {
            title: title.into(),
            body,
            title_bar,
            resize_handle,
            visible: true,
            title_bar_height: TITLE_BAR_HEIGHT,
            min_size: Vec2::ZERO,
        };
        window.relayout(ui);
        window
    }

    /// Window title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Body box. Content is positioned relative to it.
    #[must_use]
    pub const fn body(&self) -> BoxId {
        self.body
    }

    /// Title bar box.
    #[must_use]
    pub const fn title_bar(&self) -> BoxId {
        self.title_bar
    }

    /// Resize handle box.
    #[must_use]
    pub const fn resize_handle(&self) -> BoxId {
        self.resize_handle
    }

    /// Whether the window takes input and should be drawn.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Current title bar height.
    #[must_use]
    pub const fn title_bar_height(&self) -> f32 {
        self.title_bar_height
    }

    /// Smallest size [`Window::set_size`] accepts.
    #[must_use]
    pub const fn min_size(&self) -> Vec2 {
        self.min_size
    }

    /// Screen rectangle of the body.
    #[must_use]
    pub fn rect(&self, ui: &UiContext) -> Rect {
        ui.screen_rect(self.body).unwrap_or(Rect::ZERO)
    }

    /// Area below the title bar.
    #[must_use]
    pub fn content_rect(&self, ui: &UiContext) -> Rect {
        let rect = self.rect(ui);
        let title = self.title_bar_height.min(rect.height);
        Rect::new(rect.x, rect.y + title, rect.width, rect.height - title)
    }

    /// Screen rectangle of the title bar.
    #[must_use]
    pub fn title_rect(&self, ui: &UiContext) -> Rect {
        ui.screen_rect(self.title_bar).unwrap_or(Rect::ZERO)
    }

    /// Screen rectangle of the resize handle.
    #[must_use]
    pub fn handle_rect(&self, ui: &UiContext) -> Rect {
        ui.screen_rect(self.resize_handle).unwrap_or(Rect::ZERO)
    }

    /// Moves the window.
    pub fn set_position(&self, ui: &mut UiContext, position: Vec2) {
        if let Some(body) = ui.get_mut(self.body) {
            body.set_position(position);
        }
    }

    /// Resizes the window and lays out its children.
    pub fn set_size(&self, ui: &mut UiContext, size: Vec2) {
        let size = size.max(self.min_size);
        if let Some(body) = ui.get_mut(self.body) {
            body.set_size(size);
        }
        self.relayout(ui);
    }

    /// Changes the title bar height and lays out the children again.
    pub fn set_title_bar_height(&mut self, ui: &mut UiContext, height: f32) {
        self.title_bar_height = height.max(0.0);
        self.relayout(ui);
    }

    /// Raises the size floor and grows the window to it if needed.
    pub fn set_min_size(&mut self, ui: &mut UiContext, min_size: Vec2) {
        self.min_size = min_size.max(Vec2::ZERO);
        let size = ui.get(self.body).map_or(Vec2::ZERO, |b| b.size());
        self.set_size(ui, size);
    }

    /// Shows or hides the window. Hidden windows are not hit-tested.
    pub fn set_visible(&mut self, ui: &mut UiContext, visible: bool) {
        self.visible = visible;
        if let Some(body) = ui.get_mut(self.body) {
            body.set_enabled(visible);
        }
    }

    fn relayout(&self, ui: &mut UiContext) {
        let size = ui.get(self.body).map_or(Vec2::ZERO, |b| b.size());
        if let Some(bar) = ui.get_mut(self.title_bar) {
            bar.set_position(Vec2::ZERO);
            bar.set_size(Vec2::new(size.x, self.title_bar_height.min(size.y)));
        }
        if let Some(handle) = ui.get_mut(self.resize_handle) {
            handle.set_position(Vec2::new(
                (size.x - RESIZE_HANDLE_SIZE).max(0.0),
                (size.y - RESIZE_HANDLE_SIZE).max(0.0),
            ));
            handle.set_size(Vec2::new(RESIZE_HANDLE_SIZE, RESIZE_HANDLE_SIZE));
        }
    }

    /// Drains the window's box events and applies moves and resizes.
    ///
    /// The handle and title bar sit inside the body, so a drag on either is
    /// also seen by the body. A frame with handle drags only resizes.
    pub fn update(&mut self, ui: &mut UiContext) -> WindowResponse {
        let mut response = WindowResponse::default();

        let mut resize = Vec2::ZERO;
        let mut resizing = false;
        for event in ui.take_events(self.resize_handle) {
            if let BoxEvent::Dragged(delta) = event {
                resize += delta;
                resizing = true;
            }
        }

        let mut title_drag = None;
        for event in ui.take_events(self.title_bar) {
            match event {
                BoxEvent::Dragged(delta) => {
                    *title_drag.get_or_insert(Vec2::ZERO) += delta;
                }
                BoxEvent::Click => response.title_clicked = true,
                BoxEvent::MouseDown | BoxEvent::MouseUp => {}
            }
        }

        let mut body_drag = None;
        for event in ui.take_events(self.body) {
            match event {
                BoxEvent::Dragged(delta) => {
                    *body_drag.get_or_insert(Vec2::ZERO) += delta;
                }
                BoxEvent::Click => response.clicked = true,
                BoxEvent::MouseDown | BoxEvent::MouseUp => {}
            }
        }

        if resizing {
            let size = ui.get(self.body).map_or(Vec2::ZERO, |b| b.size());
            self.set_size(ui, size + resize);
            response.resized = true;
        } else if let Some(delta) = body_drag.or(title_drag) {
            let position = ui.get(self.body).map_or(Vec2::ZERO, |b| b.position());
            self.set_position(ui, position + delta);
            response.moved = Some(delta);
        }

        response
    }

    /// Unregisters the window's boxes.
    pub fn dispose(self, ui: &mut UiContext) {
        ui.remove_box(self.resize_handle);
        ui.remove_box(self.title_bar);
        ui.remove_box(self.body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::PointerSnapshot;
    use crate::router::MouseRouter;

    fn step(
        router: &mut MouseRouter,
        ui: &mut UiContext,
        window: &mut Window,
        x: f32,
        y: f32,
        down: bool,
    ) -> WindowResponse {
        router.update(ui, PointerSnapshot::new(x, y, down));
        window.update(ui)
    }

    #[test]
    fn test_children_follow_size() {
        let mut ui = UiContext::new();
        let window = Window::new(&mut ui, "w", Vec2::new(10.0, 10.0), Vec2::new(100.0, 80.0));

        assert_eq!(window.title_rect(&ui), Rect::new(10.0, 10.0, 100.0, TITLE_BAR_HEIGHT));
        assert_eq!(window.handle_rect(&ui), Rect::new(100.0, 80.0, 10.0, 10.0));

        window.set_size(&mut ui, Vec2::new(200.0, 100.0));
        assert_eq!(window.title_rect(&ui).width, 200.0);
        assert_eq!(window.handle_rect(&ui).position(), Vec2::new(200.0, 100.0));
    }

    #[test]
    fn test_title_drag_moves_window_once() {
        let mut ui = UiContext::new();
        let mut window = Window::new(&mut ui, "w", Vec2::ZERO, Vec2::new(100.0, 80.0));
        let mut router = MouseRouter::new();

        step(&mut router, &mut ui, &mut window, 5.0, 5.0, true);
        let response = step(&mut router, &mut ui, &mut window, 15.0, 25.0, true);

        assert_eq!(response.moved, Some(Vec2::new(10.0, 20.0)));
        assert_eq!(window.rect(&ui).position(), Vec2::new(10.0, 20.0));
        assert_eq!(window.title_rect(&ui).position(), Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_handle_drag_resizes_without_moving() {
        let mut ui = UiContext::new();
        let mut window = Window::new(&mut ui, "w", Vec2::ZERO, Vec2::new(100.0, 80.0));
        let mut router = MouseRouter::new();

        step(&mut router, &mut ui, &mut window, 95.0, 75.0, true);
        let response = step(&mut router, &mut ui, &mut window, 115.0, 85.0, true);

        assert!(response.resized);
        assert_eq!(response.moved, None);
        let rect = window.rect(&ui);
        assert_eq!(rect.position(), Vec2::ZERO);
        assert_eq!((rect.width, rect.height), (120.0, 90.0));
    }

    #[test]
    fn test_title_bar_height_change_relayouts() {
        let mut ui = UiContext::new();
        let mut window = Window::new(&mut ui, "w", Vec2::new(10.0, 10.0), Vec2::new(100.0, 80.0));

        window.set_title_bar_height(&mut ui, 24.0);
        assert_eq!(window.title_rect(&ui), Rect::new(10.0, 10.0, 100.0, 24.0));
        assert_eq!(window.content_rect(&ui), Rect::new(10.0, 34.0, 100.0, 56.0));

        window.set_title_bar_height(&mut ui, 200.0);
        assert_eq!(window.title_rect(&ui).height, 80.0);
        assert_eq!(window.content_rect(&ui).height, 0.0);
    }

    #[test]
    fn test_size_floor_is_zero_by_default() {
        let mut ui = UiContext::new();
        let window = Window::new(&mut ui, "w", Vec2::ZERO, Vec2::new(100.0, 80.0));
        window.set_size(&mut ui, Vec2::new(-500.0, 1.0));
        let rect = window.rect(&ui);
        assert_eq!((rect.width, rect.height), (0.0, 1.0));
        assert_eq!(window.title_rect(&ui).height, 1.0);
    }

    #[test]
    fn test_min_size_raises_the_floor() {
        let mut ui = UiContext::new();
        let mut window = Window::new(&mut ui, "w", Vec2::ZERO, Vec2::new(30.0, 80.0));
        window.set_min_size(&mut ui, Vec2::new(40.0, 24.0));
        assert_eq!(window.rect(&ui).width, 40.0);

        window.set_size(&mut ui, Vec2::new(-500.0, 1.0));
        let rect = window.rect(&ui);
        assert_eq!((rect.width, rect.height), (40.0, 24.0));
    }

    #[test]
    fn test_hidden_window_is_not_hit() {
        let mut ui = UiContext::new();
        let mut window = Window::new(&mut ui, "w", Vec2::ZERO, Vec2::new(100.0, 80.0));
        window.set_visible(&mut ui, false);
        assert!(ui.hit_test(Vec2::new(5.0, 5.0)).is_empty());
    }

    #[test]
    fn test_dispose_removes_boxes() {
        let mut ui = UiContext::new();
        let window = Window::new(&mut ui, "w", Vec2::ZERO, Vec2::new(100.0, 80.0));
        window.dispose(&mut ui);
        assert!(ui.is_empty());
    }
}
