//! Rectangles, layout boxes and the box registry.

use std::collections::HashMap;
use std::fmt;

use gearbox_core::Vec2;

/// A rectangle in screen space, y down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left edge).
    pub x: f32,
    /// Y position (top edge).
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// A zero-sized rect at the origin.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Creates a rectangle from position and size.
    #[must_use]
    pub const fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    /// Returns the right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Returns the bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Top-left corner.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Returns true if the point is inside the rectangle.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Returns a copy shrunk by `amount` on every side. Never negative.
    #[must_use]
    pub fn shrink(&self, amount: f32) -> Self {
        Self::new(
            self.x + amount,
            self.y + amount,
            (self.width - amount * 2.0).max(0.0),
            (self.height - amount * 2.0).max(0.0),
        )
    }
}

/// Handle to a [`LayoutBox`] in a [`UiContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoxId(u32);

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "box#{}", self.0)
    }
}

/// Pointer event queued on a box by the router.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoxEvent {
    /// Button pressed while over the box.
    MouseDown,
    /// Button released while over the box.
    MouseUp,
    /// Pressed and released over the box without leaving it at either end.
    Click,
    /// Pointer moved while the box holds capture.
    Dragged(Vec2),
}

/// An axis-aligned rectangle positioned relative to an optional parent.
#[derive(Debug, Clone)]
pub struct LayoutBox {
    position: Vec2,
    size: Vec2,
    parent: Option<BoxId>,
    enabled: bool,
    mouse_over: bool,
    events: Vec<BoxEvent>,
}

impl LayoutBox {
    fn new(position: Vec2, size: Vec2, parent: Option<BoxId>) -> Self {
        Self {
            position,
            size: clamp_size(size),
            parent,
            enabled: true,
            mouse_over: false,
            events: Vec::new(),
        }
    }

    /// Offset from the parent, or absolute when there is none.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Moves the box relative to its parent.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Width and height, both non-negative.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        self.size
    }

    /// Resizes the box. Negative components are clamped to zero.
    pub fn set_size(&mut self, size: Vec2) {
        self.size = clamp_size(size);
    }

    /// Parent box, if any.
    #[must_use]
    pub const fn parent(&self) -> Option<BoxId> {
        self.parent
    }

    /// Disabled boxes are never hit.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enables or disables hit-testing for the box.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Hover state, only refreshed while the button is up.
    #[must_use]
    pub const fn is_mouse_over(&self) -> bool {
        self.mouse_over
    }

    /// Events queued this frame.
    #[must_use]
    pub fn events(&self) -> &[BoxEvent] {
        &self.events
    }
}

fn clamp_size(size: Vec2) -> Vec2 {
    Vec2::new(size.x.max(0.0), size.y.max(0.0))
}

/// Registry of every live [`LayoutBox`].
///
/// Parents are weak: removing a box leaves its children in place and they
/// resolve as roots from then on.
#[derive(Debug, Default)]
pub struct UiContext {
    boxes: HashMap<BoxId, LayoutBox>,
    /// Registration order, used for deterministic dispatch.
    order: Vec<BoxId>,
    next_id: u32,
}

impl UiContext {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a box. A parent that is not live is ignored.
    pub fn add_box(&mut self, position: Vec2, size: Vec2, parent: Option<BoxId>) -> BoxId {
        let parent = parent.filter(|p| self.boxes.contains_key(p));
        let id = BoxId(self.next_id);
        self.next_id += 1;
        self.boxes.insert(id, LayoutBox::new(position, size, parent));
        self.order.push(id);
        id
    }

    /// Unregisters a box. Returns false if it was not live.
    pub fn remove_box(&mut self, id: BoxId) -> bool {
        if self.boxes.remove(&id).is_none() {
            return false;
        }
        self.order.retain(|b| *b != id);
        true
    }

    /// Number of live boxes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// True if no box is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Looks up a box.
    #[must_use]
    pub fn get(&self, id: BoxId) -> Option<&LayoutBox> {
        self.boxes.get(&id)
    }

    /// Looks up a box mutably.
    pub fn get_mut(&mut self, id: BoxId) -> Option<&mut LayoutBox> {
        self.boxes.get_mut(&id)
    }

    /// Screen position: the box's offset summed with every live ancestor's.
    #[must_use]
    pub fn absolute_position(&self, id: BoxId) -> Option<Vec2> {
        let mut node = self.boxes.get(&id)?;
        let mut position = node.position;
        // Ids only ever point at older boxes, so the walk terminates.
        while let Some(parent) = node.parent.and_then(|p| self.boxes.get(&p)) {
            position += parent.position;
            node = parent;
        }
        Some(position)
    }

    /// Screen rectangle of a box.
    #[must_use]
    pub fn screen_rect(&self, id: BoxId) -> Option<Rect> {
        let size = self.boxes.get(&id)?.size;
        self.absolute_position(id)
            .map(|position| Rect::from_pos_size(position, size))
    }

    /// A box is live for input when it and every live ancestor are enabled.
    #[must_use]
    pub fn is_interactive(&self, id: BoxId) -> bool {
        let mut current = self.boxes.get(&id);
        while let Some(node) = current {
            if !node.enabled {
                return false;
            }
            current = node.parent.and_then(|p| self.boxes.get(&p));
        }
        true
    }

    /// Every interactive box containing `point`, in registration order.
    #[must_use]
    pub fn hit_test(&self, point: Vec2) -> Vec<BoxId> {
        self.order
            .iter()
            .copied()
            .filter(|id| self.is_interactive(*id))
            .filter(|id| self.screen_rect(*id).is_some_and(|r| r.contains(point)))
            .collect()
    }

    /// Drains the events queued on a box.
    pub fn take_events(&mut self, id: BoxId) -> Vec<BoxEvent> {
        self.boxes
            .get_mut(&id)
            .map(|b| std::mem::take(&mut b.events))
            .unwrap_or_default()
    }

    pub(crate) fn push_event(&mut self, id: BoxId, event: BoxEvent) {
        if let Some(b) = self.boxes.get_mut(&id) {
            b.events.push(event);
        }
    }

    pub(crate) fn clear_events(&mut self) {
        for b in self.boxes.values_mut() {
            b.events.clear();
        }
    }

    pub(crate) fn refresh_hover(&mut self, point: Vec2) {
        let hovered = self.hit_test(point);
        for (id, b) in &mut self.boxes {
            b.mouse_over = hovered.contains(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);

        assert!(rect.contains(Vec2::new(50.0, 30.0)));
        assert!(!rect.contains(Vec2::new(5.0, 30.0)));
        assert!(!rect.contains(Vec2::new(50.0, 80.0)));
        assert!(!rect.contains(Vec2::new(110.0, 30.0)));
    }

    #[test]
    fn test_size_is_clamped() {
        let mut ui = UiContext::new();
        let id = ui.add_box(Vec2::ZERO, Vec2::new(-5.0, 10.0), None);
        assert_eq!(ui.get(id).unwrap().size(), Vec2::new(0.0, 10.0));

        ui.get_mut(id).unwrap().set_size(Vec2::new(3.0, -1.0));
        assert_eq!(ui.get(id).unwrap().size(), Vec2::new(3.0, 0.0));
    }

    #[test]
    fn test_absolute_position_sums_ancestors() {
        let mut ui = UiContext::new();
        let root = ui.add_box(Vec2::new(10.0, 10.0), Vec2::new(100.0, 100.0), None);
        let child = ui.add_box(Vec2::new(5.0, 5.0), Vec2::new(50.0, 50.0), Some(root));
        let grandchild = ui.add_box(Vec2::new(1.0, 2.0), Vec2::new(5.0, 5.0), Some(child));

        assert_eq!(ui.absolute_position(grandchild), Some(Vec2::new(16.0, 17.0)));

        ui.remove_box(root);
        assert_eq!(ui.absolute_position(grandchild), Some(Vec2::new(6.0, 7.0)));
    }

    #[test]
    fn test_hit_test_skips_disabled_subtrees() {
        let mut ui = UiContext::new();
        let root = ui.add_box(Vec2::ZERO, Vec2::new(100.0, 100.0), None);
        let child = ui.add_box(Vec2::ZERO, Vec2::new(10.0, 10.0), Some(root));

        assert_eq!(ui.hit_test(Vec2::new(5.0, 5.0)), vec![root, child]);

        ui.get_mut(root).unwrap().set_enabled(false);
        assert!(ui.hit_test(Vec2::new(5.0, 5.0)).is_empty());
    }

    #[test]
    fn test_unknown_parent_is_ignored() {
        let mut ui = UiContext::new();
        let root = ui.add_box(Vec2::ZERO, Vec2::ONE, None);
        ui.remove_box(root);
        let orphan = ui.add_box(Vec2::new(3.0, 3.0), Vec2::ONE, Some(root));
        assert_eq!(ui.get(orphan).unwrap().parent(), None);
    }
}
