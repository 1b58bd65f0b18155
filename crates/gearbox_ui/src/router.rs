//! Turns per-frame pointer snapshots into box events.
//!
//! ```text
//!            press (hits → MouseDown, capture = hits)
//!   ┌──────┐ ───────────────────────────────────────→ ┌─────────┐
//!   │ Idle │                                          │ Pressed │ ⟲ move → Dragged(Δ) to capture
//!   └──────┘ ←─────────────────────────────────────── └─────────┘
//!            release (hits → MouseUp, capture ∩ hits → Click)
//! ```
//!
//! Capture is fixed at press time: a box keeps receiving drags after the
//! pointer leaves it, and only boxes under the pointer at both ends get a
//! click.

use crate::input::{InputState, PointerSnapshot};
use crate::layout::{BoxEvent, BoxId, UiContext};
use gearbox_core::Vec2;

#[derive(Debug, Clone, Default)]
enum RouterState {
    #[default]
    Idle,
    Pressed {
        captured: Vec<BoxId>,
    },
}

/// Pointer event dispatcher.
#[derive(Debug, Default)]
pub struct MouseRouter {
    input: InputState,
    state: RouterState,
}

impl MouseRouter {
    /// Creates an idle router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Boxes captured by the current press. Empty while the button is up.
    #[must_use]
    pub fn captured(&self) -> &[BoxId] {
        match &self.state {
            RouterState::Idle => &[],
            RouterState::Pressed { captured } => captured,
        }
    }

    /// True between a press and its release.
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        matches!(self.state, RouterState::Pressed { .. })
    }

    /// Last pointer state seen.
    #[must_use]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Processes one frame of pointer input.
    ///
    /// Events left over from the previous frame are discarded first, so
    /// owners must drain their boxes every frame.
    pub fn update(&mut self, ui: &mut UiContext, pointer: PointerSnapshot) {
        ui.clear_events();
        self.input.begin_frame(pointer);
        let position = self.input.position();

        let state = std::mem::take(&mut self.state);
        self.state = match state {
            RouterState::Idle if self.input.pressed() => {
                let captured = ui.hit_test(position);
                for id in &captured {
                    ui.push_event(*id, BoxEvent::MouseDown);
                }
                tracing::trace!(count = captured.len(), "pointer captured boxes");
                RouterState::Pressed { captured }
            }
            RouterState::Pressed { captured } if self.input.released() => {
                let hits = ui.hit_test(position);
                for id in &hits {
                    ui.push_event(*id, BoxEvent::MouseUp);
                }
                for id in captured.iter().filter(|id| hits.contains(id)) {
                    ui.push_event(*id, BoxEvent::Click);
                }
                RouterState::Idle
            }
            RouterState::Pressed { captured } => {
                let delta = self.input.delta();
                if delta != Vec2::ZERO {
                    for id in &captured {
                        ui.push_event(*id, BoxEvent::Dragged(delta));
                    }
                }
                RouterState::Pressed { captured }
            }
            RouterState::Idle => RouterState::Idle,
        };

        if !self.input.held() {
            ui.refresh_hover(position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(router: &mut MouseRouter, ui: &mut UiContext, x: f32, y: f32, down: bool) {
        router.update(ui, PointerSnapshot::new(x, y, down));
    }

    #[test]
    fn test_click_inside_box() {
        let mut ui = UiContext::new();
        let id = ui.add_box(Vec2::ZERO, Vec2::new(10.0, 10.0), None);
        let mut router = MouseRouter::new();

        frame(&mut router, &mut ui, 5.0, 5.0, true);
        assert_eq!(ui.take_events(id), vec![BoxEvent::MouseDown]);

        frame(&mut router, &mut ui, 5.0, 5.0, false);
        assert_eq!(ui.take_events(id), vec![BoxEvent::MouseUp, BoxEvent::Click]);
    }

    #[test]
    fn test_release_outside_gives_no_click() {
        let mut ui = UiContext::new();
        let a = ui.add_box(Vec2::ZERO, Vec2::new(10.0, 10.0), None);
        let b = ui.add_box(Vec2::new(20.0, 0.0), Vec2::new(10.0, 10.0), None);
        let mut router = MouseRouter::new();

        frame(&mut router, &mut ui, 5.0, 5.0, true);
        frame(&mut router, &mut ui, 25.0, 5.0, true);
        assert_eq!(ui.take_events(a), vec![BoxEvent::Dragged(Vec2::new(20.0, 0.0))]);
        assert!(ui.take_events(b).is_empty());

        frame(&mut router, &mut ui, 25.0, 5.0, false);
        assert!(ui.take_events(a).is_empty());
        assert_eq!(ui.take_events(b), vec![BoxEvent::MouseUp]);
        assert!(router.captured().is_empty());
    }

    #[test]
    fn test_drag_follows_capture_not_hover() {
        let mut ui = UiContext::new();
        let a = ui.add_box(Vec2::ZERO, Vec2::new(10.0, 10.0), None);
        let mut router = MouseRouter::new();

        frame(&mut router, &mut ui, 1.0, 1.0, true);
        frame(&mut router, &mut ui, 50.0, 50.0, true);
        frame(&mut router, &mut ui, 60.0, 50.0, true);
        assert_eq!(ui.take_events(a), vec![BoxEvent::Dragged(Vec2::new(10.0, 0.0))]);
    }

    #[test]
    fn test_hover_frozen_while_pressed() {
        let mut ui = UiContext::new();
        let a = ui.add_box(Vec2::ZERO, Vec2::new(10.0, 10.0), None);
        let mut router = MouseRouter::new();

        frame(&mut router, &mut ui, 5.0, 5.0, false);
        assert!(ui.get(a).unwrap().is_mouse_over());

        frame(&mut router, &mut ui, 5.0, 5.0, true);
        frame(&mut router, &mut ui, 50.0, 5.0, true);
        assert!(ui.get(a).unwrap().is_mouse_over());

        frame(&mut router, &mut ui, 50.0, 5.0, false);
        assert!(!ui.get(a).unwrap().is_mouse_over());
    }

    #[test]
    fn test_undrained_events_are_dropped() {
        let mut ui = UiContext::new();
        let a = ui.add_box(Vec2::ZERO, Vec2::new(10.0, 10.0), None);
        let mut router = MouseRouter::new();

        frame(&mut router, &mut ui, 5.0, 5.0, true);
        frame(&mut router, &mut ui, 5.0, 5.0, true);
        assert!(ui.take_events(a).is_empty());
    }
}
