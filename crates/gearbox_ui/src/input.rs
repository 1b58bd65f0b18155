//! Pointer input.
//!
//! The host hands the overlay one [`PointerSnapshot`] per frame; everything
//! edge-triggered is derived here from the current and previous snapshots.

use gearbox_core::Vec2;

/// Pointer state sampled once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerSnapshot {
    /// Absolute screen position in pixels.
    pub position: Vec2,
    /// Primary button held.
    pub primary_down: bool,
}

impl PointerSnapshot {
    /// Creates a snapshot.
    #[must_use]
    pub const fn new(x: f32, y: f32, primary_down: bool) -> Self {
        Self {
            position: Vec2::new(x, y),
            primary_down,
        }
    }
}

/// Current and previous pointer snapshots.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    /// This frame.
    pub current: PointerSnapshot,
    /// Last frame. Equal to `current` with the button up before the first frame.
    pub previous: PointerSnapshot,
    /// Set once the first snapshot arrives.
    primed: bool,
}

impl InputState {
    /// Creates an empty input state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins a new frame with a fresh snapshot.
    pub fn begin_frame(&mut self, snapshot: PointerSnapshot) {
        self.previous = if self.primed {
            self.current
        } else {
            PointerSnapshot {
                position: snapshot.position,
                primary_down: false,
            }
        };
        self.current = snapshot;
        self.primed = true;
    }

    /// Button went from released to held this frame.
    #[must_use]
    pub fn pressed(&self) -> bool {
        self.current.primary_down && !self.previous.primary_down
    }

    /// Button went from held to released this frame.
    #[must_use]
    pub fn released(&self) -> bool {
        !self.current.primary_down && self.previous.primary_down
    }

    /// Button is held.
    #[must_use]
    pub fn held(&self) -> bool {
        self.current.primary_down
    }

    /// Returns the pointer movement since last frame.
    #[must_use]
    pub fn delta(&self) -> Vec2 {
        self.current.position - self.previous.position
    }

    /// Current pointer position.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.current.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_release_edges() {
        let mut input = InputState::new();

        input.begin_frame(PointerSnapshot::new(0.0, 0.0, true));
        assert!(input.pressed());
        assert!(input.held());

        input.begin_frame(PointerSnapshot::new(5.0, 0.0, true));
        assert!(!input.pressed());
        assert_eq!(input.delta(), Vec2::new(5.0, 0.0));

        input.begin_frame(PointerSnapshot::new(5.0, 0.0, false));
        assert!(input.released());
        assert!(!input.held());
    }

    #[test]
    fn test_first_frame_has_no_delta() {
        let mut input = InputState::new();
        input.begin_frame(PointerSnapshot::new(100.0, 50.0, false));
        assert_eq!(input.delta(), Vec2::ZERO);
        assert!(!input.released());
    }
}
