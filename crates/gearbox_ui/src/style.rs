//! Colors used by every overlay primitive.

use serde::{Deserialize, Serialize};

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red component (0-1).
    pub r: f32,
    /// Green component (0-1).
    pub g: f32,
    /// Blue component (0-1).
    pub b: f32,
    /// Alpha component (0-1).
    pub a: f32,
}

impl Color {
    /// Transparent black. Freed vertex slots are painted with this.
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    /// Solid black.
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    /// Solid white.
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
    /// Solid red.
    pub const RED: Self = Self::rgba(1.0, 0.2, 0.2, 1.0);
    /// Solid green.
    pub const GREEN: Self = Self::rgba(0.2, 1.0, 0.3, 1.0);
    /// Solid yellow.
    pub const YELLOW: Self = Self::rgba(1.0, 0.9, 0.2, 1.0);
    /// Cyan.
    pub const CYAN: Self = Self::rgba(0.2, 0.9, 1.0, 1.0);
    /// Warning orange.
    pub const WARNING: Self = Self::rgba(1.0, 0.6, 0.1, 1.0);
    /// Window background.
    pub const PANEL: Self = Self::rgba(0.05, 0.05, 0.08, 0.8);
    /// Window title bar.
    pub const TITLE_BAR: Self = Self::rgba(0.15, 0.2, 0.3, 0.9);

    /// Creates a color from RGBA values (0-1).
    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from RGB values (0-1) with full alpha.
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Returns a new color with different alpha.
    #[must_use]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self::rgba(self.r, self.g, self.b, a)
    }

    /// Linearly interpolates between two colors.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::rgba(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    /// Converts to array format.
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// True if nothing would show.
    #[must_use]
    pub fn is_invisible(self) -> bool {
        self.a <= 0.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
