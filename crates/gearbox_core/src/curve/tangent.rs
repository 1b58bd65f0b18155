//! Tangent fitting, Hermite evaluation and tangent-handle geometry.

use super::{CurveKey, TangentMode};
use crate::math::Vec2;

/// Maps curve space (position, value) to screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveView {
    /// Screen position of curve point (0, 0).
    pub origin: Vec2,
    /// Pixels per unit of position (x) and value (y). Value grows upwards.
    pub scale: Vec2,
}

impl CurveView {
    /// Creates a view.
    #[must_use]
    pub const fn new(origin: Vec2, scale: Vec2) -> Self {
        Self { origin, scale }
    }

    /// Curve point to screen pixels.
    #[must_use]
    pub fn to_screen(&self, position: f32, value: f32) -> Vec2 {
        Vec2::new(
            self.origin.x + position * self.scale.x,
            self.origin.y - value * self.scale.y,
        )
    }

    /// Screen pixels back to a curve point `(position, value)`.
    #[must_use]
    pub fn to_curve(&self, screen: Vec2) -> (f32, f32) {
        (
            (screen.x - self.origin.x) / self.scale.x,
            (self.origin.y - screen.y) / self.scale.y,
        )
    }
}

/// Screen positions of a key and its two tangent handles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TangentHandles {
    /// The key itself.
    pub key: Vec2,
    /// End of the incoming-tangent handle.
    pub tangent_in: Vec2,
    /// End of the outgoing-tangent handle.
    pub tangent_out: Vec2,
}

/// Replaces NaN with zero.
fn finite_or_zero(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v
    }
}

/// Fits both tangents of `key` from its neighbors.
///
/// `prev`/`next` are `None` at the ends of the curve, in which case the key
/// stands in for the missing neighbor. Custom sides are written back unchanged.
pub(crate) fn fit_key(
    key: &mut CurveKey,
    prev: Option<&CurveKey>,
    next: Option<&CurveKey>,
    in_mode: TangentMode,
    out_mode: TangentMode,
) {
    if !in_mode.is_auto() && !out_mode.is_auto() {
        return;
    }

    let saved = (key.tangent_in, key.tangent_out);

    let (p, k) = (key.position, key.value);
    let (p0, k0) = prev.map_or((p, k), |n| (n.position, n.value));
    let (p1, k1) = next.map_or((p, k), |n| (n.position, n.value));
    let span = p1 - p0;

    key.tangent_in = match in_mode {
        TangentMode::Flat => 0.0,
        TangentMode::Linear => k - k0,
        TangentMode::Smooth => (k1 - k0) * ((p - p0) / span),
        TangentMode::Custom => saved.0,
    };
    key.tangent_out = match out_mode {
        TangentMode::Flat => 0.0,
        TangentMode::Linear => k1 - k,
        TangentMode::Smooth => (k1 - k0) * ((p1 - p) / span),
        TangentMode::Custom => saved.1,
    };

    // Coincident neighbors divide zero by zero.
    key.tangent_in = finite_or_zero(key.tangent_in);
    key.tangent_out = finite_or_zero(key.tangent_out);
}

/// Cubic Hermite interpolation across one segment, `t` in `[0, 1]`.
pub(crate) fn hermite(from: &CurveKey, to: &CurveKey, t: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;
    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;
    h00 * from.value + h10 * from.tangent_out + h01 * to.value + h11 * to.tangent_in
}

/// Unit screen direction of a slope, falling back to straight up.
fn handle_direction(slope: f32, view: &CurveView) -> Vec2 {
    let dir = Vec2::new(view.scale.x, -slope * view.scale.y).normalize();
    if dir.is_nan() {
        Vec2::new(0.0, -1.0)
    } else {
        dir
    }
}

/// Computes where a key's tangent handles sit on screen.
///
/// Tangents are converted to slopes using the length of the adjacent segment
/// (the other side's segment at curve ends), then drawn as fixed-length
/// handles of `length` pixels.
pub(crate) fn tangent_handle_screen_positions(
    key: &CurveKey,
    prev: Option<&CurveKey>,
    next: Option<&CurveKey>,
    view: &CurveView,
    length: f32,
) -> TangentHandles {
    let in_span = prev.map(|p| key.position - p.position);
    let out_span = next.map(|n| n.position - key.position);
    let in_span = in_span.or(out_span).unwrap_or(1.0);
    let out_span = out_span.unwrap_or(in_span);

    let center = view.to_screen(key.position, key.value);
    let in_dir = handle_direction(key.tangent_in / in_span, view);
    let out_dir = handle_direction(key.tangent_out / out_span, view);

    TangentHandles {
        key: center,
        tangent_in: center - in_dir * length,
        tangent_out: center + out_dir * length,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smooth_fit_weights_by_distance() {
        let prev = CurveKey::new(0.0, 0.0);
        let next = CurveKey::new(3.0, 3.0);
        let mut key = CurveKey::new(1.0, 1.0);

        fit_key(&mut key, Some(&prev), Some(&next), TangentMode::Smooth, TangentMode::Smooth);
        assert!((key.tangent_in - 1.0).abs() < 1e-6);
        assert!((key.tangent_out - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_linear_and_flat() {
        let prev = CurveKey::new(0.0, 2.0);
        let next = CurveKey::new(2.0, 5.0);
        let mut key = CurveKey::new(1.0, 3.0);

        fit_key(&mut key, Some(&prev), Some(&next), TangentMode::Linear, TangentMode::Flat);
        assert_eq!(key.tangent_in, 1.0);
        assert_eq!(key.tangent_out, 0.0);
    }

    #[test]
    fn test_coincident_neighbors_coerce_nan() {
        let mut key = CurveKey::new(1.0, 3.0);
        // Lone key: both "neighbors" collapse onto the key itself.
        fit_key(&mut key, None, None, TangentMode::Smooth, TangentMode::Smooth);
        assert_eq!(key.tangent_in, 0.0);
        assert_eq!(key.tangent_out, 0.0);
    }

    #[test]
    fn test_custom_side_is_preserved() {
        let prev = CurveKey::new(0.0, 0.0);
        let next = CurveKey::new(2.0, 4.0);
        let mut key = CurveKey::new(1.0, 1.0);
        key.tangent_in = 7.5;

        fit_key(&mut key, Some(&prev), Some(&next), TangentMode::Custom, TangentMode::Smooth);
        assert_eq!(key.tangent_in, 7.5);
        assert!((key.tangent_out - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_hermite_endpoints() {
        let a = CurveKey::new(0.0, 1.0);
        let b = CurveKey::new(1.0, 5.0);
        assert_eq!(hermite(&a, &b, 0.0), 1.0);
        assert_eq!(hermite(&a, &b, 1.0), 5.0);
    }

    #[test]
    fn test_flat_handle_is_horizontal() {
        let view = CurveView::new(Vec2::new(100.0, 100.0), Vec2::new(10.0, 10.0));
        let key = CurveKey::new(1.0, 1.0);
        let handles = tangent_handle_screen_positions(&key, None, None, &view, 20.0);

        assert_eq!(handles.key, Vec2::new(110.0, 90.0));
        assert_eq!(handles.tangent_in, Vec2::new(90.0, 90.0));
        assert_eq!(handles.tangent_out, Vec2::new(130.0, 90.0));
    }

    #[test]
    fn test_degenerate_handle_points_up() {
        let view = CurveView::new(Vec2::ZERO, Vec2::new(10.0, 10.0));
        let mut key = CurveKey::new(0.0, 0.0);
        key.tangent_out = f32::INFINITY;
        let handles = tangent_handle_screen_positions(&key, None, None, &view, 5.0);

        assert_eq!(handles.tangent_out, Vec2::new(0.0, -5.0));
    }
}
