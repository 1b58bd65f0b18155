//! Ray picking against simple shapes.

use gearbox_core::{Mat4, Vec2, Vec3};

const EPSILON: f32 = 1e-6;

/// A half-line in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    /// Creates a ray. `direction` is normalized.
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at distance `t`.
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Builds a pick ray through a pixel.
    ///
    /// Unprojects the pixel at depth 0 and depth 1 with the inverse
    /// view-projection. `None` for an empty viewport or a degenerate matrix.
    #[must_use]
    pub fn from_screen(point: Vec2, viewport: Vec2, inverse_view_projection: &Mat4) -> Option<Self> {
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            return None;
        }
        let ndc_x = point.x / viewport.x * 2.0 - 1.0;
        let ndc_y = 1.0 - point.y / viewport.y * 2.0;

        let near = inverse_view_projection.project_point(Vec3::new(ndc_x, ndc_y, 0.0))?;
        let far = inverse_view_projection.project_point(Vec3::new(ndc_x, ndc_y, 1.0))?;
        let direction = (far - near).normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }
        Some(Self { origin: near, direction })
    }
}

/// Something a pick ray can hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickShape {
    /// Axis-aligned box.
    Box {
        /// Minimum corner.
        min: Vec3,
        /// Maximum corner.
        max: Vec3,
    },
    /// Sphere.
    Sphere {
        /// Center.
        center: Vec3,
        /// Radius.
        radius: f32,
    },
    /// Infinite plane.
    Plane {
        /// Any point on the plane.
        point: Vec3,
        /// Plane normal, any length.
        normal: Vec3,
    },
    /// Bounded rectangle spanned by two half-extent axes.
    Rect {
        /// Center.
        center: Vec3,
        /// Half-extent along the first axis.
        half_u: Vec3,
        /// Half-extent along the second axis.
        half_v: Vec3,
    },
}

impl PickShape {
    /// Distance along `ray` to the nearest hit in front of its origin.
    #[must_use]
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        match *self {
            Self::Box { min, max } => intersect_box(ray, min, max),
            Self::Sphere { center, radius } => intersect_sphere(ray, center, radius),
            Self::Plane { point, normal } => intersect_plane(ray, point, normal),
            Self::Rect { center, half_u, half_v } => {
                let t = intersect_plane(ray, center, half_u.cross(half_v))?;
                let offset = ray.at(t) - center;
                let inside = offset.dot(half_u).abs() <= half_u.length_squared()
                    && offset.dot(half_v).abs() <= half_v.length_squared();
                inside.then_some(t)
            }
        }
    }
}

fn intersect_box(ray: &Ray, min: Vec3, max: Vec3) -> Option<f32> {
    let origin = ray.origin.to_array();
    let direction = ray.direction.to_array();
    let (min, max) = (min.to_array(), max.to_array());

    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;
    for axis in 0..3 {
        if direction[axis].abs() < EPSILON {
            if origin[axis] < min[axis] || origin[axis] > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / direction[axis];
        let mut t0 = (min[axis] - origin[axis]) * inv;
        let mut t1 = (max[axis] - origin[axis]) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_near = t_near.max(t0);
        t_far = t_far.min(t1);
        if t_near > t_far {
            return None;
        }
    }

    if t_far < 0.0 {
        None
    } else {
        Some(t_near.max(0.0))
    }
}

fn intersect_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let to_center = ray.origin - center;
    let b = to_center.dot(ray.direction);
    let c = to_center.length_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let root = discriminant.sqrt();
    let near = -b - root;
    let far = -b + root;
    if far < 0.0 {
        None
    } else {
        Some(near.max(0.0))
    }
}

fn intersect_plane(ray: &Ray, point: Vec3, normal: Vec3) -> Option<f32> {
    let denom = ray.direction.dot(normal);
    if denom.abs() < EPSILON {
        return None;
    }
    let t = (point - ray.origin).dot(normal) / denom;
    (t >= 0.0).then_some(t)
}

/// Nearest shape under a pick ray.
#[derive(Debug, Clone, PartialEq)]
pub struct PickHit {
    /// Key of the hit entity.
    pub key: String,
    /// Distance along the ray.
    pub distance: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forward() -> Ray {
        Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::Z)
    }

    #[test]
    fn test_sphere_hit_and_miss() {
        let hit = PickShape::Sphere { center: Vec3::ZERO, radius: 1.0 };
        assert_eq!(hit.intersect(&forward()), Some(9.0));

        let miss = PickShape::Sphere { center: Vec3::new(5.0, 0.0, 0.0), radius: 1.0 };
        assert_eq!(miss.intersect(&forward()), None);
    }

    #[test]
    fn test_box_hit() {
        let shape = PickShape::Box {
            min: Vec3::new(-1.0, -1.0, -1.0),
            max: Vec3::new(1.0, 1.0, 1.0),
        };
        assert_eq!(shape.intersect(&forward()), Some(9.0));

        let behind = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::Z);
        assert_eq!(shape.intersect(&behind), None);
    }

    #[test]
    fn test_plane_and_rect() {
        let plane = PickShape::Plane { point: Vec3::ZERO, normal: Vec3::Z };
        assert_eq!(plane.intersect(&forward()), Some(10.0));

        let parallel = Ray::new(Vec3::ZERO, Vec3::X);
        assert_eq!(plane.intersect(&parallel), None);

        let rect = PickShape::Rect {
            center: Vec3::new(3.0, 0.0, 0.0),
            half_u: Vec3::X,
            half_v: Vec3::Y,
        };
        assert_eq!(rect.intersect(&forward()), None);
        let aimed = Ray::new(Vec3::new(3.5, 0.5, -2.0), Vec3::Z);
        assert_eq!(rect.intersect(&aimed), Some(2.0));
    }

    #[test]
    fn test_ray_from_screen_center_with_identity() {
        let ray = Ray::from_screen(Vec2::new(50.0, 50.0), Vec2::new(100.0, 100.0), &Mat4::IDENTITY).unwrap();
        assert_eq!(ray.origin, Vec3::ZERO);
        assert_eq!(ray.direction, Vec3::Z);
    }
}
