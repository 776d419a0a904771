//! Collision detection module
//!
//! Line traces against axis-aligned boxes. The controller only ever asks
//! one question of the world: "does this segment hit anything, and if so
//! what, where and facing which way". [`CollisionWorld`] is that
//! contract; [`crate::physics::World`] is the in-crate implementation.
//!
//! # Ray-AABB Intersection
//!
//! The slab method is used for ray-AABB intersection, which finds the
//! intersection points by computing entry and exit times for each axis.
//!
//! # Example
//!
//! ```ignore
//! use runner_engine::physics::collision::ray_aabb_intersect;
//! use glam::Vec3;
//!
//! let origin = Vec3::new(0.0, 0.0, -5.0);
//! let direction = Vec3::new(0.0, 0.0, 1.0);
//! let aabb_min = Vec3::new(-1.0, -1.0, -1.0);
//! let aabb_max = Vec3::new(1.0, 1.0, 1.0);
//!
//! if let Some(t) = ray_aabb_intersect(origin, direction, aabb_min, aabb_max) {
//!     let hit_point = origin + direction * t;
//! }
//! ```

use glam::Vec3;

use super::types::ActorId;

/// Result of a blocking line trace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceHit {
    /// Actor owning the geometry that was hit
    pub actor: ActorId,
    /// World-space impact point
    pub point: Vec3,
    /// Surface normal at the impact point (normalized)
    pub normal: Vec3,
    /// Distance from the trace start to the impact point
    pub distance: f32,
}

impl TraceHit {
    /// Creates a new TraceHit with the given parameters.
    pub fn new(actor: ActorId, point: Vec3, normal: Vec3, distance: f32) -> Self {
        Self {
            actor,
            point,
            normal,
            distance,
        }
    }
}

/// World collision query used by the stand-up probe and the interaction scanner.
pub trait CollisionWorld {
    /// Trace the segment `start..end`, skipping every actor in `ignore`.
    ///
    /// Returns the nearest blocking hit, or `None` if the segment is clear.
    /// Geometry the segment starts inside of does not count as a hit.
    fn line_trace(&self, start: Vec3, end: Vec3, ignore: &[ActorId]) -> Option<TraceHit>;
}

/// Performs ray-AABB (Axis-Aligned Bounding Box) intersection test using the slab method.
///
/// # Arguments
///
/// * `ray_origin` - Starting point of the ray
/// * `ray_dir` - Direction of the ray (must be normalized)
/// * `aabb_min` - Minimum corner of the AABB
/// * `aabb_max` - Maximum corner of the AABB
///
/// # Returns
///
/// * `Some(t)` - Distance along the ray to the intersection point (t >= 0)
/// * `None` - No intersection or intersection is behind the ray origin
pub fn ray_aabb_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    aabb_min: Vec3,
    aabb_max: Vec3,
) -> Option<f32> {
    // Near-zero direction components become huge slopes instead of dividing by zero
    let inv_dir = Vec3::new(
        if ray_dir.x.abs() > 1e-10 { 1.0 / ray_dir.x } else { f32::MAX * ray_dir.x.signum() },
        if ray_dir.y.abs() > 1e-10 { 1.0 / ray_dir.y } else { f32::MAX * ray_dir.y.signum() },
        if ray_dir.z.abs() > 1e-10 { 1.0 / ray_dir.z } else { f32::MAX * ray_dir.z.signum() },
    );

    let t1 = (aabb_min.x - ray_origin.x) * inv_dir.x;
    let t2 = (aabb_max.x - ray_origin.x) * inv_dir.x;

    let mut t_min = t1.min(t2);
    let mut t_max = t1.max(t2);

    let t3 = (aabb_min.y - ray_origin.y) * inv_dir.y;
    let t4 = (aabb_max.y - ray_origin.y) * inv_dir.y;

    t_min = t_min.max(t3.min(t4));
    t_max = t_max.min(t3.max(t4));

    let t5 = (aabb_min.z - ray_origin.z) * inv_dir.z;
    let t6 = (aabb_max.z - ray_origin.z) * inv_dir.z;

    t_min = t_min.max(t5.min(t6));
    t_max = t_max.min(t5.max(t6));

    if t_max >= t_min && t_max >= 0.0 {
        if t_min >= 0.0 {
            Some(t_min)
        } else {
            // Ray starts inside the AABB
            Some(t_max)
        }
    } else {
        None
    }
}

/// Whether `point` lies inside or on the surface of the box.
pub fn aabb_contains(point: Vec3, aabb_min: Vec3, aabb_max: Vec3) -> bool {
    point.cmpge(aabb_min).all() && point.cmple(aabb_max).all()
}

/// Computes the outward surface normal for a point on an AABB surface.
///
/// Picks the face whose axis has the largest normalized offset from the
/// box center.
pub fn aabb_surface_normal(point: Vec3, aabb_min: Vec3, aabb_max: Vec3) -> Vec3 {
    let center = (aabb_min + aabb_max) * 0.5;
    let half_extents = (aabb_max - aabb_min) * 0.5;
    let local = point - center;

    let normalized = Vec3::new(
        local.x / half_extents.x,
        local.y / half_extents.y,
        local.z / half_extents.z,
    );

    let abs_normalized = normalized.abs();

    if abs_normalized.x >= abs_normalized.y && abs_normalized.x >= abs_normalized.z {
        Vec3::new(normalized.x.signum(), 0.0, 0.0)
    } else if abs_normalized.y >= abs_normalized.x && abs_normalized.y >= abs_normalized.z {
        Vec3::new(0.0, normalized.y.signum(), 0.0)
    } else {
        Vec3::new(0.0, 0.0, normalized.z.signum())
    }
}
