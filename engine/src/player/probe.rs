//! Environment Probe
//!
//! World queries behind the movement state machine:
//!
//! - [`can_stand`]: is there room above the feet for a standing capsule
//! - [`floor_influence`]: which way is downhill on the current floor
//!
//! Neither has side effects.

use glam::Vec3;

use crate::physics::{CharacterBody, CollisionWorld, UP};

/// Check whether the character could stand up where it is.
///
/// Always `false` while crouch is held. Otherwise traces straight up from
/// the bottom of the current capsule over twice the standing half height,
/// ignoring the character itself; any hit means a ceiling is in the way.
pub fn can_stand<B, W>(world: &W, body: &B, standing_half_height: f32, wants_crouch: bool) -> bool
where
    B: CharacterBody + ?Sized,
    W: CollisionWorld + ?Sized,
{
    if wants_crouch {
        return false;
    }

    let start = body.location() - UP * body.capsule_half_height();
    let end = start + UP * (standing_half_height * 2.0);

    world.line_trace(start, end, &[body.id()]).is_none()
}

/// Down-slope direction along a floor with the given normal.
///
/// Flat ground (normal equal to `UP`) has no influence and yields
/// `Vec3::ZERO`. Otherwise returns `normal x (normal x UP)` normalized,
/// the unit vector pointing downhill within the floor plane.
pub fn floor_influence(floor_normal: Vec3) -> Vec3 {
    if floor_normal == UP {
        return Vec3::ZERO;
    }

    floor_normal.cross(floor_normal.cross(UP)).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{ActorId, KinematicBody, World, CAPSULE_HALF_HEIGHT};

    fn setup() -> (World, KinematicBody) {
        let mut world = World::new();
        world.add_box(Vec3::new(-1000.0, -1000.0, -10.0), Vec3::new(1000.0, 1000.0, 0.0));
        let body = KinematicBody::new(ActorId(100), Vec3::new(0.0, 0.0, CAPSULE_HALF_HEIGHT));
        (world, body)
    }

    #[test]
    fn test_can_stand_in_open_space() {
        let (world, body) = setup();
        assert!(can_stand(&world, &body, CAPSULE_HALF_HEIGHT, false));
    }

    #[test]
    fn test_crouch_intent_blocks_standing() {
        let (world, body) = setup();
        assert!(!can_stand(&world, &body, CAPSULE_HALF_HEIGHT, true));
    }

    #[test]
    fn test_low_ceiling_blocks_standing() {
        let (mut world, mut body) = setup();
        world.add_box(Vec3::new(-100.0, -100.0, 120.0), Vec3::new(100.0, 100.0, 140.0));
        body.crouch();

        assert!(!can_stand(&world, &body, CAPSULE_HALF_HEIGHT, false));
    }

    #[test]
    fn test_ceiling_above_probe_length_is_ignored() {
        let (mut world, body) = setup();
        // Probe reaches 2 * 96 = 192 above the feet
        world.add_box(Vec3::new(-100.0, -100.0, 200.0), Vec3::new(100.0, 100.0, 220.0));

        assert!(can_stand(&world, &body, CAPSULE_HALF_HEIGHT, false));
    }

    #[test]
    fn test_own_geometry_is_ignored() {
        let (mut world, body) = setup();
        world.add_blocker(body.id(), Vec3::new(-30.0, -30.0, 0.0), Vec3::new(30.0, 30.0, 192.0));
        world.add_blocker(body.id(), Vec3::new(-30.0, -30.0, 150.0), Vec3::new(30.0, 30.0, 160.0));

        assert!(can_stand(&world, &body, CAPSULE_HALF_HEIGHT, false));
    }

    #[test]
    fn test_flat_floor_has_no_influence() {
        assert_eq!(floor_influence(UP), Vec3::ZERO);
    }

    #[test]
    fn test_slope_influence_points_downhill() {
        // Floor rising toward -X, so downhill is +X
        let normal = Vec3::new(0.5, 0.0, 1.0).normalize();
        let influence = floor_influence(normal);

        assert!((influence.length() - 1.0).abs() < 1e-5);
        assert!(influence.x > 0.0);
        assert!(influence.z < 0.0);
        assert!(influence.dot(normal).abs() < 1e-5, "influence must lie in the floor plane");
    }

    #[test]
    fn test_influence_ignores_slope_axis() {
        let normal = Vec3::new(0.0, -0.3, 1.0).normalize();
        let influence = floor_influence(normal);
        assert!(influence.y < 0.0);
        assert!(influence.x.abs() < 1e-6);
    }
}
