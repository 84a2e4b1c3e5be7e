//! Iterative positional collision correction
//!
//! Movers are vertical cylinders; volumes are AABBs. Each pass computes
//! the minimum translation that clears every overlapping volume and
//! applies it in place. Multiple passes let corrections from one volume
//! be re-checked against its neighbors (a mover pushed out of a wall may
//! land inside the adjacent fence post).
//!
//! The pass count is capped rather than iterating to convergence: the
//! worst-case cost per mover is bounded, at the price of possible small
//! residual overlap in pathological mutually-overlapping layouts. The
//! authored world never produces those.

use glam::Vec3;

use super::volumes::{Aabb, BlockingVolumeSet};

/// Upper bound on correction passes per resolution.
pub const MAX_RESOLVE_PASSES: usize = 4;

/// Padding added to every push so a corrected mover does not re-test as
/// exactly touching the face it was pushed to.
const PUSH_PADDING: f32 = 0.01;

/// Squared distance below which the mover's center counts as inside the
/// volume and the cardinal-face fallback takes over.
const INSIDE_EPSILON_SQ: f32 = 1e-6;

/// Push the cylinder at `position` (radius, vertical span
/// [`bottom_y`, `top_y`]) out of every enabled volume it overlaps.
///
/// Mutates `position.x`/`position.z` in place and returns the summed
/// magnitude of all corrections applied. Callers use that sum as an
/// impact signal (a vehicle scraping a wall takes damage proportional
/// to it).
pub fn resolve_horizontal(
    position: &mut Vec3,
    radius: f32,
    bottom_y: f32,
    top_y: f32,
    volumes: &BlockingVolumeSet,
) -> f32 {
    let active = volumes.active_volumes();
    if active.is_empty() {
        return 0.0;
    }

    let mut total_correction = 0.0;

    for _ in 0..MAX_RESOLVE_PASSES {
        let mut adjusted = false;

        for volume in &active {
            if !volume.overlaps_vertical(bottom_y, top_y) {
                continue;
            }

            // Closest point on the box to the mover center, XZ only.
            let closest_x = position.x.clamp(volume.min.x, volume.max.x);
            let closest_z = position.z.clamp(volume.min.z, volume.max.z);
            let dx = position.x - closest_x;
            let dz = position.z - closest_z;
            let dist_sq = dx * dx + dz * dz;

            if dist_sq >= radius * radius {
                continue;
            }

            let push = if dist_sq > INSIDE_EPSILON_SQ {
                // Center outside the box: push along the separation axis
                // until the rim exactly clears the face.
                let dist = dist_sq.sqrt();
                let push = (radius - dist) + PUSH_PADDING;
                position.x += dx / dist * push;
                position.z += dz / dist * push;
                push
            } else {
                // Center inside the box (a gate re-enabled under the
                // mover). Escape through the nearest cardinal face.
                push_through_nearest_face(position, volume, radius)
            };

            total_correction += push;
            adjusted = true;
        }

        if !adjusted {
            break;
        }
    }

    total_correction
}

/// Push a center that lies inside `volume` out through whichever of the
/// four side faces is nearest. Returns the push magnitude.
fn push_through_nearest_face(position: &mut Vec3, volume: &Aabb, radius: f32) -> f32 {
    let to_min_x = position.x - volume.min.x;
    let to_max_x = volume.max.x - position.x;
    let to_min_z = position.z - volume.min.z;
    let to_max_z = volume.max.z - position.z;

    let nearest = to_min_x.min(to_max_x).min(to_min_z).min(to_max_z);
    let push = nearest + radius + PUSH_PADDING;

    if nearest == to_min_x {
        position.x -= push;
    } else if nearest == to_max_x {
        position.x += push;
    } else if nearest == to_min_z {
        position.z -= push;
    } else {
        position.z += push;
    }
    push
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::volumes::Aabb;

    fn single_box_set() -> BlockingVolumeSet {
        let mut set = BlockingVolumeSet::new();
        set.register_static(Aabb::new(
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(1.0, 2.0, 1.0),
        ));
        set
    }

    fn xz_distance_to_box(position: Vec3, volume: &Aabb) -> f32 {
        let dx = (volume.min.x - position.x).max(0.0).max(position.x - volume.max.x);
        let dz = (volume.min.z - position.z).max(0.0).max(position.z - volume.max.z);
        (dx * dx + dz * dz).sqrt()
    }

    #[test]
    fn test_no_overlap_no_correction() {
        let set = single_box_set();
        let mut position = Vec3::new(5.0, 1.0, 0.0);
        let correction = resolve_horizontal(&mut position, 0.5, 0.0, 2.0, &set);

        assert_eq!(correction, 0.0);
        assert_eq!(position, Vec3::new(5.0, 1.0, 0.0));
    }

    #[test]
    fn test_overlapping_mover_pushed_clear() {
        let set = single_box_set();
        let mut position = Vec3::new(1.2, 1.0, 0.0);
        let correction = resolve_horizontal(&mut position, 0.5, 0.0, 2.0, &set);

        assert!(correction > 0.0);
        let volume = Aabb::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 2.0, 1.0));
        assert!(
            xz_distance_to_box(position, &volume) >= 0.5 - 1e-4,
            "mover still overlapping after resolve, distance {}",
            xz_distance_to_box(position, &volume)
        );
    }

    #[test]
    fn test_center_inside_box_escapes_nearest_face() {
        let set = single_box_set();
        // Dead center: any face is equally near; the resolver must still
        // produce a well-defined push, not a zero-length vector.
        let mut position = Vec3::new(0.0, 1.0, 0.0);
        let correction = resolve_horizontal(&mut position, 0.5, 0.0, 2.0, &set);

        assert!(correction > 0.0);
        let volume = Aabb::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 2.0, 1.0));
        assert!(xz_distance_to_box(position, &volume) >= 0.5 - 1e-4);
        // Off-center inside the box: nearest face wins.
        let mut position = Vec3::new(0.8, 1.0, 0.1);
        resolve_horizontal(&mut position, 0.5, 0.0, 2.0, &set);
        assert!(position.x > 1.0, "should escape through +X face");
    }

    #[test]
    fn test_vertical_miss_skips_volume() {
        let set = single_box_set();
        // Mover entirely above the 2m-tall box.
        let mut position = Vec3::new(0.5, 5.0, 0.0);
        let correction = resolve_horizontal(&mut position, 0.5, 4.0, 6.0, &set);

        assert_eq!(correction, 0.0);
    }

    #[test]
    fn test_corner_push_is_diagonal() {
        let set = single_box_set();
        let mut position = Vec3::new(1.2, 1.0, 1.2);
        resolve_horizontal(&mut position, 0.5, 0.0, 2.0, &set);

        // Pushed away from the corner along both axes.
        assert!(position.x > 1.2);
        assert!(position.z > 1.2);
    }

    #[test]
    fn test_two_adjacent_boxes_converge() {
        let mut set = BlockingVolumeSet::new();
        set.register_static(Aabb::new(
            Vec3::new(-2.0, 0.0, -1.0),
            Vec3::new(0.0, 2.0, 1.0),
        ));
        set.register_static(Aabb::new(
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(2.0, 2.0, 1.0),
        ));

        let mut position = Vec3::new(0.0, 1.0, 0.9);
        let correction = resolve_horizontal(&mut position, 0.4, 0.0, 2.0, &set);

        assert!(correction > 0.0);
        for volume in set.active_volumes() {
            assert!(
                xz_distance_to_box(position, &volume) >= 0.4 - 1e-3,
                "still overlapping {:?}",
                volume
            );
        }
    }
}
