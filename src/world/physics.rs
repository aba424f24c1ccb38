// Collision here is detection plus a random nudge. It does not separate the
// shapes: a displaced obstacle may still overlap the character next frame.

use crate::utils::math::Aabb;
use crate::world::obstacles::{Obstacle, ObstacleField};
use rand::Rng;

/// Shifts X and Z each by a uniform value in `[-max_offset, max_offset)`.
pub fn displace<R: Rng + ?Sized>(obstacle: &mut Obstacle, max_offset: f32, rng: &mut R) {
    obstacle.position.x += rng.random::<f32>() * 2.0 * max_offset - max_offset;
    obstacle.position.z += rng.random::<f32>() * 2.0 * max_offset - max_offset;
}

/// Linear scan over every obstacle. Returns how many were displaced.
pub fn resolve_collisions<R: Rng + ?Sized>(
    character_bounds: &Aabb,
    obstacles: &mut ObstacleField,
    max_offset: f32,
    rng: &mut R,
) -> usize {
    let mut displaced = 0;
    for obstacle in obstacles.iter_mut() {
        if character_bounds.intersects(&obstacle.world_bounds()) {
            displace(obstacle, max_offset, rng);
            displaced += 1;
        }
    }
    displaced
}
