use crate::utils::math::Aabb;
use glam::Vec3;
use rand::Rng;
use tracing::info;

/// Cone dimensions shared by every obstacle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConeShape {
    pub radius: f32,
    pub height: f32,
}

impl ConeShape {
    /// Local bounds of a cone centred on its origin.
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_half_extents(
            Vec3::ZERO,
            Vec3::new(self.radius, self.height * 0.5, self.radius),
        )
    }
}

impl Default for ConeShape {
    fn default() -> Self {
        Self { radius: 20.0, height: 30.0 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub position: Vec3,
    local_bounds: Aabb,
}

impl Obstacle {
    pub fn new(position: Vec3, shape: ConeShape) -> Self {
        Self {
            position,
            local_bounds: shape.bounds(),
        }
    }

    pub fn world_bounds(&self) -> Aabb {
        self.local_bounds.translated(self.position)
    }
}

/// The fixed set of obstacles created at startup.
#[derive(Debug, Clone, Default)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    pub fn new(obstacles: Vec<Obstacle>) -> Self {
        Self { obstacles }
    }

    /// `count` cones uniformly placed in the cube `[-half_extent, half_extent)^3`.
    pub fn scatter<R: Rng + ?Sized>(
        count: usize,
        half_extent: f32,
        shape: ConeShape,
        rng: &mut R,
    ) -> Self {
        let mut coordinate = || rng.random::<f32>() * 2.0 * half_extent - half_extent;
        let obstacles = (0..count)
            .map(|_| {
                let position = Vec3::new(coordinate(), coordinate(), coordinate());
                Obstacle::new(position, shape)
            })
            .collect();
        info!("Scattered {} obstacles within ±{}", count, half_extent);
        Self { obstacles }
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Obstacle> {
        self.obstacles.iter_mut()
    }

    pub fn get(&self, index: usize) -> Option<&Obstacle> {
        self.obstacles.get(index)
    }
}
