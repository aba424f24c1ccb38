use super::material::Material;
use crate::utils::math::Aabb;
use glam::Vec3;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Live morph influences of one mesh, shared between the mesh, the
/// animation mixer and the morph sliders.
pub type InfluenceHandle = Arc<RwLock<Vec<f32>>>;

#[derive(Debug, Clone)]
pub struct Geometry {
    pub id: Uuid,
    pub positions: Vec<Vec3>,
    bounds: Aabb,
}

impl Geometry {
    pub fn new(positions: Vec<Vec3>) -> Self {
        let bounds = Aabb::from_points(positions.iter().copied());
        Self {
            id: Uuid::new_v4(),
            positions,
            bounds,
        }
    }

    /// Bounds in the mesh's local space.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }
}

/// Ordered morph-target dictionary: channel `i` is named `names[i]` and its
/// weight lives at `influences[i]`.
#[derive(Debug, Clone)]
pub struct MorphTargets {
    names: Vec<String>,
    influences: InfluenceHandle,
}

impl MorphTargets {
    pub fn new(names: Vec<String>) -> Self {
        let influences = Arc::new(RwLock::new(vec![0.0; names.len()]));
        Self { names, influences }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn influences(&self) -> InfluenceHandle {
        Arc::clone(&self.influences)
    }

    pub fn influence(&self, index: usize) -> Option<f32> {
        self.influences.read().ok()?.get(index).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Mesh {
    pub geometry: Geometry,
    pub material: Material,
    pub morph_targets: Option<MorphTargets>,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl Mesh {
    pub fn new(geometry: Geometry, material: Material) -> Self {
        Self {
            geometry,
            material,
            morph_targets: None,
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    pub fn with_morph_targets(mut self, names: Vec<String>) -> Self {
        self.morph_targets = if names.is_empty() { None } else { Some(MorphTargets::new(names)) };
        self
    }
}
