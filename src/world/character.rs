use crate::assets::bundle::AssetBundle;
use crate::assets::AssetId;
use crate::rendering::scene::node::{Node, ReleasableResource};
use crate::utils::math::Aabb;
use crate::world::animation::AnimationClip;
use glam::Vec3;
use std::sync::Arc;

/// The model currently on stage. Exactly one exists at a time once the
/// first load has completed.
#[derive(Debug, Clone)]
pub struct ActiveCharacter {
    pub asset: AssetId,
    pub root: Node,
    pub clips: Vec<Arc<AnimationClip>>,
}

impl ActiveCharacter {
    pub fn from_bundle(asset: AssetId, bundle: AssetBundle) -> Self {
        Self {
            asset,
            root: bundle.root,
            clips: bundle.clips,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.root.transform.translation
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.root.transform.translation += offset;
    }

    pub fn world_bounds(&self) -> Aabb {
        self.root.world_bounds()
    }

    pub fn mesh_count(&self) -> usize {
        self.root.mesh_count()
    }

    pub fn resources(&self) -> Vec<ReleasableResource> {
        self.root.releasable_resources()
    }
}
