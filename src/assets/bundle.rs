use super::material::Material;
use super::mesh::{Geometry, Mesh};
use super::texture::Texture;
use crate::rendering::scene::node::{Node, NodeKind, Transform};
use crate::world::animation::{AnimationClip, KeyframeTrack};
use anyhow::{anyhow, Context, Result};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A loaded model: its node hierarchy and the clips that ship with it.
#[derive(Debug, Clone)]
pub struct AssetBundle {
    pub root: Node,
    pub clips: Vec<Arc<AnimationClip>>,
}

impl AssetBundle {
    pub fn new(root: Node, clips: Vec<AnimationClip>) -> Self {
        Self {
            root,
            clips: clips.into_iter().map(Arc::new).collect(),
        }
    }
}

// On-disk description, decoded by `JsonBundleLoader`.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleDescription {
    pub root: NodeDescription,
    #[serde(default)]
    pub clips: Vec<ClipDescription>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKindTag {
    #[default]
    Group,
    Bone,
    Mesh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDescription {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub kind: NodeKindTag,
    #[serde(default)]
    pub translation: [f32; 3],
    #[serde(default = "identity_rotation")]
    pub rotation: [f32; 4],
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
    #[serde(default)]
    pub mesh: Option<MeshDescription>,
    #[serde(default)]
    pub children: Vec<NodeDescription>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshDescription {
    pub positions: Vec<[f32; 3]>,
    #[serde(default)]
    pub material: MaterialDescription,
    #[serde(default)]
    pub morph_targets: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialDescription {
    #[serde(default = "white")]
    pub color: [f32; 3],
    #[serde(default)]
    pub map: Option<PathBuf>,
}

impl Default for MaterialDescription {
    fn default() -> Self {
        Self { color: white(), map: None }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipDescription {
    pub name: String,
    #[serde(default)]
    pub duration: Option<f32>,
    #[serde(default)]
    pub tracks: Vec<KeyframeTrack>,
}

fn identity_rotation() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

fn unit_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn white() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

impl BundleDescription {
    /// Texture map paths in mesh traversal order, resolved against `base_dir`.
    pub fn texture_paths(&self, base_dir: &Path) -> Vec<Option<PathBuf>> {
        fn walk(node: &NodeDescription, base_dir: &Path, out: &mut Vec<Option<PathBuf>>) {
            if let (NodeKindTag::Mesh, Some(mesh)) = (node.kind, &node.mesh) {
                out.push(mesh.material.map.as_ref().map(|p| base_dir.join(p)));
            }
            for child in &node.children {
                walk(child, base_dir, out);
            }
        }
        let mut out = Vec::new();
        walk(&self.root, base_dir, &mut out);
        out
    }

    /// Builds runtime nodes. `textures` must line up with [`Self::texture_paths`].
    pub fn into_bundle(self, textures: Vec<Option<Texture>>) -> Result<AssetBundle> {
        let mut textures = textures.into_iter();
        let root = build_node(self.root, &mut textures)?;
        let clips = self
            .clips
            .into_iter()
            .map(|clip| AnimationClip::new(clip.name, clip.duration, clip.tracks))
            .collect();
        Ok(AssetBundle::new(root, clips))
    }
}

fn build_node(
    desc: NodeDescription,
    textures: &mut impl Iterator<Item = Option<Texture>>,
) -> Result<Node> {
    let transform = Transform {
        translation: Vec3::from_array(desc.translation),
        rotation: Quat::from_array(desc.rotation).normalize(),
        scale: Vec3::from_array(desc.scale),
    };

    let kind = match desc.kind {
        NodeKindTag::Group => NodeKind::Group,
        NodeKindTag::Bone => NodeKind::Bone,
        NodeKindTag::Mesh => {
            let mesh = desc
                .mesh
                .ok_or_else(|| anyhow!("mesh node '{}' has no mesh data", desc.name))?;
            let mut material = Material::new(mesh.material.color);
            if let Some(map) = textures
                .next()
                .context("texture list shorter than mesh count")?
            {
                material = material.with_map(map);
            }
            let positions = mesh.positions.into_iter().map(Vec3::from_array).collect();
            let mut mesh = Mesh::new(Geometry::new(positions), material)
                .with_morph_targets(mesh.morph_targets);
            mesh.cast_shadow = true;
            mesh.receive_shadow = true;
            NodeKind::Mesh(mesh)
        }
    };

    let mut node = Node::new(desc.name, kind).with_transform(transform);
    for child in desc.children {
        node.children.push(build_node(child, textures)?);
    }
    Ok(node)
}
