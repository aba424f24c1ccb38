use crate::assets::mesh::{InfluenceHandle, Mesh};
use crate::utils::math::Aabb;
use glam::{Mat4, Quat, Vec3};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// The closed set of node kinds a loaded bundle can contain.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Mesh(Mesh),
    Group,
    Bone,
}

/// A graphics resource owned by a node that must be released when the
/// node leaves the scene for good.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReleasableResource {
    Geometry(Uuid),
    Material(Uuid),
    Texture(Uuid),
}

/// One morph channel discovered on a mesh node.
#[derive(Debug, Clone)]
pub struct MorphChannel {
    pub mesh_name: String,
    pub mesh_uuid: Uuid,
    pub channel: String,
    pub index: usize,
    pub influences: InfluenceHandle,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub uuid: Uuid,
    pub transform: Transform,
    pub kind: NodeKind,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            uuid: Uuid::new_v4(),
            transform: Transform::IDENTITY,
            kind,
            children: Vec::new(),
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Group)
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn mesh_mut(&mut self) -> Option<&mut Mesh> {
        match &mut self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    /// Depth-first, parents before children.
    pub fn traverse<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in &self.children {
            child.traverse(visit);
        }
    }

    /// Like [`Node::traverse`] but also hands out each node's world matrix.
    pub fn traverse_world(&self, parent: Mat4, visit: &mut impl FnMut(&Node, Mat4)) {
        let world = parent * self.transform.matrix();
        visit(self, world);
        for child in &self.children {
            child.traverse_world(world, visit);
        }
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Node> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(name))
    }

    pub fn find(&self, name: &str) -> Option<&Node> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    /// Resources owned by this node alone (not its children).
    pub fn own_resources(&self) -> Vec<ReleasableResource> {
        match &self.kind {
            NodeKind::Mesh(mesh) => {
                let mut resources = vec![
                    ReleasableResource::Material(mesh.material.id),
                    ReleasableResource::Geometry(mesh.geometry.id),
                ];
                if let Some(map) = &mesh.material.map {
                    resources.insert(1, ReleasableResource::Texture(map.id));
                }
                resources
            }
            NodeKind::Group | NodeKind::Bone => Vec::new(),
        }
    }

    /// Every resource in this subtree, in traversal order.
    pub fn releasable_resources(&self) -> Vec<ReleasableResource> {
        let mut out = Vec::new();
        self.traverse(&mut |node| out.extend(node.own_resources()));
        out
    }

    /// Every morph channel in this subtree, in traversal order.
    pub fn morph_channels(&self) -> Vec<MorphChannel> {
        let mut out = Vec::new();
        self.traverse(&mut |node| {
            let Some(targets) = node.mesh().and_then(|m| m.morph_targets.as_ref()) else {
                return;
            };
            for (index, channel) in targets.names().iter().enumerate() {
                out.push(MorphChannel {
                    mesh_name: node.name.clone(),
                    mesh_uuid: node.uuid,
                    channel: channel.clone(),
                    index,
                    influences: targets.influences(),
                });
            }
        });
        out
    }

    pub fn mesh_count(&self) -> usize {
        let mut count = 0;
        self.traverse(&mut |node| {
            if node.mesh().is_some() {
                count += 1;
            }
        });
        count
    }

    /// World-space bounds of every mesh vertex in the subtree.
    pub fn world_bounds(&self) -> Aabb {
        let mut bounds = Aabb::EMPTY;
        self.traverse_world(Mat4::IDENTITY, &mut |node, world| {
            if let Some(mesh) = node.mesh() {
                for p in &mesh.geometry.positions {
                    bounds.expand_by_point(world.transform_point3(*p));
                }
            }
        });
        bounds
    }
}
