use crate::assets::mesh::InfluenceHandle;
use crate::rendering::scene::node::Node;

pub const MORPH_MIN: f32 = 0.0;
pub const MORPH_MAX: f32 = 1.0;
pub const MORPH_STEP: f64 = 0.01;

/// One slider bound to a live morph influence.
#[derive(Debug, Clone)]
pub struct MorphControl {
    pub label: String,
    influences: InfluenceHandle,
    index: usize,
}

impl MorphControl {
    pub fn value(&self) -> f32 {
        self.influences
            .read()
            .ok()
            .and_then(|w| w.get(self.index).copied())
            .unwrap_or(0.0)
    }

    pub fn set_value(&self, value: f32) {
        if let Ok(mut weights) = self.influences.write() {
            if let Some(w) = weights.get_mut(self.index) {
                *w = value.clamp(MORPH_MIN, MORPH_MAX);
            }
        }
    }
}

/// Controls for one mesh, titled by the mesh name (or its uuid when unnamed).
#[derive(Debug, Clone)]
pub struct MorphFolder {
    pub title: String,
    pub controls: Vec<MorphControl>,
}

/// Mirror of the character's morph channels. Rebuilt wholesale on every swap.
#[derive(Debug, Clone, Default)]
pub struct MorphPanel {
    folders: Vec<MorphFolder>,
}

impl MorphPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.folders.clear();
    }

    pub fn rebuild(&mut self, root: &Node) {
        self.clear();
        for channel in root.morph_channels() {
            let title = if channel.mesh_name.is_empty() {
                channel.mesh_uuid.to_string()
            } else {
                channel.mesh_name.clone()
            };
            let control = MorphControl {
                label: channel.channel,
                influences: channel.influences,
                index: channel.index,
            };
            // Channels of one mesh arrive contiguously.
            match self.folders.last_mut() {
                Some(folder) if folder.title == title && channel.index > 0 => {
                    folder.controls.push(control)
                }
                _ => self.folders.push(MorphFolder { title, controls: vec![control] }),
            }
        }
    }

    pub fn is_visible(&self) -> bool {
        self.control_count() > 0
    }

    pub fn control_count(&self) -> usize {
        self.folders.iter().map(|f| f.controls.len()).sum()
    }

    pub fn folders(&self) -> &[MorphFolder] {
        &self.folders
    }

    pub fn control(&self, folder: &str, label: &str) -> Option<&MorphControl> {
        self.folders
            .iter()
            .filter(|f| f.title == folder)
            .flat_map(|f| f.controls.iter())
            .find(|c| c.label == label)
    }

    /// Writes through to the live influence. Returns false when no such control exists.
    pub fn set(&self, folder: &str, label: &str, value: f32) -> bool {
        match self.control(folder, label) {
            Some(control) => {
                control.set_value(value);
                true
            }
            None => false,
        }
    }
}
