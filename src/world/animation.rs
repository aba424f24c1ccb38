use crate::assets::mesh::InfluenceHandle;
use crate::rendering::scene::node::Node;
use crate::utils::math::lerp;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackProperty {
    Translation,
    Rotation,
    Scale,
    Morph(String),
}

impl TrackProperty {
    pub fn components(&self) -> usize {
        match self {
            TrackProperty::Translation | TrackProperty::Scale => 3,
            TrackProperty::Rotation => 4,
            TrackProperty::Morph(_) => 1,
        }
    }
}

/// Keyframes for one property of one named node. `values` holds
/// `times.len() * property.components()` floats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyframeTrack {
    pub node: String,
    pub property: TrackProperty,
    pub times: Vec<f32>,
    pub values: Vec<f32>,
}

impl KeyframeTrack {
    pub fn is_valid(&self) -> bool {
        !self.times.is_empty() && self.values.len() == self.times.len() * self.property.components()
    }

    pub fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    fn key(&self, index: usize) -> &[f32] {
        let n = self.property.components();
        &self.values[index * n..(index + 1) * n]
    }

    /// Returns the surrounding keyframes and the blend factor between them.
    fn locate(&self, time: f32) -> (usize, usize, f32) {
        let last = self.times.len() - 1;
        if time <= self.times[0] {
            return (0, 0, 0.0);
        }
        if time >= self.times[last] {
            return (last, last, 0.0);
        }
        let next = self.times.partition_point(|&t| t <= time);
        let prev = next - 1;
        let span = self.times[next] - self.times[prev];
        let t = if span > 0.0 { (time - self.times[prev]) / span } else { 0.0 };
        (prev, next, t)
    }

    pub fn sample_vec3(&self, time: f32) -> Vec3 {
        let (a, b, t) = self.locate(time);
        Vec3::from_slice(self.key(a)).lerp(Vec3::from_slice(self.key(b)), t)
    }

    pub fn sample_quat(&self, time: f32) -> Quat {
        let (a, b, t) = self.locate(time);
        let qa = Quat::from_slice(self.key(a)).normalize();
        let qb = Quat::from_slice(self.key(b)).normalize();
        qa.slerp(qb, t)
    }

    pub fn sample_scalar(&self, time: f32) -> f32 {
        let (a, b, t) = self.locate(time);
        lerp(self.key(a)[0], self.key(b)[0], t)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    pub tracks: Vec<KeyframeTrack>,
}

impl AnimationClip {
    /// Invalid tracks are dropped; a missing duration is the last keyframe time.
    pub fn new(name: impl Into<String>, duration: Option<f32>, tracks: Vec<KeyframeTrack>) -> Self {
        let tracks: Vec<KeyframeTrack> =
            tracks.into_iter().filter(KeyframeTrack::is_valid).collect();
        let duration = duration
            .filter(|d| *d > 0.0)
            .unwrap_or_else(|| tracks.iter().map(KeyframeTrack::end_time).fold(0.0, f32::max));
        Self {
            name: name.into(),
            duration,
            tracks,
        }
    }
}

enum TrackBinding {
    Node,
    Morph { influences: InfluenceHandle, index: usize },
    Unbound,
}

/// Plays exactly one clip against a character's node tree, looping.
pub struct AnimationMixer {
    clip: Arc<AnimationClip>,
    bindings: Vec<TrackBinding>,
    time: f32,
}

impl AnimationMixer {
    pub fn bind(clip: Arc<AnimationClip>, root: &Node) -> Self {
        let bindings = clip
            .tracks
            .iter()
            .map(|track| match &track.property {
                TrackProperty::Morph(channel) => root
                    .find(&track.node)
                    .and_then(|node| node.mesh())
                    .and_then(|mesh| mesh.morph_targets.as_ref())
                    .and_then(|targets| {
                        targets.index_of(channel).map(|index| TrackBinding::Morph {
                            influences: targets.influences(),
                            index,
                        })
                    })
                    .unwrap_or(TrackBinding::Unbound),
                _ if root.find(&track.node).is_some() => TrackBinding::Node,
                _ => TrackBinding::Unbound,
            })
            .collect::<Vec<_>>();

        let unbound = bindings.iter().filter(|b| matches!(b, TrackBinding::Unbound)).count();
        debug!(
            "Bound clip '{}' ({:.2}s, {} tracks, {} unbound)",
            clip.name,
            clip.duration,
            clip.tracks.len(),
            unbound
        );

        Self { clip, bindings, time: 0.0 }
    }

    pub fn clip(&self) -> &AnimationClip {
        &self.clip
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// Position inside the clip after looping.
    pub fn local_time(&self) -> f32 {
        if self.clip.duration > 0.0 {
            self.time.rem_euclid(self.clip.duration)
        } else {
            0.0
        }
    }

    pub fn update(&mut self, delta: f32, root: &mut Node) {
        self.time += delta;
        let t = self.local_time();

        for (track, binding) in self.clip.tracks.iter().zip(&self.bindings) {
            match binding {
                TrackBinding::Unbound => {}
                TrackBinding::Morph { influences, index } => {
                    if let Ok(mut weights) = influences.write() {
                        if let Some(w) = weights.get_mut(*index) {
                            *w = track.sample_scalar(t).clamp(0.0, 1.0);
                        }
                    }
                }
                TrackBinding::Node => {
                    let Some(node) = root.find_mut(&track.node) else {
                        continue;
                    };
                    match track.property {
                        TrackProperty::Translation => {
                            node.transform.translation = track.sample_vec3(t)
                        }
                        TrackProperty::Rotation => node.transform.rotation = track.sample_quat(t),
                        TrackProperty::Scale => node.transform.scale = track.sample_vec3(t),
                        TrackProperty::Morph(_) => {}
                    }
                }
            }
        }
    }
}

/// Wall-clock source for per-frame deltas. The first reading is zero.
#[derive(Debug, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delta_seconds(&mut self) -> f32 {
        let now = Instant::now();
        let delta = self.last.map_or(0.0, |last| now.duration_since(last).as_secs_f32());
        self.last = Some(now);
        delta
    }
}
