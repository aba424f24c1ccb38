pub mod camera;
pub mod light;
pub mod resources;
pub mod scene;
pub mod stats;
pub mod wireframe;

use crate::world::obstacles::ObstacleField;
use camera::OrbitCamera;
use scene::SceneGraph;

pub use resources::{GraphicsResources, ResourceLedger};
pub use stats::{FrameStats, PerformanceMetrics};
pub use wireframe::WireframeRenderer;

/// Everything a renderer may read while drawing one frame.
pub struct Frame<'a> {
    pub scene: &'a SceneGraph,
    pub obstacles: &'a ObstacleField,
    pub camera: &'a OrbitCamera,
}

pub trait FrameRenderer {
    fn render(&mut self, frame: &Frame<'_>);
}
