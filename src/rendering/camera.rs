use glam::{Mat4, Vec3, Vec4};
use std::f32::consts::{PI, TAU};

const MIN_POLAR: f32 = 1e-3;
const MIN_DISTANCE: f32 = 1.0;
const ZOOM_STEP: f32 = 0.95;

/// Orbit camera around a look-at target, driven by pointer input.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    radius: f32,
    azimuth: f32,
    polar: f32,
}

impl OrbitCamera {
    pub fn new(position: Vec3, target: Vec3, fov_degrees: f32, near: f32, far: f32) -> Self {
        let offset = position - target;
        let radius = offset.length().max(MIN_DISTANCE);
        Self {
            target,
            fov_degrees,
            near,
            far,
            radius,
            azimuth: offset.x.atan2(offset.z),
            polar: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn position(&self) -> Vec3 {
        let sin_polar = self.polar.sin();
        let direction = Vec3::new(
            sin_polar * self.azimuth.sin(),
            self.polar.cos(),
            sin_polar * self.azimuth.cos(),
        );
        self.target + self.radius * direction
    }

    /// Pixel drag to rotation; a drag across the full viewport height is one turn.
    pub fn rotate(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        self.azimuth -= TAU * dx / viewport_height;
        self.polar = (self.polar - TAU * dy / viewport_height).clamp(MIN_POLAR, PI - MIN_POLAR);
    }

    /// Moves the target in the view plane so the point under the cursor follows it.
    pub fn pan(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        let forward = (self.target - self.position()).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);
        let half_fov = (self.fov_degrees.to_radians() * 0.5).tan();
        let units_per_pixel = 2.0 * self.radius * half_fov / viewport_height;
        self.target += (-dx * right + dy * up) * units_per_pixel;
    }

    /// Positive `steps` zoom in.
    pub fn zoom(&mut self, steps: f32) {
        self.radius = (self.radius * ZOOM_STEP.powf(steps)).clamp(MIN_DISTANCE, self.far);
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.fov_degrees.to_radians(),
            aspect.max(1e-3),
            self.near,
            self.far,
        )
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view()
    }

    /// Normalised device coordinates of `point`, or `None` when it is behind
    /// the near plane.
    pub fn project(&self, view_projection: &Mat4, point: Vec3) -> Option<Vec3> {
        let clip: Vec4 = *view_projection * point.extend(1.0);
        if clip.w <= self.near {
            return None;
        }
        Some(clip.truncate() / clip.w)
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(Vec3::new(100.0, 200.0, 300.0), Vec3::new(0.0, 100.0, 0.0), 45.0, 0.1, 1000.0)
    }
}
