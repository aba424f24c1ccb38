use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowCamera {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Light {
    Hemisphere {
        position: Vec3,
        sky_color: u32,
        ground_color: u32,
        intensity: f32,
    },
    Directional {
        position: Vec3,
        color: u32,
        intensity: f32,
        shadow: Option<ShadowCamera>,
    },
}

impl Light {
    pub fn position(&self) -> Vec3 {
        match self {
            Light::Hemisphere { position, .. } | Light::Directional { position, .. } => *position,
        }
    }

    pub fn casts_shadow(&self) -> bool {
        matches!(self, Light::Directional { shadow: Some(_), .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    pub color: u32,
    pub near: f32,
    pub far: f32,
}

impl Fog {
    /// 0.0 at `near` or closer, 1.0 at `far` or beyond.
    pub fn factor(&self, distance: f32) -> f32 {
        ((distance - self.near) / (self.far - self.near)).clamp(0.0, 1.0)
    }
}

/// Static outdoor set: sky/ground lighting, ground plane and grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    pub background: u32,
    pub fog: Fog,
    pub lights: Vec<Light>,
    pub ground_size: f32,
    pub ground_color: u32,
    pub grid_divisions: u32,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            background: 0x067006,
            fog: Fog { color: 0x521f0a, near: 200.0, far: 1000.0 },
            lights: vec![
                Light::Hemisphere {
                    position: Vec3::new(0.0, 200.0, 0.0),
                    sky_color: 0xffffff,
                    ground_color: 0x444444,
                    intensity: 5.0,
                },
                Light::Directional {
                    position: Vec3::new(0.0, 200.0, 100.0),
                    color: 0xffffff,
                    intensity: 5.0,
                    shadow: Some(ShadowCamera {
                        top: 180.0,
                        bottom: -100.0,
                        left: -120.0,
                        right: 120.0,
                    }),
                },
            ],
            ground_size: 2000.0,
            ground_color: 0x5e400c,
            grid_divisions: 20,
        }
    }
}
