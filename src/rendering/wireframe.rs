use super::light::{Fog, Light};
use super::{Frame, FrameRenderer};
use crate::utils::math::{color_from_hex, Aabb, BOX_EDGES};
use eframe::egui::{pos2, Color32, Painter, Pos2, Rect, Stroke};
use glam::{Mat4, Vec3};

const CHARACTER_COLOR: u32 = 0xffffff;
const OBSTACLE_COLOR: u32 = 0xd6f50c;
const GRID_COLOR: u32 = 0x000000;
const LIGHT_MARKER_SIZE: f32 = 8.0;

/// Draws the scene as projected bounding boxes into an egui painter.
pub struct WireframeRenderer<'p> {
    painter: &'p Painter,
    viewport: Rect,
    pub segments_drawn: usize,
}

impl<'p> WireframeRenderer<'p> {
    pub fn new(painter: &'p Painter, viewport: Rect) -> Self {
        Self {
            painter,
            viewport,
            segments_drawn: 0,
        }
    }

    fn to_screen(&self, ndc: Vec3) -> Pos2 {
        pos2(
            self.viewport.left() + (ndc.x + 1.0) * 0.5 * self.viewport.width(),
            self.viewport.top() + (1.0 - ndc.y) * 0.5 * self.viewport.height(),
        )
    }

    fn segment(&mut self, frame: &Frame<'_>, vp: &Mat4, a: Vec3, b: Vec3, color: Color32) {
        let camera = frame.camera;
        let (Some(na), Some(nb)) = (camera.project(vp, a), camera.project(vp, b)) else {
            return;
        };
        let fog = &frame.scene.environment.fog;
        let distance = (((a + b) * 0.5) - camera.position()).length();
        let color = fogged(color, fog, distance);
        self.painter
            .line_segment([self.to_screen(na), self.to_screen(nb)], Stroke::new(1.0, color));
        self.segments_drawn += 1;
    }

    fn aabb(&mut self, frame: &Frame<'_>, vp: &Mat4, bounds: &Aabb, color: Color32) {
        if bounds.is_empty() {
            return;
        }
        let corners = bounds.corners();
        for (a, b) in BOX_EDGES {
            self.segment(frame, vp, corners[a], corners[b], color);
        }
    }

    fn grid(&mut self, frame: &Frame<'_>, vp: &Mat4) {
        let env = &frame.scene.environment;
        let half = env.ground_size * 0.5;
        let divisions = env.grid_divisions.max(1);
        let step = env.ground_size / divisions as f32;
        let color = rgb(GRID_COLOR).gamma_multiply(0.2);
        for i in 0..=divisions {
            let offset = -half + i as f32 * step;
            let (along_z, along_x) = (Vec3::new(offset, 0.0, 0.0), Vec3::new(0.0, 0.0, offset));
            self.segment(frame, vp, along_z - Vec3::Z * half, along_z + Vec3::Z * half, color);
            self.segment(frame, vp, along_x - Vec3::X * half, along_x + Vec3::X * half, color);
        }
        let ground = Aabb::new(Vec3::new(-half, 0.0, -half), Vec3::new(half, 0.0, half));
        self.aabb(frame, vp, &ground, rgb(env.ground_color));
    }

    fn lights(&mut self, frame: &Frame<'_>, vp: &Mat4) {
        for light in &frame.scene.environment.lights {
            let (color, shadow) = match light {
                Light::Hemisphere { sky_color, .. } => (*sky_color, false),
                Light::Directional { color, .. } => (*color, light.casts_shadow()),
            };
            let color = rgb(color);
            let p = light.position();
            for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
                let d = axis * LIGHT_MARKER_SIZE;
                self.segment(frame, vp, p - d, p + d, color);
            }
            // Shadow casters point at the origin
            if shadow {
                self.segment(frame, vp, p, Vec3::ZERO, color.gamma_multiply(0.5));
            }
        }
    }
}

impl FrameRenderer for WireframeRenderer<'_> {
    fn render(&mut self, frame: &Frame<'_>) {
        self.segments_drawn = 0;
        let env = &frame.scene.environment;
        self.painter.rect_filled(self.viewport, 0.0, rgb(env.background));

        let aspect = self.viewport.width() / self.viewport.height().max(1.0);
        let vp = frame.camera.view_projection(aspect);

        self.grid(frame, &vp);
        self.lights(frame, &vp);

        for obstacle in frame.obstacles.iter() {
            self.aabb(frame, &vp, &obstacle.world_bounds(), rgb(OBSTACLE_COLOR));
        }

        if let Some(character) = frame.scene.character() {
            character.root.traverse_world(Mat4::IDENTITY, &mut |node, world| {
                if let Some(mesh) = node.mesh() {
                    let [r, g, b] = mesh.material.color;
                    let channel = |c: f32| (c * 255.0) as u8;
                    let tint = Color32::from_rgb(channel(r), channel(g), channel(b));
                    let bounds = mesh.geometry.bounds().transformed(&world);
                    self.aabb(frame, &vp, &bounds, tint);
                }
            });
            self.aabb(frame, &vp, &character.world_bounds(), rgb(CHARACTER_COLOR));
        }
    }
}

fn rgb(hex: u32) -> Color32 {
    let [r, g, b] = color_from_hex(hex);
    Color32::from_rgb(r, g, b)
}

fn fogged(color: Color32, fog: &Fog, distance: f32) -> Color32 {
    let t = fog.factor(distance);
    if t <= 0.0 {
        return color;
    }
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    let [fr, fg, fb] = color_from_hex(fog.color);
    let mix = |c: u8, f: u8| (c as f32 + (f as f32 - c as f32) * t).round() as u8;
    Color32::from_rgba_unmultiplied(mix(r, fr), mix(g, fg), mix(b, fb), a)
}
