use eframe::egui::Key;
use glam::Vec3;

/// The four movement keys. Each press is a single fixed step, not a velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKey {
    Forward,
    Back,
    Left,
    Right,
}

impl MoveKey {
    pub const ALL: [MoveKey; 4] = [MoveKey::Forward, MoveKey::Back, MoveKey::Left, MoveKey::Right];

    pub fn from_key(key: Key) -> Option<MoveKey> {
        match key {
            Key::W => Some(MoveKey::Forward),
            Key::S => Some(MoveKey::Back),
            Key::A => Some(MoveKey::Left),
            Key::D => Some(MoveKey::Right),
            _ => None,
        }
    }

    pub fn key(self) -> Key {
        match self {
            MoveKey::Forward => Key::W,
            MoveKey::Back => Key::S,
            MoveKey::Left => Key::A,
            MoveKey::Right => Key::D,
        }
    }

    pub fn offset(self, distance: f32) -> Vec3 {
        match self {
            MoveKey::Forward => Vec3::new(0.0, 0.0, -distance),
            MoveKey::Back => Vec3::new(0.0, 0.0, distance),
            MoveKey::Left => Vec3::new(-distance, 0.0, 0.0),
            MoveKey::Right => Vec3::new(distance, 0.0, 0.0),
        }
    }
}
