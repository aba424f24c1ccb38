use super::texture::Texture;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub id: Uuid,
    pub color: [f32; 3],
    pub map: Option<Texture>,
}

impl Material {
    pub fn new(color: [f32; 3]) -> Self {
        Self {
            id: Uuid::new_v4(),
            color,
            map: None,
        }
    }

    pub fn with_map(mut self, map: Texture) -> Self {
        self.map = Some(map);
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new([1.0, 1.0, 1.0])
    }
}
