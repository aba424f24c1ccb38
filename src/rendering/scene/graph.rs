use crate::rendering::light::Environment;
use crate::world::character::ActiveCharacter;
use tracing::debug;

/// What is drawn each frame: the static environment plus at most one character.
pub struct SceneGraph {
    pub environment: Environment,
    character: Option<ActiveCharacter>,
}

impl SceneGraph {
    pub fn new(environment: Environment) -> Self {
        SceneGraph {
            environment,
            character: None,
        }
    }

    /// Installs `character`, handing back whatever occupied the slot.
    pub fn attach_character(&mut self, character: ActiveCharacter) -> Option<ActiveCharacter> {
        debug!("Attaching character {} ({})", character.asset, character.root.uuid);
        self.character.replace(character)
    }

    pub fn detach_character(&mut self) -> Option<ActiveCharacter> {
        let detached = self.character.take();
        if let Some(character) = &detached {
            debug!("Detached character {} ({})", character.asset, character.root.uuid);
        }
        detached
    }

    pub fn character(&self) -> Option<&ActiveCharacter> {
        self.character.as_ref()
    }

    pub fn character_mut(&mut self) -> Option<&mut ActiveCharacter> {
        self.character.as_mut()
    }

    pub fn character_count(&self) -> usize {
        usize::from(self.character.is_some())
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new(Environment::default())
    }
}
