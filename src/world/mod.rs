pub mod animation;
pub mod character;
pub mod events;
pub mod input;
pub mod obstacles;
pub mod physics;
pub mod simulation;

pub use character::ActiveCharacter;
pub use events::{StageEvent, SwapReport};
pub use input::MoveKey;
pub use obstacles::{ConeShape, Obstacle, ObstacleField};
pub use simulation::Simulation;
