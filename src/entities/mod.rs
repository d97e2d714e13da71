mod attack;
mod enemy;
mod player;

// Re-export all public types
pub use attack::{AttackState, Direction};
pub use enemy::Enemy;
pub use player::Player;
