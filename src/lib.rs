// Library exports for testing
pub use app::App;
pub use config::{Bindings, DirectionKeys, GameConfig};
pub use entities::{AttackState, Direction, Enemy, Player};
pub use error::InitializationError;
pub use input::{HeldKeys, InputManager, KeyInput};
pub use render::{DisplayList, DrawCommand, Rgba, Surface, draw};
pub use scheduler::{Clock, FrameHost, FrameScheduler, Millis, SystemClock};
pub use session::Session;
pub use world::World;

pub mod app;
pub mod config;
pub mod entities;
pub mod error;
pub mod input;
pub mod logging;
pub mod render;
pub mod scheduler;
pub mod session;
pub mod terminal;
pub mod world;
