use rand::Rng;
use rand::rngs::StdRng;

use crate::config::GameConfig;
use crate::entities::Player;
use crate::input::{HeldKeys, KeyInput};
use crate::render::{self, DisplayList, Surface};
use crate::scheduler::Millis;
use crate::world::World;

/// The single owner of everything a running game touches
pub struct Session<R = StdRng> {
    pub world: World,
    pub held: HeldKeys,
    pub surface: DisplayList,
    rng: R,
    running: bool,
}

impl<R: Rng> Session<R> {
    pub fn new(config: GameConfig, rng: R) -> Self {
        Self {
            world: World::new(0.0, 0.0, config),
            held: HeldKeys::new(),
            surface: DisplayList::default(),
            rng,
            running: true,
        }
    }

    /// Sizes the surface and world, then places a fresh player in the centre
    pub fn setup(&mut self, width: f64, height: f64) {
        self.resize(width, height);
        self.world.player = Player::new(width / 2.0, height / 2.0);
        self.world.enemies.clear();
        tracing::info!(width, height, "Session set up");
    }

    /// Resizes surface and world if the dimensions changed
    pub fn resize(&mut self, width: f64, height: f64) {
        if self.surface.size() == (width, height) {
            return;
        }
        tracing::warn!(width, height, "Expensive resize operation");
        self.surface.resize(width, height);
        self.world.resize(width, height);
    }

    /// One frame: advance the simulation, then redraw the surface
    pub fn frame(&mut self, dt: Millis) {
        self.world.update(dt, &self.held, &mut self.rng);
        render::draw(&self.world, &mut self.surface);
    }

    /// Applies a key signal from the input collaborator
    pub fn handle_key(&mut self, input: KeyInput) {
        match input {
            KeyInput::Down { key, repeat } => self.key_down(key, repeat),
            KeyInput::Up { key } => self.key_up(key),
            KeyInput::Quit => self.quit(),
        }
    }

    /// Attack keys act on the press edge only; auto-repeat just keeps the key held
    pub fn key_down(&mut self, key: char, repeat: bool) {
        if !repeat
            && let Some(direction) = self.world.config().bindings.attack.direction_of(key)
        {
            self.world.trigger_attack(direction);
        }
        self.held.press(key);
    }

    pub fn key_up(&mut self, key: char) {
        self.held.release(key);
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}
