use glam::DVec2;
use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{Direction, Enemy, Player};
use crate::input::HeldKeys;
use crate::scheduler::Millis;

/// All simulation state: the player, the enemies and the bounds they live in
#[derive(Debug, Clone)]
pub struct World {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    width: f64,
    height: f64,
    config: GameConfig,
}

impl World {
    /// Creates an empty world with the player in the centre
    pub fn new(width: f64, height: f64, config: GameConfig) -> Self {
        Self {
            player: Player::new(width / 2.0, height / 2.0),
            enemies: Vec::new(),
            width,
            height,
            config,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Changes the spawn bounds. Entities already placed are left where they are.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Starts an attack in `direction` unless one is already in progress
    pub fn trigger_attack(&mut self, direction: Direction) -> bool {
        let started = self.player.attack.trigger(direction);
        if started {
            tracing::debug!(?direction, "Attack triggered");
        }
        started
    }

    /// Advances the simulation by one frame.
    ///
    /// Steps run in a fixed order since later steps read what earlier ones wrote:
    /// attack aging, spawning, player movement, enemy homing, attack resolution.
    pub fn update<R: Rng + ?Sized>(&mut self, dt: Millis, held: &HeldKeys, rng: &mut R) {
        self.player.attack.advance(dt, self.config.attack_duration);
        self.top_up_enemies(rng);
        self.move_player(held);
        self.home_enemies();
        self.resolve_attack();
    }

    fn top_up_enemies<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        while self.enemies.len() < self.config.enemy_count {
            let x = sample_axis(rng, self.width);
            let y = sample_axis(rng, self.height);
            self.enemies.push(Enemy::new(x, y));
        }
    }

    /// Each held move key contributes its own step; diagonals are not normalised
    fn move_player(&mut self, held: &HeldKeys) {
        let keys = self.config.bindings.movement;
        for direction in [
            Direction::Left,
            Direction::Right,
            Direction::Up,
            Direction::Down,
        ] {
            if held.is_held(keys.key_for(direction)) {
                self.player.step(direction, self.config.move_speed);
            }
        }
    }

    fn home_enemies(&mut self) {
        let target = self.player.position;
        for enemy in &mut self.enemies {
            enemy.home_toward(target, self.config.enemy_speed);
        }
    }

    /// Removes every enemy inside the active attack's hit area. Returns how many were removed.
    fn resolve_attack(&mut self) -> usize {
        let Some(center) = self.attack_center() else {
            return 0;
        };
        let hit_distance = self.config.hit_distance();

        let before = self.enemies.len();
        self.enemies.retain(|enemy| enemy.distance_to(center) >= hit_distance);
        let removed = before - self.enemies.len();

        if removed > 0 {
            tracing::trace!(removed, "Enemies eliminated");
        }
        removed
    }

    /// Centre of the active attack's hit area
    pub fn attack_center(&self) -> Option<DVec2> {
        self.player.attack_center(self.config.attack_radius)
    }
}

/// Uniform sample in `[0, extent)`; degenerate extents collapse to the origin
fn sample_axis<R: Rng + ?Sized>(rng: &mut R, extent: f64) -> f64 {
    let value = rng.random::<f64>() * extent;
    if (0.0..extent).contains(&value) {
        value
    } else {
        0.0
    }
}
