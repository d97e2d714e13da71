use std::time::Duration;

use crate::entities::Direction;
use crate::scheduler::Millis;

/// Target time between frames (~60 FPS)
pub const FRAME_BUDGET: Duration = Duration::from_millis(16);

/// World units covered by one terminal column
pub const CELL_WIDTH: f64 = 8.0;
/// World units covered by one terminal row
pub const CELL_HEIGHT: f64 = 16.0;

/// On terminals that never report releases: how long a key counts as held
/// after a lone press while the auto-repeat delay is unknown. Outlasts common
/// initial delays (X11 defaults to 660 ms).
pub const HOLD_TIMEOUT: Duration = Duration::from_millis(700);
/// Longest interval between auto-repeat presses of a held key
pub const REPEAT_GAP: Duration = Duration::from_millis(100);
/// Jitter allowed when matching a press against the learned initial repeat delay
pub const REPEAT_DELAY_TOLERANCE: Duration = Duration::from_millis(50);

/// Environment variable naming the log file
pub const LOG_FILE_ENV: &str = "ARENA_LOG_FILE";
pub const DEFAULT_LOG_FILE: &str = "arena.log";
pub const DEFAULT_LOG_FILTER: &str = "arena=info";

/// Four keys, one per direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionKeys {
    pub up: char,
    pub left: char,
    pub down: char,
    pub right: char,
}

impl DirectionKeys {
    /// Direction bound to `key`, if any
    pub fn direction_of(&self, key: char) -> Option<Direction> {
        match key {
            k if k == self.up => Some(Direction::Up),
            k if k == self.left => Some(Direction::Left),
            k if k == self.down => Some(Direction::Down),
            k if k == self.right => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn key_for(&self, direction: Direction) -> char {
        match direction {
            Direction::Up => self.up,
            Direction::Left => self.left,
            Direction::Down => self.down,
            Direction::Right => self.right,
        }
    }
}

/// Fixed key bindings. Not remappable while the game runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bindings {
    pub movement: DirectionKeys,
    pub attack: DirectionKeys,
}

impl Default for Bindings {
    fn default() -> Self {
        Self {
            movement: DirectionKeys {
                up: 'w',
                left: 'a',
                down: 's',
                right: 'd',
            },
            attack: DirectionKeys {
                up: 'i',
                left: 'j',
                down: 'k',
                right: 'l',
            },
        }
    }
}

/// Gameplay tunables
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameConfig {
    /// Units the player moves per tick for each held move key (not scaled by frame time)
    pub move_speed: f64,
    /// Enemy population the spawner tops up to
    pub enemy_count: usize,
    /// Lifetime of a melee attack
    pub attack_duration: Millis,
    /// Units an enemy steps toward the player per tick
    pub enemy_speed: f64,
    pub enemy_radius: f64,
    pub attack_radius: f64,
    pub player_radius: f64,
    pub bindings: Bindings,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            move_speed: 2.0,
            enemy_count: 10,
            attack_duration: 300.0,
            enemy_speed: 1.5,
            enemy_radius: 8.0,
            attack_radius: 30.0,
            player_radius: 10.0,
            bindings: Bindings::default(),
        }
    }
}

impl GameConfig {
    /// Distance below which an enemy is inside the attack's hit area
    pub fn hit_distance(&self) -> f64 {
        self.attack_radius + self.enemy_radius
    }
}
