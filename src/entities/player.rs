use glam::DVec2;

use super::attack::{AttackState, Direction};

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub position: DVec2,
    pub attack: AttackState,
}

impl Player {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            position: DVec2::new(x, y),
            attack: AttackState::Idle,
        }
    }

    /// Translates the player by `speed` along `direction`
    pub fn step(&mut self, direction: Direction, speed: f64) {
        self.position += direction.unit() * speed;
    }

    /// Centre of the active attack's hit area, `reach` units out from the player
    pub fn attack_center(&self, reach: f64) -> Option<DVec2> {
        match self.attack {
            AttackState::Idle => None,
            AttackState::Attacking { direction, .. } => {
                Some(self.position + direction.unit() * reach)
            }
        }
    }
}
