use glam::DVec2;

use crate::scheduler::Millis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Left,
        Direction::Down,
        Direction::Right,
    ];

    /// Unit vector in screen space (y grows downward)
    pub fn unit(&self) -> DVec2 {
        match self {
            Direction::Up => DVec2::NEG_Y,
            Direction::Left => DVec2::NEG_X,
            Direction::Down => DVec2::Y,
            Direction::Right => DVec2::X,
        }
    }
}

/// Melee attack state machine: `Idle` until an attack key is pressed,
/// `Attacking` until the attack has aged past its duration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AttackState {
    #[default]
    Idle,
    Attacking {
        direction: Direction,
        /// Milliseconds since the attack was triggered
        time_since: Millis,
    },
}

impl AttackState {
    pub fn is_attacking(&self) -> bool {
        matches!(self, AttackState::Attacking { .. })
    }

    /// Starts a new attack. Ignored while one is already in progress.
    /// Returns whether a new attack started.
    pub fn trigger(&mut self, direction: Direction) -> bool {
        match self {
            AttackState::Idle => {
                *self = AttackState::Attacking {
                    direction,
                    time_since: 0.0,
                };
                true
            }
            AttackState::Attacking { .. } => false,
        }
    }

    /// Ages the attack by `dt`, returning to `Idle` once it reaches `duration`
    pub fn advance(&mut self, dt: Millis, duration: Millis) {
        if let AttackState::Attacking { time_since, .. } = self {
            *time_since += dt;
            if *time_since >= duration {
                *self = AttackState::Idle;
            }
        }
    }

    /// Remaining opacity of the attack's effect, fading linearly from 1 to 0
    pub fn fade(&self, duration: Millis) -> Option<f64> {
        match self {
            AttackState::Idle => None,
            AttackState::Attacking { time_since, .. } => Some(1.0 - time_since / duration),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_from_idle() {
        let mut attack = AttackState::default();
        assert!(attack.trigger(Direction::Left));
        assert_eq!(
            attack,
            AttackState::Attacking {
                direction: Direction::Left,
                time_since: 0.0
            }
        );
    }

    #[test]
    fn test_trigger_while_attacking_is_ignored() {
        let mut attack = AttackState::default();
        attack.trigger(Direction::Up);
        attack.advance(100.0, 300.0);

        assert!(!attack.trigger(Direction::Down));
        assert_eq!(
            attack,
            AttackState::Attacking {
                direction: Direction::Up,
                time_since: 100.0
            }
        );
    }

    #[test]
    fn test_attack_expires_at_duration() {
        let mut attack = AttackState::default();
        attack.trigger(Direction::Right);

        attack.advance(150.0, 300.0);
        assert!(attack.is_attacking());
        attack.advance(149.0, 300.0);
        assert!(attack.is_attacking());
        attack.advance(1.0, 300.0);
        assert_eq!(attack, AttackState::Idle);
    }

    #[test]
    fn test_advance_idle_is_noop() {
        let mut attack = AttackState::Idle;
        attack.advance(1000.0, 300.0);
        assert_eq!(attack, AttackState::Idle);
    }

    #[test]
    fn test_fade() {
        let mut attack = AttackState::Idle;
        assert_eq!(attack.fade(300.0), None);

        attack.trigger(Direction::Down);
        assert_eq!(attack.fade(300.0), Some(1.0));
        attack.advance(150.0, 300.0);
        assert_eq!(attack.fade(300.0), Some(0.5));
    }

    #[test]
    fn test_direction_units() {
        assert_eq!(Direction::Up.unit(), DVec2::new(0.0, -1.0));
        assert_eq!(Direction::Left.unit(), DVec2::new(-1.0, 0.0));
        assert_eq!(Direction::Down.unit(), DVec2::new(0.0, 1.0));
        assert_eq!(Direction::Right.unit(), DVec2::new(1.0, 0.0));
    }

    // Property-based tests
    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_time_since_stays_below_duration(
                steps in prop::collection::vec(0.0f64..120.0, 0..40),
                direction in prop::sample::select(Direction::ALL.to_vec())
            ) {
                let mut attack = AttackState::default();
                attack.trigger(direction);
                let mut total = 0.0;

                for dt in steps {
                    attack.advance(dt, 300.0);
                    total += dt;
                    match attack {
                        AttackState::Attacking { time_since, .. } => {
                            prop_assert!((0.0..300.0).contains(&time_since));
                            prop_assert!(total < 300.0);
                        }
                        AttackState::Idle => prop_assert!(total >= 300.0),
                    }
                }
            }
        }
    }
}
