use glam::DVec2;

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub position: DVec2,
}

impl Enemy {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            position: DVec2::new(x, y),
        }
    }

    /// Steps `speed` units straight toward `target`.
    ///
    /// An enemy already sitting on the target has arrived and stays put.
    pub fn home_toward(&mut self, target: DVec2, speed: f64) {
        let delta = self.position - target;
        let distance = delta.length();
        if distance == 0.0 {
            return;
        }
        self.position -= delta * speed / distance;
    }

    pub fn distance_to(&self, point: DVec2) -> f64 {
        self.position.distance(point)
    }
}
