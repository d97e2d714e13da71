use color_eyre::Result;
use rand::Rng;
use rand::rngs::StdRng;

use crate::config::GameConfig;
use crate::scheduler::{Clock, FrameHost, FrameScheduler, SystemClock};
use crate::session::Session;

/// The main application: a session wired into the frame scheduler.
pub struct App<R = StdRng, C = SystemClock> {
    scheduler: FrameScheduler<Session<R>, C>,
}

impl<R: Rng + 'static, C: Clock + 'static> App<R, C> {
    /// Construct a new instance of [`App`] for a surface of `width` x `height` world units.
    pub fn new(config: GameConfig, rng: R, clock: C, width: f64, height: f64) -> Self {
        let mut scheduler = FrameScheduler::new(Session::new(config, rng), clock);
        scheduler.register_setup(move |session| session.setup(width, height));
        scheduler.register_update(|session, dt| session.frame(dt));
        Self { scheduler }
    }

    /// Run the application's main loop until the host shuts down.
    pub fn run<H: FrameHost<Session<R>>>(mut self, host: &mut H) -> Result<Session<R>> {
        self.scheduler.run(host)?;
        Ok(self.scheduler.into_context())
    }
}
