use std::time::Instant;

/// Elapsed time between frames, in milliseconds.
pub type Millis = f64;

/// Callback run once when the scheduler starts (or immediately, if registered afterwards)
pub type Setup<T> = Box<dyn FnMut(&mut T)>;

/// Callback run every frame with the time elapsed since the previous frame
pub type Update<T> = Box<dyn FnMut(&mut T, Millis)>;

/// Source of frame timestamps
pub trait Clock {
    /// Current timestamp in milliseconds. Only differences between calls are meaningful.
    fn now(&self) -> Millis;
}

/// Wall clock backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Millis {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// The host that paces frames, the way a browser drives `requestAnimationFrame`.
///
/// Between frames the host is free to dispatch input into the context.
pub trait FrameHost<T> {
    /// Blocks until the next frame is due.
    /// Returns `false` once the host has been torn down and no more frames will follow.
    fn request_frame(&mut self, context: &mut T) -> color_eyre::Result<bool>;
}

/// Drives registered setup and update callbacks from a host clock.
///
/// The scheduler owns the context every callback operates on, so callbacks
/// never have to reach for shared globals.
pub struct FrameScheduler<T, C = SystemClock> {
    context: T,
    clock: C,
    setups: Vec<Setup<T>>,
    updates: Vec<Update<T>>,
    started: bool,
    last_frame: Millis,
}

impl<T, C: Clock> FrameScheduler<T, C> {
    pub fn new(context: T, clock: C) -> Self {
        Self {
            context,
            clock,
            setups: Vec::new(),
            updates: Vec::new(),
            started: false,
            last_frame: 0.0,
        }
    }

    /// Appends a setup callback. If the scheduler has already started it runs right away.
    pub fn register_setup(&mut self, setup: impl FnMut(&mut T) + 'static) {
        let mut setup: Setup<T> = Box::new(setup);
        if self.started {
            setup(&mut self.context);
        }
        self.setups.push(setup);
    }

    /// Appends a per-frame update callback
    pub fn register_update(&mut self, update: impl FnMut(&mut T, Millis) + 'static) {
        self.updates.push(Box::new(update));
    }

    /// Runs every setup once in registration order and begins timing frames
    pub fn start(&mut self) {
        for setup in &mut self.setups {
            setup(&mut self.context);
        }
        self.started = true;
        self.last_frame = self.clock.now();
        tracing::debug!(
            setups = self.setups.len(),
            updates = self.updates.len(),
            "Frame scheduler started"
        );
    }

    /// Advances one frame, passing the elapsed time to every update callback.
    /// Returns the elapsed time.
    pub fn tick(&mut self) -> Millis {
        let now = self.clock.now();
        let elapsed = now - self.last_frame;

        for update in &mut self.updates {
            update(&mut self.context, elapsed);
        }

        self.last_frame = now;
        elapsed
    }

    /// Starts the scheduler if needed and ticks once per host frame until the host goes away
    pub fn run<H: FrameHost<T>>(&mut self, host: &mut H) -> color_eyre::Result<()> {
        if !self.started {
            self.start();
        }

        while host.request_frame(&mut self.context)? {
            self.tick();
        }

        tracing::debug!("Frame host torn down, leaving frame loop");
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn context(&self) -> &T {
        &self.context
    }

    pub fn into_context(self) -> T {
        self.context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// Clock whose reading is set by the test
    #[derive(Clone, Default)]
    struct ManualClock(Rc<Cell<Millis>>);

    impl ManualClock {
        fn set(&self, now: Millis) {
            self.0.set(now);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Millis {
            self.0.get()
        }
    }

    /// Host that hands out a fixed number of frames, advancing the clock before each one
    struct ScriptedHost {
        clock: ManualClock,
        timestamps: Vec<Millis>,
    }

    impl FrameHost<Vec<Millis>> for ScriptedHost {
        fn request_frame(&mut self, _context: &mut Vec<Millis>) -> color_eyre::Result<bool> {
            if self.timestamps.is_empty() {
                return Ok(false);
            }
            self.clock.set(self.timestamps.remove(0));
            Ok(true)
        }
    }

    #[test]
    fn test_setups_run_in_registration_order_on_start() {
        let mut scheduler = FrameScheduler::new(Vec::<&str>::new(), ManualClock::default());
        scheduler.register_setup(|log| log.push("first"));
        scheduler.register_setup(|log| log.push("second"));

        assert!(scheduler.context().is_empty());
        scheduler.start();

        assert!(scheduler.is_started());
        assert_eq!(scheduler.context(), &vec!["first", "second"]);
    }

    #[test]
    fn test_late_setup_runs_exactly_once() {
        let clock = ManualClock::default();
        let mut scheduler = FrameScheduler::new(0u32, clock.clone());
        scheduler.start();

        scheduler.register_setup(|count| *count += 1);
        assert_eq!(*scheduler.context(), 1);

        for now in [16.0, 32.0, 48.0] {
            clock.set(now);
            scheduler.tick();
        }
        assert_eq!(*scheduler.context(), 1);
    }

    #[test]
    fn test_setup_before_start_is_deferred() {
        let mut scheduler = FrameScheduler::new(0u32, ManualClock::default());
        scheduler.register_setup(|count| *count += 1);
        assert_eq!(*scheduler.context(), 0);
    }

    #[test]
    fn test_updates_receive_elapsed_time() {
        let clock = ManualClock::default();
        clock.set(1000.0);
        let mut scheduler = FrameScheduler::new(Vec::<Millis>::new(), clock.clone());
        scheduler.register_update(|deltas, dt| deltas.push(dt));
        scheduler.start();

        clock.set(1016.0);
        assert_eq!(scheduler.tick(), 16.0);
        clock.set(1050.0);
        assert_eq!(scheduler.tick(), 34.0);

        assert_eq!(scheduler.context(), &vec![16.0, 34.0]);
    }

    #[test]
    fn test_updates_run_in_order_and_duplicates_run_twice() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = FrameScheduler::new((), ManualClock::default());

        for name in ["a", "b", "a"] {
            let order = Rc::clone(&order);
            scheduler.register_update(move |_, _| order.borrow_mut().push(name));
        }
        scheduler.start();
        scheduler.tick();

        assert_eq!(*order.borrow(), vec!["a", "b", "a"]);
    }

    #[test]
    fn test_run_ticks_until_host_is_torn_down() {
        let clock = ManualClock::default();
        let mut host = ScriptedHost {
            clock: clock.clone(),
            timestamps: vec![10.0, 25.0, 45.0],
        };
        let mut scheduler = FrameScheduler::new(Vec::<Millis>::new(), clock);
        scheduler.register_update(|deltas, dt| deltas.push(dt));

        scheduler.run(&mut host).unwrap();

        assert!(scheduler.is_started());
        assert_eq!(scheduler.into_context(), vec![10.0, 15.0, 20.0]);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
