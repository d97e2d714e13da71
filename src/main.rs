use arena::terminal::{self, TerminalHost};
use arena::{App, GameConfig, SystemClock, logging};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let log_path = logging::init()?;
    tracing::info!(log = %log_path.display(), "Starting arena");

    let mut host = TerminalHost::init()?;
    let result = host.surface_size().and_then(|(width, height)| {
        App::new(
            GameConfig::default(),
            StdRng::from_os_rng(),
            SystemClock::new(),
            width,
            height,
        )
        .run(&mut host)
    });

    // Cleanup
    terminal::finish_session(result, || host.restore()).map(|_| ())
}
