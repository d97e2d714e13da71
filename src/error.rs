//! Error types for the arena game.
//!
//! Only startup can fail; once the frame loop runs every step is infallible.

use std::io;

/// Fatal startup failure. Raised before the frame loop begins.
#[derive(thiserror::Error, Debug)]
pub enum InitializationError {
    /// There is no terminal to draw on (stdout is redirected or piped)
    #[error("Drawing surface '{0}' could not be found: stdout is not a terminal")]
    SurfaceNotFound(&'static str),

    /// The terminal exists but could not be put into a drawable state
    #[error("Could not obtain a drawing context: {0}")]
    ContextUnavailable(#[from] io::Error),
}
