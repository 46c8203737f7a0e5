/// Crate-wide error type.
///
/// Gameplay outcomes (off-board moves, burns, game over) are not errors;
/// only a board that cannot host a required entity, or a terminal failure, is.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("no free cell for {what} on a {width}x{height} board")]
    BoardFull {
        what: &'static str,
        width: usize,
        height: usize,
    },

    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
