//! Per-client log routing.

use tracing::level_filters::LevelFilter;
use tracing::Dispatch;

/// Log sink owned by a client.
///
/// Events are emitted with the client's own dispatch as the scoped default,
/// so a process-wide subscriber is neither required nor replaced.
#[derive(Clone)]
pub(crate) struct Logger {
    dispatch: Dispatch,
}

impl Logger {
    /// Uses `dispatch` when given, otherwise a text logger on stderr.
    pub(crate) fn new(dispatch: Option<Dispatch>, debug: bool) -> Self {
        let dispatch = dispatch.unwrap_or_else(|| {
            let level = if debug {
                LevelFilter::DEBUG
            } else {
                LevelFilter::INFO
            };
            Dispatch::new(
                tracing_subscriber::fmt()
                    .with_writer(std::io::stderr)
                    .with_max_level(level)
                    .finish(),
            )
        });
        Self { dispatch }
    }

    /// Runs `f` with this logger as the active dispatch.
    pub(crate) fn scope<R>(&self, f: impl FnOnce() -> R) -> R {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}
