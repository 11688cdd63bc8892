//! Termination signals as fatal errors.
//!
//! The calculation runs to completion or not at all, so SIGINT and SIGTERM
//! are reported like any other fatal [`Error`] instead of killing the process
//! silently.

use crate::error::{Error, Result};
use tokio::signal::unix::{signal, Signal, SignalKind};

/// Listeners for the signals that abort a run.
pub struct ShutdownSignals {
    interrupt: Signal,
    terminate: Signal,
}

fn listen(kind: SignalKind, name: &str) -> Result<Signal> {
    signal(kind).map_err(|e| Error::io(format!("can't listen for {name}"), e))
}

impl ShutdownSignals {
    /// Install the handlers. Must be called inside a tokio runtime.
    pub fn listen() -> Result<ShutdownSignals> {
        Ok(ShutdownSignals {
            interrupt: listen(SignalKind::interrupt(), "SIGINT")?,
            terminate: listen(SignalKind::terminate(), "SIGTERM")?,
        })
    }

    /// Wait for the first signal and return it as [`Error::Signal`].
    pub async fn recv(&mut self) -> Error {
        let name = tokio::select! {
            _ = self.interrupt.recv() => "SIGINT",
            _ = self.terminate.recv() => "SIGTERM",
        };
        Error::Signal { name }
    }
}
