//! Error type shared by every stage of the calculation.
//!
//! Every variant is fatal: the tool performs one computation and has no
//! degraded mode, so callers propagate with `?` up to `main`.

use std::io;

/// Errors raised while reading input, building the address map, scanning or
/// writing results.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A subnet token without a `/`.
    #[error("every subnet token must look like \"x.x.x.x/xx\", got {token:?}")]
    MissingPrefix { token: String },

    /// A token with a `/` whose address or prefix does not parse.
    #[error("invalid CIDR {token:?}: {reason}")]
    InvalidCidr { token: String, reason: String },

    /// The address bitmap could not be allocated.
    #[error("not enough free memory for the {bytes}-byte address bitmap")]
    OutOfMemory { bytes: usize },

    /// Bad launch parameters.
    #[error("{0}")]
    Config(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("can't create worker thread {index}: {source}")]
    ThreadSpawn {
        index: usize,
        #[source]
        source: io::Error,
    },

    #[error("worker thread {index} panicked")]
    WorkerPanicked { index: usize },

    /// A trie reached a state insert can never produce.
    #[error("prefix trie invariant violated: {0}")]
    Invariant(String),

    #[error("can't initialise logging: {0}")]
    Logging(String),

    /// SIGINT or SIGTERM arrived before the run finished.
    #[error("{name} received")]
    Signal { name: &'static str },
}

impl Error {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        Error::Io {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
