use std::io;

pub type TxResult<T> = Result<T, TxError>;

/// Transmission errors. Every variant is fatal to the in-progress session:
/// nothing is retried, the caller aborts the whole transmission.
#[derive(Debug, thiserror::Error)]
pub enum TxError {
    #[error("invalid parameters: {0}")]
    Config(String),

    #[error("allocation failed for {what} ({len} entries)")]
    Allocation { what: &'static str, len: usize },

    /// I/O failure, tagged with the failing operation so the operator can
    /// tell a sample-file write from a control-line toggle.
    #[error("[{op}] {source}")]
    Io {
        op: &'static str,
        #[source]
        source: io::Error,
    },
}

impl TxError {
    pub fn io(op: &'static str, source: io::Error) -> Self {
        TxError::Io { op, source }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        TxError::Config(msg.into())
    }
}
