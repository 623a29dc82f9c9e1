use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Pull interface for the upstream codeword stream. `None` means the stream
/// is exhausted and the transmission ends normally.
pub trait CodewordSource {
    fn next_codeword(&mut self) -> Option<u32>;
}

/// A fully materialized codeword stream.
pub struct WordStream {
    words: std::vec::IntoIter<u32>,
}

impl WordStream {
    pub fn new(words: Vec<u32>) -> Self {
        Self { words: words.into_iter() }
    }
}

impl CodewordSource for WordStream {
    fn next_codeword(&mut self) -> Option<u32> {
        self.words.next()
    }
}

/// Wraps a source so an out-of-band signal (Ctrl-C) can end the stream at
/// the next codeword boundary. The session then winds down normally, which
/// matters for the serial backend: PTT still gets released.
pub struct Interruptible<S> {
    inner: S,
    stop: Arc<AtomicBool>,
}

impl<S: CodewordSource> Interruptible<S> {
    pub fn new(inner: S, stop: Arc<AtomicBool>) -> Self {
        Self { inner, stop }
    }
}

impl<S: CodewordSource> CodewordSource for Interruptible<S> {
    fn next_codeword(&mut self) -> Option<u32> {
        if self.stop.load(Ordering::SeqCst) {
            tracing::warn!("interrupted, ending transmission early");
            return None;
        }
        self.inner.next_codeword()
    }
}
