// Backend-independent bit sequencing.
// The driver pulls 32-bit codewords and pushes single bits into whichever
// BitSink the session selected; it never looks inside the backend.

pub mod driver;
pub mod source;

pub use driver::transmit;
pub use source::{CodewordSource, Interruptible, WordStream};

use crate::error::TxResult;

/// The one operation both transmission backends implement.
pub trait BitSink {
    fn emit(&mut self, bit: bool) -> TxResult<()>;
}
