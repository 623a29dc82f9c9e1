// POCSAG codeword generation: preamble, batch framing, BCH(31,21)
// protection and alphanumeric message packing. The transmission backends
// never look at any of this; they consume the words as an opaque stream.

pub mod bch;
pub mod encoder;

pub use encoder::{
    BATCH_CODEWORDS, IDLE_WORD, PREAMBLE_WORD, PREAMBLE_WORDS, SYNC_WORD,
    Transmission,
};
