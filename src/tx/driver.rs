use tracing::debug;

use crate::error::TxResult;
use crate::tx::{BitSink, CodewordSource};
use crate::utils::consts::{LOG_WORDS_LEADER, LOG_WORDS_PER_ROW};

/// Drive a codeword stream into a transmission backend.
///
/// Each codeword is walked MSB-first; every bit is XORed with `invert` and
/// handed to the sink. The first sink failure aborts immediately, even
/// mid-codeword: the caller treats the whole transmission as failed, so a
/// partial codeword on the air does not matter.
///
/// Returns the number of bits emitted.
pub fn transmit<S, K>(source: &mut S, sink: &mut K, invert: bool) -> TxResult<u64>
where
    S: CodewordSource,
    K: BitSink,
{
    let mut bits_emitted: u64 = 0;
    let mut dump = HexDump::new();

    while let Some(codeword) = source.next_codeword() {
        dump.push(codeword);
        let mut mask: u32 = 0x8000_0000;
        while mask != 0 {
            let bit = ((codeword & mask) != 0) ^ invert;
            sink.emit(bit)?;
            bits_emitted += 1;
            mask >>= 1;
        }
    }
    dump.flush();

    Ok(bits_emitted)
}

/// Debug-level hex dump of the outgoing codewords, grouped into rows the
/// way the stream is structured on the air (preamble row, then one batch
/// per row). Purely cosmetic.
struct HexDump {
    row: Vec<String>,
    words_seen: usize,
}

impl HexDump {
    fn new() -> Self {
        Self { row: Vec::new(), words_seen: 0 }
    }

    fn push(&mut self, codeword: u32) {
        self.row.push(format!("{codeword:08X}"));
        self.words_seen += 1;
        let row_len = if self.words_seen <= LOG_WORDS_LEADER {
            LOG_WORDS_LEADER
        } else {
            LOG_WORDS_PER_ROW
        };
        if self.row.len() == row_len {
            self.flush();
        }
    }

    fn flush(&mut self) {
        if !self.row.is_empty() {
            debug!("{}", self.row.join(" "));
            self.row.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{TxError, TxResult};
    use crate::tx::WordStream;

    /// Records every bit it is asked to emit; can be told to fail after a
    /// fixed number of bits.
    struct BitLog {
        bits: Vec<bool>,
        fail_after: Option<usize>,
    }

    impl BitLog {
        fn new() -> Self {
            Self { bits: Vec::new(), fail_after: None }
        }
    }

    impl BitSink for BitLog {
        fn emit(&mut self, bit: bool) -> TxResult<()> {
            if let Some(limit) = self.fail_after {
                if self.bits.len() >= limit {
                    return Err(TxError::io(
                        "emit",
                        std::io::Error::new(std::io::ErrorKind::Other, "line stuck"),
                    ));
                }
            }
            self.bits.push(bit);
            Ok(())
        }
    }

    #[test]
    fn bits_come_out_msb_first() {
        let mut sink = BitLog::new();
        let mut src = WordStream::new(vec![0x8000_0001]);
        transmit(&mut src, &mut sink, false).unwrap();
        assert_eq!(sink.bits.len(), 32);
        assert!(sink.bits[0]);
        assert!(sink.bits[31]);
        assert!(sink.bits[1..31].iter().all(|&b| !b));
    }

    #[test]
    fn all_zero_codeword_with_and_without_inversion() {
        let mut plain = BitLog::new();
        transmit(&mut WordStream::new(vec![0]), &mut plain, false).unwrap();
        assert!(plain.bits.iter().all(|&b| !b));

        let mut inverted = BitLog::new();
        transmit(&mut WordStream::new(vec![0]), &mut inverted, true).unwrap();
        assert!(inverted.bits.iter().all(|&b| b));
    }

    #[test]
    fn inversion_complements_every_bit() {
        let stream = vec![0xDEAD_BEEF, 0x1234_5678, 0xAAAA_AAAA];
        let mut a = BitLog::new();
        let mut b = BitLog::new();
        transmit(&mut WordStream::new(stream.clone()), &mut a, false).unwrap();
        transmit(&mut WordStream::new(stream), &mut b, true).unwrap();
        assert_eq!(a.bits.len(), b.bits.len());
        for (x, y) in a.bits.iter().zip(&b.bits) {
            assert_eq!(*x, !*y);
        }
    }

    #[test]
    fn two_codewords_emit_exactly_64_bits() {
        let mut sink = BitLog::new();
        let n = transmit(
            &mut WordStream::new(vec![0xFFFF_0000, 0x0F0F_0F0F]),
            &mut sink,
            false,
        )
        .unwrap();
        assert_eq!(n, 64);
        assert_eq!(sink.bits.len(), 64);
    }

    #[test]
    fn sink_failure_aborts_mid_codeword() {
        let mut sink = BitLog::new();
        sink.fail_after = Some(10);
        let err = transmit(
            &mut WordStream::new(vec![0xFFFF_FFFF, 0xFFFF_FFFF]),
            &mut sink,
            false,
        );
        assert!(err.is_err());
        assert_eq!(sink.bits.len(), 10);
    }
}
