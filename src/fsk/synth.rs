use std::io::Write;

use crate::config::ModulationParams;
use crate::error::{TxError, TxResult};
use crate::fsk::table::WaveTable;
use crate::tx::BitSink;

/// FSK quadrature sample synthesizer.
///
/// Each emitted bit becomes `cycles_per_bit` interleaved (I, Q) byte pairs:
/// I is the sine table entry for bit=1 and its negation for bit=0, Q is the
/// cosine entry unconditionally. The phase cursor is shared across bits, so
/// the waveform is phase-continuous instead of restarting at every bit edge.
///
/// After a write error the cursor and byte count are indeterminate; the
/// session must be abandoned, not resumed.
pub struct FskSynthesizer<W: Write> {
    params: ModulationParams,
    table: WaveTable,
    cursor: usize,
    samples_written: u64,
    writer: W,
}

impl<W: Write> FskSynthesizer<W> {
    pub fn new(params: ModulationParams, writer: W) -> TxResult<Self> {
        let table = WaveTable::build(params.divider, params.amplitude)?;
        Ok(Self {
            params,
            table,
            cursor: 0,
            samples_written: 0,
            writer,
        })
    }

    pub fn params(&self) -> &ModulationParams {
        &self.params
    }

    /// Total sample pairs written so far (two bytes each).
    pub fn samples_written(&self) -> u64 {
        self.samples_written
    }

    /// Current phase cursor, in [0, divider).
    pub fn phase(&self) -> usize {
        self.cursor
    }

    /// Flush the underlying stream and hand it back.
    pub fn finish(mut self) -> TxResult<W> {
        self.writer
            .flush()
            .map_err(|e| TxError::io("flush sample stream", e))?;
        Ok(self.writer)
    }
}

impl<W: Write> BitSink for FskSynthesizer<W> {
    fn emit(&mut self, bit: bool) -> TxResult<()> {
        for _ in 0..self.params.cycles_per_bit {
            let i = if bit {
                self.table.sine(self.cursor)
            } else {
                -self.table.sine(self.cursor)
            };
            let q = self.table.cosine(self.cursor);
            self.writer
                .write_all(&[i as u8, q as u8])
                .map_err(|e| TxError::io("write sample pair", e))?;

            self.cursor += 1;
            if self.cursor == self.params.divider {
                self.cursor = 0;
            }
            self.samples_written += 1;
        }
        Ok(())
    }
}
