use std::f64::consts::PI;

use crate::error::{TxError, TxResult};

/// One precomputed oscillation cycle of amplitude-scaled quadrature samples.
///
/// `sine[i] = amplitude * sin(2π·i/divider)` and likewise for `cosine`,
/// rounded and saturated into `i8`. Built once per session, read-only after.
#[derive(Clone, Debug)]
pub struct WaveTable {
    divider: usize,
    sine: Vec<i8>,
    cosine: Vec<i8>,
}

impl WaveTable {
    pub fn build(divider: usize, amplitude: i8) -> TxResult<Self> {
        if divider < 1 {
            return Err(TxError::config("waveform divider must be at least 1"));
        }

        let mut sine = Vec::new();
        sine.try_reserve_exact(divider)
            .map_err(|_| TxError::Allocation { what: "sine table", len: divider })?;
        let mut cosine = Vec::new();
        cosine.try_reserve_exact(divider)
            .map_err(|_| TxError::Allocation { what: "cosine table", len: divider })?;

        for i in 0..divider {
            let angle = 2.0 * PI * (i as f64) / (divider as f64);
            sine.push(quantize(amplitude as f64 * angle.sin()));
            cosine.push(quantize(amplitude as f64 * angle.cos()));
        }

        Ok(Self { divider, sine, cosine })
    }

    #[inline]
    pub fn divider(&self) -> usize {
        self.divider
    }

    #[inline]
    pub fn sine(&self, cursor: usize) -> i8 {
        self.sine[cursor]
    }

    #[inline]
    pub fn cosine(&self, cursor: usize) -> i8 {
        self.cosine[cursor]
    }
}

/// Round to the nearest integer and saturate into [-127, 127]. The lower
/// bound is -127, not -128: the synthesizer negates sine samples for a zero
/// bit, and -(-128) does not exist in i8.
fn quantize(value: f64) -> i8 {
    value.round().clamp(-127.0, 127.0) as i8
}
