use crate::error::{TxError, TxResult};
use crate::utils::consts::*;

/// Session configuration, as handed over by the CLI layer.
#[derive(Clone, Debug)]
pub struct TxConfig {
    pub sample_rate: u32, // samples per second
    pub deviation: u32,   // frequency deviation [Hz]
    pub bit_rate: u32,    // bits per second
    pub amplitude: u32,   // peak I/Q amplitude, clamped to MAX_AMPLITUDE
    pub invert: bool,     // invert every transmitted bit

    // serial backend only
    pub ptt_lead_ms: u64, // delay between PTT assert and the first bit
    pub swap_lines: bool, // data on RTS / PTT on DTR instead of the default
    pub invert_ptt: bool, // PTT active-low
}

impl Default for TxConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            deviation: DEFAULT_DEVIATION,
            bit_rate: DEFAULT_BAUD_RATE,
            amplitude: DEFAULT_AMPLITUDE,
            invert: false,
            ptt_lead_ms: 0,
            swap_lines: false,
            invert_ptt: false,
        }
    }
}

/// Derived modulation parameters, computed once at session start and
/// immutable for the session's lifetime.
#[derive(Clone, Debug)]
pub struct ModulationParams {
    pub sample_rate: u32,
    pub deviation: u32,
    pub bit_rate: u32,
    pub amplitude: i8,

    /// Samples per full oscillation cycle: round(sample_rate / deviation).
    pub divider: usize,
    pub divider_exact: f64,
    /// Samples emitted per transmitted bit: round(sample_rate / bit_rate).
    pub cycles_per_bit: usize,
    pub cycles_per_bit_exact: f64,
}

impl ModulationParams {
    pub fn derive(cfg: &TxConfig) -> TxResult<Self> {
        if cfg.sample_rate == 0 || cfg.deviation == 0 || cfg.bit_rate == 0 {
            return Err(TxError::config(
                "sample rate, deviation and bit rate must all be positive",
            ));
        }

        let divider_exact = cfg.sample_rate as f64 / cfg.deviation as f64;
        let divider = divider_exact.round() as usize;
        let cycles_per_bit_exact = cfg.sample_rate as f64 / cfg.bit_rate as f64;
        let cycles_per_bit = cycles_per_bit_exact.round() as usize;

        if divider < 1 {
            return Err(TxError::config(format!(
                "deviation {} too large for sample rate {} (divider is zero)",
                cfg.deviation, cfg.sample_rate
            )));
        }
        if cycles_per_bit < 1 {
            return Err(TxError::config(format!(
                "bit rate {} too large for sample rate {} (no samples per bit)",
                cfg.bit_rate, cfg.sample_rate
            )));
        }

        // The sine table is written through a signed 8-bit conversion;
        // anything above MAX_AMPLITUDE would wrap, so clamp here.
        let amplitude = cfg.amplitude.min(MAX_AMPLITUDE as u32) as i8;

        Ok(Self {
            sample_rate: cfg.sample_rate,
            deviation: cfg.deviation,
            bit_rate: cfg.bit_rate,
            amplitude,
            divider,
            divider_exact,
            cycles_per_bit,
            cycles_per_bit_exact,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_parameters_match_classic_pocsag_setup() {
        let params = ModulationParams::derive(&TxConfig::default()).unwrap();
        assert_eq!(params.divider, 1778); // round(8000000 / 4500)
        assert_eq!(params.cycles_per_bit, 6667); // round(8000000 / 1200)
        assert_eq!(params.amplitude, 64);
    }

    #[test]
    fn zero_inputs_are_rejected() {
        for broken in [
            TxConfig { sample_rate: 0, ..TxConfig::default() },
            TxConfig { deviation: 0, ..TxConfig::default() },
            TxConfig { bit_rate: 0, ..TxConfig::default() },
        ] {
            assert!(ModulationParams::derive(&broken).is_err());
        }
    }

    #[test]
    fn amplitude_is_clamped_to_i8_range() {
        let cfg = TxConfig { amplitude: 500, ..TxConfig::default() };
        let params = ModulationParams::derive(&cfg).unwrap();
        assert_eq!(params.amplitude, 127);
    }

    #[test]
    fn degenerate_bit_rate_is_rejected() {
        // cycles_per_bit would round to zero
        let cfg = TxConfig {
            sample_rate: 1000,
            bit_rate: 1_000_000,
            ..TxConfig::default()
        };
        assert!(ModulationParams::derive(&cfg).is_err());
    }
}
