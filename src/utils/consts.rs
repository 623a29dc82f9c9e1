/// 日志级别（可被 RUST_LOG 覆盖）
pub const LOG_LEVEL: &str = "info";

// ============================================================================
// Modulation defaults (classic POCSAG over a HackRF-style SDR)
// ============================================================================

/// Default sample rate (samples per second); consult the SDR docs for
/// the optimal value.
pub const DEFAULT_SAMPLE_RATE: u32 = 8_000_000;

/// Default POCSAG baud rate; common values are 512, 1200 and 2400.
pub const DEFAULT_BAUD_RATE: u32 = 1200;

/// Default frequency deviation (Hz)
pub const DEFAULT_DEVIATION: u32 = 4500;

/// Default peak I/Q amplitude
pub const DEFAULT_AMPLITUDE: u32 = 0x40;

/// Hard ceiling for the waveform amplitude. Table entries are signed 8-bit
/// and bit=0 negates them, so 127 keeps both polarities representable.
pub const MAX_AMPLITUDE: i8 = 127;

// ============================================================================
// Serial (COM port) keying
// ============================================================================

/// Line rate configured on the opened port. No data bytes are ever sent;
/// only the DTR/RTS control lines are toggled.
pub const SERIAL_BAUD: u32 = 115_200;

// ============================================================================
// Diagnostics
// ============================================================================

/// Codeword hex-dump grouping: the preamble goes on the first row,
/// then one batch (sync + 16 codewords) per row.
pub const LOG_WORDS_LEADER: usize = 18;
pub const LOG_WORDS_PER_ROW: usize = 17;
