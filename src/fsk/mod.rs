// FSK quadrature synthesis for SDR playback.
// One sine/cosine cycle is tabulated up front; the synthesizer walks the
// table with a phase cursor that survives bit boundaries.

pub mod synth;
pub mod table;

pub use synth::FskSynthesizer;
pub use table::WaveTable;
