// Real-time keying over a serial port's control lines.
// No bytes cross the wire; the data and PTT signals ride on DTR/RTS.

pub mod clock;
pub mod keyer;
pub mod lines;

pub use clock::{MonotonicClock, SimClock, TickClock};
pub use keyer::{KeyerStats, SerialKeyer};
pub use lines::{ControlLines, Line, LineAction, LineMap, RecordingLines, SerialLines};
