use std::io;
use std::time::Duration;

use crate::error::{TxError, TxResult};
use crate::utils::consts::SERIAL_BAUD;

/// Physical control line on the serial port.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Line {
    Dtr,
    Rts,
}

/// A resolved "set this line to this level" command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineAction {
    pub line: Line,
    pub level: bool,
}

/// The four line actions a keying session needs, resolved once from the two
/// polarity options before the session arms and never re-evaluated after.
///
/// Default mapping: data on DTR, PTT on RTS, PTT active-high.
#[derive(Clone, Copy, Debug)]
pub struct LineMap {
    pub bit_on: LineAction,
    pub bit_off: LineAction,
    pub ptt_on: LineAction,
    pub ptt_off: LineAction,
}

impl LineMap {
    pub fn resolve(swap_lines: bool, invert_ptt: bool) -> Self {
        let (bit_line, ptt_line) = if swap_lines {
            (Line::Rts, Line::Dtr)
        } else {
            (Line::Dtr, Line::Rts)
        };
        let ptt_active = !invert_ptt;
        Self {
            bit_on: LineAction { line: bit_line, level: true },
            bit_off: LineAction { line: bit_line, level: false },
            ptt_on: LineAction { line: ptt_line, level: ptt_active },
            ptt_off: LineAction { line: ptt_line, level: !ptt_active },
        }
    }
}

/// Hardware line control. Only line state changes cross this boundary; no
/// data bytes are ever written to the port.
pub trait ControlLines {
    fn set(&mut self, action: LineAction) -> io::Result<()>;
}

/// Control lines of a real serial port.
pub struct SerialLines {
    port: Box<dyn serialport::SerialPort>,
}

impl SerialLines {
    pub fn open(path: &str) -> TxResult<Self> {
        let port = serialport::new(path, SERIAL_BAUD)
            .timeout(Duration::from_millis(100))
            .open()
            .map_err(|e| {
                TxError::io(
                    "open serial port",
                    io::Error::new(io::ErrorKind::Other, e),
                )
            })?;
        Ok(Self { port })
    }
}

impl ControlLines for SerialLines {
    fn set(&mut self, action: LineAction) -> io::Result<()> {
        let result = match action.line {
            Line::Dtr => self.port.write_data_terminal_ready(action.level),
            Line::Rts => self.port.write_request_to_send(action.level),
        };
        result.map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}

/// Records every line transition instead of touching hardware; the test
/// double for keyer and integration tests.
#[derive(Default)]
pub struct RecordingLines {
    pub actions: Vec<LineAction>,
}

impl RecordingLines {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ControlLines for RecordingLines {
    fn set(&mut self, action: LineAction) -> io::Result<()> {
        self.actions.push(action);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mapping_is_data_on_dtr_ptt_on_rts() {
        let map = LineMap::resolve(false, false);
        assert_eq!(map.bit_on, LineAction { line: Line::Dtr, level: true });
        assert_eq!(map.bit_off, LineAction { line: Line::Dtr, level: false });
        assert_eq!(map.ptt_on, LineAction { line: Line::Rts, level: true });
        assert_eq!(map.ptt_off, LineAction { line: Line::Rts, level: false });
    }

    #[test]
    fn swap_moves_data_to_rts() {
        let map = LineMap::resolve(true, false);
        assert_eq!(map.bit_on.line, Line::Rts);
        assert_eq!(map.ptt_on.line, Line::Dtr);
    }

    #[test]
    fn inverted_ptt_keys_low() {
        let map = LineMap::resolve(false, true);
        assert_eq!(map.ptt_on, LineAction { line: Line::Rts, level: false });
        assert_eq!(map.ptt_off, LineAction { line: Line::Rts, level: true });
        // data polarity is untouched
        assert!(map.bit_on.level);
    }

    #[test]
    fn swap_and_invert_compose() {
        let map = LineMap::resolve(true, true);
        assert_eq!(map.bit_on, LineAction { line: Line::Rts, level: true });
        assert_eq!(map.ptt_on, LineAction { line: Line::Dtr, level: false });
    }
}
