use std::time::Duration;

use tracing::debug;

use crate::error::{TxError, TxResult};
use crate::serial::clock::TickClock;
use crate::serial::lines::{ControlLines, LineMap};
use crate::tx::BitSink;

/// Where the session stands. Arming asserts PTT and waits out the lead
/// delay; transmitting runs the per-bit deadline loop; closing waits for
/// the final bit's tail and drops PTT.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Idle,
    Transmitting,
    Closed,
}

/// Timing report for a finished keying session. Diagnostic only: drift is
/// recorded, never compensated.
#[derive(Clone, Copy, Debug)]
pub struct KeyerStats {
    pub total_bits_sent: u64,
    pub bits_with_delays: u64,
    pub max_delay_ticks: u64,
    pub max_delay_secs: f64,
    pub ticks_per_second: u64,
    pub ticks_per_bit: u64,
    /// (last_bit_ts - first_bit_ts) / total_bits_sent
    pub avg_ticks_per_bit: u64,
}

/// Real-time keying scheduler.
///
/// Bits are clocked out by toggling the data line at deadlines spaced
/// `ticks_per_bit` apart on a monotonic counter. The wait is a deliberate
/// spin; see `TickClock::wait_until`. When a deadline is already missed on
/// entry the bit goes out immediately and the miss is only recorded — the
/// schedule free-runs forward, it never compresses later bits to catch up.
pub struct SerialKeyer<L: ControlLines, C: TickClock> {
    lines: L,
    clock: C,
    map: LineMap,
    ptt_lead: Duration,
    ticks_per_bit: u64,

    state: State,
    next_deadline: u64,
    first_bit_ts: u64,
    last_bit_ts: u64,
    bits_with_delays: u64,
    max_delay: u64,
    total_bits_sent: u64,
}

impl<L: ControlLines, C: TickClock> SerialKeyer<L, C> {
    pub fn new(
        lines: L,
        clock: C,
        map: LineMap,
        bit_rate: u32,
        ptt_lead: Duration,
    ) -> TxResult<Self> {
        if bit_rate == 0 {
            return Err(TxError::config("bit rate must be positive"));
        }
        // Integer division; with nanosecond ticks the truncation error is
        // under one tick per bit, far below OS scheduling jitter.
        let ticks_per_bit = clock.ticks_per_second() / bit_rate as u64;
        if ticks_per_bit == 0 {
            return Err(TxError::config(format!(
                "bit rate {bit_rate} exceeds the counter resolution",
            )));
        }
        Ok(Self {
            lines,
            clock,
            map,
            ptt_lead,
            ticks_per_bit,
            state: State::Idle,
            next_deadline: 0,
            first_bit_ts: 0,
            last_bit_ts: 0,
            bits_with_delays: 0,
            max_delay: 0,
            total_bits_sent: 0,
        })
    }

    pub fn ticks_per_bit(&self) -> u64 {
        self.ticks_per_bit
    }

    /// The underlying line driver, e.g. to inspect a `RecordingLines`
    /// after a simulated session.
    pub fn lines(&self) -> &L {
        &self.lines
    }

    /// Assert PTT, wait out the lead delay, then schedule the first bit.
    pub fn start(&mut self) -> TxResult<()> {
        if self.state != State::Idle {
            return Err(TxError::config("keying session already started"));
        }
        self.lines
            .set(self.map.ptt_on)
            .map_err(|e| TxError::io("assert PTT", e))?;
        if !self.ptt_lead.is_zero() {
            std::thread::sleep(self.ptt_lead);
        }
        self.first_bit_ts = self.clock.now();
        self.next_deadline = self.first_bit_ts + self.ticks_per_bit;
        self.state = State::Transmitting;
        debug!(
            "keying armed: ticks_per_bit={}, first_bit_ts={}",
            self.ticks_per_bit, self.first_bit_ts
        );
        Ok(())
    }

    /// Wait for the pending deadline, recording a miss instead of waiting
    /// when the counter has already passed it.
    fn wait_end_of_bit(&mut self) {
        let now = self.clock.now();
        if now > self.next_deadline {
            let overrun = now - self.next_deadline;
            self.bits_with_delays += 1;
            if overrun > self.max_delay {
                self.max_delay = overrun;
            }
            return;
        }
        self.clock.wait_until(self.next_deadline);
    }

    /// Wait for the last bit's tail, release PTT and report.
    pub fn finish(&mut self) -> TxResult<KeyerStats> {
        if self.state != State::Transmitting {
            return Err(TxError::config("keying session was never started"));
        }
        self.wait_end_of_bit();
        self.last_bit_ts = self.clock.now();
        self.lines
            .set(self.map.ptt_off)
            .map_err(|e| TxError::io("release PTT", e))?;
        self.state = State::Closed;

        let ticks_per_second = self.clock.ticks_per_second();
        Ok(KeyerStats {
            total_bits_sent: self.total_bits_sent,
            bits_with_delays: self.bits_with_delays,
            max_delay_ticks: self.max_delay,
            max_delay_secs: self.max_delay as f64 / ticks_per_second as f64,
            ticks_per_second,
            ticks_per_bit: self.ticks_per_bit,
            avg_ticks_per_bit: if self.total_bits_sent > 0 {
                (self.last_bit_ts - self.first_bit_ts) / self.total_bits_sent
            } else {
                0
            },
        })
    }
}

impl<L: ControlLines, C: TickClock> BitSink for SerialKeyer<L, C> {
    fn emit(&mut self, bit: bool) -> TxResult<()> {
        if self.state != State::Transmitting {
            return Err(TxError::config("keying session not transmitting"));
        }
        self.wait_end_of_bit();
        self.next_deadline += self.ticks_per_bit;

        let action = if bit { self.map.bit_on } else { self.map.bit_off };
        self.lines
            .set(action)
            .map_err(|e| TxError::io("toggle data line", e))?;

        self.total_bits_sent += 1;
        Ok(())
    }
}
