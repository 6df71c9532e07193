//! Bench-side view of the firmware output stream.
//!
//! A test bench reads the target's serial output line by line. Iteration
//! lines are the liveness signal, `Glitch detected` marks a confirmed fault,
//! and a long silence without that line is ambiguous: the core may have halted
//! without reporting, or the device crashed. [`Monitor`] turns raw lines and
//! timestamps into those observations. It does not try to classify the fault
//! itself.

use core::num::ParseIntError;

use thiserror::Error;

use crate::checksum::EXPECTED_CHECKSUM;
use crate::report::GLITCH_LINE;

const ITERATION_PREFIX: &str = "Iteration ";
const SUM_SEPARATOR: &str = " - Sum = ";

/// One line of firmware output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Line<'a> {
    Iteration { counter: u8, sum: u32 },
    GlitchDetected,
    /// Anything else, e.g. boot noise from the debug probe.
    Other(&'a str),
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum LineError {
    #[error("iteration line has no sum")]
    MissingSum,

    #[error("invalid iteration counter: {0}")]
    Counter(#[source] ParseIntError),

    #[error("invalid sum: {0}")]
    Sum(#[source] ParseIntError),
}

/// Parses one line, with or without its trailing newline.
pub fn parse_line(line: &str) -> Result<Line<'_>, LineError> {
    let line = line.trim();

    if line == GLITCH_LINE {
        return Ok(Line::GlitchDetected);
    }

    let Some(rest) = line.strip_prefix(ITERATION_PREFIX) else {
        return Ok(Line::Other(line));
    };
    let (counter, sum) = rest
        .split_once(SUM_SEPARATOR)
        .ok_or(LineError::MissingSum)?;

    Ok(Line::Iteration {
        counter: counter.parse().map_err(LineError::Counter)?,
        sum: sum.parse().map_err(LineError::Sum)?,
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonitorConfig {
    /// How long the stream may stay quiet before it counts as silent.
    pub silence_timeout_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            silence_timeout_ms: 5_000,
        }
    }
}

/// What a single line means to the bench.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Observation<'a> {
    /// A cycle with the reference sum and the expected counter.
    Heartbeat { counter: u8, sum: u32 },
    /// A cycle whose printed sum is not the reference sum.
    CorruptHeartbeat { counter: u8, sum: u32 },
    GlitchReported,
    /// The counter went back to 0 out of sequence; the target probably reset.
    CounterRestart { counter: u8, sum: u32 },
    CounterSkip { expected: u8, counter: u8, sum: u32 },
    /// Output after `Glitch detected`: the target did not stay halted.
    OutputAfterHalt,
    Noise(&'a str),
    Malformed(LineError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BenchStatus {
    /// Nothing received yet.
    Waiting,
    Live,
    Glitched,
    /// Quiet for longer than the timeout without a glitch report.
    Silent,
}

#[derive(Debug)]
pub struct Monitor {
    config: MonitorConfig,
    next_counter: Option<u8>,
    last_line_ms: Option<u64>,
    glitched: bool,
}

impl Monitor {
    pub const fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            next_counter: None,
            last_line_ms: None,
            glitched: false,
        }
    }

    /// Forgets everything seen so far, e.g. after the bench power-cycles the
    /// target.
    pub fn reset(&mut self) {
        self.next_counter = None;
        self.last_line_ms = None;
        self.glitched = false;
    }

    /// Classifies one received line. `now_ms` is the bench clock.
    pub fn observe<'a>(&mut self, line: &'a str, now_ms: u64) -> Observation<'a> {
        self.last_line_ms = Some(now_ms);

        if self.glitched {
            return Observation::OutputAfterHalt;
        }

        let (counter, sum) = match parse_line(line) {
            Ok(Line::Iteration { counter, sum }) => (counter, sum),
            Ok(Line::GlitchDetected) => {
                self.glitched = true;
                return Observation::GlitchReported;
            }
            Ok(Line::Other(text)) => return Observation::Noise(text),
            Err(err) => return Observation::Malformed(err),
        };

        let expected = self.next_counter;
        if sum != EXPECTED_CHECKSUM {
            // The firmware does not advance the counter on a bad cycle.
            self.next_counter = Some(counter);
            return Observation::CorruptHeartbeat { counter, sum };
        }
        self.next_counter = Some(counter.wrapping_add(1));

        match expected {
            Some(expected) if expected != counter && counter == 0 => {
                Observation::CounterRestart { counter, sum }
            }
            Some(expected) if expected != counter => Observation::CounterSkip {
                expected,
                counter,
                sum,
            },
            _ => Observation::Heartbeat { counter, sum },
        }
    }

    pub fn status(&self, now_ms: u64) -> BenchStatus {
        if self.glitched {
            return BenchStatus::Glitched;
        }
        match self.last_line_ms {
            None => BenchStatus::Waiting,
            Some(last) if now_ms.saturating_sub(last) >= self.config.silence_timeout_ms => {
                BenchStatus::Silent
            }
            Some(_) => BenchStatus::Live,
        }
    }
}

impl Default for Monitor {
    fn default() -> Self {
        Self::new(MonitorConfig::default())
    }
}
