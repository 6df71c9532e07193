//! Run controller: sequences cycles and owns the fail-stop transition.
//!
//! ```text
//!  Running --(sum == oracle)--> Running   (counter += 1, wrapping)
//!  Running --(sum != oracle)--> Halted    (after "Glitch detected")
//!  Halted  --(anything)-------> Halted
//! ```
//!
//! Once halted the controller never computes or writes again. [`RunController::run`]
//! hands control to a [`Halt`] implementation that does not return; only an
//! external reset gets the device out of that state.

use core::fmt::Write;

use crate::report;
use crate::validator::{validate, Verdict};
use crate::workload::{Accumulator, Workload};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum RunState {
    Running,
    /// Terminal.
    Halted,
}

/// Terminal wait entered after a detected glitch.
pub trait Halt {
    /// Blocks forever.
    fn halt(&mut self) -> !;
}

pub struct RunController<W = Accumulator> {
    workload: W,
    counter: u8,
    state: RunState,
}

impl RunController<Accumulator> {
    /// Controller for the shipped firmware workload.
    pub const fn firmware() -> Self {
        Self::new(Accumulator::firmware())
    }
}

impl<W: Workload> RunController<W> {
    pub const fn new(workload: W) -> Self {
        Self {
            workload,
            counter: 0,
            state: RunState::Running,
        }
    }

    /// Iteration counter that will be printed on the next cycle.
    pub const fn counter(&self) -> u8 {
        self.counter
    }

    pub const fn state(&self) -> RunState {
        self.state
    }

    pub fn workload(&self) -> &W {
        &self.workload
    }

    /// Performs one scheduler step.
    ///
    /// While running this is one full cycle: compute, report, validate. Once
    /// halted it is a no-op and produces no output.
    pub fn step<O: Write>(&mut self, out: &mut O) -> RunState {
        if self.state == RunState::Halted {
            return RunState::Halted;
        }

        let sum = self.workload.compute();
        report::iteration(out, self.counter, sum);

        match validate(sum) {
            Verdict::Match => self.counter = self.counter.wrapping_add(1),
            Verdict::Mismatch => {
                report::glitch_detected(out);
                self.state = RunState::Halted;
            }
        }

        self.state
    }

    /// Runs cycles until a glitch is detected, then halts for good.
    pub fn run<O: Write, H: Halt>(mut self, out: &mut O, halt: &mut H) -> ! {
        while self.step(out) == RunState::Running {}
        halt.halt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::EXPECTED_CHECKSUM;

    /// Returns queued sums, then the oracle value forever.
    struct Script {
        sums: Vec<u32>,
        calls: usize,
    }

    impl Script {
        fn new(sums: &[u32]) -> Self {
            Self {
                sums: sums.iter().rev().copied().collect(),
                calls: 0,
            }
        }
    }

    impl Workload for Script {
        fn compute(&mut self) -> u32 {
            self.calls += 1;
            self.sums.pop().unwrap_or(EXPECTED_CHECKSUM)
        }
    }

    #[test]
    fn starts_running_at_zero() {
        let ctl = RunController::new(Script::new(&[]));
        assert_eq!(ctl.counter(), 0);
        assert_eq!(ctl.state(), RunState::Running);
        assert_eq!(RunController::firmware().workload().steps(), crate::STEPS);
    }

    #[test]
    fn matching_cycle_advances_counter() {
        let mut ctl = RunController::new(Script::new(&[]));
        let mut out = String::new();
        assert_eq!(ctl.step(&mut out), RunState::Running);
        assert_eq!(ctl.counter(), 1);
        assert_eq!(out, format!("Iteration 0 - Sum = {EXPECTED_CHECKSUM}\n"));
    }

    #[test]
    fn mismatch_reports_and_halts() {
        let mut ctl = RunController::new(Script::new(&[EXPECTED_CHECKSUM, 42]));
        let mut out = String::new();
        ctl.step(&mut out);
        assert_eq!(ctl.step(&mut out), RunState::Halted);
        assert_eq!(
            out,
            format!("Iteration 0 - Sum = {EXPECTED_CHECKSUM}\nIteration 1 - Sum = 42\nGlitch detected\n")
        );
        // The counter is only advanced by validated cycles.
        assert_eq!(ctl.counter(), 1);
    }

    #[test]
    fn halted_steps_do_nothing() {
        let mut ctl = RunController::new(Script::new(&[0]));
        let mut out = String::new();
        ctl.step(&mut out);
        let before = out.clone();

        for _ in 0..1_000 {
            assert_eq!(ctl.step(&mut out), RunState::Halted);
        }
        assert_eq!(out, before);
        assert_eq!(ctl.workload().calls, 1);
    }

    #[test]
    fn counter_wraps_without_halting() {
        let mut ctl = RunController::new(Script::new(&[]));
        let mut out = String::new();
        for _ in 0..256 {
            assert_eq!(ctl.step(&mut out), RunState::Running);
        }
        assert_eq!(ctl.counter(), 0);
        assert!(out.ends_with(&format!("Iteration 255 - Sum = {EXPECTED_CHECKSUM}\n")));
    }
}
