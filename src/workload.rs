//! The accumulation loop that forms the glitch window.
//!
//! Both the running sum and the loop index are kept in [`Volatile`] cells, so
//! every step performs a real load and store of each. The compiler can neither
//! fold the loop into its closed form nor keep the values in registers, and
//! the instruction stream (and therefore its duration) is the same on every
//! cycle.

use core::cell::UnsafeCell;
use core::ptr;

use crate::checksum::STEPS;

/// A memory location that is only accessed through volatile loads and stores.
#[repr(transparent)]
pub struct Volatile<T: Copy> {
    value: UnsafeCell<T>,
}

impl<T: Copy> Volatile<T> {
    pub const fn new(value: T) -> Self {
        Self {
            value: UnsafeCell::new(value),
        }
    }

    #[inline(always)]
    pub fn get(&self) -> T {
        // SAFETY: the pointer comes from our own `UnsafeCell`, so it is valid
        // and aligned, and no reference to the inner value ever escapes.
        unsafe { ptr::read_volatile(self.value.get()) }
    }

    #[inline(always)]
    pub fn set(&self, value: T) {
        // SAFETY: see `get`.
        unsafe { ptr::write_volatile(self.value.get(), value) }
    }
}

/// Something the run controller executes once per cycle.
pub trait Workload {
    /// Runs one full cycle and returns the accumulated sum.
    fn compute(&mut self) -> u32;
}

/// Fixed-length `sum += i * 2` accumulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Accumulator {
    steps: u32,
}

impl Accumulator {
    pub const fn new(steps: u32) -> Self {
        Self { steps }
    }

    /// The accumulation the firmware ships with: [`STEPS`] iterations.
    pub const fn firmware() -> Self {
        Self::new(STEPS)
    }

    pub const fn steps(&self) -> u32 {
        self.steps
    }

    /// Runs exactly `steps` read-modify-write steps and returns the sum.
    ///
    /// The sum and index start from zero on every call; nothing carries over
    /// between cycles.
    pub fn run(&self) -> u32 {
        let sum = Volatile::new(0u32);
        let index = Volatile::new(0u32);
        sum.set(0);
        index.set(0);

        while index.get() < self.steps {
            sum.set(sum.get().wrapping_add(index.get().wrapping_mul(2)));
            index.set(index.get().wrapping_add(1));
        }

        sum.get()
    }
}

impl Workload for Accumulator {
    fn compute(&mut self) -> u32 {
        self.run()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::{closed_form, EXPECTED_CHECKSUM};

    #[test]
    fn volatile_cell_roundtrip() {
        let cell = Volatile::new(7u32);
        assert_eq!(cell.get(), 7);
        cell.set(0xDEAD_BEEF);
        assert_eq!(cell.get(), 0xDEAD_BEEF);
    }

    #[test]
    fn empty_and_tiny_runs() {
        assert_eq!(Accumulator::new(0).run(), 0);
        assert_eq!(Accumulator::new(1).run(), 0);
        assert_eq!(Accumulator::new(4).run(), 12);
    }

    #[test]
    fn agrees_with_closed_form() {
        for steps in [3u32, 17, 1_000, 65_537, 100_000] {
            assert_eq!(Accumulator::new(steps).run(), closed_form(steps), "steps = {steps}");
        }
    }

    #[test]
    fn firmware_run_hits_the_oracle() {
        let acc = Accumulator::firmware();
        assert_eq!(acc.steps(), STEPS);
        assert_eq!(acc.run(), EXPECTED_CHECKSUM);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let mut acc = Accumulator::firmware();
        let first = acc.compute();
        let second = acc.compute();
        assert_eq!(first, second);
    }
}
