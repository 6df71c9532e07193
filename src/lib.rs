//! Self-checking target firmware for fault-injection test benches.
//!
//! The firmware repeats a fixed, memory-heavy accumulation and compares the
//! result against a closed-form checksum. Every cycle is reported on a text
//! channel; the first mismatch is reported as `Glitch detected` and the core
//! stops for good.
//!
//! The library is `no_std` so the same code runs on the Cortex-M target and
//! in host tests. Board glue lives in [`board`] and only exists on the
//! embedded target.

#![cfg_attr(not(test), no_std)]

pub mod checksum;
pub mod controller;
pub mod monitor;
pub mod report;
pub mod validator;
pub mod workload;

#[cfg(target_os = "none")]
pub mod board;

pub use checksum::{closed_form, EXPECTED_CHECKSUM, STEPS};
pub use controller::{Halt, RunController, RunState};
pub use validator::{validate, Verdict};
pub use workload::{Accumulator, Volatile, Workload};
