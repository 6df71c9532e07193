//! LM3S6965 glue: the UART0 output channel and the terminal halt.
//!
//! Clocks and the UART itself are left as configured at reset (QEMU's
//! `lm3s6965evb` needs nothing else for transmit).

use core::fmt;
use core::ptr;

use cortex_m::{asm, interrupt};

use crate::controller::Halt;

const UART0_BASE: usize = 0x4000_C000;
const UART_DR: usize = 0x000;
const UART_FR: usize = 0x018;
/// Transmit FIFO full.
const FR_TXFF: u32 = 1 << 5;

/// Transmit-only handle on UART0.
pub struct Uart0 {
    _private: (),
}

impl Uart0 {
    /// # Safety
    ///
    /// The caller must be the only writer to UART0.
    pub const unsafe fn steal() -> Self {
        Self { _private: () }
    }

    pub fn write_byte(&mut self, byte: u8) {
        let dr = (UART0_BASE + UART_DR) as *mut u32;
        let fr = (UART0_BASE + UART_FR) as *const u32;
        // SAFETY: fixed, always-mapped peripheral registers on this part.
        unsafe {
            while ptr::read_volatile(fr) & FR_TXFF != 0 {}
            ptr::write_volatile(dr, u32::from(byte));
        }
    }
}

impl fmt::Write for Uart0 {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            self.write_byte(byte);
        }
        Ok(())
    }
}

/// Masks interrupts and sleeps on `wfi` forever.
pub struct WaitForInterrupt;

impl Halt for WaitForInterrupt {
    fn halt(&mut self) -> ! {
        defmt::error!("glitch detected, halting until reset");
        interrupt::disable();
        loop {
            asm::wfi();
        }
    }
}
