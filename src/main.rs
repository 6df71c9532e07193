//! Glitch-detection target firmware.
//!
//! On the Cortex-M3 target (QEMU's lm3s6965evb) the run controller writes its
//! status lines to UART0 and halts in `wfi` after the first detected glitch.
//! Built for the host, the same loop runs against stdout so the output can be
//! inspected without a board.

#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(target_os = "none")]
mod firmware {
    use cortex_m_rt::entry;
    use defmt_rtt as _;
    use panic_halt as _;

    use glitch_fw::board::{Uart0, WaitForInterrupt};
    use glitch_fw::{RunController, EXPECTED_CHECKSUM, STEPS};

    #[entry]
    fn main() -> ! {
        defmt::info!(
            "glitch target up: {=u32} steps per cycle, expecting {=u32:#x}",
            STEPS,
            EXPECTED_CHECKSUM
        );

        // SAFETY: nothing else in the image touches UART0.
        let mut uart = unsafe { Uart0::steal() };
        RunController::firmware().run(&mut uart, &mut WaitForInterrupt)
    }
}

#[cfg(not(target_os = "none"))]
fn main() {
    use std::fmt;
    use std::io::{self, Write};

    use glitch_fw::{Halt, RunController};

    struct Stdout(io::Stdout);

    impl fmt::Write for Stdout {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            let mut out = self.0.lock();
            out.write_all(s.as_bytes())
                .and_then(|()| out.flush())
                .map_err(|_| fmt::Error)
        }
    }

    struct Park;

    impl Halt for Park {
        fn halt(&mut self) -> ! {
            loop {
                std::thread::park();
            }
        }
    }

    RunController::firmware().run(&mut Stdout(io::stdout()), &mut Park)
}
