//! NES emulation core: CPU, PPU and NROM cartridge over a system bus.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │                   Console                     │
//! │  ┌─────────────────────────────────────────┐  │
//! │  │               SystemBus                 │  │
//! │  │   ┌─────┐   ┌─────┐   ┌───────────┐    │  │
//! │  │   │ RAM │   │ PPU │   │ Cart      │    │  │
//! │  │   │ 2KB │   │     │   │ PRG + CHR │    │  │
//! │  │   └─────┘   └─────┘   └───────────┘    │  │
//! │  └─────────────────────────────────────────┘  │
//! │                      ▲                        │
//! │                 ┌────┴────┐                   │
//! │                 │   CPU   │                   │
//! │                 └─────────┘                   │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! Ownership is a one-way spine: the console owns the CPU and the bus, the
//! bus owns the PPU and the cartridge. The CPU reaches the rest through the
//! bus trait, and the PPU reads CHR through a callback - no back-pointers.
//!
//! # Usage
//!
//! ```no_run
//! use ferrones_core::Console;
//!
//! let rom = std::fs::read("game.nes").expect("failed to read ROM");
//! let mut console = Console::new(&rom).expect("failed to load cartridge");
//! console.reset();
//!
//! loop {
//!     let frame = console.step_frame();
//!     // Present the 256x240 ARGB8888 frame.
//!     let _pixels: &[u32] = frame.pixels();
//! }
//! ```

#![warn(missing_docs)]

mod bus;
mod cart;
mod console;

pub use bus::SystemBus;
pub use cart::{Cart, CartError};
pub use console::Console;

// Re-export the component crates' main types.
pub use ferrones_cpu::{Bus, Cpu, Status};
pub use ferrones_ppu::{Frame, Mirroring, Ppu, FRAME_HEIGHT, FRAME_WIDTH};

/// NES timing constants (NTSC).
pub mod timing {
    /// CPU clock frequency.
    pub const CPU_CLOCK_NTSC: u32 = 1_789_773;
    /// PPU dots per CPU cycle.
    pub const PPU_DOTS_PER_CPU_CYCLE: u32 = 3;
    /// PPU dots per frame (341 x 262).
    pub const PPU_DOTS_PER_FRAME: u32 = ferrones_ppu::DOTS_PER_FRAME;
    /// Approximate CPU cycles per frame.
    pub const CPU_CYCLES_PER_FRAME: u32 = PPU_DOTS_PER_FRAME / PPU_DOTS_PER_CPU_CYCLE;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// NROM-256 image: NOP slide with the reset vector at $8000.
    fn nop_rom() -> Vec<u8> {
        let mut image = vec![0x4E, 0x45, 0x53, 0x1A, 2, 1, 0, 0];
        image.extend_from_slice(&[0; 8]);
        let mut prg = vec![0xEA; 32 * 1024];
        prg[0x7FFC] = 0x00;
        prg[0x7FFD] = 0x80;
        image.extend_from_slice(&prg);
        image.extend_from_slice(&[0; 8 * 1024]);
        image
    }

    #[test]
    fn console_runs_nop_slide() {
        let mut console = Console::new(&nop_rom()).unwrap();
        console.reset();
        assert_eq!(console.cpu().pc, 0x8000);

        let cycles = console.step();
        assert_eq!(cycles, 2);
        assert_eq!(console.cpu().pc, 0x8001);
    }

    #[test]
    fn step_frame_produces_a_frame() {
        let mut console = Console::new(&nop_rom()).unwrap();
        console.reset();
        let frame = console.step_frame();
        assert_eq!(frame.pixels().len(), FRAME_WIDTH * FRAME_HEIGHT);
        assert_eq!(console.frame_count(), 1);
    }

    #[test]
    fn run_for_executes_at_least_requested_cycles() {
        let mut console = Console::new(&nop_rom()).unwrap();
        console.reset();
        let executed = console.run_for(1000);
        assert!(executed >= 1000);
        assert!(console.cpu().cycles() >= 1000);
    }

    #[test]
    fn timing_constants() {
        assert_eq!(timing::PPU_DOTS_PER_FRAME, 89_342);
        assert_eq!(timing::PPU_DOTS_PER_CPU_CYCLE, 3);
    }
}
