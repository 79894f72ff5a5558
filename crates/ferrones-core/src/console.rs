//! The console drive loop.
//!
//! One [`Console::step`] runs a single CPU instruction (or a pending OAM
//! DMA) and then advances the PPU three dots per consumed CPU cycle. NMIs
//! raised by PPU dots are latched into the CPU and serviced before its next
//! instruction, which preserves the required ordering: every PPU-raised NMI
//! is observed no later than the following instruction boundary.

use crate::bus::SystemBus;
use crate::cart::{Cart, CartError};
use ferrones_cpu::Cpu;
use ferrones_ppu::Frame;

/// A complete NES core: CPU plus the bus that owns the PPU and cartridge.
pub struct Console {
    cpu: Cpu,
    bus: SystemBus,
}

impl Console {
    /// Builds a console from raw iNES image bytes.
    pub fn new(rom: &[u8]) -> Result<Self, CartError> {
        Ok(Self::with_cart(Cart::load(rom)?))
    }

    /// Builds a console around an already-loaded cartridge.
    #[must_use]
    pub fn with_cart(cart: Cart) -> Self {
        Self {
            cpu: Cpu::new(),
            bus: SystemBus::new(cart),
        }
    }

    /// Resets the CPU through the cartridge's reset vector.
    pub fn reset(&mut self) {
        self.cpu.reset(&mut self.bus);
    }

    /// Runs one CPU instruction (servicing a pending OAM DMA first) and
    /// ticks the PPU three dots per CPU cycle. Returns the cycles consumed.
    pub fn step(&mut self) -> u32 {
        if let Some(page) = self.bus.take_dma_request() {
            let cycles = self.bus.run_oam_dma(page);
            self.tick_ppu(cycles);
            self.bus.add_cpu_cycles(cycles);
            return cycles;
        }

        let cycles = u32::from(self.cpu.step(&mut self.bus));
        self.tick_ppu(cycles);
        self.bus.add_cpu_cycles(cycles);
        cycles
    }

    /// Advances the PPU `3 x cpu_cycles` dots, latching raised NMIs.
    fn tick_ppu(&mut self, cpu_cycles: u32) {
        for _ in 0..cpu_cycles * 3 {
            if self.bus.tick_ppu() {
                self.cpu.trigger_nmi();
            }
        }
    }

    /// Steps until the PPU finishes a frame, then returns it.
    /// The frame stays valid until the next VBlank rewrites it.
    pub fn step_frame(&mut self) -> &Frame {
        while self.bus.ppu.take_frame().is_none() {
            self.step();
        }
        self.bus.ppu.frame()
    }

    /// Runs at least `cycles` CPU cycles and returns the number executed.
    pub fn run_for(&mut self, cycles: u64) -> u64 {
        let mut executed = 0;
        while executed < cycles {
            executed += u64::from(self.step());
        }
        executed
    }

    /// The CPU, for inspection.
    #[must_use]
    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    /// The bus (PPU and cartridge), for inspection.
    #[must_use]
    pub fn bus(&self) -> &SystemBus {
        &self.bus
    }

    /// Mutable bus access for hosts that poke memory directly.
    pub fn bus_mut(&mut self) -> &mut SystemBus {
        &mut self.bus
    }

    /// Frames completed since power-on.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.bus.ppu.frame_count()
    }
}
