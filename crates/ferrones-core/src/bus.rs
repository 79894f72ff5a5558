//! The system bus: CPU address decoding over RAM, PPU, APU stub and PRG-ROM.
//!
//! ```text
//! |-----------------| $FFFF
//! | PRG-ROM         |        16 KB images mirror the upper half
//! |-----------------| $8000
//! | Unmapped        |        reads 0
//! |-----------------| $4018
//! | APU + I/O       |        stubbed; $4014 = OAM DMA
//! |-----------------| $4000
//! | PPU registers   |        8 registers mirrored every 8 bytes
//! |-----------------| $2000
//! | 2 KB RAM        |        mirrored every $0800
//! |-----------------| $0000
//! ```
//!
//! The bus owns the cartridge and the PPU (the one-way ownership spine);
//! the CPU reaches everything through the [`ferrones_cpu::Bus`] trait.

use crate::cart::Cart;
use ferrones_ppu::{Ppu, OAM_SIZE};

/// Internal RAM size (2 KB, mirrored four times).
const RAM_SIZE: usize = 0x0800;

/// System bus connecting the CPU to RAM, PPU, cartridge and the I/O stubs.
pub struct SystemBus {
    ram: [u8; RAM_SIZE],
    cart: Cart,
    /// The PPU, reachable by the host for frame retrieval.
    pub ppu: Ppu,
    /// Page latched by a $4014 write, pending DMA execution.
    dma_page: Option<u8>,
    /// CPU cycles elapsed, for DMA parity accounting.
    cpu_cycles: u64,
}

impl SystemBus {
    /// Creates a bus around a cartridge; the PPU inherits its mirroring.
    #[must_use]
    pub fn new(cart: Cart) -> Self {
        let ppu = Ppu::new(cart.mirroring());
        Self {
            ram: [0; RAM_SIZE],
            cart,
            ppu,
            dma_page: None,
            cpu_cycles: 0,
        }
    }

    /// The cartridge behind the bus.
    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Advances the PPU one dot. Returns true when the PPU raised an NMI.
    pub fn tick_ppu(&mut self) -> bool {
        let Self { ppu, cart, .. } = self;
        ppu.tick(|addr| cart.chr_read(addr))
    }

    /// Adds executed CPU cycles (drives DMA odd/even parity).
    pub fn add_cpu_cycles(&mut self, cycles: u32) {
        self.cpu_cycles += u64::from(cycles);
    }

    /// Total CPU cycles accounted on the bus.
    #[must_use]
    pub fn cpu_cycles(&self) -> u64 {
        self.cpu_cycles
    }

    /// Takes a pending OAM DMA request, if a $4014 write latched one.
    pub fn take_dma_request(&mut self) -> Option<u8> {
        self.dma_page.take()
    }

    /// Executes an OAM DMA from `page << 8`: copies 256 bytes into OAM and
    /// returns the CPU cycle debt (513, or 514 from an odd cycle).
    pub fn run_oam_dma(&mut self, page: u8) -> u32 {
        let base = u16::from(page) << 8;
        let mut buffer = [0u8; OAM_SIZE];
        for (i, byte) in buffer.iter_mut().enumerate() {
            *byte = self.dma_read(base.wrapping_add(i as u16));
        }
        self.ppu.oam_dma(&buffer);

        let cycles = if self.cpu_cycles % 2 == 1 { 514 } else { 513 };
        log::debug!("OAM DMA from ${base:04X}, {cycles} cycles");
        cycles
    }

    /// Side-effect-free read used by the DMA engine (RAM and PRG only).
    fn dma_read(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.ram[usize::from(addr) & (RAM_SIZE - 1)],
            0x8000..=0xFFFF => self.cart.prg_read(addr),
            _ => 0,
        }
    }
}

impl ferrones_cpu::Bus for SystemBus {
    fn read(&mut self, addr: u16) -> u8 {
        match addr {
            // 2 KB RAM, mirrored every $0800.
            0x0000..=0x1FFF => self.ram[usize::from(addr) & (RAM_SIZE - 1)],

            // PPU registers, mirrored every 8 bytes.
            0x2000..=0x3FFF => {
                let Self { ppu, cart, .. } = self;
                ppu.read_register(0x2000 | (addr & 0x07), |a| cart.chr_read(a))
            }

            // $4014 is write-only; the APU/input range is stubbed.
            0x4000..=0x4017 => 0,

            0x8000..=0xFFFF => self.cart.prg_read(addr),

            _ => {
                log::debug!("unmapped read at ${addr:04X}");
                0
            }
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => {
                self.ram[usize::from(addr) & (RAM_SIZE - 1)] = value;
            }

            0x2000..=0x3FFF => {
                self.ppu.write_register(0x2000 | (addr & 0x07), value);
            }

            // OAM DMA: latch the page; the drive loop executes the copy and
            // charges the 513/514-cycle debt.
            0x4014 => {
                if self.dma_page.replace(value).is_some() {
                    log::warn!("OAM DMA restarted before the pending one ran");
                }
            }

            // Input strobe / APU stub.
            0x4016 | 0x4017 => log::trace!("input strobe write ${value:02X} to ${addr:04X}"),
            0x4000..=0x4013 | 0x4015 => {}

            0x8000..=0xFFFF => self.cart.prg_write(addr, value),

            _ => {
                log::debug!("dropping unmapped write ${value:02X} to ${addr:04X}");
            }
        }
    }
}
