//! NES 2C02 PPU (Picture Processing Unit) emulation.
//!
//! The PPU owns nametable VRAM, palette RAM and OAM, exposes the eight
//! CPU-visible registers, runs the 341-dot x 262-scanline clock and renders
//! whole 256x240 ARGB8888 frames at VBlank entry.
//!
//! # Timing
//!
//! NTSC: 341 dots per scanline, 262 scanlines per frame, three dots per CPU
//! cycle. VBlank begins at scanline 241 dot 1 (flag set, NMI raised when
//! enabled) and ends at the pre-render scanline's dot 1.
//!
//! # Usage
//!
//! ```
//! use ferrones_ppu::{Mirroring, Ppu};
//!
//! let chr = [0u8; 8192];
//! let mut ppu = Ppu::new(Mirroring::Vertical);
//!
//! // Register access from the CPU side.
//! ppu.write_register(0x2000, 0x80); // enable NMI
//! let status = ppu.read_register(0x2002, |addr| chr[addr as usize]);
//!
//! // Advance one dot; the return value reports a raised NMI.
//! let nmi = ppu.tick(|addr| chr[addr as usize]);
//! # let _ = (status, nmi);
//! ```

#![warn(missing_docs)]

mod frame;
mod oam;
pub mod palette;
mod ppu;
mod registers;
mod render;
mod scroll;
mod timing;
mod vram;

pub use frame::{Frame, FRAME_HEIGHT, FRAME_WIDTH};
pub use oam::{Oam, Sprite, SpriteAttributes, OAM_SIZE};
pub use ppu::Ppu;
pub use registers::{PpuCtrl, PpuMask, PpuStatus};
pub use scroll::Scroll;
pub use timing::{
    Timing, DOTS_PER_FRAME, DOTS_PER_SCANLINE, PRE_RENDER_SCANLINE, SCANLINES_PER_FRAME,
    VBLANK_SCANLINE,
};
pub use vram::{Mirroring, Vram};
