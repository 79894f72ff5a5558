//! iNES cartridge image loading and NROM (mapper 0) address mapping.
//!
//! # iNES v1 layout
//!
//! ```text
//! Byte 0-3:  "NES" 0x1A
//! Byte 4:    PRG-ROM size in 16 KB banks
//! Byte 5:    CHR-ROM size in 8 KB banks
//! Byte 6:    bit 0 mirroring (0 horizontal, 1 vertical), bit 1 battery,
//!            bit 2 trainer present, bits 4-7 mapper low nibble
//! Byte 7:    bits 4-7 mapper high nibble
//! Byte 8-15: padding (iNES v1)
//! ```
//!
//! An optional 512-byte trainer follows the header, then the PRG banks,
//! then the CHR banks.

use ferrones_ppu::Mirroring;

/// 16-byte iNES header magic: "NES" followed by MS-DOS EOF.
const INES_MAGIC: [u8; 4] = [0x4E, 0x45, 0x53, 0x1A];

/// PRG-ROM bank size (16 KB).
const PRG_BANK_SIZE: usize = 16 * 1024;

/// CHR-ROM bank size (8 KB).
const CHR_BANK_SIZE: usize = 8 * 1024;

/// Errors raised while loading a cartridge image.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartError {
    /// The header is missing, carries the wrong magic, or is flagged NES 2.0.
    #[error("not an iNES v1 image: {0}")]
    BadHeader(&'static str),

    /// The image is truncated or the PRG/CHR sizes are not NROM-shaped.
    #[error("bad ROM size: {0}")]
    BadRomSize(&'static str),

    /// The image requires a mapper other than NROM.
    #[error("unsupported mapper {0}")]
    UnsupportedMapper(u8),

    /// The image carries no CHR-ROM (CHR-RAM boards are not supported).
    #[error("mapper 0 image without CHR-ROM")]
    ChrRamUnsupported,
}

/// An NROM cartridge: immutable PRG and CHR banks plus header metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    prg_rom: Vec<u8>,
    chr_rom: Vec<u8>,
    mirroring: Mirroring,
}

impl Cart {
    /// Parses an iNES v1 image. Only mapper 0 with 16/32 KB PRG and 8 KB
    /// CHR-ROM is accepted; a 512-byte trainer is skipped when present.
    pub fn load(data: &[u8]) -> Result<Self, CartError> {
        if data.len() < 16 {
            return Err(CartError::BadHeader("file shorter than the header"));
        }
        if data[0..4] != INES_MAGIC {
            return Err(CartError::BadHeader("bad magic"));
        }
        if ((data[7] >> 2) & 0x03) == 0x02 {
            return Err(CartError::BadHeader("NES 2.0 images are not supported"));
        }

        let mapper = (data[7] & 0xF0) | (data[6] >> 4);
        if mapper != 0 {
            return Err(CartError::UnsupportedMapper(mapper));
        }

        let prg_size = usize::from(data[4]) * PRG_BANK_SIZE;
        let chr_size = usize::from(data[5]) * CHR_BANK_SIZE;
        if prg_size != PRG_BANK_SIZE && prg_size != 2 * PRG_BANK_SIZE {
            return Err(CartError::BadRomSize("NROM needs 16 KB or 32 KB of PRG-ROM"));
        }
        if chr_size == 0 {
            return Err(CartError::ChrRamUnsupported);
        }
        if chr_size != CHR_BANK_SIZE {
            return Err(CartError::BadRomSize("NROM needs exactly 8 KB of CHR-ROM"));
        }

        let mirroring = if data[6] & 0x01 != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };

        let prg_start = 16 + if data[6] & 0x04 != 0 { 512 } else { 0 };
        let chr_start = prg_start + prg_size;
        if data.len() < chr_start + chr_size {
            return Err(CartError::BadRomSize("image truncated"));
        }

        Ok(Self {
            prg_rom: data[prg_start..prg_start + prg_size].to_vec(),
            chr_rom: data[chr_start..chr_start + chr_size].to_vec(),
            mirroring,
        })
    }

    /// Reads PRG-ROM at a CPU address ($8000-$FFFF). A 16 KB image mirrors
    /// its single bank across the whole window.
    #[inline]
    #[must_use]
    pub fn prg_read(&self, addr: u16) -> u8 {
        let mut offset = usize::from(addr - 0x8000);
        if self.prg_rom.len() == PRG_BANK_SIZE {
            offset &= PRG_BANK_SIZE - 1;
        }
        self.prg_rom[offset]
    }

    /// PRG-ROM writes have nowhere to go on NROM; they are dropped.
    pub fn prg_write(&self, addr: u16, value: u8) {
        log::warn!("dropping write ${value:02X} to PRG-ROM address ${addr:04X}");
    }

    /// Reads CHR-ROM at a PPU address ($0000-$1FFF).
    #[inline]
    #[must_use]
    pub fn chr_read(&self, addr: u16) -> u8 {
        self.chr_rom[usize::from(addr & 0x1FFF)]
    }

    /// Nametable mirroring wired by the cartridge.
    #[must_use]
    pub fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    /// PRG-ROM size in bytes.
    #[must_use]
    pub fn prg_size(&self) -> usize {
        self.prg_rom.len()
    }
}
