//! OAM (Object Attribute Memory): 64 sprites, 4 bytes each.
//!
//! ```text
//! Byte 0: Y position (top of sprite, minus 1)
//! Byte 1: Tile index
//! Byte 2: Attributes
//!   76543210
//!   |||   ++- Palette (4-7)
//!   ||+------ Priority (0: in front of background, 1: behind)
//!   |+------- Flip horizontally
//!   +-------- Flip vertically
//! Byte 3: X position (left edge)
//! ```

use bitflags::bitflags;

/// OAM size in bytes.
pub const OAM_SIZE: usize = 256;

bitflags! {
    /// Sprite attribute byte.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SpriteAttributes: u8 {
        /// Palette select, low bit.
        const PALETTE_0 = 0b0000_0001;
        /// Palette select, high bit.
        const PALETTE_1 = 0b0000_0010;
        /// Priority: set = behind the background.
        const PRIORITY = 0b0010_0000;
        /// Flip sprite horizontally.
        const FLIP_HORIZONTAL = 0b0100_0000;
        /// Flip sprite vertically.
        const FLIP_VERTICAL = 0b1000_0000;
    }
}

impl SpriteAttributes {
    /// Sprite palette number (0-3, selecting palette RAM entries 16-31).
    #[inline]
    #[must_use]
    pub fn palette(self) -> u8 {
        self.bits() & 0x03
    }

    /// Whether the sprite renders behind opaque background pixels.
    #[inline]
    #[must_use]
    pub fn behind_background(self) -> bool {
        self.contains(Self::PRIORITY)
    }

    /// Whether the sprite is flipped horizontally.
    #[inline]
    #[must_use]
    pub fn flip_horizontal(self) -> bool {
        self.contains(Self::FLIP_HORIZONTAL)
    }

    /// Whether the sprite is flipped vertically.
    #[inline]
    #[must_use]
    pub fn flip_vertical(self) -> bool {
        self.contains(Self::FLIP_VERTICAL)
    }
}

/// Decoded view of one 4-byte OAM entry.
#[derive(Debug, Clone, Copy)]
pub struct Sprite {
    /// Y position (top minus 1; the sprite appears one line lower).
    pub y: u8,
    /// Tile index (in 8x16 mode, bit 0 selects the pattern table).
    pub tile: u8,
    /// Attribute byte.
    pub attributes: SpriteAttributes,
    /// X position of the left edge.
    pub x: u8,
}

impl Sprite {
    /// Decodes a sprite from its 4 OAM bytes.
    #[inline]
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            y: bytes[0],
            tile: bytes[1],
            attributes: SpriteAttributes::from_bits_truncate(bytes[2]),
            x: bytes[3],
        }
    }

    /// Whether this sprite covers `scanline` (sprites appear at Y + 1).
    #[inline]
    #[must_use]
    pub fn covers_scanline(&self, scanline: u16, height: u8) -> bool {
        let top = u16::from(self.y) + 1;
        scanline >= top && scanline < top + u16::from(height)
    }
}

/// 256-byte OAM plus the $2003 address pointer.
#[derive(Debug, Clone)]
pub struct Oam {
    data: [u8; OAM_SIZE],
    addr: u8,
}

impl Oam {
    /// Creates zeroed OAM.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: [0; OAM_SIZE],
            addr: 0,
        }
    }

    /// $2003 write: sets the OAM pointer.
    #[inline]
    pub fn set_addr(&mut self, addr: u8) {
        self.addr = addr;
    }

    /// Current OAM pointer.
    #[inline]
    #[must_use]
    pub fn addr(&self) -> u8 {
        self.addr
    }

    /// $2004 read: returns the byte at the pointer without advancing it.
    #[inline]
    #[must_use]
    pub fn read(&self) -> u8 {
        self.data[usize::from(self.addr)]
    }

    /// $2004 write: stores at the pointer and auto-increments it.
    #[inline]
    pub fn write(&mut self, value: u8) {
        self.data[usize::from(self.addr)] = value;
        self.addr = self.addr.wrapping_add(1);
    }

    /// $4014 DMA: copies a full page starting at the current pointer,
    /// wrapping within OAM.
    pub fn dma_write(&mut self, page: &[u8; OAM_SIZE]) {
        for (i, &byte) in page.iter().enumerate() {
            let index = usize::from(self.addr.wrapping_add(i as u8));
            self.data[index] = byte;
        }
    }

    /// Raw OAM contents.
    #[inline]
    #[must_use]
    pub fn data(&self) -> &[u8; OAM_SIZE] {
        &self.data
    }

    /// Decodes sprite `index` (0-63).
    #[inline]
    #[must_use]
    pub fn sprite(&self, index: usize) -> Sprite {
        let offset = index * 4;
        Sprite::from_bytes(&self.data[offset..offset + 4])
    }

    /// Clears OAM and the pointer.
    pub fn reset(&mut self) {
        self.data = [0; OAM_SIZE];
        self.addr = 0;
    }
}

impl Default for Oam {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_auto_increments() {
        let mut oam = Oam::new();
        oam.set_addr(0x10);
        oam.write(0xAA);
        oam.write(0xBB);
        assert_eq!(oam.addr(), 0x12);

        oam.set_addr(0x10);
        assert_eq!(oam.read(), 0xAA);
        // Reads do not advance the pointer.
        assert_eq!(oam.read(), 0xAA);
    }

    #[test]
    fn dma_wraps_from_pointer() {
        let mut oam = Oam::new();
        oam.set_addr(0xFE);
        let mut page = [0u8; OAM_SIZE];
        for (i, byte) in page.iter_mut().enumerate() {
            *byte = i as u8;
        }
        oam.dma_write(&page);
        assert_eq!(oam.data()[0xFE], 0);
        assert_eq!(oam.data()[0xFF], 1);
        assert_eq!(oam.data()[0x00], 2);
    }

    #[test]
    fn sprite_decoding() {
        let mut oam = Oam::new();
        oam.set_addr(0);
        oam.write(0x20); // Y
        oam.write(0x42); // tile
        oam.write(0xC3); // attrs: flip both, palette 3
        oam.write(0x80); // X

        let sprite = oam.sprite(0);
        assert_eq!(sprite.y, 0x20);
        assert_eq!(sprite.tile, 0x42);
        assert_eq!(sprite.x, 0x80);
        assert_eq!(sprite.attributes.palette(), 3);
        assert!(sprite.attributes.flip_horizontal());
        assert!(sprite.attributes.flip_vertical());
        assert!(!sprite.attributes.behind_background());
    }

    #[test]
    fn scanline_coverage_is_y_plus_one() {
        let sprite = Sprite {
            y: 0x10,
            tile: 0,
            attributes: SpriteAttributes::empty(),
            x: 0,
        };
        assert!(!sprite.covers_scanline(0x10, 8));
        assert!(sprite.covers_scanline(0x11, 8));
        assert!(sprite.covers_scanline(0x18, 8));
        assert!(!sprite.covers_scanline(0x19, 8));
        assert!(sprite.covers_scanline(0x20, 16));
    }
}
