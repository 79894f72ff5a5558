//! PPU control, mask and status registers.
//!
//! The PPU exposes eight registers at CPU addresses $2000-$2007; this module
//! defines the three that are pure bit fields.

use bitflags::bitflags;

bitflags! {
    /// PPUCTRL ($2000) - write only.
    ///
    /// ```text
    /// 7  bit  0
    /// ---- ----
    /// VPHB SINN
    /// |||| ||++- Base nametable (0: $2000, 1: $2400, 2: $2800, 3: $2C00)
    /// |||| |+--- VRAM increment per PPUDATA access (0: +1, 1: +32)
    /// |||| +---- Sprite pattern table for 8x8 sprites (0: $0000, 1: $1000)
    /// |||+------ Background pattern table (0: $0000, 1: $1000)
    /// ||+------- Sprite size (0: 8x8, 1: 8x16)
    /// |+-------- Master/slave select (unused on the NES)
    /// +--------- Generate NMI at VBlank start
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PpuCtrl: u8 {
        /// Nametable select, low bit.
        const NAMETABLE_X = 0b0000_0001;
        /// Nametable select, high bit.
        const NAMETABLE_Y = 0b0000_0010;
        /// VRAM address increment (0: +1 across, 1: +32 down).
        const VRAM_INCREMENT = 0b0000_0100;
        /// Sprite pattern table address (8x8 mode only).
        const SPRITE_TABLE = 0b0000_1000;
        /// Background pattern table address.
        const BG_TABLE = 0b0001_0000;
        /// Sprite size (0: 8x8, 1: 8x16).
        const SPRITE_SIZE = 0b0010_0000;
        /// Master/slave select (unused).
        const MASTER_SLAVE = 0b0100_0000;
        /// Generate NMI at VBlank.
        const NMI_ENABLE = 0b1000_0000;
    }
}

impl PpuCtrl {
    /// Base nametable address ($2000, $2400, $2800 or $2C00).
    #[inline]
    #[must_use]
    pub fn nametable_addr(self) -> u16 {
        0x2000 | (u16::from(self.bits() & 0x03) << 10)
    }

    /// VRAM address increment applied after each PPUDATA access.
    #[inline]
    #[must_use]
    pub fn vram_increment(self) -> u16 {
        if self.contains(Self::VRAM_INCREMENT) {
            32
        } else {
            1
        }
    }

    /// Sprite pattern table base for 8x8 sprites.
    #[inline]
    #[must_use]
    pub fn sprite_table_addr(self) -> u16 {
        if self.contains(Self::SPRITE_TABLE) {
            0x1000
        } else {
            0x0000
        }
    }

    /// Background pattern table base.
    #[inline]
    #[must_use]
    pub fn bg_table_addr(self) -> u16 {
        if self.contains(Self::BG_TABLE) {
            0x1000
        } else {
            0x0000
        }
    }

    /// Sprite height in pixels (8 or 16).
    #[inline]
    #[must_use]
    pub fn sprite_height(self) -> u8 {
        if self.contains(Self::SPRITE_SIZE) {
            16
        } else {
            8
        }
    }

    /// Whether an NMI is generated at VBlank start.
    #[inline]
    #[must_use]
    pub fn nmi_enabled(self) -> bool {
        self.contains(Self::NMI_ENABLE)
    }
}

bitflags! {
    /// PPUMASK ($2001) - write only.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PpuMask: u8 {
        /// Greyscale mode.
        const GREYSCALE = 0b0000_0001;
        /// Show background in the leftmost 8 pixels.
        const SHOW_BG_LEFT = 0b0000_0010;
        /// Show sprites in the leftmost 8 pixels.
        const SHOW_SPRITES_LEFT = 0b0000_0100;
        /// Show background.
        const SHOW_BG = 0b0000_1000;
        /// Show sprites.
        const SHOW_SPRITES = 0b0001_0000;
        /// Emphasize red.
        const EMPHASIZE_RED = 0b0010_0000;
        /// Emphasize green.
        const EMPHASIZE_GREEN = 0b0100_0000;
        /// Emphasize blue.
        const EMPHASIZE_BLUE = 0b1000_0000;
    }
}

impl PpuMask {
    /// Whether background or sprite rendering is enabled.
    #[inline]
    #[must_use]
    pub fn rendering_enabled(self) -> bool {
        self.intersects(Self::SHOW_BG | Self::SHOW_SPRITES)
    }

    /// Whether background rendering is enabled.
    #[inline]
    #[must_use]
    pub fn show_background(self) -> bool {
        self.contains(Self::SHOW_BG)
    }

    /// Whether sprite rendering is enabled.
    #[inline]
    #[must_use]
    pub fn show_sprites(self) -> bool {
        self.contains(Self::SHOW_SPRITES)
    }
}

bitflags! {
    /// PPUSTATUS ($2002) - read only. Bits 4-0 are undriven.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PpuStatus: u8 {
        /// Sprite overflow (more than 8 sprites on a scanline).
        const SPRITE_OVERFLOW = 0b0010_0000;
        /// Sprite 0 hit.
        const SPRITE_ZERO_HIT = 0b0100_0000;
        /// Vertical blank flag.
        const VBLANK = 0b1000_0000;
    }
}

impl PpuStatus {
    /// Whether the VBlank flag is set.
    #[inline]
    #[must_use]
    pub fn in_vblank(self) -> bool {
        self.contains(Self::VBLANK)
    }

    /// Sets the VBlank flag.
    #[inline]
    pub fn set_vblank(&mut self) {
        self.insert(Self::VBLANK);
    }

    /// Clears the VBlank flag.
    #[inline]
    pub fn clear_vblank(&mut self) {
        self.remove(Self::VBLANK);
    }

    /// Sets the sprite 0 hit flag.
    #[inline]
    pub fn set_sprite_zero_hit(&mut self) {
        self.insert(Self::SPRITE_ZERO_HIT);
    }

    /// Sets the sprite overflow flag.
    #[inline]
    pub fn set_sprite_overflow(&mut self) {
        self.insert(Self::SPRITE_OVERFLOW);
    }

    /// Clears sprite 0 hit and sprite overflow together.
    #[inline]
    pub fn clear_sprite_flags(&mut self) {
        self.remove(Self::SPRITE_ZERO_HIT | Self::SPRITE_OVERFLOW);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_nametable_addr() {
        assert_eq!(PpuCtrl::empty().nametable_addr(), 0x2000);
        assert_eq!(PpuCtrl::NAMETABLE_X.nametable_addr(), 0x2400);
        assert_eq!(PpuCtrl::NAMETABLE_Y.nametable_addr(), 0x2800);
        assert_eq!(
            (PpuCtrl::NAMETABLE_X | PpuCtrl::NAMETABLE_Y).nametable_addr(),
            0x2C00
        );
    }

    #[test]
    fn ctrl_increments_and_tables() {
        assert_eq!(PpuCtrl::empty().vram_increment(), 1);
        assert_eq!(PpuCtrl::VRAM_INCREMENT.vram_increment(), 32);
        assert_eq!(PpuCtrl::BG_TABLE.bg_table_addr(), 0x1000);
        assert_eq!(PpuCtrl::SPRITE_TABLE.sprite_table_addr(), 0x1000);
        assert_eq!(PpuCtrl::SPRITE_SIZE.sprite_height(), 16);
    }

    #[test]
    fn mask_rendering_enabled() {
        assert!(!PpuMask::empty().rendering_enabled());
        assert!(PpuMask::SHOW_BG.rendering_enabled());
        assert!(PpuMask::SHOW_SPRITES.rendering_enabled());
    }

    #[test]
    fn status_flag_helpers() {
        let mut status = PpuStatus::empty();
        status.set_vblank();
        status.set_sprite_zero_hit();
        status.set_sprite_overflow();
        assert!(status.in_vblank());

        status.clear_sprite_flags();
        assert!(status.in_vblank());
        assert!(!status.contains(PpuStatus::SPRITE_ZERO_HIT));
        assert!(!status.contains(PpuStatus::SPRITE_OVERFLOW));
    }
}
