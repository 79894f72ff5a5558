//! Property tests for the bus address decode: RAM and PPU register mirrors.

use ferrones_core::{Bus as _, Cart, SystemBus};
use proptest::prelude::*;

fn test_bus() -> SystemBus {
    let mut image = vec![0x4E, 0x45, 0x53, 0x1A, 2, 1, 0, 0];
    image.extend_from_slice(&[0; 8]);
    image.extend(std::iter::repeat(0).take(32 * 1024 + 8 * 1024));
    SystemBus::new(Cart::load(&image).unwrap())
}

proptest! {
    /// RAM reads are identical across all four 2 KB mirrors.
    #[test]
    fn ram_mirrors(addr in 0x0000u16..0x2000, value: u8) {
        let mut bus = test_bus();
        bus.write(addr, value);
        prop_assert_eq!(bus.read(addr), value);
        prop_assert_eq!(bus.read(addr ^ 0x0800), value);
        prop_assert_eq!(bus.read(addr ^ 0x1000), value);
        prop_assert_eq!(bus.read(addr ^ 0x1800), value);
    }

    /// Writes through any mirror land in the same RAM cell.
    #[test]
    fn ram_mirror_writes(addr in 0x0000u16..0x0800, mirror in 0u16..4, value: u8) {
        let mut bus = test_bus();
        bus.write(addr + mirror * 0x0800, value);
        prop_assert_eq!(bus.read(addr), value);
    }

    /// Every PPU register mirror decodes to $2000 + (addr & 7).
    ///
    /// The data port ($2007) advances the VRAM address on every access, so
    /// it is exercised separately; $2002 is read once per bus to keep the
    /// read-clears-VBlank side effect out of the comparison.
    #[test]
    fn ppu_register_mirrors(addr in 0x2008u16..0x4000, value: u8) {
        let register = addr & 0x07;
        prop_assume!(register != 7);

        let mut bus = test_bus();
        // Park a value in the PPU's data latch so write-only registers
        // have something observable to read back.
        bus.write(0x2000 | (addr & 0x07), value);
        let through_mirror = bus.read(addr);

        let mut bus = test_bus();
        bus.write(0x2000 | (addr & 0x07), value);
        let through_base = bus.read(0x2000 | (addr & 0x07));

        prop_assert_eq!(through_mirror, through_base);
    }

    /// The data port reaches the same nametable byte whether the address
    /// was set once and incremented N times, or set directly.
    #[test]
    fn data_port_increment_walk(offset in 0u16..0x0200, value: u8) {
        let mut bus = test_bus();

        // Write `value` at $2000 + offset by walking the increment.
        bus.write(0x2006, 0x20);
        bus.write(0x2006, 0x00);
        for _ in 0..offset {
            bus.write(0x2007, 0x00);
        }
        bus.write(0x2007, value);

        // Read it back with a direct address.
        let target = 0x2000 + offset;
        bus.write(0x2006, (target >> 8) as u8);
        bus.write(0x2006, (target & 0xFF) as u8);
        let _ = bus.read(0x2007); // prime the buffer
        prop_assert_eq!(bus.read(0x2007), value);
    }
}
