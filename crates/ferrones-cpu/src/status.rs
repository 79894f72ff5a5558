//! CPU Status Register (P register) flags.
//!
//! ```text
//! 7  6  5  4  3  2  1  0
//! N  V  U  B  D  I  Z  C
//! │  │  │  │  │  │  │  └─ Carry
//! │  │  │  │  │  │  └──── Zero
//! │  │  │  │  │  └─────── Interrupt Disable
//! │  │  │  │  └────────── Decimal Mode (no effect on the 2A03)
//! │  │  │  └───────────── Break (1 when pushed by PHP/BRK, 0 by IRQ/NMI)
//! │  │  └──────────────── Unused (reads as 1, always 1 when pushed)
//! │  └─────────────────── Overflow
//! └────────────────────── Negative
//! ```
//!
//! The B and U bits only exist on pushed copies of the register; inside the
//! CPU, U is held at 1 and B at 0.

use bitflags::bitflags;

bitflags! {
    /// CPU status register flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Status: u8 {
        /// Carry flag.
        const C = 1 << 0;

        /// Zero flag - set if the result of the last operation was zero.
        const Z = 1 << 1;

        /// Interrupt Disable flag - when set, IRQ is masked (NMI is not).
        const I = 1 << 2;

        /// Decimal Mode flag - the 2A03 has no BCD unit, but the bit
        /// is still settable and observable.
        const D = 1 << 3;

        /// Break flag - meaningful only on pushed copies of the register.
        const B = 1 << 4;

        /// Unused flag - always reads as 1.
        const U = 1 << 5;

        /// Overflow flag - signed overflow of the last arithmetic operation.
        const V = 1 << 6;

        /// Negative flag - bit 7 of the last result.
        const N = 1 << 7;
    }
}

impl Status {
    /// Status after power-on and reset: I set, U set ($24).
    pub const POWER_ON: Self = Self::I.union(Self::U);

    /// Creates a new status register in the power-on state.
    #[must_use]
    pub const fn new() -> Self {
        Self::POWER_ON
    }

    /// Sets or clears the Zero and Negative flags from a result byte.
    #[inline]
    pub fn set_zn(&mut self, value: u8) {
        self.set_flag(Self::Z, value == 0);
        self.set_flag(Self::N, value & 0x80 != 0);
    }

    /// Sets or clears a single flag.
    #[inline]
    pub fn set_flag(&mut self, flag: Self, value: bool) {
        if value {
            *self |= flag;
        } else {
            *self &= !flag;
        }
    }

    /// Converts the register to the byte pushed on the stack.
    ///
    /// U is always set on pushed copies; B is set for PHP/BRK pushes and
    /// clear for IRQ/NMI pushes.
    #[inline]
    #[must_use]
    pub const fn to_stack_byte(self, brk: bool) -> u8 {
        let mut value = self.bits() | Self::U.bits();
        if brk {
            value |= Self::B.bits();
        }
        value
    }

    /// Rebuilds the register from a byte pulled off the stack.
    ///
    /// B is discarded and U is forced to 1 (PLP and RTI behavior).
    #[inline]
    #[must_use]
    pub fn from_stack_byte(value: u8) -> Self {
        Self::from_bits_truncate((value & !Self::B.bits()) | Self::U.bits())
    }
}
