//! Opcode definitions and the 256-entry dispatch table.
//!
//! The table holds static data only: mnemonic, addressing mode, base cycle
//! count and whether the opcode pays the page-cross penalty. Execution is a
//! single `match` over [`Mnemonic`] in [`crate::Cpu`]; there are no per-opcode
//! function pointers.
//!
//! Unofficial opcodes keep their real addressing mode and base cycle count so
//! that byte counts and timing stay consistent, but they execute as NOPs.
//!
//! Reference: <https://www.nesdev.org/obelisk-6502-guide/reference.html>

use crate::addressing::AddressingMode;

/// Semantic operation selected by an opcode.
///
/// One variant per official instruction; every unofficial opcode maps to
/// [`Mnemonic::Nop`].
#[allow(missing_docs)] // the 6502 mnemonics are their own documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs,
    Clc, Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx,
    Iny, Jmp, Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp,
    Rol, Ror, Rti, Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay,
    Tsx, Txa, Txs, Tya,
}

/// Static description of one opcode.
#[derive(Debug, Clone, Copy)]
pub struct OpcodeInfo {
    /// Semantic operation.
    pub mnemonic: Mnemonic,
    /// Addressing mode (determines operand byte count).
    pub addr_mode: AddressingMode,
    /// Base cycle count, before branch/page-cross penalties.
    pub cycles: u8,
    /// Whether a page-crossing read adds one cycle.
    pub page_cross_penalty: bool,
    /// Whether this is an unofficial opcode (executed as a NOP).
    pub unofficial: bool,
}

impl OpcodeInfo {
    /// Total instruction length in bytes, including the opcode.
    #[must_use]
    pub const fn byte_count(&self) -> u8 {
        1 + self.addr_mode.operand_size()
    }
}

/// Official opcode, no page-cross penalty.
const fn op(mnemonic: Mnemonic, addr_mode: AddressingMode, cycles: u8) -> OpcodeInfo {
    OpcodeInfo {
        mnemonic,
        addr_mode,
        cycles,
        page_cross_penalty: false,
        unofficial: false,
    }
}

/// Official read opcode that pays +1 cycle on a page cross.
const fn opx(mnemonic: Mnemonic, addr_mode: AddressingMode, cycles: u8) -> OpcodeInfo {
    OpcodeInfo {
        mnemonic,
        addr_mode,
        cycles,
        page_cross_penalty: true,
        unofficial: false,
    }
}

/// Unofficial opcode slot: correct length and base cycles, NOP semantics.
const fn ill(addr_mode: AddressingMode, cycles: u8) -> OpcodeInfo {
    OpcodeInfo {
        mnemonic: Mnemonic::Nop,
        addr_mode,
        cycles,
        page_cross_penalty: false,
        unofficial: true,
    }
}

use crate::addressing::AddressingMode::{
    Absolute, AbsoluteX, AbsoluteY, Accumulator, Immediate, Implied, Indirect, IndirectX,
    IndirectY, Relative, ZeroPage, ZeroPageX, ZeroPageY,
};
#[allow(clippy::enum_glob_use)]
use self::Mnemonic::*;

/// Complete 256-entry opcode lookup table, indexed by opcode byte.
#[rustfmt::skip]
pub const OPCODE_TABLE: [OpcodeInfo; 256] = [
    // 0x00-0x0F
    op(Brk, Implied, 7),     op(Ora, IndirectX, 6),   ill(Implied, 2),         ill(IndirectX, 8),
    ill(ZeroPage, 3),        op(Ora, ZeroPage, 3),    op(Asl, ZeroPage, 5),    ill(ZeroPage, 5),
    op(Php, Implied, 3),     op(Ora, Immediate, 2),   op(Asl, Accumulator, 2), ill(Immediate, 2),
    ill(Absolute, 4),        op(Ora, Absolute, 4),    op(Asl, Absolute, 6),    ill(Absolute, 6),
    // 0x10-0x1F
    op(Bpl, Relative, 2),    opx(Ora, IndirectY, 5),  ill(Implied, 2),         ill(IndirectY, 8),
    ill(ZeroPageX, 4),       op(Ora, ZeroPageX, 4),   op(Asl, ZeroPageX, 6),   ill(ZeroPageX, 6),
    op(Clc, Implied, 2),     opx(Ora, AbsoluteY, 4),  ill(Implied, 2),         ill(AbsoluteY, 7),
    ill(AbsoluteX, 4),       opx(Ora, AbsoluteX, 4),  op(Asl, AbsoluteX, 7),   ill(AbsoluteX, 7),
    // 0x20-0x2F
    op(Jsr, Absolute, 6),    op(And, IndirectX, 6),   ill(Implied, 2),         ill(IndirectX, 8),
    op(Bit, ZeroPage, 3),    op(And, ZeroPage, 3),    op(Rol, ZeroPage, 5),    ill(ZeroPage, 5),
    op(Plp, Implied, 4),     op(And, Immediate, 2),   op(Rol, Accumulator, 2), ill(Immediate, 2),
    op(Bit, Absolute, 4),    op(And, Absolute, 4),    op(Rol, Absolute, 6),    ill(Absolute, 6),
    // 0x30-0x3F
    op(Bmi, Relative, 2),    opx(And, IndirectY, 5),  ill(Implied, 2),         ill(IndirectY, 8),
    ill(ZeroPageX, 4),       op(And, ZeroPageX, 4),   op(Rol, ZeroPageX, 6),   ill(ZeroPageX, 6),
    op(Sec, Implied, 2),     opx(And, AbsoluteY, 4),  ill(Implied, 2),         ill(AbsoluteY, 7),
    ill(AbsoluteX, 4),       opx(And, AbsoluteX, 4),  op(Rol, AbsoluteX, 7),   ill(AbsoluteX, 7),
    // 0x40-0x4F
    op(Rti, Implied, 6),     op(Eor, IndirectX, 6),   ill(Implied, 2),         ill(IndirectX, 8),
    ill(ZeroPage, 3),        op(Eor, ZeroPage, 3),    op(Lsr, ZeroPage, 5),    ill(ZeroPage, 5),
    op(Pha, Implied, 3),     op(Eor, Immediate, 2),   op(Lsr, Accumulator, 2), ill(Immediate, 2),
    op(Jmp, Absolute, 3),    op(Eor, Absolute, 4),    op(Lsr, Absolute, 6),    ill(Absolute, 6),
    // 0x50-0x5F
    op(Bvc, Relative, 2),    opx(Eor, IndirectY, 5),  ill(Implied, 2),         ill(IndirectY, 8),
    ill(ZeroPageX, 4),       op(Eor, ZeroPageX, 4),   op(Lsr, ZeroPageX, 6),   ill(ZeroPageX, 6),
    op(Cli, Implied, 2),     opx(Eor, AbsoluteY, 4),  ill(Implied, 2),         ill(AbsoluteY, 7),
    ill(AbsoluteX, 4),       opx(Eor, AbsoluteX, 4),  op(Lsr, AbsoluteX, 7),   ill(AbsoluteX, 7),
    // 0x60-0x6F
    op(Rts, Implied, 6),     op(Adc, IndirectX, 6),   ill(Implied, 2),         ill(IndirectX, 8),
    ill(ZeroPage, 3),        op(Adc, ZeroPage, 3),    op(Ror, ZeroPage, 5),    ill(ZeroPage, 5),
    op(Pla, Implied, 4),     op(Adc, Immediate, 2),   op(Ror, Accumulator, 2), ill(Immediate, 2),
    op(Jmp, Indirect, 5),    op(Adc, Absolute, 4),    op(Ror, Absolute, 6),    ill(Absolute, 6),
    // 0x70-0x7F
    op(Bvs, Relative, 2),    opx(Adc, IndirectY, 5),  ill(Implied, 2),         ill(IndirectY, 8),
    ill(ZeroPageX, 4),       op(Adc, ZeroPageX, 4),   op(Ror, ZeroPageX, 6),   ill(ZeroPageX, 6),
    op(Sei, Implied, 2),     opx(Adc, AbsoluteY, 4),  ill(Implied, 2),         ill(AbsoluteY, 7),
    ill(AbsoluteX, 4),       opx(Adc, AbsoluteX, 4),  op(Ror, AbsoluteX, 7),   ill(AbsoluteX, 7),
    // 0x80-0x8F
    ill(Immediate, 2),       op(Sta, IndirectX, 6),   ill(Immediate, 2),       ill(IndirectX, 6),
    op(Sty, ZeroPage, 3),    op(Sta, ZeroPage, 3),    op(Stx, ZeroPage, 3),    ill(ZeroPage, 3),
    op(Dey, Implied, 2),     ill(Immediate, 2),       op(Txa, Implied, 2),     ill(Immediate, 2),
    op(Sty, Absolute, 4),    op(Sta, Absolute, 4),    op(Stx, Absolute, 4),    ill(Absolute, 4),
    // 0x90-0x9F
    op(Bcc, Relative, 2),    op(Sta, IndirectY, 6),   ill(Implied, 2),         ill(IndirectY, 6),
    op(Sty, ZeroPageX, 4),   op(Sta, ZeroPageX, 4),   op(Stx, ZeroPageY, 4),   ill(ZeroPageY, 4),
    op(Tya, Implied, 2),     op(Sta, AbsoluteY, 5),   op(Txs, Implied, 2),     ill(AbsoluteY, 5),
    ill(AbsoluteX, 5),       op(Sta, AbsoluteX, 5),   ill(AbsoluteY, 5),       ill(AbsoluteY, 5),
    // 0xA0-0xAF
    op(Ldy, Immediate, 2),   op(Lda, IndirectX, 6),   op(Ldx, Immediate, 2),   ill(IndirectX, 6),
    op(Ldy, ZeroPage, 3),    op(Lda, ZeroPage, 3),    op(Ldx, ZeroPage, 3),    ill(ZeroPage, 3),
    op(Tay, Implied, 2),     op(Lda, Immediate, 2),   op(Tax, Implied, 2),     ill(Immediate, 2),
    op(Ldy, Absolute, 4),    op(Lda, Absolute, 4),    op(Ldx, Absolute, 4),    ill(Absolute, 4),
    // 0xB0-0xBF
    op(Bcs, Relative, 2),    opx(Lda, IndirectY, 5),  ill(Implied, 2),         ill(IndirectY, 5),
    op(Ldy, ZeroPageX, 4),   op(Lda, ZeroPageX, 4),   op(Ldx, ZeroPageY, 4),   ill(ZeroPageY, 4),
    op(Clv, Implied, 2),     opx(Lda, AbsoluteY, 4),  op(Tsx, Implied, 2),     ill(AbsoluteY, 4),
    opx(Ldy, AbsoluteX, 4),  opx(Lda, AbsoluteX, 4),  opx(Ldx, AbsoluteY, 4),  ill(AbsoluteY, 4),
    // 0xC0-0xCF
    op(Cpy, Immediate, 2),   op(Cmp, IndirectX, 6),   ill(Immediate, 2),       ill(IndirectX, 8),
    op(Cpy, ZeroPage, 3),    op(Cmp, ZeroPage, 3),    op(Dec, ZeroPage, 5),    ill(ZeroPage, 5),
    op(Iny, Implied, 2),     op(Cmp, Immediate, 2),   op(Dex, Implied, 2),     ill(Immediate, 2),
    op(Cpy, Absolute, 4),    op(Cmp, Absolute, 4),    op(Dec, Absolute, 6),    ill(Absolute, 6),
    // 0xD0-0xDF
    op(Bne, Relative, 2),    opx(Cmp, IndirectY, 5),  ill(Implied, 2),         ill(IndirectY, 8),
    ill(ZeroPageX, 4),       op(Cmp, ZeroPageX, 4),   op(Dec, ZeroPageX, 6),   ill(ZeroPageX, 6),
    op(Cld, Implied, 2),     opx(Cmp, AbsoluteY, 4),  ill(Implied, 2),         ill(AbsoluteY, 7),
    ill(AbsoluteX, 4),       opx(Cmp, AbsoluteX, 4),  op(Dec, AbsoluteX, 7),   ill(AbsoluteX, 7),
    // 0xE0-0xEF
    op(Cpx, Immediate, 2),   op(Sbc, IndirectX, 6),   ill(Immediate, 2),       ill(IndirectX, 8),
    op(Cpx, ZeroPage, 3),    op(Sbc, ZeroPage, 3),    op(Inc, ZeroPage, 5),    ill(ZeroPage, 5),
    op(Inx, Implied, 2),     op(Sbc, Immediate, 2),   op(Nop, Implied, 2),     ill(Immediate, 2),
    op(Cpx, Absolute, 4),    op(Sbc, Absolute, 4),    op(Inc, Absolute, 6),    ill(Absolute, 6),
    // 0xF0-0xFF
    op(Beq, Relative, 2),    opx(Sbc, IndirectY, 5),  ill(Implied, 2),         ill(IndirectY, 8),
    ill(ZeroPageX, 4),       op(Sbc, ZeroPageX, 4),   op(Inc, ZeroPageX, 6),   ill(ZeroPageX, 6),
    op(Sed, Implied, 2),     opx(Sbc, AbsoluteY, 4),  ill(Implied, 2),         ill(AbsoluteY, 7),
    ill(AbsoluteX, 4),       opx(Sbc, AbsoluteX, 4),  op(Inc, AbsoluteX, 7),   ill(AbsoluteX, 7),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_known_opcodes() {
        // LDA variants
        assert_eq!(OPCODE_TABLE[0xA9].mnemonic, Mnemonic::Lda);
        assert_eq!(OPCODE_TABLE[0xA9].addr_mode, AddressingMode::Immediate);
        assert_eq!(OPCODE_TABLE[0xA9].cycles, 2);
        assert_eq!(OPCODE_TABLE[0xBD].addr_mode, AddressingMode::AbsoluteX);
        assert!(OPCODE_TABLE[0xBD].page_cross_penalty);

        // Stores never pay the page-cross penalty
        assert_eq!(OPCODE_TABLE[0x9D].mnemonic, Mnemonic::Sta);
        assert_eq!(OPCODE_TABLE[0x9D].cycles, 5);
        assert!(!OPCODE_TABLE[0x9D].page_cross_penalty);

        // JMP indirect
        assert_eq!(OPCODE_TABLE[0x6C].mnemonic, Mnemonic::Jmp);
        assert_eq!(OPCODE_TABLE[0x6C].addr_mode, AddressingMode::Indirect);
        assert_eq!(OPCODE_TABLE[0x6C].cycles, 5);
    }

    #[test]
    fn byte_counts_follow_addressing_mode() {
        assert_eq!(OPCODE_TABLE[0xEA].byte_count(), 1); // NOP
        assert_eq!(OPCODE_TABLE[0xA9].byte_count(), 2); // LDA #imm
        assert_eq!(OPCODE_TABLE[0xAD].byte_count(), 3); // LDA abs
        assert_eq!(OPCODE_TABLE[0x00].byte_count(), 1); // BRK
    }

    #[test]
    fn official_count_is_151() {
        let official = OPCODE_TABLE.iter().filter(|info| !info.unofficial).count();
        assert_eq!(official, 151);
    }

    #[test]
    fn unofficial_entries_are_nops() {
        for info in OPCODE_TABLE.iter().filter(|info| info.unofficial) {
            assert_eq!(info.mnemonic, Mnemonic::Nop);
        }
    }

    #[test]
    fn branch_opcodes_are_relative() {
        for code in [0x10, 0x30, 0x50, 0x70, 0x90, 0xB0, 0xD0, 0xF0] {
            let info = &OPCODE_TABLE[code];
            assert_eq!(info.addr_mode, AddressingMode::Relative);
            assert_eq!(info.cycles, 2);
        }
    }
}
