//! Execution trace formatting.
//!
//! Produces one nestest-style line per instruction:
//!
//! ```text
//! C000  4C F5 C5  JMP $C5F5                A:00 X:00 Y:00 P:24 SP:FD CYC:7
//! ```
//!
//! The formatter reads the instruction bytes through the bus, so it should
//! only be pointed at plain memory (RAM/PRG-ROM); reading I/O registers has
//! side effects.

use std::fmt::Write as _;

use crate::addressing::AddressingMode;
use crate::cpu::{Bus, Cpu};
use crate::opcodes::OPCODE_TABLE;

/// Formats the state of `cpu` at its current PC as a single trace line.
pub fn trace_line<B: Bus>(cpu: &Cpu, bus: &mut B) -> String {
    let opcode = bus.read(cpu.pc);
    let info = &OPCODE_TABLE[opcode as usize];

    let mut raw = vec![opcode];
    for i in 1..u16::from(info.byte_count()) {
        raw.push(bus.read(cpu.pc.wrapping_add(i)));
    }

    let mut bytes = String::new();
    for byte in &raw {
        let _ = write!(bytes, "{byte:02X} ");
    }

    let mnemonic = format!("{:?}", info.mnemonic).to_uppercase();
    let operand = format_operand(info.addr_mode, &raw, cpu.pc);

    format!(
        "{:04X}  {bytes:<9} {mnemonic} {operand:<12} A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
        cpu.pc,
        cpu.a,
        cpu.x,
        cpu.y,
        cpu.status.bits(),
        cpu.sp,
        cpu.cycles(),
    )
}

fn format_operand(mode: AddressingMode, raw: &[u8], pc: u16) -> String {
    let byte = |i: usize| raw.get(i).copied().unwrap_or(0);
    let word = u16::from_le_bytes([byte(1), byte(2)]);

    match mode {
        AddressingMode::Implied => String::new(),
        AddressingMode::Accumulator => "A".to_string(),
        AddressingMode::Immediate => format!("#${:02X}", byte(1)),
        AddressingMode::ZeroPage => format!("${:02X}", byte(1)),
        AddressingMode::ZeroPageX => format!("${:02X},X", byte(1)),
        AddressingMode::ZeroPageY => format!("${:02X},Y", byte(1)),
        AddressingMode::Relative => {
            // Branch target: PC after the 2-byte instruction plus the offset.
            let target = pc.wrapping_add(2).wrapping_add(byte(1) as i8 as u16);
            format!("${target:04X}")
        }
        AddressingMode::Absolute => format!("${word:04X}"),
        AddressingMode::AbsoluteX => format!("${word:04X},X"),
        AddressingMode::AbsoluteY => format!("${word:04X},Y"),
        AddressingMode::Indirect => format!("(${word:04X})"),
        AddressingMode::IndirectX => format!("(${:02X},X)", byte(1)),
        AddressingMode::IndirectY => format!("(${:02X}),Y", byte(1)),
    }
}
