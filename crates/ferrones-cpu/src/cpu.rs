//! 6502 CPU core.
//!
//! Instruction-level interpreter: [`Cpu::step`] fetches, decodes and executes
//! exactly one instruction against a [`Bus`] and returns its cycle count,
//! including branch and page-cross penalties. Interrupts (reset, NMI, IRQ,
//! BRK) follow the NESdev-documented sequences.

use crate::addressing::AddressingMode;
use crate::opcodes::{Mnemonic, OpcodeInfo, OPCODE_TABLE};
use crate::status::Status;
use crate::vectors;

/// CPU memory bus abstraction.
///
/// The CPU reaches all memory and memory-mapped I/O through this trait,
/// which keeps it free of references to the rest of the machine.
pub trait Bus {
    /// Read a byte from the CPU address space.
    fn read(&mut self, addr: u16) -> u8;

    /// Write a byte to the CPU address space.
    fn write(&mut self, addr: u16, value: u8);

    /// Read a little-endian 16-bit word, wrapping at the address-space end.
    fn read_u16(&mut self, addr: u16) -> u16 {
        let lo = self.read(addr);
        let hi = self.read(addr.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }
}

/// The stack occupies $0100-$01FF.
const STACK_BASE: u16 = 0x0100;

/// Stack pointer value after reset.
const STACK_RESET: u8 = 0xFD;

/// NES 2A03 CPU (MOS 6502 without decimal mode).
#[derive(Debug)]
pub struct Cpu {
    /// Accumulator.
    pub a: u8,
    /// X index register.
    pub x: u8,
    /// Y index register.
    pub y: u8,
    /// Program counter.
    pub pc: u16,
    /// Stack pointer (offset into $0100-$01FF).
    pub sp: u8,
    /// Status register. Bit 5 reads as 1 after every instruction.
    pub status: Status,
    /// Total cycles executed since power-on.
    cycles: u64,
    /// Latched NMI request (edge), serviced before the next instruction.
    nmi_pending: bool,
    /// IRQ line level, serviced before the next instruction when I = 0.
    irq_line: bool,
}

impl Cpu {
    /// Creates a CPU in the power-on state. Call [`Cpu::reset`] to load the
    /// program counter from the reset vector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            pc: 0,
            sp: STACK_RESET,
            status: Status::POWER_ON,
            cycles: 0,
            nmi_pending: false,
            irq_line: false,
        }
    }

    /// Resets the CPU: SP = $FD, P = $24, PC loaded from `[$FFFC]`.
    /// The reset sequence itself takes 7 cycles.
    pub fn reset(&mut self, bus: &mut impl Bus) {
        self.a = 0;
        self.x = 0;
        self.y = 0;
        self.sp = STACK_RESET;
        self.status = Status::POWER_ON;
        self.pc = bus.read_u16(vectors::RESET);
        self.nmi_pending = false;
        self.irq_line = false;
        self.cycles += 7;
    }

    /// Total cycles executed since power-on.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Latches an NMI request; serviced before the next [`Cpu::step`].
    pub fn trigger_nmi(&mut self) {
        self.nmi_pending = true;
    }

    /// Sets the IRQ line level; serviced while low (true) and I = 0.
    pub fn set_irq(&mut self, active: bool) {
        self.irq_line = active;
    }

    /// Services an NMI immediately: pushes PC and status (B clear), sets I,
    /// vectors through `[$FFFA]`. Returns the 7 cycles consumed.
    pub fn nmi(&mut self, bus: &mut impl Bus) -> u8 {
        self.interrupt(bus, vectors::NMI)
    }

    /// Services an IRQ if the I flag allows it: pushes PC and status
    /// (B clear), sets I, vectors through `[$FFFE]`. Returns the cycles
    /// consumed (0 when masked).
    pub fn irq(&mut self, bus: &mut impl Bus) -> u8 {
        if self.status.contains(Status::I) {
            return 0;
        }
        self.interrupt(bus, vectors::IRQ)
    }

    fn interrupt(&mut self, bus: &mut impl Bus, vector: u16) -> u8 {
        self.push_u16(bus, self.pc);
        self.push(bus, self.status.to_stack_byte(false));
        self.status.set_flag(Status::I, true);
        self.pc = bus.read_u16(vector);
        self.cycles += 7;
        7
    }

    /// Executes one instruction and returns the cycles it consumed.
    ///
    /// A pending NMI (or an active IRQ with I = 0) is serviced instead of
    /// fetching, consuming the interrupt sequence's 7 cycles.
    pub fn step(&mut self, bus: &mut impl Bus) -> u8 {
        if self.nmi_pending {
            self.nmi_pending = false;
            return self.nmi(bus);
        }
        if self.irq_line && !self.status.contains(Status::I) {
            return self.irq(bus);
        }

        let opcode = bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);

        let info = &OPCODE_TABLE[opcode as usize];
        let extra = self.execute(opcode, info, bus);

        let total = info.cycles + extra;
        self.cycles += u64::from(total);
        total
    }

    // ------------------------------------------------------------------
    // Operand resolution
    // ------------------------------------------------------------------

    fn fetch(&mut self, bus: &mut impl Bus) -> u8 {
        let value = bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        value
    }

    fn fetch_u16(&mut self, bus: &mut impl Bus) -> u16 {
        let lo = self.fetch(bus);
        let hi = self.fetch(bus);
        u16::from_le_bytes([lo, hi])
    }

    fn page_crossed(a: u16, b: u16) -> bool {
        (a & 0xFF00) != (b & 0xFF00)
    }

    /// Resolves the effective address for `mode`, consuming operand bytes.
    /// Returns the address and whether an index carried into the high byte.
    fn operand_addr(&mut self, bus: &mut impl Bus, mode: AddressingMode) -> (u16, bool) {
        match mode {
            AddressingMode::Immediate => {
                let addr = self.pc;
                self.pc = self.pc.wrapping_add(1);
                (addr, false)
            }
            AddressingMode::ZeroPage => (u16::from(self.fetch(bus)), false),
            AddressingMode::ZeroPageX => {
                (u16::from(self.fetch(bus).wrapping_add(self.x)), false)
            }
            AddressingMode::ZeroPageY => {
                (u16::from(self.fetch(bus).wrapping_add(self.y)), false)
            }
            AddressingMode::Absolute => (self.fetch_u16(bus), false),
            AddressingMode::AbsoluteX => {
                let base = self.fetch_u16(bus);
                let addr = base.wrapping_add(u16::from(self.x));
                (addr, Self::page_crossed(base, addr))
            }
            AddressingMode::AbsoluteY => {
                let base = self.fetch_u16(bus);
                let addr = base.wrapping_add(u16::from(self.y));
                (addr, Self::page_crossed(base, addr))
            }
            AddressingMode::Indirect => {
                // JMP ($xxFF) fetches the high byte from the same page.
                let ptr = self.fetch_u16(bus);
                let lo = bus.read(ptr);
                let hi = bus.read((ptr & 0xFF00) | (ptr.wrapping_add(1) & 0x00FF));
                (u16::from_le_bytes([lo, hi]), false)
            }
            AddressingMode::IndirectX => {
                let ptr = self.fetch(bus).wrapping_add(self.x);
                let lo = bus.read(u16::from(ptr));
                let hi = bus.read(u16::from(ptr.wrapping_add(1)));
                (u16::from_le_bytes([lo, hi]), false)
            }
            AddressingMode::IndirectY => {
                let ptr = self.fetch(bus);
                let lo = bus.read(u16::from(ptr));
                let hi = bus.read(u16::from(ptr.wrapping_add(1)));
                let base = u16::from_le_bytes([lo, hi]);
                let addr = base.wrapping_add(u16::from(self.y));
                (addr, Self::page_crossed(base, addr))
            }
            AddressingMode::Implied | AddressingMode::Accumulator | AddressingMode::Relative => {
                unreachable!("mode {mode:?} has no effective address")
            }
        }
    }

    fn read_operand(&mut self, bus: &mut impl Bus, mode: AddressingMode) -> (u8, bool) {
        let (addr, crossed) = self.operand_addr(bus, mode);
        (bus.read(addr), crossed)
    }

    // ------------------------------------------------------------------
    // Stack
    // ------------------------------------------------------------------

    fn push(&mut self, bus: &mut impl Bus, value: u8) {
        bus.write(STACK_BASE + u16::from(self.sp), value);
        self.sp = self.sp.wrapping_sub(1);
    }

    fn pop(&mut self, bus: &mut impl Bus) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        bus.read(STACK_BASE + u16::from(self.sp))
    }

    fn push_u16(&mut self, bus: &mut impl Bus, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.push(bus, hi);
        self.push(bus, lo);
    }

    fn pop_u16(&mut self, bus: &mut impl Bus) -> u16 {
        let lo = self.pop(bus);
        let hi = self.pop(bus);
        u16::from_le_bytes([lo, hi])
    }

    // ------------------------------------------------------------------
    // Shared semantic helpers
    // ------------------------------------------------------------------

    /// Adds `value` plus carry into A; shared by ADC and SBC (SBC adds the
    /// one's complement, which yields the documented carry/overflow rules).
    fn add(&mut self, value: u8) {
        let a = u16::from(self.a);
        let v = u16::from(value);
        let c = u16::from(self.status.contains(Status::C));

        let sum = a + v + c;
        let result = sum as u8;

        self.status.set_flag(Status::C, sum > 0xFF);
        self.status
            .set_flag(Status::V, (!(a ^ v) & (a ^ sum)) & 0x80 != 0);
        self.a = result;
        self.status.set_zn(result);
    }

    fn compare(&mut self, reg: u8, value: u8) {
        self.status.set_flag(Status::C, reg >= value);
        self.status.set_flag(Status::Z, reg == value);
        self.status
            .set_flag(Status::N, reg.wrapping_sub(value) & 0x80 != 0);
    }

    /// Fetches the branch offset and, if taken, retargets PC.
    /// Returns the penalty cycles: +1 taken, +1 more on a page cross.
    fn branch(&mut self, bus: &mut impl Bus, condition: bool) -> u8 {
        let offset = self.fetch(bus) as i8;
        if !condition {
            return 0;
        }
        let target = self.pc.wrapping_add(offset as u16);
        let mut penalty = 1;
        if Self::page_crossed(self.pc, target) {
            penalty += 1;
        }
        self.pc = target;
        penalty
    }

    /// Read-modify-write against memory or the accumulator.
    fn rmw(
        &mut self,
        bus: &mut impl Bus,
        mode: AddressingMode,
        f: impl FnOnce(&mut Status, u8) -> u8,
    ) {
        if mode == AddressingMode::Accumulator {
            let result = f(&mut self.status, self.a);
            self.a = result;
            self.status.set_zn(result);
        } else {
            let (addr, _) = self.operand_addr(bus, mode);
            let value = bus.read(addr);
            let result = f(&mut self.status, value);
            bus.write(addr, result);
            self.status.set_zn(result);
        }
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    #[allow(clippy::too_many_lines)] // one arm per semantic operation
    fn execute(&mut self, opcode: u8, info: &OpcodeInfo, bus: &mut impl Bus) -> u8 {
        let mode = info.addr_mode;
        let mut crossed = false;
        let mut branch_penalty = 0;

        match info.mnemonic {
            // Loads
            Mnemonic::Lda => {
                let (value, c) = self.read_operand(bus, mode);
                crossed = c;
                self.a = value;
                self.status.set_zn(value);
            }
            Mnemonic::Ldx => {
                let (value, c) = self.read_operand(bus, mode);
                crossed = c;
                self.x = value;
                self.status.set_zn(value);
            }
            Mnemonic::Ldy => {
                let (value, c) = self.read_operand(bus, mode);
                crossed = c;
                self.y = value;
                self.status.set_zn(value);
            }

            // Stores
            Mnemonic::Sta => {
                let (addr, _) = self.operand_addr(bus, mode);
                bus.write(addr, self.a);
            }
            Mnemonic::Stx => {
                let (addr, _) = self.operand_addr(bus, mode);
                bus.write(addr, self.x);
            }
            Mnemonic::Sty => {
                let (addr, _) = self.operand_addr(bus, mode);
                bus.write(addr, self.y);
            }

            // Transfers
            Mnemonic::Tax => {
                self.x = self.a;
                self.status.set_zn(self.x);
            }
            Mnemonic::Tay => {
                self.y = self.a;
                self.status.set_zn(self.y);
            }
            Mnemonic::Txa => {
                self.a = self.x;
                self.status.set_zn(self.a);
            }
            Mnemonic::Tya => {
                self.a = self.y;
                self.status.set_zn(self.a);
            }
            Mnemonic::Tsx => {
                self.x = self.sp;
                self.status.set_zn(self.x);
            }
            Mnemonic::Txs => {
                // TXS does not affect flags.
                self.sp = self.x;
            }

            // Arithmetic
            Mnemonic::Adc => {
                let (value, c) = self.read_operand(bus, mode);
                crossed = c;
                self.add(value);
            }
            Mnemonic::Sbc => {
                let (value, c) = self.read_operand(bus, mode);
                crossed = c;
                self.add(!value);
            }

            // Logical
            Mnemonic::And => {
                let (value, c) = self.read_operand(bus, mode);
                crossed = c;
                self.a &= value;
                self.status.set_zn(self.a);
            }
            Mnemonic::Ora => {
                let (value, c) = self.read_operand(bus, mode);
                crossed = c;
                self.a |= value;
                self.status.set_zn(self.a);
            }
            Mnemonic::Eor => {
                let (value, c) = self.read_operand(bus, mode);
                crossed = c;
                self.a ^= value;
                self.status.set_zn(self.a);
            }

            // Compares
            Mnemonic::Cmp => {
                let (value, c) = self.read_operand(bus, mode);
                crossed = c;
                self.compare(self.a, value);
            }
            Mnemonic::Cpx => {
                let (value, _) = self.read_operand(bus, mode);
                self.compare(self.x, value);
            }
            Mnemonic::Cpy => {
                let (value, _) = self.read_operand(bus, mode);
                self.compare(self.y, value);
            }

            // Bit test
            Mnemonic::Bit => {
                let (value, _) = self.read_operand(bus, mode);
                self.status.set_flag(Status::Z, self.a & value == 0);
                self.status.set_flag(Status::V, value & 0x40 != 0);
                self.status.set_flag(Status::N, value & 0x80 != 0);
            }

            // Increments / decrements
            Mnemonic::Inc => self.rmw(bus, mode, |_, v| v.wrapping_add(1)),
            Mnemonic::Dec => self.rmw(bus, mode, |_, v| v.wrapping_sub(1)),
            Mnemonic::Inx => {
                self.x = self.x.wrapping_add(1);
                self.status.set_zn(self.x);
            }
            Mnemonic::Iny => {
                self.y = self.y.wrapping_add(1);
                self.status.set_zn(self.y);
            }
            Mnemonic::Dex => {
                self.x = self.x.wrapping_sub(1);
                self.status.set_zn(self.x);
            }
            Mnemonic::Dey => {
                self.y = self.y.wrapping_sub(1);
                self.status.set_zn(self.y);
            }

            // Shifts / rotates
            Mnemonic::Asl => self.rmw(bus, mode, |status, v| {
                status.set_flag(Status::C, v & 0x80 != 0);
                v << 1
            }),
            Mnemonic::Lsr => self.rmw(bus, mode, |status, v| {
                status.set_flag(Status::C, v & 0x01 != 0);
                v >> 1
            }),
            Mnemonic::Rol => self.rmw(bus, mode, |status, v| {
                let carry_in = u8::from(status.contains(Status::C));
                status.set_flag(Status::C, v & 0x80 != 0);
                (v << 1) | carry_in
            }),
            Mnemonic::Ror => self.rmw(bus, mode, |status, v| {
                let carry_in = u8::from(status.contains(Status::C)) << 7;
                status.set_flag(Status::C, v & 0x01 != 0);
                (v >> 1) | carry_in
            }),

            // Branches
            Mnemonic::Bcc => {
                branch_penalty = self.branch(bus, !self.status.contains(Status::C));
            }
            Mnemonic::Bcs => {
                branch_penalty = self.branch(bus, self.status.contains(Status::C));
            }
            Mnemonic::Bne => {
                branch_penalty = self.branch(bus, !self.status.contains(Status::Z));
            }
            Mnemonic::Beq => {
                branch_penalty = self.branch(bus, self.status.contains(Status::Z));
            }
            Mnemonic::Bpl => {
                branch_penalty = self.branch(bus, !self.status.contains(Status::N));
            }
            Mnemonic::Bmi => {
                branch_penalty = self.branch(bus, self.status.contains(Status::N));
            }
            Mnemonic::Bvc => {
                branch_penalty = self.branch(bus, !self.status.contains(Status::V));
            }
            Mnemonic::Bvs => {
                branch_penalty = self.branch(bus, self.status.contains(Status::V));
            }

            // Jumps / subroutines
            Mnemonic::Jmp => {
                let (addr, _) = self.operand_addr(bus, mode);
                self.pc = addr;
            }
            Mnemonic::Jsr => {
                let target = self.fetch_u16(bus);
                self.push_u16(bus, self.pc.wrapping_sub(1));
                self.pc = target;
            }
            Mnemonic::Rts => {
                self.pc = self.pop_u16(bus).wrapping_add(1);
            }
            Mnemonic::Rti => {
                let pulled = self.pop(bus);
                self.status = Status::from_stack_byte(pulled);
                self.pc = self.pop_u16(bus);
            }

            // Stack
            Mnemonic::Pha => self.push(bus, self.a),
            Mnemonic::Php => {
                let value = self.status.to_stack_byte(true);
                self.push(bus, value);
            }
            Mnemonic::Pla => {
                self.a = self.pop(bus);
                self.status.set_zn(self.a);
            }
            Mnemonic::Plp => {
                let pulled = self.pop(bus);
                self.status = Status::from_stack_byte(pulled);
            }

            // Flags
            Mnemonic::Clc => self.status.set_flag(Status::C, false),
            Mnemonic::Sec => self.status.set_flag(Status::C, true),
            Mnemonic::Cli => self.status.set_flag(Status::I, false),
            Mnemonic::Sei => self.status.set_flag(Status::I, true),
            Mnemonic::Cld => self.status.set_flag(Status::D, false),
            Mnemonic::Sed => self.status.set_flag(Status::D, true),
            Mnemonic::Clv => self.status.set_flag(Status::V, false),

            // Interrupt
            Mnemonic::Brk => {
                // BRK pushes the address after its padding byte.
                self.pc = self.pc.wrapping_add(1);
                self.push_u16(bus, self.pc);
                self.push(bus, self.status.to_stack_byte(true));
                self.status.set_flag(Status::I, true);
                self.pc = bus.read_u16(vectors::IRQ);
            }

            // NOP: official 0xEA does nothing; unofficial slots skip their
            // operand bytes without touching memory.
            Mnemonic::Nop => {
                if info.unofficial {
                    log::warn!(
                        "unofficial opcode ${opcode:02X} at ${:04X} executed as NOP",
                        self.pc.wrapping_sub(1)
                    );
                }
                self.pc = self.pc.wrapping_add(u16::from(mode.operand_size()));
            }
        }

        branch_penalty + u8::from(crossed && info.page_cross_penalty)
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}
