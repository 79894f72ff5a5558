//! End-to-end CPU scenarios driven through a full console and NROM image.

use ferrones_core::{Bus as _, Console, Status};

/// Builds an NROM-256 image whose PRG starts with `program` at $8000 and
/// whose reset vector points at `entry`.
fn rom_with(program: &[u8], entry: u16) -> Vec<u8> {
    let mut image = vec![0x4E, 0x45, 0x53, 0x1A, 2, 1, 0, 0];
    image.extend_from_slice(&[0; 8]);
    let mut prg = vec![0u8; 32 * 1024];
    prg[..program.len()].copy_from_slice(program);
    prg[0x7FFC] = (entry & 0xFF) as u8;
    prg[0x7FFD] = (entry >> 8) as u8;
    image.extend_from_slice(&prg);
    image.extend_from_slice(&[0; 8 * 1024]);
    image
}

fn console_with(program: &[u8], entry: u16) -> Console {
    let mut console = Console::new(&rom_with(program, entry)).unwrap();
    console.reset();
    console
}

#[test]
fn reset_vector_scenario() {
    let console = console_with(&[], 0x8000);
    assert_eq!(console.cpu().pc, 0x8000);
    assert_eq!(console.cpu().sp, 0xFD);
    assert_eq!(console.cpu().status.bits(), 0x24);
}

#[test]
fn load_store_verify_scenario() {
    // A9 42  LDA #$42
    // 85 10  STA $10
    // A5 10  LDA $10
    let mut console = console_with(&[0xA9, 0x42, 0x85, 0x10, 0xA5, 0x10], 0x8000);
    for _ in 0..3 {
        console.step();
    }
    assert_eq!(console.cpu().a, 0x42);
    assert_eq!(console.bus_mut().read(0x0010), 0x42);
    assert!(!console.cpu().status.contains(Status::Z));
    assert!(!console.cpu().status.contains(Status::N));
}

#[test]
fn branch_taken_with_page_cross_scenario() {
    // $80FB: A2 00   LDX #$00
    // $80FD: E8      INX
    // $80FE: D0 FD   BNE -3  (back to the INX at $80FD, crossing a page)
    let mut program = vec![0u8; 0x100];
    program[0xFB] = 0xA2;
    program[0xFC] = 0x00;
    program[0xFD] = 0xE8;
    program[0xFE] = 0xD0;
    program[0xFF] = 0xFD;
    let mut console = console_with(&program, 0x80FB);

    console.step(); // LDX
    console.step(); // INX, X = 1 so Z = 0
    let cycles = console.step(); // BNE taken across the page boundary
    assert_eq!(cycles, 4); // 2 base + 1 taken + 1 page cross
    assert_eq!(console.cpu().pc, 0x80FD);
}

#[test]
fn jsr_rts_round_trip_scenario() {
    // $8000: 20 10 80  JSR $8010
    // $8010: 60        RTS
    let mut program = vec![0u8; 0x20];
    program[0x00] = 0x20;
    program[0x01] = 0x10;
    program[0x02] = 0x80;
    program[0x10] = 0x60;
    let mut console = console_with(&program, 0x8000);

    let sp_before = console.cpu().sp;
    console.step();
    assert_eq!(console.cpu().pc, 0x8010);
    console.step();
    assert_eq!(console.cpu().pc, 0x8003);
    assert_eq!(console.cpu().sp, sp_before);
}

#[test]
fn stack_round_trips_scenario() {
    // SEC, PHP, LDA #$42, PHA, LDA #$00, PLA, PLP
    let program = [0x38, 0x08, 0xA9, 0x42, 0x48, 0xA9, 0x00, 0x68, 0x28];
    let mut console = console_with(&program, 0x8000);
    let sp_before = console.cpu().sp;

    for _ in 0..7 {
        console.step();
    }
    assert_eq!(console.cpu().a, 0x42);
    assert_eq!(console.cpu().sp, sp_before);
    assert!(console.cpu().status.contains(Status::C));
    assert!(console.cpu().status.contains(Status::U));
    assert!(!console.cpu().status.contains(Status::B));
}

#[test]
fn adc_boundary_case() {
    // LDA #$7F, CLC, ADC #$01
    let mut console = console_with(&[0xA9, 0x7F, 0x18, 0x69, 0x01], 0x8000);
    for _ in 0..3 {
        console.step();
    }
    let cpu = console.cpu();
    assert_eq!(cpu.a, 0x80);
    assert!(cpu.status.contains(Status::N));
    assert!(cpu.status.contains(Status::V));
    assert!(!cpu.status.contains(Status::C));
    assert!(!cpu.status.contains(Status::Z));
}

#[test]
fn sbc_boundary_case() {
    // LDA #$80, SEC, SBC #$01
    let mut console = console_with(&[0xA9, 0x80, 0x38, 0xE9, 0x01], 0x8000);
    for _ in 0..3 {
        console.step();
    }
    let cpu = console.cpu();
    assert_eq!(cpu.a, 0x7F);
    assert!(!cpu.status.contains(Status::N));
    assert!(cpu.status.contains(Status::V));
    assert!(cpu.status.contains(Status::C));
    assert!(!cpu.status.contains(Status::Z));
}

#[test]
fn indirect_jmp_page_wrap() {
    // JMP ($10FF) with the pointer split across the page wrap.
    let mut console = console_with(&[0x6C, 0xFF, 0x10], 0x8000);
    console.bus_mut().write(0x10FF, 0x00);
    console.bus_mut().write(0x1000, 0x90);
    console.step();
    assert_eq!(console.cpu().pc, 0x9000);
}

#[test]
fn zero_page_x_wrap() {
    // LDX #$02, LDA $FF,X reads $0001.
    let mut console = console_with(&[0xA2, 0x02, 0xB5, 0xFF], 0x8000);
    console.bus_mut().write(0x0001, 0x3C);
    console.step();
    console.step();
    assert_eq!(console.cpu().a, 0x3C);
}

#[test]
fn pc_advance_matches_byte_count_over_program() {
    // A straight-line program touching 1, 2 and 3 byte instructions.
    let program = [
        0xEA, // NOP            (1)
        0xA9, 0x01, // LDA #$01 (2)
        0x8D, 0x00, 0x02, // STA $0200 (3)
        0xE8, // INX            (1)
        0xC8, // INY            (1)
    ];
    let mut console = console_with(&program, 0x8000);
    let expected = [0x8001u16, 0x8003, 0x8006, 0x8007, 0x8008];
    for &pc in &expected {
        console.step();
        assert_eq!(console.cpu().pc, pc);
    }
}
