//! # Executors
//!
//! One function per instruction class decoded by
//! [`decode`](super::decode::decode) (§4.7). Each executor reads its
//! operands (through the barrel shifter where relevant), performs the
//! operation against the register file and/or bus, updates PSR flags if
//! requested, and returns the cycles charged for the dominant taken path.
//!
//! PC prefetch compensation is centralized in [`read_reg_as_operand`]:
//! [`Cpu::step`](super::super::Cpu::step) advances PC to the address of the
//! *next* instruction before executing this one, so the register file's
//! `program_counter()` already reads as `this_instruction_address + 4`.
//! Reading R15 as a plain operand (immediate-shift form, LDR's base
//! register) adds another `+4` on top of that, landing on the
//! architectural `address + 8`; reading it in register-shift form, or
//! storing it from STR/STM, adds `+8` instead (§4.5, §9).

use crate::bitwise::Bits;
use crate::bus::Bus;
use crate::cpu::arm::alu::{self, ArithmeticOpResult, ArmModeAluInstr};
use crate::cpu::arm::decode::{
    AluSecondOperandInfo, Instruction, PsrKind, PsrOpKind, ShiftOperator, SingleDataTransferOffset,
};
use crate::cpu::flags::{Indexing, LoadStoreKind, Offsetting, ReadWriteKind};
use crate::cpu::mode::Mode;
use crate::cpu::psr::Psr;
use crate::cpu::Cpu;

/// Dispatches a decoded instruction to its executor. Returns cycles
/// charged for the dominant taken path (§4.7, §4.8).
pub fn execute<B: Bus>(cpu: &mut Cpu<B>, instruction: Instruction) -> u64 {
    match instruction {
        Instruction::Branch { link, offset, .. } => branch(cpu, link, offset),
        Instruction::DataProcessing {
            alu_instruction,
            set_conditions,
            rn,
            rd,
            op2,
            ..
        } => data_processing(cpu, alu_instruction, set_conditions, rn, rd, op2),
        Instruction::PsrTransfer {
            psr_kind, kind, ..
        } => psr_transfer(cpu, psr_kind, kind),
        Instruction::Multiply {
            accumulate,
            set_conditions,
            rd,
            rn,
            rs,
            rm,
            ..
        } => multiply(cpu, accumulate, set_conditions, rd, rn, rs, rm),
        Instruction::SingleDataTransfer {
            load_store,
            quantity,
            write_back,
            indexing,
            offsetting,
            rn,
            rd,
            offset,
            ..
        } => single_data_transfer(
            cpu, load_store, quantity, write_back, indexing, offsetting, rn, rd, offset,
        ),
        Instruction::BlockDataTransfer {
            indexing,
            offsetting,
            load_psr,
            write_back,
            load_store,
            rn,
            register_list,
            ..
        } => block_data_transfer(
            cpu,
            indexing,
            offsetting,
            load_psr,
            write_back,
            load_store,
            rn,
            register_list,
        ),
        Instruction::SingleDataSwap {
            byte, rn, rd, rm, ..
        } => single_data_swap(cpu, byte, rn, rd, rm),
        Instruction::SoftwareInterrupt { .. } => software_interrupt(cpu),
        Instruction::CoprocessorDataTransfer { .. } => {
            coprocessor_stub(cpu, "CoprocessorDataTransfer")
        }
        Instruction::CoprocessorRegisterTransfer { .. } => {
            coprocessor_stub(cpu, "CoprocessorRegisterTransfer")
        }
        Instruction::CoprocessorDataOperation { .. } => {
            coprocessor_stub(cpu, "CoprocessorDataOperation")
        }
        Instruction::Undefined { .. } => undefined(cpu),
    }
}

/// Reads a register as an operand, applying PC prefetch compensation
/// (§4.5, §9) if it is R15. `register_shift` selects the `+8` timing used
/// for register-shift-amount reads and STR/STM's stored PC value; plain
/// reads (immediate-shift form, LDR/DP base register) use `+4`.
fn read_reg_as_operand<B: Bus>(cpu: &Cpu<B>, reg: u32, register_shift: bool) -> u32 {
    if reg == 15 {
        cpu.registers().program_counter() + if register_shift { 8 } else { 4 }
    } else {
        cpu.registers().register_at(reg as usize)
    }
}

fn logical_result(value: u32, shifter_carry: bool) -> ArithmeticOpResult {
    ArithmeticOpResult {
        result: value,
        carry: shifter_carry,
        overflow: false,
        sign: value.get_bit(31),
        zero: value == 0,
    }
}

/// Writes N/Z/C/V from `result`, except a logical opcode leaves V
/// untouched — it's never defined for AND/EOR/ORR/MOV/BIC/MVN/TST/TEQ.
fn set_result_flags<B: Bus>(cpu: &mut Cpu<B>, alu_instruction: ArmModeAluInstr, result: &ArithmeticOpResult) {
    if alu_instruction.is_logical() {
        cpu.registers_mut().cpsr_mut().set_logical_flags(result);
    } else {
        cpu.registers_mut().cpsr_mut().set_flags(result);
    }
}

/// Evaluates operand 2 of a data-processing instruction. Returns the
/// value, the carry the shifter produced (used when S=1 on a logical op),
/// and whether a register-shift-amount form was used (charges an extra I
/// cycle, §4.5).
fn eval_second_operand<B: Bus>(cpu: &Cpu<B>, op2: AluSecondOperandInfo) -> (u32, bool, bool) {
    match op2 {
        AluSecondOperandInfo::Immediate { base, shift } => {
            let value = base.rotate_right(shift);
            let carry = if shift == 0 {
                cpu.registers().cpsr().carry_flag()
            } else {
                value.get_bit(31)
            };
            (value, carry, false)
        }
        AluSecondOperandInfo::Register {
            shift_op,
            shift_kind,
            register,
        } => {
            let carry_in = cpu.registers().cpsr().carry_flag();
            match shift_op {
                ShiftOperator::Immediate(amount) => {
                    let rm = read_reg_as_operand(cpu, register, false);
                    let r = alu::shift(shift_kind, amount, rm, carry_in);
                    (r.result, r.carry, false)
                }
                ShiftOperator::Register(rs) => {
                    let rm = read_reg_as_operand(cpu, register, true);
                    let shift_amount = cpu.registers().register_at(rs as usize) & 0xFF;
                    // register-form amount of 0 forces LSL 0: value/carry unchanged (§4.5).
                    let r = if shift_amount == 0 {
                        ArithmeticOpResult {
                            result: rm,
                            carry: carry_in,
                            ..Default::default()
                        }
                    } else {
                        alu::shift(shift_kind, shift_amount, rm, carry_in)
                    };
                    (r.result, r.carry, true)
                }
            }
        }
    }
}

fn branch<B: Bus>(cpu: &mut Cpu<B>, link: bool, offset: i32) -> u64 {
    // program_counter() already reads as this instruction's address + 4
    // (Cpu::step pre-advances before dispatching); adding offset lands on
    // address + 4 + offset per §4.7's "PC <- PC + offset + 4" where PC in
    // that formula is the branch instruction's own address.
    let pc_exec = cpu.registers().program_counter();
    if link {
        cpu.registers_mut().set_register_at(14, pc_exec);
    }
    let target = (pc_exec as i32).wrapping_add(offset) as u32;
    cpu.registers_mut().set_program_counter(target & !0b11);
    cpu.cycle_config().branch()
}

#[allow(clippy::too_many_arguments)]
fn data_processing<B: Bus>(
    cpu: &mut Cpu<B>,
    alu_instruction: ArmModeAluInstr,
    set_conditions: bool,
    rn: u32,
    rd: u32,
    op2: AluSecondOperandInfo,
) -> u64 {
    let (op2_value, shifter_carry, register_shift) = eval_second_operand(cpu, op2);
    let op1 = read_reg_as_operand(cpu, rn, false);
    let carry_in = cpu.registers().cpsr().carry_flag();

    let result = match alu_instruction {
        ArmModeAluInstr::And | ArmModeAluInstr::Tst => logical_result(op1 & op2_value, shifter_carry),
        ArmModeAluInstr::Eor | ArmModeAluInstr::Teq => logical_result(op1 ^ op2_value, shifter_carry),
        ArmModeAluInstr::Orr => logical_result(op1 | op2_value, shifter_carry),
        ArmModeAluInstr::Mov => logical_result(op2_value, shifter_carry),
        ArmModeAluInstr::Bic => logical_result(op1 & !op2_value, shifter_carry),
        ArmModeAluInstr::Mvn => logical_result(!op2_value, shifter_carry),
        ArmModeAluInstr::Sub | ArmModeAluInstr::Cmp => alu::sub_inner_op(op1, op2_value),
        ArmModeAluInstr::Rsb => alu::sub_inner_op(op2_value, op1),
        ArmModeAluInstr::Add | ArmModeAluInstr::Cmn => alu::add_inner_op(op1, op2_value),
        ArmModeAluInstr::Adc => alu::adc_op(op1, op2_value, carry_in),
        ArmModeAluInstr::Sbc => alu::sbc_op(op1, op2_value, carry_in),
        ArmModeAluInstr::Rsc => alu::rsc_op(op1, op2_value, carry_in),
    };

    let mut pc_written = false;
    if alu_instruction.writes_result() {
        let value = if rd == 15 { result.result & !0b11 } else { result.result };
        cpu.registers_mut().set_register_at(rd as usize, value);

        if rd == 15 {
            pc_written = true;
            if set_conditions {
                if cpu.registers().cpsr().mode() == Mode::User {
                    tracing::warn!(
                        "data processing writes R15 with S=1 in User mode, which has no SPSR; ignoring CPSR restore"
                    );
                } else {
                    let spsr = cpu.registers().spsr_current();
                    cpu.registers_mut().set_cpsr(spsr);
                }
            }
        } else if set_conditions {
            set_result_flags(cpu, alu_instruction, &result);
        }
    } else if set_conditions {
        set_result_flags(cpu, alu_instruction, &result);
    }

    cpu.cycle_config().data_processing(pc_written, register_shift)
}

fn write_psr<B: Bus>(cpu: &mut Cpu<B>, psr_kind: PsrKind, value: Psr) {
    match psr_kind {
        PsrKind::Cpsr => cpu.registers_mut().set_cpsr(value),
        PsrKind::Spsr => cpu.registers_mut().set_spsr_current(value),
    }
}

fn read_psr<B: Bus>(cpu: &Cpu<B>, psr_kind: PsrKind) -> Psr {
    match psr_kind {
        PsrKind::Cpsr => cpu.registers().cpsr(),
        PsrKind::Spsr => cpu.registers().spsr_current(),
    }
}

fn psr_transfer<B: Bus>(cpu: &mut Cpu<B>, psr_kind: PsrKind, kind: PsrOpKind) -> u64 {
    match kind {
        PsrOpKind::Mrs {
            destination_register,
        } => {
            let value = read_psr(cpu, psr_kind);
            cpu.registers_mut()
                .set_register_at(destination_register as usize, u32::from(value));
        }
        PsrOpKind::Msr { source_register } => {
            let value = Psr::from(cpu.registers().register_at(source_register as usize));
            write_psr(cpu, psr_kind, value);
        }
        PsrOpKind::MsrFlg {
            operand,
            field_mask: _,
        } => {
            // Only the flag-bits nibble [31:28] is implemented; the
            // control-bits nibble (mode switching via MSR-flags-only) is
            // not part of the ARMv3-class MSR-flags-only encoding.
            let (operand_value, _carry, _register_shift) = eval_second_operand(cpu, operand);
            let current = u32::from(read_psr(cpu, psr_kind));
            let updated = (current & 0x0FFF_FFFF) | (operand_value & 0xF000_0000);
            write_psr(cpu, psr_kind, Psr::from(updated));
        }
    }
    cpu.cycle_config().base()
}

#[allow(clippy::too_many_arguments)]
fn multiply<B: Bus>(
    cpu: &mut Cpu<B>,
    accumulate: bool,
    set_conditions: bool,
    rd: u32,
    rn: u32,
    rs: u32,
    rm: u32,
) -> u64 {
    if [rd, rn, rs, rm].contains(&15) {
        tracing::debug!("multiply uses R15 as an operand, which is undefined; proceeding with the plain register read");
    }

    let result = if rm == rd {
        tracing::debug!(rd, "MUL/MLA with Rm == Rd is documented-undefined; using 0");
        0
    } else {
        let product = cpu
            .registers()
            .register_at(rm as usize)
            .wrapping_mul(cpu.registers().register_at(rs as usize));
        if accumulate {
            product.wrapping_add(cpu.registers().register_at(rn as usize))
        } else {
            product
        }
    };

    cpu.registers_mut().set_register_at(rd as usize, result);

    if set_conditions {
        let psr = cpu.registers_mut().cpsr_mut();
        psr.set_sign_flag(result.get_bit(31));
        psr.set_zero_flag(result == 0);
        psr.set_carry_flag(false);
    }

    cpu.cycle_config().base()
}

/// Rotates a misaligned word load into the correct byte lanes (§4.7,
/// scenario S5): fetch the aligned word, then rotate right (or left under
/// `BIGEND`) by 8 bits per byte of misalignment.
fn read_word_rotated<B: Bus>(cpu: &Cpu<B>, addr: u32) -> u32 {
    let word = cpu.bus().read_word(addr & !0b11);
    let misalignment = addr & 0b11;
    if misalignment == 0 {
        return word;
    }
    let rotation = misalignment * 8;
    if cpu.is_big_endian() {
        word.rotate_left(rotation)
    } else {
        word.rotate_right(rotation)
    }
}

fn eval_transfer_offset<B: Bus>(cpu: &Cpu<B>, offset: SingleDataTransferOffset) -> u32 {
    match offset {
        SingleDataTransferOffset::Immediate { offset } => offset,
        SingleDataTransferOffset::RegisterImmediate {
            shift_amount,
            shift_kind,
            reg_offset,
        } => {
            // The offset register in LDR/STR's register-offset form is
            // never R15 in legal code; no prefetch compensation applies.
            let rm = cpu.registers().register_at(reg_offset as usize);
            let carry_in = cpu.registers().cpsr().carry_flag();
            alu::shift(shift_kind, shift_amount, rm, carry_in).result
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn single_data_transfer<B: Bus>(
    cpu: &mut Cpu<B>,
    load_store: LoadStoreKind,
    quantity: ReadWriteKind,
    write_back: bool,
    indexing: Indexing,
    offsetting: Offsetting,
    rn: u32,
    rd: u32,
    offset: SingleDataTransferOffset,
) -> u64 {
    let offset_value = eval_transfer_offset(cpu, offset);
    let base = read_reg_as_operand(cpu, rn, false);

    let offset_addr = match offsetting {
        Offsetting::Up => base.wrapping_add(offset_value),
        Offsetting::Down => base.wrapping_sub(offset_value),
    };

    let transfer_addr = match indexing {
        Indexing::Pre => offset_addr,
        Indexing::Post => base,
    };

    // Post-indexed addressing always writes the offset address back,
    // regardless of W; W only governs pre-indexed writeback (§4.7).
    let should_write_back = write_back || matches!(indexing, Indexing::Post);
    if should_write_back && rn != 15 {
        cpu.registers_mut().set_register_at(rn as usize, offset_addr);
    }

    match load_store {
        LoadStoreKind::Load => {
            let value = match quantity {
                ReadWriteKind::Word => read_word_rotated(cpu, transfer_addr),
                ReadWriteKind::Byte => u32::from(cpu.bus().read_byte(transfer_addr)),
            };
            let pc_written = rd == 15;
            let value = if pc_written { value & !0b11 } else { value };
            cpu.registers_mut().set_register_at(rd as usize, value);
            cpu.cycle_config().load(pc_written)
        }
        LoadStoreKind::Store => {
            let value = if rd == 15 {
                // Stored exactly like a register-shift-form PC read (§9).
                cpu.registers().program_counter() + 8
            } else {
                cpu.registers().register_at(rd as usize)
            };
            match quantity {
                ReadWriteKind::Word => cpu.bus_mut().write_word(transfer_addr & !0b11, value),
                ReadWriteKind::Byte => cpu.bus_mut().write_byte(transfer_addr, value as u8),
            }
            cpu.cycle_config().store()
        }
    }
}

fn read_user_register<B: Bus>(cpu: &Cpu<B>, reg: u32) -> u32 {
    cpu.registers().get_banked(Mode::User, reg as usize)
}

fn write_user_register<B: Bus>(cpu: &mut Cpu<B>, reg: u32, value: u32) {
    cpu.registers_mut().set_banked(Mode::User, reg as usize, value);
}

#[allow(clippy::too_many_arguments)]
fn block_data_transfer<B: Bus>(
    cpu: &mut Cpu<B>,
    indexing: Indexing,
    offsetting: Offsetting,
    load_psr: bool,
    write_back: bool,
    load_store: LoadStoreKind,
    rn: u32,
    register_list: u32,
) -> u64 {
    let step: u32 = match offsetting {
        Offsetting::Up => 4,
        Offsetting::Down => 0u32.wrapping_sub(4),
    };

    // An empty list is undefined; the documented degenerate behavior
    // transfers R15 alone while adjusting the base as if all sixteen
    // registers had been listed (§4.7).
    let (effective_list, writeback_total) = if register_list == 0 {
        tracing::debug!(
            "empty register list in block data transfer, using documented degenerate behavior"
        );
        (1u32 << 15, step.wrapping_mul(16))
    } else {
        (
            register_list,
            step.wrapping_mul(register_list.count_ones()),
        )
    };

    let base = cpu.registers().register_at(rn as usize);
    let mut address = base;

    for reg in 0..16u32 {
        if !effective_list.get_bit(reg as u8) {
            continue;
        }
        if matches!(indexing, Indexing::Pre) {
            address = address.wrapping_add(step);
        }

        match load_store {
            LoadStoreKind::Load => {
                let value = cpu.bus().read_word(address & !0b11);
                // S-bit forces user-bank access unless this is R15 (§4.7).
                if load_psr && reg != 15 {
                    write_user_register(cpu, reg, value);
                } else {
                    let value = if reg == 15 { value & !0b11 } else { value };
                    cpu.registers_mut().set_register_at(reg as usize, value);
                    if reg == 15 && load_psr {
                        let spsr = cpu.registers().spsr_current();
                        cpu.registers_mut().set_cpsr(spsr);
                    }
                }
            }
            LoadStoreKind::Store => {
                // S-bit forces user-bank access for every register on STM,
                // including R15 (§4.7).
                let value = if load_psr {
                    read_user_register(cpu, reg)
                } else if reg == 15 {
                    cpu.registers().program_counter() + 8
                } else {
                    cpu.registers().register_at(reg as usize)
                };
                cpu.bus_mut().write_word(address & !0b11, value);
            }
        }

        if matches!(indexing, Indexing::Post) {
            address = address.wrapping_add(step);
        }
    }

    if write_back {
        cpu.registers_mut()
            .set_register_at(rn as usize, base.wrapping_add(writeback_total));
    }

    cpu.cycle_config()
        .block_transfer(u64::from(effective_list.count_ones()))
}

fn single_data_swap<B: Bus>(cpu: &mut Cpu<B>, byte: bool, rn: u32, rd: u32, rm: u32) -> u64 {
    let address = cpu.registers().register_at(rn as usize);
    let rm_value = cpu.registers().register_at(rm as usize);

    cpu.bus_mut().set_lock(true);
    let old_value = if byte {
        u32::from(cpu.bus().read_byte(address))
    } else {
        read_word_rotated(cpu, address)
    };
    if byte {
        cpu.bus_mut().write_byte(address, rm_value as u8);
    } else {
        cpu.bus_mut().write_word(address & !0b11, rm_value);
    }
    cpu.bus_mut().set_lock(false);

    cpu.registers_mut().set_register_at(rd as usize, old_value);
    cpu.cycle_config().swap()
}

fn software_interrupt<B: Bus>(cpu: &mut Cpu<B>) -> u64 {
    tracing::debug!(
        pc = cpu.registers().program_counter(),
        "software interrupt recorded; mode switch and vector dispatch are out of scope"
    );
    cpu.cycle_config().base()
}

fn coprocessor_stub<B: Bus>(cpu: &Cpu<B>, name: &str) -> u64 {
    tracing::debug!(
        pc = cpu.registers().program_counter(),
        name,
        "coprocessor instruction decoded, no coprocessor present"
    );
    cpu.cycle_config().base()
}

fn undefined<B: Bus>(cpu: &Cpu<B>) -> u64 {
    tracing::warn!(
        pc = cpu.registers().program_counter(),
        "undefined instruction decoded; no trap (out of scope)"
    );
    cpu.cycle_config().base()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::FlatBus;
    use pretty_assertions::assert_eq;

    fn cpu_with_image(image: &[u8]) -> Cpu<FlatBus> {
        let mut bus = FlatBus::new(0x1000);
        bus.load(0, image);
        Cpu::new(bus)
    }

    #[test]
    fn mov_immediate_scenario_s1() {
        // MOV R1, #0x42, AL
        let mut cpu = cpu_with_image(&0xE3A0_1042u32.to_le_bytes());
        let cycles = cpu.step();
        assert_eq!(cpu.registers().register_at(1), 0x42);
        assert_eq!(cpu.registers().program_counter(), 4);
        assert_eq!(cycles, cpu.cycle_config().base());
    }

    #[test]
    fn adds_with_carry_scenario_s2() {
        // ADDS R2, R0, R1
        let mut cpu = cpu_with_image(&0xE090_2001u32.to_le_bytes());
        cpu.registers_mut().set_register_at(0, 0xFFFF_FFFF);
        cpu.registers_mut().set_register_at(1, 1);
        cpu.step();
        assert_eq!(cpu.registers().register_at(2), 0);
        assert!(cpu.registers().cpsr().zero_flag());
        assert!(cpu.registers().cpsr().carry_flag());
        assert!(!cpu.registers().cpsr().sign_flag());
        assert!(!cpu.registers().cpsr().overflow_flag());
    }

    #[test]
    fn conditional_skip_scenario_s3() {
        // MOVEQ R0, #1 with Z=0
        let mut cpu = cpu_with_image(&0x03A0_0001u32.to_le_bytes());
        let cycles = cpu.step();
        assert_eq!(cpu.registers().register_at(0), 0);
        assert_eq!(cpu.registers().program_counter(), 4);
        assert_eq!(cycles, cpu.cycle_config().failed_condition());
    }

    #[test]
    fn branch_with_link_scenario_s4() {
        // BL +0x100 at address 0x0100
        let mut image = vec![0u8; 0x104];
        image[0x100..0x104].copy_from_slice(&0xEB00_003Fu32.to_le_bytes());
        let mut cpu = cpu_with_image(&image);
        cpu.registers_mut().set_program_counter(0x100);
        cpu.step();
        assert_eq!(cpu.registers().program_counter(), 0x200);
        assert_eq!(cpu.registers().register_at(14), 0x104);
    }

    #[test]
    fn ldr_rotated_unaligned_scenario_s5() {
        // LDR R1, [R0] with R0 = 0x11, memory[0x10..14] = AA BB CC DD
        let mut image = vec![0u8; 0x20];
        image[0..4].copy_from_slice(&0xE590_1000u32.to_le_bytes());
        image[0x10..0x14].copy_from_slice(&[0xAA, 0xBB, 0xCC, 0xDD]);
        let mut cpu = cpu_with_image(&image);
        cpu.registers_mut().set_register_at(0, 0x11);
        cpu.step();
        assert_eq!(cpu.registers().register_at(1), 0xAADD_CCBB);
    }

    #[test]
    fn swp_atomicity_marker_scenario_s6() {
        // SWP R1, R2, [R3]
        let mut image = vec![0u8; 0x44];
        image[0..4].copy_from_slice(&0xE103_1092u32.to_le_bytes());
        image[0x40..0x44].copy_from_slice(&0x1122_3344u32.to_le_bytes());
        let mut cpu = cpu_with_image(&image);
        cpu.registers_mut().set_register_at(3, 0x40);
        cpu.registers_mut().set_register_at(2, 0xDEAD_BEEF);
        cpu.step();
        assert_eq!(cpu.registers().register_at(1), 0x1122_3344);
        assert_eq!(cpu.bus().read_word(0x40), 0xDEAD_BEEF);
        assert!(!cpu.bus().is_locked());
    }

    #[test]
    fn str_stores_word_and_reads_back() {
        let mut cpu = cpu_with_image(&0xE580_1010u32.to_le_bytes()); // STR R1, [R0, #0x10]
        cpu.registers_mut().set_register_at(0, 0x100);
        cpu.registers_mut().set_register_at(1, 0xCAFE_BABE);
        cpu.step();
        assert_eq!(cpu.bus().read_word(0x110), 0xCAFE_BABE);
    }

    #[test]
    fn ldm_loads_multiple_registers_ascending() {
        // LDMIA R0!, {R1, R2}
        let mut image = vec![0u8; 0x30];
        image[0..4].copy_from_slice(&0xE8B0_0006u32.to_le_bytes());
        image[0x20..0x24].copy_from_slice(&0x1111_1111u32.to_le_bytes());
        image[0x24..0x28].copy_from_slice(&0x2222_2222u32.to_le_bytes());
        let mut cpu = cpu_with_image(&image);
        cpu.registers_mut().set_register_at(0, 0x20);
        cpu.step();
        assert_eq!(cpu.registers().register_at(1), 0x1111_1111);
        assert_eq!(cpu.registers().register_at(2), 0x2222_2222);
        assert_eq!(cpu.registers().register_at(0), 0x28);
    }

    #[test]
    fn empty_register_list_moves_only_pc_and_adjusts_base_by_0x40() {
        // STMIA R0!, {} (empty list) -- degenerate case
        let mut cpu = cpu_with_image(&0xE8A0_0000u32.to_le_bytes());
        cpu.registers_mut().set_register_at(0, 0x100);
        cpu.step();
        assert_eq!(cpu.registers().register_at(0), 0x140);
    }

    #[test]
    fn mul_with_rm_equal_rd_is_documented_zero() {
        // MUL R1, R1, R2 (Rm == Rd == R1)
        let mut cpu = cpu_with_image(&0xE001_0291u32.to_le_bytes());
        cpu.registers_mut().set_register_at(1, 7);
        cpu.registers_mut().set_register_at(2, 9);
        cpu.step();
        assert_eq!(cpu.registers().register_at(1), 0);
    }

    #[test]
    fn mrs_reads_cpsr_into_register() {
        let mut cpu = cpu_with_image(&0xE10F_0000u32.to_le_bytes()); // MRS R0, CPSR
        cpu.registers_mut().cpsr_mut().set_zero_flag(true);
        cpu.step();
        assert_eq!(cpu.registers().register_at(0) & (1 << 30), 1 << 30);
    }

    #[test]
    fn coprocessor_register_transfer_is_a_harmless_stub() {
        let mut cpu = cpu_with_image(&0xEE00_0010u32.to_le_bytes());
        let cycles = cpu.step();
        assert_eq!(cycles, cpu.cycle_config().base());
    }
}
