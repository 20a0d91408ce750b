//! # ARM60 Register File
//!
//! The 16 logical registers (R0..R15), CPSL/CPSR, and the banked shadow
//! registers and SPSRs for the five privileged modes (§3, §4.2, §9).
//!
//! - **R0-R12**: general purpose (R8-R12 additionally banked for FIQ).
//! - **R13 (SP)**, **R14 (LR)**: general purpose by convention, banked per
//!   privileged mode.
//! - **R15 (PC)**: program counter, never banked.
//!
//! Storage follows the redesign in the governing design notes directly:
//! a `common` array for the never-banked registers, one array per bank,
//! and a resolver that maps `(mode, logical id)` to a storage slot. `get`/
//! `set` resolve through the *current* mode; `get_banked`/`set_banked`
//! reach a specific bank regardless of current mode (used by LDM/STM
//! when the S-bit forces user-bank access).

use serde::{Deserialize, Serialize};

use crate::cpu::mode::Mode;
use crate::cpu::psr::Psr;

/// Stack Pointer register index.
pub const REG_SP: usize = 13;

/// Link Register index (return address for subroutines).
pub const REG_LR: usize = 14;

/// Program Counter register index.
pub const REG_PC: usize = 15;

#[derive(Default, Serialize, Deserialize)]
pub struct RegisterFile {
    /// R0..R7 and R15; never banked. Indices 8..14 are unused.
    common: [u32; 16],
    /// R8..R14 while in FIQ mode.
    fiq_bank: [u32; 7],
    /// R8..R14 while in any mode other than FIQ (User, SVC, IRQ, ABT, UND
    /// all share this bank for R8..R12; R13/R14 are further banked below).
    usr_bank: [u32; 7],
    /// R13, R14 for Supervisor mode.
    svc_bank: [u32; 2],
    /// R13, R14 for IRQ mode.
    irq_bank: [u32; 2],
    /// R13, R14 for Abort mode.
    abt_bank: [u32; 2],
    /// R13, R14 for Undefined mode.
    und_bank: [u32; 2],

    cpsr: Psr,
    spsr_fiq: Psr,
    spsr_svc: Psr,
    spsr_irq: Psr,
    spsr_abt: Psr,
    spsr_und: Psr,
}

impl RegisterFile {
    #[must_use]
    pub fn program_counter(&self) -> u32 {
        self.common[REG_PC]
    }

    pub const fn set_program_counter(&mut self, new_value: u32) {
        self.common[REG_PC] = new_value;
    }

    pub const fn advance_program_counter(&mut self, bytes: u32) {
        self.common[REG_PC] = self.common[REG_PC].wrapping_add(bytes);
    }

    /// Resolves `id` for the *current* mode.
    #[must_use]
    pub fn register_at(&self, id: usize) -> u32 {
        self.get_banked(self.cpsr.mode(), id)
    }

    /// Resolves `id` for the *current* mode.
    pub fn set_register_at(&mut self, id: usize, value: u32) {
        let mode = self.cpsr.mode();
        self.set_banked(mode, id, value);
    }

    /// Resolves `id` for `mode` regardless of the current mode. Used by
    /// LDM/STM when the S-bit forces access to the user-mode bank.
    #[must_use]
    pub fn get_banked(&self, mode: Mode, id: usize) -> u32 {
        match id {
            0..=7 | REG_PC => self.common[id],
            8..=12 => match mode {
                Mode::Fiq => self.fiq_bank[id - 8],
                _ => self.usr_bank[id - 8],
            },
            REG_SP | REG_LR => match mode {
                Mode::Fiq => self.fiq_bank[id - 8],
                Mode::Supervisor => self.svc_bank[id - REG_SP],
                Mode::Irq => self.irq_bank[id - REG_SP],
                Mode::Abort => self.abt_bank[id - REG_SP],
                Mode::Undefined => self.und_bank[id - REG_SP],
                Mode::User => self.usr_bank[id - 8],
            },
            _ => panic!("invalid register index: {id} (0x{id:x})"),
        }
    }

    pub fn set_banked(&mut self, mode: Mode, id: usize, value: u32) {
        match id {
            0..=7 | REG_PC => self.common[id] = value,
            8..=12 => match mode {
                Mode::Fiq => self.fiq_bank[id - 8] = value,
                _ => self.usr_bank[id - 8] = value,
            },
            REG_SP | REG_LR => match mode {
                Mode::Fiq => self.fiq_bank[id - 8] = value,
                Mode::Supervisor => self.svc_bank[id - REG_SP] = value,
                Mode::Irq => self.irq_bank[id - REG_SP] = value,
                Mode::Abort => self.abt_bank[id - REG_SP] = value,
                Mode::Undefined => self.und_bank[id - REG_SP] = value,
                Mode::User => self.usr_bank[id - 8] = value,
            },
            _ => panic!("invalid register index: {id} (0x{id:x})"),
        }
    }

    #[must_use]
    pub const fn cpsr(&self) -> Psr {
        self.cpsr
    }

    pub const fn cpsr_mut(&mut self) -> &mut Psr {
        &mut self.cpsr
    }

    pub fn set_cpsr(&mut self, value: Psr) {
        self.cpsr = value;
    }

    /// Writes CPSR[4:0]. No implicit register or SPSR saving — the caller
    /// (an exception vector, out of scope here, or an MSR to CPSR) is
    /// responsible for anything that needs preserving first.
    pub const fn enter_mode(&mut self, mode: Mode) {
        self.cpsr.set_mode(mode);
    }

    /// The current mode's SPSR. User mode has no SPSR backing store;
    /// reading it there is documented-undefined and falls back to CPSR,
    /// logged once.
    #[must_use]
    pub fn spsr_current(&self) -> Psr {
        match self.cpsr.mode() {
            Mode::Fiq => self.spsr_fiq,
            Mode::Supervisor => self.spsr_svc,
            Mode::Irq => self.spsr_irq,
            Mode::Abort => self.spsr_abt,
            Mode::Undefined => self.spsr_und,
            Mode::User => {
                tracing::warn!("SPSR read in User mode has no backing store, returning CPSR");
                self.cpsr
            }
        }
    }

    pub fn set_spsr_current(&mut self, value: Psr) {
        match self.cpsr.mode() {
            Mode::Fiq => self.spsr_fiq = value,
            Mode::Supervisor => self.spsr_svc = value,
            Mode::Irq => self.spsr_irq = value,
            Mode::Abort => self.spsr_abt = value,
            Mode::Undefined => self.spsr_und = value,
            Mode::User => tracing::warn!("SPSR write in User mode is a no-op, no backing store"),
        }
    }

    /// Snapshot of all 16 logical registers as seen in the current mode,
    /// for host inspection (§6).
    #[must_use]
    pub fn to_vec(&self) -> Vec<u32> {
        (0..16).map(|id| self.register_at(id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn common_registers_are_never_banked() {
        let mut regs = RegisterFile::default();
        regs.set_register_at(3, 0x1111);
        regs.enter_mode(Mode::Fiq);
        assert_eq!(regs.register_at(3), 0x1111);
        regs.enter_mode(Mode::Supervisor);
        assert_eq!(regs.register_at(3), 0x1111);
    }

    #[test]
    fn fiq_banks_r8_through_r14() {
        let mut regs = RegisterFile::default();
        regs.set_register_at(8, 0xAAAA);
        regs.enter_mode(Mode::Fiq);
        regs.set_register_at(8, 0xBBBB);
        regs.enter_mode(Mode::User);
        assert_eq!(regs.register_at(8), 0xAAAA, "USR value preserved across FIQ");
        regs.enter_mode(Mode::Fiq);
        assert_eq!(regs.register_at(8), 0xBBBB, "FIQ value restored on re-entry");
    }

    #[test]
    fn privileged_modes_share_r8_through_r12_but_bank_r13_r14() {
        let mut regs = RegisterFile::default();
        regs.enter_mode(Mode::Supervisor);
        regs.set_register_at(9, 0x42);
        regs.set_register_at(13, 0x1000);
        regs.enter_mode(Mode::Irq);
        assert_eq!(regs.register_at(9), 0x42, "R8-R12 shared outside FIQ");
        assert_ne!(regs.register_at(13), 0x1000, "R13 banked per privileged mode");
    }

    #[test]
    fn program_counter_is_never_banked() {
        let mut regs = RegisterFile::default();
        regs.set_program_counter(0x8000);
        regs.enter_mode(Mode::Fiq);
        assert_eq!(regs.program_counter(), 0x8000);
    }

    #[test]
    fn each_privileged_mode_has_its_own_spsr() {
        let mut regs = RegisterFile::default();
        regs.enter_mode(Mode::Supervisor);
        let mut svc_psr = Psr::default();
        svc_psr.set_zero_flag(true);
        regs.set_spsr_current(svc_psr);

        regs.enter_mode(Mode::Irq);
        let mut irq_psr = Psr::default();
        irq_psr.set_carry_flag(true);
        regs.set_spsr_current(irq_psr);

        regs.enter_mode(Mode::Supervisor);
        assert!(regs.spsr_current().zero_flag());
        assert!(!regs.spsr_current().carry_flag());

        regs.enter_mode(Mode::Irq);
        assert!(regs.spsr_current().carry_flag());
    }

    #[test]
    fn user_mode_spsr_read_falls_back_to_cpsr() {
        let mut regs = RegisterFile::default();
        regs.cpsr_mut().set_zero_flag(true);
        assert!(regs.spsr_current().zero_flag());
    }

    #[test]
    fn get_banked_reaches_a_bank_regardless_of_current_mode() {
        let mut regs = RegisterFile::default();
        regs.enter_mode(Mode::Fiq);
        regs.set_register_at(9, 0x99);
        regs.enter_mode(Mode::User);
        assert_eq!(regs.get_banked(Mode::Fiq, 9), 0x99);
        assert_ne!(regs.get_banked(Mode::User, 9), 0x99);
    }
}
