//! # Program Status Registers (CPSR and SPSR)
//!
//! The PSR contains condition flags (N, Z, C, V) and the 5-bit mode field.
//!
//! ```text
//! 31 30 29 28 27        5     0
//! ┌──┬──┬──┬──┬──────────┬─────┐
//! │N │Z │C │V │ reserved │Mode │
//! └──┴──┴──┴──┴──────────┴─────┘
//! ```
//!
//! - **Flags (28-31)**: see [`condition`](super::condition) for how these are tested.
//! - **Mode (0-4)**: see [`mode`](super::mode) for the six operating modes.
//!
//! Each non-USR mode has its own SPSR, used to save CPSR across exception
//! entry/return; see [`registers`](super::registers) for storage.

use serde::{Deserialize, Serialize};

use crate::bitwise::Bits;
use crate::cpu::arm::alu::ArithmeticOpResult;
use crate::cpu::{condition::Condition, mode::Mode};

/// Program Status Register (CPSR or SPSR).
///
/// Wraps a raw `u32` and provides type-safe accessors for the condition
/// flags and the mode field. The same type is used for CPSR and for each
/// mode's SPSR.
#[derive(Default, Clone, Copy, Serialize, Deserialize)]
pub struct Psr(u32);

impl Psr {
    /// Evaluates the 14-case condition truth table plus AL/NV (§4.4).
    #[must_use]
    pub fn can_execute(self, cond: Condition) -> bool {
        use Condition::{AL, CC, CS, EQ, GE, GT, HI, LE, LS, LT, MI, NE, NV, PL, VC, VS};
        match cond {
            EQ => self.zero_flag(),
            NE => !self.zero_flag(),
            CS => self.carry_flag(),
            CC => !self.carry_flag(),
            MI => self.sign_flag(),
            PL => !self.sign_flag(),
            VS => self.overflow_flag(),
            VC => !self.overflow_flag(),
            HI => self.carry_flag() && !self.zero_flag(),
            LS => !self.carry_flag() || self.zero_flag(),
            GE => self.sign_flag() == self.overflow_flag(),
            LT => self.sign_flag() != self.overflow_flag(),
            GT => !self.zero_flag() && (self.sign_flag() == self.overflow_flag()),
            LE => self.zero_flag() || (self.sign_flag() != self.overflow_flag()),
            AL => true,
            NV => false,
        }
    }

    /// N => bit 31.
    #[must_use]
    pub fn sign_flag(self) -> bool {
        self.0.get_bit(31)
    }

    /// Z => bit 30.
    #[must_use]
    pub fn zero_flag(self) -> bool {
        self.0.get_bit(30)
    }

    /// C => bit 29.
    #[must_use]
    pub fn carry_flag(self) -> bool {
        self.0.get_bit(29)
    }

    /// V => bit 28.
    #[must_use]
    pub fn overflow_flag(self) -> bool {
        self.0.get_bit(28)
    }

    /// M4-M0 => bits 4-0.
    ///
    /// Falls back to Supervisor mode and logs if the mode bits don't
    /// encode one of the six valid modes — the same documented-degenerate
    /// posture as the rest of this interpreter's undefined-input handling.
    #[must_use]
    pub fn mode(self) -> Mode {
        let mode_bits = self.0 & 0b1_1111;
        Mode::try_from(mode_bits).unwrap_or_else(|_| {
            tracing::warn!(
                mode_bits = format!("{mode_bits:#07b}"),
                psr = format!("{:#010x}", self.0),
                "invalid mode bits in PSR, defaulting to Supervisor"
            );
            Mode::Supervisor
        })
    }

    pub fn set_sign_flag(&mut self, value: bool) {
        self.0.set_bit(31, value);
    }

    pub fn set_zero_flag(&mut self, value: bool) {
        self.0.set_bit(30, value);
    }

    pub fn set_carry_flag(&mut self, value: bool) {
        self.0.set_bit(29, value);
    }

    pub fn set_overflow_flag(&mut self, value: bool) {
        self.0.set_bit(28, value);
    }

    /// Sets C/Z/N/V together from a computed arithmetic result.
    pub fn set_flags(&mut self, op_result: &ArithmeticOpResult) {
        self.set_carry_flag(op_result.carry);
        self.set_zero_flag(op_result.zero);
        self.set_sign_flag(op_result.sign);
        self.set_overflow_flag(op_result.overflow);
    }

    /// Sets N/Z/C from a logical result, leaving V untouched (§4.7 — the
    /// logical opcodes never define V).
    pub fn set_logical_flags(&mut self, op_result: &ArithmeticOpResult) {
        self.set_carry_flag(op_result.carry);
        self.set_zero_flag(op_result.zero);
        self.set_sign_flag(op_result.sign);
    }

    pub const fn set_mode_raw(&mut self, m: u32) {
        self.0 &= !0b1_1111;
        self.0 |= m & 0b1_1111;
    }

    pub const fn set_mode(&mut self, m: Mode) {
        self.0 &= !0b1_1111;
        self.0 |= m as u32;
    }
}

impl From<Mode> for Psr {
    fn from(m: Mode) -> Self {
        let mut s = Self(0);
        s.set_mode(m);
        s
    }
}

impl From<Psr> for u32 {
    fn from(p: Psr) -> Self {
        p.0
    }
}

impl From<u32> for Psr {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn check_sign_flag() {
        let mut cpsr: Psr = Psr(0);
        cpsr.set_sign_flag(true);
        assert!(cpsr.sign_flag());
    }

    #[test]
    fn check_zero_flag() {
        let mut cpsr: Psr = Psr(0);
        cpsr.set_zero_flag(true);
        assert!(cpsr.zero_flag());
    }

    #[test]
    fn check_carry_flag() {
        let mut cpsr: Psr = Psr(0);
        cpsr.set_carry_flag(true);
        assert!(cpsr.carry_flag());
    }

    #[test]
    fn check_overflow_flag() {
        let cpsr: Psr = Psr(0b0001_0000_0000_0000_0000_0000_0000_0000);
        assert!(cpsr.overflow_flag());
    }

    #[test]
    fn check_invalid_mode_falls_back_to_supervisor() {
        let cpsr = Psr(0b00000);
        assert_eq!(cpsr.mode(), Mode::Supervisor);
    }

    #[test]
    fn check_user() {
        let mut cpsr: Psr = Psr(0);
        cpsr.set_mode(Mode::User);
        assert_eq!(u32::from(cpsr) & 0b1_1111, 0b10000);
        assert_eq!(Psr(0b10000).mode(), Mode::User);
    }

    #[test]
    fn check_fiq() {
        let mut cpsr: Psr = Psr(0);
        cpsr.set_mode(Mode::Fiq);
        assert_eq!(u32::from(cpsr) & 0b1_1111, 0b10001);
        assert_eq!(Psr(0b10001).mode(), Mode::Fiq);
    }

    #[test]
    fn check_irq() {
        let mut cpsr: Psr = Psr(0);
        cpsr.set_mode(Mode::Irq);
        assert_eq!(u32::from(cpsr) & 0b1_1111, 0b10010);
        assert_eq!(Psr(0b10010).mode(), Mode::Irq);
    }

    #[test]
    fn check_supervisor() {
        let mut cpsr: Psr = Psr(0);
        cpsr.set_mode(Mode::Supervisor);
        assert_eq!(u32::from(cpsr) & 0b1_1111, 0b10011);
        assert_eq!(Psr(0b10011).mode(), Mode::Supervisor);
    }

    #[test]
    fn check_abort() {
        let mut cpsr: Psr = Psr(0);
        cpsr.set_mode(Mode::Abort);
        assert_eq!(u32::from(cpsr) & 0b1_1111, 0b10111);
        assert_eq!(Psr(0b10111).mode(), Mode::Abort);
    }

    #[test]
    fn check_undefined() {
        let mut cpsr: Psr = Psr(0);
        cpsr.set_mode(Mode::Undefined);
        assert_eq!(u32::from(cpsr) & 0b1_1111, 0b11011);
        assert_eq!(Psr(0b11011).mode(), Mode::Undefined);
    }

    #[test]
    fn can_execute_covers_eq_and_al_and_nv() {
        let mut cpsr = Psr(0);
        cpsr.set_zero_flag(true);
        assert!(cpsr.can_execute(Condition::EQ));
        assert!(!cpsr.can_execute(Condition::NE));
        assert!(cpsr.can_execute(Condition::AL));
        assert!(!cpsr.can_execute(Condition::NV));
    }
}
