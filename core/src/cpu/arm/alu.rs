//! # ALU Operations and the Barrel Shifter
//!
//! The 16 data processing operations (§4.7) and the barrel shifter that
//! computes operand 2 for them (§4.5). Kept as pure functions over
//! `u32`/[`ArithmeticOpResult`] so the executors in [`execute`](super::execute)
//! can call them without touching register or mode state directly.
//!
//! ## The 16 ALU Operations
//!
//! ```text
//! ┌────────┬─────────┬────────────────────────────────────────────────────────┐
//! │ OpCode │  Instr  │ Operation                                              │
//! ├────────┼─────────┼────────────────────────────────────────────────────────┤
//! │  0000  │   AND   │ Rd = Rn AND Op2        (Logical AND)                   │
//! │  0001  │   EOR   │ Rd = Rn XOR Op2        (Exclusive OR)                  │
//! │  0010  │   SUB   │ Rd = Rn - Op2          (Subtract)                      │
//! │  0011  │   RSB   │ Rd = Op2 - Rn          (Reverse Subtract)              │
//! │  0100  │   ADD   │ Rd = Rn + Op2          (Add)                           │
//! │  0101  │   ADC   │ Rd = Rn + Op2 + C      (Add with Carry)                │
//! │  0110  │   SBC   │ Rd = Rn - Op2 - !C     (Subtract with Carry)           │
//! │  0111  │   RSC   │ Rd = Op2 - Rn - !C     (Reverse Subtract with Carry)   │
//! │  1000  │   TST   │ Rn AND Op2, flags only (Test bits)                     │
//! │  1001  │   TEQ   │ Rn XOR Op2, flags only (Test Equivalence)              │
//! │  1010  │   CMP   │ Rn - Op2, flags only   (Compare)                       │
//! │  1011  │   CMN   │ Rn + Op2, flags only   (Compare Negative)              │
//! │  1100  │   ORR   │ Rd = Rn OR Op2         (Logical OR)                    │
//! │  1101  │   MOV   │ Rd = Op2               (Move, Rn ignored)              │
//! │  1110  │   BIC   │ Rd = Rn AND NOT Op2    (Bit Clear)                     │
//! │  1111  │   MVN   │ Rd = NOT Op2           (Move Not, Rn ignored)          │
//! └────────┴─────────┴────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operand 2
//!
//! **Register form (I=0)**: `Rm` shifted by an immediate (bits 11-7) or by
//! the bottom byte of another register (bits 11-8), per bits 6-5 shift type.
//!
//! **Immediate form (I=1)**: an 8-bit base (bits 7-0) rotated right by
//! `2 * rotate` (bits 11-8), producing only even-aligned byte constants.

use serde::{Deserialize, Serialize};

use crate::bitwise::Bits;
use crate::cpu::flags::ShiftKind;

/// The 16 data processing opcodes, encoded in bits 24-21.
///
/// Operations are divided into:
/// - **Logical**: AND, EOR, TST, TEQ, ORR, MOV, BIC, MVN — carry comes
///   from the barrel shifter.
/// - **Arithmetic**: SUB, RSB, ADD, ADC, SBC, RSC, CMP, CMN — carry comes
///   from the ALU operation itself.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum ArmModeAluInstr {
    And = 0x0,
    Eor = 0x1,
    Sub = 0x2,
    Rsb = 0x3,
    Add = 0x4,
    Adc = 0x5,
    Sbc = 0x6,
    Rsc = 0x7,
    Tst = 0x8,
    Teq = 0x9,
    Cmp = 0xA,
    Cmn = 0xB,
    Orr = 0xC,
    Mov = 0xD,
    Bic = 0xE,
    Mvn = 0xF,
}

impl ArmModeAluInstr {
    /// Whether this opcode writes `Rd` or is flags-only (TST/TEQ/CMP/CMN).
    #[must_use]
    pub const fn writes_result(self) -> bool {
        !matches!(self, Self::Tst | Self::Teq | Self::Cmp | Self::Cmn)
    }

    /// Whether this opcode is a logical operation (AND/EOR/ORR/MOV/BIC/MVN
    /// and their flags-only forms TST/TEQ), which never defines V (§4.7).
    #[must_use]
    pub const fn is_logical(self) -> bool {
        matches!(
            self,
            Self::And | Self::Eor | Self::Orr | Self::Mov | Self::Bic | Self::Mvn | Self::Tst | Self::Teq
        )
    }
}

impl std::fmt::Display for ArmModeAluInstr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::And => f.write_str("AND"),
            Self::Eor => f.write_str("EOR"),
            Self::Sub => f.write_str("SUB"),
            Self::Rsb => f.write_str("RSB"),
            Self::Add => f.write_str("ADD"),
            Self::Adc => f.write_str("ADC"),
            Self::Sbc => f.write_str("SBC"),
            Self::Rsc => f.write_str("RSC"),
            Self::Tst => f.write_str("TST"),
            Self::Teq => f.write_str("TEQ"),
            Self::Cmp => f.write_str("CMP"),
            Self::Cmn => f.write_str("CMN"),
            Self::Orr => f.write_str("ORR"),
            Self::Mov => f.write_str("MOV"),
            Self::Bic => f.write_str("BIC"),
            Self::Mvn => f.write_str("MVN"),
        }
    }
}

/// Classification used to decide whether the S-bit carry comes from the
/// shifter or from the arithmetic unit.
#[derive(Eq, PartialEq, Debug)]
pub enum AIKind {
    Logical,
    Arithmetic,
}

pub trait Kind {
    fn kind(&self) -> AIKind;
}

impl Kind for ArmModeAluInstr {
    fn kind(&self) -> AIKind {
        match &self {
            Self::And
            | Self::Eor
            | Self::Tst
            | Self::Teq
            | Self::Orr
            | Self::Mov
            | Self::Bic
            | Self::Mvn => AIKind::Logical,
            Self::Sub
            | Self::Rsb
            | Self::Add
            | Self::Adc
            | Self::Sbc
            | Self::Rsc
            | Self::Cmp
            | Self::Cmn => AIKind::Arithmetic,
        }
    }
}

impl From<u32> for ArmModeAluInstr {
    fn from(alu_op_code: u32) -> Self {
        match alu_op_code {
            0x0 => Self::And,
            0x1 => Self::Eor,
            0x2 => Self::Sub,
            0x3 => Self::Rsb,
            0x4 => Self::Add,
            0x5 => Self::Adc,
            0x6 => Self::Sbc,
            0x7 => Self::Rsc,
            0x8 => Self::Tst,
            0x9 => Self::Teq,
            0xA => Self::Cmp,
            0xB => Self::Cmn,
            0xC => Self::Orr,
            0xD => Self::Mov,
            0xE => Self::Bic,
            0xF => Self::Mvn,
            _ => unreachable!(),
        }
    }
}

/// Result of an ALU or shift operation, including the flags it would set.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Default, Clone, Copy)]
pub struct ArithmeticOpResult {
    pub result: u32,
    /// Last bit shifted out, or unsigned carry/borrow out of the ALU.
    pub carry: bool,
    /// Signed overflow.
    pub overflow: bool,
    /// Bit 31 of `result`.
    pub sign: bool,
    pub zero: bool,
}

/// The barrel shifter (§4.5). `overflow`, `sign` and `zero` are left at
/// their default (unset) value — only `result` and `carry` are meaningful
/// here; callers derive sign/zero from the final ALU result.
///
/// # Special cases
/// - `LSL #0`: no-op, carry unchanged.
/// - `LSR #0` / `ASR #0`: encode `#32`.
/// - `ROR #0`: encodes RRX, rotating `carry` in at bit 31.
#[must_use]
pub fn shift(kind: ShiftKind, shift_amount: u32, rm: u32, carry: bool) -> ArithmeticOpResult {
    match kind {
        ShiftKind::Lsl => match shift_amount {
            0 => ArithmeticOpResult {
                result: rm,
                carry,
                ..Default::default()
            },
            1..=32 => {
                let rm64 = u64::from(rm);
                let result = (rm64 << shift_amount) as u32;
                ArithmeticOpResult {
                    result,
                    carry: rm64.get_bit((32 - shift_amount) as u8),
                    ..Default::default()
                }
            }
            _ => ArithmeticOpResult {
                carry: false,
                ..Default::default()
            },
        },
        ShiftKind::Lsr => match shift_amount {
            0 => ArithmeticOpResult {
                result: 0,
                carry: rm.get_bit(31),
                ..Default::default()
            },
            1..=32 => {
                let rm64 = u64::from(rm);
                ArithmeticOpResult {
                    result: (rm64 >> shift_amount) as u32,
                    carry: rm64.get_bit((shift_amount - 1) as u8),
                    ..Default::default()
                }
            }
            _ => ArithmeticOpResult {
                result: 0,
                carry: false,
                ..Default::default()
            },
        },
        ShiftKind::Asr => match shift_amount {
            1..=31 => ArithmeticOpResult {
                result: ((rm as i32) >> shift_amount) as u32,
                carry: rm.get_bit((shift_amount - 1) as u8),
                ..Default::default()
            },
            _ => ArithmeticOpResult {
                result: ((rm as i32) >> 31) as u32,
                carry: rm.get_bit(31),
                ..Default::default()
            },
        },
        ShiftKind::Ror => {
            let mut amount = shift_amount;
            if amount > 32 {
                amount %= 32;
                if amount == 0 {
                    amount = 32;
                }
            }
            match amount {
                0 => {
                    let old_carry = u32::from(carry);
                    ArithmeticOpResult {
                        result: (rm >> 1) | (old_carry << 31),
                        carry: rm.get_bit(0),
                        ..Default::default()
                    }
                }
                1..=31 => ArithmeticOpResult {
                    result: rm.rotate_right(amount),
                    carry: rm.get_bit((amount - 1) as u8),
                    ..Default::default()
                },
                32 => ArithmeticOpResult {
                    result: rm,
                    carry: rm.get_bit(31),
                    ..Default::default()
                },
                _ => unreachable!(),
            }
        }
    }
}

/// `first_op + second_op`, with carry taken as the 33rd bit and the
/// canonical two's-complement overflow formula (§9 Open Question resolved
/// here matches the teacher's already-canonical behavior).
#[must_use]
pub fn add_inner_op(first_op: u32, second_op: u32) -> ArithmeticOpResult {
    let wide = u64::from(first_op) + u64::from(second_op);
    let result = wide as u32;

    let sign_op1 = first_op.get_bit(31);
    let sign_op2 = second_op.get_bit(31);
    let sign_r = result.get_bit(31);

    ArithmeticOpResult {
        result,
        carry: (wide >> 32) == 1,
        overflow: (sign_op1 == sign_op2) && (sign_op1 != sign_r),
        sign: sign_r,
        zero: result == 0,
    }
}

/// `first_op - second_op`, carry meaning "no borrow" (set when
/// `first_op >= second_op`), per ARM convention.
#[must_use]
pub fn sub_inner_op(first_op: u32, second_op: u32) -> ArithmeticOpResult {
    let result = first_op.wrapping_sub(second_op);

    let sign_op1 = first_op.get_bit(31);
    let sign_op2 = second_op.get_bit(31);
    let sign_r = result.get_bit(31);

    ArithmeticOpResult {
        result,
        carry: first_op >= second_op,
        overflow: (sign_op1 != sign_op2) && (sign_op2 == sign_r),
        sign: sign_r,
        zero: result == 0,
    }
}

/// `Rn + Op2 + C`. Carry/overflow are the union of the two chained adds.
#[must_use]
pub fn adc_op(rn: u32, op2: u32, carry_in: bool) -> ArithmeticOpResult {
    let first = add_inner_op(rn, op2);
    let second = add_inner_op(first.result, u32::from(carry_in));
    ArithmeticOpResult {
        result: second.result,
        carry: first.carry || second.carry,
        overflow: first.overflow || second.overflow,
        sign: second.sign,
        zero: second.zero,
    }
}

/// `Rn - Op2 - !C`, using the canonical ARM SBC carry convention: `C=1`
/// means "no borrow", so the extra term subtracted is `1 - C`.
#[must_use]
pub fn sbc_op(rn: u32, op2: u32, carry_in: bool) -> ArithmeticOpResult {
    let not_carry = u64::from(!carry_in);
    let rn64 = u64::from(rn);
    let op2_64 = u64::from(op2);

    let result = rn64.wrapping_sub(op2_64).wrapping_sub(not_carry) as u32;
    let carry_out = rn64 >= op2_64 + not_carry;

    let sign_rn = rn.get_bit(31);
    let sign_op2 = op2.get_bit(31);
    let sign_result = result.get_bit(31);

    ArithmeticOpResult {
        result,
        carry: carry_out,
        overflow: (sign_rn != sign_op2) && (sign_result != sign_rn),
        sign: sign_result,
        zero: result == 0,
    }
}

/// `Op2 - Rn - !C`: RSC is SBC with operands swapped.
#[must_use]
pub fn rsc_op(rn: u32, op2: u32, carry_in: bool) -> ArithmeticOpResult {
    sbc_op(op2, rn, carry_in)
}
