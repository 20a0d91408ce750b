//! # Instruction Encoding Flags
//!
//! Small field types shared by the data-processing and load/store
//! executors. These represent individual bits decoded from the
//! instruction word rather than whole instructions.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Memory Access Instruction Flags                      │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  LoadStoreKind:    Load (LDR) vs Store (STR)                           │
//! │  ReadWriteKind:    Word (32-bit) vs Byte (8-bit)                       │
//! │  Indexing:         Pre (calculate address before) vs Post (after)      │
//! │  Offsetting:       Up (add offset) vs Down (subtract offset)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::bitwise::Bits;

/// The type of shift operation performed by the barrel shifter (§4.5).
///
/// | `ShiftKind` | Operation           | Example          | Result           |
/// |-----------|---------------------|------------------|------------------|
/// | LSL       | Logical Shift Left  | 0x0F LSL #4      | 0xF0             |
/// | LSR       | Logical Shift Right | 0xF0 LSR #4      | 0x0F             |
/// | ASR       | Arithmetic Shift R  | 0x80 ASR #4      | 0xF8 (sign ext)  |
/// | ROR       | Rotate Right        | 0x0F ROR #4      | 0xF0000000       |
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ShiftKind {
    Lsl,
    Lsr,
    Asr,
    Ror,
}

impl From<u32> for ShiftKind {
    fn from(op: u32) -> Self {
        match op {
            0 => Self::Lsl,
            1 => Self::Lsr,
            2 => Self::Asr,
            3 => Self::Ror,
            _ => unreachable!(),
        }
    }
}

impl std::fmt::Display for ShiftKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lsl => f.write_str("LSL"),
            Self::Lsr => f.write_str("LSR"),
            Self::Asr => f.write_str("ASR"),
            Self::Ror => f.write_str("ROR"),
        }
    }
}

/// The data size for a memory read/write, decoded from the B bit.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum ReadWriteKind {
    #[default]
    Word,
    Byte,
}

impl From<bool> for ReadWriteKind {
    fn from(value: bool) -> Self {
        if value { Self::Byte } else { Self::Word }
    }
}

impl From<u32> for ReadWriteKind {
    fn from(op_code: u32) -> Self {
        op_code.get_bit(22).into()
    }
}

/// Whether a single data transfer is a load (L=1) or store (L=0).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum LoadStoreKind {
    Store,
    Load,
}

impl From<bool> for LoadStoreKind {
    fn from(b: bool) -> Self {
        if b { Self::Load } else { Self::Store }
    }
}

impl std::fmt::Display for LoadStoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load => write!(f, "LDR"),
            Self::Store => write!(f, "STR"),
        }
    }
}

/// Pre- (P=1) vs post-indexed (P=0) addressing.
///
/// Post-indexed addressing always writes back the calculated address,
/// regardless of the W bit.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Indexing {
    Post,
    Pre,
}

impl From<bool> for Indexing {
    fn from(state: bool) -> Self {
        if state { Self::Pre } else { Self::Post }
    }
}

/// Add (U=1) vs subtract (U=0) the offset from the base address.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Offsetting {
    Down,
    Up,
}

impl From<bool> for Offsetting {
    fn from(state: bool) -> Self {
        if state { Self::Up } else { Self::Down }
    }
}
