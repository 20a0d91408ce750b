//! The six processor modes ARM60 banks registers and SPSRs for.
//!
//! Each non-USR mode owns its own R13/R14 and SPSR; FIQ additionally
//! banks R8..R12. See [`registers`](super::registers) for the storage
//! and [`Psr::mode`](super::psr::Psr::mode) for how this is read out of
//! CPSR bits [4:0].

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// The normal, unprivileged execution state.
    User = 0b10000,

    /// Entered on a fast interrupt; additionally banks R8..R12.
    Fiq = 0b10001,

    /// Entered on a normal interrupt.
    Irq = 0b10010,

    /// Entered on reset or `SWI`.
    Supervisor = 0b10011,

    /// Entered after a data or instruction prefetch abort.
    Abort = 0b10111,

    /// Entered when an undefined instruction is decoded.
    Undefined = 0b11011,
}

impl From<Mode> for u32 {
    fn from(m: Mode) -> Self {
        m as Self
    }
}

impl TryFrom<u32> for Mode {
    type Error = String;

    fn try_from(n: u32) -> Result<Self, Self::Error> {
        match n {
            0b10000 => Ok(Self::User),
            0b10001 => Ok(Self::Fiq),
            0b10010 => Ok(Self::Irq),
            0b10011 => Ok(Self::Supervisor),
            0b10111 => Ok(Self::Abort),
            0b11011 => Ok(Self::Undefined),
            _ => Err(format!("unexpected value for Mode: {n:#07b}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn round_trips_every_mode() {
        for m in [
            Mode::User,
            Mode::Fiq,
            Mode::Irq,
            Mode::Supervisor,
            Mode::Abort,
            Mode::Undefined,
        ] {
            let raw: u32 = m.into();
            assert_eq!(Mode::try_from(raw), Ok(m));
        }
    }

    #[test]
    fn rejects_system_mode() {
        assert!(Mode::try_from(0b11111).is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!(Mode::try_from(0).is_err());
    }
}
