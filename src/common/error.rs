use thiserror::Error;

use super::codec::Mode;

// Error
//------------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum QRError {
    // Invalid arguments
    #[error("Invalid version {0}: expected 1 to 40")]
    InvalidVersion(u8),
    #[error("Invalid version range {min}..={max}")]
    InvalidVersionRange { min: u8, max: u8 },
    #[error("Invalid masking pattern {0}: expected 0 to 7")]
    InvalidMaskPattern(u8),
    #[error("Invalid error correction level {0:?}")]
    InvalidECLevel(String),
    #[error("Reed-Solomon degree {0} out of range (1 to 255)")]
    InvalidEcDegree(usize),
    #[error("ECI assignment value {0} out of range (0 to 999999)")]
    InvalidEciAssignment(u32),
    #[error("Invalid character {ch:?} for {mode:?} mode")]
    InvalidChar { ch: char, mode: Mode },

    // Capacity
    #[error("Data too long: exceeds {capacity} bytes")]
    DataTooLong { capacity: usize },
}

impl QRError {
    pub fn is_invalid_argument(&self) -> bool {
        !matches!(self, Self::DataTooLong { .. })
    }
}

pub type QRResult<T> = Result<T, QRError>;
