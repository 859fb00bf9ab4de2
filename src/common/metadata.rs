use std::fmt::{Display, Formatter};
use std::ops::{Deref, Not};
use std::str::FromStr;

use super::codec::Mode;
use super::error::{QRError, QRResult};
use super::version_db::{ECC_CODEWORDS_PER_BLOCK, NUM_ERROR_CORRECTION_BLOCKS};

// Color
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub enum Color {
    #[default]
    Light,
    Dark,
}

impl Not for Color {
    type Output = Self;
    fn not(self) -> Self::Output {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl From<bool> for Color {
    fn from(is_dark: bool) -> Self {
        if is_dark {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

// Version
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct Version(u8);

impl Version {
    pub const MIN: Version = Version(1);
    pub const MAX: Version = Version(40);

    pub fn new(ver: u8) -> QRResult<Self> {
        if !(*Self::MIN..=*Self::MAX).contains(&ver) {
            return Err(QRError::InvalidVersion(ver));
        }
        Ok(Self(ver))
    }

    // Inclusive range of versions from `min` to `max`
    pub fn range(min: Version, max: Version) -> impl Iterator<Item = Version> {
        (min.0..=max.0).map(Version)
    }

    pub const fn width(self) -> usize {
        self.0 as usize * 4 + 17
    }

    // Center coordinates of alignment patterns, shared by both axes, ascending
    pub fn alignment_pattern(self) -> Vec<i32> {
        let v = self.0 as i32;
        if v == 1 {
            return Vec::new();
        }

        let w = self.width() as i32;
        let count = v / 7 + 2;
        let step = if v == 32 { 26 } else { (w - 13 + count * 2 - 3) / (count * 2 - 2) * 2 };

        let mut res = Vec::with_capacity(count as usize);
        res.push(6);
        res.extend((0..count - 1).map(|i| w - 7 - i * step).rev());
        res
    }

    // Number of modules available for data and ecc, including remainder bits
    pub fn raw_data_modules(self) -> usize {
        let v = self.0 as usize;
        let mut res = (16 * v + 128) * v + 64;
        if v >= 2 {
            let count = v / 7 + 2;
            res -= (25 * count - 10) * count - 55;
            if v >= 7 {
                res -= 36;
            }
        }
        res
    }

    pub fn total_codewords(self) -> usize {
        self.raw_data_modules() >> 3
    }

    pub fn ecc_per_block(self, ecl: ECLevel) -> usize {
        ECC_CODEWORDS_PER_BLOCK[ecl.ordinal()][self.0 as usize] as usize
    }

    pub fn num_blocks(self, ecl: ECLevel) -> usize {
        NUM_ERROR_CORRECTION_BLOCKS[ecl.ordinal()][self.0 as usize] as usize
    }

    pub fn data_codewords(self, ecl: ECLevel) -> usize {
        self.total_codewords() - self.ecc_per_block(ecl) * self.num_blocks(ecl)
    }

    pub fn data_bit_capacity(self, ecl: ECLevel) -> usize {
        self.data_codewords(ecl) << 3
    }

    pub fn char_cnt_bits(self, mode: Mode) -> usize {
        mode.char_cnt_bits(self)
    }

    // 18 bit version info: 6 bit version followed by 12 bit BCH remainder
    pub fn info(self) -> u32 {
        let v = self.0 as u32;
        let mut rem = v;
        for _ in 0..12 {
            rem = (rem << 1) ^ ((rem >> 11) * VERSION_INFO_GENERATOR);
        }
        let res = (v << 12) | rem;
        debug_assert!(res >> 18 == 0, "Version info exceeds 18 bits: {res}");
        res
    }
}

impl Deref for Version {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<u8> for Version {
    type Error = QRError;
    fn try_from(ver: u8) -> Result<Self, Self::Error> {
        Self::new(ver)
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}


// Error correction level
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash, Default)]
pub enum ECLevel {
    #[default]
    L = 0,
    M = 1,
    Q = 2,
    H = 3,
}

impl ECLevel {
    pub const ALL: [ECLevel; 4] = [Self::L, Self::M, Self::Q, Self::H];

    pub fn ordinal(self) -> usize {
        self as usize
    }

    // 2 bit value embedded in format info
    pub fn format_bits(self) -> u32 {
        match self {
            Self::L => 0b01,
            Self::M => 0b00,
            Self::Q => 0b11,
            Self::H => 0b10,
        }
    }
}

impl FromStr for ECLevel {
    type Err = QRError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "l" | "low" => Ok(Self::L),
            "m" | "medium" => Ok(Self::M),
            "q" | "quartile" => Ok(Self::Q),
            "h" | "high" => Ok(Self::H),
            _ => Err(QRError::InvalidECLevel(s.to_string())),
        }
    }
}

impl Display for ECLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}


// Format info
//------------------------------------------------------------------------------

// 15 bit format info: ec level and mask followed by a 10 bit BCH remainder,
// XORed with FORMAT_MASK
pub fn format_info(ecl: ECLevel, mask: u8) -> u32 {
    debug_assert!(mask < 8, "Invalid mask pattern: {mask}");

    let data = (ecl.format_bits() << 3) | mask as u32;
    let mut rem = data;
    for _ in 0..10 {
        rem = (rem << 1) ^ ((rem >> 9) * FORMAT_INFO_GENERATOR);
    }
    let res = ((data << 10) | rem) ^ FORMAT_MASK;
    debug_assert!(res >> 15 == 0, "Format info exceeds 15 bits: {res}");
    res
}


// Global constants
//------------------------------------------------------------------------------

pub static FORMAT_INFO_BIT_LEN: usize = 15;

pub static FORMAT_INFO_GENERATOR: u32 = 0x537;

pub static FORMAT_MASK: u32 = 0x5412;

pub static VERSION_INFO_BIT_LEN: usize = 18;

pub static VERSION_INFO_GENERATOR: u32 = 0x1F25;
