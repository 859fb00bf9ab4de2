use std::fmt::{Display, Formatter};
use std::ops::Deref;

use tracing::trace;

use super::error::{QRError, QRResult};
use crate::builder::QR;

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub const ALL: [MaskPattern; 8] = [
        Self(0),
        Self(1),
        Self(2),
        Self(3),
        Self(4),
        Self(5),
        Self(6),
        Self(7),
    ];

    pub fn new(pattern: u8) -> QRResult<Self> {
        if pattern > 7 {
            return Err(QRError::InvalidMaskPattern(pattern));
        }
        Ok(Self(pattern))
    }

    pub fn name(self) -> &'static str {
        match self.0 {
            0b000 => "checkerboard",
            0b001 => "horizontal_lines",
            0b010 => "vertical_lines",
            0b011 => "diagonal_lines",
            0b100 => "large_checkerboard",
            0b101 => "fields",
            0b110 => "diamonds",
            _ => "meadow",
        }
    }

    // Whether the module at (x, y) is inverted by this mask
    pub fn is_masked(self, x: i32, y: i32) -> bool {
        self.mask_functions()(x, y)
    }
}

impl Deref for MaskPattern {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<u8> for MaskPattern {
    type Error = QRError;
    fn try_from(pattern: u8) -> Result<Self, Self::Error> {
        Self::new(pattern)
    }
}

impl Display for MaskPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.0, self.name())
    }
}

mod mask_functions {
    pub fn checkerboard(x: i32, y: i32) -> bool {
        (x + y) & 1 == 0
    }

    pub fn horizontal_lines(_: i32, y: i32) -> bool {
        y & 1 == 0
    }

    pub fn vertical_lines(x: i32, _: i32) -> bool {
        x % 3 == 0
    }

    pub fn diagonal_lines(x: i32, y: i32) -> bool {
        (x + y) % 3 == 0
    }

    pub fn large_checkerboard(x: i32, y: i32) -> bool {
        ((x / 3) + (y >> 1)) & 1 == 0
    }

    pub fn fields(x: i32, y: i32) -> bool {
        ((x * y) & 1) + ((x * y) % 3) == 0
    }

    pub fn diamonds(x: i32, y: i32) -> bool {
        (((x * y) & 1) + ((x * y) % 3)) & 1 == 0
    }

    pub fn meadow(x: i32, y: i32) -> bool {
        (((x + y) & 1) + ((x * y) % 3)) & 1 == 0
    }
}

impl MaskPattern {
    pub fn mask_functions(self) -> fn(i32, i32) -> bool {
        debug_assert!(*self < 8, "Invalid pattern");

        match *self {
            0b000 => mask_functions::checkerboard,
            0b001 => mask_functions::horizontal_lines,
            0b010 => mask_functions::vertical_lines,
            0b011 => mask_functions::diagonal_lines,
            0b100 => mask_functions::large_checkerboard,
            0b101 => mask_functions::fields,
            0b110 => mask_functions::diamonds,
            0b111 => mask_functions::meadow,
            _ => unreachable!(),
        }
    }
}


// Mask selection
//------------------------------------------------------------------------------

// Scores all 8 masks with their own format info drawn and keeps the first
// minimum. Leaves the qr with the chosen mask applied.
pub fn apply_best_mask(qr: &mut QR) -> MaskPattern {
    let mut best = MaskPattern(0);
    let mut min_penalty = u32::MAX;
    for mask in MaskPattern::ALL {
        qr.draw_format_info(mask);
        qr.apply_mask(mask);
        let penalty = compute_total_penalty(qr);
        trace!(mask = *mask, penalty, "Scored mask");
        if penalty < min_penalty {
            best = mask;
            min_penalty = penalty;
        }
        // Xor undoes the mask
        qr.apply_mask(mask);
    }

    qr.draw_format_info(best);
    qr.apply_mask(best);
    best
}

// Penalty
//------------------------------------------------------------------------------

pub fn compute_total_penalty(qr: &QR) -> u32 {
    let adj_pen = compute_adjacent_penalty(qr);
    let blk_pen = compute_block_penalty(qr);
    let fp_pen = compute_finder_pattern_penalty(qr);
    let bal_pen = compute_balance_penalty(qr);
    adj_pen + blk_pen + fp_pen + bal_pen
}

fn compute_adjacent_penalty(qr: &QR) -> u32 {
    let w = qr.width() as i32;
    let line_penalty = |get: &dyn Fn(i32) -> bool| {
        let mut pen = 0;
        let mut run = 0;
        let mut last = false;
        for i in 0..w {
            let clr = get(i);
            if i == 0 || clr != last {
                last = clr;
                run = 1;
            } else {
                run += 1;
                if run == 5 {
                    pen += PENALTY_N1;
                } else if run > 5 {
                    pen += 1;
                }
            }
        }
        pen
    };

    (0..w)
        .map(|i| line_penalty(&|x| qr.is_dark(x, i)) + line_penalty(&|y| qr.is_dark(i, y)))
        .sum()
}

fn compute_block_penalty(qr: &QR) -> u32 {
    let mut pen = 0;
    let w = qr.width() as i32;
    for y in 0..w - 1 {
        for x in 0..w - 1 {
            let clr = qr.is_dark(x, y);
            if clr == qr.is_dark(x + 1, y)
                && clr == qr.is_dark(x, y + 1)
                && clr == qr.is_dark(x + 1, y + 1)
            {
                pen += PENALTY_N2;
            }
        }
    }
    pen
}

// 1:1:3:1:1 finder-like run with 4 light modules on either side, matched over
// a sliding 11 module window
fn compute_finder_pattern_penalty(qr: &QR) -> u32 {
    let w = qr.width() as i32;
    let line_penalty = |get: &dyn Fn(i32) -> bool| {
        let mut pen = 0;
        let mut bits = 0u32;
        for i in 0..w {
            bits = ((bits << 1) & 0x7FF) | get(i) as u32;
            if i >= 10 && FINDER_LIKE_WINDOWS.contains(&bits) {
                pen += PENALTY_N3;
            }
        }
        pen
    };

    (0..w)
        .map(|i| line_penalty(&|x| qr.is_dark(x, i)) + line_penalty(&|y| qr.is_dark(i, y)))
        .sum()
}

// 10 points for every 5% the dark ratio deviates past the 45%-55% band
fn compute_balance_penalty(qr: &QR) -> u32 {
    let dark = qr.count_dark_modules() as u64;
    let total = (qr.width() * qr.width()) as u64;
    let deviation = (dark * 20).abs_diff(total * 10);
    let k = deviation.div_ceil(total).saturating_sub(1);
    k as u32 * PENALTY_N4
}


// Global constants
//------------------------------------------------------------------------------

static PENALTY_N1: u32 = 3;

static PENALTY_N2: u32 = 3;

static PENALTY_N3: u32 = 40;

static PENALTY_N4: u32 = 10;

static FINDER_LIKE_WINDOWS: [u32; 2] = [0x05D, 0x5D0];
